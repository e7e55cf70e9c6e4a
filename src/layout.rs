//! Card layout engine: random placement plus a greedy overlap relaxer.
//!
//! `resolve` moves one card at a time away from the first neighbour it
//! overlaps, bounded by `LayoutConfig::max_attempts`. It is a cheap local
//! heuristic meant to be re-run every couple of seconds (`relax_pass`), not a
//! global packer: dense boards can keep some residual overlap.

use std::f64::consts::TAU;

use log::debug;
use rand::Rng;

use crate::card::Card;
use crate::config::LayoutConfig;
use crate::geometry::{Bounds, Measurable, Rect};

// Extra travel so a freshly separated pair is not left touching within float noise.
const SEPARATION_SLACK: f64 = 1e-6;

/// Result of resolving a single card.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ResolveOutcome {
    /// A full scan found no overlap after `moves` pushes.
    Settled { moves: u32 },
    /// Attempt bound reached with the card still overlapping something.
    Exhausted,
}

/// Summary of one relaxation pass.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct RelaxReport {
    pub settled: usize,
    pub exhausted: usize,
    pub moves: u32,
}

/// Uniformly random top-left for a `width` x `height` card that keeps it
/// fully inside `bounds`.
pub fn place<R: Rng + ?Sized>(width: f64, height: f64, bounds: Bounds, rng: &mut R) -> Rect {
    let left = rng.r#gen::<f64>() * bounds.max_left(width);
    let top = rng.r#gen::<f64>() * bounds.max_top(height);
    Rect::new(left, top, width, height)
}

/// Padded overlap test between two card boxes.
pub fn overlaps(a: &Rect, b: &Rect, padding: f64) -> bool {
    a.overlaps_padded(b, padding)
}

fn first_overlap<M>(index: usize, cards: &[Card<M>], padding: f64) -> Option<Rect> {
    let current = cards[index].rect;
    cards
        .iter()
        .enumerate()
        .find(|(i, c)| *i != index && overlaps(&current, &c.rect, padding))
        .map(|(_, c)| c.rect)
}

/// Travel along unit vector (ux, uy) that clears the padded overlap on the
/// cheaper axis.
fn clearing_travel(current: &Rect, other: &Rect, padding: f64, ux: f64, uy: f64) -> f64 {
    let a = current.padded(padding);
    let b = other.padded(padding);
    let depth_x = a.right().min(b.right()) - a.left.max(b.left);
    let depth_y = a.bottom().min(b.bottom()) - a.top.max(b.top);
    let along_x = if ux.abs() > f64::EPSILON { depth_x / ux.abs() } else { f64::INFINITY };
    let along_y = if uy.abs() > f64::EPSILON { depth_y / uy.abs() } else { f64::INFINITY };
    along_x.min(along_y).max(0.0) + SEPARATION_SLACK
}

/// Where `current` should go to get away from `other`.
fn push_apart<R: Rng + ?Sized>(
    current: &Rect,
    other: &Rect,
    bounds: Bounds,
    config: &LayoutConfig,
    rng: &mut R,
) -> Rect {
    let (cx, cy) = current.center();
    let (ox, oy) = other.center();
    let distance = current.center_distance(other);
    let (ux, uy) = if distance > f64::EPSILON {
        ((cx - ox) / distance, (cy - oy) / distance)
    } else {
        // Exact coincidence: any direction will do.
        let angle = rng.gen_range(0.0..TAU);
        (angle.cos(), angle.sin())
    };
    let min_separation = (current.width + other.width) / 2.0 + config.extra_margin;
    let mut travel = min_separation - distance;
    if travel <= SEPARATION_SLACK {
        // Centres already `min_separation` apart but the boxes still meet near
        // a corner: clear this pair instead of pulling the card back in.
        travel = clearing_travel(current, other, config.padding, ux, uy);
    }
    bounds.clamp(Rect {
        left: current.left + ux * travel,
        top: current.top + uy * travel,
        ..*current
    })
}

/// Push the card at `index` away from overlapping neighbours until a full
/// scan is clean or `max_attempts` pushes were made.
pub fn resolve<M: Measurable, R: Rng + ?Sized>(
    index: usize,
    cards: &mut [Card<M>],
    bounds: Bounds,
    config: &LayoutConfig,
    rng: &mut R,
) -> ResolveOutcome {
    if index >= cards.len() {
        return ResolveOutcome::Settled { moves: 0 };
    }
    for attempt in 0..config.max_attempts {
        let Some(other) = first_overlap(index, cards, config.padding) else {
            return ResolveOutcome::Settled { moves: attempt };
        };
        let target = push_apart(&cards[index].rect, &other, bounds, config, rng);
        cards[index].move_to(target.left, target.top);
    }
    if first_overlap(index, cards, config.padding).is_none() {
        return ResolveOutcome::Settled { moves: config.max_attempts };
    }
    debug!(
        "card '{}' still overlapping after {} attempts",
        cards[index].word, config.max_attempts
    );
    ResolveOutcome::Exhausted
}

/// One re-stabilisation pass: refresh every box from its handle, then
/// resolve each card in order. Zero or one card is a no-op.
pub fn relax_pass<M: Measurable, R: Rng + ?Sized>(
    cards: &mut [Card<M>],
    bounds: Bounds,
    config: &LayoutConfig,
    rng: &mut R,
) -> RelaxReport {
    let mut report = RelaxReport::default();
    if cards.len() <= 1 {
        return report;
    }
    for card in cards.iter_mut() {
        card.refresh();
    }
    for index in 0..cards.len() {
        match resolve(index, cards, bounds, config, rng) {
            ResolveOutcome::Settled { moves } => {
                report.settled += 1;
                report.moves += moves;
            }
            ResolveOutcome::Exhausted => {
                report.exhausted += 1;
                report.moves += config.max_attempts;
            }
        }
    }
    report
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::card::{CardId, Difficulty};
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    fn card(id: u32, left: f64, top: f64) -> Card<Rect> {
        let rect = Rect::new(left, top, 150.0, 100.0);
        Card {
            id: CardId(id),
            word: format!("w{id}"),
            translation: String::new(),
            difficulty: Difficulty::Easy,
            rect,
            handle: rect,
        }
    }

    fn rng() -> ChaCha8Rng {
        ChaCha8Rng::seed_from_u64(7)
    }

    #[test]
    fn test_place_stays_inside() {
        let bounds = Bounds::new(800.0, 600.0);
        let mut r = rng();
        for _ in 0..500 {
            let rect = place(150.0, 100.0, bounds, &mut r);
            assert!(rect.left >= 0.0 && rect.left <= 650.0);
            assert!(rect.top >= 0.0 && rect.top <= 500.0);
        }
    }

    #[test]
    fn test_coincident_cards_are_pushed_min_separation_apart() {
        let cfg = LayoutConfig::default();
        let bounds = Bounds::new(1200.0, 900.0);
        let mut cards = vec![card(0, 525.0, 400.0), card(1, 525.0, 400.0)];
        let outcome = resolve(1, &mut cards, bounds, &cfg, &mut rng());
        assert!(matches!(outcome, ResolveOutcome::Settled { .. }));
        let min_sep = (150.0 + 150.0) / 2.0 + cfg.extra_margin;
        assert!(cards[1].rect.center_distance(&cards[0].rect) >= min_sep - 1e-9);
        assert!(bounds.contains(&cards[1].rect));
        assert_eq!(cards[0].rect, Rect::new(525.0, 400.0, 150.0, 100.0));
    }

    #[test]
    fn test_coincident_push_is_exactly_min_separation() {
        let cfg = LayoutConfig::default();
        let bounds = Bounds::new(4000.0, 4000.0);
        let stacked = Rect::new(1925.0, 1950.0, 150.0, 100.0);
        let min_sep = (150.0 + 150.0) / 2.0 + cfg.extra_margin;
        for seed in 0..200 {
            let mut r = ChaCha8Rng::seed_from_u64(seed);
            let moved = push_apart(&stacked, &stacked, bounds, &cfg, &mut r);
            let d = moved.center_distance(&stacked);
            assert!((d - min_sep).abs() < 1e-9, "seed {seed}: distance {d}");
        }
    }

    #[test]
    fn test_single_push_resolve_lands_at_min_separation() {
        let cfg = LayoutConfig::default();
        let bounds = Bounds::new(4000.0, 4000.0);
        let min_sep = (150.0 + 150.0) / 2.0 + cfg.extra_margin;
        let mut one_push = 0;
        for seed in 0..200 {
            let mut cards = vec![card(0, 1925.0, 1950.0), card(1, 1925.0, 1950.0)];
            let outcome = resolve(1, &mut cards, bounds, &cfg, &mut ChaCha8Rng::seed_from_u64(seed));
            let d = cards[1].rect.center_distance(&cards[0].rect);
            assert!(d >= min_sep - 1e-9);
            if outcome == (ResolveOutcome::Settled { moves: 1 }) {
                one_push += 1;
                assert!((d - min_sep).abs() < 1e-9, "seed {seed}: distance {d}");
            }
        }
        assert!(one_push > 0);
    }

    #[test]
    fn test_resolve_writes_through_handle() {
        let cfg = LayoutConfig::default();
        let bounds = Bounds::new(1200.0, 900.0);
        let mut cards = vec![card(0, 500.0, 400.0), card(1, 520.0, 400.0)];
        resolve(1, &mut cards, bounds, &cfg, &mut rng());
        assert_eq!(cards[1].handle.left, cards[1].rect.left);
        assert_eq!(cards[1].handle.top, cards[1].rect.top);
        assert!(cards[1].rect.left > 520.0);
    }

    #[test]
    fn test_corner_overlap_does_not_pull_cards_together() {
        let cfg = LayoutConfig::default();
        let bounds = Bounds::new(1200.0, 900.0);
        let mut cards = vec![card(0, 0.0, 0.0), card(1, 160.0, 100.0)];
        assert!(overlaps(&cards[0].rect, &cards[1].rect, cfg.padding));
        let before = cards[1].rect.center_distance(&cards[0].rect);
        let outcome = resolve(1, &mut cards, bounds, &cfg, &mut rng());
        assert!(matches!(outcome, ResolveOutcome::Settled { .. }));
        assert!(cards[1].rect.center_distance(&cards[0].rect) > before);
        assert!(!overlaps(&cards[0].rect, &cards[1].rect, cfg.padding));
    }

    #[test]
    fn test_crowded_container_exhausts_but_stays_in_bounds() {
        let cfg = LayoutConfig::default();
        let bounds = Bounds::new(150.0, 100.0);
        let mut cards = vec![card(0, 0.0, 0.0), card(1, 0.0, 0.0)];
        let outcome = resolve(1, &mut cards, bounds, &cfg, &mut rng());
        assert_eq!(outcome, ResolveOutcome::Exhausted);
        assert!(bounds.contains(&cards[1].rect));
    }

    #[test]
    fn test_separated_cards_are_left_alone() {
        let cfg = LayoutConfig::default();
        let bounds = Bounds::new(1200.0, 900.0);
        let mut cards = vec![card(0, 0.0, 0.0), card(1, 600.0, 500.0)];
        let report = relax_pass(&mut cards, bounds, &cfg, &mut rng());
        assert_eq!(report, RelaxReport { settled: 2, exhausted: 0, moves: 0 });
        assert_eq!(cards[1].rect.left, 600.0);
    }

    #[test]
    fn test_single_card_relax_is_noop() {
        let cfg = LayoutConfig::default();
        let bounds = Bounds::new(400.0, 300.0);
        let mut cards = vec![card(0, 10.0, 20.0)];
        // Handle drifted (e.g. CSS animation) but a lone card is never touched.
        cards[0].handle.left = 99.0;
        let report = relax_pass(&mut cards, bounds, &cfg, &mut rng());
        assert_eq!(report, RelaxReport::default());
        assert_eq!(cards[0].rect, Rect::new(10.0, 20.0, 150.0, 100.0));
    }

    #[test]
    fn test_relax_refreshes_from_handles_first() {
        let cfg = LayoutConfig::default();
        let bounds = Bounds::new(1200.0, 900.0);
        let mut cards = vec![card(0, 525.0, 400.0), card(1, 0.0, 0.0)];
        // Visual element drifted onto card 0 since the last pass.
        cards[1].handle.set_position(525.0, 400.0);
        let report = relax_pass(&mut cards, bounds, &cfg, &mut rng());
        assert!(report.moves > 0);
        assert!(!overlaps(&cards[0].rect, &cards[1].rect, cfg.padding));
    }

    #[test]
    fn test_out_of_range_index_is_noop() {
        let cfg = LayoutConfig::default();
        let mut cards: Vec<Card<Rect>> = Vec::new();
        let out = resolve(3, &mut cards, Bounds::new(10.0, 10.0), &cfg, &mut rng());
        assert_eq!(out, ResolveOutcome::Settled { moves: 0 });
    }
}
