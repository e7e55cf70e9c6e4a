//! Round session: owns the active cards, container bounds, RNG and score for
//! one falling-cards round. Created at round start, cleared at round end.

use log::{info, warn};
use rand::SeedableRng;
use rand::seq::SliceRandom;
use rand_chacha::ChaCha8Rng;

use crate::card::{Card, CardId, GameMode, WordData};
use crate::config::LayoutConfig;
use crate::error::LayoutError;
use crate::geometry::{Bounds, Measurable};
use crate::layout::{self, RelaxReport};

/// Result of checking typed input against the board.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum MatchOutcome {
    /// Card removed; `cleared` is set when it was the last one of the round.
    Hit { id: CardId, word: String, cleared: bool },
    Miss,
    /// Blank input, nothing scored.
    Ignored,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct RoundStats {
    pub level: u32,
    pub score: u32,
    /// Cards still to be matched this round.
    pub remaining: usize,
}

pub struct CardSession<M> {
    config: LayoutConfig,
    bounds: Bounds,
    mode: GameMode,
    cards: Vec<Card<M>>,
    rng: ChaCha8Rng,
    next_id: u32,
    active: bool,
    stats: RoundStats,
}

impl<M: Measurable> CardSession<M> {
    /// Session seeded from OS / browser entropy.
    pub fn new(config: LayoutConfig, bounds: Bounds) -> Result<Self, LayoutError> {
        Self::with_rng(config, bounds, ChaCha8Rng::from_entropy())
    }

    /// Deterministic session (replays, tests).
    pub fn with_seed(config: LayoutConfig, bounds: Bounds, seed: u64) -> Result<Self, LayoutError> {
        Self::with_rng(config, bounds, ChaCha8Rng::seed_from_u64(seed))
    }

    fn with_rng(config: LayoutConfig, bounds: Bounds, rng: ChaCha8Rng) -> Result<Self, LayoutError> {
        config.validate()?;
        Ok(Self {
            config,
            bounds,
            mode: GameMode::default(),
            cards: Vec::new(),
            rng,
            next_id: 0,
            active: false,
            stats: RoundStats::default(),
        })
    }

    pub fn config(&self) -> &LayoutConfig {
        &self.config
    }

    pub fn bounds(&self) -> Bounds {
        self.bounds
    }

    /// Container size is re-read by the host on resize.
    pub fn set_bounds(&mut self, bounds: Bounds) {
        self.bounds = bounds;
    }

    pub fn mode(&self) -> GameMode {
        self.mode
    }

    pub fn set_mode(&mut self, mode: GameMode) {
        self.mode = mode;
    }

    pub fn cards(&self) -> &[Card<M>] {
        &self.cards
    }

    pub fn cards_mut(&mut self) -> &mut [Card<M>] {
        &mut self.cards
    }

    pub fn card(&self, id: CardId) -> Option<&Card<M>> {
        self.cards.iter().find(|c| c.id == id)
    }

    pub fn stats(&self) -> RoundStats {
        self.stats
    }

    pub fn is_active(&self) -> bool {
        self.active
    }

    /// Open a round at `level`. Any cards left from a previous round are dropped.
    pub fn start_round(&mut self, level: u32) {
        self.cards.clear();
        let level = level.clamp(1, self.config.max_levels);
        self.stats = RoundStats { level, score: 0, remaining: 0 };
        self.active = true;
        info!("round started at level {level}");
    }

    /// Shuffle `words`, take as many as the round's level calls for and
    /// create a card for each. `make_handle` builds the visual for a word.
    /// All or nothing: on error no card from this call stays on the board.
    pub fn deal<F>(&mut self, words: &[WordData], mut make_handle: F) -> Result<Vec<CardId>, LayoutError>
    where
        F: FnMut(&WordData, GameMode) -> Result<M, LayoutError>,
    {
        let count = self.config.cards_for_level(self.stats.level);
        let mut picked: Vec<&WordData> = words.iter().collect();
        picked.shuffle(&mut self.rng);
        picked.truncate(count);
        if picked.len() < count {
            warn!("only {} words available for {} cards", picked.len(), count);
        }
        for word in &picked {
            word.tier()?;
        }
        let dealt_before = self.cards.len();
        let mut ids = Vec::with_capacity(picked.len());
        for word in picked {
            let created = make_handle(word, self.mode).and_then(|handle| self.create_card(word, handle));
            match created {
                Ok(id) => ids.push(id),
                Err(err) => {
                    warn!("deal aborted on '{}': {err}", word.word);
                    self.cards.truncate(dealt_before);
                    self.stats.remaining = self.stats.remaining.saturating_sub(ids.len());
                    return Err(err);
                }
            }
        }
        Ok(ids)
    }

    /// Place a new card at a random spot and register it as active.
    pub fn create_card(&mut self, word: &WordData, mut handle: M) -> Result<CardId, LayoutError> {
        let difficulty = word.tier()?;
        let rect = layout::place(
            self.config.card_width,
            self.config.card_height,
            self.bounds,
            &mut self.rng,
        );
        handle.set_position(rect.left, rect.top);
        let id = CardId(self.next_id);
        self.next_id = self.next_id.wrapping_add(1);
        self.cards.push(Card {
            id,
            word: word.word.trim().to_lowercase(),
            translation: word.translation.clone(),
            difficulty,
            rect,
            handle,
        });
        self.stats.remaining += 1;
        Ok(id)
    }

    /// Compare typed input with the active cards and update the score.
    /// The removed card is returned to the caller so its visual can be retired.
    pub fn match_word(&mut self, input: &str) -> (MatchOutcome, Option<Card<M>>) {
        let typed = input.trim().to_lowercase();
        if typed.is_empty() {
            return (MatchOutcome::Ignored, None);
        }
        match self.cards.iter().position(|c| c.word == typed) {
            Some(idx) => {
                let card = self.cards.remove(idx);
                self.stats.score += self.config.hit_points;
                self.stats.remaining = self.stats.remaining.saturating_sub(1);
                let cleared = self.stats.remaining == 0;
                if cleared {
                    info!("level {} cleared with score {}", self.stats.level, self.stats.score);
                }
                let outcome = MatchOutcome::Hit { id: card.id, word: card.word.clone(), cleared };
                (outcome, Some(card))
            }
            None => {
                self.stats.score = self.stats.score.saturating_sub(self.config.miss_penalty);
                (MatchOutcome::Miss, None)
            }
        }
    }

    /// Resolve overlaps for one card.
    pub fn resolve(&mut self, index: usize) -> layout::ResolveOutcome {
        layout::resolve(index, &mut self.cards, self.bounds, &self.config, &mut self.rng)
    }

    /// Periodic re-stabilisation; no-op outside an active round.
    pub fn relax(&mut self) -> RelaxReport {
        if !self.active {
            return RelaxReport::default();
        }
        layout::relax_pass(&mut self.cards, self.bounds, &self.config, &mut self.rng)
    }

    /// Close the round and hand back the remaining cards for teardown.
    pub fn end_round(&mut self) -> Vec<Card<M>> {
        if self.active {
            info!("round ended at level {} with score {}", self.stats.level, self.stats.score);
        }
        self.active = false;
        self.stats.remaining = 0;
        std::mem::take(&mut self.cards)
    }
}
