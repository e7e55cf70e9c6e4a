//! Ties a `CardSession` to its relaxation timer for the length of a round.
//!
//! The timer only holds a weak reference to the session, and every path that
//! closes the round (last card matched, `end_round`, drop) cancels it.

use std::cell::{Ref, RefCell, RefMut};
use std::rc::Rc;

use log::debug;

use crate::card::Card;
use crate::geometry::{Bounds, Measurable};
use crate::session::{CardSession, MatchOutcome};
use crate::timer::{RelaxationTimer, Scheduler};

pub struct RoundDriver<M, S: Scheduler> {
    session: Rc<RefCell<CardSession<M>>>,
    timer: RelaxationTimer<S>,
}

impl<M: Measurable + 'static, S: Scheduler> RoundDriver<M, S> {
    pub fn new(session: CardSession<M>, scheduler: S) -> Self {
        Self { session: Rc::new(RefCell::new(session)), timer: RelaxationTimer::new(scheduler) }
    }

    pub fn session(&self) -> Ref<'_, CardSession<M>> {
        self.session.borrow()
    }

    pub fn session_mut(&self) -> RefMut<'_, CardSession<M>> {
        self.session.borrow_mut()
    }

    /// Run a relax pass every `relax_interval_ms`. `measure` re-reads the
    /// container size before each pass. Restarting replaces the old task.
    pub fn start_relaxation<B>(&mut self, mut measure: B)
    where
        B: FnMut() -> Bounds + 'static,
    {
        let period = self.session.borrow().config().relax_interval_ms;
        let weak = Rc::downgrade(&self.session);
        self.timer.start(
            period,
            Box::new(move || {
                let Some(session) = weak.upgrade() else { return };
                // A tick landing while the host is inside another session call waits for the next one.
                let Ok(mut session) = session.try_borrow_mut() else { return };
                session.set_bounds(measure());
                let report = session.relax();
                if report.exhausted > 0 {
                    debug!("relax pass left {} card(s) overlapping", report.exhausted);
                }
            }),
        );
    }

    /// Idempotent; returns whether a running task was cancelled.
    pub fn stop_relaxation(&mut self) -> bool {
        self.timer.stop()
    }

    pub fn is_relaxing(&self) -> bool {
        self.timer.is_running()
    }

    /// Match typed input; clearing the last card also stops relaxation.
    pub fn match_word(&mut self, input: &str) -> (MatchOutcome, Option<Card<M>>) {
        let result = self.session.borrow_mut().match_word(input);
        if let MatchOutcome::Hit { cleared: true, .. } = result.0 {
            self.timer.stop();
        }
        result
    }

    /// Stop relaxation and close the round, handing back unmatched cards.
    pub fn end_round(&mut self) -> Vec<Card<M>> {
        self.timer.stop();
        self.session.borrow_mut().end_round()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::card::WordData;
    use crate::config::LayoutConfig;
    use crate::geometry::Rect;
    use crate::timer::manual::ManualScheduler;

    const STAGE: Bounds = Bounds { width: 1200.0, height: 900.0 };

    fn driver(sched: &ManualScheduler) -> RoundDriver<Rect, ManualScheduler> {
        let session = CardSession::with_seed(LayoutConfig::default(), STAGE, 9).unwrap();
        RoundDriver::new(session, sched.clone())
    }

    fn stacked(d: &RoundDriver<Rect, ManualScheduler>, words: &[&str]) {
        let mut s = d.session_mut();
        s.start_round(1);
        for w in words {
            s.create_card(&WordData::new(*w, "x"), Rect::new(0.0, 0.0, 150.0, 100.0)).unwrap();
        }
    }

    #[test]
    fn test_tick_relaxes_then_end_round_cancels() {
        let sched = ManualScheduler::default();
        let mut d = driver(&sched);
        stacked(&d, &["pear", "kiwi"]);
        // Pile both handles on the same spot so the tick has work to do.
        for card in d.session_mut().cards_mut() {
            card.handle.set_position(500.0, 400.0);
        }
        d.start_relaxation(|| STAGE);
        assert_eq!(sched.live_tasks(), 1);

        sched.fire();
        let s = d.session();
        let cards = s.cards();
        assert!(!crate::layout::overlaps(&cards[0].rect, &cards[1].rect, s.config().padding));
        drop(s);

        let leftovers = d.end_round();
        assert_eq!(leftovers.len(), 2);
        assert!(!d.is_relaxing());
        assert_eq!(sched.live_tasks(), 0);
    }

    #[test]
    fn test_clearing_last_card_stops_relaxation() {
        let sched = ManualScheduler::default();
        let mut d = driver(&sched);
        stacked(&d, &["pear", "kiwi"]);
        d.start_relaxation(|| STAGE);

        let (hit, card) = d.match_word("pear");
        assert!(matches!(hit, MatchOutcome::Hit { cleared: false, .. }));
        assert_eq!(card.unwrap().word, "pear");
        assert!(d.is_relaxing());

        let (hit, _) = d.match_word("KIWI");
        assert!(matches!(hit, MatchOutcome::Hit { cleared: true, .. }));
        assert!(!d.is_relaxing());
        assert_eq!(sched.live_tasks(), 0);
    }

    #[test]
    fn test_stop_twice_and_end_round_leave_no_task() {
        let sched = ManualScheduler::default();
        let mut d = driver(&sched);
        stacked(&d, &["pear"]);
        d.start_relaxation(|| STAGE);
        assert!(d.stop_relaxation());
        assert!(!d.stop_relaxation());
        assert_eq!(d.end_round().len(), 1);
        assert_eq!(sched.live_tasks(), 0);
    }

    #[test]
    fn test_tick_after_round_end_is_noop() {
        let sched = ManualScheduler::default();
        let mut d = driver(&sched);
        stacked(&d, &["pear", "kiwi"]);
        d.start_relaxation(|| STAGE);
        d.session_mut().end_round();
        // Timer still armed (round closed behind its back) but the pass does nothing.
        sched.fire();
        assert!(d.session().cards().is_empty());
    }

    #[test]
    fn test_dropping_driver_cancels_timer() {
        let sched = ManualScheduler::default();
        {
            let mut d = driver(&sched);
            d.start_relaxation(|| STAGE);
        }
        assert_eq!(sched.live_tasks(), 0);
    }
}
