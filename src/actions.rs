use crate::config::Rules;
use crate::error::GameError;
use crate::model::{GameState, HoleState, Phase};
use crate::random::HolePicker;
use crate::store::{Action, Store};
use crate::timer::{TimerId, TimerQueue};
use log::{debug, info, warn};
use std::sync::Arc;
use std::time::Duration;

/// Deferred work the controller schedules for itself.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum Timer {
    /// Put a frog back up somewhere after a whack.
    Respawn,
    /// End of the round.
    RoundOver,
}

/// Turns player intents and due timers into store actions.
///
/// All times are offsets from an epoch chosen by the caller; the controller
/// never reads a clock itself, so tests can drive it with virtual time.
pub(crate) struct Game<P: HolePicker> {
    store: Store,
    timers: TimerQueue<Timer>,
    round_timer: Option<TimerId>,
    picker: P,
    rules: Rules,
}

impl<P: HolePicker> Game<P> {
    pub(crate) fn new(rules: Rules, picker: P) -> Self {
        Self {
            store: Store::new(GameState::new(rules.hole_count)),
            timers: TimerQueue::new(),
            round_timer: None,
            picker,
            rules,
        }
    }

    pub(crate) fn state(&self) -> Arc<GameState> {
        self.store.get_state()
    }

    pub(crate) fn store_mut(&mut self) -> &mut Store {
        &mut self.store
    }

    pub(crate) fn hole_count(&self) -> usize {
        self.rules.hole_count
    }

    pub(crate) fn request_start(&mut self, now: Duration) {
        // a restart supersedes whatever the previous round left pending
        if let Some(id) = self.round_timer.take() {
            if self.timers.cancel(id) {
                debug!("restart cancelled the running round timer");
            }
        }
        self.timers.cancel_where(|t| *t == Timer::Respawn);

        self.store.dispatch(Action::StartGame);
        let holes = self.with_random_frog();
        self.store.dispatch(Action::AlterHoles(holes));
        debug!("{} frogs up", self.store.get_state().active_count());

        self.round_timer = Some(self.timers.schedule_after(
            now,
            self.rules.round_duration,
            Timer::RoundOver,
        ));
        info!(
            "round started at {:?}, ends in {:?}",
            now, self.rules.round_duration
        );
    }

    pub(crate) fn request_frog_click(&mut self, hole: usize, now: Duration) -> Result<(), GameError> {
        let state = self.store.get_state();
        if hole >= state.hole_count() {
            warn!("rejected click on hole {}", hole);
            return Err(GameError::InvalidHoleId {
                id: hole,
                hole_count: state.hole_count(),
            });
        }

        if state.phase == Phase::InProgress && state.holes[hole] {
            self.store.dispatch(Action::ScorePoint);
        }

        let mut holes = state.holes.clone();
        holes[hole] = false;
        self.store.dispatch(Action::AlterHoles(holes));

        self.timers
            .schedule_after(now, self.rules.respawn_delay, Timer::Respawn);
        Ok(())
    }

    /// Fires every timer due at `now`, earliest first.
    pub(crate) fn advance(&mut self, now: Duration) {
        while let Some(timer) = self.timers.pop_due(now) {
            match timer {
                Timer::Respawn => self.respawn(),
                Timer::RoundOver => {
                    self.round_timer = None;
                    self.timers.cancel_where(|t| *t == Timer::Respawn);
                    self.store.dispatch(Action::EndGame);
                    info!("round over, score {}", self.store.get_state().score);
                }
            }
        }
    }

    /// Remaining round time, `None` unless a round is running.
    pub(crate) fn time_left(&self, now: Duration) -> Option<Duration> {
        if self.store.get_state().phase != Phase::InProgress {
            return None;
        }
        self.timers
            .deadline_of(|t| *t == Timer::RoundOver)
            .map(|d| d.saturating_sub(now))
    }

    pub(crate) fn pending_timers(&self) -> usize {
        self.timers.len()
    }

    pub(crate) fn shutdown(&mut self) {
        self.round_timer = None;
        self.timers.clear();
    }

    fn respawn(&mut self) {
        if self.store.get_state().phase != Phase::InProgress {
            debug!("respawn dropped outside a round");
            return;
        }
        let holes = self.with_random_frog();
        self.store.dispatch(Action::AlterHoles(holes));
    }

    fn with_random_frog(&mut self) -> HoleState {
        let mut holes = self.store.get_state().holes.clone();
        let i = self.picker.random_int(0, holes.len());
        holes[i] = true;
        holes
    }
}
