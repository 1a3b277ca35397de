use crate::model::{GameState, HoleState, Phase};
use log::debug;
use std::sync::Arc;

#[derive(Clone, Debug, PartialEq, Eq)]
pub(crate) enum Action {
    StartGame,
    AlterHoles(HoleState),
    ScorePoint,
    EndGame,
}

/// Pure transition. Returns the input snapshot itself when the action does not
/// apply, so callers can detect no-ops with `Arc::ptr_eq`.
pub(crate) fn reduce(state: &Arc<GameState>, action: &Action) -> Arc<GameState> {
    match action {
        Action::StartGame => Arc::new(GameState {
            phase: Phase::InProgress,
            holes: state.holes.clone(),
            score: 0,
        }),
        Action::AlterHoles(holes) => {
            // board size is fixed for the life of the store
            if holes.len() != state.holes.len() {
                return Arc::clone(state);
            }
            Arc::new(GameState {
                holes: holes.clone(),
                ..(**state).clone()
            })
        }
        Action::ScorePoint if state.phase == Phase::InProgress => Arc::new(GameState {
            score: state.score.saturating_add(1),
            ..(**state).clone()
        }),
        Action::EndGame if state.phase == Phase::InProgress => Arc::new(GameState {
            phase: Phase::Over,
            ..(**state).clone()
        }),
        Action::ScorePoint | Action::EndGame => Arc::clone(state),
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) struct SubscriptionId(u64);

type Listener = Box<dyn FnMut(&GameState)>;

pub(crate) struct Store {
    state: Arc<GameState>,
    listeners: Vec<(SubscriptionId, Listener)>,
    next_sub: u64,
}

impl Store {
    pub(crate) fn new(initial: GameState) -> Self {
        Self {
            state: Arc::new(initial),
            listeners: Vec::new(),
            next_sub: 0,
        }
    }

    pub(crate) fn get_state(&self) -> Arc<GameState> {
        Arc::clone(&self.state)
    }

    pub(crate) fn dispatch(&mut self, action: Action) {
        let next = reduce(&self.state, &action);
        if Arc::ptr_eq(&next, &self.state) {
            debug!("{:?} ignored in {:?}", action, self.state.phase);
            return;
        }
        debug!("{:?}: {:?} -> {:?}", action, self.state, next);
        self.state = next;

        for (_, listener) in self.listeners.iter_mut() {
            listener(&*self.state);
        }
    }

    pub(crate) fn subscribe<F>(&mut self, listener: F) -> SubscriptionId
    where
        F: FnMut(&GameState) + 'static,
    {
        let id = SubscriptionId(self.next_sub);
        self.next_sub += 1;
        self.listeners.push((id, Box::new(listener)));
        id
    }

    pub(crate) fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        let before = self.listeners.len();
        self.listeners.retain(|(sid, _)| *sid != id);
        self.listeners.len() != before
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;
    use std::rc::Rc;

    fn idle() -> Arc<GameState> {
        Arc::new(GameState::new(5))
    }

    #[test]
    fn start_sets_in_progress_and_keeps_holes() {
        let mut st = GameState::new(5);
        st.holes[1] = true;
        st.score = 4;
        let st = Arc::new(st);

        let next = reduce(&st, &Action::StartGame);
        assert_eq!(next.phase, Phase::InProgress);
        assert_eq!(next.holes, vec![false, true, false, false, false]);
        assert_eq!(next.score, 0);
        assert!(!Arc::ptr_eq(&st, &next));
    }

    #[test]
    fn alter_holes_replaces_whole_board() {
        let st = idle();
        let next = reduce(&st, &Action::AlterHoles(vec![true, false, true, false, true]));
        assert_eq!(next.holes, vec![true, false, true, false, true]);
        assert_eq!(next.phase, Phase::NotStarted);
        // previous snapshot untouched
        assert_eq!(st.holes, vec![false; 5]);
    }

    #[test]
    fn alter_holes_with_wrong_length_is_identity() {
        let st = idle();
        let next = reduce(&st, &Action::AlterHoles(vec![true; 7]));
        assert!(Arc::ptr_eq(&st, &next));
    }

    #[test]
    fn inapplicable_actions_are_identity() {
        let st = idle();
        assert!(Arc::ptr_eq(&st, &reduce(&st, &Action::EndGame)));
        assert!(Arc::ptr_eq(&st, &reduce(&st, &Action::ScorePoint)));

        let over = Arc::new(GameState {
            phase: Phase::Over,
            ..GameState::new(5)
        });
        assert!(Arc::ptr_eq(&over, &reduce(&over, &Action::EndGame)));
        assert!(Arc::ptr_eq(&over, &reduce(&over, &Action::ScorePoint)));
    }

    #[test]
    fn end_game_only_from_in_progress() {
        let running = reduce(&idle(), &Action::StartGame);
        let over = reduce(&running, &Action::EndGame);
        assert_eq!(over.phase, Phase::Over);

        let again = reduce(&over, &Action::StartGame);
        assert_eq!(again.phase, Phase::InProgress);
    }

    #[test]
    fn score_point_counts_during_round() {
        let running = reduce(&idle(), &Action::StartGame);
        let scored = reduce(&running, &Action::ScorePoint);
        let scored = reduce(&scored, &Action::ScorePoint);
        assert_eq!(scored.score, 2);
    }

    #[test]
    fn dispatched_holes_are_a_copy() {
        let mut store = Store::new(GameState::new(5));
        let mut buf = vec![false, false, true, false, false];
        store.dispatch(Action::AlterHoles(buf.clone()));
        buf[0] = true;

        assert_eq!(store.get_state().holes, vec![false, false, true, false, false]);
    }

    #[test]
    fn listeners_fire_only_on_effective_transitions() {
        let mut store = Store::new(GameState::new(5));
        let seen = Rc::new(RefCell::new(Vec::new()));
        let sink = Rc::clone(&seen);
        store.subscribe(move |st| sink.borrow_mut().push(st.phase));

        store.dispatch(Action::EndGame);
        store.dispatch(Action::StartGame);
        store.dispatch(Action::EndGame);
        store.dispatch(Action::EndGame);

        assert_eq!(*seen.borrow(), vec![Phase::InProgress, Phase::Over]);
    }

    #[test]
    fn unsubscribe_stops_notifications() {
        let mut store = Store::new(GameState::new(5));
        let calls = Rc::new(RefCell::new(0u32));
        let c = Rc::clone(&calls);
        let id = store.subscribe(move |_| *c.borrow_mut() += 1);

        store.dispatch(Action::StartGame);
        assert!(store.unsubscribe(id));
        assert!(!store.unsubscribe(id));
        store.dispatch(Action::EndGame);

        assert_eq!(*calls.borrow(), 1);
    }

    #[test]
    fn get_state_snapshot_survives_later_dispatch() {
        let mut store = Store::new(GameState::new(5));
        let before = store.get_state();
        store.dispatch(Action::StartGame);

        assert_eq!(before.phase, Phase::NotStarted);
        assert_eq!(store.get_state().phase, Phase::InProgress);
    }
}
