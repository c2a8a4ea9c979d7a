use jobpulse_core::{update, AppState, Msg};

#[test]
fn noop_leaves_state_untouched() {
    let state = AppState::new();
    let (next, effects) = update(state.clone(), Msg::NoOp);

    assert_eq!(state, next);
    assert!(effects.is_empty());
}

#[test]
fn status_clear_with_unknown_token_is_noop() {
    let state = AppState::new();
    let (next, effects) = update(state.clone(), Msg::StatusClearElapsed { token: 42 });

    assert_eq!(state, next);
    assert!(effects.is_empty());
}
