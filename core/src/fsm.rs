//! The state-machine driver.
//!
//! A flat table of states, each holding an ordered list of
//! `(token_id, next_state, action)` transitions. Lookup is a linear scan
//! over a state's transitions — states are expected to carry a handful of
//! entries, not hundreds, so a `HashMap` per state would cost more than it
//! saves.

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StateTransition {
    pub token_id: u32,
    pub next_state: u32,
    pub action: Option<u32>,
}

#[derive(Debug, Clone, Copy)]
pub struct State {
    pub id: u32,
    pub name: &'static str,
    pub transitions: &'static [StateTransition],
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum FsmError {
    #[error("unexpected token {token_id} in state {state_id} ({state_name})")]
    UnexpectedToken {
        token_id: u32,
        state_id: u32,
        state_name: &'static str,
    },
    #[error("no state registered with id {0}")]
    UnknownState(u32),
}

/// Controls how [`Fsm::step`] reacts to an [`FsmError::UnexpectedToken`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParserMode {
    /// The first unexpected token aborts the parse.
    Strict,
    /// Unexpected tokens are reported but parsing continues by attempting
    /// resynchronization.
    Normal,
    /// Unexpected tokens are silently skipped; the state does not change.
    Lenient,
    /// Like `Normal`, but every transition taken is additionally recorded
    /// for later validation reporting (see `parser.rs`).
    Validation,
}

/// A flat, array-backed transition table.
#[derive(Debug, Clone, Copy)]
pub struct Fsm {
    states: &'static [State],
    start_state: u32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StepOutcome {
    /// The transition table advanced to `next_state`, running `action` if any.
    Advanced { next_state: u32, action: Option<u32> },
    /// `Lenient` mode swallowed an unexpected token; the state is unchanged.
    Skipped,
}

impl Fsm {
    pub const fn new(states: &'static [State], start_state: u32) -> Self {
        Self { states, start_state }
    }

    #[inline]
    pub fn start_state(&self) -> u32 {
        self.start_state
    }

    fn find_state(&self, id: u32) -> Result<&'static State, FsmError> {
        self.states
            .iter()
            .find(|s| s.id == id)
            .ok_or(FsmError::UnknownState(id))
    }

    /// The designated error-recovery token id, always routed through
    /// `ERROR_KIND` lookup before falling back to `UnexpectedToken`.
    fn find_transition(state: &State, token_id: u32) -> Option<&'static StateTransition> {
        state
            .transitions
            .iter()
            .find(|t| t.token_id == token_id)
            .or_else(|| {
                state
                    .transitions
                    .iter()
                    .find(|t| t.token_id == crate::token::ERROR_KIND)
            })
    }

    /// Attempt one transition from `current_state` on `token_id`.
    pub fn step(
        &self,
        current_state: u32,
        token_id: u32,
        mode: ParserMode,
    ) -> Result<StepOutcome, FsmError> {
        let state = self.find_state(current_state)?;
        match Self::find_transition(state, token_id) {
            Some(t) => Ok(StepOutcome::Advanced {
                next_state: t.next_state,
                action: t.action,
            }),
            None => match mode {
                ParserMode::Lenient => Ok(StepOutcome::Skipped),
                _ => Err(FsmError::UnexpectedToken {
                    token_id,
                    state_id: state.id,
                    state_name: state.name,
                }),
            },
        }
    }

    /// Resynchronize after an error: scan `sync_token_ids` against an
    /// externally-driven token stream is the caller's job (it owns the
    /// tokenizer); this just reports the state to resume in.
    pub fn resync_state(&self, resync_state_id: u32) -> Result<u32, FsmError> {
        self.find_state(resync_state_id)?;
        Ok(resync_state_id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::token::ERROR_KIND;

    const T_START: &[StateTransition] = &[
        StateTransition { token_id: 1, next_state: 1, action: Some(10) },
    ];
    const T_BODY: &[StateTransition] = &[
        StateTransition { token_id: 2, next_state: 1, action: None },
        StateTransition { token_id: 3, next_state: 2, action: Some(20) },
        StateTransition { token_id: ERROR_KIND, next_state: 1, action: Some(99) },
    ];
    const T_DONE: &[StateTransition] = &[];

    const STATES: &[State] = &[
        State { id: 0, name: "start", transitions: T_START },
        State { id: 1, name: "body", transitions: T_BODY },
        State { id: 2, name: "done", transitions: T_DONE },
    ];

    #[test]
    fn advances_on_known_transition() {
        let fsm = Fsm::new(STATES, 0);
        let out = fsm.step(0, 1, ParserMode::Strict).unwrap();
        assert_eq!(out, StepOutcome::Advanced { next_state: 1, action: Some(10) });
    }

    #[test]
    fn strict_mode_errors_on_unexpected_token() {
        let fsm = Fsm::new(STATES, 0);
        let err = fsm.step(0, 99, ParserMode::Strict).unwrap_err();
        assert!(matches!(err, FsmError::UnexpectedToken { token_id: 99, state_id: 0, .. }));
    }

    #[test]
    fn lenient_mode_skips_unexpected_token() {
        let fsm = Fsm::new(STATES, 0);
        let out = fsm.step(0, 99, ParserMode::Lenient).unwrap();
        assert_eq!(out, StepOutcome::Skipped);
    }

    #[test]
    fn error_kind_fallback_transition_is_used_before_unexpected() {
        let fsm = Fsm::new(STATES, 0);
        // token 77 has no explicit transition in `body`, but ERROR_KIND does.
        let out = fsm.step(1, 77, ParserMode::Normal).unwrap();
        assert_eq!(out, StepOutcome::Advanced { next_state: 1, action: Some(99) });
    }

    #[test]
    fn unknown_state_is_an_error() {
        let fsm = Fsm::new(STATES, 0);
        assert!(matches!(fsm.step(42, 1, ParserMode::Strict), Err(FsmError::UnknownState(42))));
    }

    #[test]
    fn resync_validates_target_state_exists() {
        let fsm = Fsm::new(STATES, 0);
        assert_eq!(fsm.resync_state(2).unwrap(), 2);
        assert!(matches!(fsm.resync_state(42), Err(FsmError::UnknownState(42))));
    }
}
