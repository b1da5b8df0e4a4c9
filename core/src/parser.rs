//! Parser orchestration: wires the buffer, pattern set, FSM, action/event
//! handlers, and error aggregator together behind a push-based incremental
//! API, plus a `parse_str` convenience for whole-input callers who don't
//! need to feed bytes in chunks.
//!
//! The incremental API's vocabulary — [`ParseState`] and [`ParseCheckpoint`]
//! — reports what a cooperative, non-blocking parse step did, driven
//! synchronously: callers `push` bytes as they arrive and `finish` once the
//! source is exhausted, with no internal thread or task of its own.

use crate::aggregator::{Aggregator, ErrorGroup};
use crate::buffer::IncrementalBuffer;
use crate::config::ParserConfig;
use crate::context::ParserContext;
use crate::error::{Error, ErrorCode, ErrorContext, Severity};
use crate::events::Event;
use crate::fsm::{Fsm, FsmError, ParserMode, StepOutcome};
use crate::memstream::NamedPattern;
use crate::pattern::match_pattern;
use crate::position::Position;
use crate::token::{Token, ERROR_KIND};

/// The outcome of one `push`/`finish` step.
#[derive(Debug, Clone, PartialEq)]
pub enum ParseState {
    /// All buffered bytes were consumed with no ambiguity remaining; the
    /// caller should `push` more bytes or call `finish`.
    NeedMore,
    /// `finish` was called and every buffered byte was consumed cleanly.
    Complete,
    /// The error budget (`ParserConfig::max_errors`) was reached, or
    /// `ParserMode::Strict` hit its first unexpected token. Parsing has
    /// stopped; `Parser::errors()` holds the full detail.
    Halted,
}

/// A resumable position in a parse: the FSM state and buffer position at
/// the moment it was captured, enough to resume a parse from a snapshot
/// without re-scanning already-consumed bytes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ParseCheckpoint {
    pub fsm_state: u32,
    pub position: Position,
}

/// A semantic action run between FSM transition selection and event
/// dispatch: may mutate the shared context and, through the passed emit
/// sink, push events of its own ahead of whatever the driver emits for the
/// token itself.
pub type ActionFn =
    dyn FnMut(&mut ParserContext, &Token<'_>, u32, &mut dyn FnMut(Event<'_>)) -> Result<(), ErrorContext>;

/// The single registered event handler every emitted [`Event`] funnels
/// through, mirroring the FFI contract's one-function dispatch shape.
pub type EventFn = dyn FnMut(Event<'_>);

fn default_event_handler(_event: Event<'_>) {}

/// Drives an [`Fsm`] over a pattern-matched token stream fed incrementally
/// via `push`, invoking an optional action handler and a required event
/// handler per token, and reporting errors through [`ErrorContext`] rather
/// than aborting eagerly (except under [`ParserMode::Strict`]).
pub struct Parser {
    buffer: IncrementalBuffer,
    patterns: &'static [NamedPattern],
    skip_set: &'static [u32],
    fsm: Fsm,
    state: u32,
    config: ParserConfig,
    context: ParserContext,
    errors: Vec<ErrorContext>,
    finished: bool,
    action_handler: Option<Box<ActionFn>>,
    event_handler: Box<EventFn>,
    resync_state_id: u32,
    resyncing: bool,
    started: bool,
    ended: bool,
    fatal: bool,
}

impl Parser {
    pub fn new(
        patterns: &'static [NamedPattern],
        skip_set: &'static [u32],
        fsm: Fsm,
        config: ParserConfig,
    ) -> Result<Self, Error> {
        for np in patterns {
            np.pattern.validate()?;
        }
        let start = fsm.start_state();
        let resync_state_id = match config.resync_state_id {
            Some(id) => fsm.resync_state(id)?,
            None => start,
        };
        Ok(Self {
            buffer: IncrementalBuffer::streaming(config.buffer_initial, config.buffer_max, config.compact_threshold),
            patterns,
            skip_set,
            fsm,
            state: start,
            config,
            context: ParserContext::new(),
            errors: Vec::new(),
            finished: false,
            action_handler: None,
            event_handler: Box::new(default_event_handler),
            resync_state_id,
            resyncing: false,
            started: false,
            ended: false,
            fatal: false,
        })
    }

    /// Registers the action run between transition selection and event
    /// dispatch for every token. Replaces any previously registered action.
    pub fn with_action_handler(
        mut self,
        handler: impl FnMut(&mut ParserContext, &Token<'_>, u32, &mut dyn FnMut(Event<'_>)) -> Result<(), ErrorContext>
            + 'static,
    ) -> Self {
        self.action_handler = Some(Box::new(handler));
        self
    }

    /// Registers the single callback every [`Event`] is dispatched through.
    /// Replaces any previously registered handler (the default is a no-op).
    pub fn with_event_handler(mut self, handler: impl FnMut(Event<'_>) + 'static) -> Self {
        self.event_handler = Box::new(handler);
        self
    }

    pub fn context(&self) -> &ParserContext {
        &self.context
    }

    pub fn context_mut(&mut self) -> &mut ParserContext {
        &mut self.context
    }

    pub fn errors(&self) -> &[ErrorContext] {
        &self.errors
    }

    /// Groups `errors()` into cascades.
    pub fn error_groups(&self) -> Vec<ErrorGroup> {
        Aggregator::new().group(self.errors.clone())
    }

    pub fn checkpoint(&self) -> ParseCheckpoint {
        ParseCheckpoint {
            fsm_state: self.state,
            position: self.buffer.position(),
        }
    }

    fn is_skip(&self, kind: u32) -> bool {
        self.skip_set.contains(&kind)
    }

    fn is_sync(&self, kind: u32) -> bool {
        self.config.sync_token_ids.contains(&kind)
    }

    fn budget_exhausted(&self) -> bool {
        matches!(self.config.max_errors, Some(max) if self.errors.len() >= max)
    }

    /// Feed more input. Returns the parse's state after consuming as much of
    /// the combined buffered input as can be resolved unambiguously.
    pub fn push(&mut self, bytes: &[u8]) -> Result<ParseState, Error> {
        self.buffer.append(bytes)?;
        self.drive()
    }

    /// Signal end of input; any bytes still buffered are resolved without
    /// the "might still extend" ambiguity that held them back under `push`.
    pub fn finish(&mut self) -> Result<ParseState, Error> {
        self.finished = true;
        self.drive()
    }

    fn scan_one(&self) -> Option<(u32, usize)> {
        let live = self.buffer.live();
        for np in self.patterns {
            let r = match_pattern(np.pattern, live, 0);
            if r.matched && r.len > 0 {
                return Some((np.id, r.len));
            }
        }
        None
    }

    /// Records an error, emits its corresponding `error` event, and fatal
    /// (IO/internal) severities suppress the eventual `end_document`.
    fn record_error(&mut self, ctx: ErrorContext) {
        if ctx.severity == Severity::Fatal {
            self.fatal = true;
        }
        (self.event_handler)(Event::Error {
            code: ctx.code,
            message: ctx.message.clone(),
            position: ctx.position,
        });
        self.errors.push(ctx);
    }

    /// Emits `start_document` exactly once, on the first token or the first
    /// `finish` of an otherwise-empty input.
    fn ensure_started(&mut self) {
        if !self.started {
            self.started = true;
            (self.event_handler)(Event::StartDocument);
        }
    }

    /// Emits `end_document` exactly once, unless a fatal error already
    /// suppressed it.
    fn finish_document(&mut self) {
        self.ensure_started();
        if !self.ended && !self.fatal {
            self.ended = true;
            (self.event_handler)(Event::EndDocument);
        }
    }

    fn drive(&mut self) -> Result<ParseState, Error> {
        loop {
            if self.budget_exhausted() || self.fatal {
                self.finish_document();
                return Ok(ParseState::Halted);
            }

            let live_len = self.buffer.live_len();
            if live_len == 0 {
                if self.finished {
                    self.finish_document();
                    return Ok(ParseState::Complete);
                }
                self.ensure_started();
                return Ok(ParseState::NeedMore);
            }

            match self.scan_one() {
                Some((kind, len)) if len < live_len || self.finished => {
                    let start_position = self.buffer.position();
                    let token_start = self.buffer.live_start_index();
                    self.buffer.consume_n(len);

                    if self.is_skip(kind) {
                        continue;
                    }
                    self.ensure_started();

                    if self.resyncing {
                        if self.is_sync(kind) {
                            self.resyncing = false;
                            self.state = self.resync_state_id;
                        }
                        continue;
                    }

                    // Copied out of the buffer (rather than borrowed) so this
                    // call can take `&mut self` without aliasing `self.buffer`.
                    let owned_text = self.buffer.raw()[token_start..token_start + len].to_vec();
                    let token = Token::new(kind, &owned_text, start_position);
                    if self.apply_token(&token)? {
                        self.finish_document();
                        return Ok(ParseState::Halted);
                    }
                }
                Some(_) => {
                    // The match reached exactly to the end of buffered
                    // input; more bytes could still extend it.
                    self.ensure_started();
                    return Ok(ParseState::NeedMore);
                }
                None if live_len > 0 => {
                    self.ensure_started();
                    let position = self.buffer.position();
                    self.buffer.consume_n(1);
                    self.record_error(
                        ErrorContext::new(
                            ErrorCode::UnrecognizedByte,
                            Severity::Error,
                            position,
                            "no pattern matched at this position",
                        )
                        .with_recovery_hint("skipped one byte to regain forward progress"),
                    );
                    if self.config.mode == ParserMode::Strict {
                        self.finish_document();
                        return Ok(ParseState::Halted);
                    }
                }
                None => unreachable!("live_len == 0 handled above"),
            }
        }
    }

    /// Drives one token through the FSM: selects the transition, runs the
    /// registered action (if any), then records any error the transition or
    /// the action raised. Returns `Ok(true)` when the parse should halt (an
    /// unexpected token under [`ParserMode::Strict`], or a fatal action
    /// error); a non-strict unexpected token enters synchronize-recovery
    /// instead of halting.
    fn apply_token(&mut self, token: &Token<'_>) -> Result<bool, Error> {
        match self.fsm.step(self.state, token.kind, self.config.mode) {
            Ok(StepOutcome::Advanced { next_state, action }) => {
                self.state = next_state;
                if let Some(action_id) = action {
                    if self.config.mode != ParserMode::Validation {
                        self.run_action(token, action_id);
                    }
                }
                Ok(false)
            }
            Ok(StepOutcome::Skipped) => Ok(false),
            Err(FsmError::UnexpectedToken { token_id, state_id, state_name }) => {
                self.record_error(
                    ErrorContext::new(
                        ErrorCode::UnexpectedToken,
                        Severity::Error,
                        token.position,
                        format!("unexpected token {token_id} in state '{state_name}'"),
                    )
                    .with_state_id(state_id),
                );
                if self.config.mode == ParserMode::Strict {
                    return Ok(true);
                }
                if !self.config.sync_token_ids.is_empty() {
                    self.resyncing = true;
                } else {
                    self.state = self.resync_state_id;
                }
                Ok(false)
            }
            Err(other) => Err(other.into()),
        }
    }

    /// Runs the registered action handler, if any, passing it disjoint
    /// borrows of the context, this token, and an emit sink wired straight
    /// to `self.event_handler`. The handler is taken out of `self` for the
    /// duration of the call, so `self.context` and `self.event_handler` can
    /// both be reborrowed mutably without aliasing `self.action_handler`.
    fn run_action(&mut self, token: &Token<'_>, action_id: u32) {
        let Some(mut handler) = self.action_handler.take() else {
            return;
        };
        let event_handler = &mut self.event_handler;
        let mut emit = move |event: Event<'_>| event_handler(event);
        let result = handler(&mut self.context, token, action_id, &mut emit);
        self.action_handler = Some(handler);
        if let Err(ctx) = result {
            self.record_error(ctx);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::charclass::CharClass;
    use crate::context::Value;
    use crate::fsm::{State, StateTransition};
    use crate::pattern::{ClassSpec, Pattern};
    use std::cell::RefCell;
    use std::rc::Rc;

    const NUM: Pattern = Pattern::one_or_more(&Pattern::Class(ClassSpec::Exact(CharClass::Digit)));
    const PLUS: Pattern = Pattern::Literal(b"+");
    const WS: Pattern = Pattern::one_or_more(&Pattern::Class(ClassSpec::Exact(CharClass::Whitespace)));

    const PATTERNS: &[NamedPattern] = &[
        NamedPattern { id: 1, name: "num", pattern: &NUM },
        NamedPattern { id: 2, name: "plus", pattern: &PLUS },
        NamedPattern { id: 3, name: "ws", pattern: &WS },
    ];
    const SKIP: &[u32] = &[3];

    const START_T: &[StateTransition] = &[StateTransition { token_id: 1, next_state: 1, action: Some(1) }];
    const AFTER_NUM_T: &[StateTransition] = &[
        StateTransition { token_id: 2, next_state: 0, action: Some(2) },
        StateTransition { token_id: 1, next_state: 1, action: Some(1) },
    ];
    const STATES: &[State] = &[
        State { id: 0, name: "start", transitions: START_T },
        State { id: 1, name: "after_num", transitions: AFTER_NUM_T },
    ];

    fn make_parser(mode: ParserMode) -> Parser {
        let fsm = Fsm::new(STATES, 0);
        let config = ParserConfig::new().with_mode(mode);
        Parser::new(PATTERNS, SKIP, fsm, config).unwrap()
    }

    #[test]
    fn push_then_finish_drives_to_complete_on_valid_input() {
        let mut parser = make_parser(ParserMode::Normal);
        assert_eq!(parser.push(b"12 + 34").unwrap(), ParseState::NeedMore);
        assert_eq!(parser.finish().unwrap(), ParseState::Complete);
        assert!(parser.errors().is_empty());
    }

    #[test]
    fn trailing_digit_run_waits_for_more_input_before_committing() {
        let mut parser = make_parser(ParserMode::Normal);
        // "12" could still be "123" if more bytes arrive.
        assert_eq!(parser.push(b"12").unwrap(), ParseState::NeedMore);
        assert_eq!(parser.checkpoint().position.offset, 0);
        assert_eq!(parser.finish().unwrap(), ParseState::Complete);
        assert_eq!(parser.checkpoint().position.offset, 2);
    }

    #[test]
    fn unrecognized_byte_is_reported_and_skipped_in_normal_mode() {
        let mut parser = make_parser(ParserMode::Normal);
        parser.push(b"12 @ 34").unwrap();
        assert_eq!(parser.finish().unwrap(), ParseState::Complete);
        assert_eq!(parser.errors().len(), 1);
        assert_eq!(parser.errors()[0].code, ErrorCode::UnrecognizedByte);
    }

    #[test]
    fn strict_mode_halts_on_first_unexpected_byte() {
        let mut parser = make_parser(ParserMode::Strict);
        let state = parser.push(b"@@@").unwrap();
        assert_eq!(state, ParseState::Halted);
        assert_eq!(parser.errors().len(), 1);
    }

    #[test]
    fn error_budget_halts_parsing_once_reached() {
        let fsm = Fsm::new(STATES, 0);
        let config = ParserConfig::new().with_mode(ParserMode::Normal).with_max_errors(Some(2));
        let mut parser = Parser::new(PATTERNS, SKIP, fsm, config).unwrap();
        let state = parser.push(b"@ @ @ @").unwrap();
        assert_eq!(state, ParseState::Halted);
        assert_eq!(parser.errors().len(), 2);
    }

    #[test]
    fn start_and_end_document_bracket_every_other_event() {
        let events = Rc::new(RefCell::new(Vec::new()));
        let log = events.clone();
        let fsm = Fsm::new(STATES, 0);
        let config = ParserConfig::new().with_mode(ParserMode::Normal);
        let mut parser = Parser::new(PATTERNS, SKIP, fsm, config)
            .unwrap()
            .with_event_handler(move |event| log.borrow_mut().push(format!("{event:?}")));

        parser.push(b"12 + 34").unwrap();
        parser.finish().unwrap();

        let recorded = events.borrow();
        assert!(recorded.first().unwrap().contains("StartDocument"));
        assert!(recorded.last().unwrap().contains("EndDocument"));
        assert!(recorded.len() >= 2);
    }

    #[test]
    fn action_handler_runs_between_transition_and_is_passed_the_token() {
        let seen = Rc::new(RefCell::new(Vec::new()));
        let log = seen.clone();
        let fsm = Fsm::new(STATES, 0);
        let config = ParserConfig::new().with_mode(ParserMode::Normal);
        let mut parser = Parser::new(PATTERNS, SKIP, fsm, config).unwrap().with_action_handler(
            move |ctx, token, action_id, _emit| {
                log.borrow_mut().push((action_id, token.kind, String::from_utf8_lossy(token.text).into_owned()));
                ctx.enter();
                Ok(())
            },
        );

        parser.push(b"12 + 34").unwrap();
        parser.finish().unwrap();

        let recorded = seen.borrow();
        assert_eq!(recorded.len(), 3);
        assert_eq!(recorded[0], (1, 1, "12".to_string()));
        assert_eq!(recorded[1], (2, 2, "+".to_string()));
        assert_eq!(recorded[2], (1, 1, "34".to_string()));
        assert_eq!(parser.context().depth(), 3);
    }

    #[test]
    fn action_handler_emits_a_value_event_per_number_token() {
        let events: Rc<RefCell<Vec<crate::events::OwnedEvent>>> = Rc::new(RefCell::new(Vec::new()));
        let log = events.clone();
        let fsm = Fsm::new(STATES, 0);
        let config = ParserConfig::new().with_mode(ParserMode::Normal);
        let mut parser = Parser::new(PATTERNS, SKIP, fsm, config)
            .unwrap()
            .with_event_handler(move |event| log.borrow_mut().push(event.into()))
            .with_action_handler(|ctx, token, action_id, emit| {
                ctx.enter();
                if action_id == 1 {
                    let text = String::from_utf8_lossy(token.text);
                    let value = Value::Int(text.parse().unwrap_or_default());
                    emit(Event::Value { value, position: token.position });
                }
                Ok(())
            });

        parser.push(b"12 + 34").unwrap();
        parser.finish().unwrap();

        let recorded = events.borrow();
        let values: Vec<&Value> = recorded
            .iter()
            .filter_map(|e: &crate::events::OwnedEvent| match e {
                crate::events::OwnedEvent::Value { value, .. } => Some(value),
                _ => None,
            })
            .collect();
        assert_eq!(values, vec![&Value::Int(12), &Value::Int(34)]);
    }

    #[test]
    fn action_error_is_recorded_without_halting_in_normal_mode() {
        let fsm = Fsm::new(STATES, 0);
        let config = ParserConfig::new().with_mode(ParserMode::Normal);
        let mut parser = Parser::new(PATTERNS, SKIP, fsm, config)
            .unwrap()
            .with_action_handler(|_ctx, _token, _action_id, _emit| {
                Err(ErrorContext::new(
                    ErrorCode::ValueOutOfRange,
                    Severity::Warning,
                    Position::START,
                    "value out of range",
                ))
            });

        parser.push(b"12").unwrap();
        let state = parser.finish().unwrap();
        assert_ne!(state, ParseState::Halted);
        assert_eq!(parser.errors().len(), 1);
        assert_eq!(parser.errors()[0].code, ErrorCode::ValueOutOfRange);
    }

    #[test]
    fn synchronize_recovery_discards_tokens_until_a_sync_token_then_resumes() {
        // "after_num" has no transition for token 3 (ws is skipped, so use an
        // out-of-grammar "plus-after-plus" shape): feed a stray `+` while in
        // `start`, which has no transition for it, then resync on the next
        // `num`.
        let fsm = Fsm::new(STATES, 0);
        let config = ParserConfig::new()
            .with_mode(ParserMode::Normal)
            .with_sync_token_ids(&[1]) // resync on the next NUM token
            .with_resync_state_id(1); // ...and resume as if already past one
        let mut parser = Parser::new(PATTERNS, SKIP, fsm, config).unwrap();

        // In `start` (state 0), only token 1 (num) has a transition; `+` is
        // unexpected and triggers synchronize-recovery until the next `num`.
        let state = parser.push(b"+ 99").unwrap();
        parser.finish().unwrap();

        assert_ne!(state, ParseState::Halted);
        assert_eq!(parser.errors().len(), 1);
        assert_eq!(parser.errors()[0].code, ErrorCode::UnexpectedToken);
        // Resynchronized on "99" back into `after_num` (state 1), so a
        // trailing valid `+ 1` would still be accepted; here we just assert
        // no further cascading errors were reported past recovery.
        assert_eq!(parser.checkpoint().fsm_state, 1);
    }

    #[test]
    fn resync_state_defaults_to_the_fsm_start_state_when_unset() {
        // A start state (id 1, not 0) with no transitions at all, so any
        // token is immediately unexpected; this pins down that the default
        // resync target is resolved from `fsm.start_state()` and not a
        // stray literal zero.
        const NO_TRANSITIONS: &[StateTransition] = &[];
        const STATES: &[State] = &[
            State { id: 0, name: "zero", transitions: NO_TRANSITIONS },
            State { id: 1, name: "one", transitions: NO_TRANSITIONS },
        ];
        let fsm = Fsm::new(STATES, 1);
        let config = ParserConfig::new().with_mode(ParserMode::Normal);
        assert_eq!(config.resync_state_id, None);
        let mut parser = Parser::new(PATTERNS, SKIP, fsm, config).unwrap();

        parser.push(b"12").unwrap();
        parser.finish().unwrap();

        assert_eq!(parser.errors().len(), 1);
        assert_eq!(parser.errors()[0].code, ErrorCode::UnexpectedToken);
        assert_eq!(parser.checkpoint().fsm_state, 1);
    }
}
