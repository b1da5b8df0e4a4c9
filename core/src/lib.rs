#![deny(
    unsafe_code,
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::panic,
    clippy::todo,
    clippy::unimplemented,
    clippy::dbg_macro
)]
#![cfg_attr(feature = "docs", doc = simple_mermaid::mermaid!("docs/diagrams/pipeline.mmd"))]

//! A zero-allocation, streaming, pattern-driven tokenization and
//! event-parsing framework.
//!
//! The pipeline, front to back:
//!
//! 1. [`charclass`] classifies raw bytes; [`pattern`] composes classes into
//!    a small, non-backtracking matching algebra evaluated by
//!    [`pattern::match_pattern`].
//! 2. [`scanner`] runs bulk byte scans (whitespace/run skipping, delimiter
//!    search) ahead of or instead of per-byte pattern matching.
//! 3. [`memstream`] tokenizes a complete in-memory buffer; [`buffer`] and
//!    [`streaming`] do the same incrementally from a [`streaming::ByteSource`].
//! 4. [`matcher`] is the pluggable recognizer seam; [`arena`] gives
//!    recognizers somewhere to copy text that must outlive one `next_token`
//!    call.
//! 5. [`fsm`] drives a flat state-transition table over the resulting
//!    tokens; [`context`] holds the value stack and attributes its actions
//!    read and write; [`events`] is how structure is reported onward.
//! 6. [`error`], [`aggregator`], and [`visualizer`] turn failures into
//!    grouped, renderable diagnostics; [`config`] tunes every stage at once;
//!    [`parser`] assembles all of the above into one incremental driver.
//!
//! Tree construction, schema validation, and Unicode normalization are
//! explicitly out of scope: this crate hands a consumer a flat event
//! sequence and gets out of the way.

pub mod aggregator;
pub mod arena;
pub mod buffer;
pub mod charclass;
pub mod config;
pub mod context;
pub mod error;
pub mod events;
pub mod ffi_contract;
pub mod fsm;
pub mod matcher;
pub mod memstream;
pub mod parser;
pub mod pattern;
pub mod position;
pub mod scanner;
pub mod streaming;
pub mod token;
pub mod visualizer;

pub use aggregator::{Aggregator, ErrorGroup};
pub use arena::{ArenaOutOfMemory, TokenArena};
pub use buffer::{BufferError, BufferStats, IncrementalBuffer};
pub use charclass::{classify_byte, CharClass};
pub use config::ParserConfig;
pub use context::{ContextError, ParserContext, Value};
pub use error::{Error, ErrorCode, ErrorContext, Severity};
pub use events::{Event, EventLog, EventSink, OwnedEvent};
pub use fsm::{Fsm, FsmError, ParserMode, State, StateTransition, StepOutcome};
pub use matcher::{MatcherError, PatternMatcher, TokenMatcher};
pub use memstream::{MemTokenStream, NamedPattern};
pub use parser::{ParseCheckpoint, ParseState, Parser};
pub use pattern::{match_pattern, ByteSet, ClassSpec, MatchResult, Pattern, PatternError};
pub use position::Position;
pub use streaming::{ByteSource, SourceError, StreamingTokenizer, TokenizeError};
pub use token::{OwnedToken, Token, ERROR_KIND};
pub use visualizer::{render, render_group, VisualizerConfig};
