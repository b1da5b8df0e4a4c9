//! Parser configuration: buffer sizing, recovery mode, error
//! budget, and arena/visualizer tuning, assembled with the same builder
//! pattern the buffer and pattern modules use for their own construction.

use crate::fsm::ParserMode;
use crate::visualizer::VisualizerConfig;

/// Configuration for one parse run, covering every knob the orchestrator
/// (`parser.rs`) threads through to the buffer, tokenizer, FSM, and
/// aggregator it assembles.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ParserConfig {
    /// Initial [`crate::buffer::IncrementalBuffer`] capacity in bytes.
    pub buffer_initial: usize,
    /// Maximum capacity the buffer may grow to before `BufferOverflow`.
    pub buffer_max: usize,
    /// Whether the buffer compacts opportunistically on `append`/`fill`.
    pub auto_compact: bool,
    /// Fraction of capacity consumed before an opportunistic compaction.
    pub compact_threshold: f64,
    /// Failure-mode behavior for the FSM driver.
    pub mode: ParserMode,
    /// Stop after this many reported errors have been recorded. `None` means
    /// unbounded.
    pub max_errors: Option<usize>,
    /// Token ids the resynchronizer scans forward for after an error.
    pub sync_token_ids: &'static [u32],
    /// FSM state to resume in once a sync token is found. `None` defaults
    /// to the FSM's own start state, resolved once when the parser is built.
    pub resync_state_id: Option<u32>,
    /// Capacity of the [`crate::arena::TokenArena`] handed to
    /// `next_token_into`, when the orchestrator allocates one itself.
    pub arena_bytes: usize,
    pub visualizer: VisualizerConfig,
}

impl Default for ParserConfig {
    fn default() -> Self {
        Self::DEFAULT
    }
}

impl ParserConfig {
    pub const DEFAULT: Self = Self {
        buffer_initial: 4096,
        buffer_max: 16 * 1024 * 1024,
        auto_compact: true,
        compact_threshold: 0.25,
        mode: ParserMode::Normal,
        max_errors: Some(100),
        sync_token_ids: &[],
        resync_state_id: None,
        arena_bytes: 64 * 1024,
        visualizer: VisualizerConfig {
            color: false,
            context_lines: 0,
            max_line_length: usize::MAX,
            marker_char: '^',
        },
    };

    pub const fn new() -> Self {
        Self::DEFAULT
    }

    pub const fn with_buffer_initial(mut self, bytes: usize) -> Self {
        self.buffer_initial = bytes;
        self
    }

    pub const fn with_buffer_max(mut self, bytes: usize) -> Self {
        self.buffer_max = bytes;
        self
    }

    pub const fn with_auto_compact(mut self, enabled: bool) -> Self {
        self.auto_compact = enabled;
        self
    }

    pub const fn with_compact_threshold(mut self, threshold: f64) -> Self {
        self.compact_threshold = threshold;
        self
    }

    pub const fn with_mode(mut self, mode: ParserMode) -> Self {
        self.mode = mode;
        self
    }

    pub const fn with_max_errors(mut self, max_errors: Option<usize>) -> Self {
        self.max_errors = max_errors;
        self
    }

    pub const fn with_sync_token_ids(mut self, ids: &'static [u32]) -> Self {
        self.sync_token_ids = ids;
        self
    }

    pub const fn with_resync_state_id(mut self, state_id: u32) -> Self {
        self.resync_state_id = Some(state_id);
        self
    }

    pub const fn with_arena_bytes(mut self, bytes: usize) -> Self {
        self.arena_bytes = bytes;
        self
    }

    pub const fn strict() -> Self {
        Self::DEFAULT.with_mode(ParserMode::Strict).with_max_errors(Some(1))
    }

    pub const fn lenient() -> Self {
        Self::DEFAULT.with_mode(ParserMode::Lenient).with_max_errors(None)
    }
}
