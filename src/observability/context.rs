//! Thread-local context tracking for error and crash reports.
//!
//! Records which processing phase is running and which layer file is being
//! handled. Guards restore the previous context on drop so phases nest.

use std::cell::RefCell;
use std::path::PathBuf;

thread_local! {
    static CURRENT_CONTEXT: RefCell<AnalysisContext> = const { RefCell::new(AnalysisContext::new()) };
}

/// Snapshot of what gridplan was doing.
#[derive(Debug, Clone, Default)]
pub struct AnalysisContext {
    /// Current processing phase
    pub phase: Option<AnalysisPhase>,
    /// Layer file currently being processed
    pub current_layer: Option<PathBuf>,
}

impl AnalysisContext {
    /// Create a new empty context.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            phase: None,
            current_layer: None,
        }
    }
}

/// Processing phases of a single command invocation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AnalysisPhase {
    /// Loading and validating configuration
    Configuration,
    /// Walking a data directory for layer files
    LayerDiscovery,
    /// Reading and parsing a layer file
    Loading,
    /// Transforming coordinates to WGS84
    Reprojection,
    /// Column statistics, thresholds and histograms
    Statistics,
    /// Priority bucketing and aggregation
    Classification,
    /// Per-feature style resolution
    Styling,
    /// Writing reports and styled collections
    OutputGeneration,
}

impl std::fmt::Display for AnalysisPhase {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Configuration => write!(f, "configuration"),
            Self::LayerDiscovery => write!(f, "layer_discovery"),
            Self::Loading => write!(f, "loading"),
            Self::Reprojection => write!(f, "reprojection"),
            Self::Statistics => write!(f, "statistics"),
            Self::Classification => write!(f, "classification"),
            Self::Styling => write!(f, "styling"),
            Self::OutputGeneration => write!(f, "output_generation"),
        }
    }
}

/// RAII guard restoring the previous context on drop.
pub struct ContextGuard {
    previous: AnalysisContext,
}

impl Drop for ContextGuard {
    fn drop(&mut self) {
        CURRENT_CONTEXT.with(|ctx| {
            *ctx.borrow_mut() = self.previous.clone();
        });
    }
}

/// Set the current phase; the previous phase is restored when the guard drops.
#[must_use]
pub fn set_phase(phase: AnalysisPhase) -> ContextGuard {
    CURRENT_CONTEXT.with(|ctx| {
        let previous = ctx.borrow().clone();
        ctx.borrow_mut().phase = Some(phase);
        ContextGuard { previous }
    })
}

/// Set the layer file being processed.
#[must_use]
pub fn set_current_layer(path: impl Into<PathBuf>) -> ContextGuard {
    CURRENT_CONTEXT.with(|ctx| {
        let previous = ctx.borrow().clone();
        ctx.borrow_mut().current_layer = Some(path.into());
        ContextGuard { previous }
    })
}

/// Get the current context snapshot.
#[must_use]
pub fn get_current_context() -> AnalysisContext {
    CURRENT_CONTEXT.with(|ctx| ctx.borrow().clone())
}

/// The phase currently running, if any.
#[must_use]
pub fn current_phase() -> Option<AnalysisPhase> {
    CURRENT_CONTEXT.with(|ctx| ctx.borrow().phase)
}

/// Reset the current thread's context to empty.
pub fn reset_context() {
    CURRENT_CONTEXT.with(|ctx| {
        *ctx.borrow_mut() = AnalysisContext::new();
    });
}
