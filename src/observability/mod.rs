//! Observability infrastructure: logging setup, phase tracking and crash reports.
//!
//! - **Logging**: `tracing` subscriber writing to stderr, filtered by
//!   `GRIDPLAN_LOG`/`RUST_LOG` or the `-v` count
//! - **Context tracking**: thread-local phase and layer for error reports
//! - **Panic hook**: structured crash report with the tracked context
//!
//! ```ignore
//! use gridplan::observability::{init_logging, install_panic_hook, set_phase, AnalysisPhase};
//!
//! fn main() {
//!     init_logging(1);
//!     install_panic_hook();
//!     let _phase = set_phase(AnalysisPhase::Loading);
//!     // ...
//! }
//! ```

pub mod context;
pub mod logging;
pub mod panic_hook;

pub use context::{
    current_phase, get_current_context, reset_context, set_current_layer, set_phase,
    AnalysisContext, AnalysisPhase, ContextGuard,
};
pub use logging::{filter_directive, init_logging};
pub use panic_hook::install_panic_hook;
