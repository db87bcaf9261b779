//! Custom panic hook for structured crash reports.
//!
//! Prints the phase and layer that were active when the panic happened,
//! the panic message and location, and a backtrace when requested.

use super::context::{get_current_context, AnalysisContext};
use std::panic::PanicHookInfo;

const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Install the custom panic hook. Call early in `main`.
pub fn install_panic_hook() {
    std::panic::set_hook(Box::new(|info| {
        print_crash_report(info);
    }));
}

fn print_crash_report(info: &PanicHookInfo<'_>) {
    let context = get_current_context();

    eprintln!();
    eprintln!("════════════════════════ GRIDPLAN CRASH REPORT ════════════════════════");
    eprintln!("  Version: {}", VERSION);
    eprintln!("  Platform: {}", std::env::consts::OS);
    eprintln!(
        "  Time: {}",
        chrono::Utc::now().format("%Y-%m-%d %H:%M:%S UTC")
    );
    eprintln!("  PANIC: {}", extract_panic_message(info));
    if let Some(location) = info.location() {
        eprintln!(
            "  Location: {}:{}:{}",
            location.file(),
            location.line(),
            location.column()
        );
    }
    print_context_section(&context);

    if std::env::var("RUST_BACKTRACE").is_ok() {
        eprintln!();
        eprintln!("{}", std::backtrace::Backtrace::capture());
    } else {
        eprintln!("  Run with RUST_BACKTRACE=1 for stack trace");
    }
    eprintln!("═══════════════════════════════════════════════════════════════════════");
}

fn print_context_section(context: &AnalysisContext) {
    match &context.phase {
        Some(phase) => eprintln!("  Phase: {}", phase),
        None => eprintln!("  Phase: (not set - crash occurred before processing started)"),
    }
    if let Some(layer) = &context.current_layer {
        eprintln!("  Layer: {}", layer.display());
    }
}

fn extract_panic_message(info: &PanicHookInfo<'_>) -> String {
    if let Some(s) = info.payload().downcast_ref::<&str>() {
        s.to_string()
    } else if let Some(s) = info.payload().downcast_ref::<String>() {
        s.clone()
    } else {
        "Unknown panic".to_string()
    }
}
