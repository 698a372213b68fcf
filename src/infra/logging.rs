// ============================================================
// Layer 6 — Logging Setup
// ============================================================
// Installs the global tracing subscriber for both binaries.
//
//   - level filter comes from RUST_LOG, plus a default
//     `iris_pipeline=info` directive
//   - output goes to stderr: stdout is reserved for the
//     Markdown report printed by `iris-run evaluate`
//
// Calling `init` twice is harmless; the second call is ignored.

use tracing_subscriber::EnvFilter;

/// Default directive applied on top of RUST_LOG
const DEFAULT_DIRECTIVE: &str = "iris_pipeline=info";

/// Install the fmt subscriber writing to stderr.
pub fn init() {
    let mut filter = EnvFilter::from_default_env();
    if let Ok(directive) = DEFAULT_DIRECTIVE.parse() {
        filter = filter.add_directive(directive);
    }

    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init();
}
