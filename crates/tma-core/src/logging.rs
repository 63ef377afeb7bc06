use crate::Result;

/// Initialize tracing for a native process (CLI, tests of adapters).
///
/// Browser builds log through `console_log` instead (see `tma-web`).
pub fn init(service_name: &str) -> Result<()> {
    use tracing_subscriber::{fmt, EnvFilter};

    // Default: info for our crates. Can be overridden with `RUST_LOG`.
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("info,tma_core=info,{service_name}=info")));

    // A second init (e.g. from tests) keeps the first subscriber.
    let _ = fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .try_init();

    Ok(())
}
