//! Console logging for the browser build.
//!
//! On wasm, `tracing` events are forwarded to the `log` facade and printed by
//! `console_log` at the matching console level.

use tma_core::Result;

/// Install the logger (and a panic hook on wasm).
pub fn init() -> Result<()> {
    #[cfg(target_arch = "wasm32")]
    {
        console_error_panic_hook::set_once();
        console_log::init_with_level(log::Level::Debug)
            .map_err(|e| tma_core::errors::Error::External(format!("console logger: {e}")))
    }

    #[cfg(not(target_arch = "wasm32"))]
    {
        tma_core::logging::init("tma_web")
    }
}

#[cfg(test)]
mod tests {
    #[test]
    fn init_can_run_more_than_once() {
        assert!(super::init().is_ok());
        assert!(super::init().is_ok());
        tracing::info!("logger installed");
    }
}
