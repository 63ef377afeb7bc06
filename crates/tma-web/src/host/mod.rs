//! Host detection and page globals, routed to target-specific implementations.

use std::rc::Rc;

use tma_core::host::HostPort;

#[cfg(not(target_arch = "wasm32"))]
mod non_wasm;
#[cfg(target_arch = "wasm32")]
mod wasm;

#[cfg(not(target_arch = "wasm32"))]
use non_wasm as imp;
#[cfg(target_arch = "wasm32")]
use wasm as imp;

#[cfg(target_arch = "wasm32")]
pub use wasm::WebAppHost;

/// `window.Telegram.WebApp`, if the host injected it.
pub fn detect() -> Option<Rc<dyn HostPort>> {
    let host = imp::detect();
    if host.is_none() {
        tracing::debug!("no Telegram.WebApp object on this page");
    }
    host
}

/// `window.location.href`.
pub fn page_url() -> String {
    imp::page_url()
}

/// `navigator.language`.
pub fn browser_language() -> Option<String> {
    imp::browser_language()
}
