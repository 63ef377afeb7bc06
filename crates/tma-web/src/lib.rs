//! Browser adapter (wasm-bindgen).
//!
//! This crate implements the `tma-core` host port over the `Telegram.WebApp`
//! object injected by `telegram-web-app.js`, and owns the page-wide bridge,
//! sharer and configuration.

use std::{cell::RefCell, rc::Rc};

pub mod host;
pub mod logging;
pub mod prefs;

#[cfg(target_arch = "wasm32")]
mod exports;

use tma_core::{
    bridge::Bridge, config::BridgeConfig, host::HostPort, locale::Locale, share::Sharer, Result,
};

thread_local! {
    static BRIDGE: Rc<Bridge> = Rc::new(Bridge::new(host::detect(), host::page_url()));
    static SHARER: RefCell<Rc<Sharer>> = RefCell::new(Rc::new(Sharer::new(BridgeConfig::default())));
}

/// The page-wide bridge. Created on first use; initialized by [`on_mount`].
pub fn bridge() -> Rc<Bridge> {
    BRIDGE.with(Rc::clone)
}

/// The page-wide sharer, built from the last [`configure`]d config.
pub fn sharer() -> Rc<Sharer> {
    SHARER.with(|s| Rc::clone(&s.borrow()))
}

/// Install the page configuration used by every share and locale entry point.
pub fn configure(config: BridgeConfig) -> Result<()> {
    let config = config.validated()?;
    tracing::debug!(
        bot = config.bot_username.as_deref().unwrap_or("-"),
        url = config.mini_app_url.as_deref().unwrap_or("-"),
        "bridge configured"
    );
    SHARER.with(|s| *s.borrow_mut() = Rc::new(Sharer::new(config)));
    Ok(())
}

pub fn config() -> BridgeConfig {
    sharer().config().clone()
}

/// Page mount/ready signal: moves the bridge to `Ready` when a host is present.
///
/// The host script may load after the bridge was first touched, so the host
/// object is looked up again here while the bridge has none.
pub fn on_mount() -> bool {
    mount(&bridge(), host::detect)
}

fn mount(bridge: &Bridge, detect: impl FnOnce() -> Option<Rc<dyn HostPort>>) -> bool {
    if !bridge.is_ready() && !bridge.has_host() {
        if let Some(host) = detect() {
            bridge.attach_host(host);
        }
    }
    bridge.initialize().is_ok()
}

/// Locale for this page, read under the configured language key.
pub fn page_locale() -> Locale {
    prefs::page_locale(&config().language_key)
}

/// Store `tag` as the page language under the configured language key.
pub fn set_locale(tag: &str) -> Result<Locale> {
    prefs::set_locale(prefs::store().as_ref(), &config().language_key, tag)
}
