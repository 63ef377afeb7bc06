//! Core of the Telegram Mini App bridge.
//!
//! This crate is intentionally framework-agnostic. The host shell's injected
//! `Telegram.WebApp` object lives behind the [`host::HostPort`] trait and is
//! implemented in adapter crates (`tma-web` for the browser).
//!
//! Launch data is surfaced as-is: `hash` and `signature` are never verified
//! here. Anything that needs an authenticated identity must check `initData`
//! server-side.

pub mod bridge;
pub mod config;
pub mod domain;
pub mod errors;
pub mod host;
pub mod launch;
pub mod locale;
pub mod logging;
pub mod share;

pub use errors::{Error, Result};
