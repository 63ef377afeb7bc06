//! Host port: the surface of the host-injected `Telegram.WebApp` object.
//!
//! Every member may be missing depending on the client version, so the bridge
//! probes members once (see [`HostCapabilities`]) and adapters report a thrown
//! exception as [`HostError`] instead of unwinding.

use std::{collections::BTreeSet, fmt};

use serde_json::Value;

use crate::domain::ChatScope;

#[cfg(test)]
pub(crate) mod fake;

/// Optional host members the bridge knows how to use.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Capability {
    Ready,
    Expand,
    Close,
    SendData,
    OpenLink,
    OpenTelegramLink,
    ShowAlert,
    ShowConfirm,
    SwitchInlineQuery,
    MainButton,
    BackButton,
}

impl Capability {
    pub const ALL: [Capability; 11] = [
        Capability::Ready,
        Capability::Expand,
        Capability::Close,
        Capability::SendData,
        Capability::OpenLink,
        Capability::OpenTelegramLink,
        Capability::ShowAlert,
        Capability::ShowConfirm,
        Capability::SwitchInlineQuery,
        Capability::MainButton,
        Capability::BackButton,
    ];

    /// Member name on the host object.
    pub fn member(self) -> &'static str {
        match self {
            Capability::Ready => "ready",
            Capability::Expand => "expand",
            Capability::Close => "close",
            Capability::SendData => "sendData",
            Capability::OpenLink => "openLink",
            Capability::OpenTelegramLink => "openTelegramLink",
            Capability::ShowAlert => "showAlert",
            Capability::ShowConfirm => "showConfirm",
            Capability::SwitchInlineQuery => "switchInlineQuery",
            Capability::MainButton => "MainButton",
            Capability::BackButton => "BackButton",
        }
    }

    pub fn from_member(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|c| c.member() == name)
    }
}

impl fmt::Display for Capability {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.member())
    }
}

/// Snapshot of the host members present at bridge initialization.
///
/// A host does not gain members mid-session, so this is never refreshed.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct HostCapabilities {
    present: BTreeSet<Capability>,
}

impl HostCapabilities {
    pub fn probe(host: &dyn HostPort) -> Self {
        let present = Capability::ALL
            .into_iter()
            .filter(|c| host.has_member(c.member()))
            .collect::<BTreeSet<_>>();
        tracing::debug!(?present, "probed host capabilities");
        Self { present }
    }

    pub fn has(&self, capability: Capability) -> bool {
        self.present.contains(&capability)
    }

    /// Lookup by host member name; unknown names are reported as absent.
    pub fn has_member(&self, name: &str) -> bool {
        Capability::from_member(name).is_some_and(|c| self.has(c))
    }

    pub fn iter(&self) -> impl Iterator<Item = Capability> + '_ {
        self.present.iter().copied()
    }
}

impl FromIterator<Capability> for HostCapabilities {
    fn from_iter<I: IntoIterator<Item = Capability>>(iter: I) -> Self {
        Self {
            present: iter.into_iter().collect(),
        }
    }
}

/// An exception raised by a host method.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct HostError {
    pub message: String,
}

impl HostError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

impl fmt::Display for HostError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.message)
    }
}

pub type HostResult = std::result::Result<(), HostError>;

/// Which of the host's bottom buttons a call targets.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ButtonKind {
    Main,
    Back,
}

impl ButtonKind {
    pub fn capability(self) -> Capability {
        match self {
            ButtonKind::Main => Capability::MainButton,
            ButtonKind::Back => Capability::BackButton,
        }
    }
}

/// Invoked by the host each time a button is pressed.
pub type ClickHandler = Box<dyn FnMut() + 'static>;

/// Invoked by the host once the user answers a confirm dialog.
pub type ConfirmHandler = Box<dyn FnOnce(bool) + 'static>;

/// Hexagonal port for the host-injected object.
///
/// Calls are synchronous: the host's own UI transitions are observed through
/// the handlers, never awaited.
pub trait HostPort {
    /// Whether the host object has a member (method or sub-object) of this name.
    fn has_member(&self, name: &str) -> bool;

    fn platform(&self) -> Option<String>;
    fn version(&self) -> Option<String>;
    /// Raw `initData` string.
    fn init_data(&self) -> Option<String>;
    /// Host-parsed `initDataUnsafe` object.
    fn init_data_unsafe(&self) -> Option<Value>;
    fn theme_params(&self) -> Option<Value>;

    fn ready(&self) -> HostResult;
    fn expand(&self) -> HostResult;
    fn close(&self) -> HostResult;
    fn send_data(&self, text: &str) -> HostResult;
    fn open_link(&self, url: &str) -> HostResult;
    fn open_telegram_link(&self, url: &str) -> HostResult;
    fn show_alert(&self, message: &str) -> HostResult;
    fn show_confirm(&self, message: &str, on_answer: ConfirmHandler) -> HostResult;
    fn switch_inline_query(&self, query: &str, scopes: &[ChatScope]) -> HostResult;

    fn set_button_text(&self, button: ButtonKind, text: &str) -> HostResult;
    fn show_button(&self, button: ButtonKind) -> HostResult;
    fn hide_button(&self, button: ButtonKind) -> HostResult;
    fn on_button_click(&self, button: ButtonKind, handler: ClickHandler) -> HostResult;
}
