//! Test double for the host object: records every call and can simulate
//! missing or throwing members.

use std::{cell::RefCell, collections::BTreeSet};

use serde_json::Value;

use super::{ButtonKind, Capability, ClickHandler, ConfirmHandler, HostError, HostPort, HostResult};
use crate::domain::ChatScope;

pub(crate) struct FakeHost {
    members: BTreeSet<String>,
    failing: BTreeSet<String>,
    platform: Option<String>,
    version: Option<String>,
    init_data: Option<String>,
    init_data_unsafe: Option<Value>,
    calls: RefCell<Vec<String>>,
    clicks: RefCell<Vec<(ButtonKind, ClickHandler)>>,
    confirm: RefCell<Option<ConfirmHandler>>,
}

impl FakeHost {
    /// A current host exposing every member the bridge knows.
    pub(crate) fn full() -> Self {
        let all = Capability::ALL.map(|c| c.member());
        Self::with_members(&all)
    }

    pub(crate) fn with_members(members: &[&str]) -> Self {
        Self {
            members: members.iter().map(|m| m.to_string()).collect(),
            failing: BTreeSet::new(),
            platform: None,
            version: Some("7.0".to_string()),
            init_data: None,
            init_data_unsafe: None,
            calls: RefCell::new(Vec::new()),
            clicks: RefCell::new(Vec::new()),
            confirm: RefCell::new(None),
        }
    }

    pub(crate) fn without(mut self, member: &str) -> Self {
        self.members.remove(member);
        self
    }

    /// Member exists but throws when called.
    pub(crate) fn throwing(mut self, member: &str) -> Self {
        self.failing.insert(member.to_string());
        self
    }

    pub(crate) fn on_platform(mut self, platform: &str) -> Self {
        self.platform = Some(platform.to_string());
        self
    }

    pub(crate) fn with_init_data(mut self, raw: &str, view: Value) -> Self {
        self.init_data = Some(raw.to_string());
        self.init_data_unsafe = Some(view);
        self
    }

    pub(crate) fn calls(&self) -> Vec<String> {
        self.calls.borrow().clone()
    }

    pub(crate) fn called(&self, member: &str) -> bool {
        self.calls
            .borrow()
            .iter()
            .any(|c| c.split('(').next() == Some(member))
    }

    pub(crate) fn click(&self, button: ButtonKind) {
        for (kind, handler) in self.clicks.borrow_mut().iter_mut() {
            if *kind == button {
                handler();
            }
        }
    }

    pub(crate) fn answer_confirm(&self, ok: bool) {
        if let Some(handler) = self.confirm.borrow_mut().take() {
            handler(ok);
        }
    }

    fn record(&self, member: &str, args: &str) -> HostResult {
        if !self.members.contains(member) {
            return Err(HostError::new(format!("{member} is not a function")));
        }
        if self.failing.contains(member) {
            return Err(HostError::new(format!("{member} exploded")));
        }
        self.calls.borrow_mut().push(format!("{member}({args})"));
        Ok(())
    }

    fn button_member(button: ButtonKind) -> &'static str {
        button.capability().member()
    }
}

impl HostPort for FakeHost {
    fn has_member(&self, name: &str) -> bool {
        self.members.contains(name)
    }

    fn platform(&self) -> Option<String> {
        self.platform.clone()
    }

    fn version(&self) -> Option<String> {
        self.version.clone()
    }

    fn init_data(&self) -> Option<String> {
        self.init_data.clone()
    }

    fn init_data_unsafe(&self) -> Option<Value> {
        self.init_data_unsafe.clone()
    }

    fn theme_params(&self) -> Option<Value> {
        None
    }

    fn ready(&self) -> HostResult {
        self.record("ready", "")
    }

    fn expand(&self) -> HostResult {
        self.record("expand", "")
    }

    fn close(&self) -> HostResult {
        self.record("close", "")
    }

    fn send_data(&self, text: &str) -> HostResult {
        self.record("sendData", text)
    }

    fn open_link(&self, url: &str) -> HostResult {
        self.record("openLink", url)
    }

    fn open_telegram_link(&self, url: &str) -> HostResult {
        self.record("openTelegramLink", url)
    }

    fn show_alert(&self, message: &str) -> HostResult {
        self.record("showAlert", message)
    }

    fn show_confirm(&self, message: &str, on_answer: ConfirmHandler) -> HostResult {
        self.record("showConfirm", message)?;
        *self.confirm.borrow_mut() = Some(on_answer);
        Ok(())
    }

    fn switch_inline_query(&self, query: &str, scopes: &[ChatScope]) -> HostResult {
        let scopes = scopes.iter().map(|s| s.as_str()).collect::<Vec<_>>().join(",");
        self.record("switchInlineQuery", &format!("{query}|{scopes}"))
    }

    fn set_button_text(&self, button: ButtonKind, text: &str) -> HostResult {
        self.record(Self::button_member(button), &format!("setText:{text}"))
    }

    fn show_button(&self, button: ButtonKind) -> HostResult {
        self.record(Self::button_member(button), "show")
    }

    fn hide_button(&self, button: ButtonKind) -> HostResult {
        self.record(Self::button_member(button), "hide")
    }

    fn on_button_click(&self, button: ButtonKind, handler: ClickHandler) -> HostResult {
        self.record(Self::button_member(button), "onClick")?;
        self.clicks.borrow_mut().push((button, handler));
        Ok(())
    }
}
