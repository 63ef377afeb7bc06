//! Host that prints every call instead of driving a real Telegram client.

use serde_json::Value;

use tma_core::{
    domain::ChatScope,
    host::{ButtonKind, Capability, ClickHandler, ConfirmHandler, HostPort, HostResult},
};

pub struct ConsoleHost {
    platform: String,
    inline_query: bool,
}

impl ConsoleHost {
    pub fn new(platform: &str, inline_query: bool) -> Self {
        Self {
            platform: platform.to_string(),
            inline_query,
        }
    }

    fn print(&self, call: String) -> HostResult {
        println!("host <- {call}");
        Ok(())
    }
}

impl HostPort for ConsoleHost {
    fn has_member(&self, name: &str) -> bool {
        match Capability::from_member(name) {
            Some(Capability::SwitchInlineQuery) => self.inline_query,
            Some(_) => true,
            None => false,
        }
    }

    fn platform(&self) -> Option<String> {
        Some(self.platform.clone())
    }

    fn version(&self) -> Option<String> {
        Some("7.0".to_string())
    }

    // Always "older host": launch data comes from the page URL.
    fn init_data(&self) -> Option<String> {
        None
    }

    fn init_data_unsafe(&self) -> Option<Value> {
        None
    }

    fn theme_params(&self) -> Option<Value> {
        None
    }

    fn ready(&self) -> HostResult {
        self.print("ready()".to_string())
    }

    fn expand(&self) -> HostResult {
        self.print("expand()".to_string())
    }

    fn close(&self) -> HostResult {
        self.print("close()".to_string())
    }

    fn send_data(&self, text: &str) -> HostResult {
        self.print(format!("sendData({text})"))
    }

    fn open_link(&self, url: &str) -> HostResult {
        self.print(format!("openLink({url})"))
    }

    fn open_telegram_link(&self, url: &str) -> HostResult {
        self.print(format!("openTelegramLink({url})"))
    }

    fn show_alert(&self, message: &str) -> HostResult {
        self.print(format!("showAlert({message:?})"))
    }

    fn show_confirm(&self, message: &str, on_answer: ConfirmHandler) -> HostResult {
        self.print(format!("showConfirm({message:?})"))?;
        on_answer(true);
        Ok(())
    }

    fn switch_inline_query(&self, query: &str, scopes: &[ChatScope]) -> HostResult {
        let scopes = scopes.iter().map(|s| s.as_str()).collect::<Vec<_>>();
        self.print(format!("switchInlineQuery({query:?}, {scopes:?})"))
    }

    fn set_button_text(&self, button: ButtonKind, text: &str) -> HostResult {
        self.print(format!("{button:?}Button.setText({text:?})"))
    }

    fn show_button(&self, button: ButtonKind) -> HostResult {
        self.print(format!("{button:?}Button.show()"))
    }

    fn hide_button(&self, button: ButtonKind) -> HostResult {
        self.print(format!("{button:?}Button.hide()"))
    }

    fn on_button_click(&self, button: ButtonKind, _handler: ClickHandler) -> HostResult {
        self.print(format!("{button:?}Button.onClick(..)"))
    }
}
