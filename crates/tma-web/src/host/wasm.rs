use js_sys::{Array, Function, Object, Reflect};
use serde_json::Value;
use wasm_bindgen::{closure::Closure, JsCast, JsValue};

use tma_core::{
    domain::ChatScope,
    host::{ButtonKind, ClickHandler, ConfirmHandler, HostError, HostResult},
};

use super::*;

/// `Telegram.WebApp` accessed through reflection, since any member may be missing.
pub struct WebAppHost {
    app: Object,
}

impl WebAppHost {
    pub fn from_window() -> Option<Self> {
        let window = web_sys::window()?;
        let telegram = Reflect::get(&window, &JsValue::from_str("Telegram")).ok()?;
        if !telegram.is_object() {
            return None;
        }
        let app = Reflect::get(&telegram, &JsValue::from_str("WebApp")).ok()?;
        app.dyn_into::<Object>().ok().map(|app| Self { app })
    }

    fn member(&self, name: &str) -> Option<JsValue> {
        Reflect::get(&self.app, &JsValue::from_str(name))
            .ok()
            .filter(|v| !v.is_undefined() && !v.is_null())
    }

    fn string_field(&self, name: &str) -> Option<String> {
        self.member(name)?.as_string().filter(|s| !s.is_empty())
    }

    fn json_field(&self, name: &str) -> Option<Value> {
        match serde_wasm_bindgen::from_value(self.member(name)?) {
            Ok(v) => Some(v),
            Err(e) => {
                tracing::warn!("Telegram.WebApp.{name} is not plain data: {e}");
                None
            }
        }
    }

    fn button(&self, kind: ButtonKind) -> Result<JsValue, HostError> {
        let name = kind.capability().member();
        self.member(name)
            .ok_or_else(|| HostError::new(format!("{name} is not available")))
    }

    fn call0(&self, name: &str) -> HostResult {
        call(&self.app, name, &[])
    }

    fn call1(&self, name: &str, arg: &str) -> HostResult {
        call(&self.app, name, &[JsValue::from_str(arg)])
    }
}

/// Call `target[name](...args)`; a thrown exception becomes a [`HostError`].
fn call(target: &JsValue, name: &str, args: &[JsValue]) -> HostResult {
    let func = Reflect::get(target, &JsValue::from_str(name))
        .map_err(js_error)?
        .dyn_into::<Function>()
        .map_err(|_| HostError::new(format!("{name} is not a function")))?;
    let argv = args.iter().collect::<Array>();
    func.apply(target, &argv).map(|_| ()).map_err(js_error)
}

fn js_error(e: JsValue) -> HostError {
    let message = e
        .dyn_ref::<js_sys::Error>()
        .map(|err| String::from(err.message()))
        .or_else(|| e.as_string())
        .unwrap_or_else(|| format!("{e:?}"));
    HostError::new(message)
}

impl HostPort for WebAppHost {
    fn has_member(&self, name: &str) -> bool {
        match self.member(name) {
            Some(v) => v.is_function() || v.is_object(),
            None => false,
        }
    }

    fn platform(&self) -> Option<String> {
        self.string_field("platform")
    }

    fn version(&self) -> Option<String> {
        self.string_field("version")
    }

    fn init_data(&self) -> Option<String> {
        self.string_field("initData")
    }

    fn init_data_unsafe(&self) -> Option<Value> {
        self.json_field("initDataUnsafe")
    }

    fn theme_params(&self) -> Option<Value> {
        self.json_field("themeParams")
    }

    fn ready(&self) -> HostResult {
        self.call0("ready")
    }

    fn expand(&self) -> HostResult {
        self.call0("expand")
    }

    fn close(&self) -> HostResult {
        self.call0("close")
    }

    fn send_data(&self, text: &str) -> HostResult {
        self.call1("sendData", text)
    }

    fn open_link(&self, url: &str) -> HostResult {
        self.call1("openLink", url)
    }

    fn open_telegram_link(&self, url: &str) -> HostResult {
        self.call1("openTelegramLink", url)
    }

    fn show_alert(&self, message: &str) -> HostResult {
        self.call1("showAlert", message)
    }

    fn show_confirm(&self, message: &str, on_answer: ConfirmHandler) -> HostResult {
        let callback = Closure::once_into_js(move |ok: JsValue| on_answer(ok.as_bool() == Some(true)));
        call(&self.app, "showConfirm", &[JsValue::from_str(message), callback])
    }

    fn switch_inline_query(&self, query: &str, scopes: &[ChatScope]) -> HostResult {
        let chat_types = scopes
            .iter()
            .map(|s| JsValue::from_str(s.as_str()))
            .collect::<Array>();
        call(
            &self.app,
            "switchInlineQuery",
            &[JsValue::from_str(query), chat_types.into()],
        )
    }

    fn set_button_text(&self, button: ButtonKind, text: &str) -> HostResult {
        call(&self.button(button)?, "setText", &[JsValue::from_str(text)])
    }

    fn show_button(&self, button: ButtonKind) -> HostResult {
        call(&self.button(button)?, "show", &[])
    }

    fn hide_button(&self, button: ButtonKind) -> HostResult {
        call(&self.button(button)?, "hide", &[])
    }

    fn on_button_click(&self, button: ButtonKind, handler: ClickHandler) -> HostResult {
        // Handed to the JS GC; the host keeps the handler for the page lifetime.
        let callback = Closure::wrap(handler).into_js_value();
        call(&self.button(button)?, "onClick", &[callback])
    }
}

pub fn detect() -> Option<Rc<dyn HostPort>> {
    WebAppHost::from_window().map(|h| Rc::new(h) as Rc<dyn HostPort>)
}

pub fn page_url() -> String {
    web_sys::window()
        .and_then(|w| w.location().href().ok())
        .unwrap_or_default()
}

pub fn browser_language() -> Option<String> {
    web_sys::window()?.navigator().language()
}
