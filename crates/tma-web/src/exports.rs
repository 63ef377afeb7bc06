//! JavaScript entry points for pages that drive the bridge from JS.

use serde::Serialize;
use serde_wasm_bindgen::Serializer;
use wasm_bindgen::prelude::*;

use tma_core::{
    config::BridgeConfig,
    launch,
    share::{
        link::ShareContent,
        template::{create_share_template, TemplateOverrides},
        ShareIntent,
    },
};

use crate::{bridge, on_mount, sharer};

fn to_js<T: Serialize>(value: &T) -> Result<JsValue, JsValue> {
    value
        .serialize(&Serializer::json_compatible())
        .map_err(JsValue::from)
}

fn err(e: impl std::fmt::Display) -> JsValue {
    JsValue::from_str(&e.to_string())
}

#[wasm_bindgen(js_name = initLogging)]
pub fn init_logging() {
    let _ = crate::logging::init();
}

/// Install the page configuration (a `BridgeConfig` JSON string) used by
/// every share and locale call.
#[wasm_bindgen]
pub fn configure(config: &str) -> Result<(), JsValue> {
    let config = BridgeConfig::from_json(config).map_err(err)?;
    crate::configure(config).map_err(err)
}

/// Page mounted: initialize the bridge. Returns `false` when no host is present.
#[wasm_bindgen(js_name = onMount)]
pub fn on_mount_js() -> bool {
    on_mount()
}

/// Parse a launch URL or fragment. Non-string input is rejected.
#[wasm_bindgen(js_name = parseLaunchUrl)]
pub fn parse_launch_url(input: JsValue) -> Result<JsValue, JsValue> {
    let value: serde_json::Value = serde_wasm_bindgen::from_value(input).map_err(err)?;
    let params = launch::parse_value(&value).map_err(err)?;
    to_js(&params)
}

#[wasm_bindgen(js_name = launchContext)]
pub fn launch_context() -> Result<JsValue, JsValue> {
    match bridge().context() {
        Some(ctx) => to_js(ctx),
        None => Ok(JsValue::NULL),
    }
}

/// Effective chat id, or `undefined` when unknown.
#[wasm_bindgen(js_name = effectiveChatId)]
pub fn effective_chat_id() -> Option<f64> {
    bridge().effective_chat_id().map(|id| id.0 as f64)
}

#[wasm_bindgen(js_name = hasCapability)]
pub fn has_capability(name: &str) -> bool {
    bridge().has_member(name)
}

#[wasm_bindgen(js_name = sendData)]
pub fn send_data(data: JsValue) -> Result<(), JsValue> {
    let value: serde_json::Value = serde_wasm_bindgen::from_value(data).map_err(err)?;
    bridge().send_data(&value).map_err(err)
}

#[wasm_bindgen(js_name = showAlert)]
pub fn show_alert(message: &str) -> bool {
    bridge().show_alert(message).is_ok()
}

#[wasm_bindgen(js_name = closeApp)]
pub fn close_app() -> bool {
    bridge().close().is_ok()
}

#[wasm_bindgen(js_name = share)]
pub fn share(query: &str) -> Result<JsValue, JsValue> {
    let delivery = sharer()
        .share(&bridge(), &ShareIntent::query(query))
        .map_err(err)?;
    to_js(&delivery)
}

#[wasm_bindgen(js_name = shareTemplate)]
pub fn share_template(name: &str) -> Result<JsValue, JsValue> {
    let delivery = sharer().share_template(&bridge(), name).map_err(err)?;
    to_js(&delivery)
}

/// `overrides` is a partial template object (`{title, hashtags, ...}`).
#[wasm_bindgen(js_name = shareDirectLink)]
pub fn share_direct_link(url: &str, template: &str, overrides: JsValue) -> Result<String, JsValue> {
    let overrides: TemplateOverrides = if overrides.is_undefined() || overrides.is_null() {
        TemplateOverrides::default()
    } else {
        serde_wasm_bindgen::from_value(overrides).map_err(err)?
    };
    let content = ShareContent::Rich(create_share_template(template, overrides));
    sharer()
        .share_direct_link(&bridge(), url, content)
        .map_err(err)
}

/// Stored page language, else the browser language (`"zh-CN"` or `"en-US"`).
#[wasm_bindgen(js_name = pageLocale)]
pub fn page_locale() -> String {
    crate::page_locale().tag().to_string()
}

#[wasm_bindgen(js_name = setLocale)]
pub fn set_locale(tag: &str) -> Result<String, JsValue> {
    let locale = crate::set_locale(tag).map_err(err)?;
    Ok(locale.tag().to_string())
}
