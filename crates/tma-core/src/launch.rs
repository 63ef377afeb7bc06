//! Launch-context reconstruction from the page URL and from the host's own view.
//!
//! The host appends launch data to the page URL fragment:
//!
//! ```text
//! #tgWebAppData=<query-string>&tgWebAppVersion=7.0&tgWebAppPlatform=ios
//! ```
//!
//! `tgWebAppData` is itself a query string whose `user` (and `chat`) fields are
//! URL-encoded JSON, so they arrive double-encoded in the fragment.

use chrono::{DateTime, Utc};
use serde::{de::DeserializeOwned, Serialize};
use serde_json::Value;
use url::form_urlencoded;

use crate::{
    domain::{ChatId, ChatInfo, ChatType, Platform, TelegramUser},
    errors::ParseError,
};

pub const WEB_APP_DATA_KEY: &str = "tgWebAppData";
pub const WEB_APP_VERSION_KEY: &str = "tgWebAppVersion";
pub const WEB_APP_PLATFORM_KEY: &str = "tgWebAppPlatform";

/// Identity/session facts available at launch.
///
/// `auth_date`, `hash` and `signature` are surfaced raw and never verified.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
pub struct LaunchContext {
    pub user: Option<TelegramUser>,
    pub chat: Option<ChatInfo>,
    pub chat_instance: Option<String>,
    pub chat_type: ChatType,
    pub start_param: Option<String>,
    pub query_id: Option<String>,
    pub auth_date: Option<String>,
    pub hash: Option<String>,
    pub signature: Option<String>,
}

impl LaunchContext {
    /// `chat.id` when a chat is known, the user id in private launches, else `None`.
    pub fn effective_chat_id(&self) -> Option<ChatId> {
        if let Some(chat) = &self.chat {
            return Some(chat.id);
        }
        if self.chat_type == ChatType::Private {
            return self.user.as_ref().map(|u| ChatId::from(u.id));
        }
        None
    }

    /// `auth_date` as a timestamp, when it is numeric.
    pub fn auth_date_utc(&self) -> Option<DateTime<Utc>> {
        let secs = self.auth_date.as_deref()?.trim().parse::<i64>().ok()?;
        DateTime::<Utc>::from_timestamp(secs, 0)
    }

    /// Build a context from the host object's parsed `initDataUnsafe` view.
    pub fn from_host_view(view: &Value) -> Self {
        let Some(obj) = view.as_object() else {
            return Self::default();
        };

        let field = |key: &str| obj.get(key).and_then(scalar_to_string);

        Self {
            user: obj.get("user").and_then(|v| from_json_value("user", v)),
            chat: obj.get("chat").and_then(|v| from_json_value("chat", v)),
            chat_instance: field("chat_instance"),
            chat_type: field("chat_type")
                .map(|s| ChatType::parse(&s))
                .unwrap_or_default(),
            start_param: field("start_param"),
            query_id: field("query_id"),
            auth_date: field("auth_date"),
            hash: field("hash"),
            signature: field("signature"),
        }
        .normalized()
    }

    /// A private launch never carries a chat record.
    fn normalized(mut self) -> Self {
        if self.chat_type == ChatType::Private && self.chat.take().is_some() {
            tracing::debug!("dropping chat record from a private launch");
        }
        self
    }
}

/// Whether a host `initDataUnsafe` view actually carries launch data.
///
/// Older hosts expose an empty object (or nothing) here.
pub fn host_view_has_data(view: &Value) -> bool {
    view.as_object()
        .is_some_and(|obj| obj.values().any(|v| !v.is_null()))
}

/// Top-level view of the launch fragment.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
pub struct LaunchParams {
    pub version: Option<String>,
    pub platform: Option<Platform>,
    /// Raw `tgWebAppData` (the string a server verifies as `initData`).
    pub raw_init_data: Option<String>,
    pub context: LaunchContext,
}

/// Parse a full page URL or just its fragment.
///
/// Never fails: missing or malformed pieces come back as `None`.
pub fn parse(input: &str) -> LaunchParams {
    let fragment = match input.split_once('#') {
        Some((_, fragment)) => fragment,
        None => input,
    };
    let fragment = fragment.strip_prefix('?').unwrap_or(fragment);
    let fields = query_fields(fragment);

    let raw_init_data = lookup(&fields, WEB_APP_DATA_KEY);
    let context = match raw_init_data.as_deref() {
        Some(raw) => parse_init_data(raw),
        None => {
            tracing::debug!("no {WEB_APP_DATA_KEY} in launch fragment");
            LaunchContext::default()
        }
    };

    LaunchParams {
        version: lookup(&fields, WEB_APP_VERSION_KEY),
        platform: lookup(&fields, WEB_APP_PLATFORM_KEY).map(Platform::new),
        raw_init_data,
        context,
    }
}

/// Same as [`parse`], keeping only the launch context.
pub fn parse_context(input: &str) -> LaunchContext {
    parse(input).context
}

/// Entry point for dynamically typed input (e.g. values crossing the JS boundary).
pub fn parse_value(input: &Value) -> Result<LaunchParams, ParseError> {
    match input {
        Value::String(s) => Ok(parse(s)),
        other => Err(ParseError::NotAString {
            found: json_kind(other),
        }),
    }
}

/// Parse the nested `tgWebAppData` query string.
pub fn parse_init_data(raw: &str) -> LaunchContext {
    let fields = query_fields(raw);

    LaunchContext {
        user: lookup(&fields, "user").and_then(|v| decode_json_field("user", &v)),
        chat: lookup(&fields, "chat").and_then(|v| decode_json_field("chat", &v)),
        chat_instance: lookup(&fields, "chat_instance"),
        chat_type: lookup(&fields, "chat_type")
            .map(|s| ChatType::parse(&s))
            .unwrap_or_default(),
        start_param: lookup(&fields, "start_param"),
        query_id: lookup(&fields, "query_id"),
        auth_date: lookup(&fields, "auth_date"),
        hash: lookup(&fields, "hash"),
        signature: lookup(&fields, "signature"),
    }
    .normalized()
}

fn query_fields(query: &str) -> Vec<(String, String)> {
    form_urlencoded::parse(query.as_bytes())
        .into_owned()
        .collect()
}

/// First value for `key`; empty values count as absent.
fn lookup(fields: &[(String, String)], key: &str) -> Option<String> {
    fields
        .iter()
        .find(|(k, _)| k == key)
        .map(|(_, v)| v.clone())
        .filter(|v| !v.is_empty())
}

/// The query parser already removed one layer of escaping; decode once more,
/// then let the JSON parser handle the rest.
fn decode_json_field<T: DeserializeOwned>(name: &str, value: &str) -> Option<T> {
    let decoded = match urlencoding::decode(value) {
        Ok(decoded) => decoded,
        Err(e) => {
            tracing::warn!("launch field `{name}` is not valid percent-encoded UTF-8: {e}");
            return None;
        }
    };
    match serde_json::from_str(&decoded) {
        Ok(v) => Some(v),
        Err(e) => {
            tracing::warn!("launch field `{name}` is not valid JSON: {e}");
            None
        }
    }
}

fn from_json_value<T: DeserializeOwned>(name: &str, value: &Value) -> Option<T> {
    if value.is_null() {
        return None;
    }
    match serde_json::from_value(value.clone()) {
        Ok(v) => Some(v),
        Err(e) => {
            tracing::warn!("host field `{name}` has an unexpected shape: {e}");
            None
        }
    }
}

fn scalar_to_string(value: &Value) -> Option<String> {
    match value {
        Value::String(s) if !s.is_empty() => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}
