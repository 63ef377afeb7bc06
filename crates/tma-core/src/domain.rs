use std::fmt;

use serde::{Deserialize, Serialize};

/// Telegram user id (numeric).
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct UserId(pub i64);

/// Telegram chat id (numeric).
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ChatId(pub i64);

impl fmt::Display for ChatId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<UserId> for ChatId {
    /// In a private chat the chat id equals the user id.
    fn from(user: UserId) -> Self {
        ChatId(user.0)
    }
}

/// The user who launched the mini app, as carried by the launch data.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct TelegramUser {
    pub id: UserId,
    #[serde(default)]
    pub first_name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub username: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub language_code: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub is_premium: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub allows_write_to_pm: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub photo_url: Option<String>,
}

/// Chat the mini app was opened from. Only present in non-private launches.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatInfo {
    pub id: ChatId,
    #[serde(rename = "type", default)]
    pub kind: ChatType,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub username: Option<String>,
}

/// `chat_type` as reported by the host. Anything unrecognised is `Unknown`.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum ChatType {
    Private,
    Group,
    Supergroup,
    Channel,
    #[default]
    Unknown,
}

impl ChatType {
    pub fn parse(raw: &str) -> Self {
        match raw {
            "private" => ChatType::Private,
            "group" => ChatType::Group,
            "supergroup" => ChatType::Supergroup,
            "channel" => ChatType::Channel,
            _ => ChatType::Unknown,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            ChatType::Private => "private",
            ChatType::Group => "group",
            ChatType::Supergroup => "supergroup",
            ChatType::Channel => "channel",
            ChatType::Unknown => "unknown",
        }
    }
}

impl fmt::Display for ChatType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Serialize for ChatType {
    fn serialize<S: serde::Serializer>(&self, s: S) -> std::result::Result<S::Ok, S::Error> {
        s.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for ChatType {
    fn deserialize<D: serde::Deserializer<'de>>(d: D) -> std::result::Result<Self, D::Error> {
        let raw = String::deserialize(d)?;
        Ok(ChatType::parse(&raw))
    }
}

/// Target chat kinds offered by the host's inline-query chat picker.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChatScope {
    Users,
    Bots,
    Groups,
    Channels,
}

impl ChatScope {
    pub fn as_str(self) -> &'static str {
        match self {
            ChatScope::Users => "users",
            ChatScope::Bots => "bots",
            ChatScope::Groups => "groups",
            ChatScope::Channels => "channels",
        }
    }

    pub fn parse(raw: &str) -> Option<Self> {
        match raw.trim().to_ascii_lowercase().as_str() {
            "users" => Some(ChatScope::Users),
            "bots" => Some(ChatScope::Bots),
            "groups" => Some(ChatScope::Groups),
            "channels" => Some(ChatScope::Channels),
            _ => None,
        }
    }
}

/// Host platform string (`android`, `ios`, `macos`, `tdesktop`, `weba`, ...).
///
/// Kept verbatim; only the checks the bridge needs are typed.
#[derive(Clone, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Platform(pub String);

impl Platform {
    pub fn new(raw: impl Into<String>) -> Self {
        Platform(raw.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// macOS clients mis-handle inline-query sharing and need the compatibility path.
    pub fn is_macos(&self) -> bool {
        matches!(self.0.as_str(), "macos" | "mac")
    }

    pub fn is_unknown(&self) -> bool {
        self.0.is_empty() || self.0 == "unknown"
    }
}

impl fmt::Display for Platform {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.0.is_empty() {
            f.write_str("unknown")
        } else {
            f.write_str(&self.0)
        }
    }
}
