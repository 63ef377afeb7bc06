use std::{env, fs, path::Path};

use regex::Regex;
use serde::Deserialize;

use crate::{domain::ChatScope, errors::Error, Result};

pub const DEFAULT_LANGUAGE_KEY: &str = "app-language";

/// Typed configuration for the bridge and the sharing subsystem.
#[derive(Clone, Debug, PartialEq, Eq, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct BridgeConfig {
    /// Bot username (without `@`) used in manual-entry share instructions.
    pub bot_username: Option<String>,
    /// Mini app link shared by the direct-link strategy.
    pub mini_app_url: Option<String>,
    /// Chat kinds offered by the inline-query picker.
    pub inline_scopes: Vec<ChatScope>,
    /// Show a host alert when sharing fails.
    pub alert_on_failure: bool,
    /// Persistent-store key holding the language preference.
    pub language_key: String,
}

impl Default for BridgeConfig {
    fn default() -> Self {
        Self {
            bot_username: None,
            mini_app_url: None,
            inline_scopes: vec![ChatScope::Users, ChatScope::Groups],
            alert_on_failure: true,
            language_key: DEFAULT_LANGUAGE_KEY.to_string(),
        }
    }
}

impl BridgeConfig {
    /// Load from `TMA_*` environment variables (and `.env`, if present).
    pub fn load() -> Result<Self> {
        load_dotenv_if_present(Path::new(".env"));

        let defaults = Self::default();
        let inline_scopes = match env_str("TMA_INLINE_SCOPES") {
            Some(raw) => parse_scopes(&raw)?,
            None => defaults.inline_scopes,
        };

        Self {
            bot_username: env_str("TMA_BOT_USERNAME").and_then(non_empty),
            mini_app_url: env_str("TMA_MINI_APP_URL").and_then(non_empty),
            inline_scopes,
            alert_on_failure: env_bool("TMA_ALERT_ON_FAILURE").unwrap_or(defaults.alert_on_failure),
            language_key: env_str("TMA_LANGUAGE_KEY")
                .and_then(non_empty)
                .unwrap_or(defaults.language_key),
        }
        .validated()
    }

    /// Parse a JSON object handed over by the embedding page. Missing fields take defaults.
    pub fn from_json(raw: &str) -> Result<Self> {
        let cfg: Self = serde_json::from_str(raw)?;
        cfg.validated()
    }

    /// Normalize and check the values. A leading `@` on the bot username is dropped.
    pub fn validated(mut self) -> Result<Self> {
        if let Some(name) = self.bot_username.take() {
            let name = name.trim().trim_start_matches('@').to_string();
            let re = Regex::new(r"^[A-Za-z][A-Za-z0-9_]{4,31}$").expect("valid regex");
            if !re.is_match(&name) {
                return Err(Error::Config(format!("invalid bot username: {name:?}")));
            }
            self.bot_username = Some(name);
        }

        if let Some(url) = &self.mini_app_url {
            if !url.starts_with("https://") {
                return Err(Error::Config(format!(
                    "mini app url must use https: {url:?}"
                )));
            }
        }

        if self.inline_scopes.is_empty() {
            return Err(Error::Config(
                "at least one inline scope is required".to_string(),
            ));
        }

        if self.language_key.trim().is_empty() {
            return Err(Error::Config("language key must not be empty".to_string()));
        }

        Ok(self)
    }
}

fn parse_scopes(raw: &str) -> Result<Vec<ChatScope>> {
    raw.split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(|s| {
            ChatScope::parse(s).ok_or_else(|| Error::Config(format!("unknown inline scope: {s}")))
        })
        .collect()
}

fn env_str(key: &str) -> Option<String> {
    env::var(key).ok()
}

fn env_bool(key: &str) -> Option<bool> {
    env_str(key).map(|s| {
        matches!(
            s.trim().to_lowercase().as_str(),
            "1" | "true" | "yes" | "on"
        )
    })
}

fn non_empty(s: String) -> Option<String> {
    if s.trim().is_empty() {
        None
    } else {
        Some(s)
    }
}

fn load_dotenv_if_present(path: &Path) {
    let Ok(contents) = fs::read_to_string(path) else {
        return;
    };

    for raw in contents.lines() {
        let line = raw.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }

        let Some((k, v)) = line.split_once('=') else {
            continue;
        };

        let key = k.trim();
        if key.is_empty() || env::var_os(key).is_some() {
            continue; // existing env wins
        }

        let mut val = v.trim();
        if val.len() >= 2
            && ((val.starts_with('"') && val.ends_with('"'))
                || (val.starts_with('\'') && val.ends_with('\'')))
        {
            val = &val[1..val.len() - 1];
        }

        env::set_var(key, val);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn json_defaults_fill_missing_fields() {
        let cfg = BridgeConfig::from_json(r#"{"botUsername":"@MyMiniBot"}"#).unwrap();
        assert_eq!(cfg.bot_username.as_deref(), Some("MyMiniBot"));
        assert_eq!(cfg.inline_scopes, vec![ChatScope::Users, ChatScope::Groups]);
        assert!(cfg.alert_on_failure);
        assert_eq!(cfg.language_key, DEFAULT_LANGUAGE_KEY);
    }

    #[test]
    fn json_scopes_and_flags() {
        let cfg = BridgeConfig::from_json(
            r#"{"inlineScopes":["users","channels"],"alertOnFailure":false,"miniAppUrl":"https://t.me/MyMiniBot/app"}"#,
        )
        .unwrap();
        assert_eq!(cfg.inline_scopes, vec![ChatScope::Users, ChatScope::Channels]);
        assert!(!cfg.alert_on_failure);
    }

    #[test]
    fn rejects_bad_values() {
        assert!(matches!(
            BridgeConfig::from_json(r#"{"botUsername":"1bad"}"#),
            Err(Error::Config(_))
        ));
        assert!(matches!(
            BridgeConfig::from_json(r#"{"miniAppUrl":"http://t.me/x"}"#),
            Err(Error::Config(_))
        ));
        assert!(matches!(
            BridgeConfig::from_json(r#"{"inlineScopes":[]}"#),
            Err(Error::Config(_))
        ));
        assert!(matches!(
            BridgeConfig::from_json("not json"),
            Err(Error::Json(_))
        ));
    }

    #[test]
    fn parses_scope_csv() {
        assert_eq!(
            parse_scopes("users, Groups ,").unwrap(),
            vec![ChatScope::Users, ChatScope::Groups]
        );
        assert!(parse_scopes("users,rooms").is_err());
    }
}
