//! Locale bootstrap: stored preference first, then the browser language.

use std::{cell::RefCell, collections::HashMap, fmt};

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum Locale {
    ZhCn,
    #[default]
    EnUs,
}

impl Locale {
    pub const FALLBACK: Locale = Locale::EnUs;

    pub fn tag(self) -> &'static str {
        match self {
            Locale::ZhCn => "zh-CN",
            Locale::EnUs => "en-US",
        }
    }

    /// Exact match on a supported tag (case-insensitive).
    pub fn from_tag(tag: &str) -> Option<Self> {
        match tag.trim().to_ascii_lowercase().as_str() {
            "zh-cn" => Some(Locale::ZhCn),
            "en-us" => Some(Locale::EnUs),
            _ => None,
        }
    }

    /// Map a browser language (`navigator.language`) to a supported locale.
    pub fn from_browser_language(lang: &str) -> Self {
        if lang.trim().to_ascii_lowercase().starts_with("zh") {
            Locale::ZhCn
        } else {
            Locale::FALLBACK
        }
    }
}

impl fmt::Display for Locale {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.tag())
    }
}

pub fn resolve_locale(stored: Option<&str>, browser: Option<&str>) -> Locale {
    if let Some(locale) = stored.and_then(Locale::from_tag) {
        return locale;
    }
    if let Some(raw) = stored.filter(|s| !s.trim().is_empty()) {
        tracing::debug!("ignoring unsupported stored language {raw:?}");
    }
    browser
        .map(Locale::from_browser_language)
        .unwrap_or(Locale::FALLBACK)
}

/// Persistent key-value store for user preferences (the browser's `localStorage`).
pub trait PreferenceStore {
    fn get(&self, key: &str) -> Option<String>;
    fn set(&self, key: &str, value: &str) -> crate::Result<()>;
}

/// Read the stored language under `key` and resolve against the browser language.
pub fn bootstrap_locale(store: &dyn PreferenceStore, key: &str, browser: Option<&str>) -> Locale {
    let stored = store.get(key);
    resolve_locale(stored.as_deref(), browser)
}

pub fn persist_locale(store: &dyn PreferenceStore, key: &str, locale: Locale) -> crate::Result<()> {
    store.set(key, locale.tag())
}

/// In-memory store for native builds and tests.
#[derive(Debug, Default)]
pub struct MemoryPreferences {
    values: RefCell<HashMap<String, String>>,
}

impl PreferenceStore for MemoryPreferences {
    fn get(&self, key: &str) -> Option<String> {
        self.values.borrow().get(key).cloned()
    }

    fn set(&self, key: &str, value: &str) -> crate::Result<()> {
        self.values
            .borrow_mut()
            .insert(key.to_string(), value.to_string());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::DEFAULT_LANGUAGE_KEY;

    #[test]
    fn stored_preference_wins() {
        assert_eq!(resolve_locale(Some("en-US"), Some("zh-TW")), Locale::EnUs);
        assert_eq!(resolve_locale(Some("zh-CN"), Some("en-GB")), Locale::ZhCn);
    }

    #[test]
    fn browser_language_decides_without_preference() {
        assert_eq!(resolve_locale(None, Some("zh-HK")), Locale::ZhCn);
        assert_eq!(resolve_locale(Some("fr-FR"), Some("zh")), Locale::ZhCn);
        assert_eq!(resolve_locale(None, Some("de-DE")), Locale::EnUs);
        assert_eq!(resolve_locale(None, None), Locale::EnUs);
    }

    #[test]
    fn persisted_locale_is_read_back() {
        let store = MemoryPreferences::default();
        assert_eq!(
            bootstrap_locale(&store, DEFAULT_LANGUAGE_KEY, Some("zh-CN")),
            Locale::ZhCn
        );

        persist_locale(&store, DEFAULT_LANGUAGE_KEY, Locale::EnUs).unwrap();
        assert_eq!(store.get(DEFAULT_LANGUAGE_KEY).as_deref(), Some("en-US"));
        assert_eq!(
            bootstrap_locale(&store, DEFAULT_LANGUAGE_KEY, Some("zh-CN")),
            Locale::EnUs
        );
    }
}
