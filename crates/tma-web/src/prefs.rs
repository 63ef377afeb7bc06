//! Preference storage backed by `window.localStorage`.

use std::rc::Rc;

use tma_core::{
    errors::Error,
    locale::{bootstrap_locale, persist_locale, Locale, PreferenceStore},
    Result,
};

use crate::host;

#[cfg(target_arch = "wasm32")]
mod imp {
    use tma_core::{errors::Error, locale::PreferenceStore, Result};

    /// `localStorage` wrapper. Storage can be disabled (private mode), so every
    /// access is fallible and reads degrade to `None`.
    #[derive(Debug, Clone, Copy, Default)]
    pub struct LocalStoragePrefs;

    impl LocalStoragePrefs {
        fn storage() -> Option<web_sys::Storage> {
            web_sys::window()?.local_storage().ok().flatten()
        }
    }

    impl PreferenceStore for LocalStoragePrefs {
        fn get(&self, key: &str) -> Option<String> {
            Self::storage()?.get_item(key).ok().flatten()
        }

        fn set(&self, key: &str, value: &str) -> Result<()> {
            let storage = Self::storage()
                .ok_or_else(|| Error::External("localStorage is unavailable".to_string()))?;
            storage
                .set_item(key, value)
                .map_err(|e| Error::External(format!("localStorage write failed: {e:?}")))
        }
    }
}

#[cfg(target_arch = "wasm32")]
pub use imp::LocalStoragePrefs;

#[cfg(not(target_arch = "wasm32"))]
thread_local! {
    static MEMORY: Rc<tma_core::locale::MemoryPreferences> = Default::default();
}

/// The page's preference store; a per-thread in-memory store outside the browser.
pub fn store() -> Rc<dyn PreferenceStore> {
    #[cfg(target_arch = "wasm32")]
    {
        Rc::new(LocalStoragePrefs)
    }
    #[cfg(not(target_arch = "wasm32"))]
    {
        MEMORY.with(|m| Rc::clone(m) as Rc<dyn PreferenceStore>)
    }
}

/// Locale for this page: stored preference under `key`, else the browser language.
pub fn page_locale(key: &str) -> Locale {
    let store = store();
    bootstrap_locale(store.as_ref(), key, host::browser_language().as_deref())
}

/// Persist a supported locale tag under `key`.
pub fn set_locale(store: &dyn PreferenceStore, key: &str, tag: &str) -> Result<Locale> {
    let locale =
        Locale::from_tag(tag).ok_or_else(|| Error::Config(format!("unsupported locale: {tag:?}")))?;
    persist_locale(store, key, locale)?;
    Ok(locale)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tma_core::{config::DEFAULT_LANGUAGE_KEY, locale::MemoryPreferences};

    #[test]
    fn native_page_locale_falls_back_to_english() {
        assert_eq!(page_locale(DEFAULT_LANGUAGE_KEY), Locale::EnUs);
    }

    #[test]
    fn set_locale_writes_only_supported_tags() {
        let store = MemoryPreferences::default();
        assert_eq!(set_locale(&store, "k", "en-us").unwrap(), Locale::EnUs);
        assert_eq!(store.get("k").as_deref(), Some("en-US"));

        assert!(matches!(set_locale(&store, "k", "de"), Err(Error::Config(_))));
        assert_eq!(store.get("k").as_deref(), Some("en-US"));
    }
}
