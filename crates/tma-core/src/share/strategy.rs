//! Ordered share strategies. The first one whose precondition holds and whose
//! attempt succeeds delivers the share.

use std::fmt;

use crate::{
    bridge::Bridge,
    config::BridgeConfig,
    domain::{ChatScope, Platform},
    errors::Error,
    host::Capability,
    share::{
        link::{self, ShareContent},
        template::ShareTemplate,
        ShareDelivery, ShareIntent,
    },
    Result,
};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum StrategyKind {
    /// `t.me/share/url` opened through the host's Telegram-link opener.
    DirectLink,
    /// Empty inline query plus an on-screen instruction to type it manually.
    ManualInlineQuery,
    /// Inline query handed straight to the host's chat picker.
    InlineQuery,
    /// Caller-provided strategy.
    Custom(&'static str),
}

impl fmt::Display for StrategyKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StrategyKind::DirectLink => f.write_str("direct-link"),
            StrategyKind::ManualInlineQuery => f.write_str("manual-inline-query"),
            StrategyKind::InlineQuery => f.write_str("inline-query"),
            StrategyKind::Custom(name) => f.write_str(name),
        }
    }
}

/// What a strategy can see when deciding and attempting.
pub struct ShareEnv<'a> {
    pub bridge: &'a Bridge,
    pub config: &'a BridgeConfig,
    pub platform: &'a Platform,
}

impl ShareEnv<'_> {
    pub fn scopes<'i>(&'i self, intent: &'i ShareIntent) -> &'i [ChatScope] {
        intent.scopes.as_deref().unwrap_or(&self.config.inline_scopes)
    }
}

pub trait ShareStrategy {
    fn kind(&self) -> StrategyKind;

    /// Precondition; strategies that do not apply are skipped without an attempt.
    fn applies(&self, env: &ShareEnv<'_>) -> bool;

    fn attempt(&self, env: &ShareEnv<'_>, intent: &ShareIntent) -> Result<ShareDelivery>;
}

/// macOS compatibility path, first step: share the mini app link directly.
pub struct DirectLink;

impl DirectLink {
    /// Content used when the intent carries no rich payload.
    fn fallback_content() -> ShareTemplate {
        ShareTemplate {
            emoji: "🚀".to_string(),
            title: "Telegram Mini App".to_string(),
            description: "Come and try this app!".to_string(),
            use_markdown: true,
            hashtags: vec!["MiniApp".to_string(), "Telegram".to_string()],
            ..Default::default()
        }
    }
}

impl ShareStrategy for DirectLink {
    fn kind(&self) -> StrategyKind {
        StrategyKind::DirectLink
    }

    fn applies(&self, env: &ShareEnv<'_>) -> bool {
        env.platform.is_macos()
    }

    fn attempt(&self, env: &ShareEnv<'_>, intent: &ShareIntent) -> Result<ShareDelivery> {
        let url = intent
            .url
            .as_deref()
            .or(env.config.mini_app_url.as_deref())
            .ok_or_else(|| Error::ShareLink("no mini app url configured".to_string()))?;
        let content = ShareContent::Rich(
            intent
                .rich
                .clone()
                .unwrap_or_else(Self::fallback_content),
        );

        let link = link::share_url(url, &content)?;
        env.bridge.open_telegram_link(&link)?;

        Ok(ShareDelivery {
            strategy: self.kind(),
            user_driven: false,
            link: Some(link),
        })
    }
}

/// macOS compatibility path, second step: open the picker with an empty query
/// and tell the user what to type.
pub struct ManualInlineQuery;

impl ManualInlineQuery {
    pub fn instruction(bot_username: Option<&str>, query: &str) -> String {
        let typed = match bot_username {
            Some(bot) => format!("@{bot} {query}"),
            None => query.to_string(),
        };
        format!(
            "Sharing on macOS needs one extra step.\n\nType this in the chat you pick:\n{}\n\nthen choose the result to send.",
            typed.trim()
        )
    }
}

impl ShareStrategy for ManualInlineQuery {
    fn kind(&self) -> StrategyKind {
        StrategyKind::ManualInlineQuery
    }

    fn applies(&self, env: &ShareEnv<'_>) -> bool {
        env.platform.is_macos() && env.bridge.has_capability(Capability::SwitchInlineQuery)
    }

    fn attempt(&self, env: &ShareEnv<'_>, intent: &ShareIntent) -> Result<ShareDelivery> {
        env.bridge.switch_inline_query("", env.scopes(intent))?;

        let message = Self::instruction(env.config.bot_username.as_deref(), &intent.query);
        // Delivery is in the user's hands now; a missing alert does not undo it.
        let _ = env.bridge.show_alert(&message);

        Ok(ShareDelivery {
            strategy: self.kind(),
            user_driven: true,
            link: None,
        })
    }
}

/// Standard path: inline query with the intent's text.
pub struct InlineQuery;

impl ShareStrategy for InlineQuery {
    fn kind(&self) -> StrategyKind {
        StrategyKind::InlineQuery
    }

    fn applies(&self, env: &ShareEnv<'_>) -> bool {
        !env.platform.is_macos() && env.bridge.has_capability(Capability::SwitchInlineQuery)
    }

    fn attempt(&self, env: &ShareEnv<'_>, intent: &ShareIntent) -> Result<ShareDelivery> {
        env.bridge
            .switch_inline_query(&intent.query, env.scopes(intent))?;

        Ok(ShareDelivery {
            strategy: self.kind(),
            user_driven: false,
            link: None,
        })
    }
}

pub fn default_strategies() -> Vec<Box<dyn ShareStrategy>> {
    vec![
        Box::new(DirectLink),
        Box::new(ManualInlineQuery),
        Box::new(InlineQuery),
    ]
}
