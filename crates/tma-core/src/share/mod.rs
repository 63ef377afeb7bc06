//! Sharing subsystem.
//!
//! Delivers a share intent to the platform's native share surface. Host and
//! platform quirks are handled by an ordered list of strategies (see
//! [`strategy`]); every public call reports success or failure and never
//! retries on its own.

pub mod link;
pub mod strategy;
pub mod template;

use serde::Serialize;

use crate::{
    bridge::Bridge,
    config::BridgeConfig,
    domain::ChatScope,
    errors::Error,
    Result,
};

use self::{
    link::ShareContent,
    strategy::{default_strategies, ShareEnv, ShareStrategy, StrategyKind},
    template::{ShareTemplate, TemplateKind, TemplateOverrides},
};

/// What to share: an inline query, optionally with a rich payload for link sharing.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ShareIntent {
    pub query: String,
    pub rich: Option<ShareTemplate>,
    /// Link to share; defaults to the configured mini app url.
    pub url: Option<String>,
    /// Picker scopes; defaults to the configured inline scopes.
    pub scopes: Option<Vec<ChatScope>>,
}

impl ShareIntent {
    pub fn query(query: impl Into<String>) -> Self {
        Self {
            query: query.into(),
            ..Default::default()
        }
    }

    pub fn with_rich(mut self, rich: ShareTemplate) -> Self {
        self.rich = Some(rich);
        self
    }

    pub fn with_url(mut self, url: impl Into<String>) -> Self {
        self.url = Some(url.into());
        self
    }

    pub fn with_scopes(mut self, scopes: Vec<ChatScope>) -> Self {
        self.scopes = Some(scopes);
        self
    }
}

/// A successful share attempt.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct ShareDelivery {
    #[serde(serialize_with = "serialize_kind")]
    pub strategy: StrategyKind,
    /// The user still has to complete the share by hand.
    pub user_driven: bool,
    /// Share link opened, for link-based strategies.
    pub link: Option<String>,
}

fn serialize_kind<S: serde::Serializer>(
    kind: &StrategyKind,
    s: S,
) -> std::result::Result<S::Ok, S::Error> {
    s.collect_str(kind)
}

pub struct Sharer {
    config: BridgeConfig,
    strategies: Vec<Box<dyn ShareStrategy>>,
}

impl Sharer {
    pub fn new(config: BridgeConfig) -> Self {
        Self::with_strategies(config, default_strategies())
    }

    pub fn with_strategies(config: BridgeConfig, strategies: Vec<Box<dyn ShareStrategy>>) -> Self {
        Self { config, strategies }
    }

    pub fn config(&self) -> &BridgeConfig {
        &self.config
    }

    /// Run the first applicable strategy that succeeds.
    pub fn share(&self, bridge: &Bridge, intent: &ShareIntent) -> Result<ShareDelivery> {
        let Some(state) = bridge.state() else {
            tracing::warn!("share requested before the bridge is ready");
            return Err(Error::NotReady);
        };

        let env = ShareEnv {
            bridge,
            config: &self.config,
            platform: &state.platform,
        };
        tracing::debug!(platform = %state.platform, query = %intent.query, "sharing");

        let mut attempts = Vec::new();
        for strategy in &self.strategies {
            let kind = strategy.kind();
            if !strategy.applies(&env) {
                tracing::debug!("share strategy {kind} does not apply");
                continue;
            }
            match strategy.attempt(&env, intent) {
                Ok(delivery) => {
                    tracing::info!(strategy = %kind, user_driven = delivery.user_driven, "share delivered");
                    return Ok(delivery);
                }
                Err(e) => {
                    tracing::warn!("share strategy {kind} failed: {e}");
                    attempts.push(format!("{kind}: {e}"));
                }
            }
        }

        if attempts.is_empty() {
            attempts.push(format!(
                "no share strategy applies on platform {}",
                state.platform
            ));
        }
        let err = Error::NoShareStrategy { attempts };

        if self.config.alert_on_failure {
            let _ = bridge.show_alert(&format!("Sharing failed.\n{err}"));
        }
        Err(err)
    }

    /// Inline query offered to users, groups and channels.
    pub fn share_to_chat(&self, bridge: &Bridge, message: &str) -> Result<ShareDelivery> {
        let intent = ShareIntent::query(message).with_scopes(vec![
            ChatScope::Users,
            ChatScope::Groups,
            ChatScope::Channels,
        ]);
        self.share(bridge, &intent)
    }

    /// The bot's `share_app` result, with a rich payload for link sharing.
    pub fn share_rich_message(
        &self,
        bridge: &Bridge,
        overrides: TemplateOverrides,
    ) -> Result<ShareDelivery> {
        let kind = TemplateKind::Simple;
        let intent = ShareIntent::query(kind.query()).with_rich(kind.defaults().merge(overrides));
        self.share(bridge, &intent)
    }

    /// Share a catalog template by name; unknown names use the simple template.
    pub fn share_template(&self, bridge: &Bridge, name: &str) -> Result<ShareDelivery> {
        let kind = TemplateKind::from_name(name);
        let intent = ShareIntent::query(kind.query()).with_rich(kind.defaults());
        self.share(bridge, &intent)
    }

    /// Open a `t.me/share/url` link for `url`; returns the link that was opened.
    ///
    /// Success means the host accepted the link, not that the user finished sharing.
    pub fn share_direct_link(
        &self,
        bridge: &Bridge,
        url: &str,
        content: impl Into<ShareContent>,
    ) -> Result<String> {
        let link = link::share_url(url, &content.into())?;
        bridge.open_telegram_link(&link)?;
        Ok(link)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::host::{fake::FakeHost, HostPort};
    use std::rc::Rc;

    const APP_URL: &str = "https://t.me/MyMiniBot/app";

    fn config() -> BridgeConfig {
        BridgeConfig {
            bot_username: Some("MyMiniBot".to_string()),
            mini_app_url: Some(APP_URL.to_string()),
            ..Default::default()
        }
    }

    fn ready(host: FakeHost) -> (Rc<FakeHost>, Bridge) {
        let host = Rc::new(host);
        let port: Rc<dyn HostPort> = host.clone();
        let bridge = Bridge::new(Some(port), "");
        bridge.initialize().unwrap();
        (host, bridge)
    }

    #[test]
    fn macos_without_inline_query_uses_direct_link() {
        let (host, bridge) = ready(
            FakeHost::full()
                .on_platform("macos")
                .without("switchInlineQuery"),
        );

        let delivery = Sharer::new(config())
            .share(&bridge, &ShareIntent::query("share_app"))
            .unwrap();

        assert_eq!(delivery.strategy, StrategyKind::DirectLink);
        assert!(!delivery.user_driven);
        let link = delivery.link.unwrap();
        assert!(link.starts_with("https://t.me/share/url?url=https%3A%2F%2Ft.me%2FMyMiniBot%2Fapp&text="));
        assert!(host.called("openTelegramLink"));
        assert!(!host.called("switchInlineQuery"));
    }

    #[test]
    fn macos_direct_link_uses_rich_payload() {
        let (_, bridge) = ready(FakeHost::full().on_platform("mac"));
        let rich = ShareTemplate {
            title: "Hello".to_string(),
            ..Default::default()
        };

        let delivery = Sharer::new(config())
            .share(&bridge, &ShareIntent::query("q").with_rich(rich))
            .unwrap();
        assert!(delivery.link.unwrap().ends_with("&text=Hello"));
    }

    #[test]
    fn macos_falls_back_to_manual_inline_query() {
        let (host, bridge) = ready(
            FakeHost::full()
                .on_platform("macos")
                .throwing("openTelegramLink"),
        );

        let delivery = Sharer::new(config())
            .share(&bridge, &ShareIntent::query("share_app"))
            .unwrap();

        assert_eq!(delivery.strategy, StrategyKind::ManualInlineQuery);
        assert!(delivery.user_driven);
        let calls = host.calls();
        assert!(calls.contains(&"switchInlineQuery(|users,groups)".to_string()));
        assert!(calls
            .iter()
            .any(|c| c.starts_with("showAlert(") && c.contains("@MyMiniBot share_app")));
    }

    #[test]
    fn macos_without_url_goes_straight_to_manual() {
        let (_, bridge) = ready(FakeHost::full().on_platform("macos"));
        let cfg = BridgeConfig {
            mini_app_url: None,
            ..config()
        };

        let delivery = Sharer::new(cfg)
            .share(&bridge, &ShareIntent::query("x"))
            .unwrap();
        assert_eq!(delivery.strategy, StrategyKind::ManualInlineQuery);
    }

    #[test]
    fn macos_with_nothing_available_fails_with_alert() {
        let (host, bridge) = ready(
            FakeHost::full()
                .on_platform("macos")
                .without("switchInlineQuery")
                .without("openTelegramLink"),
        );

        let err = Sharer::new(config())
            .share(&bridge, &ShareIntent::query("x"))
            .unwrap_err();

        match err {
            Error::NoShareStrategy { attempts } => {
                assert_eq!(attempts.len(), 1);
                assert!(attempts[0].starts_with("direct-link"));
            }
            other => panic!("unexpected error: {other}"),
        }
        assert!(host
            .calls()
            .iter()
            .any(|c| c.starts_with("showAlert(Sharing failed.")));
    }

    #[test]
    fn standard_platform_uses_inline_query() {
        let (host, bridge) = ready(FakeHost::full().on_platform("android"));

        let delivery = Sharer::new(config())
            .share(&bridge, &ShareIntent::query("hello world"))
            .unwrap();

        assert_eq!(delivery.strategy, StrategyKind::InlineQuery);
        assert!(host
            .calls()
            .contains(&"switchInlineQuery(hello world|users,groups)".to_string()));
        assert!(!host.called("openTelegramLink"));
    }

    #[test]
    fn standard_platform_without_inline_query_fails() {
        let (host, bridge) = ready(
            FakeHost::full()
                .on_platform("ios")
                .without("switchInlineQuery"),
        );
        let cfg = BridgeConfig {
            alert_on_failure: false,
            ..config()
        };

        let err = Sharer::new(cfg)
            .share(&bridge, &ShareIntent::query("x"))
            .unwrap_err();
        assert!(err.to_string().contains("no share strategy applies on platform ios"));
        assert!(!host.called("showAlert"));
    }

    #[test]
    fn throwing_host_is_reported_not_propagated() {
        let (host, bridge) = ready(
            FakeHost::full()
                .on_platform("tdesktop")
                .throwing("switchInlineQuery"),
        );

        let err = Sharer::new(config())
            .share(&bridge, &ShareIntent::query("x"))
            .unwrap_err();
        assert!(err.to_string().contains("switchInlineQuery exploded"));
        // No automatic retry.
        assert!(!host.called("switchInlineQuery"));
    }

    #[test]
    fn share_before_ready_is_rejected() {
        let bridge = Bridge::new(None, "");
        assert!(matches!(
            Sharer::new(config()).share(&bridge, &ShareIntent::query("x")),
            Err(Error::NotReady)
        ));
    }

    #[test]
    fn share_to_chat_offers_channels() {
        let (host, bridge) = ready(FakeHost::full().on_platform("android"));
        Sharer::new(config())
            .share_to_chat(&bridge, "hi")
            .unwrap();
        assert!(host
            .calls()
            .contains(&"switchInlineQuery(hi|users,groups,channels)".to_string()));
    }

    #[test]
    fn share_template_uses_catalog_query() {
        let (host, bridge) = ready(FakeHost::full().on_platform("weba"));
        let sharer = Sharer::new(config());

        sharer.share_template(&bridge, "invitation").unwrap();
        sharer.share_template(&bridge, "whatever").unwrap();

        let calls = host.calls();
        assert!(calls.contains(&"switchInlineQuery(invitation|users,groups)".to_string()));
        assert!(calls.contains(&"switchInlineQuery(share_app|users,groups)".to_string()));
    }

    #[test]
    fn configured_template_share_on_macos_opens_direct_link() {
        let (host, bridge) = ready(FakeHost::full().on_platform("macos"));

        let delivery = Sharer::new(config())
            .share_template(&bridge, "invitation")
            .unwrap();

        assert_eq!(delivery.strategy, StrategyKind::DirectLink);
        assert!(delivery.link.unwrap().contains("url=https%3A%2F%2Ft.me%2FMyMiniBot%2Fapp"));
        assert!(!host.called("switchInlineQuery"));
    }

    #[test]
    fn unconfigured_template_share_on_macos_needs_manual_entry() {
        let (host, bridge) = ready(FakeHost::full().on_platform("macos"));

        let delivery = Sharer::new(BridgeConfig::default())
            .share_template(&bridge, "invitation")
            .unwrap();

        assert_eq!(delivery.strategy, StrategyKind::ManualInlineQuery);
        assert!(!host.called("openTelegramLink"));
        assert!(!host.calls().iter().any(|c| c.contains('@')));
    }

    #[test]
    fn share_rich_message_on_macos_shares_overridden_title() {
        let (_, bridge) = ready(FakeHost::full().on_platform("macos"));
        let delivery = Sharer::new(config())
            .share_rich_message(&bridge, TemplateOverrides::title("Launch"))
            .unwrap();
        assert!(delivery.link.unwrap().contains("%2ALaunch%2A"));
    }

    #[test]
    fn share_direct_link_forwards_to_host() {
        let (host, bridge) = ready(FakeHost::full());
        let link = Sharer::new(config())
            .share_direct_link(&bridge, APP_URL, "Try it")
            .unwrap();
        assert!(link.ends_with("&text=Try%20it"));
        assert!(host.calls().contains(&format!("openTelegramLink({link})")));
    }

    struct AlwaysAlert;

    impl ShareStrategy for AlwaysAlert {
        fn kind(&self) -> StrategyKind {
            StrategyKind::Custom("alert")
        }

        fn applies(&self, _env: &ShareEnv<'_>) -> bool {
            true
        }

        fn attempt(&self, env: &ShareEnv<'_>, intent: &ShareIntent) -> Result<ShareDelivery> {
            env.bridge.show_alert(&intent.query)?;
            Ok(ShareDelivery {
                strategy: self.kind(),
                user_driven: true,
                link: None,
            })
        }
    }

    #[test]
    fn custom_strategies_run_in_order() {
        let (host, bridge) = ready(FakeHost::full().on_platform("android"));
        let sharer = Sharer::with_strategies(config(), vec![Box::new(AlwaysAlert)]);

        let delivery = sharer.share(&bridge, &ShareIntent::query("copy me")).unwrap();
        assert_eq!(delivery.strategy, StrategyKind::Custom("alert"));
        assert!(!host.called("switchInlineQuery"));
    }
}
