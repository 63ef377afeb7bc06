use std::rc::Rc;

use anyhow::Context;
use clap::{Parser, Subcommand};

use tma_core::{
    bridge::Bridge,
    config::BridgeConfig,
    host::HostPort,
    launch,
    locale::resolve_locale,
    share::{
        link::{share_url, ShareContent},
        template::{create_share_template, TemplateOverrides},
        ShareIntent, Sharer,
    },
};

mod console_host;

use console_host::ConsoleHost;

#[derive(Parser)]
#[command(name = "tma", about = "Telegram Mini App bridge developer tools")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Decode a launch URL (or its fragment) into the launch context.
    Inspect { url: String },

    /// Build a `t.me/share/url` link.
    ShareLink {
        #[arg(long)]
        url: String,
        /// Catalog template: simple, announcement, invitation, feature.
        #[arg(long, default_value = "simple")]
        template: String,
        #[arg(long)]
        title: Option<String>,
        #[arg(long)]
        description: Option<String>,
        #[arg(long)]
        text: Option<String>,
        #[arg(long = "hashtag")]
        hashtags: Vec<String>,
        #[arg(long = "mention")]
        mentions: Vec<String>,
        /// Disable bold/italic markdown.
        #[arg(long)]
        plain: bool,
    },

    /// Initialize a bridge over a simulated host and run the share decision.
    Simulate {
        #[arg(long, default_value = "android")]
        platform: String,
        /// Host without `switchInlineQuery`.
        #[arg(long)]
        no_inline: bool,
        /// Page URL carrying launch data.
        #[arg(long, default_value = "")]
        url: String,
        #[arg(long, default_value = "share_app")]
        query: String,
    },

    /// Resolve the UI locale from a stored preference and a browser language.
    Locale {
        #[arg(long)]
        stored: Option<String>,
        #[arg(long)]
        browser: Option<String>,
    },
}

fn main() -> anyhow::Result<()> {
    tma_core::logging::init("tma")?;
    let cli = Cli::parse();

    match cli.command {
        Command::Inspect { url } => inspect(&url),
        Command::ShareLink {
            url,
            template,
            title,
            description,
            text,
            hashtags,
            mentions,
            plain,
        } => {
            let overrides = TemplateOverrides {
                title,
                description,
                text,
                use_markdown: plain.then_some(false),
                hashtags: (!hashtags.is_empty()).then_some(hashtags),
                mentions: (!mentions.is_empty()).then_some(mentions),
                ..Default::default()
            };
            let content = ShareContent::Rich(create_share_template(&template, overrides));
            println!("{}", share_url(&url, &content)?);
            Ok(())
        }
        Command::Simulate {
            platform,
            no_inline,
            url,
            query,
        } => simulate(&platform, no_inline, &url, &query),
        Command::Locale { stored, browser } => {
            println!(
                "{}",
                resolve_locale(stored.as_deref(), browser.as_deref())
            );
            Ok(())
        }
    }
}

fn inspect(url: &str) -> anyhow::Result<()> {
    let params = launch::parse(url);
    println!("{}", serde_json::to_string_pretty(&params)?);

    match params.context.effective_chat_id() {
        Some(id) => println!("effective chat id: {id}"),
        None => println!("effective chat id: unknown"),
    }
    if params.context.hash.is_some() {
        println!("note: hash/signature are not verified; check initData server-side");
    }
    Ok(())
}

fn simulate(platform: &str, no_inline: bool, url: &str, query: &str) -> anyhow::Result<()> {
    let config = BridgeConfig::load().context("loading TMA_* configuration")?;

    let host: Rc<dyn HostPort> = Rc::new(ConsoleHost::new(platform, !no_inline));
    let bridge = Bridge::new(Some(host), url);
    let state = bridge.initialize()?;
    println!(
        "bridge ready: platform={} source={:?} effective_chat_id={:?}",
        state.platform,
        state.source,
        state.effective_chat_id().map(|c| c.0)
    );

    match Sharer::new(config).share(&bridge, &ShareIntent::query(query)) {
        Ok(delivery) => {
            println!("{}", serde_json::to_string_pretty(&delivery)?);
            Ok(())
        }
        Err(e) => {
            println!("share failed: {e}");
            Ok(())
        }
    }
}
