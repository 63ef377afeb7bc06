//! Direct share links (`https://t.me/share/url`).

use crate::{errors::Error, share::template::ShareTemplate, Result};

pub const SHARE_URL_BASE: &str = "https://t.me/share/url";

/// Text attached to a direct share link.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ShareContent {
    Plain(String),
    Rich(ShareTemplate),
}

impl From<ShareTemplate> for ShareContent {
    fn from(t: ShareTemplate) -> Self {
        ShareContent::Rich(t)
    }
}

impl From<&str> for ShareContent {
    fn from(s: &str) -> Self {
        ShareContent::Plain(s.to_string())
    }
}

impl From<String> for ShareContent {
    fn from(s: String) -> Self {
        ShareContent::Plain(s)
    }
}

/// Compose the message text: non-empty parts joined by a blank line.
pub fn compose_text(content: &ShareContent) -> String {
    let t = match content {
        ShareContent::Plain(text) => return text.clone(),
        ShareContent::Rich(t) => t,
    };

    let title = match (t.use_markdown, t.title.is_empty()) {
        (true, false) => format!("*{}*", t.title),
        _ => t.title.clone(),
    };
    let description = match (t.use_markdown, t.description.is_empty()) {
        (true, false) => format!("_{}_", t.description),
        _ => t.description.clone(),
    };

    let parts = [
        t.emoji.clone(),
        title,
        description,
        t.text.clone(),
        prefixed(&t.hashtags, '#'),
        prefixed(&t.mentions, '@'),
    ];

    parts
        .into_iter()
        .filter(|p| !p.is_empty())
        .collect::<Vec<_>>()
        .join("\n\n")
}

/// `https://t.me/share/url?url=<url>&text=<text>`, both percent-encoded.
pub fn share_url(url: &str, content: &ShareContent) -> Result<String> {
    let url = url.trim();
    if url.is_empty() {
        return Err(Error::ShareLink("no url to share".to_string()));
    }

    let text = compose_text(content);
    Ok(format!(
        "{SHARE_URL_BASE}?url={}&text={}",
        urlencoding::encode(url),
        urlencoding::encode(&text)
    ))
}

/// Space-joined tags with `marker` in front; a marker the caller already added is kept single.
fn prefixed(items: &[String], marker: char) -> String {
    items
        .iter()
        .map(|s| s.trim().trim_start_matches(marker))
        .filter(|s| !s.is_empty())
        .map(|s| format!("{marker}{s}"))
        .collect::<Vec<_>>()
        .join(" ")
}
