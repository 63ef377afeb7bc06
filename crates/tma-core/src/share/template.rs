//! Share template catalog.

use serde::{Deserialize, Serialize};

/// Composable share message. Pure value; recreated per call.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ShareTemplate {
    pub emoji: String,
    pub title: String,
    pub description: String,
    /// Free text placed after the description.
    pub text: String,
    /// Bold title and italic description (Telegram markdown).
    pub use_markdown: bool,
    pub hashtags: Vec<String>,
    pub mentions: Vec<String>,
}

/// Caller-supplied fields; each `Some` replaces the template's field as a whole.
#[derive(Clone, Debug, Default, PartialEq, Eq, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct TemplateOverrides {
    pub emoji: Option<String>,
    pub title: Option<String>,
    pub description: Option<String>,
    pub text: Option<String>,
    pub use_markdown: Option<bool>,
    pub hashtags: Option<Vec<String>>,
    pub mentions: Option<Vec<String>>,
}

impl TemplateOverrides {
    pub fn title(title: impl Into<String>) -> Self {
        Self {
            title: Some(title.into()),
            ..Default::default()
        }
    }
}

impl ShareTemplate {
    /// Shallow merge: overridden fields are replaced, never combined.
    pub fn merge(self, overrides: TemplateOverrides) -> Self {
        Self {
            emoji: overrides.emoji.unwrap_or(self.emoji),
            title: overrides.title.unwrap_or(self.title),
            description: overrides.description.unwrap_or(self.description),
            text: overrides.text.unwrap_or(self.text),
            use_markdown: overrides.use_markdown.unwrap_or(self.use_markdown),
            hashtags: overrides.hashtags.unwrap_or(self.hashtags),
            mentions: overrides.mentions.unwrap_or(self.mentions),
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TemplateKind {
    Simple,
    Announcement,
    Invitation,
    Feature,
}

impl TemplateKind {
    /// Unknown names fall back to `Simple`.
    pub fn from_name(name: &str) -> Self {
        match name.trim().to_ascii_lowercase().as_str() {
            "announcement" => TemplateKind::Announcement,
            "invitation" => TemplateKind::Invitation,
            "feature" => TemplateKind::Feature,
            _ => TemplateKind::Simple,
        }
    }

    /// Inline query the bot answers for this template.
    pub fn query(self) -> &'static str {
        match self {
            TemplateKind::Simple => "share_app",
            TemplateKind::Announcement => "announcement",
            TemplateKind::Invitation => "invitation",
            TemplateKind::Feature => "feature",
        }
    }

    pub fn defaults(self) -> ShareTemplate {
        let (emoji, title, description, hashtags) = match self {
            TemplateKind::Simple => ("🚀", "Mini App", "Come and try this app!", vec![]),
            TemplateKind::Announcement => (
                "📢",
                "Important notice",
                "See what changed in the latest update",
                vec!["MiniApp", "Update"],
            ),
            TemplateKind::Invitation => (
                "🎉",
                "You're invited",
                "Come explore this app together!",
                vec!["Invitation", "TryIt"],
            ),
            TemplateKind::Feature => (
                "✨",
                "New feature",
                "Discover what's new",
                vec!["NewFeature", "Feature"],
            ),
        };

        ShareTemplate {
            emoji: emoji.to_string(),
            title: title.to_string(),
            description: description.to_string(),
            text: String::new(),
            use_markdown: true,
            hashtags: hashtags.into_iter().map(String::from).collect(),
            mentions: Vec::new(),
        }
    }
}

/// Catalog template for `name` with caller overrides applied.
pub fn create_share_template(name: &str, overrides: TemplateOverrides) -> ShareTemplate {
    TemplateKind::from_name(name).defaults().merge(overrides)
}
