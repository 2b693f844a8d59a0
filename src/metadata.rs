use std::collections::BTreeMap;

use serde::Serialize;
use url::Url;

use crate::config::SiteConfig;
use crate::viewport::VIEWPORT;

pub const SITE_NAME: &str = "Invoice Generator Pro";
pub const DEFAULT_TITLE: &str =
    "Free Invoice Generator: Create & Send Professional Invoices in Minutes";
pub const TITLE_TEMPLATE: &str = "%s | Invoice Generator Pro";
pub const TITLE_PLACEHOLDER: &str = "%s";

const DESCRIPTION: &str = "Get paid on time with our free invoice maker. Create professional invoices & send them to clients instantly. No signup required.";
const SOCIAL_DESCRIPTION: &str = "Get paid on time with our free invoice maker. Create professional invoices & get them to clients instantly.";
const SOCIAL_IMAGE: &str = "/og-image.jpg";
const TWITTER_HANDLE: &str = "@ThatsPranav";

const KEYWORDS: &[&str] = &[
    "invoice generator",
    "free invoice template",
    "invoice maker",
    "online invoice",
    "create invoice",
    "professional invoice",
    "invoice software",
    "invoice creator",
    "digital invoice",
];

#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct Title {
    pub default: String,
    pub template: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub page: Option<String>,
}

impl Title {
    pub fn validate(&self) -> anyhow::Result<()> {
        if self.default.trim().is_empty() {
            anyhow::bail!("default title is empty");
        }
        let slots = self.template.matches(TITLE_PLACEHOLDER).count();
        if slots != 1 {
            anyhow::bail!(
                "title template {:?} must contain exactly one {TITLE_PLACEHOLDER} (found {slots})",
                self.template
            );
        }
        Ok(())
    }

    /// The string emitted in `<title>`.
    pub fn resolved(&self) -> String {
        match &self.page {
            Some(page) => self.template.replacen(TITLE_PLACEHOLDER, page, 1),
            None => self.default.clone(),
        }
    }
}

#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum ImagePreview {
    None,
    Standard,
    Large,
}

impl ImagePreview {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::None => "none",
            Self::Standard => "standard",
            Self::Large => "large",
        }
    }
}

#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct CrawlerDirectives {
    pub index: bool,
    pub follow: bool,
    /// `-1` means no limit.
    pub max_video_preview: i32,
    pub max_image_preview: ImagePreview,
    pub max_snippet: i32,
}

#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct Robots {
    pub index: bool,
    pub follow: bool,
    pub google_bot: CrawlerDirectives,
}

impl Robots {
    pub fn content(&self) -> String {
        index_follow(self.index, self.follow)
    }

    pub fn google_bot_content(&self) -> String {
        let bot = &self.google_bot;
        format!(
            "{}, max-video-preview:{}, max-image-preview:{}, max-snippet:{}",
            index_follow(bot.index, bot.follow),
            bot.max_video_preview,
            bot.max_image_preview.as_str(),
            bot.max_snippet
        )
    }
}

fn index_follow(index: bool, follow: bool) -> String {
    format!(
        "{}, {}",
        if index { "index" } else { "noindex" },
        if follow { "follow" } else { "nofollow" }
    )
}

#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct ImageDescriptor {
    pub url: String,
    pub width: u32,
    pub height: u32,
    pub alt: String,
}

#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct OpenGraph {
    #[serde(rename = "type")]
    pub kind: String,
    pub url: String,
    pub title: String,
    pub description: String,
    pub site_name: String,
    pub images: Vec<ImageDescriptor>,
}

#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct TwitterCard {
    pub card: String,
    pub site: String,
    pub creator: String,
    pub title: String,
    pub description: String,
    pub images: Vec<String>,
}

#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct Author {
    pub name: String,
}

#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct IconLink {
    pub rel: String,
    pub href: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sizes: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub mime: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,
}

#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct MetadataRecord {
    pub metadata_base: Url,
    pub title: Title,
    pub description: String,
    pub canonical: String,
    /// Language tag to path.
    pub languages: BTreeMap<String, String>,
    pub keywords: Vec<String>,
    pub robots: Robots,
    pub open_graph: OpenGraph,
    pub twitter: TwitterCard,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub verification: Option<String>,
    pub category: String,
    pub authors: Vec<Author>,
    pub manifest: String,
    pub application_name: String,
    pub icons: Vec<IconLink>,
}

impl MetadataRecord {
    /// Resolves a path against `metadata_base`. Already-absolute URLs pass through.
    pub fn absolute(&self, path: &str) -> String {
        match self.metadata_base.join(path) {
            Ok(url) => url.to_string(),
            Err(_) => path.to_string(),
        }
    }

    pub fn canonical_url(&self) -> String {
        self.absolute(&self.canonical)
    }
}

/// Per-page values. `None` inherits the site default.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PageMetadata {
    pub title: Option<String>,
    pub description: Option<String>,
    pub canonical: Option<String>,
    pub robots: RobotsOverride,
    pub open_graph: SocialOverride,
    pub twitter: SocialOverride,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RobotsOverride {
    pub index: Option<bool>,
    pub follow: Option<bool>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SocialOverride {
    pub title: Option<String>,
    pub description: Option<String>,
}

impl PageMetadata {
    pub fn titled(title: impl Into<String>) -> Self {
        Self {
            title: Some(title.into()),
            ..Self::default()
        }
    }
}

pub fn default_metadata(config: &SiteConfig) -> MetadataRecord {
    let base = config.base_url.clone();

    MetadataRecord {
        title: Title {
            default: DEFAULT_TITLE.to_string(),
            template: TITLE_TEMPLATE.to_string(),
            page: None,
        },
        description: DESCRIPTION.to_string(),
        canonical: "/".to_string(),
        languages: BTreeMap::from([("en-US".to_string(), "/".to_string())]),
        keywords: KEYWORDS.iter().map(|k| k.to_string()).collect(),
        robots: Robots {
            index: true,
            follow: true,
            google_bot: CrawlerDirectives {
                index: true,
                follow: true,
                max_video_preview: -1,
                max_image_preview: ImagePreview::Large,
                max_snippet: -1,
            },
        },
        open_graph: OpenGraph {
            kind: "website".to_string(),
            url: base.to_string(),
            title: DEFAULT_TITLE.to_string(),
            description: SOCIAL_DESCRIPTION.to_string(),
            site_name: SITE_NAME.to_string(),
            images: vec![ImageDescriptor {
                url: SOCIAL_IMAGE.to_string(),
                width: 1200,
                height: 630,
                alt: SITE_NAME.to_string(),
            }],
        },
        twitter: TwitterCard {
            card: "summary_large_image".to_string(),
            site: TWITTER_HANDLE.to_string(),
            creator: TWITTER_HANDLE.to_string(),
            title: DEFAULT_TITLE.to_string(),
            description: SOCIAL_DESCRIPTION.to_string(),
            images: vec![SOCIAL_IMAGE.to_string()],
        },
        verification: config.site_verification.clone(),
        category: "business".to_string(),
        authors: vec![Author {
            name: format!("{SITE_NAME} Team"),
        }],
        manifest: "/site.webmanifest".to_string(),
        application_name: SITE_NAME.to_string(),
        icons: default_icons(),
        metadata_base: base,
    }
}

fn default_icons() -> Vec<IconLink> {
    let icon = |rel: &str, href: &str, sizes: Option<&str>, mime: Option<&str>| IconLink {
        rel: rel.to_string(),
        href: href.to_string(),
        sizes: sizes.map(str::to_string),
        mime: mime.map(str::to_string),
        color: None,
    };

    vec![
        icon("apple-touch-icon", "/apple-touch-icon.png", Some("180x180"), None),
        icon("icon", "/favicon-32x32.png", Some("32x32"), Some("image/png")),
        icon("icon", "/favicon-16x16.png", Some("16x16"), Some("image/png")),
        IconLink {
            color: Some(VIEWPORT.theme_color.to_string()),
            ..icon("mask-icon", "/safari-pinned-tab.svg", None, None)
        },
    ]
}

/// Merges page values over the defaults field by field; nested records are
/// merged key by key.
pub fn merge(mut base: MetadataRecord, page: &PageMetadata) -> MetadataRecord {
    if let Some(title) = &page.title {
        base.title.page = Some(title.clone());
    }
    if let Some(description) = &page.description {
        base.description = description.clone();
    }
    if let Some(canonical) = &page.canonical {
        base.canonical = canonical.clone();
    }

    if let Some(index) = page.robots.index {
        base.robots.index = index;
    }
    if let Some(follow) = page.robots.follow {
        base.robots.follow = follow;
    }

    if let Some(title) = &page.open_graph.title {
        base.open_graph.title = title.clone();
    }
    if let Some(description) = &page.open_graph.description {
        base.open_graph.description = description.clone();
    }
    if let Some(title) = &page.twitter.title {
        base.twitter.title = title.clone();
    }
    if let Some(description) = &page.twitter.description {
        base.twitter.description = description.clone();
    }

    base
}

pub fn build_metadata(config: &SiteConfig, page: &PageMetadata) -> MetadataRecord {
    merge(default_metadata(config), page)
}
