use url::Url;

pub const FALLBACK_BASE_URL: &str = "https://example.com";

pub const ENV_PUBLIC_URL: &str = "INVOICE_LANDING_PUBLIC_URL";
pub const ENV_SITE_VERIFICATION: &str = "INVOICE_LANDING_GOOGLE_SITE_VERIFICATION";
pub const ENV_GA_MEASUREMENT_ID: &str = "INVOICE_LANDING_GA_MEASUREMENT_ID";
pub const ENV_PROFILE: &str = "INVOICE_LANDING_ENV";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BuildProfile {
    Development,
    Production,
}

impl BuildProfile {
    /// `None` for unrecognized values; the caller picks the fallback.
    pub fn parse(raw: &str) -> Option<Self> {
        match raw.trim().to_ascii_lowercase().as_str() {
            "production" | "prod" => Some(Self::Production),
            "" | "development" | "dev" | "test" => Some(Self::Development),
            _ => None,
        }
    }

    pub fn is_production(self) -> bool {
        self == Self::Production
    }
}

/// Process-wide settings, resolved once at startup and passed down explicitly.
#[derive(Debug, Clone)]
pub struct SiteConfig {
    pub base_url: Url,
    pub site_verification: Option<String>,
    pub analytics_id: Option<String>,
    pub profile: BuildProfile,
}

impl Default for SiteConfig {
    fn default() -> Self {
        Self {
            base_url: fallback_base_url(),
            site_verification: None,
            analytics_id: None,
            profile: BuildProfile::Development,
        }
    }
}

impl SiteConfig {
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let base_url = resolve_base_url(lookup(ENV_PUBLIC_URL).as_deref());

        let profile = match lookup(ENV_PROFILE) {
            None => BuildProfile::Development,
            Some(raw) => BuildProfile::parse(&raw).unwrap_or_else(|| {
                tracing::warn!(
                    value = %raw,
                    "unrecognized {ENV_PROFILE}; using development profile"
                );
                BuildProfile::Development
            }),
        };

        Self {
            base_url,
            site_verification: non_blank(lookup(ENV_SITE_VERIFICATION)),
            analytics_id: non_blank(lookup(ENV_GA_MEASUREMENT_ID)),
            profile,
        }
    }
}

/// Never fails: anything that is not an absolute http(s) URL with a host
/// resolves to [`FALLBACK_BASE_URL`].
pub fn resolve_base_url(raw: Option<&str>) -> Url {
    let Some(raw) = raw.map(str::trim).filter(|v| !v.is_empty()) else {
        return fallback_base_url();
    };

    match Url::parse(raw) {
        Ok(url)
            if matches!(url.scheme(), "http" | "https")
                && url.host_str().is_some_and(|h| !h.is_empty()) =>
        {
            url
        }
        Ok(url) => {
            tracing::warn!(value = %raw, scheme = url.scheme(), "base url is not http(s); using fallback");
            fallback_base_url()
        }
        Err(err) => {
            tracing::warn!(value = %raw, %err, "invalid base url; using fallback");
            fallback_base_url()
        }
    }
}

fn fallback_base_url() -> Url {
    Url::parse(FALLBACK_BASE_URL).unwrap_or_else(|_| unreachable!("fallback url is valid"))
}

fn non_blank(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}
