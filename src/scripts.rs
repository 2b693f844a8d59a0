use std::collections::HashSet;

use anyhow::Context as _;
use serde::Serialize;
use serde_json::json;
use url::Url;

use crate::config::{BuildProfile, SiteConfig};

const AD_NETWORK_KEY: &str = "7597aa772c2c514edb50598d1254e478";
const AD_BANNER_WIDTH: u32 = 728;
const AD_BANNER_HEIGHT: u32 = 90;
const GTAG_LOADER_URL: &str = "https://www.googletagmanager.com/gtag/js";

/// When an emitted script runs relative to page interactivity.
#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq, PartialOrd, Ord)]
#[serde(rename_all = "snake_case")]
pub enum Strategy {
    /// Blocking, in document order inside `<head>`.
    Synchronous,
    /// After the initial content is parsed; never blocks first paint.
    AfterInteractive,
    /// After the window `load` event.
    Deferred,
}

#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum ScriptSource {
    External(String),
    Inline(String),
}

#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum Inclusion {
    Always,
    ProductionOnly,
}

impl Inclusion {
    pub fn includes(self, profile: BuildProfile) -> bool {
        match self {
            Self::Always => true,
            Self::ProductionOnly => profile.is_production(),
        }
    }
}

#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct ScriptDirective {
    pub id: String,
    pub source: ScriptSource,
    pub strategy: Strategy,
    pub inclusion: Inclusion,
    /// Ids of directives whose global state this one reads.
    pub depends_on: Vec<String>,
}

impl ScriptDirective {
    pub fn external(id: &str, src: impl Into<String>) -> Self {
        Self {
            id: id.to_string(),
            source: ScriptSource::External(src.into()),
            strategy: Strategy::AfterInteractive,
            inclusion: Inclusion::Always,
            depends_on: Vec::new(),
        }
    }

    pub fn inline(id: &str, payload: impl Into<String>) -> Self {
        Self {
            source: ScriptSource::Inline(payload.into()),
            ..Self::external(id, "")
        }
    }

    pub fn with_strategy(mut self, strategy: Strategy) -> Self {
        self.strategy = strategy;
        self
    }

    pub fn production_only(mut self) -> Self {
        self.inclusion = Inclusion::ProductionOnly;
        self
    }

    pub fn after(mut self, dependency: &str) -> Self {
        self.depends_on.push(dependency.to_string());
        self
    }

    pub fn is_analytics(&self) -> bool {
        self.id.starts_with("google-analytics")
    }
}

/// The fixed, validated set of directive templates for the site.
#[derive(Debug, Clone)]
pub struct ScriptCatalog {
    directives: Vec<ScriptDirective>,
}

impl ScriptCatalog {
    pub fn new(directives: Vec<ScriptDirective>) -> anyhow::Result<Self> {
        validate(&directives)?;
        Ok(Self { directives })
    }

    pub fn from_config(config: &SiteConfig) -> anyhow::Result<Self> {
        let mut directives = ad_network_directives();
        match config.analytics_id.as_deref() {
            Some(id) => directives.extend(analytics_directives(id)?),
            None => tracing::info!("no analytics measurement id; analytics scripts disabled"),
        }
        Self::new(directives)
    }

    pub fn directives(&self) -> &[ScriptDirective] {
        &self.directives
    }

    /// Directives to emit for one document, dependencies first.
    pub fn plan(&self, profile: BuildProfile) -> Vec<ScriptDirective> {
        let mut included: Vec<&ScriptDirective> = self
            .directives
            .iter()
            .filter(|d| d.inclusion.includes(profile))
            .collect();

        // A dependent whose dependency was left out would read missing state.
        loop {
            let ids: HashSet<String> = included.iter().map(|d| d.id.clone()).collect();
            let before = included.len();
            included.retain(|d| {
                let satisfied = d.depends_on.iter().all(|dep| ids.contains(dep.as_str()));
                if !satisfied {
                    tracing::debug!(id = %d.id, "dropping script with omitted dependency");
                }
                satisfied
            });
            if included.len() == before {
                break;
            }
        }

        match dependency_order(&included) {
            Ok(order) => order.into_iter().map(|i| included[i].clone()).collect(),
            Err(stuck) => {
                tracing::error!(?stuck, "script dependency cycle; using declaration order");
                included.into_iter().cloned().collect()
            }
        }
    }
}

fn validate(directives: &[ScriptDirective]) -> anyhow::Result<()> {
    let mut seen = HashSet::new();
    for d in directives {
        if d.id.trim().is_empty() {
            anyhow::bail!("script directive with empty id");
        }
        if !seen.insert(d.id.as_str()) {
            anyhow::bail!("duplicate script id: {}", d.id);
        }
        match &d.source {
            ScriptSource::External(src) if src.trim().is_empty() => {
                anyhow::bail!("script {} has an empty src", d.id)
            }
            ScriptSource::Inline(payload) if payload.trim().is_empty() => {
                anyhow::bail!("script {} has an empty inline payload", d.id)
            }
            _ => {}
        }
    }

    for d in directives {
        for dep in &d.depends_on {
            if dep == &d.id {
                anyhow::bail!("script {} depends on itself", d.id);
            }
            let Some(target) = directives.iter().find(|other| &other.id == dep) else {
                anyhow::bail!("script {} depends on unknown script {dep}", d.id);
            };
            if target.strategy > d.strategy {
                anyhow::bail!(
                    "script {} ({:?}) depends on {dep} which runs later ({:?})",
                    d.id,
                    d.strategy,
                    target.strategy
                );
            }
        }
    }

    let all: Vec<&ScriptDirective> = directives.iter().collect();
    dependency_order(&all)
        .map_err(|stuck| anyhow::anyhow!("script dependency cycle among: {}", stuck.join(", ")))?;
    Ok(())
}

/// Stable topological order: among ready directives the earliest declared
/// goes first. Returns the ids that could not be placed on a cycle.
fn dependency_order(directives: &[&ScriptDirective]) -> Result<Vec<usize>, Vec<String>> {
    let mut placed = vec![false; directives.len()];
    let mut emitted: HashSet<&str> = HashSet::new();
    let mut order = Vec::with_capacity(directives.len());

    while order.len() < directives.len() {
        let next = directives.iter().enumerate().position(|(i, d)| {
            !placed[i]
                && d.depends_on
                    .iter()
                    .all(|dep| emitted.contains(dep.as_str()))
        });
        let Some(i) = next else {
            let stuck = directives
                .iter()
                .enumerate()
                .filter(|(i, _)| !placed[*i])
                .map(|(_, d)| d.id.clone())
                .collect();
            return Err(stuck);
        };
        placed[i] = true;
        emitted.insert(directives[i].id.as_str());
        order.push(i);
    }

    Ok(order)
}

fn ad_network_directives() -> Vec<ScriptDirective> {
    let options = json!({
        "key": AD_NETWORK_KEY,
        "format": "iframe",
        "height": AD_BANNER_HEIGHT,
        "width": AD_BANNER_WIDTH,
        "params": {},
    });

    vec![
        ScriptDirective::external(
            "effective-gate-cpm",
            "//pl28225690.effectivegatecpm.com/3c/91/79/3c9179bcc776f30dc1a579d80aff60b0.js",
        ),
        ScriptDirective::inline("ad-config", format!("window.atOptions = {options};")),
        ScriptDirective::external(
            "high-performance-format",
            format!("//www.highperformanceformat.com/{AD_NETWORK_KEY}/invoke.js"),
        )
        .after("ad-config"),
    ]
}

/// The loader is declared before its configuration; ordering is left to the
/// dependency pass.
fn analytics_directives(measurement_id: &str) -> anyhow::Result<Vec<ScriptDirective>> {
    let loader = Url::parse_with_params(GTAG_LOADER_URL, &[("id", measurement_id)])
        .context("build analytics loader url")?;
    let id_literal =
        serde_json::to_string(measurement_id).context("encode analytics measurement id")?;

    Ok(vec![
        ScriptDirective::external("google-analytics", loader.to_string())
            .production_only()
            .after("google-analytics-config"),
        ScriptDirective::inline(
            "google-analytics-config",
            format!(
                "window.dataLayer = window.dataLayer || [];\n\
                 function gtag(){{dataLayer.push(arguments);}}\n\
                 gtag('js', new Date());\n\
                 gtag('config', {id_literal}, {{ page_path: window.location.pathname }});"
            ),
        )
        .production_only(),
    ])
}

/// Distinct origins of the external scripts, in emission order.
pub fn preconnect_origins(scripts: &[ScriptDirective]) -> Vec<String> {
    let mut seen = HashSet::new();
    let mut out = Vec::new();
    for script in scripts {
        let ScriptSource::External(src) = &script.source else {
            continue;
        };
        let absolute = if src.starts_with("//") {
            format!("https:{src}")
        } else {
            src.clone()
        };
        let Ok(url) = Url::parse(&absolute) else {
            continue;
        };
        let origin = url.origin().ascii_serialization();
        if origin != "null" && seen.insert(origin.clone()) {
            out.push(origin);
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ids(scripts: &[ScriptDirective]) -> Vec<&str> {
        scripts.iter().map(|s| s.id.as_str()).collect()
    }

    fn position(scripts: &[ScriptDirective], id: &str) -> usize {
        scripts.iter().position(|s| s.id == id).unwrap()
    }

    fn production_config(id: &str) -> SiteConfig {
        SiteConfig {
            analytics_id: Some(id.to_string()),
            profile: BuildProfile::Production,
            ..SiteConfig::default()
        }
    }

    #[test]
    fn development_excludes_analytics() {
        let config = SiteConfig {
            analytics_id: Some("G-TEST123".to_string()),
            ..SiteConfig::default()
        };
        let catalog = ScriptCatalog::from_config(&config).unwrap();
        let planned = catalog.plan(BuildProfile::Development);
        assert!(planned.iter().all(|s| !s.is_analytics()));
        assert_eq!(
            ids(&planned),
            ["effective-gate-cpm", "ad-config", "high-performance-format"]
        );
    }

    #[test]
    fn production_orders_analytics_config_before_loader() {
        let config = production_config("G-TEST123");
        let catalog = ScriptCatalog::from_config(&config).unwrap();
        let planned = catalog.plan(config.profile);

        let analytics: Vec<&str> = planned
            .iter()
            .filter(|s| s.is_analytics())
            .map(|s| s.id.as_str())
            .collect();
        assert_eq!(analytics, ["google-analytics-config", "google-analytics"]);
        assert!(
            position(&planned, "google-analytics-config") < position(&planned, "google-analytics")
        );

        let config_script = &planned[position(&planned, "google-analytics-config")];
        let ScriptSource::Inline(payload) = &config_script.source else {
            panic!("analytics config should be inline");
        };
        assert!(payload.contains("\"G-TEST123\""));

        let loader = &planned[position(&planned, "google-analytics")];
        assert_eq!(
            loader.source,
            ScriptSource::External(
                "https://www.googletagmanager.com/gtag/js?id=G-TEST123".to_string()
            )
        );
    }

    #[test]
    fn missing_measurement_id_omits_analytics_in_production() {
        let config = SiteConfig {
            profile: BuildProfile::Production,
            ..SiteConfig::default()
        };
        let planned = ScriptCatalog::from_config(&config)
            .unwrap()
            .plan(config.profile);
        assert!(planned.iter().all(|s| !s.is_analytics()));
        assert_eq!(planned.len(), 3);
    }

    #[test]
    fn every_dependency_precedes_its_dependent() {
        let config = production_config("G-ABC");
        let planned = ScriptCatalog::from_config(&config)
            .unwrap()
            .plan(config.profile);
        for (i, script) in planned.iter().enumerate() {
            for dep in &script.depends_on {
                assert!(position(&planned, dep) < i, "{dep} must precede {}", script.id);
            }
        }
    }

    #[test]
    fn ordering_ignores_declaration_order() {
        let catalog = ScriptCatalog::new(vec![
            ScriptDirective::external("c", "https://c.example/c.js").after("b"),
            ScriptDirective::external("b", "https://b.example/b.js").after("a"),
            ScriptDirective::inline("a", "window.a = 1;"),
            ScriptDirective::inline("free", "window.free = 1;"),
        ])
        .unwrap();
        let planned = catalog.plan(BuildProfile::Development);
        assert_eq!(ids(&planned), ["a", "b", "c", "free"]);
    }

    #[test]
    fn dependent_of_omitted_script_is_omitted() {
        let catalog = ScriptCatalog::new(vec![
            ScriptDirective::inline("setup", "window.x = 1;").production_only(),
            ScriptDirective::external("reader", "https://r.example/r.js").after("setup"),
            ScriptDirective::external("other", "https://o.example/o.js"),
        ])
        .unwrap();
        assert_eq!(ids(&catalog.plan(BuildProfile::Development)), ["other"]);
        assert_eq!(
            ids(&catalog.plan(BuildProfile::Production)),
            ["setup", "reader", "other"]
        );
    }

    #[test]
    fn rejects_cycles() {
        let err = ScriptCatalog::new(vec![
            ScriptDirective::inline("a", "1").after("b"),
            ScriptDirective::inline("b", "2").after("a"),
        ])
        .unwrap_err()
        .to_string();
        assert!(err.contains("cycle"), "{err}");
    }

    #[test]
    fn rejects_duplicates_and_unknown_dependencies() {
        let dup = ScriptCatalog::new(vec![
            ScriptDirective::inline("a", "1"),
            ScriptDirective::inline("a", "2"),
        ]);
        assert!(dup.unwrap_err().to_string().contains("duplicate"));

        let unknown = ScriptCatalog::new(vec![ScriptDirective::inline("a", "1").after("nope")]);
        assert!(unknown.unwrap_err().to_string().contains("unknown"));

        let empty = ScriptCatalog::new(vec![ScriptDirective::external("a", " ")]);
        assert!(empty.unwrap_err().to_string().contains("empty src"));
    }

    #[test]
    fn rejects_dependency_that_runs_later() {
        let err = ScriptCatalog::new(vec![
            ScriptDirective::inline("late", "1").with_strategy(Strategy::Deferred),
            ScriptDirective::inline("early", "2").after("late"),
        ])
        .unwrap_err()
        .to_string();
        assert!(err.contains("runs later"), "{err}");
    }

    #[test]
    fn strategy_is_preserved() {
        let catalog = ScriptCatalog::new(vec![
            ScriptDirective::inline("sync", "1").with_strategy(Strategy::Synchronous),
            ScriptDirective::inline("lazy", "2").with_strategy(Strategy::Deferred),
        ])
        .unwrap();
        let planned = catalog.plan(BuildProfile::Development);
        assert_eq!(planned[0].strategy, Strategy::Synchronous);
        assert_eq!(planned[1].strategy, Strategy::Deferred);
    }

    #[test]
    fn preconnect_uses_external_origins_once() {
        let config = production_config("G-TEST123");
        let planned = ScriptCatalog::from_config(&config)
            .unwrap()
            .plan(config.profile);
        assert_eq!(
            preconnect_origins(&planned),
            [
                "https://pl28225690.effectivegatecpm.com",
                "https://www.highperformanceformat.com",
                "https://www.googletagmanager.com",
            ]
        );
    }
}
