use serde::Serialize;

use crate::metadata::MetadataRecord;
use crate::page::{AdPlacement, FeatureCard, Node, Panel, TextStyle, AD_BREAKPOINT_PX};
use crate::scripts::{ScriptDirective, ScriptSource, Strategy, preconnect_origins};
use crate::viewport::ViewportConfig;

/// Everything needed to serialize one landing page response.
#[derive(Debug, Clone)]
pub struct Document {
    pub metadata: MetadataRecord,
    pub viewport: ViewportConfig,
    pub scripts: Vec<ScriptDirective>,
    pub body: Vec<Node>,
}

impl Document {
    pub fn to_html(&self) -> String {
        let mut out = String::new();
        out.push_str("<!doctype html>\n<html lang=\"en\">\n<head>\n");
        render_head(&mut out, self);
        out.push_str("</head>\n<body>\n<main>\n");
        for node in &self.body {
            render_node(&mut out, node);
        }
        out.push_str("</main>\n");
        render_script_queue(&mut out, &self.scripts);
        out.push_str("</body>\n</html>\n");
        out
    }
}

fn render_head(out: &mut String, doc: &Document) {
    let meta = &doc.metadata;
    let viewport = &doc.viewport;

    out.push_str("<meta charset=\"utf-8\">\n");
    push_meta(out, "viewport", &viewport.meta_content());
    push_meta(out, "theme-color", viewport.theme_color);
    out.push_str(&format!(
        "<title>{}</title>\n",
        html_escape(&meta.title.resolved())
    ));
    push_meta(out, "description", &meta.description);
    push_meta(out, "application-name", &meta.application_name);
    for author in &meta.authors {
        push_meta(out, "author", &author.name);
    }
    push_meta(out, "keywords", &meta.keywords.join(","));
    push_meta(out, "category", &meta.category);
    push_meta(out, "robots", &meta.robots.content());
    push_meta(out, "googlebot", &meta.robots.google_bot_content());
    if let Some(token) = &meta.verification {
        push_meta(out, "google-site-verification", token);
    }

    push_link(out, "canonical", &meta.canonical_url(), &[]);
    for (lang, path) in &meta.languages {
        push_link(out, "alternate", &meta.absolute(path), &[("hreflang", lang.as_str())]);
    }
    push_link(out, "manifest", &meta.manifest, &[]);
    for icon in &meta.icons {
        let mut attrs: Vec<(&str, &str)> = Vec::new();
        if let Some(mime) = &icon.mime {
            attrs.push(("type", mime.as_str()));
        }
        if let Some(sizes) = &icon.sizes {
            attrs.push(("sizes", sizes.as_str()));
        }
        if let Some(color) = &icon.color {
            attrs.push(("color", color.as_str()));
        }
        push_link(out, &icon.rel, &icon.href, &attrs);
    }
    for origin in preconnect_origins(&doc.scripts) {
        push_link(out, "preconnect", &origin, &[]);
    }

    let og = &meta.open_graph;
    push_property(out, "og:title", &og.title);
    push_property(out, "og:description", &og.description);
    push_property(out, "og:url", &og.url);
    push_property(out, "og:site_name", &og.site_name);
    for image in &og.images {
        push_property(out, "og:image", &meta.absolute(&image.url));
        push_property(out, "og:image:width", &image.width.to_string());
        push_property(out, "og:image:height", &image.height.to_string());
        push_property(out, "og:image:alt", &image.alt);
    }
    push_property(out, "og:type", &og.kind);

    let twitter = &meta.twitter;
    push_meta(out, "twitter:card", &twitter.card);
    push_meta(out, "twitter:site", &twitter.site);
    push_meta(out, "twitter:creator", &twitter.creator);
    push_meta(out, "twitter:title", &twitter.title);
    push_meta(out, "twitter:description", &twitter.description);
    for image in &twitter.images {
        push_meta(out, "twitter:image", &meta.absolute(image));
    }

    push_meta(out, "apple-mobile-web-app-capable", "yes");
    push_meta(
        out,
        "apple-mobile-web-app-status-bar-style",
        "black-translucent",
    );
    push_meta(out, "format-detection", "telephone=no");
    push_meta(out, "mobile-web-app-capable", "yes");

    out.push_str(&format!("<style>{}</style>\n", ad_visibility_css()));

    for script in doc
        .scripts
        .iter()
        .filter(|s| s.strategy == Strategy::Synchronous)
    {
        render_blocking_script(out, script);
    }
}

fn push_meta(out: &mut String, name: &str, content: &str) {
    out.push_str(&format!(
        "<meta name=\"{}\" content=\"{}\">\n",
        html_escape(name),
        html_escape(content)
    ));
}

fn push_property(out: &mut String, property: &str, content: &str) {
    out.push_str(&format!(
        "<meta property=\"{}\" content=\"{}\">\n",
        html_escape(property),
        html_escape(content)
    ));
}

fn push_link(out: &mut String, rel: &str, href: &str, attrs: &[(&str, &str)]) {
    out.push_str(&format!(
        "<link rel=\"{}\" href=\"{}\"",
        html_escape(rel),
        html_escape(href)
    ));
    for (name, value) in attrs {
        out.push_str(&format!(" {name}=\"{}\"", html_escape(value)));
    }
    out.push_str(">\n");
}

pub fn ad_visibility_css() -> String {
    format!(
        ".ad-slot--desktop{{display:none}}.ad-slot--mobile{{display:flex}}\
         @media (min-width:{AD_BREAKPOINT_PX}px){{.ad-slot--desktop{{display:flex}}.ad-slot--mobile{{display:none}}}}"
    )
}

fn render_node(out: &mut String, node: &Node) {
    match node {
        Node::Section { role, children } => {
            out.push_str(&format!(
                "<section class=\"section section--{}\">\n",
                role.as_str()
            ));
            for child in children {
                render_node(out, child);
            }
            out.push_str("</section>\n");
        }
        Node::Panel(panel) => render_panel(out, panel),
        Node::FeatureCard(card) => render_feature(out, card),
        Node::AdPlacement(placement) => render_ad_placement(out, placement),
        Node::Action(action) => {
            out.push_str(&format!(
                "<a class=\"action action--primary\" href=\"{}\">{}</a>\n",
                html_escape(action.target()),
                html_escape(&action.label)
            ));
        }
        Node::Mount(mount) => {
            out.push_str(&format!(
                "<div data-component=\"{}\"></div>\n",
                mount.as_str()
            ));
        }
        Node::Ornament(icon) => {
            out.push_str(&format!(
                "<span class=\"ornament\" data-icon=\"{}\" aria-hidden=\"true\"></span>\n",
                icon.token()
            ));
        }
    }
}

fn render_panel(out: &mut String, panel: &Panel) {
    let (tag, class) = match panel.style {
        TextStyle::Headline => ("h1", "headline"),
        TextStyle::Subheading => ("h2", "subheading"),
        TextStyle::Lead => ("p", "lead"),
    };
    out.push_str(&format!("<{tag} class=\"{class}\">"));
    for segment in &panel.segments {
        if segment.accent {
            out.push_str(&format!(
                "<span class=\"accent\">{}</span>",
                html_escape(&segment.text)
            ));
        } else {
            out.push_str(&html_escape(&segment.text));
        }
    }
    out.push_str(&format!("</{tag}>\n"));
}

fn render_feature(out: &mut String, card: &FeatureCard) {
    out.push_str("<article class=\"feature\">\n");
    out.push_str(&format!(
        "<span class=\"icon\" data-icon=\"{}\" aria-hidden=\"true\"></span>\n",
        card.icon.token()
    ));
    out.push_str(&format!("<h3>{}</h3>\n", html_escape(&card.title)));
    out.push_str(&format!("<p>{}</p>\n", html_escape(&card.description)));
    out.push_str("</article>\n");
}

fn render_ad_placement(out: &mut String, placement: &AdPlacement) {
    out.push_str(&format!(
        "<div class=\"ad\" data-placement=\"{}\">\n",
        placement.placement.as_str()
    ));
    for slot in placement.slots() {
        out.push_str(&format!(
            "<div class=\"ad-slot ad-slot--{}\" style=\"max-width:{}px;height:{}px\"><div data-banner-id=\"{}\"></div></div>\n",
            slot.variant.as_str(),
            slot.width,
            slot.height,
            html_escape(&slot.banner_id)
        ));
    }
    out.push_str("</div>\n");
}

fn render_blocking_script(out: &mut String, script: &ScriptDirective) {
    match &script.source {
        ScriptSource::External(src) => out.push_str(&format!(
            "<script id=\"{}\" src=\"{}\"></script>\n",
            html_escape(&script.id),
            html_escape(src)
        )),
        ScriptSource::Inline(payload) => out.push_str(&format!(
            "<script id=\"{}\">{}</script>\n",
            html_escape(&script.id),
            escape_script_text(payload)
        )),
    }
}

/// Starts after-interactive scripts once the DOM is parsed and deferred ones
/// after `load`. Each external script waits for the previous one to settle;
/// a failed load moves on to the next.
const SCRIPT_LOADER_JS: &str = r#"(function (queues) {
  var interactiveDone = false, loaded = false, deferredStarted = false;
  function run(list, i, done) {
    if (i >= list.length) { done(); return; }
    var item = list[i];
    var el = document.createElement("script");
    var next = function () { run(list, i + 1, done); };
    el.id = item.id;
    if (item.src) {
      el.src = item.src;
      el.onload = next;
      el.onerror = next;
      document.body.appendChild(el);
    } else {
      el.text = item.inline;
      document.body.appendChild(el);
      next();
    }
  }
  function startDeferred() {
    if (interactiveDone && loaded && !deferredStarted) {
      deferredStarted = true;
      run(queues.deferred, 0, function () {});
    }
  }
  function startInteractive() {
    run(queues.interactive, 0, function () { interactiveDone = true; startDeferred(); });
  }
  if (document.readyState === "loading") {
    document.addEventListener("DOMContentLoaded", startInteractive);
  } else {
    startInteractive();
  }
  if (document.readyState === "complete") {
    loaded = true;
  } else {
    window.addEventListener("load", function () { loaded = true; startDeferred(); });
  }
})"#;

#[derive(Debug, Serialize)]
struct QueuedScript<'a> {
    id: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    src: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    inline: Option<&'a str>,
}

#[derive(Debug, Default, Serialize)]
struct ScriptQueues<'a> {
    interactive: Vec<QueuedScript<'a>>,
    deferred: Vec<QueuedScript<'a>>,
}

fn render_script_queue(out: &mut String, scripts: &[ScriptDirective]) {
    let mut queues = ScriptQueues::default();
    for script in scripts {
        let (src, inline) = match &script.source {
            ScriptSource::External(src) => (Some(src.as_str()), None),
            ScriptSource::Inline(payload) => (None, Some(payload.as_str())),
        };
        let queued = QueuedScript {
            id: &script.id,
            src,
            inline,
        };
        match script.strategy {
            Strategy::Synchronous => {}
            Strategy::AfterInteractive => queues.interactive.push(queued),
            Strategy::Deferred => queues.deferred.push(queued),
        }
    }
    if queues.interactive.is_empty() && queues.deferred.is_empty() {
        return;
    }

    // Third-party scripts are optional; the page renders without them.
    let json = match serde_json::to_string(&queues) {
        Ok(json) => json,
        Err(err) => {
            tracing::error!(%err, "encode script queue; omitting third-party scripts");
            return;
        }
    };
    out.push_str(&format!(
        "<script id=\"script-loader\">{SCRIPT_LOADER_JS}({});</script>\n",
        escape_script_text(&json)
    ));
}

fn escape_script_text(input: &str) -> String {
    input.replace("</", "<\\/")
}

pub fn html_escape(input: &str) -> String {
    input
        .replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&#39;")
}
