//! Landing page content tree.
//!
//! The tree is fixed; [`compose_landing`] builds a fresh copy for every
//! document and [`crate::render`] serializes it.

/// Invoice creation lives behind this route; every call to action targets it.
pub const INVOICE_ROUTE: &str = "/new";

/// Desktop ad slots are visible at or above this viewport width.
pub const AD_BREAKPOINT_PX: u32 = 768;

pub const AD_BANNER_ID: &str = "6101629";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Icon {
    Plus,
    Rocket,
    Infinity,
    NotebookText,
    Receipt,
    Hourglass,
    CodeXml,
}

impl Icon {
    pub fn token(self) -> &'static str {
        match self {
            Self::Plus => "plus",
            Self::Rocket => "rocket",
            Self::Infinity => "infinity",
            Self::NotebookText => "notebook-text",
            Self::Receipt => "receipt",
            Self::Hourglass => "hourglass",
            Self::CodeXml => "code-xml",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TextStyle {
    Headline,
    Subheading,
    Lead,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TextSegment {
    pub text: String,
    pub accent: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Panel {
    pub style: TextStyle,
    pub segments: Vec<TextSegment>,
}

impl Panel {
    fn plain(style: TextStyle, text: &str) -> Self {
        Self {
            style,
            segments: vec![TextSegment {
                text: text.to_string(),
                accent: false,
            }],
        }
    }

    pub fn text(&self) -> String {
        self.segments.iter().map(|s| s.text.as_str()).collect()
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FeatureCard {
    pub icon: Icon,
    pub title: String,
    pub description: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Placement {
    Top,
    Middle,
    Bottom,
}

impl Placement {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Top => "top",
            Self::Middle => "middle",
            Self::Bottom => "bottom",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SlotVariant {
    Desktop,
    Mobile,
}

impl SlotVariant {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Desktop => "desktop",
            Self::Mobile => "mobile",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AdSlotSpec {
    pub placement: Placement,
    pub variant: SlotVariant,
    pub width: u32,
    pub height: u32,
    pub banner_id: String,
}

impl AdSlotSpec {
    pub fn visible_at(&self, viewport_width: u32) -> bool {
        let wide = viewport_width >= AD_BREAKPOINT_PX;
        match self.variant {
            SlotVariant::Desktop => wide,
            SlotVariant::Mobile => !wide,
        }
    }
}

/// Both variants of one placement. Holding them together keeps either from
/// being dropped on its own.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AdPlacement {
    pub placement: Placement,
    pub desktop: AdSlotSpec,
    pub mobile: AdSlotSpec,
}

impl AdPlacement {
    pub fn new(placement: Placement) -> Self {
        let slot = |variant, width, height| AdSlotSpec {
            placement,
            variant,
            width,
            height,
            banner_id: AD_BANNER_ID.to_string(),
        };
        Self {
            placement,
            desktop: slot(SlotVariant::Desktop, 728, 90),
            mobile: slot(SlotVariant::Mobile, 320, 100),
        }
    }

    pub fn slots(&self) -> [&AdSlotSpec; 2] {
        [&self.desktop, &self.mobile]
    }

    pub fn visible_at(&self, viewport_width: u32) -> Vec<&AdSlotSpec> {
        self.slots()
            .into_iter()
            .filter(|slot| slot.visible_at(viewport_width))
            .collect()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ActionVariant {
    Primary,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NavigationAction {
    target: &'static str,
    pub label: String,
    pub variant: ActionVariant,
}

impl NavigationAction {
    pub fn create_invoice(label: &str) -> Self {
        Self {
            target: INVOICE_ROUTE,
            label: label.to_string(),
            variant: ActionVariant::Primary,
        }
    }

    pub fn target(&self) -> &str {
        self.target
    }
}

/// Client components rendered elsewhere and mounted into the page.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mount {
    DemoPreview,
}

impl Mount {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::DemoPreview => "demo-preview",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SectionRole {
    Hero,
    Preview,
    Features,
    CallToAction,
}

impl SectionRole {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Hero => "hero",
            Self::Preview => "preview",
            Self::Features => "features",
            Self::CallToAction => "cta",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Node {
    Section { role: SectionRole, children: Vec<Node> },
    Panel(Panel),
    FeatureCard(FeatureCard),
    AdPlacement(AdPlacement),
    Action(NavigationAction),
    Mount(Mount),
    Ornament(Icon),
}

impl Node {
    fn section(role: SectionRole, children: Vec<Node>) -> Self {
        Self::Section { role, children }
    }

    fn feature(icon: Icon, title: &str, description: &str) -> Self {
        Self::FeatureCard(FeatureCard {
            icon,
            title: title.to_string(),
            description: description.to_string(),
        })
    }
}

pub fn compose_landing() -> Vec<Node> {
    vec![
        Node::AdPlacement(AdPlacement::new(Placement::Top)),
        Node::section(
            SectionRole::Hero,
            vec![
                Node::Panel(Panel {
                    style: TextStyle::Headline,
                    segments: vec![
                        TextSegment {
                            text: "Free ".to_string(),
                            accent: false,
                        },
                        TextSegment {
                            text: "Invoice Generator".to_string(),
                            accent: true,
                        },
                    ],
                }),
                Node::Ornament(Icon::Plus),
                Node::Action(NavigationAction::create_invoice("Generate Invoice")),
            ],
        ),
        Node::section(SectionRole::Preview, vec![Node::Mount(Mount::DemoPreview)]),
        Node::AdPlacement(AdPlacement::new(Placement::Middle)),
        Node::Panel(Panel::plain(
            TextStyle::Subheading,
            "Here's why you'll love our Free Invoice Generator",
        )),
        Node::section(
            SectionRole::Features,
            vec![
                Node::Ornament(Icon::Plus),
                Node::feature(
                    Icon::Rocket,
                    "Fast & Easy",
                    "Simply fill in the blanks and generate professional invoices in seconds",
                ),
                Node::feature(
                    Icon::Infinity,
                    "Free & Unlimited",
                    "Create as many invoices as you need, forever, at no cost.",
                ),
                Node::feature(
                    Icon::NotebookText,
                    "Beautiful Templates",
                    "Choose from a variety of modern and customizable invoice templates.",
                ),
                Node::feature(
                    Icon::Receipt,
                    "Get Paid Faster",
                    "Send invoices electronically with secure payment links for faster client payments.",
                ),
                Node::feature(
                    Icon::Hourglass,
                    "Save Time & Money",
                    "Ditch the spreadsheets and expensive invoicing software.",
                ),
                Node::feature(
                    Icon::CodeXml,
                    "Free & Open Source",
                    "Absolutely no cost, with the freedom to customize and adapt to your needs.",
                ),
                Node::Ornament(Icon::Plus),
            ],
        ),
        Node::section(
            SectionRole::CallToAction,
            vec![
                Node::Panel(Panel::plain(
                    TextStyle::Lead,
                    "Stop wasting time and start getting paid what you deserve. Try our Free Invoice",
                )),
                Node::Action(NavigationAction::create_invoice("Generate Today!")),
            ],
        ),
        Node::AdPlacement(AdPlacement::new(Placement::Bottom)),
    ]
}

/// Depth-first, document order.
pub fn walk<'a>(nodes: &'a [Node], visit: &mut dyn FnMut(&'a Node)) {
    for node in nodes {
        visit(node);
        if let Node::Section { children, .. } = node {
            walk(children, visit);
        }
    }
}

pub fn navigation_actions(nodes: &[Node]) -> Vec<&NavigationAction> {
    let mut out = Vec::new();
    walk(nodes, &mut |node| {
        if let Node::Action(action) = node {
            out.push(action);
        }
    });
    out
}

pub fn ad_placements(nodes: &[Node]) -> Vec<&AdPlacement> {
    let mut out = Vec::new();
    walk(nodes, &mut |node| {
        if let Node::AdPlacement(placement) = node {
            out.push(placement);
        }
    });
    out
}
