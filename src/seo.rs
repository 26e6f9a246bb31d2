//! # SEO injection
//!
//! Admin-authored [`site_setting`] rows become an [`InjectionPlan`]: plain
//! data partitioned by where it goes in the page. [`render_fragments`] turns
//! one partition into markup.
//!
//! Meta tags and links are rebuilt from their parsed attributes and JSON-LD
//! from parsed JSON, so none of those can smuggle markup in. `script` and
//! `custom_html` values can only be emitted verbatim, which happens only for
//! types the [`TrustPolicy`] lists.

use std::collections::HashSet;
use std::fmt;
use std::str::FromStr;

use maud::{Markup, PreEscaped, html};
use scraper::{Html, Selector};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::warn;

use crate::config::SeoConfig;
use crate::models::site_setting;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum InjectionPoint {
    Head,
    BodyStart,
    BodyEnd,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SettingType {
    MetaTag,
    Script,
    Link,
    JsonLd,
    CustomHtml,
}

#[derive(Debug, Error, PartialEq, Eq)]
#[error("unknown {kind} '{value}'")]
pub struct UnknownKind {
    kind: &'static str,
    value: String,
}

impl FromStr for InjectionPoint {
    type Err = UnknownKind;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "head" => Ok(Self::Head),
            "body_start" => Ok(Self::BodyStart),
            "body_end" => Ok(Self::BodyEnd),
            _ => Err(UnknownKind {
                kind: "injection point",
                value: s.to_string(),
            }),
        }
    }
}

impl SettingType {
    pub fn as_str(&self) -> &'static str {
        match self {
            SettingType::MetaTag => "meta_tag",
            SettingType::Script => "script",
            SettingType::Link => "link",
            SettingType::JsonLd => "json_ld",
            SettingType::CustomHtml => "custom_html",
        }
    }
}

impl fmt::Display for SettingType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SettingType {
    type Err = UnknownKind;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "meta_tag" => Ok(Self::MetaTag),
            "script" => Ok(Self::Script),
            "link" => Ok(Self::Link),
            "json_ld" => Ok(Self::JsonLd),
            "custom_html" => Ok(Self::CustomHtml),
            _ => Err(UnknownKind {
                kind: "setting type",
                value: s.to_string(),
            }),
        }
    }
}

/// Which setting types may be emitted as raw markup.
#[derive(Debug, Clone, Default)]
pub struct TrustPolicy {
    trusted: HashSet<SettingType>,
}

impl TrustPolicy {
    pub fn new(trusted: impl IntoIterator<Item = SettingType>) -> Self {
        Self {
            trusted: trusted.into_iter().collect(),
        }
    }

    /// Nothing raw is ever emitted.
    pub fn strict() -> Self {
        Self::default()
    }

    pub fn from_config(config: &SeoConfig) -> Self {
        Self::new(config.trusted_types.iter().copied())
    }

    pub fn trusts(&self, setting_type: SettingType) -> bool {
        self.trusted.contains(&setting_type)
    }
}

/// A single piece of injected markup, held as data.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Fragment {
    Meta(Vec<(String, String)>),
    Link(Vec<(String, String)>),
    /// Compact JSON, already re-serialized
    JsonLd(String),
    /// Trusted markup emitted as-is
    Raw(String),
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct InjectionPlan {
    pub head: Vec<Fragment>,
    pub body_start: Vec<Fragment>,
    pub body_end: Vec<Fragment>,
}

/// Emitted in this order.
const META_ATTRS: &[&str] = &["name", "property", "itemprop", "charset", "content"];
const LINK_ATTRS: &[&str] = &["rel", "href", "type", "sizes", "hreflang", "media", "title"];

impl InjectionPlan {
    pub fn build(settings: &[site_setting::Model], policy: &TrustPolicy) -> Self {
        let mut ordered: Vec<&site_setting::Model> =
            settings.iter().filter(|s| s.is_active).collect();
        ordered.sort_by(|a, b| a.sort_order.cmp(&b.sort_order).then_with(|| a.key.cmp(&b.key)));

        let mut plan = Self::default();
        for setting in ordered {
            let point = match setting.injection_point.parse::<InjectionPoint>() {
                Ok(point) => point,
                Err(err) => {
                    warn!(key = %setting.key, error = %err, "Skipping site setting");
                    continue;
                }
            };
            let setting_type = match setting.setting_type.parse::<SettingType>() {
                Ok(setting_type) => setting_type,
                Err(err) => {
                    warn!(key = %setting.key, error = %err, "Skipping site setting");
                    continue;
                }
            };
            if let Some(fragment) = fragment_for(setting, setting_type, policy) {
                plan.fragments_mut(point).push(fragment);
            }
        }
        plan
    }

    pub fn fragments(&self, point: InjectionPoint) -> &[Fragment] {
        match point {
            InjectionPoint::Head => &self.head,
            InjectionPoint::BodyStart => &self.body_start,
            InjectionPoint::BodyEnd => &self.body_end,
        }
    }

    fn fragments_mut(&mut self, point: InjectionPoint) -> &mut Vec<Fragment> {
        match point {
            InjectionPoint::Head => &mut self.head,
            InjectionPoint::BodyStart => &mut self.body_start,
            InjectionPoint::BodyEnd => &mut self.body_end,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.head.is_empty() && self.body_start.is_empty() && self.body_end.is_empty()
    }
}

fn fragment_for(
    setting: &site_setting::Model,
    setting_type: SettingType,
    policy: &TrustPolicy,
) -> Option<Fragment> {
    match setting_type {
        SettingType::MetaTag => match tag_attributes(&setting.value, "meta", META_ATTRS) {
            Some(attrs) => Some(Fragment::Meta(attrs)),
            // A bare value is the content for a meta tag named after the key.
            None if !setting.value.trim_start().starts_with('<') => {
                let name_attr = if setting.key.contains(':') { "property" } else { "name" };
                Some(Fragment::Meta(vec![
                    (name_attr.to_string(), setting.key.clone()),
                    ("content".to_string(), setting.value.trim().to_string()),
                ]))
            }
            None => {
                warn!(key = %setting.key, "Meta tag setting has no usable attributes");
                None
            }
        },
        SettingType::Link => {
            let attrs = tag_attributes(&setting.value, "link", LINK_ATTRS)
                .filter(|attrs| attrs.iter().any(|(name, _)| name == "href"));
            if attrs.is_none() {
                warn!(key = %setting.key, "Link setting has no usable href");
            }
            attrs.map(Fragment::Link)
        }
        SettingType::JsonLd => match serde_json::from_str::<serde_json::Value>(&setting.value) {
            Ok(value) => Some(Fragment::JsonLd(value.to_string().replace("</", "<\\/"))),
            Err(err) => {
                warn!(key = %setting.key, error = %err, "Skipping invalid JSON-LD setting");
                None
            }
        },
        SettingType::Script | SettingType::CustomHtml => {
            if !policy.trusts(setting_type) {
                warn!(
                    key = %setting.key,
                    setting_type = %setting_type,
                    "Untrusted raw setting dropped"
                );
                return None;
            }
            let value = setting.value.trim();
            if setting_type == SettingType::Script && !value.starts_with('<') {
                Some(Fragment::Raw(format!("<script>{value}</script>")))
            } else {
                Some(Fragment::Raw(value.to_string()))
            }
        }
    }
}

/// Allowlisted attributes of the first `tag` element in `value`.
fn tag_attributes(value: &str, tag: &str, allowed: &[&str]) -> Option<Vec<(String, String)>> {
    let fragment = Html::parse_fragment(value);
    let selector = Selector::parse(tag).ok()?;
    let element = fragment.select(&selector).next()?;

    let attrs: Vec<(String, String)> = allowed
        .iter()
        .filter_map(|name| Some((*name, element.value().attr(name)?)))
        .filter(|(name, value)| *name != "href" || is_safe_href(value))
        .map(|(name, value)| (name.to_string(), value.to_string()))
        .collect();
    (!attrs.is_empty()).then_some(attrs)
}

fn is_safe_href(value: &str) -> bool {
    let lowered = value.trim().to_ascii_lowercase();
    lowered.starts_with("https://")
        || lowered.starts_with("http://")
        || (lowered.starts_with('/') && !lowered.starts_with("//"))
}

fn void_tag(name: &str, attrs: &[(String, String)]) -> Markup {
    let mut tag = format!("<{name}");
    for (attr, value) in attrs {
        tag.push(' ');
        tag.push_str(attr);
        tag.push_str("=\"");
        for ch in value.chars() {
            match ch {
                '&' => tag.push_str("&amp;"),
                '<' => tag.push_str("&lt;"),
                '>' => tag.push_str("&gt;"),
                '"' => tag.push_str("&quot;"),
                _ => tag.push(ch),
            }
        }
        tag.push('"');
    }
    tag.push('>');
    PreEscaped(tag)
}

/// Renders one partition of a plan.
pub fn render_fragments(fragments: &[Fragment]) -> Markup {
    html! {
        @for fragment in fragments {
            @match fragment {
                Fragment::Meta(attrs) => (void_tag("meta", attrs)),
                Fragment::Link(attrs) => (void_tag("link", attrs)),
                Fragment::JsonLd(json) => script type="application/ld+json" { (PreEscaped(json)) },
                Fragment::Raw(markup) => (PreEscaped(markup)),
            }
        }
    }
}
