//! Allowlist HTML sanitizer for CMS post bodies.

use scraper::{ElementRef, Html, Node};

/// Elements kept (with allowlisted attributes).
const ALLOWED_TAGS: &[&str] = &[
    "a", "b", "blockquote", "br", "code", "div", "em", "figcaption", "figure", "h1", "h2", "h3",
    "h4", "h5", "h6", "hr", "i", "img", "li", "ol", "p", "pre", "s", "span", "strong", "sub",
    "sup", "table", "tbody", "td", "th", "thead", "tr", "u", "ul",
];

/// Elements dropped together with everything inside them.
const DROPPED_TAGS: &[&str] = &[
    "script", "style", "iframe", "object", "embed", "noscript", "template", "svg", "math", "form",
    "textarea", "select", "button", "input", "link", "meta", "base", "title", "head",
];

const VOID_TAGS: &[&str] = &["br", "hr", "img"];

const URL_SCHEMES: &[&str] = &["http", "https", "mailto", "tel"];

/// Attributes kept on `tag`, in output order.
fn allowed_attributes(tag: &str) -> &'static [&'static str] {
    match tag {
        "a" => &["href", "title"],
        "img" => &["src", "alt", "title", "width", "height"],
        "td" | "th" => &["colspan", "rowspan"],
        _ => &[],
    }
}

/// Whether a link target is a relative reference or uses a permitted scheme.
fn url_allowed(value: &str) -> bool {
    let compact: String = value
        .chars()
        .filter(|c| !c.is_whitespace() && !c.is_control())
        .collect::<String>()
        .to_ascii_lowercase();

    match compact.find(':') {
        None => true,
        Some(colon) => {
            // A colon after the first path, query or fragment delimiter is not a scheme.
            if compact[..colon].contains(['/', '?', '#']) {
                return true;
            }
            URL_SCHEMES.contains(&&compact[..colon])
        }
    }
}

/// Rewrites `html` keeping only allowlisted markup.
///
/// Unknown elements are unwrapped (their text survives), active content is
/// dropped entirely, and event handler, style and `javascript:` attributes
/// never make it through.
pub fn sanitize_html(html: &str) -> String {
    let fragment = Html::parse_fragment(html);
    let mut out = String::with_capacity(html.len());
    write_children(fragment.root_element(), &mut out);
    out
}

/// Text content of an HTML fragment with whitespace collapsed.
pub fn plain_text(html: &str) -> String {
    let fragment = Html::parse_fragment(html);
    let mut text = String::new();
    collect_text(fragment.root_element(), &mut text);
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

fn collect_text(parent: ElementRef<'_>, out: &mut String) {
    for child in parent.children() {
        match child.value() {
            Node::Text(text) => out.push_str(text),
            Node::Element(element) => {
                if DROPPED_TAGS.contains(&element.name()) {
                    continue;
                }
                if let Some(child) = ElementRef::wrap(child) {
                    out.push(' ');
                    collect_text(child, out);
                    out.push(' ');
                }
            }
            _ => {}
        }
    }
}

fn write_children(parent: ElementRef<'_>, out: &mut String) {
    for child in parent.children() {
        match child.value() {
            Node::Text(text) => out.push_str(&escape_text(text)),
            Node::Element(element) => {
                let name = element.name();
                if DROPPED_TAGS.contains(&name) {
                    continue;
                }
                let Some(child) = ElementRef::wrap(child) else {
                    continue;
                };
                if !ALLOWED_TAGS.contains(&name) {
                    write_children(child, out);
                    continue;
                }

                out.push('<');
                out.push_str(name);
                for attr in allowed_attributes(name) {
                    let Some(value) = element.attr(attr) else {
                        continue;
                    };
                    if matches!(*attr, "href" | "src") && !url_allowed(value) {
                        continue;
                    }
                    out.push(' ');
                    out.push_str(attr);
                    out.push_str("=\"");
                    out.push_str(&escape_attr(value));
                    out.push('"');
                }
                out.push('>');

                if VOID_TAGS.contains(&name) {
                    continue;
                }
                write_children(child, out);
                out.push_str("</");
                out.push_str(name);
                out.push('>');
            }
            _ => {}
        }
    }
}

fn escape_text(raw: &str) -> String {
    let mut escaped = String::with_capacity(raw.len());
    for ch in raw.chars() {
        match ch {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            _ => escaped.push(ch),
        }
    }
    escaped
}

fn escape_attr(raw: &str) -> String {
    escape_text(raw).replace('"', "&quot;")
}
