//! # HTML views
//!
//! Pure `maud` renderers. Handlers gather the data, these functions only turn
//! it into markup.

use maud::{DOCTYPE, Markup, html};

use crate::seo::{InjectionPlan, render_fragments};

pub mod blog;
pub mod contact;
pub mod directory;
pub mod home;
pub mod movies;
pub mod promotions;

const CSS: &str = "body{font-family:system-ui,sans-serif;margin:0}\
main{max-width:960px;margin:0 auto;padding:1rem}\
.site-nav a{margin-right:1rem}\
.banner{padding:.75rem 1rem;background:#fff4ce}\
.card{border:1px solid #ddd;border-radius:6px;padding:1rem;margin:.5rem 0}\
.badge{font-size:.75rem;padding:0 .4rem;border-radius:4px;background:#eee}\
.field-error{color:#a00}";

/// Top-level navigation entries.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Section {
    Home,
    Directory,
    Blog,
    Movies,
    Promotions,
    Contact,
}

impl Section {
    const ALL: [Section; 6] = [
        Section::Home,
        Section::Directory,
        Section::Blog,
        Section::Movies,
        Section::Promotions,
        Section::Contact,
    ];

    fn label(&self) -> &'static str {
        match self {
            Section::Home => "Home",
            Section::Directory => "Store Directory",
            Section::Blog => "News & Events",
            Section::Movies => "Movies",
            Section::Promotions => "Promotions",
            Section::Contact => "Contact",
        }
    }

    fn href(&self) -> &'static str {
        match self {
            Section::Home => "/",
            Section::Directory => "/directory",
            Section::Blog => "/blog",
            Section::Movies => "/movies",
            Section::Promotions => "/promotions",
            Section::Contact => "/contact",
        }
    }
}

/// Page chrome shared by every view.
#[derive(Debug, Clone, Copy)]
pub struct Layout<'a> {
    pub site_name: &'a str,
    pub title: &'a str,
    pub description: Option<&'a str>,
    pub section: Section,
    pub seo: &'a InjectionPlan,
    /// Some content on the page came from bundled data.
    pub offline: bool,
}

pub fn page(layout: &Layout<'_>, content: Markup) -> Markup {
    let full_title = if layout.section == Section::Home {
        layout.site_name.to_string()
    } else {
        format!("{} | {}", layout.title, layout.site_name)
    };

    html! {
        (DOCTYPE)
        html lang="en" {
            head {
                meta charset="UTF-8";
                meta name="viewport" content="width=device-width, initial-scale=1.0";
                title { (full_title) }
                @if let Some(description) = layout.description {
                    meta name="description" content=(description);
                }
                style { (CSS) }
                (render_fragments(&layout.seo.head))
            }
            body {
                (render_fragments(&layout.seo.body_start))
                header.site-header {
                    a.site-name href="/" { (layout.site_name) }
                    nav.site-nav {
                        @for section in Section::ALL {
                            a href=(section.href())
                                aria-current=[(section == layout.section).then_some("page")] {
                                (section.label())
                            }
                        }
                    }
                }
                @if layout.offline {
                    (offline_banner())
                }
                main {
                    (content)
                }
                footer.site-footer {
                    p { "© " (layout.site_name) }
                }
                (render_fragments(&layout.seo.body_end))
            }
        }
    }
}

pub fn offline_banner() -> Markup {
    html! {
        div.banner.banner-offline role="status" {
            "We're having trouble reaching our latest information, so you're seeing saved content. "
            "Some details may be out of date."
        }
    }
}

/// Generic not-found body.
pub fn not_found(message: &str) -> Markup {
    html! {
        section.not-found {
            h1 { "Page not found" }
            p { (message) }
            a href="/" { "Back to home" }
        }
    }
}
