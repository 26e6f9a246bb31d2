use maud::{Markup, html};

use crate::promotions::VisiblePromotion;

pub fn promotions_page(promotions: &[VisiblePromotion]) -> Markup {
    html! {
        h1 { "Promotions" }
        @if promotions.is_empty() {
            p.empty-state { "There are no promotions running right now. Check back soon." }
        }
        div.promotion-grid {
            @for visible in promotions {
                @let promotion = &visible.promotion;
                article.card.promotion {
                    @if let Some(image) = &promotion.image_url {
                        img src=(image) alt=(promotion.title) loading="lazy";
                    }
                    h2 { (promotion.title) }
                    @if visible.upcoming {
                        span.badge { "Coming soon" }
                    }
                    p.dates {
                        (promotion.starts_on.format("%-d %b %Y").to_string())
                        " to "
                        (promotion.ends_on.format("%-d %b %Y").to_string())
                    }
                    @if let Some(description) = &promotion.description {
                        p { (description) }
                    }
                }
            }
        }
    }
}
