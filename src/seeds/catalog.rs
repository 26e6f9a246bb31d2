use chrono::{NaiveDate, TimeZone, Utc};
use sea_orm::prelude::DateTimeWithTimeZone;
use serde_json::json;

use crate::cinema::{CinemaInfo, CinemaSchedule, Movie, PriceTier};
use crate::models::{post, post_category, promotion, tenant, tenant_category};

pub const CATEGORY_FOOD: i32 = 1;
pub const CATEGORY_FASHION: i32 = 2;
pub const CATEGORY_ELECTRONICS: i32 = 3;
pub const CATEGORY_HEALTH_BEAUTY: i32 = 4;
pub const CATEGORY_ENTERTAINMENT: i32 = 5;
pub const CATEGORY_SERVICES: i32 = 6;

const POST_NEWS: i32 = 1;
const POST_EVENTS: i32 = 2;
const POST_OFFERS: i32 = 3;

fn at(year: i32, month: u32, day: u32, hour: u32, minute: u32) -> DateTimeWithTimeZone {
    Utc.with_ymd_and_hms(year, month, day, hour, minute, 0)
        .single()
        .unwrap_or_default()
        .fixed_offset()
}

fn date(year: i32, month: u32, day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(year, month, day).unwrap_or_default()
}

pub fn tenant_categories() -> Vec<tenant_category::Model> {
    [
        (CATEGORY_FOOD, "food-beverage", "Food & Beverage", "utensils", 3, 1),
        (CATEGORY_FASHION, "fashion", "Fashion", "shirt", 3, 2),
        (CATEGORY_ELECTRONICS, "electronics", "Electronics", "plug", 2, 3),
        (CATEGORY_HEALTH_BEAUTY, "health-beauty", "Health & Beauty", "sparkles", 2, 4),
        (CATEGORY_ENTERTAINMENT, "entertainment", "Entertainment", "film", 2, 5),
        (CATEGORY_SERVICES, "services", "Services", "info", 2, 6),
    ]
    .into_iter()
    .map(
        |(id, name, display_name, icon, tenant_count, sort_order)| tenant_category::Model {
            id,
            name: name.to_string(),
            display_name: display_name.to_string(),
            icon: Some(icon.to_string()),
            tenant_count,
            sort_order,
        },
    )
    .collect()
}

struct TenantSeed {
    id: i32,
    name: &'static str,
    brand_name: Option<&'static str>,
    category_id: i32,
    floor: &'static str,
    is_featured: bool,
    is_new: bool,
    description: &'static str,
    is_active: bool,
}

const TENANTS: &[TenantSeed] = &[
    TenantSeed {
        id: 1,
        name: "Pizza Hut",
        brand_name: Some("Yum! Brands"),
        category_id: CATEGORY_FOOD,
        floor: "L2",
        is_featured: true,
        is_new: false,
        description: "Pan pizzas, pasta and wings for dine-in or takeaway.",
        is_active: true,
    },
    TenantSeed {
        id: 2,
        name: "Starbucks",
        brand_name: None,
        category_id: CATEGORY_FOOD,
        floor: "G",
        is_featured: true,
        is_new: false,
        description: "Handcrafted coffee, teas and pastries.",
        is_active: true,
    },
    TenantSeed {
        id: 3,
        name: "Sushi Tei",
        brand_name: None,
        category_id: CATEGORY_FOOD,
        floor: "L2",
        is_featured: false,
        is_new: true,
        description: "Conveyor-belt sushi and Japanese set meals.",
        is_active: true,
    },
    TenantSeed {
        id: 4,
        name: "Zara",
        brand_name: Some("Inditex"),
        category_id: CATEGORY_FASHION,
        floor: "L1",
        is_featured: true,
        is_new: false,
        description: "Womenswear, menswear and kids' collections.",
        is_active: true,
    },
    TenantSeed {
        id: 5,
        name: "Uniqlo",
        brand_name: Some("Fast Retailing"),
        category_id: CATEGORY_FASHION,
        floor: "L1",
        is_featured: false,
        is_new: false,
        description: "Everyday basics and seasonal essentials.",
        is_active: true,
    },
    TenantSeed {
        id: 6,
        name: "Charles & Keith",
        brand_name: None,
        category_id: CATEGORY_FASHION,
        floor: "G",
        is_featured: false,
        is_new: true,
        description: "Shoes, bags and accessories.",
        is_active: true,
    },
    TenantSeed {
        id: 7,
        name: "Samsung Experience Store",
        brand_name: Some("Samsung"),
        category_id: CATEGORY_ELECTRONICS,
        floor: "L3",
        is_featured: false,
        is_new: false,
        description: "Phones, tablets, wearables and smart home devices.",
        is_active: true,
    },
    TenantSeed {
        id: 8,
        name: "Harvey Norman",
        brand_name: None,
        category_id: CATEGORY_ELECTRONICS,
        floor: "L3",
        is_featured: false,
        is_new: false,
        description: "Home appliances, computers and home entertainment.",
        is_active: true,
    },
    TenantSeed {
        id: 9,
        name: "Watsons",
        brand_name: Some("A.S. Watson"),
        category_id: CATEGORY_HEALTH_BEAUTY,
        floor: "G",
        is_featured: false,
        is_new: false,
        description: "Pharmacy, health and personal care.",
        is_active: true,
    },
    TenantSeed {
        id: 10,
        name: "Sephora",
        brand_name: Some("LVMH"),
        category_id: CATEGORY_HEALTH_BEAUTY,
        floor: "L1",
        is_featured: false,
        is_new: true,
        description: "Makeup, skincare and fragrance.",
        is_active: true,
    },
    TenantSeed {
        id: 11,
        name: "Grand Cinema",
        brand_name: None,
        category_id: CATEGORY_ENTERTAINMENT,
        floor: "L4",
        is_featured: true,
        is_new: false,
        description: "Eight screens including IMAX and a premium lounge.",
        is_active: true,
    },
    TenantSeed {
        id: 12,
        name: "Timezone",
        brand_name: None,
        category_id: CATEGORY_ENTERTAINMENT,
        floor: "L4",
        is_featured: false,
        is_new: false,
        description: "Arcade games, bowling and party rooms.",
        is_active: true,
    },
    TenantSeed {
        id: 13,
        name: "Maybank",
        brand_name: None,
        category_id: CATEGORY_SERVICES,
        floor: "G",
        is_featured: false,
        is_new: false,
        description: "Banking services and 24-hour ATMs.",
        is_active: true,
    },
    TenantSeed {
        id: 14,
        name: "Concierge Desk",
        brand_name: None,
        category_id: CATEGORY_SERVICES,
        floor: "G",
        is_featured: false,
        is_new: false,
        description: "Lost and found, gift cards and stroller rental.",
        is_active: true,
    },
    TenantSeed {
        id: 15,
        name: "Wok Express",
        brand_name: None,
        category_id: CATEGORY_FOOD,
        floor: "L2",
        is_featured: false,
        is_new: false,
        description: "Stir-fried noodles and rice bowls.",
        is_active: false,
    },
];

pub fn tenants() -> Vec<tenant::Model> {
    TENANTS
        .iter()
        .map(|seed| tenant::Model {
            id: seed.id,
            name: seed.name.to_string(),
            brand_name: seed.brand_name.map(str::to_string),
            category_id: Some(seed.category_id),
            floor: Some(seed.floor.to_string()),
            logo_url: Some(format!("/static/logos/{}.png", seed.id)),
            is_featured: seed.is_featured,
            is_new: seed.is_new,
            description: Some(seed.description.to_string()),
            operating_hours: Some(if seed.category_id == CATEGORY_SERVICES {
                json!({ "Daily": "10:00-22:00" })
            } else {
                json!({ "Mon-Fri": "10:00-22:00", "Sat-Sun": "09:00-23:00" })
            }),
            is_active: seed.is_active,
        })
        .collect()
}

pub fn post_categories() -> Vec<post_category::Model> {
    [
        (POST_NEWS, "News", "news"),
        (POST_EVENTS, "Events", "events"),
        (POST_OFFERS, "Offers", "offers"),
    ]
    .into_iter()
    .map(|(id, name, slug)| post_category::Model {
        id,
        name: name.to_string(),
        slug: slug.to_string(),
    })
    .collect()
}

/// Blog posts, newest first.
pub fn posts() -> Vec<post::Model> {
    vec![
        post::Model {
            id: 3,
            slug: "mid-year-sale-guide".to_string(),
            title: "Your guide to the mid-year sale".to_string(),
            summary: Some("Where to find the best markdowns across fashion and tech.".to_string()),
            body: "<p>The mid-year sale runs across <strong>all three retail levels</strong>.</p>\
                   <h2>Fashion</h2><p>Look for markdowns at <a href=\"/directory?category=2\">our fashion stores</a>.</p>\
                   <h2>Electronics</h2><ul><li>Trade-in bonuses</li><li>Bundle deals</li></ul>"
                .to_string(),
            category_id: Some(POST_OFFERS),
            tags: json!(["sale", "fashion", "electronics"]),
            published_at: at(2025, 6, 2, 7, 30),
            is_featured: false,
            event_starts_at: None,
            event_ends_at: None,
            event_location: None,
        },
        post::Model {
            id: 1,
            slug: "summer-fashion-week-2025".to_string(),
            title: "Summer Fashion Week returns".to_string(),
            summary: Some("Two days of runway shows, styling sessions and pop-ups.".to_string()),
            body: "<p>Summer Fashion Week is back at Centre Court with runway shows every afternoon.</p>\
                   <blockquote>Bring a friend and get styled by our guest stylists.</blockquote>\
                   <p><img src=\"/static/blog/fashion-week.jpg\" alt=\"Runway at Centre Court\"></p>"
                .to_string(),
            category_id: Some(POST_EVENTS),
            tags: json!(["fashion", "events", "summer"]),
            published_at: at(2025, 5, 20, 9, 0),
            is_featured: true,
            event_starts_at: Some(at(2025, 6, 14, 10, 0)),
            event_ends_at: Some(at(2025, 6, 15, 20, 0)),
            event_location: Some("Centre Court, Ground Floor".to_string()),
        },
        post::Model {
            id: 2,
            slug: "new-dining-precinct-opens".to_string(),
            title: "Our new dining precinct is open".to_string(),
            summary: Some("Twelve new restaurants on Level 2.".to_string()),
            body: "<p>The Level 2 dining precinct opens with twelve restaurants, including \
                   <em>Sushi Tei</em> and an expanded Pizza Hut.</p>"
                .to_string(),
            category_id: Some(POST_NEWS),
            tags: json!(["food", "dining", "new-stores"]),
            published_at: at(2025, 4, 28, 8, 0),
            is_featured: false,
            event_starts_at: None,
            event_ends_at: None,
            event_location: None,
        },
        post::Model {
            id: 4,
            slug: "school-holiday-workshops".to_string(),
            title: "School holiday workshops for kids".to_string(),
            summary: Some("Free craft and coding workshops every Saturday.".to_string()),
            body: "<p>Drop in to the Level 4 Activity Hall for free craft and coding sessions.</p>\
                   <ol><li>Paper robots</li><li>Scratch coding</li><li>Clay modelling</li></ol>"
                .to_string(),
            category_id: Some(POST_EVENTS),
            tags: json!(["kids", "events", "workshops"]),
            published_at: at(2025, 3, 15, 10, 0),
            is_featured: false,
            event_starts_at: Some(at(2025, 4, 5, 2, 0)),
            event_ends_at: Some(at(2025, 4, 5, 5, 0)),
            event_location: Some("Level 4 Activity Hall".to_string()),
        },
        post::Model {
            id: 5,
            slug: "sustainable-shopping-tips".to_string(),
            title: "Five tips for more sustainable shopping".to_string(),
            summary: Some("Small changes that add up.".to_string()),
            body: "<p>Bring your own bag, choose repair services and look for recycled materials.</p>"
                .to_string(),
            category_id: Some(POST_NEWS),
            tags: json!(["sustainability", "fashion"]),
            published_at: at(2025, 2, 10, 9, 0),
            is_featured: false,
            event_starts_at: None,
            event_ends_at: None,
            event_location: None,
        },
        post::Model {
            id: 6,
            slug: "cinema-imax-upgrade".to_string(),
            title: "Grand Cinema unveils its IMAX screen".to_string(),
            summary: None,
            body: "<p>Screen 1 has been rebuilt for IMAX with laser projection.</p>".to_string(),
            category_id: Some(POST_NEWS),
            tags: json!(["entertainment", "movies"]),
            published_at: at(2025, 1, 22, 11, 0),
            is_featured: false,
            event_starts_at: None,
            event_ends_at: None,
            event_location: None,
        },
    ]
}

pub fn promotions() -> Vec<promotion::Model> {
    let promo = |id, tenant_id, title: &str, starts_on, ends_on, status: &str| promotion::Model {
        id,
        tenant_id,
        title: title.to_string(),
        description: Some(format!("{}. Terms and conditions apply.", title)),
        image_url: Some(format!("/static/promotions/{}.jpg", id)),
        starts_on,
        ends_on,
        status: status.to_string(),
    };

    vec![
        promo(1, Some(1), "Two-for-one pizzas on Tuesdays", date(2026, 1, 1), date(2027, 6, 30), "published"),
        promo(2, Some(4), "Mid-season sale, up to 50% off", date(2026, 6, 1), date(2026, 12, 31), "published"),
        promo(3, Some(11), "Half-price IMAX Mondays", date(2027, 1, 4), date(2027, 3, 29), "published"),
        promo(4, Some(10), "Beauty week gift with purchase", date(2026, 3, 1), date(2026, 3, 14), "published"),
        promo(5, None, "Festive lights night market", date(2026, 12, 1), date(2026, 12, 31), "staging"),
        promo(6, Some(8), "End of financial year clearance", date(2025, 6, 1), date(2025, 6, 30), "expired"),
    ]
}

/// Schedule shown when the cinema feed cannot be reached.
pub fn sample_schedule(cinema_id: &str) -> CinemaSchedule {
    let movie = |title: &str, rating: &str, minutes, times: &[&str]| Movie {
        title: title.to_string(),
        poster_url: None,
        rating: Some(rating.to_string()),
        duration_minutes: Some(minutes),
        showtimes: times.iter().map(|t| t.to_string()).collect(),
    };

    CinemaSchedule {
        cinema: CinemaInfo {
            id: cinema_id.to_string(),
            name: "Grand Cinema".to_string(),
            address: Some("Level 4, Riverside Mall".to_string()),
            phone: Some("+1 555 0100".to_string()),
            pricing: vec![
                PriceTier { label: "Adult".to_string(), price: 14.5 },
                PriceTier { label: "Child".to_string(), price: 9.0 },
                PriceTier { label: "Senior".to_string(), price: 10.0 },
                PriceTier { label: "IMAX".to_string(), price: 19.5 },
            ],
        },
        movies: vec![
            movie("The Lost Lighthouse", "PG", 104, &["11:00", "13:45", "16:30", "19:15"]),
            movie("Midnight Express Line", "M", 121, &["12:30", "18:00", "21:10"]),
            movie("Paper Planets", "G", 92, &["10:15", "12:20", "14:30"]),
            movie("Harbour Lights", "PG-13", 113, &["15:00", "20:30"]),
        ],
    }
}
