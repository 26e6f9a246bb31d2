mod test_utils;

use chrono::{TimeZone, Utc};
use mall_site::{config::AppConfig, models::post, seeds};
use sea_orm::sea_query::Expr;
use sea_orm::{ActiveModelTrait, EntityTrait, IntoActiveModel};
use serde_json::json;
use test_utils::{build_app, get, offline_app, seeded_db, setup_test_db, test_clock};

#[tokio::test]
async fn every_bundled_post_renders_offline() {
    let clock = test_clock();
    let app = offline_app(&clock);

    for post in seeds::posts() {
        let page = get(&app, &format!("/blog/{}", post.slug)).await;
        assert_eq!(page.status, 200, "{} should render", post.slug);
        assert!(page.body.contains("banner-offline"));
    }
}

#[tokio::test]
async fn bundled_post_missing_from_database_still_renders() {
    let clock = test_clock();
    // Migrated but empty: the remote store answers, just without the post.
    let app = build_app(AppConfig::default(), Some(setup_test_db().await.unwrap()), &clock);

    let page = get(&app, "/blog/new-dining-precinct-opens").await;

    assert_eq!(page.status, 200);
    assert!(page.body.contains("Our new dining precinct is open"));
}

#[tokio::test]
async fn unknown_slug_is_not_found() {
    let clock = test_clock();
    let app = build_app(AppConfig::default(), Some(seeded_db().await.unwrap()), &clock);

    let page = get(&app, "/blog/no-such-post").await;

    assert_eq!(page.status, 404);
    assert!(page.body.contains("Post not found"));
}

#[tokio::test]
async fn post_page_has_event_details_share_links_and_related_posts() {
    let clock = test_clock();
    let app = build_app(AppConfig::default(), Some(seeded_db().await.unwrap()), &clock);

    let page = get(&app, "/blog/summer-fashion-week-2025").await;

    assert_eq!(page.status, 200);
    assert!(!page.body.contains("banner-offline"));
    assert!(page.body.contains("Event details"));
    assert!(page.body.contains("Centre Court, Ground Floor"));
    assert!(page.body.contains("https://www.facebook.com/sharer/sharer.php?u="));
    assert!(page.body.contains(r#"href="/blog/summer-fashion-week-2025/calendar.ics""#));
    assert!(page.body.contains("Related posts"));
    assert!(page.body.contains(r#"href="/blog/school-holiday-workshops""#));
}

#[tokio::test]
async fn stored_markup_is_sanitized() {
    let clock = test_clock();
    let db = setup_test_db().await.unwrap();
    post::Model {
        id: 42,
        slug: "sneaky".to_string(),
        title: "Sneaky".to_string(),
        summary: None,
        body: r#"<p onclick="steal()">Hello</p><script>alert(1)</script><a href="javascript:alert(1)">x</a>"#
            .to_string(),
        category_id: None,
        tags: json!([]),
        published_at: Utc
            .with_ymd_and_hms(2026, 10, 1, 9, 0, 0)
            .unwrap()
            .fixed_offset(),
        is_featured: false,
        event_starts_at: None,
        event_ends_at: None,
        event_location: None,
    }
    .into_active_model()
    .insert(&db)
    .await
    .unwrap();
    let app = build_app(AppConfig::default(), Some(db), &clock);

    let page = get(&app, "/blog/sneaky").await;
    assert_eq!(page.status, 200);
    assert!(page.body.contains("<p>Hello</p>"));
    assert!(!page.body.contains("alert(1)"));
    assert!(!page.body.contains("onclick"));

    let api = get(&app, "/api/posts/sneaky").await.json();
    assert_eq!(api["data"]["body"], "<p>Hello</p><a>x</a>");
}

#[tokio::test]
async fn calendar_download_describes_the_event() {
    let clock = test_clock();
    let app = offline_app(&clock);

    let response = get(&app, "/blog/summer-fashion-week-2025/calendar.ics").await;

    assert_eq!(response.status, 200);
    assert!(
        response.headers["content-type"]
            .to_str()
            .unwrap()
            .starts_with("text/calendar")
    );
    assert_eq!(
        response.headers["content-disposition"],
        r#"attachment; filename="summer-fashion-week-2025.ics""#
    );
    assert!(response.body.starts_with("BEGIN:VCALENDAR\r\n"));
    assert!(response.body.contains("DTSTART:20250614T100000Z\r\n"));
    assert!(response.body.contains("DTEND:20250615T200000Z\r\n"));
    assert!(response.body.contains("SUMMARY:Summer Fashion Week returns\r\n"));
    assert!(response.body.contains("DTSTAMP:20261019T090000Z\r\n"));
}

#[tokio::test]
async fn calendar_for_unknown_post_is_not_found() {
    let clock = test_clock();
    let app = offline_app(&clock);

    let response = get(&app, "/blog/nope/calendar.ics").await;

    assert_eq!(response.status, 404);
}

#[tokio::test]
async fn listing_filters_by_category_and_tag() {
    let clock = test_clock();
    let app = build_app(AppConfig::default(), Some(seeded_db().await.unwrap()), &clock);

    let events = get(&app, "/blog?category=events").await;
    assert_eq!(events.status, 200);
    assert!(events.body.contains("Summer Fashion Week returns"));
    assert!(events.body.contains("School holiday workshops for kids"));
    assert!(!events.body.contains("Five tips for more sustainable shopping"));

    let tagged = get(&app, "/api/posts?tag=FASHION").await.json();
    let slugs: Vec<&str> = tagged["data"]
        .as_array()
        .unwrap()
        .iter()
        .map(|p| p["slug"].as_str().unwrap())
        .collect();
    assert_eq!(
        slugs,
        vec![
            "mid-year-sale-guide",
            "summer-fashion-week-2025",
            "sustainable-shopping-tips"
        ]
    );
}

#[tokio::test]
async fn api_post_excludes_itself_from_related() {
    let clock = test_clock();
    let app = offline_app(&clock);

    let json = get(&app, "/api/posts/summer-fashion-week-2025").await.json();

    assert_eq!(json["source"], "fallback");
    let related = json["related"].as_array().unwrap();
    assert!(!related.is_empty() && related.len() <= 3);
    assert!(
        related
            .iter()
            .all(|p| p["slug"] != "summer-fashion-week-2025")
    );
}

#[tokio::test]
async fn api_listings_and_related_posts_are_sanitized() {
    let clock = test_clock();
    let db = seeded_db().await.unwrap();
    post::Entity::update_many()
        .col_expr(
            post::Column::Body,
            Expr::value(r#"<p onclick="alert(2)">Hi</p><script>alert(1)</script>"#),
        )
        .exec(&db)
        .await
        .unwrap();
    let app = build_app(AppConfig::default(), Some(db), &clock);

    let listing = get(&app, "/api/posts").await.json();
    let bodies = listing["data"].as_array().unwrap();
    assert!(!bodies.is_empty());
    for post in bodies {
        assert_eq!(post["body"], "<p>Hi</p>", "{}", post["slug"]);
    }

    let detail = get(&app, "/api/posts/summer-fashion-week-2025").await.json();
    assert_eq!(detail["source"], "remote");
    let related = detail["related"].as_array().unwrap();
    assert!(!related.is_empty());
    for post in related {
        let body = post["body"].as_str().unwrap();
        assert_eq!(body, "<p>Hi</p>");
    }
}
