mod test_utils;

use mall_site::config::{AppConfig, SeoConfig};
use mall_site::models::site_setting;
use sea_orm::{ActiveModelTrait, DatabaseConnection, IntoActiveModel};
use test_utils::{build_app, get, offline_app, seeded_db, test_clock};

async fn add_setting(
    db: &DatabaseConnection,
    id: i32,
    key: &str,
    injection_point: &str,
    setting_type: &str,
    value: &str,
) {
    site_setting::Model {
        id,
        key: key.to_string(),
        injection_point: injection_point.to_string(),
        setting_type: setting_type.to_string(),
        value: value.to_string(),
        is_active: true,
        sort_order: id,
    }
    .into_active_model()
    .insert(db)
    .await
    .unwrap();
}

#[tokio::test]
async fn every_page_renders_online() {
    let clock = test_clock();
    let app = build_app(AppConfig::default(), Some(seeded_db().await.unwrap()), &clock);

    for uri in ["/", "/directory", "/blog", "/movies", "/promotions", "/contact"] {
        let page = get(&app, uri).await;
        assert_eq!(page.status, 200, "{uri}");
        assert!(page.body.starts_with("<!DOCTYPE html>"), "{uri}");
        assert!(!page.body.contains("banner-offline"), "{uri}");
    }
}

#[tokio::test]
async fn home_lists_featured_stores_and_current_promotions() {
    let clock = test_clock();
    let app = offline_app(&clock);

    let page = get(&app, "/").await;

    assert_eq!(page.status, 200);
    assert!(page.body.contains("<title>Riverside Mall</title>"));
    assert!(page.body.contains("Featured stores"));
    assert!(page.body.contains("Two-for-one pizzas on Tuesdays"));
    // Upcoming promotions are left to the promotions page.
    assert!(!page.body.contains("Half-price IMAX Mondays"));
    assert!(page.body.contains("banner-offline"));
}

#[tokio::test]
async fn promotions_show_current_and_upcoming_only() {
    let clock = test_clock();
    let app = build_app(AppConfig::default(), Some(seeded_db().await.unwrap()), &clock);

    let page = get(&app, "/promotions").await;
    assert_eq!(page.status, 200);
    assert!(page.body.contains("<title>Promotions | Riverside Mall</title>"));
    assert!(page.body.contains("Two-for-one pizzas on Tuesdays"));
    assert!(page.body.contains("Half-price IMAX Mondays"));
    assert!(page.body.contains("Coming soon"));
    assert!(!page.body.contains("Beauty week gift with purchase"));
    assert!(!page.body.contains("Festive lights night market"));
    assert!(!page.body.contains("End of financial year clearance"));

    let json = get(&app, "/api/promotions").await.json();
    let ids: Vec<i64> = json["data"]
        .as_array()
        .unwrap()
        .iter()
        .map(|p| p["id"].as_i64().unwrap())
        .collect();
    assert_eq!(ids, vec![1, 2, 3]);
    assert_eq!(json["data"][2]["upcoming"], true);
}

#[tokio::test]
async fn seo_settings_are_injected_by_trust() {
    let clock = test_clock();
    let db = seeded_db().await.unwrap();
    add_setting(&db, 1, "google-site-verification", "head", "meta_tag", "abc123").await;
    add_setting(&db, 2, "analytics", "body_end", "script", "window.tracked = true;").await;
    add_setting(
        &db,
        3,
        "organization",
        "head",
        "json_ld",
        r#"{"@type":"ShoppingCenter","name":"</script>"}"#,
    )
    .await;

    let trusting = build_app(AppConfig::default(), Some(db.clone()), &clock);
    let page = get(&trusting, "/").await;
    assert!(page.body.contains(r#"<meta name="google-site-verification" content="abc123">"#));
    assert!(page.body.contains("<script>window.tracked = true;</script>"));
    assert!(page.body.contains(r#"<script type="application/ld+json">"#));
    assert!(page.body.contains(r#"<\/script>"#));

    let strict = AppConfig {
        seo: SeoConfig {
            trusted_types: Vec::new(),
        },
        ..AppConfig::default()
    };
    let strict_app = build_app(strict, Some(db), &clock);
    let page = get(&strict_app, "/").await;
    assert!(page.body.contains(r#"<meta name="google-site-verification" content="abc123">"#));
    assert!(!page.body.contains("window.tracked"));
}

#[tokio::test]
async fn unknown_routes_render_the_not_found_page() {
    let clock = test_clock();
    let app = offline_app(&clock);

    let page = get(&app, "/no/such/page").await;

    assert_eq!(page.status, 404);
    assert!(page.body.contains("Page not found"));
    assert!(page.body.contains(r#"href="/directory""#));
}

#[tokio::test]
async fn health_reports_database_connectivity() {
    let clock = test_clock();
    let app = build_app(AppConfig::default(), Some(seeded_db().await.unwrap()), &clock);

    let json = get(&app, "/healthz").await.json();

    assert_eq!(json["service"], "mall-site");
    assert_eq!(json["database"], "connected");
}

#[tokio::test]
async fn openapi_document_lists_the_api() {
    let clock = test_clock();
    let app = offline_app(&clock);

    let json = get(&app, "/openapi.json").await.json();

    let paths = json["paths"].as_object().unwrap();
    for path in [
        "/healthz",
        "/api/tenants",
        "/api/posts/{slug}",
        "/api/movies",
        "/api/promotions",
        "/api/contact",
    ] {
        assert!(paths.contains_key(path), "{path} missing");
    }
}
