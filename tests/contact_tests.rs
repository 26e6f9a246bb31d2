mod test_utils;

use chrono::Duration;
use mall_site::config::AppConfig;
use mall_site::models::Contact;
use sea_orm::{EntityTrait, PaginatorTrait};
use serde_json::json;
use test_utils::{build_app, get, offline_app, post_form, post_json, setup_test_db, test_clock};

const VALID: &[(&str, &str)] = &[
    ("name", "Jane Tan"),
    ("email", "jane@example.com"),
    ("phone", ""),
    ("enquiry_type", "leasing"),
    ("enquiry_details", "Interested in a kiosk on Level 1."),
    ("website", ""),
];

#[tokio::test]
async fn form_renders_with_enquiry_types_and_honeypot() {
    let clock = test_clock();
    let app = offline_app(&clock);

    let page = get(&app, "/contact").await;

    assert_eq!(page.status, 200);
    assert!(page.body.contains(r#"value="leasing""#));
    assert!(page.body.contains(r#"name="website""#));
}

#[tokio::test]
async fn accepted_submission_is_stored_and_starts_the_cooldown() {
    let clock = test_clock();
    let db = setup_test_db().await.unwrap();
    let app = build_app(AppConfig::default(), Some(db.clone()), &clock);

    let sent = post_form(&app, "/contact", "203.0.113.7", VALID).await;
    assert_eq!(sent.status, 200);
    assert!(sent.body.contains("Thanks Jane Tan, your enquiry has been received."));
    assert_eq!(Contact::find().count(&db).await.unwrap(), 1);

    clock.advance(Duration::seconds(12));
    let again = post_form(&app, "/contact", "203.0.113.7", VALID).await;
    assert_eq!(again.status, 429);
    assert!(again.body.contains("Please wait 18 seconds before submitting again."));
    assert_eq!(Contact::find().count(&db).await.unwrap(), 1);

    // Other visitors are unaffected.
    let other = post_form(&app, "/contact", "198.51.100.20", VALID).await;
    assert_eq!(other.status, 200);

    clock.advance(Duration::seconds(18));
    let after = post_form(&app, "/contact", "203.0.113.7", VALID).await;
    assert_eq!(after.status, 200);
    assert_eq!(Contact::find().count(&db).await.unwrap(), 3);
}

#[tokio::test]
async fn short_details_are_rejected_with_a_field_message() {
    let clock = test_clock();
    let db = setup_test_db().await.unwrap();
    let app = build_app(AppConfig::default(), Some(db.clone()), &clock);

    let mut fields = VALID.to_vec();
    fields.retain(|(name, _)| *name != "enquiry_details");
    fields.push(("enquiry_details", "Too short"));
    let page = post_form(&app, "/contact", "203.0.113.8", &fields).await;

    assert_eq!(page.status, 422);
    assert!(page.body.contains("Please tell us a little more (10 to 2000 characters)"));
    // The visitor's input is kept.
    assert!(page.body.contains("Jane Tan"));
    assert_eq!(Contact::find().count(&db).await.unwrap(), 0);
}

#[tokio::test]
async fn honeypot_submissions_look_accepted_but_are_not_stored() {
    let clock = test_clock();
    let db = setup_test_db().await.unwrap();
    let app = build_app(AppConfig::default(), Some(db.clone()), &clock);

    let mut fields = VALID.to_vec();
    fields.retain(|(name, _)| *name != "website");
    fields.push(("website", "http://spam.example"));
    let page = post_form(&app, "/contact", "203.0.113.9", &fields).await;

    assert_eq!(page.status, 200);
    assert!(page.body.contains("Your enquiry has been received."));
    assert_eq!(Contact::find().count(&db).await.unwrap(), 0);
}

#[tokio::test]
async fn storage_failure_keeps_the_form_and_allows_retry() {
    let clock = test_clock();
    let app = offline_app(&clock);

    let page = post_form(&app, "/contact", "203.0.113.10", VALID).await;
    assert_eq!(page.status, 502);
    assert!(page.body.contains("Jane Tan"));

    // No cooldown after a failure.
    let retry = post_form(&app, "/contact", "203.0.113.10", VALID).await;
    assert_eq!(retry.status, 502);
}

#[tokio::test]
async fn api_submission_returns_a_reference_then_rate_limits() {
    let clock = test_clock();
    let db = setup_test_db().await.unwrap();
    let app = build_app(AppConfig::default(), Some(db), &clock);
    let body = json!({
        "name": "Sam Lee",
        "email": "sam@example.com",
        "phone": "+65 6123 4567",
        "enquiry_type": "events",
        "enquiry_details": "Can we book the atrium for a product launch?"
    });

    let created = post_json(&app, "/api/contact", "192.0.2.1", body.clone()).await;
    assert_eq!(created.status, 201);
    let receipt = created.json();
    assert_eq!(receipt["status"], "received");
    assert!(receipt["reference"].is_string());

    clock.advance(Duration::seconds(5));
    let limited = post_json(&app, "/api/contact", "192.0.2.1", body).await;
    assert_eq!(limited.status, 429);
    assert_eq!(limited.headers["retry-after"], "25");
    assert_eq!(limited.json()["code"], "RATE_LIMITED");
}

#[tokio::test]
async fn api_validation_errors_are_keyed_by_field() {
    let clock = test_clock();
    let app = build_app(AppConfig::default(), Some(setup_test_db().await.unwrap()), &clock);

    let response = post_json(
        &app,
        "/api/contact",
        "192.0.2.2",
        json!({
            "name": "S",
            "email": "not-an-email",
            "enquiry_type": "complaints",
            "enquiry_details": "Hello there, this is long enough."
        }),
    )
    .await;

    assert_eq!(response.status, 422);
    let json = response.json();
    assert_eq!(json["code"], "VALIDATION_FAILED");
    assert_eq!(json["details"]["email"], "Please enter a valid email address");
    assert_eq!(json["details"]["enquiry_type"], "Please choose an enquiry type");
    assert!(json["details"]["name"].is_string());
    assert!(json["details"].get("enquiry_details").is_none());
}

#[tokio::test]
async fn api_storage_failure_hides_the_backend_error() {
    let clock = test_clock();
    let app = offline_app(&clock);

    let response = post_json(
        &app,
        "/api/contact",
        "192.0.2.3",
        json!({
            "name": "Sam Lee",
            "email": "sam@example.com",
            "enquiry_type": "general",
            "enquiry_details": "Is there parking for bicycles?"
        }),
    )
    .await;

    assert_eq!(response.status, 502);
    let json = response.json();
    assert_eq!(json["code"], "SUBMISSION_FAILED");
    assert!(json.get("details").is_none());
    assert!(!json.to_string().contains("no database connection configured"));
}
