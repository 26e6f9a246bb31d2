//! # Contact form
//!
//! Validation, spam honeypot and per-client submission cooldown in front of
//! [`SiteData::submit_contact`].

use std::collections::{BTreeMap, HashMap};
use std::convert::Infallible;
use std::net::SocketAddr;
use std::sync::{LazyLock, Mutex};

use axum::extract::{ConnectInfo, FromRequestParts};
use axum::http::request::Parts;
use chrono::{DateTime, Duration, Utc};
use metrics::counter;
use regex::Regex;
use serde::{Deserialize, Serialize};
use tracing::{info, warn};
use utoipa::ToSchema;
use validator::{Validate, ValidationError};

use crate::clock::Clock;
use crate::data::SiteData;
use crate::models::contact;
use crate::repositories::NewContact;

/// Accepted `enquiry_type` values with their display labels.
pub const ENQUIRY_TYPES: &[(&str, &str)] = &[
    ("general", "General enquiry"),
    ("leasing", "Leasing"),
    ("advertising", "Advertising"),
    ("events", "Events"),
    ("feedback", "Feedback"),
    ("other", "Other"),
];

static PHONE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[+0-9 ()-]{7,20}$").expect("phone pattern compiles"));

fn validate_enquiry_type(value: &str) -> Result<(), ValidationError> {
    if ENQUIRY_TYPES.iter().any(|(key, _)| *key == value) {
        Ok(())
    } else {
        Err(ValidationError::new("enquiry_type").with_message("Please choose an enquiry type".into()))
    }
}

/// Contact form payload, shared by the HTML form and `POST /api/contact`.
#[derive(Debug, Clone, Default, Deserialize, Serialize, Validate, ToSchema)]
pub struct ContactForm {
    #[validate(length(min = 2, max = 100, message = "Name must be between 2 and 100 characters"))]
    #[serde(default)]
    pub name: String,

    #[validate(email(message = "Please enter a valid email address"))]
    #[serde(default)]
    pub email: String,

    #[validate(regex(path = *PHONE_RE, message = "Please enter a valid phone number"))]
    #[serde(default)]
    pub phone: Option<String>,

    #[validate(custom(function = "validate_enquiry_type"))]
    #[serde(default)]
    pub enquiry_type: String,

    #[validate(length(
        min = 10,
        max = 2000,
        message = "Please tell us a little more (10 to 2000 characters)"
    ))]
    #[serde(default)]
    pub enquiry_details: String,

    /// Honeypot; real visitors never see or fill this field
    #[serde(default)]
    pub website: Option<String>,
}

/// Field name to first error message.
pub type FieldErrors = BTreeMap<String, String>;

impl ContactForm {
    /// Trims every field and turns a blank phone into `None`.
    pub fn normalized(mut self) -> Self {
        self.name = self.name.trim().to_string();
        self.email = self.email.trim().to_string();
        self.phone = self
            .phone
            .map(|p| p.trim().to_string())
            .filter(|p| !p.is_empty());
        self.enquiry_type = self.enquiry_type.trim().to_lowercase();
        self.enquiry_details = self.enquiry_details.trim().to_string();
        self
    }

    pub fn is_spam(&self) -> bool {
        self.website
            .as_deref()
            .is_some_and(|value| !value.trim().is_empty())
    }

    pub fn field_errors(&self) -> Result<(), FieldErrors> {
        self.validate().map_err(|errors| {
            errors
                .field_errors()
                .into_iter()
                .filter_map(|(field, errs)| {
                    let message = errs.first()?.message.as_ref()?.to_string();
                    Some((field.to_string(), message))
                })
                .collect()
        })
    }

    fn into_new_contact(self, received_at: DateTime<Utc>) -> NewContact {
        NewContact {
            name: self.name,
            email: self.email,
            phone: self.phone,
            enquiry_type: self.enquiry_type,
            enquiry_details: self.enquiry_details,
            created_at: received_at,
        }
    }
}

/// Per-client resubmission window.
pub struct SubmissionCooldown<C: Clock> {
    clock: C,
    window: Duration,
    last_accepted: Mutex<HashMap<String, DateTime<Utc>>>,
}

impl<C: Clock> SubmissionCooldown<C> {
    pub fn new(clock: C, window: Duration) -> Self {
        Self {
            clock,
            window,
            last_accepted: Mutex::new(HashMap::new()),
        }
    }

    /// Whole seconds left before `client` may submit again, rounded up.
    pub fn remaining(&self, client: &str) -> Option<u64> {
        let now = self.clock.now();
        let map = self
            .last_accepted
            .lock()
            .unwrap_or_else(|poison| poison.into_inner());
        let until = *map.get(client)? + self.window;
        if until <= now {
            return None;
        }
        let millis = (until - now).num_milliseconds().max(0) as u64;
        Some(millis.div_ceil(1000))
    }

    pub fn record(&self, client: &str) {
        let now = self.clock.now();
        let mut map = self
            .last_accepted
            .lock()
            .unwrap_or_else(|poison| poison.into_inner());
        map.retain(|_, at| *at + self.window > now);
        map.insert(client.to_string(), now);
    }
}

/// Result of a submission attempt.
#[derive(Debug)]
pub enum SubmitOutcome {
    Accepted(contact::Model),
    /// Honeypot tripped; nothing was stored.
    Rejected,
    Wait { remaining_seconds: u64 },
    Invalid(FieldErrors),
    /// The backend refused or was unreachable. The form is kept for a manual retry.
    Failed,
}

impl SubmitOutcome {
    fn label(&self) -> &'static str {
        match self {
            SubmitOutcome::Accepted(_) => "accepted",
            SubmitOutcome::Rejected => "rejected",
            SubmitOutcome::Wait { .. } => "cooldown",
            SubmitOutcome::Invalid(_) => "invalid",
            SubmitOutcome::Failed => "failed",
        }
    }
}

pub struct ContactService<C: Clock> {
    data: SiteData,
    cooldown: SubmissionCooldown<C>,
}

impl<C: Clock> ContactService<C> {
    pub fn new(data: SiteData, clock: C, cooldown: Duration) -> Self {
        Self {
            data,
            cooldown: SubmissionCooldown::new(clock, cooldown),
        }
    }

    pub async fn submit(&self, client: &ClientKey, form: ContactForm) -> SubmitOutcome {
        let outcome = self.run(client, form).await;
        counter!("mall_contact_submissions_total", "outcome" => outcome.label()).increment(1);
        outcome
    }

    async fn run(&self, client: &ClientKey, form: ContactForm) -> SubmitOutcome {
        if let Some(remaining_seconds) = self.cooldown.remaining(client.as_str()) {
            return SubmitOutcome::Wait { remaining_seconds };
        }

        let form = form.normalized();
        if form.is_spam() {
            info!(client = client.as_str(), "Contact submission dropped by honeypot");
            return SubmitOutcome::Rejected;
        }
        if let Err(errors) = form.field_errors() {
            return SubmitOutcome::Invalid(errors);
        }

        let received_at = self.cooldown.clock.now();
        match self.data.submit_contact(form.into_new_contact(received_at)).await {
            Ok(created) => {
                self.cooldown.record(client.as_str());
                SubmitOutcome::Accepted(created)
            }
            Err(err) => {
                warn!(client = client.as_str(), error = %err, "Contact submission failed");
                SubmitOutcome::Failed
            }
        }
    }
}

/// Identifies a visitor for the cooldown: first `X-Forwarded-For` hop, then
/// `X-Real-IP`, then the peer address.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ClientKey(String);

impl ClientKey {
    pub fn new(key: impl Into<String>) -> Self {
        Self(key.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    fn from_parts(parts: &Parts) -> Self {
        let header = |name: &str| {
            parts
                .headers
                .get(name)
                .and_then(|v| v.to_str().ok())
                .and_then(|v| v.split(',').next())
                .map(str::trim)
                .filter(|v| !v.is_empty())
                .map(str::to_string)
        };

        header("x-forwarded-for")
            .or_else(|| header("x-real-ip"))
            .or_else(|| {
                parts
                    .extensions
                    .get::<ConnectInfo<SocketAddr>>()
                    .map(|ConnectInfo(addr)| addr.ip().to_string())
            })
            .map(Self)
            .unwrap_or_else(|| Self("unknown".to_string()))
    }
}

impl<S> FromRequestParts<S> for ClientKey
where
    S: Send + Sync,
{
    type Rejection = Infallible;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        Ok(Self::from_parts(parts))
    }
}
