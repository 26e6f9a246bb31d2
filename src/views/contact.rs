use maud::{Markup, html};

use crate::contact::{ContactForm, ENQUIRY_TYPES, FieldErrors};

/// What the contact page is showing besides the form.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ContactNotice {
    None,
    Wait { remaining_seconds: u64 },
    SubmissionFailed,
}

fn field_error(errors: &FieldErrors, field: &str) -> Markup {
    html! {
        @if let Some(message) = errors.get(field) {
            span.field-error id={ (field) "-error" } { (message) }
        }
    }
}

pub fn contact_page(form: &ContactForm, errors: &FieldErrors, notice: ContactNotice) -> Markup {
    html! {
        h1 { "Contact us" }
        @match notice {
            ContactNotice::Wait { remaining_seconds } => {
                div.banner.banner-wait role="status" {
                    "Thanks! Please wait " (remaining_seconds) " seconds before submitting again."
                }
            }
            ContactNotice::SubmissionFailed => {
                div.banner.banner-error role="alert" {
                    "Sorry, we couldn't send your enquiry. Please try again in a moment."
                }
            }
            ContactNotice::None => {}
        }

        form.contact-form method="post" action="/contact" novalidate {
            label {
                "Name"
                input type="text" name="name" value=(form.name) required;
                (field_error(errors, "name"))
            }
            label {
                "Email"
                input type="email" name="email" value=(form.email) required;
                (field_error(errors, "email"))
            }
            label {
                "Phone (optional)"
                input type="tel" name="phone" value=(form.phone.as_deref().unwrap_or_default());
                (field_error(errors, "phone"))
            }
            label {
                "Enquiry type"
                select name="enquiry_type" {
                    option value="" { "Choose one" }
                    @for (key, label) in ENQUIRY_TYPES {
                        option value=(key) selected[form.enquiry_type == *key] { (label) }
                    }
                }
                (field_error(errors, "enquiry_type"))
            }
            label {
                "How can we help?"
                textarea name="enquiry_details" rows="6" required { (form.enquiry_details) }
                (field_error(errors, "enquiry_details"))
            }
            div.hp aria-hidden="true" style="position:absolute;left:-10000px" {
                label {
                    "Leave this field empty"
                    input type="text" name="website" tabindex="-1" autocomplete="off";
                }
            }
            button type="submit" { "Send enquiry" }
        }
    }
}

pub fn contact_sent(name: &str) -> Markup {
    html! {
        section.contact-sent {
            h1 { "Thank you" }
            p {
                @if name.is_empty() {
                    "Your enquiry has been received."
                } @else {
                    "Thanks " (name) ", your enquiry has been received."
                }
                " Our team will be in touch soon."
            }
            a href="/" { "Back to home" }
        }
    }
}
