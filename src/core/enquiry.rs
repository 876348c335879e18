//! Contact enquiries: sanitization and validation at the trusted boundary.
use chrono::{DateTime, Utc};
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::fmt::Display;
use std::sync::LazyLock;
use thiserror::Error;
use tracing::debug;

static NAME_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[a-zA-Z\s'-]+$").expect("valid name pattern"));
static EMAIL_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").expect("valid email pattern"));
static PHONE_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^(\+61|0)[2-9][0-9]{8}$").expect("valid phone pattern"));
static SCRIPT_PROTOCOL: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)javascript:").expect("valid protocol pattern"));
static EVENT_HANDLER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i-u)on\w+=").expect("valid handler pattern"));

const NAME_LENGTH: (usize, usize) = (2, 50);
const MESSAGE_LENGTH: (usize, usize) = (10, 1000);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PreferredContact {
    Phone,
    Email,
}

/// A contact form submission.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Enquiry {
    pub name: String,
    pub email: String,
    #[serde(default)]
    pub phone: Option<String>,
    pub message: String,
    /// Whether the sender asked for a free consultation
    #[serde(default)]
    pub consultation: bool,
    #[serde(default)]
    pub service: Option<String>,
    #[serde(default)]
    pub preferred_contact: Option<PreferredContact>,
    #[serde(default)]
    pub submitted_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FieldError {
    pub field: &'static str,
    pub message: &'static str,
}

impl Display for FieldError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.field, self.message)
    }
}

/// Every rule an enquiry failed.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("enquiry rejected: {}", summarize(.errors))]
pub struct EnquiryRejection {
    pub errors: Vec<FieldError>,
}

fn summarize(errors: &[FieldError]) -> String {
    errors
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join("; ")
}

/// Strips markup and script fragments from free text.
pub fn sanitize_input(input: &str) -> String {
    let without_brackets: String = input.chars().filter(|c| !matches!(c, '<' | '>')).collect();
    let without_protocol = SCRIPT_PROTOCOL.replace_all(&without_brackets, "");
    EVENT_HANDLER
        .replace_all(&without_protocol, "")
        .trim()
        .to_string()
}

/// Escapes text for inclusion in HTML.
pub fn escape_html(unsafe_text: &str) -> String {
    let mut escaped = String::with_capacity(unsafe_text.len());
    for c in unsafe_text.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#039;"),
            _ => escaped.push(c),
        }
    }
    escaped
}

fn within(text: &str, (min, max): (usize, usize)) -> bool {
    (min..=max).contains(&text.chars().count())
}

pub fn validate_name(name: &str) -> bool {
    within(name, NAME_LENGTH) && NAME_PATTERN.is_match(name)
}

pub fn validate_email(email: &str) -> bool {
    EMAIL_PATTERN.is_match(email)
}

/// Australian phone numbers; spaces are ignored.
pub fn validate_phone(phone: &str) -> bool {
    let compact: String = phone.chars().filter(|c| !c.is_whitespace()).collect();
    PHONE_PATTERN.is_match(&compact)
}

pub fn validate_message(message: &str) -> bool {
    within(message, MESSAGE_LENGTH)
}

/// Sanitizes every free-text field, then checks the result against the
/// contact form rules. Returns the sanitized enquiry.
pub fn validate_enquiry(enquiry: &Enquiry) -> Result<Enquiry, EnquiryRejection> {
    let clean = Enquiry {
        name: sanitize_input(&enquiry.name),
        email: sanitize_input(&enquiry.email),
        phone: enquiry
            .phone
            .as_deref()
            .map(sanitize_input)
            .filter(|p| !p.is_empty()),
        message: sanitize_input(&enquiry.message),
        service: enquiry
            .service
            .as_deref()
            .map(sanitize_input)
            .filter(|s| !s.is_empty()),
        ..enquiry.clone()
    };

    let mut errors = Vec::new();
    if !validate_name(&clean.name) {
        errors.push(FieldError {
            field: "name",
            message: "Name must contain only letters, spaces, hyphens, and apostrophes",
        });
    }
    if !validate_email(&clean.email) {
        errors.push(FieldError {
            field: "email",
            message: "Please enter a valid email address",
        });
    }
    match clean.phone.as_deref() {
        Some(phone) if !validate_phone(phone) => errors.push(FieldError {
            field: "phone",
            message: "Please enter a valid Australian phone number",
        }),
        None if clean.preferred_contact == Some(PreferredContact::Phone) => {
            errors.push(FieldError {
                field: "phone",
                message: "A phone number is required when phone contact is preferred",
            })
        }
        _ => {}
    }
    if !validate_message(&clean.message) {
        errors.push(FieldError {
            field: "message",
            message: "Message must be between 10 and 1000 characters",
        });
    }

    if errors.is_empty() {
        Ok(clean)
    } else {
        debug!("Enquiry from {} failed {} rule(s)", clean.email, errors.len());
        Err(EnquiryRejection { errors })
    }
}

/// HTML notification body for the broker. All user text is escaped.
pub fn render_notification(enquiry: &Enquiry) -> String {
    let mut rows = vec![
        ("Name", escape_html(&enquiry.name)),
        ("Email", escape_html(&enquiry.email)),
    ];
    if let Some(phone) = &enquiry.phone {
        rows.push(("Phone", escape_html(phone)));
    }
    if let Some(service) = &enquiry.service {
        rows.push(("Service", escape_html(service)));
    }
    if let Some(preferred) = enquiry.preferred_contact {
        let preferred = match preferred {
            PreferredContact::Phone => "Phone",
            PreferredContact::Email => "Email",
        };
        rows.push(("Preferred contact", preferred.to_string()));
    }
    rows.push((
        "Consultation requested",
        if enquiry.consultation { "Yes" } else { "No" }.to_string(),
    ));

    let mut html = String::from("<h2>New enquiry</h2>\n<table>\n");
    for (label, value) in rows {
        html.push_str(&format!("  <tr><th>{label}</th><td>{value}</td></tr>\n"));
    }
    html.push_str("</table>\n");
    html.push_str(&format!("<p>{}</p>\n", escape_html(&enquiry.message)));
    html
}
