use super::{OutputFormat, print_json, ui};
use crate::core::enquiry::render_notification;
use crate::core::{Enquiry, RateLimitConfig, RateLimiter, validate_enquiry};
use anyhow::{Context, Result};
use chrono::Utc;
use comfy_table::{Cell, Color};
use serde::Serialize;
use std::path::Path;
use tracing::{debug, info};

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum EnquiryOutcome {
    Accepted { enquiry: Enquiry },
    Rejected { name: String, email: String, reasons: Vec<String> },
    RateLimited { name: String, email: String },
}

/// Checks each enquiry in submission order, rate limiting per email address.
pub fn process_enquiries(enquiries: &[Enquiry], limits: RateLimitConfig) -> Vec<EnquiryOutcome> {
    let mut limiter = RateLimiter::new(limits);

    enquiries
        .iter()
        .map(|enquiry| {
            let identifier = enquiry.email.trim().to_lowercase();
            let submitted_at = enquiry.submitted_at.unwrap_or_else(Utc::now);
            if !limiter.check_at(&identifier, submitted_at) {
                return EnquiryOutcome::RateLimited {
                    name: enquiry.name.clone(),
                    email: enquiry.email.clone(),
                };
            }
            match validate_enquiry(enquiry) {
                Ok(clean) => EnquiryOutcome::Accepted { enquiry: clean },
                Err(rejection) => EnquiryOutcome::Rejected {
                    name: enquiry.name.clone(),
                    email: enquiry.email.clone(),
                    reasons: rejection.errors.iter().map(ToString::to_string).collect(),
                },
            }
        })
        .collect()
}

pub fn load_enquiries<P: AsRef<Path>>(path: P) -> Result<Vec<Enquiry>> {
    let content = std::fs::read_to_string(path.as_ref()).with_context(|| {
        format!(
            "Failed to read enquiries file: {}",
            path.as_ref().display()
        )
    })?;
    let enquiries: Vec<Enquiry> = serde_yaml::from_str(&content).with_context(|| {
        format!(
            "Failed to parse enquiries file: {}",
            path.as_ref().display()
        )
    })?;
    debug!("Loaded {} enquiries", enquiries.len());
    Ok(enquiries)
}

pub fn run(
    path: &Path,
    limits: RateLimitConfig,
    show_notifications: bool,
    format: OutputFormat,
) -> Result<()> {
    let enquiries = load_enquiries(path)?;
    if enquiries.is_empty() {
        println!("No enquiries to check.");
        return Ok(());
    }

    let outcomes = process_enquiries(&enquiries, limits);
    let accepted = outcomes
        .iter()
        .filter(|o| matches!(o, EnquiryOutcome::Accepted { .. }))
        .count();
    info!("{accepted} of {} enquiries accepted", outcomes.len());

    match format {
        OutputFormat::Json => print_json(&outcomes)?,
        OutputFormat::Table => {
            println!("{}", render(&outcomes));
            if show_notifications {
                for outcome in &outcomes {
                    if let EnquiryOutcome::Accepted { enquiry } = outcome {
                        ui::print_separator();
                        println!("{}", render_notification(enquiry));
                    }
                }
            }
        }
    }
    Ok(())
}

fn render(outcomes: &[EnquiryOutcome]) -> String {
    let mut table = ui::new_styled_table();
    table.set_header(vec![
        ui::header_cell("Name"),
        ui::header_cell("Email"),
        ui::header_cell("Status"),
        ui::header_cell("Details"),
    ]);

    for outcome in outcomes {
        let row = match outcome {
            EnquiryOutcome::Accepted { enquiry } => vec![
                Cell::new(&enquiry.name),
                Cell::new(&enquiry.email),
                Cell::new("Accepted").fg(Color::Green),
                Cell::new(enquiry.service.as_deref().unwrap_or("")),
            ],
            EnquiryOutcome::Rejected {
                name,
                email,
                reasons,
            } => vec![
                Cell::new(name),
                Cell::new(email),
                Cell::new("Rejected").fg(Color::Red),
                Cell::new(reasons.join("\n")),
            ],
            EnquiryOutcome::RateLimited { name, email } => vec![
                Cell::new(name),
                Cell::new(email),
                Cell::new("Rate limited").fg(Color::Yellow),
                Cell::new("Too many enquiries, try again later"),
            ],
        };
        table.add_row(row);
    }

    let accepted = outcomes
        .iter()
        .filter(|o| matches!(o, EnquiryOutcome::Accepted { .. }))
        .count();
    format!(
        "{}\n\n{table}\n\n{}: {}",
        ui::style_text("Enquiries", ui::StyleType::Title),
        ui::style_text("Accepted", ui::StyleType::TotalLabel),
        ui::style_text(
            &format!("{accepted}/{}", outcomes.len()),
            ui::StyleType::TotalValue
        )
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{DateTime, TimeZone};

    fn enquiry(email: &str, at: DateTime<Utc>) -> Enquiry {
        Enquiry {
            name: "Sam Lee".to_string(),
            email: email.to_string(),
            phone: None,
            message: "Please call me about a first home loan.".to_string(),
            consultation: false,
            service: Some("first-home-buyer".to_string()),
            preferred_contact: None,
            submitted_at: Some(at),
        }
    }

    #[test]
    fn test_process_enquiries() {
        let start = Utc.timestamp_opt(1_700_000_000, 0).unwrap();
        let limits = RateLimitConfig {
            max_attempts: 2,
            window_secs: 60,
        };
        let mut bad = enquiry("nobody", start);
        bad.message = "short".to_string();

        let outcomes = process_enquiries(
            &[
                enquiry("sam@example.com", start),
                enquiry("SAM@example.com", start + chrono::Duration::seconds(5)),
                enquiry("sam@example.com", start + chrono::Duration::seconds(10)),
                bad,
                enquiry("sam@example.com", start + chrono::Duration::seconds(120)),
            ],
            limits,
        );

        assert!(matches!(outcomes[0], EnquiryOutcome::Accepted { .. }));
        assert!(matches!(outcomes[1], EnquiryOutcome::Accepted { .. }));
        assert!(matches!(outcomes[2], EnquiryOutcome::RateLimited { .. }));
        match &outcomes[3] {
            EnquiryOutcome::Rejected { reasons, .. } => {
                assert_eq!(reasons.len(), 2);
                assert!(reasons[0].starts_with("email:"));
                assert!(reasons[1].starts_with("message:"));
            }
            other => panic!("Expected a rejection, got {other:?}"),
        }
        assert!(matches!(outcomes[4], EnquiryOutcome::Accepted { .. }));

        let output = render(&outcomes);
        assert!(output.contains("Rate limited"));
        assert!(output.contains("3/5"));
    }

    #[test]
    fn test_load_enquiries_from_yaml() -> Result<()> {
        let file = tempfile::NamedTempFile::new()?;
        std::fs::write(
            file.path(),
            r#"
- name: "Alex Smith"
  email: "alex@example.com"
  phone: "0412 345 678"
  message: "Interested in investment property finance."
  preferred_contact: phone
  submitted_at: "2025-01-01T09:00:00Z"
"#,
        )?;
        let enquiries = load_enquiries(file.path())?;
        assert_eq!(enquiries.len(), 1);
        assert_eq!(enquiries[0].phone.as_deref(), Some("0412 345 678"));
        assert!(!enquiries[0].consultation);
        assert!(enquiries[0].submitted_at.is_some());
        Ok(())
    }
}
