use super::{OutputFormat, print_json, ui};
use crate::core::{StampDutyInput, StampDutyResult, StampDutyTables, compute_stamp_duty_with};
use anyhow::Result;
use serde::Serialize;
use tracing::info;

#[derive(Debug, Serialize)]
struct StampDutyReport {
    input: StampDutyInput,
    result: StampDutyResult,
}

pub fn run(input: &StampDutyInput, tables: &StampDutyTables, format: OutputFormat) -> Result<()> {
    info!(
        "Calculating stamp duty on {} in {}",
        input.property_value, input.jurisdiction
    );
    let report = StampDutyReport {
        input: *input,
        result: compute_stamp_duty_with(input, tables)?,
    };

    match format {
        OutputFormat::Json => print_json(&report)?,
        OutputFormat::Table => println!("{}", render(&report)),
    }
    Ok(())
}

fn render(report: &StampDutyReport) -> String {
    let StampDutyReport { input, result } = report;

    let mut rows = vec![
        (
            "Property value",
            ui::amount_cell(input.property_value),
        ),
        (
            "State",
            ui::value_cell(result.jurisdiction.name()),
        ),
        (
            "First home buyer",
            ui::value_cell(if input.is_first_home_buyer { "Yes" } else { "No" }),
        ),
        ("Duty before concession", ui::currency_cell(result.duty_before_concession)),
    ];
    if !result.concession.is_zero() {
        rows.push(("Concession", ui::currency_cell(result.concession)));
    }
    rows.push(("Estimated stamp duty", ui::total_cell(result.estimated_duty)));

    let mut output = format!(
        "{}\n\n{}",
        ui::style_text("Stamp Duty", ui::StyleType::Title),
        ui::summary_table(rows)
    );
    if result.schedule_jurisdiction != result.jurisdiction {
        output.push_str(&format!(
            "\n\n{}",
            ui::style_text(
                &format!(
                    "No rate table is configured for {}; {} rates were used. Figures are indicative only.",
                    result.jurisdiction, result.schedule_jurisdiction
                ),
                ui::StyleType::Error
            )
        ));
    }
    output
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::{Jurisdiction, compute_stamp_duty};

    fn report(jurisdiction: Jurisdiction, first_home: bool) -> StampDutyReport {
        let input = StampDutyInput {
            property_value: 600_000.0,
            jurisdiction,
            is_first_home_buyer: first_home,
        };
        StampDutyReport {
            input,
            result: compute_stamp_duty(&input).unwrap(),
        }
    }

    #[test]
    fn test_render_concession_row() {
        let output = render(&report(Jurisdiction::Wa, true));
        assert!(output.contains("Concession"));
        assert!(output.contains("$1,700.00"));
        assert!(output.contains("$600,000.00"));
        assert!(!output.contains("indicative only"));
    }

    #[test]
    fn test_render_warns_on_fallback_table() {
        let output = render(&report(Jurisdiction::Qld, false));
        assert!(output.contains("$20,700.00"));
        assert!(output.contains("No rate table is configured for QLD; WA rates were used"));
    }
}
