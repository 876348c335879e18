use super::{OutputFormat, print_json, ui};
use crate::core::{
    AmortizationYear, LoanRepaymentInput, LoanRepaymentResult, amortization_schedule,
    compute_loan_repayment,
};
use anyhow::Result;
use comfy_table::Cell;
use serde::Serialize;
use tracing::info;

#[derive(Debug, Serialize)]
struct RepaymentReport {
    input: LoanRepaymentInput,
    result: LoanRepaymentResult,
    #[serde(skip_serializing_if = "Option::is_none")]
    schedule: Option<Vec<AmortizationYear>>,
}

pub fn run(input: &LoanRepaymentInput, show_schedule: bool, format: OutputFormat) -> Result<()> {
    info!(
        "Calculating repayments on {} at {}% over {} years",
        input.principal, input.annual_rate_percent, input.term_years
    );
    let result = compute_loan_repayment(input)?;
    let schedule = if show_schedule {
        Some(amortization_schedule(input)?)
    } else {
        None
    };

    let report = RepaymentReport {
        input: *input,
        result,
        schedule,
    };
    match format {
        OutputFormat::Json => print_json(&report)?,
        OutputFormat::Table => println!("{}", render(&report)),
    }
    Ok(())
}

fn render(report: &RepaymentReport) -> String {
    let RepaymentReport {
        input,
        result,
        schedule,
    } = report;

    let table = ui::summary_table(vec![
        ("Loan amount", ui::amount_cell(input.principal)),
        (
            "Interest rate",
            ui::value_cell(format!("{:.2}%", input.annual_rate_percent)),
        ),
        (
            "Loan term",
            ui::value_cell(format!("{} years", input.term_years)),
        ),
        ("Monthly repayment", ui::total_cell(result.monthly_payment)),
        ("Total interest", ui::currency_cell(result.total_interest)),
        ("Total repayments", ui::currency_cell(result.total_repayment)),
    ]);

    let mut output = format!(
        "{}\n\n{table}",
        ui::style_text("Loan Repayments", ui::StyleType::Title)
    );

    if let Some(rows) = schedule {
        let mut schedule_table = ui::new_styled_table();
        schedule_table.set_header(vec![
            ui::header_cell("Year"),
            ui::header_cell("Opening balance"),
            ui::header_cell("Interest"),
            ui::header_cell("Principal"),
            ui::header_cell("Closing balance"),
        ]);
        for row in rows {
            schedule_table.add_row(vec![
                Cell::new(row.year),
                ui::currency_cell(row.opening_balance),
                ui::currency_cell(row.interest_paid),
                ui::currency_cell(row.principal_paid),
                ui::currency_cell(row.closing_balance),
            ]);
        }
        output.push_str(&format!(
            "\n\n{}\n\n{schedule_table}",
            ui::style_text("Amortization Schedule", ui::StyleType::Title)
        ));
    }

    output
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_render_includes_schedule_when_requested() {
        let input = LoanRepaymentInput {
            principal: 500_000.0,
            annual_rate_percent: 6.5,
            term_years: 2,
        };
        let report = RepaymentReport {
            input,
            result: compute_loan_repayment(&input).unwrap(),
            schedule: Some(amortization_schedule(&input).unwrap()),
        };

        let output = render(&report);
        assert!(output.contains("Monthly repayment"));
        assert!(output.contains("Amortization Schedule"));
        assert!(output.contains("$500,000.00"));
    }

    #[test]
    fn test_json_omits_missing_schedule() {
        let input = LoanRepaymentInput {
            principal: 120_000.0,
            annual_rate_percent: 0.0,
            term_years: 10,
        };
        let report = RepaymentReport {
            input,
            result: compute_loan_repayment(&input).unwrap(),
            schedule: None,
        };
        let output = render(&report);
        assert!(output.contains("$120,000.00"));
        assert!(!output.contains("120000.00"));

        let json = serde_json::to_value(&report).unwrap();
        assert_eq!(json["result"]["monthly_payment"], "1000");
        assert!(json.get("schedule").is_none());
    }
}
