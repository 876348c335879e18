use super::{OutputFormat, print_json, ui};
use crate::core::{
    BorrowingCapacityInput, BorrowingCapacityResult, ServiceabilityAssumptions,
    compute_borrowing_capacity_with,
};
use anyhow::Result;
use serde::Serialize;
use tracing::info;

#[derive(Debug, Serialize)]
struct CapacityReport {
    input: BorrowingCapacityInput,
    result: BorrowingCapacityResult,
    disclaimer: String,
}

fn disclaimer(assumptions: &ServiceabilityAssumptions) -> String {
    format!(
        "Estimate only. Assumes {:.0}% of monthly surplus goes to repayments, assessed at {:.2}% over {} years, with existing debts counted at {:.1}% per month. This is not a credit assessment.",
        assumptions.surplus_ratio * 100.0,
        assumptions.assessment_rate_percent,
        assumptions.term_years,
        assumptions.debt_service_factor * 100.0,
    )
}

pub fn run(
    input: &BorrowingCapacityInput,
    assumptions: &ServiceabilityAssumptions,
    format: OutputFormat,
) -> Result<()> {
    info!("Estimating borrowing capacity");
    let result = compute_borrowing_capacity_with(input, assumptions)?;
    let report = CapacityReport {
        input: *input,
        disclaimer: disclaimer(&result.assumptions),
        result,
    };

    match format {
        OutputFormat::Json => print_json(&report)?,
        OutputFormat::Table => println!("{}", render(&report)),
    }
    Ok(())
}

fn render(report: &CapacityReport) -> String {
    let CapacityReport {
        input,
        result,
        disclaimer,
    } = report;

    let table = ui::summary_table(vec![
        (
            "Annual income",
            ui::amount_cell(input.annual_income),
        ),
        (
            "Monthly expenses",
            ui::amount_cell(input.monthly_expenses),
        ),
        (
            "Existing debts",
            ui::amount_cell(input.existing_monthly_debt_service),
        ),
        ("Affordable repayment", ui::currency_cell(result.max_monthly_payment)),
        ("Maximum loan", ui::total_cell(result.max_loan_amount)),
        ("Maximum property value", ui::currency_cell(result.max_property_value)),
    ]);

    format!(
        "{}\n\n{table}\n\n{}",
        ui::style_text("Borrowing Capacity", ui::StyleType::Title),
        ui::style_text(disclaimer, ui::StyleType::Subtle)
    )
}
