//! Borrowing capacity estimate.
//!
//! This is a rough serviceability heuristic, not a credit assessment. The
//! figures it produces are estimates only and depend entirely on the
//! [`ServiceabilityAssumptions`] in force.
use super::annuity;
use super::error::{InvalidInputError, ensure_non_negative};
use super::money::{Money, to_money};
use serde::{Deserialize, Serialize};
use tracing::debug;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BorrowingCapacityInput {
    pub annual_income: f64,
    pub monthly_expenses: f64,
    /// Existing debt commitments, scaled by
    /// [`ServiceabilityAssumptions::debt_service_factor`] into a monthly load.
    pub existing_monthly_debt_service: f64,
    pub available_deposit: f64,
}

/// Fixed assumptions used to turn surplus income into a loan amount.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ServiceabilityAssumptions {
    /// Interest rate the loan is assessed at, in percent
    pub assessment_rate_percent: f64,
    pub term_years: u32,
    /// Share of net monthly surplus assumed available for repayments
    pub surplus_ratio: f64,
    /// Multiplier converting existing debts into a monthly servicing load
    pub debt_service_factor: f64,
}

impl Default for ServiceabilityAssumptions {
    fn default() -> Self {
        ServiceabilityAssumptions {
            assessment_rate_percent: 6.5,
            term_years: 30,
            surplus_ratio: 0.30,
            debt_service_factor: 0.03,
        }
    }
}

impl ServiceabilityAssumptions {
    pub fn validate(&self) -> Result<(), InvalidInputError> {
        ensure_non_negative("assessment rate", self.assessment_rate_percent)?;
        ensure_non_negative("debt service factor", self.debt_service_factor)?;
        let ratio = ensure_non_negative("surplus ratio", self.surplus_ratio)?;
        if ratio > 1.0 {
            return Err(InvalidInputError::OutOfRange {
                field: "surplus ratio",
                reason: format!("{ratio} is greater than 1"),
            });
        }
        if self.term_years == 0 {
            return Err(InvalidInputError::NotPositive {
                field: "assessment term",
            });
        }
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BorrowingCapacityResult {
    pub max_loan_amount: Money,
    pub max_property_value: Money,
    pub max_monthly_payment: Money,
    pub assumptions: ServiceabilityAssumptions,
}

/// Estimates borrowing capacity with the default assumptions.
pub fn compute_borrowing_capacity(
    input: &BorrowingCapacityInput,
) -> Result<BorrowingCapacityResult, InvalidInputError> {
    compute_borrowing_capacity_with(input, &ServiceabilityAssumptions::default())
}

/// Estimates the largest loan the surplus income could service, and the
/// property value reachable with the deposit on top. Never negative.
pub fn compute_borrowing_capacity_with(
    input: &BorrowingCapacityInput,
    assumptions: &ServiceabilityAssumptions,
) -> Result<BorrowingCapacityResult, InvalidInputError> {
    let annual_income = ensure_non_negative("annual income", input.annual_income)?;
    let expenses = ensure_non_negative("monthly expenses", input.monthly_expenses)?;
    let debts = ensure_non_negative("existing debts", input.existing_monthly_debt_service)?;
    let deposit = ensure_non_negative("deposit", input.available_deposit)?;
    assumptions.validate()?;

    let monthly_income = annual_income / 12.0;
    let available_income = monthly_income - expenses - debts * assumptions.debt_service_factor;
    let max_payment = (available_income * assumptions.surplus_ratio).max(0.0);

    let rate = annuity::monthly_rate(assumptions.assessment_rate_percent);
    let periods = u64::from(assumptions.term_years) * 12;
    let max_loan = annuity::present_value(max_payment, rate, periods).max(0.0);

    debug!(
        "Available monthly income {available_income:.2}, max payment {max_payment:.2}, max loan {max_loan:.2}"
    );

    let max_loan_amount = to_money("maximum loan", max_loan)?;
    let max_property_value = max_loan_amount + to_money("deposit", deposit)?;

    Ok(BorrowingCapacityResult {
        max_loan_amount,
        max_property_value,
        max_monthly_payment: to_money("maximum payment", max_payment)?,
        assumptions: *assumptions,
    })
}
