//! Monthly repayments on a fixed-rate amortizing loan.
use super::annuity;
use super::error::{InvalidInputError, ensure_non_negative};
use super::money::{Money, round_cents, round_cents_up, to_money};
use rust_decimal::Decimal;
use rust_decimal::prelude::*;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};
use tracing::debug;

const MONTHS_PER_YEAR: u64 = 12;
/// Longest loan term accepted, in years
pub const MAX_TERM_YEARS: u32 = 100;
const ONE_CENT: Money = dec!(0.01);

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LoanRepaymentInput {
    /// Amount borrowed
    pub principal: f64,
    /// Nominal annual interest rate, in percent
    pub annual_rate_percent: f64,
    pub term_years: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LoanRepaymentResult {
    pub monthly_payment: Money,
    pub total_interest: Money,
    pub total_repayment: Money,
    pub number_of_payments: u64,
}

/// One year of an amortization schedule.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AmortizationYear {
    pub year: u32,
    pub opening_balance: Money,
    pub interest_paid: Money,
    pub principal_paid: Money,
    pub closing_balance: Money,
}

struct ValidatedLoan {
    principal: f64,
    principal_money: Money,
    monthly_rate: f64,
    periods: u64,
}

fn validate(input: &LoanRepaymentInput) -> Result<ValidatedLoan, InvalidInputError> {
    let principal = ensure_non_negative("principal", input.principal)?;
    let rate_percent = ensure_non_negative("annual rate", input.annual_rate_percent)?;
    if input.term_years == 0 {
        return Err(InvalidInputError::NotPositive { field: "term" });
    }
    if input.term_years > MAX_TERM_YEARS {
        return Err(InvalidInputError::OutOfRange {
            field: "term",
            reason: format!(
                "{} years is longer than {MAX_TERM_YEARS} years",
                input.term_years
            ),
        });
    }

    Ok(ValidatedLoan {
        principal,
        principal_money: to_money("principal", principal)?,
        monthly_rate: annuity::monthly_rate(rate_percent),
        periods: u64::from(input.term_years) * MONTHS_PER_YEAR,
    })
}

/// Computes the fixed monthly payment and lifetime interest of a loan.
///
/// The payment is rounded to cents, but never below the cent amount that
/// repays the principal without interest. A positive principal therefore
/// always gives a positive payment and non-negative interest. `total_interest`
/// is derived from the rounded payment so
/// `total_interest == monthly_payment * n - principal` holds exactly.
pub fn compute_loan_repayment(
    input: &LoanRepaymentInput,
) -> Result<LoanRepaymentResult, InvalidInputError> {
    let loan = validate(input)?;
    compute_validated(&loan)
}

fn compute_validated(loan: &ValidatedLoan) -> Result<LoanRepaymentResult, InvalidInputError> {
    let payment = annuity::payment(loan.principal, loan.monthly_rate, loan.periods);
    let mut monthly_payment = to_money("monthly payment", payment)?;
    if loan.principal > 0.0 {
        let interest_free = round_cents_up(loan.principal_money / Decimal::from(loan.periods));
        monthly_payment = monthly_payment.max(interest_free).max(ONE_CENT);
    }
    let total_repayment = monthly_payment
        .checked_mul(Decimal::from(loan.periods))
        .ok_or_else(|| InvalidInputError::OutOfRange {
            field: "term",
            reason: "total repayment exceeds the representable range".to_string(),
        })?;
    let total_interest = total_repayment - loan.principal_money;

    debug!(
        "Loan of {} over {} payments: monthly {monthly_payment}, interest {total_interest}",
        loan.principal_money, loan.periods
    );

    Ok(LoanRepaymentResult {
        monthly_payment,
        total_interest,
        total_repayment,
        number_of_payments: loan.periods,
    })
}

/// Builds a year-by-year amortization schedule for the loan.
///
/// Monthly interest is charged on the outstanding balance and rounded to
/// cents. The final instalment repays whatever balance remains, so the last
/// row always closes at zero.
pub fn amortization_schedule(
    input: &LoanRepaymentInput,
) -> Result<Vec<AmortizationYear>, InvalidInputError> {
    let loan = validate(input)?;
    let monthly_payment = compute_validated(&loan)?.monthly_payment;
    let rate = Decimal::from_f64(loan.monthly_rate).ok_or_else(|| InvalidInputError::OutOfRange {
        field: "annual rate",
        reason: "rate cannot be represented as a decimal".to_string(),
    })?;

    let mut balance = loan.principal_money;
    let mut rows = Vec::new();

    for year in 1..=input.term_years {
        let opening_balance = balance;
        let mut interest_paid = Decimal::ZERO;
        let mut principal_paid = Decimal::ZERO;

        for month in 1..=MONTHS_PER_YEAR {
            if balance.is_zero() {
                break;
            }
            let interest = balance
                .checked_mul(rate)
                .map(round_cents)
                .ok_or_else(|| InvalidInputError::OutOfRange {
                    field: "annual rate",
                    reason: "monthly interest exceeds the representable range".to_string(),
                })?;
            let is_final = year == input.term_years && month == MONTHS_PER_YEAR;
            let mut repaid = (monthly_payment - interest).max(Decimal::ZERO);
            if is_final || repaid > balance {
                repaid = balance;
            }

            balance -= repaid;
            interest_paid += interest;
            principal_paid += repaid;
        }

        rows.push(AmortizationYear {
            year,
            opening_balance,
            interest_paid,
            principal_paid,
            closing_balance: balance,
        });
    }

    debug!("Built amortization schedule with {} rows", rows.len());
    Ok(rows)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn loan(principal: f64, rate: f64, years: u32) -> LoanRepaymentInput {
        LoanRepaymentInput {
            principal,
            annual_rate_percent: rate,
            term_years: years,
        }
    }

    #[test]
    fn test_standard_mortgage_payment() {
        let result = compute_loan_repayment(&loan(500_000.0, 6.5, 30)).unwrap();
        let diff = (result.monthly_payment - dec!(3160.34)).abs();
        assert!(diff <= dec!(0.5), "monthly payment was {}", result.monthly_payment);
        assert_eq!(result.number_of_payments, 360);
    }

    #[test]
    fn test_total_interest_identity() {
        for (principal, rate, years) in [(500_000.0, 6.5, 30), (250_000.0, 3.2, 25), (80_000.0, 9.9, 7)] {
            let result = compute_loan_repayment(&loan(principal, rate, years)).unwrap();
            assert!(result.monthly_payment > Decimal::ZERO);
            let expected = result.monthly_payment * Decimal::from(years * 12)
                - Decimal::from_f64(principal).unwrap();
            assert_eq!(result.total_interest, expected);
            assert_eq!(
                result.total_repayment,
                result.monthly_payment * Decimal::from(years * 12)
            );
        }
    }

    #[test]
    fn test_zero_interest_loan() {
        let result = compute_loan_repayment(&loan(120_000.0, 0.0, 10)).unwrap();
        assert_eq!(result.monthly_payment, dec!(1000));
        assert_eq!(result.total_interest, Decimal::ZERO);
    }

    #[test]
    fn test_small_loans_keep_positive_payment() {
        let principals = [0.001, 0.01, 1.0, 17.5, 1000.0, 250_000.0, 5_000_000.0];
        let rates = [0.0, 0.01, 1.0, 6.5, 25.0];
        let terms = [1, 7, 30, 100];
        for principal in principals {
            for rate in rates {
                for years in terms {
                    let result = compute_loan_repayment(&loan(principal, rate, years)).unwrap();
                    assert!(
                        result.monthly_payment > Decimal::ZERO,
                        "payment was {} for {principal} at {rate}% over {years} years",
                        result.monthly_payment
                    );
                    assert!(
                        result.total_interest >= Decimal::ZERO,
                        "interest was {} for {principal} at {rate}% over {years} years",
                        result.total_interest
                    );
                    assert_eq!(
                        result.total_repayment,
                        result.monthly_payment * Decimal::from(result.number_of_payments)
                    );
                }
            }
        }
    }

    #[test]
    fn test_zero_interest_payment_rounds_up_to_cover_principal() {
        let result = compute_loan_repayment(&loan(1000.0, 0.0, 100)).unwrap();
        assert_eq!(result.monthly_payment, dec!(0.84));
        assert_eq!(result.total_interest, dec!(8.00));

        let tiny = compute_loan_repayment(&loan(1.0, 1.0, 30)).unwrap();
        assert_eq!(tiny.monthly_payment, dec!(0.01));
        assert_eq!(tiny.total_interest, dec!(2.60));
    }

    #[test]
    fn test_zero_principal_is_zero_result() {
        let result = compute_loan_repayment(&loan(0.0, 6.5, 30)).unwrap();
        assert_eq!(result.monthly_payment, Decimal::ZERO);
        assert_eq!(result.total_interest, Decimal::ZERO);
    }

    #[test]
    fn test_rejects_invalid_inputs() {
        assert_eq!(
            compute_loan_repayment(&loan(500_000.0, 6.5, 0)),
            Err(InvalidInputError::NotPositive { field: "term" })
        );
        assert!(matches!(
            compute_loan_repayment(&loan(-1.0, 6.5, 30)),
            Err(InvalidInputError::Negative { field: "principal", .. })
        ));
        assert!(matches!(
            compute_loan_repayment(&loan(500_000.0, -0.5, 30)),
            Err(InvalidInputError::Negative { field: "annual rate", .. })
        ));
        assert_eq!(
            compute_loan_repayment(&loan(f64::NAN, 6.5, 30)),
            Err(InvalidInputError::NotFinite { field: "principal" })
        );
        assert_eq!(
            compute_loan_repayment(&loan(500_000.0, f64::INFINITY, 30)),
            Err(InvalidInputError::NotFinite { field: "annual rate" })
        );
    }

    #[test]
    fn test_schedule_pays_off_loan() {
        let input = loan(500_000.0, 6.5, 30);
        let schedule = amortization_schedule(&input).unwrap();

        assert_eq!(schedule.len(), 30);
        assert_eq!(schedule[0].year, 1);
        assert_eq!(schedule[0].opening_balance, dec!(500000));
        assert_eq!(schedule.last().unwrap().closing_balance, Decimal::ZERO);

        let repaid: Decimal = schedule.iter().map(|row| row.principal_paid).sum();
        assert_eq!(repaid, dec!(500000));

        for pair in schedule.windows(2) {
            assert_eq!(pair[0].closing_balance, pair[1].opening_balance);
            assert!(pair[1].interest_paid <= pair[0].interest_paid);
        }
    }

    #[test]
    fn test_schedule_zero_interest() {
        let schedule = amortization_schedule(&loan(120_000.0, 0.0, 10)).unwrap();
        assert_eq!(schedule.len(), 10);
        for row in &schedule {
            assert_eq!(row.interest_paid, Decimal::ZERO);
            assert_eq!(row.principal_paid, dec!(12000));
        }
    }

    #[test]
    fn test_schedule_rejects_invalid_term() {
        assert!(amortization_schedule(&loan(100_000.0, 5.0, 0)).is_err());
        assert!(matches!(
            amortization_schedule(&loan(100_000.0, 5.0, 4_000_000_000)),
            Err(InvalidInputError::OutOfRange { field: "term", .. })
        ));
        assert!(compute_loan_repayment(&loan(100_000.0, 5.0, MAX_TERM_YEARS + 1)).is_err());
        assert!(compute_loan_repayment(&loan(100_000.0, 5.0, MAX_TERM_YEARS)).is_ok());
    }

    #[test]
    fn test_schedule_closes_for_rounded_up_payment() {
        let schedule = amortization_schedule(&loan(1000.0, 0.0, 100)).unwrap();
        assert_eq!(schedule.len(), 100);
        assert_eq!(schedule.last().unwrap().closing_balance, Decimal::ZERO);
        let repaid: Decimal = schedule.iter().map(|row| row.principal_paid).sum();
        assert_eq!(repaid, dec!(1000));
    }
}
