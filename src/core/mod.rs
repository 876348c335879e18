//! Calculators and enquiry handling, free of any presentation concerns

pub mod annuity;
pub mod capacity;
pub mod config;
pub mod enquiry;
pub mod error;
pub mod log;
pub mod money;
pub mod rate_limit;
pub mod repayment;
pub mod stamp_duty;

// Re-export main types for cleaner imports
pub use capacity::{
    BorrowingCapacityInput, BorrowingCapacityResult, ServiceabilityAssumptions,
    compute_borrowing_capacity, compute_borrowing_capacity_with,
};
pub use enquiry::{Enquiry, EnquiryRejection, validate_enquiry};
pub use error::InvalidInputError;
pub use money::Money;
pub use rate_limit::{RateLimitConfig, RateLimiter};
pub use repayment::{
    AmortizationYear, LoanRepaymentInput, LoanRepaymentResult, amortization_schedule,
    compute_loan_repayment,
};
pub use stamp_duty::{
    Jurisdiction, StampDutyInput, StampDutyResult, StampDutyTables, compute_stamp_duty,
    compute_stamp_duty_with,
};
