pub mod cli;
pub mod core;

use crate::cli::OutputFormat;
use crate::core::config::AppConfig;
use crate::core::{BorrowingCapacityInput, Jurisdiction, LoanRepaymentInput, StampDutyInput};
use anyhow::Result;
use std::path::PathBuf;
use tracing::{debug, info};

pub enum AppCommand {
    Repayment {
        input: LoanRepaymentInput,
        schedule: bool,
    },
    Capacity(BorrowingCapacityInput),
    StampDuty {
        property_value: f64,
        /// Falls back to the configured default jurisdiction
        jurisdiction: Option<Jurisdiction>,
        first_home_buyer: bool,
    },
    Enquiries {
        path: PathBuf,
        show_notifications: bool,
    },
}

pub fn run_command(
    command: AppCommand,
    config_path: Option<&str>,
    format: OutputFormat,
) -> Result<()> {
    info!("brokercalc starting...");

    let config = match config_path {
        Some(path) => AppConfig::load_from_path(path)?,
        None => AppConfig::load_or_default()?,
    };
    debug!("Loaded config: {config:#?}");

    match command {
        AppCommand::Repayment { input, schedule } => cli::repayment::run(&input, schedule, format),
        AppCommand::Capacity(input) => cli::capacity::run(&input, &config.serviceability, format),
        AppCommand::StampDuty {
            property_value,
            jurisdiction,
            first_home_buyer,
        } => {
            let input = StampDutyInput {
                property_value,
                jurisdiction: jurisdiction.unwrap_or(config.stamp_duty.default_jurisdiction),
                is_first_home_buyer: first_home_buyer,
            };
            cli::stamp_duty::run(&input, &config.stamp_duty.tables, format)
        }
        AppCommand::Enquiries {
            path,
            show_notifications,
        } => cli::enquiries::run(
            &path,
            config.enquiries.rate_limit,
            show_notifications,
            format,
        ),
    }
}
