use anyhow::Result;
use brokercalc::cli::OutputFormat;
use brokercalc::core::log::init_logging;
use brokercalc::core::{BorrowingCapacityInput, Jurisdiction, LoanRepaymentInput};
use clap::{CommandFactory, Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(version, about)]
struct Cli {
    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Path to optional configuration file
    #[arg(short, long, global = true)]
    config_path: Option<String>,

    /// Print results as JSON
    #[arg(long, global = true)]
    json: bool,

    #[command(subcommand)]
    command: Option<Commands>,
}

impl From<Commands> for brokercalc::AppCommand {
    fn from(cmd: Commands) -> brokercalc::AppCommand {
        match cmd {
            Commands::Repayment {
                principal,
                rate,
                term,
                schedule,
            } => brokercalc::AppCommand::Repayment {
                input: LoanRepaymentInput {
                    principal,
                    annual_rate_percent: rate,
                    term_years: term,
                },
                schedule,
            },
            Commands::Capacity {
                income,
                expenses,
                debts,
                deposit,
            } => brokercalc::AppCommand::Capacity(BorrowingCapacityInput {
                annual_income: income,
                monthly_expenses: expenses,
                existing_monthly_debt_service: debts,
                available_deposit: deposit,
            }),
            Commands::StampDuty {
                value,
                state,
                first_home,
            } => brokercalc::AppCommand::StampDuty {
                property_value: value,
                jurisdiction: state,
                first_home_buyer: first_home,
            },
            Commands::Enquiries { file, notifications } => brokercalc::AppCommand::Enquiries {
                path: file,
                show_notifications: notifications,
            },
            Commands::Setup => unreachable!("Setup command should be handled separately"),
        }
    }
}

#[derive(Subcommand)]
enum Commands {
    /// Create default configuration
    Setup,
    /// Calculate monthly repayments on a home loan
    Repayment {
        /// Amount borrowed
        #[arg(short, long)]
        principal: f64,
        /// Annual interest rate in percent
        #[arg(short, long, default_value_t = 6.5)]
        rate: f64,
        /// Loan term in years
        #[arg(short, long, default_value_t = 30)]
        term: u32,
        /// Show a year-by-year amortization schedule
        #[arg(short, long)]
        schedule: bool,
    },
    /// Estimate how much you could borrow
    Capacity {
        /// Gross annual income
        #[arg(short, long)]
        income: f64,
        /// Monthly living expenses
        #[arg(short, long, default_value_t = 0.0)]
        expenses: f64,
        /// Existing debt commitments
        #[arg(long, default_value_t = 0.0)]
        debts: f64,
        /// Available deposit
        #[arg(long, default_value_t = 0.0)]
        deposit: f64,
    },
    /// Estimate stamp duty on a property purchase
    StampDuty {
        /// Purchase price of the property
        #[arg(long)]
        value: f64,
        /// State or territory, e.g. WA or NSW
        #[arg(long)]
        state: Option<Jurisdiction>,
        /// Apply the first home buyer concession
        #[arg(long)]
        first_home: bool,
    },
    /// Validate a YAML file of contact enquiries
    Enquiries {
        file: PathBuf,
        /// Print the notification for each accepted enquiry
        #[arg(short, long)]
        notifications: bool,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    init_logging(cli.verbose);

    let format = if cli.json {
        OutputFormat::Json
    } else {
        OutputFormat::Table
    };
    let result = match cli.command {
        Some(Commands::Setup) => brokercalc::cli::setup::setup(),
        Some(cmd) => brokercalc::run_command(cmd.into(), cli.config_path.as_deref(), format),
        None => {
            Cli::command().print_help()?;
            Ok(())
        }
    };

    if let Err(e) = &result {
        tracing::error!(error = %e, "Application failed");
    }
    result
}
