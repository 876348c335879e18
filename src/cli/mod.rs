//! Command implementations: gather inputs, call the calculators, render output

pub mod capacity;
pub mod enquiries;
pub mod repayment;
pub mod setup;
pub mod stamp_duty;
pub mod ui;

use anyhow::{Context, Result};
use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OutputFormat {
    #[default]
    Table,
    Json,
}

/// Prints `report` as pretty JSON.
pub(crate) fn print_json<T: Serialize>(report: &T) -> Result<()> {
    let json = serde_json::to_string_pretty(report).context("Failed to serialize report")?;
    println!("{json}");
    Ok(())
}
