//! Transfer (stamp) duty on residential property purchases.
//!
//! Duty is a progressive bracket lookup. Only the Western Australian general
//! rate table is built in; other jurisdictions are accepted and, unless a
//! table is configured for them, computed with the WA table. The result always
//! records which table was used.
use super::error::{InvalidInputError, ensure_positive};
use super::money::{Money, round_cents, to_money};
use anyhow::anyhow;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt::Display;
use std::str::FromStr;
use tracing::{debug, warn};

/// Australian states and territories.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Ord, PartialOrd, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Jurisdiction {
    Wa,
    Nsw,
    Vic,
    Qld,
    Sa,
    Tas,
    Nt,
    Act,
}

impl Jurisdiction {
    pub const ALL: [Jurisdiction; 8] = [
        Jurisdiction::Wa,
        Jurisdiction::Nsw,
        Jurisdiction::Vic,
        Jurisdiction::Qld,
        Jurisdiction::Sa,
        Jurisdiction::Tas,
        Jurisdiction::Nt,
        Jurisdiction::Act,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            Jurisdiction::Wa => "Western Australia",
            Jurisdiction::Nsw => "New South Wales",
            Jurisdiction::Vic => "Victoria",
            Jurisdiction::Qld => "Queensland",
            Jurisdiction::Sa => "South Australia",
            Jurisdiction::Tas => "Tasmania",
            Jurisdiction::Nt => "Northern Territory",
            Jurisdiction::Act => "Australian Capital Territory",
        }
    }
}

impl Display for Jurisdiction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{}",
            match self {
                Jurisdiction::Wa => "WA",
                Jurisdiction::Nsw => "NSW",
                Jurisdiction::Vic => "VIC",
                Jurisdiction::Qld => "QLD",
                Jurisdiction::Sa => "SA",
                Jurisdiction::Tas => "TAS",
                Jurisdiction::Nt => "NT",
                Jurisdiction::Act => "ACT",
            }
        )
    }
}

impl FromStr for Jurisdiction {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Jurisdiction::ALL
            .into_iter()
            .find(|j| j.to_string().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| anyhow!("Unknown state or territory: {}", s))
    }
}

/// Duty for values above `threshold` is `base + (value - threshold) * rate`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DutyBracket {
    pub threshold: Decimal,
    pub base: Decimal,
    pub rate: Decimal,
}

/// Flat reduction for first home buyers purchasing at or below `max_value`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FirstHomeConcession {
    pub max_value: Decimal,
    pub reduction: Decimal,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StampDutySchedule {
    pub brackets: Vec<DutyBracket>,
    #[serde(default)]
    pub first_home_concession: Option<FirstHomeConcession>,
}

impl StampDutySchedule {
    /// Historical Western Australian general rates.
    pub fn western_australia() -> Self {
        let bracket = |threshold, base, rate| DutyBracket {
            threshold,
            base,
            rate,
        };
        StampDutySchedule {
            brackets: vec![
                bracket(dec!(0), dec!(0), dec!(0.015)),
                bracket(dec!(120000), dec!(1800), dec!(0.025)),
                bracket(dec!(150000), dec!(2550), dec!(0.035)),
                bracket(dec!(360000), dec!(9900), dec!(0.045)),
                bracket(dec!(725000), dec!(26325), dec!(0.055)),
            ],
            first_home_concession: Some(FirstHomeConcession {
                max_value: dec!(600000),
                reduction: dec!(19000),
            }),
        }
    }

    /// Checks the table starts at zero and thresholds strictly ascend.
    pub fn validate(&self) -> Result<(), InvalidInputError> {
        let first = self
            .brackets
            .first()
            .ok_or_else(|| InvalidInputError::InvalidSchedule("no brackets".to_string()))?;
        if !first.threshold.is_zero() {
            return Err(InvalidInputError::InvalidSchedule(format!(
                "first bracket must start at 0, not {}",
                first.threshold
            )));
        }
        if let Some(pair) = self
            .brackets
            .windows(2)
            .find(|pair| pair[1].threshold <= pair[0].threshold)
        {
            return Err(InvalidInputError::InvalidSchedule(format!(
                "threshold {} does not follow {}",
                pair[1].threshold, pair[0].threshold
            )));
        }
        if let Some(bracket) = self
            .brackets
            .iter()
            .find(|b| b.rate.is_sign_negative() || b.base.is_sign_negative())
        {
            return Err(InvalidInputError::InvalidSchedule(format!(
                "bracket at {} has a negative base or rate",
                bracket.threshold
            )));
        }
        if let Some(concession) = &self.first_home_concession
            && (concession.reduction.is_sign_negative() || concession.max_value.is_sign_negative())
        {
            return Err(InvalidInputError::InvalidSchedule(
                "first home concession must not be negative".to_string(),
            ));
        }
        Ok(())
    }

    /// Duty before any concession.
    pub fn base_duty(&self, value: Decimal) -> Decimal {
        self.brackets
            .iter()
            .rev()
            .find(|b| value > b.threshold)
            .map_or(Decimal::ZERO, |b| b.base + (value - b.threshold) * b.rate)
    }
}

/// Duty tables by jurisdiction, with WA as the fallback.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct StampDutyTables {
    schedules: HashMap<Jurisdiction, StampDutySchedule>,
}

impl Default for StampDutyTables {
    fn default() -> Self {
        let mut schedules = HashMap::new();
        schedules.insert(Jurisdiction::Wa, StampDutySchedule::western_australia());
        StampDutyTables { schedules }
    }
}

impl StampDutyTables {
    /// Adds or replaces the table for a jurisdiction.
    pub fn insert(
        &mut self,
        jurisdiction: Jurisdiction,
        schedule: StampDutySchedule,
    ) -> Result<(), InvalidInputError> {
        schedule.validate()?;
        self.schedules.insert(jurisdiction, schedule);
        Ok(())
    }

    pub fn validate(&self) -> Result<(), InvalidInputError> {
        self.schedules.values().try_for_each(|s| s.validate())
    }

    /// Returns the table to apply for `jurisdiction` and the jurisdiction it
    /// belongs to.
    pub fn schedule_for(&self, jurisdiction: Jurisdiction) -> (Jurisdiction, StampDutySchedule) {
        if let Some(schedule) = self.schedules.get(&jurisdiction) {
            return (jurisdiction, schedule.clone());
        }
        warn!("No stamp duty table for {jurisdiction}, falling back to WA rates");
        let schedule = self
            .schedules
            .get(&Jurisdiction::Wa)
            .cloned()
            .unwrap_or_else(StampDutySchedule::western_australia);
        (Jurisdiction::Wa, schedule)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct StampDutyInput {
    pub property_value: f64,
    pub jurisdiction: Jurisdiction,
    pub is_first_home_buyer: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StampDutyResult {
    pub estimated_duty: Money,
    pub duty_before_concession: Money,
    pub concession: Money,
    pub jurisdiction: Jurisdiction,
    /// Jurisdiction whose rate table produced the figure
    pub schedule_jurisdiction: Jurisdiction,
}

/// Estimates stamp duty using the built-in tables.
pub fn compute_stamp_duty(input: &StampDutyInput) -> Result<StampDutyResult, InvalidInputError> {
    compute_stamp_duty_with(input, &StampDutyTables::default())
}

pub fn compute_stamp_duty_with(
    input: &StampDutyInput,
    tables: &StampDutyTables,
) -> Result<StampDutyResult, InvalidInputError> {
    let value = to_money(
        "property value",
        ensure_positive("property value", input.property_value)?,
    )?;
    let (schedule_jurisdiction, schedule) = tables.schedule_for(input.jurisdiction);
    schedule.validate()?;

    let duty_before_concession = round_cents(schedule.base_duty(value));
    let estimated_duty = match &schedule.first_home_concession {
        Some(concession) if input.is_first_home_buyer && value <= concession.max_value => {
            (duty_before_concession - concession.reduction).max(Decimal::ZERO)
        }
        _ => duty_before_concession,
    };

    debug!(
        "Stamp duty on {value} in {} ({schedule_jurisdiction} rates): {estimated_duty}",
        input.jurisdiction
    );

    Ok(StampDutyResult {
        estimated_duty,
        duty_before_concession,
        concession: duty_before_concession - estimated_duty,
        jurisdiction: input.jurisdiction,
        schedule_jurisdiction,
    })
}
