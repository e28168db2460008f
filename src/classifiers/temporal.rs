// ⏰ Temporal Classifier - Instant vs duration, plus period buckets
// Falls back to the context period block when the fact property is silent

use crate::classifiers::Classify;
use crate::facts::{EnrichedFact, PeriodType};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

// ============================================================================
// TEMPORAL TYPE
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TemporalType {
    Instant,
    Duration,
    Unknown,
}

impl TemporalType {
    pub fn as_str(&self) -> &'static str {
        match self {
            TemporalType::Instant => "instant",
            TemporalType::Duration => "duration",
            TemporalType::Unknown => "unknown",
        }
    }
}

/// Period-length bucket for duration facts.
/// Day windows are tuned for US filing calendars.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PeriodCategory {
    /// 85-95 days
    Quarterly,
    /// 360-370 days
    Annual,
    /// 28-32 days
    Monthly,
    /// Anything else (year-to-date, stub periods)
    YtdOrOther,
}

// ============================================================================
// TEMPORAL CLASSIFIER
// ============================================================================

#[derive(Debug, Clone, Copy, Default)]
pub struct TemporalClassifier;

impl TemporalClassifier {
    pub fn new() -> Self {
        TemporalClassifier
    }

    /// Length of a duration period in days, when both endpoints parse.
    pub fn period_length_days(&self, fact: &EnrichedFact) -> Option<i64> {
        let start = parse_iso_date(fact.context.period.start.as_deref()?)?;
        let end = parse_iso_date(fact.context.period.end.as_deref()?)?;

        let days = (end - start).num_days();
        if days < 0 {
            return None;
        }
        Some(days)
    }

    /// Bucket a duration fact by its period length.
    pub fn period_category(&self, fact: &EnrichedFact) -> Option<PeriodCategory> {
        let days = self.period_length_days(fact)?;
        Some(match days {
            85..=95 => PeriodCategory::Quarterly,
            360..=370 => PeriodCategory::Annual,
            28..=32 => PeriodCategory::Monthly,
            _ => PeriodCategory::YtdOrOther,
        })
    }
}

impl Classify for TemporalClassifier {
    type Output = TemporalType;

    fn classify(&self, fact: &EnrichedFact) -> TemporalType {
        match fact.effective_period_type() {
            PeriodType::Instant => TemporalType::Instant,
            PeriodType::Duration => TemporalType::Duration,
            PeriodType::Unknown => TemporalType::Unknown,
        }
    }
}

fn parse_iso_date(s: &str) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(s.trim(), "%Y-%m-%d").ok()
}

// ============================================================================
// TESTS
// ============================================================================
