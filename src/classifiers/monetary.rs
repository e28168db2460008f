// 💵 Monetary Classifier - What kind of quantity does this fact carry?
// Pure unit-string inspection; currency beats shares beats pure numbers

use crate::classifiers::Classify;
use crate::facts::{EnrichedFact, ValueType};
use serde::{Deserialize, Serialize};

// ============================================================================
// MONETARY TYPE
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MonetaryType {
    /// Currency-denominated amount
    Monetary,
    /// Share counts
    Shares,
    /// Dimensionless ratio or pure number
    PureNumber,
    /// Non-numeric fact (text, boolean, date)
    Text,
    /// Explicitly nil fact
    Nil,
    /// Numeric but the unit resolves nothing
    UnknownNumeric,
}

impl MonetaryType {
    pub fn as_str(&self) -> &'static str {
        match self {
            MonetaryType::Monetary => "monetary",
            MonetaryType::Shares => "shares",
            MonetaryType::PureNumber => "pure_number",
            MonetaryType::Text => "text",
            MonetaryType::Nil => "nil",
            MonetaryType::UnknownNumeric => "unknown_numeric",
        }
    }
}

// ============================================================================
// MONETARY CLASSIFIER
// ============================================================================

/// Unit keywords checked in priority order: currency > shares > pure
const CURRENCY_KEYWORDS: &[&str] = &[
    "iso4217", "usd", "eur", "gbp", "jpy", "cad", "aud", "chf", "cny",
];
const SHARE_KEYWORDS: &[&str] = &["share"];
const PURE_KEYWORDS: &[&str] = &["pure", "number"];

#[derive(Debug, Clone, Copy, Default)]
pub struct MonetaryClassifier;

impl MonetaryClassifier {
    pub fn new() -> Self {
        MonetaryClassifier
    }

    fn classify_unit(unit: &str) -> MonetaryType {
        let unit_lower = unit.to_lowercase();

        if CURRENCY_KEYWORDS.iter().any(|k| unit_lower.contains(k)) {
            return MonetaryType::Monetary;
        }
        if SHARE_KEYWORDS.iter().any(|k| unit_lower.contains(k)) {
            return MonetaryType::Shares;
        }
        if PURE_KEYWORDS.iter().any(|k| unit_lower.contains(k)) {
            return MonetaryType::PureNumber;
        }

        MonetaryType::UnknownNumeric
    }
}

impl Classify for MonetaryClassifier {
    type Output = MonetaryType;

    fn classify(&self, fact: &EnrichedFact) -> MonetaryType {
        match fact.properties.value_type {
            ValueType::Text | ValueType::Boolean | ValueType::Date => MonetaryType::Text,
            ValueType::Nil => MonetaryType::Nil,
            ValueType::Numeric => match &fact.properties.unit {
                Some(unit) => Self::classify_unit(unit),
                None => MonetaryType::UnknownNumeric,
            },
            ValueType::Unknown => MonetaryType::UnknownNumeric,
        }
    }
}

// ============================================================================
// TESTS
// ============================================================================
