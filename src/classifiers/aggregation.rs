// 🧮 Aggregation Classifier - Total / subtotal / line item / abstract header
// Ordered regex pattern sets over the fact label

use crate::classifiers::Classify;
use crate::facts::{EnrichedFact, ValueType};
use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};

// ============================================================================
// AGGREGATION LEVEL
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AggregationLevel {
    /// Non-data header row
    Abstract,
    /// Statement-closing aggregate
    Total,
    /// Section-closing aggregate
    Subtotal,
    /// Plain reported value
    LineItem,
    Unknown,
}

impl AggregationLevel {
    pub fn as_str(&self) -> &'static str {
        match self {
            AggregationLevel::Abstract => "abstract",
            AggregationLevel::Total => "total",
            AggregationLevel::Subtotal => "subtotal",
            AggregationLevel::LineItem => "line_item",
            AggregationLevel::Unknown => "unknown",
        }
    }

    /// Presentation sort order: headers first, totals last
    pub fn sort_order(&self) -> u8 {
        match self {
            AggregationLevel::Abstract => 0,
            AggregationLevel::LineItem => 1,
            AggregationLevel::Unknown => 1,
            AggregationLevel::Subtotal => 2,
            AggregationLevel::Total => 3,
        }
    }
}

// ============================================================================
// PATTERN SETS
// ============================================================================

static ABSTRACT_PATTERNS: Lazy<Vec<Regex>> = Lazy::new(|| {
    [
        r"(?i)\[.*\]",       // bracketed presentation headers
        r"(?i)abstract\s*$", // concept labels ending in "Abstract"
        r":\s*$",            // labels used as colon-terminated headings
    ]
    .iter()
    .map(|p| Regex::new(p).expect("abstract pattern"))
    .collect()
});

static TOTAL_PATTERNS: Lazy<Vec<Regex>> = Lazy::new(|| {
    [
        r"(?i)\btotal\b",
        r"(?i)\bnet income\b",
        r"(?i)\bnet loss\b",
        r"(?i)\bnet\b.*\b(change|increase|decrease)\b",
    ]
    .iter()
    .map(|p| Regex::new(p).expect("total pattern"))
    .collect()
});

static SUBTOTAL_PATTERNS: Lazy<Vec<Regex>> = Lazy::new(|| {
    [
        r"(?i)\bcurrent assets\b",
        r"(?i)\bnon-?current assets\b",
        r"(?i)\bcurrent liabilities\b",
        r"(?i)\bnon-?current liabilities\b",
        r"(?i)\boperating income\b",
        r"(?i)\bgross profit\b",
        r"(?i)income.*before.*tax",
    ]
    .iter()
    .map(|p| Regex::new(p).expect("subtotal pattern"))
    .collect()
});

const AGGREGATION_WORDS: &[&str] = &["total", "aggregate", "sum"];

// ============================================================================
// AGGREGATION CLASSIFIER
// ============================================================================

#[derive(Debug, Clone, Copy, Default)]
pub struct AggregationClassifier;

impl AggregationClassifier {
    pub fn new() -> Self {
        AggregationClassifier
    }

    fn matches_any(patterns: &[Regex], label: &str) -> bool {
        patterns.iter().any(|p| p.is_match(label))
    }
}

impl Classify for AggregationClassifier {
    type Output = AggregationLevel;

    fn classify(&self, fact: &EnrichedFact) -> AggregationLevel {
        let props = &fact.properties;

        // Structural abstracts: flagged upstream or carrying no data
        if props.is_abstract
            || props.value_type == ValueType::Text
            || props.value_type == ValueType::Nil
        {
            return AggregationLevel::Abstract;
        }

        let label = props.label.as_str();

        if Self::matches_any(&ABSTRACT_PATTERNS, label) {
            return AggregationLevel::Abstract;
        }
        if Self::matches_any(&TOTAL_PATTERNS, label) {
            return AggregationLevel::Total;
        }
        if Self::matches_any(&SUBTOTAL_PATTERNS, label) {
            return AggregationLevel::Subtotal;
        }

        let label_lower = label.to_lowercase();
        let has_aggregation_word = AGGREGATION_WORDS
            .iter()
            .any(|w| label_lower.contains(w));

        if props.value_type == ValueType::Numeric && !has_aggregation_word {
            return AggregationLevel::LineItem;
        }

        AggregationLevel::Unknown
    }
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::facts::{ContextInfo, FactProperties, PeriodType};

    fn fact(label: &str, value_type: ValueType, is_abstract: bool) -> EnrichedFact {
        EnrichedFact {
            properties: FactProperties {
                value: Some(serde_json::json!("100")),
                value_type,
                unit: Some("iso4217:USD".to_string()),
                decimals: None,
                period_type: PeriodType::Instant,
                balance_type: None,
                is_abstract,
                is_nil: false,
                is_primary_context: true,
                label: label.to_string(),
                qname: "us-gaap:Test".to_string(),
                context_ref: "c-1".to_string(),
            },
            context: ContextInfo::default(),
        }
    }

    #[test]
    fn test_abstract_flag() {
        let classifier = AggregationClassifier::new();
        let f = fact("Assets", ValueType::Numeric, true);
        assert_eq!(classifier.classify(&f), AggregationLevel::Abstract);
    }

    #[test]
    fn test_text_is_abstract() {
        let classifier = AggregationClassifier::new();
        let f = fact("Significant Accounting Policies", ValueType::Text, false);
        assert_eq!(classifier.classify(&f), AggregationLevel::Abstract);
    }

    #[test]
    fn test_bracketed_header() {
        let classifier = AggregationClassifier::new();
        let f = fact("Assets [Abstract]", ValueType::Numeric, false);
        assert_eq!(classifier.classify(&f), AggregationLevel::Abstract);
    }

    #[test]
    fn test_total_label() {
        let classifier = AggregationClassifier::new();
        let f = fact("Total Assets", ValueType::Numeric, false);
        assert_eq!(classifier.classify(&f), AggregationLevel::Total);
    }

    #[test]
    fn test_net_income_is_total() {
        let classifier = AggregationClassifier::new();
        let f = fact("Net Income", ValueType::Numeric, false);
        assert_eq!(classifier.classify(&f), AggregationLevel::Total);
    }

    #[test]
    fn test_current_assets_is_subtotal() {
        let classifier = AggregationClassifier::new();
        let f = fact("Current Assets", ValueType::Numeric, false);
        assert_eq!(classifier.classify(&f), AggregationLevel::Subtotal);
    }

    #[test]
    fn test_gross_profit_is_subtotal() {
        let classifier = AggregationClassifier::new();
        let f = fact("Gross Profit", ValueType::Numeric, false);
        assert_eq!(classifier.classify(&f), AggregationLevel::Subtotal);
    }

    #[test]
    fn test_total_beats_subtotal() {
        // "Total Current Assets" matches both sets; total patterns run first
        let classifier = AggregationClassifier::new();
        let f = fact("Total Current Assets", ValueType::Numeric, false);
        assert_eq!(classifier.classify(&f), AggregationLevel::Total);
    }

    #[test]
    fn test_plain_line_item() {
        let classifier = AggregationClassifier::new();
        let f = fact("Cash and Cash Equivalents", ValueType::Numeric, false);
        assert_eq!(classifier.classify(&f), AggregationLevel::LineItem);
    }

    #[test]
    fn test_unknown_fallback() {
        let classifier = AggregationClassifier::new();
        // Aggregation word present but no pattern matched, non-total phrasing
        let f = fact("Aggregate amounts", ValueType::Unknown, false);
        assert_eq!(classifier.classify(&f), AggregationLevel::Unknown);
    }

    #[test]
    fn test_sort_order() {
        assert!(AggregationLevel::Abstract.sort_order() < AggregationLevel::LineItem.sort_order());
        assert!(AggregationLevel::LineItem.sort_order() < AggregationLevel::Subtotal.sort_order());
        assert!(AggregationLevel::Subtotal.sort_order() < AggregationLevel::Total.sort_order());
    }
}
