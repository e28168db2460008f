// 📊 Statement Classifier - Which financial statement does this fact belong to?
// Primary-context gate, then period type drives the decision

use crate::classifiers::Classify;
use crate::facts::{EnrichedFact, PeriodType, ValueType};
use serde::{Deserialize, Serialize};

// ============================================================================
// STATEMENT TYPE
// ============================================================================

#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(rename_all = "snake_case")]
pub enum StatementType {
    BalanceSheet,
    IncomeStatement,
    CashFlow,
    /// Dimensional/segment data and anything that fails the gates
    Other,
}

impl StatementType {
    pub fn as_str(&self) -> &'static str {
        match self {
            StatementType::BalanceSheet => "balance_sheet",
            StatementType::IncomeStatement => "income_statement",
            StatementType::CashFlow => "cash_flow",
            StatementType::Other => "other",
        }
    }

    pub fn all() -> [StatementType; 4] {
        [
            StatementType::BalanceSheet,
            StatementType::IncomeStatement,
            StatementType::CashFlow,
            StatementType::Other,
        ]
    }
}

// ============================================================================
// STATEMENT CLASSIFIER
// ============================================================================

/// Strong cash-flow signals checked over lowercased label + qname
const CASH_FLOW_KEYWORDS: &[&str] = &[
    "cash",
    "financing",
    "investing",
    "operating activities",
    "proceeds",
    "payment",
    "acquisition",
];

#[derive(Debug, Clone, Copy, Default)]
pub struct StatementClassifier;

impl StatementClassifier {
    pub fn new() -> Self {
        StatementClassifier
    }

    /// Duration facts split between cash flow and income statement;
    /// there is no unknown outcome for a duration fact.
    fn classify_duration(fact: &EnrichedFact) -> StatementType {
        let text = format!("{} {}", fact.properties.label, fact.properties.qname)
            .to_lowercase();

        let is_cash_flow = CASH_FLOW_KEYWORDS.iter().any(|k| text.contains(k))
            || fact.properties.qname.to_lowercase().contains("cashflow");

        if is_cash_flow {
            StatementType::CashFlow
        } else {
            StatementType::IncomeStatement
        }
    }
}

impl Classify for StatementClassifier {
    type Output = StatementType;

    fn classify(&self, fact: &EnrichedFact) -> StatementType {
        // Gate: dimensional/segment data never lands in a main statement
        if !fact.properties.is_primary_context {
            return StatementType::Other;
        }

        match fact.effective_period_type() {
            PeriodType::Instant => match fact.properties.value_type {
                ValueType::Numeric | ValueType::Nil => StatementType::BalanceSheet,
                _ => StatementType::Other,
            },
            PeriodType::Duration => Self::classify_duration(fact),
            PeriodType::Unknown => StatementType::Other,
        }
    }
}

// ============================================================================
// TESTS
// ============================================================================
