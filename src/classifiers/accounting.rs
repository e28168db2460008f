// ⚖️ Accounting Classifier - Debit/credit nature of a fact
// Three-tier resolution: explicit balance type > neutral-for-numeric >
// keyword counting

use crate::classifiers::Classify;
use crate::facts::{BalanceType, EnrichedFact, ValueType};
use serde::{Deserialize, Serialize};

// ============================================================================
// ACCOUNTING TYPE
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AccountingType {
    Debit,
    Credit,
    /// No debit/credit nature (EPS, ratios, share counts).
    /// A numeric fact without a balance attribute is neutral, not unknown.
    Neutral,
    Unknown,
}

impl AccountingType {
    pub fn as_str(&self) -> &'static str {
        match self {
            AccountingType::Debit => "debit",
            AccountingType::Credit => "credit",
            AccountingType::Neutral => "neutral",
            AccountingType::Unknown => "unknown",
        }
    }
}

// ============================================================================
// ACCOUNTING CLASSIFIER
// ============================================================================

const DEBIT_KEYWORDS: &[&str] = &[
    "asset",
    "expense",
    "cost",
    "loss",
    "receivable",
    "inventory",
];

const CREDIT_KEYWORDS: &[&str] = &[
    "liability",
    "revenue",
    "income",
    "equity",
    "payable",
    "gain",
];

#[derive(Debug, Clone, Copy, Default)]
pub struct AccountingClassifier;

impl AccountingClassifier {
    pub fn new() -> Self {
        AccountingClassifier
    }

    /// Tier 3: count debit vs credit keywords over label + qname.
    /// Only reached for non-numeric facts without a balance attribute.
    fn keyword_fallback(text: &str) -> AccountingType {
        let text_lower = text.to_lowercase();

        let debit_count = DEBIT_KEYWORDS
            .iter()
            .filter(|k| text_lower.contains(*k))
            .count();
        let credit_count = CREDIT_KEYWORDS
            .iter()
            .filter(|k| text_lower.contains(*k))
            .count();

        if debit_count > credit_count {
            AccountingType::Debit
        } else if credit_count > debit_count {
            AccountingType::Credit
        } else {
            AccountingType::Unknown
        }
    }
}

impl Classify for AccountingClassifier {
    type Output = AccountingType;

    fn classify(&self, fact: &EnrichedFact) -> AccountingType {
        // Tier 1: explicit balance type always wins
        match fact.properties.balance_type {
            Some(BalanceType::Debit) => return AccountingType::Debit,
            Some(BalanceType::Credit) => return AccountingType::Credit,
            None => {}
        }

        // Tier 2: numeric without a balance attribute has no debit/credit
        // nature at all
        if fact.properties.value_type == ValueType::Numeric {
            return AccountingType::Neutral;
        }

        // Tier 3: keyword counting over label + qname
        let text = format!("{} {}", fact.properties.label, fact.properties.qname);
        Self::keyword_fallback(&text)
    }
}

// ============================================================================
// TESTS
// ============================================================================
