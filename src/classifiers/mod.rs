// 🏷️ Property Classifiers - Five independent, stateless classifiers
// Each derives one dimension of a fact's classification from its own
// properties only; no taxonomy is ever consulted

pub mod accounting;
pub mod aggregation;
pub mod monetary;
pub mod statement;
pub mod temporal;

pub use accounting::{AccountingClassifier, AccountingType};
pub use aggregation::{AggregationClassifier, AggregationLevel};
pub use monetary::{MonetaryClassifier, MonetaryType};
pub use statement::{StatementClassifier, StatementType};
pub use temporal::{PeriodCategory, TemporalClassifier, TemporalType};

use crate::facts::EnrichedFact;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

// ============================================================================
// CLASSIFIER CONTRACT
// ============================================================================

/// Shared contract for all property classifiers.
///
/// Implementations are pure and total: the same fact always yields the same
/// output, and unrecognized input degrades to an explicit unknown/other
/// variant instead of an error.
pub trait Classify {
    type Output;

    fn classify(&self, fact: &EnrichedFact) -> Self::Output;
}

// ============================================================================
// CLASSIFICATION RECORD
// ============================================================================

/// Five independently derived dimensions attached to a fact.
/// Never mutated after creation.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Classification {
    pub monetary: MonetaryType,
    pub temporal: TemporalType,
    pub accounting: AccountingType,
    pub aggregation: AggregationLevel,
    pub statement: StatementType,

    /// Fraction of the five dimensions that resolved to a determinate
    /// variant, in [0, 1]
    pub confidence: f64,
}

impl Classification {
    fn confidence_of(
        monetary: MonetaryType,
        temporal: TemporalType,
        accounting: AccountingType,
        aggregation: AggregationLevel,
        statement: StatementType,
    ) -> f64 {
        let mut resolved = 0u8;
        if monetary != MonetaryType::UnknownNumeric {
            resolved += 1;
        }
        if temporal != TemporalType::Unknown {
            resolved += 1;
        }
        if accounting != AccountingType::Unknown {
            resolved += 1;
        }
        if aggregation != AggregationLevel::Unknown {
            resolved += 1;
        }
        if statement != StatementType::Other {
            resolved += 1;
        }
        resolved as f64 / 5.0
    }
}

/// A fact annotated with its classification record
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClassifiedFact {
    pub fact: EnrichedFact,
    pub classification: Classification,
}

impl ClassifiedFact {
    pub fn identity(&self) -> (String, String) {
        self.fact.identity()
    }
}

// ============================================================================
// CLASSIFICATION METRICS
// ============================================================================

/// Counters for one classification pass. Returned by value and merged
/// explicitly by the caller; there is no shared accumulator to reset.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ClassificationMetrics {
    pub total_facts: usize,
    pub by_statement: BTreeMap<String, usize>,
    pub by_aggregation: BTreeMap<String, usize>,
    pub unknown_monetary: usize,
    pub unknown_temporal: usize,
    pub unknown_accounting: usize,
}

impl ClassificationMetrics {
    pub fn record(&mut self, classification: &Classification) {
        self.total_facts += 1;
        *self
            .by_statement
            .entry(classification.statement.as_str().to_string())
            .or_insert(0) += 1;
        *self
            .by_aggregation
            .entry(classification.aggregation.as_str().to_string())
            .or_insert(0) += 1;

        if classification.monetary == MonetaryType::UnknownNumeric {
            self.unknown_monetary += 1;
        }
        if classification.temporal == TemporalType::Unknown {
            self.unknown_temporal += 1;
        }
        if classification.accounting == AccountingType::Unknown {
            self.unknown_accounting += 1;
        }
    }

    /// Fold another pass's counters into this one
    pub fn merge(&mut self, other: &ClassificationMetrics) {
        self.total_facts += other.total_facts;
        for (k, v) in &other.by_statement {
            *self.by_statement.entry(k.clone()).or_insert(0) += v;
        }
        for (k, v) in &other.by_aggregation {
            *self.by_aggregation.entry(k.clone()).or_insert(0) += v;
        }
        self.unknown_monetary += other.unknown_monetary;
        self.unknown_temporal += other.unknown_temporal;
        self.unknown_accounting += other.unknown_accounting;
    }
}

// ============================================================================
// CLASSIFICATION PASS
// ============================================================================

/// Classify a single fact across all five dimensions
pub fn classify_fact(fact: &EnrichedFact) -> Classification {
    let monetary = MonetaryClassifier::new().classify(fact);
    let temporal = TemporalClassifier::new().classify(fact);
    let accounting = AccountingClassifier::new().classify(fact);
    let aggregation = AggregationClassifier::new().classify(fact);
    let statement = StatementClassifier::new().classify(fact);

    Classification {
        monetary,
        temporal,
        accounting,
        aggregation,
        statement,
        confidence: Classification::confidence_of(
            monetary,
            temporal,
            accounting,
            aggregation,
            statement,
        ),
    }
}

/// Classify every fact and return the annotated set plus pass metrics
pub fn classify_facts(facts: &[EnrichedFact]) -> (Vec<ClassifiedFact>, ClassificationMetrics) {
    let mut metrics = ClassificationMetrics::default();
    let classified = facts
        .iter()
        .map(|fact| {
            let classification = classify_fact(fact);
            metrics.record(&classification);
            ClassifiedFact {
                fact: fact.clone(),
                classification,
            }
        })
        .collect();

    (classified, metrics)
}

// ============================================================================
// TESTS
// ============================================================================
