// 📋 Fact Model - Enriched XBRL facts
// Typed property records produced by the upstream property extractor

use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;

// ============================================================================
// PROPERTY ENUMS
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ValueType {
    Numeric,
    Text,
    Boolean,
    Date,
    Nil,
    Unknown,
}

impl Default for ValueType {
    fn default() -> Self {
        ValueType::Unknown
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PeriodType {
    Instant,
    Duration,
    Unknown,
}

impl Default for PeriodType {
    fn default() -> Self {
        PeriodType::Unknown
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BalanceType {
    Debit,
    Credit,
}

// ============================================================================
// PROPERTY RECORD
// ============================================================================

/// Per-fact properties extracted upstream. Immutable once produced.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FactProperties {
    /// Reported value (None when the fact carries no value at all)
    #[serde(default)]
    pub value: Option<Value>,

    #[serde(default)]
    pub value_type: ValueType,

    /// Unit string as reported, e.g. "iso4217:USD" or "shares"
    #[serde(default)]
    pub unit: Option<String>,

    /// Decimals attribute as reported (kept verbatim, e.g. "-6" or "INF")
    #[serde(default)]
    pub decimals: Option<String>,

    #[serde(default)]
    pub period_type: PeriodType,

    /// Debit/credit nature; None means the concept has no balance attribute
    #[serde(default)]
    pub balance_type: Option<BalanceType>,

    #[serde(default)]
    pub is_abstract: bool,

    /// Explicit xsi:nil flag on the fact
    #[serde(default)]
    pub is_nil: bool,

    /// True when the context has no dimensional breakdown
    #[serde(default)]
    pub is_primary_context: bool,

    #[serde(default)]
    pub label: String,

    /// Namespace-qualified concept name, e.g. "us-gaap:Assets"
    pub qname: String,

    pub context_ref: String,
}

impl FactProperties {
    /// Namespace prefix of the qname ("us-gaap:Assets" → "us-gaap")
    pub fn namespace(&self) -> Option<&str> {
        self.qname.split_once(':').map(|(ns, _)| ns)
    }
}

// ============================================================================
// CONTEXT INFO
// ============================================================================

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PeriodInfo {
    #[serde(default)]
    pub period_type: Option<PeriodType>,

    /// ISO date for instant periods
    #[serde(default)]
    pub instant: Option<String>,

    /// ISO start date for duration periods
    #[serde(default)]
    pub start: Option<String>,

    /// ISO end date for duration periods
    #[serde(default)]
    pub end: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ContextInfo {
    /// Entity identifier (CIK or scheme-qualified id)
    #[serde(default)]
    pub entity: Option<String>,

    #[serde(default)]
    pub period: PeriodInfo,

    /// Segment/scenario dimensions: dimension qname → member qname.
    /// BTreeMap keeps derived context keys deterministic.
    #[serde(default)]
    pub dimensions: BTreeMap<String, String>,
}

// ============================================================================
// ENRICHED FACT
// ============================================================================

/// One reported data point plus its context block.
/// Identity key is (qname, context_ref).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EnrichedFact {
    pub properties: FactProperties,

    #[serde(default)]
    pub context: ContextInfo,
}

impl EnrichedFact {
    pub fn identity(&self) -> (String, String) {
        (
            self.properties.qname.clone(),
            self.properties.context_ref.clone(),
        )
    }

    /// Period type with context fallback: the fact's own period_type wins
    /// when determinate, else the context period block is consulted.
    pub fn effective_period_type(&self) -> PeriodType {
        match self.properties.period_type {
            PeriodType::Instant => PeriodType::Instant,
            PeriodType::Duration => PeriodType::Duration,
            PeriodType::Unknown => self
                .context
                .period
                .period_type
                .unwrap_or(PeriodType::Unknown),
        }
    }

    /// True when the fact has no usable value (explicit nil, absent,
    /// JSON null, or an empty string)
    pub fn is_null_valued(&self) -> bool {
        if self.properties.is_nil {
            return true;
        }
        match &self.properties.value {
            None => true,
            Some(Value::Null) => true,
            Some(Value::String(s)) => s.trim().is_empty(),
            Some(_) => false,
        }
    }
}

// ============================================================================
// INPUT VALIDATION
// ============================================================================

#[derive(Debug, Clone)]
pub struct FieldError {
    pub field: String,
    pub message: String,
}

impl std::fmt::Display for FieldError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.field, self.message)
    }
}

/// Validate a single enriched fact against the input contract.
/// Returns all field-level problems; an empty vec means the fact is usable.
pub fn validate_fact(fact: &EnrichedFact) -> Vec<FieldError> {
    let mut errors = Vec::new();

    if fact.properties.qname.trim().is_empty() {
        errors.push(FieldError {
            field: "qname".to_string(),
            message: "Required field is empty".to_string(),
        });
    }

    if fact.properties.context_ref.trim().is_empty() {
        errors.push(FieldError {
            field: "context_ref".to_string(),
            message: "Required field is empty".to_string(),
        });
    }

    if fact.properties.value_type == ValueType::Numeric {
        if let Some(Value::String(s)) = &fact.properties.value {
            if !s.trim().is_empty() && s.trim().parse::<f64>().is_err() {
                errors.push(FieldError {
                    field: "value".to_string(),
                    message: format!("Numeric value_type but unparseable value: {}", s),
                });
            }
        }
    }

    errors
}

// ============================================================================
// TESTS
// ============================================================================
