// Inductive Mapper - Core Library
// Bottom-up classification of XBRL facts into financial statements,
// with null-quality scoring of the constructed statements

pub mod facts;
pub mod classifiers;
pub mod clustering;
pub mod boundary;
pub mod construction;
pub mod null_quality;
pub mod pipeline;

// Re-export commonly used types
pub use facts::{
    validate_fact, BalanceType, ContextInfo, EnrichedFact, FactProperties, FieldError,
    PeriodInfo, PeriodType, ValueType,
};
pub use classifiers::{
    classify_fact, classify_facts, AccountingClassifier, AccountingType, AggregationClassifier,
    AggregationLevel, Classification, ClassificationMetrics, ClassifiedFact, Classify,
    MonetaryClassifier, MonetaryType, PeriodCategory, StatementClassifier, StatementType,
    TemporalClassifier, TemporalType,
};
pub use clustering::{FactCluster, FactClusterer};
pub use boundary::{BoundaryDetector, BoundaryReason, StatementSection};
pub use construction::{
    Hierarchy, LineItem, ParentChild, Statement, StatementConstructor, StatementTotals,
};
pub use null_quality::{
    NullAnalysis, NullClassification, NullContext, NullPattern, NullQualityEngine,
    NullQualityReport, NullQualityScorer, NullStatistics, PatternDetector, PatternSeverity,
    PatternType, PropertyNullAnalyzer, QualityGrade, QualityScore, SuspicionLevel,
};
pub use pipeline::{FilingReport, MapperError, MapperPipeline, PhaseTiming};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
