// ✅ Null-Quality Analyzer - Score the quality of missing values
// Classifies every null-valued line item, detects systemic null patterns
// across the filing, and produces a 0-100 quality score with a grade

use crate::classifiers::{AggregationLevel, StatementType, TemporalType};
use crate::construction::{LineItem, Statement};
use chrono::{DateTime, Utc};
use log::debug;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

// ============================================================================
// NULL CLASSIFICATION
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NullClassification {
    /// Explicitly nil-flagged by the filer
    LegitimateNil,
    /// Null is unsurprising (no period, low confidence, abstract header)
    ExpectedNull,
    /// Null explained by structure (disclosure namespace, roll-up level)
    StructuralNull,
    /// Null with no benign explanation
    AnomalousNull,
}

impl NullClassification {
    pub fn as_str(&self) -> &'static str {
        match self {
            NullClassification::LegitimateNil => "legitimate_nil",
            NullClassification::ExpectedNull => "expected_null",
            NullClassification::StructuralNull => "structural_null",
            NullClassification::AnomalousNull => "anomalous_null",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SuspicionLevel {
    None,
    Low,
    Medium,
    High,
}

// ============================================================================
// NULL ANALYSIS RECORD
// ============================================================================

/// Classification context captured alongside each null analysis
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NullContext {
    pub statement_type: StatementType,
    pub temporal: TemporalType,
    pub aggregation: AggregationLevel,
    pub confidence: f64,
    pub namespace: Option<String>,
}

/// One record per null-valued line item
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NullAnalysis {
    pub qname: String,
    pub classification_type: NullClassification,
    pub suspicion_level: SuspicionLevel,
    pub reason: String,
    pub classification_context: NullContext,
}

// ============================================================================
// NULL STATISTICS
// ============================================================================

/// Running counters for one filing. Returned by value from the analyzer;
/// a fresh instance is produced per filing, so no reset discipline applies.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct NullStatistics {
    pub total_line_items: usize,
    pub null_count: usize,
    pub legitimate_nil_count: usize,
    pub expected_null_count: usize,
    pub structural_null_count: usize,
    pub anomalous_null_count: usize,
    pub high_suspicion_count: usize,
    pub medium_suspicion_count: usize,
    pub low_suspicion_count: usize,
}

impl NullStatistics {
    fn record(&mut self, analysis: &NullAnalysis) {
        self.null_count += 1;
        match analysis.classification_type {
            NullClassification::LegitimateNil => self.legitimate_nil_count += 1,
            NullClassification::ExpectedNull => self.expected_null_count += 1,
            NullClassification::StructuralNull => self.structural_null_count += 1,
            NullClassification::AnomalousNull => self.anomalous_null_count += 1,
        }
        match analysis.suspicion_level {
            SuspicionLevel::High => self.high_suspicion_count += 1,
            SuspicionLevel::Medium => self.medium_suspicion_count += 1,
            SuspicionLevel::Low => self.low_suspicion_count += 1,
            SuspicionLevel::None => {}
        }
    }

    pub fn legitimate_nil_rate(&self) -> f64 {
        if self.null_count == 0 {
            return 0.0;
        }
        self.legitimate_nil_count as f64 / self.null_count as f64
    }

    pub fn expected_null_rate(&self) -> f64 {
        if self.null_count == 0 {
            return 0.0;
        }
        self.expected_null_count as f64 / self.null_count as f64
    }
}

// ============================================================================
// PROPERTY NULL ANALYZER
// ============================================================================

/// Namespaces whose nulls are explained by disclosure structure
const DISCLOSURE_NAMESPACES: &[&str] = &["dei", "ecd"];

pub struct PropertyNullAnalyzer {
    /// Confidence below which a null is expected rather than suspicious
    pub expected_confidence_threshold: f64,
}

impl PropertyNullAnalyzer {
    pub fn new() -> Self {
        PropertyNullAnalyzer {
            expected_confidence_threshold: 0.5,
        }
    }

    /// Analyze every null-valued line item across the constructed
    /// statements, returning one record per null plus the filing counters
    pub fn analyze_statements(
        &self,
        statements: &BTreeMap<StatementType, Statement>,
    ) -> (Vec<NullAnalysis>, NullStatistics) {
        let mut analyses = Vec::new();
        let mut stats = NullStatistics::default();

        for statement in statements.values() {
            for item in &statement.line_items {
                stats.total_line_items += 1;
                if !item.is_null_valued() {
                    continue;
                }
                let analysis = self.analyze_item(statement.statement_type, item);
                stats.record(&analysis);
                analyses.push(analysis);
            }
        }

        debug!(
            "null analysis: {} nulls across {} line items ({} anomalous)",
            stats.null_count, stats.total_line_items, stats.anomalous_null_count
        );

        (analyses, stats)
    }

    fn analyze_item(&self, statement_type: StatementType, item: &LineItem) -> NullAnalysis {
        let namespace = item.qname.split_once(':').map(|(ns, _)| ns.to_string());
        let context = NullContext {
            statement_type,
            temporal: item.classification.temporal,
            aggregation: item.classification.aggregation,
            confidence: item.classification.confidence,
            namespace: namespace.clone(),
        };

        // Explicit nil flag is always legitimate
        if item.is_nil {
            return NullAnalysis {
                qname: item.qname.clone(),
                classification_type: NullClassification::LegitimateNil,
                suspicion_level: SuspicionLevel::None,
                reason: "Fact is explicitly nil-flagged".to_string(),
                classification_context: context,
            };
        }

        // Expected: no period, weak classification, or a header row
        if item.classification.temporal == TemporalType::Unknown {
            return self.expected(item, context, "No period type resolved");
        }
        if item.classification.confidence < self.expected_confidence_threshold {
            return self.expected(item, context, "Classification confidence below threshold");
        }
        if item.is_abstract {
            return self.expected(item, context, "Abstract header carries no value");
        }

        // Structural: disclosure namespaces and roll-up levels
        let is_disclosure_ns = namespace
            .as_deref()
            .map(|ns| DISCLOSURE_NAMESPACES.contains(&ns))
            .unwrap_or(false);
        if is_disclosure_ns || item.classification.aggregation == AggregationLevel::Subtotal {
            return NullAnalysis {
                qname: item.qname.clone(),
                classification_type: NullClassification::StructuralNull,
                suspicion_level: SuspicionLevel::None,
                reason: if is_disclosure_ns {
                    "Disclosure namespace concept".to_string()
                } else {
                    "Roll-up level concept".to_string()
                },
                classification_context: context,
            };
        }

        // Anomalous: nothing explains the missing value
        let suspicion = if item.classification.temporal == TemporalType::Instant
            && statement_type == StatementType::BalanceSheet
            && item.classification.aggregation == AggregationLevel::Total
        {
            SuspicionLevel::High
        } else if item.classification.temporal != TemporalType::Unknown {
            SuspicionLevel::Medium
        } else {
            SuspicionLevel::Low
        };

        NullAnalysis {
            qname: item.qname.clone(),
            classification_type: NullClassification::AnomalousNull,
            suspicion_level: suspicion,
            reason: "Null value with no benign explanation".to_string(),
            classification_context: context,
        }
    }

    fn expected(&self, item: &LineItem, context: NullContext, reason: &str) -> NullAnalysis {
        NullAnalysis {
            qname: item.qname.clone(),
            classification_type: NullClassification::ExpectedNull,
            suspicion_level: SuspicionLevel::None,
            reason: reason.to_string(),
            classification_context: context,
        }
    }
}

impl Default for PropertyNullAnalyzer {
    fn default() -> Self {
        Self::new()
    }
}

// ============================================================================
// PATTERN DETECTOR
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PatternSeverity {
    Low,
    Medium,
    High,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PatternType {
    StatementClustering,
    NamespaceClustering,
    ConfidenceCorrelation,
    TemporalClustering,
}

/// A systemic pattern detected across the full null-analysis set
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NullPattern {
    pub pattern_type: PatternType,
    pub severity: PatternSeverity,
    pub description: String,
    pub recommendation: String,
}

/// Namespaces where a dominant null share is expected rather than alarming
const EXPECTED_NULLABLE_NAMESPACES: &[&str] = &["dei", "ecd", "srt"];

pub struct PatternDetector {
    /// Minimum nulls for the clustering detectors (default: 5)
    pub min_cluster_size: usize,

    /// Statement-clustering severity steps (default: 10 medium, 20 high)
    pub medium_count_threshold: usize,
    pub high_count_threshold: usize,

    /// Namespace share above which a single namespace dominates (default: 0.8)
    pub namespace_share_threshold: f64,

    /// Confidence below which nulls correlate with weak classification
    /// (default: 0.3)
    pub low_confidence_threshold: f64,
}

impl PatternDetector {
    pub fn new() -> Self {
        PatternDetector {
            min_cluster_size: 5,
            medium_count_threshold: 10,
            high_count_threshold: 20,
            namespace_share_threshold: 0.8,
            low_confidence_threshold: 0.3,
        }
    }

    /// Run all four detectors over the analysis set
    pub fn detect(&self, analyses: &[NullAnalysis]) -> Vec<NullPattern> {
        let mut patterns = Vec::new();
        patterns.extend(self.detect_statement_clustering(analyses));
        patterns.extend(self.detect_namespace_clustering(analyses));
        patterns.extend(self.detect_confidence_correlation(analyses));
        patterns.extend(self.detect_temporal_clustering(analyses));
        patterns
    }

    /// Detector 1: many nulls concentrated in one statement
    fn detect_statement_clustering(&self, analyses: &[NullAnalysis]) -> Vec<NullPattern> {
        let mut by_statement: BTreeMap<StatementType, usize> = BTreeMap::new();
        for analysis in analyses {
            *by_statement
                .entry(analysis.classification_context.statement_type)
                .or_insert(0) += 1;
        }

        by_statement
            .into_iter()
            .filter(|(_, count)| *count >= self.min_cluster_size)
            .map(|(statement, count)| {
                let severity = if count >= self.high_count_threshold {
                    PatternSeverity::High
                } else if count >= self.medium_count_threshold {
                    PatternSeverity::Medium
                } else {
                    PatternSeverity::Low
                };
                NullPattern {
                    pattern_type: PatternType::StatementClustering,
                    severity,
                    description: format!(
                        "{} null values clustered in {}",
                        count,
                        statement.as_str()
                    ),
                    recommendation: format!(
                        "Review the {} extraction for dropped values",
                        statement.as_str()
                    ),
                }
            })
            .collect()
    }

    /// Detector 2: one namespace holds almost all nulls
    fn detect_namespace_clustering(&self, analyses: &[NullAnalysis]) -> Vec<NullPattern> {
        if analyses.is_empty() {
            return Vec::new();
        }

        let mut by_namespace: BTreeMap<String, usize> = BTreeMap::new();
        for analysis in analyses {
            let ns = analysis
                .classification_context
                .namespace
                .clone()
                .unwrap_or_else(|| "(none)".to_string());
            *by_namespace.entry(ns).or_insert(0) += 1;
        }

        let total = analyses.len() as f64;
        by_namespace
            .into_iter()
            .filter(|(_, count)| *count as f64 / total > self.namespace_share_threshold)
            .map(|(namespace, count)| {
                let severity = if EXPECTED_NULLABLE_NAMESPACES.contains(&namespace.as_str()) {
                    PatternSeverity::Low
                } else {
                    PatternSeverity::Medium
                };
                NullPattern {
                    pattern_type: PatternType::NamespaceClustering,
                    severity,
                    description: format!(
                        "Namespace '{}' holds {} of {} null values",
                        namespace, count, analyses.len()
                    ),
                    recommendation: format!(
                        "Check whether '{}' concepts are expected to carry values",
                        namespace
                    ),
                }
            })
            .collect()
    }

    /// Detector 3: nulls correlate with weak classification confidence
    fn detect_confidence_correlation(&self, analyses: &[NullAnalysis]) -> Vec<NullPattern> {
        let low_confidence = analyses
            .iter()
            .filter(|a| a.classification_context.confidence < self.low_confidence_threshold)
            .count();

        if low_confidence < self.min_cluster_size {
            return Vec::new();
        }

        vec![NullPattern {
            pattern_type: PatternType::ConfidenceCorrelation,
            severity: PatternSeverity::High,
            description: format!(
                "{} null values have classification confidence below {:.1}",
                low_confidence, self.low_confidence_threshold
            ),
            recommendation: "Property extraction may be dropping the attributes \
                             classification depends on"
                .to_string(),
        }]
    }

    /// Detector 4: nulls share a temporal type
    fn detect_temporal_clustering(&self, analyses: &[NullAnalysis]) -> Vec<NullPattern> {
        let mut by_temporal: BTreeMap<TemporalType, usize> = BTreeMap::new();
        for analysis in analyses {
            *by_temporal
                .entry(analysis.classification_context.temporal)
                .or_insert(0) += 1;
        }

        by_temporal
            .into_iter()
            .filter(|(_, count)| *count >= self.min_cluster_size)
            .map(|(temporal, count)| {
                let severity = if temporal == TemporalType::Instant {
                    PatternSeverity::High
                } else {
                    PatternSeverity::Medium
                };
                NullPattern {
                    pattern_type: PatternType::TemporalClustering,
                    severity,
                    description: format!(
                        "{} null values share temporal type '{}'",
                        count,
                        temporal.as_str()
                    ),
                    recommendation: format!(
                        "Review {} period extraction for this filing",
                        temporal.as_str()
                    ),
                }
            })
            .collect()
    }
}

impl Default for PatternDetector {
    fn default() -> Self {
        Self::new()
    }
}

// ============================================================================
// QUALITY SCORER
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum QualityGrade {
    Excellent,
    Good,
    Acceptable,
    Poor,
    Critical,
}

/// One applied penalty or bonus
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScoreAdjustment {
    pub label: String,
    pub amount: f64,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ScoreBreakdown {
    pub penalties: Vec<ScoreAdjustment>,
    pub bonuses: Vec<ScoreAdjustment>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QualityScore {
    /// Clamped to [0, 100]
    pub score: f64,
    pub grade: QualityGrade,
    pub breakdown: ScoreBreakdown,
}

pub struct NullQualityScorer {
    pub anomalous_penalty: f64,
    pub high_suspicion_penalty: f64,
    pub high_severity_pattern_penalty: f64,
    pub medium_suspicion_penalty: f64,
    pub legitimate_rate_bonus: f64,
    pub expected_rate_bonus: f64,
}

impl NullQualityScorer {
    pub fn new() -> Self {
        NullQualityScorer {
            anomalous_penalty: 3.0,
            high_suspicion_penalty: 5.0,
            high_severity_pattern_penalty: 2.0,
            medium_suspicion_penalty: 1.5,
            legitimate_rate_bonus: 5.0,
            expected_rate_bonus: 3.0,
        }
    }

    /// Start at 100, subtract weighted penalties, add rate bonuses,
    /// clamp to [0, 100]
    pub fn score(&self, stats: &NullStatistics, patterns: &[NullPattern]) -> QualityScore {
        let mut score = 100.0;
        let mut breakdown = ScoreBreakdown::default();

        let high_severity_patterns = patterns
            .iter()
            .filter(|p| p.severity == PatternSeverity::High)
            .count();

        let penalties = [
            (
                "anomalous nulls",
                self.anomalous_penalty * stats.anomalous_null_count as f64,
            ),
            (
                "high-suspicion nulls",
                self.high_suspicion_penalty * stats.high_suspicion_count as f64,
            ),
            (
                "high-severity patterns",
                self.high_severity_pattern_penalty * high_severity_patterns as f64,
            ),
            (
                "medium-suspicion nulls",
                self.medium_suspicion_penalty * stats.medium_suspicion_count as f64,
            ),
        ];
        for (label, amount) in penalties {
            if amount > 0.0 {
                score -= amount;
                breakdown.penalties.push(ScoreAdjustment {
                    label: label.to_string(),
                    amount,
                });
            }
        }

        if stats.legitimate_nil_rate() > 0.9 {
            score += self.legitimate_rate_bonus;
            breakdown.bonuses.push(ScoreAdjustment {
                label: "legitimate-nil rate above 90%".to_string(),
                amount: self.legitimate_rate_bonus,
            });
        }
        if stats.expected_null_rate() > 0.5 {
            score += self.expected_rate_bonus;
            breakdown.bonuses.push(ScoreAdjustment {
                label: "expected-null rate above 50%".to_string(),
                amount: self.expected_rate_bonus,
            });
        }

        let score = score.clamp(0.0, 100.0);

        QualityScore {
            score,
            grade: Self::grade(score),
            breakdown,
        }
    }

    fn grade(score: f64) -> QualityGrade {
        if score >= 95.0 {
            QualityGrade::Excellent
        } else if score >= 85.0 {
            QualityGrade::Good
        } else if score >= 75.0 {
            QualityGrade::Acceptable
        } else if score >= 60.0 {
            QualityGrade::Poor
        } else {
            QualityGrade::Critical
        }
    }
}

impl Default for NullQualityScorer {
    fn default() -> Self {
        Self::new()
    }
}

// ============================================================================
// NULL QUALITY REPORT
// ============================================================================

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReportMetadata {
    pub generated_at: DateTime<Utc>,
    pub statement_count: usize,
    pub total_line_items: usize,
}

/// Per-filing null-quality report, written as a single artifact
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NullQualityReport {
    pub statistics: NullStatistics,
    pub analyses: Vec<NullAnalysis>,
    pub patterns: Vec<NullPattern>,
    /// Pattern counts by severity
    pub pattern_summary: BTreeMap<String, usize>,
    pub quality_score: QualityScore,
    pub summary: String,
    pub recommendations: Vec<String>,
    pub metadata: ReportMetadata,
}

impl NullQualityReport {
    pub fn summary_line(&self) -> String {
        format!(
            "Null quality: {:.1} ({:?}) | {} nulls / {} items, {} anomalous, {} patterns",
            self.quality_score.score,
            self.quality_score.grade,
            self.statistics.null_count,
            self.statistics.total_line_items,
            self.statistics.anomalous_null_count,
            self.patterns.len()
        )
    }
}

// ============================================================================
// NULL QUALITY ENGINE
// ============================================================================

/// Bundles analyzer, detector, and scorer into the per-filing analysis.
/// Instantiate one per filing; all state lives in the returned report.
pub struct NullQualityEngine {
    analyzer: PropertyNullAnalyzer,
    detector: PatternDetector,
    scorer: NullQualityScorer,
}

impl NullQualityEngine {
    pub fn new() -> Self {
        NullQualityEngine {
            analyzer: PropertyNullAnalyzer::new(),
            detector: PatternDetector::new(),
            scorer: NullQualityScorer::new(),
        }
    }

    pub fn analyze(&self, statements: &BTreeMap<StatementType, Statement>) -> NullQualityReport {
        let (analyses, statistics) = self.analyzer.analyze_statements(statements);
        let patterns = self.detector.detect(&analyses);
        let quality_score = self.scorer.score(&statistics, &patterns);

        let mut pattern_summary: BTreeMap<String, usize> = BTreeMap::new();
        for pattern in &patterns {
            let key = match pattern.severity {
                PatternSeverity::High => "high",
                PatternSeverity::Medium => "medium",
                PatternSeverity::Low => "low",
            };
            *pattern_summary.entry(key.to_string()).or_insert(0) += 1;
        }

        let mut recommendations: Vec<String> =
            patterns.iter().map(|p| p.recommendation.clone()).collect();
        recommendations.dedup();
        if statistics.anomalous_null_count > 0 {
            recommendations.push(format!(
                "Investigate {} anomalous null value(s) individually",
                statistics.anomalous_null_count
            ));
        }

        let summary = format!(
            "{} of {} line items are null ({} legitimate, {} expected, {} structural, {} anomalous)",
            statistics.null_count,
            statistics.total_line_items,
            statistics.legitimate_nil_count,
            statistics.expected_null_count,
            statistics.structural_null_count,
            statistics.anomalous_null_count
        );

        let metadata = ReportMetadata {
            generated_at: Utc::now(),
            statement_count: statements.len(),
            total_line_items: statistics.total_line_items,
        };

        NullQualityReport {
            statistics,
            analyses,
            patterns,
            pattern_summary,
            quality_score,
            summary,
            recommendations,
            metadata,
        }
    }
}

impl Default for NullQualityEngine {
    fn default() -> Self {
        Self::new()
    }
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::classifiers::{
        AccountingType, Classification, MonetaryType,
    };
    use crate::construction::{Hierarchy, StatementTotals};

    fn classification(
        temporal: TemporalType,
        aggregation: AggregationLevel,
        statement: StatementType,
        confidence: f64,
    ) -> Classification {
        Classification {
            monetary: MonetaryType::Monetary,
            temporal,
            accounting: AccountingType::Debit,
            aggregation,
            statement,
            confidence,
        }
    }

    fn null_item(
        qname: &str,
        temporal: TemporalType,
        aggregation: AggregationLevel,
        statement: StatementType,
        confidence: f64,
        is_nil: bool,
    ) -> LineItem {
        LineItem {
            qname: qname.to_string(),
            label: qname.to_string(),
            value: None,
            context_ref: "c-1".to_string(),
            classification: classification(temporal, aggregation, statement, confidence),
            is_abstract: false,
            is_nil,
        }
    }

    fn valued_item(qname: &str, statement: StatementType) -> LineItem {
        LineItem {
            qname: qname.to_string(),
            label: qname.to_string(),
            value: Some(serde_json::json!("1000")),
            context_ref: "c-1".to_string(),
            classification: classification(
                TemporalType::Instant,
                AggregationLevel::LineItem,
                statement,
                1.0,
            ),
            is_abstract: false,
            is_nil: false,
        }
    }

    fn statement_of(statement_type: StatementType, line_items: Vec<LineItem>) -> Statement {
        Statement {
            statement_type,
            line_items,
            totals: StatementTotals::default(),
            hierarchy: Hierarchy::default(),
        }
    }

    fn statements_of(
        statement_type: StatementType,
        line_items: Vec<LineItem>,
    ) -> BTreeMap<StatementType, Statement> {
        let mut map = BTreeMap::new();
        map.insert(statement_type, statement_of(statement_type, line_items));
        map
    }

    // ------------------------------------------------------------------
    // PropertyNullAnalyzer
    // ------------------------------------------------------------------

    #[test]
    fn test_explicit_nil_is_legitimate() {
        let analyzer = PropertyNullAnalyzer::new();
        let statements = statements_of(
            StatementType::BalanceSheet,
            vec![null_item(
                "us-gaap:Goodwill",
                TemporalType::Instant,
                AggregationLevel::LineItem,
                StatementType::BalanceSheet,
                1.0,
                true,
            )],
        );

        let (analyses, stats) = analyzer.analyze_statements(&statements);
        assert_eq!(analyses.len(), 1);
        assert_eq!(
            analyses[0].classification_type,
            NullClassification::LegitimateNil
        );
        assert_eq!(analyses[0].suspicion_level, SuspicionLevel::None);
        assert_eq!(stats.legitimate_nil_count, 1);
    }

    #[test]
    fn test_low_confidence_is_expected() {
        let analyzer = PropertyNullAnalyzer::new();
        let statements = statements_of(
            StatementType::BalanceSheet,
            vec![null_item(
                "us-gaap:Cash",
                TemporalType::Instant,
                AggregationLevel::LineItem,
                StatementType::BalanceSheet,
                0.4,
                false,
            )],
        );

        let (analyses, _) = analyzer.analyze_statements(&statements);
        assert_eq!(
            analyses[0].classification_type,
            NullClassification::ExpectedNull
        );
    }

    #[test]
    fn test_disclosure_namespace_is_structural() {
        let analyzer = PropertyNullAnalyzer::new();
        let statements = statements_of(
            StatementType::Other,
            vec![null_item(
                "dei:EntityPublicFloat",
                TemporalType::Instant,
                AggregationLevel::LineItem,
                StatementType::Other,
                0.8,
                false,
            )],
        );

        let (analyses, _) = analyzer.analyze_statements(&statements);
        assert_eq!(
            analyses[0].classification_type,
            NullClassification::StructuralNull
        );
    }

    #[test]
    fn test_subtotal_null_is_structural() {
        let analyzer = PropertyNullAnalyzer::new();
        let statements = statements_of(
            StatementType::BalanceSheet,
            vec![null_item(
                "us-gaap:AssetsCurrent",
                TemporalType::Instant,
                AggregationLevel::Subtotal,
                StatementType::BalanceSheet,
                0.8,
                false,
            )],
        );

        let (analyses, _) = analyzer.analyze_statements(&statements);
        assert_eq!(
            analyses[0].classification_type,
            NullClassification::StructuralNull
        );
    }

    #[test]
    fn test_balance_sheet_total_null_is_high_suspicion() {
        let analyzer = PropertyNullAnalyzer::new();
        let statements = statements_of(
            StatementType::BalanceSheet,
            vec![null_item(
                "us-gaap:Assets",
                TemporalType::Instant,
                AggregationLevel::Total,
                StatementType::BalanceSheet,
                1.0,
                false,
            )],
        );

        let (analyses, stats) = analyzer.analyze_statements(&statements);
        assert_eq!(
            analyses[0].classification_type,
            NullClassification::AnomalousNull
        );
        assert_eq!(analyses[0].suspicion_level, SuspicionLevel::High);
        assert_eq!(stats.high_suspicion_count, 1);
    }

    #[test]
    fn test_duration_anomalous_null_is_medium() {
        let analyzer = PropertyNullAnalyzer::new();
        let statements = statements_of(
            StatementType::IncomeStatement,
            vec![null_item(
                "us-gaap:Revenues",
                TemporalType::Duration,
                AggregationLevel::LineItem,
                StatementType::IncomeStatement,
                1.0,
                false,
            )],
        );

        let (analyses, _) = analyzer.analyze_statements(&statements);
        assert_eq!(analyses[0].suspicion_level, SuspicionLevel::Medium);
    }

    #[test]
    fn test_valued_items_not_analyzed() {
        let analyzer = PropertyNullAnalyzer::new();
        let statements = statements_of(
            StatementType::BalanceSheet,
            vec![
                valued_item("us-gaap:Cash", StatementType::BalanceSheet),
                valued_item("us-gaap:Goodwill", StatementType::BalanceSheet),
            ],
        );

        let (analyses, stats) = analyzer.analyze_statements(&statements);
        assert!(analyses.is_empty());
        assert_eq!(stats.total_line_items, 2);
        assert_eq!(stats.null_count, 0);
    }

    // ------------------------------------------------------------------
    // PatternDetector
    // ------------------------------------------------------------------

    fn anomalous_analyses(count: usize, statement: StatementType) -> Vec<NullAnalysis> {
        (0..count)
            .map(|i| NullAnalysis {
                qname: format!("us-gaap:Item{}", i),
                classification_type: NullClassification::AnomalousNull,
                suspicion_level: SuspicionLevel::Medium,
                reason: "test".to_string(),
                classification_context: NullContext {
                    statement_type: statement,
                    temporal: TemporalType::Duration,
                    aggregation: AggregationLevel::LineItem,
                    confidence: 0.8,
                    namespace: Some("us-gaap".to_string()),
                },
            })
            .collect()
    }

    #[test]
    fn test_statement_clustering_severity_steps() {
        let detector = PatternDetector::new();

        let low = detector.detect(&anomalous_analyses(5, StatementType::BalanceSheet));
        let cluster = low
            .iter()
            .find(|p| p.pattern_type == PatternType::StatementClustering)
            .unwrap();
        assert_eq!(cluster.severity, PatternSeverity::Low);

        let medium = detector.detect(&anomalous_analyses(12, StatementType::BalanceSheet));
        let cluster = medium
            .iter()
            .find(|p| p.pattern_type == PatternType::StatementClustering)
            .unwrap();
        assert_eq!(cluster.severity, PatternSeverity::Medium);

        let high = detector.detect(&anomalous_analyses(25, StatementType::BalanceSheet));
        let cluster = high
            .iter()
            .find(|p| p.pattern_type == PatternType::StatementClustering)
            .unwrap();
        assert_eq!(cluster.severity, PatternSeverity::High);
    }

    #[test]
    fn test_no_patterns_below_cluster_size() {
        let detector = PatternDetector::new();
        let analyses = anomalous_analyses(3, StatementType::BalanceSheet);
        let patterns = detector.detect(&analyses);

        assert!(patterns
            .iter()
            .all(|p| p.pattern_type == PatternType::NamespaceClustering));
    }

    #[test]
    fn test_namespace_clustering_expected_namespace_is_low() {
        let detector = PatternDetector::new();
        let mut analyses = anomalous_analyses(6, StatementType::Other);
        for analysis in &mut analyses {
            analysis.classification_context.namespace = Some("dei".to_string());
        }

        let patterns = detector.detect(&analyses);
        let ns_pattern = patterns
            .iter()
            .find(|p| p.pattern_type == PatternType::NamespaceClustering)
            .unwrap();
        assert_eq!(ns_pattern.severity, PatternSeverity::Low);
    }

    #[test]
    fn test_namespace_clustering_unexpected_namespace_is_medium() {
        let detector = PatternDetector::new();
        let analyses = anomalous_analyses(6, StatementType::Other);

        let patterns = detector.detect(&analyses);
        let ns_pattern = patterns
            .iter()
            .find(|p| p.pattern_type == PatternType::NamespaceClustering)
            .unwrap();
        assert_eq!(ns_pattern.severity, PatternSeverity::Medium);
    }

    #[test]
    fn test_confidence_correlation() {
        let detector = PatternDetector::new();
        let mut analyses = anomalous_analyses(6, StatementType::BalanceSheet);
        for analysis in &mut analyses {
            analysis.classification_context.confidence = 0.2;
        }

        let patterns = detector.detect(&analyses);
        let pattern = patterns
            .iter()
            .find(|p| p.pattern_type == PatternType::ConfidenceCorrelation)
            .unwrap();
        assert_eq!(pattern.severity, PatternSeverity::High);
    }

    #[test]
    fn test_temporal_clustering_instant_is_high() {
        let detector = PatternDetector::new();
        let mut analyses = anomalous_analyses(6, StatementType::BalanceSheet);
        for analysis in &mut analyses {
            analysis.classification_context.temporal = TemporalType::Instant;
        }

        let patterns = detector.detect(&analyses);
        let pattern = patterns
            .iter()
            .find(|p| p.pattern_type == PatternType::TemporalClustering)
            .unwrap();
        assert_eq!(pattern.severity, PatternSeverity::High);
    }

    #[test]
    fn test_temporal_clustering_duration_is_medium() {
        let detector = PatternDetector::new();
        let analyses = anomalous_analyses(6, StatementType::IncomeStatement);

        let patterns = detector.detect(&analyses);
        let pattern = patterns
            .iter()
            .find(|p| p.pattern_type == PatternType::TemporalClustering)
            .unwrap();
        assert_eq!(pattern.severity, PatternSeverity::Medium);
    }

    // ------------------------------------------------------------------
    // NullQualityScorer
    // ------------------------------------------------------------------

    #[test]
    fn test_zero_nulls_scores_perfect() {
        let scorer = NullQualityScorer::new();
        let score = scorer.score(&NullStatistics::default(), &[]);

        assert_eq!(score.score, 100.0);
        assert_eq!(score.grade, QualityGrade::Excellent);
        assert!(score.breakdown.penalties.is_empty());
        assert!(score.breakdown.bonuses.is_empty());
    }

    #[test]
    fn test_anomalous_penalty_is_monotonic() {
        let scorer = NullQualityScorer::new();
        let mut stats = NullStatistics {
            null_count: 1,
            anomalous_null_count: 1,
            ..Default::default()
        };

        let mut previous = scorer.score(&stats, &[]).score;
        for n in 2..30 {
            stats.anomalous_null_count = n;
            stats.null_count = n;
            let current = scorer.score(&stats, &[]).score;
            assert!(current <= previous);
            previous = current;
        }
    }

    #[test]
    fn test_legitimate_rate_bonus() {
        let scorer = NullQualityScorer::new();
        let stats = NullStatistics {
            total_line_items: 100,
            null_count: 10,
            legitimate_nil_count: 10,
            ..Default::default()
        };

        let score = scorer.score(&stats, &[]);
        assert_eq!(score.score, 100.0); // 100 + 5 clamped
        assert_eq!(score.breakdown.bonuses.len(), 1);
    }

    #[test]
    fn test_grade_thresholds() {
        assert_eq!(NullQualityScorer::grade(95.0), QualityGrade::Excellent);
        assert_eq!(NullQualityScorer::grade(94.9), QualityGrade::Good);
        assert_eq!(NullQualityScorer::grade(85.0), QualityGrade::Good);
        assert_eq!(NullQualityScorer::grade(84.9), QualityGrade::Acceptable);
        assert_eq!(NullQualityScorer::grade(75.0), QualityGrade::Acceptable);
        assert_eq!(NullQualityScorer::grade(60.0), QualityGrade::Poor);
        assert_eq!(NullQualityScorer::grade(59.9), QualityGrade::Critical);
    }

    #[test]
    fn test_score_clamped_at_zero() {
        let scorer = NullQualityScorer::new();
        let stats = NullStatistics {
            null_count: 100,
            anomalous_null_count: 100,
            high_suspicion_count: 100,
            ..Default::default()
        };

        let score = scorer.score(&stats, &[]);
        assert_eq!(score.score, 0.0);
        assert_eq!(score.grade, QualityGrade::Critical);
    }

    #[test]
    fn test_high_severity_pattern_penalty() {
        let scorer = NullQualityScorer::new();
        let stats = NullStatistics {
            null_count: 1,
            anomalous_null_count: 1,
            ..Default::default()
        };
        let pattern = NullPattern {
            pattern_type: PatternType::ConfidenceCorrelation,
            severity: PatternSeverity::High,
            description: "test".to_string(),
            recommendation: "test".to_string(),
        };

        let without = scorer.score(&stats, &[]).score;
        let with = scorer.score(&stats, &[pattern]).score;
        assert_eq!(without - with, 2.0);
    }

    // ------------------------------------------------------------------
    // NullQualityEngine
    // ------------------------------------------------------------------

    #[test]
    fn test_engine_produces_full_report() {
        let engine = NullQualityEngine::new();
        let statements = statements_of(
            StatementType::BalanceSheet,
            vec![
                valued_item("us-gaap:Cash", StatementType::BalanceSheet),
                null_item(
                    "us-gaap:Assets",
                    TemporalType::Instant,
                    AggregationLevel::Total,
                    StatementType::BalanceSheet,
                    1.0,
                    false,
                ),
            ],
        );

        let report = engine.analyze(&statements);

        assert_eq!(report.statistics.total_line_items, 2);
        assert_eq!(report.statistics.null_count, 1);
        assert_eq!(report.statistics.anomalous_null_count, 1);
        assert!(report.quality_score.score < 100.0);
        assert!(!report.recommendations.is_empty());
        assert!(!report.summary.is_empty());
        assert_eq!(report.metadata.statement_count, 1);
        assert!(!report.summary_line().is_empty());
    }

    #[test]
    fn test_engine_clean_filing_is_excellent() {
        let engine = NullQualityEngine::new();
        let statements = statements_of(
            StatementType::BalanceSheet,
            vec![
                valued_item("us-gaap:Cash", StatementType::BalanceSheet),
                valued_item("us-gaap:Goodwill", StatementType::BalanceSheet),
            ],
        );

        let report = engine.analyze(&statements);
        assert_eq!(report.quality_score.score, 100.0);
        assert_eq!(report.quality_score.grade, QualityGrade::Excellent);
    }
}
