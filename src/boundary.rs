// 🚧 Boundary Detector - Split clusters into statement-coherent sub-clusters
// Scans consecutive fact pairs for aggregation, statement, and period breaks.
// Splitting never drops facts: sub-cluster sizes always sum to the input.

use crate::classifiers::{AggregationLevel, ClassifiedFact, StatementType, TemporalType};
use crate::clustering::FactCluster;
use crate::facts::PeriodInfo;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

// ============================================================================
// BOUNDARY REASON
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BoundaryReason {
    /// line_item/subtotal → total transition
    TotalTransition,
    /// Next fact is an abstract header
    AbstractStart,
    /// Predicted statement differs between the pair
    StatementChange,
    /// Period type, instant, or end date differs
    PeriodDiscontinuity,
}

// ============================================================================
// BOUNDARY DETECTOR
// ============================================================================

#[derive(Debug, Clone, Copy, Default)]
pub struct BoundaryDetector;

impl BoundaryDetector {
    pub fn new() -> Self {
        BoundaryDetector
    }

    /// Reason for a boundary between two consecutive facts, if any.
    /// Checks run in priority order; the first hit wins.
    pub fn boundary_reason(
        &self,
        prev: &ClassifiedFact,
        next: &ClassifiedFact,
    ) -> Option<BoundaryReason> {
        let prev_agg = prev.classification.aggregation;
        let next_agg = next.classification.aggregation;

        if matches!(
            prev_agg,
            AggregationLevel::LineItem | AggregationLevel::Subtotal
        ) && next_agg == AggregationLevel::Total
        {
            return Some(BoundaryReason::TotalTransition);
        }

        if next_agg == AggregationLevel::Abstract {
            return Some(BoundaryReason::AbstractStart);
        }

        if prev.classification.statement != next.classification.statement
            && prev.classification.statement != StatementType::Other
            && next.classification.statement != StatementType::Other
        {
            return Some(BoundaryReason::StatementChange);
        }

        if period_discontinuity(&prev.fact.context.period, &next.fact.context.period) {
            return Some(BoundaryReason::PeriodDiscontinuity);
        }

        None
    }

    /// Candidate boundary indices for a cluster (index = position of the
    /// fact that starts the new segment)
    pub fn candidate_boundaries(&self, cluster: &FactCluster) -> Vec<usize> {
        cluster
            .facts
            .windows(2)
            .enumerate()
            .filter_map(|(i, pair)| {
                self.boundary_reason(&pair[0], &pair[1]).map(|_| i + 1)
            })
            .collect()
    }

    /// A split is kept only when both sides are internally consistent
    /// (at most 2 distinct statement types each) and mutually different
    /// (differing statement types or differing temporal types).
    pub fn validate_boundary(&self, left: &[ClassifiedFact], right: &[ClassifiedFact]) -> bool {
        if left.is_empty() || right.is_empty() {
            return false;
        }

        let left_statements = statement_set(left);
        let right_statements = statement_set(right);
        if left_statements.len() > 2 || right_statements.len() > 2 {
            return false;
        }

        let left_temporals = temporal_set(left);
        let right_temporals = temporal_set(right);

        left_statements != right_statements || left_temporals != right_temporals
    }

    /// Split a cluster at validated boundaries into contiguous sub-clusters.
    /// Invariant: sub-cluster sizes sum to the cluster size.
    pub fn detect_boundaries(&self, cluster: &FactCluster) -> Vec<FactCluster> {
        if cluster.facts.len() < 2 {
            return vec![cluster.clone()];
        }

        let candidates = self.candidate_boundaries(cluster);
        let mut segments: Vec<Vec<ClassifiedFact>> = Vec::new();
        let mut segment_start = 0usize;

        for index in candidates {
            let left = &cluster.facts[segment_start..index];
            let right = &cluster.facts[index..];

            if self.validate_boundary(left, right) {
                segments.push(left.to_vec());
                segment_start = index;
            }
        }
        segments.push(cluster.facts[segment_start..].to_vec());

        segments
            .into_iter()
            .enumerate()
            .map(|(n, facts)| FactCluster {
                id: if n == 0 && segment_start == 0 {
                    cluster.id.clone()
                } else {
                    format!("{}_seg{}", cluster.id, n)
                },
                statement: cluster.statement,
                period_key: cluster.period_key.clone(),
                context_key: cluster.context_key.clone(),
                facts,
            })
            .collect()
    }

    /// Detect statement sections: abstract facts start a new section,
    /// subtotal facts close the current one, total facts close the
    /// statement and start fresh.
    pub fn detect_sections(&self, cluster: &FactCluster) -> Vec<StatementSection> {
        let mut sections = Vec::new();
        let mut current = StatementSection::default();

        for fact in &cluster.facts {
            match fact.classification.aggregation {
                AggregationLevel::Abstract => {
                    if !current.facts.is_empty() {
                        sections.push(std::mem::take(&mut current));
                    }
                    current.heading = Some(fact.fact.properties.label.clone());
                    current.facts.push(fact.clone());
                }
                AggregationLevel::Subtotal => {
                    current.facts.push(fact.clone());
                    current.closed_by = Some(AggregationLevel::Subtotal);
                    sections.push(std::mem::take(&mut current));
                }
                AggregationLevel::Total => {
                    current.facts.push(fact.clone());
                    current.closed_by = Some(AggregationLevel::Total);
                    sections.push(std::mem::take(&mut current));
                }
                _ => current.facts.push(fact.clone()),
            }
        }

        if !current.facts.is_empty() {
            sections.push(current);
        }

        sections
    }
}

fn statement_set(facts: &[ClassifiedFact]) -> BTreeSet<StatementType> {
    facts.iter().map(|f| f.classification.statement).collect()
}

fn temporal_set(facts: &[ClassifiedFact]) -> BTreeSet<TemporalType> {
    facts
        .iter()
        .map(|f| f.classification.temporal)
        .collect::<BTreeSet<_>>()
}

fn period_discontinuity(prev: &PeriodInfo, next: &PeriodInfo) -> bool {
    prev.period_type != next.period_type
        || prev.instant != next.instant
        || prev.end != next.end
}

// ============================================================================
// STATEMENT SECTION
// ============================================================================

/// A contiguous run of facts under one heading inside a statement
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct StatementSection {
    /// Label of the abstract fact that opened the section, if any
    pub heading: Option<String>,

    pub facts: Vec<ClassifiedFact>,

    /// Aggregation level that closed the section (subtotal or total)
    pub closed_by: Option<AggregationLevel>,
}

// ============================================================================
// TESTS
// ============================================================================
