// 🗂️ Fact Clusterer - Partition classified facts into statement clusters
// Three sequential groupings: statement → period key → context key.
// Clustering never filters: every input fact lands in exactly one cluster.

use crate::classifiers::{ClassifiedFact, StatementType, TemporalType};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

// ============================================================================
// FACT CLUSTER
// ============================================================================

/// Ordered facts sharing a derived statement + period + context key
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FactCluster {
    /// `<statement>_<period_key>_<context_key>`
    pub id: String,

    pub statement: StatementType,
    pub period_key: String,
    pub context_key: String,

    /// Facts in input order
    pub facts: Vec<ClassifiedFact>,
}

impl FactCluster {
    pub fn len(&self) -> usize {
        self.facts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.facts.is_empty()
    }
}

// ============================================================================
// FACT CLUSTERER
// ============================================================================

#[derive(Debug, Clone, Copy, Default)]
pub struct FactClusterer;

impl FactClusterer {
    pub fn new() -> Self {
        FactClusterer
    }

    /// Partition facts into clusters keyed by their derived cluster id.
    /// Invariant: the cluster sizes sum to the input length.
    pub fn cluster_facts(&self, facts: &[ClassifiedFact]) -> BTreeMap<String, FactCluster> {
        let mut clusters: BTreeMap<String, FactCluster> = BTreeMap::new();

        for fact in facts {
            let statement = fact.classification.statement;
            let period_key = Self::period_key(fact);
            let context_key = Self::context_key(fact);
            let id = format!("{}_{}_{}", statement.as_str(), period_key, context_key);

            clusters
                .entry(id.clone())
                .or_insert_with(|| FactCluster {
                    id,
                    statement,
                    period_key: period_key.clone(),
                    context_key: context_key.clone(),
                    facts: Vec::new(),
                })
                .facts
                .push(fact.clone());
        }

        clusters
    }

    /// `instant_<date>` / `duration_<start>_<end>` / `unknown`
    fn period_key(fact: &ClassifiedFact) -> String {
        let period = &fact.fact.context.period;
        match fact.classification.temporal {
            TemporalType::Instant => format!(
                "instant_{}",
                period.instant.as_deref().unwrap_or("unknown")
            ),
            TemporalType::Duration => format!(
                "duration_{}_{}",
                period.start.as_deref().unwrap_or("unknown"),
                period.end.as_deref().unwrap_or("unknown")
            ),
            TemporalType::Unknown => "unknown".to_string(),
        }
    }

    /// `<entity>_<dim=member>...` for dimensional contexts, else
    /// `<entity>_default`. Dimension order is deterministic (sorted map).
    fn context_key(fact: &ClassifiedFact) -> String {
        let context = &fact.fact.context;
        let entity = context.entity.as_deref().unwrap_or("unknown");

        if context.dimensions.is_empty() {
            return format!("{}_default", entity);
        }

        let dims: Vec<String> = context
            .dimensions
            .iter()
            .map(|(dim, member)| format!("{}={}", dim, member))
            .collect();

        format!("{}_{}", entity, dims.join("_"))
    }
}

// ============================================================================
// TESTS
// ============================================================================
