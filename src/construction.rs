// 🏗️ Statement Constructor - Merge clusters into ordered financial statements
// De-duplicates by (qname, context_ref), sorts totals last, and builds a
// parent/child hierarchy in a single pass

use crate::classifiers::{
    AggregationLevel, Classification, ClassifiedFact, MonetaryType, StatementType,
};
use crate::clustering::FactCluster;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::{BTreeMap, HashSet};

// ============================================================================
// LINE ITEM
// ============================================================================

/// One row of a constructed statement, carrying its classification
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LineItem {
    pub qname: String,
    pub label: String,
    pub value: Option<Value>,
    pub context_ref: String,
    pub classification: Classification,
    pub is_abstract: bool,
    pub is_nil: bool,
}

impl LineItem {
    fn from_fact(fact: &ClassifiedFact) -> Self {
        LineItem {
            qname: fact.fact.properties.qname.clone(),
            label: fact.fact.properties.label.clone(),
            value: fact.fact.properties.value.clone(),
            context_ref: fact.fact.properties.context_ref.clone(),
            classification: fact.classification,
            is_abstract: fact.fact.properties.is_abstract,
            is_nil: fact.fact.properties.is_nil,
        }
    }

    /// True when the item carries no usable value
    pub fn is_null_valued(&self) -> bool {
        if self.is_nil {
            return true;
        }
        match &self.value {
            None => true,
            Some(Value::Null) => true,
            Some(Value::String(s)) => s.trim().is_empty(),
            Some(_) => false,
        }
    }
}

// ============================================================================
// HIERARCHY
// ============================================================================

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ParentChild {
    pub parent: String,
    pub children: Vec<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Hierarchy {
    /// Qnames attached directly to the statement root
    pub root: Vec<String>,

    /// Total-level parents with their attached children, in scope order
    pub relationships: Vec<ParentChild>,
}

// ============================================================================
// SUMMARY TOTALS
// ============================================================================

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct StatementTotals {
    pub monetary_items: usize,
    pub abstract_items: usize,
    pub totals: usize,
    pub subtotals: usize,
    pub line_items: usize,
}

// ============================================================================
// STATEMENT
// ============================================================================

/// A constructed statement. Built once per statement type per filing;
/// immutable after construction.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Statement {
    pub statement_type: StatementType,
    pub line_items: Vec<LineItem>,
    pub totals: StatementTotals,
    pub hierarchy: Hierarchy,
}

impl Statement {
    pub fn summary(&self) -> String {
        format!(
            "{}: {} line items ({} totals, {} subtotals, {} abstract, {} monetary)",
            self.statement_type.as_str(),
            self.line_items.len(),
            self.totals.totals,
            self.totals.subtotals,
            self.totals.abstract_items,
            self.totals.monetary_items
        )
    }
}

// ============================================================================
// STATEMENT CONSTRUCTOR
// ============================================================================

#[derive(Debug, Clone, Copy, Default)]
pub struct StatementConstructor;

impl StatementConstructor {
    pub fn new() -> Self {
        StatementConstructor
    }

    /// Build one statement per statement type present in the clusters
    pub fn construct_statements(
        &self,
        clusters: &[FactCluster],
    ) -> BTreeMap<StatementType, Statement> {
        let mut by_type: BTreeMap<StatementType, Vec<&FactCluster>> = BTreeMap::new();
        for cluster in clusters {
            by_type.entry(cluster.statement).or_default().push(cluster);
        }

        by_type
            .into_iter()
            .map(|(statement_type, clusters)| {
                (statement_type, self.construct(statement_type, &clusters))
            })
            .collect()
    }

    /// Merge the clusters of one statement type into an ordered,
    /// de-duplicated statement
    fn construct(&self, statement_type: StatementType, clusters: &[&FactCluster]) -> Statement {
        // Merge with first-occurrence-wins de-duplication
        let mut seen: HashSet<(String, String)> = HashSet::new();
        let mut merged: Vec<&ClassifiedFact> = Vec::new();
        for cluster in clusters {
            for fact in &cluster.facts {
                if seen.insert(fact.identity()) {
                    merged.push(fact);
                }
            }
        }

        // Sort: aggregation order first (totals last), then label
        merged.sort_by(|a, b| {
            let ka = (
                a.classification.aggregation.sort_order(),
                a.fact.properties.label.to_lowercase(),
            );
            let kb = (
                b.classification.aggregation.sort_order(),
                b.fact.properties.label.to_lowercase(),
            );
            ka.cmp(&kb)
        });

        let line_items: Vec<LineItem> = merged.iter().map(|f| LineItem::from_fact(f)).collect();
        let hierarchy = build_hierarchy(&line_items);
        let totals = summarize(&line_items);

        Statement {
            statement_type,
            line_items,
            totals,
            hierarchy,
        }
    }
}

/// Single-pass hierarchy state machine: a total opens a new parent scope
/// (flushing the previous one), line items and subtotals attach to the open
/// parent or to root, abstracts always attach to root.
fn build_hierarchy(line_items: &[LineItem]) -> Hierarchy {
    let mut hierarchy = Hierarchy::default();
    let mut open_parent: Option<ParentChild> = None;

    for item in line_items {
        match item.classification.aggregation {
            AggregationLevel::Total => {
                if let Some(parent) = open_parent.take() {
                    hierarchy.relationships.push(parent);
                }
                open_parent = Some(ParentChild {
                    parent: item.qname.clone(),
                    children: Vec::new(),
                });
            }
            AggregationLevel::LineItem | AggregationLevel::Subtotal => {
                match open_parent.as_mut() {
                    Some(parent) => parent.children.push(item.qname.clone()),
                    None => hierarchy.root.push(item.qname.clone()),
                }
            }
            _ => hierarchy.root.push(item.qname.clone()),
        }
    }

    if let Some(parent) = open_parent {
        hierarchy.relationships.push(parent);
    }

    hierarchy
}

fn summarize(line_items: &[LineItem]) -> StatementTotals {
    let mut totals = StatementTotals::default();
    for item in line_items {
        if item.classification.monetary == MonetaryType::Monetary {
            totals.monetary_items += 1;
        }
        match item.classification.aggregation {
            AggregationLevel::Abstract => totals.abstract_items += 1,
            AggregationLevel::Total => totals.totals += 1,
            AggregationLevel::Subtotal => totals.subtotals += 1,
            AggregationLevel::LineItem => totals.line_items += 1,
            AggregationLevel::Unknown => {}
        }
    }
    totals
}

// ============================================================================
// TESTS
// ============================================================================
