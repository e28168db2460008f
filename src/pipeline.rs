// 🔁 Mapper Pipeline - Per-filing phase runner
// validate → classify → cluster → refine boundaries → construct → null quality
// Each phase is timed and logged; a phase failure aborts the current filing
// only and carries its phase name

use crate::boundary::BoundaryDetector;
use crate::classifiers::{classify_facts, ClassificationMetrics, StatementType};
use crate::clustering::{FactCluster, FactClusterer};
use crate::construction::{Statement, StatementConstructor};
use crate::facts::{validate_fact, EnrichedFact};
use crate::null_quality::{NullQualityEngine, NullQualityReport};
use log::{info, warn};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::time::Instant;
use thiserror::Error;

// ============================================================================
// ERRORS
// ============================================================================

#[derive(Error, Debug)]
pub enum MapperError {
    #[error("No facts provided for this filing")]
    EmptyInput,

    #[error("All {dropped} input facts failed validation")]
    InvalidInput { dropped: usize },

    #[error("Phase '{phase}' failed: {source}")]
    Phase {
        phase: String,
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },
}

pub type Result<T> = std::result::Result<T, MapperError>;

// ============================================================================
// PHASE TIMING
// ============================================================================

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PhaseTiming {
    pub phase: String,
    pub elapsed_ms: u128,
}

/// Run one phase through the timing wrapper. Failures are wrapped with the
/// phase name so the orchestration layer can log where a filing died.
fn run_phase<T, F>(name: &str, timings: &mut Vec<PhaseTiming>, f: F) -> Result<T>
where
    F: FnOnce() -> Result<T>,
{
    let started = Instant::now();
    let result = f();
    let elapsed_ms = started.elapsed().as_millis();
    timings.push(PhaseTiming {
        phase: name.to_string(),
        elapsed_ms,
    });

    match result {
        Ok(value) => {
            info!("phase '{}' completed in {}ms", name, elapsed_ms);
            Ok(value)
        }
        Err(MapperError::Phase { phase, source }) => Err(MapperError::Phase { phase, source }),
        Err(err) => Err(MapperError::Phase {
            phase: name.to_string(),
            source: Box::new(err),
        }),
    }
}

// ============================================================================
// FILING REPORT
// ============================================================================

/// Everything produced for one filing. Created fresh per run and handed
/// unmodified to downstream consumers.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FilingReport {
    pub statements: BTreeMap<StatementType, Statement>,
    pub null_quality: NullQualityReport,
    pub metrics: ClassificationMetrics,
    pub phase_timings: Vec<PhaseTiming>,

    /// Input facts dropped by validation
    pub dropped_facts: usize,
}

// ============================================================================
// MAPPER PIPELINE
// ============================================================================

pub struct MapperPipeline {
    clusterer: FactClusterer,
    boundary_detector: BoundaryDetector,
    constructor: StatementConstructor,
}

impl MapperPipeline {
    pub fn new() -> Self {
        MapperPipeline {
            clusterer: FactClusterer::new(),
            boundary_detector: BoundaryDetector::new(),
            constructor: StatementConstructor::new(),
        }
    }

    /// Process one filing end to end, synchronously.
    /// The null-quality engine is instantiated fresh inside, so no state
    /// survives into the next filing.
    pub fn process_filing(&self, facts: &[EnrichedFact]) -> Result<FilingReport> {
        let mut timings = Vec::new();

        // Phase 1: input validation
        let (valid_facts, dropped_facts) = run_phase("validate", &mut timings, || {
            if facts.is_empty() {
                return Err(MapperError::EmptyInput);
            }

            let mut valid = Vec::new();
            let mut dropped = 0usize;
            for fact in facts {
                let errors = validate_fact(fact);
                if errors.is_empty() {
                    valid.push(fact.clone());
                } else {
                    dropped += 1;
                    warn!(
                        "dropping malformed fact {:?}: {}",
                        fact.identity(),
                        errors
                            .iter()
                            .map(|e| e.to_string())
                            .collect::<Vec<_>>()
                            .join("; ")
                    );
                }
            }

            if valid.is_empty() {
                return Err(MapperError::InvalidInput { dropped });
            }
            Ok((valid, dropped))
        })?;

        // Phase 2: classification
        let (classified, metrics) = run_phase("classify", &mut timings, || {
            let (classified, metrics) = classify_facts(&valid_facts);
            info!(
                "classified {} facts ({} unknown temporal)",
                metrics.total_facts, metrics.unknown_temporal
            );
            Ok((classified, metrics))
        })?;

        // Phase 3: clustering
        let clusters = run_phase("cluster", &mut timings, || {
            let clusters = self.clusterer.cluster_facts(&classified);
            let clustered: usize = clusters.values().map(FactCluster::len).sum();
            info!(
                "{} facts partitioned into {} clusters",
                clustered,
                clusters.len()
            );
            Ok(clusters)
        })?;

        // Phase 4: boundary refinement
        let refined = run_phase("boundaries", &mut timings, || {
            let refined: Vec<FactCluster> = clusters
                .values()
                .flat_map(|c| self.boundary_detector.detect_boundaries(c))
                .collect();
            info!("{} clusters after boundary refinement", refined.len());
            Ok(refined)
        })?;

        // Phase 5: statement construction
        let statements = run_phase("construct", &mut timings, || {
            let statements = self.constructor.construct_statements(&refined);
            for statement in statements.values() {
                info!("{}", statement.summary());
            }
            Ok(statements)
        })?;

        // Phase 6: null-quality analysis (fresh engine per filing)
        let null_quality = run_phase("null_quality", &mut timings, || {
            let engine = NullQualityEngine::new();
            let report = engine.analyze(&statements);
            info!("{}", report.summary_line());
            Ok(report)
        })?;

        Ok(FilingReport {
            statements,
            null_quality,
            metrics,
            phase_timings: timings,
            dropped_facts,
        })
    }
}

impl Default for MapperPipeline {
    fn default() -> Self {
        Self::new()
    }
}

// ============================================================================
// TESTS
// ============================================================================
