//! Run orchestration for follow-graph generation.
//!
//! Provides the [`FollowGraph`] entry point, which owns validated
//! parameters, and [`GeneratedGraph`], which carries the personas, edges
//! and diagnostics of one run.

use std::sync::Arc;

use rand::{Rng, SeedableRng, rngs::SmallRng};
use tracing::{info, instrument};

use crate::{
    Result,
    edges::EdgeSet,
    matrix::RelationshipMatrix,
    params::{AffinityParams, RepairParams},
    persona::PersonaRecord,
    registry::{DegreeReport, PersonaRegistry},
    repair::{RepairReport, repair},
    sampler::{SamplingStats, sample},
};

/// Entry point for generating follow graphs.
///
/// Each call to [`FollowGraph::generate`] builds its own registry and RNG, so
/// one instance can serve any number of independent runs.
///
/// # Examples
/// ```
/// use followgraph_core::{GraphBuilder, PersonaRecord};
///
/// let graph = GraphBuilder::new().with_seed(42).build()?;
/// let roster: Vec<PersonaRecord> = (0..6)
///     .map(|i| PersonaRecord::new(format!("P{i}"), format!("p{i}"), "team").with_desired(3, 3))
///     .collect();
/// let generated = graph.generate("demo", roster)?;
/// assert!(generated.repair_report().floor_satisfied());
/// assert!(generated.edges().iter().all(|edge| edge.follower() != edge.followed()));
/// # Ok::<(), followgraph_core::GraphError>(())
/// ```
#[derive(Debug, Clone)]
pub struct FollowGraph {
    affinity: AffinityParams,
    repair: RepairParams,
    seed: u64,
}

impl FollowGraph {
    pub(crate) fn new(affinity: AffinityParams, repair: RepairParams, seed: u64) -> Self {
        Self {
            affinity,
            repair,
            seed,
        }
    }

    /// Returns the validated affinity parameters.
    #[must_use]
    pub fn affinity_params(&self) -> &AffinityParams {
        &self.affinity
    }

    /// Returns the validated repair parameters.
    #[must_use]
    pub fn repair_params(&self) -> RepairParams {
        self.repair
    }

    /// Returns the seed used for every run.
    #[must_use]
    pub fn seed(&self) -> u64 {
        self.seed
    }

    /// Builds a registry from `records` and runs sampling then repair.
    ///
    /// # Errors
    /// Returns any [`crate::GraphError`] raised while building the registry;
    /// no sampling happens in that case.
    #[instrument(
        name = "core.generate",
        err,
        skip(self, name, records),
        fields(records = records.len(), seed = self.seed),
    )]
    pub fn generate(
        &self,
        name: impl Into<Arc<str>>,
        records: Vec<PersonaRecord>,
    ) -> Result<GeneratedGraph> {
        let registry = PersonaRegistry::try_from_records(name, records)?;
        Ok(self.run(registry))
    }

    /// Runs sampling then repair over `registry` with the configured seed.
    ///
    /// Degree counters already present in `registry`, such as those of a
    /// registry taken from an earlier [`GeneratedGraph`], are discarded.
    #[must_use]
    pub fn run(&self, registry: PersonaRegistry) -> GeneratedGraph {
        let mut rng = SmallRng::seed_from_u64(self.seed);
        self.run_with_rng(registry, &mut rng)
    }

    /// Runs sampling then repair drawing from a caller-supplied generator.
    #[instrument(
        name = "core.run",
        skip_all,
        fields(roster = %registry.name(), personas = registry.len()),
    )]
    pub fn run_with_rng<R>(&self, mut registry: PersonaRegistry, rng: &mut R) -> GeneratedGraph
    where
        R: Rng + ?Sized,
    {
        let (sampled, sampling) = sample(&mut registry, &self.affinity, rng);
        let (edges, repair_report) = repair(&mut registry, &sampled, self.repair, rng);

        info!(
            roster = registry.name(),
            personas = registry.len(),
            sampled = sampling.committed,
            repaired = repair_report.edges_added,
            edges = edges.len(),
            floor_satisfied = repair_report.floor_satisfied(),
            "follow graph generated"
        );
        GeneratedGraph {
            registry,
            edges,
            sampling,
            repair: repair_report,
        }
    }
}

/// Personas, edges and diagnostics of one generation run.
#[derive(Debug, Clone)]
pub struct GeneratedGraph {
    registry: PersonaRegistry,
    edges: EdgeSet,
    sampling: SamplingStats,
    repair: RepairReport,
}

impl GeneratedGraph {
    /// Returns the registry with final degree counters.
    #[must_use]
    pub fn registry(&self) -> &PersonaRegistry {
        &self.registry
    }

    /// Returns the final edge set.
    #[must_use]
    pub fn edges(&self) -> &EdgeSet {
        &self.edges
    }

    /// Returns `(follower handle, followed handle)` pairs in output order.
    #[must_use]
    pub fn edge_handles(&self) -> Vec<(&str, &str)> {
        self.edges
            .iter()
            .map(|edge| {
                (
                    self.registry.handle_of(edge.follower()),
                    self.registry.handle_of(edge.followed()),
                )
            })
            .collect()
    }

    /// Returns counters from the sampling phase.
    #[must_use]
    pub fn sampling_stats(&self) -> SamplingStats {
        self.sampling
    }

    /// Returns the repair outcome.
    #[must_use]
    pub fn repair_report(&self) -> &RepairReport {
        &self.repair
    }

    /// Returns desired versus achieved degrees per persona.
    #[must_use]
    pub fn degree_report(&self) -> Vec<DegreeReport> {
        self.registry.degree_report()
    }

    /// Encodes the edge set as a persona-by-persona relationship matrix.
    #[must_use]
    pub fn relationship_matrix(&self) -> RelationshipMatrix {
        RelationshipMatrix::from_edges(self.registry.len(), &self.edges)
    }
}
