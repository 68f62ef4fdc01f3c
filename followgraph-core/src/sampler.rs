//! Greedy stochastic edge sampling against desired out-degree budgets.

use rand::{Rng, distributions::Standard, seq::SliceRandom};
use tracing::{debug, instrument};

use crate::{
    affinity::AffinityModel,
    edges::{Edge, EdgeSet},
    params::AffinityParams,
    persona::PersonaId,
    registry::PersonaRegistry,
};

/// Counters describing one sampling pass.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SamplingStats {
    /// Bernoulli trials drawn.
    pub trials: usize,
    /// Edges committed.
    pub committed: usize,
}

/// Samples follow edges for every persona in a fresh random order.
///
/// Each follower walks its own shuffled candidate stack, drawing one
/// Bernoulli trial per candidate until its following budget is spent or the
/// stack runs dry. Counters left over from an earlier run are cleared first;
/// committed edges are then counted on the registry as they land.
///
/// # Examples
/// ```
/// use followgraph_core::{GraphBuilder, Modifiers, PersonaRecord, PersonaRegistry, sample};
/// use rand::{SeedableRng, rngs::SmallRng};
///
/// let mut registry = PersonaRegistry::try_from_records(
///     "trio",
///     (0..3)
///         .map(|i| PersonaRecord::new(format!("P{i}"), format!("p{i}"), "f").with_desired(1, 1))
///         .collect(),
/// )?;
/// let graph = GraphBuilder::new()
///     .with_p_intra_faction(1.0)
///     .with_modifiers(Modifiers::none())
///     .build()?;
/// let mut rng = SmallRng::seed_from_u64(1);
/// let (edges, stats) = sample(&mut registry, graph.affinity_params(), &mut rng);
/// assert_eq!(edges.len(), 3);
/// assert_eq!(stats.committed, 3);
/// # Ok::<(), followgraph_core::GraphError>(())
/// ```
#[instrument(
    name = "core.sample",
    skip_all,
    fields(personas = registry.len()),
)]
pub fn sample<R>(
    registry: &mut PersonaRegistry,
    params: &AffinityParams,
    rng: &mut R,
) -> (EdgeSet, SamplingStats)
where
    R: Rng + ?Sized,
{
    registry.reset_counters();
    let model = AffinityModel::new(params, registry);
    let mut order: Vec<PersonaId> = registry.ids().collect();
    order.shuffle(rng);

    let mut edges = EdgeSet::new();
    let mut stats = SamplingStats::default();
    for follower in order {
        let mut candidates: Vec<PersonaId> =
            registry.ids().filter(|&id| id != follower).collect();
        candidates.shuffle(rng);

        while !budget_spent(registry, follower) {
            let Some(target) = candidates.pop() else {
                break;
            };
            let (Some(u), Some(v)) = (registry.get(follower), registry.get(target)) else {
                continue;
            };
            let probability = model.probability(u, v);
            stats.trials += 1;

            let draw: f64 = rng.sample(Standard);
            if draw >= probability {
                continue;
            }
            let Some(edge) = Edge::new(follower, target) else {
                continue;
            };
            if edges.insert(edge) {
                registry.record_edge(edge);
                stats.committed += 1;
            }
        }
    }

    debug!(
        trials = stats.trials,
        committed = stats.committed,
        "sampling pass finished"
    );
    (edges, stats)
}

fn budget_spent(registry: &PersonaRegistry, id: PersonaId) -> bool {
    registry
        .get(id)
        .is_none_or(|persona| persona.is_following_budget_spent())
}
