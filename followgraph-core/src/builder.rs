//! Builder utilities for configuring follow-graph generation.
//!
//! Collects the probability surface, modifier toggles, repair limits and
//! seed, and validates them before a [`FollowGraph`] runner is constructed.

use crate::{
    Result,
    error::GraphError,
    graph::FollowGraph,
    params::{AffinityParams, Modifiers, RepairParams},
};

/// Seed used when the caller does not supply one.
pub const DEFAULT_SEED: u64 = 0x5EED_F011;

/// Configures and constructs [`FollowGraph`] instances.
///
/// # Examples
/// ```
/// use followgraph_core::GraphBuilder;
///
/// let graph = GraphBuilder::new()
///     .with_p_intra_faction(0.4)
///     .with_seed(7)
///     .build()
///     .expect("builder configuration is valid");
/// assert_eq!(graph.affinity_params().p_intra_faction(), 0.4);
/// assert_eq!(graph.seed(), 7);
/// ```
#[derive(Debug, Clone)]
pub struct GraphBuilder {
    affinity: AffinityParams,
    repair: RepairParams,
    seed: u64,
}

impl Default for GraphBuilder {
    fn default() -> Self {
        Self {
            affinity: AffinityParams::default(),
            repair: RepairParams::default(),
            seed: DEFAULT_SEED,
        }
    }
}

impl GraphBuilder {
    /// Creates a builder populated with default parameters.
    ///
    /// # Examples
    /// ```
    /// use followgraph_core::GraphBuilder;
    ///
    /// let builder = GraphBuilder::new();
    /// assert_eq!(builder.affinity_params().hub_country_probability(), 0.6);
    /// assert_eq!(builder.repair_params().degree_floor(), 2);
    /// ```
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Overrides the country-hub probability.
    #[must_use]
    pub fn with_hub_country_probability(mut self, probability: f64) -> Self {
        self.affinity.hub_country_probability = probability;
        self
    }

    /// Overrides the global-hub probability.
    #[must_use]
    pub fn with_hub_global_probability(mut self, probability: f64) -> Self {
        self.affinity.hub_global_probability = probability;
        self
    }

    /// Overrides the same-faction probability.
    #[must_use]
    pub fn with_p_intra_faction(mut self, probability: f64) -> Self {
        self.affinity.p_intra_faction = probability;
        self
    }

    /// Overrides the cross-faction probability.
    #[must_use]
    pub fn with_p_inter_faction(mut self, probability: f64) -> Self {
        self.affinity.p_inter_faction = probability;
        self
    }

    /// Overrides the under-quota boost coefficient.
    #[must_use]
    pub fn with_boost_coefficient(mut self, coefficient: f64) -> Self {
        self.affinity.boost_coefficient = coefficient;
        self
    }

    /// Overrides the bandwagon scale.
    #[must_use]
    pub fn with_bandwagon_scale(mut self, scale: f64) -> Self {
        self.affinity.bandwagon_scale = scale;
        self
    }

    /// Overrides the ratio above which big-follows-small is suppressed.
    #[must_use]
    pub fn with_big_follow_ratio_threshold(mut self, threshold: f64) -> Self {
        self.affinity.big_follow_ratio_threshold = threshold;
        self
    }

    /// Overrides the ratio above which a follower counts as "big".
    #[must_use]
    pub fn with_big_user_ratio(mut self, ratio: f64) -> Self {
        self.affinity.big_user_ratio = ratio;
        self
    }

    /// Overrides the minimum desired follower count big accounts will follow.
    #[must_use]
    pub fn with_min_follow_cutoff(mut self, cutoff: u64) -> Self {
        self.affinity.min_follow_cutoff = cutoff;
        self
    }

    /// Selects which modifiers apply on top of the base probability.
    #[must_use]
    pub fn with_modifiers(mut self, modifiers: Modifiers) -> Self {
        self.affinity.modifiers = modifiers;
        self
    }

    /// Overrides the minimum in- and out-degree enforced by repair.
    #[must_use]
    pub fn with_degree_floor(mut self, floor: u64) -> Self {
        self.repair.degree_floor = floor;
        self
    }

    /// Overrides the cap on repair passes.
    #[must_use]
    pub fn with_max_repair_passes(mut self, passes: usize) -> Self {
        self.repair.max_passes = passes;
        self
    }

    /// Seeds the run-scoped RNG.
    #[must_use]
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }

    /// Returns the affinity parameters as currently configured.
    #[must_use]
    pub fn affinity_params(&self) -> &AffinityParams {
        &self.affinity
    }

    /// Returns the repair parameters as currently configured.
    #[must_use]
    pub fn repair_params(&self) -> RepairParams {
        self.repair
    }

    /// Validates the configuration and constructs a [`FollowGraph`].
    ///
    /// # Errors
    /// Returns [`GraphError::InvalidParameter`] when a probability lies outside
    /// `[0, 1]`, a coefficient is negative or non-finite, the suppression
    /// threshold is not positive, or the repair pass cap is zero.
    ///
    /// # Examples
    /// ```
    /// use followgraph_core::{GraphBuilder, GraphError};
    ///
    /// let err = GraphBuilder::new()
    ///     .with_hub_global_probability(1.5)
    ///     .build()
    ///     .expect_err("probabilities above one are rejected");
    /// assert!(matches!(err, GraphError::InvalidParameter { name: "hub_global_probability", .. }));
    /// ```
    pub fn build(self) -> Result<FollowGraph> {
        let affinity = &self.affinity;
        check_probability("hub_country_probability", affinity.hub_country_probability)?;
        check_probability("hub_global_probability", affinity.hub_global_probability)?;
        check_probability("p_intra_faction", affinity.p_intra_faction)?;
        check_probability("p_inter_faction", affinity.p_inter_faction)?;
        check_non_negative("boost_coefficient", affinity.boost_coefficient)?;
        check_non_negative("bandwagon_scale", affinity.bandwagon_scale)?;
        check_non_negative("big_user_ratio", affinity.big_user_ratio)?;
        check_non_negative(
            "big_follow_ratio_threshold",
            affinity.big_follow_ratio_threshold,
        )?;
        if affinity.big_follow_ratio_threshold == 0.0 {
            return Err(GraphError::InvalidParameter {
                name: "big_follow_ratio_threshold",
                value: 0.0,
                reason: "must be greater than zero",
            });
        }
        if self.repair.max_passes == 0 {
            return Err(GraphError::InvalidParameter {
                name: "max_repair_passes",
                value: 0.0,
                reason: "must be at least 1",
            });
        }

        Ok(FollowGraph::new(self.affinity, self.repair, self.seed))
    }
}

fn check_probability(name: &'static str, value: f64) -> Result<()> {
    if (0.0..=1.0).contains(&value) {
        return Ok(());
    }
    Err(GraphError::InvalidParameter {
        name,
        value,
        reason: "must lie within [0, 1]",
    })
}

fn check_non_negative(name: &'static str, value: f64) -> Result<()> {
    if value.is_finite() && value >= 0.0 {
        return Ok(());
    }
    Err(GraphError::InvalidParameter {
        name,
        value,
        reason: "must be finite and non-negative",
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case::negative(-0.1)]
    #[case::above_one(1.01)]
    #[case::nan(f64::NAN)]
    fn rejects_out_of_range_probabilities(#[case] value: f64) {
        let err = GraphBuilder::new()
            .with_p_inter_faction(value)
            .build()
            .expect_err("probability must be rejected");
        assert!(matches!(
            err,
            GraphError::InvalidParameter {
                name: "p_inter_faction",
                ..
            }
        ));
    }

    #[rstest]
    #[case::zero(0.0)]
    #[case::one(1.0)]
    fn accepts_probability_bounds(#[case] value: f64) {
        let graph = GraphBuilder::new()
            .with_hub_country_probability(value)
            .build()
            .expect("bounds are inclusive");
        assert_eq!(graph.affinity_params().hub_country_probability(), value);
    }

    #[rstest]
    #[case::negative_scale(GraphBuilder::new().with_bandwagon_scale(-1.0), "bandwagon_scale")]
    #[case::infinite_boost(GraphBuilder::new().with_boost_coefficient(f64::INFINITY), "boost_coefficient")]
    #[case::zero_threshold(
        GraphBuilder::new().with_big_follow_ratio_threshold(0.0),
        "big_follow_ratio_threshold"
    )]
    #[case::negative_big_user(GraphBuilder::new().with_big_user_ratio(-0.5), "big_user_ratio")]
    #[case::zero_passes(GraphBuilder::new().with_max_repair_passes(0), "max_repair_passes")]
    fn rejects_invalid_coefficients(#[case] builder: GraphBuilder, #[case] expected: &str) {
        match builder.build() {
            Err(GraphError::InvalidParameter { name, .. }) => assert_eq!(name, expected),
            other => panic!("expected InvalidParameter for {expected}, got {other:?}"),
        }
    }

    #[test]
    fn defaults_are_valid() {
        let graph = GraphBuilder::new().build().expect("defaults are valid");
        assert_eq!(graph.seed(), DEFAULT_SEED);
        assert_eq!(graph.repair_params().max_passes(), 1000);
        assert_eq!(graph.affinity_params().modifiers(), Modifiers::default());
    }
}
