//! Validated run parameters for the affinity model and repair engine.

/// Probability multiplier applied when the target's follower quota is met.
pub const FULLNESS_DAMPING: f64 = 0.2;

/// Default minimum in- and out-degree enforced by the repair engine.
pub const DEFAULT_DEGREE_FLOOR: u64 = 2;

/// Default cap on repair passes.
pub const DEFAULT_MAX_REPAIR_PASSES: usize = 1000;

/// Default probability of following a hub of a shared country.
pub const DEFAULT_HUB_COUNTRY_PROBABILITY: f64 = 0.6;

/// Default probability of following a global hub.
pub const DEFAULT_HUB_GLOBAL_PROBABILITY: f64 = 0.5;

/// Default probability of following within a faction.
pub const DEFAULT_P_INTRA_FACTION: f64 = 0.3;

/// Default probability of following across factions.
pub const DEFAULT_P_INTER_FACTION: f64 = 0.1;

/// Default strength of the under-quota boost.
pub const DEFAULT_BOOST_COEFFICIENT: f64 = 0.2;

/// Default strength of the bandwagon effect.
pub const DEFAULT_BANDWAGON_SCALE: f64 = 0.5;

/// Default follower ratio above which a follow is suppressed outright.
pub const DEFAULT_BIG_FOLLOW_RATIO_THRESHOLD: f64 = 10.0;

/// Default follower ratio above which a follower counts as big.
pub const DEFAULT_BIG_USER_RATIO: f64 = 1.0;

/// Default desired-follower cutoff below which big accounts stay away.
pub const DEFAULT_MIN_FOLLOW_CUTOFF: u64 = 0;

/// Toggles for the modifiers layered over the base probability.
///
/// # Examples
/// ```
/// use followgraph_core::Modifiers;
///
/// let only_damping = Modifiers { bandwagon: false, ..Modifiers::default() };
/// assert!(only_damping.fullness_damping);
/// assert!(!Modifiers::none().scale_suppression);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Modifiers {
    /// Damp full targets and boost under-quota ones.
    pub fullness_damping: bool,
    /// Scale by the target's desired popularity relative to the roster.
    pub bandwagon: bool,
    /// Zero the probability when a big account would follow a small one.
    pub scale_suppression: bool,
}

impl Modifiers {
    /// Disables every modifier, leaving the base probability untouched.
    #[must_use]
    pub const fn none() -> Self {
        Self {
            fullness_damping: false,
            bandwagon: false,
            scale_suppression: false,
        }
    }
}

impl Default for Modifiers {
    fn default() -> Self {
        Self {
            fullness_damping: true,
            bandwagon: true,
            scale_suppression: true,
        }
    }
}

/// Probabilities and modifier coefficients consumed by
/// [`crate::AffinityModel`].
///
/// Values are range-checked by [`crate::GraphBuilder::build`].
#[derive(Debug, Clone, PartialEq)]
pub struct AffinityParams {
    pub(crate) hub_country_probability: f64,
    pub(crate) hub_global_probability: f64,
    pub(crate) p_intra_faction: f64,
    pub(crate) p_inter_faction: f64,
    pub(crate) boost_coefficient: f64,
    pub(crate) bandwagon_scale: f64,
    pub(crate) big_follow_ratio_threshold: f64,
    pub(crate) big_user_ratio: f64,
    pub(crate) min_follow_cutoff: u64,
    pub(crate) modifiers: Modifiers,
}

impl Default for AffinityParams {
    fn default() -> Self {
        Self {
            hub_country_probability: DEFAULT_HUB_COUNTRY_PROBABILITY,
            hub_global_probability: DEFAULT_HUB_GLOBAL_PROBABILITY,
            p_intra_faction: DEFAULT_P_INTRA_FACTION,
            p_inter_faction: DEFAULT_P_INTER_FACTION,
            boost_coefficient: DEFAULT_BOOST_COEFFICIENT,
            bandwagon_scale: DEFAULT_BANDWAGON_SCALE,
            big_follow_ratio_threshold: DEFAULT_BIG_FOLLOW_RATIO_THRESHOLD,
            big_user_ratio: DEFAULT_BIG_USER_RATIO,
            min_follow_cutoff: DEFAULT_MIN_FOLLOW_CUTOFF,
            modifiers: Modifiers::default(),
        }
    }
}

impl AffinityParams {
    /// Base probability when a country hub meets a matching member.
    #[must_use]
    pub fn hub_country_probability(&self) -> f64 {
        self.hub_country_probability
    }

    /// Base probability when the target is a global hub.
    #[must_use]
    pub fn hub_global_probability(&self) -> f64 {
        self.hub_global_probability
    }

    /// Base probability within a faction.
    #[must_use]
    pub fn p_intra_faction(&self) -> f64 {
        self.p_intra_faction
    }

    /// Base probability across factions.
    #[must_use]
    pub fn p_inter_faction(&self) -> f64 {
        self.p_inter_faction
    }

    /// Strength of the under-quota boost.
    #[must_use]
    pub fn boost_coefficient(&self) -> f64 {
        self.boost_coefficient
    }

    /// Strength of the bandwagon effect.
    #[must_use]
    pub fn bandwagon_scale(&self) -> f64 {
        self.bandwagon_scale
    }

    /// Follower ratio above which a follow is suppressed outright.
    #[must_use]
    pub fn big_follow_ratio_threshold(&self) -> f64 {
        self.big_follow_ratio_threshold
    }

    /// Follower ratio above which the follower counts as "big".
    #[must_use]
    pub fn big_user_ratio(&self) -> f64 {
        self.big_user_ratio
    }

    /// Targets with fewer desired followers than this are off-limits to big
    /// accounts.
    #[must_use]
    pub fn min_follow_cutoff(&self) -> u64 {
        self.min_follow_cutoff
    }

    /// Enabled modifiers.
    #[must_use]
    pub fn modifiers(&self) -> Modifiers {
        self.modifiers
    }
}

/// Degree floor and pass cap for the repair engine.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RepairParams {
    pub(crate) degree_floor: u64,
    pub(crate) max_passes: usize,
}

impl Default for RepairParams {
    fn default() -> Self {
        Self {
            degree_floor: DEFAULT_DEGREE_FLOOR,
            max_passes: DEFAULT_MAX_REPAIR_PASSES,
        }
    }
}

impl RepairParams {
    /// Minimum in- and out-degree every persona should reach.
    #[must_use]
    pub fn degree_floor(&self) -> u64 {
        self.degree_floor
    }

    /// Maximum number of repair passes.
    #[must_use]
    pub fn max_passes(&self) -> usize {
        self.max_passes
    }
}
