//! Persona records, identifiers, and tag parsing.

use std::fmt;

const HUB_TAG: &str = "#hub";
const COUNTRY_HUB_PREFIX: &str = "#hub_";

/// Stable identifier of a persona within one registry.
///
/// Identifiers are dense indices assigned in roster order, so they double as
/// positions in per-persona tables.
///
/// # Examples
/// ```
/// use followgraph_core::PersonaId;
///
/// let id = PersonaId::new(3);
/// assert_eq!(id.index(), 3);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct PersonaId(usize);

impl PersonaId {
    /// Wraps a registry index.
    #[rustfmt::skip]
    #[must_use]
    pub const fn new(index: usize) -> Self { Self(index) }

    /// Returns the registry index.
    #[rustfmt::skip]
    #[must_use]
    pub const fn index(self) -> usize { self.0 }
}

impl fmt::Display for PersonaId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Lowercase tokens parsed from a persona's free-text tag column.
///
/// Tokens keep their leading `#`. Duplicates collapse while the first
/// occurrence order is preserved.
///
/// # Examples
/// ```
/// use followgraph_core::TagSet;
///
/// let tags = TagSet::parse("#Hub_UK  #uk #press");
/// assert!(tags.has_country("uk"));
/// assert_eq!(tags.country_hubs().collect::<Vec<_>>(), ["uk"]);
/// assert_eq!(tags.country_hub(), Some("uk"));
/// assert!(!tags.is_global_hub());
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TagSet {
    tokens: Vec<String>,
}

impl TagSet {
    /// Splits `raw` on whitespace and lowercases every token.
    #[must_use]
    pub fn parse(raw: &str) -> Self {
        let mut tokens: Vec<String> = Vec::new();
        for token in raw.split_whitespace() {
            let lowered = token.to_lowercase();
            if !tokens.contains(&lowered) {
                tokens.push(lowered);
            }
        }
        Self { tokens }
    }

    /// Returns whether `token` (already lowercase) is present.
    #[must_use]
    pub fn contains(&self, token: &str) -> bool {
        self.tokens.iter().any(|candidate| candidate == token)
    }

    /// Returns whether the persona carries the global `#hub` marker.
    #[must_use]
    pub fn is_global_hub(&self) -> bool {
        self.contains(HUB_TAG)
    }

    /// Yields the country codes of every `#hub_<code>` marker.
    pub fn country_hubs(&self) -> impl Iterator<Item = &str> {
        self.tokens
            .iter()
            .filter_map(|token| token.strip_prefix(COUNTRY_HUB_PREFIX))
            .filter(|code| !code.is_empty())
    }

    /// Country code of the first `#hub_<code>` marker, which is the only one
    /// the affinity model consults.
    #[must_use]
    pub fn country_hub(&self) -> Option<&str> {
        self.country_hubs().next()
    }

    /// Returns whether the persona carries the `#<code>` membership marker.
    #[must_use]
    pub fn has_country(&self, code: &str) -> bool {
        self.tokens
            .iter()
            .any(|token| token.strip_prefix('#') == Some(code))
    }

    /// Iterates over the parsed tokens in first-seen order.
    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.tokens.iter().map(String::as_str)
    }

    /// Returns the number of distinct tokens.
    #[must_use]
    pub fn len(&self) -> usize {
        self.tokens.len()
    }

    /// Returns whether no tokens were parsed.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.tokens.is_empty()
    }
}

/// A raw roster row as supplied by an ingestion adapter.
///
/// # Examples
/// ```
/// use followgraph_core::PersonaRecord;
///
/// let record = PersonaRecord::new("Ada", "ada", "blue")
///     .with_tags("#hub")
///     .with_desired(120, 40);
/// assert_eq!(record.desired_in, 120);
/// assert_eq!(record.desired_out, 40);
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PersonaRecord {
    /// Display label.
    pub name: String,
    /// Unique key.
    pub handle: String,
    /// Faction label.
    pub faction: String,
    /// Free-text, space-delimited tags.
    pub tags: String,
    /// Optional external handle carried through untouched.
    pub tw_handle: Option<String>,
    /// Desired follower count (`TwFollowers`).
    pub desired_in: u64,
    /// Desired following count (`TwFollowing`).
    pub desired_out: u64,
}

impl PersonaRecord {
    /// Creates a record with empty tags and zero degree targets.
    #[must_use]
    pub fn new(
        name: impl Into<String>,
        handle: impl Into<String>,
        faction: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            handle: handle.into(),
            faction: faction.into(),
            ..Self::default()
        }
    }

    /// Replaces the free-text tags.
    #[must_use]
    pub fn with_tags(mut self, tags: impl Into<String>) -> Self {
        self.tags = tags.into();
        self
    }

    /// Sets the passthrough external handle.
    #[must_use]
    pub fn with_tw_handle(mut self, tw_handle: impl Into<String>) -> Self {
        self.tw_handle = Some(tw_handle.into());
        self
    }

    /// Sets the desired follower and following counts.
    #[must_use]
    pub fn with_desired(mut self, desired_in: u64, desired_out: u64) -> Self {
        self.desired_in = desired_in;
        self.desired_out = desired_out;
        self
    }
}

/// A normalised persona with running degree counters.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Persona {
    id: PersonaId,
    handle: String,
    name: String,
    faction: String,
    tags: TagSet,
    tw_handle: Option<String>,
    desired_in: u64,
    desired_out: u64,
    current_in: u64,
    current_out: u64,
}

impl Persona {
    pub(crate) fn from_record(id: PersonaId, record: PersonaRecord) -> Self {
        let PersonaRecord {
            name,
            handle,
            faction,
            tags,
            tw_handle,
            desired_in,
            desired_out,
        } = record;
        Self {
            id,
            handle: handle.trim().to_owned(),
            name,
            faction,
            tags: TagSet::parse(&tags),
            tw_handle,
            desired_in,
            desired_out,
            current_in: 0,
            current_out: 0,
        }
    }

    /// Returns the registry identifier.
    #[must_use]
    pub fn id(&self) -> PersonaId {
        self.id
    }

    /// Returns the unique handle.
    #[must_use]
    pub fn handle(&self) -> &str {
        &self.handle
    }

    /// Returns the display name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns the faction label.
    #[must_use]
    pub fn faction(&self) -> &str {
        &self.faction
    }

    /// Returns the parsed tags.
    #[must_use]
    pub fn tags(&self) -> &TagSet {
        &self.tags
    }

    /// Returns the passthrough external handle, if any.
    #[must_use]
    pub fn tw_handle(&self) -> Option<&str> {
        self.tw_handle.as_deref()
    }

    /// Returns the desired follower count.
    #[must_use]
    pub fn desired_in(&self) -> u64 {
        self.desired_in
    }

    /// Returns the desired following count.
    #[must_use]
    pub fn desired_out(&self) -> u64 {
        self.desired_out
    }

    /// Returns how many personas currently follow this one.
    #[must_use]
    pub fn current_in(&self) -> u64 {
        self.current_in
    }

    /// Returns how many personas this one currently follows.
    #[must_use]
    pub fn current_out(&self) -> u64 {
        self.current_out
    }

    /// Returns whether the follower target has been met.
    #[must_use]
    pub fn is_follower_quota_met(&self) -> bool {
        self.current_in >= self.desired_in
    }

    /// Returns whether the following budget has been spent.
    #[must_use]
    pub fn is_following_budget_spent(&self) -> bool {
        self.current_out >= self.desired_out
    }

    pub(crate) fn record_follow(&mut self) {
        self.current_out += 1;
    }

    pub(crate) fn record_follower(&mut self) {
        self.current_in += 1;
    }

    pub(crate) fn reset_counters(&mut self) {
        self.current_in = 0;
        self.current_out = 0;
    }
}
