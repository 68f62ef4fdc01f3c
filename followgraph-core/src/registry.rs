//! Persona registry: the owned, index-addressed roster for one run.

use std::{collections::HashMap, sync::Arc};

use tracing::debug;

use crate::{
    Result,
    edges::{Edge, EdgeSet},
    error::GraphError,
    persona::{Persona, PersonaId, PersonaRecord},
};

/// Owns every persona of a run and the counters the sampler and repair
/// engine update.
///
/// # Examples
/// ```
/// use followgraph_core::{PersonaRecord, PersonaRegistry};
///
/// let registry = PersonaRegistry::try_from_records(
///     "demo",
///     vec![
///         PersonaRecord::new("Ada", "ada", "blue").with_desired(10, 3),
///         PersonaRecord::new("Bo", "bo", "red").with_desired(4, 2),
///     ],
/// )?;
/// assert_eq!(registry.len(), 2);
/// assert_eq!(registry.max_desired_in(), 10);
/// assert_eq!(registry.id_of("bo")?.index(), 1);
/// # Ok::<(), followgraph_core::GraphError>(())
/// ```
#[derive(Debug, Clone)]
pub struct PersonaRegistry {
    name: Arc<str>,
    personas: Vec<Persona>,
    by_handle: HashMap<String, PersonaId>,
    max_desired_in: u64,
}

impl PersonaRegistry {
    /// Normalises `records` into personas, preserving roster order.
    ///
    /// # Errors
    /// Returns [`GraphError::EmptyRoster`] when `records` is empty,
    /// [`GraphError::EmptyHandle`] when a handle is blank, and
    /// [`GraphError::DuplicateHandle`] when two rows share a handle.
    pub fn try_from_records(
        name: impl Into<Arc<str>>,
        records: Vec<PersonaRecord>,
    ) -> Result<Self> {
        let name = name.into();
        if records.is_empty() {
            return Err(GraphError::EmptyRoster { roster: name });
        }

        let mut personas = Vec::with_capacity(records.len());
        let mut by_handle = HashMap::with_capacity(records.len());
        for (row, record) in records.into_iter().enumerate() {
            let id = PersonaId::new(row);
            let persona = Persona::from_record(id, record);
            if persona.handle().is_empty() {
                return Err(GraphError::EmptyHandle { row });
            }
            if let Some(existing) = by_handle.insert(persona.handle().to_owned(), id) {
                return Err(GraphError::DuplicateHandle {
                    handle: persona.handle().to_owned(),
                    first: existing.index(),
                    second: row,
                });
            }
            personas.push(persona);
        }

        let max_desired_in = personas
            .iter()
            .map(Persona::desired_in)
            .filter(|&desired| desired > 0)
            .max()
            .unwrap_or(1);

        debug!(
            roster = %name,
            personas = personas.len(),
            max_desired_in,
            "persona registry built"
        );
        Ok(Self {
            name,
            personas,
            by_handle,
            max_desired_in,
        })
    }

    /// Returns the roster identifier.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns the number of personas.
    #[must_use]
    pub fn len(&self) -> usize {
        self.personas.len()
    }

    /// Returns whether the registry holds no personas.
    ///
    /// Construction rejects empty rosters, so this is only ever `false` for a
    /// registry obtained through [`Self::try_from_records`].
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.personas.is_empty()
    }

    /// Largest positive desired follower count, or 1 when none is positive.
    #[must_use]
    pub fn max_desired_in(&self) -> u64 {
        self.max_desired_in
    }

    /// Looks up a persona by identifier.
    #[must_use]
    pub fn get(&self, id: PersonaId) -> Option<&Persona> {
        self.personas.get(id.index())
    }

    /// Resolves a handle to its identifier.
    ///
    /// # Errors
    /// Returns [`GraphError::UnknownPersona`] when no persona has `handle`.
    pub fn id_of(&self, handle: &str) -> Result<PersonaId> {
        self.by_handle
            .get(handle)
            .copied()
            .ok_or_else(|| GraphError::UnknownPersona {
                handle: handle.to_owned(),
            })
    }

    /// Iterates over personas in roster order.
    pub fn iter(&self) -> impl ExactSizeIterator<Item = &Persona> {
        self.personas.iter()
    }

    /// Iterates over identifiers in roster order.
    pub fn ids(&self) -> impl ExactSizeIterator<Item = PersonaId> {
        (0..self.personas.len()).map(PersonaId::new)
    }

    /// Handle of `id`, or an empty string for a foreign identifier.
    #[must_use]
    pub fn handle_of(&self, id: PersonaId) -> &str {
        self.get(id).map_or("", Persona::handle)
    }

    /// Snapshot of desired and current degrees for every persona.
    #[must_use]
    pub fn degree_report(&self) -> Vec<DegreeReport> {
        self.personas
            .iter()
            .map(|persona| DegreeReport {
                id: persona.id(),
                handle: persona.handle().to_owned(),
                desired_in: persona.desired_in(),
                desired_out: persona.desired_out(),
                current_in: persona.current_in(),
                current_out: persona.current_out(),
            })
            .collect()
    }

    /// Zeroes every running counter.
    pub(crate) fn reset_counters(&mut self) {
        for persona in &mut self.personas {
            persona.reset_counters();
        }
    }

    /// Recounts every persona's degrees from `edges`, discarding whatever the
    /// counters held before.
    pub(crate) fn sync_counters(&mut self, edges: &EdgeSet) {
        self.reset_counters();
        for edge in edges {
            self.record_edge(edge);
        }
    }

    /// Counts a freshly committed edge against both endpoints.
    ///
    /// Callers must only pass edges that were newly inserted into the run's
    /// edge set so the counters track true adjacency.
    pub(crate) fn record_edge(&mut self, edge: Edge) {
        if let Some(follower) = self.personas.get_mut(edge.follower().index()) {
            follower.record_follow();
        }
        if let Some(followed) = self.personas.get_mut(edge.followed().index()) {
            followed.record_follower();
        }
    }
}

/// Desired versus achieved degrees for one persona after a run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DegreeReport {
    /// Registry identifier.
    pub id: PersonaId,
    /// Persona handle.
    pub handle: String,
    /// Desired follower count.
    pub desired_in: u64,
    /// Desired following count.
    pub desired_out: u64,
    /// Achieved follower count.
    pub current_in: u64,
    /// Achieved following count.
    pub current_out: u64,
}

impl DegreeReport {
    /// Returns whether both degrees reach `floor`.
    #[must_use]
    pub fn meets_floor(&self, floor: u64) -> bool {
        self.current_in >= floor && self.current_out >= floor
    }
}
