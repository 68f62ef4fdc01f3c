//! Square relationship matrix derived from a follow edge set.

use std::fmt;

use crate::{edges::EdgeSet, persona::PersonaId};

/// Relationship between a row persona and a column persona.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[repr(u8)]
pub enum RelationshipCode {
    /// Neither follows the other. Always used on the diagonal.
    #[default]
    None = 0,
    /// The row persona follows the column persona only.
    Follows = 1,
    /// Both follow each other.
    Mutual = 2,
    /// The column persona follows the row persona only.
    FollowedBy = 3,
}

impl RelationshipCode {
    /// Returns the numeric export code.
    #[must_use]
    pub const fn as_u8(self) -> u8 {
        self as u8
    }

    const fn from_flags(row_follows: bool, column_follows: bool) -> Self {
        match (row_follows, column_follows) {
            (false, false) => Self::None,
            (true, false) => Self::Follows,
            (true, true) => Self::Mutual,
            (false, true) => Self::FollowedBy,
        }
    }
}

impl fmt::Display for RelationshipCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_u8())
    }
}

/// Persona-by-persona relationship matrix in registry order.
///
/// # Examples
/// ```
/// use followgraph_core::{Edge, EdgeSet, PersonaId, RelationshipCode, RelationshipMatrix};
///
/// let (a, b) = (PersonaId::new(0), PersonaId::new(1));
/// let edges: EdgeSet = Edge::new(a, b).into_iter().collect();
/// let matrix = RelationshipMatrix::from_edges(3, &edges);
/// assert_eq!(matrix.code(a, b), RelationshipCode::Follows);
/// assert_eq!(matrix.code(b, a), RelationshipCode::FollowedBy);
/// assert_eq!(matrix.code(a, a), RelationshipCode::None);
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RelationshipMatrix {
    size: usize,
    follows: Vec<bool>,
}

impl RelationshipMatrix {
    /// Builds a `size` by `size` matrix from `edges`.
    ///
    /// Edges that reference personas outside `0..size` are ignored.
    #[must_use]
    pub fn from_edges(size: usize, edges: &EdgeSet) -> Self {
        let mut follows = vec![false; size.saturating_mul(size)];
        for edge in edges {
            let (row, column) = (edge.follower().index(), edge.followed().index());
            if row < size && column < size && row != column {
                follows[row * size + column] = true;
            }
        }
        Self { size, follows }
    }

    /// Returns the number of personas on each axis.
    #[must_use]
    pub fn size(&self) -> usize {
        self.size
    }

    /// Returns the code for the cell at (`row`, `column`).
    ///
    /// Out-of-range positions and the diagonal yield
    /// [`RelationshipCode::None`].
    #[must_use]
    pub fn code(&self, row: PersonaId, column: PersonaId) -> RelationshipCode {
        let (r, c) = (row.index(), column.index());
        if r == c || r >= self.size || c >= self.size {
            return RelationshipCode::None;
        }
        RelationshipCode::from_flags(self.follows[r * self.size + c], self.follows[c * self.size + r])
    }

    /// Returns one row of codes, ordered by column.
    pub fn row(&self, row: PersonaId) -> impl ExactSizeIterator<Item = RelationshipCode> + '_ {
        (0..self.size).map(move |column| self.code(row, PersonaId::new(column)))
    }

    /// Iterates every row in registry order.
    pub fn rows(
        &self,
    ) -> impl ExactSizeIterator<Item = impl ExactSizeIterator<Item = RelationshipCode> + '_> + '_
    {
        (0..self.size).map(move |row| self.row(PersonaId::new(row)))
    }
}
