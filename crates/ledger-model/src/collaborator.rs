//! The three fixed collaborator roles sharing project revenue.

use serde::{Deserialize, Serialize};
use std::fmt;

/// A named collaborator in the three-way revenue split.
///
/// The set is fixed: every project row carries a contribution percentage and
/// a derived part amount for each of the three.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Collaborator {
    Meet,
    Spandan,
    Srey,
}

impl Collaborator {
    /// All collaborators, in column order.
    pub const ALL: [Collaborator; 3] =
        [Collaborator::Meet, Collaborator::Spandan, Collaborator::Srey];

    /// Display name as used in the column headers.
    pub fn name(&self) -> &'static str {
        match self {
            Collaborator::Meet => "Meet",
            Collaborator::Spandan => "Spandan",
            Collaborator::Srey => "Srey",
        }
    }

    /// Column holding this collaborator's contribution percentage.
    pub fn contribution_column(&self) -> &'static str {
        match self {
            Collaborator::Meet => "Meet's Contribution (%)",
            Collaborator::Spandan => "Spandan's Contribution (%)",
            Collaborator::Srey => "Srey's Contribution (%)",
        }
    }

    /// Column holding this collaborator's derived part amount.
    pub fn part_column(&self) -> &'static str {
        match self {
            Collaborator::Meet => "Meet's Part",
            Collaborator::Spandan => "Spandan's Part",
            Collaborator::Srey => "Srey's Part",
        }
    }
}

impl fmt::Display for Collaborator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}
