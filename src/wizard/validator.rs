//! Forward-navigation gates
//!
//! One predicate per step. Gates only ever control "forward"; going back is
//! always allowed.

use crate::quote::{SelectionState, Surface};

use super::step::DimensionDraft;

/// Whether the forward control is live for the active step
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Gate {
    /// Forward is enabled
    Open,
    /// Required input is still missing
    Closed,
    /// Last step: the available action is submission, not navigation
    Terminal,
}

impl Gate {
    pub fn allows_forward(self) -> bool {
        self == Gate::Open
    }

    fn from_bool(open: bool) -> Self {
        if open {
            Gate::Open
        } else {
            Gate::Closed
        }
    }
}

/// Step 1: a type has been chosen
pub fn enclosure_gate(state: &SelectionState) -> Gate {
    Gate::from_bool(state.enclosure_type().name.is_some())
}

/// Step 2: every dimension input reads as a strictly positive number
pub fn dimensions_gate(drafts: &DimensionDraft) -> Gate {
    Gate::from_bool(drafts.parse().is_some())
}

/// Interior categories that must be filled before leaving step 3
pub fn required_surfaces(state: &SelectionState) -> &'static [Surface] {
    if state.is_french_style() {
        &[Surface::Ceiling, Surface::Floor]
    } else {
        Surface::all()
    }
}

/// Number of required categories that already carry a coefficient
pub fn filled_surfaces(state: &SelectionState) -> usize {
    required_surfaces(state)
        .iter()
        .filter(|s| state.interior_finish().slot(**s).is_set())
        .count()
}

/// Step 3: 3 finishes normally, 2 for French style (walls excluded)
pub fn interior_gate(state: &SelectionState) -> Gate {
    Gate::from_bool(filled_surfaces(state) >= required_surfaces(state).len())
}
