//! Human-readable summary of a quote
//!
//! Shared by the step 5 view, the `show` command and the lead payload, so all
//! three always describe the selections the same way.

use serde::Serialize;

use super::pricing::{format_money, quote_total};
use super::selection::{SelectionState, Surface};

pub const NOT_SELECTED: &str = "not selected";
pub const NO_EXTRAS: &str = "none";

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SummaryFields {
    pub enclosure: String,
    pub size: String,
    pub walls: String,
    pub floor: String,
    pub ceiling: String,
    pub extras: String,
    pub total: i64,
}

impl SummaryFields {
    /// Describe `state`. The total is always recomputed, never read from the
    /// stored field.
    pub fn from_state(state: &SelectionState) -> Self {
        let material = |surface: Surface| {
            state
                .interior_finish()
                .slot(surface)
                .material_name
                .clone()
                .unwrap_or_else(|| NOT_SELECTED.to_string())
        };

        let size = if state.dimensions().is_complete() {
            state.dimensions().display()
        } else {
            NOT_SELECTED.to_string()
        };

        let extras = if state.add_ons().is_empty() {
            NO_EXTRAS.to_string()
        } else {
            state
                .add_ons()
                .iter()
                .map(|a| a.name.as_str())
                .collect::<Vec<_>>()
                .join(", ")
        };

        Self {
            enclosure: state
                .enclosure_type()
                .name
                .clone()
                .unwrap_or_else(|| NOT_SELECTED.to_string()),
            size,
            walls: material(Surface::Walls),
            floor: material(Surface::Floor),
            ceiling: material(Surface::Ceiling),
            extras,
            total: quote_total(state),
        }
    }

    /// Label/value rows in display order
    pub fn rows(&self, currency: &str) -> Vec<(&'static str, String)> {
        vec![
            ("Type", self.enclosure.clone()),
            ("Size, m", self.size.clone()),
            ("Walls", self.walls.clone()),
            ("Floor", self.floor.clone()),
            ("Ceiling", self.ceiling.clone()),
            ("Extras", self.extras.clone()),
            ("Total", format_money(self.total, currency)),
        ]
    }
}
