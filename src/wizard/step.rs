//! The five wizard steps and their handlers
//!
//! Every step implements the same contract: mutate on entry, apply actions
//! addressed to it, and report its forward gate. The controller dispatches
//! through [`Step::handler`] instead of branching on a step number.

use std::fmt;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::validator::{self, Gate};
use crate::quote::{surface_area, AddOn, Dimensions, SelectionState, Surface};

/// Steps in the quote wizard, numbered 1..=5
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub enum Step {
    /// Pick the enclosure type
    EnclosureType = 1,
    /// Enter length, width and height
    Dimensions = 2,
    /// Choose walls, ceiling and floor finishes
    InteriorFinish = 3,
    /// Optional extras
    AddOns = 4,
    /// Quote summary and lead capture
    Summary = 5,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StepError {
    #[error("step {0} is outside the range 1..=5")]
    OutOfRange(i64),
}

impl Step {
    pub const FIRST: Step = Step::EnclosureType;
    pub const LAST: Step = Step::Summary;

    pub fn all() -> &'static [Step] {
        &[
            Step::EnclosureType,
            Step::Dimensions,
            Step::InteriorFinish,
            Step::AddOns,
            Step::Summary,
        ]
    }

    pub fn number(self) -> u8 {
        self as u8
    }

    pub fn from_number(n: i64) -> Result<Step, StepError> {
        match n {
            1 => Ok(Step::EnclosureType),
            2 => Ok(Step::Dimensions),
            3 => Ok(Step::InteriorFinish),
            4 => Ok(Step::AddOns),
            5 => Ok(Step::Summary),
            other => Err(StepError::OutOfRange(other)),
        }
    }

    pub fn title(self) -> &'static str {
        match self {
            Step::EnclosureType => "Enclosure type",
            Step::Dimensions => "Dimensions",
            Step::InteriorFinish => "Interior finish",
            Step::AddOns => "Add-ons",
            Step::Summary => "Summary",
        }
    }

    /// Handler for this step
    pub fn handler(self) -> &'static dyn StepHandler {
        match self {
            Step::EnclosureType => &EnclosureStep,
            Step::Dimensions => &DimensionsStep,
            Step::InteriorFinish => &InteriorStep,
            Step::AddOns => &AddOnsStep,
            Step::Summary => &SummaryStep,
        }
    }
}

impl TryFrom<u8> for Step {
    type Error = StepError;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        Step::from_number(i64::from(value))
    }
}

impl From<Step> for u8 {
    fn from(step: Step) -> Self {
        step.number()
    }
}

impl fmt::Display for Step {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({})", self.number(), self.title())
    }
}

// ─── Actions ────────────────────────────────────────────────────────────────

/// Dimension input fields on step 2
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Axis {
    Length,
    Width,
    Height,
}

impl Axis {
    pub fn all() -> &'static [Axis] {
        &[Axis::Length, Axis::Width, Axis::Height]
    }

    pub fn label(&self) -> &'static str {
        match self {
            Axis::Length => "Length, m",
            Axis::Width => "Width, m",
            Axis::Height => "Height, m",
        }
    }
}

/// A user choice addressed to one step
#[derive(Debug, Clone, PartialEq)]
pub enum StepAction {
    SelectEnclosure {
        name: String,
        base_price: f64,
        french: bool,
    },
    EditDimension {
        axis: Axis,
        input: String,
    },
    SelectFinish {
        surface: Surface,
        material: String,
        coefficient: f64,
    },
    ToggleAddOn(AddOn),
}

impl StepAction {
    /// The step this action belongs to
    pub fn step(&self) -> Step {
        match self {
            StepAction::SelectEnclosure { .. } => Step::EnclosureType,
            StepAction::EditDimension { .. } => Step::Dimensions,
            StepAction::SelectFinish { .. } => Step::InteriorFinish,
            StepAction::ToggleAddOn(_) => Step::AddOns,
        }
    }
}

/// Result of applying an action
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Applied {
    /// Selection state changed and was persisted
    Changed,
    /// Accepted but the selection state is untouched (e.g. partial input)
    Unchanged,
    /// Not applicable right now
    Ignored,
}

/// Raw text of the three dimension inputs
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DimensionDraft {
    pub length: String,
    pub width: String,
    pub height: String,
}

impl DimensionDraft {
    /// Pre-fill from stored dimensions; empty when nothing was entered yet
    pub fn from_dimensions(dimensions: &Dimensions) -> Self {
        if !dimensions.is_complete() {
            return Self::default();
        }
        Self {
            length: dimensions.length.to_string(),
            width: dimensions.width.to_string(),
            height: dimensions.height.to_string(),
        }
    }

    pub fn get(&self, axis: Axis) -> &str {
        match axis {
            Axis::Length => &self.length,
            Axis::Width => &self.width,
            Axis::Height => &self.height,
        }
    }

    pub fn set(&mut self, axis: Axis, input: impl Into<String>) {
        let input = input.into();
        match axis {
            Axis::Length => self.length = input,
            Axis::Width => self.width = input,
            Axis::Height => self.height = input,
        }
    }

    /// All three values, if each is a finite number above zero and their
    /// surface area is finite. A decimal comma is accepted.
    pub fn parse(&self) -> Option<(f64, f64, f64)> {
        let read = |s: &str| -> Option<f64> {
            let v: f64 = s.trim().replace(',', ".").parse().ok()?;
            (v.is_finite() && v > 0.0).then_some(v)
        };
        let (length, width, height) = (read(&self.length)?, read(&self.width)?, read(&self.height)?);
        surface_area(length, width, height)
            .is_finite()
            .then_some((length, width, height))
    }
}

/// Mutable view handed to step handlers
pub struct StepContext<'a> {
    pub state: &'a mut SelectionState,
    pub drafts: &'a mut DimensionDraft,
}

/// Per-step behavior
pub trait StepHandler: Sync {
    fn step(&self) -> Step;

    /// Runs once navigation commits to this step
    fn on_enter(&self, _ctx: &mut StepContext<'_>) {}

    /// Apply an action addressed to this step
    fn apply(&self, ctx: &mut StepContext<'_>, action: &StepAction) -> Applied;

    /// Forward gate, evaluated against post-mutation state
    fn gate(&self, state: &SelectionState, drafts: &DimensionDraft) -> Gate;
}

struct EnclosureStep;
struct DimensionsStep;
struct InteriorStep;
struct AddOnsStep;
struct SummaryStep;

impl StepHandler for EnclosureStep {
    fn step(&self) -> Step {
        Step::EnclosureType
    }

    fn apply(&self, ctx: &mut StepContext<'_>, action: &StepAction) -> Applied {
        match action {
            StepAction::SelectEnclosure {
                name,
                base_price,
                french,
            } => {
                ctx.state.select_enclosure(name.clone(), *base_price, *french);
                Applied::Changed
            }
            _ => Applied::Ignored,
        }
    }

    fn gate(&self, state: &SelectionState, _drafts: &DimensionDraft) -> Gate {
        validator::enclosure_gate(state)
    }
}

impl StepHandler for DimensionsStep {
    fn step(&self) -> Step {
        Step::Dimensions
    }

    fn on_enter(&self, ctx: &mut StepContext<'_>) {
        if ctx.drafts.parse().is_none() && ctx.state.dimensions().is_complete() {
            *ctx.drafts = DimensionDraft::from_dimensions(ctx.state.dimensions());
        }
    }

    fn apply(&self, ctx: &mut StepContext<'_>, action: &StepAction) -> Applied {
        let StepAction::EditDimension { axis, input } = action else {
            return Applied::Ignored;
        };
        ctx.drafts.set(*axis, input.clone());
        match ctx.drafts.parse() {
            Some((length, width, height)) if ctx.state.set_dimensions(length, width, height) => {
                Applied::Changed
            }
            _ => Applied::Unchanged,
        }
    }

    fn gate(&self, _state: &SelectionState, drafts: &DimensionDraft) -> Gate {
        validator::dimensions_gate(drafts)
    }
}

impl StepHandler for InteriorStep {
    fn step(&self) -> Step {
        Step::InteriorFinish
    }

    fn apply(&self, ctx: &mut StepContext<'_>, action: &StepAction) -> Applied {
        match action {
            StepAction::SelectFinish {
                surface,
                material,
                coefficient,
            } => {
                if ctx
                    .state
                    .select_finish(*surface, material.clone(), *coefficient)
                {
                    Applied::Changed
                } else {
                    Applied::Ignored
                }
            }
            _ => Applied::Ignored,
        }
    }

    fn gate(&self, state: &SelectionState, _drafts: &DimensionDraft) -> Gate {
        validator::interior_gate(state)
    }
}

impl StepHandler for AddOnsStep {
    fn step(&self) -> Step {
        Step::AddOns
    }

    fn apply(&self, ctx: &mut StepContext<'_>, action: &StepAction) -> Applied {
        match action {
            StepAction::ToggleAddOn(add_on) => {
                ctx.state.toggle_add_on(add_on.clone());
                Applied::Changed
            }
            _ => Applied::Ignored,
        }
    }

    fn gate(&self, _state: &SelectionState, _drafts: &DimensionDraft) -> Gate {
        Gate::Open
    }
}

impl StepHandler for SummaryStep {
    fn step(&self) -> Step {
        Step::Summary
    }

    fn on_enter(&self, ctx: &mut StepContext<'_>) {
        ctx.state.refresh_total();
    }

    fn apply(&self, _ctx: &mut StepContext<'_>, _action: &StepAction) -> Applied {
        Applied::Ignored
    }

    fn gate(&self, _state: &SelectionState, _drafts: &DimensionDraft) -> Gate {
        Gate::Terminal
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_step_numbers_round_trip() {
        for step in Step::all() {
            assert_eq!(Step::from_number(i64::from(step.number())), Ok(*step));
            assert_eq!(step.handler().step(), *step);
        }
        assert_eq!(Step::from_number(0), Err(StepError::OutOfRange(0)));
        assert_eq!(Step::from_number(6), Err(StepError::OutOfRange(6)));
    }

    #[test]
    fn test_action_routing() {
        let action = StepAction::ToggleAddOn(AddOn::new("x", 1.0));
        assert_eq!(action.step(), Step::AddOns);

        let mut state = SelectionState::default();
        let mut drafts = DimensionDraft::default();
        let mut ctx = StepContext {
            state: &mut state,
            drafts: &mut drafts,
        };
        // Handler for a different step refuses the action
        assert_eq!(
            Step::EnclosureType.handler().apply(&mut ctx, &action),
            Applied::Ignored
        );
    }

    #[test]
    fn test_dimension_edit_updates_state_only_when_complete() {
        let mut state = SelectionState::default();
        let mut drafts = DimensionDraft::default();
        let handler = Step::Dimensions.handler();

        for (axis, input, expected) in [
            (Axis::Length, "2", Applied::Unchanged),
            (Axis::Width, "2", Applied::Unchanged),
            (Axis::Height, "2", Applied::Changed),
            (Axis::Height, "", Applied::Unchanged),
        ] {
            let mut ctx = StepContext {
                state: &mut state,
                drafts: &mut drafts,
            };
            let action = StepAction::EditDimension {
                axis,
                input: input.to_string(),
            };
            assert_eq!(handler.apply(&mut ctx, &action), expected);
        }
        // Clearing an input closes the gate but keeps the last valid dimensions
        assert_eq!(state.dimensions().surface_area, 24.0);
        assert_eq!(handler.gate(&state, &drafts), Gate::Closed);
    }

    #[test]
    fn test_oversized_dimensions_keep_previous_state() {
        let mut state = SelectionState::default();
        state.set_dimensions(3.0, 1.5, 2.5);
        let mut drafts = DimensionDraft::from_dimensions(state.dimensions());
        let handler = Step::Dimensions.handler();

        for axis in Axis::all() {
            let mut ctx = StepContext {
                state: &mut state,
                drafts: &mut drafts,
            };
            let action = StepAction::EditDimension {
                axis: *axis,
                input: "1e308".to_string(),
            };
            assert_eq!(handler.apply(&mut ctx, &action), Applied::Unchanged);
        }
        assert_eq!(state.dimensions().length, 3.0);
        assert!(state.dimensions().surface_area.is_finite());
        assert_eq!(drafts.parse(), None);
        assert_eq!(handler.gate(&state, &drafts), Gate::Closed);
    }

    #[test]
    fn test_draft_accepts_decimal_comma() {
        let drafts = DimensionDraft {
            length: "2,5".to_string(),
            width: " 1 ".to_string(),
            height: "3".to_string(),
        };
        assert_eq!(drafts.parse(), Some((2.5, 1.0, 3.0)));
    }

    #[test]
    fn test_summary_entry_refreshes_total() {
        let mut state = SelectionState::default();
        state.select_enclosure("A", 100.0, false);
        state.set_dimensions(1.0, 1.0, 1.0);
        let mut drafts = DimensionDraft::default();
        let mut ctx = StepContext {
            state: &mut state,
            drafts: &mut drafts,
        };
        Step::Summary.handler().on_enter(&mut ctx);
        assert_eq!(state.total(), 600);
    }

    #[test]
    fn test_step_display() {
        assert_eq!(Step::InteriorFinish.to_string(), "3 (Interior finish)");
    }
}
