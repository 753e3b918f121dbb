//! Navigation controller for the five-step quote wizard
//!
//! [`Wizard`] owns the only live [`SelectionState`]. Every change flows
//! through it in a fixed order: the step handler mutates, the snapshot is
//! persisted, and the forward gate is read back from post-mutation state.
//!
//! Step switches are not immediate. In animated mode `go_to_step` schedules
//! the switch on a single-slot [`Scheduler`]; a newer request supersedes the
//! pending one, and the event loop calls [`Wizard::tick`] to commit it. Quick
//! mode skips the delay and commits synchronously.

pub mod schedule;
pub mod step;
pub mod template;
pub mod validator;

use std::time::{Duration, Instant};

use tracing::{debug, error, info, warn};

pub use schedule::{Scheduler, Token};
pub use step::{Applied, Axis, DimensionDraft, Step, StepAction, StepContext, StepError};
pub use template::{CatalogTemplates, FinishGroup, StepView, TemplateError, TemplateProvider};
pub use validator::Gate;

use crate::quote::SelectionState;
use crate::session::SessionStore;

/// What the scheduler slot may hold
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Scheduled {
    Switch(Step),
    Reset,
}

/// Result of a navigation request
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NavOutcome {
    /// Out of range, or a reset is pending
    Ignored,
    /// The forward gate of the current step is closed
    Blocked,
    /// Switch pending until the transition elapses
    Scheduled(Step),
    Committed(Step),
    /// No view could be built; nothing changed
    TemplateMissing(Step),
}

pub struct Wizard {
    state: SelectionState,
    drafts: DimensionDraft,
    view: Option<StepView>,
    store: Box<dyn SessionStore>,
    templates: Box<dyn TemplateProvider>,
    scheduler: Scheduler<Scheduled>,
    transition_delay: Duration,
    quick_mode: bool,
}

impl Wizard {
    /// Start a wizard from the persisted snapshot, or from scratch when there
    /// is none. Unreadable snapshots are logged and ignored.
    pub fn restore(
        store: Box<dyn SessionStore>,
        templates: Box<dyn TemplateProvider>,
        transition_delay: Duration,
    ) -> Self {
        let state = match store.load() {
            Ok(Some(state)) => {
                info!(step = state.step().number(), "Restored session snapshot");
                state
            }
            Ok(None) => SelectionState::default(),
            Err(e) => {
                warn!(error = %e, "Ignoring unreadable session snapshot");
                SelectionState::default()
            }
        };

        let drafts = DimensionDraft::from_dimensions(state.dimensions());
        let mut wizard = Self {
            state,
            drafts,
            view: None,
            store,
            templates,
            scheduler: Scheduler::new(),
            transition_delay,
            quick_mode: false,
        };

        let step = wizard.state.step();
        match wizard.templates.render(step, &wizard.state) {
            Ok(view) => {
                wizard.view = Some(view);
                wizard.enter(step);
            }
            Err(e) => error!(step = step.number(), error = %e, "Step render aborted"),
        }
        wizard
    }

    // ─── Read-only access ───────────────────────────────────────────────────

    pub fn state(&self) -> &SelectionState {
        &self.state
    }

    pub fn step(&self) -> Step {
        self.state.step()
    }

    /// View of the committed step; `None` only if its template was missing
    /// at startup
    pub fn view(&self) -> Option<&StepView> {
        self.view.as_ref()
    }

    pub fn drafts(&self) -> &DimensionDraft {
        &self.drafts
    }

    /// Forward gate of the committed step, from post-mutation state
    pub fn gate(&self) -> Gate {
        self.step().handler().gate(&self.state, &self.drafts)
    }

    /// True while a step switch or a reset is pending
    pub fn is_transitioning(&self) -> bool {
        self.scheduler.is_pending()
    }

    pub fn pending_target(&self) -> Option<Step> {
        match self.scheduler.pending() {
            Some(Scheduled::Switch(step)) => Some(*step),
            _ => None,
        }
    }

    pub fn is_reset_pending(&self) -> bool {
        matches!(self.scheduler.pending(), Some(Scheduled::Reset))
    }

    /// Share of the transition already elapsed, 0.0..=1.0
    pub fn transition_progress(&self, now: Instant) -> Option<f64> {
        if self.pending_target().is_none() {
            return None;
        }
        let remaining = self.scheduler.remaining(now)?;
        let total = self.transition_delay.as_secs_f64();
        if total <= 0.0 {
            return Some(1.0);
        }
        Some((1.0 - remaining.as_secs_f64() / total).clamp(0.0, 1.0))
    }

    pub fn quick_mode(&self) -> bool {
        self.quick_mode
    }

    /// In quick mode step switches land at once instead of after the
    /// transition delay. Turning it on also lands a switch that is already
    /// pending. The TUI holds it on while the quick form is open.
    pub fn set_quick_mode(&mut self, quick: bool) {
        self.quick_mode = quick;
        if let Some(step) = self.pending_target().filter(|_| quick) {
            self.scheduler.cancel();
            self.commit(step);
        }
    }

    // ─── Navigation ─────────────────────────────────────────────────────────

    pub fn go_to_step(&mut self, target: i64) -> NavOutcome {
        self.go_to_step_at(target, Instant::now())
    }

    /// Request a switch to `target`. Values outside 1..=5 are ignored.
    pub fn go_to_step_at(&mut self, target: i64, now: Instant) -> NavOutcome {
        let step = match Step::from_number(target) {
            Ok(step) => step,
            Err(e) => {
                debug!(target, error = %e, "Ignoring navigation request");
                return NavOutcome::Ignored;
            }
        };
        if self.is_reset_pending() {
            return NavOutcome::Ignored;
        }

        if self.quick_mode || self.transition_delay.is_zero() {
            self.scheduler.cancel();
            return self.commit(step);
        }

        let superseded = self.pending_target();
        self.scheduler
            .schedule(Scheduled::Switch(step), self.transition_delay, now);
        debug!(
            target = step.number(),
            superseded = superseded.map(|s| s.number()),
            "Scheduled step transition"
        );
        NavOutcome::Scheduled(step)
    }

    pub fn forward(&mut self) -> NavOutcome {
        self.forward_at(Instant::now())
    }

    /// Move one step on from the committed step, if its gate is open
    pub fn forward_at(&mut self, now: Instant) -> NavOutcome {
        if !self.gate().allows_forward() {
            return NavOutcome::Blocked;
        }
        self.go_to_step_at(i64::from(self.step().number()) + 1, now)
    }

    pub fn back(&mut self) -> NavOutcome {
        self.back_at(Instant::now())
    }

    /// Move one step back from the committed step; never gated
    pub fn back_at(&mut self, now: Instant) -> NavOutcome {
        self.go_to_step_at(i64::from(self.step().number()) - 1, now)
    }

    /// Commit whatever is due. Call on every event loop iteration.
    pub fn tick(&mut self, now: Instant) -> Option<NavOutcome> {
        match self.scheduler.take_due(now)? {
            Scheduled::Switch(step) => Some(self.commit(step)),
            Scheduled::Reset => {
                self.reset();
                Some(NavOutcome::Committed(Step::FIRST))
            }
        }
    }

    fn commit(&mut self, step: Step) -> NavOutcome {
        let view = match self.templates.render(step, &self.state) {
            Ok(view) => view,
            Err(e) => {
                error!(step = step.number(), error = %e, "Step render aborted");
                return NavOutcome::TemplateMissing(step);
            }
        };
        let from = self.state.step();
        self.state.set_step(step);
        self.view = Some(view);
        self.enter(step);
        self.persist();
        info!(from = from.number(), to = step.number(), "Step committed");
        NavOutcome::Committed(step)
    }

    fn enter(&mut self, step: Step) {
        let mut ctx = StepContext {
            state: &mut self.state,
            drafts: &mut self.drafts,
        };
        step.handler().on_enter(&mut ctx);
    }

    // ─── Mutation ───────────────────────────────────────────────────────────

    /// Route an action to the committed step's handler. Actions for another
    /// step, or any action during a transition, are ignored.
    pub fn apply(&mut self, action: StepAction) -> Applied {
        if self.is_transitioning() {
            debug!(?action, "Ignoring action during transition");
            return Applied::Ignored;
        }
        let step = self.step();
        if action.step() != step {
            debug!(?action, step = step.number(), "Ignoring action for inactive step");
            return Applied::Ignored;
        }

        let mut ctx = StepContext {
            state: &mut self.state,
            drafts: &mut self.drafts,
        };
        let applied = step.handler().apply(&mut ctx, &action);
        if applied == Applied::Changed {
            self.persist();
        }
        applied
    }

    /// Discard all selections, erase the snapshot and show step 1
    pub fn reset(&mut self) {
        self.scheduler.cancel();
        self.state.reset();
        self.drafts = DimensionDraft::default();
        if let Err(e) = self.store.clear() {
            warn!(error = %e, "Failed to erase session snapshot");
        }
        match self.templates.render(Step::FIRST, &self.state) {
            Ok(view) => self.view = Some(view),
            Err(e) => {
                self.view = None;
                error!(step = Step::FIRST.number(), error = %e, "Step render aborted");
            }
        }
        info!("Wizard reset");
    }

    /// Reset after `delay`, e.g. once a success overlay is dismissed. Any
    /// pending step switch is superseded. Quick mode does not shorten it.
    pub fn schedule_reset(&mut self, delay: Duration, now: Instant) {
        self.scheduler.schedule(Scheduled::Reset, delay, now);
    }

    fn persist(&self) {
        if let Err(e) = self.store.save(&self.state) {
            warn!(error = %e, "Failed to persist session snapshot");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::quote::{AddOn, Catalog, Surface};
    use crate::session::MemorySessionStore;

    const DELAY: Duration = Duration::from_millis(300);

    fn wizard(store: &MemorySessionStore) -> Wizard {
        Wizard::restore(
            Box::new(store.clone()),
            Box::new(CatalogTemplates::new(Catalog::default(), "₽")),
            DELAY,
        )
    }

    fn pick_enclosure(wizard: &mut Wizard, french: bool) {
        let applied = wizard.apply(StepAction::SelectEnclosure {
            name: "Warm glazing".to_string(),
            base_price: 1000.0,
            french,
        });
        assert_eq!(applied, Applied::Changed);
    }

    #[test]
    fn test_fresh_wizard_starts_at_step_one() {
        let store = MemorySessionStore::new();
        let wizard = wizard(&store);
        assert_eq!(wizard.step(), Step::EnclosureType);
        assert_eq!(wizard.gate(), Gate::Closed);
        assert!(matches!(wizard.view(), Some(StepView::EnclosureTypes(_))));
        assert!(store.is_empty());
    }

    #[test]
    fn test_out_of_range_navigation_is_ignored() {
        let store = MemorySessionStore::new();
        let mut wizard = wizard(&store);
        let now = Instant::now();
        for target in [0, -1, 6, 100] {
            assert_eq!(wizard.go_to_step_at(target, now), NavOutcome::Ignored);
        }
        assert!(!wizard.is_transitioning());
        assert_eq!(wizard.back_at(now), NavOutcome::Ignored);
        assert_eq!(wizard.step(), Step::EnclosureType);
    }

    #[test]
    fn test_forward_is_gated() {
        let store = MemorySessionStore::new();
        let mut wizard = wizard(&store);
        let now = Instant::now();
        assert_eq!(wizard.forward_at(now), NavOutcome::Blocked);

        pick_enclosure(&mut wizard, false);
        assert_eq!(wizard.gate(), Gate::Open);
        assert_eq!(
            wizard.forward_at(now),
            NavOutcome::Scheduled(Step::Dimensions)
        );
    }

    #[test]
    fn test_transition_commits_on_tick() {
        let store = MemorySessionStore::new();
        let mut wizard = wizard(&store);
        let start = Instant::now();
        pick_enclosure(&mut wizard, false);
        wizard.forward_at(start);

        assert_eq!(wizard.tick(start + Duration::from_millis(100)), None);
        assert_eq!(wizard.step(), Step::EnclosureType);
        assert_eq!(wizard.pending_target(), Some(Step::Dimensions));

        assert_eq!(
            wizard.tick(start + DELAY),
            Some(NavOutcome::Committed(Step::Dimensions))
        );
        assert_eq!(wizard.step(), Step::Dimensions);
        assert!(!wizard.is_transitioning());
        assert_eq!(wizard.state(), &store_state(&store));
    }

    fn store_state(store: &MemorySessionStore) -> SelectionState {
        store.load().unwrap().unwrap()
    }

    #[test]
    fn test_actions_ignored_while_transitioning() {
        let store = MemorySessionStore::new();
        let mut wizard = wizard(&store);
        let start = Instant::now();
        pick_enclosure(&mut wizard, false);
        wizard.forward_at(start);

        let applied = wizard.apply(StepAction::SelectEnclosure {
            name: "Cold glazing".to_string(),
            base_price: 700.0,
            french: false,
        });
        assert_eq!(applied, Applied::Ignored);
        assert_eq!(
            wizard.state().enclosure_type().name.as_deref(),
            Some("Warm glazing")
        );
    }

    #[test]
    fn test_action_for_other_step_is_ignored() {
        let store = MemorySessionStore::new();
        let mut wizard = wizard(&store);
        let applied = wizard.apply(StepAction::ToggleAddOn(AddOn::new("Insulation", 10.0)));
        assert_eq!(applied, Applied::Ignored);
        assert!(wizard.state().add_ons().is_empty());
        assert!(store.is_empty());
    }

    #[test]
    fn test_quick_mode_commits_synchronously() {
        let store = MemorySessionStore::new();
        let mut wizard = wizard(&store);
        let now = Instant::now();
        wizard.go_to_step_at(3, now);
        assert!(wizard.is_transitioning());

        wizard.set_quick_mode(true);
        assert_eq!(
            wizard.go_to_step_at(5, now),
            NavOutcome::Committed(Step::Summary)
        );
        assert!(!wizard.is_transitioning());
        // The superseded switch never fires
        assert_eq!(wizard.tick(now + DELAY * 2), None);
        assert_eq!(wizard.step(), Step::Summary);
    }

    #[test]
    fn test_french_style_interior_flow() {
        let store = MemorySessionStore::new();
        let mut wizard = wizard(&store);
        wizard.set_quick_mode(true);
        pick_enclosure(&mut wizard, true);
        wizard.go_to_step(3);

        let walls = wizard.apply(StepAction::SelectFinish {
            surface: Surface::Walls,
            material: "PVC panels".to_string(),
            coefficient: 900.0,
        });
        assert_eq!(walls, Applied::Ignored);

        for surface in [Surface::Ceiling, Surface::Floor] {
            wizard.apply(StepAction::SelectFinish {
                surface,
                material: "m".to_string(),
                coefficient: 10.0,
            });
        }
        assert_eq!(wizard.gate(), Gate::Open);
    }

    #[test]
    fn test_scheduled_reset() {
        let store = MemorySessionStore::new();
        let mut wizard = wizard(&store);
        let now = Instant::now();
        wizard.set_quick_mode(true);
        pick_enclosure(&mut wizard, false);
        wizard.go_to_step(5);
        wizard.set_quick_mode(false);

        wizard.schedule_reset(Duration::from_millis(500), now);
        assert!(wizard.is_reset_pending());
        assert_eq!(wizard.go_to_step_at(2, now), NavOutcome::Ignored);
        assert_eq!(wizard.tick(now + Duration::from_millis(499)), None);
        assert_eq!(wizard.step(), Step::Summary);

        assert_eq!(
            wizard.tick(now + Duration::from_millis(500)),
            Some(NavOutcome::Committed(Step::EnclosureType))
        );
        assert_eq!(wizard.state(), &SelectionState::default());
        assert!(store.is_empty());
    }

    #[test]
    fn test_quick_mode_lands_pending_switch() {
        let store = MemorySessionStore::new();
        let mut wizard = wizard(&store);
        pick_enclosure(&mut wizard, false);
        wizard.forward_at(Instant::now());
        assert_eq!(wizard.pending_target(), Some(Step::Dimensions));

        wizard.set_quick_mode(true);
        assert!(!wizard.is_transitioning());
        assert_eq!(wizard.step(), Step::Dimensions);
        assert_eq!(store_state(&store).step(), Step::Dimensions);
    }

    #[test]
    fn test_oversized_dimensions_never_reach_the_snapshot() {
        let store = MemorySessionStore::new();
        let mut session = wizard(&store);
        session.set_quick_mode(true);
        pick_enclosure(&mut session, false);
        session.go_to_step(2);
        for (axis, input) in [(Axis::Length, "3"), (Axis::Width, "1.5"), (Axis::Height, "2.5")] {
            session.apply(StepAction::EditDimension {
                axis,
                input: input.to_string(),
            });
        }
        for axis in Axis::all() {
            let applied = session.apply(StepAction::EditDimension {
                axis: *axis,
                input: "1e308".to_string(),
            });
            assert_eq!(applied, Applied::Unchanged);
        }
        assert_eq!(session.gate(), Gate::Closed);

        let restored = wizard(&store);
        assert_eq!(restored.step(), Step::Dimensions);
        assert_eq!(restored.state().dimensions().length, 3.0);
        assert_eq!(restored.state().dimensions().surface_area, 31.5);
    }

    #[test]
    fn test_corrupt_snapshot_starts_fresh() {
        let store = MemorySessionStore::with_raw("{\"step\": 9}");
        let wizard = wizard(&store);
        assert_eq!(wizard.state(), &SelectionState::default());
    }

    #[test]
    fn test_transition_progress() {
        let store = MemorySessionStore::new();
        let mut wizard = wizard(&store);
        let start = Instant::now();
        assert_eq!(wizard.transition_progress(start), None);
        wizard.go_to_step_at(2, start);
        let half = wizard
            .transition_progress(start + Duration::from_millis(150))
            .unwrap();
        assert!((half - 0.5).abs() < 1e-9);
    }
}
