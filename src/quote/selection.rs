//! The accumulated selections of one wizard session.
//!
//! `SelectionState` is a plain value: the wizard owns the only live instance
//! and hands out `&SelectionState` snapshots. All changes go through the
//! mutation methods below so the cached surface area can never go stale.

use serde::{Deserialize, Deserializer, Serialize};

use super::pricing;
use crate::wizard::Step;

/// The enclosure type picked in step 1
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EnclosureType {
    /// Display name, `None` until a type is chosen
    pub name: Option<String>,
    /// Price per square meter of surface
    pub base_price: f64,
    /// French-style glazing hides the walls finish category
    pub is_french_style: bool,
}

impl Default for EnclosureType {
    fn default() -> Self {
        Self {
            name: None,
            base_price: 0.0,
            is_french_style: false,
        }
    }
}

/// Enclosure dimensions in meters plus the derived surface area
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Dimensions {
    pub length: f64,
    pub width: f64,
    pub height: f64,
    /// Cached `2(lw + lh + hw)`, rounded to one decimal place
    pub surface_area: f64,
}

impl Dimensions {
    /// Size string used in summaries and lead payloads
    pub fn display(&self) -> String {
        format!(
            "{} x {} x {}",
            trim_float(self.length),
            trim_float(self.width),
            trim_float(self.height)
        )
    }

    /// Whether all three edges have been entered
    pub fn is_complete(&self) -> bool {
        self.length > 0.0 && self.width > 0.0 && self.height > 0.0
    }
}

/// Interior surfaces that take a finish material
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Surface {
    Walls,
    Ceiling,
    Floor,
}

impl Surface {
    pub fn all() -> &'static [Surface] {
        &[Surface::Walls, Surface::Ceiling, Surface::Floor]
    }

    pub fn label(&self) -> &'static str {
        match self {
            Surface::Walls => "Walls",
            Surface::Ceiling => "Ceiling",
            Surface::Floor => "Floor",
        }
    }
}

/// One interior finish slot; a `None` coefficient means "not yet selected"
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FinishSlot {
    pub price_coefficient: Option<f64>,
    pub material_name: Option<String>,
}

impl FinishSlot {
    pub fn is_set(&self) -> bool {
        self.price_coefficient.is_some()
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InteriorFinish {
    pub walls: FinishSlot,
    pub ceiling: FinishSlot,
    pub floor: FinishSlot,
}

impl InteriorFinish {
    pub fn slot(&self, surface: Surface) -> &FinishSlot {
        match surface {
            Surface::Walls => &self.walls,
            Surface::Ceiling => &self.ceiling,
            Surface::Floor => &self.floor,
        }
    }

    fn slot_mut(&mut self, surface: Surface) -> &mut FinishSlot {
        match surface {
            Surface::Walls => &mut self.walls,
            Surface::Ceiling => &mut self.ceiling,
            Surface::Floor => &mut self.floor,
        }
    }

    /// Sum of the selected coefficients, unset slots count as zero
    pub fn coefficient_sum(&self) -> f64 {
        Surface::all()
            .iter()
            .filter_map(|s| self.slot(*s).price_coefficient)
            .sum()
    }
}

/// An optional extra priced as a flat amount
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AddOn {
    /// Flat price; stored snapshots may carry garbage here, which reads as NaN
    #[serde(deserialize_with = "lenient_price")]
    pub price: f64,
    pub name: String,
}

impl AddOn {
    pub fn new(name: impl Into<String>, price: f64) -> Self {
        Self {
            price,
            name: name.into(),
        }
    }

    /// Identity is the (price, name) pair
    fn same_as(&self, other: &AddOn) -> bool {
        self.price.total_cmp(&other.price).is_eq() && self.name == other.name
    }
}

impl PartialEq for AddOn {
    fn eq(&self, other: &Self) -> bool {
        self.same_as(other)
    }
}

/// Accept anything JSON can hold for a price. Non-numbers become NaN and the
/// pricing engine counts them as zero.
fn lenient_price<'de, D>(deserializer: D) -> Result<f64, D::Error>
where
    D: Deserializer<'de>,
{
    let value = serde_json::Value::deserialize(deserializer)?;
    Ok(match value {
        serde_json::Value::Number(n) => n.as_f64().unwrap_or(f64::NAN),
        serde_json::Value::String(s) => s.trim().parse().unwrap_or(f64::NAN),
        _ => f64::NAN,
    })
}

/// Everything the user has chosen so far
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SelectionState {
    step: Step,
    enclosure_type: EnclosureType,
    dimensions: Dimensions,
    interior_finish: InteriorFinish,
    #[serde(default)]
    add_ons: Vec<AddOn>,
    #[serde(default)]
    total: i64,
}

impl Default for SelectionState {
    fn default() -> Self {
        Self {
            step: Step::EnclosureType,
            enclosure_type: EnclosureType::default(),
            dimensions: Dimensions::default(),
            interior_finish: InteriorFinish::default(),
            add_ons: Vec::new(),
            total: 0,
        }
    }
}

impl SelectionState {
    pub fn step(&self) -> Step {
        self.step
    }

    pub fn enclosure_type(&self) -> &EnclosureType {
        &self.enclosure_type
    }

    pub fn dimensions(&self) -> &Dimensions {
        &self.dimensions
    }

    pub fn interior_finish(&self) -> &InteriorFinish {
        &self.interior_finish
    }

    pub fn add_ons(&self) -> &[AddOn] {
        &self.add_ons
    }

    /// Stored total; meaningful once step 5 has been entered
    pub fn total(&self) -> i64 {
        self.total
    }

    pub fn is_french_style(&self) -> bool {
        self.enclosure_type.is_french_style
    }

    pub fn has_add_on(&self, add_on: &AddOn) -> bool {
        self.add_ons.iter().any(|a| a.same_as(add_on))
    }

    // ─── Mutations ──────────────────────────────────────────────────────────

    pub(crate) fn set_step(&mut self, step: Step) {
        self.step = step;
    }

    /// Choose the enclosure type. Replaces any earlier choice; a French-style
    /// type drops the walls finish since that category no longer exists.
    pub fn select_enclosure(&mut self, name: impl Into<String>, base_price: f64, french: bool) {
        self.enclosure_type = EnclosureType {
            name: Some(name.into()),
            base_price,
            is_french_style: french,
        };
        if french {
            self.interior_finish.walls = FinishSlot::default();
        }
    }

    /// Store new dimensions and recompute the surface area.
    ///
    /// Returns false (and changes nothing) unless all edges are finite and
    /// strictly positive and the resulting area is finite too.
    pub fn set_dimensions(&mut self, length: f64, width: f64, height: f64) -> bool {
        let valid = [length, width, height]
            .iter()
            .all(|v| v.is_finite() && *v > 0.0);
        if !valid {
            return false;
        }
        let surface_area = pricing::surface_area(length, width, height);
        if !surface_area.is_finite() {
            return false;
        }
        self.dimensions = Dimensions {
            length,
            width,
            height,
            surface_area,
        };
        true
    }

    /// Choose a material for one surface, replacing the sibling choice.
    ///
    /// Walls cannot be finished on a French-style enclosure; returns false.
    pub fn select_finish(
        &mut self,
        surface: Surface,
        material: impl Into<String>,
        coefficient: f64,
    ) -> bool {
        if surface == Surface::Walls && self.is_french_style() {
            return false;
        }
        *self.interior_finish.slot_mut(surface) = FinishSlot {
            price_coefficient: Some(coefficient),
            material_name: Some(material.into()),
        };
        true
    }

    /// Add the extra if absent, remove it if present. Returns whether it is
    /// selected afterwards.
    pub fn toggle_add_on(&mut self, add_on: AddOn) -> bool {
        if let Some(pos) = self.add_ons.iter().position(|a| a.same_as(&add_on)) {
            self.add_ons.remove(pos);
            false
        } else {
            self.add_ons.push(add_on);
            true
        }
    }

    /// Recompute the stored total from the current selections
    pub fn refresh_total(&mut self) -> i64 {
        self.total = pricing::quote_total(self);
        self.total
    }

    /// Forget every selection and return to step 1
    pub fn reset(&mut self) {
        *self = Self::default();
    }
}

/// Render a float without a trailing `.0` for whole numbers
pub(crate) fn trim_float(value: f64) -> String {
    if value.fract() == 0.0 && value.abs() < 1e15 {
        format!("{}", value as i64)
    } else {
        format!("{}", value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_state_is_empty() {
        let state = SelectionState::default();
        assert_eq!(state.step(), Step::EnclosureType);
        assert!(state.enclosure_type().name.is_none());
        assert!(!state.interior_finish().walls.is_set());
        assert!(state.add_ons().is_empty());
        assert_eq!(state.total(), 0);
    }

    #[test]
    fn test_set_dimensions_caches_surface_area() {
        let mut state = SelectionState::default();
        assert!(state.set_dimensions(2.0, 2.0, 2.0));
        assert_eq!(state.dimensions().surface_area, 24.0);

        assert!(state.set_dimensions(3.0, 1.2, 2.5));
        // 2 * (3.6 + 7.5 + 3.0) = 28.2
        assert_eq!(state.dimensions().surface_area, 28.2);
    }

    #[test]
    fn test_set_dimensions_rejects_non_positive() {
        let mut state = SelectionState::default();
        assert!(state.set_dimensions(2.0, 2.0, 2.0));
        assert!(!state.set_dimensions(0.0, 2.0, 2.0));
        assert!(!state.set_dimensions(2.0, -1.0, 2.0));
        assert!(!state.set_dimensions(2.0, 2.0, f64::NAN));
        // Previous dimensions survive a rejected update
        assert_eq!(state.dimensions().length, 2.0);
        assert_eq!(state.dimensions().surface_area, 24.0);
    }

    #[test]
    fn test_set_dimensions_rejects_overflowing_area() {
        let mut state = SelectionState::default();
        assert!(state.set_dimensions(3.0, 1.5, 2.5));
        assert!(!state.set_dimensions(1e200, 1e200, 1e200));
        assert_eq!(state.dimensions().length, 3.0);
        assert!(state.dimensions().surface_area.is_finite());

        // Snapshot stays loadable after the rejected update
        let json = serde_json::to_string(&state).unwrap();
        let restored: SelectionState = serde_json::from_str(&json).unwrap();
        assert_eq!(restored, state);
    }

    #[test]
    fn test_second_finish_replaces_first() {
        let mut state = SelectionState::default();
        state.select_finish(Surface::Floor, "Laminate", 30.0);
        state.select_finish(Surface::Floor, "Tiles", 45.0);

        let floor = &state.interior_finish().floor;
        assert_eq!(floor.price_coefficient, Some(45.0));
        assert_eq!(floor.material_name.as_deref(), Some("Tiles"));
    }

    #[test]
    fn test_french_style_clears_and_blocks_walls() {
        let mut state = SelectionState::default();
        state.select_finish(Surface::Walls, "PVC panels", 50.0);
        state.select_enclosure("French glazing", 1200.0, true);

        assert!(!state.interior_finish().walls.is_set());
        assert!(!state.select_finish(Surface::Walls, "PVC panels", 50.0));
        assert!(state.select_finish(Surface::Ceiling, "Stretch ceiling", 20.0));
    }

    #[test]
    fn test_second_enclosure_replaces_first() {
        let mut state = SelectionState::default();
        state.select_enclosure("Warm glazing", 1000.0, false);
        state.select_enclosure("Cold glazing", 700.0, false);
        assert_eq!(
            state.enclosure_type().name.as_deref(),
            Some("Cold glazing")
        );
        assert_eq!(state.enclosure_type().base_price, 700.0);
    }

    #[test]
    fn test_toggle_add_on_twice_restores_set() {
        let mut state = SelectionState::default();
        state.toggle_add_on(AddOn::new("Insulation", 500.0));
        let before = state.add_ons().to_vec();

        assert!(state.toggle_add_on(AddOn::new("Wiring", 300.0)));
        assert!(!state.toggle_add_on(AddOn::new("Wiring", 300.0)));
        assert_eq!(state.add_ons(), before.as_slice());
    }

    #[test]
    fn test_add_on_identity_is_price_and_name() {
        let mut state = SelectionState::default();
        state.toggle_add_on(AddOn::new("Shelf", 100.0));
        state.toggle_add_on(AddOn::new("Shelf", 150.0));
        assert_eq!(state.add_ons().len(), 2);
    }

    #[test]
    fn test_lenient_add_on_price() {
        let add_ons: Vec<AddOn> = serde_json::from_str(
            r#"[{"price": null, "name": "a"}, {"price": "250", "name": "b"}, {"price": "x", "name": "c"}]"#,
        )
        .unwrap();
        assert!(add_ons[0].price.is_nan());
        assert_eq!(add_ons[1].price, 250.0);
        assert!(add_ons[2].price.is_nan());
    }

    #[test]
    fn test_serialized_keys_are_camel_case() {
        let mut state = SelectionState::default();
        state.select_enclosure("Warm glazing", 1000.0, false);
        let json = serde_json::to_string(&state).unwrap();
        assert!(json.contains("\"step\":1"));
        assert!(json.contains("\"enclosureType\""));
        assert!(json.contains("\"isFrenchStyle\":false"));
        assert!(json.contains("\"surfaceArea\""));
        assert!(json.contains("\"priceCoefficient\""));
        assert!(json.contains("\"addOns\""));
    }

    #[test]
    fn test_out_of_range_step_does_not_deserialize() {
        let json = serde_json::to_string(&SelectionState::default())
            .unwrap()
            .replace("\"step\":1", "\"step\":9");
        assert!(serde_json::from_str::<SelectionState>(&json).is_err());
    }

    #[test]
    fn test_dimensions_display() {
        let mut state = SelectionState::default();
        state.set_dimensions(3.0, 1.5, 2.6);
        assert_eq!(state.dimensions().display(), "3 x 1.5 x 2.6");
    }
}
