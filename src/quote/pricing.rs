//! Pricing engine
//!
//! `total = round((base_price + Σ coefficients) × surface_area + Σ add-on prices)`

use super::selection::SelectionState;

/// Surface area of a box with the given edges, rounded to one decimal place
pub fn surface_area(length: f64, width: f64, height: f64) -> f64 {
    let raw = 2.0 * (length * width + length * height + height * width);
    (raw * 10.0).round() / 10.0
}

/// Sum of add-on prices. Non-finite prices count as zero; this is a
/// tolerance for degraded stored data, not a validated invariant.
pub fn add_on_sum(state: &SelectionState) -> f64 {
    state
        .add_ons()
        .iter()
        .map(|a| if a.price.is_finite() { a.price } else { 0.0 })
        .sum()
}

/// Individual terms of a quote, for summaries and the CLI
#[derive(Debug, Clone, PartialEq)]
pub struct PriceBreakdown {
    pub base_price: f64,
    pub interior: f64,
    pub surface_area: f64,
    pub add_ons: f64,
    pub total: i64,
}

impl PriceBreakdown {
    pub fn of(state: &SelectionState) -> Self {
        let base_price = finite_or_zero(state.enclosure_type().base_price);
        let interior = state.interior_finish().coefficient_sum();
        let surface_area = finite_or_zero(state.dimensions().surface_area);
        let add_ons = add_on_sum(state);
        let total = ((base_price + interior) * surface_area + add_ons).round() as i64;
        Self {
            base_price,
            interior,
            surface_area,
            add_ons,
            total,
        }
    }
}

/// Compute the rounded total for the current selections
pub fn quote_total(state: &SelectionState) -> i64 {
    PriceBreakdown::of(state).total
}

/// Format an amount with space-separated thousands and a currency symbol
pub fn format_money(amount: i64, currency: &str) -> String {
    let digits = amount.unsigned_abs().to_string();
    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            grouped.push(' ');
        }
        grouped.push(ch);
    }
    let sign = if amount < 0 { "-" } else { "" };
    if currency.is_empty() {
        format!("{}{}", sign, grouped)
    } else {
        format!("{}{} {}", sign, grouped, currency)
    }
}

fn finite_or_zero(value: f64) -> f64 {
    if value.is_finite() {
        value
    } else {
        0.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::quote::selection::{AddOn, Surface};

    #[test]
    fn test_surface_area_cube() {
        assert_eq!(surface_area(2.0, 2.0, 2.0), 24.0);
    }

    #[test]
    fn test_surface_area_rounds_to_one_decimal() {
        // 2 * (1.11*1.0 + 1.11*1.0 + 1.0*1.0) = 6.44
        assert_eq!(surface_area(1.11, 1.0, 1.0), 6.4);
        for (l, w, h) in [(3.0, 1.2, 2.5), (0.7, 0.3, 1.9), (5.5, 1.05, 2.7)] {
            let expected = (2.0 * (l * w + l * h + h * w) * 10.0_f64).round() / 10.0;
            assert_eq!(surface_area(l, w, h), expected);
        }
    }

    #[test]
    fn test_reference_quote() {
        let mut state = SelectionState::default();
        state.select_enclosure("A", 1000.0, false);
        state.set_dimensions(2.0, 2.0, 2.0);
        state.select_finish(Surface::Walls, "w", 50.0);
        state.select_finish(Surface::Floor, "f", 30.0);
        state.select_finish(Surface::Ceiling, "c", 20.0);
        state.toggle_add_on(AddOn::new("extra", 500.0));

        assert_eq!(quote_total(&state), 26900);
    }

    #[test]
    fn test_unset_coefficients_count_as_zero() {
        let mut state = SelectionState::default();
        state.select_enclosure("A", 100.0, false);
        state.set_dimensions(1.0, 1.0, 1.0);
        state.select_finish(Surface::Floor, "f", 10.0);

        // (100 + 10) * 6 = 660
        assert_eq!(quote_total(&state), 660);
    }

    #[test]
    fn test_nan_add_on_contributes_nothing() {
        let mut state = SelectionState::default();
        state.select_enclosure("A", 100.0, false);
        state.set_dimensions(1.0, 1.0, 1.0);
        state.toggle_add_on(AddOn::new("broken", f64::NAN));
        state.toggle_add_on(AddOn::new("fine", 40.0));

        assert_eq!(quote_total(&state), 640);
    }

    #[test]
    fn test_total_rounds_to_nearest_integer() {
        let mut state = SelectionState::default();
        state.select_enclosure("A", 10.25, false);
        state.set_dimensions(1.0, 1.0, 1.0);
        // 10.25 * 6 = 61.5 -> 62
        assert_eq!(quote_total(&state), 62);
    }

    #[test]
    fn test_empty_state_quotes_zero() {
        assert_eq!(quote_total(&SelectionState::default()), 0);
    }

    #[test]
    fn test_format_money() {
        assert_eq!(format_money(26900, "₽"), "26 900 ₽");
        assert_eq!(format_money(999, "₽"), "999 ₽");
        assert_eq!(format_money(1_234_567, ""), "1 234 567");
        assert_eq!(format_money(0, "$"), "0 $");
    }
}
