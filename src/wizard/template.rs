//! Step views and the provider that builds them
//!
//! A view holds the options a step offers; it is rendered once per committed
//! navigation. Highlighting of the current choice is read from the live
//! selection state by the UI, not baked into the view.

use thiserror::Error;

use super::step::Step;
use crate::quote::{
    AddOnOption, Catalog, EnclosureOption, MaterialOption, SelectionState, Surface, SummaryFields,
};

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TemplateError {
    #[error("no template available for step {0}")]
    Missing(Step),
}

/// One interior surface and its materials
#[derive(Debug, Clone, PartialEq)]
pub struct FinishGroup {
    pub surface: Surface,
    pub options: Vec<MaterialOption>,
    /// Walls on a French-style enclosure: shown disabled, not selectable
    pub hidden: bool,
}

#[derive(Debug, Clone, PartialEq)]
pub enum StepView {
    EnclosureTypes(Vec<EnclosureOption>),
    Dimensions,
    InteriorFinish(Vec<FinishGroup>),
    AddOns(Vec<AddOnOption>),
    Summary {
        fields: SummaryFields,
        currency: String,
    },
}

impl StepView {
    pub fn step(&self) -> Step {
        match self {
            StepView::EnclosureTypes(_) => Step::EnclosureType,
            StepView::Dimensions => Step::Dimensions,
            StepView::InteriorFinish(_) => Step::InteriorFinish,
            StepView::AddOns(_) => Step::AddOns,
            StepView::Summary { .. } => Step::Summary,
        }
    }
}

/// Produces the view for a step given the current selections
pub trait TemplateProvider: Send {
    fn render(&self, step: Step, state: &SelectionState) -> Result<StepView, TemplateError>;
}

/// Default provider backed by the configured catalog
#[derive(Debug, Clone)]
pub struct CatalogTemplates {
    catalog: Catalog,
    currency: String,
}

impl CatalogTemplates {
    pub fn new(catalog: Catalog, currency: impl Into<String>) -> Self {
        Self {
            catalog,
            currency: currency.into(),
        }
    }

    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }
}

impl TemplateProvider for CatalogTemplates {
    fn render(&self, step: Step, state: &SelectionState) -> Result<StepView, TemplateError> {
        match step {
            Step::EnclosureType => {
                if self.catalog.enclosure_types.is_empty() {
                    return Err(TemplateError::Missing(step));
                }
                Ok(StepView::EnclosureTypes(self.catalog.enclosure_types.clone()))
            }
            Step::Dimensions => Ok(StepView::Dimensions),
            Step::InteriorFinish => {
                let french = state.is_french_style();
                let mut groups = Vec::with_capacity(3);
                for surface in Surface::all() {
                    let hidden = french && *surface == Surface::Walls;
                    let options = self.catalog.materials(*surface).to_vec();
                    if options.is_empty() && !hidden {
                        return Err(TemplateError::Missing(step));
                    }
                    groups.push(FinishGroup {
                        surface: *surface,
                        options,
                        hidden,
                    });
                }
                Ok(StepView::InteriorFinish(groups))
            }
            Step::AddOns => Ok(StepView::AddOns(self.catalog.add_ons.clone())),
            Step::Summary => Ok(StepView::Summary {
                fields: SummaryFields::from_state(state),
                currency: self.currency.clone(),
            }),
        }
    }
}
