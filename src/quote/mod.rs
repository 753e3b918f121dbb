//! Quote domain: selections, catalog and pricing

pub mod catalog;
pub mod pricing;
pub mod selection;
pub mod summary;

pub use catalog::{AddOnOption, Catalog, EnclosureOption, MaterialOption};
pub use pricing::{format_money, quote_total, surface_area, PriceBreakdown};
pub use selection::{
    AddOn, Dimensions, EnclosureType, FinishSlot, InteriorFinish, SelectionState, Surface,
};
pub use summary::SummaryFields;
