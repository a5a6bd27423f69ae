//! City layer - commodities, construction groups, constructions and requests

pub mod catalog;
pub mod commodity;
pub mod construction;
pub mod group;
pub mod recipe;
pub mod request;
pub mod stockpile;

pub use catalog::{CatalogLoadError, ConstructionCatalog};
pub use commodity::{CommodityKind, CommodityRule, CommodityTable};
pub use construction::{Construction, StepOutcome};
pub use group::{Behavior, ConstructionGroup, GroupCategory, Limits};
pub use recipe::Recipe;
pub use request::{
    ConstructionHandle, ConstructionRequest, RejectReason, RequestOutcome, RequestPolicy,
    RequestQueue,
};
pub use stockpile::Stockpile;
