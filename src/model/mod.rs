pub mod aggregate;
pub mod element;
pub mod property;

pub use aggregate::{CategoryAggregate, ThicknessAggregate, ThicknessSummary};
pub use element::{ElementRecord, UNKNOWN_CATEGORY, WALL_RECORD_CATEGORY};
pub use property::{PropertyBag, PropertyDatabase, PropertyValue};
