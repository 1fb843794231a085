#[macro_use]
mod macros;

pub mod faction;
pub mod unit;

pub use faction::{FactionRecord, STANDARD_RATING_LEVELS};
pub use unit::{MovementMode, Network, UnitRecord, UnitType, weight_class};
