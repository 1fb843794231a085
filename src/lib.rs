pub mod ecs;
pub mod error;
pub mod gate;
pub mod generator;
pub mod model;
pub mod provider;
pub mod rating;
pub mod registry;
pub mod table;

pub use error::{GenError, NoResult};
pub use generator::{
    GenerationRequest, GeneratorConfig, RatGenerator, UnitGenerator, UnitGeneratorParameters,
};
pub use model::{FactionRecord, MovementMode, Network, UnitRecord, UnitType, weight_class};
pub use provider::{RatDataset, TableParameters, TableProvider, TableSpec};
pub use rating::resolve_rating;
pub use registry::{FactionCatalog, FactionRegistry};
pub use table::{UnitFilter, UnitTable};
