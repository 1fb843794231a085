pub mod memory;

use std::sync::Arc;

use crate::gate::Readiness;
use crate::model::{FactionRecord, MovementMode, Network, UnitRecord, UnitType};
use crate::table::UnitTable;

pub use memory::{RatDataset, SalvageSpec, TableEntrySpec, TableSpec};

/// How many parent-faction levels a provider may walk by default when the
/// requested faction has no table of its own.
pub const DEFAULT_FACTION_REACH: u32 = 2;

/// Fully resolved filters for a table lookup.
#[derive(Debug, Clone)]
pub struct TableParameters {
    pub faction: Arc<FactionRecord>,
    pub unit_type: UnitType,
    pub year: i32,
    /// `None` means any rating.
    pub rating: Option<String>,
    /// Empty means any weight class.
    pub weight_classes: Vec<i32>,
    pub network: Network,
    /// Empty means any movement mode.
    pub movement_modes: Vec<MovementMode>,
    /// Factions whose tables must not contribute salvage.
    pub excluded_factions: Vec<String>,
    /// Parent-faction levels the provider may fall back through.
    pub faction_reach: u32,
    /// The faction the table is built for; never contributes salvage to itself.
    pub root_faction: Arc<FactionRecord>,
}

impl TableParameters {
    /// Parameters with no constraints beyond faction, category and year.
    pub fn new(faction: Arc<FactionRecord>, unit_type: UnitType, year: i32) -> Self {
        Self {
            root_faction: faction.clone(),
            faction,
            unit_type,
            year,
            rating: None,
            weight_classes: Vec::new(),
            network: Network::None,
            movement_modes: Vec::new(),
            excluded_factions: Vec::new(),
            faction_reach: DEFAULT_FACTION_REACH,
        }
    }

    pub fn with_rating(mut self, rating: Option<&str>) -> Self {
        self.rating = rating.map(str::to_string);
        self
    }

    pub fn with_weight_classes(mut self, weight_classes: &[i32]) -> Self {
        self.weight_classes = weight_classes.to_vec();
        self
    }

    pub fn with_network(mut self, network: Network) -> Self {
        self.network = network;
        self
    }

    pub fn with_movement_modes(mut self, modes: &[MovementMode]) -> Self {
        self.movement_modes = modes.to_vec();
        self
    }

    pub fn excluding(mut self, factions: &[&str]) -> Self {
        self.excluded_factions = factions.iter().map(|s| s.to_string()).collect();
        self
    }

    /// Whether `unit` passes the year, weight-class, movement and network
    /// constraints.
    pub fn admits(&self, unit: &UnitRecord) -> bool {
        unit.introduced <= self.year
            && (self.weight_classes.is_empty() || self.weight_classes.contains(&unit.weight_class))
            && (self.movement_modes.is_empty() || self.movement_modes.contains(&unit.movement_mode))
            && unit.supports_network(self.network)
    }
}

/// Source of weighted unit tables.
pub trait TableProvider: Send + Sync {
    /// Completion signal for the provider's initial load.
    fn readiness(&self) -> &Readiness;

    /// Prepare data for `year`. Must be called only after the provider is ready.
    fn load_year(&self, year: i32);

    /// The table matching `params`, or `None` when nothing matches. An empty
    /// table is legal and simply draws nothing.
    fn find_table(&self, params: &TableParameters) -> Option<Arc<UnitTable>>;
}
