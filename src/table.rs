use std::sync::Arc;

use rand::Rng;
use rand::RngCore;

use crate::model::UnitRecord;

/// Acceptance predicate applied to candidate units.
pub type UnitFilter = dyn Fn(&UnitRecord) -> bool + Send + Sync;

/// A unit entry with its relative weight.
#[derive(Debug, Clone)]
pub struct WeightedUnit {
    pub unit: UnitRecord,
    pub weight: u32,
}

/// A share of the table drawn from another faction's table.
#[derive(Debug, Clone)]
pub struct SalvageEntry {
    pub faction: String,
    pub weight: u32,
    pub table: Arc<UnitTable>,
}

/// Weighted selection table for one faction, category, year and rating.
#[derive(Debug, Clone, Default)]
pub struct UnitTable {
    units: Vec<WeightedUnit>,
    salvage: Vec<SalvageEntry>,
}

/// One slot of the eligible pool for a draw.
enum Slot<'a> {
    Unit(&'a UnitRecord),
    Salvage(&'a UnitTable),
}

impl UnitTable {
    pub fn new(units: Vec<WeightedUnit>, salvage: Vec<SalvageEntry>) -> Self {
        // Zero-weight entries can never be drawn
        let units = units.into_iter().filter(|u| u.weight > 0).collect();
        let salvage = salvage.into_iter().filter(|s| s.weight > 0).collect();
        Self { units, salvage }
    }

    pub fn units(&self) -> &[WeightedUnit] {
        &self.units
    }

    pub fn salvage(&self) -> &[SalvageEntry] {
        &self.salvage
    }

    pub fn is_empty(&self) -> bool {
        self.units.is_empty() && self.salvage.is_empty()
    }

    pub fn total_weight(&self) -> u64 {
        let units: u64 = self.units.iter().map(|u| u64::from(u.weight)).sum();
        let salvage: u64 = self.salvage.iter().map(|s| u64::from(s.weight)).sum();
        units + salvage
    }

    /// Whether any unit reachable from this table passes the filter.
    pub fn has_eligible(&self, filter: Option<&UnitFilter>) -> bool {
        self.units.iter().any(|u| accepts(filter, &u.unit))
            || self.salvage.iter().any(|s| s.table.has_eligible(filter))
    }

    /// Draw one unit, or `None` when nothing in the table passes the filter.
    pub fn generate_unit(
        &self,
        rng: &mut dyn RngCore,
        filter: Option<&UnitFilter>,
    ) -> Option<UnitRecord> {
        let (slots, weights) = self.eligible_pool(filter);
        draw_from_pool(&slots, &weights, rng, filter)
    }

    /// Draw `count` units independently, with replacement. The eligible pool is
    /// built once, so a table with any eligible unit always fills the batch and
    /// one with none returns an empty `Vec`.
    pub fn generate_units(
        &self,
        count: usize,
        rng: &mut dyn RngCore,
        filter: Option<&UnitFilter>,
    ) -> Vec<UnitRecord> {
        let (slots, weights) = self.eligible_pool(filter);
        if slots.is_empty() {
            return Vec::new();
        }
        (0..count)
            .filter_map(|_| draw_from_pool(&slots, &weights, rng, filter))
            .collect()
    }

    fn eligible_pool(&self, filter: Option<&UnitFilter>) -> (Vec<Slot<'_>>, Vec<u32>) {
        let mut slots = Vec::new();
        let mut weights = Vec::new();
        for entry in &self.units {
            if accepts(filter, &entry.unit) {
                slots.push(Slot::Unit(&entry.unit));
                weights.push(entry.weight);
            }
        }
        for entry in &self.salvage {
            if entry.table.has_eligible(filter) {
                slots.push(Slot::Salvage(entry.table.as_ref()));
                weights.push(entry.weight);
            }
        }
        (slots, weights)
    }
}

fn accepts(filter: Option<&UnitFilter>, unit: &UnitRecord) -> bool {
    filter.is_none_or(|f| f(unit))
}

fn draw_from_pool(
    slots: &[Slot<'_>],
    weights: &[u32],
    rng: &mut dyn RngCore,
    filter: Option<&UnitFilter>,
) -> Option<UnitRecord> {
    let index = weighted_index(weights, rng)?;
    match &slots[index] {
        Slot::Unit(unit) => Some((*unit).clone()),
        // Salvage slots only enter the pool when their table has an eligible unit
        Slot::Salvage(table) => table.generate_unit(rng, filter),
    }
}

/// Pick an index with probability proportional to its weight. `None` when the
/// weights are empty or sum to zero.
pub fn weighted_index(weights: &[u32], rng: &mut dyn RngCore) -> Option<usize> {
    let total: u64 = weights.iter().map(|&w| u64::from(w)).sum();
    if total == 0 {
        return None;
    }
    let roll = rng.random_range(0..total);
    let mut cumulative = 0u64;
    for (i, &w) in weights.iter().enumerate() {
        cumulative += u64::from(w);
        if roll < cumulative {
            return Some(i);
        }
    }
    None
}
