pub mod rat;

use std::fmt;
use std::sync::Arc;
use std::time::Duration;

use rand::RngCore;

use crate::model::{MovementMode, UnitRecord, UnitType, weight_class};
use crate::provider::{DEFAULT_FACTION_REACH, TableParameters};
use crate::table::UnitFilter;

pub use rat::RatGenerator;

/// Construction settings for a generator.
#[derive(Debug, Clone)]
pub struct GeneratorConfig {
    /// How long construction waits for the table data before giving up.
    pub ready_timeout: Duration,
    /// Parent-faction levels a lookup may fall back through.
    pub faction_reach: u32,
}

impl Default for GeneratorConfig {
    fn default() -> Self {
        Self {
            ready_timeout: Duration::from_secs(30),
            faction_reach: DEFAULT_FACTION_REACH,
        }
    }
}

/// What to generate: faction, category, era and quality, plus optional filters.
#[derive(Clone)]
pub struct GenerationRequest {
    pub faction: String,
    pub unit_type: UnitType,
    /// Negative means any weight class.
    pub weight_class: i32,
    pub year: i32,
    pub quality: i32,
    /// Empty means any movement mode.
    pub movement_modes: Vec<MovementMode>,
    pub filter: Option<Arc<UnitFilter>>,
    pub count: usize,
}

impl GenerationRequest {
    pub fn new(faction: &str, unit_type: UnitType, year: i32, quality: i32) -> Self {
        Self {
            faction: faction.to_string(),
            unit_type,
            weight_class: weight_class::ANY,
            year,
            quality,
            movement_modes: Vec::new(),
            filter: None,
            count: 1,
        }
    }

    pub fn weight_class(mut self, weight_class: i32) -> Self {
        self.weight_class = weight_class;
        self
    }

    pub fn movement_modes(mut self, modes: &[MovementMode]) -> Self {
        self.movement_modes = modes.to_vec();
        self
    }

    pub fn filter(mut self, filter: impl Fn(&UnitRecord) -> bool + Send + Sync + 'static) -> Self {
        self.filter = Some(Arc::new(filter));
        self
    }

    pub fn count(mut self, count: usize) -> Self {
        self.count = count;
        self
    }

    /// The weight-class set passed to the table lookup.
    pub fn weight_classes(&self) -> Vec<i32> {
        weight_class_filter(self.weight_class)
    }
}

impl fmt::Debug for GenerationRequest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("GenerationRequest")
            .field("faction", &self.faction)
            .field("unit_type", &self.unit_type)
            .field("weight_class", &self.weight_class)
            .field("year", &self.year)
            .field("quality", &self.quality)
            .field("movement_modes", &self.movement_modes)
            .field("filter", &self.filter.is_some())
            .field("count", &self.count)
            .finish()
    }
}

/// Empty for "any weight class", otherwise the single requested class.
pub fn weight_class_filter(weight_class: i32) -> Vec<i32> {
    if weight_class < 0 {
        Vec::new()
    } else {
        vec![weight_class]
    }
}

/// Pre-resolved table filters plus an optional predicate, for callers that
/// already know exactly which table they want.
#[derive(Clone)]
pub struct UnitGeneratorParameters {
    pub table: TableParameters,
    pub filter: Option<Arc<UnitFilter>>,
}

impl UnitGeneratorParameters {
    pub fn new(table: TableParameters) -> Self {
        Self {
            table,
            filter: None,
        }
    }

    pub fn filter(mut self, filter: impl Fn(&UnitRecord) -> bool + Send + Sync + 'static) -> Self {
        self.filter = Some(Arc::new(filter));
        self
    }
}

/// Draws units from faction tables.
pub trait UnitGenerator: Send + Sync {
    fn is_supported_unit_type(&self, unit_type: UnitType) -> bool;

    /// A single unit, or `None` when nothing matches.
    fn generate_one(
        &self,
        request: &GenerationRequest,
        rng: &mut dyn RngCore,
    ) -> Option<UnitRecord>;

    /// Up to `count` units drawn with replacement from one table.
    fn generate_many(
        &self,
        count: usize,
        request: &GenerationRequest,
        rng: &mut dyn RngCore,
    ) -> Vec<UnitRecord>;

    fn generate_one_with(
        &self,
        params: &UnitGeneratorParameters,
        rng: &mut dyn RngCore,
    ) -> Option<UnitRecord>;

    fn generate_many_with(
        &self,
        count: usize,
        params: &UnitGeneratorParameters,
        rng: &mut dyn RngCore,
    ) -> Vec<UnitRecord>;

    /// Draw `request.count` units.
    fn generate_requested(
        &self,
        request: &GenerationRequest,
        rng: &mut dyn RngCore,
    ) -> Vec<UnitRecord> {
        self.generate_many(request.count, request, rng)
    }

    fn generate(
        &self,
        faction: &str,
        unit_type: UnitType,
        weight_class: i32,
        year: i32,
        quality: i32,
        rng: &mut dyn RngCore,
    ) -> Option<UnitRecord> {
        let request = GenerationRequest::new(faction, unit_type, year, quality)
            .weight_class(weight_class);
        self.generate_one(&request, rng)
    }

    #[allow(clippy::too_many_arguments)]
    fn generate_filtered(
        &self,
        faction: &str,
        unit_type: UnitType,
        weight_class: i32,
        year: i32,
        quality: i32,
        filter: impl Fn(&UnitRecord) -> bool + Send + Sync + 'static,
        rng: &mut dyn RngCore,
    ) -> Option<UnitRecord>
    where
        Self: Sized,
    {
        let request = GenerationRequest::new(faction, unit_type, year, quality)
            .weight_class(weight_class)
            .filter(filter);
        self.generate_one(&request, rng)
    }

    #[allow(clippy::too_many_arguments)]
    fn generate_count(
        &self,
        count: usize,
        faction: &str,
        unit_type: UnitType,
        weight_class: i32,
        year: i32,
        quality: i32,
        rng: &mut dyn RngCore,
    ) -> Vec<UnitRecord> {
        let request = GenerationRequest::new(faction, unit_type, year, quality)
            .weight_class(weight_class);
        self.generate_many(count, &request, rng)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn negative_weight_class_is_unconstrained() {
        assert!(weight_class_filter(-1).is_empty());
        assert!(weight_class_filter(-7).is_empty());
    }

    #[test]
    fn weight_class_becomes_singleton() {
        assert_eq!(weight_class_filter(3), vec![3]);
        assert_eq!(weight_class_filter(weight_class::ULTRA_LIGHT), vec![0]);
    }

    #[test]
    fn request_defaults() {
        let req = GenerationRequest::new("FS", UnitType::Mek, 3050, 2);
        assert_eq!(req.weight_class, weight_class::ANY);
        assert!(req.weight_classes().is_empty());
        assert!(req.movement_modes.is_empty());
        assert!(req.filter.is_none());
        assert_eq!(req.count, 1);
    }

    #[test]
    fn debug_hides_filter_body() {
        let req = GenerationRequest::new("FS", UnitType::Tank, 3050, 2).filter(|_| true);
        let text = format!("{req:?}");
        assert!(text.contains("filter: true"), "{text}");
    }
}
