use std::sync::Arc;

use rand::RngCore;

use crate::error::{GenError, NoResult};
use crate::gate;
use crate::model::{Network, UnitRecord, UnitType};
use crate::provider::{TableParameters, TableProvider};
use crate::rating::resolve_rating;
use crate::registry::FactionRegistry;
use crate::table::UnitTable;

use super::{GenerationRequest, GeneratorConfig, UnitGenerator, UnitGeneratorParameters};

/// Unit generator backed by faction Random Assignment Tables.
///
/// Holds only shared read-only collaborators, so one instance can serve any
/// number of threads. Each call brings its own RNG.
#[derive(Clone)]
pub struct RatGenerator {
    provider: Arc<dyn TableProvider>,
    registry: Arc<dyn FactionRegistry>,
    config: GeneratorConfig,
}

impl RatGenerator {
    /// Wait for the table data to become ready and load `year`.
    ///
    /// Blocks for up to `config.ready_timeout`; construct generators once,
    /// off latency-sensitive paths.
    pub fn new(
        provider: Arc<dyn TableProvider>,
        registry: Arc<dyn FactionRegistry>,
        year: i32,
        config: GeneratorConfig,
    ) -> Result<Self, GenError> {
        gate::await_ready(provider.as_ref(), year, config.ready_timeout)?;
        Ok(Self {
            provider,
            registry,
            config,
        })
    }

    /// Generator over a source that is both table provider and registry.
    pub fn from_source<S>(
        source: Arc<S>,
        year: i32,
        config: GeneratorConfig,
    ) -> Result<Self, GenError>
    where
        S: TableProvider + FactionRegistry + 'static,
    {
        Self::new(source.clone(), source, year, config)
    }

    /// Resolve the table filters a request maps to.
    pub fn table_parameters(
        &self,
        request: &GenerationRequest,
    ) -> Result<TableParameters, NoResult> {
        let faction = self
            .registry
            .faction_record_or_fallback(&request.faction)
            .ok_or(NoResult::UnknownFaction)?;
        let rating = resolve_rating(&faction, request.quality).map(str::to_string);
        Ok(TableParameters {
            root_faction: faction.clone(),
            faction,
            unit_type: request.unit_type,
            year: request.year,
            rating,
            weight_classes: request.weight_classes(),
            network: Network::None,
            movement_modes: request.movement_modes.clone(),
            excluded_factions: Vec::new(),
            faction_reach: self.config.faction_reach,
        })
    }

    /// The table a request draws from.
    pub fn find_table(&self, request: &GenerationRequest) -> Result<Arc<UnitTable>, NoResult> {
        let params = self.table_parameters(request)?;
        self.provider
            .find_table(&params)
            .ok_or(NoResult::NoMatchingTable)
    }

    fn lookup(&self, request: &GenerationRequest) -> Option<Arc<UnitTable>> {
        self.find_table(request)
            .inspect_err(|reason| {
                tracing::debug!(?request, %reason, "no unit table for request");
            })
            .ok()
    }

    fn lookup_with(&self, params: &UnitGeneratorParameters) -> Option<Arc<UnitTable>> {
        let table = self.provider.find_table(&params.table);
        if table.is_none() {
            tracing::debug!(
                faction = %params.table.faction.key,
                unit_type = %params.table.unit_type,
                year = params.table.year,
                reason = %NoResult::NoMatchingTable,
                "no unit table for parameters"
            );
        }
        table
    }
}

fn log_empty_draw(faction: &str, unit_type: UnitType) {
    tracing::debug!(
        faction,
        %unit_type,
        reason = %NoResult::EmptyTableAfterFilter,
        "draw produced no unit"
    );
}

impl UnitGenerator for RatGenerator {
    fn is_supported_unit_type(&self, unit_type: UnitType) -> bool {
        !matches!(unit_type, UnitType::GunEmplacement | UnitType::SpaceStation)
    }

    fn generate_one(
        &self,
        request: &GenerationRequest,
        rng: &mut dyn RngCore,
    ) -> Option<UnitRecord> {
        let table = self.lookup(request)?;
        let unit = table.generate_unit(rng, request.filter.as_deref());
        if unit.is_none() {
            log_empty_draw(&request.faction, request.unit_type);
        }
        unit
    }

    fn generate_many(
        &self,
        count: usize,
        request: &GenerationRequest,
        rng: &mut dyn RngCore,
    ) -> Vec<UnitRecord> {
        let Some(table) = self.lookup(request) else {
            return Vec::new();
        };
        let units = table.generate_units(count, rng, request.filter.as_deref());
        if units.len() < count {
            tracing::debug!(
                faction = %request.faction,
                requested = count,
                drawn = units.len(),
                "short unit draw"
            );
        }
        units
    }

    fn generate_one_with(
        &self,
        params: &UnitGeneratorParameters,
        rng: &mut dyn RngCore,
    ) -> Option<UnitRecord> {
        let table = self.lookup_with(params)?;
        let unit = table.generate_unit(rng, params.filter.as_deref());
        if unit.is_none() {
            log_empty_draw(&params.table.faction.key, params.table.unit_type);
        }
        unit
    }

    fn generate_many_with(
        &self,
        count: usize,
        params: &UnitGeneratorParameters,
        rng: &mut dyn RngCore,
    ) -> Vec<UnitRecord> {
        match self.lookup_with(params) {
            Some(table) => table.generate_units(count, rng, params.filter.as_deref()),
            None => Vec::new(),
        }
    }
}
