use std::collections::{BTreeMap, BTreeSet};
use std::sync::{Arc, PoisonError, RwLock};

use serde::{Deserialize, Serialize};

use crate::error::GenError;
use crate::gate::Readiness;
use crate::model::{FactionRecord, UnitRecord, UnitType};
use crate::registry::{FactionCatalog, FactionRegistry};
use crate::table::{SalvageEntry, UnitTable, WeightedUnit};

use super::{TableParameters, TableProvider};

/// A unit's place in a table, with optional weights per rating label.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TableEntrySpec {
    pub unit: UnitRecord,
    pub weight: u32,
    #[serde(default)]
    pub rating_weights: BTreeMap<String, u32>,
}

impl TableEntrySpec {
    pub fn weight_for(&self, rating: Option<&str>) -> u32 {
        rating
            .and_then(|r| self.rating_weights.get(r).copied())
            .unwrap_or(self.weight)
    }
}

/// Share of a table drawn from another faction's table.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SalvageSpec {
    pub faction: String,
    pub weight: u32,
}

/// Table data for one faction and unit type over an era.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TableSpec {
    pub faction: String,
    pub unit_type: UnitType,
    pub from_year: i32,
    pub to_year: i32,
    #[serde(default)]
    pub entries: Vec<TableEntrySpec>,
    #[serde(default)]
    pub salvage: Vec<SalvageSpec>,
}

impl TableSpec {
    pub fn new(faction: &str, unit_type: UnitType, from_year: i32, to_year: i32) -> Self {
        Self {
            faction: faction.to_string(),
            unit_type,
            from_year,
            to_year,
            entries: Vec::new(),
            salvage: Vec::new(),
        }
    }

    pub fn entry(mut self, unit: UnitRecord, weight: u32) -> Self {
        self.entries.push(TableEntrySpec {
            unit,
            weight,
            rating_weights: BTreeMap::new(),
        });
        self
    }

    pub fn rated_entry(mut self, unit: UnitRecord, weight: u32, by_rating: &[(&str, u32)]) -> Self {
        let rating_weights = by_rating
            .iter()
            .map(|(rating, w)| (rating.to_string(), *w))
            .collect();
        self.entries.push(TableEntrySpec {
            unit,
            weight,
            rating_weights,
        });
        self
    }

    pub fn salvage(mut self, faction: &str, weight: u32) -> Self {
        self.salvage.push(SalvageSpec {
            faction: faction.to_string(),
            weight,
        });
        self
    }

    pub fn covers_year(&self, year: i32) -> bool {
        (self.from_year..=self.to_year).contains(&year)
    }

    pub fn covers(&self, unit_type: UnitType, year: i32) -> bool {
        self.unit_type == unit_type && self.covers_year(year)
    }
}

#[derive(Deserialize)]
struct Snapshot {
    factions: Vec<FactionRecord>,
    tables: Vec<TableSpec>,
}

/// In-memory table provider and faction registry.
///
/// Construction validates the data; the dataset then stays unready until
/// [`RatDataset::mark_ready`] is called, so a background loader can hand it
/// out before it finishes.
#[derive(Debug)]
pub struct RatDataset {
    catalog: FactionCatalog,
    tables: Vec<TableSpec>,
    readiness: Readiness,
    loaded_years: RwLock<BTreeSet<i32>>,
}

impl RatDataset {
    pub fn new(factions: Vec<FactionRecord>, tables: Vec<TableSpec>) -> Result<Self, GenError> {
        let catalog = FactionCatalog::new(factions);
        validate(&catalog, &tables)?;
        Ok(Self {
            catalog,
            tables,
            readiness: Readiness::new(),
            loaded_years: RwLock::new(BTreeSet::new()),
        })
    }

    /// Build a dataset that is already marked ready.
    pub fn ready(factions: Vec<FactionRecord>, tables: Vec<TableSpec>) -> Result<Self, GenError> {
        let dataset = Self::new(factions, tables)?;
        dataset.mark_ready();
        Ok(dataset)
    }

    /// Build from a JSON snapshot of the form `{"factions": [...], "tables": [...]}`.
    pub fn from_json_str(json: &str) -> Result<Self, GenError> {
        let snapshot: Snapshot = match serde_json::from_str(json) {
            Ok(snapshot) => snapshot,
            Err(e) => {
                tracing::error!(error = %e, "unit table snapshot failed to parse");
                return Err(e.into());
            }
        };
        Self::new(snapshot.factions, snapshot.tables)
    }

    pub fn mark_ready(&self) {
        tracing::debug!(
            tables = self.tables.len(),
            factions = self.catalog.len(),
            "unit table data ready"
        );
        self.readiness.mark_ready();
    }

    pub fn is_year_loaded(&self, year: i32) -> bool {
        self.loaded_years
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .contains(&year)
    }

    pub fn loaded_years(&self) -> Vec<i32> {
        self.loaded_years
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .iter()
            .copied()
            .collect()
    }

    /// First table covering the year for `key` or, failing that, for its
    /// parents up to `reach` levels out.
    fn spec_for(
        &self,
        key: &str,
        unit_type: UnitType,
        year: i32,
        reach: u32,
    ) -> Option<&TableSpec> {
        let mut level = vec![key.to_string()];
        let mut seen: BTreeSet<String> = BTreeSet::new();
        for depth in 0..=reach {
            for candidate in &level {
                let found = self
                    .tables
                    .iter()
                    .find(|t| t.faction == *candidate && t.covers(unit_type, year));
                if let Some(spec) = found {
                    if depth > 0 {
                        tracing::debug!(
                            requested = key,
                            using = %candidate,
                            "falling back to parent faction table"
                        );
                    }
                    return Some(spec);
                }
            }
            seen.extend(level.iter().cloned());
            level = level
                .iter()
                .filter_map(|k| self.catalog.get(k))
                .flat_map(|r| r.parent_factions.iter().cloned())
                .filter(|p| !seen.contains(p))
                .collect();
            if level.is_empty() {
                break;
            }
        }
        None
    }

    /// Build the table for `key`. `path` holds the factions on the current
    /// salvage chain only, so a faction is never salvaged from itself
    /// transitively while sibling salvage entries stay independent.
    fn build_table(
        &self,
        params: &TableParameters,
        key: &str,
        path: &mut Vec<String>,
    ) -> Option<Arc<UnitTable>> {
        let spec = self.spec_for(key, params.unit_type, params.year, params.faction_reach)?;

        let rating = params.rating.as_deref();
        let units = spec
            .entries
            .iter()
            .filter(|e| params.admits(&e.unit))
            .map(|e| WeightedUnit {
                unit: e.unit.clone(),
                weight: e.weight_for(rating),
            })
            .collect();

        path.push(spec.faction.clone());
        let mut salvage = Vec::new();
        for s in &spec.salvage {
            if s.faction == params.root_faction.key
                || params.excluded_factions.contains(&s.faction)
                || path.contains(&s.faction)
            {
                continue;
            }
            // Salvage comes from the other faction's table at any rating
            let sub_params = TableParameters {
                rating: None,
                ..params.clone()
            };
            if let Some(table) = self.build_table(&sub_params, &s.faction, path) {
                salvage.push(SalvageEntry {
                    faction: s.faction.clone(),
                    weight: s.weight,
                    table,
                });
            }
        }
        path.pop();

        Some(Arc::new(UnitTable::new(units, salvage)))
    }
}

impl TableProvider for RatDataset {
    fn readiness(&self) -> &Readiness {
        &self.readiness
    }

    fn load_year(&self, year: i32) {
        let mut loaded = self
            .loaded_years
            .write()
            .unwrap_or_else(PoisonError::into_inner);
        if loaded.insert(year) {
            let eras = self.tables.iter().filter(|t| t.covers_year(year)).count();
            tracing::info!(year, tables = eras, "loaded unit tables for year");
        }
    }

    fn find_table(&self, params: &TableParameters) -> Option<Arc<UnitTable>> {
        if !self.is_year_loaded(params.year) {
            tracing::debug!(year = params.year, "loading unit tables on demand");
            self.load_year(params.year);
        }
        let mut path = Vec::new();
        self.build_table(params, &params.faction.key, &mut path)
    }
}

impl FactionRegistry for RatDataset {
    fn faction_record_or_fallback(&self, key: &str) -> Option<Arc<FactionRecord>> {
        self.catalog.faction_record_or_fallback(key)
    }
}

fn validate(catalog: &FactionCatalog, tables: &[TableSpec]) -> Result<(), GenError> {
    let reject = |message: String| {
        tracing::error!(%message, "rejecting unit table data");
        Err(GenError::MalformedData(message))
    };

    for record in catalog.iter() {
        let key = &record.key;
        for parent in &record.parent_factions {
            if !catalog.contains(parent) {
                return reject(format!("faction {key} has unknown parent {parent}"));
            }
        }
    }
    for t in tables {
        let (faction, unit_type) = (&t.faction, t.unit_type);
        if !catalog.contains(faction) {
            return reject(format!("{unit_type} table for unknown faction {faction}"));
        }
        if t.from_year > t.to_year {
            let era = format!("{}..{}", t.from_year, t.to_year);
            return reject(format!("{faction} {unit_type} table era {era} is inverted"));
        }
        for s in &t.salvage {
            if !catalog.contains(&s.faction) {
                let target = &s.faction;
                let message = format!("{faction} table salvages from unknown faction {target}");
                return reject(message);
            }
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{MovementMode, Network, weight_class};

    fn mek(chassis: &str, wc: i32) -> UnitRecord {
        UnitRecord::new(chassis, "", UnitType::Mek, wc, MovementMode::Biped)
    }

    fn dataset() -> RatDataset {
        let factions = vec![
            FactionRecord::new("IS", "Inner Sphere General"),
            FactionRecord::new("FS", "Federated Suns").with_parents(&["IS"]),
            FactionRecord::new("FS.CMM", "Crucis March Militia").with_parents(&["FS"]),
            FactionRecord::new("DC", "Draconis Combine"),
        ];
        let hatchetman = mek("Hatchetman", weight_class::MEDIUM).introduced_in(3023);
        let raven = mek("Raven", weight_class::LIGHT).with_networks(&[Network::C3Slave]);
        let tables = vec![
            TableSpec::new("IS", UnitType::Mek, 3000, 3100)
                .entry(mek("Wasp", weight_class::LIGHT), 5),
            TableSpec::new("FS", UnitType::Mek, 3000, 3100)
                .rated_entry(mek("Enforcer", weight_class::MEDIUM), 4, &[("A", 1)])
                .entry(hatchetman, 2)
                .entry(raven, 1)
                .salvage("DC", 1),
            TableSpec::new("DC", UnitType::Mek, 3000, 3100)
                .entry(mek("Panther", weight_class::LIGHT), 3)
                .salvage("FS", 1),
        ];
        RatDataset::ready(factions, tables).unwrap()
    }

    fn params(ds: &RatDataset, key: &str, year: i32) -> TableParameters {
        let faction = ds.faction_record_or_fallback(key).unwrap();
        TableParameters::new(faction, UnitType::Mek, year)
    }

    fn salvage_keys(table: &UnitTable) -> Vec<&str> {
        table.salvage().iter().map(|s| s.faction.as_str()).collect()
    }

    #[test]
    fn finds_faction_table_with_salvage() {
        let ds = dataset();
        let table = ds.find_table(&params(&ds, "FS", 3050)).unwrap();
        assert_eq!(table.units().len(), 3);
        assert_eq!(salvage_keys(&table), vec!["DC"]);
        // DC's salvage back to FS is cut off
        assert!(table.salvage()[0].table.salvage().is_empty());
    }

    #[test]
    fn salvage_independent_of_declaration_order() {
        let factions = || {
            vec![
                FactionRecord::new("FS", "Federated Suns"),
                FactionRecord::new("DC", "Draconis Combine"),
                FactionRecord::new("CC", "Capellan Confederation"),
            ]
        };
        let shared_tables = || {
            vec![
                TableSpec::new("DC", UnitType::Mek, 3000, 3100)
                    .entry(mek("Panther", weight_class::LIGHT), 3)
                    .salvage("CC", 1),
                TableSpec::new("CC", UnitType::Mek, 3000, 3100)
                    .entry(mek("Vindicator", weight_class::MEDIUM), 3),
            ]
        };
        let fs = TableSpec::new("FS", UnitType::Mek, 3000, 3100)
            .entry(mek("Valkyrie", weight_class::LIGHT), 1);

        let mut dc_first = shared_tables();
        dc_first.push(fs.clone().salvage("DC", 5).salvage("CC", 5));
        let mut cc_first = shared_tables();
        cc_first.push(fs.salvage("CC", 5).salvage("DC", 5));

        for tables in [dc_first, cc_first] {
            let ds = RatDataset::ready(factions(), tables).unwrap();
            let table = ds.find_table(&params(&ds, "FS", 3050)).unwrap();
            let mut keys = salvage_keys(&table);
            keys.sort();
            assert_eq!(keys, vec!["CC", "DC"]);
            assert_eq!(table.total_weight(), 11);

            let dc = table.salvage().iter().find(|s| s.faction == "DC").unwrap();
            assert_eq!(salvage_keys(&dc.table), vec!["CC"]);
        }
    }

    #[test]
    fn units_not_yet_introduced_are_filtered() {
        let ds = dataset();
        let table = ds.find_table(&params(&ds, "FS", 3010)).unwrap();
        assert!(table.units().iter().all(|u| u.unit.chassis != "Hatchetman"));
    }

    #[test]
    fn weight_class_and_network_filters_apply() {
        let ds = dataset();
        let p = params(&ds, "FS", 3050).with_weight_classes(&[weight_class::LIGHT]);
        let table = ds.find_table(&p).unwrap();
        assert_eq!(table.units().len(), 1);
        assert_eq!(table.units()[0].unit.chassis, "Raven");

        let p = params(&ds, "FS", 3050)
            .with_network(Network::C3Slave)
            .excluding(&["DC"]);
        let table = ds.find_table(&p).unwrap();
        assert_eq!(table.units().len(), 1);
        assert!(table.salvage().is_empty());
    }

    #[test]
    fn rating_weights_override_base_weight() {
        let ds = dataset();
        let p = params(&ds, "FS", 3050).with_rating(Some("A"));
        let table = ds.find_table(&p).unwrap();
        let enforcer = table
            .units()
            .iter()
            .find(|u| u.unit.chassis == "Enforcer")
            .unwrap();
        assert_eq!(enforcer.weight, 1);
    }

    #[test]
    fn movement_filter_can_empty_a_table() {
        let ds = dataset();
        let p = params(&ds, "FS", 3050)
            .with_movement_modes(&[MovementMode::Hover])
            .excluding(&["DC"]);
        let table = ds.find_table(&p).unwrap();
        assert!(table.is_empty());
    }

    #[test]
    fn parent_tables_used_within_reach() {
        let ds = dataset();
        let table = ds.find_table(&params(&ds, "FS.CMM", 3050)).unwrap();
        assert!(table.units().iter().any(|u| u.unit.chassis == "Enforcer"));

        let mut short = params(&ds, "FS.CMM", 3050);
        short.faction_reach = 0;
        assert!(ds.find_table(&short).is_none());
    }

    #[test]
    fn out_of_era_year_has_no_table() {
        let ds = dataset();
        assert!(ds.find_table(&params(&ds, "FS", 2500)).is_none());
    }

    #[test]
    fn lookup_loads_year_on_demand() {
        let ds = dataset();
        assert!(!ds.is_year_loaded(3050));
        assert!(ds.find_table(&params(&ds, "FS", 3050)).is_some());
        assert_eq!(ds.loaded_years(), vec![3050]);
    }

    #[test]
    fn unknown_table_faction_is_malformed() {
        let tables = vec![TableSpec::new("XX", UnitType::Tank, 3000, 3010)];
        let err = RatDataset::new(vec![], tables).unwrap_err();
        assert!(matches!(err, GenError::MalformedData(_)));
    }

    #[test]
    fn inverted_era_is_malformed() {
        let factions = vec![FactionRecord::new("FS", "Federated Suns")];
        let tables = vec![TableSpec::new("FS", UnitType::Tank, 3010, 3000)];
        let err = RatDataset::new(factions, tables).unwrap_err();
        assert!(matches!(err, GenError::MalformedData(_)));
    }

    #[test]
    fn snapshot_loads_from_json() {
        let json = r#"{
            "factions": [{"key": "LA", "name": "Lyran Alliance"}],
            "tables": [{
                "faction": "LA", "unit_type": "tank", "from_year": 3050, "to_year": 3060,
                "entries": [{
                    "unit": {
                        "chassis": "Demolisher", "model": "", "unit_type": "tank",
                        "weight_class": 4, "movement_mode": "tracked"
                    },
                    "weight": 3
                }]
            }]
        }"#;
        let ds = RatDataset::from_json_str(json).unwrap();
        assert!(!ds.readiness().is_ready());
        let faction = ds.faction_record_or_fallback("LA").unwrap();
        let params = TableParameters::new(faction, UnitType::Tank, 3055);
        let table = ds.find_table(&params).unwrap();
        assert_eq!(table.units()[0].unit.chassis, "Demolisher");
    }

    #[test]
    fn bad_json_is_an_error() {
        let result = RatDataset::from_json_str("{");
        assert!(matches!(result, Err(GenError::Json(_))));
    }
}
