use rat_gen::model::{FactionRecord, MovementMode, Network, UnitRecord, UnitType, weight_class};
use rat_gen::provider::{RatDataset, TableSpec};

pub fn mek(chassis: &str, model: &str, wc: i32) -> UnitRecord {
    UnitRecord::new(chassis, model, UnitType::Mek, wc, MovementMode::Biped)
}

pub fn vehicle(chassis: &str, wc: i32, mode: MovementMode) -> UnitRecord {
    UnitRecord::new(chassis, "", UnitType::Tank, wc, mode)
}

pub fn factions() -> Vec<FactionRecord> {
    vec![
        FactionRecord::new("IS", "Inner Sphere General"),
        FactionRecord::new("FS", "Federated Suns")
            .with_rating_levels(&["F", "D", "C", "B", "A"])
            .with_parents(&["IS"])
            .with_alternative_codes(&["FedSuns"]),
        FactionRecord::new("FS.DMM", "Draconis March Militia").with_parents(&["FS"]),
        FactionRecord::new("DC", "Draconis Combine").with_rating_levels(&["F", "D", "C", "B", "A"]),
        FactionRecord::new("PIR", "Pirates").with_rating_levels(&["Pirate"]),
    ]
}

pub fn tables() -> Vec<TableSpec> {
    let valkyrie = mek("Valkyrie", "VLK-QA", weight_class::LIGHT);
    let battlemaster = mek("Battlemaster", "BLR-1G", weight_class::ASSAULT);
    let raven = mek("Raven", "RVN-3L", weight_class::LIGHT)
        .with_networks(&[Network::C3Slave])
        .introduced_in(3051);
    let pegasus = vehicle("Pegasus", weight_class::LIGHT, MovementMode::Hover);
    let bulldog = vehicle("Bulldog", weight_class::MEDIUM, MovementMode::Tracked);
    let demolisher = vehicle("Demolisher", weight_class::HEAVY, MovementMode::Tracked);
    vec![
        TableSpec::new("IS", UnitType::Mek, 2900, 3150)
            .entry(mek("Wasp", "WSP-1A", weight_class::LIGHT), 4)
            .entry(mek("Griffin", "GRF-1N", weight_class::MEDIUM), 2),
        TableSpec::new("FS", UnitType::Mek, 3000, 3067)
            .rated_entry(valkyrie, 5, &[("A", 1)])
            .entry(mek("Centurion", "CN9-A", weight_class::MEDIUM), 4)
            .rated_entry(battlemaster, 1, &[("A", 6)])
            .entry(raven, 2)
            .salvage("DC", 1),
        TableSpec::new("FS", UnitType::Tank, 3000, 3067)
            .entry(pegasus, 3)
            .entry(bulldog, 3)
            .entry(demolisher, 1),
        TableSpec::new("DC", UnitType::Mek, 3000, 3067)
            .entry(mek("Panther", "PNT-9R", weight_class::LIGHT), 4)
            .entry(mek("Dragon", "DRG-1N", weight_class::HEAVY), 3)
            .salvage("FS", 1),
        TableSpec::new("PIR", UnitType::Mek, 2900, 3150)
            .entry(mek("Stinger", "STG-3R", weight_class::LIGHT), 1),
    ]
}

pub fn dataset() -> RatDataset {
    RatDataset::ready(factions(), tables()).unwrap()
}
