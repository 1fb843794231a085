use serde::{Deserialize, Serialize};

/// Broad unit category used to pick a table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(into = "String", try_from = "String")]
pub enum UnitType {
    Mek,
    Tank,
    BattleArmor,
    Infantry,
    ProtoMek,
    Vtol,
    Naval,
    GunEmplacement,
    ConvFighter,
    AerospaceFighter,
    SmallCraft,
    DropShip,
    JumpShip,
    WarShip,
    SpaceStation,
}

string_enum!(UnitType {
    Mek => "mek",
    Tank => "tank",
    BattleArmor => "battle_armor",
    Infantry => "infantry",
    ProtoMek => "protomek",
    Vtol => "vtol",
    Naval => "naval",
    GunEmplacement => "gun_emplacement",
    ConvFighter => "conv_fighter",
    AerospaceFighter => "aerospace_fighter",
    SmallCraft => "small_craft",
    DropShip => "dropship",
    JumpShip => "jumpship",
    WarShip => "warship",
    SpaceStation => "space_station",
});

/// Locomotion category, used as an optional table filter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(into = "String", try_from = "String")]
pub enum MovementMode {
    Biped,
    Tripod,
    Quad,
    Tracked,
    Wheeled,
    Hover,
    Vtol,
    Naval,
    Hydrofoil,
    Submarine,
    Wige,
    InfLeg,
    InfMotorized,
    InfJump,
    Aerodyne,
    Spheroid,
}

string_enum!(MovementMode {
    Biped => "biped",
    Tripod => "tripod",
    Quad => "quad",
    Tracked => "tracked",
    Wheeled => "wheeled",
    Hover => "hover",
    Vtol => "vtol",
    Naval => "naval",
    Hydrofoil => "hydrofoil",
    Submarine => "submarine",
    Wige => "wige",
    InfLeg => "inf_leg",
    InfMotorized => "inf_motorized",
    InfJump => "inf_jump",
    Aerodyne => "aerodyne",
    Spheroid => "spheroid",
});

/// C3-style network constraint. `None` means the table is not restricted
/// to networked units.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(into = "String", try_from = "String")]
pub enum Network {
    #[default]
    None,
    C3Slave,
    C3Master,
    C3i,
    NovaCews,
}

string_enum!(Network {
    None => "none",
    C3Slave => "c3_slave",
    C3Master => "c3_master",
    C3i => "c3i",
    NovaCews => "nova_cews",
});

/// Weight class codes. Requests use `ANY` (any negative value) for
/// "no weight-class constraint".
pub mod weight_class {
    pub const ANY: i32 = -1;
    pub const ULTRA_LIGHT: i32 = 0;
    pub const LIGHT: i32 = 1;
    pub const MEDIUM: i32 = 2;
    pub const HEAVY: i32 = 3;
    pub const ASSAULT: i32 = 4;
    pub const SUPER_HEAVY: i32 = 5;
}

/// A candidate unit definition that a table can yield.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UnitRecord {
    pub chassis: String,
    pub model: String,
    pub unit_type: UnitType,
    pub weight_class: i32,
    pub movement_mode: MovementMode,
    #[serde(default)]
    pub networks: Vec<Network>,
    /// First year the unit can appear in a table.
    #[serde(default)]
    pub introduced: i32,
}

impl UnitRecord {
    pub fn new(
        chassis: &str,
        model: &str,
        unit_type: UnitType,
        weight_class: i32,
        movement_mode: MovementMode,
    ) -> Self {
        Self {
            chassis: chassis.to_string(),
            model: model.to_string(),
            unit_type,
            weight_class,
            movement_mode,
            networks: Vec::new(),
            introduced: 0,
        }
    }

    pub fn with_networks(mut self, networks: &[Network]) -> Self {
        self.networks = networks.to_vec();
        self
    }

    pub fn introduced_in(mut self, year: i32) -> Self {
        self.introduced = year;
        self
    }

    /// Full display name, e.g. "Atlas AS7-D".
    pub fn name(&self) -> String {
        if self.model.is_empty() {
            self.chassis.clone()
        } else {
            format!("{} {}", self.chassis, self.model)
        }
    }

    pub fn supports_network(&self, network: Network) -> bool {
        network == Network::None || self.networks.contains(&network)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unit_type_string_round_trip() {
        for &t in UnitType::ALL {
            let s: String = t.into();
            assert_eq!(UnitType::try_from(s).unwrap(), t);
        }
    }

    #[test]
    fn unknown_movement_mode_rejected() {
        let err = MovementMode::try_from("teleport".to_string()).unwrap_err();
        assert!(err.contains("MovementMode"), "unexpected error: {err}");
    }

    #[test]
    fn name_joins_chassis_and_model() {
        let atlas = UnitRecord::new(
            "Atlas",
            "AS7-D",
            UnitType::Mek,
            weight_class::ASSAULT,
            MovementMode::Biped,
        );
        assert_eq!(atlas.name(), "Atlas AS7-D");
        let bare = UnitRecord::new(
            "Foot Platoon",
            "",
            UnitType::Infantry,
            weight_class::LIGHT,
            MovementMode::InfLeg,
        );
        assert_eq!(bare.name(), "Foot Platoon");
    }

    #[test]
    fn network_none_always_supported() {
        let unit = UnitRecord::new(
            "Hunchback",
            "HBK-4G",
            UnitType::Mek,
            weight_class::MEDIUM,
            MovementMode::Biped,
        );
        assert!(unit.supports_network(Network::None));
        assert!(!unit.supports_network(Network::C3Slave));
        let c3 = unit.with_networks(&[Network::C3Slave]);
        assert!(c3.supports_network(Network::C3Slave));
    }

    #[test]
    fn unit_serializes_enums_as_strings() {
        let unit = UnitRecord::new(
            "Savannah Master",
            "",
            UnitType::Tank,
            weight_class::LIGHT,
            MovementMode::Hover,
        );
        let json = serde_json::to_value(&unit).unwrap();
        assert_eq!(json["unit_type"], "tank");
        assert_eq!(json["movement_mode"], "hover");
    }
}
