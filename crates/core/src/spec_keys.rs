//! The fixed catalogue of specification keys.
//!
//! Both a car's base specification and every trim's specification draw
//! their keys from this list. Order here is display order on spec sheets.

use serde::{Deserialize, Serialize};

use crate::error::CoreError;

/// A specification key a car or trim may declare a value for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SpecKey {
    Engine,
    Horsepower,
    Torque,
    Transmission,
    Drivetrain,
    FuelType,
    FuelEconomy,
    Acceleration,
    TopSpeed,
    Range,
    Battery,
    Seating,
    CargoSpace,
    TowingCapacity,
    CurbWeight,
    Warranty,
}

/// Every key, in display order.
pub const ALL_SPEC_KEYS: [SpecKey; 16] = [
    SpecKey::Engine,
    SpecKey::Horsepower,
    SpecKey::Torque,
    SpecKey::Transmission,
    SpecKey::Drivetrain,
    SpecKey::FuelType,
    SpecKey::FuelEconomy,
    SpecKey::Acceleration,
    SpecKey::TopSpeed,
    SpecKey::Range,
    SpecKey::Battery,
    SpecKey::Seating,
    SpecKey::CargoSpace,
    SpecKey::TowingCapacity,
    SpecKey::CurbWeight,
    SpecKey::Warranty,
];

impl SpecKey {
    /// Parse a key as stored in a specification mapping.
    pub fn parse(s: &str) -> Result<Self, CoreError> {
        ALL_SPEC_KEYS
            .iter()
            .copied()
            .find(|k| k.as_str() == s)
            .ok_or_else(|| CoreError::Validation(format!("Unknown specification key '{s}'")))
    }

    /// The key as stored in a specification mapping.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Engine => "engine",
            Self::Horsepower => "horsepower",
            Self::Torque => "torque",
            Self::Transmission => "transmission",
            Self::Drivetrain => "drivetrain",
            Self::FuelType => "fuel_type",
            Self::FuelEconomy => "fuel_economy",
            Self::Acceleration => "acceleration",
            Self::TopSpeed => "top_speed",
            Self::Range => "range",
            Self::Battery => "battery",
            Self::Seating => "seating",
            Self::CargoSpace => "cargo_space",
            Self::TowingCapacity => "towing_capacity",
            Self::CurbWeight => "curb_weight",
            Self::Warranty => "warranty",
        }
    }

    /// Human-readable label shown on spec sheets.
    pub fn label(self) -> &'static str {
        match self {
            Self::Engine => "Engine",
            Self::Horsepower => "Horsepower",
            Self::Torque => "Torque",
            Self::Transmission => "Transmission",
            Self::Drivetrain => "Drivetrain",
            Self::FuelType => "Fuel Type",
            Self::FuelEconomy => "Fuel Economy",
            Self::Acceleration => "0-60 mph",
            Self::TopSpeed => "Top Speed",
            Self::Range => "Range",
            Self::Battery => "Battery",
            Self::Seating => "Seating",
            Self::CargoSpace => "Cargo Space",
            Self::TowingCapacity => "Towing Capacity",
            Self::CurbWeight => "Curb Weight",
            Self::Warranty => "Warranty",
        }
    }

    /// Position of this key in display order.
    pub fn position(self) -> usize {
        ALL_SPEC_KEYS
            .iter()
            .position(|k| *k == self)
            .unwrap_or(ALL_SPEC_KEYS.len())
    }
}

/// Catalogue entry returned to clients building spec editors.
#[derive(Debug, Clone, Serialize)]
pub struct SpecKeyInfo {
    pub key: &'static str,
    pub label: &'static str,
}

/// The catalogue as a list of key/label pairs.
pub fn catalogue() -> Vec<SpecKeyInfo> {
    ALL_SPEC_KEYS
        .iter()
        .map(|k| SpecKeyInfo {
            key: k.as_str(),
            label: k.label(),
        })
        .collect()
}
