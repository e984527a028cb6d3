use std::collections::BTreeMap;

use foundation::math::BodyRadii;
use serde::{Deserialize, Serialize};

use crate::config::ConfigError;

#[derive(Debug, Copy, Clone, PartialEq, Serialize, Deserialize)]
pub struct BodyEntry {
    pub equatorial_radius_km: f64,
    pub polar_radius_km: f64,
}

impl From<BodyEntry> for BodyRadii {
    fn from(e: BodyEntry) -> Self {
        BodyRadii::new(e.equatorial_radius_km, e.polar_radius_km)
    }
}

// (name, equatorial km, polar km)
const BUILTIN_BODIES: &[(&str, f64, f64)] = &[
    ("mercury", 2440.53, 2438.26),
    ("venus", 6051.8, 6051.8),
    ("earth", 6378.137, 6356.752),
    ("moon", 1737.4, 1737.4),
    ("mars", 3396.19, 3376.2),
    ("ceres", 487.3, 446.0),
    ("vesta", 286.3, 223.2),
    ("io", 1821.49, 1821.49),
    ("europa", 1560.8, 1560.8),
    ("titan", 2575.0, 2575.0),
];

/// Body parameter table keyed by lower-cased body name.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct BodyTable {
    bodies: BTreeMap<String, BodyEntry>,
}

impl BodyTable {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn builtin() -> Self {
        let mut table = Self::new();
        for (name, equatorial, polar) in BUILTIN_BODIES {
            table.insert(
                name,
                BodyEntry {
                    equatorial_radius_km: *equatorial,
                    polar_radius_km: *polar,
                },
            );
        }
        table
    }

    /// `{ "<name>": { "equatorial_radius_km": .., "polar_radius_km": .. } }`
    pub fn from_json_str(payload: &str) -> Result<Self, ConfigError> {
        let raw: BodyTable =
            serde_json::from_str(payload).map_err(|e| ConfigError::Json(e.to_string()))?;
        let mut table = Self::new();
        for (name, entry) in raw.bodies {
            if !(entry.equatorial_radius_km > 0.0 && entry.polar_radius_km > 0.0) {
                return Err(ConfigError::InvalidRadii(name));
            }
            table.insert(&name, entry);
        }
        Ok(table)
    }

    pub fn insert(&mut self, name: &str, entry: BodyEntry) {
        self.bodies.insert(name.trim().to_ascii_lowercase(), entry);
    }

    pub fn get(&self, name: &str) -> Option<BodyRadii> {
        self.bodies
            .get(&name.trim().to_ascii_lowercase())
            .copied()
            .map(BodyRadii::from)
    }

    pub fn radii(&self, name: &str) -> Result<BodyRadii, ConfigError> {
        self.get(name)
            .ok_or_else(|| ConfigError::UnknownBody(name.to_string()))
    }

    pub fn names(&self) -> impl Iterator<Item = &str> + '_ {
        self.bodies.keys().map(String::as_str)
    }
}
