use foundation::math::{
    BodyRadii, DisplayConvention, LatitudeType, LongitudeDirection, LongitudeDomain, Projection,
};
use serde::{Deserialize, Serialize};

use crate::bodies::BodyTable;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    Json(String),
    UnknownBody(String),
    InvalidRadii(String),
    UnknownProjection(String),
}

impl std::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ConfigError::Json(msg) => write!(f, "config JSON error: {msg}"),
            ConfigError::UnknownBody(name) => write!(f, "unknown body: {name}"),
            ConfigError::InvalidRadii(name) => {
                write!(f, "body {name} must have positive radii")
            }
            ConfigError::UnknownProjection(name) => write!(f, "unknown projection: {name}"),
        }
    }
}

impl std::error::Error for ConfigError {}

#[derive(Debug, Copy, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum LongitudeDomainSetting {
    #[default]
    #[serde(rename = "0to360")]
    ZeroTo360,
    #[serde(rename = "-180to180")]
    Neg180To180,
}

impl From<LongitudeDomainSetting> for LongitudeDomain {
    fn from(s: LongitudeDomainSetting) -> Self {
        match s {
            LongitudeDomainSetting::ZeroTo360 => LongitudeDomain::ZeroTo360,
            LongitudeDomainSetting::Neg180To180 => LongitudeDomain::Neg180To180,
        }
    }
}

#[derive(Debug, Copy, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LongitudeDirectionSetting {
    #[default]
    PositiveEast,
    PositiveWest,
}

impl From<LongitudeDirectionSetting> for LongitudeDirection {
    fn from(s: LongitudeDirectionSetting) -> Self {
        match s {
            LongitudeDirectionSetting::PositiveEast => LongitudeDirection::PositiveEast,
            LongitudeDirectionSetting::PositiveWest => LongitudeDirection::PositiveWest,
        }
    }
}

#[derive(Debug, Copy, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LatitudeTypeSetting {
    #[default]
    Planetocentric,
    Planetographic,
}

impl From<LatitudeTypeSetting> for LatitudeType {
    fn from(s: LatitudeTypeSetting) -> Self {
        match s {
            LatitudeTypeSetting::Planetocentric => LatitudeType::Planetocentric,
            LatitudeTypeSetting::Planetographic => LatitudeType::Planetographic,
        }
    }
}

/// Host-level map settings, usually loaded from JSON.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MapConfig {
    pub body: String,
    /// `cylindrical`, `north-polar` or `south-polar`.
    pub projection: String,
    pub longitude_domain: LongitudeDomainSetting,
    pub longitude_direction: LongitudeDirectionSetting,
    pub latitude_type: LatitudeTypeSetting,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub coordinate_precision: Option<u32>,
    /// Bounding boxes accumulate into one MULTIPOLYGON instead of replacing.
    pub multi_box: bool,
    pub dateline_shift: bool,
    pub center_on_draw: bool,
}

impl Default for MapConfig {
    fn default() -> Self {
        Self {
            body: "mars".to_string(),
            projection: Projection::Cylindrical.name().to_string(),
            longitude_domain: LongitudeDomainSetting::default(),
            longitude_direction: LongitudeDirectionSetting::default(),
            latitude_type: LatitudeTypeSetting::default(),
            coordinate_precision: None,
            multi_box: false,
            dateline_shift: false,
            center_on_draw: false,
        }
    }
}

impl MapConfig {
    pub fn from_json_str(payload: &str) -> Result<Self, ConfigError> {
        serde_json::from_str(payload).map_err(|e| ConfigError::Json(e.to_string()))
    }

    pub fn to_json_string_pretty(&self) -> Result<String, ConfigError> {
        serde_json::to_string_pretty(self).map_err(|e| ConfigError::Json(e.to_string()))
    }

    pub fn projection(&self) -> Result<Projection, ConfigError> {
        Projection::from_name(&self.projection)
            .ok_or_else(|| ConfigError::UnknownProjection(self.projection.clone()))
    }

    pub fn radii(&self, table: &BodyTable) -> Result<BodyRadii, ConfigError> {
        table.radii(&self.body)
    }

    pub fn display_convention(&self) -> DisplayConvention {
        DisplayConvention {
            domain: self.longitude_domain.into(),
            direction: self.longitude_direction.into(),
            latitude: self.latitude_type.into(),
            precision: self.coordinate_precision,
        }
    }
}
