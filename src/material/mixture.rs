use serde::Deserialize;

use crate::units::{Density, Pressure, Temperature, NORMAL_TEMPERATURE, STANDARD_PRESSURE};

use super::element::ElementId;

slotmap::new_key_type! {
    /// Unique identifier for a material in the material catalog.
    pub struct MaterialId;
}

/// Physical state of a material.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MaterialState {
    #[default]
    Undefined,
    Solid,
    Liquid,
    Gas,
}

/// Bulk properties of a material.
#[derive(Debug, Clone, Copy)]
pub struct MaterialProperties {
    pub density: Density,
    pub state: MaterialState,
    pub temperature: Option<Temperature>,
    pub pressure: Option<Pressure>,
}

impl MaterialProperties {
    /// Properties at normal conditions.
    #[must_use]
    pub fn new(density: Density, state: MaterialState) -> Self {
        Self {
            density,
            state,
            temperature: None,
            pressure: None,
        }
    }

    /// Sets explicit temperature and pressure.
    #[must_use]
    pub fn with_conditions(mut self, temperature: Temperature, pressure: Pressure) -> Self {
        self.temperature = Some(temperature);
        self.pressure = Some(pressure);
        self
    }

    /// Temperature, defaulting to normal temperature.
    #[must_use]
    pub fn temperature(&self) -> Temperature {
        self.temperature.unwrap_or(NORMAL_TEMPERATURE)
    }

    /// Pressure, defaulting to standard pressure.
    #[must_use]
    pub fn pressure(&self) -> Pressure {
        self.pressure.unwrap_or(STANDARD_PRESSURE)
    }
}

/// Constituents of a material with their mass fractions.
#[derive(Debug, Clone)]
pub enum MaterialComponents {
    Elements(Vec<(ElementId, f64)>),
    Materials(Vec<(MaterialId, f64)>),
}

/// Data associated with a material.
#[derive(Debug, Clone)]
pub struct MaterialData {
    pub name: String,
    pub properties: MaterialProperties,
    pub components: MaterialComponents,
}
