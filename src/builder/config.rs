//! TOML configuration of the reference apparatus.
//!
//! Every field has a default, so an empty document describes the reference
//! setup: a water tank bored by a steel beam pipe, an iron filter inside the
//! pipe, a heavy-water reflector beyond the pipe end, and a small detector
//! volume at the upstream end of the tank.
//!
//! Lengths are in centimetres, densities in g/cm³.

use std::path::Path;

use serde::Deserialize;
use tracing::info;

use crate::error::ConfigError;
use crate::material::{MaterialProperties, MaterialState};
use crate::math::{translation, Transform};
use crate::units::{vector, Density, Length, MolarMass, NumberDensity, Pressure, Temperature};
use crate::volume::{Colour, OverlapSettings, VisAttributes};

use super::description::{ElementSource, GeometryDescription, MaterialRecipe, SolidRecipe};

/// Top-level apparatus configuration.
#[derive(Debug, Clone, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ApparatusConfig {
    /// Compare every placement against its mother and siblings.
    pub check_overlaps: bool,
    pub world: WorldConfig,
    pub envelope: EnvelopeConfig,
    pub water_tank: WaterTankConfig,
    pub beam_pipe: BeamPipeConfig,
    pub iron_filter: IronFilterConfig,
    pub reflector: ReflectorConfig,
    pub detector: DetectorConfig,
    pub overlap: OverlapSettings,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct WorldConfig {
    /// World size as a multiple of the envelope size.
    pub margin: f64,
    pub material: String,
}

impl Default for WorldConfig {
    fn default() -> Self {
        Self {
            margin: 1.2,
            material: "G4_AIR".into(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct EnvelopeConfig {
    /// Full transverse size.
    pub size_xy_cm: f64,
    /// Full length along the beam.
    pub size_z_cm: f64,
    pub material: String,
}

impl Default for EnvelopeConfig {
    fn default() -> Self {
        Self {
            size_xy_cm: 300.0,
            size_z_cm: 500.0,
            material: "G4_AIR".into(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct WaterTankConfig {
    pub length_cm: f64,
    /// Gap between the tank sides and the envelope.
    pub wall_clearance_cm: f64,
    /// Position of the tank centre along the beam.
    pub z_offset_cm: f64,
    pub material: String,
}

impl Default for WaterTankConfig {
    fn default() -> Self {
        Self {
            length_cm: 380.0,
            wall_clearance_cm: 1.0,
            z_offset_cm: -35.0,
            material: "G4_WATER".into(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct BeamPipeConfig {
    pub inner_radius_cm: f64,
    pub outer_radius_cm: f64,
    pub half_length_cm: f64,
    /// Position of the pipe centre along the beam.
    pub z_offset_cm: f64,
    pub material: String,
    /// Material filling the bore.
    pub fill_material: String,
}

impl Default for BeamPipeConfig {
    fn default() -> Self {
        Self {
            inner_radius_cm: 2.5,
            outer_radius_cm: 2.6,
            half_length_cm: 188.5,
            z_offset_cm: -33.5,
            material: "SS304LSteel".into(),
            fill_material: "G4_AIR".into(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct IronFilterConfig {
    pub half_length_cm: f64,
    pub material: String,
}

impl Default for IronFilterConfig {
    fn default() -> Self {
        Self {
            half_length_cm: 1.0,
            material: "IronFilter".into(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ReflectorConfig {
    /// Length of the reflector core.
    pub length_cm: f64,
    /// Thickness of the container cap at each end of the core.
    pub cap_thickness_cm: f64,
    /// Position of the downstream end of the container.
    pub far_end_z_cm: f64,
    pub material: String,
    pub container_material: String,
}

impl Default for ReflectorConfig {
    fn default() -> Self {
        Self {
            length_cm: 19.0,
            cap_thickness_cm: 0.5,
            far_end_z_cm: 225.0,
            material: "HeavyWater".into(),
            container_material: "SS304LSteel".into(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct DetectorConfig {
    pub length_cm: f64,
    pub material: String,
}

impl Default for DetectorConfig {
    fn default() -> Self {
        Self {
            length_cm: 3.0,
            material: "G4_AIR".into(),
        }
    }
}

impl ApparatusConfig {
    /// Parses a TOML document. Missing fields take their defaults.
    ///
    /// # Errors
    ///
    /// Returns an error if the document is malformed or the resulting
    /// dimensions are inconsistent.
    pub fn from_toml_str(source: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(source)?;
        config.validate()?;
        Ok(config)
    }

    /// Reads and parses a TOML file.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or parsed, or the
    /// dimensions are inconsistent.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let source = std::fs::read_to_string(path)?;
        let config = Self::from_toml_str(&source)?;
        info!(path = %path.display(), "loaded apparatus configuration");
        Ok(config)
    }

    /// Checks that all dimensions are positive, that nested parts are
    /// smaller than what contains them, and that the overlap resolution
    /// does not exceed [`OverlapSettings::MAX_RESOLUTION`].
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Invalid`] naming the first violated constraint.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let positive = [
            ("envelope.size_xy_cm", self.envelope.size_xy_cm),
            ("envelope.size_z_cm", self.envelope.size_z_cm),
            ("water_tank.length_cm", self.water_tank.length_cm),
            ("beam_pipe.inner_radius_cm", self.beam_pipe.inner_radius_cm),
            ("beam_pipe.half_length_cm", self.beam_pipe.half_length_cm),
            ("iron_filter.half_length_cm", self.iron_filter.half_length_cm),
            ("reflector.length_cm", self.reflector.length_cm),
            ("reflector.cap_thickness_cm", self.reflector.cap_thickness_cm),
            ("detector.length_cm", self.detector.length_cm),
            ("overlap.resolution", f64::from(self.overlap.resolution)),
        ];
        for (field, value) in positive {
            if !(value.is_finite() && value > 0.0) {
                return Err(invalid(format!("{field} must be positive, got {value}")));
            }
        }
        if self.overlap.resolution > OverlapSettings::MAX_RESOLUTION {
            return Err(invalid(format!(
                "overlap.resolution must be at most {}, got {}",
                OverlapSettings::MAX_RESOLUTION,
                self.overlap.resolution
            )));
        }
        if self.world.margin < 1.0 {
            return Err(invalid("world.margin must be at least 1"));
        }
        if self.water_tank.wall_clearance_cm < 0.0
            || self.water_tank.wall_clearance_cm >= 0.5 * self.envelope.size_xy_cm
        {
            return Err(invalid("water_tank.wall_clearance_cm leaves no room for the tank"));
        }
        if self.beam_pipe.outer_radius_cm <= self.beam_pipe.inner_radius_cm {
            return Err(invalid("beam_pipe.outer_radius_cm must exceed inner_radius_cm"));
        }
        if self.iron_filter.half_length_cm > self.beam_pipe.half_length_cm {
            return Err(invalid("iron_filter is longer than the beam pipe"));
        }
        if self.detector.length_cm > self.water_tank.length_cm {
            return Err(invalid("detector is longer than the water tank"));
        }
        Ok(())
    }

    /// Describes the apparatus: materials, solids, volumes, and placements.
    #[must_use]
    pub fn describe(&self) -> GeometryDescription {
        let mut description = GeometryDescription::new();
        define_materials(&mut description);

        let cm = Length::from_cm;
        let env_xy = cm(self.envelope.size_xy_cm);
        let env_z = cm(self.envelope.size_z_cm);
        let margin = self.world.margin;
        let pipe = &self.beam_pipe;
        let tank = &self.water_tank;
        let reflector = &self.reflector;

        let tank_z = cm(tank.z_offset_cm);
        let pipe_z = cm(pipe.z_offset_cm);
        let reflector_half = cm(reflector.length_cm) * 0.5;
        let container_half = reflector_half + cm(reflector.cap_thickness_cm);
        let container_z = cm(reflector.far_end_z_cm) - container_half;
        let detector_half = cm(self.detector.length_cm) * 0.5;

        description
            .solid(
                "World",
                SolidRecipe::Box {
                    half_x: env_xy * (0.5 * margin),
                    half_y: env_xy * (0.5 * margin),
                    half_z: env_z * (0.5 * margin),
                },
            )
            .solid(
                "Envelope",
                SolidRecipe::Box {
                    half_x: env_xy * 0.5,
                    half_y: env_xy * 0.5,
                    half_z: env_z * 0.5,
                },
            )
            .solid(
                "WaterContainerBox",
                SolidRecipe::Box {
                    half_x: env_xy * 0.5 - cm(tank.wall_clearance_cm),
                    half_y: env_xy * 0.5 - cm(tank.wall_clearance_cm),
                    half_z: cm(tank.length_cm) * 0.5,
                },
            )
            .solid(
                "BeamPipeBore",
                SolidRecipe::tube(Length::ZERO, cm(pipe.outer_radius_cm), cm(pipe.half_length_cm)),
            )
            .solid(
                "WaterContainer",
                SolidRecipe::Subtraction {
                    a: "WaterContainerBox".into(),
                    b: "BeamPipeBore".into(),
                    transform: along_z(pipe_z - tank_z),
                },
            )
            .solid(
                "SteelLongPipeTub",
                SolidRecipe::tube(
                    cm(pipe.inner_radius_cm),
                    cm(pipe.outer_radius_cm),
                    cm(pipe.half_length_cm),
                ),
            )
            .solid(
                "AirLongPipeTub",
                SolidRecipe::tube(Length::ZERO, cm(pipe.inner_radius_cm), cm(pipe.half_length_cm)),
            )
            .solid(
                "FefliterTub",
                SolidRecipe::tube(
                    Length::ZERO,
                    cm(pipe.inner_radius_cm),
                    cm(self.iron_filter.half_length_cm),
                ),
            )
            .solid(
                "ReflectorContainer",
                SolidRecipe::tube(Length::ZERO, cm(pipe.outer_radius_cm), container_half),
            )
            .solid(
                "Reflector",
                SolidRecipe::tube(Length::ZERO, cm(pipe.inner_radius_cm), reflector_half),
            )
            .solid(
                "Detector",
                SolidRecipe::tube(Length::ZERO, cm(pipe.inner_radius_cm), detector_half),
            );

        description
            .volume("World", "World", &self.world.material)
            .volume("Envelope", "Envelope", &self.envelope.material)
            .volume("WaterTank", "WaterContainer", &tank.material)
            .volume("SteelLongPipeTub", "SteelLongPipeTub", &pipe.material)
            .volume("AirLongPipeTub", "AirLongPipeTub", &pipe.fill_material)
            .volume("FefliterTub", "FefliterTub", &self.iron_filter.material)
            .volume("ReflectorContainer", "ReflectorContainer", &reflector.container_material)
            .volume("Reflector", "Reflector", &reflector.material)
            .volume("Detector", "Detector", &self.detector.material);
        if let Some(container) = description
            .volumes
            .iter_mut()
            .find(|v| v.name == "ReflectorContainer")
        {
            let mut vis = VisAttributes::new(Colour::RED);
            vis.force_aux_edge_visible = true;
            container.vis = Some(vis);
        }

        let check = self.check_overlaps;
        let tank_length = cm(tank.length_cm);
        description
            .world("World", "World", check)
            .place("Envelope", "Envelope", "World", Transform::identity(), check)
            .place("WaterTank", "WaterTank", "Envelope", along_z(tank_z), check)
            .place("SteelLongPipeTub", "SteelLongPipeTub", "Envelope", along_z(pipe_z), check)
            .place("AirLongPipeTub", "AirLongPipeTub", "Envelope", along_z(pipe_z), check)
            .place(
                "FefliterTub",
                "FefliterTub",
                "AirLongPipeTub",
                Transform::identity(),
                check,
            )
            .place(
                "ReflectorContainer",
                "ReflectorContainer",
                "Envelope",
                along_z(container_z),
                check,
            )
            .place(
                "Scintillator",
                "Reflector",
                "ReflectorContainer",
                Transform::identity(),
                check,
            )
            .place(
                "Detector",
                "Detector",
                "WaterTank",
                along_z(-(tank_length - detector_half * 2.0) * 0.5),
                check,
            );
        description
    }
}

impl Default for ApparatusConfig {
    fn default() -> Self {
        Self {
            check_overlaps: true,
            world: WorldConfig::default(),
            envelope: EnvelopeConfig::default(),
            water_tank: WaterTankConfig::default(),
            beam_pipe: BeamPipeConfig::default(),
            iron_filter: IronFilterConfig::default(),
            reflector: ReflectorConfig::default(),
            detector: DetectorConfig::default(),
            overlap: OverlapSettings::default(),
        }
    }
}

fn invalid(reason: impl Into<String>) -> ConfigError {
    ConfigError::Invalid(reason.into())
}

fn along_z(z: Length) -> Transform {
    translation(vector(Length::ZERO, Length::ZERO, z))
}

/// Elements and materials of the scintillators, moderators, and structure.
fn define_materials(description: &mut GeometryDescription) {
    let g_per_mol = MolarMass::from_g_per_mol;
    let fixed = |mass| ElementSource::MolarMass(g_per_mol(mass));
    let props = |density, state| MaterialProperties::new(Density::from_g_per_cm3(density), state);
    let one_atmosphere = Pressure::from_atmospheres(1.0);

    description
        .isotope("D_Iso", 1, 2, g_per_mol(2.014_102))
        .element("Hydrogen", "H", 1, fixed(1.007_9))
        .element("Carbon", "C", 6, fixed(12.011))
        .element("Oxygen", "O", 8, fixed(15.999))
        .element(
            "Deuterium",
            "D",
            1,
            ElementSource::Isotopes(vec![("D_Iso".into(), 1.0)]),
        )
        .element("Silicon", "Si", 14, fixed(28.086))
        .element("Chromium", "Cr", 24, fixed(51.996))
        .element("Manganese", "Mn", 25, fixed(54.938))
        .element("Iron", "Fe", 26, fixed(55.85))
        .element("Nickel", "Ni", 28, fixed(58.693));

    description
        .material("G4_AIR", MaterialRecipe::Reference)
        .material("G4_WATER", MaterialRecipe::Reference)
        .material(
            "EJ276",
            MaterialRecipe::NumberDensities {
                state: MaterialState::Solid,
                densities: vec![
                    ("H".into(), NumberDensity::per_cm3(4.647e22)),
                    ("C".into(), NumberDensity::per_cm3(4.944e22)),
                ],
            },
        )
        .material(
            "C6H6",
            MaterialRecipe::AtomCounts {
                properties: props(0.877, MaterialState::Liquid),
                atoms: vec![("Carbon".into(), 6), ("Hydrogen".into(), 6)],
            },
        )
        .material(
            "C6D6",
            MaterialRecipe::AtomCounts {
                properties: props(0.950, MaterialState::Liquid),
                atoms: vec![("Carbon".into(), 6), ("Deuterium".into(), 6)],
            },
        )
        .material(
            "EJ315",
            MaterialRecipe::Mixture {
                properties: props(0.863, MaterialState::Liquid),
                fractions: vec![
                    ("C6D6".into(), 141.0 / 142.0),
                    ("C6H6".into(), 1.0 / 142.0),
                ],
            },
        )
        .material(
            "SS304LSteel",
            MaterialRecipe::Elements {
                properties: props(8.00, MaterialState::Solid),
                fractions: vec![
                    ("Iron".into(), 0.65),
                    ("Chromium".into(), 0.20),
                    ("Nickel".into(), 0.12),
                    ("Manganese".into(), 0.02),
                    ("Silicon".into(), 0.01),
                ],
            },
        )
        .material(
            "HeavyWater",
            MaterialRecipe::AtomCounts {
                properties: props(1.11, MaterialState::Liquid)
                    .with_conditions(Temperature::from_kelvin(293.15), one_atmosphere),
                atoms: vec![("Deuterium".into(), 2), ("Oxygen".into(), 1)],
            },
        )
        .material(
            "IronFilter",
            MaterialRecipe::Elements {
                properties: props(7.86, MaterialState::Solid),
                fractions: vec![("Iron".into(), 1.0)],
            },
        )
        .material(
            "C6D8",
            MaterialRecipe::AtomCounts {
                properties: props(0.767, MaterialState::Liquid)
                    .with_conditions(Temperature::from_kelvin(298.15), one_atmosphere),
                atoms: vec![("Carbon".into(), 6), ("Deuterium".into(), 8)],
            },
        );
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use approx::assert_relative_eq;

    use super::*;

    #[test]
    fn empty_document_gives_reference_setup() {
        let config = ApparatusConfig::from_toml_str("").unwrap();
        assert!(config.check_overlaps);
        assert_relative_eq!(config.envelope.size_z_cm, 500.0);
        assert_relative_eq!(config.beam_pipe.outer_radius_cm, 2.6);
        assert_eq!(config.overlap, OverlapSettings::default());
    }

    #[test]
    fn partial_document_overrides_fields() {
        let config = ApparatusConfig::from_toml_str(
            r#"
            check_overlaps = false

            [water_tank]
            length_cm = 300.0

            [detector]
            material = "EJ276"

            [overlap]
            resolution = 4
            "#,
        )
        .unwrap();
        assert!(!config.check_overlaps);
        assert_relative_eq!(config.water_tank.length_cm, 300.0);
        assert_relative_eq!(config.water_tank.z_offset_cm, -35.0);
        assert_eq!(config.detector.material, "EJ276");
        assert_eq!(config.overlap.resolution, 4);
        assert_eq!(config.overlap.max_siblings, 256);
    }

    #[test]
    fn inconsistent_pipe_is_rejected() {
        let err = ApparatusConfig::from_toml_str(
            r"
            [beam_pipe]
            inner_radius_cm = 3.0
            ",
        )
        .unwrap_err();
        assert!(matches!(err, ConfigError::Invalid(_)));
    }

    #[test]
    fn oversized_resolution_is_rejected() {
        let err = ApparatusConfig::from_toml_str("[overlap]\nresolution = 4294967295\n")
            .unwrap_err();
        assert!(matches!(err, ConfigError::Invalid(_)));

        let config = ApparatusConfig::from_toml_str("[overlap]\nresolution = 256\n").unwrap();
        assert_eq!(config.overlap.resolution, OverlapSettings::MAX_RESOLUTION);
    }

    #[test]
    fn unknown_field_is_a_parse_error() {
        let err = ApparatusConfig::from_toml_str("[detector]\nlenght_cm = 3.0\n").unwrap_err();
        assert!(matches!(err, ConfigError::Parse(_)));
    }

    #[test]
    fn missing_file_is_an_io_error() {
        let err = ApparatusConfig::load("/nonexistent/apparatus.toml").unwrap_err();
        assert!(matches!(err, ConfigError::Io(_)));
    }

    #[test]
    fn description_places_detector_at_tank_entrance() {
        let description = ApparatusConfig::default().describe();
        let detector = description
            .placements
            .iter()
            .find(|p| p.name == "Detector")
            .unwrap();
        assert_eq!(detector.parent.as_deref(), Some("WaterTank"));
        assert_relative_eq!(detector.transform.translation.vector.z, -1885.0, epsilon = 1e-9);

        let container = description
            .placements
            .iter()
            .find(|p| p.name == "ReflectorContainer")
            .unwrap();
        assert_relative_eq!(container.transform.translation.vector.z, 2150.0, epsilon = 1e-9);
        assert_eq!(description.placements.len(), 9);

        let names: Vec<_> = description.placements.iter().map(|p| p.name.as_str()).collect();
        for name in ["SteelLongPipeTub", "AirLongPipeTub", "FefliterTub", "Scintillator"] {
            assert!(names.contains(&name), "{name} not placed");
        }
    }
}
