//! Geometry tree. Flat fixtures get one geometry holding one beam. Fixtures
//! with sub-fixtures get a top-level template beam plus one geometry
//! reference per unit, each carrying the unit's DMX offset.

use tracing::debug;

use super::markup::Markup;
use super::resolver::unit_offsets;
use super::values::{fixed6, plain_number, power_watts, IDENTITY_MATRIX};
use super::DescriptorOptions;
use crate::model::{BeamProperties, FixtureDescription};

pub const DEFAULT_LAMP_TYPE: &str = "Discharge";
pub const DEFAULT_BEAM_ANGLE: f64 = 25.0;
pub const DEFAULT_COLOR_TEMPERATURE: f64 = 6000.0;
pub const DEFAULT_CRI: f64 = 100.0;
pub const DEFAULT_LUMINOUS_FLUX: f64 = 10000.0;
pub const DEFAULT_BEAM_TYPE: &str = "Wash";
const BEAM_RADIUS: &str = "0.050000";

/// Optical data with defaults filled in.
#[derive(Debug, Clone, PartialEq)]
pub struct BeamSpec<'a> {
    pub lamp_type: &'a str,
    pub beam_angle: f64,
    pub field_angle: f64,
    pub color_temperature: f64,
    pub cri: f64,
    pub luminous_flux: f64,
    pub beam_type: &'a str,
    pub power_consumption: f64,
}

impl<'a> BeamSpec<'a> {
    pub fn from_fixture(fixture: &'a FixtureDescription) -> Self {
        static NO_BEAM: BeamProperties = BeamProperties {
            lamp_type: None,
            beam_angle: None,
            field_angle: None,
            color_temperature: None,
            cri: None,
            luminous_flux: None,
            beam_type: None,
        };
        let beam = fixture.beam.as_ref().unwrap_or(&NO_BEAM);
        let beam_angle = beam.beam_angle.unwrap_or(DEFAULT_BEAM_ANGLE);
        Self {
            lamp_type: beam.lamp_type.as_deref().unwrap_or(DEFAULT_LAMP_TYPE),
            beam_angle,
            field_angle: beam.field_angle.unwrap_or(beam_angle),
            color_temperature: beam.color_temperature.unwrap_or(DEFAULT_COLOR_TEMPERATURE),
            cri: beam.cri.unwrap_or(DEFAULT_CRI),
            luminous_flux: beam.luminous_flux.unwrap_or(DEFAULT_LUMINOUS_FLUX),
            beam_type: beam.beam_type.as_deref().unwrap_or(DEFAULT_BEAM_TYPE),
            power_consumption: power_watts(&fixture.physical.power_consumption),
        }
    }

    /// Share of power and flux carried by one of `units` identical emitters.
    pub fn per_unit(self, units: u32) -> Self {
        let units = f64::from(units.max(1));
        Self {
            power_consumption: self.power_consumption / units,
            luminous_flux: self.luminous_flux / units,
            ..self
        }
    }

    fn emit(&self, out: &mut Markup, depth: usize, name: &str) {
        out.empty(
            depth,
            "Beam",
            &[
                ("Name", name),
                ("Position", IDENTITY_MATRIX),
                ("LampType", self.lamp_type),
                ("PowerConsumption", fixed6(self.power_consumption).as_str()),
                ("LuminousFlux", fixed6(self.luminous_flux).as_str()),
                ("ColorTemperature", fixed6(self.color_temperature).as_str()),
                ("BeamAngle", fixed6(self.beam_angle).as_str()),
                ("BeamRadius", BEAM_RADIUS),
                ("FieldAngle", fixed6(self.field_angle).as_str()),
                ("BeamType", self.beam_type),
                ("ColorRenderingIndex", plain_number(self.cri).as_str()),
            ],
        );
    }
}

pub fn emit_geometries(out: &mut Markup, fixture: &FixtureDescription, options: &DescriptorOptions) {
    let beam = BeamSpec::from_fixture(fixture);
    out.open(2, "Geometries", &[]);
    if fixture.has_sub_fixtures() {
        emit_replicated(out, fixture, options, beam);
    } else {
        out.open(3, "Geometry", &[("Name", options.base_geometry.as_str()), ("Position", IDENTITY_MATRIX)]);
        beam.emit(out, 4, options.beam_geometry.as_str());
        out.close(3, "Geometry");
    }
    out.close(2, "Geometries");
}

fn emit_replicated(
    out: &mut Markup,
    fixture: &FixtureDescription,
    options: &DescriptorOptions,
    beam: BeamSpec<'_>,
) {
    let max_units = fixture.max_sub_fixture_count();
    // Modes may disagree on the unit count; the largest one defines the tree.
    let layout = fixture
        .dmx_modes
        .iter()
        .filter_map(|m| m.sub_fixtures.as_ref())
        .find(|sf| sf.count == max_units);
    let offsets = layout.map(unit_offsets).unwrap_or_default();
    debug!(units = max_units, "emitting replicated geometry");

    // Template beam must be top-level to be referenced.
    beam.per_unit(max_units).emit(out, 3, options.beam_geometry.as_str());

    out.open(3, "Geometry", &[("Name", options.base_geometry.as_str()), ("Position", IDENTITY_MATRIX)]);
    for (index, offset) in offsets.iter().enumerate() {
        let name = format!("{}_{}", options.unit_reference_prefix, index + 1);
        out.open(
            4,
            "GeometryReference",
            &[
                ("Name", name.as_str()),
                ("Geometry", options.beam_geometry.as_str()),
                ("Position", IDENTITY_MATRIX),
            ],
        );
        out.empty(5, "Break", &[("DMXBreak", "1"), ("DMXOffset", offset.to_string().as_str())]);
        out.close(4, "GeometryReference");
    }
    out.close(3, "Geometry");
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used, clippy::indexing_slicing)]
mod tests {
    use super::*;
    use crate::model::{
        DmxMode, PhysicalProperties, SubFixtureChannel, SubFixtureLayout,
    };

    fn fixture(beam: Option<BeamProperties>, layouts: &[(u32, u16, usize)]) -> FixtureDescription {
        let modes = layouts
            .iter()
            .map(|&(count, first_channel, template_len)| DmxMode {
                name: format!("{count} units"),
                channel_count: 0,
                channels: Vec::new(),
                sub_fixtures: Some(SubFixtureLayout {
                    name: "Pixel".to_string(),
                    count,
                    channels: (0..template_len)
                        .map(|i| SubFixtureChannel {
                            attribute: format!("ColorAdd_{i}"),
                            label: format!("C{i}"),
                            default_value: 0,
                            functions: None,
                        })
                        .collect(),
                    first_channel,
                }),
            })
            .collect();
        FixtureDescription {
            manufacturer: "Acme".to_string(),
            name: "Bar".to_string(),
            short_name: "Bar".to_string(),
            fixture_type: "LED".to_string(),
            dmx_modes: modes,
            physical: PhysicalProperties {
                weight: "3 kg".to_string(),
                width: String::new(),
                height: String::new(),
                depth: String::new(),
                power_consumption: "260 W".to_string(),
                pan_range: None,
                tilt_range: None,
            },
            wheels: None,
            beam,
        }
    }

    #[test]
    fn beam_defaults() {
        let f = fixture(None, &[]);
        let beam = BeamSpec::from_fixture(&f);
        assert_eq!(beam.lamp_type, "Discharge");
        assert!((beam.beam_angle - 25.0).abs() < f64::EPSILON);
        assert!((beam.field_angle - 25.0).abs() < f64::EPSILON);
        assert!((beam.color_temperature - 6000.0).abs() < f64::EPSILON);
        assert!((beam.cri - 100.0).abs() < f64::EPSILON);
        assert!((beam.luminous_flux - 10000.0).abs() < f64::EPSILON);
        assert_eq!(beam.beam_type, "Wash");
        assert!((beam.power_consumption - 260.0).abs() < f64::EPSILON);
    }

    #[test]
    fn field_angle_follows_beam_angle() {
        let f = fixture(
            Some(BeamProperties {
                beam_angle: Some(7.5),
                lamp_type: Some("LED".to_string()),
                ..BeamProperties::default()
            }),
            &[],
        );
        let beam = BeamSpec::from_fixture(&f);
        assert!((beam.field_angle - 7.5).abs() < f64::EPSILON);
        assert_eq!(beam.lamp_type, "LED");
    }

    #[test]
    fn flat_geometry_holds_one_beam() {
        let f = fixture(None, &[]);
        let mut out = Markup::new();
        emit_geometries(&mut out, &f, &DescriptorOptions::default());
        let text = out.finish();
        assert!(text.contains("      <Geometry Name=\"Base\""));
        assert!(text.contains("        <Beam Name=\"Beam\""));
        assert!(text.contains("PowerConsumption=\"260.000000\""));
        assert!(text.contains("ColorRenderingIndex=\"100\""));
        assert!(!text.contains("GeometryReference"));
    }

    #[test]
    fn replicated_geometry_uses_largest_layout() {
        let f = fixture(None, &[(4, 10, 3), (8, 5, 4)]);
        let mut out = Markup::new();
        emit_geometries(&mut out, &f, &DescriptorOptions::default());
        let text = out.finish();

        let offsets: Vec<&str> = text
            .lines()
            .filter_map(|l| l.split("DMXOffset=\"").nth(1))
            .map(|rest| rest.trim_end_matches("\"/>"))
            .collect();
        assert_eq!(offsets, ["5", "9", "13", "17", "21", "25", "29", "33"]);
        assert!(text.contains("<GeometryReference Name=\"Pixel_8\" Geometry=\"Beam\""));
        // 260 W and 10000 lm split across 8 units
        assert!(text.contains("PowerConsumption=\"32.500000\""));
        assert!(text.contains("LuminousFlux=\"1250.000000\""));
        assert!(text.starts_with("    <Geometries>\n      <Beam Name=\"Beam\""));
    }

    #[test]
    fn zero_units_emit_no_references() {
        let f = fixture(None, &[(0, 1, 3)]);
        let mut out = Markup::new();
        emit_geometries(&mut out, &f, &DescriptorOptions::default());
        let text = out.finish();
        assert!(!text.contains("GeometryReference"));
        assert!(text.contains("PowerConsumption=\"260.000000\""));
    }

    #[test]
    fn per_unit_share_rounds_halfway_up() {
        let mut f = fixture(None, &[(128, 1, 1)]);
        f.physical.power_consumption = "261 W".to_string();
        let mut out = Markup::new();
        emit_geometries(&mut out, &f, &DescriptorOptions::default());
        let text = out.finish();
        // 261 / 128 = 2.0390625 exactly
        assert!(text.contains("PowerConsumption=\"2.039063\""));
        assert!(text.contains("LuminousFlux=\"78.125000\""));
    }
}
