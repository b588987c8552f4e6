use std::fmt;

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use ts_rs::TS;

// ── Fixture ─────────────────────────────────────────────────────────

/// Everything extracted about one fixture: identity, physical data, and every
/// DMX mode. Field names follow the extraction wire format (camelCase JSON).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct FixtureDescription {
    pub manufacturer: String,
    /// Display name, e.g. "MAC Aura XB".
    pub name: String,
    /// Abbreviated name, e.g. "AuraXB".
    pub short_name: String,
    /// Free-form type tag (MovingHead, Spot, Wash, ...).
    pub fixture_type: String,
    pub dmx_modes: Vec<DmxMode>,
    pub physical: PhysicalProperties,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub wheels: Option<Vec<Wheel>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub beam: Option<BeamProperties>,
}

impl FixtureDescription {
    /// Largest sub-fixture unit count declared by any mode. 0 when no mode
    /// has sub-fixtures.
    pub fn max_sub_fixture_count(&self) -> u32 {
        self.dmx_modes
            .iter()
            .filter_map(|m| m.sub_fixtures.as_ref())
            .map(|sf| sf.count)
            .max()
            .unwrap_or(0)
    }

    pub fn has_sub_fixtures(&self) -> bool {
        self.dmx_modes.iter().any(|m| m.sub_fixtures.is_some())
    }

    /// Wheels as a slice; absent and empty are the same thing downstream.
    pub fn wheels(&self) -> &[Wheel] {
        self.wheels.as_deref().unwrap_or(&[])
    }
}

/// Free-form, unit-bearing strings as printed in the manual ("260 W", "12.5 kg").
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct PhysicalProperties {
    pub weight: String,
    pub width: String,
    pub height: String,
    pub depth: String,
    pub power_consumption: String,
    /// Total pan travel in degrees.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pan_range: Option<f64>,
    /// Total tilt travel in degrees.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tilt_range: Option<f64>,
}

// ── DMX ─────────────────────────────────────────────────────────────

/// One independently selectable control profile of the fixture.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct DmxMode {
    pub name: String,
    /// Declared footprint. Informational only; offsets come from the channels.
    pub channel_count: u32,
    pub channels: Vec<DmxChannel>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sub_fixtures: Option<SubFixtureLayout>,
}

/// A raw channel as extracted, before coarse/fine pairs are merged.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct DmxChannel {
    /// 1-based byte position within the mode.
    pub channel: u16,
    #[serde(rename = "gdtfAttribute")]
    pub attribute: String,
    #[serde(rename = "prettyName")]
    pub label: String,
    pub default_value: u8,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub functions: Option<Vec<ChannelFunction>>,
}

/// A named slice of a channel's 0-255 range with its own behavior.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct ChannelFunction {
    #[serde(rename = "name")]
    pub label: String,
    pub dmx_from: u8,
    pub dmx_to: u8,
    /// Overrides the owning channel's attribute for this function only.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub attribute: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub physical_from: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub physical_to: Option<f64>,
}

/// Repeated per-unit block (one pixel of a pixel bar, one cell of a matrix).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct SubFixtureLayout {
    /// Unit label, e.g. "Pixel".
    pub name: String,
    pub count: u32,
    pub channels: Vec<SubFixtureChannel>,
    /// 1-based channel number where the first unit's block begins.
    pub first_channel: u16,
}

/// One entry of the per-unit template: a raw channel without a channel number.
/// Its position in the template is its offset within the unit block.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct SubFixtureChannel {
    #[serde(rename = "gdtfAttribute")]
    pub attribute: String,
    #[serde(rename = "prettyName")]
    pub label: String,
    pub default_value: u8,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub functions: Option<Vec<ChannelFunction>>,
}

// ── Wheels & Beam ───────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, JsonSchema, TS)]
#[ts(export)]
pub enum WheelKind {
    Color,
    Gobo,
}

impl fmt::Display for WheelKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            WheelKind::Color => write!(f, "Color"),
            WheelKind::Gobo => write!(f, "Gobo"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema, TS)]
#[ts(export)]
pub struct Wheel {
    pub name: String,
    #[serde(rename = "type")]
    pub kind: WheelKind,
    pub slots: Vec<WheelSlot>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema, TS)]
#[ts(export)]
pub struct WheelSlot {
    pub name: String,
    /// Hex RGB, e.g. "#ff0000".
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,
}

/// Optical data. Every field is optional; the generator supplies defaults.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, JsonSchema, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct BeamProperties {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub lamp_type: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub beam_angle: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub field_angle: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub color_temperature: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cri: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub luminous_flux: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub beam_type: Option<String>,
}
