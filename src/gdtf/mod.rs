//! GDTF 1.2 `description.xml` generation.
//!
//! [`generate_description`] is a pure function of the fixture: no I/O, no
//! shared state. The only non-deterministic part is the FixtureTypeID, which
//! callers can pin through [`DescriptorOptions::fixture_type_id`].

mod emitter;
pub mod feature;
pub mod geometry;
mod markup;
pub mod resolver;
pub mod values;

use tracing::info;
use uuid::Uuid;

use crate::model::FixtureDescription;

pub use emitter::{attribute_catalog, ResolvedMode};
pub use feature::Feature;
pub use resolver::{resolve_channels, resolve_template, ByteOffsets, ResolvedChannel, SubFixtureTemplate};

/// Knobs for descriptor generation. Defaults reproduce the standard layout.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DescriptorOptions {
    /// Fixed FixtureTypeID; a random v4 UUID is used when None.
    pub fixture_type_id: Option<Uuid>,
    /// Top-level geometry every mode and global channel attaches to.
    pub base_geometry: String,
    /// Beam geometry; the per-unit template when sub-fixtures exist.
    pub beam_geometry: String,
    /// Unit references are named `{prefix}_{n}`.
    pub unit_reference_prefix: String,
}

impl Default for DescriptorOptions {
    fn default() -> Self {
        Self {
            fixture_type_id: None,
            base_geometry: "Base".to_string(),
            beam_geometry: "Beam".to_string(),
            unit_reference_prefix: "Pixel".to_string(),
        }
    }
}

/// Render the descriptor with default options and a random FixtureTypeID.
pub fn generate_description(fixture: &FixtureDescription) -> String {
    generate_description_with(fixture, &DescriptorOptions::default())
}

/// Render the descriptor. Byte-identical for identical input when
/// `options.fixture_type_id` is set.
pub fn generate_description_with(fixture: &FixtureDescription, options: &DescriptorOptions) -> String {
    let id = options.fixture_type_id.unwrap_or_else(Uuid::new_v4);
    let fixture_type_id = format_fixture_type_id(id);
    let text = emitter::render(fixture, options, &fixture_type_id);
    info!(
        fixture = %fixture.name,
        modes = fixture.dmx_modes.len(),
        fixture_type_id = %fixture_type_id,
        bytes = text.len(),
        "generated descriptor"
    );
    text
}

/// Upper-case hyphenated form used for FixtureTypeID.
pub fn format_fixture_type_id(id: Uuid) -> String {
    id.hyphenated().to_string().to_uppercase()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fixture_type_id_is_upper_case_hyphenated() {
        let id = Uuid::from_u128(0x6f9a_1c2e_0b4d_4e5f_a1b2_c3d4_e5f6_a7b8);
        assert_eq!(format_fixture_type_id(id), "6F9A1C2E-0B4D-4E5F-A1B2-C3D4E5F6A7B8");
    }

    #[test]
    fn default_options_use_standard_geometry_names() {
        let options = DescriptorOptions::default();
        assert_eq!(options.base_geometry, "Base");
        assert_eq!(options.beam_geometry, "Beam");
        assert_eq!(options.unit_reference_prefix, "Pixel");
        assert!(options.fixture_type_id.is_none());
    }
}
