use indexmap::IndexMap;

use super::feature::Feature;
use super::geometry::emit_geometries;
use super::markup::Markup;
use super::resolver::{resolve_channels, resolve_template, ResolvedChannel, SubFixtureTemplate};
use super::values::{
    default_physical_range, dmx_value, fixed6, parse_weight, sanitize_name, slot_color,
};
use super::DescriptorOptions;
use crate::model::{DmxMode, FixtureDescription, PhysicalProperties};

const DATA_VERSION: &str = "1.2";
const ZERO: &str = "0.000000";
const VIRTUAL_DIMMER: &str = "Dimmer";

/// One mode with its global channels and per-unit template resolved.
#[derive(Debug)]
pub struct ResolvedMode<'a> {
    pub mode: &'a DmxMode,
    pub channels: Vec<ResolvedChannel<'a>>,
    pub template: Option<SubFixtureTemplate<'a>>,
}

impl<'a> ResolvedMode<'a> {
    pub fn new(mode: &'a DmxMode) -> Self {
        Self {
            mode,
            channels: resolve_channels(&mode.channels),
            template: mode.sub_fixtures.as_ref().map(resolve_template),
        }
    }
}

pub fn render(fixture: &FixtureDescription, options: &DescriptorOptions, fixture_type_id: &str) -> String {
    let modes: Vec<ResolvedMode<'_>> = fixture.dmx_modes.iter().map(ResolvedMode::new).collect();
    let mut out = Markup::new();

    out.raw(r#"<?xml version="1.0" encoding="UTF-8"?>"#);
    out.open(0, "GDTF", &[("DataVersion", DATA_VERSION)]);
    out.open(
        1,
        "FixtureType",
        &[
            ("Name", sanitize_name(&fixture.name).as_str()),
            ("ShortName", fixture.short_name.as_str()),
            ("LongName", fixture.name.as_str()),
            ("Manufacturer", fixture.manufacturer.as_str()),
            ("Description", ""),
            ("FixtureTypeID", fixture_type_id),
            ("CanHaveChildren", "No"),
            ("RefFT", ""),
        ],
    );

    emit_attribute_definitions(&mut out, &modes);
    emit_wheels(&mut out, fixture);
    emit_physical_descriptions(&mut out, &fixture.physical);
    out.empty(2, "Models", &[]);
    emit_geometries(&mut out, fixture, options);

    out.open(2, "DMXModes", &[]);
    for mode in &modes {
        emit_mode(&mut out, mode, &fixture.physical, options);
    }
    out.close(2, "DMXModes");

    out.empty(2, "Revisions", &[]);
    out.empty(2, "FTPresets", &[]);
    out.empty(2, "Protocols", &[]);
    out.close(1, "FixtureType");
    out.close(0, "GDTF");
    out.finish()
}

// ── Attribute catalog ───────────────────────────────────────────────

/// Every attribute across all modes, first-seen label wins.
pub fn attribute_catalog<'m>(modes: &'m [ResolvedMode<'_>]) -> IndexMap<&'m str, &'m str> {
    let mut catalog: IndexMap<&str, &str> = IndexMap::new();
    for mode in modes {
        for ch in &mode.channels {
            catalog.entry(ch.attribute.as_ref()).or_insert(ch.label);
        }
        if let Some(template) = &mode.template {
            for ch in &template.channels {
                catalog.entry(ch.attribute.as_ref()).or_insert(ch.label);
            }
            catalog.entry(VIRTUAL_DIMMER).or_insert(VIRTUAL_DIMMER);
        }
    }
    catalog
}

fn emit_attribute_definitions(out: &mut Markup, modes: &[ResolvedMode<'_>]) {
    out.open(2, "AttributeDefinitions", &[]);
    out.empty(3, "ActivationGroups", &[]);
    out.open(3, "FeatureGroups", &[]);
    for feature in Feature::ALL {
        out.open(4, "FeatureGroup", &[("Name", feature.name()), ("Pretty", feature.name())]);
        out.empty(5, "Feature", &[("Name", feature.name())]);
        out.close(4, "FeatureGroup");
    }
    out.close(3, "FeatureGroups");

    out.open(3, "Attributes", &[]);
    for (attribute, label) in attribute_catalog(modes) {
        out.empty(
            4,
            "Attribute",
            &[
                ("Name", attribute),
                ("Pretty", label),
                ("Feature", Feature::classify(attribute).reference().as_str()),
                ("PhysicalUnit", "None"),
            ],
        );
    }
    out.close(3, "Attributes");
    out.close(2, "AttributeDefinitions");
}

// ── Wheels & physical description ───────────────────────────────────

fn emit_wheels(out: &mut Markup, fixture: &FixtureDescription) {
    let wheels = fixture.wheels();
    if wheels.is_empty() {
        out.empty(2, "Wheels", &[]);
        return;
    }
    out.open(2, "Wheels", &[]);
    for wheel in wheels {
        out.open(3, "Wheel", &[("Name", wheel.name.as_str())]);
        for slot in &wheel.slots {
            match &slot.color {
                Some(color) => out.empty(
                    4,
                    "Slot",
                    &[("Name", slot.name.as_str()), ("Color", slot_color(color).as_str())],
                ),
                None => out.empty(4, "Slot", &[("Name", slot.name.as_str())]),
            }
        }
        out.close(3, "Wheel");
    }
    out.close(2, "Wheels");
}

fn emit_physical_descriptions(out: &mut Markup, physical: &PhysicalProperties) {
    out.open(2, "PhysicalDescriptions", &[]);
    out.empty(3, "ColorSpace", &[("Name", "Default"), ("Mode", "sRGB")]);
    for section in [
        "AdditionalColorSpaces",
        "Gamuts",
        "Filters",
        "Emitters",
        "DMXProfiles",
        "CRIs",
        "Connectors",
    ] {
        out.empty(3, section, &[]);
    }
    out.open(3, "Properties", &[]);
    out.empty(4, "OperatingTemperature", &[("Low", ZERO), ("High", "40.000000")]);
    out.empty(4, "Weight", &[("Value", parse_weight(&physical.weight))]);
    out.empty(4, "LegHeight", &[("Value", ZERO)]);
    out.close(3, "Properties");
    out.close(2, "PhysicalDescriptions");
}

// ── DMX modes ───────────────────────────────────────────────────────

fn emit_mode(
    out: &mut Markup,
    mode: &ResolvedMode<'_>,
    physical: &PhysicalProperties,
    options: &DescriptorOptions,
) {
    out.open(
        3,
        "DMXMode",
        &[
            ("Name", mode.mode.name.as_str()),
            ("Description", ""),
            ("Geometry", options.base_geometry.as_str()),
        ],
    );
    out.open(4, "DMXChannels", &[]);
    for ch in &mode.channels {
        emit_channel(out, ch, &options.base_geometry, physical);
    }
    // Per-unit channels are defined once on the template geometry; the
    // geometry references replicate them.
    if let Some(template) = &mode.template {
        for ch in &template.channels {
            emit_channel(out, ch, &options.beam_geometry, physical);
        }
        emit_virtual_dimmer(out, &options.beam_geometry);
    }
    out.close(4, "DMXChannels");

    match &mode.template {
        Some(template) => emit_relations(out, template, &options.beam_geometry),
        None => out.empty(4, "Relations", &[]),
    }
    out.empty(4, "FTMacros", &[]);
    out.close(3, "DMXMode");
}

/// Name of the first channel function, as referenced by InitialFunction and relations.
fn first_function_name(ch: &ResolvedChannel<'_>) -> String {
    ch.functions.first().map_or_else(
        || format!("{} 1", ch.attribute),
        |f| sanitize_name(&f.label),
    )
}

fn emit_channel(out: &mut Markup, ch: &ResolvedChannel<'_>, geometry: &str, physical: &PhysicalProperties) {
    let attribute = ch.attribute.as_ref();
    let bytes = ch.byte_count();
    let feature = ch.feature();
    let highlight = if feature.highlights() {
        dmx_value(255, bytes)
    } else {
        "None".to_string()
    };
    let initial_function = format!("{geometry}_{attribute}.{attribute}.{}", first_function_name(ch));
    let default = dmx_value(ch.default_value, bytes);
    let range = default_physical_range(attribute, physical);

    out.open(
        5,
        "DMXChannel",
        &[
            ("DMXBreak", "1"),
            ("Offset", ch.offsets.to_string().as_str()),
            ("Highlight", highlight.as_str()),
            ("Geometry", geometry),
            ("InitialFunction", initial_function.as_str()),
        ],
    );
    out.open(
        6,
        "LogicalChannel",
        &[
            ("Attribute", attribute),
            ("Snap", "No"),
            ("Master", if feature == Feature::Dimmer { "Grand" } else { "None" }),
            ("MibFade", ZERO),
            ("DMXChangeTimeLimit", ZERO),
        ],
    );

    if ch.functions.is_empty() {
        let name = format!("{attribute} 1");
        emit_channel_function(out, &name, &default, &dmx_value(0, bytes), range.from, range.to, attribute);
    } else {
        for function in ch.functions {
            let bounds = range.overridden(function.physical_from, function.physical_to);
            emit_channel_function(
                out,
                &sanitize_name(&function.label),
                &default,
                &dmx_value(function.dmx_from, bytes),
                bounds.from,
                bounds.to,
                function.attribute.as_deref().unwrap_or(attribute),
            );
        }
    }

    out.close(6, "LogicalChannel");
    out.close(5, "DMXChannel");
}

fn emit_channel_function(
    out: &mut Markup,
    name: &str,
    default: &str,
    dmx_from: &str,
    physical_from: f64,
    physical_to: f64,
    attribute: &str,
) {
    // Min/Max mirror the physical bounds as given, even when descending.
    let from = fixed6(physical_from);
    let to = fixed6(physical_to);
    out.empty(
        7,
        "ChannelFunction",
        &[
            ("Name", name),
            ("Default", default),
            ("DMXFrom", dmx_from),
            ("PhysicalFrom", from.as_str()),
            ("PhysicalTo", to.as_str()),
            ("RealFade", ZERO),
            ("RealAcceleration", ZERO),
            ("Min", from.as_str()),
            ("Max", to.as_str()),
            ("CustomName", ""),
            ("OriginalAttribute", ""),
            ("Attribute", attribute),
        ],
    );
}

/// Offset-less intensity master shared by every unit of the template geometry.
fn emit_virtual_dimmer(out: &mut Markup, geometry: &str) {
    let initial_function = format!("{geometry}_{VIRTUAL_DIMMER}.{VIRTUAL_DIMMER}.{VIRTUAL_DIMMER} 1");
    out.open(
        5,
        "DMXChannel",
        &[
            ("DMXBreak", "1"),
            ("Offset", ""),
            ("Highlight", "255/1"),
            ("Geometry", geometry),
            ("InitialFunction", initial_function.as_str()),
        ],
    );
    out.open(
        6,
        "LogicalChannel",
        &[
            ("Attribute", VIRTUAL_DIMMER),
            ("Snap", "No"),
            ("Master", "None"),
            ("MibFade", ZERO),
            ("DMXChangeTimeLimit", ZERO),
        ],
    );
    emit_channel_function(out, "Dimmer 1", "255/1", "0/1", 0.0, 1.0, VIRTUAL_DIMMER);
    out.close(6, "LogicalChannel");
    out.close(5, "DMXChannel");
}

/// Every color channel of the template is multiplied by the virtual dimmer.
fn emit_relations(out: &mut Markup, template: &SubFixtureTemplate<'_>, geometry: &str) {
    let master = format!("{geometry}_{VIRTUAL_DIMMER}");
    out.open(4, "Relations", &[]);
    for ch in template.channels.iter().filter(|ch| ch.feature() == Feature::Color) {
        let attribute = ch.attribute.as_ref();
        let name = format!("{master}_{attribute}");
        let follower = format!("{geometry}_{attribute}.{attribute}.{}", first_function_name(ch));
        out.empty(
            5,
            "Relation",
            &[
                ("Name", name.as_str()),
                ("Master", master.as_str()),
                ("Follower", follower.as_str()),
                ("Type", "Multiply"),
            ],
        );
    }
    out.close(4, "Relations");
}
