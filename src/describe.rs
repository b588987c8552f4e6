use crate::gdtf::{resolve_channels, resolve_template, Feature};
use crate::model::{DmxMode, FixtureDescription};

/// Human-readable summary of the fixture: identity, physical data, wheels, and
/// every mode's channel table.
pub fn describe_fixture(fixture: &FixtureDescription) -> String {
    let mut lines = Vec::new();

    lines.push(format!(
        "{} {} ({})",
        fixture.manufacturer, fixture.name, fixture.short_name
    ));
    if !fixture.fixture_type.is_empty() {
        lines.push(format!("Type: {}", fixture.fixture_type));
    }

    let p = &fixture.physical;
    lines.push(format!(
        "Weight: {}, Power: {}, Size: {} x {} x {}",
        p.weight, p.power_consumption, p.width, p.height, p.depth
    ));
    if let Some(pan) = p.pan_range {
        lines.push(format!("Pan range: {pan}°"));
    }
    if let Some(tilt) = p.tilt_range {
        lines.push(format!("Tilt range: {tilt}°"));
    }

    // Wheels
    let wheels = fixture.wheels();
    if !wheels.is_empty() {
        lines.push(format!("\nWheels ({})", wheels.len()));
        for w in wheels {
            lines.push(format!("  - {} ({}, {} slots)", w.name, w.kind, w.slots.len()));
        }
    }

    lines.push(format!("\nModes ({})", fixture.dmx_modes.len()));
    for mode in &fixture.dmx_modes {
        lines.push(String::new());
        lines.push(describe_mode(mode));
    }

    lines.join("\n")
}

/// Channel table for one mode, then the resolved channel view the descriptor
/// is built from.
pub fn describe_mode(mode: &DmxMode) -> String {
    let mut lines = Vec::new();
    lines.push(format!("{} ({} channels)", mode.name, mode.channel_count));

    for ch in &mode.channels {
        lines.push(format!(
            "  {:03}  {:<20} {:<24} default {}",
            ch.channel, ch.attribute, ch.label, ch.default_value
        ));
    }

    if let Some(layout) = &mode.sub_fixtures {
        lines.push(format!(
            "  {} x {} from channel {}, {} channels each",
            layout.count,
            layout.name,
            layout.first_channel,
            layout.channels.len()
        ));
    }

    lines.push("  Resolved:".to_string());
    for rc in resolve_channels(&mode.channels) {
        lines.push(format!(
            "    {:<20} offset {:<7} {}",
            rc.attribute,
            rc.offsets.to_string(),
            rc.feature()
        ));
    }
    if let Some(layout) = &mode.sub_fixtures {
        let template = resolve_template(layout);
        for rc in &template.channels {
            let marker = if rc.feature() == Feature::Color { " (follows dimmer)" } else { "" };
            lines.push(format!(
                "    {:<20} per unit +{}{marker}",
                rc.attribute, rc.offsets
            ));
        }
    }

    lines.join("\n")
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used, clippy::indexing_slicing)]
mod tests {
    use super::*;
    use crate::model::{DmxChannel, SubFixtureChannel, SubFixtureLayout};

    fn channel(channel: u16, attribute: &str, label: &str) -> DmxChannel {
        DmxChannel {
            channel,
            attribute: attribute.to_string(),
            label: label.to_string(),
            default_value: 0,
            functions: None,
        }
    }

    fn sub_channel(attribute: &str) -> SubFixtureChannel {
        SubFixtureChannel {
            attribute: attribute.to_string(),
            label: attribute.to_string(),
            default_value: 0,
            functions: None,
        }
    }

    #[test]
    fn channel_numbers_are_padded() {
        let mode = DmxMode {
            name: "Standard".to_string(),
            channel_count: 3,
            channels: vec![
                channel(1, "Dimmer", "Intensity"),
                channel(2, "Pan", "Pan"),
                channel(3, "Pan", "Pan fine"),
            ],
            sub_fixtures: None,
        };
        let text = describe_mode(&mode);
        assert!(text.starts_with("Standard (3 channels)"));
        assert!(text.contains("  001  Dimmer"));
        assert!(text.contains("  003  Pan"));
        // Pan pair merges into a single resolved channel.
        assert!(text.contains("offset 2,3"));
    }

    #[test]
    fn sub_fixture_summary_lists_template() {
        let mode = DmxMode {
            name: "Pixel".to_string(),
            channel_count: 36,
            channels: vec![channel(1, "Dimmer", "Master")],
            sub_fixtures: Some(SubFixtureLayout {
                name: "Pixel".to_string(),
                count: 8,
                channels: vec![sub_channel("ColorAdd_R"), sub_channel("Shutter1")],
                first_channel: 5,
            }),
        };
        let text = describe_mode(&mode);
        assert!(text.contains("8 x Pixel from channel 5, 2 channels each"));
        assert!(text.contains("ColorAdd_R"));
        assert!(text.contains("(follows dimmer)"));
    }
}
