use std::fmt;

/// The fixed feature-group taxonomy every attribute is filed under.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Feature {
    Dimmer,
    Position,
    Color,
    Gobo,
    Beam,
    Control,
}

const COLOR_PREFIXES: [&str; 4] = ["Color", "COLORT", "CTO", "CTB"];
const BEAM_EXACT: [&str; 3] = ["Zoom", "Focus", "Iris"];
const BEAM_PREFIXES: [&str; 5] = ["Frost", "Prism", "Shutter", "Strobe", "Effects"];

impl Feature {
    /// Declaration order of the feature groups in the document.
    pub const ALL: [Feature; 6] = [
        Feature::Dimmer,
        Feature::Position,
        Feature::Color,
        Feature::Gobo,
        Feature::Beam,
        Feature::Control,
    ];

    /// Classify an attribute identifier. First matching rule wins; anything
    /// unrecognised is Control.
    pub fn classify(attribute: &str) -> Self {
        if attribute == "Dimmer" {
            Feature::Dimmer
        } else if attribute.starts_with("Pan") || attribute.starts_with("Tilt") {
            Feature::Position
        } else if COLOR_PREFIXES.iter().any(|p| attribute.starts_with(p)) {
            Feature::Color
        } else if attribute.starts_with("Gobo") {
            Feature::Gobo
        } else if BEAM_EXACT.contains(&attribute)
            || BEAM_PREFIXES.iter().any(|p| attribute.starts_with(p))
        {
            Feature::Beam
        } else {
            Feature::Control
        }
    }

    pub const fn name(self) -> &'static str {
        match self {
            Feature::Dimmer => "Dimmer",
            Feature::Position => "Position",
            Feature::Color => "Color",
            Feature::Gobo => "Gobo",
            Feature::Beam => "Beam",
            Feature::Control => "Control",
        }
    }

    /// `Group.Feature` reference. Each group holds one feature of the same name.
    pub fn reference(self) -> String {
        format!("{0}.{0}", self.name())
    }

    /// Channels of these features are highlighted at full.
    pub fn highlights(self) -> bool {
        matches!(self, Feature::Dimmer | Feature::Color)
    }
}

impl fmt::Display for Feature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}
