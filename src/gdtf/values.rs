//! Value formatting shared by the emitter: fixed-precision numbers, DMX
//! values, markup escaping, node-name sanitizing, and the lossy parsing of
//! free-form physical strings.

use std::borrow::Cow;
use std::sync::LazyLock;

use regex::Regex;
use tracing::warn;

use crate::model::{Color, PhysicalProperties};

/// Column-major 4x4 identity used for every geometry position.
pub const IDENTITY_MATRIX: &str = "{1.000000,0.000000,0.000000,0.000000}\
{0.000000,1.000000,0.000000,0.000000}\
{0.000000,0.000000,1.000000,0.000000}\
{0.000000,0.000000,0.000000,1.000000}";

/// Weight used when the weight string carries no number.
pub const FALLBACK_WEIGHT: &str = "0.000000";

/// Power used when the power string carries no number.
pub const FALLBACK_POWER: &str = "1000.000000";

#[allow(clippy::expect_used)] // literal pattern, covered by tests
static NUMBER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\d*\.?\d+").expect("numeric pattern is valid"));

/// Largest micro-unit count a double still holds exactly.
const EXACT_MICROS: f64 = 4_503_599_627_370_496.0;

/// Six-decimal rendering used for every continuous value. Negative zero
/// prints as zero; values exactly halfway at the seventh decimal round away
/// from zero.
pub fn fixed6(value: f64) -> String {
    let value = if value == 0.0 { 0.0 } else { value };
    round_half_away(value).unwrap_or_else(|| format!("{value:.6}"))
}

/// Exact halfway cases only. A double sits exactly on a seventh-decimal half
/// only if it has at most seven binary fractional digits, so `value * 128` is
/// whole and `|value| * 1e6` is computed without error.
fn round_half_away(value: f64) -> Option<String> {
    let micros = value.abs() * 1e6;
    if (value * 128.0).fract() != 0.0 || micros.fract() != 0.5 || micros >= EXACT_MICROS {
        return None;
    }
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    let units = micros.ceil() as u64;
    let sign = if value < 0.0 { "-" } else { "" };
    Some(format!("{sign}{}.{:06}", units / 1_000_000, units % 1_000_000))
}

/// `value/bytes` notation for DMX values.
pub fn dmx_value(value: u8, bytes: u8) -> String {
    format!("{value}/{bytes}")
}

/// Escape the five reserved markup characters.
pub fn escape(raw: &str) -> Cow<'_, str> {
    quick_xml::escape::escape(raw)
}

/// Replace every character outside `[A-Za-z0-9_.-]` with `_`.
pub fn sanitize_name(name: &str) -> String {
    name.chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || matches!(c, '_' | '.' | '-') {
                c
            } else {
                '_'
            }
        })
        .collect()
}

fn leading_number(s: &str) -> Option<&str> {
    NUMBER.find(s).map(|m| m.as_str())
}

/// First numeric substring of the weight string, verbatim.
///
/// Unparsable input is not an error: it falls back to [`FALLBACK_WEIGHT`].
pub fn parse_weight(weight: &str) -> &str {
    leading_number(weight).unwrap_or_else(|| {
        warn!(weight, "no number in weight, using {FALLBACK_WEIGHT}");
        FALLBACK_WEIGHT
    })
}

/// First numeric substring of the power string, verbatim.
///
/// Unparsable input is not an error: it falls back to [`FALLBACK_POWER`].
pub fn parse_power(power: &str) -> &str {
    leading_number(power).unwrap_or_else(|| {
        warn!(power, "no number in power consumption, using {FALLBACK_POWER}");
        FALLBACK_POWER
    })
}

/// Power consumption in watts as a number.
pub fn power_watts(power: &str) -> f64 {
    parse_power(power).parse().unwrap_or(1000.0)
}

/// `r,g,b` unit-float triple for a wheel slot color. Malformed hex renders white.
pub fn slot_color(hex: &str) -> String {
    let color = Color::from_hex(hex).unwrap_or_else(|| {
        warn!(color = hex, "unparsable slot color, using white");
        Color::WHITE
    });
    let (r, g, b) = color.unit_floats();
    format!("{},{},{}", fixed6(r), fixed6(g), fixed6(b))
}

/// Shortest decimal form, e.g. `100` or `95.5`.
pub fn plain_number(value: f64) -> String {
    format!("{value}")
}

// ── Physical ranges ─────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PhysicalRange {
    pub from: f64,
    pub to: f64,
}

impl PhysicalRange {
    pub const UNIT: PhysicalRange = PhysicalRange { from: 0.0, to: 1.0 };

    fn symmetric(span: f64) -> Self {
        let half = span / 2.0;
        Self {
            from: -half,
            to: half,
        }
    }

    /// Apply a function's explicit bounds. Bounds are passed through as given,
    /// including descending pairs.
    pub fn overridden(self, from: Option<f64>, to: Option<f64>) -> Self {
        Self {
            from: from.unwrap_or(self.from),
            to: to.unwrap_or(self.to),
        }
    }
}

/// Default physical range of an attribute. Pan and Tilt span the declared
/// travel symmetrically around zero; a missing or zero travel, and every
/// other attribute, use 0..1.
pub fn default_physical_range(attribute: &str, physical: &PhysicalProperties) -> PhysicalRange {
    let travel = match attribute {
        "Pan" => physical.pan_range,
        "Tilt" => physical.tilt_range,
        _ => None,
    };
    match travel {
        Some(span) if span != 0.0 => PhysicalRange::symmetric(span),
        _ => PhysicalRange::UNIT,
    }
}
