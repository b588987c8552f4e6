//! Channel resolution: turns the raw per-byte channel list of one mode into
//! logical channels, merging coarse/fine pairs that share an attribute.
//!
//! Grouping is by attribute identifier in first-appearance order:
//! - 1 occurrence: single-byte channel.
//! - 2 occurrences: one 16-bit channel; label, default and functions come from
//!   the first (coarse) occurrence.
//! - 3+ occurrences: the first two merge as above, every later occurrence
//!   becomes its own single-byte channel named `{attribute}{n}` where `n` is
//!   its 1-based position in the group (third "Gobo1" → "Gobo13").

use std::borrow::Cow;
use std::fmt;

use indexmap::IndexMap;
use tracing::debug;

use super::feature::Feature;
use crate::model::{ChannelFunction, DmxChannel, SubFixtureLayout};

/// Byte positions of a resolved channel: coarse only, or coarse + fine.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ByteOffsets {
    Single(u16),
    CoarseFine { coarse: u16, fine: u16 },
}

impl ByteOffsets {
    pub const fn byte_count(self) -> u8 {
        match self {
            ByteOffsets::Single(_) => 1,
            ByteOffsets::CoarseFine { .. } => 2,
        }
    }
}

impl fmt::Display for ByteOffsets {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ByteOffsets::Single(offset) => write!(f, "{offset}"),
            ByteOffsets::CoarseFine { coarse, fine } => write!(f, "{coarse},{fine}"),
        }
    }
}

/// A logical channel, borrowing labels and functions from the input.
#[derive(Debug, Clone, PartialEq)]
pub struct ResolvedChannel<'a> {
    pub attribute: Cow<'a, str>,
    pub label: &'a str,
    pub offsets: ByteOffsets,
    pub default_value: u8,
    pub functions: &'a [ChannelFunction],
}

impl ResolvedChannel<'_> {
    pub fn feature(&self) -> Feature {
        Feature::classify(&self.attribute)
    }

    pub fn byte_count(&self) -> u8 {
        self.offsets.byte_count()
    }
}

/// Borrowed view of one raw channel, shared by mode channels and template entries.
#[derive(Debug, Clone, Copy)]
struct RawChannel<'a> {
    channel: u16,
    attribute: &'a str,
    label: &'a str,
    default_value: u8,
    functions: &'a [ChannelFunction],
}

impl<'a> From<&'a DmxChannel> for RawChannel<'a> {
    fn from(ch: &'a DmxChannel) -> Self {
        Self {
            channel: ch.channel,
            attribute: &ch.attribute,
            label: &ch.label,
            default_value: ch.default_value,
            functions: ch.functions.as_deref().unwrap_or(&[]),
        }
    }
}

/// Resolve the global channels of one mode.
pub fn resolve_channels(channels: &[DmxChannel]) -> Vec<ResolvedChannel<'_>> {
    resolve(channels.iter().map(RawChannel::from))
}

fn resolve<'a>(raw: impl IntoIterator<Item = RawChannel<'a>>) -> Vec<ResolvedChannel<'a>> {
    let mut groups: IndexMap<&'a str, Vec<RawChannel<'a>>> = IndexMap::new();
    for ch in raw {
        groups.entry(ch.attribute).or_default().push(ch);
    }

    let mut resolved = Vec::with_capacity(groups.len());
    for (attribute, group) in groups {
        let mut occurrences = group.into_iter();
        let Some(coarse) = occurrences.next() else {
            continue;
        };
        let offsets = match occurrences.next() {
            Some(fine) => ByteOffsets::CoarseFine {
                coarse: coarse.channel,
                fine: fine.channel,
            },
            None => ByteOffsets::Single(coarse.channel),
        };
        resolved.push(ResolvedChannel {
            attribute: Cow::Borrowed(attribute),
            label: coarse.label,
            offsets,
            default_value: coarse.default_value,
            functions: coarse.functions,
        });

        for (index, extra) in occurrences.enumerate() {
            let suffixed = format!("{attribute}{}", index + 3);
            debug!(
                attribute,
                channel = extra.channel,
                renamed = %suffixed,
                "attribute occurs more than twice, splitting off extra channel"
            );
            resolved.push(ResolvedChannel {
                attribute: Cow::Owned(suffixed),
                label: extra.label,
                offsets: ByteOffsets::Single(extra.channel),
                default_value: extra.default_value,
                functions: extra.functions,
            });
        }
    }
    resolved
}

// ── Sub-fixtures ────────────────────────────────────────────────────

/// The per-unit channel block of a mode, resolved once and replicated through
/// geometry references rather than duplicated channel definitions.
#[derive(Debug, Clone)]
pub struct SubFixtureTemplate<'a> {
    pub layout: &'a SubFixtureLayout,
    /// Offsets are 1-based positions within one unit's block.
    pub channels: Vec<ResolvedChannel<'a>>,
}

impl SubFixtureTemplate<'_> {
    /// Start channel of every unit, in unit order.
    pub fn unit_offsets(&self) -> Vec<u32> {
        unit_offsets(self.layout)
    }
}

/// Resolve a per-unit template. It never sees the mode's global channels.
pub fn resolve_template(layout: &SubFixtureLayout) -> SubFixtureTemplate<'_> {
    let raw = layout.channels.iter().enumerate().map(|(index, ch)| RawChannel {
        channel: u16::try_from(index + 1).unwrap_or(u16::MAX),
        attribute: &ch.attribute,
        label: &ch.label,
        default_value: ch.default_value,
        functions: ch.functions.as_deref().unwrap_or(&[]),
    });
    SubFixtureTemplate {
        layout,
        channels: resolve(raw),
    }
}

/// `first_channel + (unit - 1) * template_len` for unit = 1..=count.
pub fn unit_offsets(layout: &SubFixtureLayout) -> Vec<u32> {
    let stride = u32::try_from(layout.channels.len()).unwrap_or(u32::MAX);
    let first = u32::from(layout.first_channel);
    (0..layout.count)
        .map(|unit| first.saturating_add(unit.saturating_mul(stride)))
        .collect()
}
