pub mod color;
pub mod fixture;

// Re-export commonly used types at the model level.
pub use color::Color;
pub use fixture::{
    BeamProperties, ChannelFunction, DmxChannel, DmxMode, FixtureDescription, PhysicalProperties,
    SubFixtureChannel, SubFixtureLayout, Wheel, WheelKind, WheelSlot,
};
