pub mod describe;
pub mod error;
pub mod gdtf;
pub mod model;
pub mod package;
pub mod paths;
pub mod schema;
pub mod settings;
pub mod storage;

pub use gdtf::{generate_description, generate_description_with, DescriptorOptions};
