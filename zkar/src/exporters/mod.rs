pub mod exporter;
pub mod golang;
pub mod text;
