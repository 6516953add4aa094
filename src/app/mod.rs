pub mod demo;
pub mod presets;
