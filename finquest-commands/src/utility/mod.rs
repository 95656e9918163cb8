pub mod help;
pub mod render;
pub mod usage;
