pub mod achievements;
pub mod profile;
pub mod render;
pub mod xp;
