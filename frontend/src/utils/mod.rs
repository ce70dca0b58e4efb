pub mod effects;
pub mod tokens;
