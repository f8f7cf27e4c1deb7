//! Voidfire - d100 combat resolution for personal, mass and starship combat

pub mod battle;
pub mod combat;
pub mod core;
pub mod dice;
pub mod report;
pub mod scenario;
pub mod ship;
