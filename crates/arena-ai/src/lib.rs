//! Combat AI for the arena battle engine.
//!
//! Implements the behavior-tree decision process, target selection,
//! ballistic lead solving, and the pluggable controller interface.
//! No ECS dependency — everything operates on plain decision contexts
//! assembled by the simulation each tick.

pub mod ballistics;
pub mod context;
pub mod controller;
pub mod features;
pub mod targeting;
pub mod tree;

pub use arena_core as core;
pub use context::{CombatDecision, DecisionContext, FireRequest};
pub use controller::UnitController;

#[cfg(test)]
mod tests;
