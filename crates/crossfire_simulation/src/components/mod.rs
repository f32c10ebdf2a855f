//! ECS components for duel entities
//!
//! Organised by domain:
//! - actor: the agent itself (Agent, ControllerKind, Health, Opponent, SpawnPoint)
//! - movement: navigation handle (Navigation)
//! - world: static arena markers (Obstacle, HidingSpot)
//!
//! Combat (Weapon, ShotStats), controller (AgentState, Brain) and perception
//! (Senses) components live next to the systems that own them.

pub mod actor;
pub mod movement;
pub mod world;

pub use actor::*;
pub use movement::*;
pub use world::*;
