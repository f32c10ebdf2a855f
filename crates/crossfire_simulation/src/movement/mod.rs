//! Movement: stand-in for the external navigation service
//!
//! Controllers only set `Navigation::destination`. This module moves the
//! agent toward it in a straight line at `speed` and reports `velocity`.
//! No pathfinding, no collision response: obstacles only block sight.

use std::time::Duration;

use bevy::prelude::*;

use crate::ai::AgentState;
use crate::components::{Agent, Navigation};

/// One straight-line step toward `destination`
///
/// Returns the new position and the velocity used. Snaps onto the
/// destination when it is within this step's reach.
pub fn step_towards(position: Vec3, destination: Vec3, speed: f32, dt: Duration) -> (Vec3, Vec3) {
    let dt_secs = dt.as_secs_f32();
    let offset = destination - position;
    let remaining = offset.length();
    let reach = speed * dt_secs;

    if remaining <= f32::EPSILON || dt_secs <= 0.0 {
        return (position, Vec3::ZERO);
    }
    if remaining <= reach {
        return (destination, offset / dt_secs);
    }

    let velocity = offset / remaining * speed;
    (position + velocity * dt_secs, velocity)
}

/// System: advance every agent toward its destination
///
/// Dead agents don't move.
pub fn advance_navigation(
    mut agents: Query<(&mut Transform, &mut Navigation, &AgentState), With<Agent>>,
    time: Res<Time<Fixed>>,
) {
    let dt = time.timestep();

    for (mut transform, mut navigation, state) in agents.iter_mut() {
        if state.is_dead() {
            navigation.velocity = Vec3::ZERO;
            continue;
        }

        let (position, velocity) = step_towards(
            transform.translation,
            navigation.destination,
            navigation.speed,
            dt,
        );
        transform.translation = position;
        navigation.velocity = velocity;
    }
}
