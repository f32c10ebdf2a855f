//! Movement components: the navigation handle controllers steer through

use bevy::prelude::*;

/// Navigation handle (set-destination / read-velocity)
///
/// Controllers only write `destination`; `advance_navigation` moves the agent
/// and reports `velocity`. Holding position = destination at own position.
#[derive(Component, Debug, Clone, Copy, PartialEq)]
pub struct Navigation {
    pub destination: Vec3,
    pub velocity: Vec3,
    /// Metres per second
    pub speed: f32,
    /// Destination counts as reached within this distance
    pub arrival_radius: f32,
    /// Hide: standing at the chosen cover (cleared on every transition)
    pub at_hiding_spot: bool,
}

impl Default for Navigation {
    fn default() -> Self {
        Self {
            destination: Vec3::ZERO,
            velocity: Vec3::ZERO,
            speed: 3.5,
            arrival_radius: 0.5,
            at_hiding_spot: false,
        }
    }
}

impl Navigation {
    pub fn new(position: Vec3, speed: f32, arrival_radius: f32) -> Self {
        Self {
            destination: position,
            speed,
            arrival_radius,
            ..Default::default()
        }
    }

    /// Cancel travel: destination = where we stand
    pub fn hold(&mut self, position: Vec3) {
        self.destination = position;
        self.velocity = Vec3::ZERO;
    }

    pub fn set_destination(&mut self, destination: Vec3) {
        self.destination = destination;
    }

    pub fn reached(&self, position: Vec3) -> bool {
        position.distance(self.destination) <= self.arrival_radius
    }
}
