//! Weapon: clip, shot cooldown, reload countdown
//!
//! Timers are `Duration` countdowns driven by the fixed tick (`saturating_sub`),
//! so a reload of N × dt completes on exactly the N-th tick.

use std::time::Duration;

use bevy::prelude::*;
use rand::Rng;

use crate::config::AgentProfile;

/// One fired round
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Shot {
    pub hit: bool,
    pub damage: u32,
}

/// Ranged weapon state for one agent
///
/// Invariant: 0 ≤ ammo ≤ ammo_per_clip
#[derive(Component, Debug, Clone, PartialEq)]
pub struct Weapon {
    pub ammo: u32,
    pub ammo_per_clip: u32,
    pub damage: u32,
    /// Chance in [0, 1] that a round hits
    pub hit_chance: f64,
    pub shot_interval: Duration,
    pub reload_time: Duration,
    cooldown: Duration,
    /// `Some` while a reload is counting down
    reload_remaining: Option<Duration>,
}

impl Default for Weapon {
    fn default() -> Self {
        Self::from_profile(&AgentProfile::default())
    }
}

impl Weapon {
    pub fn from_profile(profile: &AgentProfile) -> Self {
        Self {
            ammo: profile.ammo_per_clip,
            ammo_per_clip: profile.ammo_per_clip,
            damage: profile.bullet_damage,
            hit_chance: profile.hit_chance,
            shot_interval: profile.shot_interval(),
            reload_time: profile.reload_time(),
            cooldown: Duration::ZERO,
            reload_remaining: None,
        }
    }

    pub fn cooldown(&self) -> Duration {
        self.cooldown
    }

    pub fn can_fire(&self) -> bool {
        self.ammo > 0 && self.cooldown.is_zero()
    }

    /// Fire one round. `None` (no-op) if the clip is empty or the cooldown
    /// has not elapsed.
    pub fn fire<R: Rng + ?Sized>(&mut self, rng: &mut R) -> Option<Shot> {
        if !self.can_fire() {
            return None;
        }
        self.ammo -= 1;
        self.cooldown = self.shot_interval;
        let hit = rng.gen_bool(self.hit_chance.clamp(0.0, 1.0));
        Some(Shot {
            hit,
            damage: self.damage,
        })
    }

    pub fn tick_cooldown(&mut self, dt: Duration) {
        self.cooldown = self.cooldown.saturating_sub(dt);
    }

    /// "Finished reloading" flag: true whenever no reload is counting down
    pub fn finished_reloading(&self) -> bool {
        self.reload_remaining.is_none()
    }

    pub fn reload_remaining(&self) -> Option<Duration> {
        self.reload_remaining
    }

    /// Start the countdown unless one is already running. Returns true if started.
    pub fn begin_reload(&mut self) -> bool {
        if self.reload_remaining.is_some() {
            return false;
        }
        self.reload_remaining = Some(self.reload_time);
        true
    }

    /// Advance the countdown; on expiry refill the clip. Returns true on the
    /// tick the reload completes.
    pub fn tick_reload(&mut self, dt: Duration) -> bool {
        let Some(remaining) = self.reload_remaining else {
            return false;
        };
        let remaining = remaining.saturating_sub(dt);
        if remaining.is_zero() {
            self.reload_remaining = None;
            self.ammo = self.ammo_per_clip;
            true
        } else {
            self.reload_remaining = Some(remaining);
            false
        }
    }

    /// Drop an in-progress reload; the next one restarts from full duration.
    /// Returns true if a reload was interrupted.
    pub fn cancel_reload(&mut self) -> bool {
        self.reload_remaining.take().is_some()
    }

    /// Round reset: full clip, no timers
    pub fn restock(&mut self) {
        self.ammo = self.ammo_per_clip;
        self.cooldown = Duration::ZERO;
        self.reload_remaining = None;
    }
}

/// Harness counters: bullets fired / bullets that hit
#[derive(Component, Debug, Clone, Copy, Default, PartialEq, Eq, Reflect)]
#[reflect(Component)]
pub struct ShotStats {
    pub fired: u32,
    pub hit: u32,
}

impl ShotStats {
    pub fn record(&mut self, shot: &Shot) {
        self.fired += 1;
        if shot.hit {
            self.hit += 1;
        }
    }

    pub fn accuracy(&self) -> f32 {
        if self.fired == 0 {
            return 0.0;
        }
        self.hit as f32 / self.fired as f32
    }

    pub fn clear(&mut self) {
        *self = Self::default();
    }
}

/// System: shot cooldowns tick down at the start of every fixed tick
pub fn tick_weapon_cooldowns(mut weapons: Query<&mut Weapon>, time: Res<Time<Fixed>>) {
    let dt = time.timestep();
    for mut weapon in weapons.iter_mut() {
        weapon.tick_cooldown(dt);
    }
}
