//! Damage application and death.
//!
//! Flow: `run_controllers` fires → `ShotHit` → `apply_shot_hits` →
//! `DamageDealt` (+ `AgentDied` / `RoundDecided` on a kill).
//! The shooter never touches the target's components directly.

use bevy::prelude::*;
use tracing::{debug, info, warn};

use crate::ai::{AgentState, StateChangeCounts};
use crate::components::{Health, Navigation};

/// A fired round that hit
#[derive(Event, Debug, Clone, Copy, PartialEq, Eq)]
pub struct ShotHit {
    pub shooter: Entity,
    pub target: Entity,
    pub damage: u32,
}

/// Damage actually applied to an agent
#[derive(Event, Debug, Clone, Copy, PartialEq, Eq)]
pub struct DamageDealt {
    pub attacker: Entity,
    pub target: Entity,
    pub damage: u32,
    pub remaining_health: u32,
}

/// Agent went to 0 HP (sent once per death)
#[derive(Event, Debug, Clone, Copy, PartialEq, Eq)]
pub struct AgentDied {
    pub agent: Entity,
    pub killer: Option<Entity>,
}

/// Round outcome produced by a kill
#[derive(Event, Debug, Clone, Copy, PartialEq, Eq)]
pub struct RoundDecided {
    pub winner: Entity,
    pub loser: Entity,
}

/// Result of one `apply_damage` call
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DamageReport {
    pub applied: u32,
    pub remaining: u32,
    /// True only on the call that moved the agent into Dead
    pub killed: bool,
}

/// TakeDamage: health -= amount (clamped at 0). Reaching 0 from any
/// non-Dead state forces Dead and records the transition.
///
/// Amount 0 is a no-op on health and state.
pub fn apply_damage(
    health: &mut Health,
    state: &mut AgentState,
    counts: &mut StateChangeCounts,
    amount: u32,
) -> DamageReport {
    if amount == 0 {
        return DamageReport {
            applied: 0,
            remaining: health.current,
            killed: false,
        };
    }

    let before = health.current;
    health.take_damage(amount);

    let killed = !health.is_alive() && !state.is_dead();
    if killed {
        *state = AgentState::Dead;
        counts.record(AgentState::Dead);
    }

    DamageReport {
        applied: before - health.current,
        remaining: health.current,
        killed,
    }
}

/// System: apply hits to their targets
pub fn apply_shot_hits(
    mut hits: EventReader<ShotHit>,
    mut agents: Query<(
        &mut Health,
        &mut AgentState,
        &mut StateChangeCounts,
        &mut Navigation,
        &Transform,
    )>,
    mut damage_dealt: EventWriter<DamageDealt>,
    mut deaths: EventWriter<AgentDied>,
    mut outcomes: EventWriter<RoundDecided>,
) {
    for hit in hits.read() {
        let Ok((mut health, mut state, mut counts, mut navigation, transform)) =
            agents.get_mut(hit.target)
        else {
            warn!("ShotHit for missing target {:?}", hit.target);
            continue;
        };

        let report = apply_damage(&mut health, &mut state, &mut counts, hit.damage);
        if report.applied == 0 {
            continue;
        }

        damage_dealt.write(DamageDealt {
            attacker: hit.shooter,
            target: hit.target,
            damage: report.applied,
            remaining_health: report.remaining,
        });
        debug!(
            "💥 {:?} hit {:?} for {} ({} HP left)",
            hit.shooter, hit.target, report.applied, report.remaining
        );

        if report.killed {
            navigation.hold(transform.translation);
            navigation.at_hiding_spot = false;
            deaths.write(AgentDied {
                agent: hit.target,
                killer: Some(hit.shooter),
            });
            outcomes.write(RoundDecided {
                winner: hit.shooter,
                loser: hit.target,
            });
            info!("💀 {:?} killed by {:?}", hit.target, hit.shooter);
        }
    }
}
