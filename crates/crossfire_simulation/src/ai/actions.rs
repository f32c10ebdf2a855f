//! State actions and transition side effects
//!
//! Both controllers share these: a state means the same thing whichever
//! paradigm chose it.
//!
//! Per-state action (every tick, after the decision):
//! - Idle / Dead → hold position
//! - Shoot       → hold, face target, fire on cooldown if visible and in range
//! - MoveToTarget→ destination = target position
//! - Hide        → destination = closest hidden spot; flag arrival
//! - Reload      → hold, start (once) and advance the reload countdown

use std::time::Duration;

use bevy::prelude::*;
use rand::Rng;
use tracing::debug;

use crate::ai::{AgentState, Brain, StateChangeCounts};
use crate::combat::{Shot, ShotStats, Weapon};
use crate::components::Navigation;
use crate::perception::Senses;

/// Mutable view of the agent components an action may touch
pub struct AgentBody<'a> {
    pub transform: &'a mut Transform,
    pub weapon: &'a mut Weapon,
    pub navigation: &'a mut Navigation,
    pub stats: &'a mut ShotStats,
}

impl AgentBody<'_> {
    pub fn position(&self) -> Vec3 {
        self.transform.translation
    }
}

/// Enter `next`: cancel navigation and in-progress timers, clear the
/// at-spot flag, count the entry, let the controller install its rules.
///
/// No-op when `next` equals the current state.
pub fn apply_transition(
    next: AgentState,
    state: &mut AgentState,
    counts: &mut StateChangeCounts,
    body: &mut AgentBody,
    brain: &mut Brain,
) -> bool {
    if next == *state {
        return false;
    }

    let position = body.position();
    body.navigation.hold(position);
    body.navigation.at_hiding_spot = false;
    if body.weapon.cancel_reload() {
        debug!("reload interrupted by {} → {}", state, next);
    }

    *state = next;
    counts.record(next);
    brain.on_enter(next);
    true
}

/// Execute one tick of `state`. Returns the shot if one was fired.
pub fn perform_state_action<R: Rng + ?Sized>(
    state: AgentState,
    senses: &Senses,
    body: &mut AgentBody,
    shooting_range: f32,
    dt: Duration,
    rng: &mut R,
) -> Option<Shot> {
    let position = body.position();

    match state {
        AgentState::Idle | AgentState::Dead => {
            body.navigation.hold(position);
            None
        }
        AgentState::Shoot => {
            body.navigation.hold(position);
            face(body.transform, senses.target_position);

            if !(senses.can_see_target && senses.in_shooting_range(shooting_range)) {
                return None;
            }
            let shot = body.weapon.fire(rng)?;
            body.stats.record(&shot);
            Some(shot)
        }
        AgentState::MoveToTarget => {
            body.navigation.set_destination(senses.target_position);
            None
        }
        AgentState::Hide => {
            match senses.hiding_spot {
                Some(spot) => {
                    body.navigation.set_destination(spot);
                    body.navigation.at_hiding_spot = body.navigation.reached(position);
                }
                None => {
                    // no cover anywhere: current position is as good as it gets
                    body.navigation.hold(position);
                    body.navigation.at_hiding_spot = true;
                }
            }
            None
        }
        AgentState::Reload => {
            body.navigation.hold(position);
            body.weapon.begin_reload();
            if body.weapon.tick_reload(dt) {
                debug!("🔄 reload complete ({} rounds)", body.weapon.ammo);
            }
            None
        }
    }
}

/// Turn around the Y axis toward `target`
fn face(transform: &mut Transform, target: Vec3) {
    let flat = Vec3::new(target.x, transform.translation.y, target.z);
    if flat.distance_squared(transform.translation) > f32::EPSILON {
        transform.look_at(flat, Vec3::Y);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ai::crisp::CrispController;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    struct Parts {
        transform: Transform,
        weapon: Weapon,
        navigation: Navigation,
        stats: ShotStats,
    }

    impl Parts {
        fn new() -> Self {
            let mut weapon = Weapon::default();
            weapon.hit_chance = 1.0;
            weapon.reload_time = Duration::from_millis(300);
            Self {
                transform: Transform::from_xyz(0.0, 0.0, 0.0),
                weapon,
                navigation: Navigation::new(Vec3::ZERO, 3.5, 0.5),
                stats: ShotStats::default(),
            }
        }

        fn body(&mut self) -> AgentBody<'_> {
            AgentBody {
                transform: &mut self.transform,
                weapon: &mut self.weapon,
                navigation: &mut self.navigation,
                stats: &mut self.stats,
            }
        }
    }

    fn senses_at(distance: f32, visible: bool) -> Senses {
        Senses {
            distance,
            can_see_target: visible,
            target_position: Vec3::new(distance, 0.0, 0.0),
            target_health: 100,
            target_max_health: 100,
            hiding_spot: None,
        }
    }

    const DT: Duration = Duration::from_millis(100);

    #[test]
    fn test_shoot_fires_at_exactly_range() {
        let mut parts = Parts::new();
        let mut rng = ChaCha8Rng::seed_from_u64(1);

        let shot = perform_state_action(AgentState::Shoot, &senses_at(7.0, true), &mut parts.body(), 7.0, DT, &mut rng);

        assert_eq!(shot.map(|s| s.hit), Some(true));
        assert_eq!(parts.stats.fired, 1);
        assert_eq!(parts.weapon.ammo, 9);
    }

    #[test]
    fn test_shoot_holds_fire_out_of_range_or_blind() {
        let mut parts = Parts::new();
        let mut rng = ChaCha8Rng::seed_from_u64(1);

        assert!(perform_state_action(AgentState::Shoot, &senses_at(7.01, true), &mut parts.body(), 7.0, DT, &mut rng).is_none());
        assert!(perform_state_action(AgentState::Shoot, &senses_at(3.0, false), &mut parts.body(), 7.0, DT, &mut rng).is_none());
        assert_eq!(parts.weapon.ammo, 10);
    }

    #[test]
    fn test_hide_flags_arrival_at_spot() {
        let mut parts = Parts::new();
        let mut rng = ChaCha8Rng::seed_from_u64(1);
        let mut senses = senses_at(5.0, true);

        senses.hiding_spot = Some(Vec3::new(-4.0, 0.0, 0.0));
        perform_state_action(AgentState::Hide, &senses, &mut parts.body(), 7.0, DT, &mut rng);
        assert_eq!(parts.navigation.destination, Vec3::new(-4.0, 0.0, 0.0));
        assert!(!parts.navigation.at_hiding_spot);

        senses.hiding_spot = Some(Vec3::new(0.3, 0.0, 0.0));
        perform_state_action(AgentState::Hide, &senses, &mut parts.body(), 7.0, DT, &mut rng);
        assert!(parts.navigation.at_hiding_spot);
    }

    #[test]
    fn test_reload_action_refills_after_countdown() {
        let mut parts = Parts::new();
        parts.weapon.ammo = 0;
        let mut rng = ChaCha8Rng::seed_from_u64(1);
        let senses = senses_at(15.0, false);

        for _ in 0..2 {
            perform_state_action(AgentState::Reload, &senses, &mut parts.body(), 7.0, DT, &mut rng);
            assert!(!parts.weapon.finished_reloading());
        }
        perform_state_action(AgentState::Reload, &senses, &mut parts.body(), 7.0, DT, &mut rng);
        assert!(parts.weapon.finished_reloading());
        assert_eq!(parts.weapon.ammo, 10);
    }

    #[test]
    fn test_transition_side_effects() {
        let mut parts = Parts::new();
        parts.transform.translation = Vec3::new(2.0, 0.0, 1.0);
        parts.navigation.set_destination(Vec3::new(9.0, 0.0, 9.0));
        parts.navigation.at_hiding_spot = true;
        parts.weapon.begin_reload();

        let mut brain = Brain::Crisp(CrispController::default());
        let mut state = AgentState::Reload;
        let mut counts = StateChangeCounts::default();

        assert!(apply_transition(AgentState::Hide, &mut state, &mut counts, &mut parts.body(), &mut brain));

        assert_eq!(state, AgentState::Hide);
        assert_eq!(counts.get(AgentState::Hide), 1);
        assert_eq!(parts.navigation.destination, Vec3::new(2.0, 0.0, 1.0));
        assert!(!parts.navigation.at_hiding_spot);
        assert!(parts.weapon.reload_remaining().is_none());

        // same state: nothing happens, nothing counted
        assert!(!apply_transition(AgentState::Hide, &mut state, &mut counts, &mut parts.body(), &mut brain));
        assert_eq!(counts.total(), 1);
    }
}
