//! Tests for the fuzzy engine and the duel rule book (golden outputs).

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use bevy::prelude::*;
    use proptest::prelude::*;

    use crate::ai::brain::{DecisionMaker, ResourceSnapshot};
    use crate::ai::fuzzy::*;
    use crate::ai::AgentState;
    use crate::perception::Senses;

    const EPS: f32 = 1e-3;

    // ---------- generic engine ----------

    /// x on [0,10]: low / high; y on [0,10]: small / big
    fn toy_system() -> FuzzySystem {
        let x = LinguisticVariable::new("x", 0.0, 10.0)
            .and_then(|v| v.with_term("low", MembershipFunction::trapezoid(0.0, 0.0, 2.0, 6.0)?))
            .and_then(|v| v.with_term("high", MembershipFunction::trapezoid(4.0, 8.0, 10.0, 10.0)?))
            .unwrap();
        let y = LinguisticVariable::new("y", 0.0, 10.0)
            .and_then(|v| v.with_term("small", MembershipFunction::triangle(0.0, 2.5, 5.0)?))
            .and_then(|v| v.with_term("big", MembershipFunction::triangle(5.0, 7.5, 10.0)?))
            .unwrap();
        FuzzySystem::new(vec![x], y, 400).unwrap()
    }

    fn toy_rules(system: &FuzzySystem) -> RuleSet {
        system
            .compile(
                "toy",
                vec![
                    Antecedent::is("x", "low").then("small"),
                    Antecedent::is("x", "high").then("big"),
                ],
            )
            .unwrap()
    }

    #[test]
    fn test_operators_min_max_not() {
        let system = toy_system();
        let rules = system
            .compile(
                "ops",
                vec![
                    Antecedent::is("x", "low").and(Antecedent::is("x", "high")).then("small"),
                    Antecedent::is("x", "low").or(Antecedent::is("x", "high")).then("small"),
                    Antecedent::is_not("x", "low").then("small"),
                ],
            )
            .unwrap();

        // x = 5: low 0.25, high 0.25
        let at_five = system.fuzzify(&[5.0]).unwrap();
        assert_eq!(at_five.variable(0), &[0.25, 0.25]);
        assert!(at_five.variable(1).is_empty());
        let strengths: Vec<f32> = rules.rules().iter().map(|r| system.firing_strength(r, &at_five)).collect();
        assert_eq!(strengths, vec![0.25, 0.25, 0.75]);

        // x = 3: low 0.75, high 0
        let at_three = system.fuzzify(&[3.0]).unwrap();
        let strengths: Vec<f32> = rules.rules().iter().map(|r| system.firing_strength(r, &at_three)).collect();
        assert_eq!(strengths, vec![0.0, 0.75, 0.25]);
    }

    #[test]
    fn test_aggregate_clips_at_firing_strength() {
        let system = toy_system();
        let rules = toy_rules(&system);
        let envelope = system.aggregate(&rules, &system.fuzzify(&[3.0]).unwrap());

        let peak = envelope.samples().iter().copied().fold(0.0, f32::max);
        assert!((peak - 0.75).abs() < EPS);
        // `small` triangle (base 5) cut at 0.75: 5h - 5h²/2
        let expected = 5.0 * 0.75 - 5.0 * 0.75 * 0.75 / 2.0;
        assert!((envelope.area() - expected).abs() < 0.01, "area = {}", envelope.area());
        // nothing above the `small` support
        assert!(envelope.samples().iter().enumerate().all(|(i, &y)| envelope.x_at(i) < 5.0 || y == 0.0));
    }

    #[test]
    fn test_symmetric_envelope_centroid() {
        let system = toy_system();
        let rules = toy_rules(&system);

        let centroid = system.infer(&rules, &[5.0]).unwrap().unwrap();
        assert!((centroid - 5.0).abs() < EPS, "centroid = {}", centroid);
    }

    #[test]
    fn test_nothing_fired_has_no_centroid() {
        let system = toy_system();
        let only_low = system.compile("low", vec![Antecedent::is("x", "low").then("small")]).unwrap();

        let envelope = system.aggregate(&only_low, &system.fuzzify(&[9.0]).unwrap());
        assert_eq!(envelope.area(), 0.0);
        assert_eq!(system.infer(&only_low, &[9.0]).unwrap(), None);
    }

    #[test]
    fn test_compile_rejects_unknown_names() {
        let system = toy_system();

        assert_eq!(
            system.compile("bad", vec![Antecedent::is("z", "low").then("small")]),
            Err(FuzzyError::UnknownVariable("z".to_string()))
        );
        assert!(matches!(
            system.compile("bad", vec![Antecedent::is("x", "medium").then("small")]),
            Err(FuzzyError::UnknownTerm { .. })
        ));
        assert!(matches!(
            system.compile("bad", vec![Antecedent::is("x", "low").then("huge")]),
            Err(FuzzyError::UnknownTerm { .. })
        ));
    }

    #[test]
    fn test_fuzzify_checks_arity() {
        let system = toy_system();
        assert_eq!(
            system.fuzzify(&[1.0, 2.0]),
            Err(FuzzyError::InputArity { expected: 1, got: 2 })
        );
    }

    #[test]
    fn test_system_rejects_bad_setup() {
        let x = LinguisticVariable::new("x", 0.0, 1.0).unwrap();
        assert_eq!(
            FuzzySystem::new(vec![x.clone()], x.clone(), 100),
            Err(FuzzyError::DuplicateVariable("x".to_string()))
        );
        let y = LinguisticVariable::new("y", 0.0, 1.0).unwrap();
        assert_eq!(FuzzySystem::new(vec![x], y, 0), Err(FuzzyError::ZeroResolution));
    }

    // ---------- band mapping ----------

    #[test]
    fn test_bands_are_half_open_on_the_lower_bound() {
        assert_eq!(action_for_output(0.0), Some(AgentState::Shoot));
        assert_eq!(action_for_output(0.999), Some(AgentState::Shoot));
        assert_eq!(action_for_output(1.0), Some(AgentState::Hide));
        assert_eq!(action_for_output(2.0), Some(AgentState::MoveToTarget));
        assert_eq!(action_for_output(3.0), Some(AgentState::Reload));
        assert_eq!(action_for_output(3.999), Some(AgentState::Reload));
        assert_eq!(action_for_output(4.0), None);
        assert_eq!(action_for_output(-0.01), None);
        assert_eq!(action_for_output(f32::NAN), None);
    }

    // ---------- duel model (golden) ----------

    fn model() -> Arc<FuzzyModel> {
        Arc::new(FuzzyModel::combat(10, 400).unwrap())
    }

    fn controller_in(state: AgentState) -> FuzzyController {
        let mut controller = FuzzyController::new(model(), 12.0);
        controller.install(state);
        controller
    }

    fn senses(distance: f32, visible: bool) -> Senses {
        Senses {
            distance,
            can_see_target: visible,
            target_position: Vec3::new(distance, 0.0, 0.0),
            target_health: 100,
            target_max_health: 100,
            hiding_spot: None,
        }
    }

    fn full() -> ResourceSnapshot {
        ResourceSnapshot {
            health: 100,
            max_health: 100,
            ammo: 10,
            ammo_per_clip: 10,
            finished_reloading: true,
            at_hiding_spot: false,
        }
    }

    fn output(state: AgentState, senses: &Senses, resources: &ResourceSnapshot) -> Option<f32> {
        controller_in(state).infer(senses, resources).unwrap()
    }

    #[test]
    fn test_rule_book_covers_every_live_state() {
        let model = model();
        for state in [
            AgentState::Idle,
            AgentState::Shoot,
            AgentState::Hide,
            AgentState::MoveToTarget,
            AgentState::Reload,
        ] {
            let set = model.rule_book().get(state).unwrap();
            assert_eq!(set.label(), state.name());
            assert!(!set.is_empty());
        }
        assert!(model.rule_book().get(AgentState::Dead).is_none());
        assert_eq!(model.rule_book().len(), 5);
    }

    #[test]
    fn test_golden_idle_engages_visible_target() {
        let out = output(AgentState::Idle, &senses(5.0, true), &full()).unwrap();
        assert!((out - 0.5).abs() < EPS, "out = {}", out);
        assert_eq!(
            controller_in(AgentState::Idle).evaluate(&senses(5.0, true), &full()),
            FuzzyDecision::Act(AgentState::Shoot)
        );
    }

    #[test]
    fn test_golden_idle_chases_distant_target() {
        let out = output(AgentState::Idle, &senses(18.0, false), &full()).unwrap();
        assert!((out - 2.5).abs() < EPS, "out = {}", out);
    }

    #[test]
    fn test_golden_half_far_averages_into_hide_band() {
        // far(14) = 0.5: shoot and move both clipped at 0.5, centroid between them
        let out = output(AgentState::Idle, &senses(14.0, true), &full()).unwrap();
        assert!((out - 1.5).abs() < EPS, "out = {}", out);
    }

    #[test]
    fn test_golden_shoot_holds_while_engaged() {
        assert_eq!(output(AgentState::Shoot, &senses(5.0, true), &full()), None);
        assert_eq!(
            controller_in(AgentState::Shoot).evaluate(&senses(5.0, true), &full()),
            FuzzyDecision::Hold(HoldReason::NoRuleFired)
        );
    }

    #[test]
    fn test_golden_shoot_empty_clip_hides() {
        let empty = ResourceSnapshot { ammo: 0, ..full() };
        let out = output(AgentState::Shoot, &senses(5.0, true), &empty).unwrap();
        assert!((out - 1.5).abs() < EPS, "out = {}", out);
    }

    #[test]
    fn test_golden_reload_spotted_hides() {
        let reloading = ResourceSnapshot {
            ammo: 0,
            finished_reloading: false,
            ..full()
        };
        assert_eq!(
            controller_in(AgentState::Reload).evaluate(&senses(9.0, true), &reloading),
            FuzzyDecision::Act(AgentState::Hide)
        );
    }

    #[test]
    fn test_golden_hide_reloads_at_spot_when_empty() {
        let at_spot = ResourceSnapshot {
            ammo: 0,
            at_hiding_spot: true,
            ..full()
        };
        let out = output(AgentState::Hide, &senses(9.0, false), &at_spot).unwrap();
        assert!((out - 3.5).abs() < EPS, "out = {}", out);
    }

    #[test]
    fn test_install_swaps_rules_once() {
        let mut controller = FuzzyController::new(model(), 12.0);
        assert_eq!(controller.installed_state(), AgentState::Idle);

        assert!(controller.install(AgentState::Shoot));
        assert!(!controller.install(AgentState::Shoot));
        assert_eq!(controller.installed_rules().map(|r| r.label()), Some("Shoot"));

        assert!(controller.install(AgentState::Dead));
        assert!(controller.installed_rules().is_none());
        assert_eq!(
            controller.evaluate(&senses(5.0, true), &full()),
            FuzzyDecision::Hold(HoldReason::NoRules)
        );
    }

    #[test]
    fn test_propose_keeps_state_on_hold() {
        let mut controller = FuzzyController::new(model(), 12.0);
        let next = controller.propose(AgentState::Shoot, &senses(5.0, true), &full());

        assert_eq!(next, AgentState::Shoot);
        assert_eq!(controller.installed_state(), AgentState::Shoot);
        assert_eq!(controller.last_output(), None);
    }

    proptest! {
        #[test]
        fn prop_membership_within_unit_interval(x in -50.0f32..150.0) {
            let model = model();
            for var in model.system().inputs().iter().chain(std::iter::once(model.system().output())) {
                for (_, mf) in var.terms() {
                    let degree = mf.degree(x);
                    prop_assert!((0.0..=1.0).contains(&degree));
                }
            }
        }

        #[test]
        fn prop_inference_is_deterministic_and_in_domain(
            state in 0u8..5,
            distance in 0.0f32..30.0,
            visible in any::<bool>(),
            health in 1u32..=100,
            target_health in 0u32..=100,
            ammo in 0u32..=10,
            finished in any::<bool>(),
            at_spot in any::<bool>(),
        ) {
            let state = AgentState::try_from(state).unwrap();
            let mut sensed = senses(distance, visible);
            sensed.target_health = target_health;
            let resources = ResourceSnapshot {
                health,
                ammo,
                finished_reloading: finished,
                at_hiding_spot: at_spot,
                ..full()
            };

            let controller = controller_in(state);
            let first = controller.infer(&sensed, &resources).unwrap();
            let second = controller.infer(&sensed, &resources).unwrap();

            prop_assert_eq!(first.map(f32::to_bits), second.map(f32::to_bits));
            if let Some(out) = first {
                prop_assert!((0.0..=4.0).contains(&out));
            }
        }
    }
}
