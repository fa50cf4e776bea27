use deskcalc_engine::scenario::{load_scenario, run_scenario};
use deskcalc_engine::{CommandRegistry, Status};

#[test]
fn test_smoke_scenario_passes() {
    let yaml = include_str!("../../../scenarios/smoke.yaml");
    let scenario = load_scenario(yaml).expect("smoke scenario parses");
    let result = run_scenario(&scenario, &CommandRegistry::new());

    for (i, step) in result.step_results.iter().enumerate() {
        assert_ne!(step.status, Status::Fail, "step {} failed: {:?}", i, step.error);
    }
    assert_eq!(result.overall_status, Status::Pass);
    assert_eq!(result.step_results.len(), scenario.steps.len());
}

#[test]
fn test_each_scenario_gets_fresh_calculator() {
    let first = load_scenario("steps:\n  - press: \"4 +\"\n").unwrap();
    let second = load_scenario("steps:\n  - press: \"2 =\"\n    expect_display: \"2\"\n").unwrap();
    let reg = CommandRegistry::new();

    assert_eq!(run_scenario(&first, &reg).overall_status, Status::Pass);
    assert_eq!(run_scenario(&second, &reg).overall_status, Status::Pass);
}
