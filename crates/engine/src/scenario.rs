//! Scenario runner – execute scripted key sequences from YAML files.

use crate::commands::CommandRegistry;
use crate::context::AppContext;
use crate::event;
use crate::types::*;
use std::time::Instant;

/// Load a scenario from a YAML string.
pub fn load_scenario(yaml: &str) -> Result<Scenario, String> {
    serde_yaml::from_str(yaml).map_err(|e| format!("failed to parse scenario YAML: {}", e))
}

/// Execute a scenario against a fresh headless session.
pub fn run_scenario(scenario: &Scenario, registry: &CommandRegistry) -> ScenarioResult {
    let ctx = AppContext::default_headless();
    run_scenario_in(scenario, &ctx, registry)
}

/// Execute a scenario against an existing session.
pub fn run_scenario_in(
    scenario: &Scenario,
    ctx: &AppContext,
    registry: &CommandRegistry,
) -> ScenarioResult {
    let mut step_results = Vec::new();
    let mut overall = Status::Pass;

    for (i, step) in scenario.steps.iter().enumerate() {
        let result = match step {
            ScenarioStep::Press {
                press,
                expect_display,
            } => run_press_step(i, press, expect_display.as_deref(), ctx),
            ScenarioStep::Call {
                call,
                args,
                expect_status,
            } => {
                let r = registry.execute(call, args.clone(), ctx);
                let actual_status = r.status.as_str();
                if actual_status != expect_status {
                    tracing::warn!(
                        step = i,
                        expected = %expect_status,
                        actual = %actual_status,
                        "scenario step status mismatch"
                    );
                    overall = Status::Fail;
                }
                r
            }
        };
        if matches!(step, ScenarioStep::Press { .. }) && result.status != Status::Pass {
            overall = Status::Fail;
        }
        step_results.push(result);
    }

    ScenarioResult {
        name: scenario.name.clone(),
        overall_status: overall,
        step_results,
    }
}

fn run_press_step(
    index: usize,
    keys: &str,
    expect_display: Option<&str>,
    ctx: &AppContext,
) -> CommandResult {
    let run_id = new_run_id();
    let start = Instant::now();

    let events = match event::tokenize_keys(keys) {
        Ok(events) => events,
        Err(e) => {
            return result_err(
                "press",
                keys,
                &run_id,
                start.elapsed().as_millis() as u64,
                ErrorCode::InvalidInput,
                e.to_string(),
            );
        }
    };

    let snapshot = ctx.with_calculator(|c| {
        c.dispatch_all(events);
        c.snapshot()
    });
    if let Err(e) = ctx.present() {
        tracing::warn!(error = %e, "presenter failed");
    }
    let elapsed = start.elapsed().as_millis() as u64;
    let data = serde_json::to_value(&snapshot).unwrap_or_default();

    if let Some(expected) = expect_display {
        if snapshot.display != expected {
            tracing::warn!(
                step = index,
                expected = %expected,
                actual = %snapshot.display,
                "scenario display mismatch"
            );
            let mut r = result_fail(
                "press",
                keys,
                &run_id,
                elapsed,
                format!("expected display {:?}, got {:?}", expected, snapshot.display),
                serde_json::json!({ "expected": expected, "actual": snapshot.display }),
            );
            r.data = Some(data);
            return r;
        }
    }

    let mut r = result_ok("press", keys, &run_id, elapsed);
    r.data = Some(data);
    r
}
