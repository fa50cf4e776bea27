//! `calcctl` – headless CLI harness for the desk-calculator engine.
//!
//! Drives the same engine any front end uses, with key sequences given on
//! the command line, from YAML scenarios, interactively, or over a socket.

mod config;
mod logging;
mod repl;
mod serve;

use clap::{Parser, Subcommand};
use deskcalc_engine::types::*;
use deskcalc_engine::{AngleMode, AppContext, CommandRegistry, CommandResult};
use std::path::{Path, PathBuf};

// ===========================================================================
// CLI definition
// ===========================================================================

#[derive(Parser)]
#[command(
    name = "calcctl",
    version,
    about = "CLI harness for the desk-calculator engine"
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Press a sequence of keys on a fresh calculator and show the display.
    Press {
        /// Keys, e.g. `3.5 + 2 =` or `90 sin`.
        #[arg(required = true, allow_hyphen_values = true)]
        keys: Vec<String>,
        /// Angle mode for trigonometric keys.
        #[arg(long, default_value = "deg")]
        mode: AngleMode,
        /// Output as JSON.
        #[arg(long)]
        json: bool,
    },

    /// Invoke an engine command by name with JSON args.
    Call {
        /// Command name (e.g. "press", "state", "keys").
        cmd: String,
        /// JSON args to pass to the command.
        #[arg(long, default_value = "{}")]
        args: String,
        /// Output as JSON.
        #[arg(long)]
        json: bool,
    },

    /// Run a scripted scenario from a YAML file.
    RunScenario {
        /// Path to the scenario YAML file.
        file: PathBuf,
        /// Directory for artifacts output.
        #[arg(long)]
        artifacts: Option<PathBuf>,
        /// Output as JSON.
        #[arg(long)]
        json: bool,
    },

    /// Interactive calculator on the terminal.
    Repl,

    /// Start daemon mode over a Unix socket.
    Serve {
        /// Path for the Unix domain socket.
        #[arg(long)]
        socket: PathBuf,
    },
}

// ===========================================================================
// Main
// ===========================================================================

#[tokio::main]
async fn main() {
    let config = config::get_config();
    logging::init_logging(&config.logging);

    let cli = Cli::parse();
    let registry = CommandRegistry::new();

    match cli.command {
        Commands::Press { keys, mode, json } => cmd_press(&keys, mode, json, &registry),
        Commands::Call { cmd, args, json } => cmd_call(&cmd, &args, json, &registry),
        Commands::RunScenario {
            file,
            artifacts,
            json,
        } => cmd_run_scenario(&file, json, artifacts, &registry),
        Commands::Repl => repl::run_repl(&config.presentation),
        Commands::Serve { socket } => serve::run_daemon(socket, registry).await,
    }
}

// ===========================================================================
// Subcommand implementations
// ===========================================================================

fn cmd_press(keys: &[String], mode: AngleMode, json: bool, registry: &CommandRegistry) {
    let ctx = AppContext::default_headless().with_angle_mode(mode);
    let line = keys.join(" ");
    let mut result = registry.execute("press", serde_json::json!({ "keys": line }), &ctx);
    result.command = "press".to_string();
    result.target = line;
    output_result(&result, json);
}

fn cmd_call(cmd: &str, args_str: &str, json: bool, registry: &CommandRegistry) {
    let args: serde_json::Value = match serde_json::from_str(args_str) {
        Ok(v) => v,
        Err(e) => {
            let r = result_err(
                "call",
                cmd,
                &new_run_id(),
                0,
                ErrorCode::InvalidInput,
                format!("invalid JSON args: {}", e),
            );
            output_result(&r, json);
            return;
        }
    };

    let ctx = AppContext::default_headless();
    let result = registry.execute(cmd, args, &ctx);
    output_result(&result, json);
}

fn cmd_run_scenario(
    file: &Path,
    json: bool,
    artifacts: Option<PathBuf>,
    registry: &CommandRegistry,
) {
    let yaml = match std::fs::read_to_string(file) {
        Ok(s) => s,
        Err(e) => {
            let r = result_err(
                "run-scenario",
                &file.display().to_string(),
                &new_run_id(),
                0,
                ErrorCode::IoError,
                format!("cannot read scenario file: {}", e),
            );
            output_result(&r, json);
            return;
        }
    };

    let scenario = match deskcalc_engine::scenario::load_scenario(&yaml) {
        Ok(s) => s,
        Err(e) => {
            let r = result_err(
                "run-scenario",
                &file.display().to_string(),
                &new_run_id(),
                0,
                ErrorCode::InvalidInput,
                e,
            );
            output_result(&r, json);
            return;
        }
    };

    let scenario_result = deskcalc_engine::scenario::run_scenario(&scenario, registry);

    if json {
        let j = serde_json::to_string_pretty(&scenario_result).unwrap_or_default();
        println!("{}", j);
    } else {
        println!(
            "Scenario: {}",
            scenario_result.name.as_deref().unwrap_or("<unnamed>")
        );
        println!("Overall: {:?}", scenario_result.overall_status);
        for (i, sr) in scenario_result.step_results.iter().enumerate() {
            let display = sr
                .data
                .as_ref()
                .and_then(|d| d.get("display"))
                .and_then(|d| d.as_str())
                .unwrap_or("-");
            println!(
                "  Step {}: {} -> {:?} [{}] ({}ms)",
                i, sr.target, sr.status, display, sr.timing_ms
            );
            if let Some(ref err) = sr.error {
                println!("    {} – {}", err.code, err.message);
            }
        }
    }

    if let Some(ref dir) = artifacts {
        write_scenario_artifacts(dir, &scenario_result);
    }

    if scenario_result.overall_status == Status::Fail {
        std::process::exit(1);
    }
}

// ===========================================================================
// Output helpers
// ===========================================================================

fn output_result(result: &CommandResult, json: bool) {
    if json {
        let j = serde_json::to_string_pretty(result).unwrap_or_default();
        println!("{}", j);
    } else {
        print_human(result);
    }

    // Exit with non-zero status on error/fail
    match result.status {
        Status::Pass => {}
        Status::Fail => std::process::exit(1),
        Status::Error => std::process::exit(2),
    }
}

fn print_human(r: &CommandResult) {
    let status_icon = match r.status {
        Status::Pass => "PASS",
        Status::Fail => "FAIL",
        Status::Error => "ERROR",
    };

    // A press shows the display first; that is what a user reads.
    if r.status == Status::Pass && r.command == "press" {
        if let Some(display) = r
            .data
            .as_ref()
            .and_then(|d| d.get("display"))
            .and_then(|d| d.as_str())
        {
            println!("{}", display);
            return;
        }
    }

    println!("[{}] {} {}", status_icon, r.command, r.target);
    println!("  run_id: {}", r.run_id);
    println!("  timing: {}ms", r.timing_ms);

    if let Some(ref err) = r.error {
        println!("  error:  {} – {}", err.code, err.message);
    }

    if let Some(ref data) = r.data {
        if let Ok(s) = serde_json::to_string_pretty(data) {
            for line in s.lines() {
                println!("  {}", line);
            }
        }
    }
}

// ===========================================================================
// Artifact helpers
// ===========================================================================

fn write_scenario_artifacts(dir: &Path, scenario_result: &ScenarioResult) {
    let art_dir = dir.join(new_run_id());
    if let Err(e) = std::fs::create_dir_all(&art_dir) {
        eprintln!(
            "warning: failed to create artifacts dir {}: {}",
            art_dir.display(),
            e
        );
        return;
    }

    let result_path = art_dir.join("result.json");
    let j = serde_json::to_string_pretty(scenario_result).unwrap_or_default();
    if let Err(e) = std::fs::write(&result_path, j) {
        eprintln!("warning: failed to write {}: {}", result_path.display(), e);
    }

    // One line per step
    let events_path = art_dir.join("events.jsonl");
    let mut lines = String::new();
    for sr in &scenario_result.step_results {
        if let Ok(line) = serde_json::to_string(sr) {
            lines.push_str(&line);
            lines.push('\n');
        }
    }
    if let Err(e) = std::fs::write(&events_path, lines) {
        eprintln!("warning: failed to write {}: {}", events_path.display(), e);
    }
}
