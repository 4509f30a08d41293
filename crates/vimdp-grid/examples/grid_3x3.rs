//! Solve the 3x3 exercise grid for a given top-left reward and print the
//! rewards, utilities and policy.
//!
//! ```text
//! RUST_LOG=debug cargo run -p vimdp-grid --example grid_3x3 -- -3
//! ```

use std::process::ExitCode;

use tracing_subscriber::EnvFilter;
use vimdp_core::SolverConfig;
use vimdp_grid::{GridConfig, GridError, GridMdp};

const SCENARIO_YAML: &str = include_str!("../config/grid_3x3.yaml");

fn print_rows<T>(title: &str, rows: &[Vec<T>], cell: impl Fn(&T) -> String) {
    println!("{title}");
    for row in rows {
        let line: String = row.iter().map(&cell).collect();
        println!("{line}");
    }
    println!();
}

fn run(corner_reward: f64) -> Result<(), GridError> {
    let config = GridConfig::from_yaml_str(SCENARIO_YAML)?;
    let mut grid: GridMdp = config.build()?;
    grid.set_reward(0, 0, corner_reward)?;

    let report = grid.solve(&SolverConfig {
        gamma: config.gamma,
        ..SolverConfig::default()
    })?;

    print_rows("Rewards:", &grid.reward_map()?, |r| format!("{r:>9}"));
    print_rows("Utilities:", &grid.utility_map()?, |u| format!("{u:>9.2}"));
    print_rows("Policy:", &grid.policy_map()?, |d| format!("{:>9}", d.symbol()));
    println!("Converged after {} iterations", report.iterations);
    Ok(())
}

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let Some(corner_reward) = std::env::args().nth(1).and_then(|arg| arg.parse::<f64>().ok())
    else {
        eprintln!("usage: grid_3x3 <reward>");
        return ExitCode::from(2);
    };

    match run(corner_reward) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("error: {err}");
            ExitCode::FAILURE
        }
    }
}
