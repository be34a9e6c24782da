use std::{io::Read, path::PathBuf, process::ExitCode};

use clap::Parser;
use colored::Colorize;

mod input;

#[derive(clap::Parser)]
#[command(version, about = "Fit the best plane through a 3D point cloud")]
struct Command {
	/// Input file with points. Reads from stdin if not specified.
	input_file: Option<PathBuf>,

	/// Format of the input
	#[arg(long, value_enum, default_value_t = input::Format::Auto)]
	format: input::Format,

	/// Only inspect the first point and use the input without a copy
	#[arg(long = "unsafe")]
	trust_input: bool,

	/// Log debug information
	#[arg(long, short)]
	verbose: bool,

	#[command(flatten)]
	settings: Settings,
}

#[derive(clap::Args)]
struct Settings {
	/// Solver for the eigen decomposition
	#[arg(long, value_enum, default_value_t = SolverKind::Iterative)]
	solver: SolverKind,

	/// Convergence threshold for the iterative solver
	#[arg(long, default_value_t = f64::EPSILON)]
	epsilon: f64,

	/// Iteration limit for the iterative solver. 0 for no limit.
	#[arg(long, default_value_t = 0)]
	max_iterations: usize,
}

#[derive(Clone, Copy, clap::ValueEnum)]
enum SolverKind {
	Iterative,
	Analytic,
}

impl Command {
	fn options(&self) -> planer::Options {
		planer::Options {
			eigen: self.settings.eigen_options(),
			admission: if self.trust_input {
				planer::Admission::Unsafe
			} else {
				planer::Admission::Safe
			},
		}
	}
}

impl Settings {
	fn eigen_options(&self) -> planer::EigenOptions {
		let solver = match self.solver {
			SolverKind::Iterative => planer::Solver::Iterative {
				epsilon: self.epsilon,
				max_iterations: self.max_iterations,
			},
			SolverKind::Analytic => planer::Solver::Analytic,
		};
		planer::EigenOptions { solver }
	}
}

#[derive(thiserror::Error, Debug)]
enum Error {
	#[error(transparent)]
	Io(#[from] std::io::Error),

	#[error(transparent)]
	Input(#[from] input::Error),

	#[error(transparent)]
	Fit(#[from] planer::Error),

	#[error(transparent)]
	Output(#[from] serde_json::Error),
}

fn main() -> ExitCode {
	let command = Command::parse();

	let level = if command.verbose {
		log::LevelFilter::Debug
	} else {
		log::LevelFilter::Warn
	};
	if let Err(err) = simple_logger::SimpleLogger::new().with_level(level).init() {
		eprintln!("Could not initialize logger: {}", err);
	}

	match run(command) {
		Ok(()) => ExitCode::SUCCESS,
		Err(err) => {
			eprintln!("{} {}", "Error:".bold().red(), err);
			ExitCode::FAILURE
		},
	}
}

fn run(command: Command) -> Result<(), Error> {
	let source = match &command.input_file {
		Some(path) => std::fs::read_to_string(path)?,
		None => {
			let mut source = String::new();
			std::io::stdin().read_to_string(&mut source)?;
			source
		},
	};

	let points = input::parse(&source, command.format)?;
	log::info!("Fitting plane through {} points", points.len());

	let result = planer::fit(points.as_slice(), &command.options())?;
	if result.is_none() {
		log::warn!("At least {} points are required, found {}", planer::MIN_POINTS, points.len());
	}

	println!("{}", serde_json::to_string_pretty(&result)?);
	Ok(())
}

#[cfg(test)]
mod tests {
	use super::*;

	fn options(args: &[&str]) -> planer::Options {
		Command::try_parse_from(std::iter::once("planer").chain(args.iter().copied()))
			.unwrap()
			.options()
	}

	#[test]
	fn defaults() {
		assert_eq!(options(&[]), planer::Options::default());
		assert_eq!(options(&["points.txt", "--format", "text"]), planer::Options::default());
	}

	#[test]
	fn solver_flags() {
		assert_eq!(
			options(&["--solver", "analytic"]).eigen.solver,
			planer::Solver::Analytic,
		);
		assert_eq!(
			options(&["--epsilon", "1e-9", "--max-iterations", "25"]).eigen.solver,
			planer::Solver::Iterative { epsilon: 1e-9, max_iterations: 25 },
		);
	}

	#[test]
	fn unsafe_flag() {
		assert_eq!(options(&["--unsafe"]).admission, planer::Admission::Unsafe);
		assert_eq!(options(&[]).admission, planer::Admission::Safe);
	}

	#[test]
	fn invalid_solver() {
		assert!(Command::try_parse_from(["planer", "--solver", "power"]).is_err());
	}
}
