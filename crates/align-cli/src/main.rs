use std::{
    fs,
    path::{Path, PathBuf},
};

use align_pipeline::{
    run_barrel_comparison, run_rotation_fit, BarrelComparisonInput, CompareConfig,
    RotationFitConfig, RotationFitInput,
};
use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use log::info;
use serde::{de::DeserializeOwned, Serialize};

#[derive(Debug, Parser)]
#[command(author, version, about = "Rotation fits and geometry comparisons for alignment")]
struct Cli {
    #[command(subcommand)]
    command: Command,

    /// Repeat for more log output (info, debug, trace).
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Fit the rotation between corresponding current and nominal points.
    Fit {
        /// JSON RotationFitInput.
        #[arg(long)]
        input: PathBuf,
        /// JSON RotationFitConfig; defaults when omitted.
        #[arg(long)]
        config: Option<PathBuf>,
        /// Write the report here instead of stdout.
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
    /// Misalign a synthetic barrel and compare every det against nominal.
    Compare {
        /// JSON BarrelComparisonInput.
        #[arg(long)]
        input: PathBuf,
        /// JSON CompareConfig; defaults when omitted.
        #[arg(long)]
        config: Option<PathBuf>,
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
}

fn read_json<T: DeserializeOwned>(path: &Path, what: &str) -> Result<T> {
    let data = fs::read_to_string(path)
        .with_context(|| format!("cannot read {what} file {}", path.display()))?;
    serde_json::from_str(&data)
        .with_context(|| format!("{what} file {} is not valid", path.display()))
}

fn read_config<T: DeserializeOwned + Default>(path: Option<&Path>) -> Result<T> {
    match path {
        Some(path) => read_json(path, "config"),
        None => Ok(T::default()),
    }
}

fn emit<T: Serialize>(report: &T, output: Option<&Path>) -> Result<String> {
    let json = serde_json::to_string_pretty(report)?;
    if let Some(path) = output {
        fs::write(path, &json)
            .with_context(|| format!("cannot write report to {}", path.display()))?;
        info!("report written to {}", path.display());
    }
    Ok(json)
}

fn fit(input: &Path, config: Option<&Path>, output: Option<&Path>) -> Result<String> {
    let input: RotationFitInput = read_json(input, "input")?;
    let config: RotationFitConfig = read_config(config)?;
    emit(&run_rotation_fit(&input, &config)?, output)
}

fn compare(input: &Path, config: Option<&Path>, output: Option<&Path>) -> Result<String> {
    let input: BarrelComparisonInput = read_json(input, "input")?;
    let config: CompareConfig = read_config(config)?;
    emit(&run_barrel_comparison(&input, &config)?, output)
}

fn run(command: &Command) -> Result<String> {
    match command {
        Command::Fit {
            input,
            config,
            output,
        } => fit(input, config.as_deref(), output.as_deref()),
        Command::Compare {
            input,
            config,
            output,
        } => compare(input, config.as_deref(), output.as_deref()),
    }
}

fn main() {
    let cli = Cli::parse();
    env_logger::Builder::from_default_env()
        .filter_level(match cli.verbose {
            0 => log::LevelFilter::Warn,
            1 => log::LevelFilter::Info,
            2 => log::LevelFilter::Debug,
            _ => log::LevelFilter::Trace,
        })
        .init();

    match run(&cli.command) {
        Ok(json) => {
            let to_stdout = match &cli.command {
                Command::Fit { output, .. } | Command::Compare { output, .. } => output.is_none(),
            };
            if to_stdout {
                println!("{json}");
            }
        }
        Err(err) => {
            eprintln!("error: {err:#}");
            std::process::exit(1);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use align_core::{rot_y, synthetic::cloud, vec3_to_array, Vec3};
    use align_pipeline::{ComparisonReport, RotationFitReport};
    use tempfile::{tempdir, NamedTempFile};

    fn write_json<T: Serialize>(value: &T, path: &Path) {
        serde_json::to_writer_pretty(fs::File::create(path).unwrap(), value).unwrap();
    }

    fn synthetic_points() -> RotationFitInput {
        let nominal = cloud::box_corners(Vec3::new(2.0, 1.0, 0.5));
        let current = cloud::rotated(&rot_y(0.004), &nominal);
        RotationFitInput {
            current: current.iter().map(vec3_to_array).collect(),
            nominal: nominal.iter().map(vec3_to_array).collect(),
        }
    }

    #[test]
    fn fit_reads_input_and_config() {
        let input = NamedTempFile::new().unwrap();
        let config = NamedTempFile::new().unwrap();
        write_json(&synthetic_points(), input.path());
        fs::write(config.path(), r#"{"diff_rot": {"tolerance": 1e-20}}"#).unwrap();

        let json = fit(input.path(), Some(config.path()), None).unwrap();
        let report: RotationFitReport = serde_json::from_str(&json).unwrap();
        assert!((report.angles[1] - 0.004).abs() < 1e-9, "{:?}", report.angles);
        assert!(report.rms_after < 1e-9, "rms after fit: {}", report.rms_after);
    }

    #[test]
    fn failing_file_is_named_in_the_error() {
        let input = NamedTempFile::new().unwrap();
        write_json(&synthetic_points(), input.path());

        let missing = Path::new("/nonexistent/points.json");
        let err = fit(missing, None, None).unwrap_err();
        assert!(format!("{err:#}").contains("cannot read input file"), "{err:#}");

        let broken = NamedTempFile::new().unwrap();
        fs::write(broken.path(), "{ not json").unwrap();
        let err = fit(input.path(), Some(broken.path()), None).unwrap_err();
        let message = format!("{err:#}");
        assert!(message.contains("config file"), "{message}");
        assert!(message.contains(&broken.path().display().to_string()));
    }

    #[test]
    fn compare_writes_the_report_file() {
        let dir = tempdir().unwrap();
        let input = dir.path().join("barrel.json");
        let output = dir.path().join("report.json");
        fs::write(
            &input,
            r#"{"misalignments": [{"det_id": 1202, "translation": [0.0, 0.03, 0.0]}]}"#,
        )
        .unwrap();

        let json = compare(&input, None, Some(&output)).unwrap();
        assert_eq!(fs::read_to_string(&output).unwrap(), json);

        let report: ComparisonReport = serde_json::from_str(&json).unwrap();
        assert_eq!(report.dets.len(), 24);
        assert!((report.max_translation() - 0.03).abs() < 1e-9);
    }

    #[test]
    fn subcommands_parse() {
        let args = ["align-cli", "-vv", "compare", "--input", "b.json"];
        let cli = Cli::try_parse_from(args).unwrap();
        assert_eq!(cli.verbose, 2);
        assert!(matches!(cli.command, Command::Compare { output: None, .. }));
        assert!(Cli::try_parse_from(["align-cli", "fit"]).is_err());
    }
}
