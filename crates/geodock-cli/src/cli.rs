use clap::{Args, Parser, Subcommand};
use geodock::engine::config::DeviceKind;
use std::path::PathBuf;

const HELP_TEMPLATE: &str = "\
{before-help}{name} {version}
{about-with-newline}
{usage-heading} {usage}

{all-args}{after-help}
";

#[derive(Parser, Debug)]
#[command(
    version,
    about = "GeoDock CLI - predict the bound complex of two protein structures with a pretrained language-model encoder and geometric docking model.",
    help_template = HELP_TEMPLATE,
)]
#[command(propagate_version = true)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Increase verbosity level (-v for INFO, -vv for DEBUG, -vvv for TRACE)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Suppress all log output except for errors
    #[arg(short, long, global = true, conflicts_with = "verbose")]
    pub quiet: bool,

    /// Write logs to a specified file in addition to the console output
    #[arg(long, global = true, value_name = "PATH")]
    pub log_file: Option<PathBuf>,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Dock two partner structures and predict their complex.
    Dock(DockArgs),
    /// Dock the bundled test pair (a9_1a95) with the DIPS checkpoint, writing `test.pdb`.
    Example(ExampleArgs),
}

/// Settings shared by every command that builds a runner.
#[derive(Args, Debug, Clone, Default)]
pub struct RunArgs {
    /// Path to a configuration file in TOML format.
    /// Defaults to `config.toml` in the platform configuration directory, if present.
    #[arg(short, long, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Override the docking-model checkpoint.
    #[arg(long, value_name = "PATH")]
    pub checkpoint: Option<PathBuf>,

    /// Compute device: cpu, accelerator, or auto.
    #[arg(short, long, value_name = "DEVICE")]
    pub device: Option<DeviceKind>,

    /// Only read this chain from each partner file.
    #[arg(long, value_name = "ID")]
    pub chain: Option<char>,

    /// Set a specific configuration value, overriding the config file and flags.
    /// Can be used multiple times. Example: -S backend.program=python3
    #[arg(short = 'S', long = "set", value_name = "KEY=VALUE", num_args(0..))]
    pub set_values: Vec<String>,
}

/// Arguments for the `dock` subcommand.
#[derive(Args, Debug)]
pub struct DockArgs {
    /// First partner structure (PDB).
    #[arg(required = true, value_name = "PARTNER1")]
    pub partner1: PathBuf,

    /// Second partner structure (PDB).
    #[arg(required = true, value_name = "PARTNER2")]
    pub partner2: PathBuf,

    /// Write the predicted complex here; `.pdb` is appended if no extension is given.
    #[arg(short, long, value_name = "PATH")]
    pub output: Option<PathBuf>,

    #[command(flatten)]
    pub run: RunArgs,
}

/// Arguments for the `example` subcommand.
#[derive(Args, Debug)]
pub struct ExampleArgs {
    #[command(flatten)]
    pub run: RunArgs,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn dock_parses_positionals_and_overrides() {
        let cli = Cli::try_parse_from([
            "geodock",
            "-vv",
            "dock",
            "r.pdb",
            "l.pdb",
            "-o",
            "out/complex",
            "--device",
            "cpu",
            "-S",
            "backend.program=python3",
        ])
        .unwrap();

        assert_eq!(cli.verbose, 2);
        let Commands::Dock(args) = cli.command else {
            panic!("expected dock command");
        };
        assert_eq!(args.partner1, PathBuf::from("r.pdb"));
        assert_eq!(args.partner2, PathBuf::from("l.pdb"));
        assert_eq!(args.output, Some(PathBuf::from("out/complex")));
        assert_eq!(args.run.device, Some(DeviceKind::Cpu));
        assert_eq!(args.run.set_values, vec!["backend.program=python3"]);
    }

    #[test]
    fn dock_requires_both_partners() {
        assert!(Cli::try_parse_from(["geodock", "dock", "r.pdb"]).is_err());
    }

    #[test]
    fn rejects_unknown_device() {
        assert!(Cli::try_parse_from(["geodock", "example", "--device", "tpu"]).is_err());
    }

    #[test]
    fn quiet_conflicts_with_verbose() {
        assert!(Cli::try_parse_from(["geodock", "-q", "-v", "example"]).is_err());
    }
}
