use bundleforge::apkset::OutputFormat;
use bundleforge::cli::{Cli, Command};
use bundleforge::commands::{ApkBuildMode, BuildApksCommand};
use bundleforge::error::Error;
use bundleforge::targeting::TargetingDimension;
use clap::Parser;
use std::collections::BTreeSet;
use std::str::FromStr;

fn main() {
    env_logger::init();
    if let Err(err) = run() {
        eprintln!("Error: {err}");
        std::process::exit(1);
    }
}

fn run() -> anyhow::Result<()> {
    let cli = Cli::parse();
    match cli.command {
        Command::BuildApks(args) => {
            let mode = ApkBuildMode::from_str(&args.mode).map_err(Error::invalid_command)?;
            let output_path = args
                .output
                .unwrap_or_else(|| args.bundle.with_extension("apks"));
            let split_dimension_override = args
                .split_dimension
                .iter()
                .map(|value| {
                    TargetingDimension::from_str(value.trim()).map_err(Error::invalid_command)
                })
                .collect::<Result<BTreeSet<_>, _>>()?;

            let command = BuildApksCommand {
                bundle_path: args.bundle,
                output_path,
                mode,
                output_format: if args.output_directory {
                    OutputFormat::Directory
                } else {
                    OutputFormat::ApkSet
                },
                device_spec_path: args.device_spec,
                split_dimension_override,
                fused_modules: args.fused_modules.into_iter().collect(),
                sdk_certificate_digest: args.sdk_certificate_digest,
                overwrite: args.overwrite,
            };
            let written = command.execute()?;
            println!("APK set written to {}", written.display());
        }
    }
    Ok(())
}
