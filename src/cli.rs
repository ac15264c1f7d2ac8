use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Converts an App Bundle into a set of device-targeted APKs.
    BuildApks(BuildApksArgs),
}

#[derive(clap::Args, Debug)]
pub struct BuildApksArgs {
    /// Path to the App Bundle (.aab)
    #[arg(long)]
    pub bundle: PathBuf,

    /// Output path; defaults to the bundle path with an .apks extension
    #[arg(long, short)]
    pub output: Option<PathBuf>,

    /// Build mode: default, universal or system
    #[arg(long, default_value = "default")]
    pub mode: String,

    /// Write the APKs loose into a directory instead of an .apks zip
    #[arg(long)]
    pub output_directory: bool,

    /// JSON device spec, required for system mode
    #[arg(long)]
    pub device_spec: Option<PathBuf>,

    /// Replace the configured split dimensions (e.g. "ABI,LANGUAGE")
    #[arg(long, value_delimiter = ',')]
    pub split_dimension: Vec<String>,

    /// Modules fused into the system APK in system mode
    #[arg(long, value_delimiter = ',')]
    pub fused_modules: Vec<String>,

    /// Certificate digest overriding runtime-enabled SDK dependencies
    #[arg(long)]
    pub sdk_certificate_digest: Option<String>,

    /// Overwrite the output if it exists
    #[arg(long)]
    pub overwrite: bool,
}
