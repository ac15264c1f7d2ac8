//! # bundleforge
//!
//! A high-performance library for converting Android App Bundles into sets
//! of installable, device-targeted APKs.
//!
//! **bundleforge** is a Rust rewrite of the core of Google's bundletool,
//! covering the module→split transformation pipeline, standalone and
//! system-image sharding, optimization-directive merging and bundle
//! re-compression.
//!
//! ## Quick Start
//!
//! Use [`commands::BuildApksCommand`] to convert a bundle:
//!
//! ```rust,no_run
//! use bundleforge::apkset::OutputFormat;
//! use bundleforge::commands::{ApkBuildMode, BuildApksCommand};
//! use std::collections::BTreeSet;
//! use std::path::PathBuf;
//!
//! # fn main() -> Result<(), bundleforge::error::Error> {
//! let command = BuildApksCommand {
//!     bundle_path: PathBuf::from("app.aab"),
//!     output_path: PathBuf::from("app.apks"),
//!     mode: ApkBuildMode::Default,
//!     output_format: OutputFormat::ApkSet,
//!     device_spec_path: None,
//!     split_dimension_override: BTreeSet::new(),
//!     fused_modules: BTreeSet::new(),
//!     sdk_certificate_digest: None,
//!     overwrite: false,
//! };
//! let written = command.execute()?;
//! println!("APK set written to {}", written.display());
//! # Ok(())
//! # }
//! ```
//!
//! ## Architecture
//!
//! The library is organized along the pipeline's dataflow:
//!
//! - [`bundle`]: the in-memory bundle model and archive reader
//! - [`preprocess`]: whole-bundle rewrites (embedded APK signing marks,
//!   runtime SDK certificates, parallel re-compression)
//! - [`optimizations`]: version-pinned defaults reconciled with developer
//!   directives
//! - [`splitters`]: the per-dimension splitting pipeline
//! - [`sanitize`]: module sanitizers run before splitting
//! - [`merge`]: same-targeting fusion and alternative-targeting population
//! - [`shards`]: standalone and system APK generation
//! - [`apkset`]: APK serialization and the table of contents
//! - [`targeting`], [`resources`], [`manifest`], [`device`]: the value
//!   models the stages operate on
//! - [`error`]: the user/internal error taxonomy
//!
//! Signing, device interaction, resource compilation and the binary wire
//! codecs are external collaborators behind narrow seams
//! ([`apkset::ApkSerializer`], [`codec`]).

pub mod apkset;
pub mod bundle;
pub mod cli;
pub mod codec;
pub mod commands;
pub mod device;
pub mod error;
pub mod manifest;
pub mod merge;
pub mod optimizations;
pub mod preprocess;
pub mod resources;
pub mod sanitize;
pub mod shards;
pub mod split;
pub mod splitters;
pub mod targeting;

pub use bundle::{AppBundle, read_bundle};
pub use commands::{ApkBuildMode, BuildApksCommand};
pub use error::{Error, Result, UserError, UserErrorKind};
pub use split::{ModuleSplit, SplitType};
