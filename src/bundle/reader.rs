//! Reads and validates a bundle archive into the in-memory model.

use crate::bundle::entry::{ByteSource, ModuleEntry, normalize_entry_path};
use crate::bundle::metadata::BundleMetadata;
use crate::bundle::module::BundleModule;
use crate::bundle::{AppBundle, BundleConfig};
use crate::codec;
use crate::error::{Error, Result};
use crate::manifest::AndroidManifest;
use indexmap::IndexMap;
use log::warn;
use regex::Regex;
use std::fs::File;
use std::io::Read;
use std::path::Path;
use std::sync::LazyLock;
use zip::ZipArchive;

pub const BUNDLE_CONFIG_FILE: &str = "BundleConfig.pb";
pub const METADATA_DIR: &str = "BUNDLE-METADATA";

const MANIFEST_PATH: &str = "manifest/AndroidManifest.xml";
const RESOURCE_TABLE_FILE: &str = "resources.pb";
const ASSETS_CONFIG_FILE: &str = "assets.pb";
const NATIVE_CONFIG_FILE: &str = "native.pb";
const APEX_CONFIG_FILE: &str = "apex.pb";

static MODULE_NAME: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[a-zA-Z][a-zA-Z0-9_]*$").expect("static regex"));

struct ModuleParts {
    manifest: Option<AndroidManifest>,
    resource_table: Option<Vec<u8>>,
    assets_config: Option<Vec<u8>>,
    native_config: Option<Vec<u8>>,
    apex_config: Option<Vec<u8>>,
    entries: Vec<ModuleEntry>,
}

impl ModuleParts {
    fn new() -> Self {
        Self {
            manifest: None,
            resource_table: None,
            assets_config: None,
            native_config: None,
            apex_config: None,
            entries: Vec::new(),
        }
    }
}

/// Reads a bundle zip from disk, validating its overall shape.
///
/// Entry content stays in the archive and is read lazily; only the config,
/// manifests and targeting blobs are decoded eagerly.
pub fn read_bundle(bundle_path: &Path) -> Result<AppBundle> {
    let file = File::open(bundle_path)?;
    let mut archive = ZipArchive::new(file)?;

    let mut config: Option<BundleConfig> = None;
    let mut metadata = BundleMetadata::default();
    let mut modules: IndexMap<String, ModuleParts> = IndexMap::new();

    for index in 0..archive.len() {
        let mut entry = archive.by_index(index)?;
        if entry.is_dir() {
            return Err(Error::invalid_bundle(format!(
                "bundle must not contain directory entries, found '{}'",
                entry.name()
            )));
        }
        let Some(path) = normalize_entry_path(entry.name()) else {
            return Err(Error::invalid_bundle(format!(
                "invalid entry path '{}'",
                entry.name()
            )));
        };

        if path == BUNDLE_CONFIG_FILE {
            config = Some(codec::decode_bundle_config(&read_all(&mut entry)?)?);
            continue;
        }

        let Some((root, rest)) = path.split_once('/') else {
            warn!("ignoring unrecognized root entry '{path}'");
            continue;
        };

        if root == METADATA_DIR {
            match rest.split_once('/') {
                Some((namespace, file_name)) => metadata.insert(
                    namespace,
                    file_name,
                    ByteSource::ZipEntry {
                        archive: bundle_path.to_path_buf(),
                        name: path.clone(),
                    },
                ),
                None => {
                    return Err(Error::invalid_bundle(format!(
                        "metadata file '{path}' is not namespaced"
                    )));
                }
            }
            continue;
        }

        if !MODULE_NAME.is_match(root) {
            return Err(Error::invalid_bundle(format!(
                "invalid module name '{root}'"
            )));
        }

        let parts = modules
            .entry(root.to_string())
            .or_insert_with(ModuleParts::new);
        match rest {
            MANIFEST_PATH => {
                parts.manifest = Some(codec::decode_manifest(&read_all(&mut entry)?)?);
            }
            RESOURCE_TABLE_FILE => parts.resource_table = Some(read_all(&mut entry)?),
            ASSETS_CONFIG_FILE => parts.assets_config = Some(read_all(&mut entry)?),
            NATIVE_CONFIG_FILE => parts.native_config = Some(read_all(&mut entry)?),
            APEX_CONFIG_FILE => parts.apex_config = Some(read_all(&mut entry)?),
            _ => {
                parts.entries.push(ModuleEntry::new(
                    rest,
                    ByteSource::ZipEntry {
                        archive: bundle_path.to_path_buf(),
                        name: path.clone(),
                    },
                ));
            }
        }
    }

    let config = config
        .ok_or_else(|| Error::invalid_bundle(format!("bundle has no {BUNDLE_CONFIG_FILE}")))?;
    // Fails fast on unparseable tool versions.
    config.version()?;

    let mut built_modules = Vec::with_capacity(modules.len());
    for (name, parts) in modules {
        built_modules.push(build_module(&name, parts)?);
    }

    Ok(AppBundle::new(built_modules, config, metadata))
}

fn build_module(name: &str, parts: ModuleParts) -> Result<BundleModule> {
    let manifest = parts.manifest.ok_or_else(|| {
        Error::invalid_bundle(format!("module '{name}' has no {MANIFEST_PATH}"))
    })?;
    let mut module = BundleModule::new(name, manifest);
    if let Some(bytes) = parts.resource_table {
        module = module.with_resource_table(codec::decode_resource_table(&bytes)?);
    }
    if let Some(bytes) = parts.assets_config {
        module = module.with_assets_config(codec::decode_assets_config(&bytes)?);
    }
    if let Some(bytes) = parts.native_config {
        module = module.with_native_config(codec::decode_native_config(&bytes)?);
    }
    if let Some(bytes) = parts.apex_config {
        module = module.with_apex_config(codec::decode_apex_config(&bytes)?);
    }
    Ok(module.with_entries(parts.entries))
}

fn read_all(entry: &mut impl Read) -> Result<Vec<u8>> {
    let mut bytes = Vec::new();
    entry.read_to_end(&mut bytes)?;
    Ok(bytes)
}
