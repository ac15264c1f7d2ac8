//! Re-normalizes entry compression across the whole bundle so later
//! serialization can copy compressed payloads verbatim instead of
//! re-deflating them.

use crate::bundle::{
    AppBundle, AssetModuleCompression, BUNDLE_CONFIG_FILE, DeliveryType, METADATA_DIR, ModuleType,
    read_bundle,
};
use crate::error::Result;
use crate::preprocess::BundlePreprocessor;
use flate2::Compression;
use flate2::write::DeflateEncoder;
use glob::Pattern;
use std::fs::File;
use std::io::{Read, Write};
use std::path::{Path, PathBuf};
use std::sync::mpsc;
use zip::write::SimpleFileOptions;
use zip::{CompressionMethod, ZipArchive, ZipWriter};

/// How one entry's bytes are stored in the rewritten bundle.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum CompressionChoice {
    /// Copy the entry as compressed in the source archive.
    SameAsSource,
    /// Store uncompressed.
    NoCompression,
    /// Deflate, falling back to stored when deflate does not shrink.
    DefaultCompression,
}

/// Classifies one bundle entry by its full archive path.
pub fn classify_entry(bundle: &AppBundle, path: &str) -> CompressionChoice {
    // Entries outside any module: config, metadata, root extras.
    if path == BUNDLE_CONFIG_FILE || path.starts_with(&format!("{METADATA_DIR}/")) {
        return CompressionChoice::SameAsSource;
    }
    let Some((module_name, rest)) = path.split_once('/') else {
        return CompressionChoice::SameAsSource;
    };
    let Some(module) = bundle.module(module_name) else {
        return CompressionChoice::SameAsSource;
    };

    // Assets of asset modules delivered on demand, or whose install-time
    // default is uncompressed, ship stored so the platform can map them.
    if module.module_type() == ModuleType::Asset
        && rest.starts_with("assets/")
        && (module.delivery_type() == DeliveryType::OnDemand
            || bundle.config().compression.install_time_asset_module_default
                != AssetModuleCompression::Compressed)
    {
        return CompressionChoice::NoCompression;
    }

    // Anything the downstream resource compiler converts to binary format
    // is rewritten later anyway; compressing it here would be wasted work.
    if rest.starts_with("manifest/")
        || rest.starts_with("res/")
        || rest == "resources.pb"
        || rest.ends_with(".pb")
    {
        return CompressionChoice::NoCompression;
    }

    // Developer-configured globs match against the module-relative path.
    for glob in &bundle.config().compression.uncompressed_glob {
        if Pattern::new(glob).is_ok_and(|pattern| pattern.matches(rest)) {
            return CompressionChoice::SameAsSource;
        }
    }

    CompressionChoice::DefaultCompression
}

/// Runs the re-compression rewrite into a caller-owned target path, then
/// re-reads the normalized bundle.
pub struct RecompressionPreprocessor {
    source: PathBuf,
    target: PathBuf,
}

impl RecompressionPreprocessor {
    pub fn new(source: impl Into<PathBuf>, target: impl Into<PathBuf>) -> Self {
        Self {
            source: source.into(),
            target: target.into(),
        }
    }
}

impl BundlePreprocessor for RecompressionPreprocessor {
    fn preprocess(&self, bundle: AppBundle) -> Result<AppBundle> {
        recompress_bundle(&bundle, &self.source, &self.target)?;
        read_bundle(&self.target)
    }
}

struct PlannedEntry {
    name: String,
    choice: CompressionChoice,
    size: u64,
}

/// Rewrites the bundle archive with normalized per-entry compression.
///
/// Classification is pure and runs serially. `DEFAULT_COMPRESSION` entries
/// above the configured threshold are trial-compressed on the rayon pool
/// and gathered in completion order; everything else is handled on the
/// caller thread while the pool works.
pub fn recompress_bundle(bundle: &AppBundle, source_path: &Path, target_path: &Path) -> Result<()> {
    let threshold = bundle.config().recompression_threshold_bytes();

    let mut source = ZipArchive::new(File::open(source_path)?)?;
    let mut writer = ZipWriter::new(File::create(target_path)?);

    let mut inline: Vec<PlannedEntry> = Vec::new();
    let mut pooled: Vec<PlannedEntry> = Vec::new();
    for index in 0..source.len() {
        let entry = source.by_index(index)?;
        let planned = PlannedEntry {
            name: entry.name().to_string(),
            choice: classify_entry(bundle, entry.name()),
            size: entry.size(),
        };
        drop(entry);
        if planned.choice == CompressionChoice::DefaultCompression && planned.size > threshold {
            pooled.push(planned);
        } else {
            inline.push(planned);
        }
    }

    let (tx, rx) = mpsc::channel::<Result<(String, Vec<u8>, bool)>>();
    rayon::scope(|scope| -> Result<()> {
        for planned in &pooled {
            let tx = tx.clone();
            let source_path = source_path.to_path_buf();
            let name = planned.name.clone();
            scope.spawn(move |_| {
                let _ = tx.send(trial_compress_from(&source_path, &name));
            });
        }
        drop(tx);

        // Small and copy-through entries on the caller thread.
        for planned in &inline {
            match planned.choice {
                CompressionChoice::SameAsSource => {
                    writer.raw_copy_file(source.by_name(&planned.name)?)?;
                }
                CompressionChoice::NoCompression => {
                    let bytes = read_entry(&mut source, &planned.name)?;
                    write_entry(&mut writer, &planned.name, &bytes, false)?;
                }
                CompressionChoice::DefaultCompression => {
                    let bytes = read_entry(&mut source, &planned.name)?;
                    let compress = deflated_len(&bytes)? < bytes.len() as u64;
                    write_entry(&mut writer, &planned.name, &bytes, compress)?;
                }
            }
        }

        // Pooled results land in completion order; no ordering guarantee.
        for result in rx {
            let (name, bytes, compress) = result?;
            write_entry(&mut writer, &name, &bytes, compress)?;
        }
        Ok(())
    })?;

    writer.finish()?;
    Ok(())
}

/// Worker task: reads one entry out of its own archive handle and decides
/// whether deflate shrinks it.
fn trial_compress_from(source_path: &Path, name: &str) -> Result<(String, Vec<u8>, bool)> {
    let mut archive = ZipArchive::new(File::open(source_path)?)?;
    let bytes = read_entry(&mut archive, name)?;
    let compress = deflated_len(&bytes)? < bytes.len() as u64;
    Ok((name.to_string(), bytes, compress))
}

fn read_entry(archive: &mut ZipArchive<File>, name: &str) -> Result<Vec<u8>> {
    let mut entry = archive.by_name(name)?;
    let mut bytes = Vec::new();
    entry.read_to_end(&mut bytes)?;
    Ok(bytes)
}

fn deflated_len(bytes: &[u8]) -> Result<u64> {
    let mut encoder = DeflateEncoder::new(CountingSink::default(), Compression::default());
    encoder.write_all(bytes)?;
    Ok(encoder.finish()?.written)
}

fn write_entry(
    writer: &mut ZipWriter<File>,
    name: &str,
    bytes: &[u8],
    compress: bool,
) -> Result<()> {
    let method = if compress {
        CompressionMethod::Deflated
    } else {
        CompressionMethod::Stored
    };
    writer.start_file(name, SimpleFileOptions::default().compression_method(method))?;
    writer.write_all(bytes)?;
    Ok(())
}

/// Write sink that only counts, so trial compression never buffers output.
#[derive(Default)]
struct CountingSink {
    written: u64,
}

impl Write for CountingSink {
    fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
        self.written += buf.len() as u64;
        Ok(buf.len())
    }

    fn flush(&mut self) -> std::io::Result<()> {
        Ok(())
    }
}
