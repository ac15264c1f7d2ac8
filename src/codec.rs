//! Decoding and encoding of the structured blobs inside bundles and APK
//! sets (`BundleConfig.pb`, `resources.pb`, targeting configs, `toc.pb`).
//!
//! The wire protobuf codec is an external collaborator: this module is the
//! seam where it plugs in. The built-in codec speaks JSON so the crate is
//! self-contained and testable end to end; a prost-backed codec drops in at
//! the same function boundaries. Manifests are additionally accepted as
//! plain XML text for hand-authored inputs.

use crate::bundle::{ApexConfig, AssetsConfig, BundleConfig, NativeConfig};
use crate::error::{Error, Result};
use crate::manifest::{AndroidManifest, parse_xml};
use crate::resources::ResourceTable;
use serde::Serialize;
use serde::de::DeserializeOwned;

pub fn decode_bundle_config(bytes: &[u8]) -> Result<BundleConfig> {
    decode("bundle config", bytes)
}

pub fn encode_bundle_config(config: &BundleConfig) -> Result<Vec<u8>> {
    encode(config)
}

pub fn decode_resource_table(bytes: &[u8]) -> Result<ResourceTable> {
    decode("resource table", bytes)
}

pub fn encode_resource_table(table: &ResourceTable) -> Result<Vec<u8>> {
    encode(table)
}

/// Manifests are accepted in two encodings: the structured tree (JSON) and
/// plain XML text (first non-space byte `<`).
pub fn decode_manifest(bytes: &[u8]) -> Result<AndroidManifest> {
    let text = std::str::from_utf8(bytes)
        .map_err(|_| Error::invalid_bundle("manifest is not valid UTF-8"))?;
    if text.trim_start().starts_with('<') {
        return Ok(AndroidManifest::new(parse_xml(text)?));
    }
    decode("manifest", bytes)
}

pub fn encode_manifest(manifest: &AndroidManifest) -> Result<Vec<u8>> {
    encode(manifest)
}

pub fn decode_assets_config(bytes: &[u8]) -> Result<AssetsConfig> {
    decode("assets config", bytes)
}

pub fn decode_native_config(bytes: &[u8]) -> Result<NativeConfig> {
    decode("native config", bytes)
}

pub fn decode_apex_config(bytes: &[u8]) -> Result<ApexConfig> {
    decode("apex config", bytes)
}

pub fn encode_toc<T: Serialize>(toc: &T) -> Result<Vec<u8>> {
    serde_json::to_vec_pretty(toc).map_err(|e| Error::internal(format!("toc encoding failed: {e}")))
}

fn decode<T: DeserializeOwned>(what: &str, bytes: &[u8]) -> Result<T> {
    serde_json::from_slice(bytes)
        .map_err(|e| Error::invalid_bundle(format!("malformed {what}: {e}")))
}

fn encode<T: Serialize>(value: &T) -> Result<Vec<u8>> {
    serde_json::to_vec(value).map_err(|e| Error::internal(format!("encoding failed: {e}")))
}
