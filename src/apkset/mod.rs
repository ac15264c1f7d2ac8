//! Serialization of the final splits into an APK set with a table of
//! contents.

mod serializer;
mod toc;
mod writer;

#[cfg(test)]
mod writer_test;

pub use serializer::{ApkSerializer, ZipApkSerializer};
pub use toc::{ApkDescription, ApkSetEntry, BuildApksResult, TOC_FILE, Variant};
pub use writer::{ApkSetWriter, OutputFormat};
