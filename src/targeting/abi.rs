//! Native ABI dimension.
//!
//! The declaration order of [`Abi`] is the architecture preference order used
//! by variant comparison and by deterministic splitter output:
//! ARMEABI < ARMEABI_V7A < ARM64_V8A < X86 < X86_64 < MIPS < MIPS64.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use strum::EnumIter;

/// A native ABI, ordered by architecture preference.
#[allow(non_camel_case_types)]
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, EnumIter)]
pub enum Abi {
    Armeabi,
    ArmeabiV7a,
    Arm64V8a,
    X86,
    X86_64,
    Mips,
    Mips64,
}

impl Abi {
    /// The directory name used under `lib/` in bundles and APKs.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Armeabi => "armeabi",
            Self::ArmeabiV7a => "armeabi-v7a",
            Self::Arm64V8a => "arm64-v8a",
            Self::X86 => "x86",
            Self::X86_64 => "x86_64",
            Self::Mips => "mips",
            Self::Mips64 => "mips64",
        }
    }

    /// Split-id friendly form: the directory name with `-` replaced by `_`.
    pub fn suffix(&self) -> String {
        self.as_str().replace('-', "_")
    }

    pub fn is_64_bit(&self) -> bool {
        matches!(self, Self::Arm64V8a | Self::X86_64 | Self::Mips64)
    }

    /// Parses a `lib/<abi>` directory name.
    pub fn from_dir_name(name: &str) -> Option<Self> {
        Self::from_str(name).ok()
    }
}

impl AsRef<str> for Abi {
    fn as_ref(&self) -> &str {
        self.as_str()
    }
}

impl fmt::Display for Abi {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Abi {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "armeabi" => Ok(Self::Armeabi),
            "armeabi-v7a" => Ok(Self::ArmeabiV7a),
            "arm64-v8a" => Ok(Self::Arm64V8a),
            "x86" => Ok(Self::X86),
            "x86_64" => Ok(Self::X86_64),
            "mips" => Ok(Self::Mips),
            "mips64" => Ok(Self::Mips64),
            other => Err(format!("unrecognized ABI: {other}")),
        }
    }
}

/// Sanitizer instrumentation carried by a dedicated native-libraries split.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Sanitizer {
    HwAddress,
}

impl Sanitizer {
    pub fn suffix(&self) -> &'static str {
        match self {
            Self::HwAddress => "hwasan",
        }
    }
}

impl Serialize for Abi {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for Abi {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        Self::from_str(&s).map_err(serde::de::Error::custom)
    }
}
