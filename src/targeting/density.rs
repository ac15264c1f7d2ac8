//! Screen density dimension.
//!
//! Resources are partitioned into the seven standard density buckets. The
//! `anydpi` qualifier pins an entry into every bucket including the master;
//! `nodpi` and unqualified entries stay in the master as the fallback.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use strum::EnumIter;

/// A standard density bucket, ordered LDPI → XXXHDPI.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, EnumIter)]
pub enum DensityBucket {
    Ldpi,
    Mdpi,
    Tvdpi,
    Hdpi,
    Xhdpi,
    Xxhdpi,
    Xxxhdpi,
}

impl DensityBucket {
    /// Anchor dpi value of this bucket.
    pub fn dpi(&self) -> u16 {
        match self {
            Self::Ldpi => 120,
            Self::Mdpi => 160,
            Self::Tvdpi => 213,
            Self::Hdpi => 240,
            Self::Xhdpi => 320,
            Self::Xxhdpi => 480,
            Self::Xxxhdpi => 640,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Ldpi => "ldpi",
            Self::Mdpi => "mdpi",
            Self::Tvdpi => "tvdpi",
            Self::Hdpi => "hdpi",
            Self::Xhdpi => "xhdpi",
            Self::Xxhdpi => "xxhdpi",
            Self::Xxxhdpi => "xxxhdpi",
        }
    }

    /// The bucket whose anchor dpi is closest to the given dpi value.
    /// Ties round up to the denser bucket.
    pub fn for_dpi(dpi: u16) -> Self {
        use strum::IntoEnumIterator;
        let mut best = Self::Mdpi;
        let mut best_distance = u16::MAX;
        for bucket in Self::iter() {
            let distance = bucket.dpi().abs_diff(dpi);
            if distance < best_distance || (distance == best_distance && bucket.dpi() > best.dpi())
            {
                best = bucket;
                best_distance = distance;
            }
        }
        best
    }
}

impl AsRef<str> for DensityBucket {
    fn as_ref(&self) -> &str {
        self.as_str()
    }
}

impl fmt::Display for DensityBucket {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for DensityBucket {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "ldpi" => Ok(Self::Ldpi),
            "mdpi" => Ok(Self::Mdpi),
            "tvdpi" => Ok(Self::Tvdpi),
            "hdpi" => Ok(Self::Hdpi),
            "xhdpi" => Ok(Self::Xhdpi),
            "xxhdpi" => Ok(Self::Xxhdpi),
            "xxxhdpi" => Ok(Self::Xxxhdpi),
            other => Err(format!("unrecognized density bucket: {other}")),
        }
    }
}

impl Serialize for DensityBucket {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for DensityBucket {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        Self::from_str(&s).map_err(serde::de::Error::custom)
    }
}

/// Density qualifier of a resource config, as declared in the resource table.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DensityQualifier {
    /// No density qualifier; the entry is density-agnostic.
    #[default]
    Unqualified,
    /// `nodpi`: never scaled, stays with the fallback resources.
    NoDpi,
    /// `anydpi`: valid for every density.
    AnyDpi,
    /// An explicit dpi value (e.g. 480 for xxhdpi).
    Dpi(u16),
}

impl DensityQualifier {
    /// The bucket an explicitly qualified entry belongs to, if any.
    pub fn bucket(&self) -> Option<DensityBucket> {
        match self {
            Self::Dpi(dpi) => Some(DensityBucket::for_dpi(*dpi)),
            _ => None,
        }
    }
}
