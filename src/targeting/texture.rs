//! Texture compression format dimension.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use strum::EnumIter;

/// A texture compression format, the closed set accepted in `#tcf_` suffixes.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, EnumIter)]
pub enum TextureCompressionFormat {
    Astc,
    Atc,
    Dxt1,
    Etc1,
    Etc2,
    Paletted,
    Pvrtc,
    S3tc,
    ThreeDc,
}

impl TextureCompressionFormat {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Astc => "astc",
            Self::Atc => "atc",
            Self::Dxt1 => "dxt1",
            Self::Etc1 => "etc1",
            Self::Etc2 => "etc2",
            Self::Paletted => "paletted",
            Self::Pvrtc => "pvrtc",
            Self::S3tc => "s3tc",
            Self::ThreeDc => "3dc",
        }
    }
}

impl AsRef<str> for TextureCompressionFormat {
    fn as_ref(&self) -> &str {
        self.as_str()
    }
}

impl fmt::Display for TextureCompressionFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TextureCompressionFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "astc" => Ok(Self::Astc),
            "atc" => Ok(Self::Atc),
            "dxt1" => Ok(Self::Dxt1),
            "etc1" => Ok(Self::Etc1),
            "etc2" => Ok(Self::Etc2),
            "paletted" => Ok(Self::Paletted),
            "pvrtc" => Ok(Self::Pvrtc),
            "s3tc" => Ok(Self::S3tc),
            "3dc" => Ok(Self::ThreeDc),
            other => Err(format!("unrecognized texture compression format: {other}")),
        }
    }
}

impl Serialize for TextureCompressionFormat {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for TextureCompressionFormat {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        Self::from_str(&s).map_err(serde::de::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use strum::IntoEnumIterator;

    #[test]
    fn round_trip_all_formats() {
        for tcf in TextureCompressionFormat::iter() {
            assert_eq!(
                TextureCompressionFormat::from_str(tcf.as_str()),
                Ok(tcf),
                "{tcf:?}"
            );
        }
    }

    #[test]
    fn numeric_leading_name() {
        assert_eq!(
            TextureCompressionFormat::from_str("3dc"),
            Ok(TextureCompressionFormat::ThreeDc)
        );
        assert_eq!(TextureCompressionFormat::ThreeDc.to_string(), "3dc");
    }

    #[test]
    fn unknown_format_rejected() {
        assert!(TextureCompressionFormat::from_str("bc7").is_err());
    }
}
