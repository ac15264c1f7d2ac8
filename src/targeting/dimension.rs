//! The closed set of targeting dimensions.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use strum::EnumIter;

/// A dimension along which splits or shards may be targeted.
///
/// The string form is the SCREAMING_SNAKE_CASE name used in bundle
/// configuration directives and command-line overrides.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, EnumIter)]
pub enum TargetingDimension {
    Abi,
    ScreenDensity,
    Language,
    TextureCompressionFormat,
    DeviceTier,
    CountrySet,
    SdkVersion,
    GraphicsApi,
}

impl TargetingDimension {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Abi => "ABI",
            Self::ScreenDensity => "SCREEN_DENSITY",
            Self::Language => "LANGUAGE",
            Self::TextureCompressionFormat => "TEXTURE_COMPRESSION_FORMAT",
            Self::DeviceTier => "DEVICE_TIER",
            Self::CountrySet => "COUNTRY_SET",
            Self::SdkVersion => "SDK_VERSION",
            Self::GraphicsApi => "GRAPHICS_API",
        }
    }
}

impl AsRef<str> for TargetingDimension {
    fn as_ref(&self) -> &str {
        self.as_str()
    }
}

impl fmt::Display for TargetingDimension {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TargetingDimension {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "ABI" => Ok(Self::Abi),
            "SCREEN_DENSITY" => Ok(Self::ScreenDensity),
            "LANGUAGE" => Ok(Self::Language),
            "TEXTURE_COMPRESSION_FORMAT" => Ok(Self::TextureCompressionFormat),
            "DEVICE_TIER" => Ok(Self::DeviceTier),
            "COUNTRY_SET" => Ok(Self::CountrySet),
            "SDK_VERSION" => Ok(Self::SdkVersion),
            "GRAPHICS_API" => Ok(Self::GraphicsApi),
            other => Err(format!("unrecognized targeting dimension: {other}")),
        }
    }
}

impl Serialize for TargetingDimension {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for TargetingDimension {
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
    fn string_round_trip() {
        for dim in TargetingDimension::iter() {
            assert_eq!(TargetingDimension::from_str(dim.as_str()), Ok(dim));
        }
    }

    #[test]
    fn config_directive_names() {
        assert_eq!(
            TargetingDimension::TextureCompressionFormat.as_str(),
            "TEXTURE_COMPRESSION_FORMAT"
        );
        assert_eq!(TargetingDimension::CountrySet.as_str(), "COUNTRY_SET");
    }
}
