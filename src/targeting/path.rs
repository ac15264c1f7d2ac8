//! Targeted directory names in asset paths.
//!
//! A directory segment targeting a dimension is spelled `<base>#<key>_<value>`.
//! Supported keys: `opengl`, `vulkan`, `lang`, `tcf`, `tier`, `countries`.
//! After targeting has been captured, the suffix of the selected variant can
//! be stripped so variant directories collapse into the canonical path.

use crate::error::{Error, Result, UserError, UserErrorKind};
use crate::targeting::{GraphicsApi, TargetingDimension, TextureCompressionFormat};
use regex::Regex;
use std::fmt;
use std::str::FromStr;
use std::sync::LazyLock;

static TIER_VALUE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[a-zA-Z][a-zA-Z0-9_]*$").expect("static regex"));
static LANG_VALUE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[a-zA-Z]{2,3}$").expect("static regex"));

/// A targeting key accepted in directory suffixes.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum TargetingKey {
    OpenGl,
    Vulkan,
    Lang,
    Tcf,
    Tier,
    Countries,
}

impl TargetingKey {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::OpenGl => "opengl",
            Self::Vulkan => "vulkan",
            Self::Lang => "lang",
            Self::Tcf => "tcf",
            Self::Tier => "tier",
            Self::Countries => "countries",
        }
    }

    pub fn dimension(&self) -> TargetingDimension {
        match self {
            Self::OpenGl | Self::Vulkan => TargetingDimension::GraphicsApi,
            Self::Lang => TargetingDimension::Language,
            Self::Tcf => TargetingDimension::TextureCompressionFormat,
            Self::Tier => TargetingDimension::DeviceTier,
            Self::Countries => TargetingDimension::CountrySet,
        }
    }
}

impl FromStr for TargetingKey {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s {
            "opengl" => Ok(Self::OpenGl),
            "vulkan" => Ok(Self::Vulkan),
            "lang" => Ok(Self::Lang),
            "tcf" => Ok(Self::Tcf),
            "tier" => Ok(Self::Tier),
            "countries" => Ok(Self::Countries),
            other => Err(format!("unrecognized targeting key: {other}")),
        }
    }
}

impl fmt::Display for TargetingKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A parsed targeting value, typed by its dimension.
#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum TargetingValue {
    Language(String),
    TextureCompressionFormat(TextureCompressionFormat),
    DeviceTier(String),
    CountrySet(String),
    GraphicsApi(GraphicsApi),
}

impl TargetingValue {
    pub fn dimension(&self) -> TargetingDimension {
        match self {
            Self::Language(_) => TargetingDimension::Language,
            Self::TextureCompressionFormat(_) => TargetingDimension::TextureCompressionFormat,
            Self::DeviceTier(_) => TargetingDimension::DeviceTier,
            Self::CountrySet(_) => TargetingDimension::CountrySet,
            Self::GraphicsApi(_) => TargetingDimension::GraphicsApi,
        }
    }
}

/// One path segment, with its targeting suffix if present.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TargetedDirectorySegment {
    pub base: String,
    pub key: Option<TargetingKey>,
    pub value: Option<TargetingValue>,
}

impl TargetedDirectorySegment {
    /// Parses a single segment of the form `base` or `base#key_value`.
    pub fn parse(segment: &str, full_path: &str) -> Result<Self> {
        let Some((base, suffix)) = segment.split_once('#') else {
            return Ok(Self {
                base: segment.to_string(),
                key: None,
                value: None,
            });
        };
        if base.is_empty() || suffix.contains('#') {
            return Err(invalid_directory(full_path, segment));
        }
        let Some((key_str, value_str)) = suffix.split_once('_') else {
            return Err(invalid_directory(full_path, segment));
        };
        let key = TargetingKey::from_str(key_str).map_err(|_| {
            Error::User(
                UserError::new(
                    UserErrorKind::FileTypeUnknownTargetingKey,
                    format!("unknown targeting key '{key_str}' in directory '{segment}'"),
                )
                .with_path(full_path),
            )
        })?;
        let value = parse_value(key, value_str)
            .ok_or_else(|| invalid_value(full_path, key, value_str))?;
        Ok(Self {
            base: base.to_string(),
            key: Some(key),
            value: Some(value),
        })
    }

    /// The segment as written in the bundle, suffix included.
    pub fn to_segment(&self) -> String {
        match (&self.key, &self.value) {
            (Some(key), Some(value)) => format!("{}#{}_{}", self.base, key, value_str(value)),
            _ => self.base.clone(),
        }
    }
}

fn parse_value(key: TargetingKey, value: &str) -> Option<TargetingValue> {
    match key {
        TargetingKey::OpenGl | TargetingKey::Vulkan => {
            GraphicsApi::parse(key.as_str(), value).map(TargetingValue::GraphicsApi)
        }
        TargetingKey::Lang => LANG_VALUE
            .is_match(value)
            .then(|| TargetingValue::Language(value.to_lowercase())),
        TargetingKey::Tcf => TextureCompressionFormat::from_str(value)
            .ok()
            .map(TargetingValue::TextureCompressionFormat),
        TargetingKey::Tier => TIER_VALUE
            .is_match(value)
            .then(|| TargetingValue::DeviceTier(value.to_string())),
        TargetingKey::Countries => TIER_VALUE
            .is_match(value)
            .then(|| TargetingValue::CountrySet(value.to_string())),
    }
}

fn value_str(value: &TargetingValue) -> String {
    match value {
        TargetingValue::Language(lang) => lang.clone(),
        TargetingValue::TextureCompressionFormat(tcf) => tcf.as_str().to_string(),
        TargetingValue::DeviceTier(tier) => tier.clone(),
        TargetingValue::CountrySet(cs) => cs.clone(),
        TargetingValue::GraphicsApi(api) => {
            // Display is `key_M.N`; only the version part belongs here.
            let rendered = api.to_string();
            rendered
                .split_once('_')
                .map(|(_, version)| version.to_string())
                .unwrap_or(rendered)
        }
    }
}

fn invalid_directory(path: &str, segment: &str) -> Error {
    Error::User(
        UserError::new(
            UserErrorKind::FileTypeInvalidDirectory,
            format!("malformed targeted directory segment '{segment}'"),
        )
        .with_path(path),
    )
}

fn invalid_value(path: &str, key: TargetingKey, value: &str) -> Error {
    Error::User(
        UserError::new(
            UserErrorKind::FileTypeInvalidTargetingValue,
            format!("invalid value '{value}' for targeting key '{key}'"),
        )
        .with_path(path),
    )
}

/// A directory path whose segments may carry targeting suffixes.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TargetedDirectory {
    pub segments: Vec<TargetedDirectorySegment>,
}

impl TargetedDirectory {
    /// Parses every segment of a forward-slash directory path.
    pub fn parse(dir_path: &str) -> Result<Self> {
        let segments = dir_path
            .split('/')
            .map(|segment| TargetedDirectorySegment::parse(segment, dir_path))
            .collect::<Result<Vec<_>>>()?;
        Ok(Self { segments })
    }

    /// All targeting values captured along the path.
    pub fn targeting(&self) -> Vec<TargetingValue> {
        self.segments
            .iter()
            .filter_map(|segment| segment.value.clone())
            .collect()
    }

    /// The first targeting value for the given dimension, if any.
    pub fn targeting_for(&self, dimension: TargetingDimension) -> Option<&TargetingValue> {
        self.segments
            .iter()
            .filter_map(|segment| segment.value.as_ref())
            .find(|value| value.dimension() == dimension)
    }

    /// The path as written, suffixes included.
    pub fn to_path(&self) -> String {
        self.segments
            .iter()
            .map(TargetedDirectorySegment::to_segment)
            .collect::<Vec<_>>()
            .join("/")
    }

    /// The path with every suffix of the given dimension dropped,
    /// collapsing the variant directory into the canonical one.
    pub fn strip_dimension(&self, dimension: TargetingDimension) -> String {
        self.segments
            .iter()
            .map(|segment| match &segment.value {
                Some(value) if value.dimension() == dimension => segment.base.clone(),
                _ => segment.to_segment(),
            })
            .collect::<Vec<_>>()
            .join("/")
    }
}
