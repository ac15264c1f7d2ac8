//! Graphics API dimension (`#opengl_M.N` / `#vulkan_M.N` directory suffixes).

use serde::{Deserialize, Serialize};
use std::fmt;

/// A minimum graphics API version targeted by an asset directory.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum GraphicsApi {
    OpenGl { major: u16, minor: u16 },
    Vulkan { major: u16, minor: u16 },
}

impl GraphicsApi {
    /// Parses the `MAJOR.MINOR` value of an `opengl`/`vulkan` suffix.
    pub fn parse(key: &str, value: &str) -> Option<Self> {
        let (major, minor) = value.split_once('.')?;
        let major: u16 = major.parse().ok()?;
        let minor: u16 = minor.parse().ok()?;
        match key {
            "opengl" => Some(Self::OpenGl { major, minor }),
            "vulkan" => Some(Self::Vulkan { major, minor }),
            _ => None,
        }
    }
}

impl fmt::Display for GraphicsApi {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::OpenGl { major, minor } => write!(f, "opengl_{major}.{minor}"),
            Self::Vulkan { major, minor } => write!(f, "vulkan_{major}.{minor}"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_versions() {
        assert_eq!(
            GraphicsApi::parse("opengl", "3.1"),
            Some(GraphicsApi::OpenGl { major: 3, minor: 1 })
        );
        assert_eq!(
            GraphicsApi::parse("vulkan", "1.2"),
            Some(GraphicsApi::Vulkan { major: 1, minor: 2 })
        );
    }

    #[test]
    fn rejects_malformed_versions() {
        assert_eq!(GraphicsApi::parse("opengl", "3"), None);
        assert_eq!(GraphicsApi::parse("opengl", "a.b"), None);
        assert_eq!(GraphicsApi::parse("metal", "1.0"), None);
    }
}
