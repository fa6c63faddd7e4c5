use anyhow::{bail, Context, Result};
use serde::Deserialize;
use std::fmt;

/// Four-component version (MAJOR.MINOR.PATCH.BUILD)
///
/// Accepts `[1, 2, 3]`, `[1, 2, 3, 4]` or `"1.2.3.4"` in TOML. Missing
/// trailing components are padded with zeros.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(try_from = "RawVersion")]
pub struct VersionQuad([u16; 4]);

#[derive(Deserialize)]
#[serde(untagged)]
enum RawVersion {
    Parts(Vec<u16>),
    Text(String),
}

impl TryFrom<RawVersion> for VersionQuad {
    type Error = anyhow::Error;

    fn try_from(raw: RawVersion) -> Result<Self> {
        match raw {
            RawVersion::Parts(parts) => Self::from_parts(&parts),
            RawVersion::Text(text) => Self::parse(&text),
        }
    }
}

impl VersionQuad {
    pub fn new(major: u16, minor: u16, patch: u16, build: u16) -> Self {
        Self([major, minor, patch, build])
    }

    pub fn from_parts(parts: &[u16]) -> Result<Self> {
        if parts.is_empty() || parts.len() > 4 {
            bail!(
                "Version must have between 1 and 4 components, got {}",
                parts.len()
            );
        }
        let mut quad = [0u16; 4];
        quad[..parts.len()].copy_from_slice(parts);
        Ok(Self(quad))
    }

    pub fn parse(text: &str) -> Result<Self> {
        let parts = text
            .trim()
            .trim_start_matches('v')
            .split('.')
            .map(|part| {
                part.parse::<u16>()
                    .with_context(|| format!("Invalid version component '{}' in '{}'", part, text))
            })
            .collect::<Result<Vec<_>>>()?;
        Self::from_parts(&parts)
    }

    /// Semantic version used for the product version (MAJOR.MINOR.PATCH)
    pub fn package_version(&self) -> String {
        let [major, minor, patch, _] = self.0;
        format!("{}.{}.{}", major, minor, patch)
    }

    /// Full four-component file version
    pub fn file_version(&self) -> String {
        self.to_string()
    }
}

impl fmt::Display for VersionQuad {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let [major, minor, patch, build] = self.0;
        write!(f, "{}.{}.{}.{}", major, minor, patch, build)
    }
}
