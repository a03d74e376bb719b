//! Container version discriminant and creation target selector

use std::fmt;

use serde::Serialize;

use crate::error::{Error, Result};

/// MTX container version, stored as a u32 at offset 0
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum ContainerVersion {
    /// Two raw JPEG streams
    V0,
    /// JPEG/PNG color chunks with zlib alpha chunks
    V1,
    /// Wrapped PVR texture
    V2,
}

impl ContainerVersion {
    /// Map a discriminant to a version.
    ///
    /// # Errors
    /// Returns [`Error::UnsupportedVersion`] for anything but 0, 1 and 2.
    pub fn from_discriminant(value: u32) -> Result<Self> {
        match value {
            0 => Ok(Self::V0),
            1 => Ok(Self::V1),
            2 => Ok(Self::V2),
            version => Err(Error::UnsupportedVersion { version }),
        }
    }

    /// The on-disk discriminant (also the header magic)
    #[must_use]
    pub const fn discriminant(self) -> u32 {
        match self {
            Self::V0 => 0,
            Self::V1 => 1,
            Self::V2 => 2,
        }
    }

    /// Size of this version's file header
    #[must_use]
    pub const fn header_size(self) -> usize {
        match self {
            Self::V0 | Self::V1 => super::HEADER_V0V1_SIZE,
            Self::V2 => super::HEADER_V2_SIZE,
        }
    }

    /// Smallest file that can hold a container of this version
    #[must_use]
    pub const fn min_file_size(self) -> u64 {
        match self {
            Self::V0 | Self::V1 => super::HEADER_V0V1_SIZE as u64,
            Self::V2 => super::MIN_V2_FILE_SIZE,
        }
    }

    /// Extension of the files extracted from this version
    #[must_use]
    pub const fn output_extension(self) -> &'static str {
        match self {
            Self::V0 => "jpg",
            Self::V1 => "png",
            Self::V2 => "pvr",
        }
    }
}

impl fmt::Display for ContainerVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "MTXv{}", self.discriminant())
    }
}

/// Version to bake an image into
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TargetVersion {
    /// Pick from the input extension (`.jpg`/`.jpeg` → V0, `.png` → V1, `.pvr` → V2)
    #[default]
    Auto,
    /// Use exactly this version
    Exact(ContainerVersion),
}

impl TargetVersion {
    /// Parse the integer selector used on the command line (`-1` = auto).
    ///
    /// # Errors
    /// Returns [`Error::UnsupportedTargetVersion`] for values outside -1..=2.
    pub fn from_selector(selector: i32) -> Result<Self> {
        match selector {
            -1 => Ok(Self::Auto),
            0 => Ok(Self::Exact(ContainerVersion::V0)),
            1 => Ok(Self::Exact(ContainerVersion::V1)),
            2 => Ok(Self::Exact(ContainerVersion::V2)),
            _ => Err(Error::UnsupportedTargetVersion { selector }),
        }
    }

    /// Resolve against the version implied by the input extension
    #[must_use]
    pub fn resolve(self, implied: ContainerVersion) -> ContainerVersion {
        match self {
            Self::Auto => implied,
            Self::Exact(version) => version,
        }
    }
}

impl From<ContainerVersion> for TargetVersion {
    fn from(version: ContainerVersion) -> Self {
        Self::Exact(version)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;

    #[test]
    fn test_discriminants() {
        for version in [ContainerVersion::V0, ContainerVersion::V1, ContainerVersion::V2] {
            let parsed = ContainerVersion::from_discriminant(version.discriminant()).unwrap();
            assert_eq!(parsed, version);
        }
        let err = ContainerVersion::from_discriminant(3).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::UnsupportedVersion);
    }

    #[test]
    fn test_selector() {
        assert_eq!(TargetVersion::from_selector(-1).unwrap(), TargetVersion::Auto);
        assert_eq!(
            TargetVersion::from_selector(1).unwrap(),
            TargetVersion::Exact(ContainerVersion::V1)
        );
        assert!(TargetVersion::from_selector(-2).is_err());
        assert!(TargetVersion::from_selector(3).is_err());
    }

    #[test]
    fn test_resolve() {
        assert_eq!(TargetVersion::Auto.resolve(ContainerVersion::V1), ContainerVersion::V1);
        assert_eq!(
            TargetVersion::Exact(ContainerVersion::V0).resolve(ContainerVersion::V1),
            ContainerVersion::V0
        );
    }

    #[test]
    fn test_display() {
        assert_eq!(ContainerVersion::V2.to_string(), "MTXv2");
    }
}
