//! Snapshot format version management

/// Snapshot format version using semantic versioning
///
/// Stored uncompressed in the snapshot header so a reader can refuse a file
/// before touching the payload.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FormatVersion {
    pub major: u8,
    pub minor: u8,
    pub patch: u8,
}

/// Current snapshot format version
pub const CURRENT_VERSION: FormatVersion = FormatVersion {
    major: 1,
    minor: 0,
    patch: 0,
};

impl FormatVersion {
    /// Check if a file written with `other` can be read by this version
    ///
    /// Major versions must match. Minor and patch differences are tolerated in
    /// both directions.
    pub fn can_read(&self, other: &FormatVersion) -> bool {
        self.major == other.major
    }

    pub(crate) fn to_bytes(self) -> [u8; 3] {
        [self.major, self.minor, self.patch]
    }

    pub(crate) fn from_bytes(bytes: [u8; 3]) -> Self {
        Self {
            major: bytes[0],
            minor: bytes[1],
            patch: bytes[2],
        }
    }
}

impl std::fmt::Display for FormatVersion {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}.{}.{}", self.major, self.minor, self.patch)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_version_compatibility() {
        let v1_0_0 = FormatVersion {
            major: 1,
            minor: 0,
            patch: 0,
        };
        let v1_3_2 = FormatVersion {
            major: 1,
            minor: 3,
            patch: 2,
        };
        let v2_0_0 = FormatVersion {
            major: 2,
            minor: 0,
            patch: 0,
        };

        assert!(v1_0_0.can_read(&v1_3_2));
        assert!(v1_3_2.can_read(&v1_0_0));
        assert!(!v1_0_0.can_read(&v2_0_0));
        assert!(!v2_0_0.can_read(&v1_0_0));
    }

    #[test]
    fn test_version_display() {
        assert_eq!(CURRENT_VERSION.to_string(), "1.0.0");
    }

    #[test]
    fn test_version_bytes() {
        let version = FormatVersion::from_bytes([4, 5, 6]);
        assert_eq!(version.major, 4);
        assert_eq!(version.minor, 5);
        assert_eq!(version.patch, 6);
        assert_eq!(version.to_bytes(), [4, 5, 6]);
    }
}
