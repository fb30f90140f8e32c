use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::TypeError;

/// Kind of filesystem entry.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FileKind {
    File,
    Directory,
}

impl fmt::Display for FileKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::File => write!(f, "file"),
            Self::Directory => write!(f, "directory"),
        }
    }
}

/// Metadata of an existing file or directory.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct FileStat {
    pub kind: FileKind,
    /// Length in bytes; only reported for files.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub length: Option<u64>,
    /// Last modification time, when the platform reports one.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub modified: Option<DateTime<Utc>>,
}

impl FileStat {
    pub fn is_dir(&self) -> bool {
        self.kind == FileKind::Directory
    }
}

/// POSIX-style 9-bit permission mode: rwx for owner, group, and other.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "u32", into = "u32")]
pub struct PermissionMode(u16);

impl PermissionMode {
    const READ: u32 = 0o444;
    const WRITE: u32 = 0o222;
    const EXEC: u32 = 0o111;

    /// Create a mode from its numeric value. Bits above `0o777` are rejected.
    pub fn new(bits: u32) -> Result<Self, TypeError> {
        if bits > 0o777 {
            return Err(TypeError::ModeOutOfRange(bits));
        }
        Ok(Self(bits as u16))
    }

    /// Parse an octal string such as `"755"` or `"0o644"`.
    pub fn from_octal(s: &str) -> Result<Self, TypeError> {
        let digits = s.trim_start_matches("0o");
        let bits =
            u32::from_str_radix(digits, 8).map_err(|_| TypeError::InvalidOctal(s.to_string()))?;
        Self::new(bits)
    }

    pub fn bits(&self) -> u32 {
        self.0 as u32
    }

    /// Project onto the two-tier owner/other model.
    ///
    /// For each of read, write, and execute: an "other" bit grants the
    /// permission to everyone; otherwise an owner or group bit grants it to
    /// the owner only; otherwise it is denied. Group granularity is lost.
    pub fn to_two_tier(&self) -> TwoTierPermissions {
        let bits = self.bits();
        let tier = |mask: u32| {
            if bits & mask & 0o007 != 0 {
                PermissionTier::Everyone
            } else if bits & mask & 0o770 != 0 {
                PermissionTier::OwnerOnly
            } else {
                PermissionTier::Denied
            }
        };
        TwoTierPermissions {
            read: tier(Self::READ),
            write: tier(Self::WRITE),
            execute: tier(Self::EXEC),
        }
    }
}

impl TryFrom<u32> for PermissionMode {
    type Error = TypeError;

    fn try_from(bits: u32) -> Result<Self, Self::Error> {
        Self::new(bits)
    }
}

impl From<PermissionMode> for u32 {
    fn from(mode: PermissionMode) -> Self {
        mode.bits()
    }
}

impl fmt::Debug for PermissionMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "PermissionMode({:03o})", self.0)
    }
}

impl fmt::Display for PermissionMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:03o}", self.0)
    }
}

/// Who holds a permission under the two-tier model.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PermissionTier {
    Denied,
    OwnerOnly,
    Everyone,
}

/// Owner/other permission flags, the coarsest model a platform may offer.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TwoTierPermissions {
    pub read: PermissionTier,
    pub write: PermissionTier,
    pub execute: PermissionTier,
}

impl TwoTierPermissions {
    /// Expand back to a 9-bit mode. `Everyone` sets the bit for all three
    /// classes, `OwnerOnly` for the owner alone.
    pub fn to_mode(&self) -> PermissionMode {
        let expand = |tier: PermissionTier, owner_bit: u32| match tier {
            PermissionTier::Denied => 0,
            PermissionTier::OwnerOnly => owner_bit,
            PermissionTier::Everyone => owner_bit | (owner_bit >> 3) | (owner_bit >> 6),
        };
        let bits = expand(self.read, 0o400) | expand(self.write, 0o200) | expand(self.execute, 0o100);
        PermissionMode(bits as u16)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn rejects_bits_above_777() {
        assert_eq!(PermissionMode::new(0o1000), Err(TypeError::ModeOutOfRange(0o1000)));
        assert!(PermissionMode::new(0o777).is_ok());
    }

    #[test]
    fn parses_octal_strings() {
        assert_eq!(PermissionMode::from_octal("755").unwrap().bits(), 0o755);
        assert_eq!(PermissionMode::from_octal("0o644").unwrap().bits(), 0o644);
        assert!(PermissionMode::from_octal("9").is_err());
    }

    #[test]
    fn world_readable_is_everyone() {
        let tt = PermissionMode::new(0o644).unwrap().to_two_tier();
        assert_eq!(tt.read, PermissionTier::Everyone);
        assert_eq!(tt.write, PermissionTier::OwnerOnly);
        assert_eq!(tt.execute, PermissionTier::Denied);
    }

    #[test]
    fn group_bits_fold_into_owner() {
        let tt = PermissionMode::new(0o070).unwrap().to_two_tier();
        assert_eq!(tt.read, PermissionTier::OwnerOnly);
        assert_eq!(tt.to_mode().bits(), 0o700);
    }

    #[test]
    fn lossy_mapping_is_documented_behavior() {
        // 750 cannot be expressed: group access collapses onto the owner.
        let mode = PermissionMode::new(0o750).unwrap();
        assert_eq!(mode.to_two_tier().to_mode().bits(), 0o700);
        // 755 survives intact.
        let mode = PermissionMode::new(0o755).unwrap();
        assert_eq!(mode.to_two_tier().to_mode().bits(), 0o755);
    }

    #[test]
    fn serde_as_number() {
        let mode = PermissionMode::new(0o600).unwrap();
        assert_eq!(serde_json::to_string(&mode).unwrap(), "384");
        assert!(serde_json::from_str::<PermissionMode>("4096").is_err());
    }

    #[test]
    fn file_stat_skips_absent_length() {
        let stat = FileStat { kind: FileKind::Directory, length: None, modified: None };
        let json = serde_json::to_value(&stat).unwrap();
        assert_eq!(json["kind"], "directory");
        assert!(json.get("length").is_none());
        assert!(stat.is_dir());
    }

    proptest! {
        #[test]
        fn projection_is_idempotent(bits in 0u32..=0o777) {
            let once = PermissionMode::new(bits).unwrap().to_two_tier().to_mode();
            let twice = once.to_two_tier().to_mode();
            prop_assert_eq!(once, twice);
        }
    }
}
