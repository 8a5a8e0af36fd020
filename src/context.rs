//! Provisioning context: paths resolved once at startup, the supported
//! host release floor, and the dry-run switch. Built in `main` and passed
//! by reference into every engine call; nothing here mutates afterwards.

use crate::error::EngineError;
use std::fs;
use std::path::PathBuf;

/// Minimum supported host release, compared in (major, minor) tuple order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MinVersion {
    pub major: u32,
    pub minor: u32,
}

impl MinVersion {
    /// Compare a host release against this floor. `None` means the host is
    /// supported; a message means the caller must abort before running any
    /// pipeline step.
    pub fn check(&self, major: u32, minor: u32) -> Option<String> {
        if (major, minor) < (self.major, self.minor) {
            return Some(format!(
                "minimum required release is {}.{}, host reports {}.{}",
                self.major, self.minor, major, minor
            ));
        }
        None
    }
}

/// Earliest Ubuntu release the pipelines are written against.
pub const MIN_RELEASE: MinVersion = MinVersion {
    major: 22,
    minor: 4,
};

/// Resolved paths and flags shared by every pipeline.
#[derive(Debug, Clone)]
pub struct Context {
    pub home: PathBuf,
    /// Root of the asset tree (the cloned provisioning repo).
    pub root: PathBuf,
    pub scripts: PathBuf,
    pub shell: PathBuf,
    pub system: PathBuf,
    pub vim: PathBuf,
    pub ohmyzsh: PathBuf,
    pub min_release: MinVersion,
    /// Trace commands instead of executing them.
    pub dry_run: bool,
}

impl Context {
    /// Resolve every base path once. Fails when no home directory can be
    /// determined for the invoking user.
    pub fn new(root_override: Option<PathBuf>, dry_run: bool) -> Result<Self, EngineError> {
        let home =
            dirs::home_dir().ok_or_else(|| EngineError::config("cannot resolve home directory"))?;
        let root = root_override.unwrap_or_else(|| home.join("ubuntu"));
        Ok(Self {
            scripts: root.join("scripts"),
            shell: root.join("shell"),
            system: root.join("system"),
            vim: root.join("vim"),
            ohmyzsh: home.join(".oh-my-zsh"),
            home,
            root,
            min_release: MIN_RELEASE,
            dry_run,
        })
    }

    /// Check the host release against the supported floor.
    pub fn check_host_release(&self) -> Result<Option<String>, EngineError> {
        let (major, minor) = host_release()?;
        Ok(self.min_release.check(major, minor))
    }
}

/// Read the host release from `/etc/os-release` (`VERSION_ID="22.04"`).
fn host_release() -> Result<(u32, u32), EngineError> {
    let text = fs::read_to_string("/etc/os-release")?;
    parse_version_id(&text)
        .ok_or_else(|| EngineError::config("no parsable VERSION_ID in /etc/os-release"))
}

fn parse_version_id(text: &str) -> Option<(u32, u32)> {
    let value = text
        .lines()
        .find_map(|line| line.strip_prefix("VERSION_ID="))?
        .trim()
        .trim_matches('"');
    // Releases without a point version (VERSION_ID="12") count as .0.
    let (major, minor) = match value.split_once('.') {
        Some((major, rest)) => (major, rest.split('.').next().unwrap_or("0")),
        None => (value, "0"),
    };
    Some((major.parse().ok()?, minor.parse().ok()?))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn version_floor_accepts_equal_and_newer() {
        let required = MinVersion {
            major: 3,
            minor: 10,
        };
        assert_eq!(required.check(3, 10), None);
        assert_eq!(required.check(3, 11), None);
        assert_eq!(required.check(4, 0), None);
    }

    #[test]
    fn version_floor_rejects_older_with_both_numbers() {
        let required = MinVersion {
            major: 3,
            minor: 10,
        };
        let message = required.check(3, 9).expect("3.9 is below the floor");
        assert!(message.contains("3.10"));
        assert!(message.contains("3.9"));
    }

    #[test]
    fn parses_quoted_point_release() {
        let text = "NAME=\"Ubuntu\"\nVERSION_ID=\"22.04\"\nID=ubuntu\n";
        assert_eq!(parse_version_id(text), Some((22, 4)));
    }

    #[test]
    fn parses_release_without_minor() {
        assert_eq!(parse_version_id("VERSION_ID=\"12\"\n"), Some((12, 0)));
    }

    #[test]
    fn missing_version_id_is_none() {
        assert_eq!(parse_version_id("NAME=other\n"), None);
    }

    #[test]
    fn paths_hang_off_root_and_home() {
        let ctx = Context::new(Some(PathBuf::from("/opt/assets")), false).expect("context");
        assert_eq!(ctx.shell, PathBuf::from("/opt/assets/shell"));
        assert_eq!(ctx.vim, PathBuf::from("/opt/assets/vim"));
        assert_eq!(ctx.ohmyzsh, ctx.home.join(".oh-my-zsh"));
    }
}
