//! Minimal view of `Cargo.lock`, shared by `build.rs` and its tests.

use serde::Deserialize;

#[derive(Debug, Deserialize)]
pub struct Lockfile {
    #[serde(default)]
    pub package: Vec<LockedPackage>,
}

#[derive(Debug, Deserialize)]
pub struct LockedPackage {
    pub name: String,
    pub version: String,
}

impl Lockfile {
    pub fn parse(text: &str) -> Result<Self, toml::de::Error> {
        toml::from_str(text)
    }

    /// Version of the first locked package called `name`.
    pub fn version_of(&self, name: &str) -> Option<&str> {
        self.package
            .iter()
            .find(|p| p.name == name)
            .map(|p| p.version.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn finds_locked_versions_in_any_layout() {
        let lock = Lockfile::parse(
            r#"
version = 3

[[package]]
name = "anstream"
version = "0.6.15"

[[package]]
version = "4.5.20"
source = "registry+https://github.com/rust-lang/crates.io-index"
name = "clap"

[[package]]
name="which"
checksum = "abc"

version="7.0.2"
"#,
        )
        .unwrap();
        assert_eq!(lock.version_of("clap"), Some("4.5.20"));
        assert_eq!(lock.version_of("which"), Some("7.0.2"));
        assert_eq!(lock.version_of("flate2"), None);
    }

    #[test]
    fn empty_lockfile_has_no_packages() {
        assert!(Lockfile::parse("version = 3\n").unwrap().package.is_empty());
        assert!(Lockfile::parse("[[package]]\nname = 1\n").is_err());
    }
}
