use std::collections::HashSet;
use std::path::Path;

use anyhow::{Context, Result};
use regex::Regex;
use serde::Deserialize;

/// Package name that matches every SRU in the report.
pub const ALL_TAG: &str = "ALL";

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct Config {
    pub packages: Vec<String>,
    pub package_regexps: Vec<String>,
}

/// The allowlist a report is filtered against.
#[derive(Debug, Clone, Default)]
pub struct PackageFilter {
    pub packages: HashSet<String>,
    pub regexps: Vec<Regex>,
}

impl PackageFilter {
    pub fn from_config(config: Config) -> Result<Self> {
        let packages: HashSet<String> = config.packages.into_iter().collect();
        let regexps = config
            .package_regexps
            .iter()
            .map(|exp| {
                Regex::new(exp).with_context(|| format!("failed to compile regexp: {exp}"))
            })
            .collect::<Result<Vec<_>>>()?;
        Ok(Self { packages, regexps })
    }

    pub fn includes_all(&self) -> bool {
        self.packages.contains(ALL_TAG)
    }

    pub fn matches(&self, pkg: &str) -> bool {
        self.includes_all()
            || self.packages.contains(pkg)
            || self.regexps.iter().any(|exp| exp.is_match(pkg))
    }
}

pub fn load(path: &Path) -> Result<PackageFilter> {
    let s = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read config: {}", path.display()))?;
    let config = parse(&s, is_toml(path))
        .with_context(|| format!("failed to parse config: {}", path.display()))?;
    let filter = PackageFilter::from_config(config)?;
    tracing::debug!(
        path = %path.display(),
        packages = filter.packages.len(),
        regexps = filter.regexps.len(),
        include_all = filter.includes_all(),
        "loaded config"
    );
    Ok(filter)
}

fn is_toml(path: &Path) -> bool {
    path.extension()
        .is_some_and(|ext| ext.eq_ignore_ascii_case("toml"))
}

fn parse(s: &str, toml: bool) -> Result<Config> {
    if toml {
        return toml::from_str(s).context("invalid TOML");
    }
    if s.trim().is_empty() {
        return Ok(Config::default());
    }
    // `~` or `null` is an empty allowlist too.
    let config: Option<Config> = serde_yaml::from_str(s).context("invalid YAML")?;
    Ok(config.unwrap_or_default())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;
    use std::sync::atomic::{AtomicU64, Ordering};

    fn write_temp_config(name: &str, contents: &str) -> PathBuf {
        static SEQ: AtomicU64 = AtomicU64::new(0);
        let seq = SEQ.fetch_add(1, Ordering::Relaxed);
        let dir = std::env::temp_dir().join(format!(
            "srufilter-config-unit-{}-{seq}",
            std::process::id()
        ));
        let _ = std::fs::remove_dir_all(&dir);
        std::fs::create_dir_all(&dir).expect("create dir");
        let path = dir.join(name);
        std::fs::write(&path, contents).expect("write");
        path
    }

    #[test]
    fn loads_yaml_packages_and_regexps() {
        let path = write_temp_config(
            "config.yaml",
            "packages:\n- openssh\n- curl\n- curl\npackage_regexps:\n- ^linux-\n",
        );
        let filter = load(&path).expect("load");
        assert_eq!(filter.packages.len(), 2);
        assert!(filter.packages.contains("openssh"));
        assert_eq!(filter.regexps.len(), 1);
        assert!(!filter.includes_all());
        let _ = std::fs::remove_dir_all(path.parent().unwrap());
    }

    #[test]
    fn loads_toml_when_extension_is_toml() {
        let path = write_temp_config(
            "config.toml",
            "packages = [\"ALL\"]\npackage_regexps = [\"^ba\"]\n",
        );
        let filter = load(&path).expect("load");
        assert!(filter.includes_all());
        assert_eq!(filter.regexps.len(), 1);
        let _ = std::fs::remove_dir_all(path.parent().unwrap());
    }

    #[test]
    fn empty_document_is_an_empty_allowlist() {
        let path = write_temp_config("config.yaml", "");
        let filter = load(&path).expect("load");
        assert!(filter.packages.is_empty());
        assert!(filter.regexps.is_empty());
        assert!(!filter.matches("anything"));
        let _ = std::fs::remove_dir_all(path.parent().unwrap());
    }

    #[test]
    fn missing_file_is_an_error() {
        let path = std::env::temp_dir().join("srufilter-does-not-exist/config.yaml");
        let err = load(&path).unwrap_err();
        assert!(format!("{err:#}").contains("failed to read config"));
    }

    #[test]
    fn wrong_shape_is_a_parse_error() {
        let path = write_temp_config("config.yaml", "packages: 12\n");
        let err = load(&path).unwrap_err();
        assert!(format!("{err:#}").contains("failed to parse config"));
        let _ = std::fs::remove_dir_all(path.parent().unwrap());
    }

    #[test]
    fn invalid_regexp_names_the_pattern() {
        let path = write_temp_config("config.yaml", "package_regexps:\n- \"foo(\"\n");
        let err = load(&path).unwrap_err();
        assert!(format!("{err:#}").contains("failed to compile regexp: foo("));
        let _ = std::fs::remove_dir_all(path.parent().unwrap());
    }

    #[test]
    fn all_tag_matches_everything_regardless_of_other_entries() {
        let filter = PackageFilter::from_config(Config {
            packages: vec!["foo".to_string(), ALL_TAG.to_string()],
            package_regexps: vec!["^zzz$".to_string()],
        })
        .expect("filter");
        assert!(filter.matches("foo"));
        assert!(filter.matches("bar"));
        assert!(filter.matches(""));
    }

    #[test]
    fn exact_names_and_patterns_are_alternatives() {
        let filter = PackageFilter::from_config(Config {
            packages: vec!["foo".to_string()],
            package_regexps: vec!["^ba".to_string(), "qux$".to_string()],
        })
        .expect("filter");
        assert!(filter.matches("foo"));
        assert!(filter.matches("bar"));
        assert!(filter.matches("libqux"));
        assert!(!filter.matches("foobar"));
        assert!(!filter.matches("all"));
    }
}
