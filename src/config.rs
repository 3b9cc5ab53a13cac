use std::path::Path;

use serde::Deserialize;

use crate::error::ConfigError;
use crate::model::SearchRoot;

pub const SERVER_PLACEHOLDER: &str = "{server}";

/// Run configuration, loaded from a YAML or JSON file.
#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    /// Store address. For the local adapter this is the directory the
    /// share is mounted at.
    pub server: String,
    /// Base-path template with one `{server}` placeholder.
    pub path_template: String,
    /// Logical server names substituted into the template, one root each.
    pub servers: Vec<String>,
    /// Case-insensitive file-name suffix that qualifies a candidate.
    #[serde(default = "default_file_suffix")]
    pub file_suffix: String,
    /// Scanner read-buffer capacity in bytes.
    #[serde(default = "default_buffer_size")]
    pub buffer_size: usize,
    /// Ceiling on simultaneous in-flight scans against the store.
    #[serde(default = "default_max_concurrent_scans")]
    pub max_concurrent_scans: usize,
    /// Per-file scan timeout; a timed-out scan counts as a non-match.
    #[serde(default)]
    pub scan_timeout_ms: Option<u64>,
}

fn default_file_suffix() -> String {
    ".log".to_string()
}

fn default_buffer_size() -> usize {
    64 * 1024
}

fn default_max_concurrent_scans() -> usize {
    32
}

impl Config {
    pub fn load_from_path(path: &Path) -> Result<Self, ConfigError> {
        let raw = std::fs::read_to_string(path)?;
        let is_json = path
            .extension()
            .map(|e| e.eq_ignore_ascii_case("json"))
            .unwrap_or(false);
        let config: Config = if is_json {
            serde_json::from_str(&raw).map_err(|e| ConfigError::Invalid(e.to_string()))?
        } else {
            serde_yaml::from_str(&raw).map_err(|e| ConfigError::Invalid(e.to_string()))?
        };
        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> Result<(), ConfigError> {
        if !self.path_template.contains(SERVER_PLACEHOLDER) {
            return Err(ConfigError::Invalid(format!(
                "path_template must contain {SERVER_PLACEHOLDER}"
            )));
        }
        if self.servers.is_empty() {
            return Err(ConfigError::Invalid("servers must not be empty".into()));
        }
        if self.file_suffix.is_empty() {
            return Err(ConfigError::Invalid("file_suffix must not be empty".into()));
        }
        Ok(())
    }

    /// Derive one search root per configured server.
    pub fn search_roots(&self) -> Vec<SearchRoot> {
        self.servers
            .iter()
            .map(|server| SearchRoot {
                server: server.clone(),
                base_path: self.path_template.replace(SERVER_PLACEHOLDER, server),
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn yaml_parse_applies_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.yaml");
        std::fs::write(
            &path,
            "server: /mnt/share\npath_template: \"{server}/logs\"\nservers: [alpha, beta]\n",
        )
        .unwrap();

        let cfg = Config::load_from_path(&path).unwrap();
        assert_eq!(cfg.file_suffix, ".log");
        assert_eq!(cfg.buffer_size, 64 * 1024);
        assert_eq!(cfg.max_concurrent_scans, 32);
        assert!(cfg.scan_timeout_ms.is_none());
    }

    #[test]
    fn json_parse_by_extension() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.json");
        std::fs::write(
            &path,
            r#"{"server": "/mnt/share", "path_template": "{server}", "servers": ["a"], "buffer_size": 1024}"#,
        )
        .unwrap();

        let cfg = Config::load_from_path(&path).unwrap();
        assert_eq!(cfg.buffer_size, 1024);
    }

    #[test]
    fn template_without_placeholder_is_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.yaml");
        std::fs::write(
            &path,
            "server: /mnt/share\npath_template: logs\nservers: [alpha]\n",
        )
        .unwrap();

        let err = Config::load_from_path(&path).unwrap_err();
        assert!(err.to_string().contains("path_template"));
    }

    #[test]
    fn search_roots_substitute_server_names() {
        let cfg = Config {
            server: "/mnt/share".into(),
            path_template: "{server}/logs".into(),
            servers: vec!["alpha".into(), "beta".into()],
            file_suffix: ".log".into(),
            buffer_size: 1024,
            max_concurrent_scans: 4,
            scan_timeout_ms: None,
        };
        let roots = cfg.search_roots();
        assert_eq!(roots.len(), 2);
        assert_eq!(roots[0].server, "alpha");
        assert_eq!(roots[0].base_path, "alpha/logs");
        assert_eq!(roots[1].base_path, "beta/logs");
    }
}
