//! Configuration loading from disk.

use std::collections::HashMap;
use std::fs;
use std::path::Path;

use thiserror::Error;

use crate::config::rules::Template;
use crate::config::schema::GatewayConfig;

/// Error type for configuration loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("gateway config parse error: {0}")]
    ParseGateway(#[from] toml::de::Error),

    #[error("rule-set parse error: {0}")]
    ParseRules(#[from] serde_json::Error),
}

/// Load the gateway configuration from a TOML file.
pub fn load_config(path: &Path) -> Result<GatewayConfig, ConfigError> {
    let content = fs::read_to_string(path)?;
    Ok(toml::from_str(&content)?)
}

/// Load the rule-set from a JSON file: an array of templates, one per receiver.
pub fn load_rules(path: &Path) -> Result<Vec<Template>, ConfigError> {
    let content = fs::read_to_string(path)?;
    Ok(serde_json::from_str(&content)?)
}

/// Load every outbound body template from a directory, keyed by file name.
/// Hidden files and subdirectories are skipped.
pub fn load_template_bodies(dir: &Path) -> Result<HashMap<String, String>, ConfigError> {
    let mut bodies = HashMap::new();

    for entry in fs::read_dir(dir)? {
        let entry = entry?;
        let name = entry.file_name().to_string_lossy().into_owned();

        if name.starts_with('.') || entry.file_type()?.is_dir() {
            continue;
        }

        bodies.insert(name, fs::read_to_string(entry.path())?);
    }

    Ok(bodies)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs::File;
    use std::io::Write;

    fn scratch_dir(label: &str) -> std::path::PathBuf {
        let dir = std::env::temp_dir().join(format!("hookgate-{}-{}", label, std::process::id()));
        let _ = fs::remove_dir_all(&dir);
        fs::create_dir_all(&dir).unwrap();
        dir
    }

    #[test]
    fn loads_rules_file() {
        let dir = scratch_dir("rules");
        let path = dir.join("rules.json");
        let mut file = File::create(&path).unwrap();
        file.write_all(
            br#"[{"receiver": "r", "auth": {"flow": "none"}, "event_type_in": "header", "event_type_key": "X-Event"}]"#,
        )
        .unwrap();

        let templates = load_rules(&path).unwrap();
        assert_eq!(templates.len(), 1);
        assert_eq!(templates[0].receiver, "r");
    }

    #[test]
    fn malformed_rules_file_errors() {
        let dir = scratch_dir("bad-rules");
        let path = dir.join("rules.json");
        File::create(&path)
            .unwrap()
            .write_all(b"not json")
            .unwrap();

        assert!(matches!(
            load_rules(&path).unwrap_err(),
            ConfigError::ParseRules(_)
        ));
    }

    #[test]
    fn template_dir_skips_hidden_files() {
        let dir = scratch_dir("templates");
        File::create(dir.join("issue.json"))
            .unwrap()
            .write_all(b"{\"content\": \"hi\"}")
            .unwrap();
        File::create(dir.join(".hidden"))
            .unwrap()
            .write_all(b"ignored")
            .unwrap();

        let bodies = load_template_bodies(&dir).unwrap();
        assert_eq!(bodies.len(), 1);
        assert!(bodies.contains_key("issue.json"));
    }

    #[test]
    fn missing_config_file_is_io_error() {
        let err = load_config(Path::new("/nonexistent/hookgate.toml")).unwrap_err();
        assert!(matches!(err, ConfigError::Io(_)));
    }
}
