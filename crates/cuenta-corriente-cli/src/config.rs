use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::Deserialize;

#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Config {
    #[serde(default)]
    pub roster: ConfigRoster,
    #[serde(default)]
    pub remote: ConfigRemote,
}

#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ConfigRoster {
    pub file: Option<PathBuf>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ConfigRemote {
    pub script_url: Option<String>,
}

impl Config {
    pub fn load_from_file(path: &Path) -> Result<(PathBuf, Self)> {
        let base_dir = path.parent().map(ToOwned::to_owned).unwrap_or_default();

        let contents = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        let config: Config = toml::from_str(&contents)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))?;

        Ok((base_dir, config))
    }

    pub fn find_and_load() -> Result<Option<(PathBuf, Self)>> {
        let config_locations = [Path::new("cuentas.toml"), Path::new(".cuentas.toml")];

        for location in &config_locations {
            if location.exists() {
                return Self::load_from_file(location).map(Some);
            }
        }

        Ok(None)
    }
}

/// Fully resolved inputs every command needs. Command line arguments win
/// over the config file; the roster falls back to `base.json`, the script
/// URL has no sane default and must come from one of the two.
pub struct Sources {
    pub roster: PathBuf,
    pub script_url: String,
}

impl Sources {
    pub fn resolve(base_arg: Option<PathBuf>, script_url_arg: Option<String>) -> Result<Sources> {
        let (base_dir, config) = match Config::find_and_load()? {
            Some((base_dir, config)) => (base_dir, config),
            None => (PathBuf::new(), Config::default()),
        };

        let roster = base_arg
            .or_else(|| config.roster.file.map(|file| base_dir.join(file)))
            .unwrap_or_else(|| PathBuf::from("base.json"));

        let script_url = script_url_arg.or(config.remote.script_url).context(
            "no script_url configured; pass --script-url or set [remote] script_url in cuentas.toml",
        )?;

        Ok(Sources { roster, script_url })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_both_sections() {
        let config: Config = toml::from_str(
            r#"
            [roster]
            file = "data/base.json"

            [remote]
            script_url = "https://script.google.com/macros/s/XYZ/exec"
            "#,
        )
        .unwrap();
        assert_eq!(config.roster.file.unwrap(), PathBuf::from("data/base.json"));
        assert_eq!(
            config.remote.script_url.unwrap(),
            "https://script.google.com/macros/s/XYZ/exec"
        );
    }

    #[test]
    fn empty_config_is_valid() {
        let config: Config = toml::from_str("").unwrap();
        assert!(config.roster.file.is_none());
        assert!(config.remote.script_url.is_none());
    }

    #[test]
    fn unknown_keys_are_rejected() {
        let result: Result<Config, _> = toml::from_str("[roster]\npath = \"base.json\"\n");
        assert!(result.is_err());
    }

    #[test]
    fn roster_paths_resolve_relative_to_the_config_file() {
        let dir = std::env::temp_dir().join(format!("cuentas-config-{}", std::process::id()));
        std::fs::create_dir_all(&dir).unwrap();
        let path = dir.join("cuentas.toml");
        std::fs::write(&path, "[roster]\nfile = \"base.json\"\n").unwrap();

        let (base_dir, config) = Config::load_from_file(&path).unwrap();
        assert_eq!(base_dir.join(config.roster.file.unwrap()), dir.join("base.json"));

        std::fs::remove_dir_all(&dir).unwrap();
    }
}
