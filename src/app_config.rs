//! Application configuration: config file loading and CLI merging.

use std::env;
use std::fs;
use std::path::{Path, PathBuf};

use abzdok_core::submit::constants::{CONNECT_TIMEOUT_SECS, DEFAULT_SERVER, READ_TIMEOUT_SECS};
use anyhow::{Context, Result, bail};

use crate::cli::Cli;

/// TOML-backed file configuration (flat `key = value` subset).
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FileConfig {
    /// Base URL of the generator server.
    pub server: Option<String>,
    /// Directory the PDF is saved into.
    pub output_dir: Option<PathBuf>,
    /// Replace an existing PDF instead of numbering.
    pub overwrite: Option<bool>,
    /// HTTP connect timeout in seconds.
    pub connect_timeout_secs: Option<u64>,
    /// HTTP read timeout in seconds.
    pub read_timeout_secs: Option<u64>,
}

impl FileConfig {
    /// Validates config values against the same ranges the CLI enforces.
    pub fn validate(&self) -> Result<()> {
        if let Some(server) = self.server.as_deref()
            && server.trim().is_empty()
        {
            bail!("Invalid config value for `server`: must not be empty");
        }
        validate_timeout_secs("connect_timeout_secs", self.connect_timeout_secs)?;
        validate_timeout_secs("read_timeout_secs", self.read_timeout_secs)?;
        Ok(())
    }
}

fn validate_timeout_secs(field: &str, value: Option<u64>) -> Result<()> {
    let Some(value) = value else {
        return Ok(());
    };
    if !(1..=3600).contains(&value) {
        bail!("Invalid config value for `{field}`: {value}. Expected range: 1..=3600");
    }
    Ok(())
}

/// Loaded config metadata.
#[derive(Debug, Clone)]
pub struct LoadedConfig {
    /// Resolved config path if a base directory is known.
    pub path: Option<PathBuf>,
    /// Parsed file config when a config file exists and was valid.
    pub config: Option<FileConfig>,
}

impl LoadedConfig {
    #[must_use]
    pub fn loaded_from_file(&self) -> bool {
        self.config.is_some()
    }
}

/// Resolves default config path.
///
/// Priority:
/// 1. `$XDG_CONFIG_HOME/abzdok/config.toml`
/// 2. `$HOME/.config/abzdok/config.toml`
#[must_use]
pub fn resolve_default_config_path() -> Option<PathBuf> {
    if let Some(xdg_config_home) = env_var_non_empty_os("XDG_CONFIG_HOME") {
        return Some(
            PathBuf::from(xdg_config_home)
                .join("abzdok")
                .join("config.toml"),
        );
    }

    let home = env_var_non_empty_os("HOME")?;
    Some(
        PathBuf::from(home)
            .join(".config")
            .join("abzdok")
            .join("config.toml"),
    )
}

fn env_var_non_empty_os(name: &str) -> Option<std::ffi::OsString> {
    let value = env::var_os(name)?;
    if value.is_empty() { None } else { Some(value) }
}

/// Loads config from the default path if present.
pub fn load_default_file_config() -> Result<LoadedConfig> {
    let path = resolve_default_config_path();
    let config = match path.as_deref() {
        Some(path_ref) if path_ref.exists() => Some(load_file_config(path_ref)?),
        _ => None,
    };
    Ok(LoadedConfig { path, config })
}

fn load_file_config(path: &Path) -> Result<FileConfig> {
    let raw = fs::read_to_string(path)
        .with_context(|| format!("Failed to read config file '{}'", path.display()))?;
    parse_config_str(&raw)
        .with_context(|| format!("Failed to parse config file '{}'", path.display()))
}

fn parse_config_str(raw: &str) -> Result<FileConfig> {
    let mut cfg = FileConfig::default();
    for (line_index, raw_line) in raw.lines().enumerate() {
        let line_no = line_index + 1;
        let line = strip_inline_comment(raw_line).trim();
        if line.is_empty() {
            continue;
        }

        let Some((raw_key, raw_value)) = line.split_once('=') else {
            bail!("Invalid config syntax on line {line_no}: expected key = value");
        };

        let key = raw_key.trim();
        let value = raw_value.trim();

        match key {
            "server" => {
                let parsed = parse_string_literal(value)
                    .with_context(|| format!("Invalid `server` value on line {line_no}"))?;
                cfg.server = Some(parsed);
            }
            "output_dir" => {
                let parsed = parse_string_literal(value)
                    .with_context(|| format!("Invalid `output_dir` value on line {line_no}"))?;
                cfg.output_dir = Some(PathBuf::from(parsed));
            }
            "overwrite" => {
                let parsed = parse_boolean(value)
                    .with_context(|| format!("Invalid `overwrite` value on line {line_no}"))?;
                cfg.overwrite = Some(parsed);
            }
            "connect_timeout_secs" => {
                let parsed = parse_integer_u64(value).with_context(|| {
                    format!("Invalid `connect_timeout_secs` value on line {line_no}")
                })?;
                cfg.connect_timeout_secs = Some(parsed);
            }
            "read_timeout_secs" => {
                let parsed = parse_integer_u64(value).with_context(|| {
                    format!("Invalid `read_timeout_secs` value on line {line_no}")
                })?;
                cfg.read_timeout_secs = Some(parsed);
            }
            unknown => {
                bail!("Unknown configuration key: '{unknown}' on line {line_no}");
            }
        }
    }
    cfg.validate()?;
    Ok(cfg)
}

fn strip_inline_comment(line: &str) -> &str {
    let mut in_string = false;
    for (index, ch) in line.char_indices() {
        match ch {
            '"' => in_string = !in_string,
            '#' if !in_string => return &line[..index],
            _ => {}
        }
    }
    line
}

fn parse_string_literal(raw_value: &str) -> Result<String> {
    if raw_value.len() < 2 || !raw_value.starts_with('"') || !raw_value.ends_with('"') {
        bail!("Expected double-quoted string");
    }
    Ok(raw_value[1..raw_value.len() - 1].to_string())
}

fn parse_boolean(raw_value: &str) -> Result<bool> {
    match raw_value {
        "true" => Ok(true),
        "false" => Ok(false),
        other => bail!("Expected true or false, got '{other}'"),
    }
}

fn parse_integer_u64(raw_value: &str) -> Result<u64> {
    let token = raw_value.trim();
    if token.is_empty() {
        bail!("Expected integer value");
    }
    let value = token.parse::<i128>()?;
    if value < 0 {
        bail!("Expected non-negative integer");
    }
    u64::try_from(value).map_err(|_| anyhow::anyhow!("Integer value out of range for u64"))
}

/// Where an effective setting came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SettingSource {
    Cli,
    ConfigFile,
    Default,
}

impl SettingSource {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Cli => "cli",
            Self::ConfigFile => "config",
            Self::Default => "default",
        }
    }
}

/// An effective value with its origin.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Setting<T> {
    pub value: T,
    pub source: SettingSource,
}

impl<T> Setting<T> {
    /// CLI value wins over config value wins over `default`.
    fn pick(cli: Option<T>, file: Option<T>, default: T) -> Self {
        match (cli, file) {
            (Some(value), _) => Self {
                value,
                source: SettingSource::Cli,
            },
            (None, Some(value)) => Self {
                value,
                source: SettingSource::ConfigFile,
            },
            (None, None) => Self {
                value: default,
                source: SettingSource::Default,
            },
        }
    }
}

/// Effective settings after merging CLI flags, config file and defaults.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Settings {
    pub server: Setting<String>,
    pub output_dir: Setting<PathBuf>,
    pub overwrite: Setting<bool>,
    pub connect_timeout_secs: Setting<u64>,
    pub read_timeout_secs: Setting<u64>,
    /// `--stdout` has no config counterpart.
    pub stdout: bool,
}

impl Settings {
    /// Merges CLI flags over an optional file config.
    #[must_use]
    pub fn resolve(cli: &Cli, file: Option<&FileConfig>) -> Self {
        let file = file.cloned().unwrap_or_default();
        Self {
            server: Setting::pick(cli.server.clone(), file.server, DEFAULT_SERVER.to_string()),
            output_dir: Setting::pick(cli.output_dir.clone(), file.output_dir, PathBuf::from(".")),
            // A bare flag can only switch overwriting on.
            overwrite: Setting::pick(cli.overwrite.then_some(true), file.overwrite, false),
            connect_timeout_secs: Setting::pick(
                cli.connect_timeout,
                file.connect_timeout_secs,
                CONNECT_TIMEOUT_SECS,
            ),
            read_timeout_secs: Setting::pick(
                cli.read_timeout,
                file.read_timeout_secs,
                READ_TIMEOUT_SECS,
            ),
            stdout: cli.stdout,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;
    use tempfile::TempDir;

    #[test]
    fn test_parse_config_all_keys() {
        let raw = r#"
# generator on the institute server
server = "https://abz.example.org/gen/"   # trailing comment
output_dir = "/home/me/Dokumente"
overwrite = true
connect_timeout_secs = 10
read_timeout_secs = 600
"#;
        let cfg = parse_config_str(raw).unwrap();
        assert_eq!(cfg.server.as_deref(), Some("https://abz.example.org/gen/"));
        assert_eq!(cfg.output_dir, Some(PathBuf::from("/home/me/Dokumente")));
        assert_eq!(cfg.overwrite, Some(true));
        assert_eq!(cfg.connect_timeout_secs, Some(10));
        assert_eq!(cfg.read_timeout_secs, Some(600));
    }

    #[test]
    fn test_parse_config_hash_inside_string_is_kept() {
        let cfg = parse_config_str(r#"output_dir = "/tmp/#abz""#).unwrap();
        assert_eq!(cfg.output_dir, Some(PathBuf::from("/tmp/#abz")));
    }

    #[test]
    fn test_parse_config_unknown_key_names_line() {
        let err = parse_config_str("\nconcurrency = 4").unwrap_err();
        let msg = format!("{err:#}");
        assert!(msg.contains("concurrency"), "unexpected: {msg}");
        assert!(msg.contains("line 2"), "unexpected: {msg}");
    }

    #[test]
    fn test_parse_config_rejects_unquoted_string() {
        let err = parse_config_str("server = http://x/").unwrap_err();
        assert!(format!("{err:#}").contains("server"));
    }

    #[test]
    fn test_parse_config_rejects_out_of_range_timeout() {
        let err = parse_config_str("read_timeout_secs = 0").unwrap_err();
        assert!(format!("{err:#}").contains("1..=3600"));
    }

    #[test]
    fn test_parse_config_rejects_missing_equals() {
        assert!(parse_config_str("overwrite").is_err());
    }

    #[test]
    fn test_settings_cli_beats_config_beats_default() {
        let cli = Cli::try_parse_from([
            "abzdok",
            "--server",
            "http://cli.example/",
            "config",
            "show",
        ])
        .unwrap();
        let file = FileConfig {
            server: Some("http://file.example/".to_string()),
            read_timeout_secs: Some(42),
            ..FileConfig::default()
        };

        let settings = Settings::resolve(&cli, Some(&file));
        assert_eq!(settings.server.value, "http://cli.example/");
        assert_eq!(settings.server.source, SettingSource::Cli);
        assert_eq!(settings.read_timeout_secs.value, 42);
        assert_eq!(settings.read_timeout_secs.source, SettingSource::ConfigFile);
        assert_eq!(settings.connect_timeout_secs.value, 30);
        assert_eq!(settings.connect_timeout_secs.source, SettingSource::Default);
        assert_eq!(settings.output_dir.value, PathBuf::from("."));
        assert!(!settings.overwrite.value);
        assert!(!settings.stdout);
    }

    #[test]
    fn test_settings_overwrite_from_config_when_flag_absent() {
        let cli = Cli::try_parse_from(["abzdok", "config", "show"]).unwrap();
        let file = FileConfig {
            overwrite: Some(true),
            ..FileConfig::default()
        };
        let settings = Settings::resolve(&cli, Some(&file));
        assert!(settings.overwrite.value);
        assert_eq!(settings.overwrite.source, SettingSource::ConfigFile);
    }

    #[test]
    fn test_load_file_config_reports_path_on_error() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("config.toml");
        fs::write(&path, "overwrite = maybe\n").unwrap();

        let err = load_file_config(&path).unwrap_err();
        let msg = format!("{err:#}");
        assert!(msg.contains("config.toml"), "unexpected: {msg}");
        assert!(msg.contains("overwrite"), "unexpected: {msg}");
    }
}
