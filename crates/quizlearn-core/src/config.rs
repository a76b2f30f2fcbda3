//! Application configuration.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use crate::model::QUESTION_COUNTS;

/// Colours for the "Custom" palette entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CustomColors {
    #[serde(default = "default_custom_background")]
    pub background: String,
    #[serde(default = "default_custom_text")]
    pub text: String,
    #[serde(default = "default_custom_card")]
    pub card: String,
    #[serde(default = "default_custom_accent")]
    pub accent: String,
}

fn default_custom_background() -> String {
    "#0b0e14".to_string()
}
fn default_custom_text() -> String {
    "#ffffff".to_string()
}
fn default_custom_card() -> String {
    "#161b22".to_string()
}
fn default_custom_accent() -> String {
    "#6366f1".to_string()
}

impl Default for CustomColors {
    fn default() -> Self {
        Self {
            background: default_custom_background(),
            text: default_custom_text(),
            card: default_custom_card(),
            accent: default_custom_accent(),
        }
    }
}

/// Top-level quizlearn configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QuizlearnConfig {
    /// Bank file or directory. The built-in bank is used when unset.
    #[serde(default)]
    pub question_bank: Option<PathBuf>,
    /// Question count used when `start` is given none.
    #[serde(default = "default_count")]
    pub default_count: usize,
    /// Minimum percentage for a "Passed" status.
    #[serde(default = "default_pass_mark")]
    pub pass_mark: u8,
    /// Where CSV and HTML exports are written.
    #[serde(default = "default_export_dir")]
    pub export_dir: PathBuf,
    /// Palette name (see `quizlearn palettes`).
    #[serde(default = "default_palette")]
    pub palette: String,
    /// Seed for question sampling; random when unset.
    #[serde(default)]
    pub seed: Option<u64>,
    /// Colours used when `palette = "Custom"`.
    #[serde(default)]
    pub custom_palette: CustomColors,
}

fn default_count() -> usize {
    5
}
fn default_pass_mark() -> u8 {
    60
}
fn default_export_dir() -> PathBuf {
    PathBuf::from("./quizlearn-exports")
}
fn default_palette() -> String {
    "Default Dark".to_string()
}

impl Default for QuizlearnConfig {
    fn default() -> Self {
        Self {
            question_bank: None,
            default_count: default_count(),
            pass_mark: default_pass_mark(),
            export_dir: default_export_dir(),
            palette: default_palette(),
            seed: None,
            custom_palette: CustomColors::default(),
        }
    }
}

impl QuizlearnConfig {
    /// Check values that serde can't.
    pub fn validate(&self) -> Result<()> {
        anyhow::ensure!(
            QUESTION_COUNTS.contains(&self.default_count),
            "default_count must be one of {:?} (got {})",
            QUESTION_COUNTS,
            self.default_count
        );
        anyhow::ensure!(
            self.pass_mark <= 100,
            "pass_mark must be between 0 and 100 (got {})",
            self.pass_mark
        );
        Ok(())
    }
}

/// Resolve environment variable references like `${VAR_NAME}` in a string.
/// Substituted values are not scanned again.
fn resolve_env_vars(s: &str) -> String {
    let mut result = String::with_capacity(s.len());
    let mut rest = s;
    while let Some(start) = rest.find("${") {
        let Some(end) = rest[start..].find('}') else {
            break;
        };
        result.push_str(&rest[..start]);
        let var_name = &rest[start + 2..start + end];
        result.push_str(&std::env::var(var_name).unwrap_or_default());
        rest = &rest[start + end + 1..];
    }
    result.push_str(rest);
    result
}

fn resolve_path(path: &Path) -> PathBuf {
    PathBuf::from(resolve_env_vars(&path.to_string_lossy()))
}

/// Load configuration from well-known paths.
///
/// Search order:
/// 1. `quizlearn.toml` in the current directory
/// 2. `~/.config/quizlearn/config.toml`
///
/// Environment variable overrides: `QUIZLEARN_PALETTE`,
/// `QUIZLEARN_EXPORT_DIR`, `QUIZLEARN_SEED`.
pub fn load_config() -> Result<QuizlearnConfig> {
    load_config_from(None)
}

/// Load config from an explicit path, or search the default locations.
pub fn load_config_from(path: Option<&Path>) -> Result<QuizlearnConfig> {
    let config_path = if let Some(p) = path {
        if p.exists() {
            Some(p.to_path_buf())
        } else {
            anyhow::bail!("config file not found: {}", p.display());
        }
    } else {
        let local = PathBuf::from("quizlearn.toml");
        if local.exists() {
            Some(local)
        } else if let Some(home) = dirs_path() {
            let global = home.join("config.toml");
            if global.exists() {
                Some(global)
            } else {
                None
            }
        } else {
            None
        }
    };

    let mut config = match config_path {
        Some(path) => {
            let content = std::fs::read_to_string(&path)
                .with_context(|| format!("failed to read config: {}", path.display()))?;
            let config = toml::from_str::<QuizlearnConfig>(&content)
                .with_context(|| format!("failed to parse config: {}", path.display()))?;
            tracing::debug!("loaded config from {}", path.display());
            config
        }
        None => QuizlearnConfig::default(),
    };

    // Apply env var overrides
    if let Ok(palette) = std::env::var("QUIZLEARN_PALETTE") {
        config.palette = palette;
    }
    if let Ok(dir) = std::env::var("QUIZLEARN_EXPORT_DIR") {
        config.export_dir = PathBuf::from(dir);
    }
    if let Ok(seed) = std::env::var("QUIZLEARN_SEED") {
        let seed = seed
            .trim()
            .parse::<u64>()
            .with_context(|| format!("QUIZLEARN_SEED is not a number: '{seed}'"))?;
        config.seed = Some(seed);
    }

    // Resolve env vars in path fields
    config.question_bank = config.question_bank.as_deref().map(resolve_path);
    config.export_dir = resolve_path(&config.export_dir);

    config.validate()?;
    Ok(config)
}

fn dirs_path() -> Option<PathBuf> {
    std::env::var("HOME")
        .ok()
        .map(|h| PathBuf::from(h).join(".config").join("quizlearn"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn resolve_env_vars_basic() {
        std::env::set_var("_QUIZLEARN_TEST_VAR", "hello");
        assert_eq!(resolve_env_vars("${_QUIZLEARN_TEST_VAR}"), "hello");
        assert_eq!(
            resolve_env_vars("prefix_${_QUIZLEARN_TEST_VAR}_suffix"),
            "prefix_hello_suffix"
        );
        assert_eq!(resolve_env_vars("no vars"), "no vars");
        std::env::remove_var("_QUIZLEARN_TEST_VAR");
    }

    #[test]
    fn resolve_env_vars_does_not_expand_values() {
        std::env::set_var("_QUIZLEARN_SELF_REF", "${_QUIZLEARN_SELF_REF}");
        assert_eq!(
            resolve_env_vars("a/${_QUIZLEARN_SELF_REF}/b"),
            "a/${_QUIZLEARN_SELF_REF}/b"
        );
        assert_eq!(resolve_env_vars("${abc"), "${abc");
        assert_eq!(resolve_env_vars("x${_QUIZLEARN_UNSET_VAR}y"), "xy");
        std::env::remove_var("_QUIZLEARN_SELF_REF");
    }

    #[test]
    fn default_config() {
        let config = QuizlearnConfig::default();
        assert_eq!(config.default_count, 5);
        assert_eq!(config.pass_mark, 60);
        assert_eq!(config.palette, "Default Dark");
        assert!(config.question_bank.is_none());
        assert!(config.validate().is_ok());
    }

    #[test]
    fn parse_partial_config() {
        let toml_str = r##"
question_bank = "banks/school.toml"
default_count = 10
palette = "Custom"

[custom_palette]
accent = "#ff0000"
"##;
        let config: QuizlearnConfig = toml::from_str(toml_str).unwrap();
        assert_eq!(config.question_bank, Some(PathBuf::from("banks/school.toml")));
        assert_eq!(config.default_count, 10);
        assert_eq!(config.pass_mark, 60);
        assert_eq!(config.custom_palette.accent, "#ff0000");
        assert_eq!(config.custom_palette.background, "#0b0e14");
    }

    #[test]
    fn validate_rejects_bad_count() {
        let config = QuizlearnConfig {
            default_count: 4,
            ..Default::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn load_explicit_path() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("quizlearn.toml");
        std::fs::write(&path, "pass_mark = 75\nseed = 42\n").unwrap();

        let config = load_config_from(Some(&path)).unwrap();
        assert_eq!(config.pass_mark, 75);
        assert_eq!(config.seed, Some(42));
    }

    #[test]
    fn load_missing_explicit_path_fails() {
        let err = load_config_from(Some(Path::new("/nonexistent/quizlearn.toml"))).unwrap_err();
        assert!(err.to_string().contains("config file not found"));
    }
}
