//! 設定ファイル（list-ops.toml）
//!
//! レジストリの挙動を調整する。すべてのセクションは省略可能。

use crate::log::LogConfig;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

/// 設定ファイル名
pub const CONFIG_FILE_NAME: &str = "list-ops.toml";

/// レジストリ設定（list-ops.toml）
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default)]
pub struct RegistryConfig {
    pub registry: RegistrySection,
    pub sample: SampleSection,
    pub search: SearchSection,
    pub log: LogConfig,
}

/// `[registry]`
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default)]
pub struct RegistrySection {
    /// list_* 形式の旧名も登録する
    pub legacy_names: bool,
    /// 未登録名に対するサジェストの最大数
    pub max_suggestions: usize,
}

impl Default for RegistrySection {
    fn default() -> Self {
        Self {
            legacy_names: true,
            max_suggestions: 3,
        }
    }
}

/// `[sample]`
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default)]
pub struct SampleSection {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub seed: Option<u64>,
}

/// `[search]`
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default)]
pub struct SearchSection {
    /// コンパイル済み正規表現をキャッシュする
    pub cache_patterns: bool,
}

impl Default for SearchSection {
    fn default() -> Self {
        Self {
            cache_patterns: true,
        }
    }
}

impl RegistryConfig {
    /// TOML文字列から読み込む
    pub fn from_toml_str(content: &str) -> Result<Self, String> {
        toml::from_str(content).map_err(|e| format!("failed to parse {}: {}", CONFIG_FILE_NAME, e))
    }

    /// 設定ファイルを読み込む
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, String> {
        let content = fs::read_to_string(path.as_ref())
            .map_err(|e| format!("failed to read {}: {}", path.as_ref().display(), e))?;

        Self::from_toml_str(&content)
    }

    /// カレントディレクトリからlist-ops.tomlを探す
    pub fn find_and_load() -> Result<Self, String> {
        let current = std::env::current_dir()
            .map_err(|e| format!("failed to get current directory: {}", e))?;

        Self::load(current.join(CONFIG_FILE_NAME))
    }

    /// 設定ファイルを書き込む
    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<(), String> {
        let content = toml::to_string_pretty(self)
            .map_err(|e| format!("failed to serialize {}: {}", CONFIG_FILE_NAME, e))?;

        fs::write(path.as_ref(), content)
            .map_err(|e| format!("failed to write {}: {}", path.as_ref().display(), e))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::log::{LogFormat, LogLevel};

    #[test]
    fn test_defaults_for_missing_sections() {
        let config = RegistryConfig::from_toml_str("").unwrap();
        assert_eq!(config, RegistryConfig::default());
        assert!(config.registry.legacy_names);
        assert_eq!(config.registry.max_suggestions, 3);
        assert!(config.search.cache_patterns);
        assert_eq!(config.sample.seed, None);
    }

    #[test]
    fn test_parse_all_sections() {
        let config = RegistryConfig::from_toml_str(
            r#"
            [registry]
            legacy_names = false

            [sample]
            seed = 42

            [search]
            cache_patterns = false

            [log]
            level = "debug"
            format = "json"
            "#,
        )
        .unwrap();
        assert!(!config.registry.legacy_names);
        assert_eq!(config.registry.max_suggestions, 3);
        assert_eq!(config.sample.seed, Some(42));
        assert!(!config.search.cache_patterns);
        assert_eq!(config.log.level, LogLevel::Debug);
        assert_eq!(config.log.format, LogFormat::Json);
    }

    #[test]
    fn test_parse_error_is_message() {
        let err = RegistryConfig::from_toml_str("[registry]\nlegacy_names = 3").unwrap_err();
        assert!(err.contains(CONFIG_FILE_NAME));
    }

    #[test]
    fn test_save_and_load() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(CONFIG_FILE_NAME);

        let mut config = RegistryConfig::default();
        config.sample.seed = Some(7);
        config.log.level = LogLevel::Warn;
        config.save(&path).unwrap();

        assert_eq!(RegistryConfig::load(&path).unwrap(), config);
    }

    #[test]
    fn test_load_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        assert!(RegistryConfig::load(dir.path().join("absent.toml")).is_err());
    }
}
