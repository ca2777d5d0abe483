use std::time::Duration;

use anyhow::Result;
use serde::{Deserialize, Serialize};
use sponsorboard_core::client::DEFAULT_BASE_URL;
use sponsorboard_core::debounce::SEARCH_DEBOUNCE_MS;
use sponsorboard_core::query::{DEFAULT_PAGE_SIZE, PAGE_SIZE_OPTIONS};

use super::paths;

/// 覆盖 `api.base_url` 的环境变量
pub const API_URL_ENV: &str = "SPONSORBOARD_API_URL";

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Settings {
    #[serde(default)]
    pub api: ApiSettings,
    #[serde(default)]
    pub leaderboard: LeaderboardSettings,
    #[serde(default)]
    pub search: SearchSettings,
    #[serde(default)]
    pub stats: StatsSettings,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ApiSettings {
    #[serde(default = "default_base_url")]
    pub base_url: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LeaderboardSettings {
    #[serde(default = "default_page_size")]
    pub page_size: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SearchSettings {
    #[serde(default = "default_debounce_ms")]
    pub debounce_ms: u64,
    /// 第一次输入是否立即生效（默认与其它输入一样等待防抖间隔）
    #[serde(default)]
    pub leading_edge: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StatsSettings {
    #[serde(default = "default_refresh_secs")]
    pub refresh_secs: u64,
}

fn default_base_url() -> String {
    DEFAULT_BASE_URL.to_string()
}
fn default_page_size() -> u32 {
    DEFAULT_PAGE_SIZE
}
fn default_debounce_ms() -> u64 {
    SEARCH_DEBOUNCE_MS
}
fn default_refresh_secs() -> u64 {
    15
}

impl Default for ApiSettings {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
        }
    }
}

impl Default for LeaderboardSettings {
    fn default() -> Self {
        Self {
            page_size: default_page_size(),
        }
    }
}

impl Default for SearchSettings {
    fn default() -> Self {
        Self {
            debounce_ms: default_debounce_ms(),
            leading_edge: false,
        }
    }
}

impl Default for StatsSettings {
    fn default() -> Self {
        Self {
            refresh_secs: default_refresh_secs(),
        }
    }
}

impl Settings {
    pub fn load() -> Result<Self> {
        let path = paths::config_file()?;
        let mut settings = if path.exists() {
            let content = std::fs::read_to_string(&path)?;
            Self::parse(&content)?
        } else {
            let settings = Self::default();
            settings.save()?;
            settings
        };
        if let Ok(url) = std::env::var(API_URL_ENV) {
            if !url.trim().is_empty() {
                settings.api.base_url = url;
            }
        }
        Ok(settings)
    }

    pub fn parse(content: &str) -> Result<Self> {
        let mut settings: Self = toml::from_str(content)?;
        if !PAGE_SIZE_OPTIONS.contains(&settings.leaderboard.page_size) {
            tracing::warn!(
                page_size = settings.leaderboard.page_size,
                "unsupported page size, falling back to default"
            );
            settings.leaderboard.page_size = DEFAULT_PAGE_SIZE;
        }
        Ok(settings)
    }

    pub fn save(&self) -> Result<()> {
        let path = paths::config_file()?;
        let content = toml::to_string_pretty(self)?;
        std::fs::write(path, content)?;
        Ok(())
    }

    pub fn debounce(&self) -> Duration {
        Duration::from_millis(self.search.debounce_ms)
    }

    pub fn stats_interval(&self) -> Duration {
        Duration::from_secs(self.stats.refresh_secs.max(1))
    }
}
