//! Configuration handling for the portal client

use crate::api::DEFAULT_BASE_URL;
use crate::state::ResourceLink;
use anyhow::Result;
use directories::{ProjectDirs, UserDirs};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// Overrides `api_base_url`
pub const ENV_API_URL: &str = "RIGHTS_PORTAL_API_URL";
/// Overrides `token`
pub const ENV_TOKEN: &str = "RIGHTS_PORTAL_TOKEN";

const DEFAULT_PAGE_SIZE: u32 = 10;

/// User configuration for the portal client
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct PortalConfig {
    /// Portal backend address
    pub api_base_url: String,
    /// Bearer token sent with every request
    pub token: Option<String>,
    /// Where downloaded forms are written
    pub download_dir: PathBuf,
    /// Results requested per search
    pub search_page_size: u32,
    /// Issue documents listed on the search screen
    pub documents: Vec<ResourceLink>,
}

impl Default for PortalConfig {
    fn default() -> Self {
        Self {
            api_base_url: DEFAULT_BASE_URL.to_string(),
            token: None,
            download_dir: default_download_dir(),
            search_page_size: DEFAULT_PAGE_SIZE,
            documents: default_documents(),
        }
    }
}

fn default_download_dir() -> PathBuf {
    UserDirs::new()
        .and_then(|dirs| dirs.download_dir().map(Path::to_path_buf))
        .unwrap_or_else(|| PathBuf::from("."))
}

fn default_documents() -> Vec<ResourceLink> {
    vec![
        ResourceLink::new(
            "Stock Broker Docket",
            "https://res.cloudinary.com/apelng/raw/upload/v1764578164/THE_INITIATES_PLC_2025_Right_Brokers_Docket_wurfeu.xls",
        ),
        ResourceLink::new(
            "Dematerialization Form",
            "https://res.cloudinary.com/apelng/image/upload/v1762418562/FULL-DEMATERIAL-MIGRATION-FORM-1_1_mmibqe.pdf",
        ),
        ResourceLink::new(
            "Rights Circular",
            "https://res.cloudinary.com/apelng/image/upload/v1763988769/TIP_Rights_Circular_ledega_b_zke5hk.pdf",
        ),
        ResourceLink::new(
            "Public Offer",
            "https://res.cloudinary.com/apelng/image/upload/v1761666679/TIP_Public_Offer_bvnzju.pdf",
        ),
    ]
}

impl PortalConfig {
    /// Get the config file path
    fn config_path() -> Option<PathBuf> {
        ProjectDirs::from("ng", "apel", "rights-portal")
            .map(|dirs| dirs.config_dir().join("config.json"))
    }

    /// Directory for the log file
    pub fn data_dir() -> Option<PathBuf> {
        ProjectDirs::from("ng", "apel", "rights-portal").map(|dirs| dirs.data_dir().to_path_buf())
    }

    /// Load configuration from file, then apply environment overrides.
    ///
    /// The defaults are written out on first run so they can be edited.
    pub fn load() -> Result<Self> {
        let config = match Self::config_path() {
            Some(path) if path.exists() => Self::load_from(&path)?,
            Some(path) => {
                let config = Self::default();
                if let Err(err) = config.save_to(&path) {
                    tracing::warn!(path = %path.display(), %err, "could not write default config");
                }
                config
            }
            None => Self::default(),
        };
        Ok(config.with_overrides(|key| std::env::var(key).ok()))
    }

    /// Load from a specific file; a missing file yields the defaults
    pub fn load_from(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }
        let content = fs::read_to_string(path)?;
        let config: PortalConfig = serde_json::from_str(&content)?;
        tracing::debug!(path = %path.display(), "loaded config");
        Ok(config)
    }

    /// Save configuration to file
    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        let content = serde_json::to_string_pretty(self)?;
        fs::write(path, content)?;
        Ok(())
    }

    /// Apply environment overrides through `lookup`
    pub fn with_overrides(mut self, lookup: impl Fn(&str) -> Option<String>) -> Self {
        if let Some(url) = lookup(ENV_API_URL).filter(|v| !v.trim().is_empty()) {
            self.api_base_url = url.trim().to_string();
        }
        if let Some(token) = lookup(ENV_TOKEN) {
            self.token = Some(token);
        }
        if self.search_page_size == 0 {
            self.search_page_size = DEFAULT_PAGE_SIZE;
        }
        self
    }
}
