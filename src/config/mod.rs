//! Configuration: GitHub access, viewer presentation knobs and logging.
//!
//! Values are layered by [`ConfigLoader`]: built-in defaults, the global config
//! file, an explicit file, then `FOLIO_*` environment variables.

pub mod facade;
pub mod merge;
pub mod paths;
pub mod sources;

pub use facade::ConfigLoader;

use crate::drawing::ReconcileMode;
use crate::logging::LoggingConfig;
use serde::{Deserialize, Serialize};

/// Top-level configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct FolioConfig {
    #[serde(default)]
    pub github: GithubConfig,
    #[serde(default)]
    pub viewer: ViewerConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Repository source settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GithubConfig {
    /// REST API base URL
    #[serde(default = "default_api_base")]
    pub api_base: String,

    /// Access token; falls back to `GITHUB_TOKEN` when unset.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub token: Option<String>,

    /// Branch whose recursive tree is listed
    #[serde(default = "default_branch")]
    pub branch: String,

    /// Request timeout in seconds
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

fn default_api_base() -> String {
    "https://api.github.com".to_string()
}

fn default_branch() -> String {
    "main".to_string()
}

fn default_timeout_secs() -> u64 {
    30
}

impl Default for GithubConfig {
    fn default() -> Self {
        Self {
            api_base: default_api_base(),
            token: None,
            branch: default_branch(),
            timeout_secs: default_timeout_secs(),
        }
    }
}

impl GithubConfig {
    /// Token from config, else from the `GITHUB_TOKEN` environment variable.
    ///
    /// Read once here; the source receives the resolved value.
    pub fn resolve_token(&self) -> Option<String> {
        self.token
            .clone()
            .filter(|t| !t.trim().is_empty())
            .or_else(|| std::env::var("GITHUB_TOKEN").ok().filter(|t| !t.is_empty()))
    }

    pub fn validate(&self) -> Result<(), String> {
        if !(self.api_base.starts_with("http://") || self.api_base.starts_with("https://")) {
            return Err(format!("Invalid API base URL: {}", self.api_base));
        }
        if self.branch.trim().is_empty() {
            return Err("Branch cannot be empty".to_string());
        }
        if self.timeout_secs == 0 {
            return Err("Timeout must be positive".to_string());
        }
        Ok(())
    }
}

/// Rendering settings for links, embeds and drawings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ViewerConfig {
    /// Route prefix of the viewer: links look like `{prefix}/{owner}/{repo}/{path}?sha=`
    #[serde(default = "default_app_prefix")]
    pub app_prefix: String,

    /// Image shown for unresolved `![[...]]` embeds
    #[serde(default = "default_not_found_image")]
    pub not_found_image: String,

    /// Marker text identifying a markdown file as a drawing document
    #[serde(default = "default_drawing_marker")]
    pub drawing_marker: String,

    /// How embedded files are paired with drawing elements
    #[serde(default)]
    pub reconcile: ReconcileMode,
}

fn default_app_prefix() -> String {
    "/app".to_string()
}

fn default_not_found_image() -> String {
    "https://http.cat/404".to_string()
}

fn default_drawing_marker() -> String {
    "excalidraw-plugin: parsed".to_string()
}

impl Default for ViewerConfig {
    fn default() -> Self {
        Self {
            app_prefix: default_app_prefix(),
            not_found_image: default_not_found_image(),
            drawing_marker: default_drawing_marker(),
            reconcile: ReconcileMode::default(),
        }
    }
}
