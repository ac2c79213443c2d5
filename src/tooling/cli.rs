//! CLI Tooling
//!
//! Command-line interface over the viewer: list a repository tree, render a
//! file, and inspect local drawing or markdown files without any network.

use crate::config::{ConfigLoader, FolioConfig};
use crate::drawing::DrawingProcessor;
use crate::error::ApiError;
use crate::logging::LoggingConfig;
use crate::markdown::render_markdown;
use crate::source::GithubSource;
use crate::tooling::format::{
    format_drawing_summary, format_tree_table, format_tree_text, format_view_text,
};
use crate::types::RepoRef;
use crate::viewer::{Body, RepositoryViewer, ViewOutcome, ViewRequest};
use crate::views::render_tree_html;
use clap::{Parser, Subcommand};
use std::path::{Path, PathBuf};
use tracing::info;

/// Folio CLI - browse a repository as documents
#[derive(Parser)]
#[command(name = "folio")]
#[command(about = "Browse a git repository as a document viewer: wikilinks, embeds and drawings")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Configuration file path (layered over the global config)
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Branch to read (overrides github.branch)
    #[arg(long)]
    pub branch: Option<String>,

    /// Log level (trace, debug, info, warn, error, off)
    #[arg(long)]
    pub log_level: Option<String>,

    /// Log format (json, text)
    #[arg(long)]
    pub log_format: Option<String>,

    /// Log output (stdout, stderr, file, file+stderr, both)
    #[arg(long)]
    pub log_output: Option<String>,

    /// Log file path (if output includes "file")
    #[arg(long)]
    pub log_file: Option<PathBuf>,
}

impl Cli {
    /// Apply `--log-*` flags on top of the configured logging section.
    pub fn apply_logging_overrides(&self, logging: &mut LoggingConfig) {
        if let Some(level) = &self.log_level {
            logging.level = level.clone();
        }
        if let Some(format) = &self.log_format {
            logging.format = format.clone();
        }
        if let Some(output) = &self.log_output {
            logging.output = output.clone();
        }
        if self.log_file.is_some() {
            logging.file = self.log_file.clone();
        }
    }
}

#[derive(Subcommand)]
pub enum Commands {
    /// Show a repository's navigation tree
    Tree {
        owner: String,
        repo: String,
        /// Output format (text, table, json, html)
        #[arg(long, default_value = "text")]
        format: String,
    },
    /// Render one file of a repository
    View {
        owner: String,
        repo: String,
        /// Repository path of the file
        #[arg(long)]
        path: Option<String>,
        /// Blob sha of the file (takes precedence over --path)
        #[arg(long)]
        sha: Option<String>,
        /// Encoded `?file=` value from a legacy view link
        #[arg(long, conflicts_with = "path")]
        file: Option<String>,
        /// Embedded rendering (no navigation)
        #[arg(long)]
        raw: bool,
        /// Output format (text or json)
        #[arg(long, default_value = "text")]
        format: String,
        /// Write the response body to this file instead of printing it
        #[arg(long)]
        out: Option<PathBuf>,
    },
    /// Decode a local drawing file's scene to JSON
    Decode {
        file: PathBuf,
        /// Pretty-print the JSON
        #[arg(long)]
        pretty: bool,
    },
    /// Rewrite a local markdown file's wikilinks against an empty tree
    Render {
        file: PathBuf,
        /// Repository used for generated links, as owner/name
        #[arg(long, default_value = "local/local")]
        repo: String,
    },
}

/// Short command name for logging.
pub fn command_name(command: &Commands) -> &'static str {
    match command {
        Commands::Tree { .. } => "tree",
        Commands::View { .. } => "view",
        Commands::Decode { .. } => "decode",
        Commands::Render { .. } => "render",
    }
}

/// CLI context holding the resolved configuration.
pub struct CliContext {
    config: FolioConfig,
}

impl CliContext {
    /// Load configuration, optionally layering an explicit file.
    pub fn new(config_path: Option<PathBuf>) -> Result<Self, ApiError> {
        let config = match &config_path {
            Some(path) => ConfigLoader::load_from_file(path)?,
            None => ConfigLoader::load()?,
        };
        Ok(Self::from_config(config))
    }

    pub fn from_config(config: FolioConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &FolioConfig {
        &self.config
    }

    pub fn config_mut(&mut self) -> &mut FolioConfig {
        &mut self.config
    }

    /// Execute a CLI command and return its printable output.
    pub fn execute(&self, command: &Commands) -> Result<String, ApiError> {
        info!(command = command_name(command), "Executing command");
        match command {
            Commands::Tree {
                owner,
                repo,
                format,
            } => self.handle_tree(RepoRef::new(owner, repo), format),
            Commands::View {
                owner,
                repo,
                path,
                sha,
                file,
                raw,
                format,
                out,
            } => {
                let repo = RepoRef::new(owner, repo);
                let mut request = match file {
                    Some(encoded) => ViewRequest::from_file_query(repo, encoded)?,
                    None => ViewRequest::new(repo),
                };
                if let Some(path) = path {
                    request = request.with_path(path);
                }
                if let Some(sha) = sha {
                    request = request.with_sha(sha);
                }
                self.handle_view(request.raw(*raw), format, out.as_deref())
            }
            Commands::Decode { file, pretty } => self.handle_decode(file, *pretty),
            Commands::Render { file, repo } => self.handle_render(file, repo),
        }
    }

    fn viewer(&self) -> Result<RepositoryViewer<GithubSource>, ApiError> {
        let github = &self.config.github;
        let source = GithubSource::new(github, github.resolve_token())?;
        Ok(RepositoryViewer::new(source, self.config.viewer.clone()))
    }

    fn runtime() -> Result<tokio::runtime::Runtime, ApiError> {
        if tokio::runtime::Handle::try_current().is_ok() {
            return Err(ApiError::InvalidRequest(
                "Cannot run a blocking command from within an async runtime".to_string(),
            ));
        }
        Ok(tokio::runtime::Runtime::new()?)
    }

    fn handle_tree(&self, repo: RepoRef, format: &str) -> Result<String, ApiError> {
        let viewer = self.viewer()?;
        let tree = Self::runtime()?.block_on(viewer.tree(&repo))?;
        match format {
            "text" => Ok(format_tree_text(&repo, &tree)),
            "table" => Ok(format_tree_table(&tree)),
            "json" => Ok(serde_json::to_string_pretty(&tree)?),
            "html" => Ok(render_tree_html(
                &tree,
                &repo,
                &self.config.viewer.app_prefix,
                None,
            )),
            other => Err(ApiError::InvalidRequest(format!(
                "Unknown tree format: {} (expected text, table, json or html)",
                other
            ))),
        }
    }

    fn handle_view(
        &self,
        request: ViewRequest,
        format: &str,
        out: Option<&Path>,
    ) -> Result<String, ApiError> {
        let viewer = self.viewer()?;
        let page = Self::runtime()?.block_on(viewer.render(&request));

        if let Some(out) = out {
            let bytes = match &page.outcome {
                ViewOutcome::Markdown { html, .. } => html.as_bytes().to_vec(),
                ViewOutcome::Drawing { document, .. } => serde_json::to_vec_pretty(document)?,
                ViewOutcome::Content { body, .. } => match body {
                    Body::Binary(bytes) => bytes.clone(),
                    Body::Text(text) => text.as_bytes().to_vec(),
                },
                ViewOutcome::Placeholder { body, .. } => body.as_bytes().to_vec(),
            };
            std::fs::write(out, &bytes)?;
            return Ok(format!("Wrote {} bytes to {}", bytes.len(), out.display()));
        }

        match format {
            "json" => Ok(serde_json::to_string_pretty(&page)?),
            "text" => Ok(format_view_text(&page)),
            other => Err(ApiError::InvalidRequest(format!(
                "Unknown view format: {} (expected text or json)",
                other
            ))),
        }
    }

    fn handle_decode(&self, file: &Path, pretty: bool) -> Result<String, ApiError> {
        let text = std::fs::read_to_string(file)?;
        let document = DrawingProcessor::new(self.config.viewer.reconcile).decode(&text)?;
        if pretty {
            Ok(serde_json::to_string_pretty(&document)?)
        } else {
            let summary = format_drawing_summary(&document);
            Ok(format!("{}\n{}", serde_json::to_string(&document)?, summary))
        }
    }

    fn handle_render(&self, file: &Path, repo: &str) -> Result<String, ApiError> {
        let (owner, name) = repo.split_once('/').ok_or_else(|| {
            ApiError::InvalidRequest(format!("Repository must be owner/name, got {}", repo))
        })?;
        let text = std::fs::read_to_string(file)?;
        Ok(render_markdown(
            &text,
            &[],
            &RepoRef::new(owner, name),
            &self.config.viewer,
        ))
    }
}
