//! factlens setup and initialization infrastructure
//!
//! Handles project initialization (config directory, default config file,
//! database migrations, report directory) and builds the [`AppContext`]
//! that commands run against.

use anyhow::{Context, Result};
use sqlx::SqlitePool;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::info;

use crate::adapters::filesystem::FsBlobStore;
use crate::adapters::gemini::{GeminiClient, GeminiConfig};
use crate::adapters::sqlite::{initialize_database, PoolConfig, SqliteReportRepository};
use crate::domain::models::Config;
use crate::domain::ports::GroundedModel;
use crate::infrastructure::config::CONFIG_DIR;
use crate::services::{Analyzer, AnalyzerConfig, ReportStore};

/// Default configuration template content
const DEFAULT_CONFIG_TEMPLATE: &str = r#"# factlens configuration
# Override settings by editing this file, adding .factlens/local.yaml, or
# setting environment variables with the FACTLENS_ prefix.
#
# Example environment variables:
#   export FACTLENS_MODEL__API_KEY=...        (or GEMINI_API_KEY)
#   export FACTLENS_DATABASE__PATH=/custom/path/factlens.db
#   export FACTLENS_LOGGING__LEVEL=debug

database:
  # Path to SQLite database file (project-local)
  path: ".factlens/factlens.db"
  max_connections: 5

reports:
  # One report_<id>.html per saved report
  dir: ".factlens/reports"

model:
  base_url: "https://generativelanguage.googleapis.com"
  model: "gemini-2.0-flash"
  timeout_secs: 120
  enable_search_grounding: true

analysis:
  # Page content beyond this many characters is dropped before prompting
  max_content_chars: 10000

logging:
  # Log level: trace, debug, info, warn, error
  level: "info"
  # Log format: json, pretty
  format: "pretty"
  # Rotation for file output (only used when log_dir is set): daily, hourly, never
  rotation: "never"
"#;

/// Setup paths and directories
#[derive(Debug, Clone)]
pub struct SetupPaths {
    pub config_dir: PathBuf,
    pub config_file: PathBuf,
}

impl SetupPaths {
    /// Get setup paths for the current directory
    pub fn new() -> Result<Self> {
        let current_dir = std::env::current_dir().context("Failed to get current directory")?;
        Ok(Self::for_root(current_dir))
    }

    pub fn for_root(root: impl AsRef<Path>) -> Self {
        let config_dir = root.as_ref().join(CONFIG_DIR);
        Self {
            config_file: config_dir.join("config.yaml"),
            config_dir,
        }
    }

    pub fn is_initialized(&self) -> bool {
        self.config_file.exists()
    }
}

/// What `init_project` did.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InitOutcome {
    pub config_file: PathBuf,
    pub config_created: bool,
    pub database_path: String,
    pub reports_dir: String,
}

/// Create the default configuration file unless one exists (or `force`).
pub fn create_config_file(paths: &SetupPaths, force: bool) -> Result<bool> {
    fs::create_dir_all(&paths.config_dir).context("Failed to create config directory")?;

    if paths.config_file.exists() && !force {
        return Ok(false);
    }

    fs::write(&paths.config_file, DEFAULT_CONFIG_TEMPLATE).context("Failed to write config file")?;
    Ok(true)
}

/// Resolve relative storage paths against the current directory.
///
/// Report rows store the blob path, so it must not depend on the directory a
/// later command happens to run from. SQLite URLs and `:memory:` pass through.
pub fn resolve_storage_paths(mut config: Config) -> Result<Config> {
    if !config.database.path.starts_with("sqlite:") && config.database.path != ":memory:" {
        config.database.path = absolute_path(&config.database.path)?;
    }
    config.reports.dir = absolute_path(&config.reports.dir)?;
    Ok(config)
}

fn absolute_path(path: &str) -> Result<String> {
    let resolved = std::path::absolute(path).with_context(|| format!("Failed to resolve path {path:?}"))?;
    Ok(resolved.display().to_string())
}

/// Initialize a project. Safe to run repeatedly.
pub async fn init_project(paths: &SetupPaths, config: &Config, force: bool) -> Result<InitOutcome> {
    let config = resolve_storage_paths(config.clone())?;
    let config_created = create_config_file(paths, force)?;

    let pool = initialize_database(&config.database.url(), None)
        .await
        .context("Failed to initialize database")?;
    pool.close().await;

    FsBlobStore::new(&config.reports.dir)
        .init()
        .await
        .context("Failed to create reports directory")?;

    info!(config_created, database = %config.database.path, "project initialized");

    Ok(InitOutcome {
        config_file: paths.config_file.clone(),
        config_created,
        database_path: config.database.path.clone(),
        reports_dir: config.reports.dir.clone(),
    })
}

/// Explicitly constructed application context shared by all commands.
pub struct AppContext {
    pub config: Config,
    pub pool: SqlitePool,
    pub analyzer: Analyzer,
    pub reports: ReportStore,
}

impl AppContext {
    /// Wire the context against the real Gemini backend.
    pub async fn from_config(config: Config) -> Result<Self> {
        let model = GeminiClient::new(GeminiConfig::from(&config.model))
            .context("Failed to create Gemini client")?;
        Self::with_model(config, Arc::new(model)).await
    }

    /// Wire the context with a caller-supplied model.
    pub async fn with_model(config: Config, model: Arc<dyn GroundedModel>) -> Result<Self> {
        let config = resolve_storage_paths(config)?;
        let pool = initialize_database(
            &config.database.url(),
            Some(PoolConfig::with_max_connections(config.database.max_connections)),
        )
        .await
        .context("Failed to initialize database")?;

        let blobs = FsBlobStore::new(&config.reports.dir);
        blobs.init().await.context("Failed to create reports directory")?;

        let reports = ReportStore::new(
            Arc::new(SqliteReportRepository::new(pool.clone())),
            Arc::new(blobs),
        );
        let analyzer = Analyzer::new(
            model,
            AnalyzerConfig {
                max_content_chars: config.analysis.max_content_chars,
                enable_search_grounding: config.model.enable_search_grounding,
            },
        );

        Ok(Self {
            config,
            pool,
            analyzer,
            reports,
        })
    }

    pub async fn close(self) {
        self.pool.close().await;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::mock::MockGroundedModel;
    use crate::domain::models::NewReport;
    use tempfile::TempDir;

    fn config_in(dir: &Path) -> Config {
        let mut config = Config::default();
        config.database.path = dir.join("factlens.db").display().to_string();
        config.reports.dir = dir.join("reports").display().to_string();
        config
    }

    #[test]
    fn test_resolve_storage_paths() {
        let cwd = std::env::current_dir().unwrap();
        let resolved = resolve_storage_paths(Config::default()).unwrap();
        assert_eq!(
            PathBuf::from(&resolved.database.path),
            cwd.join(".factlens/factlens.db")
        );
        assert_eq!(PathBuf::from(&resolved.reports.dir), cwd.join(".factlens/reports"));

        let mut config = Config::default();
        config.database.path = "sqlite::memory:".to_string();
        config.reports.dir = "/srv/reports".to_string();
        let resolved = resolve_storage_paths(config).unwrap();
        assert_eq!(resolved.database.path, "sqlite::memory:");
        assert_eq!(resolved.reports.dir, "/srv/reports");
    }

    #[test]
    fn test_default_template_parses_to_defaults() {
        let parsed: Config = serde_yaml::from_str(DEFAULT_CONFIG_TEMPLATE).unwrap();
        assert_eq!(parsed, Config::default());
    }

    #[tokio::test]
    async fn test_init_project_is_idempotent() {
        let dir = TempDir::new().unwrap();
        let paths = SetupPaths::for_root(dir.path());
        let config = config_in(dir.path());

        let first = init_project(&paths, &config, false).await.unwrap();
        assert!(first.config_created);
        assert!(paths.is_initialized());
        assert!(dir.path().join("reports").is_dir());

        fs::write(&paths.config_file, "logging:\n  level: debug\n").unwrap();
        let second = init_project(&paths, &config, false).await.unwrap();
        assert!(!second.config_created);
        assert_eq!(
            fs::read_to_string(&paths.config_file).unwrap(),
            "logging:\n  level: debug\n"
        );
    }

    #[tokio::test]
    async fn test_context_round_trip() {
        let dir = TempDir::new().unwrap();
        let ctx = AppContext::with_model(config_in(dir.path()), Arc::new(MockGroundedModel::new()))
            .await
            .unwrap();

        let result = ctx.analyzer.analyze("https://a.example", "text").await;
        let saved = ctx
            .reports
            .save(NewReport::new("https://a.example", "A", result.misinformation_score, "<p/>"))
            .await
            .unwrap();
        assert_eq!(ctx.reports.count().await.unwrap(), 1);
        assert!(saved.file_path.starts_with(&ctx.config.reports.dir));
        ctx.close().await;
    }
}
