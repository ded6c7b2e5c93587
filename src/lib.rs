pub mod db;
pub mod engine;
pub mod error;
pub mod models;
pub mod session;
pub mod settings;
pub mod utils;

use std::{
    env, fs,
    path::{Path, PathBuf},
    sync::Arc,
};

use anyhow::{anyhow, Context, Result};
use serde::Deserialize;

pub use db::Database;
pub use error::{ReconcileError, ReconcileResult};
pub use models::{AnalysisResult, Document};
pub use session::{dispatch, SessionAction, SessionController, SessionState};
pub use settings::SettingsStore;

/// Input for one headless reconciliation run.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionScript {
    #[serde(default, alias = "document_id")]
    pub document_id: Option<String>,
    pub document: Document,
    pub analysis: AnalysisResult,
    #[serde(default)]
    pub actions: Vec<SessionAction>,
}

impl SessionScript {
    pub fn load(path: &Path) -> Result<Self> {
        let contents = fs::read_to_string(path)
            .with_context(|| format!("Failed to read session script {}", path.display()))?;
        serde_json::from_str(&contents)
            .with_context(|| format!("Failed to parse session script {}", path.display()))
    }
}

pub fn run() -> Result<()> {
    utils::init_logging();

    let script_path = env::args_os()
        .nth(1)
        .map(PathBuf::from)
        .ok_or_else(|| anyhow!("usage: resume-reactor <session-script.json>"))?;
    let script = SessionScript::load(&script_path)?;

    let settings = SettingsStore::new(SettingsStore::default_path())?;
    let database = Database::new(settings.database_path())?;

    log::info!("Resume reactor starting with {}", script_path.display());

    let runtime = tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()
        .context("failed to start tokio runtime")?;

    let output = runtime.block_on(run_script(script, settings.scoring(), database))?;
    println!("{}", serde_json::to_string_pretty(&output)?);
    Ok(())
}

/// Seed a session from `script`, dispatch its actions in order, and report the result.
///
/// Failed syncs and rejected actions are logged and the run continues.
pub async fn run_script(
    script: SessionScript,
    scoring: engine::ScoringConfig,
    database: Database,
) -> Result<serde_json::Value> {
    let document_id = script
        .document_id
        .unwrap_or_else(models::new_document_id);
    let state = SessionState::seed(document_id.clone(), script.document, script.analysis, scoring);
    let controller = SessionController::new(state, Arc::new(database.clone()));

    for action in script.actions {
        match dispatch(&controller, action).await {
            Ok(outcome) => {
                if let Some(err) = outcome.sync().and_then(|status| status.error()) {
                    log::warn!("Continuing after failed sync: {}", err);
                }
            }
            Err(err) => log::warn!("Action rejected: {}", err),
        }
    }

    let view = controller.get_view().await;
    let preview = controller.get_preview().await;
    let stored = database.latest_document(&document_id).await?;

    Ok(serde_json::json!({
        "session": view,
        "preview": preview,
        "stored": stored,
    }))
}
