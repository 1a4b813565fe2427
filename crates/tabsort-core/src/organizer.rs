//! Organizer facade
//!
//! Drives the popup's three flows against the host window: organize
//! (classify then review), find duplicates (detect then review) and apply
//! (reconcile then commit). Every outcome is mirrored on the status board.

use parking_lot::RwLock;
use std::sync::Arc;

use tabsort_classify::{
    resolve_labels, BackendKind, ClassificationBackend, ClassificationOrchestrator,
    ClassifierLoader, EmbeddedBackend, LanguageModel, PromptModelBackend, WorkerBackend,
};
use tabsort_groups::{CommitExecutor, CommitSummary, RawGroups, ReviewSession};
use tabsort_storage::Database;
use tabsort_tabs::HostTabs;

use crate::config::Config;
use crate::status::StatusBoard;
use crate::Result;

const LABELS_INPUT_KEY: &str = "labels_input";
const BACKEND_KEY: &str = "backend";

/// External collaborators the organizer drives
#[derive(Clone)]
pub struct Services {
    pub host: Arc<dyn HostTabs>,
    pub classifier_loader: Arc<dyn ClassifierLoader>,
    pub language_model: Arc<dyn LanguageModel>,
}

pub struct Organizer {
    config: Config,
    db: Database,
    services: Services,
    orchestrator: RwLock<Arc<ClassificationOrchestrator>>,
    executor: CommitExecutor,
    labels_input: RwLock<String>,
    status: StatusBoard,
}

impl Organizer {
    /// Open the settings database named by `config` and build the configured
    /// backend. Must be called from within a Tokio runtime.
    pub fn new(config: Config, services: Services) -> Result<Self> {
        if let Some(parent) = config.database_path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let db = Database::open(&config.database_path)?;
        Ok(Self::with_database(config, db, services))
    }

    pub fn with_database(config: Config, db: Database, services: Services) -> Self {
        let orchestrator = build_orchestrator(config.backend, &config, &services);
        let executor = CommitExecutor::new(Arc::clone(&services.host));

        Self {
            labels_input: RwLock::new(config.default_labels_input.clone()),
            config,
            db,
            services,
            orchestrator: RwLock::new(Arc::new(orchestrator)),
            executor,
            status: StatusBoard::new(),
        }
    }

    /// Apply persisted settings
    pub fn initialize(&self) -> Result<()> {
        if let Some(input) = self.db.get_setting(LABELS_INPUT_KEY)? {
            *self.labels_input.write() = input;
        }

        if let Some(stored) = self.db.get_setting(BACKEND_KEY)? {
            match stored.parse::<BackendKind>() {
                Ok(kind) if kind != self.backend_kind() => self.install_backend(kind),
                Ok(_) => {}
                Err(e) => tracing::warn!(error = %e, "Ignoring stored backend setting"),
            }
        }

        tracing::info!(backend = %self.backend_kind(), "Organizer initialized");
        Ok(())
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn status(&self) -> &StatusBoard {
        &self.status
    }

    /// Label text to pre-fill the input with
    pub fn labels_input(&self) -> String {
        self.labels_input.read().clone()
    }

    pub fn backend_kind(&self) -> BackendKind {
        self.orchestrator.read().backend_kind()
    }

    /// Switch classification backend and remember the choice
    pub fn set_backend(&self, kind: BackendKind) -> Result<()> {
        self.db.set_setting(BACKEND_KEY, kind.as_str())?;
        if kind != self.backend_kind() {
            self.install_backend(kind);
        }
        Ok(())
    }

    /// Classify the current window's tabs into proposed groups.
    pub async fn organize(&self, labels_input: &str) -> Result<ReviewSession> {
        let result = self.run_organize(labels_input).await;
        self.report(result)
    }

    async fn run_organize(&self, labels_input: &str) -> Result<ReviewSession> {
        self.status.loading("Fetching tabs...");

        let tabs = self.services.host.current_window_tabs().await?;
        let labels = resolve_labels(labels_input, self.services.host.as_ref()).await;

        let orchestrator = Arc::clone(&*self.orchestrator.read());
        let raw = orchestrator
            .run(tabs, labels, |message| self.status.loading(message))
            .await?;

        *self.labels_input.write() = labels_input.to_string();
        if let Err(e) = self.db.set_setting(LABELS_INPUT_KEY, labels_input) {
            tracing::warn!(error = %e, "Could not save label input");
        }

        self.status.success("Review and edit groups below:");
        Ok(ReviewSession::new(raw))
    }

    /// Collect later copies of already-open URLs into one proposed group.
    /// Returns `None` when every tab is unique.
    pub async fn find_duplicates(&self) -> Result<Option<ReviewSession>> {
        let result = self.run_find_duplicates().await;
        self.report(result)
    }

    async fn run_find_duplicates(&self) -> Result<Option<ReviewSession>> {
        self.status.loading("Scanning for duplicates...");

        let tabs = self.services.host.current_window_tabs().await?;
        let duplicates = tabsort_tabs::find_duplicates(&tabs);
        let count = duplicates.len();
        tracing::info!(tabs = tabs.len(), duplicates = count, "Scanned for duplicates");

        match RawGroups::single(self.config.duplicates_group_name.clone(), duplicates) {
            Some(raw) => {
                self.status.success(format!("Found {count} duplicate tabs."));
                Ok(Some(ReviewSession::new(raw)))
            }
            None => {
                self.status.success("No duplicate tabs found.");
                Ok(None)
            }
        }
    }

    /// Reconcile the reviewed groups and commit them to the host
    pub async fn apply(&self, session: ReviewSession) -> Result<CommitSummary> {
        let result = self
            .executor
            .commit(session.finalize())
            .await
            .map_err(Into::into);
        let summary = self.report(result)?;

        self.status.success(summary.to_string());
        Ok(summary)
    }

    fn install_backend(&self, kind: BackendKind) {
        tracing::info!(backend = %kind, "Switching classification backend");
        let orchestrator = build_orchestrator(kind, &self.config, &self.services);
        *self.orchestrator.write() = Arc::new(orchestrator);
    }

    fn report<T>(&self, result: Result<T>) -> Result<T> {
        if let Err(e) = &result {
            tracing::error!(error = %e, "Operation failed");
            self.status.error(e);
        }
        result
    }
}

fn build_orchestrator(
    kind: BackendKind,
    config: &Config,
    services: &Services,
) -> ClassificationOrchestrator {
    let backend: Arc<dyn ClassificationBackend> = match kind {
        BackendKind::Embedded => Arc::new(EmbeddedBackend::new(
            Arc::clone(&services.classifier_loader),
            config.excluded_schemes.clone(),
        )),
        BackendKind::Worker => Arc::new(WorkerBackend::spawn(
            Arc::clone(&services.classifier_loader),
            config.excluded_schemes.clone(),
        )),
        BackendKind::PromptModel => Arc::new(PromptModelBackend::new(Arc::clone(
            &services.language_model,
        ))),
    };
    ClassificationOrchestrator::new(backend)
}
