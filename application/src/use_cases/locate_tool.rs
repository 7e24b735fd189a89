//! Tool location use case.
//!
//! Walks a [`ToolDescriptor`]'s strategies in order and stops at the first
//! one that yields a path. Strategies that simply find nothing are not
//! errors; only store and file-system faults abort the search.

use crate::ports::executable_probe::ExecutableProbe;
use crate::ports::file_system::FileSystemPort;
use crate::ports::key_value_store::{KeyValueStore, StoreError};
use crate::ports::process_executor::{NoOutput, RunError};
use crate::use_cases::run_process::ProcessRunner;
use buildrig_domain::tool::sort_by_version_desc;
use buildrig_domain::{
    AuxiliaryQuery, CommandLine, DiscoveryStrategy, LogLevel, OutputClassifier, ProcessInvocation,
    RegistryQuery, ToolDescriptor, parse_candidate_files, select_candidate,
};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use thiserror::Error;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info};

/// Errors that can occur while locating a tool.
#[derive(Error, Debug)]
pub enum LocateError {
    #[error("Could not find {tool}; {remediation}")]
    NotFound { tool: String, remediation: String },

    #[error("Store error: {0}")]
    Store(#[from] StoreError),

    #[error("I/O error during discovery: {0}")]
    Io(#[from] std::io::Error),

    #[error("Operation cancelled")]
    Cancelled,
}

/// Resolves tool descriptors to executable paths.
#[derive(Clone)]
pub struct ToolLocator {
    store: Arc<dyn KeyValueStore>,
    probe: Arc<dyn ExecutableProbe>,
    files: Arc<dyn FileSystemPort>,
    runner: ProcessRunner,
    cancel: CancellationToken,
}

impl ToolLocator {
    pub fn new(
        store: Arc<dyn KeyValueStore>,
        probe: Arc<dyn ExecutableProbe>,
        files: Arc<dyn FileSystemPort>,
        runner: ProcessRunner,
    ) -> Self {
        Self {
            store,
            probe,
            files,
            runner,
            cancel: CancellationToken::new(),
        }
    }

    /// Cancel discovery helpers when `token` fires.
    pub fn with_cancellation(mut self, token: CancellationToken) -> Self {
        self.cancel = token;
        self
    }

    /// Resolve `descriptor` to a single path.
    pub async fn locate(&self, descriptor: &ToolDescriptor) -> Result<PathBuf, LocateError> {
        for strategy in descriptor.strategies() {
            debug!("Locating {} via {}", descriptor.name(), strategy.label());
            if let Some(path) = self.try_strategy(&strategy).await? {
                info!("Located {} at {}", descriptor.name(), path.display());
                return Ok(path);
            }
        }
        Err(LocateError::NotFound {
            tool: descriptor.name().to_string(),
            remediation: descriptor.remediation(),
        })
    }

    async fn try_strategy(&self, strategy: &DiscoveryStrategy) -> Result<Option<PathBuf>, LocateError> {
        match strategy {
            DiscoveryStrategy::ExplicitPath(path) => {
                Ok(Some(path.clone()).filter(|p| !p.as_os_str().is_empty()))
            }
            DiscoveryStrategy::EnvironmentVariable { variable, relative } => {
                let Some(root) = std::env::var_os(variable).filter(|v| !v.is_empty()) else {
                    debug!("{} is not set", variable);
                    return Ok(None);
                };
                let path = Path::new(&root).join(relative);
                Ok(self.probe.is_file(&path).then_some(path))
            }
            DiscoveryStrategy::Registry(query) => self.query_store(query).await,
            DiscoveryStrategy::SearchPath { program } => Ok(self.probe.find_on_path(program)),
            DiscoveryStrategy::WellKnownPath(path) => {
                Ok(self.probe.is_file(path).then(|| path.clone()))
            }
            DiscoveryStrategy::AuxiliaryTool(query) => self.query_helper(query).await,
        }
    }

    async fn query_store(&self, query: &RegistryQuery) -> Result<Option<PathBuf>, LocateError> {
        let join = |dir: String| match &query.relative {
            Some(relative) => PathBuf::from(dir).join(relative),
            None => PathBuf::from(dir),
        };

        if let Some(name) = &query.current_value
            && let Some(dir) = self.store.lookup(&query.key, name).await?
            && !dir.is_empty()
        {
            return Ok(Some(join(dir)));
        }

        // Only the highest-versioned subkey is read.
        let mut children = self.store.list_children(&query.key).await?;
        sort_by_version_desc(&mut children);
        let Some(child) = children.first() else {
            return Ok(None);
        };
        let key = format!(r"{}\{}", query.key, child);
        match self.store.lookup(&key, &query.version_value).await? {
            Some(dir) if !dir.is_empty() => {
                debug!("Using {}\\{}", key, query.version_value);
                Ok(Some(join(dir)))
            }
            _ => {
                debug!("{} has no {} value", key, query.version_value);
                Ok(None)
            }
        }
    }

    async fn query_helper(&self, query: &AuxiliaryQuery) -> Result<Option<PathBuf>, LocateError> {
        let helper = match Box::pin(self.locate(&query.helper)).await {
            Ok(path) => path,
            Err(LocateError::NotFound { tool, .. }) => {
                debug!("Discovery helper {} not found", tool);
                return Ok(None);
            }
            Err(e) => return Err(e),
        };

        let scratch = self.files.scratch_file()?;
        let working_dir = scratch
            .path()
            .parent()
            .map(Path::to_path_buf)
            .unwrap_or_default();
        let invocation = ProcessInvocation::new(
            &helper,
            &CommandLine::new().args(query.arguments.iter().map(String::as_str)),
            working_dir,
        )
        .with_output_file(scratch.path());

        let classifier = OutputClassifier::new(LogLevel::Debug);
        let result = match self
            .runner
            .run(&invocation, &classifier, &NoOutput, &self.cancel)
            .await
        {
            Ok(result) => result,
            Err(RunError::Cancelled) => return Err(LocateError::Cancelled),
            Err(RunError::Io(e)) => return Err(LocateError::Io(e)),
            Err(e) => {
                debug!("Discovery helper failed: {}", e);
                return Ok(None);
            }
        };
        if !result.is_success() {
            debug!("Discovery helper exited with {}", result.exit_code);
            return Ok(None);
        }

        let xml = self.files.read_to_string(scratch.path()).await?;
        let candidates = match parse_candidate_files(&xml) {
            Ok(candidates) => candidates,
            Err(e) => {
                debug!("Unreadable discovery helper output: {}", e);
                return Ok(None);
            }
        };
        let Some(winner) = select_candidate(&candidates, query.prefer.as_deref()) else {
            debug!("Discovery helper returned no candidates");
            return Ok(None);
        };

        Ok(Some(match &query.file_name {
            Some(file_name) => sibling(winner, file_name),
            None => PathBuf::from(winner),
        }))
    }
}

/// `file_name` in the directory of `candidate`.
///
/// Candidates are paths on the helper's host, so both separators are honored
/// and the candidate's own separator is reused.
fn sibling(candidate: &str, file_name: &str) -> PathBuf {
    match candidate.rfind(['\\', '/']) {
        Some(index) => {
            let separator = &candidate[index..=index];
            PathBuf::from(format!("{}{}{}", &candidate[..index], separator, file_name))
        }
        None => PathBuf::from(file_name),
    }
}
