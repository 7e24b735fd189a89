//! Child processes on a remote host, reached through an `ssh` client.

use super::local::LocalProcessExecutor;
use async_trait::async_trait;
use buildrig_application::ports::process_executor::{LineSink, NoOutput, ProcessExecutor, RunError};
use buildrig_domain::{CommandLine, ProcessInvocation};
use std::path::{Path, PathBuf};
use tokio_util::sync::CancellationToken;
use tracing::debug;

/// Runs invocations as `ssh <host> -- cd <dir> && <exe> <args>`.
///
/// The remote login shell must be POSIX (sh, bash, zsh): the command is
/// quoted with single quotes and joined with `&&`. A `cmd.exe` or PowerShell
/// remote is not supported.
///
/// Paths in the invocation are paths on the remote host. Output streams
/// back through the local ssh client, so an output file is written locally.
#[derive(Debug, Clone)]
pub struct SshProcessExecutor {
    host: String,
    ssh_program: PathBuf,
    local: LocalProcessExecutor,
}

impl SshProcessExecutor {
    pub fn new(host: impl Into<String>, ssh_program: impl Into<PathBuf>) -> Self {
        Self {
            host: host.into(),
            ssh_program: ssh_program.into(),
            local: LocalProcessExecutor::new(),
        }
    }

    pub fn host(&self) -> &str {
        &self.host
    }

    fn ssh(&self, remote_command: String, working_dir: &Path) -> ProcessInvocation {
        let args = CommandLine::new()
            .arg(self.host.as_str())
            .arg("--")
            .arg(remote_command);
        ProcessInvocation::new(&self.ssh_program, &args, working_dir)
    }

    /// Wrap `invocation` for a POSIX remote shell.
    pub fn wrap(&self, invocation: &ProcessInvocation) -> ProcessInvocation {
        let remote = format!(
            "cd {} && {} {}",
            quote_path(&invocation.working_dir),
            quote_path(&invocation.executable),
            shell_words::join(&invocation.argv)
        );
        let wrapped = self.ssh(remote.trim_end().to_string(), &local_dir());
        match &invocation.output_file {
            Some(path) => wrapped.with_output_file(path),
            None => wrapped,
        }
    }
}

fn quote_path(path: &Path) -> String {
    shell_words::quote(&path.to_string_lossy()).into_owned()
}

fn local_dir() -> PathBuf {
    std::env::current_dir().unwrap_or_else(|_| std::env::temp_dir())
}

#[async_trait]
impl ProcessExecutor for SshProcessExecutor {
    async fn file_exists(&self, path: &Path) -> bool {
        let probe = self.ssh(format!("test -f {}", quote_path(path)), &local_dir());
        match self
            .local
            .run(&probe, &mut NoOutput, &CancellationToken::new())
            .await
        {
            Ok(code) => code == 0,
            Err(e) => {
                debug!("ssh probe on {} failed: {}", self.host, e);
                false
            }
        }
    }

    async fn run(
        &self,
        invocation: &ProcessInvocation,
        sink: &mut dyn LineSink,
        cancel: &CancellationToken,
    ) -> Result<i32, RunError> {
        let wrapped = self.wrap(invocation);
        debug!("Remote on {}: {}", self.host, wrapped.display_command());
        self.local.run(&wrapped, sink, cancel).await
    }
}
