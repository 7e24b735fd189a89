//! Child processes on this machine.

use async_trait::async_trait;
use buildrig_application::ports::process_executor::{LineSink, ProcessExecutor, RunError};
use buildrig_domain::{OutputStream, ProcessInvocation};
use std::path::Path;
use std::process::Stdio;
use tokio::io::{AsyncBufReadExt, AsyncRead, BufReader};
use tokio::process::{Child, Command};
use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;
use tracing::{debug, warn};

/// Runs invocations with `tokio::process`.
///
/// On Windows the rendered argument string is handed to the child verbatim;
/// elsewhere the argument tokens are passed one by one.
#[derive(Debug, Clone, Default)]
pub struct LocalProcessExecutor;

impl LocalProcessExecutor {
    pub fn new() -> Self {
        Self
    }

    fn command(&self, invocation: &ProcessInvocation) -> Result<Command, RunError> {
        let mut cmd = Command::new(&invocation.executable);

        #[cfg(windows)]
        {
            if !invocation.arguments.trim().is_empty() {
                cmd.raw_arg(invocation.arguments.trim_end());
            }
        }
        #[cfg(not(windows))]
        {
            cmd.args(&invocation.argv);
        }

        let stdout = match &invocation.output_file {
            Some(path) => Stdio::from(std::fs::File::create(path)?),
            None => Stdio::piped(),
        };

        cmd.current_dir(&invocation.working_dir)
            .stdin(Stdio::null())
            .stdout(stdout)
            .stderr(Stdio::piped())
            .kill_on_drop(true);

        // Linux: request kernel to send SIGTERM to child when parent dies.
        #[cfg(target_os = "linux")]
        unsafe {
            cmd.pre_exec(|| {
                libc::prctl(libc::PR_SET_PDEATHSIG, libc::SIGTERM);
                Ok(())
            });
        }

        Ok(cmd)
    }
}

/// Forward every line of `reader` to `tx` until EOF.
fn forward_lines<R>(reader: R, stream: OutputStream, tx: mpsc::UnboundedSender<(OutputStream, String)>)
where
    R: AsyncRead + Unpin + Send + 'static,
{
    tokio::spawn(async move {
        let mut reader = BufReader::new(reader);
        let mut buf = Vec::new();
        loop {
            buf.clear();
            match reader.read_until(b'\n', &mut buf).await {
                Ok(0) => break,
                Ok(_) => {
                    let line = String::from_utf8_lossy(&buf);
                    let line = line.trim_end_matches(['\r', '\n']).to_string();
                    if tx.send((stream, line)).is_err() {
                        break;
                    }
                }
                Err(e) => {
                    warn!("Error reading child {:?}: {}", stream, e);
                    break;
                }
            }
        }
    });
}

async fn kill(child: &mut Child) {
    if let Err(e) = child.kill().await {
        debug!("Failed to kill child: {}", e);
    }
}

#[async_trait]
impl ProcessExecutor for LocalProcessExecutor {
    async fn file_exists(&self, path: &Path) -> bool {
        if tokio::fs::metadata(path).await.is_ok_and(|m| m.is_file()) {
            return true;
        }
        // Bare program names are resolved the way the OS would
        path.components().count() == 1 && which::which(path).is_ok()
    }

    async fn run(
        &self,
        invocation: &ProcessInvocation,
        sink: &mut dyn LineSink,
        cancel: &CancellationToken,
    ) -> Result<i32, RunError> {
        let mut cmd = self.command(invocation)?;
        let mut child = cmd.spawn().map_err(|source| RunError::Spawn {
            program: invocation.executable.display().to_string(),
            source,
        })?;

        let (tx, mut rx) = mpsc::unbounded_channel();
        if let Some(stdout) = child.stdout.take() {
            forward_lines(stdout, OutputStream::Stdout, tx.clone());
        }
        if let Some(stderr) = child.stderr.take() {
            forward_lines(stderr, OutputStream::Stderr, tx.clone());
        }
        drop(tx);

        loop {
            tokio::select! {
                _ = cancel.cancelled() => {
                    kill(&mut child).await;
                    return Err(RunError::Cancelled);
                }
                message = rx.recv() => match message {
                    Some((stream, line)) => sink.line(stream, &line),
                    None => break,
                },
            }
        }

        let status = tokio::select! {
            _ = cancel.cancelled() => {
                kill(&mut child).await;
                return Err(RunError::Cancelled);
            }
            status = child.wait() => status?,
        };
        Ok(status.code().unwrap_or(-1))
    }
}

#[cfg(all(test, unix))]
mod tests {
    use super::*;
    use buildrig_domain::CommandLine;
    use std::path::PathBuf;

    #[derive(Default)]
    struct Collect(Vec<(OutputStream, String)>);

    impl LineSink for Collect {
        fn line(&mut self, stream: OutputStream, text: &str) {
            self.0.push((stream, text.to_string()));
        }
    }

    fn sh(script: &str, dir: &Path) -> ProcessInvocation {
        ProcessInvocation::new("/bin/sh", &CommandLine::new().arg("-c").arg(script), dir)
    }

    #[tokio::test]
    async fn test_streams_lines_and_exit_code() {
        let dir = tempfile::tempdir().unwrap();
        let mut sink = Collect::default();
        let code = LocalProcessExecutor::new()
            .run(
                &sh("echo one; echo two; echo oops 1>&2; exit 3", dir.path()),
                &mut sink,
                &CancellationToken::new(),
            )
            .await
            .unwrap();

        assert_eq!(code, 3);
        let stdout: Vec<_> = sink
            .0
            .iter()
            .filter(|(s, _)| *s == OutputStream::Stdout)
            .map(|(_, t)| t.as_str())
            .collect();
        assert_eq!(stdout, vec!["one", "two"]);
        assert!(sink.0.contains(&(OutputStream::Stderr, "oops".to_string())));
    }

    #[tokio::test]
    async fn test_quoted_arguments_survive() {
        let dir = tempfile::tempdir().unwrap();
        let mut sink = Collect::default();
        let invocation = ProcessInvocation::new(
            "/bin/sh",
            &CommandLine::new()
                .arg("-c")
                .arg("printf '%s|' \"$@\"")
                .arg("sh")
                .arg("a b")
                .arg("say \"hi\""),
            dir.path(),
        );
        LocalProcessExecutor::new()
            .run(&invocation, &mut sink, &CancellationToken::new())
            .await
            .unwrap();
        assert_eq!(sink.0[0].1, "a b|say \"hi\"|");
    }

    #[tokio::test]
    async fn test_shell_metacharacters_are_not_interpreted() {
        let dir = tempfile::tempdir().unwrap();
        let mut sink = Collect::default();
        let invocation = ProcessInvocation::new(
            "/bin/sh",
            &CommandLine::new()
                .arg("-c")
                .arg("printf '%s|' \"$@\"")
                .arg("sh")
                .arg("it's.csproj")
                .arg(r"bin\Release")
                .arg("#tag"),
            dir.path(),
        );
        let code = LocalProcessExecutor::new()
            .run(&invocation, &mut sink, &CancellationToken::new())
            .await
            .unwrap();
        assert_eq!(code, 0);
        assert_eq!(sink.0[0].1, r"it's.csproj|bin\Release|#tag|");
    }

    #[tokio::test]
    async fn test_output_file_receives_stdout() {
        let dir = tempfile::tempdir().unwrap();
        let target = dir.path().join("out.xml");
        let mut sink = Collect::default();
        LocalProcessExecutor::new()
            .run(
                &sh("echo '<files/>'", dir.path()).with_output_file(&target),
                &mut sink,
                &CancellationToken::new(),
            )
            .await
            .unwrap();

        assert!(sink.0.is_empty());
        assert_eq!(std::fs::read_to_string(&target).unwrap().trim(), "<files/>");
    }

    #[tokio::test]
    async fn test_cancellation_kills_child() {
        let dir = tempfile::tempdir().unwrap();
        let cancel = CancellationToken::new();
        let trigger = cancel.clone();
        tokio::spawn(async move {
            tokio::time::sleep(std::time::Duration::from_millis(100)).await;
            trigger.cancel();
        });

        let mut sink = Collect::default();
        let result = LocalProcessExecutor::new()
            .run(&sh("sleep 30", dir.path()), &mut sink, &cancel)
            .await;
        assert!(matches!(result, Err(RunError::Cancelled)));
    }

    #[tokio::test]
    async fn test_file_exists() {
        let executor = LocalProcessExecutor::new();
        assert!(executor.file_exists(Path::new("/bin/sh")).await);
        assert!(executor.file_exists(Path::new("sh")).await);
        assert!(!executor.file_exists(&PathBuf::from("/no/such/tool")).await);
    }
}
