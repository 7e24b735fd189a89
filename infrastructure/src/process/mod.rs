//! Process executors: local children and remote hosts over ssh.

mod local;
mod ssh;

pub use local::LocalProcessExecutor;
pub use ssh::SshProcessExecutor;
