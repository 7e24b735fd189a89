//! Process invocation value objects and output classification

pub mod classify;
pub mod invocation;

pub use classify::{OutputClassifier, STRUCTURED_PREFIX, encode_structured};
pub use invocation::{LogLevel, OutputLine, OutputStream, ProcessInvocation, ProcessResult};
