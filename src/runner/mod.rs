pub mod process;
pub mod redact;
pub mod toolchain;

pub use process::{CapturedOutput, OutputMode, ProcessRunner};
pub use toolchain::{ExternalTool, ScriptMode};
