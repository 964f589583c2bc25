//! External tool execution.
//!
//! ## Design
//!
//! - `ToolRunner` runs a program with arguments and reports its exit code and
//!   captured output; it never interprets the result
//! - `SystemToolRunner` is the real implementation backed by `std::process`
//! - `PackageInvoker` builds the Web Deploy command line and turns a failed
//!   run into [`PackageError::ExternalTool`](crate::error::PackageError)
//!
//! Runs block until the child exits. No timeout is applied.

mod invoker;

use std::path::Path;
use std::process::Command;

pub use invoker::{PackageInvoker, sync_arguments};

/// Exit status and captured streams of a finished process
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ToolOutput {
    /// `None` when the process was terminated by a signal
    pub exit_code: Option<i32>,
    pub stdout: String,
    pub stderr: String,
}

impl ToolOutput {
    pub fn success(&self) -> bool {
        self.exit_code == Some(0)
    }
}

/// Runs an external program to completion
pub trait ToolRunner {
    /// Run `program` with `args`. An `Err` means the program could not be
    /// started at all.
    ///
    /// Arguments reach the program verbatim. On Windows they are appended to
    /// the command line without added quoting, so callers quote values the
    /// way the program expects.
    fn run(&self, program: &Path, args: &[String]) -> std::io::Result<ToolOutput>;
}

/// Runs tools as child processes of the current process
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemToolRunner;

impl ToolRunner for SystemToolRunner {
    fn run(&self, program: &Path, args: &[String]) -> std::io::Result<ToolOutput> {
        let mut command = Command::new(program);
        append_args(&mut command, args);
        let output = command.output()?;
        Ok(ToolOutput {
            exit_code: output.status.code(),
            stdout: String::from_utf8_lossy(&output.stdout).into_owned(),
            stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
        })
    }
}

#[cfg(windows)]
fn append_args(command: &mut Command, args: &[String]) {
    use std::os::windows::process::CommandExt;
    for arg in args {
        command.raw_arg(arg);
    }
}

#[cfg(not(windows))]
fn append_args(command: &mut Command, args: &[String]) {
    command.args(args);
}
