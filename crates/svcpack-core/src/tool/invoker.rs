//! Web Deploy package synthesis

use std::path::{Path, PathBuf};

use super::{ToolOutput, ToolRunner};
use crate::error::{PackageError, PackageResult};

/// The three Web Deploy arguments that sync a manifest into a package.
///
/// msdeploy splits its own command line and only accepts quotes around the
/// provider path, so paths are quoted inside each argument.
pub fn sync_arguments(manifest: &Path, package: &Path) -> Vec<String> {
    vec![
        format!("-source:manifest=\"{}\"", manifest.display()),
        format!("-dest:package=\"{}\"", package.display()),
        "-verb:sync".to_string(),
    ]
}

/// Runs the local Web Deploy executable to produce the package zip
#[derive(Debug)]
pub struct PackageInvoker<'a, R: ToolRunner + ?Sized> {
    runner: &'a R,
    msdeploy: PathBuf,
}

impl<'a, R: ToolRunner + ?Sized> PackageInvoker<'a, R> {
    pub fn new(runner: &'a R, msdeploy: impl Into<PathBuf>) -> Self {
        Self {
            runner,
            msdeploy: msdeploy.into(),
        }
    }

    /// Sync `manifest` into a package at `package`.
    ///
    /// Blocks until the tool exits. Fails when the tool cannot be started or
    /// exits with a non-zero code.
    pub fn invoke(&self, manifest: &Path, package: &Path) -> PackageResult<ToolOutput> {
        let args = sync_arguments(manifest, package);
        tracing::info!(
            program = %self.msdeploy.display(),
            args = ?args,
            "Invoking Web Deploy"
        );

        let output = self
            .runner
            .run(&self.msdeploy, &args)
            .map_err(|e| PackageError::ExternalTool {
                program: self.msdeploy.clone(),
                exit_code: None,
                stdout: String::new(),
                stderr: e.to_string(),
            })?;

        if !output.success() {
            tracing::warn!(
                exit_code = ?output.exit_code,
                "Web Deploy exited unsuccessfully"
            );
            return Err(PackageError::ExternalTool {
                program: self.msdeploy.clone(),
                exit_code: output.exit_code,
                stdout: output.stdout,
                stderr: output.stderr,
            });
        }

        tracing::debug!(stdout = %output.stdout.trim(), "Web Deploy finished");
        Ok(output)
    }
}
