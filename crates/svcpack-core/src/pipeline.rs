//! End-to-end packaging pipeline
//!
//! Stages run strictly in sequence, each completing before the next starts:
//! status page, manifest and parameters generation, Web Deploy invocation,
//! then injection of `parameters.xml` into the produced package.
//!
//! The working folder is owned by a single run. Concurrent runs against the
//! same working folder are not supported.

use std::path::PathBuf;

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::archive::patch_package;
use crate::config::{Options, SourcePath};
use crate::error::PackageResult;
use crate::fs::{ensure_dir, hash_file, remove_if_exists};
use crate::manifest::{Manifest, build_manifest, write_manifest};
use crate::parameters::{PARAMETERS_ENTRY_NAME, ParametersDescriptor, build_parameters};
use crate::status_page::write_status_page;
use crate::tool::{PackageInvoker, ToolRunner};

/// Generated artifacts, before any package exists
#[derive(Debug, Clone)]
pub struct RenderedArtifacts {
    pub status_page_path: PathBuf,
    pub manifest_path: PathBuf,
    pub manifest: Manifest,
    pub parameters: ParametersDescriptor,
}

/// Outcome of a successful packaging run
#[derive(Debug, Clone, Serialize)]
pub struct PackageReport {
    pub package_path: PathBuf,
    pub manifest_path: PathBuf,
    pub status_page_path: PathBuf,
    /// Number of manifest directives
    pub directives: usize,
    /// Number of entries in the final package
    pub entries: usize,
    /// BLAKE3 digest of the final package, hex encoded
    pub digest: String,
    pub packaged_at: DateTime<Utc>,
}

/// Runs the packaging stages with an injectable tool runner
pub struct Pipeline<'a> {
    runner: &'a dyn ToolRunner,
}

impl<'a> Pipeline<'a> {
    pub fn new(runner: &'a dyn ToolRunner) -> Self {
        Self { runner }
    }

    /// Write the status page and manifest and build the parameters
    /// descriptor, without invoking Web Deploy.
    pub fn render(&self, options: &Options, source: &SourcePath) -> PackageResult<RenderedArtifacts> {
        ensure_dir(&options.working_path)?;

        let status_page_path = write_status_page(options, source)?;
        let manifest = build_manifest(options, source);
        let manifest_path = write_manifest(options, &manifest)?;
        let parameters = build_parameters(source);

        Ok(RenderedArtifacts {
            status_page_path,
            manifest_path,
            manifest,
            parameters,
        })
    }

    /// Produce the package at `<workingPath>/<outputPackage>`.
    ///
    /// A package left by a previous run is deleted first and is not restored
    /// if a later stage fails.
    pub fn run(&self, options: &Options, source: &SourcePath) -> PackageResult<PackageReport> {
        ensure_dir(&options.working_path)?;
        let package_path = options.package_path();
        remove_if_exists(&package_path)?;

        let rendered = self.render(options, source)?;

        PackageInvoker::new(self.runner, &options.local_msdeploy_path)
            .invoke(&rendered.manifest_path, &package_path)?;

        let entries = patch_package(
            &package_path,
            PARAMETERS_ENTRY_NAME,
            &rendered.parameters.to_xml(),
        )?;
        let digest = hash_file(&package_path)?;

        tracing::info!(
            package = %package_path.display(),
            entries,
            digest = %digest,
            "Package complete"
        );

        Ok(PackageReport {
            package_path,
            manifest_path: rendered.manifest_path,
            status_page_path: rendered.status_page_path,
            directives: rendered.manifest.len(),
            entries,
            digest,
            packaged_at: Utc::now(),
        })
    }
}
