//! Resolution of merged option layers into validated [`Options`]

use std::path::{Component, Path, PathBuf};

use indexmap::IndexMap;

use super::merge::merge_layers;
use super::schema::{DEFAULT_INSTALLUTIL_PATH, DEFAULT_MSDEPLOY_PATH, OptionsLayer};
use crate::error::{PackageError, PackageResult};

/// Fully populated, validated packaging options
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Options {
    pub version: String,
    /// Absolute working folder
    pub working_path: PathBuf,
    pub output_package: String,
    pub exe_name: String,
    pub svc_name: String,
    pub env_vars: IndexMap<String, String>,
    pub vm_installutil_path: String,
    pub local_msdeploy_path: PathBuf,
}

impl Options {
    /// `<workingPath>/<outputPackage>`
    pub fn package_path(&self) -> PathBuf {
        self.working_path.join(&self.output_package)
    }

    /// `<workingPath>/pkg-manifest.xml`
    pub fn manifest_path(&self) -> PathBuf {
        self.working_path.join(crate::manifest::MANIFEST_FILE_NAME)
    }
}

/// Absolute path to the service build output
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourcePath(PathBuf);

impl SourcePath {
    pub fn as_path(&self) -> &Path {
        &self.0
    }

    /// Path text as embedded in generated documents
    pub fn display_string(&self) -> String {
        self.0.display().to_string()
    }
}

impl AsRef<Path> for SourcePath {
    fn as_ref(&self) -> &Path {
        &self.0
    }
}

/// Inputs to [`resolve`]
#[derive(Debug, Clone, Default)]
pub struct ResolveRequest {
    /// Task-level overrides
    pub task: Option<OptionsLayer>,
    /// Target-level overrides
    pub target: Option<OptionsLayer>,
    /// Final overrides applied after the target layer (e.g. from flags)
    pub overrides: Option<OptionsLayer>,
    /// Build output directory, possibly relative
    pub src: Option<String>,
    /// Directory relative paths are resolved against
    pub base_dir: PathBuf,
}

/// Merge the defaults, task and target layers and validate the result.
///
/// Required settings are checked in a fixed order and the first missing one
/// is reported. Performs no filesystem access.
pub fn resolve(request: ResolveRequest) -> PackageResult<(Options, SourcePath)> {
    let merged = merge_layers(
        [
            Some(OptionsLayer::defaults()),
            request.task,
            request.target,
            request.overrides,
        ]
        .into_iter()
        .flatten(),
    );

    let version = required(
        merged.version,
        "version",
        "to be displayed on /status.aspx page",
    )?;
    let working_path = required(
        merged.working_path,
        "workingPath",
        "folder used for temp files and output package",
    )?;
    let output_package = required(
        merged.output_package,
        "outputPackage",
        "file name for resulting package zip file (goes in workingPath)",
    )?;
    let src = required(
        request.src,
        "src",
        "folder containing windows service build output",
    )?;
    let exe_name = required(
        merged.exe_name,
        "exeName",
        "executable file for service in source folder",
    )?;
    let svc_name = required(merged.svc_name, "svcName", "name of the windows service")?;

    let options = Options {
        version,
        working_path: absolutize(&request.base_dir, Path::new(&working_path)),
        output_package,
        exe_name,
        svc_name,
        env_vars: merged.env_vars.unwrap_or_default(),
        vm_installutil_path: merged
            .vm_installutil_path
            .unwrap_or_else(|| DEFAULT_INSTALLUTIL_PATH.to_string()),
        local_msdeploy_path: PathBuf::from(
            merged
                .local_msdeploy_path
                .unwrap_or_else(|| DEFAULT_MSDEPLOY_PATH.to_string()),
        ),
    };
    let source = SourcePath(absolutize(&request.base_dir, Path::new(&src)));

    tracing::debug!(
        version = %options.version,
        svc_name = %options.svc_name,
        source = %source.display_string(),
        env_vars = options.env_vars.len(),
        "Resolved packaging options"
    );

    Ok((options, source))
}

fn required(
    value: Option<String>,
    field: &'static str,
    hint: &'static str,
) -> PackageResult<String> {
    match value {
        Some(v) if !v.is_empty() => Ok(v),
        _ => Err(PackageError::Configuration { field, hint }),
    }
}

/// Join `path` onto `base` when relative and drop `.`/`..` lexically
fn absolutize(base: &Path, path: &Path) -> PathBuf {
    let joined = if path.is_absolute() {
        path.to_path_buf()
    } else {
        base.join(path)
    };

    let mut normalized = PathBuf::new();
    for component in joined.components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => {
                normalized.pop();
            }
            other => normalized.push(other.as_os_str()),
        }
    }
    normalized
}
