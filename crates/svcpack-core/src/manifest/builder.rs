//! Builds the service deployment manifest from resolved options.

use std::path::PathBuf;

use super::{Directive, Manifest};
use crate::config::{Options, SourcePath};
use crate::error::{PackageError, PackageResult};
use crate::fs::remove_if_exists;

/// Folder the package is deployed into on the target VM
pub const WEB_ROOT: &str = r"c:\inetpub\wwwroot";

/// CLR version of the published IIS application
pub const MANAGED_RUNTIME_VERSION: &str = "v4.0";

/// Identity IIS uses for anonymous requests
pub const ANONYMOUS_ACL_USER: &str = "anonymousAuthenticationUser";

const SUCCESS: u32 = 0x0;
/// `net stop` exit code when the service is not running
const ALREADY_STOPPED: u32 = 0x2;

const STOP_WAIT_MS: u32 = 60_000;
const INSTALL_WAIT_MS: u32 = 30_000;
const START_WAIT_MS: u32 = 30_000;
const SETX_WAIT_MS: u32 = 10_000;

/// Build the ordered manifest for a service deployment.
pub fn build_manifest(options: &Options, source: &SourcePath) -> Manifest {
    let mut manifest = Manifest::new();
    let deployed_exe = format!(r"{}\{}", WEB_ROOT, options.exe_name);
    let src = source.display_string();

    manifest.push(Directive::RunCommand {
        command_line: format!("net stop \"{}\"", options.svc_name),
        success_codes: vec![SUCCESS, ALREADY_STOPPED],
        wait_interval_ms: STOP_WAIT_MS,
    });

    // The new build carries the installer, so it also performs the uninstall.
    // Nothing may be installed yet, hence no success codes.
    manifest.push(Directive::RunCommand {
        command_line: format!("{} /u \"{}\"", options.vm_installutil_path, deployed_exe),
        success_codes: vec![],
        wait_interval_ms: INSTALL_WAIT_MS,
    });

    manifest.push(Directive::PublishApp {
        path: src.clone(),
        managed_runtime_version: MANAGED_RUNTIME_VERSION.to_string(),
    });
    manifest.push(Directive::SetAcl {
        path: src.clone(),
        acl_user: None,
    });
    manifest.push(Directive::SetAcl {
        path: src,
        acl_user: Some(ANONYMOUS_ACL_USER.to_string()),
    });

    for (key, value) in &options.env_vars {
        manifest.push(Directive::RunCommand {
            command_line: format!("setx \"{}\" \"{}\" /M", key, value),
            success_codes: vec![SUCCESS],
            wait_interval_ms: SETX_WAIT_MS,
        });
    }

    manifest.push(Directive::RunCommand {
        command_line: format!("{} \"{}\"", options.vm_installutil_path, deployed_exe),
        success_codes: vec![SUCCESS],
        wait_interval_ms: INSTALL_WAIT_MS,
    });
    manifest.push(Directive::RunCommand {
        command_line: format!("net start \"{}\"", options.svc_name),
        success_codes: vec![SUCCESS],
        wait_interval_ms: START_WAIT_MS,
    });

    manifest
}

/// Replace `<workingPath>/pkg-manifest.xml` with the rendered manifest.
pub fn write_manifest(options: &Options, manifest: &Manifest) -> PackageResult<PathBuf> {
    let path = options.manifest_path();
    remove_if_exists(&path)?;

    std::fs::write(&path, manifest.to_xml()).map_err(|e| PackageError::fs("write", &path, e))?;

    tracing::info!(
        path = %path.display(),
        directives = manifest.len(),
        "Wrote deployment manifest"
    );
    Ok(path)
}
