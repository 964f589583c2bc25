//! Configuration loading, layering and validation
//!
//! Options come from three layers, later layers taking precedence:
//! - Defaults: built-in tool locations
//! - Task: `[options]` in svcpack.toml
//! - Target: `[targets.<name>.options]` in svcpack.toml

pub mod merge;
pub mod parser;
pub mod resolve;
pub mod schema;

use std::path::{Path, PathBuf};

pub use merge::merge_layers;
pub use parser::{parse_config, parse_config_str};
pub use resolve::{Options, ResolveRequest, SourcePath, resolve};
pub use schema::{
    DEFAULT_INSTALLUTIL_PATH, DEFAULT_MSDEPLOY_PATH, OptionsLayer, PackageConfig, TargetConfig,
};

/// Default configuration file name
pub const CONFIG_FILE_NAME: &str = "svcpack.toml";

impl PackageConfig {
    /// Build the resolver input for one target.
    ///
    /// A missing target yields a request with neither target options nor
    /// source path, so resolution fails on the first missing setting.
    pub fn request_for(
        &self,
        target: &str,
        base_dir: &Path,
        overrides: Option<OptionsLayer>,
    ) -> ResolveRequest {
        let target = self.target(target);
        ResolveRequest {
            task: Some(self.options.clone()),
            target: target.map(|t| t.options.clone()),
            overrides,
            src: target.and_then(|t| t.src.clone()),
            base_dir: base_dir.to_path_buf(),
        }
    }
}

/// Directory relative paths in a config file are resolved against
pub fn config_base_dir(config_path: &Path) -> PathBuf {
    match config_path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
        _ => PathBuf::from("."),
    }
}
