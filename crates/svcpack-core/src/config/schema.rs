//! Configuration schema for svcpack.toml
//!
//! Defines the option layers merged by the resolver:
//! - Defaults: built-in tool locations
//! - Task: the top-level `[options]` table
//! - Target: `[targets.<name>.options]`

use indexmap::IndexMap;
use serde::Deserialize;

/// Default location of `installutil` on the target VM
pub const DEFAULT_INSTALLUTIL_PATH: &str =
    r"c:\windows\microsoft.net\framework\v4.0.30319\installutil";

/// Default location of the Web Deploy executable on the packaging host
pub const DEFAULT_MSDEPLOY_PATH: &str =
    r"C:\Program Files\IIS\Microsoft Web Deploy V3\msdeploy.exe";

/// Root configuration structure for svcpack.toml
#[derive(Debug, Clone, Deserialize, Default, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct PackageConfig {
    /// Task-level options shared by every target
    #[serde(default)]
    pub options: OptionsLayer,

    /// Named targets, each pointing at one build output directory
    #[serde(default)]
    pub targets: IndexMap<String, TargetConfig>,
}

/// One packaging target
#[derive(Debug, Clone, Deserialize, Default, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct TargetConfig {
    /// Folder containing the windows service build output
    #[serde(default)]
    pub src: Option<String>,

    /// Target-level overrides
    #[serde(default)]
    pub options: OptionsLayer,
}

/// A partial set of options; every field may be absent
#[derive(Debug, Clone, Deserialize, Default, PartialEq)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct OptionsLayer {
    /// Version displayed on the status page
    #[serde(default)]
    pub version: Option<String>,

    /// Folder for intermediate files and the output package
    #[serde(default)]
    pub working_path: Option<String>,

    /// File name of the output package, placed in `working_path`
    #[serde(default)]
    pub output_package: Option<String>,

    /// File name of the service executable
    #[serde(default)]
    pub exe_name: Option<String>,

    /// Name of the windows service
    #[serde(default)]
    pub svc_name: Option<String>,

    /// Machine-wide environment variables to set on the target VM
    #[serde(default)]
    pub env_vars: Option<IndexMap<String, String>>,

    #[serde(default, rename = "vm_installutil_path")]
    pub vm_installutil_path: Option<String>,

    #[serde(default, rename = "local_msdeploy_path")]
    pub local_msdeploy_path: Option<String>,
}

impl OptionsLayer {
    /// The built-in defaults layer
    pub fn defaults() -> Self {
        Self {
            vm_installutil_path: Some(DEFAULT_INSTALLUTIL_PATH.to_string()),
            local_msdeploy_path: Some(DEFAULT_MSDEPLOY_PATH.to_string()),
            ..Self::default()
        }
    }

    /// Layer that only sets `version`
    pub fn with_version(version: impl Into<String>) -> Self {
        Self {
            version: Some(version.into()),
            ..Self::default()
        }
    }
}

impl PackageConfig {
    /// Look up a target by name
    pub fn target(&self, name: &str) -> Option<&TargetConfig> {
        self.targets.get(name)
    }

    /// Target names in file order
    pub fn target_names(&self) -> impl Iterator<Item = &str> {
        self.targets.keys().map(String::as_str)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_only_set_tool_paths() {
        let defaults = OptionsLayer::defaults();
        assert_eq!(
            defaults.vm_installutil_path.as_deref(),
            Some(DEFAULT_INSTALLUTIL_PATH)
        );
        assert_eq!(
            defaults.local_msdeploy_path.as_deref(),
            Some(DEFAULT_MSDEPLOY_PATH)
        );
        assert!(defaults.version.is_none());
        assert!(defaults.env_vars.is_none());
    }

    #[test]
    fn target_lookup() {
        let mut config = PackageConfig::default();
        config.targets.insert(
            "svc".to_string(),
            TargetConfig {
                src: Some("build_output".to_string()),
                options: OptionsLayer::default(),
            },
        );

        assert!(config.target("svc").is_some());
        assert!(config.target("other").is_none());
        assert_eq!(config.target_names().collect::<Vec<_>>(), vec!["svc"]);
    }
}
