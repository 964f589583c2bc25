//! TOML parser with helpful error messages

use super::schema::PackageConfig;
use anyhow::{Context, Result};
use std::path::Path;

/// Parse svcpack.toml with detailed error messages
pub fn parse_config(path: &Path) -> Result<PackageConfig> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read config file: {}", path.display()))?;

    parse_config_str(&content)
        .with_context(|| format!("Failed to parse config file: {}", path.display()))
}

/// Parse svcpack.toml content from string
pub fn parse_config_str(content: &str) -> Result<PackageConfig> {
    toml::from_str(content).map_err(|e| enhance_toml_error(e, content))
}

/// Enhance TOML parsing errors with the offending lines
fn enhance_toml_error(error: toml::de::Error, content: &str) -> anyhow::Error {
    let error_msg = error.message().to_string();

    let line_hint = error
        .span()
        .map(|span| content[..span.start.min(content.len())].matches('\n').count() + 1);

    if let Some(line_num) = line_hint {
        let context = get_line_context(content, line_num);
        anyhow::anyhow!(
            "TOML parsing error at line {}:\n{}\n\nError: {}",
            line_num,
            context,
            error_msg
        )
    } else {
        anyhow::anyhow!("TOML parsing error: {}", error_msg)
    }
}

/// Get context lines around an error
fn get_line_context(content: &str, line_num: usize) -> String {
    let lines: Vec<&str> = content.lines().collect();
    let start = line_num.saturating_sub(2);
    let end = (line_num + 1).min(lines.len());

    lines[start.min(end)..end]
        .iter()
        .enumerate()
        .map(|(i, line)| {
            let num = start + i + 1;
            let marker = if num == line_num { ">>>" } else { "   " };
            format!("{} {:4} | {}", marker, num, line)
        })
        .collect::<Vec<_>>()
        .join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    const SAMPLE: &str = r#"
[options]
version = "1.2.3970"
workingPath = "service_temp"
outputPackage = "pkg.zip"
exeName = "TestService.exe"
svcName = "Test Service"

[options.envVars]
MY_ENV_VAR = "Test"
ANOTHER = "Value"

[targets.svc]
src = "build_output"

[targets.svc.options]
svcName = "Target Service"
"#;

    #[test]
    fn test_parse_valid_config() {
        let config = parse_config_str(SAMPLE).unwrap();

        assert_eq!(config.options.version.as_deref(), Some("1.2.3970"));
        assert_eq!(config.options.working_path.as_deref(), Some("service_temp"));
        assert_eq!(config.options.exe_name.as_deref(), Some("TestService.exe"));

        let target = config.target("svc").unwrap();
        assert_eq!(target.src.as_deref(), Some("build_output"));
        assert_eq!(target.options.svc_name.as_deref(), Some("Target Service"));
    }

    #[test]
    fn test_env_vars_keep_file_order() {
        let config = parse_config_str(SAMPLE).unwrap();
        let env = config.options.env_vars.unwrap();
        let keys: Vec<_> = env.keys().map(String::as_str).collect();
        assert_eq!(keys, vec!["MY_ENV_VAR", "ANOTHER"]);
    }

    #[test]
    fn test_parse_tool_paths() {
        let toml = r#"
[options]
vm_installutil_path = 'd:\tools\installutil'
local_msdeploy_path = 'd:\msdeploy\msdeploy.exe'
"#;
        let config = parse_config_str(toml).unwrap();
        assert_eq!(
            config.options.vm_installutil_path.as_deref(),
            Some(r"d:\tools\installutil")
        );
        assert_eq!(
            config.options.local_msdeploy_path.as_deref(),
            Some(r"d:\msdeploy\msdeploy.exe")
        );
    }

    #[test]
    fn test_parse_empty_config() {
        let config = parse_config_str("").unwrap();
        assert_eq!(config, PackageConfig::default());
    }

    #[test]
    fn test_unknown_key_rejected() {
        let toml = r#"
[options]
svcname = "typo"
"#;
        let err = parse_config_str(toml).unwrap_err();
        assert!(err.to_string().contains("svcname"), "got: {}", err);
    }

    #[test]
    fn test_invalid_toml_reports_line() {
        let toml = "[options]\nversion = \n";
        let err = parse_config_str(toml).unwrap_err();
        assert!(err.to_string().contains("TOML parsing error"));
    }

    #[test]
    fn test_parse_from_file() {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(SAMPLE.as_bytes()).unwrap();

        let config = parse_config(file.path()).unwrap();
        assert_eq!(config.targets.len(), 1);
    }

    #[test]
    fn test_parse_missing_file() {
        let result = parse_config(Path::new("/nonexistent/svcpack.toml"));
        assert!(result.is_err());
    }
}
