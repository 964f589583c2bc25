//! Web Deploy `parameters.xml` descriptor
//!
//! Exposes the IIS application name as a deploy-time parameter. Its entries
//! bind to the `IisApp` and `setAcl` providers whose path is exactly the
//! source folder, so the same package can later be deployed to a different
//! site without rebuilding.

use crate::config::SourcePath;
use crate::escape::{anchored_regex, xml_escape};

/// Name of the descriptor entry inside the package
pub const PARAMETERS_ENTRY_NAME: &str = "parameters.xml";

/// Parameter exposing the target IIS site/application
pub const APP_NAME_PARAMETER: &str = "IIS Web Application Name";

/// Site used when the parameter is not supplied at deploy time
pub const DEFAULT_SITE_NAME: &str = "Default Web Site";

/// One provider binding of a parameter
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParameterEntry {
    pub kind: String,
    pub scope: String,
    pub match_pattern: String,
}

/// A deploy-time substitutable value
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParameterDefinition {
    pub name: String,
    pub default_value: String,
    pub tag: String,
    pub entries: Vec<ParameterEntry>,
}

/// The full `<parameters>` document
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ParametersDescriptor {
    pub parameters: Vec<ParameterDefinition>,
}

impl ParametersDescriptor {
    pub fn to_xml(&self) -> String {
        let mut xml = String::from("<parameters>\n");
        for parameter in &self.parameters {
            xml.push_str(&format!(
                "  <parameter name=\"{}\" defaultValue=\"{}\" tags=\"{}\">\n",
                xml_escape(&parameter.name),
                xml_escape(&parameter.default_value),
                xml_escape(&parameter.tag)
            ));
            for entry in &parameter.entries {
                xml.push_str(&format!(
                    "    <parameterEntry kind=\"{}\" scope=\"{}\" match=\"{}\" />\n",
                    xml_escape(&entry.kind),
                    xml_escape(&entry.scope),
                    xml_escape(&entry.match_pattern)
                ));
            }
            xml.push_str("  </parameter>\n");
        }
        xml.push_str("</parameters>");
        xml
    }
}

/// Build the descriptor binding the application name to `source`.
pub fn build_parameters(source: &SourcePath) -> ParametersDescriptor {
    let pattern = anchored_regex(&source.display_string());
    let entry = |scope: &str| ParameterEntry {
        kind: "ProviderPath".to_string(),
        scope: scope.to_string(),
        match_pattern: pattern.clone(),
    };

    ParametersDescriptor {
        parameters: vec![ParameterDefinition {
            name: APP_NAME_PARAMETER.to_string(),
            default_value: DEFAULT_SITE_NAME.to_string(),
            tag: "IisApp".to_string(),
            entries: vec![entry("IisApp"), entry("setAcl")],
        }],
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::escape::xml_unescape;
    use regex::Regex;
    use std::path::Path;

    fn source(path: &str) -> SourcePath {
        crate::test_support::resolved("1", "Svc", Path::new(path), Path::new("/out")).1
    }

    fn match_attrs(xml: &str) -> Vec<String> {
        xml.lines()
            .filter_map(|line| line.split("match=\"").nth(1))
            .filter_map(|rest| rest.split('"').next())
            .map(xml_unescape)
            .collect()
    }

    #[test]
    fn descriptor_declares_app_name_parameter() {
        let xml = build_parameters(&source("/work/build")).to_xml();

        assert!(xml.starts_with("<parameters>\n"));
        assert!(xml.contains(
            r#"<parameter name="IIS Web Application Name" defaultValue="Default Web Site" tags="IisApp">"#
        ));
        assert!(xml.contains(r#"<parameterEntry kind="ProviderPath" scope="IisApp" match="^/work/build$" />"#));
        assert!(xml.contains(r#"<parameterEntry kind="ProviderPath" scope="setAcl" match="^/work/build$" />"#));
        assert!(xml.ends_with("</parameters>"));
    }

    #[test]
    fn pattern_matches_only_the_source_path() {
        let path = "/builds/My (App)/v1.0+[x]";
        let descriptor = build_parameters(&source(path));
        let param = &descriptor.parameters[0];
        assert_eq!(param.entries.len(), 2);

        for entry in &param.entries {
            let re = Regex::new(&entry.match_pattern).unwrap();
            assert!(re.is_match(path));
            assert!(!re.is_match("/builds/My (App)/v1x0+[x]"));
            assert!(!re.is_match("/builds/My (App)/v1.0+[x]/bin"));
            assert!(!re.is_match("/other/builds/My (App)/v1.0+[x]"));
            assert!(!re.is_match("/builds/My (App)"));
        }
    }

    #[test]
    fn pattern_survives_xml_escaping() {
        let path = "/builds/R&D <new>";
        let xml = build_parameters(&source(path)).to_xml();
        assert!(!xml.contains("R&D"));

        for pattern in match_attrs(&xml) {
            let re = Regex::new(&pattern).unwrap();
            assert!(re.is_match(path));
        }
    }
}
