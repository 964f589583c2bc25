//! Web Deploy site manifest
//!
//! The manifest is an ordered list of [`Directive`]s rendered as a
//! `<sitemanifest>` document. Web Deploy runs the directives in document
//! order when the package is deployed, so order is significant:
//!
//! 1. stop the service
//! 2. uninstall it (using the new executable)
//! 3. publish the build output and set ACLs
//! 4. set machine-wide environment variables
//! 5. install the new executable
//! 6. start the service

mod builder;

pub use builder::{
    ANONYMOUS_ACL_USER, MANAGED_RUNTIME_VERSION, WEB_ROOT, build_manifest, write_manifest,
};

use crate::escape::xml_escape;

/// File name of the manifest inside the working folder
pub const MANIFEST_FILE_NAME: &str = "pkg-manifest.xml";

/// One manifest operation
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Directive {
    /// Run a command line on the target VM
    RunCommand {
        command_line: String,
        /// Exit codes treated as success; empty leaves the attribute out
        success_codes: Vec<u32>,
        wait_interval_ms: u32,
    },
    /// Publish a folder as an IIS application
    PublishApp {
        path: String,
        managed_runtime_version: String,
    },
    /// Grant directory access, optionally to a specific user
    SetAcl {
        path: String,
        acl_user: Option<String>,
    },
}

impl Directive {
    /// Render as a single self-closing manifest element
    pub fn to_xml(&self) -> String {
        match self {
            Directive::RunCommand {
                command_line,
                success_codes,
                wait_interval_ms,
            } => {
                let mut xml = format!(r#"<runCommand path="{}""#, xml_escape(command_line));
                if !success_codes.is_empty() {
                    let codes = success_codes
                        .iter()
                        .map(|code| format!("0x{:X}", code))
                        .collect::<Vec<_>>()
                        .join(";");
                    xml.push_str(&format!(r#" successReturnCodes="{}""#, codes));
                }
                xml.push_str(&format!(r#" waitInterval="{}" />"#, wait_interval_ms));
                xml
            }
            Directive::PublishApp {
                path,
                managed_runtime_version,
            } => format!(
                r#"<IisApp path="{}" managedRuntimeVersion="{}" />"#,
                xml_escape(path),
                xml_escape(managed_runtime_version)
            ),
            Directive::SetAcl { path, acl_user } => match acl_user {
                Some(user) => format!(
                    r#"<setAcl path="{}" setAclUser="{}" setAclResourceType="Directory" />"#,
                    xml_escape(path),
                    xml_escape(user)
                ),
                None => format!(
                    r#"<setAcl path="{}" setAclResourceType="Directory" />"#,
                    xml_escape(path)
                ),
            },
        }
    }
}

/// Ordered directive sequence
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Manifest {
    directives: Vec<Directive>,
}

impl Manifest {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, directive: Directive) {
        self.directives.push(directive);
    }

    pub fn directives(&self) -> &[Directive] {
        &self.directives
    }

    pub fn len(&self) -> usize {
        self.directives.len()
    }

    pub fn is_empty(&self) -> bool {
        self.directives.is_empty()
    }

    /// Render the full `<sitemanifest>` document
    pub fn to_xml(&self) -> String {
        let mut xml = String::from("<?xml version=\"1.0\" encoding=\"utf-8\"?>\n<sitemanifest>\n");
        for directive in &self.directives {
            xml.push_str("  ");
            xml.push_str(&directive.to_xml());
            xml.push('\n');
        }
        xml.push_str("</sitemanifest>");
        xml
    }
}
