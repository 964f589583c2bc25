//! `/status.aspx` health page
//!
//! The page is executed by IIS on the target VM. It prints the deployed
//! version and queries the service controller for the live status, falling
//! back to `Unknown: <error>` when the service cannot be queried.

use std::path::PathBuf;

use crate::config::{Options, SourcePath};
use crate::error::{PackageError, PackageResult};
use crate::escape::{csharp_string_escape, xml_escape};
use crate::fs::remove_if_exists;

/// File name of the status page inside the source folder
pub const STATUS_PAGE_FILE_NAME: &str = "status.aspx";

const PAGE_DIRECTIVES: &str = concat!(
    r#"<%@ Page Language="C#" %>"#,
    r#"<%@ Assembly Name="System.ServiceProcess, Version=4.0.0.0, Culture=neutral, PublicKeyToken=B03F5F7F11D50A3A" %>"#,
);

/// Render the page text for a version and service name.
pub fn render_status_page(version: &str, svc_name: &str) -> String {
    let version_html = xml_escape(version);
    let svc_html = xml_escape(svc_name);
    let svc_literal = csharp_string_escape(svc_name);

    format!(
        "{PAGE_DIRECTIVES}\
         <html><head><title>Service Status</title></head><body>\
         <h2>Deployed Version: {version_html}</h2>\
         <h2>Service Status: {svc_html}</h2>\
         <p>Status: <% try {{ Response.Write(new System.ServiceProcess.ServiceController(\"{svc_literal}\").Status); }} \
         catch (Exception ex) {{ Response.Write(\"Unknown: \" + ex.ToString()); }} %></p>\
         </body></html>"
    )
}

/// Location of the status page for a source folder
pub fn status_page_path(source: &SourcePath) -> PathBuf {
    source.as_path().join(STATUS_PAGE_FILE_NAME)
}

/// Replace `<source>/status.aspx` with a freshly rendered page.
pub fn write_status_page(options: &Options, source: &SourcePath) -> PackageResult<PathBuf> {
    let path = status_page_path(source);
    remove_if_exists(&path)?;

    let page = render_status_page(&options.version, &options.svc_name);
    std::fs::write(&path, page).map_err(|e| PackageError::fs("write", &path, e))?;

    tracing::info!(path = %path.display(), "Wrote status page");
    Ok(path)
}
