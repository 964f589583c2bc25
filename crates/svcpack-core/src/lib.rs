//! svcpack Core Library
//!
//! Packages a Windows Service build output folder into a Web Deploy
//! package: a status page, an ordered site manifest and a parameters
//! descriptor are generated, `msdeploy` synthesizes the package, and the
//! descriptor is injected into the resulting zip.

pub mod archive;
pub mod config;
pub mod error;
pub mod escape;
pub mod fs;
pub mod manifest;
pub mod parameters;
pub mod pipeline;
pub mod status_page;
pub mod tool;

/// Re-exports of commonly used types
pub mod prelude {
    // Configuration
    pub use crate::config::{
        Options, OptionsLayer, PackageConfig, ResolveRequest, SourcePath, TargetConfig, resolve,
    };

    // Errors
    pub use crate::error::{PackageError, PackageResult};

    // Generated artifacts
    pub use crate::manifest::{Directive, Manifest};
    pub use crate::parameters::{ParameterDefinition, ParameterEntry, ParametersDescriptor};

    // Packaging
    pub use crate::archive::PackageArchive;
    pub use crate::pipeline::{PackageReport, Pipeline, RenderedArtifacts};
    pub use crate::tool::{SystemToolRunner, ToolOutput, ToolRunner};
}
