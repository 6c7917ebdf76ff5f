//! Error types emitted by the hoseline CLI.
//!
//! Keep this error type reasonably small, as every CLI helper returns
//! `Result<_, CliError>`.

use std::sync::Arc;

use camino::Utf8PathBuf;
use hoseline_core::AssessmentError;
use hoseline_data::ProviderBuildError;
use thiserror::Error;

/// Errors emitted by the hoseline CLI.
#[derive(Debug, Error)]
pub enum CliError {
    /// Provided arguments failed Clap validation.
    #[error(transparent)]
    ArgumentParsing(#[from] clap::Error),
    /// Configuration layering failed (files, env, CLI).
    #[error("failed to load configuration: {0}")]
    Configuration(#[from] Arc<ortho_config::OrthoError>),
    /// A required option is missing after configuration merging.
    #[error("missing {field} (set --{field} or {env})")]
    MissingArgument {
        /// Name of the option.
        field: &'static str,
        /// Environment variable that sets it.
        env: &'static str,
    },
    /// A referenced input path does not exist on disk.
    #[error("{field} path {path:?} does not exist")]
    MissingSourceFile {
        /// Name of the option.
        field: &'static str,
        /// Path as configured.
        path: Utf8PathBuf,
    },
    /// A referenced input path exists but is not a file.
    #[error("{field} path {path:?} exists but is not a file")]
    SourcePathNotFile {
        /// Name of the option.
        field: &'static str,
        /// Path as configured.
        path: Utf8PathBuf,
    },
    /// A referenced input path could not be inspected due to an IO error.
    #[error("failed to inspect {field} path {path:?}: {source}")]
    InspectSourcePath {
        /// Name of the option.
        field: &'static str,
        /// Path as configured.
        path: Utf8PathBuf,
        /// Underlying failure.
        #[source]
        source: std::io::Error,
    },
    /// Opening the reach request file failed.
    #[error("failed to open reach request at {path:?}: {source}")]
    OpenReachRequest {
        /// Request file path.
        path: Utf8PathBuf,
        /// Underlying failure.
        #[source]
        source: std::io::Error,
    },
    /// Reach request JSON could not be decoded.
    #[error("failed to parse reach request JSON at {path:?}: {source}")]
    ParseReachRequest {
        /// Request file path.
        path: Utf8PathBuf,
        /// Underlying failure.
        #[source]
        source: serde_json::Error,
    },
    /// Constructing the routing provider failed.
    #[error("failed to build routing provider for {base_url:?}: {source}")]
    BuildRoutingProvider {
        /// Base URL the provider was configured with.
        base_url: String,
        /// Underlying failure.
        #[source]
        source: ProviderBuildError,
    },
    /// Constructing the elevation provider failed.
    #[error("failed to build elevation provider for {base_url:?}: {source}")]
    BuildElevationProvider {
        /// Base URL the provider was configured with.
        base_url: String,
        /// Underlying failure.
        #[source]
        source: ProviderBuildError,
    },
    /// The async runtime could not be started.
    #[error("failed to start async runtime: {0}")]
    Runtime(#[source] std::io::Error),
    /// The request was rejected or could not be evaluated.
    #[error("reach request in {path:?} failed: {source}")]
    Assess {
        /// Request file path.
        path: Utf8PathBuf,
        /// Underlying failure.
        #[source]
        source: AssessmentError,
    },
    /// The assessment was cancelled by an interrupt.
    #[error("assessment interrupted")]
    Interrupted,
    /// Serializing the assessment failed.
    #[error("failed to serialise assessment: {0}")]
    SerialiseAssessment(#[source] serde_json::Error),
    /// Creating the output file failed.
    #[error("failed to create output file {path:?}: {source}")]
    CreateOutput {
        /// Output file path.
        path: Utf8PathBuf,
        /// Underlying failure.
        #[source]
        source: std::io::Error,
    },
    /// Writing the assessment failed.
    #[error("failed to write assessment: {0}")]
    WriteOutput(#[source] std::io::Error),
}
