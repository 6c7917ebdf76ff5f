//! Reach command implementation for the hoseline CLI.

use camino::{Utf8Path, Utf8PathBuf};
use clap::Parser;
use hoseline_core::{
    Assessment, Assessor, DEFAULT_MAX_CONCURRENCY, ElevationAnnotator, ReachRequest,
    ReachabilityEngine, RetryPolicy, RouteResolver, Session, SourceSelection,
};
use hoseline_data::{DEFAULT_ELEVATION_URL, HttpElevationProvider, HttpProviderConfig, HttpRoutingProvider};
use hoseline_fs::{create_utf8_file, open_utf8_file};
use log::{info, warn};
use ortho_config::{OrthoConfig, SubcmdConfigMerge};
use serde::{Deserialize, Serialize};
use std::io::{BufReader, Write};
use std::sync::Arc;

use crate::{
    ARG_REACH_ALL_SOURCES, ARG_REACH_ELEVATION_BASE_URL, ARG_REACH_MAX_CONCURRENCY,
    ARG_REACH_OSRM_BASE_URL, ARG_REACH_OUTPUT, ARG_REACH_REQUEST, ARG_REACH_RETRY_ATTEMPTS,
    CliError, ENV_REACH_REQUEST,
};

/// CLI arguments for the `reach` subcommand.
#[derive(Debug, Clone, Parser, Deserialize, Serialize, OrthoConfig, Default)]
#[command(
    long_about = "Decide, for every fire point in a JSON request, which water \
                 source a hose can reach. Routes come from an OSRM instance \
                 and optional elevation profiles from an Open-Elevation \
                 service.",
    about = "Assess hose reachability for a request"
)]
#[ortho_config(prefix = "HOSELINE")]
pub(crate) struct ReachArgs {
    /// Path to a JSON file containing a reach request.
    #[arg(value_name = "path")]
    #[serde(default)]
    pub(crate) request_path: Option<Utf8PathBuf>,
    /// Write the assessment to this file instead of stdout.
    #[arg(long = ARG_REACH_OUTPUT, value_name = "path")]
    #[serde(default)]
    pub(crate) output: Option<Utf8PathBuf>,
    /// Base URL for the OSRM server (e.g. "http://localhost:5000").
    #[arg(long = ARG_REACH_OSRM_BASE_URL, value_name = "url")]
    #[serde(default)]
    pub(crate) osrm_base_url: Option<String>,
    /// Base URL for the Open-Elevation service.
    #[arg(long = ARG_REACH_ELEVATION_BASE_URL, value_name = "url")]
    #[serde(default)]
    pub(crate) elevation_base_url: Option<String>,
    /// Maximum number of routing requests in flight.
    #[arg(long = ARG_REACH_MAX_CONCURRENCY, value_name = "count")]
    #[serde(default)]
    pub(crate) max_concurrency: Option<usize>,
    /// Attempts per provider call, including the first.
    #[arg(long = ARG_REACH_RETRY_ATTEMPTS, value_name = "count")]
    #[serde(default)]
    pub(crate) retry_attempts: Option<u32>,
    /// Report every reachable source, not only the nearest.
    #[arg(
        long = ARG_REACH_ALL_SOURCES,
        num_args = 0..=1,
        require_equals = true,
        default_missing_value = "true",
        value_name = "bool"
    )]
    #[serde(default)]
    pub(crate) all_sources: Option<bool>,
}

impl ReachArgs {
    pub(crate) fn into_config(self) -> Result<ReachConfig, CliError> {
        let merged = self.load_and_merge().map_err(CliError::Configuration)?;
        ReachConfig::try_from(merged)
    }
}

/// Resolved `reach` command configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct ReachConfig {
    /// Path to the JSON request file.
    pub(crate) request_path: Utf8PathBuf,
    /// Optional output file; stdout when absent.
    pub(crate) output: Option<Utf8PathBuf>,
    pub(crate) osrm_base_url: String,
    pub(crate) elevation_base_url: String,
    pub(crate) max_concurrency: usize,
    pub(crate) retry_attempts: u32,
    pub(crate) selection: SourceSelection,
}

impl ReachConfig {
    pub(crate) fn validate_sources(&self) -> Result<(), CliError> {
        let path = &self.request_path;
        match hoseline_fs::file_is_file(path) {
            Ok(true) => Ok(()),
            Ok(false) => Err(CliError::SourcePathNotFile {
                field: ARG_REACH_REQUEST,
                path: path.clone(),
            }),
            Err(source) if source.kind() == std::io::ErrorKind::NotFound => {
                Err(CliError::MissingSourceFile {
                    field: ARG_REACH_REQUEST,
                    path: path.clone(),
                })
            }
            Err(source) => Err(CliError::InspectSourcePath {
                field: ARG_REACH_REQUEST,
                path: path.clone(),
                source,
            }),
        }
    }

    fn retry_policy(&self) -> RetryPolicy {
        RetryPolicy::default().with_max_attempts(self.retry_attempts)
    }
}

impl TryFrom<ReachArgs> for ReachConfig {
    type Error = CliError;

    fn try_from(args: ReachArgs) -> Result<Self, Self::Error> {
        let request_path = args.request_path.ok_or(CliError::MissingArgument {
            field: ARG_REACH_REQUEST,
            env: ENV_REACH_REQUEST,
        })?;

        let osrm_base_url = args
            .osrm_base_url
            .unwrap_or_else(|| HttpProviderConfig::default().base_url);
        let elevation_base_url = args
            .elevation_base_url
            .unwrap_or_else(|| DEFAULT_ELEVATION_URL.to_owned());
        let selection = if args.all_sources.unwrap_or(false) {
            SourceSelection::AllReachable
        } else {
            SourceSelection::Nearest
        };

        Ok(Self {
            request_path,
            output: args.output,
            osrm_base_url,
            elevation_base_url,
            max_concurrency: args.max_concurrency.unwrap_or(DEFAULT_MAX_CONCURRENCY),
            retry_attempts: args
                .retry_attempts
                .unwrap_or(RetryPolicy::default().max_attempts),
            selection,
        })
    }
}

/// Builds the assessor for the current reach invocation.
pub(super) trait AssessorBuilder {
    fn build(&self, config: &ReachConfig) -> Result<Assessor, CliError>;
}

pub(super) struct DefaultAssessorBuilder;

impl AssessorBuilder for DefaultAssessorBuilder {
    fn build(&self, config: &ReachConfig) -> Result<Assessor, CliError> {
        let routing = HttpRoutingProvider::new(config.osrm_base_url.clone()).map_err(|source| {
            CliError::BuildRoutingProvider {
                base_url: config.osrm_base_url.clone(),
                source,
            }
        })?;
        let elevation = HttpElevationProvider::new(config.elevation_base_url.clone()).map_err(
            |source| CliError::BuildElevationProvider {
                base_url: config.elevation_base_url.clone(),
                source,
            },
        )?;

        let resolver = RouteResolver::new(Arc::new(routing)).with_retry(config.retry_policy());
        let engine = ReachabilityEngine::new(resolver)
            .with_selection(config.selection)
            .with_max_concurrency(config.max_concurrency);
        let annotator =
            ElevationAnnotator::new(Arc::new(elevation)).with_retry(config.retry_policy());
        Ok(Assessor::new(engine).with_annotator(annotator))
    }
}

pub(super) fn run_reach(args: ReachArgs) -> Result<(), CliError> {
    let mut stdout = std::io::stdout().lock();
    let builder = DefaultAssessorBuilder;
    run_reach_with(args, &builder, &mut stdout)
}

pub(super) fn run_reach_with(
    args: ReachArgs,
    builder: &dyn AssessorBuilder,
    writer: &mut dyn Write,
) -> Result<(), CliError> {
    let config = resolve_reach_config(args)?;
    let assessment = execute_reach(&config, builder)?;
    match &config.output {
        Some(path) => {
            let mut file = create_utf8_file(path).map_err(|source| CliError::CreateOutput {
                path: path.clone(),
                source,
            })?;
            write_assessment(&mut file, &assessment)?;
            info!("assessment written to {path}");
            Ok(())
        }
        None => write_assessment(writer, &assessment),
    }
}

fn resolve_reach_config(args: ReachArgs) -> Result<ReachConfig, CliError> {
    let config = args.into_config()?;
    config.validate_sources()?;
    Ok(config)
}

fn execute_reach(
    config: &ReachConfig,
    builder: &dyn AssessorBuilder,
) -> Result<Assessment, CliError> {
    let request = load_reach_request(&config.request_path)?;
    let session = Session::new(builder.build(config)?);
    let runtime = tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()
        .map_err(CliError::Runtime)?;

    let result = runtime.block_on(async {
        let submit = session.submit(request);
        tokio::pin!(submit);
        tokio::select! {
            biased;
            result = &mut submit => result,
            interrupted = tokio::signal::ctrl_c() => {
                match interrupted {
                    Ok(()) => {
                        warn!("interrupt received; cancelling assessment");
                        session.cancel();
                    }
                    Err(err) => warn!("cannot listen for interrupts: {err}"),
                }
                submit.await
            }
        }
    });

    result.map_err(|source| {
        if source.is_cancelled() {
            CliError::Interrupted
        } else {
            CliError::Assess {
                path: config.request_path.clone(),
                source,
            }
        }
    })
}

/// Loads a JSON-encoded [`ReachRequest`] from disk.
pub(super) fn load_reach_request(path: &Utf8Path) -> Result<ReachRequest, CliError> {
    let file = open_utf8_file(path).map_err(|source| CliError::OpenReachRequest {
        path: path.to_path_buf(),
        source,
    })?;
    let reader = BufReader::new(file);
    serde_json::from_reader(reader).map_err(|source| CliError::ParseReachRequest {
        path: path.to_path_buf(),
        source,
    })
}

fn write_assessment(writer: &mut dyn Write, assessment: &Assessment) -> Result<(), CliError> {
    let payload = serde_json::to_string_pretty(assessment).map_err(CliError::SerialiseAssessment)?;
    writer
        .write_all(payload.as_bytes())
        .map_err(CliError::WriteOutput)?;
    writer.write_all(b"\n").map_err(CliError::WriteOutput)?;
    Ok(())
}

#[cfg(test)]
pub(crate) fn config_from_layers_for_test(
    layers: Vec<ortho_config::MergeLayer<'static>>,
) -> Result<ReachConfig, CliError> {
    let merged = ReachArgs::merge_from_layers(layers).map_err(CliError::from)?;
    ReachConfig::try_from(merged)
}
