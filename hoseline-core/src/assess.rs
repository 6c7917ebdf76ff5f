//! One request, end to end: validate, evaluate, then optionally annotate.

use futures_util::stream::{self, StreamExt};
use log::warn;
use serde::{Deserialize, Deserializer, Serialize};
use thiserror::Error;
use tokio_util::sync::CancellationToken;

use crate::{
    Elevation, ElevationAnnotator, EvaluationError, HoseLength, Point, PointSetValidator,
    ReachabilityEngine, ReachabilityOutcome, RouteCache, TransportMode, ValidationError,
};

/// What the caller asks for.
///
/// # Examples
/// ```
/// use hoseline_core::{ReachRequest, TransportMode};
///
/// let request: ReachRequest = serde_json::from_str(r#"{
///     "hose_length": 500,
///     "mode": "Service_Driving",
///     "elevation": "true",
///     "points": [
///         {"id": 1, "latitude": 48.140, "longitude": 11.510, "kind": "fire"},
///         {"id": 2, "latitude": 48.141, "longitude": 11.512, "kind": "hydrant"}
///     ]
/// }"#)?;
/// assert_eq!(request.mode, TransportMode::ServiceDriving);
/// assert!(request.elevation);
/// # Ok::<(), serde_json::Error>(())
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReachRequest {
    /// Fire points and water sources, in the order the user placed them.
    pub points: Vec<Point>,
    /// Hose length in metres.
    #[serde(alias = "hose_length_m")]
    pub hose_length: f64,
    /// How the hose is brought to the fire.
    pub mode: TransportMode,
    /// Whether to compute elevation profiles.
    #[serde(default, deserialize_with = "flag")]
    pub elevation: bool,
}

/// Accept `true`/`false` as booleans or strings.
fn flag<'de, D: Deserializer<'de>>(deserializer: D) -> Result<bool, D::Error> {
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Flag {
        Bool(bool),
        Text(String),
    }

    match Flag::deserialize(deserializer)? {
        Flag::Bool(value) => Ok(value),
        Flag::Text(text) => match text.trim().to_ascii_lowercase().as_str() {
            "true" => Ok(true),
            "false" | "" => Ok(false),
            other => Err(serde::de::Error::custom(format!(
                "expected true or false, got {other:?}"
            ))),
        },
    }
}

/// The answer to a [`ReachRequest`].
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Assessment {
    /// Mode the routes were computed for.
    pub mode: TransportMode,
    /// Validated hose length.
    #[serde(rename = "hose_length_m")]
    pub hose_length: HoseLength,
    /// One outcome per fire, in input order.
    pub outcomes: Vec<ReachabilityOutcome>,
}

/// Why an assessment produced no result.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum AssessmentError {
    /// The request was rejected before any provider was contacted.
    #[error(transparent)]
    Validation(#[from] ValidationError),
    /// Evaluation failed or was cancelled.
    #[error(transparent)]
    Evaluation(#[from] EvaluationError),
}

impl AssessmentError {
    /// Whether the request was superseded or cancelled by the caller.
    pub const fn is_cancelled(&self) -> bool {
        matches!(self, Self::Evaluation(EvaluationError::Cancelled))
    }
}

/// Runs validation, reachability and elevation for one request.
#[derive(Debug, Clone)]
pub struct Assessor {
    validator: PointSetValidator,
    engine: ReachabilityEngine,
    annotator: Option<ElevationAnnotator>,
}

impl Assessor {
    /// Assess with `engine`, default constraints and no elevation provider.
    pub const fn new(engine: ReachabilityEngine) -> Self {
        Self {
            validator: PointSetValidator::new(crate::Constraints::DEFAULT),
            engine,
            annotator: None,
        }
    }

    /// Replace the validator.
    #[must_use]
    pub const fn with_validator(mut self, validator: PointSetValidator) -> Self {
        self.validator = validator;
        self
    }

    /// Enable elevation profiles.
    #[must_use]
    pub fn with_annotator(mut self, annotator: ElevationAnnotator) -> Self {
        self.annotator = Some(annotator);
        self
    }

    /// Route lookups through `cache`.
    #[must_use]
    pub fn with_route_cache(mut self, cache: RouteCache) -> Self {
        self.engine = self.engine.with_route_cache(cache);
        self
    }

    /// The route cache in use, if any.
    pub const fn route_cache(&self) -> Option<&RouteCache> {
        self.engine.resolver().cache()
    }

    /// The validator in use.
    pub const fn validator(&self) -> &PointSetValidator {
        &self.validator
    }

    /// Assess `request` to completion.
    pub async fn assess(&self, request: ReachRequest) -> Result<Assessment, AssessmentError> {
        self.assess_cancellable(request, &CancellationToken::new())
            .await
    }

    /// Assess `request`, stopping early once `token` is cancelled.
    pub async fn assess_cancellable(
        &self,
        request: ReachRequest,
        token: &CancellationToken,
    ) -> Result<Assessment, AssessmentError> {
        let set = self.validator.validate(request.points, request.hose_length)?;
        let hose_length = set.hose_length();
        let mut outcomes = self
            .engine
            .evaluate_cancellable(&set, request.mode, hose_length, token)
            .await?;
        if request.elevation {
            self.annotate_all(&mut outcomes, token).await?;
        }
        Ok(Assessment {
            mode: request.mode,
            hose_length,
            outcomes,
        })
    }

    async fn annotate_all(
        &self,
        outcomes: &mut [ReachabilityOutcome],
        token: &CancellationToken,
    ) -> Result<(), EvaluationError> {
        let Some(annotator) = &self.annotator else {
            warn!("elevation requested but no elevation provider is configured");
            for outcome in outcomes.iter_mut().filter(|o| o.reachable) {
                outcome.elevation = Elevation::Unavailable {
                    reason: "no elevation provider configured".to_owned(),
                };
            }
            return Ok(());
        };

        let statuses: Vec<(usize, Elevation)> = {
            let jobs = outcomes
                .iter()
                .enumerate()
                .filter(|(_, outcome)| outcome.reachable)
                .map(move |(idx, outcome)| async move {
                    let status = match annotator.annotate(outcome).await {
                        Ok(profile) => Elevation::Profile(profile),
                        Err(err) => {
                            warn!("fire {}: {err}", outcome.fire.id());
                            Elevation::Unavailable {
                                reason: err.to_string(),
                            }
                        }
                    };
                    (idx, status)
                });
            let collected = stream::iter(jobs)
                .buffer_unordered(self.engine.max_concurrency())
                .collect::<Vec<_>>();
            tokio::select! {
                biased;
                () = token.cancelled() => return Err(EvaluationError::Cancelled),
                statuses = collected => statuses,
            }
        };

        for (idx, status) in statuses {
            if let Some(outcome) = outcomes.get_mut(idx) {
                outcome.elevation = status;
            }
        }
        Ok(())
    }
}
