//! Supersede in-flight requests and share routes between them.

use std::sync::{Mutex, PoisonError};

use log::debug;
use tokio_util::sync::CancellationToken;

use crate::{Assessment, AssessmentError, Assessor, ReachRequest, RouteCache};

/// A sequence of requests from one user.
///
/// Submitting a request cancels whatever request is still running, so two
/// submissions never produce interleaved results. Every request routes
/// through the same [`RouteCache`].
#[derive(Debug)]
pub struct Session {
    assessor: Assessor,
    cache: RouteCache,
    current: Mutex<CancellationToken>,
}

impl Session {
    /// Start a session. Reuses the assessor's route cache or attaches a new
    /// one.
    pub fn new(assessor: Assessor) -> Self {
        let cache = assessor.route_cache().cloned().unwrap_or_default();
        Self {
            assessor: assessor.with_route_cache(cache.clone()),
            cache,
            current: Mutex::new(CancellationToken::new()),
        }
    }

    /// The cache shared by every request in this session.
    pub const fn cache(&self) -> &RouteCache {
        &self.cache
    }

    /// Cancel the running request, if any, and hand out a token for the
    /// next one.
    pub fn begin(&self) -> CancellationToken {
        let next = CancellationToken::new();
        let mut current = self.current.lock().unwrap_or_else(PoisonError::into_inner);
        if !current.is_cancelled() {
            debug!("superseding in-flight request");
        }
        current.cancel();
        *current = next.clone();
        next
    }

    /// Cancel the running request without starting another.
    pub fn cancel(&self) {
        self.current
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .cancel();
    }

    /// Run `request` as the session's current request.
    ///
    /// Returns [`crate::EvaluationError::Cancelled`] (wrapped) when a later
    /// submission or [`Self::cancel`] supersedes it.
    pub async fn submit(&self, request: ReachRequest) -> Result<Assessment, AssessmentError> {
        let token = self.begin();
        let result = self.assessor.assess_cancellable(request, &token).await;
        token.cancel();
        result
    }
}
