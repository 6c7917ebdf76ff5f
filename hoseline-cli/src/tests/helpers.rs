//! Test helpers for composing reach requests and stub assessors.

use super::*;
use crate::reach::{AssessorBuilder, ReachConfig};
use camino::Utf8Path;
use geo::Coord;
use hoseline_core::test_support::{StubElevationProvider, StubRoutingProvider};
use hoseline_core::{
    Assessor, ElevationAnnotator, Point, ReachabilityEngine, RetryPolicy, RouteResolver,
};
use std::sync::Arc;

pub(super) fn write_utf8(path: &Utf8Path, contents: &[u8]) {
    std::fs::write(path.as_std_path(), contents).expect("write test file");
}

pub(super) const FIRE: Point = Point::fire(1, Coord { x: 11.510, y: 48.140 });
pub(super) const NEAR_HYDRANT: Point = Point::water_source(2, Coord { x: 11.512, y: 48.141 });
pub(super) const FAR_HYDRANT: Point = Point::water_source(3, Coord { x: 11.515, y: 48.142 });

/// A request over [`FIRE`], [`NEAR_HYDRANT`] and [`FAR_HYDRANT`].
pub(super) fn request_json(hose_length: f64, elevation: bool) -> String {
    serde_json::json!({
        "hose_length": hose_length,
        "mode": "Driving",
        "elevation": elevation,
        "points": [FIRE, NEAR_HYDRANT, FAR_HYDRANT],
    })
    .to_string()
}

/// Builds assessors backed by in-memory providers.
///
/// The near hydrant is 300 m by road, the far one 450 m. The fire sits at
/// 400 m and both hydrants at 350 m.
#[derive(Debug, Default)]
pub(super) struct StubAssessorBuilder;

impl AssessorBuilder for StubAssessorBuilder {
    fn build(&self, config: &ReachConfig) -> Result<Assessor, CliError> {
        let routing = StubRoutingProvider::new()
            .with_route(&FIRE, &NEAR_HYDRANT, 300.0)
            .with_route(&FIRE, &FAR_HYDRANT, 450.0);
        let elevation = StubElevationProvider::new()
            .with_point(&FIRE, 400.0)
            .with_point(&NEAR_HYDRANT, 350.0)
            .with_point(&FAR_HYDRANT, 350.0);
        let engine = ReachabilityEngine::new(
            RouteResolver::new(Arc::new(routing)).with_retry(RetryPolicy::none()),
        )
        .with_selection(config.selection)
        .with_max_concurrency(config.max_concurrency);
        Ok(Assessor::new(engine).with_annotator(ElevationAnnotator::new(Arc::new(elevation))))
    }
}
