use std::collections::HashMap;
use std::sync::Arc;

use axum::extract::{Query, State};
use axum::http::StatusCode;
use axum::Json;

use crate::bench::run_benchmark;
use crate::models::{
    BenchmarkReport, EndpointGroup, EndpointResult, EndpointStats, MethodStats, Stat,
};
use crate::params::Method;
use crate::AppState;

fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

/// Arithmetic mean over the given timings, `N/A` when there are none.
/// Rounding happens only here, never on intermediate sums.
pub fn average(times: &[f64]) -> Stat {
    if times.is_empty() {
        return Stat::NotAvailable;
    }
    let total: f64 = times.iter().sum();
    Stat::Value(round2(total / times.len() as f64))
}

/// Sorted-list median over the given timings, `N/A` when there are none.
/// Even counts take the mean of the two middle values. Sorts a copy, so
/// recomputation over the same input is always identical.
pub fn median(times: &[f64]) -> Stat {
    if times.is_empty() {
        return Stat::NotAvailable;
    }
    let mut sorted = times.to_vec();
    sorted.sort_by(f64::total_cmp);
    let mid = sorted.len() / 2;
    let value = if sorted.len() % 2 != 0 {
        sorted[mid]
    } else {
        (sorted[mid - 1] + sorted[mid]) / 2.0
    };
    Stat::Value(round2(value))
}

/// Timings of every non-error response at one catalog index, across all
/// endpoints.
fn method_times(results: &[EndpointResult], index: usize) -> Vec<f64> {
    results
        .iter()
        .filter_map(|r| r.responses.get(index))
        .filter(|r| !r.error)
        .map(|r| r.time)
        .collect()
}

/// Timings of one endpoint's non-error responses, across all methods.
fn endpoint_times(result: &EndpointResult) -> Vec<f64> {
    result
        .responses
        .iter()
        .filter(|r| !r.error)
        .map(|r| r.time)
        .collect()
}

/// Folds a finished result set into the report handed to the dashboard:
/// the raw results plus per-method and per-endpoint average/median.
pub fn summarize(results: Vec<EndpointResult>, methods: &[Method]) -> BenchmarkReport {
    let method_stats = methods
        .iter()
        .enumerate()
        .map(|(i, method)| {
            let times = method_times(&results, i);
            MethodStats {
                method: method.name().to_string(),
                average: average(&times),
                median: median(&times),
            }
        })
        .collect();

    let endpoint_stats = results
        .iter()
        .map(|result| {
            let times = endpoint_times(result);
            EndpointStats {
                endpoint_url: result.endpoint_url.clone(),
                average: average(&times),
                median: median(&times),
            }
        })
        .collect();

    BenchmarkReport {
        results,
        method_stats,
        endpoint_stats,
    }
}

pub async fn get_groups(State(state): State<Arc<AppState>>) -> Json<Vec<EndpointGroup>> {
    Json(state.groups.clone())
}

/// Runs one full benchmark pass for the requested group and returns the
/// report. The pass is sequential, so this responds only once the last
/// endpoint's last method has been measured.
pub async fn get_benchmark(
    State(state): State<Arc<AppState>>,
    Query(params): Query<HashMap<String, String>>,
) -> Result<Json<BenchmarkReport>, (StatusCode, String)> {
    let name = params
        .get("group")
        .ok_or((StatusCode::BAD_REQUEST, "missing group parameter".to_string()))?;
    let group = state
        .groups
        .iter()
        .find(|g| &g.name == name)
        .ok_or((StatusCode::NOT_FOUND, format!("unknown group: {}", name)))?;

    let results = run_benchmark(&state.client, &group.endpoints, &Method::CATALOG).await;
    Ok(Json(summarize(results, &Method::CATALOG)))
}
