//! HTTP handler functions for the crime explorer API.

use actix_web::http::StatusCode;
use actix_web::{HttpResponse, web};
use crime_explorer_crime_models::CrimeSummary;
use crime_explorer_geography_models::StateMapEntry;
use crime_explorer_measures::breakdown::from_categories;
use crime_explorer_measures::sample::{
    Sourced, live_or_sample, sample_national_trend, sample_state_map,
};
use crime_explorer_measures::{
    build_kpi, build_rate_kpi, build_trend_data, build_yoy_rows, yearly_kpis,
};
use crime_explorer_normalize::search_agencies;
use crime_explorer_server_models::{
    AgenciesQueryParams, AgencyCrimeQueryParams, AgencyRoster, ApiHateCrimeBreakdown, ApiHealth,
    ApiOverview, ApiYearlySummary, HateCrimeQueryParams, OverviewQueryParams,
    StateMapQueryParams, SummarizedQueryParams,
};
use crime_explorer_stats_models::{AggregateField, DataOrigin, KpiFormat};
use crime_explorer_upstream::{StateMapOutcome, UpstreamError};

use crate::AppState;
use crate::cache::CachePolicy;

/// Maps an upstream failure to a JSON error response.
///
/// Upstream status failures are forwarded with the same status; anything
/// that never got a status (transport, bad JSON) becomes `502`.
fn upstream_error(context: &str, e: &UpstreamError) -> HttpResponse {
    log::error!("{context} failed: {e}");
    let status = e
        .status()
        .and_then(|s| StatusCode::from_u16(s).ok())
        .unwrap_or(StatusCode::BAD_GATEWAY);
    HttpResponse::build(status).json(serde_json::json!({ "error": e.to_string() }))
}

fn bad_request(message: &str) -> HttpResponse {
    HttpResponse::BadRequest().json(serde_json::json!({ "error": message }))
}

/// `GET /api/health`
pub async fn health() -> HttpResponse {
    HttpResponse::Ok().json(ApiHealth {
        healthy: true,
        version: env!("CARGO_PKG_VERSION").to_string(),
    })
}

/// `GET /api/summarized`
///
/// Raw upstream summarized payload for a scope, crime type and year range.
pub async fn summarized(
    state: web::Data<AppState>,
    params: web::Query<SummarizedQueryParams>,
) -> HttpResponse {
    let scope = params.scope();
    let (from, to) = params.years();

    match state
        .client
        .summarized_raw(&scope, params.crime(), from, to)
        .await
    {
        Ok(raw) => HttpResponse::Ok()
            .insert_header(CachePolicy::HalfHour.header())
            .json(raw),
        Err(e) => upstream_error("summarized", &e),
    }
}

/// `GET /api/summarized/yearly`
///
/// Normalized yearly aggregates with KPIs, trend and year-over-year rows.
pub async fn summarized_yearly(
    state: web::Data<AppState>,
    params: web::Query<SummarizedQueryParams>,
) -> HttpResponse {
    let scope = params.scope();
    let crime = params.crime();
    let (from, to) = params.years();

    let yearly = match state.client.summarized(&scope, crime, from, to).await {
        Ok(yearly) => yearly,
        Err(e) => return upstream_error("summarized yearly", &e),
    };

    let kpis = yearly_kpis(&yearly);
    let trend = build_trend_data(&yearly, AggregateField::Count);
    let yoy = build_yoy_rows(&yearly);

    HttpResponse::Ok()
        .insert_header(CachePolicy::HalfHour.header())
        .json(ApiYearlySummary {
            scope,
            crime,
            yearly,
            kpis,
            trend,
            yoy,
        })
}

/// `GET /api/hate-crime`
///
/// Range aggregate with per-year totals under `_yearly`.
pub async fn hate_crime(
    state: web::Data<AppState>,
    params: web::Query<HateCrimeQueryParams>,
) -> HttpResponse {
    let scope = params.scope();
    let (from, to) = params.years();

    match state.client.hate_crime_raw(&scope, from, to).await {
        Ok(raw) => HttpResponse::Ok()
            .insert_header(CachePolicy::HalfHour.header())
            .json(raw),
        Err(e) => upstream_error("hate-crime", &e),
    }
}

/// `GET /api/hate-crime/breakdown`
pub async fn hate_crime_breakdown(
    state: web::Data<AppState>,
    params: web::Query<HateCrimeQueryParams>,
) -> HttpResponse {
    let scope = params.scope();
    let (from, to) = params.years();

    let breakdown = match state.client.hate_crime(&scope, from, to).await {
        Ok(breakdown) => breakdown,
        Err(e) => return upstream_error("hate-crime breakdown", &e),
    };

    let bias_shares = from_categories(&breakdown.bias_categories);
    let offense_shares = from_categories(&breakdown.offense_types);

    HttpResponse::Ok()
        .insert_header(CachePolicy::HalfHour.header())
        .json(ApiHateCrimeBreakdown {
            scope,
            yearly: breakdown.yearly,
            bias_categories: breakdown.bias_categories,
            offense_types: breakdown.offense_types,
            bias_shares,
            offense_shares,
        })
}

/// `GET /api/agencies`
///
/// Flattened agency roster for one state, or every state with
/// `state=all`. An optional `q` narrows the roster to matching agencies.
pub async fn agencies(
    state: web::Data<AppState>,
    params: web::Query<AgenciesQueryParams>,
) -> HttpResponse {
    let roster = match params.roster() {
        Ok(roster) => roster,
        Err(e) => return bad_request(&e.to_string()),
    };

    let agencies = match roster {
        AgencyRoster::All => state.client.all_agencies().await,
        AgencyRoster::State(abbr) => match state.client.agencies_by_state(&abbr).await {
            Ok(agencies) => agencies,
            Err(e) => return upstream_error("agencies", &e),
        },
    };

    let mut response = HttpResponse::Ok();
    response.insert_header(CachePolicy::Hour.header());

    match params.q.as_deref() {
        Some(q) => {
            let matches = search_agencies(&agencies, q, params.limit());
            log::debug!("agency search {q:?}: {} matches", matches.len());
            response.json(matches)
        }
        None => response.json(agencies),
    }
}

/// `GET /api/agency-crime`
///
/// Raw summarized payload for one agency.
pub async fn agency_crime(
    state: web::Data<AppState>,
    params: web::Query<AgencyCrimeQueryParams>,
) -> HttpResponse {
    let Some(scope) = params.scope() else {
        return bad_request("ori parameter required");
    };
    let (from, to) = params.years();

    match state
        .client
        .summarized_raw(&scope, params.crime(), from, to)
        .await
    {
        Ok(raw) => HttpResponse::Ok()
            .insert_header(CachePolicy::HalfHour.header())
            .json(raw),
        Err(e) => upstream_error("agency crime", &e),
    }
}

/// Live state rows, or the sample map when no state could be reached.
fn sourced_state_map(outcome: StateMapOutcome) -> Sourced<StateMapEntry> {
    let live = if outcome.all_failed() {
        Err(format!("all {} states failed", outcome.attempted))
    } else {
        if outcome.failed > 0 {
            log::warn!(
                "state map: {}/{} states could not be fetched",
                outcome.failed,
                outcome.attempted
            );
        }
        Ok(outcome.entries)
    };
    live_or_sample(live, sample_state_map)
}

/// `GET /api/state-map`
///
/// One row per state for the requested year under `rows`. States that
/// fail are left out. When none answer, `rows` holds sample data and
/// `origin` says why. Only live answers are cacheable.
pub async fn state_map(
    state: web::Data<AppState>,
    params: web::Query<StateMapQueryParams>,
) -> HttpResponse {
    let outcome = state.client.state_map(params.crime(), params.year()).await;
    let sourced = sourced_state_map(outcome);

    let mut response = HttpResponse::Ok();
    if sourced.origin == DataOrigin::Live {
        response.insert_header(CachePolicy::Hour.header());
    }
    response.json(sourced)
}

/// `GET /api/overview`
///
/// National estimate KPIs and trend. Falls back to sample data when the
/// live request fails or returns nothing, and says so in `origin`.
pub async fn overview(
    state: web::Data<AppState>,
    params: web::Query<OverviewQueryParams>,
) -> HttpResponse {
    let filter = params.filter();
    let crime = filter.crime_type;

    let live = state
        .client
        .national_estimates(crime, filter.start_year, filter.end_year)
        .await;
    let sourced = live_or_sample(live, || {
        sample_national_trend()
            .into_iter()
            .filter(|row| filter.contains_year(row.year))
            .collect()
    });

    let rows: Vec<CrimeSummary> = sourced.rows;
    let field = crime.summary_field();
    let kpis = vec![
        build_kpi(&rows, field, crime.label(), KpiFormat::Number),
        build_rate_kpi(&rows, field, &format!("{} Rate", crime.label())),
    ];
    let trend = build_trend_data(&rows, field);

    HttpResponse::Ok()
        .insert_header(CachePolicy::HalfHour.header())
        .json(ApiOverview {
            origin: sourced.origin,
            crime,
            kpis,
            trend,
            rows,
        })
}
