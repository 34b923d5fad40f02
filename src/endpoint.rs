/// HTTP endpoint for querying the climate dataset
///
/// Endpoints:
/// - GET /                               - Lists the available routes
/// - GET /health                         - Service health check
/// - GET /api/v1.0/precipitation         - Last 12 months of precipitation by date
/// - GET /api/v1.0/stations              - Station catalog
/// - GET /api/v1.0/tobs/{station_id}     - Last 12 months of tobs for one station
/// - GET /api/v1.0/{start}               - min/avg/max tobs from start
/// - GET /api/v1.0/{start}/{end}         - min/avg/max tobs from start to end
///
/// Routing and response building are plain functions so they can be tested
/// without a socket. The server loop hands each request to a worker pool.

use crate::query::{QueryEngine, QueryError};
use crate::response;
use serde::Serialize;
use serde_json::json;
use std::io::Cursor;
use thiserror::Error;
use threadpool::ThreadPool;
use tiny_http::{Header, Method, Request, Server, StatusCode};

const API_PREFIX: &str = "/api/v1.0/";

const AVAILABLE_ENDPOINTS: &[&str] = &[
    "/health",
    "/api/v1.0/precipitation",
    "/api/v1.0/stations",
    "/api/v1.0/tobs/<station_id>",
    "/api/v1.0/<start>",
    "/api/v1.0/<start>/<end>",
];

#[derive(Debug, Error)]
pub enum EndpointError {
    #[error("Failed to start HTTP server on port {port}: {message}")]
    Bind { port: u16, message: String },
}

// ---------------------------------------------------------------------------
// Routing
// ---------------------------------------------------------------------------

/// A parsed request path.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Route {
    Welcome,
    Health,
    Precipitation,
    Stations,
    StationTemperatures(String),
    TemperatureRange { start: String, end: Option<String> },
    NotFound,
}

/// Maps a request URL to a route. Query strings are ignored.
pub fn route(url: &str) -> Route {
    let path = url.split(['?', '#']).next().unwrap_or("");

    if path.is_empty() || path == "/" {
        return Route::Welcome;
    }
    if path == "/health" {
        return Route::Health;
    }

    let Some(rest) = path.strip_prefix(API_PREFIX) else {
        return Route::NotFound;
    };
    let rest = rest.strip_suffix('/').unwrap_or(rest);

    let segments: Vec<String> = rest.split('/').map(decode_segment).collect();

    match segments.as_slice() {
        [one] if one == "precipitation" => Route::Precipitation,
        [one] if one == "stations" => Route::Stations,
        [tobs, station] if tobs == "tobs" && !station.is_empty() => {
            Route::StationTemperatures(station.clone())
        }
        [start] if !start.is_empty() => Route::TemperatureRange {
            start: start.clone(),
            end: None,
        },
        [start, end] if !start.is_empty() && !end.is_empty() => Route::TemperatureRange {
            start: start.clone(),
            end: Some(end.clone()),
        },
        _ => Route::NotFound,
    }
}

fn decode_segment(segment: &str) -> String {
    urlencoding::decode(segment)
        .map(|s| s.into_owned())
        .unwrap_or_else(|_| segment.to_string())
}

// ---------------------------------------------------------------------------
// Handlers
// ---------------------------------------------------------------------------

/// A response ready to be written to the client.
#[derive(Debug, Clone, PartialEq)]
pub struct ApiResponse {
    pub status: u16,
    pub content_type: &'static str,
    pub body: String,
}

impl ApiResponse {
    fn json<T: Serialize>(status: u16, payload: &T) -> Self {
        match serde_json::to_string_pretty(payload) {
            Ok(body) => ApiResponse {
                status,
                content_type: "application/json",
                body,
            },
            Err(e) => {
                log::error!("Failed to serialize response: {}", e);
                ApiResponse {
                    status: 500,
                    content_type: "application/json",
                    body: r#"{"error": "Failed to serialize response"}"#.to_string(),
                }
            }
        }
    }

    fn html(body: String) -> Self {
        ApiResponse {
            status: 200,
            content_type: "text/html; charset=utf-8",
            body,
        }
    }
}

/// Runs the use-case for `route` and builds its response.
pub fn dispatch(engine: &QueryEngine, route: &Route) -> ApiResponse {
    match route {
        Route::Welcome => handle_welcome(engine),
        Route::Health => handle_health(engine),
        Route::Precipitation => match engine.precipitation_series() {
            Ok(series) => ApiResponse::json(200, &response::format_precipitation(series)),
            Err(e) => error_response(e),
        },
        Route::Stations => match engine.station_catalog() {
            Ok(stations) => ApiResponse::json(200, &response::format_stations(&stations)),
            Err(e) => error_response(e),
        },
        Route::StationTemperatures(station_id) => {
            match engine.station_temperature_series(station_id) {
                Ok(temps) => ApiResponse::json(200, &response::format_temperatures(temps)),
                Err(e) => error_response(e),
            }
        }
        Route::TemperatureRange { start, end } => {
            match engine.temperature_range_stats(start, end.as_deref()) {
                Ok(stats) => ApiResponse::json(200, &response::format_temperature_stats(&stats)),
                Err(e) => error_response(e),
            }
        }
        Route::NotFound => ApiResponse::json(
            404,
            &json!({
                "error": "Not found",
                "available_endpoints": AVAILABLE_ENDPOINTS,
            }),
        ),
    }
}

/// Handle / - list the routes
fn handle_welcome(engine: &QueryEngine) -> ApiResponse {
    let settings = engine.settings();
    let start = crate::window::format_date(settings.window_start());
    let end = crate::window::format_date(settings.anchor_date);

    ApiResponse::html(format!(
        "Hawaii Precipitation and Temperature: {start} - {end}<br/>\
         Available Routes:<br/>\
         /api/v1.0/precipitation<br/>\
         /api/v1.0/stations<br/>\
         /api/v1.0/tobs/&lt;station_id&gt;<br/>\
         /api/v1.0/&lt;start&gt; (enter as YYYY-MM-DD)<br/>\
         /api/v1.0/&lt;start&gt;/&lt;end&gt; (enter as YYYY-MM-DD/YYYY-MM-DD)"
    ))
}

/// Handle /health
fn handle_health(engine: &QueryEngine) -> ApiResponse {
    let loaded = engine.store().is_initialized();
    ApiResponse::json(
        if loaded { 200 } else { 503 },
        &json!({
            "status": if loaded { "ok" } else { "unavailable" },
            "service": env!("CARGO_PKG_NAME"),
            "version": env!("CARGO_PKG_VERSION"),
        }),
    )
}

fn error_response(error: QueryError) -> ApiResponse {
    if error.is_validation() {
        return ApiResponse::json(400, &json!({ "error": error.to_string() }));
    }
    log::error!("Query failed: {}", error);
    ApiResponse::json(503, &json!({ "error": error.to_string() }))
}

// ---------------------------------------------------------------------------
// HTTP Server
// ---------------------------------------------------------------------------

/// Start HTTP endpoint server on the specified port
pub fn start_endpoint_server(
    port: u16,
    workers: usize,
    engine: QueryEngine,
) -> Result<(), EndpointError> {
    let server = Server::http(("0.0.0.0", port)).map_err(|e| EndpointError::Bind {
        port,
        message: e.to_string(),
    })?;

    log::info!("📡 HTTP endpoint listening on http://0.0.0.0:{}", port);
    serve(server, workers, engine);
    Ok(())
}

/// Accepts requests until the server shuts down, handling each on the pool.
pub fn serve(server: Server, workers: usize, engine: QueryEngine) {
    let pool = ThreadPool::with_name("surfsup-http".to_string(), workers.max(1));

    for request in server.incoming_requests() {
        let engine = engine.clone();
        pool.execute(move || handle_request(&engine, request));
    }

    pool.join();
}

fn handle_request(engine: &QueryEngine, request: Request) {
    let api_response = if *request.method() == Method::Get {
        dispatch(engine, &route(request.url()))
    } else {
        ApiResponse::json(405, &json!({ "error": "Method not allowed" }))
    };

    log::debug!(
        "{} {} -> {}",
        request.method(),
        request.url(),
        api_response.status
    );

    if let Err(e) = request.respond(create_response(api_response)) {
        log::warn!("Failed to send response: {}", e);
    }
}

/// Create HTTP response from an ApiResponse
fn create_response(api_response: ApiResponse) -> tiny_http::Response<Cursor<Vec<u8>>> {
    let response = tiny_http::Response::from_data(api_response.body.into_bytes())
        .with_status_code(StatusCode(api_response.status));

    match Header::from_bytes(&b"Content-Type"[..], api_response.content_type.as_bytes()) {
        Ok(header) => response.with_header(header),
        Err(()) => response,
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fixtures::*;
    use crate::query::QuerySettings;
    use crate::store::Store;
    use serde_json::Value;
    use std::sync::Arc;

    fn engine() -> QueryEngine {
        QueryEngine::new(
            Arc::new(Store::with_dataset(fixture_dataset())),
            QuerySettings::default(),
        )
    }

    fn body(response: &ApiResponse) -> Value {
        serde_json::from_str(&response.body).unwrap()
    }

    // --- Routing --------------------------------------------------------------

    #[test]
    fn test_route_fixed_paths() {
        assert_eq!(route("/"), Route::Welcome);
        assert_eq!(route("/health"), Route::Health);
        assert_eq!(route("/api/v1.0/precipitation"), Route::Precipitation);
        assert_eq!(route("/api/v1.0/stations"), Route::Stations);
        assert_eq!(route("/api/v1.0/stations/"), Route::Stations);
    }

    #[test]
    fn test_route_station_temperatures_decodes_id() {
        assert_eq!(
            route("/api/v1.0/tobs/USC00519397"),
            Route::StationTemperatures("USC00519397".to_string())
        );
        assert_eq!(
            route("/api/v1.0/tobs/USC%2000519397"),
            Route::StationTemperatures("USC 00519397".to_string())
        );
    }

    #[test]
    fn test_route_temperature_ranges() {
        assert_eq!(
            route("/api/v1.0/2017-01-01"),
            Route::TemperatureRange {
                start: "2017-01-01".to_string(),
                end: None
            }
        );
        assert_eq!(
            route("/api/v1.0/2017-01-01/2017-01-31?start=ignored"),
            Route::TemperatureRange {
                start: "2017-01-01".to_string(),
                end: Some("2017-01-31".to_string())
            }
        );
    }

    #[test]
    fn test_route_not_found() {
        assert_eq!(route("/site/05568500"), Route::NotFound);
        assert_eq!(route("/api/v1.0/"), Route::NotFound);
        assert_eq!(route("/api/v1.0/tobs/"), Route::TemperatureRange {
            start: "tobs".to_string(),
            end: None
        });
        assert_eq!(route("/api/v1.0/a/b/c"), Route::NotFound);
    }

    // --- Dispatch -------------------------------------------------------------

    #[test]
    fn test_dispatch_precipitation() {
        let response = dispatch(&engine(), &Route::Precipitation);
        assert_eq!(response.status, 200);
        assert_eq!(response.content_type, "application/json");
        let json = body(&response);
        assert_eq!(json["2016-08-23"], 0.15);
        assert!(json["2016-12-25"].is_null());
        assert!(json.get("2016-08-01").is_none());
    }

    #[test]
    fn test_dispatch_stations() {
        let json = body(&dispatch(&engine(), &Route::Stations));
        let stations = json.as_array().unwrap();
        assert_eq!(stations.len(), 3);
        assert_eq!(stations[0]["Station"], WAIKIKI);
        assert_eq!(stations[2]["Elevation"], 32.9);
    }

    #[test]
    fn test_dispatch_unknown_station_is_empty_success() {
        let response = dispatch(&engine(), &Route::StationTemperatures("NOPE".to_string()));
        assert_eq!(response.status, 200);
        assert_eq!(body(&response), json!({ "Temperatures": [] }));
    }

    #[test]
    fn test_dispatch_range_stats() {
        let response = dispatch(
            &engine(),
            &Route::TemperatureRange {
                start: "2017-01-01".to_string(),
                end: None,
            },
        );
        assert_eq!(response.status, 200);
        assert_eq!(body(&response), json!({ "min_avg_max_Temps": [66.0, 75.0, 80.0] }));
    }

    #[test]
    fn test_dispatch_range_without_data_returns_nulls() {
        let response = dispatch(
            &engine(),
            &Route::TemperatureRange {
                start: "2020-01-01".to_string(),
                end: Some("2020-12-31".to_string()),
            },
        );
        assert_eq!(response.status, 200);
        assert_eq!(body(&response), json!({ "min_avg_max_Temps": [null, null, null] }));
    }

    #[test]
    fn test_dispatch_invalid_date_is_client_error() {
        let response = dispatch(
            &engine(),
            &Route::TemperatureRange {
                start: "tobs".to_string(),
                end: None,
            },
        );
        assert_eq!(response.status, 400);
        let message = body(&response)["error"].as_str().unwrap().to_string();
        assert!(message.contains("start"));
    }

    #[test]
    fn test_dispatch_unloaded_store_is_server_error() {
        let engine = QueryEngine::new(Arc::new(Store::new()), QuerySettings::default());
        assert_eq!(dispatch(&engine, &Route::Stations).status, 503);
        assert_eq!(dispatch(&engine, &Route::Health).status, 503);
    }

    #[test]
    fn test_dispatch_not_found_lists_endpoints() {
        let response = dispatch(&engine(), &Route::NotFound);
        assert_eq!(response.status, 404);
        assert_eq!(
            body(&response)["available_endpoints"].as_array().unwrap().len(),
            AVAILABLE_ENDPOINTS.len()
        );
    }

    #[test]
    fn test_welcome_lists_routes_and_window() {
        let response = dispatch(&engine(), &Route::Welcome);
        assert_eq!(response.status, 200);
        assert!(response.content_type.starts_with("text/html"));
        assert!(response.body.contains("2016-08-23 - 2017-08-23"));
        assert!(response.body.contains("/api/v1.0/precipitation"));
    }

    #[test]
    fn test_health() {
        let response = dispatch(&engine(), &Route::Health);
        assert_eq!(response.status, 200);
        assert_eq!(body(&response)["status"], "ok");
    }
}
