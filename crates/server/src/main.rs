// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

#![deny(
    clippy::pedantic,
    clippy::cargo,
    clippy::nursery,
    clippy::style,
    clippy::correctness,
    clippy::all
)]
#![allow(clippy::multiple_crate_versions)]

use axum::{
    Json, Router,
    extract::{DefaultBodyLimit, Multipart, Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
};
use clap::Parser;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::Arc;
use time::Date;
use time::format_description::BorrowedFormatItem;
use time::macros::format_description;
use tokio::sync::Mutex;
use tracing::info;
use wochenplan_api::{
    ApiError, ErrorBody, UploadRequest, UploadResponse, UploadsResponse,
    WeeklyAssignmentsResponse, WeeklyAvailabilityResponse, WeeklyDriversResponse,
    WeeklyRoutesResponse, WeeklySummaryResponse, ingest, load_planning_config, recent_uploads,
    weekly_assignments, weekly_availability, weekly_drivers, weekly_routes, weekly_summary,
};
use wochenplan_audit::UploadAction;
use wochenplan_domain::{ManualUnavailability, PlanningConfig};
use wochenplan_persistence::SqlitePersistence;

/// Default ceiling for uploaded workbook files.
const DEFAULT_MAX_UPLOAD_BYTES: usize = 10 * 1024 * 1024;

/// Default number of history rows returned by the uploads listing.
const DEFAULT_UPLOADS_LIMIT: i64 = 20;

/// Query and form dates use ISO `yyyy-mm-dd`.
const DATE_FORMAT: &[BorrowedFormatItem<'static>] = format_description!("[year]-[month]-[day]");

/// Wochenplan Server - HTTP server for weekly operational plan ingestion
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Path to the `SQLite` database file. If not provided, uses in-memory database.
    #[arg(short, long)]
    database: Option<String>,

    /// Port to bind the server to
    #[arg(short, long, default_value_t = 3000)]
    port: u16,

    /// Path to the planning configuration file. Built-in defaults when omitted.
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Maximum accepted upload size in bytes
    #[arg(long, default_value_t = DEFAULT_MAX_UPLOAD_BYTES)]
    max_upload_bytes: usize,
}

/// Application state shared across handlers.
///
/// The persistence layer sits behind a Mutex; uploads additionally take
/// a per-week lock so two uploads for the same Monday serialize even if
/// the storage layer ever stops being globally locked.
#[derive(Clone)]
struct AppState {
    /// The persistence layer for week plans and upload history.
    persistence: Arc<Mutex<SqlitePersistence>>,
    /// The active planning configuration.
    config: Arc<PlanningConfig>,
    /// One lock per week start, created on first use.
    week_locks: Arc<Mutex<HashMap<Date, Arc<Mutex<()>>>>>,
    /// Upload size ceiling in bytes.
    max_upload_bytes: usize,
}

impl AppState {
    fn new(persistence: SqlitePersistence, config: PlanningConfig, max_upload_bytes: usize) -> Self {
        Self {
            persistence: Arc::new(Mutex::new(persistence)),
            config: Arc::new(config),
            week_locks: Arc::new(Mutex::new(HashMap::new())),
            max_upload_bytes,
        }
    }
}

/// Health check response.
#[derive(Debug, Clone, Serialize, Deserialize)]
struct HealthResponse {
    /// Always `ok` when the server answers.
    status: String,
}

/// HTTP error wrapper that implements `IntoResponse`.
struct HttpError {
    /// The HTTP status code.
    status: StatusCode,
    /// The stable machine kind string.
    kind: String,
    /// The error message.
    message: String,
    /// Structured extra detail, e.g. Monday suggestions.
    details: Option<serde_json::Value>,
}

impl HttpError {
    /// A 422 validation error for a named request field.
    fn validation(field: &str, message: impl Into<String>) -> Self {
        Self {
            status: StatusCode::UNPROCESSABLE_ENTITY,
            kind: String::from("ValidationError"),
            message: format!("{field}: {}", message.into()),
            details: None,
        }
    }
}

impl IntoResponse for HttpError {
    fn into_response(self) -> Response {
        let body: Json<ErrorBody> = Json(ErrorBody {
            error: self.kind,
            message: self.message,
            details: self.details,
        });
        (self.status, body).into_response()
    }
}

impl From<ApiError> for HttpError {
    fn from(err: ApiError) -> Self {
        let status: StatusCode = match &err {
            ApiError::UnsupportedFileType { .. } => StatusCode::BAD_REQUEST,
            ApiError::FileTooLarge { .. } => StatusCode::PAYLOAD_TOO_LARGE,
            ApiError::TransactionRollback { .. } | ApiError::Internal { .. } => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
            _ => StatusCode::UNPROCESSABLE_ENTITY,
        };
        let details: Option<serde_json::Value> = match &err {
            ApiError::NotMonday {
                previous_monday,
                next_monday,
                ..
            } => Some(serde_json::json!({
                "previous_monday": previous_monday.to_string(),
                "next_monday": next_monday.to_string(),
            })),
            _ => None,
        };
        Self {
            status,
            kind: err.kind().to_string(),
            message: err.to_string(),
            details,
        }
    }
}

/// Query parameters naming the week to read.
#[derive(Debug, Clone, Deserialize)]
struct WeekQuery {
    /// The week's Monday.
    week_start: Date,
}

/// Query parameters for the uploads listing.
#[derive(Debug, Clone, Deserialize)]
struct UploadsQuery {
    /// Maximum number of rows to return.
    limit: Option<i64>,
}

/// Decodes the multipart upload form into an `UploadRequest`.
async fn decode_upload(mut multipart: Multipart) -> Result<UploadRequest, HttpError> {
    let mut filename: Option<String> = None;
    let mut bytes: Option<Vec<u8>> = None;
    let mut week_start: Option<Date> = None;
    let mut action: UploadAction = UploadAction::Replace;
    let mut unavailable_drivers: Vec<ManualUnavailability> = Vec::new();

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| HttpError::validation("upload", e.to_string()))?
    {
        let name: String = field.name().unwrap_or_default().to_string();
        match name.as_str() {
            "file" => {
                filename = Some(
                    field
                        .file_name()
                        .map_or_else(|| String::from("upload.xlsx"), str::to_string),
                );
                let data = field
                    .bytes()
                    .await
                    .map_err(|e| HttpError::validation("file", e.to_string()))?;
                bytes = Some(data.to_vec());
            }
            "week_start" => {
                let text: String = field
                    .text()
                    .await
                    .map_err(|e| HttpError::validation("week_start", e.to_string()))?;
                let date: Date = Date::parse(text.trim(), DATE_FORMAT).map_err(|_| {
                    HttpError::validation("week_start", format!("invalid date '{text}'"))
                })?;
                week_start = Some(date);
            }
            "action" => {
                let text: String = field
                    .text()
                    .await
                    .map_err(|e| HttpError::validation("action", e.to_string()))?;
                action = parse_action(&text)?;
            }
            "unavailable_drivers" => {
                let text: String = field
                    .text()
                    .await
                    .map_err(|e| HttpError::validation("unavailable_drivers", e.to_string()))?;
                unavailable_drivers = serde_json::from_str(&text).map_err(|e| {
                    HttpError::validation("unavailable_drivers", e.to_string())
                })?;
            }
            _ => {}
        }
    }

    Ok(UploadRequest {
        filename: filename
            .ok_or_else(|| HttpError::validation("file", "missing multipart field"))?,
        bytes: bytes.ok_or_else(|| HttpError::validation("file", "missing multipart field"))?,
        week_start: week_start
            .ok_or_else(|| HttpError::validation("week_start", "missing multipart field"))?,
        action,
        unavailable_drivers,
    })
}

fn parse_action(text: &str) -> Result<UploadAction, HttpError> {
    match text.trim().to_lowercase().as_str() {
        "replace" | "" => Ok(UploadAction::Replace),
        "append" => Ok(UploadAction::Append),
        other => Err(HttpError::validation(
            "action",
            format!("expected 'replace' or 'append', got '{other}'"),
        )),
    }
}

/// `POST /api/v1/upload` - ingest one workbook into one week.
async fn post_upload(
    State(state): State<AppState>,
    multipart: Multipart,
) -> Result<Json<UploadResponse>, HttpError> {
    let request: UploadRequest = decode_upload(multipart).await?;

    // Uploads for the same Monday serialize on a per-week lock,
    // acquired before the storage lock.
    let week_lock: Arc<Mutex<()>> = {
        let mut locks = state.week_locks.lock().await;
        locks.entry(request.week_start).or_default().clone()
    };
    let _week_guard = week_lock.lock().await;

    let mut persistence = state.persistence.lock().await;
    let response: UploadResponse = ingest(
        &mut persistence,
        &state.config,
        &request,
        state.max_upload_bytes,
    )?;
    Ok(Json(response))
}

/// `GET /api/v1/weekly/routes`
async fn get_weekly_routes(
    State(state): State<AppState>,
    Query(query): Query<WeekQuery>,
) -> Result<Json<WeeklyRoutesResponse>, HttpError> {
    let mut persistence = state.persistence.lock().await;
    Ok(Json(weekly_routes(&mut persistence, query.week_start)?))
}

/// `GET /api/v1/weekly/drivers`
async fn get_weekly_drivers(
    State(state): State<AppState>,
) -> Result<Json<WeeklyDriversResponse>, HttpError> {
    let mut persistence = state.persistence.lock().await;
    Ok(Json(weekly_drivers(&mut persistence)?))
}

/// `GET /api/v1/weekly/availability`
async fn get_weekly_availability(
    State(state): State<AppState>,
    Query(query): Query<WeekQuery>,
) -> Result<Json<WeeklyAvailabilityResponse>, HttpError> {
    let mut persistence = state.persistence.lock().await;
    Ok(Json(weekly_availability(
        &mut persistence,
        query.week_start,
    )?))
}

/// `GET /api/v1/weekly/fixed-assignments`
async fn get_weekly_assignments(
    State(state): State<AppState>,
    Query(query): Query<WeekQuery>,
) -> Result<Json<WeeklyAssignmentsResponse>, HttpError> {
    let mut persistence = state.persistence.lock().await;
    Ok(Json(weekly_assignments(
        &mut persistence,
        query.week_start,
    )?))
}

/// `GET /api/v1/weekly/summary`
async fn get_weekly_summary(
    State(state): State<AppState>,
    Query(query): Query<WeekQuery>,
) -> Result<Json<WeeklySummaryResponse>, HttpError> {
    let mut persistence = state.persistence.lock().await;
    Ok(Json(weekly_summary(&mut persistence, query.week_start)?))
}

/// `GET /api/v1/uploads`
async fn get_uploads(
    State(state): State<AppState>,
    Query(query): Query<UploadsQuery>,
) -> Result<Json<UploadsResponse>, HttpError> {
    let limit: i64 = query.limit.unwrap_or(DEFAULT_UPLOADS_LIMIT).max(1);
    let mut persistence = state.persistence.lock().await;
    Ok(Json(recent_uploads(&mut persistence, limit)?))
}

/// `GET /api/v1/health`
async fn get_health(State(state): State<AppState>) -> Json<HealthResponse> {
    // Touching the lock verifies the storage mutex is healthy.
    drop(state.persistence.lock().await);
    Json(HealthResponse {
        status: String::from("ok"),
    })
}

fn build_router(app_state: AppState) -> Router {
    // Allow some multipart framing overhead on top of the file ceiling.
    let body_limit: usize = app_state.max_upload_bytes.saturating_add(64 * 1024);
    Router::new()
        .route("/api/v1/upload", post(post_upload))
        .route("/api/v1/weekly/routes", get(get_weekly_routes))
        .route("/api/v1/weekly/drivers", get(get_weekly_drivers))
        .route("/api/v1/weekly/availability", get(get_weekly_availability))
        .route(
            "/api/v1/weekly/fixed-assignments",
            get(get_weekly_assignments),
        )
        .route("/api/v1/weekly/summary", get(get_weekly_summary))
        .route("/api/v1/uploads", get(get_uploads))
        .route("/api/v1/health", get(get_health))
        .layer(DefaultBodyLimit::max(body_limit))
        .with_state(app_state)
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args: Args = Args::parse();

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    info!("Initializing Wochenplan Server");

    let persistence: SqlitePersistence = if let Some(db_path) = &args.database {
        info!("Using file-based database at: {}", db_path);
        SqlitePersistence::new_with_file(db_path)?
    } else {
        info!("Using in-memory database");
        SqlitePersistence::new_in_memory()?
    };

    let config: PlanningConfig = load_planning_config(args.config.as_deref())?;
    info!(version = %config.version, "Planning configuration loaded");

    let app_state: AppState = AppState::new(persistence, config, args.max_upload_bytes);
    let app: Router = build_router(app_state);

    let addr: std::net::SocketAddr = format!("127.0.0.1:{}", args.port).parse()?;
    info!("Server listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use axum::{
        body::Body,
        http::{Request, StatusCode as HttpStatusCode},
    };
    use rust_xlsxwriter::{Workbook, Worksheet};
    use tower::ServiceExt;

    const BOUNDARY: &str = "wochenplan-test-boundary";

    /// Helper to create test app state with in-memory persistence.
    fn create_test_app_state() -> AppState {
        let persistence: SqlitePersistence =
            SqlitePersistence::new_in_memory().expect("Failed to create in-memory persistence");
        AppState::new(persistence, PlanningConfig::default(), DEFAULT_MAX_UPLOAD_BYTES)
    }

    /// Builds a minimal four-sheet workbook: routes 411/412 on Mo-Fr,
    /// 452SA on Saturday, two drivers, a Monday holiday, and a grid.
    fn create_test_workbook() -> Vec<u8> {
        let mut workbook = Workbook::new();

        let routes: &mut Worksheet = workbook.add_worksheet();
        routes.set_name("Dienste").unwrap();
        for (col, header) in [
            (1, "Dienst-Nr."),
            (2, "VAD mS"),
            (3, "VAD oS"),
            (4, "Diäten"),
            (5, "Tag"),
            (6, "KFZ-Ort"),
            (8, "SmS"),
            (9, "SoS"),
            (10, "WmS"),
            (11, "WoS"),
        ] {
            routes.write_string(0, col, header).unwrap();
        }
        for (row, code, tag) in [(1, "411", "Mo-Fr"), (2, "412", "Mo-Fr"), (3, "452SA", "Sa")] {
            routes.write_string(row, 1, code).unwrap();
            routes.write_string(row, 2, "05:30").unwrap();
            routes.write_string(row, 5, tag).unwrap();
            for col in 8..=11 {
                routes.write_string(row, col, code).unwrap();
            }
        }

        let drivers: &mut Worksheet = workbook.add_worksheet();
        drivers.set_name("Lenker").unwrap();
        drivers.write_string(0, 0, "Lenker").unwrap();
        drivers.write_string(1, 0, "Huber Max").unwrap();
        drivers.write_string(1, 1, "173:00").unwrap();
        drivers.write_string(1, 5, "411").unwrap();
        drivers.write_string(2, 0, "Maier Anna").unwrap();
        drivers.write_string(2, 1, "173:00").unwrap();

        let holidays: &mut Worksheet = workbook.add_worksheet();
        holidays.set_name("Feiertag").unwrap();
        holidays.write_string(0, 0, "Datum").unwrap();
        holidays.write_string(0, 1, "Feiertag").unwrap();
        holidays.write_string(1, 0, "08.09.2025").unwrap();
        holidays.write_string(1, 1, "Testfeiertag").unwrap();

        let grid: &mut Worksheet = workbook.add_worksheet();
        grid.set_name("Dienstplan").unwrap();
        grid.write_string(0, 2, "Schule").unwrap();
        grid.write_string(1, 2, "08.09.2025").unwrap();
        grid.write_string(1, 3, "09.09.2025").unwrap();
        grid.write_string(2, 0, "Lenker").unwrap();
        grid.write_string(3, 0, "Huber Max").unwrap();
        grid.write_string(4, 0, "Maier Anna").unwrap();

        workbook.save_to_buffer().unwrap()
    }

    fn push_text_field(body: &mut Vec<u8>, name: &str, value: &str) {
        body.extend_from_slice(
            format!(
                "--{BOUNDARY}\r\nContent-Disposition: form-data; name=\"{name}\"\r\n\r\n{value}\r\n"
            )
            .as_bytes(),
        );
    }

    fn multipart_body(workbook: Option<&[u8]>, week_start: &str, action: Option<&str>) -> Vec<u8> {
        let mut body: Vec<u8> = Vec::new();
        if let Some(bytes) = workbook {
            body.extend_from_slice(
                format!(
                    "--{BOUNDARY}\r\nContent-Disposition: form-data; name=\"file\"; \
                     filename=\"dienstplan.xlsx\"\r\nContent-Type: application/octet-stream\r\n\r\n"
                )
                .as_bytes(),
            );
            body.extend_from_slice(bytes);
            body.extend_from_slice(b"\r\n");
        }
        push_text_field(&mut body, "week_start", week_start);
        if let Some(action) = action {
            push_text_field(&mut body, "action", action);
        }
        body.extend_from_slice(format!("--{BOUNDARY}--\r\n").as_bytes());
        body
    }

    fn upload_request(body: Vec<u8>) -> Request<Body> {
        Request::builder()
            .method("POST")
            .uri("/api/v1/upload")
            .header(
                "content-type",
                format!("multipart/form-data; boundary={BOUNDARY}"),
            )
            .body(Body::from(body))
            .unwrap()
    }

    async fn response_json<T: serde::de::DeserializeOwned>(response: Response) -> T {
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    #[tokio::test]
    async fn test_health_endpoint() {
        let app: Router = build_router(create_test_app_state());

        let response = app
            .oneshot(
                Request::builder()
                    .uri("/api/v1/health")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), HttpStatusCode::OK);
        let health: HealthResponse = response_json(response).await;
        assert_eq!(health.status, "ok");
    }

    #[tokio::test]
    async fn test_upload_and_weekly_summary() {
        let app: Router = build_router(create_test_app_state());

        let body = multipart_body(Some(&create_test_workbook()), "2025-09-08", None);
        let response = app.clone().oneshot(upload_request(body)).await.unwrap();
        assert_eq!(response.status(), HttpStatusCode::OK);

        let upload: UploadResponse = response_json(response).await;
        assert!(upload.success);
        assert_eq!(upload.action_taken, "replace");
        assert_eq!(upload.records_created.routes, 11);
        assert_eq!(upload.records_created.drivers, 2);

        let response = app
            .oneshot(
                Request::builder()
                    .uri("/api/v1/weekly/summary?week_start=2025-09-08")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), HttpStatusCode::OK);

        let summary: WeeklySummaryResponse = response_json(response).await;
        assert_eq!(summary.route_count, 11);
        assert_eq!(summary.driver_count, 2);
    }

    #[tokio::test]
    async fn test_append_after_replace_reports_duplicates() {
        let app: Router = build_router(create_test_app_state());
        let workbook = create_test_workbook();

        let body = multipart_body(Some(&workbook), "2025-09-08", Some("replace"));
        app.clone().oneshot(upload_request(body)).await.unwrap();

        let body = multipart_body(Some(&workbook), "2025-09-08", Some("append"));
        let response = app.oneshot(upload_request(body)).await.unwrap();
        assert_eq!(response.status(), HttpStatusCode::OK);

        let upload: UploadResponse = response_json(response).await;
        assert_eq!(upload.action_taken, "append");
        assert_eq!(upload.records_created.routes, 0);
        assert_eq!(upload.duplicate_routes.len(), 11);
    }

    #[tokio::test]
    async fn test_upload_rejects_non_monday_with_suggestions() {
        let app: Router = build_router(create_test_app_state());

        let body = multipart_body(Some(&create_test_workbook()), "2025-09-09", None);
        let response = app.oneshot(upload_request(body)).await.unwrap();
        assert_eq!(response.status(), HttpStatusCode::UNPROCESSABLE_ENTITY);

        let error: ErrorBody = response_json(response).await;
        assert_eq!(error.error, "NotMondayError");
        let details = error.details.unwrap();
        assert_eq!(details["previous_monday"], "2025-09-08");
        assert_eq!(details["next_monday"], "2025-09-15");
    }

    #[tokio::test]
    async fn test_upload_requires_file_field() {
        let app: Router = build_router(create_test_app_state());

        let body = multipart_body(None, "2025-09-08", None);
        let response = app.oneshot(upload_request(body)).await.unwrap();
        assert_eq!(response.status(), HttpStatusCode::UNPROCESSABLE_ENTITY);

        let error: ErrorBody = response_json(response).await;
        assert_eq!(error.error, "ValidationError");
    }

    #[tokio::test]
    async fn test_upload_rejects_unknown_action() {
        let app: Router = build_router(create_test_app_state());

        let body = multipart_body(Some(&create_test_workbook()), "2025-09-08", Some("merge"));
        let response = app.oneshot(upload_request(body)).await.unwrap();
        assert_eq!(response.status(), HttpStatusCode::UNPROCESSABLE_ENTITY);
    }

    #[tokio::test]
    async fn test_uploads_listing_after_upload() {
        let app: Router = build_router(create_test_app_state());

        let body = multipart_body(Some(&create_test_workbook()), "2025-09-08", None);
        app.clone().oneshot(upload_request(body)).await.unwrap();

        let response = app
            .oneshot(
                Request::builder()
                    .uri("/api/v1/uploads?limit=5")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), HttpStatusCode::OK);

        let uploads: UploadsResponse = response_json(response).await;
        assert_eq!(uploads.uploads.len(), 1);
        assert_eq!(uploads.uploads[0].status, "success");
        assert_eq!(uploads.uploads[0].filename, "dienstplan.xlsx");
    }
}
