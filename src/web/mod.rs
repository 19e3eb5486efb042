mod assets;

use std::{
    net::SocketAddr,
    sync::{Arc, Mutex},
};

use anyhow::{Context, Result};
use axum::{
    extract::{Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::get,
    Json, Router,
};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use tokio::net::TcpListener;
use tracing::info;

use crate::{
    catalog::Crop,
    field::FieldDraft,
    projection::YieldTotals,
    session::{Session, WeatherState},
    view::{parse_selector, SortKey},
    weather::{CityMatch, WeatherProvider, WeatherSnapshot},
};

const CITY_SEARCH_LIMIT: u8 = 5;

pub struct AppState<P> {
    session: Mutex<Session>,
    weather: P,
    default_city: String,
}

impl<P: WeatherProvider> AppState<P> {
    pub fn new(session: Session, weather: P, default_city: impl Into<String>) -> Self {
        Self {
            session: Mutex::new(session),
            weather,
            default_city: default_city.into(),
        }
    }
}

pub struct WebServerConfig<P> {
    pub session: Session,
    pub weather: P,
    pub default_city: String,
    pub host: String,
    pub port: u16,
}

pub fn router<P: WeatherProvider + 'static>(state: Arc<AppState<P>>) -> Router {
    Router::new()
        .route("/", get(|| async { assets::INDEX_HTML }))
        .route("/styles.css", get(|| async { assets::STYLES_CSS }))
        .route("/app.js", get(|| async { assets::APP_JS }))
        .route("/api/fields", get(list_fields::<P>).post(create_field::<P>))
        .route("/api/yield", get(yield_totals::<P>))
        .route("/api/weather", get(current_weather::<P>))
        .route("/api/weather/last", get(last_weather::<P>))
        .route("/api/cities", get(search_cities::<P>))
        .with_state(state)
}

pub async fn run<P: WeatherProvider + 'static>(config: WebServerConfig<P>) -> Result<()> {
    let WebServerConfig {
        session,
        weather,
        default_city,
        host,
        port,
    } = config;

    let registered = session.registry().len();
    let state = Arc::new(AppState::new(session, weather, default_city));

    let addr: SocketAddr = format!("{host}:{port}")
        .parse()
        .with_context(|| format!("invalid listen address {host}:{port}"))?;

    info!(%addr, fields = registered, "field planner listening (Ctrl+C to stop)");

    let listener = TcpListener::bind(addr)
        .await
        .with_context(|| format!("failed to bind {addr}"))?;
    axum::serve(listener, router(state))
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    Ok(())
}

async fn shutdown_signal() {
    let _ = tokio::signal::ctrl_c().await;
    info!("shutting down field planner");
}

#[derive(Debug)]
enum ApiError {
    BadRequest(String),
    Upstream(String),
    Internal(String),
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            ApiError::BadRequest(message) => (StatusCode::BAD_REQUEST, message),
            ApiError::Upstream(message) => (StatusCode::BAD_GATEWAY, message),
            ApiError::Internal(message) => (StatusCode::INTERNAL_SERVER_ERROR, message),
        };
        (status, Json(json!({ "error": message }))).into_response()
    }
}

#[derive(Debug, Default, Deserialize)]
struct ViewQuery {
    crop: Option<String>,
    sort: Option<String>,
}

async fn list_fields<P: WeatherProvider>(
    State(state): State<Arc<AppState<P>>>,
    Query(query): Query<ViewQuery>,
) -> Result<Json<Value>, ApiError> {
    let crop = parse_selector::<Crop>(query.crop.as_deref())
        .map_err(|err| ApiError::BadRequest(err.to_string()))?;
    let sort = parse_selector::<SortKey>(query.sort.as_deref())
        .map_err(|err| ApiError::BadRequest(err.to_string()))?;
    let session = state.session.lock().expect("session lock poisoned");
    let view = session.registry().view(crop, sort);
    let body = serde_json::to_value(&view).map_err(|err| ApiError::Internal(err.to_string()))?;
    Ok(Json(body))
}

async fn create_field<P: WeatherProvider>(
    State(state): State<Arc<AppState<P>>>,
    Json(draft): Json<FieldDraft>,
) -> Response {
    let mut session = state.session.lock().expect("session lock poisoned");
    match session.register(&draft) {
        Ok(field) => (StatusCode::CREATED, Json(field.clone())).into_response(),
        Err(err) => (
            StatusCode::UNPROCESSABLE_ENTITY,
            Json(json!({ "errors": err.issues })),
        )
            .into_response(),
    }
}

async fn yield_totals<P: WeatherProvider>(
    State(state): State<Arc<AppState<P>>>,
) -> Json<YieldTotals> {
    let session = state.session.lock().expect("session lock poisoned");
    Json(session.registry().aggregate())
}

#[derive(Debug, Default, Deserialize)]
struct WeatherQuery {
    city: Option<String>,
    lat: Option<f64>,
    lon: Option<f64>,
}

async fn current_weather<P: WeatherProvider>(
    State(state): State<Arc<AppState<P>>>,
    Query(query): Query<WeatherQuery>,
) -> Result<Json<WeatherSnapshot>, ApiError> {
    let (location, outcome) = match (query.lat, query.lon) {
        (Some(lat), Some(lon)) => (
            format!("{lat:.4},{lon:.4}"),
            state.weather.current_by_coords(lat, lon).await,
        ),
        (None, None) => {
            let city = query
                .city
                .filter(|city| !city.trim().is_empty())
                .unwrap_or_else(|| state.default_city.clone());
            let outcome = state.weather.current_by_city(&city).await;
            (city, outcome)
        }
        _ => {
            return Err(ApiError::BadRequest(
                "lat and lon must be given together".into(),
            ))
        }
    };

    state
        .session
        .lock()
        .expect("session lock poisoned")
        .record_weather(&location, &outcome);

    outcome
        .map(Json)
        .map_err(|err| ApiError::Upstream(err.to_string()))
}

async fn last_weather<P: WeatherProvider>(
    State(state): State<Arc<AppState<P>>>,
) -> Json<WeatherState> {
    let session = state.session.lock().expect("session lock poisoned");
    Json(session.weather().clone())
}

#[derive(Debug, Deserialize)]
struct CityQuery {
    q: String,
}

#[derive(Debug, Serialize)]
struct CitySuggestion {
    #[serde(flatten)]
    city: CityMatch,
    label: String,
}

impl From<CityMatch> for CitySuggestion {
    fn from(city: CityMatch) -> Self {
        Self {
            label: city.label(),
            city,
        }
    }
}

async fn search_cities<P: WeatherProvider>(
    State(state): State<Arc<AppState<P>>>,
    Query(query): Query<CityQuery>,
) -> Result<Json<Vec<CitySuggestion>>, ApiError> {
    if query.q.trim().is_empty() {
        return Err(ApiError::BadRequest("city name is required".into()));
    }
    state
        .weather
        .search_city(query.q.trim(), CITY_SEARCH_LIMIT)
        .await
        .map(|found| Json(found.into_iter().map(CitySuggestion::from).collect()))
        .map_err(|err| ApiError::Upstream(err.to_string()))
}
