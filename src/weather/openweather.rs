use reqwest::Client;
use tracing::debug;

use super::{parse_cities, parse_current, CityMatch, WeatherError, WeatherProvider, WeatherSnapshot};
use crate::config::WeatherConfig;

pub struct OpenWeatherClient {
    http: Client,
    base_url: String,
    api_key: Option<String>,
    lang: String,
}

impl OpenWeatherClient {
    pub fn new(config: &WeatherConfig) -> Self {
        Self {
            http: Client::new(),
            base_url: config.base_url.trim_end_matches('/').to_string(),
            api_key: config.api_key.clone().filter(|key| !key.trim().is_empty()),
            lang: config.lang.clone(),
        }
    }

    fn api_key(&self) -> Result<&str, WeatherError> {
        self.api_key.as_deref().ok_or(WeatherError::MissingApiKey)
    }

    async fn get(&self, path: &str, query: &[(&str, String)]) -> Result<String, WeatherError> {
        let url = format!("{}/{path}", self.base_url);
        debug!(%url, "weather request");
        let response = self
            .http
            .get(&url)
            .query(query)
            .query(&[("appid", self.api_key()?)])
            .send()
            .await?;
        let status = response.status();
        if !status.is_success() {
            return Err(WeatherError::Status(status.as_u16()));
        }
        Ok(response.text().await?)
    }
}

impl WeatherProvider for OpenWeatherClient {
    async fn search_city(&self, query: &str, limit: u8) -> Result<Vec<CityMatch>, WeatherError> {
        let body = self
            .get(
                "geo/1.0/direct",
                &[
                    ("q", query.to_string()),
                    ("limit", limit.to_string()),
                    ("lang", self.lang.clone()),
                ],
            )
            .await?;
        parse_cities(&body)
    }

    async fn current_by_coords(&self, lat: f64, lon: f64) -> Result<WeatherSnapshot, WeatherError> {
        let body = self
            .get(
                "data/2.5/weather",
                &[
                    ("lat", lat.to_string()),
                    ("lon", lon.to_string()),
                    ("lang", self.lang.clone()),
                ],
            )
            .await?;
        parse_current(&body)
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;
    use std::sync::{Arc, Mutex};

    use axum::{
        extract::{Query, State},
        http::StatusCode,
        routing::get,
        Json, Router,
    };
    use serde_json::{json, Value};
    use tokio::net::TcpListener;

    use super::*;

    type Seen = Arc<Mutex<Vec<(&'static str, HashMap<String, String>)>>>;

    async fn spawn_upstream(app: Router) -> String {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            let _ = axum::serve(listener, app).await;
        });
        format!("http://{addr}")
    }

    fn client_for(base_url: String) -> OpenWeatherClient {
        OpenWeatherClient::new(&WeatherConfig {
            base_url,
            lang: "en".into(),
            api_key: Some("test-key".into()),
            ..WeatherConfig::default()
        })
    }

    async fn geocode(
        State(seen): State<Seen>,
        Query(query): Query<HashMap<String, String>>,
    ) -> Json<Value> {
        seen.lock().unwrap().push(("geo", query));
        Json(json!([
            {"name": "Kyiv", "local_names": {}, "lat": 50.45, "lon": 30.52, "country": "UA"},
            {"name": "Kyiv", "lat": 1.0, "lon": 1.0, "country": "US"}
        ]))
    }

    async fn current(
        State(seen): State<Seen>,
        Query(query): Query<HashMap<String, String>>,
    ) -> Json<Value> {
        seen.lock().unwrap().push(("weather", query));
        Json(json!({
            "weather": [{"id": 800, "main": "Clear", "description": "clear sky", "icon": "01d"}],
            "main": {"temp": 290.15, "feels_like": 289.0, "temp_min": 288.0, "temp_max": 292.0},
            "dt": 1700000000,
            "name": "Kyiv"
        }))
    }

    #[tokio::test]
    async fn missing_key_fails_before_any_request() {
        let config = WeatherConfig {
            api_key: Some("   ".into()),
            ..WeatherConfig::default()
        };
        let client = OpenWeatherClient::new(&config);
        let err = client.current_by_city("Kyiv").await.unwrap_err();
        assert!(matches!(err, WeatherError::MissingApiKey));
    }

    #[tokio::test]
    async fn error_replies_become_status_errors() {
        let app = Router::new()
            .route("/geo/1.0/direct", get(|| async { StatusCode::UNAUTHORIZED }))
            .route(
                "/data/2.5/weather",
                get(|| async { StatusCode::INTERNAL_SERVER_ERROR }),
            );
        let client = client_for(spawn_upstream(app).await);

        let err = client.search_city("Kyiv", 5).await.unwrap_err();
        assert!(matches!(err, WeatherError::Status(401)));
        let err = client.current_by_coords(50.45, 30.52).await.unwrap_err();
        assert!(matches!(err, WeatherError::Status(500)));
    }

    #[tokio::test]
    async fn city_lookup_geocodes_then_fetches_by_coordinates() {
        let seen = Seen::default();
        let app = Router::new()
            .route("/geo/1.0/direct", get(geocode))
            .route("/data/2.5/weather", get(current))
            .with_state(seen.clone());
        let client = client_for(format!("{}/", spawn_upstream(app).await));

        let snapshot = client.current_by_city("Kyiv").await.unwrap();
        assert_eq!(snapshot.description, "clear sky");
        assert_eq!(snapshot.icon, "http://openweathermap.org/img/wn/01d.png");
        assert_eq!(snapshot.temperature_c(), 17);
        assert_eq!(snapshot.observed_at.timestamp(), 1_700_000_000);

        let seen = seen.lock().unwrap();
        assert_eq!(seen.len(), 2);
        let (route, geo) = &seen[0];
        assert_eq!(*route, "geo");
        assert_eq!(geo["q"], "Kyiv");
        assert_eq!(geo["limit"], "1");
        assert_eq!(geo["appid"], "test-key");
        assert_eq!(geo["lang"], "en");

        let (route, weather) = &seen[1];
        assert_eq!(*route, "weather");
        assert_eq!(weather["lat"], "50.45");
        assert_eq!(weather["lon"], "30.52");
        assert_eq!(weather["appid"], "test-key");
        assert_eq!(weather["lang"], "en");
    }
}
