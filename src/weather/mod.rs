//! Current-weather lookup for a city, backed by an OpenWeatherMap-style API.

mod openweather;

use std::future::Future;

use chrono::{DateTime, TimeZone, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;

pub use openweather::OpenWeatherClient;

const ICON_URL_BASE: &str = "http://openweathermap.org/img/wn";

#[derive(Debug, Error)]
pub enum WeatherError {
    #[error("weather API key is not configured")]
    MissingApiKey,
    #[error("no city matches '{0}'")]
    CityNotFound(String),
    #[error("weather service responded with status {0}")]
    Status(u16),
    #[error("weather request failed: {0}")]
    Http(#[from] reqwest::Error),
    #[error("unexpected weather payload: {0}")]
    Decode(String),
}

/// Conditions at one observation time. Temperatures are in Kelvin, as the
/// provider reports them.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct WeatherSnapshot {
    pub temperature: f64,
    pub feels_like: f64,
    pub temperature_min: f64,
    pub temperature_max: f64,
    pub description: String,
    pub icon: String,
    pub observed_at: DateTime<Utc>,
}

impl WeatherSnapshot {
    pub fn temperature_c(&self) -> i64 {
        kelvin_to_celsius(self.temperature)
    }

    pub fn feels_like_c(&self) -> i64 {
        kelvin_to_celsius(self.feels_like)
    }

    /// One-line summary, e.g. `light rain, +10°C (feels like +8°C)`.
    pub fn summary(&self) -> String {
        format!(
            "{}, {}°C (feels like {}°C), min {}°C, max {}°C",
            self.description,
            format_temperature(self.temperature_c()),
            format_temperature(self.feels_like_c()),
            format_temperature(kelvin_to_celsius(self.temperature_min)),
            format_temperature(kelvin_to_celsius(self.temperature_max)),
        )
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CityMatch {
    pub name: String,
    #[serde(default)]
    pub country: String,
    pub lat: f64,
    pub lon: f64,
}

impl CityMatch {
    pub fn label(&self) -> String {
        if self.country.is_empty() {
            self.name.clone()
        } else {
            format!("{}, {}", self.name, self.country)
        }
    }
}

pub trait WeatherProvider: Send + Sync {
    fn search_city(
        &self,
        query: &str,
        limit: u8,
    ) -> impl Future<Output = Result<Vec<CityMatch>, WeatherError>> + Send;

    fn current_by_coords(
        &self,
        lat: f64,
        lon: f64,
    ) -> impl Future<Output = Result<WeatherSnapshot, WeatherError>> + Send;

    /// Resolves `city` to its best geocoding match, then fetches by coordinates.
    fn current_by_city(
        &self,
        city: &str,
    ) -> impl Future<Output = Result<WeatherSnapshot, WeatherError>> + Send {
        async move {
            let found = self.search_city(city, 1).await?;
            let best = found
                .into_iter()
                .next()
                .ok_or_else(|| WeatherError::CityNotFound(city.to_string()))?;
            self.current_by_coords(best.lat, best.lon).await
        }
    }
}

pub fn kelvin_to_celsius(kelvin: f64) -> i64 {
    (kelvin - 273.15).round() as i64
}

/// Positive temperatures carry an explicit `+`.
pub fn format_temperature(celsius: i64) -> String {
    if celsius > 0 {
        format!("+{celsius}")
    } else {
        celsius.to_string()
    }
}

#[derive(Debug, Deserialize)]
struct CurrentWeatherBody {
    main: MainReadings,
    weather: Vec<Condition>,
    dt: i64,
}

#[derive(Debug, Deserialize)]
struct MainReadings {
    temp: f64,
    feels_like: f64,
    temp_min: f64,
    temp_max: f64,
}

#[derive(Debug, Deserialize)]
struct Condition {
    description: String,
    icon: String,
}

pub fn parse_current(body: &str) -> Result<WeatherSnapshot, WeatherError> {
    let parsed: CurrentWeatherBody =
        serde_json::from_str(body).map_err(|err| WeatherError::Decode(err.to_string()))?;
    let condition = parsed
        .weather
        .into_iter()
        .next()
        .ok_or_else(|| WeatherError::Decode("missing weather conditions".into()))?;
    let observed_at = Utc
        .timestamp_opt(parsed.dt, 0)
        .single()
        .ok_or_else(|| WeatherError::Decode(format!("invalid timestamp {}", parsed.dt)))?;
    Ok(WeatherSnapshot {
        temperature: parsed.main.temp,
        feels_like: parsed.main.feels_like,
        temperature_min: parsed.main.temp_min,
        temperature_max: parsed.main.temp_max,
        description: condition.description,
        icon: format!("{ICON_URL_BASE}/{}.png", condition.icon),
        observed_at,
    })
}

pub fn parse_cities(body: &str) -> Result<Vec<CityMatch>, WeatherError> {
    serde_json::from_str(body).map_err(|err| WeatherError::Decode(err.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    const CURRENT: &str = r#"{
        "coord": {"lon": 30.52, "lat": 50.45},
        "weather": [{"id": 500, "main": "Rain", "description": "light rain", "icon": "10d"}],
        "main": {"temp": 283.4, "feels_like": 281.2, "temp_min": 282.0, "temp_max": 284.9, "pressure": 1012},
        "dt": 1700000000,
        "name": "Kyiv"
    }"#;

    #[test]
    fn parses_current_conditions() {
        let snapshot = parse_current(CURRENT).unwrap();
        assert_eq!(snapshot.description, "light rain");
        assert_eq!(snapshot.icon, "http://openweathermap.org/img/wn/10d.png");
        assert_eq!(snapshot.temperature_c(), 10);
        assert_eq!(snapshot.feels_like_c(), 8);
        assert_eq!(snapshot.observed_at.timestamp(), 1_700_000_000);
    }

    #[test]
    fn empty_conditions_are_a_decode_error() {
        let body = r#"{"weather": [], "main": {"temp": 1, "feels_like": 1, "temp_min": 1, "temp_max": 1}, "dt": 0}"#;
        assert!(matches!(parse_current(body), Err(WeatherError::Decode(_))));
        assert!(matches!(parse_current("not json"), Err(WeatherError::Decode(_))));
    }

    #[test]
    fn parses_geocoding_matches() {
        let body = r#"[{"name": "Ternopil", "local_names": {}, "lat": 49.55, "lon": 25.59, "country": "UA"}]"#;
        let cities = parse_cities(body).unwrap();
        assert_eq!(cities.len(), 1);
        assert_eq!(cities[0].label(), "Ternopil, UA");
    }

    #[test]
    fn temperatures_format_with_sign() {
        assert_eq!(format_temperature(5), "+5");
        assert_eq!(format_temperature(0), "0");
        assert_eq!(format_temperature(-3), "-3");
        assert_eq!(kelvin_to_celsius(273.15), 0);
    }
}
