use serde::Serialize;
use tracing::{info, warn};

use crate::field::{Field, FieldDraft, ValidationError};
use crate::registry::FieldRegistry;
use crate::weather::{WeatherError, WeatherSnapshot};

/// State for one running session: the field registry and the last weather
/// lookup. Owned by whoever drives the session and passed down explicitly.
#[derive(Debug, Default)]
pub struct Session {
    registry: FieldRegistry,
    weather: WeatherState,
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct WeatherState {
    pub location: Option<String>,
    pub snapshot: Option<WeatherSnapshot>,
    pub error: Option<String>,
}

impl Session {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds a session preloaded with `drafts`; invalid drafts are skipped.
    pub fn with_drafts<'a>(drafts: impl IntoIterator<Item = &'a FieldDraft>) -> Self {
        let mut session = Self::new();
        for draft in drafts {
            if let Err(err) = session.register(draft) {
                warn!(name = %draft.name, "skipping configured field: {err}");
            }
        }
        session
    }

    pub fn registry(&self) -> &FieldRegistry {
        &self.registry
    }

    pub fn register(&mut self, draft: &FieldDraft) -> Result<&Field, ValidationError> {
        let field = self.registry.append(draft)?;
        info!(id = %field.id(), name = field.name(), crop = %field.crop(), "field registered");
        Ok(field)
    }

    pub fn weather(&self) -> &WeatherState {
        &self.weather
    }

    /// Records the outcome of a weather lookup. A failure keeps the previous
    /// snapshot and only replaces the error message.
    pub fn record_weather(&mut self, location: &str, outcome: &Result<WeatherSnapshot, WeatherError>) {
        match outcome {
            Ok(snapshot) => {
                self.weather.location = Some(location.to_string());
                self.weather.snapshot = Some(snapshot.clone());
                self.weather.error = None;
            }
            Err(err) => {
                warn!(location, "weather lookup failed: {err}");
                self.weather.error = Some(err.to_string());
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};

    fn snapshot() -> WeatherSnapshot {
        WeatherSnapshot {
            temperature: 283.15,
            feels_like: 281.0,
            temperature_min: 280.0,
            temperature_max: 285.0,
            description: "light rain".into(),
            icon: "http://openweathermap.org/img/wn/10d.png".into(),
            observed_at: Utc.timestamp_opt(1_700_000_000, 0).unwrap(),
        }
    }

    #[test]
    fn failed_lookup_keeps_previous_snapshot() {
        let mut session = Session::new();
        session.record_weather("Kyiv", &Ok(snapshot()));
        session.record_weather("Nowhere", &Err(WeatherError::CityNotFound("Nowhere".into())));

        let weather = session.weather();
        assert_eq!(weather.location.as_deref(), Some("Kyiv"));
        assert_eq!(weather.snapshot.as_ref().map(|s| s.description.as_str()), Some("light rain"));
        assert_eq!(weather.error.as_deref(), Some("no city matches 'Nowhere'"));

        session.record_weather("Lviv", &Ok(snapshot()));
        assert!(session.weather().error.is_none());
    }

    #[test]
    fn configured_drafts_skip_invalid_entries() {
        let drafts = vec![
            FieldDraft::new("good", 2.0, "Corn"),
            FieldDraft::new("bad", -1.0, "Corn"),
        ];
        let session = Session::with_drafts(&drafts);
        assert_eq!(session.registry().len(), 1);
    }
}
