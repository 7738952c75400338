use std::sync::Arc;

use crate::chart::ActiveTooltip;
use crate::config::AppConfig;
use crate::data::align::year_extent;
use crate::data::api::DataSource;
use crate::data::model::{Country, Series, YearRange};
use crate::fetch::{FetchSlot, FetchState};

// ---------------------------------------------------------------------------
// Application state
// ---------------------------------------------------------------------------

/// The full UI state, independent of rendering.
pub struct AppState {
    pub config: AppConfig,

    source: Arc<dyn DataSource>,

    /// Country list for the selector.
    pub countries: FetchSlot<Vec<Country>>,

    /// ISO3 code of the selected country.
    pub selected_country: Option<String>,

    /// Years shown in the chart.
    pub year_range: YearRange,

    /// Years covered by the loaded GDP series (bounds the range selector).
    pub gdp_extent: Option<YearRange>,

    pub gdp: FetchSlot<Series>,
    pub climate: FetchSlot<Series>,

    /// Tooltip currently shown over the chart.
    pub tooltip: Option<ActiveTooltip>,
}

impl AppState {
    pub fn new(config: AppConfig, source: Arc<dyn DataSource>) -> Self {
        Self {
            year_range: config.default_range,
            config,
            source,
            countries: FetchSlot::new("countries"),
            selected_country: None,
            gdp_extent: None,
            gdp: FetchSlot::new("gdp"),
            climate: FetchSlot::new("climate"),
            tooltip: None,
        }
    }

    /// Kick off the initial loads: country list and the default country.
    pub fn start(&mut self) {
        self.reload_countries();
        let default_country = self.config.default_country.clone();
        self.select_country(&default_country);
    }

    /// Switch country: both series are replaced wholesale by fresh fetches.
    pub fn select_country(&mut self, code: &str) {
        if self.selected_country.as_deref() == Some(code) {
            return;
        }
        log::info!("Selected country {code}");
        self.selected_country = Some(code.to_string());
        self.gdp_extent = None;
        self.tooltip = None;

        let source = Arc::clone(&self.source);
        let gdp_code = code.to_string();
        self.gdp.start(move || source.gdp(&gdp_code));

        let source = Arc::clone(&self.source);
        let climate_code = code.to_string();
        self.climate.start(move || source.climate(&climate_code));
    }

    pub fn reload_countries(&mut self) {
        let source = Arc::clone(&self.source);
        log::info!("Fetching country list");
        self.countries.start(move || source.countries());
    }

    /// Retry both series for the current country after a failure.
    pub fn reload_series(&mut self) {
        if let Some(code) = self.selected_country.take() {
            self.select_country(&code);
        }
    }

    /// Apply finished fetches. Returns `true` when anything changed.
    pub fn poll(&mut self) -> bool {
        let countries_changed = self.countries.poll();
        let gdp_changed = self.gdp.poll();
        let climate_changed = self.climate.poll();

        if gdp_changed {
            if let FetchState::Ready(series) = self.gdp.state() {
                if series.is_empty() {
                    log::warn!("GDP series is empty");
                } else {
                    log::info!("GDP series: {} observations", series.len());
                }
                self.gdp_extent = year_extent(series);
                if let Some(extent) = self.gdp_extent {
                    self.year_range = self.year_range.clamp_to(extent);
                    log::debug!("GDP covers {extent}, showing {}", self.year_range);
                }
            }
        }
        if climate_changed {
            if let FetchState::Ready(series) = self.climate.state() {
                log::info!("Climate series: {} observations", series.len());
            }
        }
        countries_changed || gdp_changed || climate_changed
    }

    /// Set the displayed years from the range selector, clamped to the GDP
    /// series' years.
    pub fn set_year_range(&mut self, start: i32, end: i32) {
        let mut range = YearRange::new(start, end);
        if let Some(extent) = self.gdp_extent {
            range = range.clamp_to(extent);
        }
        if range != self.year_range {
            log::debug!("Year range {range}");
            self.year_range = range;
        }
    }

    pub fn any_loading(&self) -> bool {
        self.countries.state().is_loading()
            || self.gdp.state().is_loading()
            || self.climate.state().is_loading()
    }

    /// Display name of the selected country, falling back to its code.
    pub fn selected_country_name(&self) -> String {
        let Some(code) = &self.selected_country else {
            return String::new();
        };
        self.countries
            .state()
            .ready()
            .and_then(|list| list.iter().find(|c| &c.id == code))
            .map(|c| c.name.clone())
            .unwrap_or_else(|| code.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::model::YearValue;
    use anyhow::{bail, Result};
    use std::sync::mpsc::{self, Receiver};
    use std::sync::Mutex;
    use std::time::{Duration, Instant};

    /// In-memory source. GDP for `"SLOW"` blocks until `release` is signalled.
    struct MockSource {
        release: Mutex<Option<Receiver<()>>>,
    }

    impl MockSource {
        fn new() -> (Self, mpsc::Sender<()>) {
            let (tx, rx) = mpsc::channel();
            let source = Self {
                release: Mutex::new(Some(rx)),
            };
            (source, tx)
        }
    }

    fn gdp_for(code: &str) -> Series {
        let base = match code {
            "USA" => 1e12,
            "FRA" => 5e11,
            _ => 1.0,
        };
        (1990..=2000)
            .map(|y| YearValue::new(y, Some(base * f64::from(y - 1989))))
            .collect()
    }

    impl DataSource for MockSource {
        fn countries(&self) -> Result<Vec<Country>> {
            Ok(vec![
                Country {
                    id: "USA".into(),
                    name: "United States".into(),
                },
                Country {
                    id: "FRA".into(),
                    name: "France".into(),
                },
            ])
        }

        fn gdp(&self, code: &str) -> Result<Series> {
            if code == "EMPTY" {
                return Ok(Series::default());
            }
            if code == "SLOW" {
                let rx = self.release.lock().unwrap().take();
                if let Some(rx) = rx {
                    rx.recv().ok();
                }
            }
            Ok(gdp_for(code))
        }

        fn climate(&self, code: &str) -> Result<Series> {
            if code == "BROKEN" {
                bail!("climate feed unavailable");
            }
            Ok((1901..=2012).map(|y| YearValue::new(y, Some(10.0))).collect())
        }
    }

    fn poll_until(state: &mut AppState, mut done: impl FnMut(&AppState) -> bool) {
        let deadline = Instant::now() + Duration::from_secs(5);
        while !done(state) {
            assert!(Instant::now() < deadline, "timed out waiting for fetches");
            state.poll();
            std::thread::sleep(Duration::from_millis(5));
        }
    }

    fn new_state() -> (AppState, mpsc::Sender<()>) {
        let (source, release) = MockSource::new();
        (AppState::new(AppConfig::default(), Arc::new(source)), release)
    }

    #[test]
    fn start_loads_countries_and_default_country() {
        let (mut state, _release) = new_state();
        state.start();
        assert!(state.any_loading());
        poll_until(&mut state, |s| !s.any_loading());

        assert_eq!(state.countries.state().ready().map(Vec::len), Some(2));
        assert_eq!(state.selected_country.as_deref(), Some("USA"));
        assert_eq!(state.selected_country_name(), "United States");
        assert_eq!(state.gdp.state().ready(), Some(&gdp_for("USA")));
        assert!(state.climate.state().ready().is_some());
    }

    #[test]
    fn gdp_load_clamps_year_range_to_available_years() {
        let (mut state, _release) = new_state();
        state.select_country("FRA");
        poll_until(&mut state, |s| s.gdp.state().ready().is_some());

        assert_eq!(state.gdp_extent, Some(YearRange::new(1990, 2000)));
        assert_eq!(state.year_range, YearRange::new(1990, 2000));

        state.set_year_range(1995, 1980);
        assert_eq!(state.year_range, YearRange::new(1990, 1995));
    }

    #[test]
    fn late_gdp_for_previous_country_is_not_shown() {
        let (mut state, release) = new_state();
        state.select_country("SLOW");
        state.select_country("FRA");
        poll_until(&mut state, |s| s.gdp.state().ready().is_some());
        assert_eq!(state.gdp.state().ready(), Some(&gdp_for("FRA")));

        release.send(()).unwrap();
        let until = Instant::now() + Duration::from_millis(100);
        while Instant::now() < until {
            state.poll();
            std::thread::sleep(Duration::from_millis(5));
        }
        assert_eq!(state.gdp.state().ready(), Some(&gdp_for("FRA")));
        assert_eq!(state.selected_country.as_deref(), Some("FRA"));
    }

    #[test]
    fn failing_source_surfaces_failed_state() {
        let (mut state, _release) = new_state();
        state.select_country("BROKEN");
        poll_until(&mut state, |s| !s.climate.state().is_loading());
        match state.climate.state() {
            FetchState::Failed(msg) => assert!(msg.contains("climate feed unavailable")),
            other => panic!("expected failure, got {other:?}"),
        }
    }

    #[test]
    fn empty_gdp_keeps_current_range() {
        let (mut state, _release) = new_state();
        state.select_country("EMPTY");
        poll_until(&mut state, |s| s.gdp.state().ready().is_some());

        assert!(state.gdp.state().ready().is_some_and(Series::is_empty));
        assert_eq!(state.gdp_extent, None);
        assert_eq!(state.year_range, YearRange::default());
    }

    #[test]
    fn reselecting_same_country_does_not_refetch() {
        let (mut state, _release) = new_state();
        state.select_country("FRA");
        let generation = state.gdp.generation();
        state.select_country("FRA");
        assert_eq!(state.gdp.generation(), generation);

        state.reload_series();
        assert_eq!(state.gdp.generation(), generation + 1);
    }
}
