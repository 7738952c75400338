use std::time::Duration;

use anyhow::{bail, Context, Result};
use serde::Deserialize;
use serde_json::Value as JsonValue;

use super::model::{parse_year, Country, Series, YearValue};
use crate::config::ApiConfig;

// ---------------------------------------------------------------------------
// Data source abstraction
// ---------------------------------------------------------------------------

/// Where the viewer gets its three datasets from.
///
/// Implementations are called from background fetch threads.
pub trait DataSource: Send + Sync {
    fn countries(&self) -> Result<Vec<Country>>;
    fn gdp(&self, code: &str) -> Result<Series>;
    fn climate(&self, code: &str) -> Result<Series>;
}

// ---------------------------------------------------------------------------
// World Bank over HTTP
// ---------------------------------------------------------------------------

pub struct WorldBankApi {
    config: ApiConfig,
}

impl WorldBankApi {
    pub fn new(config: ApiConfig) -> Self {
        Self { config }
    }

    fn get(&self, url: &str) -> Result<String> {
        log::debug!("GET {url}");
        let response = ureq::get(url)
            .timeout(Duration::from_secs(self.config.timeout_secs))
            .call()
            .with_context(|| format!("requesting {url}"))?;
        response
            .into_string()
            .with_context(|| format!("reading response from {url}"))
    }
}

impl DataSource for WorldBankApi {
    fn countries(&self) -> Result<Vec<Country>> {
        let body = self.get(&self.config.countries_url)?;
        parse_countries(&body)
    }

    fn gdp(&self, code: &str) -> Result<Series> {
        let body = self.get(&self.config.gdp_url_for(code))?;
        parse_gdp(&body).with_context(|| format!("GDP series for {code}"))
    }

    fn climate(&self, code: &str) -> Result<Series> {
        let body = self.get(&self.config.climate_url_for(code))?;
        parse_climate(&body).with_context(|| format!("climate series for {code}"))
    }
}

// ---------------------------------------------------------------------------
// Response parsing
// ---------------------------------------------------------------------------

#[derive(Debug, Deserialize)]
struct CountryRecord {
    id: String,
    name: String,
}

/// `{ "date": "1990", "value": 5.9e12 | null, ... }`
#[derive(Debug, Deserialize)]
struct GdpRecord {
    #[serde(default)]
    date: JsonValue,
    value: Option<f64>,
}

/// `{ "year": 1901, "data": 8.3, ... }`
#[derive(Debug, Deserialize)]
struct ClimateRecord {
    #[serde(default)]
    year: JsonValue,
    data: Option<f64>,
}

/// Year fields arrive as strings in one feed and numbers in the other.
fn json_year(val: &JsonValue) -> Option<i32> {
    match val {
        JsonValue::String(s) => parse_year(s),
        JsonValue::Number(n) => n
            .as_i64()
            .or_else(|| n.as_f64().map(|f| f.trunc() as i64))
            .and_then(|y| i32::try_from(y).ok()),
        _ => None,
    }
}

/// World Bank v2 responses are `[page_info, records]`. A `null` record page
/// means "no data" and yields an empty list.
fn world_bank_page<T: serde::de::DeserializeOwned>(body: &str) -> Result<Vec<T>> {
    let root: JsonValue = serde_json::from_str(body).context("parsing JSON")?;
    let envelope = root.as_array().context("Expected top-level JSON array")?;
    let page = match envelope.get(1) {
        Some(page) => page,
        None => {
            let message = envelope
                .first()
                .and_then(|meta| meta.get("message"))
                .map(|m| m.to_string())
                .unwrap_or_else(|| "missing record page".to_string());
            bail!("World Bank API error: {message}");
        }
    };
    if page.is_null() {
        return Ok(Vec::new());
    }
    serde_json::from_value(page.clone()).context("decoding record page")
}

pub fn parse_countries(body: &str) -> Result<Vec<Country>> {
    let records: Vec<CountryRecord> = world_bank_page(body)?;
    Ok(records
        .into_iter()
        .map(|r| Country {
            id: r.id,
            name: r.name,
        })
        .collect())
}

pub fn parse_gdp(body: &str) -> Result<Series> {
    let records: Vec<GdpRecord> = world_bank_page(body)?;
    Ok(records
        .iter()
        .map(|r| YearValue {
            year: json_year(&r.date),
            value: r.value,
        })
        .collect())
}

pub fn parse_climate(body: &str) -> Result<Series> {
    let root: JsonValue = serde_json::from_str(body).context("parsing JSON")?;
    if !root.is_array() {
        bail!("Expected top-level JSON array, got {root}");
    }
    let records: Vec<ClimateRecord> =
        serde_json::from_value(root).context("decoding climate records")?;
    Ok(records
        .iter()
        .map(|r| YearValue {
            year: json_year(&r.year),
            value: r.data,
        })
        .collect())
}
