use eframe::egui::Color32;

use crate::data::model::YearRange;

// ---------------------------------------------------------------------------
// API endpoints
// ---------------------------------------------------------------------------

/// URL templates of the three data sources. `{code}` is replaced by the ISO3
/// country code.
#[derive(Debug, Clone)]
pub struct ApiConfig {
    pub countries_url: String,
    pub gdp_url: String,
    pub climate_url: String,
    pub timeout_secs: u64,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            countries_url: "https://api.worldbank.org/v2/country?format=json&per_page=500".into(),
            gdp_url: "https://api.worldbank.org/v2/country/{code}/indicator/NY.GDP.MKTP.CD?format=json"
                .into(),
            climate_url:
                "http://climatedataapi.worldbank.org/climateweb/rest/v1/country/cru/tas/year/{code}.json"
                    .into(),
            timeout_secs: 10,
        }
    }
}

impl ApiConfig {
    pub fn gdp_url_for(&self, code: &str) -> String {
        self.gdp_url.replace("{code}", code)
    }

    pub fn climate_url_for(&self, code: &str) -> String {
        self.climate_url.replace("{code}", code)
    }
}

// ---------------------------------------------------------------------------
// Chart geometry and colours
// ---------------------------------------------------------------------------

#[derive(Debug, Clone)]
pub struct ChartConfig {
    pub width: f32,
    pub height: f32,
    /// Top of the GDP y range; the tallest bar stops here.
    pub bar_top: f32,
    pub axis_height: f32,
    pub axis_margin: f32,
    /// Vertical shift applied to the temperature line.
    pub line_offset: f32,
    pub line_color: Color32,
    pub bar_color: Color32,
    pub axis_color: Color32,
    /// Gap subtracted from each bar's slot width.
    pub bar_gap: f32,
    /// How long the tooltip stays after the pointer leaves a bar.
    pub tooltip_linger_secs: f64,
    pub tick_count: usize,
}

impl Default for ChartConfig {
    fn default() -> Self {
        Self {
            width: 600.0,
            height: 300.0,
            bar_top: 40.0,
            axis_height: 30.0,
            axis_margin: 10.0,
            line_offset: 100.0,
            line_color: Color32::from_rgb(0x00, 0xaa, 0xff),
            bar_color: Color32::from_rgb(0xbb, 0xe5, 0xfa),
            axis_color: Color32::BLACK,
            bar_gap: 2.0,
            tooltip_linger_secs: 0.3,
            tick_count: 10,
        }
    }
}

// ---------------------------------------------------------------------------
// Application
// ---------------------------------------------------------------------------

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub api: ApiConfig,
    pub chart: ChartConfig,
    pub default_country: String,
    pub default_range: YearRange,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            api: ApiConfig::default(),
            chart: ChartConfig::default(),
            default_country: "USA".into(),
            default_range: YearRange::default(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn urls_substitute_country_code() {
        let api = ApiConfig::default();
        assert_eq!(
            api.gdp_url_for("FRA"),
            "https://api.worldbank.org/v2/country/FRA/indicator/NY.GDP.MKTP.CD?format=json"
        );
        assert!(api.climate_url_for("FRA").ends_with("/year/FRA.json"));
    }
}
