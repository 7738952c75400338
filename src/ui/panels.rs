use eframe::egui::{self, Color32, RichText, Slider, Ui};

use crate::fetch::FetchState;
use crate::state::AppState;

// ---------------------------------------------------------------------------
// Top bar – title, country selector, source status
// ---------------------------------------------------------------------------

/// Render the header with the country selector.
pub fn top_bar(ui: &mut Ui, state: &mut AppState) {
    ui.heading("Climate and GDP Trends");
    ui.label("Average temperature and GDP trends over time.");

    let mut chosen: Option<String> = None;
    let mut retry_countries = false;

    ui.horizontal(|ui: &mut Ui| {
        ui.strong("Country");
        match state.countries.state() {
            FetchState::Ready(countries) if !countries.is_empty() => {
                let current = state.selected_country.clone().unwrap_or_default();
                egui::ComboBox::from_id_salt("country")
                    .selected_text(state.selected_country_name())
                    .height(400.0)
                    .show_ui(ui, |ui: &mut Ui| {
                        for country in countries {
                            if ui
                                .selectable_label(current == country.id, country.name.as_str())
                                .clicked()
                            {
                                chosen = Some(country.id.clone());
                            }
                        }
                    });
            }
            FetchState::Failed(msg) => {
                ui.label(RichText::new(format!("Country list failed: {msg}")).color(Color32::RED));
                retry_countries = ui.small_button("Retry").clicked();
            }
            _ => {
                ui.add_enabled(false, egui::Label::new("Loading…"));
            }
        }

        ui.separator();
        source_status(ui, "GDP", state.gdp.state().is_loading(), failed(state.gdp.state()));
        source_status(
            ui,
            "Temperature",
            state.climate.state().is_loading(),
            failed(state.climate.state()),
        );
    });

    if let Some(code) = chosen {
        state.select_country(&code);
    }
    if retry_countries {
        state.reload_countries();
    }
}

fn failed<T>(state: &FetchState<T>) -> bool {
    matches!(state, FetchState::Failed(_))
}

fn source_status(ui: &mut Ui, name: &str, loading: bool, failed: bool) {
    if loading {
        ui.spinner();
        ui.label(format!("{name}…"));
    } else if failed {
        ui.label(RichText::new(format!("{name} failed")).color(Color32::RED));
    }
}

// ---------------------------------------------------------------------------
// Year range selector
// ---------------------------------------------------------------------------

/// Two sliders bounding the displayed years, limited to the GDP series' years.
pub fn range_selector(ui: &mut Ui, state: &mut AppState) {
    let Some(extent) = state.gdp_extent else {
        return;
    };
    let current = state.year_range;
    let mut start = current.start;
    let mut end = current.end;

    ui.horizontal(|ui: &mut Ui| {
        ui.add(Slider::new(&mut start, extent.start..=extent.end).text("From"));
        ui.add(Slider::new(&mut end, extent.start..=extent.end).text("To"));
    });

    if (start, end) == (current.start, current.end) {
        return;
    }
    // Dragging one handle past the other pushes the other along.
    if start > end {
        if start != current.start {
            end = start;
        } else {
            start = end;
        }
    }
    state.set_year_range(start, end);
}
