use std::time::Duration;

use eframe::egui::{
    self, pos2, vec2, Align2, Color32, FontId, Id, LayerId, Order, RichText, Sense, Shape, Stroke,
    Ui,
};

use crate::chart::{next_tooltip, ActiveTooltip, ChartLayout};
use crate::data::model::Series;
use crate::fetch::FetchState;
use crate::state::AppState;

// ---------------------------------------------------------------------------
// Trend chart (central panel)
// ---------------------------------------------------------------------------

/// Render GDP bars and the temperature line for the selected years.
pub fn trend_chart(ui: &mut Ui, state: &mut AppState) {
    let gdp = match state.gdp.state() {
        FetchState::Ready(series) => series,
        FetchState::Idle | FetchState::Loading => {
            ui.horizontal(|ui: &mut Ui| {
                ui.spinner();
                ui.label("Loading…");
            });
            return;
        }
        FetchState::Failed(msg) => {
            ui.label(RichText::new(format!("GDP data failed to load: {msg}")).color(Color32::RED));
            if ui.button("Retry").clicked() {
                state.reload_series();
            }
            return;
        }
    };

    let empty = Series::default();
    let climate = state.climate.state().ready().unwrap_or(&empty);
    let cfg = &state.config.chart;

    let layout = match ChartLayout::build(gdp, climate, state.year_range, cfg) {
        Ok(layout) => layout,
        Err(e) => {
            ui.label(RichText::new(format!("{e} for {}", state.selected_country_name())).italics());
            return;
        }
    };

    let (response, painter) = ui.allocate_painter(layout.canvas, Sense::hover());
    let origin = response.rect.min.to_vec2();
    painter.rect_filled(response.rect, 0.0, Color32::WHITE);

    for bar in &layout.bars {
        painter.rect_filled(bar.rect.translate(origin), 0.0, cfg.bar_color);
    }

    if layout.line.len() >= 2 {
        let points = layout.line.iter().map(|p| *p + origin).collect();
        painter.add(Shape::line(points, Stroke::new(2.0, cfg.line_color)));
    }
    if let Some(end) = layout.line.last() {
        painter.circle_filled(*end + origin, 3.0, cfg.line_color);
    }

    // Bottom axis
    let axis_stroke = Stroke::new(2.0, cfg.axis_color);
    painter.line_segment(
        [
            pos2(0.0, layout.axis_y) + origin,
            pos2(layout.canvas.x, layout.axis_y) + origin,
        ],
        axis_stroke,
    );
    for tick in &layout.ticks {
        let base = pos2(tick.x, layout.axis_y) + origin;
        painter.line_segment([base, base + vec2(0.0, 6.0)], Stroke::new(1.0, cfg.axis_color));
        painter.text(
            base + vec2(0.0, 8.0),
            Align2::CENTER_TOP,
            tick.year.to_string(),
            FontId::proportional(10.0),
            cfg.axis_color,
        );
    }

    // Hover
    let hovered: Option<ActiveTooltip> = response
        .hover_pos()
        .and_then(|p| layout.bar_at(p - origin))
        .map(|bar| layout.tooltip_for(bar, climate));
    let now = ui.input(|i| i.time);
    let linger = cfg.tooltip_linger_secs;
    let has_temperature = layout.has_temperature;
    let climate_failed = match state.climate.state() {
        FetchState::Failed(msg) => Some(msg.clone()),
        _ => None,
    };

    state.tooltip = next_tooltip(state.tooltip.take(), hovered, now, linger);
    if let Some(tip) = &state.tooltip {
        if let Some(hide_at) = tip.hide_at {
            ui.ctx()
                .request_repaint_after(Duration::from_secs_f64((hide_at - now).max(0.0)));
        }
        paint_tooltip(ui.ctx(), tip, origin);
    }

    if let Some(msg) = climate_failed {
        let text = format!("Temperature data failed to load: {msg}");
        ui.label(RichText::new(text).color(Color32::RED));
    } else if !has_temperature && !state.climate.state().is_loading() {
        ui.label(RichText::new("No temperature data for this country.").italics());
    }
}

fn paint_tooltip(ctx: &egui::Context, tip: &ActiveTooltip, origin: egui::Vec2) {
    let painter = ctx.layer_painter(LayerId::new(Order::Tooltip, Id::new("trend_tooltip")));
    let galley = painter.layout_no_wrap(
        tip.data.lines().join("\n"),
        FontId::proportional(12.0),
        Color32::BLACK,
    );
    let padding = vec2(8.0, 6.0);
    let top_left = tip.anchor + origin + vec2(10.0, 10.0);
    let rect = egui::Rect::from_min_size(top_left, galley.size() + padding * 2.0);
    painter.rect_filled(rect, 0.0, Color32::WHITE);
    painter.galley(rect.min + padding, galley, Color32::BLACK);
}
