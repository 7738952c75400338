use eframe::egui::{pos2, vec2, Pos2, Rect, Vec2};
use thiserror::Error;

use crate::config::ChartConfig;
use crate::data::align::{compute_domain, is_usable, pair_for_tooltip, TooltipData};
use crate::data::model::{Series, YearRange};
use crate::data::scale::{make_linear_scale, LinearScale};

// ---------------------------------------------------------------------------
// Errors
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ChartError {
    #[error("no {0} data to plot")]
    NoData(&'static str),
}

// ---------------------------------------------------------------------------
// Layout: render-ready geometry in chart-local pixels
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq)]
pub struct Bar {
    pub year: i32,
    pub value: f64,
    pub rect: Rect,
}

#[derive(Debug, Clone, PartialEq)]
pub struct AxisTick {
    pub year: i32,
    pub x: f32,
}

/// Geometry of one chart frame. Origin is the chart's top-left corner.
#[derive(Debug, Clone)]
pub struct ChartLayout {
    /// Drawing area. One bar slot wider than the chart so the bar of the
    /// range's last year, which starts at the right edge, stays visible.
    pub canvas: Vec2,
    pub bars: Vec<Bar>,
    /// Smoothed temperature curve in chart-local pixels.
    pub line: Vec<Pos2>,
    /// `false` when the climate series had nothing to scale.
    pub has_temperature: bool,
    pub axis_y: f32,
    pub ticks: Vec<AxisTick>,
}

impl ChartLayout {
    /// Lay out bars, temperature line and axis for `range`.
    ///
    /// Fails only when GDP has no usable values; missing temperature data just
    /// leaves the line out.
    pub fn build(
        gdp: &Series,
        climate: &Series,
        range: YearRange,
        cfg: &ChartConfig,
    ) -> Result<Self, ChartError> {
        let width = f64::from(cfg.width);
        let height = f64::from(cfg.height);

        let x = LinearScale::new(range.into(), (0.0, width));
        let y_gdp = make_linear_scale(compute_domain(gdp), (height, f64::from(cfg.bar_top)))
            .map_err(|_| ChartError::NoData("GDP"))?;

        let slot_width = width / f64::from(range.span().max(1));
        let bar_width = (slot_width - f64::from(cfg.bar_gap)).max(1.0) as f32;
        let baseline_gap = f64::from(cfg.axis_height + cfg.axis_margin);

        let bars = gdp
            .iter()
            .filter(|p| is_usable(p.value))
            .filter_map(|p| {
                let year = p.year.filter(|y| range.contains(*y))?;
                let value = p.value?;
                let bar_height = height - y_gdp.map(value);
                let top = height - bar_height - baseline_gap;
                Some(Bar {
                    year,
                    value,
                    rect: Rect::from_min_size(
                        pos2(x.map_f32(f64::from(year)), top as f32),
                        vec2(bar_width, bar_height as f32),
                    ),
                })
            })
            .collect();

        let y_temp = make_linear_scale(compute_domain(climate), (height, 0.0));
        let (line, has_temperature) = match y_temp {
            Ok(y_temp) => {
                let points = control_points(climate, range);
                let raw: Vec<Pos2> = points
                    .iter()
                    .map(|&(year, value)| {
                        pos2(
                            x.map_f32(f64::from(year)),
                            y_temp.map_f32(value) + cfg.line_offset,
                        )
                    })
                    .collect();
                (basis_open(&raw, 8), true)
            }
            Err(_) => (Vec::new(), false),
        };

        let ticks = x
            .ticks(cfg.tick_count)
            .into_iter()
            .map(|t| AxisTick {
                year: t.round() as i32,
                x: x.map_f32(t),
            })
            .collect();

        Ok(Self {
            canvas: vec2(cfg.width + bar_width, cfg.height),
            bars,
            line,
            has_temperature,
            axis_y: cfg.height - cfg.axis_height,
            ticks,
        })
    }

    /// Bar under a chart-local position.
    pub fn bar_at(&self, pos: Pos2) -> Option<&Bar> {
        self.bars.iter().find(|b| b.rect.contains(pos))
    }

    /// Tooltip for a hovered bar, anchored at the bar's top-left corner.
    pub fn tooltip_for(&self, bar: &Bar, climate: &Series) -> ActiveTooltip {
        ActiveTooltip {
            data: pair_for_tooltip(bar.year, bar.value, climate),
            anchor: bar.rect.left_top(),
            hide_at: None,
        }
    }
}

// ---------------------------------------------------------------------------
// Curve smoothing
// ---------------------------------------------------------------------------

/// Valid climate observations sorted by year: those inside `range` plus the
/// nearest one on each side, so the open spline reaches both range edges.
fn control_points(climate: &Series, range: YearRange) -> Vec<(i32, f64)> {
    let mut points: Vec<(i32, f64)> = climate
        .iter()
        .filter_map(|p| Some((p.year?, p.value.filter(|v| v.is_finite())?)))
        .collect();
    points.sort_by_key(|&(year, _)| year);

    let first = points.partition_point(|&(year, _)| year < range.start);
    let last = points.partition_point(|&(year, _)| year <= range.end);
    if first == last {
        return Vec::new();
    }
    points[first.saturating_sub(1)..(last + 1).min(points.len())].to_vec()
}

/// Open uniform cubic B-spline through `points`, `samples` steps per segment.
///
/// The curve starts near the second point and ends near the second-to-last,
/// without passing through the control points. Fewer than three points give
/// no curve; exactly three give the single point `(p0 + 4·p1 + p2) / 6`.
pub fn basis_open(points: &[Pos2], samples: usize) -> Vec<Pos2> {
    match points {
        [] | [_] | [_, _] => return Vec::new(),
        [p0, p1, p2] => {
            let x = (p0.x + 4.0 * p1.x + p2.x) / 6.0;
            let y = (p0.y + 4.0 * p1.y + p2.y) / 6.0;
            return vec![pos2(x, y)];
        }
        _ => {}
    }
    let samples = samples.max(1);
    let mut out = Vec::with_capacity((points.len() - 3) * samples + 1);
    for (i, w) in points.windows(4).enumerate() {
        let first = if i == 0 { 0 } else { 1 };
        for step in first..=samples {
            let t = step as f32 / samples as f32;
            let (t2, t3) = (t * t, t * t * t);
            let b0 = (1.0 - t).powi(3);
            let b1 = 3.0 * t3 - 6.0 * t2 + 4.0;
            let b2 = -3.0 * t3 + 3.0 * t2 + 3.0 * t + 1.0;
            let b3 = t3;
            let x = (b0 * w[0].x + b1 * w[1].x + b2 * w[2].x + b3 * w[3].x) / 6.0;
            let y = (b0 * w[0].y + b1 * w[1].y + b2 * w[2].y + b3 * w[3].y) / 6.0;
            out.push(pos2(x, y));
        }
    }
    out
}

// ---------------------------------------------------------------------------
// Tooltip lifecycle
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq)]
pub struct ActiveTooltip {
    pub data: TooltipData,
    pub anchor: Pos2,
    /// Time (seconds) after which the tooltip disappears; `None` while hovered.
    pub hide_at: Option<f64>,
}

/// Next tooltip given the current hover target.
///
/// Hovering replaces the tooltip immediately; leaving keeps it for `linger`
/// seconds.
pub fn next_tooltip(
    current: Option<ActiveTooltip>,
    hovered: Option<ActiveTooltip>,
    now: f64,
    linger: f64,
) -> Option<ActiveTooltip> {
    if hovered.is_some() {
        return hovered;
    }
    let mut tip = current?;
    match tip.hide_at {
        None => {
            tip.hide_at = Some(now + linger);
            Some(tip)
        }
        Some(t) if now < t => Some(tip),
        Some(_) => None,
    }
}
