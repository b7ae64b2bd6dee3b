use std::f64::consts::{FRAC_PI_2, TAU};

use chrono::{Datelike, NaiveDate};
use eframe::egui::{Align2, Color32, RichText, Stroke, Ui};
use egui_plot::{
    uniform_grid_spacer, Bar, BarChart, GridMark, Legend, Line, Plot, PlotPoint, PlotPoints,
    Points, Polygon, Text,
};

use crate::color::Theme;
use crate::data::model::format_date_br;

const CHART_HEIGHT: f32 = 300.0;

/// Label for an integer grid mark on a category axis, blank elsewhere.
fn category_label(labels: &[String], mark: GridMark) -> String {
    let rounded = mark.value.round();
    if (mark.value - rounded).abs() > 1e-6 || rounded < 0.0 {
        return String::new();
    }
    labels.get(rounded as usize).cloned().unwrap_or_default()
}

fn chart_title(ui: &mut Ui, theme: &Theme, title: &str) {
    ui.label(RichText::new(title).strong().size(16.0).color(theme.primary));
}

/// Fixed-size chart: the dashboard is for reading, not exploring.
fn fixed(plot: Plot) -> Plot {
    plot.height(CHART_HEIGHT)
        .allow_drag(false)
        .allow_zoom(false)
        .allow_scroll(false)
        .allow_boxed_zoom(false)
}

// ---------------------------------------------------------------------------
// Monthly line chart
// ---------------------------------------------------------------------------

/// Line with markers over month labels (x = bucket index).
pub fn month_line(
    ui: &mut Ui,
    theme: &Theme,
    id: &str,
    title: &str,
    labels: &[String],
    values: &[f64],
) {
    chart_title(ui, theme, title);
    let axis_labels = labels.to_vec();
    let points: Vec<[f64; 2]> = values
        .iter()
        .enumerate()
        .map(|(i, &v)| [i as f64, v])
        .collect();

    fixed(Plot::new(id))
        .include_y(0.0)
        .x_grid_spacer(uniform_grid_spacer(|_| [1.0, 2.0, 12.0]))
        .x_axis_formatter(move |mark, _range| category_label(&axis_labels, mark))
        .show(ui, |plot_ui| {
            let line_points: PlotPoints = points.clone().into();
            plot_ui.line(Line::new(line_points).color(theme.secondary).width(3.0));
            let marker_points: PlotPoints = points.into();
            plot_ui.points(Points::new(marker_points).radius(5.0).color(theme.secondary));
        });
}

// ---------------------------------------------------------------------------
// Bar charts
// ---------------------------------------------------------------------------

/// Vertical bars, one per category; shaded by value unless `color` is set.
pub fn category_bars(
    ui: &mut Ui,
    theme: &Theme,
    id: &str,
    title: &str,
    labels: &[String],
    values: &[f64],
    color: Option<Color32>,
) {
    chart_title(ui, theme, title);
    let max = values.iter().cloned().fold(0.0_f64, f64::max);
    let bars: Vec<Bar> = labels
        .iter()
        .zip(values)
        .enumerate()
        .map(|(i, (label, &v))| {
            let fill = color.unwrap_or_else(|| theme.scale(scale_fraction(v, max)));
            Bar::new(i as f64, v).name(label).fill(fill).width(0.6)
        })
        .collect();
    let axis_labels = labels.to_vec();

    fixed(Plot::new(id))
        .include_y(0.0)
        .x_grid_spacer(uniform_grid_spacer(|_| [1.0, 5.0, 10.0]))
        .x_axis_formatter(move |mark, _range| category_label(&axis_labels, mark))
        .show(ui, |plot_ui| {
            plot_ui.bar_chart(BarChart::new(bars));
        });
}

/// Horizontal ranking, first entry drawn on top, shaded by value.
pub fn ranking_bars(
    ui: &mut Ui,
    theme: &Theme,
    id: &str,
    title: &str,
    labels: &[String],
    values: &[f64],
) {
    chart_title(ui, theme, title);
    let n = labels.len();
    let max = values.iter().cloned().fold(0.0_f64, f64::max);
    let bars: Vec<Bar> = labels
        .iter()
        .zip(values)
        .enumerate()
        .map(|(i, (label, &v))| {
            Bar::new((n - 1 - i) as f64, v)
                .name(label)
                .fill(theme.scale(scale_fraction(v, max)))
                .width(0.7)
        })
        .collect();
    // Axis position k shows the label ranked n-1-k.
    let axis_labels: Vec<String> = labels.iter().rev().cloned().collect();

    fixed(Plot::new(id))
        .include_x(0.0)
        .y_grid_spacer(uniform_grid_spacer(|_| [1.0, 5.0, 10.0]))
        .y_axis_formatter(move |mark, _range| category_label(&axis_labels, mark))
        .show(ui, |plot_ui| {
            plot_ui.bar_chart(BarChart::new(bars).horizontal());
        });
}

fn scale_fraction(value: f64, max: f64) -> f32 {
    if max > 0.0 {
        (value / max) as f32
    } else {
        0.0
    }
}

// ---------------------------------------------------------------------------
// Pie chart
// ---------------------------------------------------------------------------

/// Pie chart drawn with polygons.  Slices are split into quarter-turn
/// pieces because plot polygons are filled as convex shapes.
pub fn pie(
    ui: &mut Ui,
    theme: &Theme,
    id: &str,
    title: &str,
    labels: &[String],
    values: &[f64],
) {
    chart_title(ui, theme, title);
    let total: f64 = values.iter().sum();
    let colors = theme.shades(labels.len());

    fixed(Plot::new(id))
        .data_aspect(1.0)
        .show_axes(false)
        .show_grid(false)
        .legend(Legend::default())
        .show(ui, |plot_ui| {
            if total <= 0.0 {
                return;
            }
            let mut start = FRAC_PI_2;
            for ((label, &v), color) in labels.iter().zip(values).zip(colors) {
                let fraction = v / total;
                let sweep = fraction * TAU;
                let name = format!("{label} ({:.1}%)", fraction * 100.0);

                let pieces = (sweep / FRAC_PI_2).ceil().max(1.0) as usize;
                for p in 0..pieces {
                    let a0 = start - sweep * p as f64 / pieces as f64;
                    let a1 = start - sweep * (p + 1) as f64 / pieces as f64;
                    plot_ui.polygon(
                        Polygon::new(wedge(a0, a1))
                            .fill_color(color)
                            .stroke(Stroke::new(1.0, Color32::WHITE))
                            .name(&name),
                    );
                }

                let mid = start - sweep / 2.0;
                plot_ui.text(
                    Text::new(
                        PlotPoint::new(0.65 * mid.cos(), 0.65 * mid.sin()),
                        RichText::new(format!("{:.0}%", fraction * 100.0))
                            .color(Color32::WHITE)
                            .strong(),
                    )
                    .anchor(Align2::CENTER_CENTER),
                );
                start -= sweep;
            }
        });
}

fn wedge(a0: f64, a1: f64) -> Vec<[f64; 2]> {
    const STEPS: usize = 24;
    let mut points = vec![[0.0, 0.0]];
    points.extend((0..=STEPS).map(|s| {
        let a = a0 + (a1 - a0) * s as f64 / STEPS as f64;
        [a.cos(), a.sin()]
    }));
    points
}

// ---------------------------------------------------------------------------
// Timeline scatter
// ---------------------------------------------------------------------------

/// One marker per action at (date, people), captioned with the event name.
pub fn timeline(
    ui: &mut Ui,
    theme: &Theme,
    id: &str,
    title: &str,
    entries: &[(NaiveDate, u64, String)],
) {
    chart_title(ui, theme, title);
    let points: Vec<[f64; 2]> = entries
        .iter()
        .map(|(date, people, _)| [date.num_days_from_ce() as f64, *people as f64])
        .collect();

    fixed(Plot::new(id))
        .include_y(0.0)
        .x_axis_label("Data")
        .y_axis_label("Pessoas Impactadas")
        .x_axis_formatter(|mark, _range| {
            NaiveDate::from_num_days_from_ce_opt(mark.value.round() as i32)
                .map(format_date_br)
                .unwrap_or_default()
        })
        .show(ui, |plot_ui| {
            let marker_points: PlotPoints = points.clone().into();
            plot_ui.points(Points::new(marker_points).radius(7.0).color(theme.secondary));
            for ([x, y], (_, _, event)) in points.iter().zip(entries) {
                plot_ui.text(
                    Text::new(PlotPoint::new(*x, *y), caption(event))
                        .anchor(Align2::CENTER_BOTTOM)
                        .color(theme.text),
                );
            }
        });
}

/// First 30 characters of the event name followed by an ellipsis.
fn caption(event: &str) -> String {
    let head: String = event.chars().take(30).collect();
    format!("{head}...")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn category_labels_only_on_whole_marks() {
        let labels = vec!["Janeiro/2024".to_string(), "Fevereiro/2024".to_string()];
        let mark = |value| GridMark {
            value,
            step_size: 1.0,
        };
        assert_eq!(category_label(&labels, mark(1.0)), "Fevereiro/2024");
        assert_eq!(category_label(&labels, mark(0.5)), "");
        assert_eq!(category_label(&labels, mark(-1.0)), "");
        assert_eq!(category_label(&labels, mark(5.0)), "");
    }

    #[test]
    fn captions_truncate_on_characters() {
        assert_eq!(caption("DDS"), "DDS...");
        let long = "Ação".repeat(10);
        assert_eq!(caption(&long).chars().count(), 33);
    }
}
