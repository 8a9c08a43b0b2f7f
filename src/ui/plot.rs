use std::f32::consts::{FRAC_PI_2, TAU};

use eframe::egui::{self, vec2, Align2, Color32, FontId, Pos2, RichText, ScrollArea, Sense, Shape, Stroke, Ui};
use egui_plot::{Legend, Plot, PlotPoints, Points};

use crate::chart::{PieChart, ScatterChart};
use crate::color::{generate_palette, ColorMap};
use crate::error::SelectionError;
use crate::selection::PAYLOAD_DOMAIN;
use crate::state::AppState;
use crate::ui::table;

/// Quads per full turn when tessellating the donut.
const PIE_SEGMENTS: f32 = 120.0;

// ---------------------------------------------------------------------------
// Central panel: both charts and the launch table
// ---------------------------------------------------------------------------

/// Render the last published charts in the central panel.
pub fn charts_panel(ui: &mut Ui, state: &AppState) {
    ScrollArea::vertical()
        .auto_shrink([false, false])
        .show(ui, |ui: &mut Ui| {
            let outcome = state.outcome_chart();
            match outcome.published() {
                Some(chart) => outcome_pie(ui, chart, outcome.revision()),
                None => {
                    ui.label("Outcome chart unavailable.");
                }
            }
            stale_label(ui, outcome.revision(), outcome.last_error());
            ui.separator();

            let correlation = state.correlation_chart();
            match correlation.published() {
                Some(chart) => {
                    payload_scatter(ui, chart, correlation.revision(), &state.category_colors);
                    stale_label(ui, correlation.revision(), correlation.last_error());
                    ui.separator();

                    egui::CollapsingHeader::new(
                        RichText::new(format!("Launches ({})", chart.point_count())).strong(),
                    )
                    .id_salt("launch_table")
                    .default_open(false)
                    .show(ui, |ui: &mut Ui| table::launches_table(ui, chart));
                }
                None => {
                    ui.label("Payload chart unavailable.");
                    stale_label(ui, correlation.revision(), correlation.last_error());
                }
            }
        });
}

/// Note shown under a chart whose latest rebuild failed.
fn stale_note(revision: u64, error: Option<&SelectionError>) -> Option<String> {
    error.map(|e| format!("Showing revision {revision}, last update failed: {e}"))
}

fn stale_label(ui: &mut Ui, revision: u64, error: Option<&SelectionError>) {
    if let Some(note) = stale_note(revision, error) {
        ui.label(RichText::new(note).color(Color32::from_rgb(230, 140, 0)));
    }
}

// ---------------------------------------------------------------------------
// Outcome donut
// ---------------------------------------------------------------------------

fn on_circle(center: Pos2, radius: f32, angle: f32) -> Pos2 {
    center + radius * vec2(angle.cos(), angle.sin())
}

/// Draw a donut chart with percent labels and a legend.
pub fn outcome_pie(ui: &mut Ui, chart: &PieChart, revision: u64) {
    ui.heading(&chart.title)
        .on_hover_text(format!("revision {revision}"));

    if chart.total() == 0 {
        ui.label("No successful launches to show.");
        return;
    }

    let palette = generate_palette(chart.slices.len());

    ui.horizontal(|ui: &mut Ui| {
        let size = (ui.available_width() * 0.5).clamp(160.0, 320.0);
        let (rect, _) = ui.allocate_exact_size(vec2(size, size), Sense::hover());
        let painter = ui.painter_at(rect);

        let center = rect.center();
        let outer = size * 0.5 - 4.0;
        let inner = outer * chart.hole;
        // Clockwise from twelve o'clock.
        let mut start = -FRAC_PI_2;

        for (i, color) in palette.iter().enumerate() {
            let share = chart.share(i) as f32;
            let sweep = share * TAU;
            if sweep <= 0.0 {
                continue;
            }

            let segments = (share * PIE_SEGMENTS).ceil().max(1.0) as usize;
            for s in 0..segments {
                let a0 = start + sweep * s as f32 / segments as f32;
                let a1 = start + sweep * (s + 1) as f32 / segments as f32;
                let quad = vec![
                    on_circle(center, inner, a0),
                    on_circle(center, outer, a0),
                    on_circle(center, outer, a1),
                    on_circle(center, inner, a1),
                ];
                painter.add(Shape::convex_polygon(quad, *color, Stroke::NONE));
            }

            let label_at = on_circle(center, (inner + outer) * 0.5, start + sweep * 0.5);
            painter.text(
                label_at,
                Align2::CENTER_CENTER,
                format!("{:.1}%", share * 100.0),
                FontId::proportional(13.0),
                Color32::BLACK,
            );
            start += sweep;
        }

        ui.vertical(|ui: &mut Ui| {
            if let Some(title) = &chart.legend_title {
                ui.strong(title);
            }
            for (slice, color) in chart.slices.iter().zip(&palette) {
                ui.label(RichText::new(format!("■ {}  ({})", slice.label, slice.value)).color(*color));
            }
        });
    });
}

// ---------------------------------------------------------------------------
// Payload vs outcome scatter
// ---------------------------------------------------------------------------

/// Draw payload (x) against outcome class (y), one series per booster category.
///
/// The plot id includes the chart revision, so zoom and pan reset whenever a
/// new chart is published.
pub fn payload_scatter(ui: &mut Ui, chart: &ScatterChart, revision: u64, colors: &ColorMap) {
    ui.heading(&chart.title)
        .on_hover_text(format!("revision {revision}"));

    Plot::new(("payload_scatter", revision))
        .legend(Legend::default())
        .height(360.0)
        .x_axis_label(chart.x_label.as_str())
        .y_axis_label(chart.y_label.as_str())
        .include_x(PAYLOAD_DOMAIN.0)
        .include_x(PAYLOAD_DOMAIN.1)
        .include_y(-0.25)
        .include_y(1.25)
        .allow_boxed_zoom(true)
        .allow_drag(true)
        .allow_scroll(false)
        .allow_zoom(true)
        .show(ui, |plot_ui| {
            for series in &chart.series {
                let points: PlotPoints = series
                    .points
                    .iter()
                    .map(|p| [p.payload_mass_kg, f64::from(p.class)])
                    .collect();

                plot_ui.points(
                    Points::new(points)
                        .name(&series.booster_category)
                        .color(colors.color_for(&series.booster_category))
                        .filled(true)
                        .radius(5.0),
                );
            }
        });
}
