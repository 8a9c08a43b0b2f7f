use eframe::egui::{self, Color32, RichText, Slider, Ui};

use crate::selection::{site_options, PAYLOAD_DOMAIN, PAYLOAD_STEP};
use crate::state::AppState;

// ---------------------------------------------------------------------------
// Left side panel – selection widgets
// ---------------------------------------------------------------------------

/// Render the left selection panel.
///
/// Rejected selections are reported through `state.status_message`, so the
/// results of `select_*` are not inspected here.
pub fn side_panel(ui: &mut Ui, state: &mut AppState) {
    ui.heading("Selection");
    ui.separator();

    // ---- Site selector ----
    ui.strong("Launch Site");
    let options = site_options(state.dataset());
    let current = state.site().clone();
    egui::ComboBox::from_id_salt("site_dropdown")
        .selected_text(current.to_string())
        .width(ui.available_width())
        .show_ui(ui, |ui: &mut Ui| {
            for option in &options {
                if ui
                    .selectable_label(*option == current, option.to_string())
                    .clicked()
                    && *option != current
                {
                    let _ = state.select_site(option.value());
                }
            }
        });
    ui.add_space(12.0);

    // ---- Payload range ----
    ui.strong("Payload range (Kg):");
    let range = state.payload_range();
    let (min, max) = PAYLOAD_DOMAIN;
    let mut low = range.low();
    let mut high = range.high();

    let low_changed = ui
        .add(Slider::new(&mut low, min..=max).step_by(PAYLOAD_STEP).text("low"))
        .changed();
    let high_changed = ui
        .add(Slider::new(&mut high, min..=max).step_by(PAYLOAD_STEP).text("high"))
        .changed();
    if low_changed || high_changed {
        let _ = state.slide_payload_range(low, high);
    }

    ui.horizontal(|ui: &mut Ui| {
        let ds = state.dataset();
        let (data_min, data_max) = (ds.min_payload(), ds.max_payload());
        if ui
            .small_button("Reset")
            .on_hover_text(format!("data bounds {data_min}..={data_max} kg"))
            .clicked()
        {
            let _ = state.reset_payload_range();
        }
        ui.label(state.payload_range().to_string());
    });

    ui.add_space(12.0);
    ui.separator();

    // ---- Booster category legend ----
    ui.strong("Booster Version Category");
    for (label, color) in state.category_colors.legend_entries() {
        ui.label(RichText::new(format!("● {label}")).color(color));
    }
}

// ---------------------------------------------------------------------------
// Top bar
// ---------------------------------------------------------------------------

/// Render the dashboard title and status line.
pub fn top_bar(ui: &mut Ui, state: &AppState) {
    ui.vertical_centered(|ui: &mut Ui| {
        ui.heading(RichText::new("SpaceX Launch Records Dashboard").size(28.0).strong());
    });

    ui.horizontal(|ui: &mut Ui| {
        let ds = state.dataset();
        ui.label(format!(
            "{} launches from {} sites, {} in payload range",
            ds.len(),
            ds.sites().len(),
            state.shown_launch_count()
        ));

        if let Some(msg) = &state.status_message {
            ui.separator();
            ui.label(RichText::new(msg).color(Color32::RED));
        }
    });
}
