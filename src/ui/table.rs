use eframe::egui::{RichText, Ui};
use egui_extras::{Column, TableBuilder};

use crate::chart::ScatterChart;

const HEADERS: [&str; 6] = [
    "Flight",
    "Launch Site",
    "Payload (kg)",
    "Booster Version",
    "Category",
    "Outcome",
];

/// Table of the launches in the published payload chart.
pub fn launches_table(ui: &mut Ui, chart: &ScatterChart) {
    let launches = chart.launches();
    if launches.is_empty() {
        ui.label("No launches in the selected payload range.");
        return;
    }

    TableBuilder::new(ui)
        .striped(true)
        .vscroll(false)
        .columns(Column::auto().at_least(48.0), HEADERS.len() - 1)
        .column(Column::remainder())
        .header(20.0, |mut header| {
            for title in HEADERS {
                header.col(|ui| {
                    ui.strong(title);
                });
            }
        })
        .body(|body| {
            body.rows(18.0, launches.len(), |mut row| {
                let (category, point) = launches[row.index()];
                row.col(|ui| {
                    ui.label(point.flight_number.map(|n| n.to_string()).unwrap_or_default());
                });
                row.col(|ui| {
                    ui.label(&point.site);
                });
                row.col(|ui| {
                    ui.label(format!("{:.0}", point.payload_mass_kg));
                });
                row.col(|ui| {
                    ui.label(point.booster_version.as_deref().unwrap_or("-"));
                });
                row.col(|ui| {
                    ui.label(category);
                });
                row.col(|ui| {
                    if point.class == 1 {
                        ui.label(RichText::new("Success").strong());
                    } else {
                        ui.label(RichText::new("Failure").weak());
                    }
                });
            });
        });
}
