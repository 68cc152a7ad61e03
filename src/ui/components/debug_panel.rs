use eframe::egui;

use crate::ui::widget::{
    ChatWidget, EVENT_DELIVERY_FAILED, EVENT_REPLY_RECEIVED, EVENT_SEND_FAILED, EVENT_SUBMITTED,
};

pub fn render(ui: &mut egui::Ui, widget: &ChatWidget) {
    ui.heading("Debug Info");
    ui.separator();

    ui.horizontal(|ui| {
        ui.label("Messages:");
        ui.label(format!("{}", widget.log().len()));
    });
    ui.horizontal(|ui| {
        ui.label("Pending requests:");
        ui.label(format!("{}", widget.pending()));
    });
    ui.horizontal(|ui| {
        ui.label("Pinned to bottom:");
        ui.label(if widget.pin_bottom() { "yes" } else { "no" });
    });

    ui.separator();

    // Hiển thị log events gần đây
    ui.label("Recent Events:");
    egui::ScrollArea::vertical()
        .id_salt("debug_events")
        .max_height(300.0)
        .show(ui, |ui| {
            for event in widget.diagnostics().recent().take(20) {
                let time_str = event.timestamp.format("%H:%M:%S");
                let color = match event.event_type {
                    EVENT_REPLY_RECEIVED => egui::Color32::GREEN,
                    EVENT_DELIVERY_FAILED | EVENT_SEND_FAILED => egui::Color32::RED,
                    EVENT_SUBMITTED => egui::Color32::YELLOW,
                    _ => egui::Color32::WHITE,
                };

                ui.horizontal_wrapped(|ui| {
                    ui.colored_label(color, format!("[{}]", time_str));
                    ui.label(&event.message);
                });
            }
        });
}
