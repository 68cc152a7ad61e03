use eframe::egui;

use crate::ui::markup::Segment;
use crate::ui::widget::RenderedEntry;

pub const MAX_HEIGHT: f32 = 320.0;

const USER_BUBBLE: egui::Color32 = egui::Color32::from_rgb(59, 130, 246);
const BOT_BUBBLE: egui::Color32 = egui::Color32::from_rgb(55, 65, 81);

pub fn render(ui: &mut egui::Ui, entries: &[RenderedEntry], scroll_to_end: bool) {
    egui::ScrollArea::vertical()
        .id_salt("messages")
        .max_height(MAX_HEIGHT)
        .auto_shrink([false, true])
        .show(ui, |ui| {
            for entry in entries {
                bubble(ui, entry);
                ui.add_space(6.0);
            }
            if scroll_to_end {
                ui.scroll_to_cursor(Some(egui::Align::BOTTOM));
            }
        });
}

/// Fill colour and horizontal alignment for a style class.
fn style_for(class: &str) -> (egui::Color32, egui::Align) {
    match class {
        "user-message" => (USER_BUBBLE, egui::Align::Max),
        _ => (BOT_BUBBLE, egui::Align::Min),
    }
}

fn bubble(ui: &mut egui::Ui, entry: &RenderedEntry) {
    let (fill, align) = style_for(entry.class);
    ui.with_layout(egui::Layout::top_down(align), |ui| {
        egui::Frame::new()
            .fill(fill)
            .corner_radius(8)
            .inner_margin(egui::Margin::symmetric(10, 6))
            .show(ui, |ui| {
                ui.set_max_width(ui.available_width() * 0.8);
                ui.horizontal_wrapped(|ui| {
                    ui.spacing_mut().item_spacing.x = 0.0;
                    for segment in &entry.segments {
                        match segment {
                            Segment::Text(text) => {
                                ui.label(egui::RichText::new(text.as_str()).color(egui::Color32::WHITE));
                            }
                            Segment::LineBreak => ui.end_row(),
                            Segment::Link { label, url } => {
                                ui.hyperlink_to(label.as_str(), url);
                            }
                        }
                    }
                });
            });
    });
}
