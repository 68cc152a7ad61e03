use eframe::egui;

use crate::ui::widget::{ChatWidget, PanelGeometry};

use super::{input_bar, message_list};

pub const PANEL_WIDTH: f32 = 340.0;
/// Distance from the top of the viewport when the panel is not pinned.
pub const PANEL_TOP: f32 = 120.0;
const RIGHT_MARGIN: f32 = -20.0;

#[derive(Default)]
pub struct ChatBoxActions {
    pub close: bool,
    pub submit: bool,
    pub geometry: Option<PanelGeometry>,
}

pub fn render(ctx: &egui::Context, widget: &mut ChatWidget, title: &str) -> ChatBoxActions {
    let mut actions = ChatBoxActions::default();
    let scroll_to_end = widget.take_scroll_to_end();

    let window = egui::Window::new(title)
        .id(egui::Id::new("chatbox"))
        .title_bar(false)
        .collapsible(false)
        .resizable(false)
        .default_width(PANEL_WIDTH);
    let window = if widget.pin_bottom() {
        window.anchor(egui::Align2::RIGHT_BOTTOM, [RIGHT_MARGIN, 0.0])
    } else {
        window.anchor(egui::Align2::RIGHT_TOP, [RIGHT_MARGIN, PANEL_TOP])
    };

    let shown = window.show(ctx, |ui| {
        ui.horizontal(|ui| {
            ui.heading(title);
            ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                if ui.button("✕").on_hover_text("Close").clicked() {
                    actions.close = true;
                }
            });
        });
        ui.separator();
        message_list::render(ui, widget.rendered(), scroll_to_end);
        ui.separator();
        if input_bar::render(ui, &mut widget.input_text) {
            actions.submit = true;
        }
    });

    if let Some(shown) = shown {
        let screen = ctx.content_rect();
        actions.geometry = Some(PanelGeometry {
            panel_bottom: screen.top() + PANEL_TOP + shown.response.rect.height(),
            viewport_height: screen.height(),
        });
    }

    actions
}
