use std::time::Duration;

use eframe::egui;
use tokio::sync::mpsc;

use crate::common::NetworkEvent;

use super::components::{chat_box, chat_icon, debug_panel};
use super::widget::ChatWidget;

pub struct ChatApp {
    widget: ChatWidget,
    event_receiver: mpsc::Receiver<NetworkEvent>,
    title: String,
    show_debug_panel: bool,
}

impl ChatApp {
    pub fn new(
        _cc: &eframe::CreationContext<'_>,
        widget: ChatWidget,
        event_receiver: mpsc::Receiver<NetworkEvent>,
        title: String,
        show_debug_panel: bool,
    ) -> Self {
        Self {
            widget,
            event_receiver,
            title,
            show_debug_panel,
        }
    }

    fn handle_network_events(&mut self) {
        while let Ok(event) = self.event_receiver.try_recv() {
            self.widget.apply_event(event);
        }
    }
}

impl eframe::App for ChatApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        self.handle_network_events();

        if self.show_debug_panel {
            egui::SidePanel::left("debug_panel")
                .resizable(true)
                .default_width(280.0)
                .show(ctx, |ui| {
                    debug_panel::render(ui, &self.widget);
                });
        }

        // Host surface the widget floats over.
        egui::CentralPanel::default().show(ctx, |ui| {
            ui.heading(&self.title);
            ui.separator();
            ui.label("Click the chat icon in the bottom-right corner to start a conversation.");
        });

        if chat_icon::render(ctx) {
            self.widget.open();
        }

        if self.widget.is_visible() {
            let actions = chat_box::render(ctx, &mut self.widget, &self.title);
            if let Some(geometry) = actions.geometry {
                self.widget.record_geometry(geometry);
            }
            if actions.submit {
                self.widget.submit_input();
            }
            if actions.close {
                self.widget.close();
            }
        }

        // Replies arrive from the network worker without user input.
        ctx.request_repaint_after(Duration::from_millis(100));
    }
}
