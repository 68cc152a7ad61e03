use eframe::egui;

/// Floating icon in the bottom-right corner. Returns `true` when clicked.
pub fn render(ctx: &egui::Context) -> bool {
    egui::Area::new(egui::Id::new("chat-icon"))
        .anchor(egui::Align2::RIGHT_BOTTOM, [-20.0, -20.0])
        .show(ctx, |ui| {
            ui.add(
                egui::Button::new(egui::RichText::new("💬").size(28.0))
                    .min_size(egui::vec2(56.0, 56.0))
                    .corner_radius(28),
            )
            .on_hover_text("Chat with us")
            .clicked()
        })
        .inner
}
