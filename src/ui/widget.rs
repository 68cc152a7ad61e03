use tokio::sync::mpsc;

use crate::common::{ChatMessage, MessageLog, NetworkCommand, NetworkEvent, Role};

use super::markup::{self, Segment};
use super::state::Diagnostics;

pub const EVENT_SUBMITTED: &str = "SUBMITTED";
pub const EVENT_REPLY_RECEIVED: &str = "REPLY_RECEIVED";
pub const EVENT_DELIVERY_FAILED: &str = "DELIVERY_FAILED";
pub const EVENT_SEND_FAILED: &str = "SEND_FAILED";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Visibility {
    Hidden,
    Visible,
}

/// Measured panel placement, in screen points.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PanelGeometry {
    /// Bottom edge of the panel at its unpinned position.
    pub panel_bottom: f32,
    pub viewport_height: f32,
}

/// One entry of the visible message list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderedEntry {
    pub role: Role,
    pub class: &'static str,
    pub segments: Vec<Segment>,
}

/// Controller của widget chat: log tin nhắn, trạng thái hiển thị, ô nhập liệu.
///
/// All mutation goes through [`open`](Self::open), [`close`](Self::close),
/// [`submit`](Self::submit) and [`apply_event`](Self::apply_event); the egui view only
/// reads [`rendered`](Self::rendered) and writes `input_text`.
pub struct ChatWidget {
    log: MessageLog,
    visibility: Visibility,
    pub input_text: String,
    greeting: String,
    command_sender: mpsc::Sender<NetworkCommand>,
    rendered: Vec<RenderedEntry>,
    scroll_to_end: bool,
    geometry: Option<PanelGeometry>,
    pin_bottom: bool,
    pending: usize,
    diagnostics: Diagnostics,
}

impl ChatWidget {
    pub fn new(command_sender: mpsc::Sender<NetworkCommand>, greeting: impl Into<String>) -> Self {
        Self {
            log: MessageLog::new(),
            visibility: Visibility::Hidden,
            input_text: String::new(),
            greeting: greeting.into(),
            command_sender,
            rendered: Vec::new(),
            scroll_to_end: false,
            geometry: None,
            pin_bottom: false,
            pending: 0,
            diagnostics: Diagnostics::new(),
        }
    }

    pub fn log(&self) -> &MessageLog {
        &self.log
    }

    pub fn is_visible(&self) -> bool {
        self.visibility == Visibility::Visible
    }

    pub fn rendered(&self) -> &[RenderedEntry] {
        &self.rendered
    }

    pub fn pin_bottom(&self) -> bool {
        self.pin_bottom
    }

    /// Requests sent whose reply has not arrived yet.
    pub fn pending(&self) -> usize {
        self.pending
    }

    pub fn diagnostics(&self) -> &Diagnostics {
        &self.diagnostics
    }

    /// Shows the panel and greets the user. Each call appends another greeting.
    pub fn open(&mut self) {
        self.visibility = Visibility::Visible;
        self.append(ChatMessage::bot(self.greeting.clone()));
        self.clamp_to_viewport();
    }

    /// Hides the panel. The log is kept.
    pub fn close(&mut self) {
        self.visibility = Visibility::Hidden;
    }

    /// Submits the current contents of the input field.
    pub fn submit_input(&mut self) -> bool {
        let raw = std::mem::take(&mut self.input_text);
        let accepted = self.submit(&raw);
        if !accepted {
            self.input_text = raw;
        }
        accepted
    }

    /// Appends a user entry for the trimmed `raw` text, clears the input and queues
    /// exactly one delivery. Blank input is ignored and returns `false`.
    pub fn submit(&mut self, raw: &str) -> bool {
        let text = raw.trim();
        if text.is_empty() {
            return false;
        }

        self.append(ChatMessage::user(text));
        self.input_text.clear();

        match self
            .command_sender
            .try_send(NetworkCommand::Deliver(text.to_string()))
        {
            Ok(()) => {
                self.pending += 1;
                self.diagnostics
                    .record(EVENT_SUBMITTED, format!("Sent: {text}"));
            }
            Err(err) => {
                log::warn!("Failed to send command to network: {err}");
                self.diagnostics
                    .record(EVENT_SEND_FAILED, format!("Could not queue message: {err}"));
            }
        }
        true
    }

    /// Applies the outcome of a delivery. Failures only reach the diagnostic channel.
    pub fn apply_event(&mut self, event: NetworkEvent) {
        self.pending = self.pending.saturating_sub(1);
        match event {
            NetworkEvent::ReplyReceived(reply) => {
                self.diagnostics
                    .record(EVENT_REPLY_RECEIVED, format!("Reply: {reply}"));
                self.append(ChatMessage::bot(reply));
            }
            NetworkEvent::DeliveryFailed(reason) => {
                log::error!("Error sending message: {reason}");
                self.diagnostics.record(EVENT_DELIVERY_FAILED, reason);
            }
        }
    }

    /// Rebuilds the visible list from the whole log, then asks the view to scroll to
    /// the end and re-applies the viewport clamp.
    pub fn render(&mut self) -> &[RenderedEntry] {
        self.rendered = self
            .log
            .iter()
            .map(|message| RenderedEntry {
                role: message.role(),
                class: message.role().style_class(),
                segments: match message.role() {
                    Role::Bot => markup::parse(message.text()),
                    Role::User => vec![Segment::Text(message.text().to_string())],
                },
            })
            .collect();
        self.scroll_to_end = true;
        self.clamp_to_viewport();
        &self.rendered
    }

    /// Returns `true` once after each render.
    pub fn take_scroll_to_end(&mut self) -> bool {
        std::mem::take(&mut self.scroll_to_end)
    }

    /// Pins the panel to the bottom edge when its unpinned bottom would fall below the
    /// viewport. Without a measurement yet the panel stays unpinned.
    pub fn clamp_to_viewport(&mut self) {
        if let Some(geometry) = self.geometry {
            self.pin_bottom = geometry.panel_bottom > geometry.viewport_height;
        }
    }

    /// Stores the geometry measured by the view and re-clamps when it changed, so a
    /// panel that grew after a render is settled on the next frame.
    pub fn record_geometry(&mut self, geometry: PanelGeometry) {
        if self.geometry != Some(geometry) {
            self.geometry = Some(geometry);
            self.clamp_to_viewport();
        }
    }

    fn append(&mut self, message: ChatMessage) {
        self.log.push(message);
        self.render();
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    const GREETING: &str = "Hi, who are you?";

    fn widget() -> (ChatWidget, mpsc::Receiver<NetworkCommand>) {
        let (tx, rx) = mpsc::channel(16);
        (ChatWidget::new(tx, GREETING), rx)
    }

    fn events_of(widget: &ChatWidget, event_type: &str) -> usize {
        widget
            .diagnostics()
            .recent()
            .filter(|event| event.event_type == event_type)
            .count()
    }

    fn drain(rx: &mut mpsc::Receiver<NetworkCommand>) -> Vec<NetworkCommand> {
        let mut commands = Vec::new();
        while let Ok(command) = rx.try_recv() {
            commands.push(command);
        }
        commands
    }

    #[test]
    fn starts_hidden_with_empty_log() {
        let (widget, _rx) = widget();
        assert!(!widget.is_visible());
        assert_eq!(widget.log().len(), 0);
        assert!(widget.rendered().is_empty());
    }

    #[test]
    fn submit_appends_trimmed_user_entries_in_order() {
        let (mut widget, mut rx) = widget();

        for input in ["  first ", "second", "\tthird\n"] {
            assert!(widget.submit(input));
        }

        let texts: Vec<_> = widget.log().iter().map(|m| (m.role(), m.text())).collect();
        assert_eq!(
            texts,
            vec![
                (Role::User, "first"),
                (Role::User, "second"),
                (Role::User, "third"),
            ]
        );
        assert_eq!(
            drain(&mut rx),
            vec![
                NetworkCommand::Deliver("first".to_string()),
                NetworkCommand::Deliver("second".to_string()),
                NetworkCommand::Deliver("third".to_string()),
            ]
        );
        assert_eq!(widget.pending(), 3);
    }

    #[test]
    fn blank_input_is_silently_dropped() {
        let (mut widget, mut rx) = widget();

        assert!(!widget.submit(""));
        assert!(!widget.submit("   "));

        assert_eq!(widget.log().len(), 0);
        assert!(drain(&mut rx).is_empty());
        assert!(widget.diagnostics().recent().next().is_none());
    }

    #[test]
    fn submit_input_clears_the_field_only_when_accepted() {
        let (mut widget, _rx) = widget();

        widget.input_text = "   ".to_string();
        assert!(!widget.submit_input());
        assert_eq!(widget.input_text, "   ");

        widget.input_text = " patient ".to_string();
        assert!(widget.submit_input());
        assert_eq!(widget.input_text, "");
        assert_eq!(widget.log().iter().last(), Some(&ChatMessage::user("patient")));
    }

    #[test]
    fn reply_appends_bot_entry() {
        let (mut widget, _rx) = widget();
        widget.submit("student");

        widget.apply_event(NetworkEvent::ReplyReceived("X".to_string()));

        assert_eq!(widget.log().iter().last(), Some(&ChatMessage::bot("X")));
        assert_eq!(widget.log().len(), 2);
        assert_eq!(widget.pending(), 0);
        assert_eq!(widget.rendered().len(), 2);
    }

    #[test]
    fn failed_delivery_leaves_log_unchanged() {
        let (mut widget, _rx) = widget();
        widget.submit("student");
        let before = widget.log().clone();

        widget.apply_event(NetworkEvent::DeliveryFailed("connection refused".to_string()));

        assert_eq!(widget.log(), &before);
        assert_eq!(events_of(&widget, EVENT_DELIVERY_FAILED), 1);
        assert_eq!(widget.pending(), 0);
    }

    #[test]
    fn open_on_empty_log_greets_once() {
        let (mut widget, mut rx) = widget();

        widget.open();

        assert!(widget.is_visible());
        let entries: Vec<_> = widget.log().iter().cloned().collect();
        assert_eq!(entries, vec![ChatMessage::bot(GREETING)]);
        assert!(drain(&mut rx).is_empty());
    }

    #[test]
    fn close_only_changes_visibility() {
        let (mut widget, _rx) = widget();
        widget.open();
        widget.submit("job seeker");
        let before = widget.log().clone();

        widget.close();

        assert!(!widget.is_visible());
        assert_eq!(widget.log(), &before);
    }

    #[test]
    fn render_is_idempotent() {
        let (mut widget, _rx) = widget();
        widget.open();
        widget.submit("hi");
        widget.apply_event(NetworkEvent::ReplyReceived(
            "See <a href='https://cmc.test'>portal</a><br/>bye".to_string(),
        ));

        let first = widget.render().to_vec();
        let second = widget.render().to_vec();

        assert_eq!(first, second);
        assert_eq!(first[1].class, "user-message");
        assert_eq!(first[2].class, "bot-message");
    }

    #[test]
    fn user_text_is_never_interpreted_as_markup() {
        let (mut widget, _rx) = widget();
        widget.submit("<b>me</b>");

        assert_eq!(
            widget.rendered()[0].segments,
            vec![Segment::Text("<b>me</b>".to_string())]
        );
    }

    #[test]
    fn render_requests_scroll_once() {
        let (mut widget, _rx) = widget();
        assert!(!widget.take_scroll_to_end());

        widget.open();
        assert!(widget.take_scroll_to_end());
        assert!(!widget.take_scroll_to_end());
    }

    #[test]
    fn clamp_pins_only_when_panel_overflows() {
        let (mut widget, _rx) = widget();

        widget.open();
        assert!(!widget.pin_bottom());

        widget.record_geometry(PanelGeometry {
            panel_bottom: 700.0,
            viewport_height: 600.0,
        });
        assert!(widget.pin_bottom());

        widget.record_geometry(PanelGeometry {
            panel_bottom: 500.0,
            viewport_height: 600.0,
        });
        assert!(!widget.pin_bottom());
    }

    #[test]
    fn panel_growing_after_a_reply_gets_pinned() {
        let (mut widget, _rx) = widget();
        widget.open();
        widget.record_geometry(PanelGeometry {
            panel_bottom: 550.0,
            viewport_height: 600.0,
        });
        assert!(!widget.pin_bottom());

        widget.apply_event(NetworkEvent::ReplyReceived("a long answer".to_string()));
        widget.record_geometry(PanelGeometry {
            panel_bottom: 650.0,
            viewport_height: 600.0,
        });

        assert!(widget.pin_bottom());
    }

    #[test]
    fn send_failure_keeps_user_entry_and_is_diagnosed() {
        let (tx, rx) = mpsc::channel(1);
        drop(rx);
        let mut widget = ChatWidget::new(tx, GREETING);

        assert!(widget.submit("hello"));

        assert_eq!(widget.log().iter().last(), Some(&ChatMessage::user("hello")));
        assert_eq!(widget.pending(), 0);
        assert_eq!(events_of(&widget, EVENT_SEND_FAILED), 1);
    }
}
