use std::collections::VecDeque;

use chrono::{DateTime, Utc};

/// Giữ tối đa 100 events để không chiếm quá nhiều bộ nhớ.
const MAX_EVENTS: usize = 100;

/// Debug event để hiển thị thông tin chẩn đoán.
#[derive(Debug, Clone)]
pub struct DebugEvent {
    pub timestamp: DateTime<Utc>,
    pub event_type: &'static str,
    pub message: String,
}

/// Bounded diagnostic channel. Never shown inside the conversation itself.
#[derive(Debug, Default)]
pub struct Diagnostics {
    events: VecDeque<DebugEvent>,
}

impl Diagnostics {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record(&mut self, event_type: &'static str, message: String) {
        self.events.push_back(DebugEvent {
            timestamp: Utc::now(),
            event_type,
            message,
        });

        if self.events.len() > MAX_EVENTS {
            self.events.pop_front();
        }
    }

    /// Newest first.
    pub fn recent(&self) -> impl Iterator<Item = &DebugEvent> {
        self.events.iter().rev()
    }
}
