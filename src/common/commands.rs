/// Lệnh UI gửi xuống tầng mạng.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NetworkCommand {
    /// Gửi một tin nhắn của người dùng tới backend (một request cho mỗi lần submit).
    Deliver(String),
}
