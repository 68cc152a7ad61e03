/// Sự kiện từ tầng mạng gửi lên UI.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NetworkEvent {
    /// Backend trả lời thành công, chứa trường `response`.
    ReplyReceived(String),
    /// Request thất bại (transport hoặc decode); chỉ dùng cho chẩn đoán.
    DeliveryFailed(String),
}
