pub mod chat_box;
pub mod chat_icon;
pub mod debug_panel;
pub mod input_bar;
pub mod message_list;
