pub mod app;
pub mod components;
pub mod markup;
pub mod state;
pub mod widget;

pub use app::ChatApp;
pub use widget::ChatWidget;
