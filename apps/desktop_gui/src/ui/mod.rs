//! UI layer for desktop GUI: app shell and result panels.

pub mod app;
pub mod panels;

pub use app::DesktopGuiApp;
