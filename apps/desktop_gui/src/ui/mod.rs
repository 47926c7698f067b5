//! UI layer for desktop GUI: the docente management window.

pub mod app;

pub use app::{DocentesApp, WINDOW_TITLE};
