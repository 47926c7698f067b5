//! Worker thread that owns the docente editor and talks to the directory.

pub mod commands;
pub mod runtime;
