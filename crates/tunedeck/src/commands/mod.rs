//! Command handlers, one module per top-level command.

pub mod settings;
