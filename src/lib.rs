pub mod bank;
pub mod commands;
pub mod drill;
pub mod output;
pub mod session;
pub mod settings;
