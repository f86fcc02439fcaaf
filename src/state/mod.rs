pub mod app_settings;
pub mod app_state;
pub mod commands;
pub mod script;
