pub mod app;
pub mod chat;
pub mod config;
pub mod editor;
pub mod history;
pub mod settings;
