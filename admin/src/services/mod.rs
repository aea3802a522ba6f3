pub mod auth;
pub mod notifier;
pub mod show_api;
