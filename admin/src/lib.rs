pub mod cli;
pub mod composer;
pub mod config;
pub mod error;
pub mod i18n;
pub mod services;
