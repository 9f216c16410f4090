pub mod cli;
pub mod date_provider;
pub mod error;
pub mod gui;
pub mod navigation;
pub mod problems;
pub mod score;
pub mod session;
pub mod streak;
pub mod time_format;
pub mod timer;
