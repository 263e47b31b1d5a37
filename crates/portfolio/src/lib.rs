pub mod action;
pub mod app;
pub mod cli;
pub mod components;
pub mod config;
pub mod contact;
pub mod content;
pub mod errors;
pub mod headless;
pub mod logging;
pub mod pages;
pub mod tui;
