#![forbid(unsafe_code)]

pub mod cli;
pub mod config;
pub mod logging;
pub mod metadata;
pub mod page;
pub mod render;
pub mod scripts;
pub mod server;
pub mod site;
pub mod viewport;
