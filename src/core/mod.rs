pub mod api;
pub mod app;
pub mod config;
pub mod formatter;
pub mod map;
pub mod page;
pub mod paths;
pub mod sync;
