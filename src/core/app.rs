//! Application identity from Cargo.toml.

/// Application name (from Cargo.toml `package.name`).
pub const NAME: &str = env!("CARGO_PKG_NAME");

/// Organization segment of the platform config/cache paths.
pub const VENDOR: &str = "travel-companion";
