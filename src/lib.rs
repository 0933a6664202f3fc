// Copyforge - marketing copy proxy with a layered model fallback
// Library exports

pub mod client;
pub mod config;
pub mod error;
pub mod fallback;
pub mod logging;
pub mod prompt;
pub mod providers;
pub mod server;
