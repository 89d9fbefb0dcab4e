//! Text generation clients for ChatRelay.
//!
//! All clients implement the `chatrelay_core::TextGenerator` trait.

pub mod http_get;

pub use http_get::HttpGenerationClient;
