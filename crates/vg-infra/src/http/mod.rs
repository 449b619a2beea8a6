//! HTTP adapter for the progress service.

mod dto;
mod progress_client;

pub use progress_client::HttpProgressClient;
