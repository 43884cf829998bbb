//! Per-message processing

pub mod handler;

// Re-export the main handler for convenience
pub use handler::MessageHandler;
