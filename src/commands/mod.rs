pub mod chat;
pub mod config;

// Re-export all the command structs
pub use chat::ChatArgs;
pub use config::ConfigArgs;
