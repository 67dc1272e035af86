//! Command handlers for the Civic Help CLI.

pub mod ask;
pub mod chat;
pub mod schemes;

pub use ask::AskCommand;
pub use chat::ChatCommand;
pub use schemes::SchemesCommand;
