pub mod catalog;
pub mod command;
pub mod context;
pub mod deck;
pub mod error;
pub mod session;
pub mod telemetry;

// Re-exports for convenience
pub use catalog::{CardCatalog, CardRecord, CardTable, LookupError, TimeoutCatalog};
pub use command::{CommandInterpreter, Outcome};
pub use deck::DeckModel;
pub use error::EngineError;
pub use session::{OverlaySink, Session, SessionCommand, SessionHandle, spawn_session};
pub use telemetry::{MatchLifecycle, TelemetryReactor, TelemetryUpdate};
