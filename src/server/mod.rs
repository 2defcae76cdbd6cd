mod config_entries;
pub mod dto;
mod documents;
mod extract;
mod macroprocesses;
pub mod response;
mod router;
mod session;
mod subprocesses;
mod users;
pub mod validation;

pub use router::{AppState, create_router};
