pub mod config;
pub mod doctor;
pub mod error;
pub mod index;
pub mod models;
pub mod prompt;
pub mod render;
pub mod runner;
pub mod service;
pub mod store;
pub mod sync;

pub use config::{Config, ConfigBuilder};
pub use error::ZetError;
pub use models::{Note, NoteId, Selection, TitleEntry};
pub use prompt::{Prompter, StdinPrompter};
pub use runner::{ProcessRunner, SystemRunner};
pub use service::{GitOperation, NoteTarget, ZetService};
pub use store::NoteStore;
pub use sync::{SyncOutcome, SyncStage, SyncWorkflow};
