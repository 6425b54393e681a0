//! `gocards` - Go interview flashcards in your terminal
//!
//! This library provides the deck model, the study-session state machine,
//! and the persistence layer behind the `gocards` binary. The interactive
//! screen lives in [`tui`]; everything underneath it is plain data types
//! that can be driven directly from tests.

#![warn(missing_docs)]
#![warn(missing_debug_implementations)]
#![deny(unsafe_code)]

pub mod card;
pub mod cli;
pub mod config;
pub mod deck;
pub mod error;
pub mod logging;
pub mod progress;
pub mod session;
pub mod storage;
pub mod tui;

pub use card::{Card, CardId, Difficulty};
pub use config::Config;
pub use deck::Deck;
pub use error::{Error, Result};
pub use logging::init_logging;
pub use progress::{MemoryProgressStore, ProgressStore, StudyProgress, StudyStats};
pub use session::{Filter, StudyEvent, StudySession};
pub use storage::SqliteProgressStore;
