//! Assistant storage for voxgate.
//!
//! [`MySqlAssistantRepository`] reads the `assistentes` table through a
//! shared `sqlx` pool. [`InMemoryAssistantRepository`] holds records in a map
//! and is used for tests and local runs without a database.

mod memory;
mod mysql;
mod row;

pub use memory::InMemoryAssistantRepository;
pub use mysql::{connect_options, MySqlAssistantRepository, ASSISTANTS_TABLE};
