//! Test Support
//!
//! In-memory implementations of the domain ports plus builders for
//! constructing test requests with sensible defaults. The in-memory store
//! honors the same atomic contracts as the PostgreSQL adapter, so
//! lifecycle and HTTP tests run without a database.

pub mod builders;
pub mod doubles;
pub mod memory;

pub use builders::TestRequestBuilder;
pub use doubles::{FailingNotifier, FailingRenderer, RecordingNotifier, StubRenderer};
pub use memory::InMemoryRequestStore;
