//! Per-user key-value session store
//!
//! Durable scratch space scoped to one user across multiple requests. Values
//! are plain JSON; rows expire after a TTL and are removed by the sweeper.

#[cfg(test)]
pub mod memory;
mod pg_store;
mod store;
mod sweeper;

#[cfg(test)]
pub use memory::MemorySessionStore;
pub use pg_store::PgSessionStore;
pub use store::SessionStore;
pub use sweeper::SessionSweeper;
