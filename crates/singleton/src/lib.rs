//! Lazily constructed shared singletons.
//!
//! # Purpose
//!
//! Hand every caller shared ownership of one instance of a type, construct it on first
//! demand, destroy it when the last owner lets go, and construct a fresh one on the
//! next demand.
//!
//! # Mental model
//!
//! * The registry entry holds only a weak reference; owners hold `Arc<T>`.
//! * Fast path: upgrade the weak reference. No lock is taken while an instance is live.
//! * Slow path: take the construction lock, upgrade again (a racer may have won),
//!   construct if still empty, store a weak reference, release the lock.
//!
//! # Key types
//!
//! | Type | Meaning | Constraints |
//! |---|---|---|
//! | [`SingletonCell`] | One registry entry | Never owns its instance |
//! | [`Singleton`] | Type with a process-wide entry | Implemented by [`singleton!`] |
//!
//! # Failure modes & recovery
//!
//! * A failing or panicking constructor leaves the entry empty and releases the lock;
//!   the next caller retries construction.
//! * Arguments passed while an instance is live are ignored (first caller wins).

mod cell;
mod global;

pub use cell::SingletonCell;
pub use global::Singleton;
