/// Errors reported by keyed map operations.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum MapError {
	/// A direct keyed lookup found no entry for the key.
	#[error("key not found")]
	KeyNotFound,
}
