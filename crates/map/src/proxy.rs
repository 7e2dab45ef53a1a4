use std::fmt;

use crate::backing::Backing;
use crate::map::CowMap;

/// Indexing proxy bound to one container and one key.
///
/// Stands in for `&mut V`: handing out a mutable reference would allow mutation of a
/// published snapshot outside the publish loop.
pub struct IndexProxy<'a, B: Backing> {
	map: &'a CowMap<B>,
	key: B::Key,
}

impl<'a, B: Backing> IndexProxy<'a, B> {
	pub(crate) fn new(map: &'a CowMap<B>, key: B::Key) -> Self {
		Self { map, key }
	}

	pub fn key(&self) -> &B::Key {
		&self.key
	}

	/// Reads the value, inserting `Default::default()` if the key is absent.
	pub fn get(&self) -> B::Value
	where
		B::Value: Default,
	{
		self.map.get_value(self.key.clone())
	}

	/// Assigns `value`, returning true if a new snapshot was published.
	pub fn set(&self, value: B::Value) -> bool
	where
		B::Value: PartialEq,
	{
		self.map.set_value(self.key.clone(), value)
	}
}

impl<B> fmt::Debug for IndexProxy<'_, B>
where
	B: Backing,
	B::Key: fmt::Debug,
{
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.debug_struct("IndexProxy")
			.field("label", &self.map.label())
			.field("key", &self.key)
			.finish()
	}
}
