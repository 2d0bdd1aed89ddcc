use std::sync::Arc;

use crate::desc::{OptionDesc, OptionFlags};
use crate::store::ScopeId;
use crate::value::OptionValue;

/// One option's value at one scope.
///
/// An entry is owned by exactly one scope and never shared: the root gets an
/// entry when the option is declared, and a descendant gets its own by
/// cloning the nearest visible ancestor entry on first local write (see
/// [`OptionStore::get_local`]). The descriptor `Arc` is the shared part;
/// the payload is this scope's private copy.
///
/// [`OptionStore::get_local`]: crate::store::OptionStore::get_local
#[derive(Debug, Clone)]
pub struct OptionEntry {
	desc: Arc<OptionDesc>,
	owner: ScopeId,
	value: OptionValue,
}

impl OptionEntry {
	pub(crate) fn new(desc: Arc<OptionDesc>, owner: ScopeId, value: OptionValue) -> Self {
		Self { desc, owner, value }
	}

	/// Copies this entry's payload into a new entry bound to `owner`.
	///
	/// The clone compares equal to the source at the moment of cloning;
	/// afterwards the two drift independently.
	pub(crate) fn clone_into(&self, owner: ScopeId) -> Self {
		Self {
			desc: self.desc.clone(),
			owner,
			value: self.value.clone(),
		}
	}

	pub(crate) fn set_value(&mut self, value: OptionValue) {
		self.value = value;
	}

	pub fn name(&self) -> &str {
		self.desc.name()
	}

	pub fn flags(&self) -> OptionFlags {
		self.desc.flags()
	}

	/// The shared descriptor this entry was declared with.
	pub fn desc(&self) -> &Arc<OptionDesc> {
		&self.desc
	}

	/// The scope that owns this entry.
	pub fn owner(&self) -> ScopeId {
		self.owner
	}

	pub fn value(&self) -> &OptionValue {
		&self.value
	}
}
