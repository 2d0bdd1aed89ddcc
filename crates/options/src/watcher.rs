use std::sync::Arc;

use crate::desc::OptionDesc;
use crate::store::ScopeId;
use crate::value::OptionValue;

/// Handle to a registered watcher, returned by
/// [`OptionStore::register_watcher`].
///
/// [`OptionStore::register_watcher`]: crate::store::OptionStore::register_watcher
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct WatcherId(pub(crate) usize);

/// A change event delivered to watchers.
///
/// `owner` is the scope whose entry actually mutated; `scope` is the level
/// the receiving watcher is registered at. The two differ when the change
/// happened at an ancestor and fanned out to a scope that does not shadow
/// the name.
#[derive(Debug, Clone)]
pub struct OptionChanged {
	/// Scope owning the mutated entry.
	pub owner: ScopeId,
	/// Scope the receiving watcher is registered at.
	pub scope: ScopeId,
	/// Descriptor of the changed option.
	pub desc: Arc<OptionDesc>,
	/// The new payload.
	pub value: OptionValue,
}

/// Implemented by anything that wants option change notifications.
///
/// Watchers are called synchronously during the mutation that triggered the
/// change, after the store's state has already been updated. They receive
/// the event only; the store itself is not reachable from inside the
/// callback, so a watcher cannot re-enter the tree mid-fan-out.
pub trait OptionWatcher {
	fn on_option_changed(&mut self, change: &OptionChanged);
}

impl<F: FnMut(&OptionChanged)> OptionWatcher for F {
	fn on_option_changed(&mut self, change: &OptionChanged) {
		self(change)
	}
}
