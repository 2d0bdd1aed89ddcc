//! The scope tree.
//!
//! An [`OptionStore`] owns every scope of the hierarchy (global →
//! per-document → per-view) in one arena. Scopes are addressed by
//! [`ScopeId`]; parent links are arena indices, and a parent keeps a
//! non-owning list of its children so change notifications can fan out
//! downward.
//!
//! # Resolution
//!
//! [`get`] walks from the queried scope toward the root and returns the
//! first scope's entry, the *effective* value. [`get_local`] is the write
//! path: it materializes a shadowing copy at the queried scope on first use,
//! so later writes never touch the ancestor. A materialized copy is
//! permanent for the scope's lifetime (short of [`unset`]) and goes stale on
//! purpose when the ancestor moves on.
//!
//! [`get`]: OptionStore::get
//! [`get_local`]: OptionStore::get_local
//! [`unset`]: OptionStore::unset

use std::sync::Arc;

use slab::Slab;
use tracing::{debug, trace};
use vellum_matcher::{prefix_match, subsequence_match};

use crate::desc::{OptionDesc, OptionFlags};
use crate::entry::OptionEntry;
use crate::error::{OptionError, Result};
use crate::value::{OptionValue, parse_value_for_type};
use crate::watcher::{OptionChanged, OptionWatcher, WatcherId};


/// Handle to one scope in an [`OptionStore`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ScopeId(pub(crate) usize);

struct Scope {
	parent: Option<ScopeId>,
	children: Vec<ScopeId>,
	/// Owned entries, in declaration/materialization order.
	locals: Vec<OptionEntry>,
	watchers: Vec<WatcherId>,
}

struct WatcherSlot {
	scope: ScopeId,
	watcher: Box<dyn OptionWatcher>,
}

/// Hierarchical option store with fallback lookup and change notification.
///
/// The store is single-threaded and synchronous: every operation is a
/// bounded tree walk that runs to completion, and watcher callbacks fire
/// inside the mutation that triggered them. Lifecycle misuse (removing a
/// scope that still has children or watchers, unregistering an unknown
/// watcher, declaring a name twice) panics; only name resolution and value
/// shape problems come back as [`OptionError`].
pub struct OptionStore {
	scopes: Slab<Scope>,
	watchers: Slab<WatcherSlot>,
	root: ScopeId,
}

impl Default for OptionStore {
	fn default() -> Self {
		Self::new()
	}
}

impl OptionStore {
	/// Creates a store containing only the root scope.
	pub fn new() -> Self {
		let mut scopes = Slab::new();
		let root = ScopeId(scopes.insert(Scope {
			parent: None,
			children: Vec::new(),
			locals: Vec::new(),
			watchers: Vec::new(),
		}));
		Self {
			scopes,
			watchers: Slab::new(),
			root,
		}
	}

	/// The root scope, where options are declared.
	pub fn root(&self) -> ScopeId {
		self.root
	}

	/// The parent of `scope`, or `None` for the root.
	pub fn parent(&self, scope: ScopeId) -> Option<ScopeId> {
		self.scope(scope).parent
	}

	/// Attaches a new, empty scope under `parent`.
	pub fn create_scope(&mut self, parent: ScopeId) -> ScopeId {
		self.scope(parent);
		let id = ScopeId(self.scopes.insert(Scope {
			parent: Some(parent),
			children: Vec::new(),
			locals: Vec::new(),
			watchers: Vec::new(),
		}));
		self.scopes[parent.0].children.push(id);
		trace!(domain = "options", scope = id.0, parent = parent.0, "created scope");
		id
	}

	/// Detaches `scope` and drops its local entries.
	///
	/// # Panics
	///
	/// Panics on the root scope, or when child scopes or watchers are still
	/// attached: children must be removed before their parent, and watchers
	/// unregistered before their scope goes away.
	pub fn remove_scope(&mut self, scope: ScopeId) {
		let node = self.scope(scope);
		assert!(scope != self.root, "the root scope cannot be removed");
		assert!(
			node.children.is_empty(),
			"scope removed while child scopes are still attached"
		);
		assert!(
			node.watchers.is_empty(),
			"scope removed while watchers are still registered"
		);
		let parent = node.parent.expect("non-root scope has a parent");
		let siblings = &mut self.scopes[parent.0].children;
		let pos = siblings
			.iter()
			.position(|&child| child == scope)
			.expect("child scope is linked from its parent");
		siblings.remove(pos);
		self.scopes.remove(scope.0);
		trace!(domain = "options", scope = scope.0, "removed scope");
	}

	/// Declares an option at the root scope with its default value.
	///
	/// Returns the interned descriptor; every scope-local copy of the option
	/// will share it. Redeclaring a name, or passing a default that fails
	/// the declared type or validator, is a caller bug and panics.
	pub fn declare(&mut self, desc: OptionDesc, default: OptionValue) -> Arc<OptionDesc> {
		assert!(
			self.find_local(self.root, desc.name()).is_none(),
			"option '{}' is already declared",
			desc.name()
		);
		assert!(
			default.matches_type(desc.value_type()),
			"default for option '{}' does not match declared type {}",
			desc.name(),
			desc.value_type().name()
		);
		if let Some(validator) = desc.validator()
			&& let Err(reason) = validator(&default)
		{
			panic!(
				"default for option '{}' rejected by validator: {reason}",
				desc.name()
			);
		}

		let desc = Arc::new(desc);
		debug!(domain = "options", name = desc.name(), "declared option");
		let root = self.root;
		let entry = OptionEntry::new(desc.clone(), root, default);
		self.scopes[root.0].locals.push(entry);
		desc
	}

	/// Resolves the effective value of `name` at `scope`.
	///
	/// Walks from `scope` toward the root and returns the first entry found,
	/// wherever it lives; this never materializes anything. The returned
	/// entry's [`owner`](OptionEntry::owner) tells which scope actually
	/// holds it.
	pub fn get(&self, scope: ScopeId, name: &str) -> Result<&OptionEntry> {
		self.scope(scope);
		let mut cursor = Some(scope);
		while let Some(id) = cursor {
			if let Some(idx) = self.find_local(id, name) {
				return Ok(&self.scopes[id.0].locals[idx]);
			}
			cursor = self.scopes[id.0].parent;
		}
		Err(self.not_found(scope, name))
	}

	/// Resolves `name` for writing at `scope`, materializing a local copy.
	///
	/// If the scope has no local entry yet, the effective ancestor entry is
	/// cloned into this scope first; the clone is equal to the ancestor
	/// value at this moment and drifts independently afterwards. The copy is
	/// permanent for the scope's lifetime: later ancestor changes stay
	/// invisible here until [`unset`](OptionStore::unset) drops it.
	pub fn get_local(&mut self, scope: ScopeId, name: &str) -> Result<&OptionEntry> {
		self.scope(scope);
		if let Some(idx) = self.find_local(scope, name) {
			return Ok(&self.scopes[scope.0].locals[idx]);
		}
		let Some(parent) = self.scopes[scope.0].parent else {
			return Err(self.not_found(scope, name));
		};
		let entry = self.get(parent, name)?.clone_into(scope);
		trace!(
			domain = "options",
			scope = scope.0,
			option = entry.name(),
			"materialized local override"
		);
		let node = &mut self.scopes[scope.0];
		node.locals.push(entry);
		Ok(&node.locals[node.locals.len() - 1])
	}

	/// Writes `value` to `name` at `scope`, creating a local override.
	///
	/// The value is checked against the descriptor (read-only flag, declared
	/// type, validator) before anything is materialized. Returns whether the
	/// comparable state changed; watchers are notified only in that case.
	pub fn set(&mut self, scope: ScopeId, name: &str, value: impl Into<OptionValue>) -> Result<bool> {
		let value = value.into();
		let desc = self.get(scope, name)?.desc().clone();
		if desc.flags().contains(OptionFlags::READ_ONLY) {
			return Err(OptionError::ReadOnly(desc.name().to_string()));
		}
		if !value.matches_type(desc.value_type()) {
			return Err(OptionError::TypeMismatch {
				option: desc.name().to_string(),
				expected: desc.value_type().name(),
				got: value.type_name(),
			});
		}
		if let Some(validator) = desc.validator() {
			validator(&value).map_err(|reason| OptionError::InvalidValue {
				option: desc.name().to_string(),
				reason,
			})?;
		}

		self.get_local(scope, name)?;
		let idx = self
			.find_local(scope, name)
			.expect("local entry was just materialized");
		let entry = &mut self.scopes[scope.0].locals[idx];
		if *entry.value() == value {
			return Ok(false);
		}
		entry.set_value(value.clone());
		self.fan_out(scope, scope, desc, value);
		Ok(true)
	}

	/// Parses `raw` per the option's declared type, then writes it.
	pub fn set_from_str(&mut self, scope: ScopeId, name: &str, raw: &str) -> Result<bool> {
		let desc = self.get(scope, name)?.desc().clone();
		let value = parse_value_for_type(raw, desc.value_type()).map_err(|reason| {
			OptionError::InvalidValue {
				option: desc.name().to_string(),
				reason,
			}
		})?;
		self.set(scope, name, value)
	}

	/// Drops the local override for `name` so the ancestor value becomes
	/// effective again.
	///
	/// Watchers are notified when the effective value actually changes as a
	/// result. Errors when `scope` is the root (that would drop the
	/// declaration itself) or holds no local entry for the name.
	pub fn unset(&mut self, scope: ScopeId, name: &str) -> Result<()> {
		self.scope(scope);
		if scope == self.root {
			return Err(OptionError::UnsetAtRoot(name.to_string()));
		}
		let Some(idx) = self.find_local(scope, name) else {
			return Err(match self.get(scope, name) {
				Ok(_) => OptionError::NotLocal {
					name: name.to_string(),
				},
				Err(err) => err,
			});
		};
		let removed = self.scopes[scope.0].locals.remove(idx);
		trace!(
			domain = "options",
			scope = scope.0,
			option = removed.name(),
			"dropped local override"
		);

		let effective = self
			.get(scope, name)
			.expect("ancestor chain still declares this option");
		if effective.value() == removed.value() {
			return Ok(());
		}
		let owner = effective.owner();
		let desc = effective.desc().clone();
		let value = effective.value().clone();
		self.fan_out(scope, owner, desc, value);
		Ok(())
	}

	/// The complete effective view at `scope`: one entry per distinct name,
	/// deepest scope winning.
	///
	/// Built by overlaying this scope's locals onto the parent's flattened
	/// view, replacing in place, so root declaration order is preserved.
	/// Each returned entry borrows from the scope that actually owns it.
	pub fn flatten(&self, scope: ScopeId) -> Vec<&OptionEntry> {
		let node = self.scope(scope);
		let mut entries = match node.parent {
			Some(parent) => self.flatten(parent),
			None => Vec::new(),
		};
		for entry in &node.locals {
			match entries.iter_mut().find(|known| known.name() == entry.name()) {
				Some(slot) => *slot = entry,
				None => entries.push(entry),
			}
		}
		entries
	}

	/// Completes an option name typed at `scope`.
	///
	/// Only the first `cursor` chars of `prefix` count. Candidates are
	/// gathered root-first so a name visible at several levels keeps its
	/// root-side position, deduplicated, with hidden options excluded. When
	/// prefix matching finds nothing the whole walk is retried with fuzzy
	/// subsequence matching.
	pub fn complete_name(&self, scope: ScopeId, prefix: &str, cursor: usize) -> Vec<String> {
		self.scope(scope);
		let typed: String = prefix.chars().take(cursor).collect();
		let mut names = self.matching_names(scope, &|name| prefix_match(name, &typed));
		if names.is_empty() {
			names = self.matching_names(scope, &|name| subsequence_match(name, &typed));
		}
		names
	}

	fn matching_names(&self, scope: ScopeId, matches: &dyn Fn(&str) -> bool) -> Vec<String> {
		let node = self.scope(scope);
		let mut names = match node.parent {
			Some(parent) => self.matching_names(parent, matches),
			None => Vec::new(),
		};
		for entry in &node.locals {
			if entry.flags().contains(OptionFlags::HIDDEN) {
				continue;
			}
			let name = entry.name();
			if matches(name) && !names.iter().any(|known| known == name) {
				names.push(name.to_string());
			}
		}
		names
	}

	/// Registers `watcher` to observe changes effective at `scope`.
	///
	/// The store takes ownership; [`unregister_watcher`] hands it back.
	/// Double registration cannot be expressed: registering moves the
	/// watcher in, so there is nothing left to register twice.
	///
	/// [`unregister_watcher`]: OptionStore::unregister_watcher
	pub fn register_watcher(&mut self, scope: ScopeId, watcher: Box<dyn OptionWatcher>) -> WatcherId {
		self.scope(scope);
		let id = WatcherId(self.watchers.insert(WatcherSlot { scope, watcher }));
		self.scopes[scope.0].watchers.push(id);
		trace!(domain = "options", scope = scope.0, watcher = id.0, "registered watcher");
		id
	}

	/// Removes a watcher and returns it to the caller.
	///
	/// # Panics
	///
	/// Panics when `id` is not currently registered.
	pub fn unregister_watcher(&mut self, id: WatcherId) -> Box<dyn OptionWatcher> {
		let slot = self
			.watchers
			.try_remove(id.0)
			.expect("unregistering a watcher that is not registered");
		let registered = &mut self.scopes[slot.scope.0].watchers;
		let pos = registered
			.iter()
			.position(|&watcher| watcher == id)
			.expect("watcher is linked from its scope");
		registered.remove(pos);
		trace!(domain = "options", scope = slot.scope.0, watcher = id.0, "unregistered watcher");
		slot.watcher
	}

	/// Depth-first change notification from `start` downward.
	///
	/// A scope below `start` that holds its own entry for the name is
	/// pruned together with its whole subtree: the effective value there did
	/// not change. Watcher
	/// callbacks run after the walk, once the fan-out set is fixed, so a
	/// callback observes the fully updated store state.
	fn fan_out(&mut self, start: ScopeId, owner: ScopeId, desc: Arc<OptionDesc>, value: OptionValue) {
		let mut pending = Vec::new();
		let mut stack = vec![start];
		while let Some(id) = stack.pop() {
			if id != start && self.find_local(id, desc.name()).is_some() {
				continue;
			}
			let node = &self.scopes[id.0];
			pending.extend(node.watchers.iter().map(|&watcher| (watcher, id)));
			stack.extend(node.children.iter().copied());
		}
		trace!(
			domain = "options",
			option = desc.name(),
			watchers = pending.len(),
			"option changed"
		);
		for (id, scope) in pending {
			let change = OptionChanged {
				owner,
				scope,
				desc: desc.clone(),
				value: value.clone(),
			};
			self.watchers[id.0].watcher.on_option_changed(&change);
		}
	}

	fn find_local(&self, scope: ScopeId, name: &str) -> Option<usize> {
		self.scopes[scope.0]
			.locals
			.iter()
			.position(|entry| entry.name() == name)
	}

	fn not_found(&self, scope: ScopeId, name: &str) -> OptionError {
		let suggestion = self
			.flatten(scope)
			.into_iter()
			.filter(|entry| !entry.flags().contains(OptionFlags::HIDDEN))
			.map(|entry| entry.name().to_string())
			.min_by_key(|candidate| strsim::levenshtein(name, candidate))
			.filter(|candidate| strsim::levenshtein(name, candidate) <= 3);
		OptionError::NotFound {
			name: name.to_string(),
			suggestion,
		}
	}

	fn scope(&self, id: ScopeId) -> &Scope {
		self.scopes.get(id.0).expect("stale scope id")
	}
}
