//! Scoped, overridable option store.
//!
//! Options live in a tree of scopes (global → per-document → per-view).
//! Reads fall back through ancestor scopes; the first local write at a scope
//! materializes a shadowing copy without touching the ancestor. Watchers
//! registered at any scope observe changes to the options that are effective
//! there: a change at an ancestor is suppressed for every subtree that has
//! already overridden the name, because from those scopes' perspective the
//! effective value did not move.
//!
//! The engine owns scoping, ownership, and notification only. What a value
//! *means* is the concern of the payload layer in [`value`]: a closed set of
//! typed variants with parse/stringify/compare capabilities, validated per
//! descriptor on every write.

mod desc;
mod entry;
mod error;
mod store;
mod value;
mod watcher;

pub use desc::{OptionDesc, OptionFlags, OptionValidator};
pub use entry::OptionEntry;
pub use error::{OptionError, Result};
pub use store::{OptionStore, ScopeId};
pub use value::{OptionType, OptionValue, parse_bool, parse_int, parse_value_for_type};
pub use watcher::{OptionChanged, OptionWatcher, WatcherId};
