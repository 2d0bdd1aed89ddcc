//! Recoverable errors of the option engine.
//!
//! Only name-resolution and value-shape problems are recoverable; lifecycle
//! bugs (duplicate watcher registration, removing a scope that still has
//! children or watchers) are panics, since they indicate a broken caller
//! rather than bad user input.

use thiserror::Error;

pub type Result<T> = std::result::Result<T, OptionError>;

/// Errors surfaced to the command/UI layer.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum OptionError {
	/// The name is not declared anywhere in the scope's ancestor chain.
	#[error("option not found: {name}{}", suggestion.as_ref().map(|s| format!(" (did you mean '{s}'?)")).unwrap_or_default())]
	NotFound {
		/// The unresolved option name.
		name: String,
		/// A visible option name close enough to suggest, if any.
		suggestion: Option<String>,
	},

	/// A value does not match the option's declared type.
	#[error("type mismatch for option '{option}': expected {expected}, got {got}")]
	TypeMismatch {
		option: String,
		expected: &'static str,
		got: &'static str,
	},

	/// A value was rejected by the option's validator or failed to parse.
	#[error("invalid value for option '{option}': {reason}")]
	InvalidValue { option: String, reason: String },

	/// The option is flagged read-only.
	#[error("option '{0}' is read-only")]
	ReadOnly(String),

	/// Unset was asked to drop an override the scope does not have.
	#[error("option '{name}' has no local value at this scope")]
	NotLocal { name: String },

	/// Unset at the root would drop the declaration itself.
	#[error("cannot unset '{0}' at the root scope")]
	UnsetAtRoot(String),
}
