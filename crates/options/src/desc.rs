use crate::value::{OptionType, OptionValue};

bitflags::bitflags! {
	/// Behavior flags attached to an option descriptor.
	#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
	pub struct OptionFlags: u32 {
		/// Never offered by name completion.
		const HIDDEN = 1 << 0;
		/// Rejects writes through the public setter.
		const READ_ONLY = 1 << 1;
	}
}

/// Per-value validation hook, run on every write.
pub type OptionValidator = fn(&OptionValue) -> std::result::Result<(), String>;

/// Definition of a configurable option.
///
/// Descriptors are immutable and interned: the store wraps each one in an
/// `Arc` at declaration time, and every scope-local copy of the option shares
/// that same allocation. An option's identity across scopes is its `name`,
/// not any particular descriptor pointer.
pub struct OptionDesc {
	name: String,
	docstring: String,
	flags: OptionFlags,
	value_type: OptionType,
	validator: Option<OptionValidator>,
}

impl OptionDesc {
	pub fn new(
		name: impl Into<String>,
		docstring: impl Into<String>,
		flags: OptionFlags,
		value_type: OptionType,
	) -> Self {
		Self {
			name: name.into(),
			docstring: docstring.into(),
			flags,
			value_type,
			validator: None,
		}
	}

	/// Attaches a validation hook checked on every write.
	pub fn with_validator(mut self, validator: OptionValidator) -> Self {
		self.validator = Some(validator);
		self
	}

	pub fn name(&self) -> &str {
		&self.name
	}

	pub fn docstring(&self) -> &str {
		&self.docstring
	}

	pub fn flags(&self) -> OptionFlags {
		self.flags
	}

	pub fn value_type(&self) -> OptionType {
		self.value_type
	}

	pub fn validator(&self) -> Option<OptionValidator> {
		self.validator
	}
}

impl PartialEq for OptionDesc {
	/// Descriptor identity is the option name; docstring and flags are
	/// scope-invariant metadata.
	fn eq(&self, other: &Self) -> bool {
		self.name == other.name
	}
}

impl Eq for OptionDesc {}

impl core::fmt::Debug for OptionDesc {
	fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
		f.debug_struct("OptionDesc")
			.field("name", &self.name)
			.field("flags", &self.flags)
			.field("value_type", &self.value_type)
			.finish()
	}
}
