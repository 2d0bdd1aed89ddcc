//! Typed option payloads.
//!
//! The payload layer is a closed set of variants behind one capability
//! surface: clone, compare, stringify ([`core::fmt::Display`]) and parse
//! ([`parse_value_for_type`]), dispatched on the [`OptionType`] tag carried
//! by the option's descriptor.

/// The type of an option's value.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OptionType {
	Bool,
	Int,
	String,
}

impl OptionType {
	/// Returns a human-readable name for this type.
	pub fn name(self) -> &'static str {
		match self {
			OptionType::Bool => "bool",
			OptionType::Int => "int",
			OptionType::String => "string",
		}
	}
}

/// A concrete option value.
#[derive(Debug, Clone, PartialEq)]
pub enum OptionValue {
	/// Boolean value (true/false).
	Bool(bool),
	/// Integer value.
	Int(i64),
	/// String value.
	String(String),
}

impl OptionValue {
	/// Returns the boolean value if this is a `Bool` variant.
	pub fn as_bool(&self) -> Option<bool> {
		match self {
			OptionValue::Bool(v) => Some(*v),
			_ => None,
		}
	}

	/// Returns the integer value if this is an `Int` variant.
	pub fn as_int(&self) -> Option<i64> {
		match self {
			OptionValue::Int(v) => Some(*v),
			_ => None,
		}
	}

	/// Returns the string value if this is a `String` variant.
	pub fn as_str(&self) -> Option<&str> {
		match self {
			OptionValue::String(v) => Some(v),
			_ => None,
		}
	}

	/// Returns true if this value matches the given type.
	pub fn matches_type(&self, ty: OptionType) -> bool {
		matches!(
			(self, ty),
			(OptionValue::Bool(_), OptionType::Bool)
				| (OptionValue::Int(_), OptionType::Int)
				| (OptionValue::String(_), OptionType::String)
		)
	}

	/// Returns the type name of this value.
	pub fn type_name(&self) -> &'static str {
		match self {
			OptionValue::Bool(_) => "bool",
			OptionValue::Int(_) => "int",
			OptionValue::String(_) => "string",
		}
	}
}

impl core::fmt::Display for OptionValue {
	fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
		match self {
			OptionValue::Bool(v) => write!(f, "{v}"),
			OptionValue::Int(v) => write!(f, "{v}"),
			OptionValue::String(v) => f.write_str(v),
		}
	}
}

impl From<bool> for OptionValue {
	fn from(v: bool) -> Self {
		OptionValue::Bool(v)
	}
}

impl From<i64> for OptionValue {
	fn from(v: i64) -> Self {
		OptionValue::Int(v)
	}
}

impl From<String> for OptionValue {
	fn from(v: String) -> Self {
		OptionValue::String(v)
	}
}

impl From<&str> for OptionValue {
	fn from(v: &str) -> Self {
		OptionValue::String(v.to_string())
	}
}

/// Parse a string value into an [`OptionValue`] for a known type.
pub fn parse_value_for_type(value: &str, ty: OptionType) -> std::result::Result<OptionValue, String> {
	match ty {
		OptionType::Bool => parse_bool(value).map(OptionValue::Bool),
		OptionType::Int => parse_int(value).map(OptionValue::Int),
		OptionType::String => Ok(OptionValue::String(value.to_string())),
	}
}

/// Parse a boolean value from common string representations.
pub fn parse_bool(value: &str) -> std::result::Result<bool, String> {
	match value.to_lowercase().as_str() {
		"true" | "1" | "yes" | "on" => Ok(true),
		"false" | "0" | "no" | "off" => Ok(false),
		_ => Err(format!(
			"invalid boolean: '{value}' (expected true/false, yes/no, on/off, 1/0)"
		)),
	}
}

/// Parse an integer value.
pub fn parse_int(value: &str) -> std::result::Result<i64, String> {
	value
		.parse::<i64>()
		.map_err(|_| format!("invalid integer: '{value}'"))
}

#[cfg(test)]
mod tests {
	use pretty_assertions::assert_eq;

	use super::*;

	#[test]
	fn parse_bool_accepts_common_spellings() {
		assert_eq!(parse_bool("true"), Ok(true));
		assert_eq!(parse_bool("ON"), Ok(true));
		assert_eq!(parse_bool("0"), Ok(false));
		assert_eq!(parse_bool("no"), Ok(false));
		assert!(parse_bool("maybe").is_err());
	}

	#[test]
	fn parse_for_type_dispatches_on_tag() {
		assert_eq!(
			parse_value_for_type("42", OptionType::Int),
			Ok(OptionValue::Int(42))
		);
		assert_eq!(
			parse_value_for_type("42", OptionType::String),
			Ok(OptionValue::String("42".to_string()))
		);
		assert!(parse_value_for_type("forty-two", OptionType::Int).is_err());
	}

	#[test]
	fn display_round_trips_through_parse() {
		let value = OptionValue::Int(-7);
		let parsed = parse_value_for_type(&value.to_string(), OptionType::Int).unwrap();
		assert_eq!(parsed, value);
	}

	#[test]
	fn type_checks() {
		assert!(OptionValue::Bool(true).matches_type(OptionType::Bool));
		assert!(!OptionValue::Int(1).matches_type(OptionType::Bool));
		assert_eq!(OptionValue::String(String::new()).type_name(), "string");
		assert_eq!(OptionType::Int.name(), "int");
	}
}
