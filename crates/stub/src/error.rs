use thiserror::Error;

/// Errors that prevent a placeholder implementation from being synthesized.
///
/// These indicate a defect in how a capability is described, not a transient
/// condition; they are never retried into success.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SynthesisError {
	/// The descriptor names a concrete type with no abstract surface.
	#[error("capability `{capability}` is a concrete type; placeholders can only implement abstract capabilities")]
	NotAbstract { capability: &'static str },
	/// One capability declares two operations with the same name.
	#[error("capability `{capability}` declares operation `{operation}` more than once")]
	DuplicateOperation {
		capability: &'static str,
		operation: &'static str,
	},
	/// An operation has an empty name.
	#[error("capability `{capability}` declares an operation without a name")]
	MalformedOperation { capability: &'static str },
}
