//! Failures raised by placeholder operations.

use std::any::type_name;
use std::error::Error;
use std::fmt;
use std::panic::{self, AssertUnwindSafe};
use std::sync::Arc;

use thiserror::Error;

use crate::capability::Operation;

/// Error category raised by every operation of a placeholder.
///
/// Implementors are constructed from the full diagnostic message.
pub trait FailureKind: Error + Send + Sync + 'static {
	/// Builds the failure from a diagnostic message.
	fn from_diagnostic(message: String) -> Self
	where
		Self: Sized;
}

/// Default failure kind: the operation is not supported by a placeholder.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("{message}")]
pub struct UnsupportedOperation {
	message: String,
}

impl UnsupportedOperation {
	pub fn message(&self) -> &str {
		&self.message
	}
}

impl FailureKind for UnsupportedOperation {
	fn from_diagnostic(message: String) -> Self {
		Self { message }
	}
}

/// Type-erased constructor for a [`FailureKind`].
#[derive(Clone, Copy)]
pub struct FailureInfo {
	kind: &'static str,
	construct: fn(String) -> Box<dyn Error + Send + Sync>,
}

impl FailureInfo {
	/// Captures the constructor of `F`.
	pub fn of<F: FailureKind>() -> Self {
		Self {
			kind: type_name::<F>(),
			construct: construct::<F>,
		}
	}

	/// Returns the type name of the failure kind.
	#[inline]
	pub fn kind(&self) -> &'static str {
		self.kind
	}

	pub(crate) fn construct(&self, message: String) -> Box<dyn Error + Send + Sync> {
		(self.construct)(message)
	}
}

fn construct<F: FailureKind>(message: String) -> Box<dyn Error + Send + Sync> {
	Box::new(F::from_diagnostic(message))
}

impl Default for FailureInfo {
	fn default() -> Self {
		Self::of::<UnsupportedOperation>()
	}
}

impl fmt::Debug for FailureInfo {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.debug_tuple("FailureInfo").field(&self.kind).finish()
	}
}

/// A failure produced by calling an operation on a placeholder.
///
/// Wraps the [`FailureKind`] value chosen when the placeholder's definition was
/// synthesized. Operations returning a `Result` return it converted into their
/// error type; all other operations unwind with it as the panic payload, which
/// [`catch`] turns back into an `Err`.
#[derive(Error, Debug)]
#[error("{failure}")]
pub struct StubFailure {
	kind: &'static str,
	operation: &'static Operation,
	symbolic_name: Arc<str>,
	failure: Box<dyn Error + Send + Sync>,
}

impl StubFailure {
	pub(crate) fn new(
		kind: &'static str,
		operation: &'static Operation,
		symbolic_name: Arc<str>,
		failure: Box<dyn Error + Send + Sync>,
	) -> Self {
		Self {
			kind,
			operation,
			symbolic_name,
			failure,
		}
	}

	/// Returns the type name of the failure kind.
	pub fn kind(&self) -> &'static str {
		self.kind
	}

	/// Returns the operation that was invoked.
	pub fn operation(&self) -> &'static Operation {
		self.operation
	}

	/// Returns the symbolic name of the placeholder that was touched.
	pub fn symbolic_name(&self) -> &str {
		&self.symbolic_name
	}

	/// Returns the full diagnostic message.
	pub fn message(&self) -> String {
		self.failure.to_string()
	}

	/// Returns the failure as its concrete kind, if it is an `F`.
	pub fn downcast_ref<F: FailureKind>(&self) -> Option<&F> {
		self.failure.downcast_ref::<F>()
	}

	/// Unwraps the failure value.
	pub fn into_failure(self) -> Box<dyn Error + Send + Sync> {
		self.failure
	}
}

/// Lets operations returning `io::Result` fail with `Err`. The failure is kept
/// as the inner error and can be recovered with `io::Error::into_inner`.
impl From<StubFailure> for std::io::Error {
	fn from(failure: StubFailure) -> Self {
		std::io::Error::other(failure)
	}
}

/// Runs `f`, converting a placeholder failure raised inside it into `Err`.
///
/// Panics that do not carry a [`StubFailure`] are resumed unchanged.
pub fn catch<T>(f: impl FnOnce() -> T) -> Result<T, StubFailure> {
	match panic::catch_unwind(AssertUnwindSafe(f)) {
		Ok(value) => Ok(value),
		Err(payload) => match payload.downcast::<StubFailure>() {
			Ok(failure) => Err(*failure),
			Err(payload) => panic::resume_unwind(payload),
		},
	}
}
