//! Placeholder synthesis.
//!
//! A [`Synthesizer`] turns a capability descriptor into an
//! [`ImplementationDef`]: a dispatch table holding one failing body per scanned
//! operation, plus the failure kind those bodies raise. The definition is
//! independent of any symbolic name; [`ImplementationDef::instantiate`] binds one.

use std::borrow::Cow;
use std::fmt;
use std::sync::Arc;

use rustc_hash::{FxHashMap, FxHashSet};

use crate::capability::{CapabilityType, Operation};
use crate::error::SynthesisError;
use crate::failure::{FailureInfo, FailureKind, StubFailure};
use crate::scan::{scan, walk};
use crate::stub::Stub;

/// Builds implementation definitions for capabilities.
pub trait Synthesize: Send + Sync {
	/// Synthesizes a placeholder implementation for `capability`.
	fn synthesize(
		&self,
		capability: &'static CapabilityType,
	) -> Result<ImplementationDef, SynthesisError>;
}

/// Default [`Synthesize`] implementation.
#[derive(Debug, Clone, Copy, Default)]
pub struct Synthesizer {
	failure: FailureInfo,
}

impl Synthesizer {
	/// Creates a synthesizer whose placeholders raise [`UnsupportedOperation`](crate::UnsupportedOperation).
	pub fn new() -> Self {
		Self::default()
	}

	/// Creates a synthesizer whose placeholders raise `F`.
	pub fn failing_with<F: FailureKind>() -> Self {
		Self::with_failure(FailureInfo::of::<F>())
	}

	pub fn with_failure(failure: FailureInfo) -> Self {
		Self { failure }
	}

	pub fn failure(&self) -> FailureInfo {
		self.failure
	}
}

impl Synthesize for Synthesizer {
	fn synthesize(
		&self,
		capability: &'static CapabilityType,
	) -> Result<ImplementationDef, SynthesisError> {
		if !capability.is_abstract() {
			return Err(SynthesisError::NotAbstract {
				capability: capability.path,
			});
		}

		let mut invalid = None;
		walk(capability, |visited| {
			if invalid.is_none() {
				invalid = validate(visited).err();
			}
		});
		if let Some(err) = invalid {
			return Err(err);
		}

		let bodies: Vec<OperationBody> = scan(capability)
			.into_iter()
			.map(|operation| OperationBody {
				operation,
				signature: operation.to_string().into_boxed_str(),
			})
			.collect();
		let index = bodies
			.iter()
			.enumerate()
			.map(|(slot, body)| (body.operation.key(), slot))
			.collect();

		tracing::debug!(
			"Synthesized placeholder for {}: {} operations, failing with {}",
			capability.path,
			bodies.len(),
			self.failure.kind()
		);

		Ok(ImplementationDef {
			name: format!("{}$Stub", capability.path),
			capability,
			failure: self.failure,
			bodies,
			index,
		})
	}
}

/// Checks the operations a single capability declares itself.
fn validate(capability: &'static CapabilityType) -> Result<(), SynthesisError> {
	let mut names = FxHashSet::default();
	for operation in capability.operations {
		if operation.name.is_empty() {
			return Err(SynthesisError::MalformedOperation {
				capability: capability.path,
			});
		}
		if !names.insert(operation.name) {
			return Err(SynthesisError::DuplicateOperation {
				capability: capability.path,
				operation: operation.name,
			});
		}
	}
	Ok(())
}

/// Failing body for one operation, with its signature rendered once.
struct OperationBody {
	operation: &'static Operation,
	signature: Box<str>,
}

/// A synthesized placeholder implementation of one capability.
///
/// Immutable once built and shared by every [`Stub`] instantiated from it.
pub struct ImplementationDef {
	name: String,
	capability: &'static CapabilityType,
	failure: FailureInfo,
	bodies: Vec<OperationBody>,
	index: FxHashMap<usize, usize>,
}

impl ImplementationDef {
	/// Returns the generated implementation name (`<capability path>$Stub`).
	pub fn name(&self) -> &str {
		&self.name
	}

	pub fn capability(&self) -> &'static CapabilityType {
		self.capability
	}

	/// Returns the type name of the failure kind raised by every operation.
	pub fn failure_kind(&self) -> &'static str {
		self.failure.kind()
	}

	/// Returns the implemented operations in scan order.
	pub fn operations(&self) -> impl ExactSizeIterator<Item = &'static Operation> + '_ {
		self.bodies.iter().map(|body| body.operation)
	}

	pub fn len(&self) -> usize {
		self.bodies.len()
	}

	pub fn is_empty(&self) -> bool {
		self.bodies.is_empty()
	}

	/// Creates a placeholder carrying `name` for diagnostics.
	pub fn instantiate(self: &Arc<Self>, name: impl Into<Arc<str>>) -> Stub {
		Stub::new(name.into(), Arc::clone(self))
	}

	/// Runs the failing body of `operation` for the placeholder named `name`.
	pub(crate) fn invoke(&self, operation: &'static Operation, name: &Arc<str>) -> StubFailure {
		let signature = match self.index.get(&operation.key()) {
			Some(&slot) => Cow::Borrowed(&*self.bodies[slot].signature),
			None => {
				tracing::warn!(
					"Operation {} is not part of {}; placeholder {} was used through another capability",
					operation,
					self.capability.path,
					name
				);
				Cow::Owned(operation.to_string())
			}
		};
		let message = diagnostic(name, self.capability.name, &signature);
		StubFailure::new(
			self.failure.kind(),
			operation,
			Arc::clone(name),
			self.failure.construct(message),
		)
	}
}

impl fmt::Debug for ImplementationDef {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.debug_struct("ImplementationDef")
			.field("name", &self.name)
			.field("failure", &self.failure)
			.field(
				"operations",
				&self.bodies.iter().map(|body| &*body.signature).collect::<Vec<_>>(),
			)
			.finish()
	}
}

fn diagnostic(name: &str, capability: &str, signature: &str) -> String {
	format!(
		"A call was made on a placeholder instance before its real value was initialized \
		 (placeholder `{name}` of capability `{capability}`).\nOperation: {signature}"
	)
}

#[cfg(test)]
mod tests;
