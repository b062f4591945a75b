use std::fmt;
use std::sync::Arc;

use crate::capability::{CapabilityType, Operation};
use crate::failure::StubFailure;
use crate::synth::ImplementationDef;

/// A placeholder instance.
///
/// Implements every `#[capability]` trait; each operation fails with a
/// diagnostic naming the operation and this placeholder's symbolic name.
/// Obtain one through [`StubFactory`](crate::StubFactory) or
/// [`ImplementationDef::instantiate`].
#[derive(Clone)]
pub struct Stub {
	name: Arc<str>,
	definition: Arc<ImplementationDef>,
}

impl Stub {
	pub(crate) fn new(name: Arc<str>, definition: Arc<ImplementationDef>) -> Self {
		Self { name, definition }
	}

	/// Returns the symbolic name this placeholder was created with.
	pub fn name(&self) -> &str {
		&self.name
	}

	pub fn capability(&self) -> &'static CapabilityType {
		self.definition.capability()
	}

	/// Returns the definition backing this placeholder.
	pub fn definition(&self) -> &Arc<ImplementationDef> {
		&self.definition
	}

	#[doc(hidden)]
	pub fn __fail(&self, operation: &'static Operation) -> StubFailure {
		self.definition.invoke(operation, &self.name)
	}

	#[doc(hidden)]
	pub fn __raise(&self, operation: &'static Operation) -> ! {
		let failure = self.__fail(operation);
		tracing::error!("{}", failure);
		std::panic::panic_any(failure)
	}

	#[doc(hidden)]
	pub fn __type_level(capability: &'static str, operation: &'static str) -> ! {
		panic!(
			"type-level operation {capability}::{operation} was invoked on a placeholder implementation"
		)
	}
}

impl fmt::Debug for Stub {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.debug_struct("Stub")
			.field("capability", &self.capability().path)
			.field("name", &self.name)
			.finish()
	}
}

impl fmt::Display for Stub {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		write!(f, "{}({})", self.capability().name, self.name)
	}
}
