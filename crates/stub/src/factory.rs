//! Placeholder creation.

use std::sync::{Arc, LazyLock};

use crate::cache::ImplementationCache;
use crate::capability::{Capability, CapabilityType};
use crate::error::SynthesisError;
use crate::stub::Stub;
use crate::synth::{Synthesize, Synthesizer};

/// Creates placeholders, synthesizing each capability's definition once.
pub struct StubFactory<S = Synthesizer> {
	cache: ImplementationCache<S>,
}

impl StubFactory {
	pub fn new() -> Self {
		Self::with_synthesizer(Synthesizer::new())
	}
}

impl Default for StubFactory {
	fn default() -> Self {
		Self::new()
	}
}

impl<S: Synthesize> StubFactory<S> {
	pub fn with_synthesizer(synthesizer: S) -> Self {
		Self {
			cache: ImplementationCache::with_synthesizer(synthesizer),
		}
	}

	pub fn cache(&self) -> &ImplementationCache<S> {
		&self.cache
	}

	/// Creates a placeholder for a capability descriptor.
	pub fn create_stub(
		&self,
		capability: &'static CapabilityType,
		name: impl Into<Arc<str>>,
	) -> Result<Stub, SynthesisError> {
		let definition = self.cache.get_or_create(capability)?;
		Ok(definition.instantiate(name))
	}

	/// Creates a placeholder exposed as the capability `C`.
	pub fn create<C: ?Sized + Capability>(
		&self,
		name: impl Into<Arc<str>>,
	) -> Result<Arc<C>, SynthesisError> {
		self.create_stub(C::capability(), name).map(C::adapt)
	}
}

static FACTORY: LazyLock<StubFactory> = LazyLock::new(StubFactory::new);

/// Returns the process-wide factory used by [`create_for`].
pub fn factory() -> &'static StubFactory {
	&FACTORY
}

/// Creates a placeholder for `C` on the process-wide factory.
pub fn try_create_for<C: ?Sized + Capability>(
	name: impl Into<Arc<str>>,
) -> Result<Arc<C>, SynthesisError> {
	factory().create::<C>(name)
}

/// Creates a placeholder for `C` on the process-wide factory.
///
/// ```ignore
/// pub static KEY_0: LazyLock<Arc<dyn KeyCode>> =
///     LazyLock::new(|| lodestone_stub::create_for("KEY_0"));
/// ```
///
/// # Panics
///
/// Panics if `C` cannot be synthesized. That is a defect in the capability's
/// description and aborts the bootstrap path that requested it.
pub fn create_for<C: ?Sized + Capability>(name: impl Into<Arc<str>>) -> Arc<C> {
	let name = name.into();
	match try_create_for::<C>(Arc::clone(&name)) {
		Ok(stub) => stub,
		Err(err) => {
			tracing::error!("Cannot create placeholder {}: {}", name, err);
			panic!("cannot create placeholder `{name}`: {err}")
		}
	}
}

/// Creates a placeholder typed as a parameterized view of a capability.
///
/// Every parameterization of a generic capability (`dyn Key<u32>`,
/// `dyn Key<String>`) shares one descriptor and therefore one cached
/// definition; only the static type of the result differs.
///
/// # Panics
///
/// As [`create_for`].
pub fn create_extended_for<E: ?Sized + Capability>(name: impl Into<Arc<str>>) -> Arc<E> {
	create_for::<E>(name)
}

#[cfg(test)]
mod tests;
