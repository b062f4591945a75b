//! Process-lifetime cache of synthesized definitions.
//!
//! Lookups read an [`ArcSwap`] snapshot and never take a lock. Each capability
//! owns a slot whose mutex serialises its synthesis, so concurrent first
//! requests for one capability wait for a single synthesis while requests for
//! other capabilities proceed. Entries are never evicted.

use std::sync::{Arc, OnceLock};

use arc_swap::ArcSwap;
use parking_lot::Mutex;
use rustc_hash::FxHashMap as HashMap;

use crate::capability::{CapabilityKey, CapabilityType};
use crate::error::SynthesisError;
use crate::synth::{ImplementationDef, Synthesize, Synthesizer};

#[derive(Default)]
struct Slot {
	definition: OnceLock<Arc<ImplementationDef>>,
	synthesis: Mutex<()>,
}

/// Memoizes one [`ImplementationDef`] per capability.
pub struct ImplementationCache<S = Synthesizer> {
	synthesizer: S,
	slots: ArcSwap<HashMap<CapabilityKey, Arc<Slot>>>,
	/// Serialises slot insertion; readers only load the snapshot.
	insert: Mutex<()>,
}

impl ImplementationCache {
	/// Creates a cache backed by the default [`Synthesizer`].
	pub fn new() -> Self {
		Self::with_synthesizer(Synthesizer::new())
	}
}

impl Default for ImplementationCache {
	fn default() -> Self {
		Self::new()
	}
}

impl<S: Synthesize> ImplementationCache<S> {
	pub fn with_synthesizer(synthesizer: S) -> Self {
		Self {
			synthesizer,
			slots: ArcSwap::from_pointee(HashMap::default()),
			insert: Mutex::new(()),
		}
	}

	pub fn synthesizer(&self) -> &S {
		&self.synthesizer
	}

	/// Returns the cached definition for `capability` without synthesizing.
	pub fn get(&self, capability: &'static CapabilityType) -> Option<Arc<ImplementationDef>> {
		let slots = self.slots.load();
		slots.get(&capability.key())?.definition.get().cloned()
	}

	/// Returns the definition for `capability`, synthesizing it on first use.
	///
	/// A failed synthesis is not cached; the next request tries again.
	pub fn get_or_create(
		&self,
		capability: &'static CapabilityType,
	) -> Result<Arc<ImplementationDef>, SynthesisError> {
		let slot = self.slot(capability);
		if let Some(definition) = slot.definition.get() {
			tracing::trace!("Placeholder cache hit for {}", capability.path);
			return Ok(Arc::clone(definition));
		}

		let _synthesis = slot.synthesis.lock();
		if let Some(definition) = slot.definition.get() {
			return Ok(Arc::clone(definition));
		}

		match self.synthesizer.synthesize(capability) {
			Ok(definition) => {
				let definition = slot.definition.get_or_init(|| Arc::new(definition));
				Ok(Arc::clone(definition))
			}
			Err(err) => {
				tracing::warn!("Placeholder synthesis failed for {}: {}", capability.path, err);
				Err(err)
			}
		}
	}

	/// Returns the number of cached definitions.
	pub fn len(&self) -> usize {
		self.slots
			.load()
			.values()
			.filter(|slot| slot.definition.get().is_some())
			.count()
	}

	pub fn is_empty(&self) -> bool {
		self.len() == 0
	}

	fn slot(&self, capability: &'static CapabilityType) -> Arc<Slot> {
		let key = capability.key();
		if let Some(slot) = self.slots.load().get(&key) {
			return Arc::clone(slot);
		}

		let _insert = self.insert.lock();
		let current = self.slots.load_full();
		if let Some(slot) = current.get(&key) {
			return Arc::clone(slot);
		}
		let slot = Arc::new(Slot::default());
		let mut next = (*current).clone();
		next.insert(key, Arc::clone(&slot));
		self.slots.store(Arc::new(next));
		slot
	}
}
