//! Catalog constants declared as statics and filled with placeholders until a
//! registry supplies their real values.

use std::sync::{Arc, LazyLock};

use lodestone_stub::{Capability, capability, catch, factory};

// Dependencies of the library that this test does not use directly.
use arc_swap as _;
use lodestone_macros as _;
use parking_lot as _;
use pretty_assertions as _;
use rstest as _;
use rustc_hash as _;
use thiserror as _;
use tracing as _;

#[capability]
pub trait ChunkState: Send + Sync {
	fn is_loaded(&self) -> bool;
	fn light_level(&self, x: i32, z: i32) -> u8;
}

pub mod chunk_states {
	use super::*;

	pub static EMPTY: LazyLock<Arc<dyn ChunkState>> =
		LazyLock::new(|| lodestone_stub::create_for("EMPTY"));
	pub static FULL: LazyLock<Arc<dyn ChunkState>> =
		LazyLock::new(|| lodestone_stub::create_for("FULL"));
}

#[test]
fn test_constant_resolves_to_one_placeholder() {
	let first = Arc::clone(&*chunk_states::EMPTY);
	let second = Arc::clone(&*chunk_states::EMPTY);
	assert!(Arc::ptr_eq(&first, &second));
}

#[test]
fn test_early_access_names_the_constant() {
	let failure = catch(|| chunk_states::FULL.light_level(0, 16)).unwrap_err();
	assert_eq!(failure.symbolic_name(), "FULL");
	assert!(
		failure
			.message()
			.ends_with("Operation: ChunkState::light_level(&self, i32, i32) -> u8")
	);

	let failure = catch(|| chunk_states::EMPTY.is_loaded()).unwrap_err();
	assert_eq!(failure.symbolic_name(), "EMPTY");
}

#[test]
fn test_constants_share_the_cached_definition() {
	let _ = LazyLock::force(&chunk_states::EMPTY);
	let _ = LazyLock::force(&chunk_states::FULL);

	let definition = factory()
		.cache()
		.get(<dyn ChunkState>::capability())
		.expect("definition is cached after first use");
	assert_eq!(definition.len(), 2);
	assert!(definition.name().ends_with("ChunkState$Stub"));
}

#[test]
fn test_descriptor_path_is_module_qualified() {
	let capability = <dyn ChunkState>::capability();
	assert_eq!(capability.name, "ChunkState");
	assert!(capability.path.ends_with("::ChunkState"));
	assert_eq!(capability.to_string(), capability.path);
}
