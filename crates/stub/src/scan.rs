//! Capability scanning.

use rustc_hash::FxHashSet;

use crate::capability::{CapabilityKey, CapabilityType, Operation};

/// Returns every instance operation a placeholder for `capability` must
/// provide: its own operations in declaration order, followed depth first by
/// those of each extended capability.
///
/// A capability reached through more than one path is visited once, so each
/// declared operation appears exactly once. Operations of distinct
/// capabilities that share a display name are all listed. Concrete
/// descriptors contribute nothing.
pub fn scan(capability: &'static CapabilityType) -> Vec<&'static Operation> {
	let mut operations = Vec::new();
	walk(capability, |visited| operations.extend(visited.operations));
	operations
}

/// Visits each abstract capability reachable from `capability` once, in scan order.
pub(crate) fn walk(capability: &'static CapabilityType, mut f: impl FnMut(&'static CapabilityType)) {
	let mut visited = FxHashSet::default();
	walk_inner(capability, &mut visited, &mut f);
}

fn walk_inner(
	capability: &'static CapabilityType,
	visited: &mut FxHashSet<CapabilityKey>,
	f: &mut impl FnMut(&'static CapabilityType),
) {
	if !capability.is_abstract() || !visited.insert(capability.key()) {
		return;
	}
	f(capability);
	for parent in capability.extended() {
		walk_inner(parent, visited, f);
	}
}
