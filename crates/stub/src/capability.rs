//! Capability descriptors.
//!
//! A [`CapabilityType`] is the runtime description of a capability trait: its
//! display name, its instance operations in declaration order and the
//! capabilities it extends. Descriptors are `static` items emitted by
//! `#[capability]`; the address of the static is the capability's identity.

use std::fmt;
use std::sync::Arc;

use crate::Stub;

/// Whether a capability can be implemented by a placeholder.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CapabilityKind {
	/// A trait surface; every operation can be supplied by a placeholder.
	Abstract,
	/// A concrete type with no abstract surface.
	Concrete,
}

/// One instance-level operation of a capability.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Operation {
	/// Display name of the capability that declares the operation.
	pub owner: &'static str,
	/// Method name.
	pub name: &'static str,
	/// Receiver as written (`&self`, `&mut self`, `self: Box<Self>`).
	pub receiver: &'static str,
	/// Parameter types in order, excluding the receiver.
	pub params: &'static [&'static str],
	/// Return type as written; `()` when the method returns nothing.
	pub output: &'static str,
	/// Whether the operation returns a `Result` and therefore fails with `Err`.
	pub fallible: bool,
}

impl Operation {
	/// Address of the descriptor, unique per declared operation.
	pub(crate) fn key(&'static self) -> usize {
		std::ptr::from_ref(self) as usize
	}
}

impl fmt::Display for Operation {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		write!(f, "{}::{}(", self.owner, self.name)?;
		let mut first = true;
		if !self.receiver.is_empty() {
			f.write_str(self.receiver)?;
			first = false;
		}
		for param in self.params {
			if !first {
				f.write_str(", ")?;
			}
			f.write_str(param)?;
			first = false;
		}
		f.write_str(")")?;
		if self.output != "()" {
			write!(f, " -> {}", self.output)?;
		}
		Ok(())
	}
}

/// Runtime descriptor of a capability.
pub struct CapabilityType {
	/// Display name used in diagnostics.
	pub name: &'static str,
	/// Fully qualified path of the declaring item.
	pub path: &'static str,
	pub kind: CapabilityKind,
	/// Operations declared directly on this capability, in declaration order.
	pub operations: &'static [Operation],
	/// Capabilities this one extends, in declaration order.
	pub extends: &'static [fn() -> &'static CapabilityType],
}

impl CapabilityType {
	/// Describes a concrete type. Scanning it yields no operations and
	/// synthesizing a placeholder for it fails.
	pub const fn concrete(name: &'static str, path: &'static str) -> Self {
		Self {
			name,
			path,
			kind: CapabilityKind::Concrete,
			operations: &[],
			extends: &[],
		}
	}

	/// Returns the identity of this descriptor.
	#[inline]
	pub fn key(&'static self) -> CapabilityKey {
		CapabilityKey(std::ptr::from_ref(self) as usize)
	}

	#[inline]
	pub fn is_abstract(&self) -> bool {
		self.kind == CapabilityKind::Abstract
	}

	/// Returns the directly extended capabilities.
	pub fn extended(&self) -> impl Iterator<Item = &'static CapabilityType> + '_ {
		self.extends.iter().map(|capability| capability())
	}
}

impl fmt::Debug for CapabilityType {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.debug_struct("CapabilityType")
			.field("path", &self.path)
			.field("kind", &self.kind)
			.field("operations", &self.operations.len())
			.field(
				"extends",
				&self.extended().map(|parent| parent.name).collect::<Vec<_>>(),
			)
			.finish()
	}
}

impl fmt::Display for CapabilityType {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str(self.path)
	}
}

/// Identity of a [`CapabilityType`], used as the cache key.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct CapabilityKey(usize);

/// Links a capability trait object type to its descriptor and adapter.
///
/// Implemented by `#[capability]` for `dyn Trait`. Every parameterization of a
/// generic capability shares one descriptor.
pub trait Capability {
	/// Returns the descriptor of this capability.
	fn capability() -> &'static CapabilityType;

	/// Exposes a placeholder as this capability.
	fn adapt(stub: Stub) -> Arc<Self>;
}
