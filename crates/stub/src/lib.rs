//! Placeholder implementations for capability traits.
//!
//! Catalog constants (key codes, chunk states, data keys) are declared as
//! statics long before the registry that supplies their real values has run.
//! This crate fills those slots with placeholders: objects that implement the
//! capability trait but fail every operation with a diagnostic naming both the
//! operation and the constant that was touched too early.
//!
//! - [`capability`](macro@capability): attribute declaring a trait as a capability
//! - [`scan`](fn@scan): enumerates the operations a placeholder must provide
//! - [`Synthesizer`]: builds an [`ImplementationDef`] with one failing body per operation
//! - [`ImplementationCache`]: synthesizes each capability at most once
//! - [`StubFactory`]: instantiates definitions with a symbolic name
//!
//! ```ignore
//! #[lodestone_stub::capability]
//! pub trait KeyCode: Send + Sync {
//!     fn code(&self) -> u32;
//! }
//!
//! pub static KEY_0: LazyLock<Arc<dyn KeyCode>> =
//!     LazyLock::new(|| lodestone_stub::create_for("KEY_0"));
//! ```

mod cache;
mod capability;
mod error;
mod factory;
mod failure;
mod scan;
mod stub;
mod synth;

pub use cache::ImplementationCache;
pub use capability::{Capability, CapabilityKey, CapabilityKind, CapabilityType, Operation};
pub use error::SynthesisError;
pub use factory::{StubFactory, create_extended_for, create_for, factory, try_create_for};
pub use failure::{FailureInfo, FailureKind, StubFailure, UnsupportedOperation, catch};
pub use lodestone_macros::capability;
pub use scan::scan;
pub use stub::Stub;
pub use synth::{ImplementationDef, Synthesize, Synthesizer};

#[cfg(test)]
use {pretty_assertions as _, rstest as _};
