//! Procedural macros for Lodestone.
//!
//! Provides a single attribute macro:
//! * `#[capability]` - registers a trait as a capability and generates its
//!   placeholder adapter

use proc_macro::TokenStream;

/// Capability attribute implementation.
mod capability;
mod signature;

/// Declares a trait as a capability that placeholders can stand in for.
///
/// The trait is emitted unchanged (minus `#[stub(...)]` helper attributes),
/// together with:
/// * a static `CapabilityType` descriptor listing every operation that takes a
///   receiver, in declaration order, and the capabilities it extends
/// * `impl Capability for dyn Trait`, tying the trait object to its descriptor
/// * `impl Trait for Stub`, where each operation dispatches into the stub's
///   synthesized definition and fails
///
/// ```ignore
/// #[capability]
/// pub trait KeyCode: CatalogType + Send + Sync {
///     fn code(&self) -> u32;
///     fn rebind(&self, code: u32) -> Result<(), BindError>;
/// }
/// ```
///
/// Operations returning a `Result` fail with `Err(StubFailure.into())`, so the
/// error type must implement `From<StubFailure>` (`std::io::Error` does). All
/// other operations raise the failure as an unwind payload.
///
/// # Attributes
///
/// - `crate = path` - Optional: path to the runtime crate (default `::lodestone_stub`)
/// - `name = "Name"` - Optional: display name used in diagnostics (default: trait name)
///
/// # Method attributes
///
/// - `#[stub(inherit)]` - keep the trait's default body on placeholders; the
///   method is then not an operation of the capability
/// - `#[stub(raise)]` - unwind even though the method returns a `Result`, for
///   error types without a `From<StubFailure>` conversion
///
/// `#[cfg(..)]` on a method applies to its operation entry as well as to the
/// generated body.
#[proc_macro_attribute]
pub fn capability(attr: TokenStream, item: TokenStream) -> TokenStream {
	capability::capability(attr, item)
}
