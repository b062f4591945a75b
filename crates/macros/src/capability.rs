//! `#[capability]` attribute implementation.
//!
//! Scans the trait for its operations and emits the descriptor plus the
//! placeholder adapter. See the crate-level docs for the generated items.

use proc_macro::TokenStream;
use proc_macro2::{Ident, TokenStream as TokenStream2, TokenTree};
use quote::{ToTokens, quote};
use syn::{
	FnArg, ItemTrait, LitStr, Path, TraitBoundModifier, TraitItem, TraitItemFn, TypeParamBound,
	parse_macro_input, parse_quote,
};

use crate::signature::{render_output, render_receiver, render_type, returns_result};

/// Supertraits every placeholder already satisfies; they are not capabilities.
const SATISFIED_BOUNDS: &[&str] = &[
	"Send", "Sync", "Sized", "Unpin", "Any", "Debug", "Display", "Clone",
];

struct CapabilityArgs {
	krate: Path,
	name: Option<LitStr>,
}

impl Default for CapabilityArgs {
	fn default() -> Self {
		Self {
			krate: parse_quote!(::lodestone_stub),
			name: None,
		}
	}
}

/// Entry point for the `#[capability]` attribute.
pub fn capability(attr: TokenStream, item: TokenStream) -> TokenStream {
	let mut args = CapabilityArgs::default();
	let parser = syn::meta::parser(|meta| {
		if meta.path.is_ident("crate") {
			args.krate = meta.value()?.parse()?;
			Ok(())
		} else if meta.path.is_ident("name") {
			args.name = Some(meta.value()?.parse()?);
			Ok(())
		} else {
			Err(meta.error("unknown capability attribute"))
		}
	});
	parse_macro_input!(attr with parser);

	let mut input = parse_macro_input!(item as ItemTrait);
	match expand(&args, &mut input) {
		Ok(tokens) => tokens.into(),
		Err(err) => {
			// Keep the trait itself so the error does not cascade into every use site.
			let err = err.to_compile_error();
			quote! { #input #err }.into()
		}
	}
}

fn expand(args: &CapabilityArgs, input: &mut ItemTrait) -> syn::Result<TokenStream2> {
	let krate = &args.krate;
	let ident = input.ident.clone();
	let display = args
		.name
		.as_ref()
		.map(LitStr::value)
		.unwrap_or_else(|| ident.to_string());

	let own_params: Vec<Ident> = input
		.generics
		.type_params()
		.map(|param| param.ident.clone())
		.chain(input.generics.const_params().map(|param| param.ident.clone()))
		.collect();

	let mut errors: Option<syn::Error> = None;
	let mut push_error = |err: syn::Error| match &mut errors {
		Some(existing) => existing.combine(err),
		None => errors = Some(err),
	};

	let mut operations = Vec::new();
	let mut methods = Vec::new();
	// `cfg!` condition of each operation pushed so far, `None` when unconditional.
	let mut conditions: Vec<Option<TokenStream2>> = Vec::new();

	for item in &mut input.items {
		match item {
			TraitItem::Fn(method) => {
				let mode = match take_stub_attr(method) {
					Ok(mode) => mode,
					Err(err) => {
						push_error(err);
						continue;
					}
				};
				if mode == StubMode::Inherit {
					if method.default.is_none() {
						push_error(syn::Error::new_spanned(
							&method.sig,
							"#[stub(inherit)] requires a default body to inherit",
						));
					}
					continue;
				}

				if mode == StubMode::Raise && method.sig.receiver().is_none() {
					push_error(syn::Error::new_spanned(
						&method.sig,
						"#[stub(raise)] applies only to methods with a receiver",
					));
					continue;
				}

				if method.sig.receiver().is_none() {
					// Type-level functions are not operations; only required ones need a body.
					if method.default.is_none() {
						let name = method.sig.ident.to_string();
						let sig = stub_signature(method);
						let cfgs = cfg_attrs(method);
						methods.push(quote! {
							#(#cfgs)*
							#sig {
								#krate::Stub::__type_level(#display, #name)
							}
						});
					}
					continue;
				}

				let cfgs = cfg_attrs(method);
				let condition = match cfg_condition(&cfgs) {
					Ok(condition) => condition,
					Err(err) => {
						push_error(err);
						continue;
					}
				};
				let index = operation_index(&conditions);
				conditions.push(condition);

				let fallible = mode == StubMode::Fail && returns_result(&method.sig.output);
				let descriptor = operation_descriptor(krate, &display, method, fallible);
				operations.push(quote! { #(#cfgs)* #descriptor });

				let op = quote! { &CAPABILITY.operations[#index] };
				let body = if fallible {
					quote! {
						::core::result::Result::Err(::core::convert::Into::into(
							#krate::Stub::__fail(&self, #op),
						))
					}
				} else {
					quote! { #krate::Stub::__raise(&self, #op) }
				};
				let sig = stub_signature(method);
				methods.push(quote! {
					#(#cfgs)*
					#sig {
						#body
					}
				});
			}
			TraitItem::Type(assoc) => push_error(syn::Error::new_spanned(
				assoc,
				"capability traits cannot declare associated types; a placeholder has no type to choose",
			)),
			TraitItem::Const(assoc) if assoc.default.is_none() => {
				push_error(syn::Error::new_spanned(
					assoc,
					"associated consts of a capability trait need a default value",
				))
			}
			TraitItem::Macro(mac) => push_error(syn::Error::new_spanned(
				mac,
				"macro invocations cannot be scanned for capability operations",
			)),
			_ => {}
		}
	}

	let mut extends = Vec::new();
	for bound in &input.supertraits {
		let TypeParamBound::Trait(bound) = bound else {
			continue;
		};
		if matches!(bound.modifier, TraitBoundModifier::Maybe(_)) {
			continue;
		}
		let Some(last) = bound.path.segments.last() else {
			continue;
		};
		if SATISFIED_BOUNDS.iter().any(|name| last.ident == name) {
			continue;
		}
		if mentions_any(bound.path.to_token_stream(), &own_params) {
			push_error(syn::Error::new_spanned(
				&bound.path,
				"extended capabilities cannot depend on the capability's own generic parameters",
			));
			continue;
		}
		let path = &bound.path;
		extends.push(quote! { <dyn #path as #krate::Capability>::capability });
	}

	if let Some(err) = errors {
		return Err(err);
	}

	let unsafety = &input.unsafety;
	let (impl_generics, ty_generics, where_clause) = input.generics.split_for_impl();

	Ok(quote! {
		#input

		const _: () = {
			static CAPABILITY: #krate::CapabilityType = #krate::CapabilityType {
				name: #display,
				path: ::core::concat!(::core::module_path!(), "::", ::core::stringify!(#ident)),
				kind: #krate::CapabilityKind::Abstract,
				operations: &[#(#operations),*],
				extends: &[#(#extends),*],
			};

			impl #impl_generics #krate::Capability for dyn #ident #ty_generics #where_clause {
				fn capability() -> &'static #krate::CapabilityType {
					&CAPABILITY
				}

				fn adapt(stub: #krate::Stub) -> ::std::sync::Arc<Self> {
					::std::sync::Arc::new(stub)
				}
			}

			#unsafety impl #impl_generics #ident #ty_generics for #krate::Stub #where_clause {
				#(#methods)*
			}
		};
	})
}

/// Builds the `Operation` literal for one method.
fn operation_descriptor(
	krate: &Path,
	owner: &str,
	method: &TraitItemFn,
	fallible: bool,
) -> TokenStream2 {
	let sig = &method.sig;
	let name = sig.ident.to_string();
	let receiver = sig.receiver().map(render_receiver).unwrap_or_default();
	let params: Vec<String> = sig
		.inputs
		.iter()
		.filter_map(|arg| match arg {
			FnArg::Typed(arg) => Some(render_type(&arg.ty)),
			FnArg::Receiver(_) => None,
		})
		.collect();
	let output = render_output(&sig.output);

	quote! {
		#krate::Operation {
			owner: #owner,
			name: #name,
			receiver: #receiver,
			params: &[#(#params),*],
			output: #output,
			fallible: #fallible,
		}
	}
}

/// Copies the method signature for the placeholder impl with every argument
/// pattern replaced by `_` and by-value receivers made immutable.
fn stub_signature(method: &TraitItemFn) -> syn::Signature {
	let mut sig = method.sig.clone();
	for arg in &mut sig.inputs {
		match arg {
			FnArg::Receiver(receiver) => {
				if receiver.reference.is_none() {
					receiver.mutability = None;
				}
			}
			FnArg::Typed(arg) => {
				arg.attrs.clear();
				*arg.pat = parse_quote!(_);
			}
		}
	}
	sig
}

fn cfg_attrs(method: &TraitItemFn) -> Vec<&syn::Attribute> {
	method
		.attrs
		.iter()
		.filter(|attr| attr.path().is_ident("cfg"))
		.collect()
}

/// Combines the predicates of a method's `#[cfg]` attributes into one
/// `cfg!` expression, or `None` when the method is unconditional.
fn cfg_condition(cfgs: &[&syn::Attribute]) -> syn::Result<Option<TokenStream2>> {
	if cfgs.is_empty() {
		return Ok(None);
	}
	let mut condition = quote! { true };
	for attr in cfgs {
		let predicate = &attr.meta.require_list()?.tokens;
		condition = quote! { #condition && ::core::cfg!(#predicate) };
	}
	Ok(Some(quote! { (#condition) }))
}

/// Position of the next operation in the descriptor's array, counting only
/// the preceding operations whose `cfg` is enabled.
fn operation_index(conditions: &[Option<TokenStream2>]) -> TokenStream2 {
	let unconditional = conditions.iter().filter(|c| c.is_none()).count();
	let conditional: Vec<_> = conditions.iter().flatten().collect();
	if conditional.is_empty() {
		return quote! { #unconditional };
	}
	quote! { #unconditional #(+ (#conditional as usize))* }
}

/// Body generated for a trait method.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum StubMode {
	/// `Err` for `Result` returns, unwind otherwise.
	Fail,
	/// Always unwind, whatever the return type.
	Raise,
	/// Keep the trait's default body.
	Inherit,
}

/// Removes `#[stub(...)]` helper attributes, returning the requested mode.
fn take_stub_attr(method: &mut TraitItemFn) -> syn::Result<StubMode> {
	let mut mode = StubMode::Fail;
	for attr in method.attrs.iter().filter(|attr| attr.path().is_ident("stub")) {
		attr.parse_nested_meta(|meta| {
			let requested = if meta.path.is_ident("inherit") {
				StubMode::Inherit
			} else if meta.path.is_ident("raise") {
				StubMode::Raise
			} else {
				return Err(meta.error("unknown stub attribute"));
			};
			if mode != StubMode::Fail && mode != requested {
				return Err(meta.error("`inherit` and `raise` cannot be combined"));
			}
			mode = requested;
			Ok(())
		})?;
	}
	method.attrs.retain(|attr| !attr.path().is_ident("stub"));
	Ok(mode)
}

fn mentions_any(tokens: TokenStream2, idents: &[Ident]) -> bool {
	tokens.into_iter().any(|tree| match tree {
		TokenTree::Ident(ident) => idents.contains(&ident),
		TokenTree::Group(group) => mentions_any(group.stream(), idents),
		_ => false,
	})
}
