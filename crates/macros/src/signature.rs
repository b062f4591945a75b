//! Human-readable rendering of method signatures for diagnostics.

use proc_macro2::{Delimiter, Spacing, TokenStream, TokenTree};
use quote::ToTokens;
use syn::{Receiver, ReturnType, Type};

#[derive(Clone, Copy, PartialEq, Eq)]
enum Last {
	Start,
	Word,
	Punct,
	Space,
	Arrow,
	Close,
	Tick,
}

/// Renders a type the way it is usually written in source (`&'a mut Vec<u8>`),
/// rather than the token-spaced form produced by `to_string`.
pub(crate) fn render_type(ty: &Type) -> String {
	let mut out = String::new();
	render_tokens(&mut out, ty.to_token_stream());
	out.trim().to_owned()
}

/// Renders a method receiver: `&self`, `&mut self`, `self`, `self: Box<Self>`.
pub(crate) fn render_receiver(receiver: &Receiver) -> String {
	if receiver.colon_token.is_some() {
		return format!("self: {}", render_type(&receiver.ty));
	}
	let mut out = String::new();
	if let Some((_, lifetime)) = &receiver.reference {
		out.push('&');
		if let Some(lifetime) = lifetime {
			out.push_str(&lifetime.to_string());
			out.push(' ');
		}
		if receiver.mutability.is_some() {
			out.push_str("mut ");
		}
	}
	out.push_str("self");
	out
}

pub(crate) fn render_output(output: &ReturnType) -> String {
	match output {
		ReturnType::Default => "()".to_owned(),
		ReturnType::Type(_, ty) => render_type(ty),
	}
}

/// Returns true if the return type is spelled as some `Result`
/// (`Result<T, E>`, `io::Result<T>`, `anyhow::Result<T>`).
///
/// Such operations fail with `Err(StubFailure.into())`, so the error type must
/// implement `From<StubFailure>`; `io::Error` does. Methods returning any
/// other error type are marked `#[stub(raise)]` to unwind instead.
pub(crate) fn returns_result(output: &ReturnType) -> bool {
	let ReturnType::Type(_, ty) = output else {
		return false;
	};
	let mut ty = &**ty;
	loop {
		match ty {
			Type::Group(group) => ty = &group.elem,
			Type::Paren(paren) => ty = &paren.elem,
			Type::Path(path) if path.qself.is_none() => {
				return path
					.path
					.segments
					.last()
					.is_some_and(|segment| segment.ident == "Result");
			}
			_ => return false,
		}
	}
}

fn render_tokens(out: &mut String, tokens: TokenStream) {
	let mut last = Last::Start;
	for tree in tokens {
		match tree {
			TokenTree::Ident(ident) => {
				if matches!(last, Last::Word | Last::Close) {
					out.push(' ');
				}
				out.push_str(&ident.to_string());
				last = Last::Word;
			}
			TokenTree::Literal(literal) => {
				if matches!(last, Last::Word | Last::Close) {
					out.push(' ');
				}
				out.push_str(&literal.to_string());
				last = Last::Word;
			}
			TokenTree::Punct(punct) => {
				let ch = punct.as_char();
				last = match ch {
					',' | ';' => {
						out.push(ch);
						out.push(' ');
						Last::Space
					}
					'+' | '=' => {
						let trimmed = out.trim_end().len();
						out.truncate(trimmed);
						out.push(' ');
						out.push(ch);
						out.push(' ');
						Last::Space
					}
					'-' if punct.spacing() == Spacing::Joint => {
						if !out.is_empty() && !out.ends_with(' ') {
							out.push(' ');
						}
						out.push('-');
						Last::Arrow
					}
					'>' if last == Last::Arrow => {
						out.push_str("> ");
						Last::Space
					}
					'>' => {
						out.push('>');
						Last::Close
					}
					'\'' => {
						if matches!(last, Last::Word | Last::Close) {
							out.push(' ');
						}
						out.push('\'');
						Last::Tick
					}
					_ => {
						out.push(ch);
						Last::Punct
					}
				};
			}
			TokenTree::Group(group) => {
				let (open, close) = match group.delimiter() {
					Delimiter::Parenthesis => ("(", ")"),
					Delimiter::Bracket => ("[", "]"),
					Delimiter::Brace => ("{", "}"),
					Delimiter::None => ("", ""),
				};
				if last == Last::Close {
					out.push(' ');
				}
				let mut inner = String::new();
				render_tokens(&mut inner, group.stream());
				out.push_str(open);
				out.push_str(inner.trim_end());
				out.push_str(close);
				last = Last::Word;
			}
		}
	}
}
