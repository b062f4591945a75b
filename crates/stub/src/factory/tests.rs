use super::*;
use crate::capability::{CapabilityKind, Operation};

static NAMED: CapabilityType = CapabilityType {
	name: "Named",
	path: "tests::Named",
	kind: CapabilityKind::Abstract,
	operations: &[Operation {
		owner: "Named",
		name: "get_name",
		receiver: "&self",
		params: &[],
		output: "String",
		fallible: false,
	}],
	extends: &[],
};

static SIZE: CapabilityType = CapabilityType::concrete("Size", "tests::Size");

#[test]
fn test_create_stub_binds_name() {
	let factory = StubFactory::new();
	let red = factory.create_stub(&NAMED, "RED").unwrap();
	let blue = factory.create_stub(&NAMED, "BLUE").unwrap();

	assert_eq!(red.name(), "RED");
	assert_eq!(blue.name(), "BLUE");
	assert!(Arc::ptr_eq(red.definition(), blue.definition()));
	assert_eq!(factory.cache().len(), 1);
}

#[test]
fn test_create_stub_propagates_synthesis_error() {
	let factory = StubFactory::default();
	let err = factory.create_stub(&SIZE, "TINY").unwrap_err();
	assert_eq!(
		err,
		SynthesisError::NotAbstract {
			capability: "tests::Size"
		}
	);
	assert!(factory.cache().is_empty());
}

#[test]
fn test_factory_with_custom_synthesizer() {
	let factory = StubFactory::with_synthesizer(Synthesizer::failing_with::<crate::UnsupportedOperation>());
	let stub = factory.create_stub(&NAMED, "RED").unwrap();
	assert_eq!(
		stub.definition().failure_kind(),
		std::any::type_name::<crate::UnsupportedOperation>()
	);
}

#[test]
fn test_global_factory_is_shared() {
	assert!(std::ptr::eq(factory(), factory()));
	let stub = factory().create_stub(&NAMED, "GLOBAL").unwrap();
	assert!(Arc::ptr_eq(
		stub.definition(),
		&factory().cache().get(&NAMED).unwrap()
	));
}
