use thiserror::Error;

use super::*;
use crate::capability::CapabilityKind;
use crate::failure::UnsupportedOperation;

const GET_NAME: Operation = Operation {
	owner: "Named",
	name: "get_name",
	receiver: "&self",
	params: &[],
	output: "String",
	fallible: false,
};

static NAMED_OPS: [Operation; 2] = [
	GET_NAME,
	Operation {
		owner: "Named",
		name: "rename",
		receiver: "&mut self",
		params: &["&str"],
		output: "Result<(), NameError>",
		fallible: true,
	},
];

static NAMED: CapabilityType = CapabilityType {
	name: "Named",
	path: "tests::Named",
	kind: CapabilityKind::Abstract,
	operations: &NAMED_OPS,
	extends: &[],
};

static COLOR: CapabilityType = CapabilityType {
	name: "Color",
	path: "tests::Color",
	kind: CapabilityKind::Abstract,
	operations: &[Operation {
		owner: "Color",
		name: "rgb",
		receiver: "&self",
		params: &[],
		output: "u32",
		fallible: false,
	}],
	extends: &[named],
};

fn named() -> &'static CapabilityType {
	&NAMED
}

static MARKER: CapabilityType = CapabilityType {
	name: "Marker",
	path: "tests::Marker",
	kind: CapabilityKind::Abstract,
	operations: &[],
	extends: &[],
};

static SIZE: CapabilityType = CapabilityType::concrete("Size", "tests::Size");

static DUPLICATE: CapabilityType = CapabilityType {
	name: "Twice",
	path: "tests::Twice",
	kind: CapabilityKind::Abstract,
	operations: &[GET_NAME, GET_NAME],
	extends: &[],
};

static BROKEN_PARENT: CapabilityType = CapabilityType {
	name: "Broken",
	path: "tests::Broken",
	kind: CapabilityKind::Abstract,
	operations: &[Operation {
		owner: "Broken",
		name: "",
		receiver: "&self",
		params: &[],
		output: "()",
		fallible: false,
	}],
	extends: &[],
};

static BROKEN_CHILD: CapabilityType = CapabilityType {
	name: "Child",
	path: "tests::Child",
	kind: CapabilityKind::Abstract,
	operations: &[],
	extends: &[broken_parent],
};

fn broken_parent() -> &'static CapabilityType {
	&BROKEN_PARENT
}

#[derive(Error, Debug)]
#[error("not yet registered: {0}")]
struct NotRegistered(String);

impl FailureKind for NotRegistered {
	fn from_diagnostic(message: String) -> Self {
		Self(message)
	}
}

#[test]
fn test_synthesize_scans_operations() {
	let def = Synthesizer::new().synthesize(&COLOR).unwrap();
	assert_eq!(def.name(), "tests::Color$Stub");
	assert!(std::ptr::eq(def.capability(), &COLOR));
	assert_eq!(def.len(), 3);
	let names: Vec<_> = def.operations().map(|op| op.name).collect();
	assert_eq!(names, ["rgb", "get_name", "rename"]);
	assert_eq!(def.failure_kind(), std::any::type_name::<UnsupportedOperation>());
}

#[test]
fn test_concrete_is_rejected() {
	assert_eq!(
		Synthesizer::new().synthesize(&SIZE).unwrap_err(),
		SynthesisError::NotAbstract {
			capability: "tests::Size"
		}
	);
}

#[test]
fn test_duplicate_operation_is_rejected() {
	assert_eq!(
		Synthesizer::new().synthesize(&DUPLICATE).unwrap_err(),
		SynthesisError::DuplicateOperation {
			capability: "tests::Twice",
			operation: "get_name",
		}
	);
}

#[test]
fn test_malformed_parent_is_rejected() {
	assert_eq!(
		Synthesizer::new().synthesize(&BROKEN_CHILD).unwrap_err(),
		SynthesisError::MalformedOperation {
			capability: "tests::Broken"
		}
	);
}

#[test]
fn test_empty_surface() {
	let def = Arc::new(Synthesizer::new().synthesize(&MARKER).unwrap());
	assert!(def.is_empty());
	let stub = def.instantiate("UNIT");
	assert_eq!(stub.name(), "UNIT");
	assert_eq!(stub.to_string(), "Marker(UNIT)");
}

#[test]
fn test_failure_names_placeholder_and_operation() {
	let def = Arc::new(Synthesizer::new().synthesize(&NAMED).unwrap());
	let stub = def.instantiate("RED");
	let failure = stub.__fail(&NAMED_OPS[0]);

	assert_eq!(failure.symbolic_name(), "RED");
	assert!(std::ptr::eq(failure.operation(), &NAMED_OPS[0]));
	assert_eq!(
		failure.message(),
		"A call was made on a placeholder instance before its real value was initialized \
		 (placeholder `RED` of capability `Named`).\nOperation: Named::get_name(&self) -> String"
	);
	assert!(failure.downcast_ref::<UnsupportedOperation>().is_some());
}

#[test]
fn test_instances_share_definition() {
	let def = Arc::new(Synthesizer::new().synthesize(&NAMED).unwrap());
	let red = def.instantiate("RED");
	let blue = def.instantiate("BLUE");
	assert!(Arc::ptr_eq(red.definition(), blue.definition()));
	assert!(red.__fail(&NAMED_OPS[1]).message().contains("`RED`"));
	assert!(blue.__fail(&NAMED_OPS[1]).message().contains("`BLUE`"));
	assert!(
		blue.__fail(&NAMED_OPS[1])
			.message()
			.ends_with("Named::rename(&mut self, &str) -> Result<(), NameError>")
	);
}

#[test]
fn test_custom_failure_kind() {
	let synthesizer = Synthesizer::failing_with::<NotRegistered>();
	assert_eq!(synthesizer.failure().kind(), std::any::type_name::<NotRegistered>());

	let def = Arc::new(synthesizer.synthesize(&NAMED).unwrap());
	let failure = def.instantiate("KEY_0").__fail(&NAMED_OPS[0]);
	assert_eq!(failure.kind(), std::any::type_name::<NotRegistered>());
	assert!(failure.message().starts_with("not yet registered: A call was made"));
	assert!(failure.downcast_ref::<NotRegistered>().is_some());
}

#[test]
fn test_unknown_operation_falls_back_to_display() {
	let def = Arc::new(Synthesizer::new().synthesize(&MARKER).unwrap());
	let failure = def.instantiate("LOOSE").__fail(&NAMED_OPS[0]);
	assert!(
		failure
			.message()
			.ends_with("Operation: Named::get_name(&self) -> String")
	);
}

#[test]
fn test_debug_lists_signatures() {
	let def = Synthesizer::new().synthesize(&NAMED).unwrap();
	let debug = format!("{def:?}");
	assert!(debug.contains("tests::Named$Stub"));
	assert!(debug.contains("Named::get_name(&self) -> String"));
}
