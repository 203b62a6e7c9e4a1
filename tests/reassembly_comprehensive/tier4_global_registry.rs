//! Tier 4: Process-wide registry
//!
//! The global registry is shared by every test in this binary, so each test
//! uses its own index names and removes what it registered.

use crate::test_utils::*;
use sift::{Reassembler, RecordType, Registry, SearchHit, SiftError, TypeRegistration};

#[test]
fn test_global_registry_register_and_unregister() {
    let registry = Registry::global();
    registry
        .register(
            TypeRegistration::new("GlobalWidget", "global_widgets", labelled_store("GlobalWidget", &["w1"])),
        )
        .unwrap();

    let hits = vec![SearchHit::typeless("global_widgets", "w1")];
    let out = Reassembler::new(registry).records(&hits).unwrap();
    assert_eq!(labels(out.records()), vec!["GlobalWidgetw1"]);

    assert_eq!(registry.unregister(&RecordType::new("GlobalWidget")), 1);
    let err = Reassembler::new(registry).records(&hits).unwrap_err();
    assert_eq!(err, SiftError::unknown_type("global_widgets", None));
}

#[test]
fn test_global_registry_rejects_duplicate_pair() {
    let registry = Registry::global();
    registry
        .register(TypeRegistration::new("GlobalGadget", "global_gadgets", labelled_store("GlobalGadget", &[])))
        .unwrap();
    let err = registry
        .register(TypeRegistration::new("OtherGadget", "global_gadgets", labelled_store("OtherGadget", &[])))
        .unwrap_err();
    assert!(matches!(err, SiftError::DuplicateRegistration { .. }));
    registry.unregister(&RecordType::new("GlobalGadget"));
}

#[test]
fn test_global_is_one_instance() {
    assert!(std::ptr::eq(Registry::global(), Registry::global()));
}
