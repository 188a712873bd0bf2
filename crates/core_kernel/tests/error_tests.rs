//! Tests for core error constructors

use core_kernel::CoreError;

#[test]
fn constructors_produce_matching_variants() {
    assert!(matches!(
        CoreError::validation("bad phone"),
        CoreError::Validation(_)
    ));
    assert!(matches!(
        CoreError::invalid_state("already decided"),
        CoreError::InvalidStateTransition(_)
    ));
    assert!(matches!(
        CoreError::not_found("no such request"),
        CoreError::NotFound(_)
    ));
}

#[test]
fn messages_surface_in_display() {
    let err = CoreError::not_found("request REQ-123");
    assert!(err.to_string().contains("REQ-123"));
}
