use appcat_core::request::{Decision, RejectionReason, RequestReason, RequestStatus, ValidationError};

#[test]
fn request_reason_accepts_valid_length() {
    let r = RequestReason::new("Need this for Q3 rollout plan").unwrap();
    assert_eq!(r.as_str(), "Need this for Q3 rollout plan");
}

#[test]
fn request_reason_rejects_too_short() {
    assert_eq!(
        RequestReason::new("too short"),
        Err(ValidationError::TooShort { min: 10, got: 9 })
    );
}

#[test]
fn request_reason_rejects_too_long() {
    let long = "x".repeat(2001);
    assert_eq!(
        RequestReason::new(&long),
        Err(ValidationError::TooLong { max: 2000, got: 2001 })
    );
}

#[test]
fn request_reason_counts_characters_not_bytes() {
    // Ten two-byte characters are within bounds.
    let r = RequestReason::new(&"é".repeat(10));
    assert!(r.is_ok());
}

#[test]
fn rejection_reason_bounds() {
    assert!(RejectionReason::new("ab").is_err());
    assert!(RejectionReason::new("needs review by security").is_ok());
    assert!(RejectionReason::new(&"x".repeat(2001)).is_err());
}

#[test]
fn pending_is_not_terminal() {
    assert!(!RequestStatus::Pending.is_terminal());
    assert!(RequestStatus::Approved.is_terminal());
    assert!(RequestStatus::Rejected.is_terminal());
}

#[test]
fn status_round_trips_through_strings() {
    for status in [
        RequestStatus::Pending,
        RequestStatus::Approved,
        RequestStatus::Rejected,
    ] {
        assert_eq!(status.as_str().parse::<RequestStatus>().unwrap(), status);
    }
    assert!("pending".parse::<RequestStatus>().is_err());
}

#[test]
fn status_serialises_screaming_snake() {
    let json = serde_json::to_string(&RequestStatus::Pending).unwrap();
    assert_eq!(json, "\"PENDING\"");
}

#[test]
fn decision_resolves_status_and_reason() {
    assert_eq!(Decision::Approve.status(), RequestStatus::Approved);
    assert_eq!(Decision::Approve.rejection_reason(), None);

    let reject = Decision::Reject(RejectionReason::new("duplicate of an existing tool").unwrap());
    assert_eq!(reject.status(), RequestStatus::Rejected);
    assert_eq!(
        reject.rejection_reason(),
        Some("duplicate of an existing tool")
    );
}
