mod common;

use sonder_assessments::error::AssessmentError;
use sonder_core::models::assessment::{AssessmentMode, AssessmentStatus};

use common::harness;

#[tokio::test]
async fn unknown_item_is_rejected_without_mutation() {
    let h = harness();
    let a = h.create("gad7", AssessmentMode::InPerson).await;

    let err = h
        .service
        .submit_response(a.id, &h.tenant, "phq9_1", 1)
        .await
        .unwrap_err();
    assert!(matches!(
        err,
        AssessmentError::InvalidItem { ref scale_id, ref item_id }
            if scale_id == "gad7" && item_id == "phq9_1"
    ));

    let stored = h.service.get_assessment(a.id, &h.tenant).await.unwrap();
    assert_eq!(stored.status, AssessmentStatus::Created);
    assert!(stored.responses.is_empty());
}

#[tokio::test]
async fn undeclared_value_is_rejected() {
    let h = harness();
    let a = h.create("gad7", AssessmentMode::InPerson).await;

    let err = h
        .service
        .submit_response(a.id, &h.tenant, "gad7_1", 4)
        .await
        .unwrap_err();
    assert!(matches!(err, AssessmentError::InvalidValue { value: 4, .. }));
}

#[tokio::test]
async fn answers_overwrite_and_bump_activity() {
    let h = harness();
    let a = h.create("gad7", AssessmentMode::InPerson).await;

    h.service
        .submit_response(a.id, &h.tenant, "gad7_3", 1)
        .await
        .unwrap();
    h.clock.advance(jiff::SignedDuration::from_mins(5));
    let updated = h
        .service
        .submit_response(a.id, &h.tenant, "gad7_3", 2)
        .await
        .unwrap();

    assert_eq!(updated.responses.len(), 1);
    assert_eq!(updated.responses["gad7_3"].value, 2);
    assert_eq!(updated.last_activity_at, h.clock_now());
    assert_eq!(updated.current_step, 0);
}

#[tokio::test]
async fn step_is_a_bounded_client_cursor() {
    let h = harness();
    let a = h.create("gad7", AssessmentMode::InPerson).await;

    let moved = h.service.set_step(a.id, &h.tenant, 7).await.unwrap();
    assert_eq!(moved.current_step, 7);
    assert_eq!(moved.status, AssessmentStatus::Created);

    let err = h.service.set_step(a.id, &h.tenant, 8).await.unwrap_err();
    assert!(matches!(
        err,
        AssessmentError::InvalidStep {
            step: 8,
            item_count: 7
        }
    ));
}

#[tokio::test]
async fn clinician_route_refuses_remote_assessments() {
    let h = harness();
    let a = h.create("gad7", AssessmentMode::Remote).await;

    let err = h
        .service
        .submit_response(a.id, &h.tenant, "gad7_1", 1)
        .await
        .unwrap_err();
    assert!(matches!(
        err,
        AssessmentError::ModeMismatch {
            expected: AssessmentMode::InPerson
        }
    ));
}
