//! MatchingService behavior over in-memory repositories

use std::sync::Arc;
use std::time::Duration;

use fitmatch_core::{
    keys, AthleteService, DomainError, DomainEvent, DuplicateCheckMode, EventBus,
    MatchCreationMode, MatchingOptions, MatchingService, MatchingStatus,
};
use pretty_assertions::assert_eq;
use tests::events::collect_events;
use tests::fixtures::test_athlete;
use tests::mocks::{MockAthleteRepository, MockInteractionRepository, MockMatchingRepository};
use uuid::Uuid;

fn service_with(options: MatchingOptions) -> (MatchingService, Arc<MockMatchingRepository>) {
    let repo = Arc::new(MockMatchingRepository::new());
    (MatchingService::new(repo.clone(), options), repo)
}

#[tokio::test]
async fn test_match_returns_active_dto() {
    let (service, repo) = service_with(MatchingOptions::default());
    let (a, b) = (Uuid::new_v4(), Uuid::new_v4());

    let matching = service.match_athletes(a, b).await.unwrap();

    assert_eq!(matching.status, MatchingStatus::Active);
    assert_eq!(matching.interacted_user, a);
    assert_eq!(matching.interacting_user, b);
    assert_eq!(repo.active_count(), 1);
}

#[tokio::test]
async fn test_duplicate_detected_symmetrically() {
    let (service, repo) = service_with(MatchingOptions::default());
    let (a, b) = (Uuid::new_v4(), Uuid::new_v4());
    service.match_athletes(a, b).await.unwrap();

    let err = service.match_athletes(b, a).await.unwrap_err();
    assert!(matches!(err, DomainError::DocumentExists(keys::MATCHING_EXISTS)));
    assert_eq!(err.key(), Some("matching.exists"));
    assert_eq!(repo.all().len(), 1);
}

#[tokio::test]
async fn test_legacy_mode_skips_duplicate_check() {
    let options = MatchingOptions {
        duplicate_check: DuplicateCheckMode::Legacy,
        ..MatchingOptions::default()
    };
    let (service, repo) = service_with(options);
    let (a, b) = (Uuid::new_v4(), Uuid::new_v4());

    service.match_athletes(a, b).await.unwrap();
    service.match_athletes(a, b).await.unwrap();

    assert_eq!(repo.active_count(), 2);
    assert!(!service.has_active_match(&a, &b).await.unwrap());
}

#[tokio::test]
async fn test_distinct_pairs_are_independent() {
    let (service, _) = service_with(MatchingOptions::default());
    let (a, b, c) = (Uuid::new_v4(), Uuid::new_v4(), Uuid::new_v4());

    service.match_athletes(a, b).await.unwrap();
    service.match_athletes(a, c).await.unwrap();
    service.match_athletes(c, b).await.unwrap();

    assert!(service.has_active_match(&b, &a).await.unwrap());
    assert!(service.has_active_match(&c, &a).await.unwrap());
}

#[tokio::test]
async fn test_unlink_by_either_participant() {
    let (service, _) = service_with(MatchingOptions::default());
    let (a, b) = (Uuid::new_v4(), Uuid::new_v4());

    let first = service.match_athletes(a, b).await.unwrap();
    let closed = service.unlink(a, first.id).await.unwrap();
    assert_eq!(closed.status, MatchingStatus::Closed);
    assert_eq!(closed.id, first.id);

    let second = service.match_athletes(a, b).await.unwrap();
    let closed = service.unlink(b, second.id).await.unwrap();
    assert_eq!(closed.status, MatchingStatus::Closed);
}

#[tokio::test]
async fn test_unlink_by_non_participant_is_not_found() {
    let (service, repo) = service_with(MatchingOptions::default());
    let (a, b, stranger) = (Uuid::new_v4(), Uuid::new_v4(), Uuid::new_v4());
    let matching = service.match_athletes(a, b).await.unwrap();

    let err = service.unlink(stranger, matching.id).await.unwrap_err();
    assert!(matches!(err, DomainError::DocumentNotFound(keys::MATCHING_NOT_FOUND)));

    // Untouched
    assert_eq!(repo.active_count(), 1);
}

#[tokio::test]
async fn test_unlink_unknown_id_is_not_found() {
    let (service, _) = service_with(MatchingOptions::default());
    let err = service
        .unlink(Uuid::new_v4(), Uuid::new_v4())
        .await
        .unwrap_err();
    assert_eq!(err.key(), Some(keys::MATCHING_NOT_FOUND));
}

#[tokio::test]
async fn test_closed_matching_never_reactivates() {
    let (service, repo) = service_with(MatchingOptions::default());
    let (a, b) = (Uuid::new_v4(), Uuid::new_v4());

    let first = service.match_athletes(a, b).await.unwrap();
    service.unlink(a, first.id).await.unwrap();

    // Unlinking again keeps it closed
    let again = service.unlink(b, first.id).await.unwrap();
    assert_eq!(again.status, MatchingStatus::Closed);

    let second = service.match_athletes(b, a).await.unwrap();
    assert_ne!(second.id, first.id);

    let stored = repo.all();
    assert_eq!(stored.len(), 2);
    let old = stored.iter().find(|m| m.id == first.id).unwrap();
    assert_eq!(old.status, MatchingStatus::Closed);
}

#[tokio::test]
async fn test_events_follow_lifecycle() {
    let bus = EventBus::new();
    let mut rx = bus.subscribe();
    let repo = Arc::new(MockMatchingRepository::new());
    let service =
        MatchingService::new(repo, MatchingOptions::default()).with_events(bus.sender());
    let (a, b) = (Uuid::new_v4(), Uuid::new_v4());

    let matching = service.match_athletes(a, b).await.unwrap();
    let _ = service.match_athletes(a, b).await;
    service.unlink(b, matching.id).await.unwrap();
    service.unlink(b, matching.id).await.unwrap();

    let events = collect_events(&mut rx, Duration::from_millis(50)).await;
    assert_eq!(
        events,
        vec![
            DomainEvent::MatchCreated {
                matching_id: matching.id,
                interacted_user: a,
                interacting_user: b,
            },
            DomainEvent::MatchClosed {
                matching_id: matching.id,
                closed_by: b,
            },
        ]
    );
}

#[tokio::test]
async fn test_mutual_like_yields_single_matching() {
    let a = test_athlete("a@example.com");
    let b = test_athlete("b@example.com");
    let athletes = Arc::new(
        MockAthleteRepository::new()
            .with_athlete(a.clone())
            .with_athlete(b.clone()),
    );
    let matchings = Arc::new(MockMatchingRepository::new());
    let matching_service = Arc::new(MatchingService::new(
        matchings.clone(),
        MatchingOptions {
            creation: MatchCreationMode::PerPairLock,
            ..MatchingOptions::default()
        },
    ));
    let service = AthleteService::new(
        athletes,
        Arc::new(MockInteractionRepository::new()),
        matching_service,
    );

    assert!(!service.like(a.id, b.id).await.unwrap().matched);
    let response = service.like(b.id, a.id).await.unwrap();

    assert!(response.matched);
    assert_eq!(matchings.active_count(), 1);
}
