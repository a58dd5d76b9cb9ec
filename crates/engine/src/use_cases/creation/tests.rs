use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

use sagaforge_domain::{
    ActorId, Adjustment, Attribute, Background, CharacterClass, CreationStep, ScopeId, Skill,
    WizardEvent,
};

use super::*;
use crate::infrastructure::clock::{FixedClock, ManualClock};
use crate::infrastructure::persistence::InMemoryCharacterRepo;
use crate::infrastructure::ports::{CharacterRepo, MockCharacterRepo};
use crate::test_support::{character, now, seed, warrior_events};

const IDLE: Duration = Duration::from_secs(15 * 60);

fn registry_with(repo: Arc<dyn CharacterRepo>) -> SessionRegistry {
    SessionRegistry::new(
        Arc::new(entities::Character::new(repo)),
        Arc::new(FixedClock(now())),
        IDLE,
    )
}

fn in_memory() -> (Arc<InMemoryCharacterRepo>, SessionRegistry) {
    let repo = Arc::new(InMemoryCharacterRepo::new());
    let registry = registry_with(repo.clone());
    (repo, registry)
}

fn actor(id: &str) -> ActorId {
    ActorId::new(id)
}

async fn drive_to_confirm(registry: &SessionRegistry, who: &ActorId) {
    for event in warrior_events() {
        registry.dispatch(who, event).await.unwrap();
    }
}

mod happy_path {
    use super::*;

    #[tokio::test]
    async fn full_wizard_creates_character_and_closes_session() {
        let (repo, registry) = in_memory();
        let who = actor("actor-1");

        let view = registry
            .start(who.clone(), seed("guild-1", "Brakka"))
            .await
            .unwrap();
        assert_eq!(view.step, CreationStep::ClassSelect);

        drive_to_confirm(&registry, &who).await;
        assert_eq!(registry.view(&who).await.unwrap().step, CreationStep::Confirm);

        let outcome = registry.dispatch(&who, WizardEvent::Finalize).await.unwrap();
        let DispatchOutcome::Completed(created) = outcome else {
            panic!("expected completion, got {outcome:?}");
        };
        assert_eq!(created.class(), CharacterClass::Warrior);
        assert_eq!(created.background(), Background::Commoner);
        assert_eq!(created.level(), 1);

        assert!(!registry.has_session(&who));
        assert_eq!(registry.active_sessions(), 0);
        let stored = repo
            .find_active(&who, &ScopeId::new("guild-1"))
            .await
            .unwrap()
            .unwrap();
        assert_eq!(stored.id(), created.id());
    }

    #[tokio::test]
    async fn dispatch_after_completion_has_no_session() {
        let (_repo, registry) = in_memory();
        let who = actor("actor-1");
        registry.start(who.clone(), seed("guild-1", "Brakka")).await.unwrap();
        drive_to_confirm(&registry, &who).await;
        registry.dispatch(&who, WizardEvent::Finalize).await.unwrap();

        let err = registry
            .dispatch(&who, WizardEvent::Finalize)
            .await
            .unwrap_err();
        assert!(matches!(err, CreationError::NoActiveSession));
    }

    #[tokio::test]
    async fn raw_ids_drive_the_same_flow() {
        let (_repo, registry) = in_memory();
        let who = actor("actor-1");
        registry.start(who.clone(), seed("guild-1", "Vesper")).await.unwrap();

        for id in [
            "class_warrior",
            "attr_wis_up",
            "attr_cha_up",
            "attr_confirm",
            "background_noble",
            "skill_athletics",
            "skills_confirm",
        ] {
            registry.dispatch_raw(&who, id).await.unwrap();
        }
        let outcome = registry.dispatch_raw(&who, "confirm").await.unwrap();
        let DispatchOutcome::Completed(created) = outcome else {
            panic!("expected completion");
        };
        assert!(created
            .skills()
            .iter()
            .any(|p| p.skill == Skill::Athletics && p.is_proficient));
    }

    #[tokio::test]
    async fn handles_json_interactions() {
        let (_repo, registry) = in_memory();
        let who = actor("1234");
        registry.start(who.clone(), seed("guild-1", "Vesper")).await.unwrap();

        let interaction = Interaction::from_json(
            r#"{"actorId":"1234","scopeId":"guild-1","eventId":"class_bard"}"#,
        )
        .unwrap();
        let outcome = registry.handle(&interaction).await.unwrap();
        let DispatchOutcome::Updated(view) = outcome else {
            panic!("expected a view");
        };
        assert_eq!(view.class, Some(CharacterClass::Bard));
        assert_eq!(view.step, CreationStep::AttributeAllocate);
    }
}

mod start {
    use super::*;

    #[tokio::test]
    async fn second_start_is_refused() {
        let (_repo, registry) = in_memory();
        let who = actor("actor-1");
        registry.start(who.clone(), seed("guild-1", "Brakka")).await.unwrap();

        let err = registry
            .start(who.clone(), seed("guild-2", "Other"))
            .await
            .unwrap_err();
        assert!(matches!(err, CreationError::SessionAlreadyActive));
        assert_eq!(err.kind(), ErrorKind::Protocol);
    }

    #[tokio::test]
    async fn existing_character_in_scope_blocks_start() {
        let (repo, registry) = in_memory();
        repo.create(&character("actor-1", "guild-1")).await.unwrap();

        let err = registry
            .start(actor("actor-1"), seed("guild-1", "Again"))
            .await
            .unwrap_err();
        assert!(matches!(err, CreationError::CharacterExists));
        assert_eq!(registry.active_sessions(), 0);

        // A different scope is fine.
        registry
            .start(actor("actor-1"), seed("guild-2", "Again"))
            .await
            .unwrap();
    }

    #[tokio::test]
    async fn storage_failure_during_start_is_collaborator_error() {
        let mut repo = MockCharacterRepo::new();
        repo.expect_find_active()
            .returning(|_, _| Err(RepoError::storage("find_active", "timeout")));
        let registry = registry_with(Arc::new(repo));

        let err = registry
            .start(actor("actor-1"), seed("guild-1", "Brakka"))
            .await
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Collaborator);
        assert_eq!(registry.active_sessions(), 0);
    }
}

mod rejections {
    use super::*;

    #[tokio::test]
    async fn validation_error_leaves_session_unchanged() {
        let (_repo, registry) = in_memory();
        let who = actor("actor-1");
        registry.start(who.clone(), seed("guild-1", "Brakka")).await.unwrap();
        registry
            .dispatch(&who, WizardEvent::ClassChosen(CharacterClass::Warrior))
            .await
            .unwrap();
        let before = registry.view(&who).await.unwrap();

        // Warrior baseline leaves 2 points unspent.
        let err = registry
            .dispatch(&who, WizardEvent::ConfirmAttributes)
            .await
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Validation);
        assert!(err.user_message().contains("2 attribute points"));
        assert_eq!(registry.view(&who).await.unwrap(), before);
    }

    #[tokio::test]
    async fn over_budget_adjustment_is_rejected() {
        let (_repo, registry) = in_memory();
        let who = actor("actor-1");
        registry.start(who.clone(), seed("guild-1", "Merla")).await.unwrap();
        registry
            .dispatch(&who, WizardEvent::ClassChosen(CharacterClass::Mage))
            .await
            .unwrap();

        // Mage baseline already spends all 27 points.
        let err = registry
            .dispatch(
                &who,
                WizardEvent::AdjustAttribute {
                    attribute: Attribute::Strength,
                    adjustment: Adjustment::Increase,
                },
            )
            .await
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Validation);
        assert_eq!(registry.view(&who).await.unwrap().remaining_points, 0);
    }

    #[tokio::test]
    async fn out_of_order_event_is_protocol_error() {
        let (_repo, registry) = in_memory();
        let who = actor("actor-1");
        registry.start(who.clone(), seed("guild-1", "Brakka")).await.unwrap();

        let err = registry
            .dispatch(&who, WizardEvent::Finalize)
            .await
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Protocol);
        assert_eq!(
            registry.view(&who).await.unwrap().step,
            CreationStep::ClassSelect
        );
    }

    #[tokio::test]
    async fn malformed_ids_rejected_before_session_lookup() {
        let (_repo, registry) = in_memory();
        let err = registry
            .dispatch_raw(&actor("nobody"), "attr__up")
            .await
            .unwrap_err();
        assert!(matches!(err, CreationError::Malformed(_)));
    }

    #[tokio::test]
    async fn dispatch_without_session() {
        let (_repo, registry) = in_memory();
        let err = registry
            .dispatch(&actor("nobody"), WizardEvent::ClassChosen(CharacterClass::Monk))
            .await
            .unwrap_err();
        assert!(matches!(err, CreationError::NoActiveSession));
    }

    #[tokio::test]
    async fn interaction_from_another_scope_cannot_finalize() {
        let (repo, registry) = in_memory();
        let who = actor("actor-1");
        registry.start(who.clone(), seed("guild-1", "Brakka")).await.unwrap();
        drive_to_confirm(&registry, &who).await;

        let elsewhere = Interaction::new(who.clone(), ScopeId::new("guild-2"), "confirm");
        let err = registry.handle(&elsewhere).await.unwrap_err();
        assert!(matches!(err, CreationError::ScopeMismatch));
        assert_eq!(err.kind(), ErrorKind::Protocol);

        assert_eq!(registry.view(&who).await.unwrap().step, CreationStep::Confirm);
        assert!(repo.is_empty().await);

        let here = Interaction::new(who.clone(), ScopeId::new("guild-1"), "confirm");
        let outcome = registry.handle(&here).await.unwrap();
        assert!(matches!(outcome, DispatchOutcome::Completed(_)));
    }
}

mod finalize {
    use super::*;

    #[tokio::test]
    async fn storage_failure_keeps_session_retryable() {
        let attempts = Arc::new(AtomicUsize::new(0));
        let mut repo = MockCharacterRepo::new();
        repo.expect_find_active().returning(|_, _| Ok(None));
        let seen = attempts.clone();
        repo.expect_create().times(2).returning(move |c| {
            if seen.fetch_add(1, Ordering::SeqCst) == 0 {
                Err(RepoError::storage("create", "connection reset"))
            } else {
                Ok(c.id())
            }
        });
        let registry = registry_with(Arc::new(repo));
        let who = actor("actor-1");
        registry.start(who.clone(), seed("guild-1", "Brakka")).await.unwrap();
        drive_to_confirm(&registry, &who).await;

        let err = registry
            .dispatch(&who, WizardEvent::Finalize)
            .await
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Collaborator);
        assert_eq!(registry.view(&who).await.unwrap().step, CreationStep::Confirm);

        let outcome = registry.dispatch(&who, WizardEvent::Finalize).await.unwrap();
        assert!(matches!(outcome, DispatchOutcome::Completed(_)));
        assert!(!registry.has_session(&who));
        assert_eq!(attempts.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn retry_after_lost_acknowledgement_reuses_stored_character() {
        let existing = character("actor-1", "guild-1");
        let existing_id = existing.id();
        let calls = Arc::new(AtomicUsize::new(0));
        let seen = calls.clone();

        let mut repo = MockCharacterRepo::new();
        // Nothing at start; the character is there by the time we finalize.
        repo.expect_find_active().returning(move |_, _| {
            if seen.fetch_add(1, Ordering::SeqCst) == 0 {
                Ok(None)
            } else {
                Ok(Some(existing.clone()))
            }
        });
        repo.expect_create().never();
        let registry = registry_with(Arc::new(repo));
        let who = actor("actor-1");
        registry.start(who.clone(), seed("guild-1", "Brakka")).await.unwrap();
        drive_to_confirm(&registry, &who).await;

        let outcome = registry.dispatch(&who, WizardEvent::Finalize).await.unwrap();
        let DispatchOutcome::Completed(created) = outcome else {
            panic!("expected completion");
        };
        assert_eq!(created.id(), existing_id);
    }

    #[tokio::test]
    async fn unrelated_character_created_meanwhile_blocks_finalize() {
        let (repo, registry) = in_memory();
        let who = actor("actor-1");
        registry.start(who.clone(), seed("guild-1", "Zeph")).await.unwrap();
        drive_to_confirm(&registry, &who).await;

        repo.create(&character("actor-1", "guild-1")).await.unwrap();

        let err = registry
            .dispatch(&who, WizardEvent::Finalize)
            .await
            .unwrap_err();
        assert!(matches!(err, CreationError::CharacterExists));
        assert!(registry.has_session(&who));
    }
}

mod lifecycle {
    use super::*;

    #[tokio::test]
    async fn abandon_discards_without_storing() {
        let (repo, registry) = in_memory();
        let who = actor("actor-1");
        registry.start(who.clone(), seed("guild-1", "Brakka")).await.unwrap();
        drive_to_confirm(&registry, &who).await;

        registry.abandon(&who).await.unwrap();
        assert!(repo.is_empty().await);
        assert!(matches!(
            registry.abandon(&who).await.unwrap_err(),
            CreationError::NoActiveSession
        ));

        // The actor may begin again.
        registry.start(who.clone(), seed("guild-1", "Brakka")).await.unwrap();
    }

    #[tokio::test]
    async fn idle_sessions_are_evicted() {
        let repo = Arc::new(InMemoryCharacterRepo::new());
        let clock = Arc::new(ManualClock::new(now()));
        let registry = SessionRegistry::new(
            Arc::new(entities::Character::new(repo)),
            clock.clone(),
            IDLE,
        );
        let idle = actor("idle");
        let busy = actor("busy");
        registry.start(idle.clone(), seed("guild-1", "Dozer")).await.unwrap();
        registry.start(busy.clone(), seed("guild-1", "Hasty")).await.unwrap();

        clock.advance(chrono::Duration::minutes(10));
        registry
            .dispatch(&busy, WizardEvent::ClassChosen(CharacterClass::Rogue))
            .await
            .unwrap();
        assert_eq!(registry.evict_idle(), 0);

        clock.advance(chrono::Duration::minutes(6));
        assert_eq!(registry.evict_idle(), 1);
        assert!(matches!(
            registry.view(&idle).await.unwrap_err(),
            CreationError::NoActiveSession
        ));
        assert!(registry.has_session(&busy));
    }
}

mod concurrency {
    use super::*;

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn concurrent_starts_admit_one_session() {
        let (_repo, registry) = in_memory();
        let registry = Arc::new(registry);

        let handles: Vec<_> = (0..16)
            .map(|_| {
                let registry = registry.clone();
                tokio::spawn(async move {
                    registry
                        .start(actor("actor-1"), seed("guild-1", "Brakka"))
                        .await
                })
            })
            .collect();

        let mut admitted = 0;
        for handle in handles {
            if handle.await.unwrap().is_ok() {
                admitted += 1;
            }
        }
        assert_eq!(admitted, 1);
        assert_eq!(registry.active_sessions(), 1);
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn duplicate_finalize_persists_once() {
        let (repo, registry) = in_memory();
        let registry = Arc::new(registry);
        let who = actor("actor-1");
        registry.start(who.clone(), seed("guild-1", "Brakka")).await.unwrap();
        drive_to_confirm(&registry, &who).await;

        let handles: Vec<_> = (0..8)
            .map(|_| {
                let registry = registry.clone();
                let who = who.clone();
                tokio::spawn(async move { registry.dispatch(&who, WizardEvent::Finalize).await })
            })
            .collect();

        let mut completed = 0;
        for handle in handles {
            match handle.await.unwrap() {
                Ok(DispatchOutcome::Completed(_)) => completed += 1,
                Ok(other) => panic!("unexpected outcome {other:?}"),
                Err(e) => assert!(matches!(e, CreationError::NoActiveSession)),
            }
        }
        assert_eq!(completed, 1);
        assert_eq!(repo.len().await, 1);
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn independent_actors_proceed_in_parallel() {
        let (repo, registry) = in_memory();
        let registry = Arc::new(registry);

        let handles: Vec<_> = (0..10)
            .map(|i| {
                let registry = registry.clone();
                tokio::spawn(async move {
                    let who = actor(&format!("actor-{i}"));
                    registry.start(who.clone(), seed("guild-1", "Brakka")).await?;
                    for event in warrior_events() {
                        registry.dispatch(&who, event).await?;
                    }
                    registry.dispatch(&who, WizardEvent::Finalize).await
                })
            })
            .collect();

        for handle in handles {
            assert!(matches!(
                handle.await.unwrap().unwrap(),
                DispatchOutcome::Completed(_)
            ));
        }
        assert_eq!(repo.len().await, 10);
        assert_eq!(registry.active_sessions(), 0);
    }
}
