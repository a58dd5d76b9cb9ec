use std::sync::Arc;

use sagaforge_domain::{
    ActorId, DomainError, EquipRejection, EquipmentSlot, Item, ItemName, ItemType, ScopeId,
};

use super::*;
use crate::infrastructure::clock::FixedClock;
use crate::infrastructure::persistence::InMemoryCharacterRepo;
use crate::infrastructure::ports::{
    CharacterRepo, MockCharacterRepo, MockClockPort, RepoError,
};
use crate::test_support::{character, now};

fn who() -> (ActorId, ScopeId) {
    (ActorId::new("actor-1"), ScopeId::new("guild-1"))
}

fn ops_with(repo: Arc<dyn CharacterRepo>) -> CharacterOps {
    CharacterOps::new(
        Arc::new(entities::Character::new(repo)),
        Arc::new(FixedClock(now())),
    )
}

async fn seeded() -> (Arc<InMemoryCharacterRepo>, CharacterOps) {
    let repo = Arc::new(InMemoryCharacterRepo::new());
    repo.create(&character("actor-1", "guild-1")).await.unwrap();
    let ops = ops_with(repo.clone());
    (repo, ops)
}

fn sword(level: u8) -> Item {
    Item::new(ItemName::new("Longsword").unwrap(), ItemType::Weapon)
        .with_slot(EquipmentSlot::MainHand)
        .with_required_level(level)
}

mod load_and_save {
    use super::*;

    #[tokio::test]
    async fn missing_character_is_not_found() {
        let mut repo = MockCharacterRepo::new();
        repo.expect_find_active().returning(|_, _| Ok(None));
        repo.expect_save().never();
        let ops = ops_with(Arc::new(repo));
        let (actor, scope) = who();

        let err = ops.add_gold(&actor, &scope, 10).await.unwrap_err();
        assert!(matches!(err, CharacterOpError::NotFound { .. }));
    }

    #[tokio::test]
    async fn rejected_mutation_is_not_saved() {
        let stored = character("actor-1", "guild-1");
        let mut repo = MockCharacterRepo::new();
        repo.expect_find_active()
            .returning(move |_, _| Ok(Some(stored.clone())));
        repo.expect_save().never();
        let ops = ops_with(Arc::new(repo));
        let (actor, scope) = who();

        let err = ops.spend_gold(&actor, &scope, 1_000).await.unwrap_err();
        assert!(matches!(err, CharacterOpError::Domain(DomainError::Constraint(_))));
    }

    #[tokio::test]
    async fn saves_with_clock_timestamp() {
        let stored = character("actor-1", "guild-1");
        let later = now() + chrono::Duration::hours(1);

        let mut repo = MockCharacterRepo::new();
        repo.expect_find_active()
            .returning(move |_, _| Ok(Some(stored.clone())));
        repo.expect_save()
            .withf(move |c| c.updated_at() == later && c.gold() == 150)
            .times(1)
            .returning(|_| Ok(()));
        let mut clock = MockClockPort::new();
        clock.expect_now().return_const(later);

        let ops = CharacterOps::new(
            Arc::new(entities::Character::new(Arc::new(repo))),
            Arc::new(clock),
        );
        let (actor, scope) = who();
        let change = ops.add_gold(&actor, &scope, 50).await.unwrap();
        assert_eq!(change.current, 150);
    }

    #[tokio::test]
    async fn save_failure_surfaces_repo_error() {
        let stored = character("actor-1", "guild-1");
        let mut repo = MockCharacterRepo::new();
        repo.expect_find_active()
            .returning(move |_, _| Ok(Some(stored.clone())));
        repo.expect_save()
            .returning(|_| Err(RepoError::storage("save", "read-only")));
        let ops = ops_with(Arc::new(repo));
        let (actor, scope) = who();

        let err = ops.heal(&actor, &scope, 1).await.unwrap_err();
        assert!(matches!(err, CharacterOpError::Repo(_)));
    }
}

mod gameplay {
    use super::*;

    #[tokio::test]
    async fn experience_levels_up_and_persists() {
        let (repo, ops) = seeded().await;
        let (actor, scope) = who();

        let gain = ops.add_experience(&actor, &scope, 400).await.unwrap();
        assert_eq!(gain.previous_level, 1);
        // 150 for level 2, 225 for 3, 337 for 4
        assert_eq!(gain.new_level, 4);

        let stored = repo.find_active(&actor, &scope).await.unwrap().unwrap();
        assert_eq!(stored.level(), 4);
        assert_eq!(stored.current_health(), stored.max_health());
    }

    #[tokio::test]
    async fn negative_experience_is_rejected() {
        let (_repo, ops) = seeded().await;
        let (actor, scope) = who();
        let err = ops.add_experience(&actor, &scope, -5).await.unwrap_err();
        assert!(matches!(err, CharacterOpError::Domain(DomainError::Validation(_))));
    }

    #[tokio::test]
    async fn level_locked_item_stays_in_inventory() {
        let (repo, ops) = seeded().await;
        let (actor, scope) = who();
        ops.add_item(&actor, &scope, sword(5)).await.unwrap();

        let err = ops.equip(&actor, &scope, "Longsword").await.unwrap_err();
        assert!(matches!(
            err,
            CharacterOpError::Domain(DomainError::Ineligible(EquipRejection::LevelTooLow {
                required: 5,
                actual: 1
            }))
        ));

        let stored = repo.find_active(&actor, &scope).await.unwrap().unwrap();
        assert_eq!(stored.inventory().len(), 1);
        assert!(stored.equipment().is_empty());
    }

    #[tokio::test]
    async fn decoded_item_flagged_equipped_still_reloads() {
        let (repo, ops) = seeded().await;
        let (actor, scope) = who();
        let item: Item = serde_json::from_str(
            r#"{"name":"Longsword","itemType":"weapon","slot":"mainHand","quantity":1,"equipped":true}"#,
        )
        .unwrap();

        ops.add_item(&actor, &scope, item).await.unwrap();

        let stored = repo.find_active(&actor, &scope).await.unwrap().unwrap();
        assert_eq!(stored.inventory().len(), 1);
        assert!(!stored.inventory()[0].is_equipped());
        ops.equip(&actor, &scope, "Longsword").await.unwrap();
    }

    #[tokio::test]
    async fn equip_then_unequip() {
        let (repo, ops) = seeded().await;
        let (actor, scope) = who();
        ops.add_item(&actor, &scope, sword(1)).await.unwrap();

        let outcome = ops.equip(&actor, &scope, "Longsword").await.unwrap();
        assert_eq!(outcome.slot, EquipmentSlot::MainHand);
        assert_eq!(outcome.displaced, None);

        ops.unequip(&actor, &scope, "Longsword").await.unwrap();
        let stored = repo.find_active(&actor, &scope).await.unwrap().unwrap();
        assert!(stored.equipment().is_empty());
        assert_eq!(stored.inventory().len(), 1);
        assert!(!stored.inventory()[0].is_equipped());
    }

    #[tokio::test]
    async fn damage_and_heal() {
        let (_repo, ops) = seeded().await;
        let (actor, scope) = who();

        let sheet = ops.view(&actor, &scope).await.unwrap();
        let max = sheet.combat.max_health;

        let outcome = ops.take_damage(&actor, &scope, max + 10).await.unwrap();
        assert!(outcome.reached_zero());

        let healed = ops.heal(&actor, &scope, 3).await.unwrap();
        assert_eq!(
            healed,
            HealOutcome::Healed {
                amount_healed: 3,
                new_hp: 3
            }
        );
    }

    #[tokio::test]
    async fn status_round_trip() {
        let (_repo, ops) = seeded().await;
        let (actor, scope) = who();

        ops.add_status(&actor, &scope, "Poisoned").await.unwrap();
        let sheet = ops.view(&actor, &scope).await.unwrap();
        assert_eq!(sheet.status_effects, vec!["poisoned".to_string()]);

        let removed = ops.remove_status(&actor, &scope, "poisoned").await.unwrap();
        assert_eq!(removed.as_str(), "poisoned");
        assert!(ops.remove_status(&actor, &scope, "poisoned").await.is_err());
        assert!(ops.add_status(&actor, &scope, "").await.is_err());
    }

    #[tokio::test]
    async fn deactivation_retires_the_character() {
        let (_repo, ops) = seeded().await;
        let (actor, scope) = who();

        ops.deactivate(&actor, &scope).await.unwrap();
        let err = ops.view(&actor, &scope).await.unwrap_err();
        assert!(matches!(err, CharacterOpError::NotFound { .. }));
    }

    #[tokio::test]
    async fn sheet_carries_derived_numbers() {
        let (_repo, ops) = seeded().await;
        let (actor, scope) = who();
        let sheet = ops.view(&actor, &scope).await.unwrap();

        assert_eq!(sheet.level, 1);
        assert_eq!(sheet.gold, 100);
        assert_eq!(
            sheet.skill_modifiers.len(),
            CharacterClass::Warrior.skills().len()
        );
        assert_eq!(sheet.experience_to_next_level, Some(150));

        let json = serde_json::to_value(&sheet).unwrap();
        assert!(json.get("skillModifiers").is_some());
        assert!(json.get("attackBonus").is_some());
    }
}
