//! End-to-end scenarios against a real data directory

use anyhow::Result;
use food_roulette_core::backend::domain::{FoodValidationError, SpinRequestOutcome, WheelGeometry};
use food_roulette_core::backend::storage::{KeyValueStore, MemoryStore, FOODS_KEY};
use food_roulette_core::{initialize_backend, AppConfig, AppState};
use shared::{AddFoodRequest, FoodItem};
use std::sync::Arc;
use tempfile::TempDir;

async fn setup() -> Result<(AppState, TempDir)> {
    let temp_dir = TempDir::new()?;
    let config = AppConfig {
        data_directory: Some(temp_dir.path().to_path_buf()),
        ..AppConfig::default()
    };
    let state = initialize_backend(&config).await?;
    Ok((state, temp_dir))
}

fn add(name: &str) -> AddFoodRequest {
    AddFoodRequest {
        name: name.to_string(),
    }
}

#[tokio::test]
async fn test_manage_catalog() -> Result<()> {
    let (state, _temp_dir) = setup().await?;
    let foods = &state.food_service;

    let added = foods.add_food(add("Ravioles")).await?;
    assert_eq!(added.food.name, "Ravioles");
    assert!(added.success_message.contains("Ravioles"));
    assert!(foods.active_foods().contains(&added.food));

    assert_eq!(
        foods.add_food(add("ravioles")).await,
        Err(FoodValidationError::DuplicateName("ravioles".to_string()))
    );

    let default_food = foods
        .foods()
        .into_iter()
        .find(|f| f.is_default)
        .expect("catalog has defaults");
    assert_eq!(
        foods.delete_food(&default_food.id).await,
        Err(FoodValidationError::CannotDeleteDefault)
    );

    let removed = foods.delete_food(&added.food.id).await?;
    assert_eq!(removed.id, added.food.id);
    assert!(foods.get_food(&added.food.id).is_none());
    Ok(())
}

#[tokio::test]
async fn test_daily_spins_then_unlock() -> Result<()> {
    let (state, _temp_dir) = setup().await?;
    let roulette = &state.roulette_service;
    let mut clock = 0.0;

    for _ in 0..2 {
        let plan = match roulette.request_spin(clock).await? {
            SpinRequestOutcome::Started(plan) => plan,
            other => panic!("expected a started spin, got {:?}", other),
        };

        let mut ticks = 0;
        let mut completed = None;
        while roulette.is_spinning() {
            clock += 16.0;
            let frame = roulette.advance(clock);
            ticks += frame.ticks.len();
            if frame.completed.is_some() {
                assert!(completed.is_none(), "completion reported twice");
                completed = frame.completed;
            }
        }

        let outcome = completed.expect("spin completes");
        let wheel = WheelGeometry::new(plan.slice_count)?;
        assert_eq!(wheel.slice_at_pointer(outcome.final_rotation), plan.winner_index);
        assert_eq!(outcome.food, state.food_service.active_foods()[plan.winner_index]);
        assert!(ticks > 0);
        clock += 500.0;
    }

    assert!(matches!(
        roulette.request_spin(clock).await?,
        SpinRequestOutcome::UnlockRequired(_)
    ));
    assert_eq!(state.quota_service.status().spins_today, 2);

    assert!(matches!(
        roulette.spin_after_unlock(clock)?,
        SpinRequestOutcome::Started(_)
    ));
    assert_eq!(state.quota_service.status().spins_today, 2);
    Ok(())
}

#[tokio::test]
async fn test_legacy_catalog_is_migrated_on_startup() -> Result<()> {
    let store = Arc::new(MemoryStore::new());
    store
        .set(
            FOODS_KEY,
            r##"[{"id":"sushi","name":"Sushi","color":"#FF6B6B","isDefault":true,"iconSource":7},
                 {"id":"custom-1700000000000","name":"Locro","color":"#4D96FF","isDefault":false}]"##,
        )
        .await?;

    let state = AppState::with_store(store.clone(), &AppConfig::default()).await;
    let foods = state.food_service.foods();

    assert_eq!(foods[0].id, "sushi");
    assert!(foods[0].is_active);
    assert_eq!(foods[1].name, "Locro");
    assert!(foods[2..].iter().all(|f| f.is_default && !f.is_active));

    let stored: Vec<FoodItem> = serde_json::from_str(&store.get(FOODS_KEY).await?.expect("written back"))?;
    assert_eq!(stored, foods);
    Ok(())
}
