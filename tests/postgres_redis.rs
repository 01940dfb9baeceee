//! End-to-end tests against real PostgreSQL and Redis
//!
//! Ignored by default. Run with:
//! `DATABASE_URL=postgres://... REDIS_URL=redis://... cargo test -- --ignored`

use bestiary::prelude::*;
use sqlx::postgres::PgPoolOptions;
use std::sync::Arc;

fn test_config(redis_url: String) -> AppConfig {
    AppConfig {
        database: DatabaseConfig::new(
            "localhost".to_string(),
            5432,
            "bestiary".to_string(),
            "postgres".to_string(),
            "password".to_string(),
            1,
            5,
            30,
            600,
            3600,
        ),
        cache: CacheConfig::new(redis_url, "bestiary_test".to_string(), 60, 30),
        pagination: PaginationConfig::default(),
    }
}

async fn connect() -> anyhow::Result<Bestiary> {
    let database_url = std::env::var("DATABASE_URL")?;
    let redis_url =
        std::env::var("REDIS_URL").unwrap_or_else(|_| "redis://localhost:6379".to_string());
    let config = test_config(redis_url);

    let pool = PgPoolOptions::new()
        .max_connections(5)
        .connect(&database_url)
        .await?;
    let manager = Arc::new(CacheManager::new(config.cache.clone())?);

    let bestiary = Bestiary::from_parts(pool, Some(manager), config);
    bestiary.migrate_all(false).await?;
    Ok(bestiary)
}

#[tokio::test]
#[ignore]
async fn animal_round_trip_through_cache() -> anyhow::Result<()> {
    let bestiary = connect().await?;
    bestiary.health_check().await?;
    bestiary.cache_health().await?;

    let animals = bestiary.animals();
    animals.invalidate_all().await;

    let created = animals.create(AnimalDraft::new("Luna", "owl", 3)).await?;

    let first = animals.get_by_id(created.id).await?;
    assert_eq!(first.cache_status, CacheStatus::Miss);
    let second = animals.get_by_id(created.id).await?;
    assert_eq!(second.cache_status, CacheStatus::Hit);
    assert_eq!(second.data.name, "Luna");

    let updated = animals
        .update(created.id, AnimalDraft::new("Luna", "barn owl", 4))
        .await?;
    assert!(updated.updated_at >= created.updated_at);
    let third = animals.get_by_id(created.id).await?;
    assert_eq!(third.cache_status, CacheStatus::Miss);
    assert_eq!(third.data.species, "barn owl");

    animals.delete(created.id).await?;
    assert!(animals.get_by_id(created.id).await.unwrap_err().is_not_found());
    Ok(())
}

#[tokio::test]
#[ignore]
async fn flower_pages_are_cached_and_invalidated() -> anyhow::Result<()> {
    let bestiary = connect().await?;
    let flowers = bestiary.flowers();
    flowers.invalidate_all().await;

    let created = flowers
        .create(FlowerDraft::new("Zinnia", "ultraviolet", "test row"))
        .await?;
    let query = ListQuery::new().filter("color", "ultraviolet");

    let first = flowers.list(&query).await?;
    assert_eq!(first.cache_status, CacheStatus::Miss);
    assert_eq!(first.data.len(), 1);
    assert_eq!(flowers.list(&query).await?.cache_status, CacheStatus::Hit);

    flowers.delete(created.id).await?;
    let after = flowers.list(&query).await?;
    assert_eq!(after.cache_status, CacheStatus::Miss);
    assert!(after.data.is_empty());
    Ok(())
}
