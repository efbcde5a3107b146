use anyhow::Result;
use futures_util::StreamExt;
use moka::future::Cache;
use once_cell::sync::Lazy;
use sqlx::MySqlPool;
use std::time::Duration;

use crate::model::project::ProjectSite;
use crate::store::lookup;

/// Project sites change rarely but are read on every geo-validated punch.
pub static SITE_CACHE: Lazy<Cache<String, ProjectSite>> = Lazy::new(|| {
    Cache::builder()
        .max_capacity(10_000)
        .time_to_live(Duration::from_secs(3600)) // 1h TTL
        .build()
});

/// Cached project-site lookup; falls through to the directory on a miss.
pub async fn get_site(
    pool: &MySqlPool,
    project_code: &str,
) -> Result<Option<ProjectSite>, sqlx::Error> {
    if let Some(site) = SITE_CACHE.get(project_code).await {
        return Ok(Some(site));
    }

    let site = lookup::project_site(pool, project_code).await?;
    if let Some(ref found) = site {
        SITE_CACHE
            .insert(project_code.to_string(), found.clone())
            .await;
    }
    Ok(site)
}

/// Drop a site after its directory entry changes.
pub async fn invalidate(project_code: &str) {
    SITE_CACHE.invalidate(project_code).await;
}

async fn batch_insert(sites: &[ProjectSite]) {
    let futures: Vec<_> = sites
        .iter()
        .map(|s| SITE_CACHE.insert(s.project_code.clone(), s.clone()))
        .collect();

    // Await all insertions concurrently
    futures::future::join_all(futures).await;
}

/// Load all project sites into the in-memory cache (batched).
pub async fn warmup_site_cache(pool: &MySqlPool, batch_size: usize) -> Result<()> {
    let mut stream = sqlx::query_as::<_, ProjectSite>(
        r#"
        SELECT project_code, latitude, longitude, radius_meters, require_location_check
        FROM projects
        "#,
    )
    .fetch(pool);

    let mut batch = Vec::with_capacity(batch_size);
    let mut total_count = 0usize;

    while let Some(row) = stream.next().await {
        batch.push(row?);
        total_count += 1;

        if batch.len() >= batch_size {
            batch_insert(&batch).await;
            batch.clear();
        }
    }

    if !batch.is_empty() {
        batch_insert(&batch).await;
    }

    log::info!("Project site cache warmup complete: {} sites", total_count);

    Ok(())
}
