use anyhow::Context;
use sqlx::PgPool;
use time::OffsetDateTime;
use uuid::Uuid;

use super::repo_types::{NewScan, Scan};

const SCAN_COLUMNS: &str = "id, user_id, created_at, lighting_ok, face_ok, angle, source_image, \
     result_image, score_total, smoothness, redness, tone, oiliness, eyebag, acne, summary";

pub async fn insert(db: &PgPool, new: &NewScan) -> anyhow::Result<Scan> {
    let sql = format!(
        r#"
        INSERT INTO scans (user_id, lighting_ok, face_ok, angle, source_image, result_image,
                           score_total, smoothness, redness, tone, oiliness, eyebag, acne, summary)
        VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14)
        RETURNING {SCAN_COLUMNS}
        "#
    );
    let scan = sqlx::query_as::<_, Scan>(&sql)
        .bind(new.user_id)
        .bind(new.lighting_ok)
        .bind(new.face_ok)
        .bind(&new.angle)
        .bind(&new.source_image)
        .bind(&new.result_image)
        .bind(new.score_total)
        .bind(new.radar.smoothness)
        .bind(new.radar.redness)
        .bind(new.radar.tone)
        .bind(new.radar.oiliness)
        .bind(new.radar.eyebag)
        .bind(new.radar.acne)
        .bind(&new.summary)
        .fetch_one(db)
        .await
        .context("insert scan")?;
    Ok(scan)
}

/// Newest first, with the total count for the user.
pub async fn list_page(db: &PgPool, user_id: Uuid, limit: i64, offset: i64) -> anyhow::Result<(i64, Vec<Scan>)> {
    let total: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM scans WHERE user_id = $1")
        .bind(user_id)
        .fetch_one(db)
        .await
        .context("count scans")?;

    let sql = format!(
        r#"
        SELECT {SCAN_COLUMNS}
        FROM scans
        WHERE user_id = $1
        ORDER BY created_at DESC
        LIMIT $2 OFFSET $3
        "#
    );
    let rows = sqlx::query_as::<_, Scan>(&sql)
        .bind(user_id)
        .bind(limit)
        .bind(offset)
        .fetch_all(db)
        .await
        .context("list scans")?;
    Ok((total, rows))
}

/// Scans created at or after `since`, oldest first.
pub async fn since(db: &PgPool, user_id: Uuid, since: OffsetDateTime) -> anyhow::Result<Vec<Scan>> {
    let sql = format!(
        r#"
        SELECT {SCAN_COLUMNS}
        FROM scans
        WHERE user_id = $1 AND created_at >= $2
        ORDER BY created_at ASC
        "#
    );
    let rows = sqlx::query_as::<_, Scan>(&sql)
        .bind(user_id)
        .bind(since)
        .fetch_all(db)
        .await
        .context("scans in window")?;
    Ok(rows)
}

pub async fn latest(db: &PgPool, user_id: Uuid) -> anyhow::Result<Option<Scan>> {
    let sql = format!(
        r#"
        SELECT {SCAN_COLUMNS}
        FROM scans
        WHERE user_id = $1
        ORDER BY created_at DESC
        LIMIT 1
        "#
    );
    let row = sqlx::query_as::<_, Scan>(&sql)
        .bind(user_id)
        .fetch_optional(db)
        .await
        .context("latest scan")?;
    Ok(row)
}

pub async fn find(db: &PgPool, user_id: Uuid, scan_id: Uuid) -> anyhow::Result<Option<Scan>> {
    let sql = format!(
        r#"
        SELECT {SCAN_COLUMNS}
        FROM scans
        WHERE id = $1 AND user_id = $2
        "#
    );
    let row = sqlx::query_as::<_, Scan>(&sql)
        .bind(scan_id)
        .bind(user_id)
        .fetch_optional(db)
        .await
        .context("get scan")?;
    Ok(row)
}
