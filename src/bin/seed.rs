//! Seed script for development: populates a fresh database with sample data.
//!
//! Usage: `cargo run --bin seed`
//!
//! Requires the `DATABASE_URL` environment variable (reads .env).

use chrono::{DateTime, Duration, Local, Utc};
use sqlx::PgPool;
use storesync::services::delay::classify_freshness;
use uuid::Uuid;

/// (name, email, stores as (store name, identifier, hours since last update))
type SampleClient = (&'static str, &'static str, &'static [(&'static str, &'static str, i64)]);

const CLIENTS: &[SampleClient] = &[
    (
        "Client A",
        "clienta@example.com",
        &[
            ("Downtown", "A-001", 1),
            ("Harbor", "A-002", 3),
            ("Airport", "A-003", 30),
            ("Mall North", "A-004", 75),
        ],
    ),
    (
        "Client B",
        "clientb@example.com",
        &[("Central", "B-001", 2), ("Riverside", "B-002", 20)],
    ),
    ("Client C", "clientc@example.com", &[]),
];

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    let db_url = std::env::var("DATABASE_URL").expect("DATABASE_URL must be set");
    let pool = sqlx::postgres::PgPoolOptions::new()
        .max_connections(5)
        .connect(&db_url)
        .await?;

    // Run migrations first
    sqlx::migrate!("./migrations").run(&pool).await?;

    println!("=== storesync Seed Script ===");

    let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM clients")
        .fetch_one(&pool)
        .await?;
    if count > 0 {
        println!("[skip] Clients already exist ({count})");
        return Ok(());
    }

    for (name, email, stores) in CLIENTS {
        let client_id = seed_client(&pool, name, email).await?;

        // Yesterday's run keeps history non-empty.
        let yesterday = Utc::now() - Duration::days(1);
        seed_run(&pool, client_id, name, stores, yesterday, 24).await?;
        seed_run(&pool, client_id, name, stores, Utc::now(), 0).await?;
    }

    println!("\n=== Seed complete! ===");
    Ok(())
}

async fn seed_client(pool: &PgPool, name: &str, email: &str) -> anyhow::Result<i64> {
    let id: i64 = sqlx::query_scalar(
        "INSERT INTO clients (name, email, active) VALUES ($1, $2, true) RETURNING id",
    )
    .bind(name)
    .bind(email)
    .fetch_one(pool)
    .await?;
    println!("[done] Created client {name} (id {id})");
    Ok(id)
}

/// Insert one execution with its store snapshot and audit log, the way the
/// collector records a finished run.
async fn seed_run(
    pool: &PgPool,
    client_id: i64,
    client_name: &str,
    stores: &[(&str, &str, i64)],
    executed_at: DateTime<Utc>,
    extra_age_hours: i64,
) -> anyhow::Result<()> {
    let execution_id = Uuid::new_v4();
    let collected_local = executed_at.with_timezone(&Local);

    let snapshot: Vec<_> = stores
        .iter()
        .map(|(store, identifier, age_hours)| {
            let updated_at = executed_at - Duration::hours(age_hours + extra_age_hours);
            let freshness = classify_freshness(Some(updated_at), &collected_local);
            (*store, *identifier, updated_at, freshness)
        })
        .collect();

    let total = snapshot.len() as i32;
    let synced = snapshot.iter().filter(|(_, _, _, f)| f.is_synced).count() as i32;
    let percentage = if total > 0 {
        f64::from(synced) / f64::from(total) * 100.0
    } else {
        0.0
    };
    let (status, details) = if total == 0 {
        ("no_data", "No stores found".to_string())
    } else {
        ("success", format!("Report generated with {total} stores"))
    };

    sqlx::query(
        "INSERT INTO executions (id, client_id, client_name, total_stores, synced_count, late_count,
         sync_percentage, status, executed_at, origin)
         VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, 'local')",
    )
    .bind(execution_id)
    .bind(client_id)
    .bind(client_name)
    .bind(total)
    .bind(synced)
    .bind(total - synced)
    .bind((percentage * 100.0).round() / 100.0)
    .bind(status)
    .bind(executed_at)
    .execute(pool)
    .await?;

    for (store, identifier, updated_at, freshness) in &snapshot {
        sqlx::query(
            "INSERT INTO store_records (execution_id, client_id, client_name, store_name, identifier,
             updated_at, is_synced, delay_hours, delay_days, collected_at)
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10)",
        )
        .bind(execution_id)
        .bind(client_id)
        .bind(client_name)
        .bind(*store)
        .bind(*identifier)
        .bind(*updated_at)
        .bind(freshness.is_synced)
        .bind(freshness.delay_hours)
        .bind(freshness.delay_days)
        .bind(executed_at)
        .execute(pool)
        .await?;
    }

    sqlx::query(
        "INSERT INTO execution_logs (client_name, status, details, total_stores, executed_at, origin)
         VALUES ($1, $2::log_status, $3, $4, $5, 'local')",
    )
    .bind(client_name)
    .bind(status)
    .bind(&details)
    .bind(total)
    .bind(executed_at)
    .execute(pool)
    .await?;

    println!(
        "[done] {client_name}: run at {} with {total} stores ({synced} synced)",
        executed_at.format("%Y-%m-%d %H:%M")
    );
    Ok(())
}
