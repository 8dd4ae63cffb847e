use anyhow::{anyhow, Context, Result};
use chrono::{DateTime, NaiveDate, Utc};
use sqlx::Row;
use sqlx::{postgres::PgPoolOptions, PgPool};

use mg_expedition::DateWindow;
use mg_schemas::{DeliveryCandidate, PaymentStatus, ScheduledDeliveryItem, SeedFixture};

mod store;

pub use store::PgContractStore;

pub const ENV_DB_URL: &str = "MG_DATABASE_URL";

const DEFAULT_MAX_CONNECTIONS: u32 = 10;

/// Connect to Postgres using MG_DATABASE_URL.
pub async fn connect_from_env() -> Result<PgPool> {
    let url = std::env::var(ENV_DB_URL).with_context(|| format!("missing env var {ENV_DB_URL}"))?;
    connect(&url, DEFAULT_MAX_CONNECTIONS).await
}

pub async fn connect(url: &str, max_connections: u32) -> Result<PgPool> {
    let pool = PgPoolOptions::new()
        .max_connections(max_connections)
        .connect(url)
        .await
        .context("failed to connect to Postgres")?;

    Ok(pool)
}

/// Pool for DB-backed tests. Callers gate on MG_DATABASE_URL via `#[ignore]`.
pub async fn testkit_db_pool() -> Result<PgPool> {
    let pool = PgPoolOptions::new()
        .max_connections(2)
        .connect(
            &std::env::var(ENV_DB_URL)
                .with_context(|| format!("missing env var {ENV_DB_URL}"))?,
        )
        .await
        .context("testkit_db_pool connect failed")?;
    migrate(&pool).await?;
    Ok(pool)
}

/// Run embedded SQLx migrations.
pub async fn migrate(pool: &PgPool) -> Result<()> {
    sqlx::migrate!("./migrations")
        .run(pool)
        .await
        .context("db migrate failed")?;
    Ok(())
}

#[derive(Debug, Clone)]
pub struct DbStatus {
    pub ok: bool,
    pub has_contracts_table: bool,
}

/// Simple status query (connectivity + schema presence).
pub async fn status(pool: &PgPool) -> Result<DbStatus> {
    let (one,): (i32,) = sqlx::query_as::<_, (i32,)>("select 1")
        .fetch_one(pool)
        .await
        .context("status connectivity query failed")?;
    let ok = one == 1;

    let (exists,): (bool,) = sqlx::query_as::<_, (bool,)>(
        r#"
        select exists (
            select 1
            from information_schema.tables
            where table_schema='public' and table_name='contracts'
        )
        "#,
    )
    .fetch_one(pool)
    .await
    .context("status table-exists query failed")?;

    Ok(DbStatus {
        ok,
        has_contracts_table: exists,
    })
}

/// Items scheduled (or not) but not yet delivered. Zero before migration.
pub async fn count_undelivered_items(pool: &PgPool) -> Result<i64> {
    let st = status(pool).await?;
    if !st.has_contracts_table {
        return Ok(0);
    }

    let (n,): (i64,) = sqlx::query_as::<_, (i64,)>(
        r#"
        select count(*)::bigint
        from contract_items
        where delivered_at_utc is null
        "#,
    )
    .fetch_one(pool)
    .await
    .context("count_undelivered_items failed")?;

    Ok(n)
}

#[derive(Debug, Clone)]
pub struct NewContract {
    pub contract_number: String,
    pub customer_name: String,
    pub signed_at_utc: Option<DateTime<Utc>>,
    pub payment_status: PaymentStatus,
}

#[derive(Debug, Clone)]
pub struct NewContractItem {
    pub contract_id: i64,
    pub asset_code: String,
    pub asset_type: String,
    pub scheduled_delivery_date: Option<NaiveDate>,
}

pub async fn insert_contract(pool: &PgPool, c: &NewContract) -> Result<i64> {
    let (id,): (i64,) = sqlx::query_as::<_, (i64,)>(
        r#"
        insert into contracts (contract_number, customer_name, signed_at_utc, payment_status)
        values ($1, $2, $3, $4)
        returning contract_id
        "#,
    )
    .bind(&c.contract_number)
    .bind(&c.customer_name)
    .bind(c.signed_at_utc)
    .bind(c.payment_status.as_str())
    .fetch_one(pool)
    .await
    .context("insert_contract failed")?;

    Ok(id)
}

pub async fn insert_contract_item(pool: &PgPool, item: &NewContractItem) -> Result<i64> {
    let (id,): (i64,) = sqlx::query_as::<_, (i64,)>(
        r#"
        insert into contract_items (contract_id, asset_code, asset_type, scheduled_delivery_date)
        values ($1, $2, $3, $4)
        returning item_id
        "#,
    )
    .bind(item.contract_id)
    .bind(&item.asset_code)
    .bind(&item.asset_type)
    .bind(item.scheduled_delivery_date)
    .fetch_one(pool)
    .await
    .context("insert_contract_item failed")?;

    Ok(id)
}

pub async fn sign_contract(pool: &PgPool, contract_id: i64, at: DateTime<Utc>) -> Result<()> {
    let res = sqlx::query(
        r#"
        update contracts
        set signed_at_utc = $2
        where contract_id = $1
        "#,
    )
    .bind(contract_id)
    .bind(at)
    .execute(pool)
    .await
    .context("sign_contract failed")?;

    if res.rows_affected() != 1 {
        return Err(anyhow!("sign_contract: contract {contract_id} not found"));
    }
    Ok(())
}

pub async fn set_payment_status(
    pool: &PgPool,
    contract_id: i64,
    status: PaymentStatus,
) -> Result<()> {
    let res = sqlx::query(
        r#"
        update contracts
        set payment_status = $2
        where contract_id = $1
        "#,
    )
    .bind(contract_id)
    .bind(status.as_str())
    .execute(pool)
    .await
    .context("set_payment_status failed")?;

    if res.rows_affected() != 1 {
        return Err(anyhow!("set_payment_status: contract {contract_id} not found"));
    }
    Ok(())
}

/// Returns false if the item does not exist or was already delivered.
pub async fn mark_item_delivered(pool: &PgPool, item_id: i64, at: DateTime<Utc>) -> Result<bool> {
    let res = sqlx::query(
        r#"
        update contract_items
        set delivered_at_utc = $2
        where item_id = $1
          and delivered_at_utc is null
        "#,
    )
    .bind(item_id)
    .bind(at)
    .execute(pool)
    .await
    .context("mark_item_delivered failed")?;

    Ok(res.rows_affected() == 1)
}

/// Undelivered items scheduled inside `window`, joined with their contract.
/// Ordered by scheduled date, then item id.
pub async fn fetch_scheduled_deliveries(
    pool: &PgPool,
    window: &DateWindow,
) -> Result<Vec<DeliveryCandidate>> {
    let rows = sqlx::query(
        r#"
        select
            i.item_id,
            i.contract_id,
            c.contract_number,
            c.customer_name,
            i.asset_code,
            i.asset_type,
            i.scheduled_delivery_date,
            c.signed_at_utc,
            c.payment_status
        from contract_items i
        join contracts c on c.contract_id = i.contract_id
        where i.delivered_at_utc is null
          and i.scheduled_delivery_date >= $1
          and i.scheduled_delivery_date <= $2
        order by i.scheduled_delivery_date asc, i.item_id asc
        "#,
    )
    .bind(window.start())
    .bind(window.end())
    .fetch_all(pool)
    .await
    .context("fetch_scheduled_deliveries query failed")?;

    let mut out = Vec::with_capacity(rows.len());
    for r in rows {
        let raw_status = r.try_get::<String, _>("payment_status")?;
        let payment_status = PaymentStatus::parse(&raw_status)
            .ok_or_else(|| anyhow!("invalid payment_status in contracts: {raw_status}"))?;

        out.push(DeliveryCandidate {
            item: ScheduledDeliveryItem {
                id: r.try_get::<i64, _>("item_id")?,
                contract_id: r.try_get::<i64, _>("contract_id")?,
                contract_number: r.try_get::<String, _>("contract_number")?,
                customer_name: r.try_get::<String, _>("customer_name")?,
                asset_code: r.try_get::<String, _>("asset_code")?,
                asset_type: r.try_get::<String, _>("asset_type")?,
                scheduled_delivery_date: r.try_get::<NaiveDate, _>("scheduled_delivery_date")?,
                contract_signed_at: r.try_get::<Option<DateTime<Utc>>, _>("signed_at_utc")?,
            },
            payment_pending: payment_status.is_pending(),
        });
    }

    Ok(out)
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SeedReport {
    pub contracts: usize,
    pub items: usize,
}

/// Load a seed fixture in one transaction.
///
/// Contracts are upserted by `contract_number` and their items replaced, so
/// seeding the same fixture twice leaves the same rows behind.
pub async fn seed_from_fixture(pool: &PgPool, seed: &SeedFixture) -> Result<SeedReport> {
    let mut tx = pool.begin().await.context("seed begin tx failed")?;
    let mut report = SeedReport::default();

    for c in &seed.contracts {
        let (contract_id,): (i64,) = sqlx::query_as::<_, (i64,)>(
            r#"
            insert into contracts (contract_number, customer_name, signed_at_utc, payment_status)
            values ($1, $2, $3, $4)
            on conflict (contract_number) do update set
              customer_name = excluded.customer_name,
              signed_at_utc = excluded.signed_at_utc,
              payment_status = excluded.payment_status
            returning contract_id
            "#,
        )
        .bind(&c.contract_number)
        .bind(&c.customer_name)
        .bind(c.signed_at)
        .bind(c.payment_status.as_str())
        .fetch_one(&mut *tx)
        .await
        .with_context(|| format!("seed contract {} failed", c.contract_number))?;

        sqlx::query("delete from contract_items where contract_id = $1")
            .bind(contract_id)
            .execute(&mut *tx)
            .await
            .context("seed clear items failed")?;

        for item in &c.items {
            sqlx::query(
                r#"
                insert into contract_items (
                  contract_id, asset_code, asset_type, scheduled_delivery_date, delivered_at_utc
                ) values ($1, $2, $3, $4, $5)
                "#,
            )
            .bind(contract_id)
            .bind(&item.asset_code)
            .bind(&item.asset_type)
            .bind(item.scheduled_delivery_date)
            .bind(item.delivered_at)
            .execute(&mut *tx)
            .await
            .with_context(|| format!("seed item {} failed", item.asset_code))?;
            report.items += 1;
        }
        report.contracts += 1;
    }

    tx.commit().await.context("seed commit failed")?;
    tracing::info!(
        contracts = report.contracts,
        items = report.items,
        "seed fixture applied"
    );
    Ok(report)
}
