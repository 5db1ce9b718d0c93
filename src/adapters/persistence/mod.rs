pub mod waitlist_user;

use secrecy::{ExposeSecret, SecretString};
use sqlx::PgPool;
use sqlx::postgres::PgPoolOptions;

pub struct PostgresPersistence {
    pub pool: PgPool,
}

pub async fn postgres_persistence(database_url: &SecretString) -> anyhow::Result<PostgresPersistence> {
    let pool = PgPoolOptions::new()
        .max_connections(10)
        .connect(database_url.expose_secret())
        .await?;

    sqlx::migrate!().run(&pool).await?;

    Ok(PostgresPersistence { pool })
}
