use wellbeing_backend::{
    config::Config, db::connection::create_pool, repositories::otp as otp_repo,
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = Config::load()?;
    let pool = create_pool(&config.database_url).await?;

    let deleted = otp_repo::delete_expired_codes(&pool)
        .await
        .expect("cleanup expired reset codes");
    if deleted > 0 {
        tracing::info!("Deleted {} expired reset codes", deleted);
    }

    sqlx::query("VACUUM (ANALYZE) otp_codes").execute(&pool).await?;

    Ok(())
}
