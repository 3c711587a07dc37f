use std::sync::Arc;

use sqlx::PgPool;

use crate::{
    config::Config, services::risk::RiskModel, services::session::SessionStore,
    utils::email::OtpMailer,
};

#[derive(Clone)]
pub struct AppState {
    pub pool: PgPool,
    pub config: Config,
    pub sessions: SessionStore,
    pub mailer: Arc<dyn OtpMailer>,
    pub model: Arc<dyn RiskModel>,
}

impl AppState {
    pub fn new(
        pool: PgPool,
        config: Config,
        mailer: Arc<dyn OtpMailer>,
        model: Arc<dyn RiskModel>,
    ) -> Self {
        Self {
            pool,
            config,
            sessions: SessionStore::default(),
            mailer,
            model,
        }
    }
}
