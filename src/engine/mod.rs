mod check_in_api;
mod geocode_api;
mod guestbook_api;
mod helpers;
mod photo_api;
pub mod realtime;
mod route_stop_api;
mod stats_api;

use std::sync::Arc;

use oso::Oso;
use sqlx::Pool;
use tokio::{sync::broadcast, task::JoinHandle};

use crate::{
    api::API,
    auth::{authorizor, Journal, User},
    config::Config,
    db::{self, Database},
    entities::RecordKind,
    error::{unauthorized_error, Error},
};

const CHANGES_CAPACITY: usize = 64;

/// Configured handle to the record store. Built once at startup and shared.
pub struct Engine {
    pool: Pool<Database>,
    config: Arc<Config>,
    authorizor: Oso,
    changes: broadcast::Sender<RecordKind>,
    listener: JoinHandle<()>,
}

impl Engine {
    #[tracing::instrument(name = "Engine::new", skip_all)]
    pub async fn new(pool: Pool<Database>, config: Arc<Config>) -> Result<Self, Error> {
        db::ensure_schema(&pool).await?;

        let (changes, _) = broadcast::channel(CHANGES_CAPACITY);
        let listener = realtime::listen(&pool, changes.clone()).await?;

        Ok(Self {
            pool,
            config,
            authorizor: authorizor::new()?,
            changes,
            listener,
        })
    }
}

impl Engine {
    pub fn authorize<Action>(&self, user: User, action: Action) -> Result<(), Error>
    where
        Action: oso::ToPolar,
    {
        if self.authorizor.is_allowed(user, action, Journal::default())? {
            return Ok(());
        }

        Err(unauthorized_error())
    }
}

impl Drop for Engine {
    fn drop(&mut self) {
        self.listener.abort();
    }
}

impl API for Engine {}
