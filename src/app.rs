use error_stack::{Report, Result, ResultExt};
use std::sync::Arc;
use thiserror::Error;

use crate::config::{self, StorageKind};
use crate::services::{FollowGraphService, PostService, TimelineAggregator, UserService};
use crate::store::{FollowGraphStore, MemoryStore, PgStore, PostStore, UserDirectory};

/// Users created by `murmur server --seed` on an empty directory.
pub const DEMO_USERS: [&str; 3] = ["Alfonso", "Ivan", "Alicia"];

#[derive(Debug, Clone)]
pub struct App {
    pub config: Arc<config::Server>,
    pub users: UserService,
    pub follows: FollowGraphService,
    pub timeline: TimelineAggregator,
    pub posts: PostService,
}

#[derive(Debug, Error)]
#[error("Failed to initialize App struct")]
pub struct AppError;

impl App {
    #[tracing::instrument(skip_all, fields(storage = ?cfg.storage))]
    pub async fn new(cfg: config::Server) -> Result<Self, AppError> {
        match (cfg.storage, cfg.db.as_ref()) {
            (StorageKind::Memory, ..) => {
                tracing::warn!("using in-memory storage, data will be lost on shutdown");
                Ok(Self::with_store(cfg, Arc::new(MemoryStore::new())))
            }
            (StorageKind::Postgres, Some(db)) => {
                let store = PgStore::connect(db).await.change_context(AppError)?;
                if db.run_migrations {
                    store.migrate().await.change_context(AppError)?;
                }
                Ok(Self::with_store(cfg, Arc::new(store)))
            }
            (StorageKind::Postgres, None) => Err(Report::new(AppError)
                .attach_printable("`db` section is required for postgres storage")),
        }
    }

    /// Wires every service to a single backend implementing all
    /// storage traits.
    #[must_use]
    pub fn with_store<S>(cfg: config::Server, store: Arc<S>) -> Self
    where
        S: UserDirectory + FollowGraphStore + PostStore + 'static,
    {
        let user_store: Arc<dyn UserDirectory> = store.clone();
        let follow_store: Arc<dyn FollowGraphStore> = store.clone();
        let post_store: Arc<dyn PostStore> = store;

        let follows = FollowGraphService::new(user_store.clone(), follow_store);
        Self {
            config: Arc::new(cfg),
            users: UserService::new(user_store.clone()),
            timeline: TimelineAggregator::new(user_store.clone(), follows.clone(), post_store.clone()),
            posts: PostService::new(user_store, post_store),
            follows,
        }
    }

    /// Creates [`DEMO_USERS`] if there are no users yet. Returns the
    /// amount of users created.
    #[tracing::instrument(skip(self), name = "app.seed_demo_users")]
    pub async fn seed_demo_users(&self) -> crate::Result<usize> {
        if !self.users.list().await?.is_empty() {
            tracing::info!("user directory is not empty, skipping demo users");
            return Ok(0);
        }

        for username in DEMO_USERS {
            self.users.create(username).await?;
        }

        tracing::info!(amount = DEMO_USERS.len(), "created demo users");
        Ok(DEMO_USERS.len())
    }
}
