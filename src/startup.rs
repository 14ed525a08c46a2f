//! Application Startup
//!
//! Storage selection, collection registration and server initialization.

use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::{Context, Result};
use axum::Router;
use serde_json::json;
use tokio::net::TcpListener;

use crate::application::services::{
    MessageCollection, PasswordAuthenticator, ThreadCollection, UserCollection,
};
use crate::config::{SeedUserSettings, Settings, StorageBackend};
use crate::domain::{
    EntityCollection, MessageRepository, ParentIds, RequestContext, ThreadRepository,
    UserRepository,
};
use crate::infrastructure::database;
use crate::infrastructure::repositories::{
    MemoryMessageRepository, MemoryThreadRepository, MemoryUserRepository,
    SqliteMessageRepository, SqliteThreadRepository, SqliteUserRepository,
};
use crate::presentation::http::{create_router, RouteTableBuilder};
use crate::presentation::middleware::{create_cors_layer, AuthState};
use crate::shared::error::AppError;

/// Storage behind the collections.
#[derive(Clone)]
pub struct Repositories {
    pub users: Arc<dyn UserRepository>,
    pub threads: Arc<dyn ThreadRepository>,
    pub messages: Arc<dyn MessageRepository>,
}

impl Repositories {
    pub fn in_memory() -> Self {
        Self {
            users: Arc::new(MemoryUserRepository::new()),
            threads: Arc::new(MemoryThreadRepository::new()),
            messages: Arc::new(MemoryMessageRepository::new()),
        }
    }

    pub fn sqlite(pool: sqlx::SqlitePool) -> Self {
        Self {
            users: Arc::new(SqliteUserRepository::new(pool.clone())),
            threads: Arc::new(SqliteThreadRepository::new(pool.clone())),
            messages: Arc::new(SqliteMessageRepository::new(pool)),
        }
    }

    /// Repositories for the configured backend. SQLite databases are
    /// migrated before use.
    pub async fn from_settings(settings: &Settings) -> Result<Self> {
        match settings.database.backend {
            StorageBackend::Memory => {
                tracing::info!("Using in-memory storage");
                Ok(Self::in_memory())
            }
            StorageBackend::Sqlite => {
                let pool = database::create_pool(&settings.database)
                    .await
                    .context("failed to open SQLite database")?;
                database::run_migrations(&pool)
                    .await
                    .context("failed to migrate SQLite database")?;
                tracing::info!("SQLite connection pool created");
                Ok(Self::sqlite(pool))
            }
        }
    }
}

/// Build the HTTP router: register every collection and seed the configured
/// user.
pub async fn build_router(settings: &Settings, repositories: Repositories) -> Result<Router> {
    let paging = settings.collections.clone();

    let users: Arc<dyn EntityCollection> = Arc::new(UserCollection::new(
        repositories.users.clone(),
        paging.clone(),
    ));
    let threads: Arc<dyn EntityCollection> = Arc::new(ThreadCollection::new(
        repositories.threads.clone(),
        repositories.messages.clone(),
        paging.clone(),
    ));
    let messages: Arc<dyn EntityCollection> = Arc::new(MessageCollection::new(
        repositories.messages.clone(),
        repositories.threads.clone(),
        threads.clone(),
        paging,
    ));

    if let Some(seed) = &settings.seed_user {
        seed_user(users.as_ref(), seed).await?;
    }

    let authenticator = Arc::new(PasswordAuthenticator::new(repositories.users.clone()));
    let auth = AuthState::new(authenticator, &settings.auth.realm)?;
    let cors = create_cors_layer(&settings.cors);

    let table = RouteTableBuilder::new(auth.clone(), cors.clone(), settings.server.max_body_bytes)
        .register(users)?
        .register(threads)?
        .register(messages)?
        .build();

    Ok(create_router(table, auth, cors))
}

/// Create the seed user. An existing account with the same username is
/// left as it is.
async fn seed_user(users: &dyn EntityCollection, seed: &SeedUserSettings) -> Result<()> {
    let body = json!({
        "firstName": seed.first_name,
        "secondName": seed.second_name,
        "username": seed.username,
        "password": seed.password,
    });
    let body = serde_json::to_vec(&body)?;

    match users
        .create(&RequestContext::system(), &ParentIds::new(), &body)
        .await
    {
        Ok(path) => {
            tracing::info!(username = %seed.username, path = %path, "Seed user created");
            Ok(())
        }
        Err(AppError::Conflict(_)) => {
            tracing::info!(username = %seed.username, "Seed user already exists");
            Ok(())
        }
        Err(e) => Err(e).context("failed to create seed user"),
    }
}

/// Application instance
pub struct Application {
    listener: TcpListener,
    router: Router,
}

impl Application {
    /// Build the application from settings
    pub async fn build(settings: Settings) -> Result<Self> {
        let repositories = Repositories::from_settings(&settings).await?;
        let router = build_router(&settings, repositories).await?;

        let addr = settings.server_addr();
        let listener = TcpListener::bind(&addr)
            .await
            .with_context(|| format!("failed to bind {}", addr))?;
        tracing::info!("Listening on {}", listener.local_addr()?);

        Ok(Self { listener, router })
    }

    /// Run the server until Ctrl-C
    pub async fn run_until_stopped(self) -> Result<()> {
        axum::serve(self.listener, self.router)
            .with_graceful_shutdown(shutdown_signal())
            .await?;
        Ok(())
    }

    /// Get the bound address
    pub fn local_addr(&self) -> std::io::Result<SocketAddr> {
        self.listener.local_addr()
    }
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
    tracing::info!("Shutdown signal received");
}
