/*
 * Responsibility
 * - tracing / panic hook の初期化
 * - Config読み込み → 依存生成 (TokenCodec, repos) → Router 組み立て
 * - authenticate を v1 全体に 1 回、HTTP middleware を最外に適用
 * - axum::serve() で起動
 */
use std::{panic, process};

use anyhow::{Context, Result};
use axum::Router;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use crate::config::Config;
use crate::repos::{
    job_repo::JobRepo,
    user_repo::{UserRepo, UserRow},
};
use crate::services::auth::{build_token_codec, password::hash_password};
use crate::state::AppState;
use crate::{api, middleware};

fn init_tracing() {
    // Prefer RUST_LOG if set; otherwise use a sensible default.
    // Ex:
    // RUST_LOG=info,jobly_api=debug,tower_http=debug cargo run
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info,tower_http=info"));

    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer())
        .init();
}

fn init_panic_hook(abort_on_panic: bool) {
    let default_hook = panic::take_hook();

    panic::set_hook(Box::new(move |info| {
        // stderr can be hidden depending on how the process is launched.
        tracing::error!(?info, "panic");

        // Development: crash the whole process so we notice immediately.
        if abort_on_panic {
            process::abort();
        } else {
            default_hook(info);
        }
    }))
}

pub async fn run() -> Result<()> {
    init_tracing();
    let config = Config::from_env().context("failed to load configuration")?;
    init_panic_hook(!config.app_env.is_production());

    tracing::info!(
        "starting API in {:?} mode on {}",
        config.app_env,
        config.addr
    );

    let state = build_state(&config).await?;
    let app = build_router(state, &config);

    let listener = tokio::net::TcpListener::bind(config.addr)
        .await
        .with_context(|| format!("failed to bind {}", config.addr))?;
    axum::serve(listener, app).await?;
    Ok(())
}

/// Secret is injected here once; nothing downstream reads it from the environment.
pub async fn build_state(config: &Config) -> Result<AppState> {
    let tokens = build_token_codec(config).context("failed to build token codec")?;
    let users = UserRepo::new();
    let jobs = JobRepo::new();

    if let Some(admin) = &config.bootstrap_admin {
        let password_hash = hash_password(&admin.password)
            .map_err(|e| anyhow::anyhow!("failed to hash bootstrap admin password: {e}"))?;
        users
            .create(UserRow {
                username: admin.username.clone(),
                password_hash,
                first_name: "Admin".to_string(),
                last_name: "User".to_string(),
                email: format!("{}@localhost.localdomain", admin.username),
                is_admin: true,
            })
            .await?;
        tracing::info!(username = %admin.username, "bootstrap admin created");
    }

    Ok(AppState::new(tokens, users, jobs))
}

pub fn build_router(state: AppState, config: &Config) -> Router {
    let v1 = middleware::auth::authenticate::apply(api::v1::routes(), state.clone());

    let router = Router::new().nest("/api/v1", v1).with_state(state);

    middleware::http::apply(router, config)
}
