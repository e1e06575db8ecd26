/*
 * Responsibility
 * - Router に紐づける共有コンテキスト (AppState)
 *   - tokens: TokenCodec (secret は構築時に注入, 以降 read-only)
 *   - users / jobs: in-memory repos
 * - Clone 前提で持つ (内部は Arc/Clone cheap)
 */
use std::sync::Arc;

use crate::repos::{job_repo::JobRepo, user_repo::UserRepo};
use crate::services::auth::TokenCodec;

#[derive(Clone, Debug)]
pub struct AppState {
    pub tokens: Arc<TokenCodec>,
    pub users: UserRepo,
    pub jobs: JobRepo,
}

impl AppState {
    pub fn new(tokens: Arc<TokenCodec>, users: UserRepo, jobs: JobRepo) -> Self {
        Self {
            tokens,
            users,
            jobs,
        }
    }
}
