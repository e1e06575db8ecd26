/**
 * Responsibility
 * - repo が上位に伝える意味の定義
 */
use thiserror::Error;

#[derive(Debug, Error)]
pub enum RepoError {
    #[error("duplicate {resource}: {key}")]
    Conflict { resource: &'static str, key: String },
}
