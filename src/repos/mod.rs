/*
 * Responsibility
 * - in-memory repositories (users / jobs)
 * - Clone 前提 (内部は Arc<RwLock<..>>)
 */
pub mod error;
pub mod job_repo;
pub mod user_repo;
