pub mod authenticate;
pub mod guards;

pub use guards::{ensure_admin, ensure_correct_user_or_admin, ensure_logged_in};
