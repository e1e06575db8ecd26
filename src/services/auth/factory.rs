/// Factory: build `TokenCodec` from application `Config`.
use std::sync::Arc;

use crate::config::Config;
use crate::services::auth::{TokenCodec, TokenCodecError};

pub fn build_token_codec(config: &Config) -> Result<Arc<TokenCodec>, TokenCodecError> {
    let codec = TokenCodec::new(
        config.secret_key.as_bytes(),
        config.token_ttl_seconds,
        config.token_leeway_seconds,
    )?;

    Ok(Arc::new(codec))
}
