pub mod factory;
pub mod password;
pub mod token_codec;

pub use factory::build_token_codec;
pub use token_codec::{InvalidTokenError, Principal, TokenCodec, TokenCodecError, UserRecord};
