use rand::distributions::Alphanumeric;
use rand::{rngs::OsRng, Rng};

/// Generates an opaque random token, used for session identifiers.
pub fn generate_token(len: usize) -> String {
    OsRng
        .sample_iter(&Alphanumeric)
        .take(len)
        .map(char::from)
        .collect()
}
