//! Vault password generation.

use rand::distr::Alphanumeric;
use rand::Rng;
use zeroize::Zeroizing;

/// Length of generated vault passwords.
pub const DEFAULT_PASSWORD_LEN: usize = 16;

/// Generate a random alphanumeric password of `len` characters.
///
/// Returned as `Zeroizing<String>` so intermediate copies are wiped on drop.
pub fn generate_password(len: usize) -> Zeroizing<String> {
    let password: String = rand::rng()
        .sample_iter(&Alphanumeric)
        .take(len)
        .map(char::from)
        .collect();
    Zeroizing::new(password)
}
