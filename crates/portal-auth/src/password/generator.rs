//! Random credentials for accounts created without a chosen password.

use rand::Rng;
use rand::distributions::Alphanumeric;

/// Length of generated public user ids.
const USER_ID_LENGTH: usize = 10;

/// Generates a random alphanumeric password of the given length.
pub fn generate_password(length: usize) -> String {
    rand::thread_rng()
        .sample_iter(&Alphanumeric)
        .take(length)
        .map(char::from)
        .collect()
}

/// Generates a random 10-digit public user id.
pub fn generate_user_id() -> String {
    let mut rng = rand::thread_rng();
    (0..USER_ID_LENGTH)
        .map(|_| char::from(b'0' + rng.gen_range(0..10u8)))
        .collect()
}
