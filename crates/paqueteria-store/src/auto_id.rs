//! Client-side document ids.
//!
//! Firestore clients generate ids for `add` themselves: 20 characters drawn
//! from `[A-Za-z0-9]`, which makes collisions practically impossible.

use rand::Rng;
use rand::distributions::Alphanumeric;

pub const AUTO_ID_LEN: usize = 20;

pub fn auto_id() -> String {
    rand::thread_rng()
        .sample_iter(&Alphanumeric)
        .take(AUTO_ID_LEN)
        .map(char::from)
        .collect()
}
