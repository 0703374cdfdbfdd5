use crate::models::MatchKey;

/// Order two user ids canonically (byte-wise lexicographic)
#[inline]
pub fn canonical_pair<'a>(user_a: &'a str, user_b: &'a str) -> (&'a str, &'a str) {
    if user_a <= user_b {
        (user_a, user_b)
    } else {
        (user_b, user_a)
    }
}

/// Derive the match key for an unordered pair of users
///
/// `derive_key(a, b) == derive_key(b, a)` for every input.
#[inline]
pub fn derive_key(user_a: &str, user_b: &str) -> MatchKey {
    let (low, high) = canonical_pair(user_a, user_b);
    MatchKey::from_ordered(low, high)
}
