// ── Stable node addressing ──
//
// The hub keys its node registry by a short stable address. Addresses are
// derived from the camera name: strip separator characters, MD5 the rest,
// and reduce the 128-bit digest into a 10^8 decimal space. Distinct names
// can collide in that space; collisions are not detected here.

/// Decimal space the digest is reduced into.
const ADDRESS_SPACE: u128 = 100_000_000;

/// Derive a stable hub address from a camera name.
///
/// Deterministic: the same name always yields the same address.
pub fn stable_address(name: &str) -> String {
    let cleaned = clean_name(name);
    let digest = md5::compute(cleaned.as_bytes());
    let value = u128::from_be_bytes(digest.0) % ADDRESS_SPACE;
    value.to_string()
}

/// Strip separator characters so `Front_Door` and `FrontDoor` address the
/// same unit.
pub fn clean_name(name: &str) -> String {
    name.replace('_', "")
}
