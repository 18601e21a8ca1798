//! Attribute maps and the attribute-bytes-to-scalar hash.

use std::collections::BTreeMap;

use blstrs::Scalar;

use crate::constants::DST_HASH_ATTRIBUTE;
use crate::utils::hash_to_scalar;

/// A partial function `idx → attribute bytes`; key-unique by construction (`BTreeMap`), which
/// also gives us a stable, sorted iteration order for free.
pub type AttributeMap = BTreeMap<usize, Vec<u8>>;

/// Hashes an attribute's byte string into `Z_p`. Domain-separated from every other hash used in
/// this crate so an attribute value can never be mistaken for a Fiat–Shamir challenge or vice versa.
pub fn hash_attribute(bytes: &[u8]) -> Scalar {
    hash_to_scalar(bytes, DST_HASH_ATTRIBUTE.as_slice())
}

/// Builds the full, index-sorted message vector `(h(a_0), …, h(a_{L-1}))` from a complete
/// attribute map. Panics if the map does not cover exactly `0..l` — that is a caller bug, not a
/// recoverable runtime condition (enforced earlier via [`crate::error::CredentialError::ArityMismatch`]
/// at the façade boundary where attacker-controlled input could trigger it).
pub(crate) fn full_message_vector(attrs: &AttributeMap, l: usize) -> Vec<Scalar> {
    debug_assert_eq!(attrs.len(), l, "attribute map must cover every slot");
    (0..l)
        .map(|idx| hash_attribute(attrs.get(&idx).expect("attribute map must cover every slot")))
        .collect()
}
