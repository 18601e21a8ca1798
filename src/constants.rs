use num_bigint::BigUint;
use once_cell::sync::Lazy;

//
// Sizes
//

/// The size in bytes of a compressed G1 point.
pub const G1_PROJ_NUM_BYTES: usize = 48;

/// The size in bytes of a compressed G2 point.
pub const G2_PROJ_NUM_BYTES: usize = 96;

/// The size in bytes of a BLS12-381 scalar.
pub const SCALAR_NUM_BYTES: usize = 32;

//
// DSTs ("nothing up my sleeve" domain separators)
//

/// Domain separator for deriving the credential scheme's G1 generator `g` by hashing to the curve.
pub const DST_CREDENTIAL_G1_GENERATOR: &[u8; 27] = b"PS_ABC_CREDENTIAL_G1_GEN_DS";

/// Domain separator for deriving the credential scheme's G2 generator `g~` by hashing to the curve.
pub const DST_CREDENTIAL_G2_GENERATOR: &[u8; 27] = b"PS_ABC_CREDENTIAL_G2_GEN_DS";

/// "Nothing-up-my-sleeve" seed used to deterministically derive the credential scheme's generators.
pub const SEED_CREDENTIAL_CONTEXT: &[u8; 30] = b"PS_ABC_CREDENTIAL_CONTEXT_SEED";

/// Domain separator for hashing an attribute's byte string into a scalar.
pub const DST_HASH_ATTRIBUTE: &[u8; 24] = b"PS_ABC_HASH_ATTRIBUTE_DS";

/// Domain separator for the issuance Fiat-Shamir transcript.
pub const DST_ISSUANCE_TRANSCRIPT: &[u8; 24] = b"PS_ABC_ISSUANCE_PROTOCOL";

/// Domain separator for the showing/disclosure Fiat-Shamir transcript.
pub const DST_SHOWING_TRANSCRIPT: &[u8; 23] = b"PS_ABC_SHOWING_PROTOCOL";

/// Domain separator for reducing a transcript's accumulated buffer to a `Z_p` challenge. The
/// per-protocol separation (issuance vs. showing) already happens via the label passed to
/// `Transcript::new`; this DST only keeps transcript challenges out of every other SHA-256 call
/// in the crate.
pub const DST_TRANSCRIPT_CHALLENGE: &[u8; 27] = b"PS_ABC_TRANSCRIPT_CHALLENGE";

/// Reserved attribute slot names that every issuer public key carries in addition to the
/// caller-supplied subscription names.
pub const RESERVED_ATTRIBUTE_USERNAME: &str = "username";
pub const RESERVED_ATTRIBUTE_PASSWORD: &str = "password";

// TODO(rand_core_hell): this crate used to carry an `aptos_crypto`-compatibility hack here to cope
// with a pinned, older `rand_core`. We depend directly on `blstrs`'s own (current) `rand_core`, so
// the hack is gone; `ff::Field::random` is used directly everywhere.
pub(crate) const SCALAR_FIELD_ORDER: Lazy<BigUint> =
    Lazy::new(crate::utils::biguint::get_scalar_field_order_as_biguint);
