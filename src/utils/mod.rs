use crate::constants::SCALAR_FIELD_ORDER;
use blstrs::Scalar;
use num_bigint::BigUint;
use num_integer::Integer;
use sha2::Digest;

pub(crate) mod biguint;
pub mod random;

/// Hashes `msg` under domain separation tag `dst` into a `Scalar` by computing
/// SHA-256(SHA-256(dst) || msg) as a 256-bit number and reducing it modulo the scalar field order.
/// (Same two-stage design used for hash-to-field elsewhere: https://crypto.stackexchange.com/questions/88002)
///
/// Domain separation from other SHA-256 calls elsewhere in the system is the caller's
/// responsibility via a distinct `dst`.
pub fn hash_to_scalar(msg: &[u8], dst: &[u8]) -> Scalar {
    let dst_hash = sha2::Sha256::new().chain_update(dst).finalize();

    let bytes = sha2::Sha256::new()
        .chain_update(dst_hash)
        .chain_update(msg)
        .finalize();

    let bignum = BigUint::from_bytes_be(&bytes);
    let remainder = bignum.mod_floor(&SCALAR_FIELD_ORDER);

    biguint::biguint_to_scalar(&remainder)
}
