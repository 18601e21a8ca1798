//! Conversions between `blstrs::Scalar` (the BLS12-381 scalar field) and `num_bigint::BigUint`,
//! used by the generic hash-to-scalar routine in [`crate::utils`].

use crate::constants::SCALAR_NUM_BYTES;
use blstrs::Scalar;
use ff::PrimeField;
use num_bigint::BigUint;

/// The order of the BLS12-381 scalar field, as a `BigUint`.
///
/// `0x73eda753299d7d483339d80809a1d80553bda402fffe5bfeffffffff00000001`
pub(crate) fn get_scalar_field_order_as_biguint() -> BigUint {
    BigUint::parse_bytes(
        b"73eda753299d7d483339d80809a1d80553bda402fffe5bfeffffffff00000001",
        16,
    )
    .expect("hardcoded BLS12-381 scalar field order must parse")
}

/// Converts a `BigUint` that is already reduced modulo the scalar field order into a `Scalar`.
pub(crate) fn biguint_to_scalar(v: &BigUint) -> Scalar {
    let mut bytes = v.to_bytes_le();
    assert!(
        bytes.len() <= SCALAR_NUM_BYTES,
        "value must already be reduced mod the scalar field order"
    );
    bytes.resize(SCALAR_NUM_BYTES, 0u8);

    let mut repr = <Scalar as PrimeField>::Repr::default();
    repr.as_mut().copy_from_slice(&bytes);

    Scalar::from_repr(repr).expect("a byte string reduced mod the field order is a valid scalar")
}
