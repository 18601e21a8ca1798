//! Random scalar sampling.
//!
//! Earlier iterations of this crate carried a `rand_core_hell` workaround here to bridge an
//! older, pinned `rand_core` against `blstrs`'s own. Since we no longer pin an older `rand_core`,
//! plain `ff::Field::random` suffices.

use blstrs::Scalar;
use ff::Field;
use rand_core::{CryptoRng, RngCore};

/// Returns a uniformly random `blstrs::Scalar`.
pub fn random_scalar<R: RngCore + CryptoRng>(rng: &mut R) -> Scalar {
    Scalar::random(rng)
}

/// Returns `n` uniformly random `blstrs::Scalar`s.
pub fn random_scalars<R: RngCore + CryptoRng>(n: usize, rng: &mut R) -> Vec<Scalar> {
    (0..n).map(|_| random_scalar(rng)).collect()
}
