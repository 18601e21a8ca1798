//! Additive secret sharing over `Z_p`.

use num_bigint::BigUint;
use num_traits::Zero;
use rand_core::{CryptoRng, RngCore};

use crate::smc::context::SmcContext;

/// An additive share of a field element. Carries only its value; the modulus is always supplied
/// out of band by an [`SmcContext`], never embedded in the share itself.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Share {
    value: BigUint,
}

impl Share {
    pub(crate) fn new(value: BigUint) -> Self {
        Self { value }
    }

    pub fn value(&self) -> &BigUint {
        &self.value
    }

    pub fn add(&self, other: &Share, ctx: &SmcContext) -> Share {
        Share::new((&self.value + &other.value) % ctx.prime())
    }

    /// `⟨x⟩ + scalar`; callers apply this only at the designated party.
    pub fn add_scalar(&self, scalar: &BigUint, ctx: &SmcContext) -> Share {
        Share::new((&self.value + scalar) % ctx.prime())
    }

    pub fn mul_scalar(&self, scalar: &BigUint, ctx: &SmcContext) -> Share {
        Share::new((&self.value * scalar) % ctx.prime())
    }

    /// `-⟨x⟩ mod p`.
    pub fn negate(&self, ctx: &SmcContext) -> Share {
        if self.value.is_zero() {
            Share::new(BigUint::zero())
        } else {
            Share::new(ctx.prime() - &self.value)
        }
    }

    pub fn to_bytes(&self, ctx: &SmcContext) -> Vec<u8> {
        let width = ctx.share_width();
        let raw = self.value.to_bytes_be();
        assert!(raw.len() <= width, "share value exceeds the context's configured width");
        let mut buf = vec![0u8; width - raw.len()];
        buf.extend_from_slice(&raw);
        buf
    }

    pub fn from_bytes(bytes: &[u8]) -> Share {
        Share::new(BigUint::from_bytes_be(bytes))
    }
}

/// Draws a uniformly random field element in `[0, p)` by rejection sampling over byte strings the
/// width of `p`.
pub fn random_field_element<R: RngCore + CryptoRng>(prime: &BigUint, rng: &mut R) -> BigUint {
    let width = (prime.bits() as usize).div_ceil(8);
    loop {
        let mut bytes = vec![0u8; width];
        rng.fill_bytes(&mut bytes);
        let candidate = BigUint::from_bytes_be(&bytes);
        if &candidate < prime {
            return candidate;
        }
    }
}

/// `share_secret(v, N)`: the first `N-1` shares are uniform, the last is `v` minus their sum.
pub fn share_secret<R: RngCore + CryptoRng>(
    v: &BigUint,
    n: usize,
    ctx: &SmcContext,
    rng: &mut R,
) -> Vec<Share> {
    assert!(n >= 2, "additive sharing needs at least 2 parties");
    let prime = ctx.prime();

    let mut values: Vec<BigUint> = (0..n - 1).map(|_| random_field_element(prime, rng)).collect();
    let sum = values.iter().fold(BigUint::zero(), |acc, s| (acc + s) % prime);
    let last = (prime + v - (sum % prime)) % prime;
    values.push(last);

    values.into_iter().map(Share::new).collect()
}

pub fn reconstruct(shares: &[Share], ctx: &SmcContext) -> BigUint {
    shares
        .iter()
        .fold(BigUint::zero(), |acc, s| (acc + &s.value) % ctx.prime())
}
