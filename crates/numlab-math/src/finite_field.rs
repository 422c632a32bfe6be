// ─────────────────────────────────────────────────────────────────────
// NumLab — Prime field arithmetic
// © 1998–2026 Miroslav Šotek. All rights reserved.
// Contact: www.anulum.li | protoscience@anulum.li
// ORCID: https://orcid.org/0009-0009-3560-0851
// License: GNU AGPL v3 | Commercial licensing available
// ─────────────────────────────────────────────────────────────────────
//! Elements of ℤ/pℤ.
//!
//! The modulus is expected to be prime; only `p > 1` is enforced, so the
//! inverse of a non-unit in a composite ring is simply wrong, not an error.

use std::fmt;

use numlab_types::error::{NumLabError, NumLabResult};

/// Immutable value in `[0, p)` together with its modulus.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct FieldElement {
    value: u64,
    modulus: u64,
}

#[allow(clippy::should_implement_trait)]
impl FieldElement {
    /// Reduce `value` into `[0, modulus)`; negative values wrap.
    pub fn new(value: i64, modulus: u64) -> NumLabResult<Self> {
        if modulus <= 1 {
            return Err(NumLabError::InvalidModulus { modulus });
        }
        let value = (value as i128).rem_euclid(modulus as i128) as u64;
        Ok(FieldElement { value, modulus })
    }

    pub fn from_u64(value: u64, modulus: u64) -> NumLabResult<Self> {
        if modulus <= 1 {
            return Err(NumLabError::InvalidModulus { modulus });
        }
        Ok(FieldElement {
            value: value % modulus,
            modulus,
        })
    }

    pub fn zero(modulus: u64) -> NumLabResult<Self> {
        Self::from_u64(0, modulus)
    }

    pub fn one(modulus: u64) -> NumLabResult<Self> {
        Self::from_u64(1, modulus)
    }

    pub fn value(&self) -> u64 {
        self.value
    }

    pub fn modulus(&self) -> u64 {
        self.modulus
    }

    pub fn is_zero(&self) -> bool {
        self.value == 0
    }

    fn same_field(&self, other: &Self) -> NumLabResult<()> {
        if self.modulus != other.modulus {
            return Err(NumLabError::FieldMismatch {
                left: self.modulus,
                right: other.modulus,
            });
        }
        Ok(())
    }

    fn with_value(&self, value: u128) -> Self {
        FieldElement {
            value: (value % self.modulus as u128) as u64,
            modulus: self.modulus,
        }
    }

    pub fn add(&self, other: &Self) -> NumLabResult<Self> {
        self.same_field(other)?;
        Ok(self.with_value(self.value as u128 + other.value as u128))
    }

    pub fn sub(&self, other: &Self) -> NumLabResult<Self> {
        self.same_field(other)?;
        Ok(self.with_value(self.value as u128 + self.modulus as u128 - other.value as u128))
    }

    pub fn mul(&self, other: &Self) -> NumLabResult<Self> {
        self.same_field(other)?;
        Ok(self.with_value(self.value as u128 * other.value as u128))
    }

    pub fn neg(&self) -> Self {
        self.with_value(self.modulus as u128 - self.value as u128)
    }

    /// Square-and-multiply exponentiation.
    pub fn pow(&self, mut exponent: u64) -> Self {
        let p = self.modulus as u128;
        let mut base = self.value as u128 % p;
        let mut acc = 1u128 % p;
        while exponent > 0 {
            if exponent & 1 == 1 {
                acc = acc * base % p;
            }
            base = base * base % p;
            exponent >>= 1;
        }
        self.with_value(acc)
    }

    /// Multiplicative inverse by Fermat's little theorem, `a^(p-2)`.
    pub fn inverse(&self) -> NumLabResult<Self> {
        if self.value == 0 {
            return Err(NumLabError::DivisionByZero {
                modulus: self.modulus,
            });
        }
        Ok(self.pow(self.modulus - 2))
    }

    pub fn div(&self, other: &Self) -> NumLabResult<Self> {
        self.same_field(other)?;
        self.mul(&other.inverse()?)
    }
}

impl fmt::Display for FieldElement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} (mod {})", self.value, self.modulus)
    }
}
