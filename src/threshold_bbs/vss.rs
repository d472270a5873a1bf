//! Shamir polynomials, Pedersen verifiable secret sharing and Lagrange
//! interpolation at zero.
//!
//! Commitments are dual-base: `C_k = g^{a_k} * h^{b_k}` where `f(X) = sum a_k X^k`
//! carries the secret and `g(X) = sum b_k X^k` the blinding. A dealt share is the
//! pair `(f(q), g(q))` and verifies against `prod_k C_k^{q^k}`.

use curv::elliptic::curves::{Bls12_381_1, Point, Scalar};
use curv::BigInt;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use zeroize::Zeroize;

use crate::errors::ArithmeticError;

/// `(t, n)` threshold parameters: any `threshold` shares of an honest dealing
/// reconstruct the secret, the sharing polynomial has degree `threshold - 1`.
///
/// Note that signing needs the larger quorum [`ThresholdParams::signing_quorum`]
/// because multiplying two sharings doubles the polynomial degree.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ThresholdParams {
    pub threshold: u16,
    pub share_count: u16,
}

impl ThresholdParams {
    /// Validates `1 < t <= n` and that a signing quorum `2t-1` fits in `n`.
    pub fn new(threshold: u16, share_count: u16) -> Result<Self, InvalidThresholdParams> {
        if threshold < 2 || threshold > share_count {
            return Err(InvalidThresholdParams::ThresholdNotInRange {
                t: threshold,
                n: share_count,
            });
        }
        if 2 * threshold - 1 > share_count {
            return Err(InvalidThresholdParams::NoSigningQuorum {
                t: threshold,
                n: share_count,
            });
        }
        Ok(Self {
            threshold,
            share_count,
        })
    }

    /// Degree of the sharing polynomials.
    pub fn degree(&self) -> u16 {
        self.threshold - 1
    }

    /// Smallest quorum able to interpolate the product of two sharings.
    pub fn signing_quorum(&self) -> u16 {
        2 * self.threshold - 1
    }
}

/// Construction [ThresholdParams] error
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum InvalidThresholdParams {
    #[error("threshold not in range t={}, range=[2,{}]", t, n)]
    ThresholdNotInRange { t: u16, n: u16 },
    #[error("signing quorum 2t-1={} exceeds share count {}", 2 * t - 1, n)]
    NoSigningQuorum { t: u16, n: u16 },
}

/// A sampled polynomial over Fr. Coefficients are overwritten on drop.
pub struct Polynomial {
    coefficients: Vec<Scalar<Bls12_381_1>>,
}

impl Polynomial {
    /// Samples `constant + a_1 X + ... + a_degree X^degree` with uniform `a_k`.
    pub fn sample(degree: u16, constant: Scalar<Bls12_381_1>) -> Self {
        let mut coefficients = Vec::with_capacity(usize::from(degree) + 1);
        coefficients.push(constant);
        for _ in 0..degree {
            coefficients.push(Scalar::random());
        }
        Self { coefficients }
    }

    pub fn constant_term(&self) -> &Scalar<Bls12_381_1> {
        &self.coefficients[0]
    }

    pub fn coefficients(&self) -> &[Scalar<Bls12_381_1>] {
        &self.coefficients
    }

    /// Horner evaluation.
    pub fn evaluate(&self, x: &Scalar<Bls12_381_1>) -> Scalar<Bls12_381_1> {
        let mut acc = Scalar::zero();
        for c in self.coefficients.iter().rev() {
            acc = &(&acc * x) + c;
        }
        acc
    }

    pub fn evaluate_at_index(&self, index: u16) -> Scalar<Bls12_381_1> {
        self.evaluate(&scalar_from_index(index))
    }
}

impl Zeroize for Polynomial {
    fn zeroize(&mut self) {
        for c in self.coefficients.iter_mut() {
            c.zeroize();
        }
    }
}

impl Drop for Polynomial {
    fn drop(&mut self) {
        self.zeroize();
    }
}

/// Public part of a Pedersen dealing: the commitment vector.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct PedersenVss {
    pub parameters: ThresholdParams,
    pub commitments: Vec<Point<Bls12_381_1>>,
}

/// One recipient's share of a Pedersen dealing.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct PedersenShare {
    pub value: Scalar<Bls12_381_1>,
    pub blinding: Scalar<Bls12_381_1>,
}

/// Private part of a Pedersen dealing, kept by the dealer and zeroized on drop.
pub struct PedersenDealing {
    secret_poly: Polynomial,
    blinding_poly: Polynomial,
}

impl PedersenVss {
    /// Deals `secret` under blinding base `h`. The returned [`PedersenDealing`]
    /// produces shares at arbitrary nonzero evaluation points, so a dealer can
    /// address recipients by whatever index set the protocol instance uses.
    pub fn share(
        params: &ThresholdParams,
        secret: Scalar<Bls12_381_1>,
        h: &Point<Bls12_381_1>,
    ) -> (Self, PedersenDealing) {
        let secret_poly = Polynomial::sample(params.degree(), secret);
        let blinding_poly = Polynomial::sample(params.degree(), Scalar::random());
        let commitments = secret_poly
            .coefficients()
            .iter()
            .zip(blinding_poly.coefficients())
            .map(|(a, b)| &(Point::generator() * a) + &(h * b))
            .collect();
        (
            Self {
                parameters: *params,
                commitments,
            },
            PedersenDealing {
                secret_poly,
                blinding_poly,
            },
        )
    }

    /// `prod_k C_k^{index^k}`, the public image of the share at `index`.
    pub fn commitment_to_share(&self, index: u16) -> Point<Bls12_381_1> {
        let x = scalar_from_index(index);
        let mut acc = Point::zero();
        for c in self.commitments.iter().rev() {
            acc = &(&acc * &x) + c;
        }
        acc
    }

    /// Checks `g^{value} * h^{blinding} == prod_k C_k^{index^k}`.
    pub fn validate_share(
        &self,
        share: &PedersenShare,
        index: u16,
        h: &Point<Bls12_381_1>,
    ) -> bool {
        if index == 0 || self.commitments.len() != usize::from(self.parameters.threshold) {
            return false;
        }
        let lhs = &(Point::generator() * &share.value) + &(h * &share.blinding);
        lhs == self.commitment_to_share(index)
    }
}

impl PedersenDealing {
    pub fn share_for(&self, index: u16) -> PedersenShare {
        PedersenShare {
            value: self.secret_poly.evaluate_at_index(index),
            blinding: self.blinding_poly.evaluate_at_index(index),
        }
    }

    pub fn secret(&self) -> &Scalar<Bls12_381_1> {
        self.secret_poly.constant_term()
    }

    pub fn blinding(&self) -> &Scalar<Bls12_381_1> {
        self.blinding_poly.constant_term()
    }
}

pub(crate) fn scalar_from_index(index: u16) -> Scalar<Bls12_381_1> {
    Scalar::from_bigint(&BigInt::from(u64::from(index)))
}

fn check_quorum(quorum: &[u16]) -> Result<(), ArithmeticError> {
    for (pos, index) in quorum.iter().enumerate() {
        if *index == 0 || quorum[..pos].contains(index) {
            return Err(ArithmeticError::DuplicateIndex);
        }
    }
    Ok(())
}

/// `lambda_index(0) = prod_{j in quorum, j != index} (0 - j) / (index - j)`.
pub fn lagrange_coeff_at_zero(
    index: u16,
    quorum: &[u16],
) -> Result<Scalar<Bls12_381_1>, ArithmeticError> {
    check_quorum(quorum)?;
    if index == 0 {
        return Err(ArithmeticError::DuplicateIndex);
    }
    let xi = scalar_from_index(index);
    let mut num = Scalar::from_bigint(&BigInt::from(1u64));
    let mut den = Scalar::from_bigint(&BigInt::from(1u64));
    for j in quorum.iter().filter(|j| **j != index) {
        let xj = scalar_from_index(*j);
        num = &num * &(&Scalar::zero() - &xj);
        den = &den * &(&xi - &xj);
    }
    let den_inv = den.invert().ok_or(ArithmeticError::DivZero)?;
    Ok(&num * &den_inv)
}

/// `sum_i lambda_i(0) y_i` over `(index, y)` pairs with distinct nonzero indices.
pub fn reconstruct_at_zero(
    points: &[(u16, Scalar<Bls12_381_1>)],
) -> Result<Scalar<Bls12_381_1>, ArithmeticError> {
    let indices = points.iter().map(|(i, _)| *i).collect::<Vec<_>>();
    check_quorum(&indices)?;
    let mut acc = Scalar::zero();
    for (i, y) in points {
        let lambda = lagrange_coeff_at_zero(*i, &indices)?;
        acc = &acc + &(&lambda * y);
    }
    Ok(acc)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bbs_plus::pedersen_blinding_base;

    fn params(t: u16, n: u16) -> ThresholdParams {
        ThresholdParams::new(t, n).unwrap()
    }

    #[test]
    fn threshold_params_reject_degenerate_shapes() {
        assert!(ThresholdParams::new(2, 3).is_ok());
        assert_eq!(
            ThresholdParams::new(0, 3),
            Err(InvalidThresholdParams::ThresholdNotInRange { t: 0, n: 3 })
        );
        assert_eq!(
            ThresholdParams::new(1, 3),
            Err(InvalidThresholdParams::ThresholdNotInRange { t: 1, n: 3 })
        );
        assert_eq!(
            ThresholdParams::new(4, 3),
            Err(InvalidThresholdParams::ThresholdNotInRange { t: 4, n: 3 })
        );
        assert_eq!(
            ThresholdParams::new(3, 4),
            Err(InvalidThresholdParams::NoSigningQuorum { t: 3, n: 4 })
        );
    }

    #[test]
    fn shares_reconstruct_for_every_quorum_of_size_at_least_t() {
        let h = pedersen_blinding_base();
        let secret = Scalar::random();
        let (_, dealing) = PedersenVss::share(&params(3, 5), secret.clone(), &h);

        let quorums: [&[u16]; 4] = [&[1, 2, 3], &[2, 4, 5], &[1, 2, 3, 4], &[1, 2, 3, 4, 5]];
        for quorum in quorums.iter() {
            let points = quorum
                .iter()
                .map(|&i| (i, dealing.share_for(i).value))
                .collect::<Vec<_>>();
            assert_eq!(reconstruct_at_zero(&points).unwrap(), secret);
        }
    }

    #[test]
    fn duplicate_and_zero_indices_are_rejected() {
        let share = Scalar::random();
        assert_eq!(
            reconstruct_at_zero(&[(1, share.clone()), (1, share.clone())]),
            Err(ArithmeticError::DuplicateIndex)
        );
        assert_eq!(
            reconstruct_at_zero(&[(0, share.clone()), (2, share)]),
            Err(ArithmeticError::DuplicateIndex)
        );
        assert_eq!(
            lagrange_coeff_at_zero(2, &[2, 3, 3]),
            Err(ArithmeticError::DuplicateIndex)
        );
    }

    #[test]
    fn honest_shares_validate() {
        let h = pedersen_blinding_base();
        let (vss, dealing) = PedersenVss::share(&params(2, 3), Scalar::random(), &h);
        for i in 1..=3 {
            assert!(vss.validate_share(&dealing.share_for(i), i, &h));
        }
    }

    #[test]
    fn tampered_share_fails_validation() {
        let h = pedersen_blinding_base();
        let (vss, dealing) = PedersenVss::share(&params(2, 3), Scalar::random(), &h);
        let mut share = dealing.share_for(2);
        share.value = &share.value + &Scalar::from_bigint(&BigInt::from(1u64));
        assert!(!vss.validate_share(&share, 2, &h));

        let mut share = dealing.share_for(2);
        share.blinding = &share.blinding + &Scalar::from_bigint(&BigInt::from(1u64));
        assert!(!vss.validate_share(&share, 2, &h));
    }

    #[test]
    fn share_does_not_validate_at_wrong_index() {
        let h = pedersen_blinding_base();
        let (vss, dealing) = PedersenVss::share(&params(2, 3), Scalar::random(), &h);
        assert!(!vss.validate_share(&dealing.share_for(2), 3, &h));
    }
}
