//! Centralized BBS+ over BLS12-381: parameters, key generation, signing,
//! verification and wire formats.
//!
//! Based on the BBS+ scheme of Camenisch, Drijvers and Lehmann
//! [https://eprint.iacr.org/2016/663.pdf]. The distributed protocol in
//! [crate::threshold_bbs] produces signatures that verify under [verify]
//! unchanged; this module is also the verifier used at the edge.

use curv::arithmetic::*;
use curv::cryptographic_primitives::hashing::{Digest, DigestExt};
use curv::elliptic::curves::bls12_381::g1::G1Point;
use curv::elliptic::curves::bls12_381::Pair;
use curv::elliptic::curves::{Bls12_381_1, Bls12_381_2, Point, Scalar};
use curv::BigInt;
use ff_zeroize::Field;
use pairing_plus::bls12_381::Fq12;
use serde::{Deserialize, Serialize};
use sha2::Sha256;

use crate::errors::{ArithmeticError, SerializationError, VerificationError};
use crate::threshold_bbs::utilities::scalar_to_curve;

pub mod proof;

/// Domain-separation tag of the nothing-up-my-sleeve generator set.
const GENERATOR_TAG: &[u8] = b"BBS+-GEN-v1";
const MESSAGE_TAG: &[u8] = b"BBS+-MSG-v1";

pub const SIGNATURE_LENGTH: usize = 112;
pub const PUBLIC_KEY_LENGTH: usize = 96;

/// Public generator set `h0, h1, ..., h_L` for signing vectors of `L` messages.
///
/// `h_i = hash_to_curve_G1(tag || LE32(i))`, so any two instances with the same
/// message count are identical and nobody knows discrete logs between them.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct SignatureParams {
    pub h0: Point<Bls12_381_1>,
    pub h: Vec<Point<Bls12_381_1>>,
}

impl SignatureParams {
    pub fn new(message_count: usize) -> Self {
        let h0 = derive_generator(0);
        let h = (1..=message_count)
            .map(|i| derive_generator(i as u32))
            .collect();
        SignatureParams { h0, h }
    }

    pub fn message_count(&self) -> usize {
        self.h.len()
    }

    /// `B = g1 * h0^s * prod_i h_i^{m_i}`. Rejects message vectors that do not
    /// fit the generator set.
    pub fn commitment(
        &self,
        s: &Scalar<Bls12_381_1>,
        messages: &[Scalar<Bls12_381_1>],
    ) -> Result<Point<Bls12_381_1>, SerializationError> {
        if messages.len() != self.h.len() {
            return Err(SerializationError::BadLength {
                expected: self.h.len(),
                got: messages.len(),
            });
        }
        let mut b = &Point::<Bls12_381_1>::generator().to_point() + &(&self.h0 * s);
        for (h_i, m_i) in self.h.iter().zip(messages) {
            b = &b + &(h_i * m_i);
        }
        Ok(b)
    }
}

/// The blinding base shared by every Pedersen commitment in the DKGs. Same
/// point as `h0`, per the public generator procedure.
pub(crate) fn pedersen_blinding_base() -> Point<Bls12_381_1> {
    derive_generator(0)
}

fn derive_generator(index: u32) -> Point<Bls12_381_1> {
    let mut input = GENERATOR_TAG.to_vec();
    input.extend_from_slice(&index.to_le_bytes());
    Point::from_raw(G1Point::hash_to_curve(&input))
        .expect("hash to curve maps into the prime-order group")
}

/// Deterministic hash of an application message to a signable scalar.
pub fn hash_message_to_scalar(message: &[u8]) -> Scalar<Bls12_381_1> {
    let digest = Sha256::new().chain(MESSAGE_TAG).chain(message).result_bigint();
    Scalar::from_bigint(&digest)
}

#[derive(Clone, PartialEq)]
pub struct SecretKey(pub Scalar<Bls12_381_1>);

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct MasterPublicKey(pub Point<Bls12_381_2>);

#[derive(Clone)]
pub struct KeyPair {
    pub sk: SecretKey,
    pub pk: MasterPublicKey,
}

impl KeyPair {
    pub fn generate() -> Self {
        let x = loop {
            let x = Scalar::random();
            if !x.is_zero() {
                break x;
            }
        };
        let pk = MasterPublicKey(Point::generator() * &scalar_to_curve::<Bls12_381_2>(&x));
        KeyPair {
            sk: SecretKey(x),
            pk,
        }
    }
}

impl MasterPublicKey {
    pub fn to_bytes(&self) -> [u8; PUBLIC_KEY_LENGTH] {
        let mut out = [0u8; PUBLIC_KEY_LENGTH];
        out.copy_from_slice(&self.0.to_bytes(true));
        out
    }

    pub fn from_bytes(bytes: &[u8]) -> Result<Self, SerializationError> {
        if bytes.len() != PUBLIC_KEY_LENGTH {
            return Err(SerializationError::BadLength {
                expected: PUBLIC_KEY_LENGTH,
                got: bytes.len(),
            });
        }
        Point::from_bytes(bytes)
            .map(MasterPublicKey)
            .map_err(|_| SerializationError::NotOnCurve)
    }
}

/// A BBS+ signature `(A, e, s)` with `A = B^{1/(x+e)}`.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Signature {
    pub a: Point<Bls12_381_1>,
    pub e: Scalar<Bls12_381_1>,
    pub s: Scalar<Bls12_381_1>,
}

impl Signature {
    /// Wire format `A (48B compressed) || e (32B) || s (32B)`.
    pub fn to_bytes(&self) -> [u8; SIGNATURE_LENGTH] {
        let mut out = [0u8; SIGNATURE_LENGTH];
        out[..48].copy_from_slice(&self.a.to_bytes(true));
        out[48..80].copy_from_slice(&scalar_to_bytes(&self.e));
        out[80..].copy_from_slice(&scalar_to_bytes(&self.s));
        out
    }

    pub fn from_bytes(bytes: &[u8]) -> Result<Self, SerializationError> {
        if bytes.len() != SIGNATURE_LENGTH {
            return Err(SerializationError::BadLength {
                expected: SIGNATURE_LENGTH,
                got: bytes.len(),
            });
        }
        let a = Point::from_bytes(&bytes[..48]).map_err(|_| SerializationError::NotOnCurve)?;
        let e = scalar_from_bytes(&bytes[48..80])?;
        let s = scalar_from_bytes(&bytes[80..])?;
        Ok(Signature { a, e, s })
    }
}

/// 32-byte big-endian encoding of a scalar.
pub fn scalar_to_bytes(x: &Scalar<Bls12_381_1>) -> [u8; 32] {
    let raw = x.to_bigint().to_bytes();
    let mut out = [0u8; 32];
    out[32 - raw.len()..].copy_from_slice(&raw);
    out
}

/// Inverse of [scalar_to_bytes], rejecting values outside `[0, r)`.
pub fn scalar_from_bytes(bytes: &[u8]) -> Result<Scalar<Bls12_381_1>, SerializationError> {
    if bytes.len() != 32 {
        return Err(SerializationError::BadLength {
            expected: 32,
            got: bytes.len(),
        });
    }
    let n = BigInt::from_bytes(bytes);
    if &n >= Scalar::<Bls12_381_1>::group_order() {
        return Err(SerializationError::Scalar(ArithmeticError::NotInField));
    }
    Ok(Scalar::from_bigint(&n))
}

/// Signs a message vector. `e` is resampled in the negligible event `x + e = 0`.
pub fn sign(
    params: &SignatureParams,
    sk: &SecretKey,
    messages: &[Scalar<Bls12_381_1>],
) -> Result<Signature, SerializationError> {
    loop {
        let e = Scalar::random();
        let s = Scalar::random();
        let u = match (&sk.0 + &e).invert() {
            Some(u) => u,
            None => continue,
        };
        let b = params.commitment(&s, messages)?;
        return Ok(Signature { a: &b * &u, e, s });
    }
}

/// Accepts iff `A != O` and `e(A, W * g2^e) = e(B, g2)`. Pure in its inputs.
pub fn verify(
    params: &SignatureParams,
    pk: &MasterPublicKey,
    sig: &Signature,
    messages: &[Scalar<Bls12_381_1>],
) -> Result<(), VerificationError> {
    if sig.a.is_zero() {
        return Err(VerificationError::IdentityElement);
    }
    let b = params.commitment(&sig.s, messages)?;
    let e_g2 = scalar_to_curve::<Bls12_381_2>(&sig.e);
    let w_plus_e = &pk.0 + &(Point::<Bls12_381_2>::generator() * &e_g2);
    // e(A, W * g2^e) * e(-B, g2) == 1
    let product = Pair::efficient_pairing_mul(
        &sig.a,
        &w_plus_e,
        &(-&b),
        &Point::<Bls12_381_2>::generator().to_point(),
    );
    if product.e == Fq12::one() {
        Ok(())
    } else {
        Err(VerificationError::PairingMismatch)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sign_verify_roundtrip() {
        let params = SignatureParams::new(3);
        let keys = KeyPair::generate();
        let messages = vec![Scalar::random(), Scalar::random(), Scalar::random()];
        let sig = sign(&params, &keys.sk, &messages).unwrap();
        assert!(verify(&params, &keys.pk, &sig, &messages).is_ok());
    }

    #[test]
    fn tampered_message_is_rejected() {
        let params = SignatureParams::new(2);
        let keys = KeyPair::generate();
        let mut messages = vec![
            hash_message_to_scalar(b"first"),
            hash_message_to_scalar(b"second"),
        ];
        let sig = sign(&params, &keys.sk, &messages).unwrap();
        messages[1] = hash_message_to_scalar(b"forged");
        assert_eq!(
            verify(&params, &keys.pk, &sig, &messages),
            Err(VerificationError::PairingMismatch)
        );
    }

    #[test]
    fn identity_a_is_rejected() {
        let params = SignatureParams::new(1);
        let keys = KeyPair::generate();
        let messages = vec![Scalar::random()];
        let mut sig = sign(&params, &keys.sk, &messages).unwrap();
        sig.a = Point::zero();
        assert_eq!(
            verify(&params, &keys.pk, &sig, &messages),
            Err(VerificationError::IdentityElement)
        );
    }

    #[test]
    fn verification_is_deterministic() {
        let params = SignatureParams::new(1);
        let keys = KeyPair::generate();
        let messages = vec![hash_message_to_scalar(b"idempotent")];
        let sig = sign(&params, &keys.sk, &messages).unwrap();
        let first = verify(&params, &keys.pk, &sig, &messages);
        let second = verify(&params, &keys.pk, &sig, &messages);
        assert_eq!(first, second);
        assert!(first.is_ok());
    }

    #[test]
    fn signature_wire_roundtrip() {
        let params = SignatureParams::new(2);
        let keys = KeyPair::generate();
        let messages = vec![Scalar::random(), Scalar::random()];
        let sig = sign(&params, &keys.sk, &messages).unwrap();

        let bytes = sig.to_bytes();
        assert_eq!(bytes.len(), SIGNATURE_LENGTH);
        let decoded = Signature::from_bytes(&bytes).unwrap();
        assert_eq!(decoded, sig);
        assert!(verify(&params, &keys.pk, &decoded, &messages).is_ok());

        let pk_bytes = keys.pk.to_bytes();
        assert_eq!(MasterPublicKey::from_bytes(&pk_bytes).unwrap(), keys.pk);
    }

    #[test]
    fn mismatched_message_count_is_rejected() {
        let params = SignatureParams::new(2);
        let keys = KeyPair::generate();
        let short = vec![Scalar::random()];
        assert_eq!(
            sign(&params, &keys.sk, &short),
            Err(SerializationError::BadLength {
                expected: 2,
                got: 1
            })
        );

        let messages = vec![Scalar::random(), Scalar::random()];
        let sig = sign(&params, &keys.sk, &messages).unwrap();
        assert_eq!(
            verify(&params, &keys.pk, &sig, &short),
            Err(VerificationError::Malformed(SerializationError::BadLength {
                expected: 2,
                got: 1
            }))
        );
    }

    #[test]
    fn wire_format_error_paths() {
        assert_eq!(
            Signature::from_bytes(&[0u8; 64]),
            Err(SerializationError::BadLength {
                expected: SIGNATURE_LENGTH,
                got: 64
            })
        );
        assert_eq!(
            MasterPublicKey::from_bytes(&[0u8; 95]),
            Err(SerializationError::BadLength {
                expected: PUBLIC_KEY_LENGTH,
                got: 95
            })
        );
        // a scalar encoding of the group order itself is out of range
        let order = Scalar::<Bls12_381_1>::group_order().to_bytes();
        let mut encoded = [0u8; 32];
        encoded[32 - order.len()..].copy_from_slice(&order);
        assert_eq!(
            scalar_from_bytes(&encoded),
            Err(SerializationError::Scalar(ArithmeticError::NotInField))
        );
    }

    #[test]
    fn generators_are_deterministic_and_distinct() {
        let a = SignatureParams::new(4);
        let b = SignatureParams::new(4);
        assert_eq!(a, b);
        let mut all = vec![a.h0.clone()];
        all.extend(a.h.iter().cloned());
        for (i, p) in all.iter().enumerate() {
            assert!(!p.is_zero());
            for q in &all[..i] {
                assert_ne!(p, q);
            }
        }
    }
}
