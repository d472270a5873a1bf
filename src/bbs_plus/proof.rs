//! Zero-knowledge proof of knowledge of a BBS+ signature with selective
//! disclosure, after Camenisch-Drijvers-Lehmann.
//!
//! The prover randomizes the signature into `(A', Abar, d)` and proves, via two
//! Schnorr relations made non-interactive with Fiat-Shamir:
//!
//! * `Abar - d = -e * A' + r2 * h0`
//! * `g1 + sum_{i in D} m_i h_i = r3 * d - s' * h0 - sum_{i notin D} m_i h_i`
//!
//! together with the pairing check `e(A', W) = e(Abar, g2)`. Disclosed message
//! indices are 1-based, matching the generator numbering.

use std::collections::{BTreeMap, BTreeSet};

use curv::arithmetic::*;
use curv::cryptographic_primitives::hashing::{Digest, DigestExt};
use curv::elliptic::curves::bls12_381::Pair;
use curv::elliptic::curves::{Bls12_381_1, Bls12_381_2, Point, Scalar};
use curv::BigInt;
use ff_zeroize::Field;
use pairing_plus::bls12_381::Fq12;
use serde::{Deserialize, Serialize};
use sha2::Sha256;
use zeroize::Zeroize;

use crate::bbs_plus::{MasterPublicKey, Signature, SignatureParams};
use crate::errors::{SerializationError, VerificationError};

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct SelectiveDisclosureProof {
    pub a_prime: Point<Bls12_381_1>,
    pub a_bar: Point<Bls12_381_1>,
    pub d: Point<Bls12_381_1>,
    pub t1: Point<Bls12_381_1>,
    pub t2: Point<Bls12_381_1>,
    pub z_e: Scalar<Bls12_381_1>,
    pub z_r2: Scalar<Bls12_381_1>,
    pub z_r3: Scalar<Bls12_381_1>,
    pub z_s: Scalar<Bls12_381_1>,
    /// Responses for the hidden messages, keyed by 1-based index.
    pub z_hidden: BTreeMap<u16, Scalar<Bls12_381_1>>,
}

impl SelectiveDisclosureProof {
    /// Proves knowledge of `sig` on `messages`, disclosing exactly the 1-based
    /// indices in `disclosed`. `nonce` binds the proof to the verifier's
    /// challenge. Rejects message vectors that do not fit the generator set and
    /// disclosed indices outside `[1, L]`.
    pub fn prove(
        params: &SignatureParams,
        sig: &Signature,
        messages: &[Scalar<Bls12_381_1>],
        disclosed: &BTreeSet<u16>,
        nonce: &[u8],
    ) -> Result<Self, SerializationError> {
        let count = params.message_count();
        for i in disclosed {
            if *i < 1 || usize::from(*i) > count {
                return Err(SerializationError::BadLength {
                    expected: count,
                    got: usize::from(*i),
                });
            }
        }

        let b = params.commitment(&sig.s, messages)?;
        let mut r1 = loop {
            let r = Scalar::random();
            if !r.is_zero() {
                break r;
            }
        };
        let mut r2 = Scalar::random();
        let a_prime = &sig.a * &r1;
        let b_r1 = &b * &r1;
        let a_bar = &b_r1 - &(&a_prime * &sig.e);
        let d = &b_r1 - &(&params.h0 * &r2);
        let mut r3 = r1.invert().expect("r1 is sampled nonzero");
        let mut s_prime = &sig.s - &(&r2 * &r3);

        let hidden: Vec<u16> = (1..=count as u16).filter(|i| !disclosed.contains(i)).collect();
        let mut rt_e = Scalar::random();
        let mut rt_r2 = Scalar::random();
        let mut rt_r3 = Scalar::random();
        let mut rt_s = Scalar::random();
        let mut rt_hidden: BTreeMap<u16, Scalar<Bls12_381_1>> = hidden
            .iter()
            .map(|i| (*i, Scalar::random()))
            .collect();

        let t1 = &(&a_prime * &rt_e) + &(&params.h0 * &rt_r2);
        let mut t2 = &(&d * &rt_r3) + &(&params.h0 * &rt_s);
        for (i, rt) in &rt_hidden {
            t2 = &t2 + &(&params.h[usize::from(*i) - 1] * rt);
        }

        let disclosed_messages: Vec<(u16, &Scalar<Bls12_381_1>)> = disclosed
            .iter()
            .map(|i| (*i, &messages[usize::from(*i) - 1]))
            .collect();
        let c = challenge(
            &a_prime,
            &a_bar,
            &d,
            &t1,
            &t2,
            count,
            &disclosed_messages,
            nonce,
        );

        let z_e = &rt_e - &(&c * &sig.e);
        let z_r2 = &rt_r2 + &(&c * &r2);
        let z_r3 = &rt_r3 + &(&c * &r3);
        let z_s = &rt_s - &(&c * &s_prime);
        let z_hidden = hidden
            .iter()
            .map(|i| {
                let rt = &rt_hidden[i];
                let m = &messages[usize::from(*i) - 1];
                (*i, rt - &(&c * m))
            })
            .collect();

        r1.zeroize();
        r2.zeroize();
        r3.zeroize();
        s_prime.zeroize();
        rt_e.zeroize();
        rt_r2.zeroize();
        rt_r3.zeroize();
        rt_s.zeroize();
        for rt in rt_hidden.values_mut() {
            rt.zeroize();
        }

        Ok(SelectiveDisclosureProof {
            a_prime,
            a_bar,
            d,
            t1,
            t2,
            z_e,
            z_r2,
            z_r3,
            z_s,
            z_hidden,
        })
    }

    /// Verifies against the disclosed messages (1-based index -> value).
    pub fn verify(
        &self,
        params: &SignatureParams,
        pk: &MasterPublicKey,
        disclosed: &BTreeMap<u16, Scalar<Bls12_381_1>>,
        nonce: &[u8],
    ) -> Result<(), VerificationError> {
        if self.a_prime.is_zero() {
            return Err(VerificationError::IdentityElement);
        }
        let count = params.message_count();
        let all_indices: BTreeSet<u16> = (1..=count as u16).collect();
        let claimed: BTreeSet<u16> = disclosed
            .keys()
            .chain(self.z_hidden.keys())
            .copied()
            .collect();
        if claimed != all_indices || disclosed.keys().any(|i| self.z_hidden.contains_key(i)) {
            return Err(VerificationError::PairingMismatch);
        }

        // e(A', W) * e(-Abar, g2) == 1
        let pairing = Pair::efficient_pairing_mul(
            &self.a_prime,
            &pk.0,
            &(-&self.a_bar),
            &Point::<Bls12_381_2>::generator().to_point(),
        );
        if pairing.e != Fq12::one() {
            return Err(VerificationError::PairingMismatch);
        }

        let disclosed_messages: Vec<(u16, &Scalar<Bls12_381_1>)> =
            disclosed.iter().map(|(i, m)| (*i, m)).collect();
        let c = challenge(
            &self.a_prime,
            &self.a_bar,
            &self.d,
            &self.t1,
            &self.t2,
            count,
            &disclosed_messages,
            nonce,
        );

        let lhs1 = &(&self.a_prime * &self.z_e) + &(&params.h0 * &self.z_r2);
        let rhs1 = &self.t1 + &(&(&self.a_bar - &self.d) * &c);
        if lhs1 != rhs1 {
            return Err(VerificationError::PairingMismatch);
        }

        let mut lhs2 = &(&self.d * &self.z_r3) + &(&params.h0 * &self.z_s);
        for (i, z) in &self.z_hidden {
            lhs2 = &lhs2 + &(&params.h[usize::from(*i) - 1] * z);
        }
        let mut base = Point::<Bls12_381_1>::generator().to_point();
        for (i, m) in disclosed {
            base = &base + &(&params.h[usize::from(*i) - 1] * m);
        }
        let rhs2 = &self.t2 + &(&base * &c);
        if lhs2 != rhs2 {
            return Err(VerificationError::PairingMismatch);
        }
        Ok(())
    }
}

#[allow(clippy::too_many_arguments)]
fn challenge(
    a_prime: &Point<Bls12_381_1>,
    a_bar: &Point<Bls12_381_1>,
    d: &Point<Bls12_381_1>,
    t1: &Point<Bls12_381_1>,
    t2: &Point<Bls12_381_1>,
    message_count: usize,
    disclosed: &[(u16, &Scalar<Bls12_381_1>)],
    nonce: &[u8],
) -> Scalar<Bls12_381_1> {
    let mut hasher = Sha256::new()
        .chain(b"bbs+-pok")
        .chain_point(a_prime)
        .chain_point(a_bar)
        .chain_point(d)
        .chain_point(t1)
        .chain_point(t2)
        .chain_bigint(&BigInt::from(message_count as u64));
    for (i, m) in disclosed {
        hasher = hasher.chain_bigint(&BigInt::from(u64::from(*i))).chain_scalar(*m);
    }
    Scalar::from_bigint(&hasher.chain(nonce).result_bigint())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bbs_plus::{hash_message_to_scalar, sign, KeyPair};

    fn setup(count: usize) -> (SignatureParams, KeyPair, Vec<Scalar<Bls12_381_1>>, Signature) {
        let params = SignatureParams::new(count);
        let keys = KeyPair::generate();
        let messages: Vec<_> = (0..count)
            .map(|i| hash_message_to_scalar(format!("attribute-{}", i).as_bytes()))
            .collect();
        let sig = sign(&params, &keys.sk, &messages).unwrap();
        (params, keys, messages, sig)
    }

    #[test]
    fn proof_with_partial_disclosure_verifies() {
        let (params, keys, messages, sig) = setup(4);
        let disclosed: BTreeSet<u16> = [1, 3].iter().copied().collect();
        let proof = SelectiveDisclosureProof::prove(&params, &sig, &messages, &disclosed, b"n-1")
            .unwrap();

        let revealed: BTreeMap<u16, _> = disclosed
            .iter()
            .map(|i| (*i, messages[usize::from(*i) - 1].clone()))
            .collect();
        assert!(proof.verify(&params, &keys.pk, &revealed, b"n-1").is_ok());
    }

    #[test]
    fn proof_with_nothing_disclosed_verifies() {
        let (params, keys, messages, sig) = setup(3);
        let proof =
            SelectiveDisclosureProof::prove(&params, &sig, &messages, &BTreeSet::new(), b"n-2")
                .unwrap();
        assert!(proof.verify(&params, &keys.pk, &BTreeMap::new(), b"n-2").is_ok());
    }

    #[test]
    fn proof_with_full_disclosure_verifies() {
        let (params, keys, messages, sig) = setup(2);
        let disclosed: BTreeSet<u16> = [1, 2].iter().copied().collect();
        let proof = SelectiveDisclosureProof::prove(&params, &sig, &messages, &disclosed, b"n-3")
            .unwrap();
        let revealed: BTreeMap<u16, _> = messages
            .iter()
            .enumerate()
            .map(|(i, m)| (i as u16 + 1, m.clone()))
            .collect();
        assert!(proof.verify(&params, &keys.pk, &revealed, b"n-3").is_ok());
    }

    #[test]
    fn wrong_disclosed_message_is_rejected() {
        let (params, keys, messages, sig) = setup(3);
        let disclosed: BTreeSet<u16> = [2].iter().copied().collect();
        let proof = SelectiveDisclosureProof::prove(&params, &sig, &messages, &disclosed, b"n-4")
            .unwrap();

        let mut revealed = BTreeMap::new();
        revealed.insert(2u16, hash_message_to_scalar(b"not the signed value"));
        assert_eq!(
            proof.verify(&params, &keys.pk, &revealed, b"n-4"),
            Err(VerificationError::PairingMismatch)
        );
    }

    #[test]
    fn wrong_nonce_is_rejected() {
        let (params, keys, messages, sig) = setup(2);
        let proof =
            SelectiveDisclosureProof::prove(&params, &sig, &messages, &BTreeSet::new(), b"n-5")
                .unwrap();
        assert_eq!(
            proof.verify(&params, &keys.pk, &BTreeMap::new(), b"other nonce"),
            Err(VerificationError::PairingMismatch)
        );
    }

    #[test]
    fn proof_under_wrong_public_key_is_rejected() {
        let (params, _, messages, sig) = setup(2);
        let other = KeyPair::generate();
        let proof =
            SelectiveDisclosureProof::prove(&params, &sig, &messages, &BTreeSet::new(), b"n-6")
                .unwrap();
        assert_eq!(
            proof.verify(&params, &other.pk, &BTreeMap::new(), b"n-6"),
            Err(VerificationError::PairingMismatch)
        );
    }
}
