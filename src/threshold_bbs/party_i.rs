//! Per-party operations of the threshold BBS+ protocols.
//!
//! The master key is generated by a Pedersen-VSS DKG: every party deals a
//! random secret under dual-base commitments, announces its `g2^{a_0}`
//! contribution with a consistency proof, and the master key is the product of
//! the announcements while each party's share is the sum of what was dealt to
//! it. The DKG is optimistic: any complaint aborts the instance, there is no
//! recovery round. Misbehaving parties are excluded and the protocol re-run,
//! which is the common design for real deployments (cf. GG19 / FROST keygen).
//!
//! Signing runs three more dealings (for the blinding values `e`, `s` and the
//! inversion mask `rho`) among the quorum, inverts `x + e` with the
//! Bar-Ilan/Beaver masked-product trick and emits group-element signature
//! shares `A_i = B^{u_i}` that combine by Lagrange in the exponent.

use curv::elliptic::curves::{Bls12_381_1, Bls12_381_2, Point, Scalar};
use serde::{Deserialize, Serialize};
use zeroize::Zeroize;

use crate::bbs_plus::{self, MasterPublicKey, Signature, SignatureParams};
use crate::errors::{DkgError, ReconstructError, SigningError};
use crate::threshold_bbs::utilities::{scalar_to_curve, ConsistencyProof};
use crate::threshold_bbs::vss::{
    lagrange_coeff_at_zero, reconstruct_at_zero, PedersenDealing, PedersenShare, PedersenVss,
    ThresholdParams,
};

const KEYGEN_CONTEXT: &[u8] = b"bbs+-dkg-v1";
const SIGN_E_CONTEXT: &[u8] = b"bbs+-sign-e-v1";
const SIGN_S_CONTEXT: &[u8] = b"bbs+-sign-s-v1";

/// Identifier of one signing session, chained into its Fiat-Shamir transcripts.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionId(pub [u8; 16]);

/// Dealer state of one party during the master-key DKG.
pub struct Keys {
    dealing: PedersenDealing,
    pub params: ThresholdParams,
    pub party_index: u16,
}

/// Round A broadcast: commitment vector, `g2` announcement, consistency proof.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct KeyGenBroadcast {
    pub party_index: u16,
    pub vss: PedersenVss,
    pub pk_share: Point<Bls12_381_2>,
    pub proof: ConsistencyProof<Bls12_381_2>,
}

/// Complaint naming a dealer whose share failed verification.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Complaint {
    pub against: u16,
}

/// End-of-verification broadcast; an empty complaint list acknowledges.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct KeyGenAck {
    pub party_index: u16,
    pub complaints: Vec<Complaint>,
}

/// A party's share of the master key, output of a successful DKG.
#[derive(Clone, Serialize, Deserialize)]
pub struct SharedKeys {
    pub index: u16,
    pub params: ThresholdParams,
    pub pk: MasterPublicKey,
    pub sk_i: Scalar<Bls12_381_1>,
}

impl Keys {
    /// Samples the two polynomials and produces the round A broadcast.
    pub fn phase1_create(
        params: &ThresholdParams,
        party_index: u16,
        h: &Point<Bls12_381_1>,
    ) -> (Keys, KeyGenBroadcast) {
        let (vss, dealing) = PedersenVss::share(params, Scalar::random(), h);
        let pk_share =
            Point::<Bls12_381_2>::generator() * &scalar_to_curve::<Bls12_381_2>(dealing.secret());
        let proof =
            ConsistencyProof::<Bls12_381_2>::prove(dealing.secret(), dealing.blinding(), h, KEYGEN_CONTEXT);
        let broadcast = KeyGenBroadcast {
            party_index,
            vss,
            pk_share,
            proof,
        };
        (
            Keys {
                dealing,
                params: *params,
                party_index,
            },
            broadcast,
        )
    }

    /// Round B: the share pair for every party `1..=n`, own index included.
    pub fn phase2_distribute(&self) -> Vec<PedersenShare> {
        (1..=self.params.share_count)
            .map(|q| self.dealing.share_for(q))
            .collect()
    }

    /// Verifies all broadcasts and all shares dealt to this party. Failures
    /// against a particular dealer become complaints; structural defects of
    /// the broadcast set abort immediately.
    pub fn phase3_verify(
        &self,
        broadcasts: &[KeyGenBroadcast],
        dealt_to_me: &[PedersenShare],
        h: &Point<Bls12_381_1>,
    ) -> Result<KeyGenAck, DkgError> {
        check_ordered_indices(
            broadcasts.iter().map(|b| b.party_index),
            self.params.share_count,
            1,
        )?;
        if dealt_to_me.len() != usize::from(self.params.share_count) {
            return Err(DkgError::MissingBroadcast {
                party: 0,
                round: 2,
            });
        }

        let mut complaints = Vec::new();
        for (broadcast, share) in broadcasts.iter().zip(dealt_to_me) {
            let consistent = broadcast.vss.parameters == self.params
                && broadcast.vss.commitments.len() == usize::from(self.params.threshold)
                && broadcast.proof.verify(
                    &broadcast.vss.commitments[0],
                    &broadcast.pk_share,
                    h,
                    KEYGEN_CONTEXT,
                )
                && broadcast.vss.validate_share(share, self.party_index, h);
            if !consistent {
                complaints.push(Complaint {
                    against: broadcast.party_index,
                });
            }
        }
        Ok(KeyGenAck {
            party_index: self.party_index,
            complaints,
        })
    }

    /// Aborts on any complaint, otherwise aggregates the share and the key.
    pub fn phase4_finalize(
        &self,
        broadcasts: &[KeyGenBroadcast],
        acks: &[KeyGenAck],
        dealt_to_me: &[PedersenShare],
    ) -> Result<SharedKeys, DkgError> {
        check_ordered_indices(acks.iter().map(|a| a.party_index), self.params.share_count, 3)?;
        for ack in acks {
            if let Some(complaint) = ack.complaints.first() {
                return Err(DkgError::InconsistentShare {
                    from: complaint.against,
                    to: ack.party_index,
                });
            }
        }

        let sk_i = dealt_to_me
            .iter()
            .fold(Scalar::zero(), |acc, share| &acc + &share.value);
        let pk = broadcasts
            .iter()
            .fold(Point::zero(), |acc, b| &acc + &b.pk_share);
        Ok(SharedKeys {
            index: self.party_index,
            params: self.params,
            pk: MasterPublicKey(pk),
            sk_i,
        })
    }
}

// Broadcast sets arrive ordered by party index (the channel is totally ordered
// per party); anything else is a duplicate or a gap.
fn check_ordered_indices(
    indices: impl Iterator<Item = u16>,
    n: u16,
    round: u16,
) -> Result<(), DkgError> {
    let mut count: u16 = 0;
    for index in indices {
        count += 1;
        if index != count {
            return Err(DkgError::DuplicateParty);
        }
    }
    if count != n {
        return Err(DkgError::MissingBroadcast {
            party: count + 1,
            round,
        });
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// Signing
// ---------------------------------------------------------------------------

/// Round 1 broadcast of a signing session: three sub-dealings plus the public
/// `g1` contributions of `e` and `s` (the inversion mask stays unannounced).
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct SigningBroadcast {
    pub sid: SessionId,
    pub party_index: u16,
    pub e_vss: PedersenVss,
    pub s_vss: PedersenVss,
    pub rho_vss: PedersenVss,
    pub e_pub_share: Point<Bls12_381_1>,
    pub s_pub_share: Point<Bls12_381_1>,
    pub e_proof: ConsistencyProof<Bls12_381_1>,
    pub s_proof: ConsistencyProof<Bls12_381_1>,
}

/// Round 2 unicast: the recipient's shares of the dealer's `e`, `s`, `rho`.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct SigningUnicast {
    pub sid: SessionId,
    pub e_share: PedersenShare,
    pub s_share: PedersenShare,
    pub rho_share: PedersenShare,
}

/// Round 3 broadcast: the party's aggregated `s` share and the masked product
/// `alpha_i = (x_i + e_i) * rho_i`, which lies on a degree `2(t-1)` polynomial.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct MaskedProduct {
    pub sid: SessionId,
    pub party_index: u16,
    pub s_share: Scalar<Bls12_381_1>,
    pub alpha: Scalar<Bls12_381_1>,
}

/// One party's contribution to the final signature.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct SignatureShare {
    pub index: u16,
    pub a_i: Point<Bls12_381_1>,
    pub e_i: Scalar<Bls12_381_1>,
    pub s_i: Scalar<Bls12_381_1>,
}

/// Dealer state of one signer before the sub-dealings are verified.
pub struct EphemeralKeys {
    shared: SharedKeys,
    sid: SessionId,
    e_dealing: PedersenDealing,
    s_dealing: PedersenDealing,
    rho_dealing: PedersenDealing,
}

impl EphemeralKeys {
    pub fn phase1_create(
        shared: &SharedKeys,
        sid: SessionId,
        h: &Point<Bls12_381_1>,
    ) -> (EphemeralKeys, SigningBroadcast) {
        Self::phase1_create_with_secrets(
            shared,
            sid,
            Scalar::random(),
            Scalar::random(),
            Scalar::random(),
            h,
        )
    }

    // Deterministic entry point, used by tests to force degenerate transcripts.
    pub(crate) fn phase1_create_with_secrets(
        shared: &SharedKeys,
        sid: SessionId,
        e: Scalar<Bls12_381_1>,
        s: Scalar<Bls12_381_1>,
        rho: Scalar<Bls12_381_1>,
        h: &Point<Bls12_381_1>,
    ) -> (EphemeralKeys, SigningBroadcast) {
        let params = shared.params;
        let (e_vss, e_dealing) = PedersenVss::share(&params, e, h);
        let (s_vss, s_dealing) = PedersenVss::share(&params, s, h);
        let (rho_vss, rho_dealing) = PedersenVss::share(&params, rho, h);

        let context = sid.0;
        let mut e_context = SIGN_E_CONTEXT.to_vec();
        e_context.extend_from_slice(&context);
        let mut s_context = SIGN_S_CONTEXT.to_vec();
        s_context.extend_from_slice(&context);

        let e_pub_share = Point::generator() * e_dealing.secret();
        let s_pub_share = Point::generator() * s_dealing.secret();
        let e_proof = ConsistencyProof::<Bls12_381_1>::prove(
            e_dealing.secret(),
            e_dealing.blinding(),
            h,
            &e_context,
        );
        let s_proof = ConsistencyProof::<Bls12_381_1>::prove(
            s_dealing.secret(),
            s_dealing.blinding(),
            h,
            &s_context,
        );

        let broadcast = SigningBroadcast {
            sid,
            party_index: shared.index,
            e_vss,
            s_vss,
            rho_vss,
            e_pub_share,
            s_pub_share,
            e_proof,
            s_proof,
        };
        (
            EphemeralKeys {
                shared: shared.clone(),
                sid,
                e_dealing,
                s_dealing,
                rho_dealing,
            },
            broadcast,
        )
    }

    /// Shares for every quorum member, dealt at their master-key indices.
    pub fn phase2_distribute(&self, quorum: &[u16]) -> Vec<(u16, SigningUnicast)> {
        quorum
            .iter()
            .map(|&q| {
                (
                    q,
                    SigningUnicast {
                        sid: self.sid,
                        e_share: self.e_dealing.share_for(q),
                        s_share: self.s_dealing.share_for(q),
                        rho_share: self.rho_dealing.share_for(q),
                    },
                )
            })
            .collect()
    }

    /// Verifies all sub-dealings addressed to this party, aggregates its
    /// `e/s/rho` shares and broadcasts the masked product. Fail-stop: a bad
    /// share aborts the session naming the dealer.
    pub fn phase3_verify_and_mask(
        self,
        broadcasts: &[SigningBroadcast],
        dealt_to_me: &[SigningUnicast],
        h: &Point<Bls12_381_1>,
    ) -> Result<(SigningLocal, MaskedProduct), SigningError> {
        let quorum: Vec<u16> = broadcasts.iter().map(|b| b.party_index).collect();
        let need = self.shared.params.signing_quorum();
        if quorum.len() < usize::from(need) {
            return Err(SigningError::InsufficientQuorum {
                have: quorum.len() as u16,
                need,
            });
        }
        for (pos, index) in quorum.iter().enumerate() {
            if *index == 0 || quorum[..pos].contains(index) {
                return Err(SigningError::SubDkgAborted(DkgError::DuplicateParty));
            }
        }
        if dealt_to_me.len() != broadcasts.len() {
            return Err(SigningError::SubDkgAborted(DkgError::MissingBroadcast {
                party: 0,
                round: 2,
            }));
        }

        let context = self.sid.0;
        let mut e_context = SIGN_E_CONTEXT.to_vec();
        e_context.extend_from_slice(&context);
        let mut s_context = SIGN_S_CONTEXT.to_vec();
        s_context.extend_from_slice(&context);

        let my_index = self.shared.index;
        let mut e_i = Scalar::zero();
        let mut s_i = Scalar::zero();
        let mut rho_i = Scalar::zero();
        for (broadcast, unicast) in broadcasts.iter().zip(dealt_to_me) {
            let expected_len = usize::from(self.shared.params.threshold);
            let params_ok = broadcast.e_vss.parameters == self.shared.params
                && broadcast.s_vss.parameters == self.shared.params
                && broadcast.rho_vss.parameters == self.shared.params
                && broadcast.e_vss.commitments.len() == expected_len
                && broadcast.s_vss.commitments.len() == expected_len
                && broadcast.rho_vss.commitments.len() == expected_len;
            if !params_ok {
                return Err(SigningError::SubDkgAborted(DkgError::InconsistentShare {
                    from: broadcast.party_index,
                    to: my_index,
                }));
            }
            let proofs_ok = broadcast.e_proof.verify(
                &broadcast.e_vss.commitments[0],
                &broadcast.e_pub_share,
                h,
                &e_context,
            ) && broadcast.s_proof.verify(
                &broadcast.s_vss.commitments[0],
                &broadcast.s_pub_share,
                h,
                &s_context,
            );
            let shares_ok = broadcast.e_vss.validate_share(&unicast.e_share, my_index, h)
                && broadcast.s_vss.validate_share(&unicast.s_share, my_index, h)
                && broadcast
                    .rho_vss
                    .validate_share(&unicast.rho_share, my_index, h);
            if !(proofs_ok && shares_ok) {
                return Err(SigningError::SubDkgAborted(DkgError::InconsistentShare {
                    from: broadcast.party_index,
                    to: my_index,
                }));
            }
            e_i = &e_i + &unicast.e_share.value;
            s_i = &s_i + &unicast.s_share.value;
            rho_i = &rho_i + &unicast.rho_share.value;
        }

        let k_i = &self.shared.sk_i + &e_i;
        let alpha = &k_i * &rho_i;
        let product = MaskedProduct {
            sid: self.sid,
            party_index: my_index,
            s_share: s_i.clone(),
            alpha,
        };
        let local = SigningLocal {
            index: my_index,
            params: self.shared.params,
            pk: self.shared.pk.clone(),
            sid: self.sid,
            quorum,
            e_i,
            s_i,
            rho_i,
            k_i,
        };
        Ok((local, product))
    }
}

/// Per-party signing state once every sub-share has been verified.
pub struct SigningLocal {
    pub index: u16,
    pub params: ThresholdParams,
    pub pk: MasterPublicKey,
    pub sid: SessionId,
    pub quorum: Vec<u16>,
    e_i: Scalar<Bls12_381_1>,
    s_i: Scalar<Bls12_381_1>,
    rho_i: Scalar<Bls12_381_1>,
    k_i: Scalar<Bls12_381_1>,
}

impl SigningLocal {
    /// Reconstructs `alpha = (x+e) * rho` and `s`, inverts in public, and emits
    /// this party's group-element signature share `A_i = B^{rho_i / alpha}`.
    ///
    /// `alpha = 0` is [SigningError::InversionFailed]; the caller may keep the
    /// session and retry after dealing a fresh mask (see [SigningLocal::remask]).
    pub fn phase4_emit_share(
        &self,
        params: &SignatureParams,
        messages: &[Scalar<Bls12_381_1>],
        products: &[MaskedProduct],
    ) -> Result<SignatureShare, SigningError> {
        let alpha_points: Vec<(u16, Scalar<Bls12_381_1>)> = products
            .iter()
            .map(|p| (p.party_index, p.alpha.clone()))
            .collect();
        let s_points: Vec<(u16, Scalar<Bls12_381_1>)> = products
            .iter()
            .map(|p| (p.party_index, p.s_share.clone()))
            .collect();
        if products.len() < usize::from(self.params.signing_quorum()) {
            return Err(SigningError::InsufficientQuorum {
                have: products.len() as u16,
                need: self.params.signing_quorum(),
            });
        }
        let alpha = reconstruct_at_zero(&alpha_points)
            .map_err(|_| SigningError::SubDkgAborted(DkgError::DuplicateParty))?;
        let s = reconstruct_at_zero(&s_points)
            .map_err(|_| SigningError::SubDkgAborted(DkgError::DuplicateParty))?;

        let alpha_inv = alpha.invert().ok_or(SigningError::InversionFailed)?;
        let mut u_i = &self.rho_i * &alpha_inv;
        let b = params.commitment(&s, messages)?;
        let a_i = &b * &u_i;
        u_i.zeroize();

        Ok(SignatureShare {
            index: self.index,
            a_i,
            e_i: self.e_i.clone(),
            s_i: self.s_i.clone(),
        })
    }

    /// Replaces the inversion mask after [SigningError::InversionFailed]: the
    /// quorum deals a fresh `rho`, each party aggregates its new share and
    /// rebroadcasts the masked product. `x_i + e_i` is reused unchanged.
    pub fn remask(&mut self, rho_i: Scalar<Bls12_381_1>) -> MaskedProduct {
        self.rho_i.zeroize();
        self.rho_i = rho_i;
        MaskedProduct {
            sid: self.sid,
            party_index: self.index,
            s_share: self.s_i.clone(),
            alpha: &self.k_i * &self.rho_i,
        }
    }
}

impl Drop for SigningLocal {
    fn drop(&mut self) {
        self.k_i.zeroize();
        self.rho_i.zeroize();
    }
}

/// Lagrange-combines emitted shares into a complete signature and gates the
/// result on [bbs_plus::verify]. A failed gate does not identify the bad share.
pub fn combine_signature_shares(
    params: &SignatureParams,
    pk: &MasterPublicKey,
    threshold_params: &ThresholdParams,
    messages: &[Scalar<Bls12_381_1>],
    shares: &[SignatureShare],
) -> Result<Signature, ReconstructError> {
    let need = usize::from(threshold_params.signing_quorum());
    if shares.len() < need {
        return Err(ReconstructError::TooFewShares {
            have: shares.len(),
            need,
        });
    }
    let indices: Vec<u16> = shares.iter().map(|s| s.index).collect();
    for (pos, index) in indices.iter().enumerate() {
        if indices[..pos].contains(index) {
            return Err(ReconstructError::DuplicateShare { index: *index });
        }
    }

    let mut a = Point::zero();
    let mut e = Scalar::zero();
    let mut s = Scalar::zero();
    for share in shares {
        let lambda = lagrange_coeff_at_zero(share.index, &indices)
            .map_err(|_| ReconstructError::DuplicateShare { index: share.index })?;
        a = &a + &(&share.a_i * &lambda);
        e = &e + &(&share.e_i * &lambda);
        s = &s + &(&share.s_i * &lambda);
    }

    let signature = Signature { a, e, s };
    bbs_plus::verify(params, pk, &signature, messages)
        .map_err(|_| ReconstructError::VerifyFailed)?;
    Ok(signature)
}
