use curv::arithmetic::*;
use curv::elliptic::curves::{Bls12_381_1, Bls12_381_2, Point, Scalar};
use curv::BigInt;
use rand::rngs::StdRng;
use rand::{RngCore, SeedableRng};

use crate::bbs_plus::{self, hash_message_to_scalar, pedersen_blinding_base, SignatureParams};
use crate::errors::{DkgError, ReconstructError, SigningError};
use crate::threshold_bbs::party_i::{
    combine_signature_shares, EphemeralKeys, Keys, MaskedProduct, SessionId, SharedKeys,
    SignatureShare, SigningLocal,
};
use crate::threshold_bbs::utilities::scalar_to_curve;
use crate::threshold_bbs::vss::{
    reconstruct_at_zero, PedersenShare, PedersenVss, ThresholdParams,
};

fn test_rng() -> StdRng {
    StdRng::seed_from_u64(0x42)
}

fn seeded_scalar(rng: &mut StdRng) -> Scalar<Bls12_381_1> {
    let mut buf = [0u8; 64];
    rng.fill_bytes(&mut buf);
    Scalar::from_bigint(&BigInt::from_bytes(&buf))
}

pub fn keygen_t_n_parties(t: u16, n: u16) -> Vec<SharedKeys> {
    let params = ThresholdParams::new(t, n).expect("");
    let h = pedersen_blinding_base();

    let (keys_vec, broadcast_vec): (Vec<_>, Vec<_>) = (1..=n)
        .map(|i| Keys::phase1_create(&params, i, &h))
        .unzip();

    // dealt[p][q] is what dealer p+1 sends to party q+1
    let dealt: Vec<Vec<PedersenShare>> = keys_vec.iter().map(|k| k.phase2_distribute()).collect();
    let to_party = |q: usize| {
        dealt
            .iter()
            .map(|per_dealer| per_dealer[q].clone())
            .collect::<Vec<_>>()
    };

    let acks: Vec<_> = keys_vec
        .iter()
        .enumerate()
        .map(|(q, k)| k.phase3_verify(&broadcast_vec, &to_party(q), &h).expect(""))
        .collect();

    keys_vec
        .iter()
        .enumerate()
        .map(|(q, k)| {
            k.phase4_finalize(&broadcast_vec, &acks, &to_party(q))
                .expect("")
        })
        .collect()
}

/// Runs a full signing session among `quorum` (keygen indices) and returns the
/// emitted shares.
pub fn sign_with_quorum(
    shared: &[SharedKeys],
    quorum: &[u16],
    params: &SignatureParams,
    message: &[Scalar<Bls12_381_1>],
    sid: SessionId,
) -> Vec<SignatureShare> {
    let (locals, products) = run_until_masked(shared, quorum, sid);
    locals
        .iter()
        .map(|local| local.phase4_emit_share(params, message, &products).expect(""))
        .collect()
}

fn run_until_masked(
    shared: &[SharedKeys],
    quorum: &[u16],
    sid: SessionId,
) -> (Vec<SigningLocal>, Vec<MaskedProduct>) {
    let h = pedersen_blinding_base();
    let members: Vec<&SharedKeys> = quorum
        .iter()
        .map(|&i| &shared[usize::from(i) - 1])
        .collect();

    let (ephemerals, broadcasts): (Vec<_>, Vec<_>) = members
        .iter()
        .map(|keys| EphemeralKeys::phase1_create(keys, sid, &h))
        .unzip();

    let dealings: Vec<Vec<_>> = ephemerals
        .iter()
        .map(|e| e.phase2_distribute(quorum))
        .collect();
    let to_member = |pos: usize| {
        dealings
            .iter()
            .map(|per_dealer| per_dealer[pos].1.clone())
            .collect::<Vec<_>>()
    };

    ephemerals
        .into_iter()
        .enumerate()
        .map(|(pos, e)| {
            e.phase3_verify_and_mask(&broadcasts, &to_member(pos), &h)
                .expect("")
        })
        .unzip()
}

#[test]
fn every_quorum_of_the_dkg_reconstructs_the_same_key() {
    let shared = keygen_t_n_parties(2, 5);

    let quorums: [&[u16]; 3] = [&[1, 2], &[3, 5], &[2, 4]];
    let reconstructions: Vec<Scalar<Bls12_381_1>> = quorums
        .iter()
        .map(|quorum| {
            let points: Vec<_> = quorum
                .iter()
                .map(|&i| (i, shared[usize::from(i) - 1].sk_i.clone()))
                .collect();
            reconstruct_at_zero(&points).expect("")
        })
        .collect();
    assert_eq!(reconstructions[0], reconstructions[1]);
    assert_eq!(reconstructions[0], reconstructions[2]);

    // the announced master key matches the reconstructed secret
    let expected =
        Point::<Bls12_381_2>::generator() * &scalar_to_curve::<Bls12_381_2>(&reconstructions[0]);
    for keys in &shared {
        assert_eq!(keys.pk.0, expected);
    }
}

// S3: a corrupted dealt share raises a complaint naming the dealer and the DKG
// aborts without finalizing.
#[test]
fn corrupted_share_aborts_dkg_with_inconsistent_share() {
    let params = ThresholdParams::new(2, 3).expect("");
    let h = pedersen_blinding_base();

    let (keys_vec, broadcast_vec): (Vec<_>, Vec<_>) = (1..=3)
        .map(|i| Keys::phase1_create(&params, i, &h))
        .unzip();
    let mut dealt: Vec<Vec<PedersenShare>> =
        keys_vec.iter().map(|k| k.phase2_distribute()).collect();

    // party 1 corrupts the share it deals to party 2
    dealt[0][1].value = &dealt[0][1].value + &Scalar::from_bigint(&BigInt::from(1u64));

    let to_party = |q: usize| {
        dealt
            .iter()
            .map(|per_dealer| per_dealer[q].clone())
            .collect::<Vec<_>>()
    };
    let acks: Vec<_> = keys_vec
        .iter()
        .enumerate()
        .map(|(q, k)| k.phase3_verify(&broadcast_vec, &to_party(q), &h).expect(""))
        .collect();

    assert_eq!(acks[1].complaints.len(), 1);
    assert_eq!(acks[1].complaints[0].against, 1);

    for (q, keys) in keys_vec.iter().enumerate() {
        let result = keys.phase4_finalize(&broadcast_vec, &acks, &to_party(q));
        assert!(matches!(
            result,
            Err(DkgError::InconsistentShare { from: 1, to: 2 })
        ));
    }
}

// S1: n=3, t=2, single message; the quorum is all three parties since 2t-1=3.
#[test]
fn sign_and_verify_n3_t2_single_message() {
    let shared = keygen_t_n_parties(2, 3);
    let params = SignatureParams::new(1);
    let message = vec![hash_message_to_scalar(&[0x01])];
    let sid = SessionId(*b"session-s1-.....");

    let shares = sign_with_quorum(&shared, &[1, 2, 3], &params, &message, sid);
    let sig = combine_signature_shares(
        &params,
        &shared[0].pk,
        &shared[0].params,
        &message,
        &shares,
    )
    .expect("");
    assert!(bbs_plus::verify(&params, &shared[0].pk, &sig, &message).is_ok());
}

// S2: n=5, t=3, three messages, full quorum; tampering one message breaks
// verification.
#[test]
fn sign_and_verify_n5_t3_rejects_tampered_message() {
    let shared = keygen_t_n_parties(3, 5);
    let params = SignatureParams::new(3);
    let mut message: Vec<Scalar<Bls12_381_1>> = (1u64..=3)
        .map(|m| Scalar::from_bigint(&BigInt::from(m)))
        .collect();
    let sid = SessionId(*b"session-s2-.....");

    let shares = sign_with_quorum(&shared, &[1, 2, 3, 4, 5], &params, &message, sid);
    let sig = combine_signature_shares(
        &params,
        &shared[0].pk,
        &shared[0].params,
        &message,
        &shares,
    )
    .expect("");
    assert!(bbs_plus::verify(&params, &shared[0].pk, &sig, &message).is_ok());

    message[1] = Scalar::from_bigint(&BigInt::from(99u64));
    assert!(bbs_plus::verify(&params, &shared[0].pk, &sig, &message).is_err());
}

// The distributed output is a plain BBS+ signature: the centrally signed
// message under the reconstructed key verifies with the same verifier and the
// same public key.
#[test]
fn distributed_signature_matches_centralized_scheme() {
    let mut rng = test_rng();
    let shared = keygen_t_n_parties(2, 3);
    let params = SignatureParams::new(2);
    let message = vec![seeded_scalar(&mut rng), seeded_scalar(&mut rng)];
    let sid = SessionId(*b"session-rt-.....");

    let shares = sign_with_quorum(&shared, &[1, 2, 3], &params, &message, sid);
    let distributed = combine_signature_shares(
        &params,
        &shared[0].pk,
        &shared[0].params,
        &message,
        &shares,
    )
    .expect("");

    let points: Vec<_> = shared
        .iter()
        .take(2)
        .map(|k| (k.index, k.sk_i.clone()))
        .collect();
    let x = reconstruct_at_zero(&points).expect("");
    let centralized = bbs_plus::sign(&params, &bbs_plus::SecretKey(x), &message).expect("");

    assert!(bbs_plus::verify(&params, &shared[0].pk, &distributed, &message).is_ok());
    assert!(bbs_plus::verify(&params, &shared[0].pk, &centralized, &message).is_ok());
    assert!(!distributed.a.is_zero());
}

// S4: rho secrets summing to zero force alpha = 0; the session reports
// InversionFailed and succeeds after re-dealing a fresh mask.
#[test]
fn inversion_failure_retries_with_fresh_mask() {
    let mut rng = test_rng();
    let shared = keygen_t_n_parties(2, 3);
    let thresh = shared[0].params;
    let params = SignatureParams::new(1);
    let message = vec![hash_message_to_scalar(b"retry me")];
    let sid = SessionId(*b"session-s4-.....");
    let h = pedersen_blinding_base();
    let quorum = [1u16, 2, 3];

    // rho contributions cancel out
    let rho_1 = seeded_scalar(&mut rng);
    let rho_2 = seeded_scalar(&mut rng);
    let rho_3 = &(&Scalar::zero() - &rho_1) - &rho_2;
    let rhos = [rho_1, rho_2, rho_3];

    let (ephemerals, broadcasts): (Vec<_>, Vec<_>) = shared
        .iter()
        .zip(rhos.iter())
        .map(|(keys, rho)| {
            EphemeralKeys::phase1_create_with_secrets(
                keys,
                sid,
                seeded_scalar(&mut rng),
                seeded_scalar(&mut rng),
                rho.clone(),
                &h,
            )
        })
        .unzip();
    let dealings: Vec<Vec<_>> = ephemerals
        .iter()
        .map(|e| e.phase2_distribute(&quorum))
        .collect();
    let to_member = |pos: usize| {
        dealings
            .iter()
            .map(|per_dealer| per_dealer[pos].1.clone())
            .collect::<Vec<_>>()
    };
    let (mut locals, products): (Vec<SigningLocal>, Vec<MaskedProduct>) = ephemerals
        .into_iter()
        .enumerate()
        .map(|(pos, e)| {
            e.phase3_verify_and_mask(&broadcasts, &to_member(pos), &h)
                .expect("")
        })
        .unzip();

    for local in &locals {
        assert!(matches!(
            local.phase4_emit_share(&params, &message, &products),
            Err(SigningError::InversionFailed)
        ));
    }

    // fresh rho sub-dealing among the same quorum, everything else reused
    let fresh: Vec<_> = (0..3)
        .map(|_| PedersenVss::share(&thresh, seeded_scalar(&mut rng), &h))
        .collect();
    let products: Vec<MaskedProduct> = locals
        .iter_mut()
        .enumerate()
        .map(|(pos, local)| {
            let my_index = quorum[pos];
            let rho_i = fresh.iter().fold(Scalar::zero(), |acc, (vss, dealing)| {
                let share = dealing.share_for(my_index);
                assert!(vss.validate_share(&share, my_index, &h));
                &acc + &share.value
            });
            local.remask(rho_i)
        })
        .collect();

    let shares: Vec<_> = locals
        .iter()
        .map(|local| local.phase4_emit_share(&params, &message, &products).expect(""))
        .collect();
    let sig = combine_signature_shares(&params, &shared[0].pk, &thresh, &message, &shares)
        .expect("");
    assert!(bbs_plus::verify(&params, &shared[0].pk, &sig, &message).is_ok());
}

// S5 / S6: the reconstructor rejects short and duplicated share sets.
#[test]
fn reconstructor_rejects_short_and_duplicate_share_sets() {
    let shared = keygen_t_n_parties(2, 3);
    let params = SignatureParams::new(1);
    let message = vec![hash_message_to_scalar(b"quorum rules")];
    let sid = SessionId(*b"session-s56-....");

    let shares = sign_with_quorum(&shared, &[1, 2, 3], &params, &message, sid);

    let result = combine_signature_shares(
        &params,
        &shared[0].pk,
        &shared[0].params,
        &message,
        &shares[..2],
    );
    assert!(matches!(
        result,
        Err(ReconstructError::TooFewShares { have: 2, need: 3 })
    ));

    let mut duplicated = shares.clone();
    duplicated[2] = duplicated[0].clone();
    let result = combine_signature_shares(
        &params,
        &shared[0].pk,
        &shared[0].params,
        &message,
        &duplicated,
    );
    assert!(matches!(
        result,
        Err(ReconstructError::DuplicateShare { index: 1 })
    ));
}

#[test]
fn corrupted_sub_dealing_aborts_signing() {
    let shared = keygen_t_n_parties(2, 3);
    let sid = SessionId(*b"session-bad-....");
    let h = pedersen_blinding_base();
    let quorum = [1u16, 2, 3];

    let (ephemerals, broadcasts): (Vec<_>, Vec<_>) = shared
        .iter()
        .map(|keys| EphemeralKeys::phase1_create(keys, sid, &h))
        .unzip();
    let mut dealings: Vec<Vec<_>> = ephemerals
        .iter()
        .map(|e| e.phase2_distribute(&quorum))
        .collect();

    // party 3 corrupts the e-share it deals to party 1
    dealings[2][0].1.e_share.value =
        &dealings[2][0].1.e_share.value + &Scalar::from_bigint(&BigInt::from(1u64));

    let dealt_to_first: Vec<_> = dealings
        .iter()
        .map(|per_dealer| per_dealer[0].1.clone())
        .collect();
    let result = ephemerals
        .into_iter()
        .next()
        .unwrap()
        .phase3_verify_and_mask(&broadcasts, &dealt_to_first, &h);
    assert!(matches!(
        result,
        Err(SigningError::SubDkgAborted(
            DkgError::InconsistentShare { from: 3, to: 1 }
        ))
    ));
}

// A signature reconstructed from a tampered share fails the verification gate
// without identifying the culprit.
#[test]
fn tampered_signature_share_fails_the_gate() {
    let shared = keygen_t_n_parties(2, 3);
    let params = SignatureParams::new(1);
    let message = vec![hash_message_to_scalar(b"gated")];
    let sid = SessionId(*b"session-gate-...");

    let mut shares = sign_with_quorum(&shared, &[1, 2, 3], &params, &message, sid);
    shares[1].a_i = &shares[1].a_i + &Point::generator().to_point();

    let result = combine_signature_shares(
        &params,
        &shared[0].pk,
        &shared[0].params,
        &message,
        &shares,
    );
    assert!(matches!(result, Err(ReconstructError::VerifyFailed)));
}
