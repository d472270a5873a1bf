use curv::elliptic::curves::{Bls12_381_1, Scalar};
use round_based::containers::push::Push;
use round_based::containers::{self, BroadcastMsgs, P2PMsgs, Store};
use round_based::Msg;
use thiserror::Error;

use crate::bbs_plus::{pedersen_blinding_base, Signature, SignatureParams};
use crate::errors::{ReconstructError, SigningError};
use crate::threshold_bbs::party_i::{
    self, EphemeralKeys, MaskedProduct, SessionId, SignatureShare, SigningBroadcast,
    SigningLocal, SigningUnicast,
};
use crate::threshold_bbs::state_machine::keygen::LocalKey;

pub struct Round0 {
    pub key: LocalKey,
    pub params: SignatureParams,
    pub message: Vec<Scalar<Bls12_381_1>>,
    pub sid: SessionId,

    pub i: u16,
}

impl Round0 {
    pub fn proceed<O>(self, mut output: O) -> Result<Round1>
    where
        O: Push<Msg<SigningBroadcast>>,
    {
        let (ephemeral, broadcast) = EphemeralKeys::phase1_create(
            self.key.shared_keys(),
            self.sid,
            &pedersen_blinding_base(),
        );
        output.push(Msg {
            sender: self.i,
            receiver: None,
            body: broadcast.clone(),
        });
        Ok(Round1 {
            key: self.key,
            params: self.params,
            message: self.message,
            sid: self.sid,
            ephemeral,
            own_broadcast: broadcast,
            i: self.i,
        })
    }
    pub fn is_expensive(&self) -> bool {
        true
    }
}

pub struct Round1 {
    key: LocalKey,
    params: SignatureParams,
    message: Vec<Scalar<Bls12_381_1>>,
    sid: SessionId,
    ephemeral: EphemeralKeys,
    own_broadcast: SigningBroadcast,

    i: u16,
}

impl Round1 {
    pub fn proceed<O>(self, input: BroadcastMsgs<SigningBroadcast>, mut output: O) -> Result<Round2>
    where
        O: Push<Msg<SigningUnicast>>,
    {
        let broadcasts = input.into_vec_including_me(self.own_broadcast);
        for (pos, broadcast) in broadcasts.iter().enumerate() {
            if broadcast.sid != self.sid {
                return Err(ProceedError::SessionMismatch {
                    who: pos as u16 + 1,
                });
            }
            if broadcast.party_index == 0 || broadcast.party_index > self.key.parties() {
                return Err(ProceedError::PartySentOutOfRangeIndex {
                    who: pos as u16 + 1,
                    claimed_index: broadcast.party_index,
                });
            }
        }

        // the quorum speaks under its keygen indices from here on
        let quorum: Vec<u16> = broadcasts.iter().map(|b| b.party_index).collect();
        let unicasts = self.ephemeral.phase2_distribute(&quorum);
        let own_unicast = unicasts[usize::from(self.i) - 1].1.clone();
        for (pos, (_, unicast)) in unicasts.into_iter().enumerate() {
            if pos + 1 == usize::from(self.i) {
                continue;
            }
            output.push(Msg {
                sender: self.i,
                receiver: Some(pos as u16 + 1),
                body: unicast,
            });
        }

        Ok(Round2 {
            params: self.params,
            message: self.message,
            sid: self.sid,
            ephemeral: self.ephemeral,
            broadcasts,
            own_unicast,
            i: self.i,
        })
    }
    pub fn is_expensive(&self) -> bool {
        true
    }
    pub fn expects_messages(i: u16, n: u16) -> Store<BroadcastMsgs<SigningBroadcast>> {
        containers::BroadcastMsgsStore::new(i, n)
    }
}

pub struct Round2 {
    params: SignatureParams,
    message: Vec<Scalar<Bls12_381_1>>,
    sid: SessionId,
    ephemeral: EphemeralKeys,
    broadcasts: Vec<SigningBroadcast>,
    own_unicast: SigningUnicast,

    i: u16,
}

impl Round2 {
    pub fn proceed<O>(self, input: P2PMsgs<SigningUnicast>, mut output: O) -> Result<Round3>
    where
        O: Push<Msg<MaskedProduct>>,
    {
        let dealt_to_me = input.into_vec_including_me(self.own_unicast);
        for (pos, unicast) in dealt_to_me.iter().enumerate() {
            if unicast.sid != self.sid {
                return Err(ProceedError::SessionMismatch {
                    who: pos as u16 + 1,
                });
            }
        }

        let (local, product) = self
            .ephemeral
            .phase3_verify_and_mask(&self.broadcasts, &dealt_to_me, &pedersen_blinding_base())
            .map_err(ProceedError::SubDkg)?;

        output.push(Msg {
            sender: self.i,
            receiver: None,
            body: product.clone(),
        });

        Ok(Round3 {
            params: self.params,
            message: self.message,
            local,
            own_product: product,
            i: self.i,
        })
    }
    pub fn is_expensive(&self) -> bool {
        true
    }
    pub fn expects_messages(i: u16, n: u16) -> Store<P2PMsgs<SigningUnicast>> {
        containers::P2PMsgsStore::new(i, n)
    }
}

pub struct Round3 {
    params: SignatureParams,
    message: Vec<Scalar<Bls12_381_1>>,
    local: SigningLocal,
    own_product: MaskedProduct,

    i: u16,
}

impl Round3 {
    pub fn proceed<O>(self, input: BroadcastMsgs<MaskedProduct>, mut output: O) -> Result<Round4>
    where
        O: Push<Msg<SignatureShare>>,
    {
        let products = input.into_vec_including_me(self.own_product);
        for (pos, product) in products.iter().enumerate() {
            if product.sid != self.local.sid {
                return Err(ProceedError::SessionMismatch {
                    who: pos as u16 + 1,
                });
            }
            if product.party_index != self.local.quorum[pos] {
                return Err(ProceedError::QuorumMismatch {
                    who: pos as u16 + 1,
                });
            }
        }

        let share = self
            .local
            .phase4_emit_share(&self.params, &self.message, &products)
            .map_err(ProceedError::EmitShare)?;

        output.push(Msg {
            sender: self.i,
            receiver: None,
            body: share.clone(),
        });

        Ok(Round4 {
            params: self.params,
            message: self.message,
            local: self.local,
            own_share: share,
        })
    }
    pub fn is_expensive(&self) -> bool {
        true
    }
    pub fn expects_messages(i: u16, n: u16) -> Store<BroadcastMsgs<MaskedProduct>> {
        containers::BroadcastMsgsStore::new(i, n)
    }
}

pub struct Round4 {
    params: SignatureParams,
    message: Vec<Scalar<Bls12_381_1>>,
    local: SigningLocal,
    own_share: SignatureShare,
}

impl Round4 {
    pub fn proceed(self, input: BroadcastMsgs<SignatureShare>) -> Result<Signature> {
        let shares = input.into_vec_including_me(self.own_share);
        party_i::combine_signature_shares(
            &self.params,
            &self.local.pk,
            &self.local.params,
            &self.message,
            &shares,
        )
        .map_err(ProceedError::Combine)
    }
    pub fn is_expensive(&self) -> bool {
        true
    }
    pub fn expects_messages(i: u16, n: u16) -> Store<BroadcastMsgs<SignatureShare>> {
        containers::BroadcastMsgsStore::new(i, n)
    }
}

// Errors

type Result<T, E = ProceedError> = std::result::Result<T, E>;

/// Proceeding protocol error
///
/// Subset of [signing errors](enum@super::Error) that can occur at protocol
/// proceeding (i.e. after every message was received and pre-validated).
#[derive(Debug, Error)]
pub enum ProceedError {
    /// Every party announces the index it was using at keygen. This error is
    /// raised if `index == 0 || index > n` where `n` is the number of parties
    /// holding a key.
    #[error(
        "party {who} claimed its index at keygen was {claimed_index} which is not in range [1;n]"
    )]
    PartySentOutOfRangeIndex { who: u16, claimed_index: u16 },
    /// A message was tagged with a different session id.
    #[error("party {who} sent a message belonging to a different signing session")]
    SessionMismatch { who: u16 },
    /// A party spoke under a keygen index it did not announce in round 1.
    #[error("party {who} spoke under a keygen index it did not announce")]
    QuorumMismatch { who: u16 },
    /// Verifying the e/s/rho sub-dealings failed.
    #[error("round 2: {0}")]
    SubDkg(SigningError),
    /// Computing this party's signature share failed.
    #[error("round 3: {0}")]
    EmitShare(SigningError),
    /// Combining the emitted shares failed.
    #[error("round 4: {0}")]
    Combine(ReconstructError),
}
