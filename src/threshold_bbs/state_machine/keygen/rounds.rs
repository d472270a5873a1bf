use round_based::containers::push::Push;
use round_based::containers::{self, BroadcastMsgs, P2PMsgs, Store};
use round_based::Msg;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::bbs_plus::{pedersen_blinding_base, MasterPublicKey};
use crate::errors::DkgError;
use crate::threshold_bbs::party_i::{self, KeyGenAck, KeyGenBroadcast, SharedKeys};
use crate::threshold_bbs::vss::{PedersenShare, ThresholdParams};

pub struct Round0 {
    pub party_i: u16,
    pub t: u16,
    pub n: u16,
}

impl Round0 {
    pub fn proceed<O>(self, mut output: O) -> Result<Round1>
    where
        O: Push<Msg<KeyGenBroadcast>>,
    {
        let params =
            ThresholdParams::new(self.t, self.n).expect("parameters validated at Keygen::new");
        let (keys, broadcast) =
            party_i::Keys::phase1_create(&params, self.party_i, &pedersen_blinding_base());
        output.push(Msg {
            sender: self.party_i,
            receiver: None,
            body: broadcast.clone(),
        });
        Ok(Round1 {
            keys,
            own_broadcast: broadcast,
            party_i: self.party_i,
        })
    }
    pub fn is_expensive(&self) -> bool {
        true
    }
}

pub struct Round1 {
    keys: party_i::Keys,
    own_broadcast: KeyGenBroadcast,

    party_i: u16,
}

impl Round1 {
    pub fn proceed<O>(self, input: BroadcastMsgs<KeyGenBroadcast>, mut output: O) -> Result<Round2>
    where
        O: Push<Msg<PedersenShare>>,
    {
        let broadcasts = input.into_vec_including_me(self.own_broadcast);
        let shares = self.keys.phase2_distribute();
        for (i, share) in shares.iter().enumerate() {
            if i + 1 == usize::from(self.party_i) {
                continue;
            }
            output.push(Msg {
                sender: self.party_i,
                receiver: Some(i as u16 + 1),
                body: share.clone(),
            });
        }

        let own_share = shares[usize::from(self.party_i) - 1].clone();
        Ok(Round2 {
            keys: self.keys,
            broadcasts,
            own_share,
            party_i: self.party_i,
        })
    }
    pub fn is_expensive(&self) -> bool {
        false
    }
    pub fn expects_messages(i: u16, n: u16) -> Store<BroadcastMsgs<KeyGenBroadcast>> {
        containers::BroadcastMsgsStore::new(i, n)
    }
}

pub struct Round2 {
    keys: party_i::Keys,
    broadcasts: Vec<KeyGenBroadcast>,
    own_share: PedersenShare,

    party_i: u16,
}

impl Round2 {
    pub fn proceed<O>(self, input: P2PMsgs<PedersenShare>, mut output: O) -> Result<Round3>
    where
        O: Push<Msg<KeyGenAck>>,
    {
        let dealt_to_me = input.into_vec_including_me(self.own_share);
        let ack = self
            .keys
            .phase3_verify(&self.broadcasts, &dealt_to_me, &pedersen_blinding_base())
            .map_err(ProceedError::ValidateShares)?;

        output.push(Msg {
            sender: self.party_i,
            receiver: None,
            body: ack.clone(),
        });

        Ok(Round3 {
            keys: self.keys,
            broadcasts: self.broadcasts,
            dealt_to_me,
            own_ack: ack,
            party_i: self.party_i,
        })
    }
    pub fn is_expensive(&self) -> bool {
        true
    }
    pub fn expects_messages(i: u16, n: u16) -> Store<P2PMsgs<PedersenShare>> {
        containers::P2PMsgsStore::new(i, n)
    }
}

pub struct Round3 {
    keys: party_i::Keys,
    broadcasts: Vec<KeyGenBroadcast>,
    dealt_to_me: Vec<PedersenShare>,
    own_ack: KeyGenAck,

    party_i: u16,
}

impl Round3 {
    pub fn proceed(self, input: BroadcastMsgs<KeyGenAck>) -> Result<LocalKey> {
        let acks = input.into_vec_including_me(self.own_ack);
        let shared_keys = self
            .keys
            .phase4_finalize(&self.broadcasts, &acks, &self.dealt_to_me)
            .map_err(ProceedError::Finalize)?;

        Ok(LocalKey {
            i: self.party_i,
            t: shared_keys.params.threshold,
            n: shared_keys.params.share_count,
            shared_keys,
        })
    }
    pub fn is_expensive(&self) -> bool {
        true
    }
    pub fn expects_messages(i: u16, n: u16) -> Store<BroadcastMsgs<KeyGenAck>> {
        containers::BroadcastMsgsStore::new(i, n)
    }
}

/// Local secret obtained by a party after [keygen](super::Keygen) completes.
#[derive(Clone, Serialize, Deserialize)]
pub struct LocalKey {
    pub(in crate::threshold_bbs::state_machine) shared_keys: SharedKeys,

    pub(in crate::threshold_bbs::state_machine) i: u16,
    pub(in crate::threshold_bbs::state_machine) t: u16,
    pub(in crate::threshold_bbs::state_machine) n: u16,
}

impl LocalKey {
    /// Public key of the secret shared between the parties.
    pub fn public_key(&self) -> MasterPublicKey {
        self.shared_keys.pk.clone()
    }

    /// This party's index as used during keygen.
    pub fn index(&self) -> u16 {
        self.i
    }

    pub fn threshold(&self) -> u16 {
        self.t
    }

    pub fn parties(&self) -> u16 {
        self.n
    }

    /// The underlying key share, for driving the protocol without the state
    /// machine.
    pub fn shared_keys(&self) -> &SharedKeys {
        &self.shared_keys
    }
}

// Errors

type Result<T, E = ProceedError> = std::result::Result<T, E>;

/// Proceeding protocol error
///
/// Subset of [keygen errors](enum@super::Error) that can occur at protocol
/// proceeding (i.e. after every message was received and pre-validated).
#[derive(Debug, Error)]
pub enum ProceedError {
    #[error("round 2: validate dealt shares: {0}")]
    ValidateShares(DkgError),
    #[error("round 3: finalize key: {0}")]
    Finalize(DkgError),
}

impl ProceedError {
    /// The protocol-level failure behind this round error.
    pub fn dkg_error(&self) -> DkgError {
        match self {
            ProceedError::ValidateShares(e) | ProceedError::Finalize(e) => *e,
        }
    }
}
