//! High-level Pedersen-VSS keygen protocol implementation

use std::fmt;
use std::mem::replace;
use std::time::Duration;

use round_based::containers::{
    push::{Push, PushExt},
    *,
};
use round_based::{IsCritical, Msg, StateMachine};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::threshold_bbs::party_i::{KeyGenAck, KeyGenBroadcast};
use crate::threshold_bbs::vss::{PedersenShare, ThresholdParams};

mod rounds;
pub use rounds::{LocalKey, ProceedError};
use rounds::{Round0, Round1, Round2, Round3};

/// Keygen protocol state machine
///
/// Successfully completed keygen protocol produces [LocalKey]: this party's
/// share of the master key plus the master public key.
pub struct Keygen {
    round: R,

    msgs1: Option<Store<BroadcastMsgs<KeyGenBroadcast>>>,
    msgs2: Option<Store<P2PMsgs<PedersenShare>>>,
    msgs3: Option<Store<BroadcastMsgs<KeyGenAck>>>,

    msgs_queue: Vec<Msg<ProtocolMessage>>,

    party_i: u16,
    party_n: u16,

    round_deadline: Option<Duration>,
}

impl Keygen {
    /// Constructs a party of keygen protocol
    ///
    /// Takes party index `i` (in range `[1; n]`), threshold value `t` (number
    /// of shares sufficient to reconstruct), and total number of parties `n`.
    /// Party index identifies this party in the protocol, so it must be
    /// guaranteed to be unique.
    ///
    /// Returns error if:
    /// * `n` is less than 2, returns [Error::TooFewParties]
    /// * `t` is not in range `[2; n]` or a signing quorum `2t-1` would exceed
    ///   `n`, returns [Error::InvalidThreshold]
    /// * `i` is not in range `[1; n]`, returns [Error::InvalidPartyIndex]
    pub fn new(i: u16, t: u16, n: u16) -> Result<Self> {
        if n < 2 {
            return Err(Error::TooFewParties);
        }
        if ThresholdParams::new(t, n).is_err() {
            return Err(Error::InvalidThreshold);
        }
        if i == 0 || i > n {
            return Err(Error::InvalidPartyIndex);
        }
        let mut state = Self {
            round: R::Round0(Round0 { party_i: i, t, n }),

            msgs1: Some(Round1::expects_messages(i, n)),
            msgs2: Some(Round2::expects_messages(i, n)),
            msgs3: Some(Round3::expects_messages(i, n)),

            msgs_queue: vec![],

            party_i: i,
            party_n: n,

            round_deadline: None,
        };

        state.proceed_round(false)?;
        Ok(state)
    }

    /// Sets a per-round deadline. Reaching it aborts the instance with
    /// [Error::Timeout].
    pub fn set_round_deadline(&mut self, deadline: Duration) {
        self.round_deadline = Some(deadline);
    }

    fn gmap_queue<'a, T, F>(&'a mut self, mut f: F) -> impl Push<Msg<T>> + 'a
    where
        F: FnMut(T) -> M + 'a,
    {
        (&mut self.msgs_queue).gmap(move |m: Msg<T>| m.map_body(|m| ProtocolMessage(f(m))))
    }

    /// Proceeds round state if it received enough messages and if it's cheap to
    /// compute or `may_block == true`
    fn proceed_round(&mut self, may_block: bool) -> Result<()> {
        let store1_wants_more = self.msgs1.as_ref().map(|s| s.wants_more()).unwrap_or(false);
        let store2_wants_more = self.msgs2.as_ref().map(|s| s.wants_more()).unwrap_or(false);
        let store3_wants_more = self.msgs3.as_ref().map(|s| s.wants_more()).unwrap_or(false);

        let next_state: R;
        let try_again: bool = match replace(&mut self.round, R::Gone) {
            R::Round0(round) if !round.is_expensive() || may_block => {
                next_state = round
                    .proceed(self.gmap_queue(M::Round1))
                    .map(R::Round1)
                    .map_err(Error::ProceedRound)?;
                true
            }
            s @ R::Round0(_) => {
                next_state = s;
                false
            }
            R::Round1(round) if !store1_wants_more && (!round.is_expensive() || may_block) => {
                let store = self.msgs1.take().ok_or(InternalError::StoreGone)?;
                let msgs = store
                    .finish()
                    .map_err(InternalError::RetrieveRoundMessages)?;
                next_state = round
                    .proceed(msgs, self.gmap_queue(M::Round2))
                    .map(R::Round2)
                    .map_err(Error::ProceedRound)?;
                true
            }
            s @ R::Round1(_) => {
                next_state = s;
                false
            }
            R::Round2(round) if !store2_wants_more && (!round.is_expensive() || may_block) => {
                let store = self.msgs2.take().ok_or(InternalError::StoreGone)?;
                let msgs = store
                    .finish()
                    .map_err(InternalError::RetrieveRoundMessages)?;
                next_state = round
                    .proceed(msgs, self.gmap_queue(M::Round3))
                    .map(R::Round3)
                    .map_err(Error::ProceedRound)?;
                true
            }
            s @ R::Round2(_) => {
                next_state = s;
                false
            }
            R::Round3(round) if !store3_wants_more && (!round.is_expensive() || may_block) => {
                let store = self.msgs3.take().ok_or(InternalError::StoreGone)?;
                let msgs = store
                    .finish()
                    .map_err(InternalError::RetrieveRoundMessages)?;
                next_state = round
                    .proceed(msgs)
                    .map(R::Final)
                    .map_err(Error::ProceedRound)?;
                true
            }
            s @ R::Round3(_) => {
                next_state = s;
                false
            }
            s @ R::Final(_) | s @ R::Gone => {
                next_state = s;
                false
            }
        };

        self.round = next_state;
        if try_again {
            self.proceed_round(may_block)
        } else {
            Ok(())
        }
    }
}

impl StateMachine for Keygen {
    type MessageBody = ProtocolMessage;
    type Err = Error;
    type Output = LocalKey;

    fn handle_incoming(&mut self, msg: Msg<Self::MessageBody>) -> Result<()> {
        let current_round = self.current_round();

        match msg.body {
            ProtocolMessage(M::Round1(m)) => {
                let store = self
                    .msgs1
                    .as_mut()
                    .ok_or(Error::ReceivedOutOfOrderMessage {
                        current_round,
                        msg_round: 1,
                    })?;
                store
                    .push_msg(Msg {
                        sender: msg.sender,
                        receiver: msg.receiver,
                        body: m,
                    })
                    .map_err(Error::HandleMessage)?;
                self.proceed_round(false)
            }
            ProtocolMessage(M::Round2(m)) => {
                let store = self
                    .msgs2
                    .as_mut()
                    .ok_or(Error::ReceivedOutOfOrderMessage {
                        current_round,
                        msg_round: 2,
                    })?;
                store
                    .push_msg(Msg {
                        sender: msg.sender,
                        receiver: msg.receiver,
                        body: m,
                    })
                    .map_err(Error::HandleMessage)?;
                self.proceed_round(false)
            }
            ProtocolMessage(M::Round3(m)) => {
                let store = self
                    .msgs3
                    .as_mut()
                    .ok_or(Error::ReceivedOutOfOrderMessage {
                        current_round,
                        msg_round: 3,
                    })?;
                store
                    .push_msg(Msg {
                        sender: msg.sender,
                        receiver: msg.receiver,
                        body: m,
                    })
                    .map_err(Error::HandleMessage)?;
                self.proceed_round(false)
            }
        }
    }

    fn message_queue(&mut self) -> &mut Vec<Msg<Self::MessageBody>> {
        &mut self.msgs_queue
    }

    fn wants_to_proceed(&self) -> bool {
        let store1_wants_more = self.msgs1.as_ref().map(|s| s.wants_more()).unwrap_or(false);
        let store2_wants_more = self.msgs2.as_ref().map(|s| s.wants_more()).unwrap_or(false);
        let store3_wants_more = self.msgs3.as_ref().map(|s| s.wants_more()).unwrap_or(false);

        match &self.round {
            R::Round0(_) => true,
            R::Round1(_) => !store1_wants_more,
            R::Round2(_) => !store2_wants_more,
            R::Round3(_) => !store3_wants_more,
            R::Final(_) | R::Gone => false,
        }
    }

    fn proceed(&mut self) -> Result<()> {
        self.proceed_round(true)
    }

    fn round_timeout(&self) -> Option<Duration> {
        self.round_deadline
    }

    fn round_timeout_reached(&mut self) -> Self::Err {
        Error::Timeout
    }

    fn is_finished(&self) -> bool {
        matches!(self.round, R::Final(_))
    }

    fn pick_output(&mut self) -> Option<Result<Self::Output>> {
        match self.round {
            R::Final(_) => (),
            R::Gone => return Some(Err(Error::DoublePickResult)),
            _ => return None,
        }

        match replace(&mut self.round, R::Gone) {
            R::Final(result) => Some(Ok(result)),
            _ => unreachable!("guaranteed by match expression above"),
        }
    }

    fn current_round(&self) -> u16 {
        match &self.round {
            R::Round0(_) => 0,
            R::Round1(_) => 1,
            R::Round2(_) => 2,
            R::Round3(_) => 3,
            R::Final(_) | R::Gone => 4,
        }
    }

    fn total_rounds(&self) -> Option<u16> {
        Some(3)
    }

    fn party_ind(&self) -> u16 {
        self.party_i
    }

    fn parties(&self) -> u16 {
        self.party_n
    }
}

impl fmt::Debug for Keygen {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let current_round = match &self.round {
            R::Round0(_) => "0",
            R::Round1(_) => "1",
            R::Round2(_) => "2",
            R::Round3(_) => "3",
            R::Final(_) => "[Final]",
            R::Gone => "[Gone]",
        };
        let msgs1 = match self.msgs1.as_ref() {
            Some(msgs) => format!("[{}/{}]", msgs.messages_received(), msgs.messages_total()),
            None => "[None]".into(),
        };
        let msgs2 = match self.msgs2.as_ref() {
            Some(msgs) => format!("[{}/{}]", msgs.messages_received(), msgs.messages_total()),
            None => "[None]".into(),
        };
        let msgs3 = match self.msgs3.as_ref() {
            Some(msgs) => format!("[{}/{}]", msgs.messages_received(), msgs.messages_total()),
            None => "[None]".into(),
        };
        write!(
            f,
            "{{Keygen at round={} msgs1={} msgs2={} msgs3={} queue=[len={}]}}",
            current_round,
            msgs1,
            msgs2,
            msgs3,
            self.msgs_queue.len()
        )
    }
}

// Error

type Result<T> = std::result::Result<T, Error>;

/// Error type of keygen protocol
#[derive(Debug, Error)]
pub enum Error {
    /// Round proceeding resulted in error
    #[error("proceed round: {0}")]
    ProceedRound(ProceedError),

    /// Too few parties (less than 2)
    #[error("at least 2 parties are required for keygen")]
    TooFewParties,
    /// Threshold value `t` is not in range `[2; n]`, or `2t-1 > n` so no
    /// signing quorum could ever assemble
    #[error("threshold is not in range [2; n] or admits no signing quorum")]
    InvalidThreshold,
    /// Party index is not in range `[1; n]`
    #[error("party index is not in range [1; n]")]
    InvalidPartyIndex,

    /// Received message didn't pass pre-validation
    #[error("received message didn't pass pre-validation: {0}")]
    HandleMessage(#[source] StoreErr),
    /// Received message which we didn't expect to receive now (e.g. message from previous round)
    #[error(
        "didn't expect to receive message from round {msg_round} (being at round {current_round})"
    )]
    ReceivedOutOfOrderMessage { current_round: u16, msg_round: u16 },
    /// [Keygen::pick_output] called twice
    #[error("pick_output called twice")]
    DoublePickResult,
    /// A round deadline configured via [Keygen::set_round_deadline] elapsed
    #[error("round deadline elapsed")]
    Timeout,

    /// Some internal assertions were failed, which is a bug
    #[error("internal error: {0:?}")]
    InternalError(InternalError),
}

impl IsCritical for Error {
    fn is_critical(&self) -> bool {
        true
    }
}

impl From<InternalError> for Error {
    fn from(err: InternalError) -> Self {
        Self::InternalError(err)
    }
}

use private::InternalError;
mod private {
    #[derive(Debug)]
    #[non_exhaustive]
    pub enum InternalError {
        /// Messages store reported that it received all messages it wanted to
        /// receive, but refused to return the message container
        RetrieveRoundMessages(round_based::containers::StoreErr),
        #[doc(hidden)]
        StoreGone,
    }
}

// Rounds

enum R {
    Round0(Round0),
    Round1(Round1),
    Round2(Round2),
    Round3(Round3),
    Final(LocalKey),
    Gone,
}

// Messages

/// Protocol message which parties send on wire
///
/// Hides actual messages structure so it could be changed without breaking
/// semver policy.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ProtocolMessage(M);

#[derive(Clone, Debug, Serialize, Deserialize)]
enum M {
    Round1(KeyGenBroadcast),
    Round2(PedersenShare),
    Round3(KeyGenAck),
}

#[cfg(test)]
mod test {
    use round_based::dev::Simulation;

    use super::*;

    pub fn simulate_keygen(t: u16, n: u16) -> Vec<LocalKey> {
        let mut simulation = Simulation::new();

        for i in 1..=n {
            simulation.add_party(Keygen::new(i, t, n).unwrap());
        }

        let keys = simulation.run().unwrap();

        // every party must end up with the same master public key
        let pk = keys[0].public_key();
        assert!(keys.iter().all(|k| k.public_key() == pk));

        keys
    }

    #[test]
    fn simulate_keygen_t2_n3() {
        simulate_keygen(2, 3);
    }

    #[test]
    fn simulate_keygen_t2_n5() {
        simulate_keygen(2, 5);
    }

    #[test]
    fn simulate_keygen_t3_n5() {
        simulate_keygen(3, 5);
    }

    #[test]
    fn keygen_rejects_threshold_without_signing_quorum() {
        // t = 3, n = 4: a signing quorum would need 2t-1 = 5 parties
        assert!(matches!(
            Keygen::new(1, 3, 4),
            Err(Error::InvalidThreshold)
        ));
    }
}
