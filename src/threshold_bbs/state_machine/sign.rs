//! High-level signing protocol implementation

use std::fmt;
use std::mem::replace;
use std::time::Duration;

use curv::elliptic::curves::{Bls12_381_1, Scalar};
use round_based::containers::{
    push::{Push, PushExt},
    *,
};
use round_based::{IsCritical, Msg, StateMachine};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::bbs_plus::{Signature, SignatureParams};
use crate::threshold_bbs::party_i::{
    MaskedProduct, SessionId, SignatureShare, SigningBroadcast, SigningUnicast,
};
use crate::threshold_bbs::state_machine::keygen::LocalKey;

mod rounds;
pub use rounds::ProceedError;
use rounds::{Round0, Round1, Round2, Round3, Round4};

/// Signing protocol state machine
///
/// Successfully completed signing protocol produces a [Signature] on the given
/// message vector, valid under the master public key produced at keygen.
pub struct Sign {
    round: R,

    msgs1: Option<Store<BroadcastMsgs<SigningBroadcast>>>,
    msgs2: Option<Store<P2PMsgs<SigningUnicast>>>,
    msgs3: Option<Store<BroadcastMsgs<MaskedProduct>>>,
    msgs4: Option<Store<BroadcastMsgs<SignatureShare>>>,

    msgs_queue: Vec<Msg<ProtocolMessage>>,

    party_i: u16,
    party_n: u16,

    round_deadline: Option<Duration>,
}

impl Sign {
    /// Constructs a party of signing protocol
    ///
    /// Takes the session id `sid`, the generator set and hashed message vector,
    /// party index `i` within the signing quorum (in range `[1; n]`), quorum
    /// size `n`, and the local key obtained at keygen.
    ///
    /// Returns error if:
    /// * `n` is less than `2t-1` — the masked product lies on a degree
    ///   `2(t-1)` polynomial, so smaller quorums cannot interpolate it,
    ///   returns [Error::TooFewParties]
    /// * `n` is more than the number of parties holding a key,
    ///   returns [Error::TooManyParties]
    /// * `i` is not in range `[1; n]`, returns [Error::InvalidPartyIndex]
    /// * message length differs from the generator set,
    ///   returns [Error::MismatchedMessageCount]
    pub fn new(
        sid: SessionId,
        params: SignatureParams,
        message: Vec<Scalar<Bls12_381_1>>,
        i: u16,
        n: u16,
        local_key: LocalKey,
    ) -> Result<Self> {
        if n < 2 * local_key.threshold() - 1 {
            return Err(Error::TooFewParties);
        }
        if n > local_key.parties() {
            return Err(Error::TooManyParties);
        }
        if i == 0 || i > n {
            return Err(Error::InvalidPartyIndex);
        }
        if message.len() != params.message_count() {
            return Err(Error::MismatchedMessageCount);
        }
        let mut state = Self {
            round: R::Round0(Round0 {
                key: local_key,
                params,
                message,
                sid,
                i,
            }),

            msgs1: Some(Round1::expects_messages(i, n)),
            msgs2: Some(Round2::expects_messages(i, n)),
            msgs3: Some(Round3::expects_messages(i, n)),
            msgs4: Some(Round4::expects_messages(i, n)),

            msgs_queue: vec![],

            party_i: i,
            party_n: n,

            round_deadline: None,
        };

        state.proceed_round(false)?;
        Ok(state)
    }

    /// Sets a per-round deadline. Reaching it aborts the session with
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
        let store4_wants_more = self.msgs4.as_ref().map(|s| s.wants_more()).unwrap_or(false);

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
                    .proceed(msgs, self.gmap_queue(M::Round4))
                    .map(R::Round4)
                    .map_err(Error::ProceedRound)?;
                true
            }
            s @ R::Round3(_) => {
                next_state = s;
                false
            }
            R::Round4(round) if !store4_wants_more && (!round.is_expensive() || may_block) => {
                let store = self.msgs4.take().ok_or(InternalError::StoreGone)?;
                let msgs = store
                    .finish()
                    .map_err(InternalError::RetrieveRoundMessages)?;
                next_state = round
                    .proceed(msgs)
                    .map(R::Final)
                    .map_err(Error::ProceedRound)?;
                true
            }
            s @ R::Round4(_) => {
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

impl StateMachine for Sign {
    type MessageBody = ProtocolMessage;
    type Err = Error;
    type Output = Signature;

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
            ProtocolMessage(M::Round4(m)) => {
                let store = self
                    .msgs4
                    .as_mut()
                    .ok_or(Error::ReceivedOutOfOrderMessage {
                        current_round,
                        msg_round: 4,
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
        let store4_wants_more = self.msgs4.as_ref().map(|s| s.wants_more()).unwrap_or(false);

        match &self.round {
            R::Round0(_) => true,
            R::Round1(_) => !store1_wants_more,
            R::Round2(_) => !store2_wants_more,
            R::Round3(_) => !store3_wants_more,
            R::Round4(_) => !store4_wants_more,
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
            R::Round4(_) => 4,
            R::Final(_) | R::Gone => 5,
        }
    }

    fn total_rounds(&self) -> Option<u16> {
        Some(4)
    }

    fn party_ind(&self) -> u16 {
        self.party_i
    }

    fn parties(&self) -> u16 {
        self.party_n
    }
}

impl fmt::Debug for Sign {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let current_round = match &self.round {
            R::Round0(_) => "0",
            R::Round1(_) => "1",
            R::Round2(_) => "2",
            R::Round3(_) => "3",
            R::Round4(_) => "4",
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
        let msgs4 = match self.msgs4.as_ref() {
            Some(msgs) => format!("[{}/{}]", msgs.messages_received(), msgs.messages_total()),
            None => "[None]".into(),
        };
        write!(
            f,
            "{{Sign at round={} msgs1={} msgs2={} msgs3={} msgs4={} queue=[len={}]}}",
            current_round,
            msgs1,
            msgs2,
            msgs3,
            msgs4,
            self.msgs_queue.len()
        )
    }
}

// Error

type Result<T> = std::result::Result<T, Error>;

/// Error type of signing protocol
#[derive(Debug, Error)]
pub enum Error {
    /// Round proceeding resulted in error
    #[error("proceed round: {0}")]
    ProceedRound(ProceedError),

    /// Too few parties involved in protocol (less than `2t-1`), signing is not
    /// possible
    #[error("at least 2t-1 parties must be involved in signing")]
    TooFewParties,
    /// Number of parties involved in signing is more than number of parties
    /// holding a key
    #[error("number of parties involved in signing is more than number of parties holding a key")]
    TooManyParties,
    /// Party index is not in range `[1; n]`
    #[error("party index is not in range [1; n]")]
    InvalidPartyIndex,
    /// Message vector length differs from the generator set
    #[error("message vector length differs from the generator set")]
    MismatchedMessageCount,

    /// Received message didn't pass pre-validation
    #[error("received message didn't pass pre-validation: {0}")]
    HandleMessage(#[source] StoreErr),
    /// Received message which we didn't expect to receive now (e.g. message from previous round)
    #[error(
        "didn't expect to receive message from round {msg_round} (being at round {current_round})"
    )]
    ReceivedOutOfOrderMessage { current_round: u16, msg_round: u16 },
    /// [Sign::pick_output] called twice
    #[error("pick_output called twice")]
    DoublePickResult,
    /// A round deadline configured via [Sign::set_round_deadline] elapsed
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
    Round4(Round4),
    Final(Signature),
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
    Round1(SigningBroadcast),
    Round2(SigningUnicast),
    Round3(MaskedProduct),
    Round4(SignatureShare),
}

#[cfg(test)]
mod test {
    use round_based::dev::Simulation;

    use super::*;
    use crate::bbs_plus::{self, hash_message_to_scalar};
    use crate::threshold_bbs::state_machine::keygen::Keygen;

    fn simulate_sign(message: &[&[u8]], s: &[u16], t: u16, n: u16) {
        // Keygen
        let mut keygen_simulation = Simulation::new();
        for i in 1..=n {
            keygen_simulation.add_party(Keygen::new(i, t, n).unwrap());
        }
        let parties_keys = keygen_simulation.run().unwrap();
        let pk = parties_keys[0].public_key();

        let params = SignatureParams::new(message.len());
        let message: Vec<_> = message.iter().map(|m| hash_message_to_scalar(m)).collect();
        let sid = SessionId(*b"test-session-001");

        // Sign
        let mut sign_simulation = Simulation::new();

        let parties_keys: Vec<_> = s
            .iter()
            .map(|&i| parties_keys[usize::from(i) - 1].clone())
            .collect();
        let quorum_size = s.len() as u16;
        for (i, key) in (1..).zip(parties_keys) {
            sign_simulation.add_party(
                Sign::new(sid, params.clone(), message.clone(), i, quorum_size, key).unwrap(),
            );
        }

        let sigs = sign_simulation.run().unwrap();

        // all parties arrive at the same signature
        let first = sigs[0].clone();
        assert!(sigs.iter().all(|sig| *sig == first));
        // and it verifies under the master public key
        assert!(bbs_plus::verify(&params, &pk, &first, &message).is_ok());
    }

    #[test]
    fn simulate_sign_t2_n3_full_quorum() {
        simulate_sign(&[b"~~ MESSAGE ~~"], &[1, 2, 3], 2, 3);
    }

    #[test]
    fn simulate_sign_t2_n5_minimal_quorum() {
        simulate_sign(&[b"~~ MESSAGE ~~", b"second block"], &[1, 3, 5], 2, 5);
    }

    #[test]
    fn simulate_sign_t3_n5_full_quorum() {
        simulate_sign(&[b"a", b"b", b"c"], &[1, 2, 3, 4, 5], 3, 5);
    }

    #[test]
    fn sign_rejects_quorum_below_2t_minus_1() {
        let mut keygen_simulation = Simulation::new();
        for i in 1..=3 {
            keygen_simulation.add_party(Keygen::new(i, 2, 3).unwrap());
        }
        let keys = keygen_simulation.run().unwrap();

        let params = SignatureParams::new(1);
        let message = vec![hash_message_to_scalar(b"msg")];
        let sid = SessionId([7u8; 16]);
        assert!(matches!(
            Sign::new(sid, params, message, 1, 2, keys[0].clone()),
            Err(Error::TooFewParties)
        ));
    }
}
