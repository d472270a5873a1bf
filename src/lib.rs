//! Threshold BBS+ signatures over BLS12-381.
//!
//! A committee of `n` parties holds Shamir shares of a master signing key; any
//! quorum of `2t-1` of them can jointly produce a standard BBS+ signature on a
//! message vector, while fewer than `t` parties learn nothing about the key
//! and no party ever reconstructs it. The produced signature verifies under
//! the ordinary pairing equation with [bbs_plus::verify] and supports
//! selective-disclosure proofs via [bbs_plus::proof].
//!
//! ## How to use it
//! To execute any protocol (keygen/signing) in [tokio] async environment, you need to define
//! message delivery logic and construct stream of incoming messages and sink for outcoming
//! messages. Then you can execute protocol using [AsyncProtocol](round_based::AsyncProtocol)
//! (see below).
//!
//! [tokio]: https://tokio.rs
//!
//! Messages delivery should meet security assumptions:
//! * Any P2P message must be encrypted so no one can read it except recipient
//! * Broadcast messages must be signed, so no one can forge message sender
//!
//! ### Keygen
//! ```no_run
//! use round_based::{Msg, AsyncProtocol};
//! use threshold_bbs_plus::threshold_bbs::state_machine::keygen::{Keygen, ProtocolMessage};
//!
//! # use std::convert::Infallible;
//! # use anyhow::{Result, Error};
//! # use futures::stream::{self, Stream, FusedStream};
//! # use futures::sink::{self, Sink, SinkExt};
//! # use thiserror::Error;
//! #
//! # #[derive(Error, Debug)]
//! # enum SendErr {}
//! # impl From<Infallible> for SendErr { fn from(_: Infallible) -> Self { unimplemented!() } }
//! # #[derive(Error, Debug)]
//! # enum RecvErr {}
//! #
//! async fn connect() -> Result<(
//!     // Party's unique index in range [1;parties_count]
//!     u16,
//!     // Incoming messages
//!     impl Stream<Item=Result<Msg<ProtocolMessage>, RecvErr>> + FusedStream + Unpin,
//!     // Outcoming messages
//!     impl Sink<Msg<ProtocolMessage>, Error=SendErr> + Unpin,
//! )> {
//!     // ...
//!     # Ok((0, stream::pending(), sink::drain().with(|x| futures::future::ok(x))))
//! }
//!
//! # async fn keygen(t: u16, n: u16) -> Result<()> {
//! let (i, incoming, outcoming) = connect().await?;
//! // n - number of parties involved in keygen, t - threshold value, i - party's index
//! let keygen = Keygen::new(i, t, n)?;
//! let local_key = AsyncProtocol::new(keygen, incoming, outcoming)
//!     .run().await?;
//! println!("Public key: {:?}", local_key.public_key());
//! # Ok(())
//! # }
//! ```
//!
//! ### Sign
//! ```no_run
//! use round_based::{Msg, AsyncProtocol};
//! use threshold_bbs_plus::bbs_plus::{hash_message_to_scalar, SignatureParams};
//! use threshold_bbs_plus::threshold_bbs::party_i::SessionId;
//! # use threshold_bbs_plus::threshold_bbs::state_machine::keygen::LocalKey;
//! use threshold_bbs_plus::threshold_bbs::state_machine::sign::{Sign, ProtocolMessage};
//!
//! # use std::convert::Infallible;
//! # use anyhow::{Result, Error};
//! # use futures::stream::{self, Stream, FusedStream};
//! # use futures::sink::{self, Sink, SinkExt};
//! # use thiserror::Error;
//! #
//! # #[derive(Error, Debug)]
//! # enum SendErr {}
//! # impl From<Infallible> for SendErr { fn from(_: Infallible) -> Self { unimplemented!() } }
//! # #[derive(Error, Debug)]
//! # enum RecvErr {}
//! #
//! async fn connect() -> Result<(
//!     // Party's unique index in range [1;parties_count]
//!     u16,
//!     // Incoming messages
//!     impl Stream<Item=Result<Msg<ProtocolMessage>, RecvErr>> + FusedStream + Unpin,
//!     // Outcoming messages
//!     impl Sink<Msg<ProtocolMessage>, Error=SendErr> + Unpin,
//! )> {
//!     // ...
//!     # Ok((0, stream::pending(), sink::drain().with(|x| futures::future::ok(x))))
//! }
//!
//! # async fn sign(local_key: LocalKey, raw_messages: Vec<Vec<u8>>, quorum_size: u16) -> Result<()> {
//! let (i, incoming, outcoming) = connect().await?;
//! // message blocks are hashed to scalars ahead of the protocol; the signing
//! // quorum must have at least 2t-1 members holding keygen shares
//! let params = SignatureParams::new(raw_messages.len());
//! let message = raw_messages.iter().map(|m| hash_message_to_scalar(m)).collect();
//! let signing = Sign::new(SessionId([0u8; 16]), params, message, i, quorum_size, local_key)?;
//! let signature = AsyncProtocol::new(signing, incoming, outcoming)
//!     .run().await?;
//! println!("Signature: {:?}", signature);
//! # Ok(())
//! # }
//! ```

pub mod bbs_plus;
pub mod errors;
pub mod threshold_bbs;
