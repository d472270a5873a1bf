//! Error taxonomy shared by every protocol layer.
//!
//! Local arithmetic and serialization failures abort the protocol instance
//! that hit them. DKG inconsistencies abort the DKG instance and surface to
//! the operator. Signing failures abort the signing session but never
//! invalidate the master key.

use thiserror::Error;

/// Scalar-field arithmetic failures.
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum ArithmeticError {
    /// Inversion of the zero scalar was requested.
    #[error("division by zero in Fr")]
    DivZero,
    /// A 32-byte encoding was not a canonical scalar (value >= group order).
    #[error("encoded value is not a canonical field element")]
    NotInField,
    /// An interpolation set contained a repeated or zero evaluation point.
    #[error("interpolation points must be distinct and nonzero")]
    DuplicateIndex,
}

/// Wire-format decoding failures.
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum SerializationError {
    /// Input length differs from the fixed wire format.
    #[error("bad length: expected {expected} bytes, got {got}")]
    BadLength { expected: usize, got: usize },
    /// The compressed encoding does not decode to a curve point.
    #[error("encoding is not a point on the curve")]
    NotOnCurve,
    /// The point decodes onto the curve but outside the prime-order subgroup.
    #[error("point is not in the prime-order subgroup")]
    NotInSubgroup,
    /// A scalar inside the encoding failed its range check.
    #[error(transparent)]
    Scalar(#[from] ArithmeticError),
}

/// Failures of the Pedersen-VSS distributed key generation.
///
/// The DKG is fail-stop: every variant aborts the instance, no round retry.
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum DkgError {
    /// A dealt share did not match the dealer's public commitments.
    #[error("share dealt by party {from} to party {to} is inconsistent with its commitments")]
    InconsistentShare { from: u16, to: u16 },
    /// A round completed without a broadcast from some party.
    #[error("party {party} never broadcast in round {round}")]
    MissingBroadcast { party: u16, round: u16 },
    /// A round deadline elapsed.
    #[error("round deadline elapsed")]
    Timeout,
    /// Two broadcasts claimed the same party index.
    #[error("duplicate party index in broadcast set")]
    DuplicateParty,
}

/// Failures of a distributed signing session.
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum SigningError {
    /// Fewer signers than the product sharing can be interpolated from.
    #[error("insufficient quorum: have {have} signers, need {need}")]
    InsufficientQuorum { have: u16, need: u16 },
    /// One of the e/s/rho sub-DKGs aborted.
    #[error("sub-DKG aborted: {0}")]
    SubDkgAborted(#[source] DkgError),
    /// The masked product `alpha = k * rho` reconstructed to zero. Retriable
    /// within the session by dealing a fresh `rho`.
    #[error("distributed inversion failed: masked product is zero")]
    InversionFailed,
    /// The message vector does not fit the generator set.
    #[error(transparent)]
    Malformed(#[from] SerializationError),
}

/// Failures of combining signature shares into a full signature.
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum ReconstructError {
    /// Fewer shares than the sharing degree admits.
    #[error("too few signature shares: have {have}, need {need}")]
    TooFewShares { have: usize, need: usize },
    /// Two shares were submitted under the same party index.
    #[error("two signature shares submitted by party {index}")]
    DuplicateShare { index: u16 },
    /// The combined signature failed verification. Which share was bad is
    /// deliberately not identified.
    #[error("combined signature failed verification")]
    VerifyFailed,
}

/// Failures of signature (and proof) verification.
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum VerificationError {
    /// The pairing equation (or a Schnorr equation of the proof) did not hold.
    #[error("pairing equation mismatch")]
    PairingMismatch,
    /// A group element that must not be the identity was the identity.
    #[error("identity element where a nontrivial point is required")]
    IdentityElement,
    /// The inputs do not fit the parameter set (e.g. message count).
    #[error(transparent)]
    Malformed(#[from] SerializationError),
}
