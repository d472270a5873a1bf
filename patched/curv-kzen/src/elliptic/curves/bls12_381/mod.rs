pub mod g1;
pub mod g2;
mod pairing;
pub mod scalar;

pub use self::{g1::Bls12_381_1, g2::Bls12_381_2, pairing::Pair};
