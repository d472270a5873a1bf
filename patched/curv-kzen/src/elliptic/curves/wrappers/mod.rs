mod arithmetic;
mod encoded_point;
mod encoded_scalar;
pub mod error;
mod generator;
mod point;
mod scalar;
mod serde_support;

pub use self::{
    encoded_point::EncodedPoint, encoded_scalar::EncodedScalar, generator::Generator, point::Point,
    scalar::Scalar,
};
