use curv::arithmetic::*;
use curv::cryptographic_primitives::hashing::{Digest, DigestExt};
use curv::elliptic::curves::{Bls12_381_1, Curve, Point, Scalar};
use curv::BigInt;
use serde::{Deserialize, Serialize};
use sha2::Sha256;
use zeroize::Zeroize;

/// NIZK binding a DKG announcement to the dealer's first Pedersen commitment:
/// proves knowledge of `(a, b)` with `C0 = g1^a * h^b` and `Y = u^a`, where `u`
/// generates the announcement group `E`. The master DKG announces in G2 (the
/// public key lives there), the signing sub-DKGs in G1. Mixing the groups in
/// one Schnorr transcript is sound because |G1| = |G2| on BLS12-381 (there is a
/// map between the scalar fields).
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(bound = "")]
pub struct ConsistencyProof<E: Curve> {
    pub t_comm: Point<Bls12_381_1>,
    pub t_ann: Point<E>,
    pub z_a: BigInt,
    pub z_b: BigInt,
}

/// Reinterprets a G1-side scalar in the scalar field attached to curve `E`.
/// Well defined for the BLS12-381 pair of groups, whose orders coincide.
pub fn scalar_to_curve<E: Curve>(x: &Scalar<Bls12_381_1>) -> Scalar<E> {
    Scalar::from_bigint(&x.to_bigint())
}

impl<E: Curve> ConsistencyProof<E> {
    pub fn prove(
        a: &Scalar<Bls12_381_1>,
        b: &Scalar<Bls12_381_1>,
        h: &Point<Bls12_381_1>,
        context: &[u8],
    ) -> Self {
        let commitment = &(Point::generator() * a) + &(h * b);
        let announcement = Point::<E>::generator() * &scalar_to_curve::<E>(a);
        let mut r_a = Scalar::<Bls12_381_1>::random();
        let mut r_b = Scalar::<Bls12_381_1>::random();
        let t_comm = &(Point::generator() * &r_a) + &(h * &r_b);
        let t_ann = Point::<E>::generator() * &scalar_to_curve::<E>(&r_a);
        let c = challenge(&commitment, &announcement, &t_comm, &t_ann, h, context);
        let q = Scalar::<Bls12_381_1>::group_order();
        let z_a = BigInt::mod_add(&r_a.to_bigint(), &BigInt::mod_mul(&c, &a.to_bigint(), q), q);
        let z_b = BigInt::mod_add(&r_b.to_bigint(), &BigInt::mod_mul(&c, &b.to_bigint(), q), q);
        r_a.zeroize();
        r_b.zeroize();
        ConsistencyProof {
            t_comm,
            t_ann,
            z_a,
            z_b,
        }
    }

    pub fn verify(
        &self,
        commitment: &Point<Bls12_381_1>,
        announcement: &Point<E>,
        h: &Point<Bls12_381_1>,
        context: &[u8],
    ) -> bool {
        let c = challenge(commitment, announcement, &self.t_comm, &self.t_ann, h, context);

        let z_a = Scalar::<Bls12_381_1>::from_bigint(&self.z_a);
        let z_b = Scalar::<Bls12_381_1>::from_bigint(&self.z_b);
        let c1 = Scalar::<Bls12_381_1>::from_bigint(&c);
        let comm_side = &(Point::generator() * &z_a) + &(h * &z_b);
        let comm_expected = &self.t_comm + &(commitment * &c1);

        let z_a2 = Scalar::<E>::from_bigint(&self.z_a);
        let c2 = Scalar::<E>::from_bigint(&c);
        let ann_side = Point::<E>::generator() * &z_a2;
        let ann_expected = &self.t_ann + &(announcement * &c2);

        comm_side == comm_expected && ann_side == ann_expected
    }
}

fn challenge<E: Curve>(
    commitment: &Point<Bls12_381_1>,
    announcement: &Point<E>,
    t_comm: &Point<Bls12_381_1>,
    t_ann: &Point<E>,
    h: &Point<Bls12_381_1>,
    context: &[u8],
) -> BigInt {
    Sha256::new()
        .chain(b"pedersen-consistency")
        .chain(context)
        .chain_point(h)
        .chain_point(commitment)
        .chain_point(announcement)
        .chain_point(t_comm)
        .chain_point(t_ann)
        .result_bigint()
}
