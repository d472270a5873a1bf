/*
    This file is part of Curv library
    Copyright 2018 by Kzen Networks
    (https://github.com/KZen-networks/curv)
    License MIT: <https://github.com/KZen-networks/curv/blob/master/LICENSE>
*/

pub mod commitments;
pub mod hashing;
pub mod proofs;
pub mod secret_sharing;
pub mod twoparty;
