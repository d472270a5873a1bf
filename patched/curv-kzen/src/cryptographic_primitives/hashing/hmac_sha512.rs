/*
    This file is part of Curv library
    Copyright 2018 by Kzen Networks
    (https://github.com/KZen-networks/curv)
    License MIT: https://github.com/KZen-networks/curv/blob/master/LICENSE
*/

#![allow(deprecated)]

use crate::BigInt;

use super::traits::KeyedHash;
use crate::arithmetic::traits::*;

use hmac::{Hmac, Mac, NewMac};
use sha2::Sha512;
use zeroize::Zeroize;
type HmacSha256type = Hmac<Sha512>;

#[deprecated(since = "0.8.0", note = "use HmacExt instead")]
pub struct HMacSha512;

impl KeyedHash for HMacSha512 {
    fn create_hmac(key: &BigInt, data: &[&BigInt]) -> BigInt {
        let mut key_bytes = key.to_bytes();

        let mut hmac = HmacSha256type::new_from_slice(&key_bytes).expect("");

        for value in data {
            hmac.update(&BigInt::to_bytes(value));
        }
        key_bytes.zeroize();
        let result = hmac.finalize();
        let code = result.into_bytes();

        BigInt::from_bytes(code.as_slice())
    }
    fn verify(key: &BigInt, data: &[&BigInt], code_bytes: [u8; 64]) -> Result<(), ()> {
        let key_bytes = key.to_bytes();

        let mut hmac = HmacSha256type::new_from_slice(&key_bytes).expect("");

        for value in data {
            hmac.update(&BigInt::to_bytes(value));
        }
        match hmac.verify(&code_bytes) {
            Ok(_) => Ok(()),
            Err(_) => Err(()),
        }
    }
}
