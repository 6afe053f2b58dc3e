//! Recovery of the signing identity from a replay-protected legacy
//! signature.

use crate::types::{H256, U256};

use elliptic_curve::{consts::U32, sec1::ToEncodedPoint};
use generic_array::GenericArray;
use k256::{
    ecdsa::{Error as K256SignatureError, RecoveryId, Signature as K256Signature, VerifyingKey},
    PublicKey as K256PublicKey,
};
use thiserror::Error;

/// An error involving signature recovery.
#[derive(Debug, Error)]
pub enum RecoveryError {
    /// The recovery indicator does not carry the expected replay-protection
    /// fold for the chain, so the transaction was signed under a different
    /// convention (or a different chain) than the one requested.
    #[error("recovery indicator {v} was not produced under chain id {chain_id}")]
    ForeignReplayProtection { v: u64, chain_id: u64 },
    /// Internal error during public key recovery (off-curve point, zero
    /// scalar, out-of-range recovery id)
    #[error(transparent)]
    K256Error(#[from] K256SignatureError),
}

/// The `(r, s, v)` triple carried by a signed legacy transaction.
///
/// `v` still embeds the signing chain's replay protection; use
/// [`Signature::recover_signer`] to strip it and resolve the public key.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Signature {
    /// R value
    pub r: U256,
    /// S value
    pub s: U256,
    /// Replay-protected recovery indicator
    pub v: u64,
}

/// The signing identity resolved from a legacy signature, re-expressed in
/// the layout the IoTeX envelope expects.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RecoveredSigner {
    /// SEC1 uncompressed public key: a `0x04` tag followed by the 64-byte
    /// curve point
    pub public_key: [u8; 65],
    /// `r` and `s` left-padded to 32 bytes each, followed by the bare
    /// recovery id (`0`/`1`, the native convention, not Ethereum's 27/28)
    pub signature: [u8; 65],
}

impl Signature {
    /// Strips the replay-protection fold `2 * chain_id + 8` from `v`.
    ///
    /// A transaction signed for `chain_id` lands on 27 or 28 after the
    /// subtraction ('Electrum' notation); anything else means the signature
    /// was produced under a different scheme and cannot be trusted here.
    pub fn recovery_id(&self, chain_id: u64) -> Result<RecoveryId, RecoveryError> {
        let foreign = RecoveryError::ForeignReplayProtection { v: self.v, chain_id };
        let standard_v = match self.v.checked_sub(2 * chain_id + 8) {
            Some(27) => 0,
            Some(28) => 1,
            _ => return Err(foreign),
        };
        Ok(RecoveryId::from_byte(standard_v).expect("normalized recovery id always valid"))
    }

    /// Recovers the public key which signed `sighash` under the `chain_id`
    /// replay-protection convention, along with the canonical 65-byte
    /// signature to submit alongside it.
    pub fn recover_signer(
        &self,
        sighash: H256,
        chain_id: u64,
    ) -> Result<RecoveredSigner, RecoveryError> {
        let recovery_id = self.recovery_id(chain_id)?;
        let signature = self.as_signature()?;
        let verify_key =
            VerifyingKey::recover_from_prehash(sighash.as_ref(), &signature, recovery_id)?;

        let public_key = K256PublicKey::from(&verify_key);
        let point = public_key.to_encoded_point(/* compress = */ false);
        let mut public_key = [0u8; 65];
        public_key.copy_from_slice(point.as_bytes());

        let mut signature = [0u8; 65];
        self.r.to_big_endian(&mut signature[..32]);
        self.s.to_big_endian(&mut signature[32..64]);
        signature[64] = recovery_id.to_byte();

        Ok(RecoveredSigner { public_key, signature })
    }

    /// Re-expresses `r` and `s` as a curve-level signature.
    fn as_signature(&self) -> Result<K256Signature, RecoveryError> {
        let mut r_bytes = [0u8; 32];
        let mut s_bytes = [0u8; 32];
        self.r.to_big_endian(&mut r_bytes);
        self.s.to_big_endian(&mut s_bytes);
        let gar: &GenericArray<u8, U32> = GenericArray::from_slice(&r_bytes);
        let gas: &GenericArray<u8, U32> = GenericArray::from_slice(&s_bytes);
        Ok(K256Signature::from_scalars(*gar, *gas)?)
    }
}

/// Folds a bare recovery id back into the replay-protected `v` for
/// `chain_id`, the inverse of [`Signature::recovery_id`].
pub fn to_replay_protected_v(recovery_id: u8, chain_id: u64) -> u64 {
    (recovery_id as u64) + 35 + chain_id * 2
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{types::LegacyTransaction, utils::keccak256};
    use rlp::Rlp;

    fn recovered_address(signer: &RecoveredSigner) -> String {
        assert_eq!(signer.public_key[0], 0x04);
        let hash = keccak256(&signer.public_key[1..]);
        hex::encode(&hash[12..])
    }

    #[test]
    fn recovers_known_mainnet_signers() {
        // Raw transactions and senders from the EIP-155 reference vectors
        let cases = [
            (
                "f864808504a817c800825208943535353535353535353535353535353535353535808025a0044852b2a670ade5407e78fb2863c51de9fcb96542a07186fe3aeda6bb8a116da0044852b2a670ade5407e78fb2863c51de9fcb96542a07186fe3aeda6bb8a116d",
                "f0f6f18bca1b28cd68e4357452947e021241e9ce",
            ),
            (
                "f864018504a817c80182a410943535353535353535353535353535353535353535018025a0489efdaa54c0f20c7adf612882df0950f5a951637e0307cdcb4c672f298b8bcaa0489efdaa54c0f20c7adf612882df0950f5a951637e0307cdcb4c672f298b8bc6",
                "23ef145a395ea3fa3deb533b8a9e1b4c6c25d112",
            ),
            (
                "f864028504a817c80282f618943535353535353535353535353535353535353535088025a02d7c5bef027816a800da1736444fb58a807ef4c9603b7848673f7e3a68eb14a5a02d7c5bef027816a800da1736444fb58a807ef4c9603b7848673f7e3a68eb14a5",
                "2e485e0c23b4c3c542628a5f672eeab0ad4888be",
            ),
        ];

        for (raw, expected) in cases {
            let raw = hex::decode(raw).unwrap();
            let (tx, sig) = LegacyTransaction::decode_signed_rlp(&Rlp::new(&raw)).unwrap();
            let signer = sig.recover_signer(tx.sighash(1), 1).unwrap();
            assert_eq!(recovered_address(&signer), expected);
        }
    }

    #[test]
    fn canonical_signature_layout() {
        let raw = hex::decode("f864808504a817c800825208943535353535353535353535353535353535353535808025a0044852b2a670ade5407e78fb2863c51de9fcb96542a07186fe3aeda6bb8a116da0044852b2a670ade5407e78fb2863c51de9fcb96542a07186fe3aeda6bb8a116d").unwrap();
        let (tx, sig) = LegacyTransaction::decode_signed_rlp(&Rlp::new(&raw)).unwrap();
        let signer = sig.recover_signer(tx.sighash(1), 1).unwrap();

        let mut r = [0u8; 32];
        let mut s = [0u8; 32];
        sig.r.to_big_endian(&mut r);
        sig.s.to_big_endian(&mut s);
        assert_eq!(&signer.signature[..32], &r[..]);
        assert_eq!(&signer.signature[32..64], &s[..]);
        // v folded as 37 on mainnet comes back out as a bare 0
        assert_eq!(sig.v, 37);
        assert_eq!(signer.signature[64], 0);
    }

    #[test]
    fn accepts_only_the_folding_chain() {
        // v = 9413 is recovery id 0 folded for chain id 4689
        let sig = Signature { r: 0xffu64.into(), s: 0xee00u64.into(), v: 9413 };
        assert_eq!(sig.recovery_id(4689).unwrap().to_byte(), 0);
        assert!(sig.recovery_id(1).is_err());
    }

    #[test]
    fn rejects_unprotected_electrum_v() {
        // pre-replay-protection signature: v = 28 with no chain fold
        let sig = Signature { r: 1u64.into(), s: 1u64.into(), v: 28 };
        for chain_id in [1u64, 4689, 4690] {
            assert!(matches!(
                sig.recovery_id(chain_id),
                Err(RecoveryError::ForeignReplayProtection { v: 28, .. })
            ));
        }
    }

    #[test]
    fn rejects_v_from_another_chain() {
        // signed for chain id 1 (v = 37), recovered against 4689
        let sig = Signature { r: 1u64.into(), s: 1u64.into(), v: 37 };
        assert!(sig.recovery_id(4689).is_err());
        assert!(sig.recovery_id(1).is_ok());
    }

    #[test]
    fn replay_protection_roundtrip() {
        for recovery_id in [0u8, 1] {
            for chain_id in [1u64, 4689, 4690] {
                let v = to_replay_protected_v(recovery_id, chain_id);
                let sig = Signature { r: 1u64.into(), s: 1u64.into(), v };
                assert_eq!(sig.recovery_id(chain_id).unwrap().to_byte(), recovery_id);
            }
        }
    }
}
