//! Legacy transaction decoding and re-encoding.

use crate::{
    types::{Address, Bytes, Signature, H256, U256},
    utils::keccak256,
};

use rlp::RlpStream;
use thiserror::Error;

/// Arity of the signed legacy tuple: the six payload fields plus `v`, `r`
/// and `s`.
pub(crate) const NUM_TX_FIELDS: usize = 9;

/// An error involving the decoding of a raw legacy transaction.
#[derive(Debug, Error)]
pub enum DecodeError {
    /// The outer item was not a list of exactly nine fields
    #[error("expected a list of {NUM_TX_FIELDS} fields, got {0}")]
    FieldCount(usize),
    /// A field was truncated or otherwise malformed
    #[error(transparent)]
    Rlp(#[from] rlp::DecoderError),
}

/// An Ethereum legacy (pre-typed-envelope) transaction, decoded from its
/// signed RLP wire form.
///
/// The signature travels separately as a [`Signature`]; everything here is
/// the payload that was originally hashed and signed.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct LegacyTransaction {
    /// Sender-side transaction counter
    pub nonce: U256,

    /// Price per gas unit, in the source chain's smallest denomination
    pub gas_price: U256,

    /// Gas limit
    pub gas: U256,

    /// Recipient address (`None` for contract creation)
    pub to: Option<Address>,

    /// Transferred value
    pub value: U256,

    /// Call payload or contract init code
    pub data: Bytes,
}

impl LegacyTransaction {
    /// Decodes a signed legacy transaction from its RLP representation,
    /// returning the payload fields and the signature triple.
    ///
    /// Numeric fields are parsed at whatever width the encoding carries,
    /// since leading zero bytes are elided on the wire; nothing here assumes
    /// 32-byte values. An empty recipient field marks contract creation.
    pub fn decode_signed_rlp(rlp: &rlp::Rlp) -> Result<(Self, Signature), DecodeError> {
        let arity = rlp.item_count()?;
        if arity != NUM_TX_FIELDS {
            return Err(DecodeError::FieldCount(arity))
        }

        let mut offset = 0;
        let tx = Self::decode_base(rlp, &mut offset)?;
        let v = rlp.at(offset)?.as_val()?;
        let r = rlp.at(offset + 1)?.as_val()?;
        let s = rlp.at(offset + 2)?.as_val()?;

        Ok((tx, Signature { r, s, v }))
    }

    /// Decodes the six payload fields, advancing `offset` past each one.
    fn decode_base(rlp: &rlp::Rlp, offset: &mut usize) -> Result<Self, rlp::DecoderError> {
        let mut tx = LegacyTransaction::default();
        tx.nonce = rlp.at(*offset)?.as_val()?;
        *offset += 1;
        tx.gas_price = rlp.at(*offset)?.as_val()?;
        *offset += 1;
        tx.gas = rlp.at(*offset)?.as_val()?;
        *offset += 1;
        tx.to = decode_to(rlp, offset)?;
        tx.value = rlp.at(*offset)?.as_val()?;
        *offset += 1;
        tx.data = rlp.at(*offset)?.data()?.to_vec().into();
        *offset += 1;
        Ok(tx)
    }

    /// Re-encodes the payload the way it must be hashed for recovery under
    /// `chain_id`: the six payload fields, then the chain id (minimally
    /// encoded), then two empty slots standing in for `r` and `s`.
    pub fn resigning_rlp(&self, chain_id: u64) -> Bytes {
        let mut rlp = RlpStream::new();
        rlp.begin_list(NUM_TX_FIELDS);
        self.rlp_base(&mut rlp);
        rlp.append(&chain_id);
        rlp.append(&0u8);
        rlp.append(&0u8);
        rlp.out().freeze().into()
    }

    /// The digest that was signed under the `chain_id` replay-protection
    /// convention.
    pub fn sighash(&self, chain_id: u64) -> H256 {
        keccak256(self.resigning_rlp(chain_id).as_ref()).into()
    }

    /// Produces the signed RLP encoding of the transaction.
    pub fn rlp_signed(&self, signature: &Signature) -> Bytes {
        let mut rlp = RlpStream::new();
        rlp.begin_list(NUM_TX_FIELDS);
        self.rlp_base(&mut rlp);
        rlp.append(&signature.v);
        rlp.append(&signature.r);
        rlp.append(&signature.s);
        rlp.out().freeze().into()
    }

    fn rlp_base(&self, rlp: &mut RlpStream) {
        rlp.append(&self.nonce);
        rlp.append(&self.gas_price);
        rlp.append(&self.gas);
        rlp_opt(rlp, &self.to);
        rlp.append(&self.value);
        rlp.append(&self.data.as_ref());
    }
}

fn rlp_opt<T: rlp::Encodable>(rlp: &mut RlpStream, opt: &Option<T>) {
    if let Some(inner) = opt {
        rlp.append(inner);
    } else {
        rlp.append(&"");
    }
}

/// Decodes the recipient field, mapping the zero-length encoding to `None`
/// (contract creation). Increments the offset by one.
fn decode_to(rlp: &rlp::Rlp, offset: &mut usize) -> Result<Option<Address>, rlp::DecoderError> {
    let field = rlp.at(*offset)?;
    let to = if field.is_empty() {
        if field.is_data() {
            None
        } else {
            return Err(rlp::DecoderError::RlpExpectedToBeData)
        }
    } else {
        Some(field.as_val()?)
    };
    *offset += 1;

    Ok(to)
}
