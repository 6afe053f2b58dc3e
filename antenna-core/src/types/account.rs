use serde::{Deserialize, Serialize};

/// Account state as reported by the gateway's account lookup.
///
/// The lookup is keyed on the `0x`-hex address string; a gateway that has
/// never seen the address returns no record at all rather than a default
/// one.
#[derive(Clone, Debug, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct AccountMeta {
    /// The queried address, echoed back by the gateway
    pub address: String,
    /// Spendable balance as a decimal string
    pub balance: String,
    /// Next valid nonce
    pub nonce: u64,
    /// Whether code is deployed at this address
    pub is_contract: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn deserializes_gateway_record() {
        let meta: AccountMeta = serde_json::from_str(
            r#"{
                "address": "0xd1f23226fb4d2b7d2f3bcdd99381b038de705a64",
                "balance": "2000000000000000000",
                "nonce": 42,
                "isContract": false
            }"#,
        )
        .unwrap();
        assert_eq!(meta.nonce, 42);
        assert!(!meta.is_contract);
    }
}
