//! Account record codec
//!
//! This module converts between the in-memory [`Account`] entity (raw
//! private-key bytes) and its serialized [`AccountRecord`] form (text-encoded
//! private key), handling the dual legacy/current encoding.
//!
//! The encoding is a collection-wide property: one [`KeyEncoding`] is
//! resolved per batch read from the persisted migration flag and applied to
//! every record, never chosen per record.

use crate::domain::Account;
use crate::shared::error::VaultError;
use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use serde::{Deserialize, Serialize};

/// Private-key text encoding of the persisted collection.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyEncoding {
    /// Original Base58 text format, used before migration.
    Legacy,
    /// Binary-safe Base64 text format, used after migration.
    Current,
}

impl KeyEncoding {
    /// Resolve the collection encoding from the persisted migration flag.
    pub fn from_migrated_flag(migrated: bool) -> Self {
        if migrated {
            Self::Current
        } else {
            Self::Legacy
        }
    }
}

/// Serialized account form. Field names match the JSON the wallet
/// application has persisted since its first release.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AccountRecord {
    /// Text-encoded private key; Base64 for current data, Base58 for legacy.
    pub private_key: String,
    pub public_key: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    pub order: u32,
}

/// Encode one account into its serialized record.
///
/// Always emits the current (Base64) encoding regardless of how the data was
/// read.
pub fn encode_account(account: &Account) -> AccountRecord {
    AccountRecord {
        private_key: STANDARD.encode(&account.private_key),
        public_key: account.public_key.clone(),
        name: account.name.clone(),
        order: account.order,
    }
}

/// Encode a full collection for persistence.
pub fn encode_accounts(accounts: &[Account]) -> Vec<AccountRecord> {
    accounts.iter().map(encode_account).collect()
}

/// Decode one record using the collection encoding.
///
/// A malformed current-format key is a hard error. A malformed legacy-format
/// key degrades to empty key bytes for that record only, so one bad record
/// never aborts loading the rest of the batch.
pub fn decode_record(record: AccountRecord, encoding: KeyEncoding) -> Result<Account, VaultError> {
    let private_key = match encoding {
        KeyEncoding::Current => STANDARD.decode(&record.private_key)?,
        KeyEncoding::Legacy => match bs58::decode(&record.private_key).into_vec() {
            Ok(bytes) => bytes,
            Err(e) => {
                log::warn!(
                    "Legacy key decode failed for account {}, keeping empty key: {}",
                    record.public_key,
                    e
                );
                Vec::new()
            }
        },
    };

    Ok(Account {
        private_key,
        public_key: record.public_key,
        name: record.name,
        order: record.order,
    })
}

/// Decode a full collection using one encoding for every record.
pub fn decode_records(
    records: Vec<AccountRecord>,
    encoding: KeyEncoding,
) -> Result<Vec<Account>, VaultError> {
    records
        .into_iter()
        .map(|record| decode_record(record, encoding))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_account() -> Account {
        Account {
            private_key: vec![0x01, 0x7f, 0xff, 0x00, 0x42],
            public_key: "pubkey1".to_string(),
            name: Some("Main".to_string()),
            order: 3,
        }
    }

    #[test]
    fn test_current_round_trip() {
        let account = sample_account();
        let record = encode_account(&account);
        let decoded = decode_record(record, KeyEncoding::Current)
            .expect("Failed to decode current record");

        assert_eq!(decoded, account);
    }

    #[test]
    fn test_legacy_decode() {
        let key_bytes = vec![0xde, 0xad, 0xbe, 0xef];
        let record = AccountRecord {
            private_key: bs58::encode(&key_bytes).into_string(),
            public_key: "pubkey1".to_string(),
            name: None,
            order: 0,
        };

        let decoded =
            decode_record(record, KeyEncoding::Legacy).expect("Failed to decode legacy record");
        assert_eq!(decoded.private_key, key_bytes);
    }

    #[test]
    fn test_legacy_decode_fault_tolerance() {
        // '0', 'O', 'I' and 'l' are outside the Base58 alphabet.
        let record = AccountRecord {
            private_key: "0OIl not base58".to_string(),
            public_key: "pubkey1".to_string(),
            name: None,
            order: 0,
        };

        let decoded = decode_record(record, KeyEncoding::Legacy)
            .expect("Legacy decode must not fail the batch");
        assert!(decoded.private_key.is_empty());
        assert_eq!(decoded.public_key, "pubkey1");
    }

    #[test]
    fn test_current_decode_rejects_malformed_text() {
        let record = AccountRecord {
            private_key: "!!! not base64 !!!".to_string(),
            public_key: "pubkey1".to_string(),
            name: None,
            order: 0,
        };

        assert!(decode_record(record, KeyEncoding::Current).is_err());
    }

    #[test]
    fn test_wire_field_names() {
        let json = serde_json::to_string(&encode_account(&sample_account()))
            .expect("Failed to serialize record");

        assert!(json.contains("\"privateKey\""));
        assert!(json.contains("\"publicKey\""));
        assert!(json.contains("\"order\""));
    }

    #[test]
    fn test_missing_name_on_wire() {
        let json = r#"{"privateKey":"AQI=","publicKey":"pubkey1","order":2}"#;
        let record: AccountRecord =
            serde_json::from_str(json).expect("Failed to parse record without name");

        assert_eq!(record.name, None);
        let decoded = decode_record(record, KeyEncoding::Current)
            .expect("Failed to decode current record");
        assert_eq!(decoded.private_key, vec![0x01, 0x02]);
        assert_eq!(decoded.order, 2);
    }

    #[test]
    fn test_batch_decode_preserves_sequence() {
        let accounts = vec![
            Account {
                private_key: vec![1],
                public_key: "a".to_string(),
                name: None,
                order: 1,
            },
            Account {
                private_key: vec![2],
                public_key: "b".to_string(),
                name: None,
                order: 0,
            },
        ];

        let records = encode_accounts(&accounts);
        let decoded = decode_records(records, KeyEncoding::Current)
            .expect("Failed to decode record batch");
        assert_eq!(decoded, accounts);
    }
}
