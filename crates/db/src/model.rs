//! Stored L1 origin records and their keys.
use alethia_l2_primitives::L1Origin;
use alloy_primitives::{B256, U256};
use alloy_rlp::{RlpDecodable, RlpEncodable};

/// Prefix of the L1 origin record keys, followed by the 32-byte big-endian block id.
pub const L1_ORIGIN_PREFIX: &[u8] = b"TKO:L1O";

/// Key of the latest L2 block id that has an L1 origin.
pub const HEAD_L1_ORIGIN_KEY: &[u8] = b"TKO:LastL1O";

/// Returns the key of the L1 origin record of `block_id`.
pub fn l1_origin_key(block_id: U256) -> Vec<u8> {
    let mut key = Vec::with_capacity(L1_ORIGIN_PREFIX.len() + 32);
    key.extend_from_slice(L1_ORIGIN_PREFIX);
    key.extend_from_slice(&block_id.to_be_bytes::<32>());
    key
}

/// Represents the L1 origin for a L2 block in Taiko network, which is saved in the database.
#[derive(Debug, Clone, Default, PartialEq, Eq, RlpEncodable, RlpDecodable)]
pub struct StoredL1Origin {
    /// The number of the L2 block for which this L1 origin is created.
    pub block_id: U256,
    /// The hash of the L2 block.
    pub l2_block_hash: B256,
    /// The height of the L1 block that included the L2 block.
    pub l1_block_height: U256,
    /// The hash of the L1 block that included the L2 block.
    pub l1_block_hash: B256,
}

impl From<L1Origin> for StoredL1Origin {
    fn from(origin: L1Origin) -> Self {
        Self::from(&origin)
    }
}

impl From<&L1Origin> for StoredL1Origin {
    fn from(origin: &L1Origin) -> Self {
        Self {
            block_id: origin.block_id,
            l2_block_hash: origin.l2_block_hash,
            l1_block_height: origin.l1_block_height,
            l1_block_hash: origin.l1_block_hash,
        }
    }
}

impl StoredL1Origin {
    /// Converts the stored representation back into its RPC form.
    pub fn into_rpc(self) -> L1Origin {
        L1Origin {
            block_id: self.block_id,
            l2_block_hash: self.l2_block_hash,
            l1_block_height: self.l1_block_height,
            l1_block_hash: self.l1_block_hash,
        }
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_stored_l1_origin_from() {
        let origin = L1Origin {
            block_id: U256::from(12),
            l2_block_hash: B256::random(),
            l1_block_height: U256::from(99),
            l1_block_hash: B256::from([1u8; 32]),
        };

        let stored: StoredL1Origin = origin.clone().into();
        assert_eq!(stored.block_id, origin.block_id);
        assert_eq!(stored.l2_block_hash, origin.l2_block_hash);
        assert_eq!(stored.l1_block_height, origin.l1_block_height);
        assert_eq!(stored.l1_block_hash, origin.l1_block_hash);
        assert_eq!(stored.into_rpc(), origin);
    }

    #[test]
    fn test_l1_origin_key_layout() {
        let key = l1_origin_key(U256::from(0x0102));
        assert_eq!(key.len(), L1_ORIGIN_PREFIX.len() + 32);
        assert!(key.starts_with(b"TKO:L1O"));
        assert_eq!(&key[key.len() - 2..], &[0x01, 0x02]);
        assert!(key[L1_ORIGIN_PREFIX.len()..key.len() - 2].iter().all(|byte| *byte == 0));
    }
}
