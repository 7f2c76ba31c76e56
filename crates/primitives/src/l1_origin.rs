use alloy_primitives::{B256, U256};
use serde::{Deserialize, Serialize};

/// The L1 block a L2 block was derived from, as exposed over RPC.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct L1Origin {
    /// The number of the L2 block.
    #[serde(rename = "blockID")]
    pub block_id: U256,
    /// The hash of the L2 block.
    pub l2_block_hash: B256,
    /// The height of the L1 block that included the L2 block.
    pub l1_block_height: U256,
    /// The hash of the L1 block that included the L2 block.
    pub l1_block_hash: B256,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_l1_origin_json_keys() {
        let origin = L1Origin {
            block_id: U256::from(42),
            l2_block_hash: B256::repeat_byte(0xaa),
            l1_block_height: U256::from(7),
            l1_block_hash: B256::repeat_byte(0xbb),
        };

        let json = serde_json::to_value(&origin).unwrap();
        assert_eq!(json["blockID"], "0x2a");
        assert_eq!(json["l1BlockHeight"], "0x7");
        assert!(json.get("l2BlockHash").is_some());
        assert!(json.get("l1BlockHash").is_some());

        assert_eq!(serde_json::from_value::<L1Origin>(json).unwrap(), origin);
    }
}
