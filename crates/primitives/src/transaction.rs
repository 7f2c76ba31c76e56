use std::collections::BTreeMap;

use alloy_consensus::{TxEnvelope, proofs::calculate_withdrawals_root, transaction::Recovered};
use alloy_eips::eip4895::Withdrawal;
use alloy_primitives::{Address, B256};
use alloy_rlp::Encodable;

/// A signed transaction together with its recovered sender.
pub type RecoveredTx = Recovered<TxEnvelope>;

/// Pending transactions grouped by sender, each queue ordered by increasing nonce.
pub type PendingTransactions = BTreeMap<Address, Vec<RecoveredTx>>;

/// Decodes an RLP encoded transaction list, rejecting trailing bytes.
pub fn decode_tx_list(bytes: &[u8]) -> Result<Vec<TxEnvelope>, alloy_rlp::Error> {
    alloy_rlp::decode_exact(bytes)
}

/// Encodes transactions into the RLP list format accepted by [`decode_tx_list`].
pub fn encode_tx_list(txs: &[TxEnvelope]) -> Vec<u8> {
    let mut out = Vec::new();
    alloy_rlp::encode_list::<_, TxEnvelope>(txs, &mut out);
    out
}

/// Returns the size in bytes of the transaction inside an encoded transaction list.
pub fn encoded_tx_len(tx: &TxEnvelope) -> u64 {
    tx.length() as u64
}

/// Computes the EIP-4895 withdrawals commitment: the ordered trie root of the RLP encoded
/// withdrawals.
pub fn withdrawals_root(withdrawals: &[Withdrawal]) -> B256 {
    calculate_withdrawals_root(withdrawals)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::{TestAccounts, transfer};
    use alloy_consensus::constants::EMPTY_WITHDRAWALS;

    #[test]
    fn test_tx_list_codec() {
        let accounts = TestAccounts::new(2);
        let txs = vec![
            transfer(&accounts[0], 0, 1_000_000_000, 21_000).into_inner(),
            transfer(&accounts[1], 3, 2_000_000_000, 50_000).into_inner(),
        ];

        let encoded = encode_tx_list(&txs);
        assert_eq!(decode_tx_list(&encoded).unwrap(), txs);

        let mut trailing = encoded.clone();
        trailing.push(0x80);
        assert!(decode_tx_list(&trailing).is_err());
        assert!(decode_tx_list(&[0x01, 0x02]).is_err());
    }

    #[test]
    fn test_encoded_len_matches_list_payload() {
        let accounts = TestAccounts::new(1);
        let tx = transfer(&accounts[0], 0, 1_000_000_000, 21_000).into_inner();
        let encoded = encode_tx_list(std::slice::from_ref(&tx));
        let header = alloy_rlp::Header { list: true, payload_length: encoded_tx_len(&tx) as usize };
        assert_eq!(encoded.len(), header.length() + encoded_tx_len(&tx) as usize);
    }

    #[test]
    fn test_withdrawals_root() {
        assert_eq!(withdrawals_root(&[]), EMPTY_WITHDRAWALS);

        let withdrawal = Withdrawal {
            index: 1,
            validator_index: 2,
            address: Address::repeat_byte(0x11),
            amount: 32,
        };
        assert_ne!(withdrawals_root(&[withdrawal]), EMPTY_WITHDRAWALS);
    }
}
