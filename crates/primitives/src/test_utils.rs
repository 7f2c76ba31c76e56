use std::ops::Deref;

use alloy_consensus::{
    SignableTransaction, Signed, TxEip1559, TxEip2930, TxEnvelope, TxLegacy,
    transaction::Recovered,
};
use alloy_primitives::{Address, Bytes, Signature, TxKind, U256};
use alloy_signer::SignerSync;
use alloy_signer_local::PrivateKeySigner;

use crate::RecoveredTx;

/// Chain id used by signed fixtures.
pub const TEST_CHAIN_ID: u64 = 167_001;

/// Recipient of every fixture transaction.
pub const TEST_RECIPIENT: Address = Address::repeat_byte(0xee);

/// Deterministic local signers, sorted by address.
#[derive(Debug, Clone)]
pub struct TestAccounts(Vec<PrivateKeySigner>);

impl TestAccounts {
    /// Creates `count` signers from the private keys `1..=count`.
    pub fn new(count: u8) -> Self {
        let mut signers: Vec<_> = (1..=count)
            .map(|key| {
                PrivateKeySigner::from_bytes(&alloy_primitives::B256::with_last_byte(key))
                    .expect("small scalars are valid keys")
            })
            .collect();
        signers.sort_by_key(|signer| signer.address());
        Self(signers)
    }

    /// Address of the `index`-th signer.
    pub fn address(&self, index: usize) -> Address {
        self.0[index].address()
    }
}

impl Deref for TestAccounts {
    type Target = [PrivateKeySigner];

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

/// Signs `tx` and pairs it with the signer address.
pub fn sign<T>(signer: &PrivateKeySigner, tx: T) -> RecoveredTx
where
    T: SignableTransaction<Signature>,
    TxEnvelope: From<Signed<T>>,
{
    let signature = signer.sign_hash_sync(&tx.signature_hash()).expect("local signing");
    Recovered::new_unchecked(TxEnvelope::from(tx.into_signed(signature)), signer.address())
}

/// EIP-1559 value transfer paying `max_fee_per_gas` entirely as tip.
pub fn transfer(
    signer: &PrivateKeySigner,
    nonce: u64,
    max_fee_per_gas: u128,
    gas_limit: u64,
) -> RecoveredTx {
    call(signer, nonce, max_fee_per_gas, gas_limit, Bytes::new())
}

/// EIP-1559 transaction carrying `input` as calldata.
pub fn call(
    signer: &PrivateKeySigner,
    nonce: u64,
    max_fee_per_gas: u128,
    gas_limit: u64,
    input: Bytes,
) -> RecoveredTx {
    sign(
        signer,
        TxEip1559 {
            chain_id: TEST_CHAIN_ID,
            nonce,
            gas_limit,
            max_fee_per_gas,
            max_priority_fee_per_gas: max_fee_per_gas,
            to: TxKind::Call(TEST_RECIPIENT),
            value: U256::from(1),
            input,
            ..Default::default()
        },
    )
}

/// Legacy transfer, replay protected when `chain_id` is set.
pub fn legacy(
    signer: &PrivateKeySigner,
    nonce: u64,
    gas_price: u128,
    gas_limit: u64,
    chain_id: Option<u64>,
) -> RecoveredTx {
    sign(
        signer,
        TxLegacy {
            chain_id,
            nonce,
            gas_price,
            gas_limit,
            to: TxKind::Call(TEST_RECIPIENT),
            value: U256::from(1),
            input: Bytes::new(),
        },
    )
}

/// EIP-2930 transfer with an empty access list.
pub fn access_list(
    signer: &PrivateKeySigner,
    nonce: u64,
    gas_price: u128,
    gas_limit: u64,
) -> RecoveredTx {
    sign(
        signer,
        TxEip2930 {
            chain_id: TEST_CHAIN_ID,
            nonce,
            gas_price,
            gas_limit,
            to: TxKind::Call(TEST_RECIPIENT),
            value: U256::from(1),
            ..Default::default()
        },
    )
}
