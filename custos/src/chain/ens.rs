//! ENS reverse resolution.
//!
//! Maps an account address to its registered primary name by computing the
//! reverse-record node (`<address-hex>.addr.reverse`), asking the ENS
//! registry for that node's resolver, and reading `name(node)` from it.

use alloy::primitives::{Address, B256, address, keccak256};
use alloy::providers::DynProvider;

use super::ChainError;
use crate::abi::{IEnsRegistry, INameResolver};

/// The ENS registry deployment shared by mainnet and the public testnets.
pub const ENS_REGISTRY: Address = address!("00000000000C2E074eC69A0dFb2997BA6C7d2e1e");

/// EIP-137 namehash.
///
/// The empty name hashes to the zero node; otherwise labels are folded
/// right-to-left with `keccak256(node ++ keccak256(label))`.
#[must_use]
pub fn namehash(name: &str) -> B256 {
    if name.is_empty() {
        return B256::ZERO;
    }
    let mut node = B256::ZERO;
    for label in name.rsplit('.') {
        let label_hash = keccak256(label.as_bytes());
        let mut buf = [0u8; 64];
        buf[..32].copy_from_slice(node.as_slice());
        buf[32..].copy_from_slice(label_hash.as_slice());
        node = keccak256(buf);
    }
    node
}

/// The reverse-record node for an address.
fn reverse_node(address: Address) -> B256 {
    namehash(&format!("{}.addr.reverse", hex::encode(address.as_slice())))
}

/// Resolve the primary name registered for an address, if any.
pub(crate) async fn reverse_lookup(
    provider: &DynProvider,
    address: Address,
) -> Result<Option<String>, ChainError> {
    let node = reverse_node(address);

    let resolver = IEnsRegistry::new(ENS_REGISTRY, provider)
        .resolver(node)
        .call()
        .await
        .map_err(|e| ChainError::Provider(format!("failed to query ENS registry: {e}")))?;
    if resolver == Address::ZERO {
        return Ok(None);
    }

    let name = INameResolver::new(resolver, provider)
        .name(node)
        .call()
        .await
        .map_err(|e| ChainError::Provider(format!("failed to query ENS resolver: {e}")))?;
    Ok((!name.is_empty()).then_some(name))
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloy::primitives::b256;

    #[test]
    fn namehash_of_empty_name_is_zero() {
        assert_eq!(namehash(""), B256::ZERO);
    }

    #[test]
    fn namehash_reference_vectors() {
        assert_eq!(
            namehash("eth"),
            b256!("93cdeb708b7545dc668eb9280176169d1c33cfd8ed6f04690a0bcc88a93fc4ae")
        );
        assert_eq!(
            namehash("foo.eth"),
            b256!("de9b09fd7c5f901e23a3f19fecc54828e9c848539801e86591bd9801b019f84f")
        );
        assert_eq!(
            namehash("addr.reverse"),
            b256!("91d1777781884d03a6757a803996e38de2a42967fb37eeaca72729271025a9e2")
        );
    }

    #[test]
    fn reverse_node_is_nonzero_and_per_address() {
        let a = reverse_node(Address::ZERO);
        let b = reverse_node(address!("7E5F4552091A69125d5DfCb7b8C2659029395Bdf"));
        assert_ne!(a, B256::ZERO);
        assert_ne!(a, b);
    }
}
