// External collaborator seams - the wallet and the two on-ledger contracts.
// The core never owns a transport; implementations wrap an injected browser
// provider, a JSON-RPC node, or the in-process simulated ledger.

use crate::error::CoreError;
use crate::models::RawProduct;
use alloy_primitives::{Address, U256};
use async_trait::async_trait;

/// Result type for provider operations
pub type ProviderResult<T> = Result<T, CoreError>;

/// Injected wallet seam. Implementations surface `WalletUnavailable` when no
/// provider is present and `AuthorizationDenied` when the user rejects the
/// prompt. Signing happens transparently inside every mutating contract call.
#[async_trait]
pub trait WalletProvider: Send + Sync {
    /// Ask the wallet for authorization and the list of controlled accounts.
    async fn request_authorization(&self) -> ProviderResult<Vec<Address>>;
}

/// Handle to the deployed marketplace contract. Mutating calls sign and send
/// through the given account and resolve with the transaction hash once the
/// ledger confirms, or fail with `TransactionRejected`.
#[async_trait]
pub trait MarketplaceContract: Send + Sync {
    async fn product_count(&self) -> ProviderResult<u64>;

    async fn read_product(&self, index: u64) -> ProviderResult<RawProduct>;

    async fn create_product(
        &self,
        from: Address,
        name: &str,
        image: &str,
        description: &str,
        location: &str,
        price: U256,
    ) -> ProviderResult<String>;

    async fn buy_product(&self, from: Address, index: u64) -> ProviderResult<String>;

    async fn upvote_product(&self, from: Address, index: u64) -> ProviderResult<String>;

    async fn add_review(&self, from: Address, index: u64, text: &str) -> ProviderResult<String>;
}

/// Handle to the deployed fungible-token contract.
#[async_trait]
pub trait TokenContract: Send + Sync {
    async fn balance_of(&self, account: Address) -> ProviderResult<U256>;

    /// Authorize `spender` to debit up to `amount` from `from`.
    async fn approve(&self, from: Address, spender: Address, amount: U256)
        -> ProviderResult<String>;
}
