// In-process simulated ledger implementing the wallet and contract seams.
// Backs the unit tests and the CLI demo. Purchase semantics mirror the real
// marketplace contract: a buy requires a prior spend approval covering the
// price, debits the buyer, credits the owner, and bumps the sold counter.

use crate::error::CoreError;
use crate::models::{RawProduct, RawReview};
use crate::provider::{MarketplaceContract, ProviderResult, TokenContract, WalletProvider};
use alloy_primitives::{Address, U256};
use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::{Mutex, MutexGuard};

/// Well-known address of the simulated marketplace contract.
pub const SIM_MARKETPLACE_ADDRESS: Address = Address::repeat_byte(0xAA);

/// Well-known address of the simulated token contract.
pub const SIM_TOKEN_ADDRESS: Address = Address::repeat_byte(0xBB);

#[derive(Debug, Clone)]
struct SimProduct {
    owner: Address,
    name: String,
    image: String,
    description: String,
    location: String,
    price: U256,
    sold: u64,
    upvotes: u64,
    reviews: Vec<(Address, String)>,
}

#[derive(Debug, Default)]
struct SimState {
    offline: bool,
    deny_authorization: bool,
    fail_read_at: Option<u64>,
    fail_approvals: bool,
    reject_purchases: bool,
    reject_transactions: bool,
    accounts: Vec<Address>,
    balances: HashMap<Address, U256>,
    allowances: HashMap<(Address, Address), U256>,
    products: Vec<SimProduct>,
    calls: Vec<String>,
    next_tx: u64,
}

pub struct SimLedger {
    state: Mutex<SimState>,
}

impl SimLedger {
    /// A ledger with one authorized wallet account holding `opening_balance`
    /// token base units.
    pub fn new(account: Address, opening_balance: U256) -> Self {
        let mut state = SimState::default();
        state.accounts.push(account);
        state.balances.insert(account, opening_balance);
        Self {
            state: Mutex::new(state),
        }
    }

    fn state(&self) -> MutexGuard<'_, SimState> {
        self.state.lock().unwrap_or_else(|e| e.into_inner())
    }

    /// Append a product directly to ledger state, bypassing the wallet.
    pub fn seed_product(
        &self,
        owner: Address,
        name: &str,
        image: &str,
        description: &str,
        location: &str,
        price: U256,
    ) {
        self.state().products.push(SimProduct {
            owner,
            name: name.to_string(),
            image: image.to_string(),
            description: description.to_string(),
            location: location.to_string(),
            price,
            sold: 0,
            upvotes: 0,
            reviews: Vec::new(),
        });
    }

    // Fault switches

    /// Simulate the injected provider being absent entirely.
    pub fn set_offline(&self, offline: bool) {
        self.state().offline = offline;
    }

    /// Simulate the user rejecting the authorization prompt.
    pub fn deny_authorization(&self, deny: bool) {
        self.state().deny_authorization = deny;
    }

    /// Fail the read of one product index during enumeration.
    pub fn fail_read_at(&self, index: Option<u64>) {
        self.state().fail_read_at = index;
    }

    /// Reject spend-approval transactions.
    pub fn fail_approvals(&self, fail: bool) {
        self.state().fail_approvals = fail;
    }

    /// Reject purchase transactions (approvals still succeed).
    pub fn reject_purchases(&self, reject: bool) {
        self.state().reject_purchases = reject;
    }

    /// Reject every mutating transaction.
    pub fn reject_transactions(&self, reject: bool) {
        self.state().reject_transactions = reject;
    }

    // Introspection for tests and the demo driver

    /// Names of every provider call made so far, in order.
    pub fn calls(&self) -> Vec<String> {
        self.state().calls.clone()
    }

    pub fn clear_calls(&self) {
        self.state().calls.clear();
    }

    pub fn allowance(&self, owner: Address, spender: Address) -> U256 {
        self.state()
            .allowances
            .get(&(owner, spender))
            .copied()
            .unwrap_or(U256::ZERO)
    }

    /// Balance read without going through the async contract seam.
    pub fn balance_of_sync(&self, account: Address) -> U256 {
        self.state()
            .balances
            .get(&account)
            .copied()
            .unwrap_or(U256::ZERO)
    }

    fn record(state: &mut SimState, call: &str) {
        state.calls.push(call.to_string());
    }

    fn confirm(state: &mut SimState) -> String {
        state.next_tx += 1;
        format!("0x{:064x}", state.next_tx)
    }
}

#[async_trait]
impl WalletProvider for SimLedger {
    async fn request_authorization(&self) -> ProviderResult<Vec<Address>> {
        let mut state = self.state();
        Self::record(&mut state, "request_authorization");
        if state.offline {
            return Err(CoreError::WalletUnavailable);
        }
        if state.deny_authorization {
            return Err(CoreError::AuthorizationDenied);
        }
        Ok(state.accounts.clone())
    }
}

#[async_trait]
impl MarketplaceContract for SimLedger {
    async fn product_count(&self) -> ProviderResult<u64> {
        let mut state = self.state();
        Self::record(&mut state, "product_count");
        Ok(state.products.len() as u64)
    }

    async fn read_product(&self, index: u64) -> ProviderResult<RawProduct> {
        let mut state = self.state();
        Self::record(&mut state, "read_product");
        if state.fail_read_at == Some(index) {
            return Err(CoreError::Rpc(format!("simulated read failure at {}", index)));
        }
        let product = state
            .products
            .get(index as usize)
            .ok_or_else(|| CoreError::Rpc(format!("no product at index {}", index)))?;
        Ok(RawProduct {
            owner: product.owner.to_string(),
            name: product.name.clone(),
            image: product.image.clone(),
            description: product.description.clone(),
            location: product.location.clone(),
            price: product.price.to_string(),
            sold: product.sold,
            upvotes: product.upvotes,
            reviews: product
                .reviews
                .iter()
                .map(|(author, body)| RawReview {
                    author: author.to_string(),
                    body: body.clone(),
                })
                .collect(),
        })
    }

    async fn create_product(
        &self,
        from: Address,
        name: &str,
        image: &str,
        description: &str,
        location: &str,
        price: U256,
    ) -> ProviderResult<String> {
        let mut state = self.state();
        Self::record(&mut state, "create_product");
        if state.reject_transactions {
            return Err(CoreError::TransactionRejected(
                "create rejected by ledger".to_string(),
            ));
        }
        state.products.push(SimProduct {
            owner: from,
            name: name.to_string(),
            image: image.to_string(),
            description: description.to_string(),
            location: location.to_string(),
            price,
            sold: 0,
            upvotes: 0,
            reviews: Vec::new(),
        });
        Ok(Self::confirm(&mut state))
    }

    async fn buy_product(&self, from: Address, index: u64) -> ProviderResult<String> {
        let mut state = self.state();
        Self::record(&mut state, "buy_product");
        if state.reject_transactions || state.reject_purchases {
            return Err(CoreError::TransactionRejected(
                "purchase rejected by ledger".to_string(),
            ));
        }
        let (owner, price) = match state.products.get(index as usize) {
            Some(p) => (p.owner, p.price),
            None => {
                return Err(CoreError::TransactionRejected(format!(
                    "no product at index {}",
                    index
                )))
            }
        };
        let allowance_key = (from, SIM_MARKETPLACE_ADDRESS);
        let allowance = state
            .allowances
            .get(&allowance_key)
            .copied()
            .unwrap_or(U256::ZERO);
        if allowance < price {
            return Err(CoreError::TransactionRejected(
                "spend allowance below price".to_string(),
            ));
        }
        let balance = state.balances.get(&from).copied().unwrap_or(U256::ZERO);
        if balance < price {
            return Err(CoreError::TransactionRejected(
                "insufficient token balance".to_string(),
            ));
        }
        state.balances.insert(from, balance - price);
        let owner_balance = state.balances.get(&owner).copied().unwrap_or(U256::ZERO);
        state.balances.insert(owner, owner_balance + price);
        state.allowances.insert(allowance_key, allowance - price);
        if let Some(p) = state.products.get_mut(index as usize) {
            p.sold += 1;
        }
        Ok(Self::confirm(&mut state))
    }

    async fn upvote_product(&self, _from: Address, index: u64) -> ProviderResult<String> {
        let mut state = self.state();
        Self::record(&mut state, "upvote_product");
        if state.reject_transactions {
            return Err(CoreError::TransactionRejected(
                "upvote rejected by ledger".to_string(),
            ));
        }
        match state.products.get_mut(index as usize) {
            Some(p) => p.upvotes += 1,
            None => {
                return Err(CoreError::TransactionRejected(format!(
                    "no product at index {}",
                    index
                )))
            }
        }
        Ok(Self::confirm(&mut state))
    }

    async fn add_review(&self, from: Address, index: u64, text: &str) -> ProviderResult<String> {
        let mut state = self.state();
        Self::record(&mut state, "add_review");
        if state.reject_transactions {
            return Err(CoreError::TransactionRejected(
                "review rejected by ledger".to_string(),
            ));
        }
        match state.products.get_mut(index as usize) {
            Some(p) => p.reviews.push((from, text.to_string())),
            None => {
                return Err(CoreError::TransactionRejected(format!(
                    "no product at index {}",
                    index
                )))
            }
        }
        Ok(Self::confirm(&mut state))
    }
}

#[async_trait]
impl TokenContract for SimLedger {
    async fn balance_of(&self, account: Address) -> ProviderResult<U256> {
        let mut state = self.state();
        Self::record(&mut state, "balance_of");
        Ok(state.balances.get(&account).copied().unwrap_or(U256::ZERO))
    }

    async fn approve(
        &self,
        from: Address,
        spender: Address,
        amount: U256,
    ) -> ProviderResult<String> {
        let mut state = self.state();
        Self::record(&mut state, "approve");
        if state.fail_approvals || state.reject_transactions {
            return Err(CoreError::TransactionRejected(
                "approval rejected by wallet".to_string(),
            ));
        }
        state.allowances.insert((from, spender), amount);
        Ok(Self::confirm(&mut state))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_buy_requires_allowance() {
        let buyer = Address::repeat_byte(0x11);
        let sim = SimLedger::new(buyer, U256::from(100u64));
        sim.seed_product(Address::repeat_byte(0x22), "x", "", "", "", U256::from(10u64));

        // No approval yet.
        let err = sim.buy_product(buyer, 0).await.unwrap_err();
        assert!(matches!(err, CoreError::TransactionRejected(_)));

        sim.approve(buyer, SIM_MARKETPLACE_ADDRESS, U256::from(10u64))
            .await
            .unwrap();
        sim.buy_product(buyer, 0).await.unwrap();
        assert_eq!(sim.balance_of_sync(buyer), U256::from(90u64));
        // The allowance was consumed by the purchase.
        assert_eq!(sim.allowance(buyer, SIM_MARKETPLACE_ADDRESS), U256::ZERO);
    }

    #[tokio::test]
    async fn test_reads_are_never_transactions() {
        let buyer = Address::repeat_byte(0x11);
        let sim = SimLedger::new(buyer, U256::ZERO);
        sim.reject_transactions(true);
        assert_eq!(sim.product_count().await.unwrap(), 0);
        assert_eq!(sim.balance_of(buyer).await.unwrap(), U256::ZERO);
    }
}
