use crate::amount::to_display_amount;
use crate::error::CoreError;
use crate::provider::{MarketplaceContract, TokenContract, WalletProvider};
use alloy_primitives::Address;
use log::{debug, info};
use std::sync::Arc;

/// Active ledger session: the authorized account plus immutable handles to
/// the marketplace and token contracts. Established once per run; every
/// catalog or transaction operation requires one.
pub struct Session {
    account: Address,
    marketplace: Arc<dyn MarketplaceContract>,
    marketplace_address: Address,
    token: Arc<dyn TokenContract>,
}

impl std::fmt::Debug for Session {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Session")
            .field("account", &self.account)
            .field("marketplace_address", &self.marketplace_address)
            .finish_non_exhaustive()
    }
}

impl Session {
    /// Request wallet authorization and bind the first returned account as
    /// the active identity. An empty account list counts as a denial.
    pub async fn connect(
        wallet: &dyn WalletProvider,
        marketplace: Arc<dyn MarketplaceContract>,
        marketplace_address: Address,
        token: Arc<dyn TokenContract>,
    ) -> Result<Self, CoreError> {
        let accounts = wallet.request_authorization().await?;
        let account = accounts
            .first()
            .copied()
            .ok_or(CoreError::AuthorizationDenied)?;
        info!("Wallet authorized, active account {}", account);
        Ok(Self {
            account,
            marketplace,
            marketplace_address,
            token,
        })
    }

    pub fn account(&self) -> Address {
        self.account
    }

    pub fn marketplace(&self) -> &dyn MarketplaceContract {
        self.marketplace.as_ref()
    }

    pub fn marketplace_address(&self) -> Address {
        self.marketplace_address
    }

    pub fn token(&self) -> &dyn TokenContract {
        self.token.as_ref()
    }

    /// Token balance of the active account, rendered for display.
    pub async fn balance(&self) -> Result<String, CoreError> {
        let raw = self.token.balance_of(self.account).await?;
        debug!("Balance of {} is {} base units", self.account, raw);
        Ok(to_display_amount(raw))
    }
}
