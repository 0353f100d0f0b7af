// Transaction client - one operation per mutating contract call. Every
// submit is followed by a mandatory catalog resync so the local view never
// drifts from ledger truth for longer than one transaction round-trip.
// Nothing here retries: a ledger transaction must not be silently resubmitted.

use crate::amount::to_ledger_amount;
use crate::catalog::CatalogService;
use crate::error::CoreError;
use crate::models::{NewListing, TxReceipt};
use crate::session::Session;
use chrono::Utc;
use log::{debug, info, warn};

pub type ServiceResult<T> = Result<T, CoreError>;

/// List a new product. The price is validated and scaled locally first, so
/// `InvalidAmount` surfaces before any ledger call is made.
pub async fn list_product(
    session: &Session,
    catalog: &mut CatalogService,
    listing: &NewListing,
) -> ServiceResult<TxReceipt> {
    let price = to_ledger_amount(&listing.price)?;
    info!("Listing \"{}\" at {}", listing.name, listing.price);
    let submitted = session
        .marketplace()
        .create_product(
            session.account(),
            &listing.name,
            &listing.image,
            &listing.description,
            &listing.location,
            price,
        )
        .await;
    resync_after(session, catalog, submitted).await
}

/// Buy a product by ledger index. The marketplace must first be approved to
/// debit the buyer up to the product's price; the purchase call is never
/// sent unless that approval succeeded. A granted approval is not revoked
/// when the purchase itself fails.
pub async fn buy_product(
    session: &Session,
    catalog: &mut CatalogService,
    index: u64,
) -> ServiceResult<TxReceipt> {
    let price = catalog
        .snapshot()
        .and_then(|s| s.get(index))
        .map(|p| p.price)
        .ok_or(CoreError::UnknownProduct(index))?;

    debug!("Approving marketplace spend of {} for product {}", price, index);
    if let Err(approval_err) = session
        .token()
        .approve(session.account(), session.marketplace_address(), price)
        .await
    {
        let aborted = CoreError::PurchaseAborted(Box::new(approval_err));
        return resync_after(session, catalog, Err(aborted)).await;
    }

    info!("Spend approved, purchasing product {}", index);
    let submitted = session.marketplace().buy_product(session.account(), index).await;
    resync_after(session, catalog, submitted).await
}

/// Upvote a product. Single call, no pre-authorization.
pub async fn upvote_product(
    session: &Session,
    catalog: &mut CatalogService,
    index: u64,
) -> ServiceResult<TxReceipt> {
    info!("Upvoting product {}", index);
    let submitted = session
        .marketplace()
        .upvote_product(session.account(), index)
        .await;
    resync_after(session, catalog, submitted).await
}

/// Append a review to a product. Empty text is rejected locally before any
/// transaction is spent, so no resync happens either - nothing changed on
/// the ledger.
pub async fn add_review(
    session: &Session,
    catalog: &mut CatalogService,
    index: u64,
    text: &str,
) -> ServiceResult<TxReceipt> {
    if text.trim().is_empty() {
        return Err(CoreError::InvalidReview(
            "review text must not be empty".to_string(),
        ));
    }
    info!("Adding review to product {}", index);
    let submitted = session
        .marketplace()
        .add_review(session.account(), index, text)
        .await;
    resync_after(session, catalog, submitted).await
}

/// Mandatory post-submit resync, attempted whether or not the submission
/// succeeded. A failed submit keeps its own error; the resync failure is
/// then reported separately. After a successful submit a resync failure is
/// the operation's error, so callers never see a confirmed state change
/// paired with a stale catalog.
async fn resync_after(
    session: &Session,
    catalog: &mut CatalogService,
    submitted: Result<String, CoreError>,
) -> ServiceResult<TxReceipt> {
    let resync = catalog.refresh(session).await.map(|_| ());
    match submitted {
        Ok(tx_hash) => {
            resync?;
            debug!("Transaction {} confirmed and catalog resynced", tx_hash);
            Ok(TxReceipt {
                tx_hash,
                confirmed_at: Utc::now(),
            })
        }
        Err(submit_err) => {
            if let Err(resync_err) = resync {
                warn!(
                    "Catalog resync after failed transaction also failed: {}",
                    resync_err
                );
            }
            Err(submit_err)
        }
    }
}
