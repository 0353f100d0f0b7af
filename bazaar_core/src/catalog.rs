// Catalog synchronization - maps the contract's enumeration into an
// in-memory snapshot. The snapshot is owned here exclusively and replaced
// wholesale by each successful refresh; a failed refresh leaves the previous
// snapshot installed and visible.

use crate::error::CoreError;
use crate::models::{CatalogSnapshot, Product, RawProduct, Review};
use crate::session::Session;
use alloy_primitives::{Address, U256};
use futures_util::future::try_join_all;
use log::{debug, info};

pub struct CatalogService {
    current: Option<CatalogSnapshot>,
}

impl CatalogService {
    pub fn new() -> Self {
        Self { current: None }
    }

    /// The snapshot from the last successful refresh, if any.
    pub fn snapshot(&self) -> Option<&CatalogSnapshot> {
        self.current.as_ref()
    }

    /// Fetch the product count, scatter one read per index, and install a
    /// new snapshot only once every read and parse has succeeded. Any single
    /// failure fails the whole refresh with `CatalogFetchFailed`.
    pub async fn refresh(&mut self, session: &Session) -> Result<&CatalogSnapshot, CoreError> {
        let contract = session.marketplace();
        let count = contract
            .product_count()
            .await
            .map_err(|e| CoreError::CatalogFetchFailed(format!("product count read failed: {}", e)))?;
        debug!("Refreshing catalog, {} products on ledger", count);

        // Independent reads, issued concurrently and tagged with their index
        // so assembly never depends on arrival order.
        let reads = (0..count).map(|index| async move {
            contract
                .read_product(index)
                .await
                .map(|raw| (index, raw))
                .map_err(|e| {
                    CoreError::CatalogFetchFailed(format!("read of product {} failed: {}", index, e))
                })
        });
        let tagged = try_join_all(reads).await?;

        let snapshot = assemble_snapshot(count, tagged)?;
        info!("Catalog refreshed, {} products", snapshot.len());
        Ok(self.current.insert(snapshot))
    }
}

impl Default for CatalogService {
    fn default() -> Self {
        Self::new()
    }
}

/// Place index-tagged records into an ascending-order snapshot. Every index
/// in `[0, count)` must be present exactly once.
fn assemble_snapshot(
    count: u64,
    tagged: Vec<(u64, RawProduct)>,
) -> Result<CatalogSnapshot, CoreError> {
    let mut slots: Vec<Option<Product>> = (0..count).map(|_| None).collect();
    for (index, raw) in tagged {
        let slot = slots.get_mut(index as usize).ok_or_else(|| {
            CoreError::CatalogFetchFailed(format!("product index {} out of range 0..{}", index, count))
        })?;
        if slot.is_some() {
            return Err(CoreError::CatalogFetchFailed(format!(
                "duplicate read result for product {}",
                index
            )));
        }
        *slot = Some(parse_product(index, raw).map_err(|e| {
            CoreError::CatalogFetchFailed(format!("product {} unparseable: {}", index, e))
        })?);
    }
    let products = slots
        .into_iter()
        .enumerate()
        .map(|(index, slot)| {
            slot.ok_or_else(|| {
                CoreError::CatalogFetchFailed(format!("missing read result for product {}", index))
            })
        })
        .collect::<Result<Vec<_>, _>>()?;
    Ok(CatalogSnapshot::new(products))
}

fn parse_product(index: u64, raw: RawProduct) -> Result<Product, CoreError> {
    let owner = parse_address(&raw.owner)?;
    let price = U256::from_str_radix(&raw.price, 10)
        .map_err(|e| CoreError::ParseError(format!("bad price {:?}: {}", raw.price, e)))?;
    let reviews = raw
        .reviews
        .into_iter()
        .map(|r| {
            Ok(Review {
                author: parse_address(&r.author)?,
                body: r.body,
            })
        })
        .collect::<Result<Vec<_>, CoreError>>()?;
    Ok(Product {
        index,
        owner,
        name: raw.name,
        image: raw.image,
        description: raw.description,
        location: raw.location,
        price,
        sold: raw.sold,
        upvotes: raw.upvotes,
        reviews,
    })
}

fn parse_address(s: &str) -> Result<Address, CoreError> {
    s.parse::<Address>()
        .map_err(|e| CoreError::ParseError(format!("bad address {:?}: {}", s, e)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::amount::{to_display_amount, to_ledger_amount};
    use crate::sim::{SimLedger, SIM_MARKETPLACE_ADDRESS};
    use std::sync::Arc;

    fn raw(owner: Address, name: &str, price: &str) -> RawProduct {
        RawProduct {
            owner: owner.to_string(),
            name: name.to_string(),
            image: String::new(),
            description: String::new(),
            location: String::new(),
            price: price.to_string(),
            sold: 0,
            upvotes: 0,
            reviews: Vec::new(),
        }
    }

    async fn session_for(sim: &Arc<SimLedger>) -> Session {
        Session::connect(
            sim.as_ref(),
            sim.clone(),
            SIM_MARKETPLACE_ADDRESS,
            sim.clone(),
        )
        .await
        .unwrap()
    }

    #[test]
    fn test_assemble_orders_by_index_not_arrival() {
        let owner = Address::repeat_byte(0x22);
        // Arrival order 2, 0, 1.
        let tagged = vec![
            (2, raw(owner, "third", "3")),
            (0, raw(owner, "first", "1")),
            (1, raw(owner, "second", "2")),
        ];
        let snapshot = assemble_snapshot(3, tagged).unwrap();
        let names: Vec<&str> = snapshot.products().iter().map(|p| p.name.as_str()).collect();
        assert_eq!(names, ["first", "second", "third"]);
        assert_eq!(snapshot.products()[2].index, 2);
    }

    #[test]
    fn test_assemble_rejects_missing_and_duplicate_indices() {
        let owner = Address::repeat_byte(0x22);
        let missing = assemble_snapshot(2, vec![(0, raw(owner, "only", "1"))]);
        assert!(matches!(missing, Err(CoreError::CatalogFetchFailed(_))));

        let duplicated = assemble_snapshot(
            2,
            vec![
                (0, raw(owner, "a", "1")),
                (0, raw(owner, "a again", "1")),
            ],
        );
        assert!(matches!(duplicated, Err(CoreError::CatalogFetchFailed(_))));
    }

    #[test]
    fn test_parse_rejects_bad_price() {
        let owner = Address::repeat_byte(0x22);
        let result = assemble_snapshot(1, vec![(0, raw(owner, "bad", "not-a-price"))]);
        assert!(matches!(result, Err(CoreError::CatalogFetchFailed(_))));
    }

    #[tokio::test]
    async fn test_refresh_empty_catalog() {
        let sim = Arc::new(SimLedger::new(Address::repeat_byte(0x11), U256::ZERO));
        let session = session_for(&sim).await;
        let mut catalog = CatalogService::new();
        let snapshot = catalog.refresh(&session).await.unwrap();
        assert!(snapshot.is_empty());
    }

    #[tokio::test]
    async fn test_refresh_returns_all_products_with_exact_prices() {
        let buyer = Address::repeat_byte(0x11);
        let seller = Address::repeat_byte(0x22);
        let sim = Arc::new(SimLedger::new(buyer, U256::ZERO));
        for (name, price) in [("alpha", "1.50"), ("beta", "2.00"), ("gamma", "0.99")] {
            sim.seed_product(seller, name, "", "", "", to_ledger_amount(price).unwrap());
        }
        let session = session_for(&sim).await;
        let mut catalog = CatalogService::new();
        let snapshot = catalog.refresh(&session).await.unwrap();

        assert_eq!(snapshot.len(), 3);
        let displayed: Vec<String> = snapshot
            .products()
            .iter()
            .map(|p| to_display_amount(p.price))
            .collect();
        assert_eq!(displayed, ["1.50", "2.00", "0.99"]);
        assert_eq!(
            snapshot.products().iter().map(|p| p.index).collect::<Vec<_>>(),
            [0, 1, 2]
        );
    }

    #[tokio::test]
    async fn test_failed_read_keeps_previous_snapshot() {
        let buyer = Address::repeat_byte(0x11);
        let seller = Address::repeat_byte(0x22);
        let sim = Arc::new(SimLedger::new(buyer, U256::ZERO));
        sim.seed_product(seller, "alpha", "", "", "", to_ledger_amount("1.00").unwrap());
        let session = session_for(&sim).await;
        let mut catalog = CatalogService::new();
        catalog.refresh(&session).await.unwrap();

        sim.seed_product(seller, "beta", "", "", "", to_ledger_amount("2.00").unwrap());
        sim.fail_read_at(Some(1));
        let err = catalog.refresh(&session).await.unwrap_err();
        assert!(matches!(err, CoreError::CatalogFetchFailed(_)));

        // The one-product snapshot from the first pass is still served.
        let snapshot = catalog.snapshot().unwrap();
        assert_eq!(snapshot.len(), 1);
        assert_eq!(snapshot.products()[0].name, "alpha");
    }
}
