use alloy_primitives::{Address, U256};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Product record exactly as the marketplace contract returns it: addresses
/// as hex strings and the price as a decimal integer string, the way a web3
/// tuple read delivers them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RawProduct {
    pub owner: String,
    pub name: String,
    pub image: String,
    pub description: String,
    pub location: String,
    pub price: String,
    pub sold: u64,
    pub upvotes: u64,
    pub reviews: Vec<RawReview>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RawReview {
    pub author: String,
    pub body: String,
}

/// A fully parsed product. Immutable once fetched; a sync pass supersedes
/// the whole record rather than patching it in place.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Product {
    /// Ordinal assigned by the ledger; the sole stable identifier used for
    /// every mutating call against this product.
    pub index: u64,
    pub owner: Address,
    pub name: String,
    pub image: String,
    pub description: String,
    pub location: String,
    /// Fixed-point integer, scale 18.
    pub price: U256,
    pub sold: u64,
    pub upvotes: u64,
    pub reviews: Vec<Review>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Review {
    pub author: Address,
    pub body: String,
}

/// Ordered view of the catalog as of one sync pass. Every product in it was
/// fetched in the same pass; consumers never observe a mix of passes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CatalogSnapshot {
    products: Vec<Product>,
}

impl CatalogSnapshot {
    pub(crate) fn new(products: Vec<Product>) -> Self {
        Self { products }
    }

    /// Products ordered by ascending ledger index.
    pub fn products(&self) -> &[Product] {
        &self.products
    }

    /// Look up a product by its ledger index.
    pub fn get(&self, index: u64) -> Option<&Product> {
        self.products.iter().find(|p| p.index == index)
    }

    pub fn len(&self) -> usize {
        self.products.len()
    }

    pub fn is_empty(&self) -> bool {
        self.products.is_empty()
    }
}

/// Arguments for listing a new product. The price stays a decimal string
/// until the amount codec validates and scales it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewListing {
    pub name: String,
    pub image: String,
    pub description: String,
    pub location: String,
    pub price: String,
}

/// Outcome of a confirmed mutating transaction.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TxReceipt {
    pub tx_hash: String,
    pub confirmed_at: DateTime<Utc>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_snapshot_lookup_by_ledger_index() {
        let product = |index: u64| Product {
            index,
            owner: Address::ZERO,
            name: format!("p{}", index),
            image: String::new(),
            description: String::new(),
            location: String::new(),
            price: U256::ZERO,
            sold: 0,
            upvotes: 0,
            reviews: Vec::new(),
        };
        let snapshot = CatalogSnapshot::new(vec![product(0), product(1), product(2)]);
        assert_eq!(snapshot.len(), 3);
        assert_eq!(snapshot.get(1).map(|p| p.name.as_str()), Some("p1"));
        assert!(snapshot.get(7).is_none());
    }

    #[test]
    fn test_raw_product_deserializes_from_json() {
        let raw: RawProduct = serde_json::from_value(serde_json::json!({
            "owner": "0x0000000000000000000000000000000000000001",
            "name": "Solar Lamp",
            "image": "https://example.com/lamp.png",
            "description": "Desk lamp",
            "location": "Nairobi",
            "price": "1500000000000000000",
            "sold": 2,
            "upvotes": 5,
            "reviews": [{"author": "0x0000000000000000000000000000000000000002", "body": "great"}]
        }))
        .unwrap();
        assert_eq!(raw.price, "1500000000000000000");
        assert_eq!(raw.reviews.len(), 1);
    }
}
