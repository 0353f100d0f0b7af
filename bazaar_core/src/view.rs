// Presentation adapter - flattens a catalog snapshot into display-ready view
// state. Pure consumer of the catalog; holds no state of its own.

use crate::amount::to_display_amount;
use crate::models::{CatalogSnapshot, Product};
use alloy_primitives::Address;
use serde::Serialize;

/// One product as a UI card would show it.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ProductCard {
    pub index: u64,
    pub name: String,
    pub image: String,
    pub description: String,
    pub location: String,
    pub owner: String,
    pub price_display: String,
    pub sold: u64,
    pub upvotes: u64,
    pub review_count: usize,
}

/// One review line for the per-product review list.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ReviewLine {
    pub author: String,
    pub body: String,
}

pub fn product_cards(snapshot: &CatalogSnapshot) -> Vec<ProductCard> {
    snapshot.products().iter().map(product_card).collect()
}

pub fn product_card(product: &Product) -> ProductCard {
    ProductCard {
        index: product.index,
        name: product.name.clone(),
        image: product.image.clone(),
        description: product.description.clone(),
        location: product.location.clone(),
        owner: short_address(product.owner),
        price_display: to_display_amount(product.price),
        sold: product.sold,
        upvotes: product.upvotes,
        review_count: product.reviews.len(),
    }
}

pub fn review_lines(product: &Product) -> Vec<ReviewLine> {
    product
        .reviews
        .iter()
        .map(|r| ReviewLine {
            author: short_address(r.author),
            body: r.body.clone(),
        })
        .collect()
}

/// Abbreviated `0xabcd…1234` form used for identicon-style owner labels.
pub fn short_address(address: Address) -> String {
    let hex = address.to_string();
    format!("{}…{}", &hex[..6], &hex[hex.len() - 4..])
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::amount::to_ledger_amount;
    use crate::models::Review;

    fn product() -> Product {
        Product {
            index: 3,
            owner: Address::repeat_byte(0x22),
            name: "Solar Lamp".to_string(),
            image: "https://example.com/lamp.png".to_string(),
            description: "Desk lamp".to_string(),
            location: "Nairobi".to_string(),
            price: to_ledger_amount("1.50").unwrap(),
            sold: 2,
            upvotes: 5,
            reviews: vec![Review {
                author: Address::repeat_byte(0x33),
                body: "bright".to_string(),
            }],
        }
    }

    #[test]
    fn test_card_renders_price_and_counts() {
        let card = product_card(&product());
        assert_eq!(card.index, 3);
        assert_eq!(card.price_display, "1.50");
        assert_eq!(card.review_count, 1);
        assert_eq!(card.sold, 2);
        assert_eq!(card.upvotes, 5);
    }

    #[test]
    fn test_review_lines_carry_short_author() {
        let lines = review_lines(&product());
        assert_eq!(lines.len(), 1);
        assert_eq!(lines[0].body, "bright");
        assert!(lines[0].author.starts_with("0x"));
        assert!(lines[0].author.contains('…'));
    }

    #[test]
    fn test_short_address_keeps_ends() {
        let address = Address::repeat_byte(0xAB);
        let short = short_address(address);
        let full = address.to_string();
        assert!(short.starts_with(&full[..6]));
        assert!(short.ends_with(&full[full.len() - 4..]));
        assert_eq!(short.chars().count(), 11);
    }

    #[test]
    fn test_cards_serialize_for_embedding_uis() {
        let cards = product_cards(&CatalogSnapshot::new(vec![product()]));
        let json = serde_json::to_value(&cards).unwrap();
        assert_eq!(json[0]["price_display"], "1.50");
    }
}
