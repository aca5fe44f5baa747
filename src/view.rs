//! Pure product view: turns a product sequence into a display model that the
//! terminal renderer draws. Nothing here touches the terminal.

use crate::product::Product;

/// Text shown in place of cards when a result set is empty.
pub const NO_RESULTS: &str = "No products found matching your criteria.";

/// Label of the outbound link on every card.
pub const BUY_LABEL: &str = "Buy Now";

/// One product card, in display form.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Card {
    pub image: String,
    pub category: String,
    pub name: String,
    pub description: String,
    pub price: String,
    pub link: Link,
}

/// An outbound link. `new_context` means it opens outside the app.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Link {
    pub label: String,
    pub target: String,
    pub new_context: bool,
}

/// The whole product area. An empty result is a rendered placeholder, not an
/// empty grid.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum DisplayModel {
    Cards(Vec<Card>),
    Placeholder(String),
}

impl DisplayModel {
    pub fn cards(&self) -> &[Card] {
        match self {
            DisplayModel::Cards(cards) => cards,
            DisplayModel::Placeholder(_) => &[],
        }
    }

    /// Number of top-level elements: one per card, or one placeholder.
    pub fn element_count(&self) -> usize {
        match self {
            DisplayModel::Cards(cards) => cards.len(),
            DisplayModel::Placeholder(_) => 1,
        }
    }

    pub fn is_placeholder(&self) -> bool {
        matches!(self, DisplayModel::Placeholder(_))
    }
}

impl Card {
    fn from_product(product: &Product) -> Self {
        Self {
            image: product.image.clone(),
            category: product.category.clone(),
            name: product.name.clone(),
            description: product.description.clone(),
            price: product.price.clone(),
            link: Link {
                label: BUY_LABEL.to_string(),
                target: product.affiliate_link.clone(),
                new_context: true,
            },
        }
    }
}

/// Render products into a fresh display model, one card per product in the
/// given order.
pub fn render(products: &[&Product]) -> DisplayModel {
    if products.is_empty() {
        return DisplayModel::Placeholder(NO_RESULTS.to_string());
    }
    DisplayModel::Cards(products.iter().map(|p| Card::from_product(p)).collect())
}
