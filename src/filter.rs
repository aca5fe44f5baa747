//! Category filtering and free-text search over the product collection.
//!
//! Both operations are pure: they borrow the collection and return the
//! matching products in their original relative order.

use crate::product::Product;

/// Selector value that matches every product.
pub const ALL_CATEGORIES: &str = "all";

/// Return the products whose category equals `category` exactly
/// (case-sensitive). `"all"` returns the whole collection.
pub fn filter_by_category<'a>(products: &'a [Product], category: &str) -> Vec<&'a Product> {
    if category == ALL_CATEGORIES {
        return products.iter().collect();
    }
    products
        .iter()
        .filter(|p| p.category == category)
        .collect()
}

/// Return the products where the query (case-insensitive) is a substring of
/// the name, description or category. An empty query matches everything.
pub fn search<'a>(products: &'a [Product], query: &str) -> Vec<&'a Product> {
    let query_lower = query.to_lowercase();
    products
        .iter()
        .filter(|p| {
            p.search_fields()
                .iter()
                .any(|field| field.contains(&query_lower))
        })
        .collect()
}

/// Category selector values: `"all"` first, then each distinct category in
/// the order it first appears.
pub fn categories(products: &[Product]) -> Vec<String> {
    let mut out = vec![ALL_CATEGORIES.to_string()];
    for product in products {
        if !out.iter().any(|c| *c == product.category) {
            out.push(product.category.clone());
        }
    }
    out
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    fn product(name: &str, description: &str, category: &str) -> Product {
        Product {
            name: name.to_string(),
            description: description.to_string(),
            category: category.to_string(),
            price: "$1".to_string(),
            image: format!("{name}.png"),
            affiliate_link: format!("http://shop/{name}"),
        }
    }

    fn sample() -> Vec<Product> {
        vec![
            product("Widget", "A small widget", "Tools"),
            product("Lamp", "Warm desk light", "Home"),
            product("Hammer", "Drives nails", "Tools"),
            product("Mug", "Holds coffee", "Kitchen"),
            product("Wrench", "Adjustable", "tools"),
        ]
    }

    fn names(products: &[&Product]) -> Vec<String> {
        products.iter().map(|p| p.name.clone()).collect()
    }

    #[test]
    fn test_filter_all_returns_everything_in_order() {
        let all = sample();
        let result = filter_by_category(&all, ALL_CATEGORIES);
        assert_eq!(result.len(), all.len());
        for (got, want) in result.iter().zip(all.iter()) {
            assert_eq!(*got, want);
        }
    }

    #[test]
    fn test_filter_by_category_is_exact_and_ordered() {
        let all = sample();
        let tools = filter_by_category(&all, "Tools");
        assert_eq!(names(&tools), vec!["Widget", "Hammer"]);
    }

    #[test]
    fn test_filter_by_category_every_category_idempotent() {
        let all = sample();
        for category in categories(&all).iter().skip(1) {
            let once: Vec<Product> = filter_by_category(&all, category)
                .into_iter()
                .cloned()
                .collect();
            assert!(once.iter().all(|p| &p.category == category));
            let twice = filter_by_category(&once, category);
            assert_eq!(twice.len(), once.len());
            for (a, b) in twice.iter().zip(once.iter()) {
                assert_eq!(*a, b);
            }
        }
    }

    #[test]
    fn test_filter_unknown_category_is_empty() {
        assert!(filter_by_category(&sample(), "Garden").is_empty());
    }

    #[test]
    fn test_search_empty_query_matches_all() {
        let all = sample();
        assert_eq!(search(&all, "").len(), all.len());
    }

    #[test]
    fn test_search_is_case_insensitive_on_name() {
        let all = sample();
        assert_eq!(names(&search(&all, "wid")), vec!["Widget"]);
        assert_eq!(names(&search(&all, "WIDGET")), vec!["Widget"]);
    }

    #[test]
    fn test_search_matches_description_and_category() {
        let all = sample();
        assert_eq!(names(&search(&all, "coffee")), vec!["Mug"]);
        assert_eq!(
            names(&search(&all, "tools")),
            vec!["Widget", "Hammer", "Wrench"]
        );
    }

    #[test]
    fn test_search_results_all_contain_query() {
        let all = sample();
        for query in ["a", "ll", "x", "desk", "Ho"] {
            let q = query.to_lowercase();
            for p in search(&all, query) {
                assert!(p.search_fields().iter().any(|f| f.contains(&q)));
            }
        }
    }

    #[test]
    fn test_categories_first_seen_order() {
        assert_eq!(
            categories(&sample()),
            vec!["all", "Tools", "Home", "Kitchen", "tools"]
        );
        assert_eq!(categories(&[]), vec!["all"]);
    }
}
