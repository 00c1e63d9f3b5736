//! Product catalog tests
//!
//! Tests for listings including:
//! - Search is case- and diacritic-insensitive on name or SKU
//! - Status filtering happens before pagination
//! - Sorting is total and stable across pages

use chrono::Utc;
use proptest::prelude::*;
use shared::catalog::{list_products, matches_product_search, normalize_search_text};
use shared::{
    Pagination, Product, ProductListQuery, ProductSortKey, ProductWithBalance, SortDirection,
    StockStatus,
};
use uuid::Uuid;

fn product(name: &str, sku: &str, min_stock: i32, balance: i64) -> ProductWithBalance {
    ProductWithBalance::new(
        Product {
            id: Uuid::new_v4(),
            name: name.to_string(),
            sku: sku.to_string(),
            description: None,
            min_stock,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        },
        balance,
    )
}

// ============================================================================
// Unit Tests
// ============================================================================

#[cfg(test)]
mod unit_tests {
    use super::*;

    /// Search ignores accents and case on either field
    #[test]
    fn test_search_is_accent_insensitive() {
        assert!(matches_product_search("regua", "Régua 30cm", "REG-30"));
        assert!(matches_product_search("RÉGUA", "Regua 15cm", "REG-15"));
        assert!(matches_product_search("reg-3", "Régua 30cm", "REG-30"));
        assert!(!matches_product_search("tesoura", "Régua 30cm", "REG-30"));
    }

    /// Status filter with pagination counts only matching products
    #[test]
    fn test_status_filter_then_page() {
        let products = vec![
            product("Apontador", "APO-1", 5, 8),
            product("Borracha", "BOR-1", 5, 0),
            product("Caneta", "CAN-1", 5, 3),
            product("Durex", "DUR-1", 5, 0),
        ];
        let query = ProductListQuery {
            statuses: vec![StockStatus::Out],
            pagination: Pagination { page: 1, page_size: 1 },
            ..Default::default()
        };

        let page = list_products(products, &query);
        assert_eq!(page.total, 2);
        assert_eq!(page.total_pages, 2);
        assert_eq!(page.items.len(), 1);
        assert_eq!(page.items[0].product.name, "Borracha");
    }

    /// Sorting by balance descending puts the fullest shelf first
    #[test]
    fn test_sort_by_balance_desc() {
        let products = vec![
            product("Apontador", "APO-1", 5, 8),
            product("Borracha", "BOR-1", 5, 0),
            product("Caneta", "CAN-1", 5, 30),
        ];
        let query = ProductListQuery {
            sort_by: ProductSortKey::Balance,
            sort_dir: SortDirection::Desc,
            ..Default::default()
        };

        let page = list_products(products, &query);
        let balances: Vec<i64> = page.items.iter().map(|p| p.balance).collect();
        assert_eq!(balances, vec![30, 8, 0]);
    }

    /// Equal balances fall back to name order
    #[test]
    fn test_sort_ties_break_on_name() {
        let products = vec![
            product("Caneta", "CAN-1", 5, 4),
            product("Apontador", "APO-1", 5, 4),
            product("Borracha", "BOR-1", 5, 4),
        ];
        let query = ProductListQuery {
            sort_by: ProductSortKey::Balance,
            sort_dir: SortDirection::Desc,
            ..Default::default()
        };

        let page = list_products(products, &query);
        let names: Vec<&str> = page.items.iter().map(|p| p.product.name.as_str()).collect();
        assert_eq!(names, vec!["Apontador", "Borracha", "Caneta"]);
    }

    /// A page past the end is empty but still reports the total
    #[test]
    fn test_page_past_end() {
        let products = vec![product("Caneta", "CAN-1", 5, 4)];
        let query = ProductListQuery {
            pagination: Pagination { page: 3, page_size: 10 },
            ..Default::default()
        };

        let page = list_products(products, &query);
        assert!(page.items.is_empty());
        assert_eq!(page.total, 1);
        assert_eq!(page.total_pages, 1);
    }
}

// ============================================================================
// Property-Based Tests
// ============================================================================

#[cfg(test)]
mod property_tests {
    use super::*;
    use std::collections::HashSet;

    fn catalog_strategy() -> impl Strategy<Value = Vec<ProductWithBalance>> {
        prop::collection::vec(("[A-Za-z]{1,8}", 0i32..20, 0i64..40), 0..30).prop_map(|rows| {
            rows.into_iter()
                .enumerate()
                .map(|(i, (name, min_stock, balance))| {
                    product(&name, &format!("SKU-{:03}", i), min_stock, balance)
                })
                .collect()
        })
    }

    fn status_strategy() -> impl Strategy<Value = Vec<StockStatus>> {
        prop::sample::subsequence(vec![StockStatus::Ok, StockStatus::Attn, StockStatus::Out], 0..=3)
    }

    fn sort_key_strategy() -> impl Strategy<Value = ProductSortKey> {
        prop_oneof![
            Just(ProductSortKey::Name),
            Just(ProductSortKey::Sku),
            Just(ProductSortKey::Balance),
        ]
    }

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(100))]

        /// Walking every page yields each matching product exactly once
        #[test]
        fn prop_pages_partition_results(
            products in catalog_strategy(),
            statuses in status_strategy(),
            sort_by in sort_key_strategy(),
            page_size in 1u32..7,
        ) {
            let expected: HashSet<Uuid> = products
                .iter()
                .filter(|p| statuses.is_empty() || statuses.contains(&p.status))
                .map(|p| p.product.id)
                .collect();

            let first = list_products(
                products.clone(),
                &ProductListQuery {
                    statuses: statuses.clone(),
                    sort_by,
                    pagination: Pagination { page: 1, page_size },
                    ..Default::default()
                },
            );
            prop_assert_eq!(first.total as usize, expected.len());

            let mut seen = Vec::new();
            for page in 1..=first.total_pages.max(1) {
                let result = list_products(
                    products.clone(),
                    &ProductListQuery {
                        statuses: statuses.clone(),
                        sort_by,
                        pagination: Pagination { page, page_size },
                        ..Default::default()
                    },
                );
                prop_assert!(result.items.len() <= page_size as usize);
                seen.extend(result.items.iter().map(|p| p.product.id));
            }

            let unique: HashSet<Uuid> = seen.iter().copied().collect();
            prop_assert_eq!(seen.len(), unique.len());
            prop_assert_eq!(unique, expected);
        }

        /// Balance ordering is monotone in the requested direction
        #[test]
        fn prop_balance_sort_is_monotone(products in catalog_strategy(), desc in any::<bool>()) {
            let sort_dir = if desc { SortDirection::Desc } else { SortDirection::Asc };
            let page = list_products(
                products,
                &ProductListQuery {
                    sort_by: ProductSortKey::Balance,
                    sort_dir,
                    pagination: Pagination { page: 1, page_size: 100 },
                    ..Default::default()
                },
            );
            for pair in page.items.windows(2) {
                if desc {
                    prop_assert!(pair[0].balance >= pair[1].balance);
                } else {
                    prop_assert!(pair[0].balance <= pair[1].balance);
                }
            }
        }

        /// Every listed product has the status its balance implies
        #[test]
        fn prop_listed_status_is_derived(products in catalog_strategy()) {
            let page = list_products(
                products,
                &ProductListQuery {
                    pagination: Pagination { page: 1, page_size: 100 },
                    ..Default::default()
                },
            );
            for p in &page.items {
                prop_assert_eq!(p.status, StockStatus::classify(p.balance, p.product.min_stock));
            }
        }

        /// A product always matches a search for its own name in any case
        #[test]
        fn prop_search_finds_own_name(name in "[A-Za-z ]{1,12}") {
            prop_assert!(matches_product_search(&name.to_uppercase(), &name, "X-1"));
            prop_assert!(matches_product_search(&name.to_lowercase(), &name, "X-1"));
            prop_assert_eq!(normalize_search_text(&name), name.to_lowercase());
        }
    }
}
