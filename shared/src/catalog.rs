//! Catalog listing rules: search, status filtering, sorting and paging
//!
//! Listings are shaped in memory because both the status filter and the
//! `balance` sort key depend on derived values.

use std::cmp::Ordering;

use unicode_normalization::{char::is_combining_mark, UnicodeNormalization};

use crate::models::{ProductListQuery, ProductSortKey, ProductWithBalance};
use crate::types::{PaginatedResponse, SortDirection};

/// Fold text for comparison: decompose, drop combining marks, lowercase.
///
/// `"Lápis"` and `"LAPIS"` both become `"lapis"`.
pub fn normalize_search_text(input: &str) -> String {
    input
        .nfd()
        .filter(|c| !is_combining_mark(*c))
        .collect::<String>()
        .to_lowercase()
}

/// Substring match of an already normalized term against any candidate
pub fn matches_normalized(term: &str, candidates: &[&str]) -> bool {
    term.is_empty()
        || candidates
            .iter()
            .any(|candidate| normalize_search_text(candidate).contains(term))
}

/// Case- and diacritic-insensitive substring match on name or SKU
pub fn matches_product_search(search: &str, name: &str, sku: &str) -> bool {
    matches_normalized(&normalize_search_text(search.trim()), &[name, sku])
}

/// URL- and SKU-friendly slug: `"Régua 30cm"` becomes `"regua-30cm"`
pub fn slugify(input: &str) -> String {
    let folded = normalize_search_text(input);
    let mut slug = String::with_capacity(folded.len());
    let mut pending_dash = false;
    for c in folded.chars() {
        if c.is_ascii_alphanumeric() {
            if pending_dash && !slug.is_empty() {
                slug.push('-');
            }
            pending_dash = false;
            slug.push(c);
        } else {
            pending_dash = true;
        }
    }
    slug
}

/// Filter, sort and paginate products that already carry their balance
pub fn list_products(
    products: Vec<ProductWithBalance>,
    query: &ProductListQuery,
) -> PaginatedResponse<ProductWithBalance> {
    let term = query
        .search
        .as_deref()
        .map(|s| normalize_search_text(s.trim()))
        .unwrap_or_default();

    let mut keyed: Vec<(SortKeys, ProductWithBalance)> = products
        .into_iter()
        .filter(|p| matches_normalized(&term, &[&p.product.name, &p.product.sku]))
        .filter(|p| query.statuses.is_empty() || query.statuses.contains(&p.status))
        .map(|p| (SortKeys::of(&p), p))
        .collect();

    keyed.sort_by(|(a, _), (b, _)| compare(a, b, query.sort_by, query.sort_dir));

    let items = keyed.into_iter().map(|(_, p)| p).collect();
    PaginatedResponse::from_vec(items, query.pagination)
}

/// Precomputed comparison keys, so normalization runs once per product
struct SortKeys {
    name: String,
    sku: String,
    balance: i64,
    raw_sku: String,
    id: uuid::Uuid,
}

impl SortKeys {
    fn of(p: &ProductWithBalance) -> Self {
        Self {
            name: normalize_search_text(&p.product.name),
            sku: normalize_search_text(&p.product.sku),
            balance: p.balance,
            raw_sku: p.product.sku.clone(),
            id: p.product.id,
        }
    }
}

fn compare(a: &SortKeys, b: &SortKeys, key: ProductSortKey, dir: SortDirection) -> Ordering {
    let primary = match key {
        ProductSortKey::Name => a.name.cmp(&b.name),
        ProductSortKey::Sku => a.sku.cmp(&b.sku),
        ProductSortKey::Balance => a.balance.cmp(&b.balance),
    };
    let primary = match dir {
        SortDirection::Asc => primary,
        SortDirection::Desc => primary.reverse(),
    };
    // Equal keys always fall back to ascending name, SKU, then id
    primary
        .then_with(|| a.name.cmp(&b.name))
        .then_with(|| a.raw_sku.cmp(&b.raw_sku))
        .then_with(|| a.id.cmp(&b.id))
}
