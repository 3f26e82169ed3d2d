//! Aggregation of paginated backend listings.
//!
//! The backend pages every results listing as `{page, pageSize, totalHits,
//! items[]}`. The first page is always fetched by the endpoint wrapper; when
//! `totalHits` exceeds `pageSize` the helpers here fetch pages
//! `2..=total_pages` through a caller-supplied closure and merge the items
//! into one in-memory collection. Any page-fetch failure aborts the whole
//! aggregation; there is no partial-result return.

use crate::error::ClientError;
use serde_json::Value;
use std::collections::HashMap;
use tracing::debug;

/// One page of a paginated result listing.
#[derive(Debug, Clone)]
pub struct Page {
    pub page: u64,
    pub page_size: u64,
    pub total_hits: u64,
    pub items: Vec<Value>,
}

impl Page {
    /// Read a page descriptor out of a response payload. Missing fields
    /// take the backend defaults (page 1, page size 200, no hits).
    pub fn from_value(value: &Value) -> Self {
        Self {
            page: value.get("page").and_then(Value::as_u64).unwrap_or(1),
            page_size: value.get("pageSize").and_then(Value::as_u64).unwrap_or(200),
            total_hits: value.get("totalHits").and_then(Value::as_u64).unwrap_or(0),
            items: value
                .get("items")
                .and_then(Value::as_array)
                .cloned()
                .unwrap_or_default(),
        }
    }

    /// Number of pages needed to cover `total_hits`.
    pub fn total_pages(&self) -> u64 {
        if self.page_size == 0 {
            return 1;
        }
        self.total_hits.div_ceil(self.page_size)
    }

    /// True when the first page already covers the whole result set.
    pub fn is_complete(&self) -> bool {
        self.page_size >= self.total_hits
    }
}

/// Concatenate `items` across all pages, in page order.
///
/// Issues no fetch when the first page is already complete; otherwise
/// fetches pages `2..=total_pages` and appends their items after the
/// first page's.
pub fn aggregate_list<F>(first: Page, mut fetch: F) -> Result<Vec<Value>, ClientError>
where
    F: FnMut(u64) -> Result<Page, ClientError>,
{
    if first.is_complete() {
        return Ok(first.items);
    }
    let total_pages = first.total_pages();
    debug!(
        total_hits = first.total_hits,
        page_size = first.page_size,
        total_pages,
        "aggregating paginated list"
    );
    let mut items = first.items;
    for page in 2..=total_pages {
        let mut next = fetch(page)?;
        items.append(&mut next.items);
    }
    Ok(items)
}

/// Merge all pages into a map keyed by `key_of(item)`.
///
/// Used for summary listings keyed by entity id; ids are assumed unique
/// across pages, so later inserts never need to win. Items without a key
/// are skipped.
pub fn aggregate_keyed<F, K>(
    first: Page,
    mut fetch: F,
    key_of: K,
) -> Result<HashMap<String, Value>, ClientError>
where
    F: FnMut(u64) -> Result<Page, ClientError>,
    K: Fn(&Value) -> Option<String>,
{
    let mut merged = HashMap::new();
    let insert_page = |merged: &mut HashMap<String, Value>, items: Vec<Value>| {
        for item in items {
            if let Some(key) = key_of(&item) {
                merged.insert(key, item);
            }
        }
    };

    let complete = first.is_complete();
    let total_pages = first.total_pages();
    insert_page(&mut merged, first.items);
    if complete {
        return Ok(merged);
    }
    for page in 2..=total_pages {
        let next = fetch(page)?;
        insert_page(&mut merged, next.items);
    }
    Ok(merged)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn page(page: u64, page_size: u64, total_hits: u64, count: usize) -> Page {
        let items = (0..count)
            .map(|i| json!({"id": format!("p{page}-{i}")}))
            .collect();
        Page {
            page,
            page_size,
            total_hits,
            items,
        }
    }

    #[test]
    fn single_page_issues_no_fetch() {
        let first = page(1, 200, 150, 150);
        let mut calls = 0;
        let items = aggregate_list(first, |_| {
            calls += 1;
            Err(ClientError::InvalidArgument("unexpected fetch".into()))
        })
        .unwrap();
        assert_eq!(calls, 0);
        assert_eq!(items.len(), 150);
    }

    #[test]
    fn three_page_listing_fetches_pages_two_and_three() {
        let first = page(1, 200, 450, 200);
        let mut fetched = Vec::new();
        let items = aggregate_list(first, |n| {
            fetched.push(n);
            let count = if n == 3 { 50 } else { 200 };
            Ok(page(n, 200, 450, count))
        })
        .unwrap();
        assert_eq!(fetched, vec![2, 3]);
        assert_eq!(items.len(), 450);
        // Page order is preserved.
        assert_eq!(items[0]["id"], json!("p1-0"));
        assert_eq!(items[200]["id"], json!("p2-0"));
        assert_eq!(items[449]["id"], json!("p3-49"));
    }

    #[test]
    fn exact_page_boundary_needs_no_rounding_up() {
        let first = page(1, 200, 400, 200);
        assert_eq!(first.total_pages(), 2);
        let mut fetched = Vec::new();
        let items = aggregate_list(first, |n| {
            fetched.push(n);
            Ok(page(n, 200, 400, 200))
        })
        .unwrap();
        assert_eq!(fetched, vec![2]);
        assert_eq!(items.len(), 400);
    }

    #[test]
    fn fetch_failure_aborts_without_partial_result() {
        let first = page(1, 100, 300, 100);
        let result = aggregate_list(first, |n| {
            if n == 3 {
                Err(ClientError::TooManyRequests)
            } else {
                Ok(page(n, 100, 300, 100))
            }
        });
        assert!(matches!(result, Err(ClientError::TooManyRequests)));
    }

    #[test]
    fn keyed_aggregation_merges_by_id() {
        let make = |page_no: u64, ids: &[&str]| Page {
            page: page_no,
            page_size: 2,
            total_hits: 4,
            items: ids
                .iter()
                .map(|id| json!({"testResultCommonProperties": {"testId": id}}))
                .collect(),
        };
        let first = make(1, &["a", "b"]);
        let merged = aggregate_keyed(first, |n| Ok(make(n, &["c", "d"])), |item| {
            item["testResultCommonProperties"]["testId"]
                .as_str()
                .map(str::to_string)
        })
        .unwrap();
        assert_eq!(merged.len(), 4);
        assert!(merged.contains_key("a") && merged.contains_key("d"));
    }

    #[test]
    fn page_descriptor_defaults() {
        let parsed = Page::from_value(&json!({"totalHits": 10}));
        assert_eq!(parsed.page, 1);
        assert_eq!(parsed.page_size, 200);
        assert_eq!(parsed.total_hits, 10);
        assert!(parsed.items.is_empty());
        assert!(parsed.is_complete());
    }
}
