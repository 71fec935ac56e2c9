// ABOUTME: Cursor-based pagination over backend list and describe calls.
// ABOUTME: Follows continuation tokens until the last page and concatenates the results.

use std::future::Future;

use super::BackendError;

/// Opaque cursor returned by the backend when more pages remain.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContinuationToken(String);

impl ContinuationToken {
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// One page of a paginated backend response.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Page<T> {
    pub items: Vec<T>,
    pub continuation: Option<ContinuationToken>,
}

impl<T> Page<T> {
    /// A page with more pages after it.
    pub fn new(items: Vec<T>, continuation: Option<ContinuationToken>) -> Self {
        Self {
            items,
            continuation,
        }
    }

    /// The final page.
    pub fn last(items: Vec<T>) -> Self {
        Self::new(items, None)
    }
}

/// Fetch every page and concatenate the items in page order.
///
/// `fetch` is called with `None` for the first page and with the previous
/// page's continuation token afterwards. If any call fails the whole fetch
/// fails; items from earlier pages are discarded.
pub async fn fetch_all<T, F, Fut>(mut fetch: F) -> Result<Vec<T>, BackendError>
where
    F: FnMut(Option<ContinuationToken>) -> Fut,
    Fut: Future<Output = Result<Page<T>, BackendError>>,
{
    let mut items = Vec::new();
    let mut token = None;
    let mut pages = 0usize;

    loop {
        let page = fetch(token.take()).await?;
        pages += 1;
        items.extend(page.items);

        match page.continuation {
            Some(next) => token = Some(next),
            None => break,
        }
    }

    tracing::trace!(pages, items = items.len(), "fetched all pages");
    Ok(items)
}
