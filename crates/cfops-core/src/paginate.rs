//! Lazy pagination over page-based list endpoints.
//!
//! A *page fetcher* is any `Fn(u32) -> Future<Output = Result<Page<T>, E>>`;
//! every `CloudFoundryClient::list_*` method partially applied to its
//! filters is one. [`paginate`] turns a fetcher into a stream that:
//!
//! - requests page 1 first and increments the index itself,
//! - yields items in server order,
//! - stops once the server reports no further pages,
//! - yields a failed page request as its final element.
//!
//! Nothing is fetched until the stream is polled, and every call starts
//! over from page 1.

use std::future::Future;

use async_stream::try_stream;
use futures_util::{Stream, TryStreamExt, pin_mut};
use tracing::trace;

use cfops_api::types::Page;

/// Page index of the first request.
pub const FIRST_PAGE: u32 = 1;

/// Stream every item from every page produced by `fetch`.
pub fn paginate<T, E, F, Fut>(fetch: F) -> impl Stream<Item = Result<T, E>>
where
    F: Fn(u32) -> Fut,
    Fut: Future<Output = Result<Page<T>, E>>,
{
    try_stream! {
        let mut page = FIRST_PAGE;
        loop {
            let response = fetch(page).await?;
            let has_next = response.has_next(page);
            trace!(
                page,
                total_pages = response.total_pages,
                received = response.resources.len(),
                "fetched page"
            );

            for item in response.resources {
                yield item;
            }

            if !has_next {
                break;
            }
            page += 1;
        }
    }
}

/// Drain every page into a single `Vec<T>`.
pub async fn collect_all<T, E, F, Fut>(fetch: F) -> Result<Vec<T>, E>
where
    F: Fn(u32) -> Fut,
    Fut: Future<Output = Result<Page<T>, E>>,
{
    paginate(fetch).try_collect().await
}

/// The first item of the sequence; only the first page is requested.
pub async fn first<T, E, F, Fut>(fetch: F) -> Result<Option<T>, E>
where
    F: Fn(u32) -> Fut,
    Fut: Future<Output = Result<Page<T>, E>>,
{
    let items = paginate(fetch);
    pin_mut!(items);
    items.try_next().await
}
