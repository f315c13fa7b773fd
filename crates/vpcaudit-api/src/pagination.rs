// Cursor pagination shared by every list operation.
//
// A list call returns one page of records plus an opaque `NextToken`.
// `cursor_pages` turns the fetch-follow-repeat loop into a fallible stream
// of pages so callers can either collect everything or fold as they go.
// Both levels of the IPAM pool walk reuse it.

use std::future::Future;

use async_stream::try_stream;
use futures_util::{Stream, TryStreamExt, pin_mut};
use tracing::debug;

use crate::error::Error;

/// Name of the continuation-token parameter and response field.
pub const NEXT_TOKEN: &str = "NextToken";

/// Hard ceiling on pages per fetch; a server that never stops handing out
/// tokens fails the fetch instead of running forever.
pub const DEFAULT_MAX_PAGES: u32 = 10_000;

/// One decoded page of a cursor-paginated list operation.
pub trait CursorPage {
    type Item;

    /// The continuation token, if the server returned one.
    fn next_token(&self) -> Option<&str>;

    /// Consume the page, yielding its records in server order.
    fn into_items(self) -> Vec<Self::Item>;
}

/// Stream the pages produced by `fetch`, following continuation tokens.
///
/// `fetch` receives `None` for the first page and the previous page's token
/// afterwards. The stream ends after the first page whose token is absent or
/// empty, and yields [`Error::PaginationExhausted`] instead of fetching page
/// `max_pages + 1`. The first fetch error is yielded and ends the stream.
pub fn cursor_pages<P, F, Fut>(
    operation: &'static str,
    max_pages: u32,
    mut fetch: F,
) -> impl Stream<Item = Result<P, Error>>
where
    P: CursorPage,
    F: FnMut(Option<String>) -> Fut,
    Fut: Future<Output = Result<P, Error>>,
{
    try_stream! {
        let mut cursor: Option<String> = None;
        let mut fetched: u32 = 0;

        loop {
            if fetched >= max_pages {
                Err::<(), Error>(Error::PaginationExhausted {
                    operation,
                    max_pages,
                })?;
            }

            let page = fetch(cursor.take()).await?;
            fetched += 1;

            let next = page
                .next_token()
                .filter(|token| !token.is_empty())
                .map(str::to_owned);
            debug!(operation, page = fetched, has_more = next.is_some(), "fetched page");

            yield page;

            match next {
                Some(token) => cursor = Some(token),
                None => break,
            }
        }
    }
}

/// Drain a page stream into one `Vec`, preserving page and record order.
///
/// On any error the records gathered so far are dropped; callers never see
/// a partial result.
pub async fn collect_all<P, S>(operation: &'static str, pages: S) -> Result<Vec<P::Item>, Error>
where
    P: CursorPage,
    S: Stream<Item = Result<P, Error>>,
{
    pin_mut!(pages);

    let mut all = Vec::new();
    while let Some(page) = pages.try_next().await? {
        all.extend(page.into_items());
    }

    debug!(operation, records = all.len(), "pagination complete");
    Ok(all)
}
