//! Page cursor
//!
//! Turns a page-fetching function into a lazy stream of items. Pages are
//! fetched on demand; the stream ends after the page that carries no next
//! token. A fetch error is yielded once and ends the stream.

use std::future::Future;

use futures::stream::{self, BoxStream, StreamExt, TryStreamExt};

use crate::error::{Error, Result};

/// One page of a paginated listing
#[derive(Debug, Clone)]
pub struct Page<T> {
    pub items: Vec<T>,
    pub next_token: Option<String>,
}

impl<T> Page<T> {
    pub fn new(items: Vec<T>, next_token: Option<String>) -> Self {
        Self { items, next_token }
    }

    /// A page with no successor
    pub fn last(items: Vec<T>) -> Self {
        Self::new(items, None)
    }
}

enum Cursor {
    Start,
    Next(String),
    Done,
}

/// Stream the items of every page returned by `fetch`
///
/// `fetch` receives `None` for the first page and the previous page's token
/// afterwards. An empty token is treated as the end of the listing.
pub fn paginate<T, F, Fut>(fetch: F) -> BoxStream<'static, Result<T>>
where
    T: Send + 'static,
    F: FnMut(Option<String>) -> Fut + Send + 'static,
    Fut: Future<Output = Result<Page<T>>> + Send + 'static,
{
    let pages = stream::try_unfold((fetch, Cursor::Start), |(mut fetch, cursor)| async move {
        let token = match cursor {
            Cursor::Start => None,
            Cursor::Next(token) => Some(token),
            Cursor::Done => return Ok(None),
        };

        let page = fetch(token).await?;
        let next = match page.next_token {
            Some(token) if !token.is_empty() => Cursor::Next(token),
            _ => Cursor::Done,
        };

        Ok::<_, Error>(Some((page.items, (fetch, next))))
    });

    pages
        .map_ok(|items| stream::iter(items.into_iter().map(Ok::<T, Error>)))
        .try_flatten()
        .boxed()
}
