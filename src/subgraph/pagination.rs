// SPDX-FileCopyrightText: 2025 Semiotic AI, Inc.
//
// SPDX-License-Identifier: Apache-2.0

//! Offset pagination over subgraph collections.
//!
//! The subgraph caps `first` at 1000, so collections are read page by page
//! with increasing `skip` until a page comes back short.

use std::future::Future;
use tracing::trace;

/// Number of entities requested per page, `1..=1000`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct PageSize(u32);

impl PageSize {
    /// Largest `first` the subgraph accepts
    pub const MAX: u32 = 1000;

    pub const fn new(size: u32) -> Option<Self> {
        if size == 0 || size > Self::MAX {
            None
        } else {
            Some(Self(size))
        }
    }

    pub const fn get(&self) -> u32 {
        self.0
    }
}

impl Default for PageSize {
    fn default() -> Self {
        Self(Self::MAX)
    }
}

/// Reads every page of a collection.
///
/// `fetch_page(skip, first)` returns one page. Iteration stops after the
/// first page holding fewer than `first` items (including an empty page).
/// The first failing page aborts the whole read.
pub async fn fetch_all_pages<T, E, F, Fut>(page_size: PageSize, mut fetch_page: F) -> Result<Vec<T>, E>
where
    F: FnMut(u32, u32) -> Fut,
    Fut: Future<Output = Result<Vec<T>, E>>,
{
    let first = page_size.get();
    let mut items = Vec::new();
    let mut skip = 0u32;

    loop {
        let page = fetch_page(skip, first).await?;
        let page_len = page.len();
        trace!(skip, first, page_len, "Fetched page");
        items.extend(page);

        if page_len < first as usize {
            break;
        }
        skip = skip.saturating_add(first);
    }

    Ok(items)
}
