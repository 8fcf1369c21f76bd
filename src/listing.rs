//! Search and pagination shared by every list view.
//!
//! A [`ListView`] wraps an already-ordered sequence together with a
//! [`ListSpec`] naming the searchable text fields and the page size. The
//! filter is a case-insensitive substring match over any of those fields;
//! pages are 1-based.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

pub const POSTS_PER_PAGE: usize = 10;
pub const COMMENTS_PER_PAGE: usize = 10;
pub const RECIPES_PER_PAGE: usize = 8;

/// Describes how a list is searched and paged.
pub struct ListSpec<T> {
    /// `None` shows every match on a single page.
    pub page_size: Option<usize>,
    /// The text fields a search term is matched against.
    pub fields: fn(&T) -> Vec<&str>,
}

impl<T> Clone for ListSpec<T> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<T> Copy for ListSpec<T> {}

impl<T> ListSpec<T> {
    pub fn paged(page_size: usize, fields: fn(&T) -> Vec<&str>) -> Self {
        Self {
            page_size: Some(page_size.max(1)),
            fields,
        }
    }

    pub fn unpaged(fields: fn(&T) -> Vec<&str>) -> Self {
        Self {
            page_size: None,
            fields,
        }
    }

    fn matches(&self, item: &T, needle: &str) -> bool {
        (self.fields)(item)
            .iter()
            .any(|field| field.to_lowercase().contains(needle))
    }
}

/// Date ordering requested by the client.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortOrder {
    Asc,
    #[default]
    Desc,
}

/// Order `items` by the date `key` returns.
pub fn sort_by_date<T>(items: &mut [T], order: SortOrder, key: fn(&T) -> DateTime<Utc>) {
    match order {
        SortOrder::Asc => items.sort_by_key(key),
        SortOrder::Desc => items.sort_by_key(|item| std::cmp::Reverse(key(item))),
    }
}

/// Query string accepted by list endpoints: `?q=&page=&sort=`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ListQuery {
    #[serde(default)]
    pub q: Option<String>,
    #[serde(default)]
    pub page: Option<usize>,
    #[serde(default)]
    pub sort: Option<SortOrder>,
}

impl ListQuery {
    pub fn search(&self) -> &str {
        self.q.as_deref().unwrap_or("")
    }

    pub fn page(&self) -> usize {
        self.page.unwrap_or(1)
    }
}

/// One page of a list, ready to serialize.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Page<T> {
    pub items: Vec<T>,
    pub page: usize,
    pub page_size: Option<usize>,
    pub total_items: usize,
    pub total_pages: usize,
}

impl<T> Page<T> {
    /// Convert the items, keeping the paging figures.
    pub fn map<U>(self, f: impl FnMut(T) -> U) -> Page<U> {
        Page {
            items: self.items.into_iter().map(f).collect(),
            page: self.page,
            page_size: self.page_size,
            total_items: self.total_items,
            total_pages: self.total_pages,
        }
    }
}

/// Stateful view over a list: current filter, matching items and current
/// page.
pub struct ListView<T> {
    items: Vec<T>,
    spec: ListSpec<T>,
    /// Indices into `items` that pass the filter, in list order.
    matching: Vec<usize>,
    page: usize,
}

impl<T> ListView<T> {
    pub fn new(items: Vec<T>, spec: ListSpec<T>) -> Self {
        let matching = (0..items.len()).collect();
        Self {
            items,
            spec,
            matching,
            page: 1,
        }
    }

    /// Apply a search term. A blank term restores the full list. The view
    /// always returns to page 1.
    pub fn set_filter(&mut self, query: &str) {
        let needle = query.trim().to_lowercase();
        self.matching = if needle.is_empty() {
            (0..self.items.len()).collect()
        } else {
            self.items
                .iter()
                .enumerate()
                .filter(|(_, item)| self.spec.matches(item, &needle))
                .map(|(i, _)| i)
                .collect()
        };
        self.page = 1;
    }

    /// Select a page. Page 0 is treated as page 1; pages past the end are
    /// allowed and simply hold no items.
    pub fn go_to(&mut self, page: usize) {
        self.page = page.max(1);
    }

    pub fn page(&self) -> usize {
        self.page
    }

    pub fn total_items(&self) -> usize {
        self.matching.len()
    }

    pub fn page_count(&self) -> usize {
        match self.spec.page_size {
            Some(size) => self.matching.len().div_ceil(size),
            None => usize::from(!self.matching.is_empty()),
        }
    }

    fn page_range(&self) -> std::ops::Range<usize> {
        match self.spec.page_size {
            Some(size) => {
                let start = (self.page - 1).saturating_mul(size).min(self.matching.len());
                let end = start.saturating_add(size).min(self.matching.len());
                start..end
            }
            None if self.page == 1 => 0..self.matching.len(),
            None => 0..0,
        }
    }

    /// Items on the current page.
    pub fn current_page(&self) -> Vec<&T> {
        self.matching[self.page_range()]
            .iter()
            .map(|&i| &self.items[i])
            .collect()
    }

    /// Consume the view, keeping only the items on the current page.
    pub fn into_page(self) -> Page<T> {
        let page_size = self.spec.page_size;
        let total_items = self.matching.len();
        let total_pages = self.page_count();
        let page = self.page;

        let mut wanted = self.matching[self.page_range()].iter().copied().peekable();
        let mut items = Vec::new();
        for (i, item) in self.items.into_iter().enumerate() {
            if wanted.peek() == Some(&i) {
                items.push(item);
                wanted.next();
            }
        }

        Page {
            items,
            page,
            page_size,
            total_items,
            total_pages,
        }
    }
}

/// Filter and page `items` in one go.
pub fn paginate<T>(items: Vec<T>, spec: ListSpec<T>, query: &str, page: usize) -> Page<T> {
    let mut view = ListView::new(items, spec);
    view.set_filter(query);
    view.go_to(page);
    view.into_page()
}
