use serde::Deserialize;

pub const PER_PAGE: usize = 10;

/// `?page=` query parameter. Kept as a raw string so junk falls back to page 1
/// instead of rejecting the request.
#[derive(Debug, Default, Deserialize)]
pub struct PageParams {
    pub page: Option<String>,
}

impl PageParams {
    pub fn number(&self) -> usize {
        self.page
            .as_deref()
            .and_then(|p| p.trim().parse::<usize>().ok())
            .filter(|&p| p >= 1)
            .unwrap_or(1)
    }
}

/// One slice of an ordered feed.
#[derive(Debug, Clone)]
pub struct Page<T> {
    pub items: Vec<T>,
    pub number: usize,
    pub num_pages: usize,
    pub total: usize,
}

impl<T> Page<T> {
    /// Cuts page `number` (1-indexed) out of `items`. Out of range pages are empty.
    pub fn paginate(items: Vec<T>, number: usize) -> Self {
        let number = number.max(1);
        let total = items.len();
        let num_pages = total.div_ceil(PER_PAGE).max(1);
        let start = (number - 1).saturating_mul(PER_PAGE);

        let items = if start < total {
            items.into_iter().skip(start).take(PER_PAGE).collect()
        } else {
            vec![]
        };

        Self {
            items,
            number,
            num_pages,
            total,
        }
    }

    pub fn has_next(&self) -> bool {
        self.number < self.num_pages
    }

    pub fn has_previous(&self) -> bool {
        self.number > 1
    }

    pub fn map<U>(self, f: impl FnMut(T) -> U) -> Page<U> {
        Page {
            items: self.items.into_iter().map(f).collect(),
            number: self.number,
            num_pages: self.num_pages,
            total: self.total,
        }
    }
}
