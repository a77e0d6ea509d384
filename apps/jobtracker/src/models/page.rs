use serde::{Deserialize, Serialize};

/// One page of results, 0-based.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Page<T> {
    pub content: Vec<T>,
    pub total_elements: u64,
    pub total_pages: u32,
    pub number: u32,
    pub size: u32,
}

impl<T> Page<T> {
    /// Wraps a bare list as a single page.
    pub fn single(content: Vec<T>, number: u32) -> Self {
        let len = content.len();
        Self {
            content,
            total_elements: len as u64,
            total_pages: 1,
            number,
            size: len as u32,
        }
    }

    /// Slices `items` into pages of `size` and keeps page `number`.
    pub fn slice(items: Vec<T>, number: u32, size: u32) -> Self {
        let total = items.len();
        let per_page = size.max(1) as usize;
        let content = items
            .into_iter()
            .skip(number as usize * per_page)
            .take(per_page)
            .collect();
        Self {
            content,
            total_elements: total as u64,
            total_pages: total.div_ceil(per_page) as u32,
            number,
            size,
        }
    }
}

/// Listing endpoints answer with either a page or a plain array.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
pub enum Listing<T> {
    Paged(Page<T>),
    Bare(Vec<T>),
}

impl<T> Listing<T> {
    pub fn into_page(self, number: u32) -> Page<T> {
        match self {
            Listing::Paged(page) => page,
            Listing::Bare(items) => Page::single(items, number),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_slice_reports_totals() {
        let page = Page::slice((1..=23).collect::<Vec<u32>>(), 2, 10);
        assert_eq!(page.content, vec![21, 22, 23]);
        assert_eq!(page.total_elements, 23);
        assert_eq!(page.total_pages, 3);
        assert_eq!(page.number, 2);
        assert_eq!(page.size, 10);
    }

    #[test]
    fn test_slice_past_end_is_empty() {
        let page = Page::slice(vec![1, 2], 5, 10);
        assert!(page.content.is_empty());
        assert_eq!(page.total_elements, 2);
        assert_eq!(page.total_pages, 1);
    }

    #[test]
    fn test_listing_accepts_both_shapes() {
        let paged: Listing<u32> = serde_json::from_value(json!({
            "content": [1, 2],
            "totalElements": 12,
            "totalPages": 2,
            "number": 1,
            "size": 10
        }))
        .unwrap();
        assert_eq!(paged.into_page(1).total_elements, 12);

        let bare: Listing<u32> = serde_json::from_value(json!([4, 5, 6])).unwrap();
        let page = bare.into_page(3);
        assert_eq!(page.content, vec![4, 5, 6]);
        assert_eq!(page.total_pages, 1);
        assert_eq!(page.number, 3);
        assert_eq!(page.size, 3);
    }
}
