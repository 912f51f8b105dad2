//! Query parameters and response envelopes for list endpoints

use crate::grid::GridQuery;
use serde::Deserialize;

/// One page of a server-paginated list
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Page<T> {
    #[serde(alias = "items")]
    pub data: Vec<T>,
    #[serde(default)]
    pub total: Option<usize>,
}

impl<T> Page<T> {
    /// Total number of rows on the server; falls back to this page's length
    pub fn total_rows(&self) -> usize {
        self.total.unwrap_or(self.data.len())
    }
}

/// List endpoints answer either with a bare array or a `{ "data": [...] }` envelope
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum ListResponse<T> {
    Bare(Vec<T>),
    Wrapped {
        #[serde(alias = "items")]
        data: Vec<T>,
    },
}

impl<T> ListResponse<T> {
    pub fn into_vec(self) -> Vec<T> {
        match self {
            ListResponse::Bare(items) => items,
            ListResponse::Wrapped { data } => data,
        }
    }
}

/// Query string for a server-driven list
pub fn query_params(query: &GridQuery) -> Vec<(String, String)> {
    let mut params = vec![
        ("page".to_string(), query.page.max(1).to_string()),
        ("pageSize".to_string(), query.page_size.max(1).to_string()),
    ];
    if !query.search.trim().is_empty() {
        params.push(("search".to_string(), query.search.trim().to_string()));
    }
    if let Some(sort) = &query.sort {
        params.push(("sortBy".to_string(), sort.column.clone()));
        params.push(("sortOrder".to_string(), sort.direction.as_str().to_string()));
    }
    for (key, value) in &query.filters {
        params.push((key.clone(), value.clone()));
    }
    params
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::grid::{SortDirection, SortSpec};

    #[test]
    fn test_query_params() {
        let mut query = GridQuery {
            search: " pixel ".to_string(),
            page: 2,
            page_size: 25,
            sort: Some(SortSpec {
                column: "lastSeen".to_string(),
                direction: SortDirection::Desc,
            }),
            ..Default::default()
        };
        query.filters.insert("status".to_string(), "online".to_string());

        let params = query_params(&query);
        let get = |k: &str| params.iter().find(|(key, _)| key == k).map(|(_, v)| v.as_str());
        assert_eq!(get("page"), Some("2"));
        assert_eq!(get("pageSize"), Some("25"));
        assert_eq!(get("search"), Some("pixel"));
        assert_eq!(get("sortBy"), Some("lastSeen"));
        assert_eq!(get("sortOrder"), Some("desc"));
        assert_eq!(get("status"), Some("online"));
    }

    #[test]
    fn test_empty_search_omitted() {
        let params = query_params(&GridQuery::default());
        assert_eq!(params.len(), 2);
        assert_eq!(params[0], ("page".to_string(), "1".to_string()));
    }

    #[test]
    fn test_list_response_shapes() {
        let bare: ListResponse<u32> = serde_json::from_str("[1, 2]").unwrap();
        assert_eq!(bare.into_vec(), vec![1, 2]);
        let wrapped: ListResponse<u32> = serde_json::from_str(r#"{"data": [3]}"#).unwrap();
        assert_eq!(wrapped.into_vec(), vec![3]);
        let page: Page<u32> = serde_json::from_str(r#"{"items": [1], "total": 40}"#).unwrap();
        assert_eq!(page.total_rows(), 40);
    }
}
