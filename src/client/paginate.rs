use super::{GitHubClient, TAG};
use crate::clock::Clock;
use crate::error::{FetchError, Result};
use crate::http::{PaginationCursor, Transport};
use log::info;
use reqwest::StatusCode;
use serde_json::Value;

impl<T: Transport, C: Clock> GitHubClient<T, C> {
    /// Follow `rel="next"` links from `initial_url` until the last page.
    ///
    /// With `flatten` the items of every page are appended one by one;
    /// otherwise each page is appended as a single array element.
    pub async fn fetch_all_pages(
        &mut self,
        initial_url: &str,
        flatten: bool,
        expected: &[StatusCode],
    ) -> Result<Vec<Value>> {
        let mut pages = Vec::new();
        let mut next = Some(initial_url.to_string());
        while let Some(url) = next {
            next = self.fetch_page(&url, &mut pages, flatten, expected).await?.next;
        }
        Ok(pages)
    }

    /// Every item of a paginated `200 OK` collection, flattened.
    pub async fn fetch_all(&mut self, initial_url: &str) -> Result<Vec<Value>> {
        self.fetch_all_pages(initial_url, true, &[StatusCode::OK])
            .await
    }

    async fn fetch_page(
        &mut self,
        url: &str,
        pages: &mut Vec<Value>,
        flatten: bool,
        expected: &[StatusCode],
    ) -> Result<PaginationCursor> {
        info!(target: TAG, "Fetching page '{}'.", url);
        let response = self.execute(url, None, expected).await?;
        let Value::Array(items) = response.body else {
            return Err(FetchError::NotAList {
                url: url.to_string(),
            });
        };
        if flatten {
            pages.extend(items);
        } else {
            pages.push(Value::Array(items));
        }
        Ok(response.cursor)
    }
}
