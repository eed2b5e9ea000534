use crate::error::{FetchError, Result};
use serde::Serialize;

/// Navigation URLs taken from a `Link` response header.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct PaginationCursor {
    pub next: Option<String>,
    pub last: Option<String>,
    pub first: Option<String>,
    pub prev: Option<String>,
}

impl PaginationCursor {
    /// Parse `<url>; rel="name", <url>; rel="name"`.
    ///
    /// An absent header yields an empty cursor. Entries that do not split into
    /// exactly a bracketed URL and one parameter fail the whole parse; unknown
    /// `rel` values are ignored.
    ///
    /// Targets must be absolute URLs. Relative references such as
    /// `</orgs/o/repos?page=2>` are not resolved and fail the parse.
    pub fn parse(link_header: Option<&str>) -> Result<Self> {
        let mut cursor = Self::default();
        let Some(header) = link_header else {
            return Ok(cursor);
        };
        if header.trim().is_empty() {
            return Ok(cursor);
        }

        for entry in header.split(',') {
            let parts: Vec<&str> = entry.split(';').collect();
            if parts.len() != 2 {
                return Err(FetchError::MalformedLinkHeader(header.to_string()));
            }
            let target = parts[0].trim();
            let url = target
                .strip_prefix('<')
                .and_then(|t| t.strip_suffix('>'))
                .filter(|u| url::Url::parse(u).is_ok())
                .ok_or_else(|| FetchError::MalformedLinkHeader(header.to_string()))?
                .to_string();

            let slot = match parts[1].trim() {
                r#"rel="next""# => &mut cursor.next,
                r#"rel="last""# => &mut cursor.last,
                r#"rel="first""# => &mut cursor.first,
                r#"rel="prev""# => &mut cursor.prev,
                _ => continue,
            };
            *slot = Some(url);
        }
        Ok(cursor)
    }
}
