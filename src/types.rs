use serde::{Deserialize, Serialize};

// Typed records decoded from raw page items; unknown fields are ignored.

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
pub struct Owner {
    pub login: String,
    pub id: i64,
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
pub struct Repo {
    pub id: i64,
    pub name: String,
    pub owner: Owner,
    pub html_url: String,
    pub created_at: Option<String>,
    pub updated_at: Option<String>,
    #[serde(default)]
    pub stargazers_count: i64,
    pub language: Option<String>,
    #[serde(default)]
    pub forks_count: i64,
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
pub struct Person {
    pub id: i64,
    pub login: String,
    pub name: Option<String>,
    pub bio: Option<String>,
    pub avatar_url: Option<String>,
    pub html_url: Option<String>,
}

/// Entry of `/orgs/{org}/members`; only the detail URL is needed.
#[derive(Debug, Deserialize, Clone)]
pub struct MemberRef {
    pub url: String,
}
