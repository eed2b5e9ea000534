//! Organization-wide queries built on the paginating client.

use crate::client::{GitHubClient, TAG};
use crate::clock::Clock;
use crate::error::Result;
use crate::http::{encode_path_segment, Transport};
use crate::types::{MemberRef, Person, Repo};
use log::info;
use serde_json::Value;
use std::collections::BTreeMap;

impl<T: Transport, C: Clock> GitHubClient<T, C> {
    /// `/orgs/{org}/{resource}` with the organization name percent-encoded.
    pub fn org_url(&self, org: &str, resource: &str) -> String {
        self.url(&format!("/orgs/{}/{}", encode_path_segment(org), resource))
    }

    /// All repositories of `org`, keyed by repository id.
    pub async fn collect_org_repos(&mut self, org: &str) -> Result<BTreeMap<i64, Repo>> {
        info!(target: TAG, "Fetching org repos.");
        let url = self.org_url(org, "repos");
        let repos = decode_all::<Repo>(self.fetch_all(&url).await?)?;
        Ok(repos.into_iter().map(|r| (r.id, r)).collect())
    }

    /// Full profile of every member of `org`, keyed by user id.
    pub async fn collect_org_members(&mut self, org: &str) -> Result<BTreeMap<i64, Person>> {
        info!(target: TAG, "Fetching org members.");
        let url = self.org_url(org, "members");
        let refs = decode_all::<MemberRef>(self.fetch_all(&url).await?)?;

        let mut members = BTreeMap::new();
        for member in refs {
            info!(target: TAG, "Fetching member '{}'.", member.url);
            let person: Person = serde_json::from_value(self.get_json(&member.url).await?)?;
            members.insert(person.id, person);
        }
        Ok(members)
    }
}

fn decode_all<R: serde::de::DeserializeOwned>(items: Vec<Value>) -> Result<Vec<R>> {
    Ok(items
        .into_iter()
        .map(serde_json::from_value)
        .collect::<std::result::Result<Vec<R>, _>>()?)
}
