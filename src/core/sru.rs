use std::collections::BTreeMap;

use serde::{Deserialize, Deserializer, Serialize};

/// Release codename (e.g. `jammy`) to the SRUs pending for it.
pub type Report = BTreeMap<String, Vec<Sru>>;

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Bug {
    #[serde(default, deserialize_with = "null_as_default")]
    pub url: String,
}

/// One package's pending stable release update for one release.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Sru {
    #[serde(deserialize_with = "null_as_default")]
    pub age: i64,
    #[serde(deserialize_with = "bugs_skipping_null")]
    pub bugs: Vec<Bug>,
    #[serde(deserialize_with = "null_as_default")]
    pub pkg: String,
    #[serde(deserialize_with = "null_as_default")]
    pub proposed_version: String,
    #[serde(deserialize_with = "null_as_default")]
    pub release_version: String,
    #[serde(deserialize_with = "null_as_default")]
    pub updates_version: String,
    #[serde(deserialize_with = "null_as_default")]
    pub uploaders: String,
    #[serde(deserialize_with = "null_as_default")]
    pub url: String,
}

// The archive report writes `~` for versions a package has not reached yet.
fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

fn bugs_skipping_null<'de, D>(deserializer: D) -> Result<Vec<Bug>, D::Error>
where
    D: Deserializer<'de>,
{
    let bugs: Option<Vec<Option<Bug>>> = Option::deserialize(deserializer)?;
    Ok(bugs.into_iter().flatten().flatten().collect())
}
