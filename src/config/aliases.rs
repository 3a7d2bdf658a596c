use std::collections::HashMap;
use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use log::info;

/// Maps spelling variants of a player's name onto one official name.
///
/// The file is a JSON object of `"variant": "Official Name"` pairs. Variants
/// are keyed lowercase with whitespace removed, so `"Srikanth K"` and
/// `"srikanthk"` hit the same entry.
#[derive(Debug, Clone, Default)]
pub struct PlayerAliases {
    map: HashMap<String, String>,
}

impl PlayerAliases {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_pairs<I, K, V>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: AsRef<str>,
        V: Into<String>,
    {
        let map = pairs
            .into_iter()
            .map(|(variant, official)| (alias_key(variant.as_ref()), official.into()))
            .collect();
        Self { map }
    }

    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let json = fs::read_to_string(path)
            .with_context(|| format!("Failed to read alias file {}", path.display()))?;
        let pairs: HashMap<String, String> = serde_json::from_str(&json)
            .with_context(|| format!("Failed to parse alias file {}", path.display()))?;

        let aliases = Self::from_pairs(pairs);
        info!("Loaded {} player aliases from {}", aliases.len(), path.display());
        Ok(aliases)
    }

    /// Official name for an already-trimmed name, or the name in title case
    /// so that `pavan` and `PAVAN` land on the same player.
    pub fn resolve(&self, name: &str) -> String {
        self.map
            .get(&alias_key(name))
            .cloned()
            .unwrap_or_else(|| title_case(name))
    }

    pub fn len(&self) -> usize {
        self.map.len()
    }

    pub fn is_empty(&self) -> bool {
        self.map.is_empty()
    }
}

fn alias_key(name: &str) -> String {
    name.chars()
        .filter(|c| !c.is_whitespace())
        .flat_map(char::to_lowercase)
        .collect()
}

/// First letter of every word upper case, the rest lower case
fn title_case(name: &str) -> String {
    let mut titled = String::with_capacity(name.len());
    let mut in_word = false;

    for c in name.chars() {
        if in_word {
            titled.extend(c.to_lowercase());
        } else {
            titled.extend(c.to_uppercase());
        }
        in_word = c.is_alphabetic();
    }

    titled
}
