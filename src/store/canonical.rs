use std::collections::HashMap;

/// Normal form used when matching raw district keys: trimmed, whitespace
/// collapsed, lowercase.
pub fn normalize_key(raw: &str) -> String {
    raw.split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
        .to_lowercase()
}

/// Lookup from raw feed codes and canonical names to the canonical name.
#[derive(Debug, Clone, Default)]
pub struct CanonicalIndex {
    keys: HashMap<String, String>,
}

impl CanonicalIndex {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, canonical: &str, code: Option<&str>) {
        self.keys
            .insert(normalize_key(canonical), canonical.to_string());
        if let Some(code) = code {
            self.keys.insert(normalize_key(code), canonical.to_string());
        }
    }

    pub fn resolve(&self, raw: &str) -> Option<&str> {
        self.keys.get(&normalize_key(raw)).map(|s| s.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn resolves_codes_and_names() {
        let mut index = CanonicalIndex::new();
        index.insert("East St. George", Some("ESG"));

        assert_eq!(index.resolve("ESG"), Some("East St. George"));
        assert_eq!(index.resolve("esg "), Some("East St. George"));
        assert_eq!(index.resolve("east  st. george"), Some("East St. George"));
        assert_eq!(index.resolve("West St. George"), None);
    }
}
