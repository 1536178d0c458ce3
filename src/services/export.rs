//! Shareable export links for executed queries

use anyhow::{Context, Result};
use url::Url;

/// Encodes query text as a link to the server's export endpoint
#[derive(Debug, Clone)]
pub struct ExportLink {
    endpoint: Url,
}

impl ExportLink {
    /// Build from a server base url such as `http://localhost:9000`
    pub fn new(base_url: &str) -> Result<Self> {
        let base = Url::parse(base_url)
            .with_context(|| format!("invalid export base url '{}'", base_url))?;
        if base.cannot_be_a_base() {
            anyhow::bail!("export base url '{}' cannot carry a path", base_url);
        }
        let mut endpoint = base;
        endpoint.set_path("/exp");
        endpoint.set_query(None);
        endpoint.set_fragment(None);
        Ok(Self { endpoint })
    }

    /// Export url for a query
    pub fn encode(&self, query: &str) -> String {
        let mut url = self.endpoint.clone();
        url.query_pairs_mut().append_pair("query", query);
        url.into()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_encode_simple_query() {
        let link = ExportLink::new("http://localhost:9000").unwrap();
        assert_eq!(
            link.encode("select 1"),
            "http://localhost:9000/exp?query=select+1"
        );
    }

    #[test]
    fn test_encode_escapes_reserved_characters() {
        let link = ExportLink::new("https://db.example.com/console?x=1#frag").unwrap();
        let url = link.encode("select * from t where a = 'x&y'");
        assert!(url.starts_with("https://db.example.com/exp?query="));
        assert!(!url.contains("x=1"));
        assert!(url.contains("x%26y"));

        let parsed = Url::parse(&url).unwrap();
        let (_, query) = parsed.query_pairs().next().unwrap();
        assert_eq!(query, "select * from t where a = 'x&y'");
    }

    #[test]
    fn test_invalid_base_url() {
        assert!(ExportLink::new("not a url").is_err());
        assert!(ExportLink::new("mailto:someone@example.com").is_err());
    }
}
