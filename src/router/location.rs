use std::collections::BTreeMap;
use std::fmt;

use url::form_urlencoded;

/// Path plus query parameters, the part of a URL the site routes on.
///
/// Parameters are kept sorted by name, so two locations with the same
/// parameters always render the same `href`.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Location {
    path: String,
    params: BTreeMap<String, String>,
}

impl Location {
    /// The site root with no parameters.
    pub fn root() -> Self {
        Self {
            path: "/".to_string(),
            params: BTreeMap::new(),
        }
    }

    /// Parse `path[?query][#fragment]`. The fragment is dropped, a missing
    /// leading slash is added, and repeated parameters keep the last value.
    pub fn parse(location: &str) -> Self {
        let location = location.split('#').next().unwrap_or_default();
        let (path, query) = match location.split_once('?') {
            Some((path, query)) => (path, query),
            None => (location, ""),
        };

        let path = match path.trim() {
            "" => "/".to_string(),
            p if p.starts_with('/') => p.to_string(),
            p => format!("/{p}"),
        };
        let params = form_urlencoded::parse(query.as_bytes())
            .into_owned()
            .collect();

        Self { path, params }
    }

    pub fn path(&self) -> &str {
        &self.path
    }

    pub fn params(&self) -> &BTreeMap<String, String> {
        &self.params
    }

    pub fn param(&self, name: &str) -> Option<&str> {
        self.params.get(name).map(String::as_str)
    }

    /// Merge `params` into this location's query; same-named parameters are
    /// overwritten.
    pub fn with_params<K, V>(mut self, params: impl IntoIterator<Item = (K, V)>) -> Self
    where
        K: Into<String>,
        V: Into<String>,
    {
        for (name, value) in params {
            self.params.insert(name.into(), value.into());
        }
        self
    }

    /// Rendered link target: path plus encoded query.
    pub fn href(&self) -> String {
        if self.params.is_empty() {
            return self.path.clone();
        }
        let query = form_urlencoded::Serializer::new(String::new())
            .extend_pairs(&self.params)
            .finish();
        format!("{}?{}", self.path, query)
    }
}

impl fmt::Display for Location {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.href())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use proptest::prelude::*;

    #[test]
    fn test_parse_path_and_query() {
        let loc = Location::parse("/category?category=health&page=2#top");
        assert_eq!(loc.path(), "/category");
        assert_eq!(loc.param("category"), Some("health"));
        assert_eq!(loc.param("page"), Some("2"));
    }

    #[test]
    fn test_parse_normalizes_path() {
        assert_eq!(Location::parse("").path(), "/");
        assert_eq!(Location::parse("?q=x").path(), "/");
        assert_eq!(Location::parse("about").path(), "/about");
    }

    #[test]
    fn test_parse_decodes_query() {
        let loc = Location::parse("/search?q=rail+strike%21");
        assert_eq!(loc.param("q"), Some("rail strike!"));
    }

    #[test]
    fn test_with_params_overwrites() {
        let loc = Location::parse("/category?category=sports&page=3")
            .with_params([("category", "health")]);
        assert_eq!(loc.param("category"), Some("health"));
        assert_eq!(loc.param("page"), Some("3"));
    }

    #[test]
    fn test_href_encodes_and_sorts() {
        let loc = Location::parse("/article").with_params([("slug", "a b"), ("id", "7")]);
        assert_eq!(loc.href(), "/article?id=7&slug=a+b");
        assert_eq!(Location::root().href(), "/");
    }

    proptest! {
        #[test]
        fn href_parses_back(name in "[a-z]{1,8}", value in "[a-zA-Z0-9 &=?#/%+]{0,16}") {
            let loc = Location::parse("/category").with_params([(name, value)]);
            prop_assert_eq!(Location::parse(&loc.href()), loc);
        }
    }
}
