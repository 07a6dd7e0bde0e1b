use url::form_urlencoded;

/// Raw list query parameters, in request order, with repeated keys preserved.
#[derive(Debug, Clone, Default)]
pub struct ListParams {
    pairs: Vec<(String, String)>,
}

impl ListParams {
    pub fn parse(raw: Option<&str>) -> Self {
        let pairs = raw
            .map(|q| form_urlencoded::parse(q.as_bytes()).into_owned().collect())
            .unwrap_or_default();
        Self { pairs }
    }

    /// First value of a scalar parameter (`sort`, `search`, `limit`, `offset`).
    pub fn get(&self, key: &str) -> Option<&str> {
        self.pairs.iter().find(|(k, _)| k == key).map(|(_, v)| v.as_str())
    }

    /// Every `filter[...]` entry, including malformed ones.
    pub fn filter_entries(&self) -> impl Iterator<Item = (&str, &str)> {
        self.pairs
            .iter()
            .filter(|(k, _)| k.starts_with("filter["))
            .map(|(k, v)| (k.as_str(), v.as_str()))
    }

    /// Parameters that page links must carry over: filters, sort and search.
    pub fn carried(&self) -> Vec<(&str, &str)> {
        self.pairs
            .iter()
            .filter(|(k, _)| k.starts_with("filter[") || k == "sort" || k == "search")
            .map(|(k, v)| (k.as_str(), v.as_str()))
            .collect()
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for ListParams {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self { pairs: iter.into_iter().map(|(k, v)| (k.into(), v.into())).collect() }
    }
}
