//! Search service client
//!
//! Keyword product search and keyword aggregation over an
//! Elasticsearch-compatible REST API.

use std::time::Duration;
use reqwest::Client;
use serde::Deserialize;
use serde_json::{json, Value};
use tracing::debug;
use url::Url;
use crate::config::SearchConfig;
use crate::models::{Bucket, Product};
use crate::utils::errors::{SearchError, SearchResult, SkillflowError, Result};

/// Raw search response, only the parts we read
#[derive(Debug, Deserialize)]
struct SearchResponse {
    hits: Hits,
    #[serde(default)]
    aggregations: Option<Value>,
}

#[derive(Debug, Deserialize)]
struct Hits {
    total: HitsTotal,
    #[serde(default)]
    hits: Vec<Hit>,
}

/// Older servers report a plain count, newer ones an object
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum HitsTotal {
    Count(u64),
    Object { value: u64 },
}

impl HitsTotal {
    fn value(&self) -> u64 {
        match self {
            HitsTotal::Count(n) => *n,
            HitsTotal::Object { value } => *value,
        }
    }
}

#[derive(Debug, Deserialize)]
struct Hit {
    #[serde(rename = "_id")]
    id: String,
    #[serde(rename = "_source")]
    source: Value,
}

#[derive(Debug, Deserialize)]
struct ProductSource {
    #[serde(alias = "Name")]
    name: String,
    #[serde(alias = "Price")]
    price: u64,
}

#[derive(Debug, Deserialize)]
struct KeywordAggregations {
    keywords: KeywordBuckets,
}

#[derive(Debug, Deserialize)]
struct KeywordBuckets {
    buckets: Vec<Bucket>,
}

/// Client for the product search service
#[derive(Debug, Clone)]
pub struct SearchClient {
    client: Client,
    base_url: Url,
    config: SearchConfig,
}

impl SearchClient {
    /// Create a new SearchClient instance
    pub fn new(config: SearchConfig) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_seconds))
            .user_agent("Skillflow/1.0")
            .build()
            .map_err(SkillflowError::Http)?;
        let base_url = Url::parse(&config.url)?;

        Ok(Self {
            client,
            base_url,
            config,
        })
    }

    /// Find up to `count` products of type `typ` matching `query`
    pub async fn find_products(&self, query: &str, typ: &str, count: usize) -> SearchResult<Vec<Product>> {
        let body = json!({
            "size": count,
            "query": {
                "match": { "_all": query }
            }
        });

        let response = self.search(typ, &body).await?;
        if response.hits.total.value() == 0 {
            return Ok(Vec::new());
        }

        let mut products = Vec::with_capacity(response.hits.hits.len());
        for hit in response.hits.hits {
            let source: ProductSource = serde_json::from_value(hit.source)
                .map_err(|e| SearchError::InvalidResponse(format!("product {}: {}", hit.id, e)))?;
            products.push(Product {
                id: hit.id,
                name: source.name,
                price: source.price,
            });
        }

        debug!(query = query, typ = typ, found = products.len(), "Product search completed");
        Ok(products)
    }

    /// Most frequent review keywords for products of type `typ`
    pub async fn find_product_keywords(&self, typ: &str) -> SearchResult<Vec<Bucket>> {
        let body = json!({
            "size": 0,
            "aggs": {
                "keywords": {
                    "terms": {
                        "field": self.config.keyword_field,
                        "size": self.config.keyword_size,
                        "min_doc_count": self.config.keyword_min_doc_count,
                    }
                }
            }
        });

        let response = self.search(typ, &body).await?;
        let aggregations = response.aggregations
            .ok_or_else(|| SearchError::InvalidResponse("missing aggregations".to_string()))?;
        let parsed: KeywordAggregations = serde_json::from_value(aggregations)
            .map_err(|e| SearchError::InvalidResponse(e.to_string()))?;

        debug!(typ = typ, buckets = parsed.keywords.buckets.len(), "Keyword aggregation completed");
        Ok(parsed.keywords.buckets)
    }

    async fn search(&self, typ: &str, body: &Value) -> SearchResult<SearchResponse> {
        let url = self.search_url(typ)?;
        debug!(url = %url, "Making search request");

        let mut request = self.client.post(url).json(body);
        if let (Some(username), Some(password)) = (&self.config.username, &self.config.password) {
            request = request.basic_auth(username, Some(password));
        }

        let response = request.send().await.map_err(|e| {
            if e.is_timeout() {
                SearchError::Timeout
            } else if e.is_connect() {
                SearchError::ServiceUnavailable
            } else {
                SearchError::RequestFailed(e.to_string())
            }
        })?;

        if !response.status().is_success() {
            let status = response.status();
            let error_text = response.text().await.unwrap_or_default();
            return Err(SearchError::RequestFailed(format!("HTTP {}: {}", status, error_text)));
        }

        response.json::<SearchResponse>().await
            .map_err(|e| SearchError::InvalidResponse(e.to_string()))
    }

    fn search_url(&self, typ: &str) -> SearchResult<Url> {
        let path = if typ.is_empty() {
            format!("{}/_search", self.config.index)
        } else {
            format!("{}/{}/_search", self.config.index, typ)
        };
        self.base_url.join(&path)
            .map_err(|e| SearchError::RequestFailed(format!("invalid search path {}: {}", path, e)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Settings;

    #[test]
    fn test_search_url_with_type() {
        let client = SearchClient::new(Settings::default().search).unwrap();
        assert_eq!(
            client.search_url("shirts").unwrap().as_str(),
            "http://localhost:9200/products/shirts/_search"
        );
        assert_eq!(
            client.search_url("").unwrap().as_str(),
            "http://localhost:9200/products/_search"
        );
    }

    #[test]
    fn test_hits_total_formats() {
        let old: HitsTotal = serde_json::from_str("7").unwrap();
        let new: HitsTotal = serde_json::from_str(r#"{"value": 7, "relation": "eq"}"#).unwrap();
        assert_eq!(old.value(), 7);
        assert_eq!(new.value(), 7);
    }
}
