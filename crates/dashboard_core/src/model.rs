use std::fmt;
use std::marker::PhantomData;
use std::str::FromStr;

use serde::de::{MapAccess, Visitor};
use serde::{Deserialize, Deserializer};
use serde_json::{Map, Value};

/// Record identifier as sent by the webhook: either a number or a string.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Deserialize)]
#[serde(untagged)]
pub enum RecordId {
    Number(i64),
    Text(String),
}

impl fmt::Display for RecordId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RecordId::Number(n) => write!(f, "{n}"),
            RecordId::Text(s) => f.write_str(s),
        }
    }
}

/// One SKU row. Every field is optional on the wire; a malformed field
/// degrades to `None` or empty instead of failing the whole list.
#[derive(Debug, Clone, PartialEq, Default, Deserialize)]
pub struct SkuRecord {
    #[serde(default, deserialize_with = "lenient_id")]
    pub id: Option<RecordId>,
    #[serde(default, deserialize_with = "lenient_text")]
    pub sku: Option<String>,
    #[serde(default, deserialize_with = "lenient_text")]
    pub category: Option<String>,
    #[serde(default, deserialize_with = "lenient_text")]
    pub sub_category: Option<String>,
    #[serde(default, deserialize_with = "lenient_text")]
    pub status: Option<String>,
    #[serde(default, deserialize_with = "lenient_text")]
    pub image_processing_status: Option<String>,
    #[serde(default, deserialize_with = "lenient_text")]
    pub updated_at: Option<String>,
    #[serde(default, deserialize_with = "lenient_strings")]
    pub image_urls: Vec<String>,
    #[serde(default, deserialize_with = "lenient_strings")]
    pub image_urls_raw: Vec<String>,
    #[serde(default, deserialize_with = "lenient_entries")]
    pub search_result: Vec<SearchResultEntry>,
    #[serde(default, deserialize_with = "lenient_object")]
    pub attributes: Map<String, Value>,
    #[serde(default, deserialize_with = "lenient_object")]
    pub custom_attributes: Map<String, Value>,
}

#[derive(Debug, Clone, PartialEq, Default, Deserialize)]
pub struct SearchResultEntry {
    #[serde(default, deserialize_with = "lenient_text")]
    pub title: Option<String>,
    #[serde(default, deserialize_with = "lenient_text")]
    pub url: Option<String>,
    #[serde(default)]
    pub response: Option<SearchResponse>,
}

/// Verdict the scraping pipeline attached to one scraped page.
#[derive(Debug, Clone, PartialEq, Default, Deserialize)]
pub struct SearchResponse {
    #[serde(rename = "Category Match", default)]
    pub category_match: Option<bool>,
    #[serde(rename = "Is Product Page", default)]
    pub is_product_page: Option<bool>,
    #[serde(rename = "SKU Match Result", default)]
    pub sku_match_result: Option<SkuMatchResult>,
    #[serde(rename = "Product Information", default)]
    pub product_information: Option<Value>,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(from = "String")]
pub enum SkuMatchResult {
    FullMatch,
    PartialMatch,
    NoMatch,
    Other(String),
}

impl SkuMatchResult {
    pub fn as_str(&self) -> &str {
        match self {
            SkuMatchResult::FullMatch => "full_match",
            SkuMatchResult::PartialMatch => "partial_match",
            SkuMatchResult::NoMatch => "no_match",
            SkuMatchResult::Other(raw) => raw,
        }
    }
}

impl From<String> for SkuMatchResult {
    fn from(raw: String) -> Self {
        match raw.as_str() {
            "full_match" => SkuMatchResult::FullMatch,
            "partial_match" => SkuMatchResult::PartialMatch,
            "no_match" => SkuMatchResult::NoMatch,
            _ => SkuMatchResult::Other(raw),
        }
    }
}

impl fmt::Display for SkuMatchResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Scraping status filter offered by the list view. `All` sends no parameter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum StatusFilter {
    #[default]
    All,
    ScrapingDone,
    CategoryNotMatch,
    NoResult,
    FirecrawlScrapperError,
}

impl StatusFilter {
    pub const ALL: [StatusFilter; 5] = [
        StatusFilter::All,
        StatusFilter::ScrapingDone,
        StatusFilter::CategoryNotMatch,
        StatusFilter::NoResult,
        StatusFilter::FirecrawlScrapperError,
    ];

    /// Wire value; empty for `All`.
    pub fn as_str(self) -> &'static str {
        match self {
            StatusFilter::All => "",
            StatusFilter::ScrapingDone => "scraping_done",
            StatusFilter::CategoryNotMatch => "category_not_match",
            StatusFilter::NoResult => "no_result",
            StatusFilter::FirecrawlScrapperError => "firecrawl_scrapper_error",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            StatusFilter::All => "All",
            StatusFilter::ScrapingDone => "Scraping Done",
            StatusFilter::CategoryNotMatch => "Category Not Match",
            StatusFilter::NoResult => "No Result",
            StatusFilter::FirecrawlScrapperError => "Firecrawl Scrapper Error",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown status filter {0:?}")]
pub struct UnknownStatusFilter(pub String);

impl FromStr for StatusFilter {
    type Err = UnknownStatusFilter;

    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        let trimmed = raw.trim();
        if trimmed.is_empty() || trimmed.eq_ignore_ascii_case("all") {
            return Ok(StatusFilter::All);
        }
        StatusFilter::ALL
            .into_iter()
            .find(|filter| filter.as_str().eq_ignore_ascii_case(trimmed))
            .ok_or_else(|| UnknownStatusFilter(raw.to_string()))
    }
}

/// Query parameters for the list endpoint. `None` fields are omitted.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct SkuQuery {
    pub status: Option<StatusFilter>,
    pub sku: Option<String>,
}

impl SkuQuery {
    pub fn new(status: StatusFilter, sku_search: &str) -> Self {
        let sku = sku_search.trim();
        Self {
            status: (status != StatusFilter::All).then_some(status),
            sku: (!sku.is_empty()).then(|| sku.to_string()),
        }
    }
}

/// Count and source-provided share of one status within a category.
#[derive(Debug, Clone, Copy, PartialEq, Default, Deserialize)]
pub struct StatusCount {
    #[serde(default, deserialize_with = "lenient_count")]
    pub status_count: u64,
    #[serde(default, deserialize_with = "lenient_percentage")]
    pub percentage: f64,
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct CategoryStats {
    pub category: String,
    pub statuses: Vec<(String, StatusCount)>,
}

/// Category -> status -> count, in document order.
#[derive(Debug, Clone, PartialEq, Default, Deserialize)]
#[serde(from = "OrderedEntries<OrderedEntries<StatusCount>>")]
pub struct StatsMap {
    categories: Vec<CategoryStats>,
}

impl StatsMap {
    pub fn new(categories: Vec<CategoryStats>) -> Self {
        Self { categories }
    }

    pub fn categories(&self) -> &[CategoryStats] {
        &self.categories
    }

    pub fn is_empty(&self) -> bool {
        self.categories.is_empty()
    }

    pub fn len(&self) -> usize {
        self.categories.len()
    }
}

impl From<OrderedEntries<OrderedEntries<StatusCount>>> for StatsMap {
    fn from(entries: OrderedEntries<OrderedEntries<StatusCount>>) -> Self {
        let categories = entries
            .0
            .into_iter()
            .map(|(category, statuses)| CategoryStats {
                category,
                statuses: statuses.0,
            })
            .collect();
        Self { categories }
    }
}

/// An n8n workflow and whether it is currently active.
#[derive(Debug, Clone, PartialEq, Default, Deserialize)]
pub struct Workflow {
    #[serde(default)]
    pub workflow_id: Option<RecordId>,
    #[serde(default)]
    pub workflow_name: Option<String>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub running: bool,
    #[serde(default, deserialize_with = "null_as_default")]
    pub workflow_tags: Vec<String>,
}

/// JSON object entries in document order.
#[doc(hidden)]
#[derive(Debug)]
pub struct OrderedEntries<V>(Vec<(String, V)>);

impl<'de, V: Deserialize<'de>> Deserialize<'de> for OrderedEntries<V> {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        struct EntriesVisitor<V>(PhantomData<V>);

        impl<'de, V: Deserialize<'de>> Visitor<'de> for EntriesVisitor<V> {
            type Value = OrderedEntries<V>;

            fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str("a JSON object")
            }

            fn visit_map<A: MapAccess<'de>>(self, mut map: A) -> Result<Self::Value, A::Error> {
                let mut entries = Vec::with_capacity(map.size_hint().unwrap_or(0));
                while let Some((key, value)) = map.next_entry::<String, V>()? {
                    entries.push((key, value));
                }
                Ok(OrderedEntries(entries))
            }
        }

        deserializer.deserialize_map(EntriesVisitor(PhantomData))
    }
}

fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de> + Default,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

fn scalar_text(value: Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        _ => None,
    }
}

// Numeric SKU codes and similar scalars are shown as text.
fn lenient_text<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<String>, D::Error> {
    Ok(scalar_text(Value::deserialize(deserializer)?))
}

fn lenient_id<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<RecordId>, D::Error> {
    Ok(match Value::deserialize(deserializer)? {
        Value::Number(n) => Some(match n.as_i64() {
            Some(id) => RecordId::Number(id),
            None => RecordId::Text(n.to_string()),
        }),
        Value::String(s) => Some(RecordId::Text(s)),
        _ => None,
    })
}

/// Keeps the string items of an array; anything else yields an empty list.
fn lenient_strings<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Vec<String>, D::Error> {
    Ok(match Value::deserialize(deserializer)? {
        Value::Array(items) => items
            .into_iter()
            .filter_map(|item| match item {
                Value::String(s) => Some(s),
                _ => None,
            })
            .collect(),
        _ => Vec::new(),
    })
}

fn lenient_entries<'de, D: Deserializer<'de>>(
    deserializer: D,
) -> Result<Vec<SearchResultEntry>, D::Error> {
    Ok(match Value::deserialize(deserializer)? {
        Value::Array(items) => items
            .into_iter()
            .filter_map(|item| serde_json::from_value(item).ok())
            .collect(),
        _ => Vec::new(),
    })
}

fn lenient_object<'de, D: Deserializer<'de>>(
    deserializer: D,
) -> Result<Map<String, Value>, D::Error> {
    Ok(match Value::deserialize(deserializer)? {
        Value::Object(map) => map,
        _ => Map::new(),
    })
}

// Database-backed webhooks sometimes send counts as strings.
fn lenient_count<'de, D: Deserializer<'de>>(deserializer: D) -> Result<u64, D::Error> {
    let value = Value::deserialize(deserializer)?;
    Ok(match value {
        Value::Number(n) => n
            .as_u64()
            .or_else(|| n.as_f64().filter(|f| *f >= 0.0).map(|f| f as u64))
            .unwrap_or(0),
        Value::String(s) => s.trim().parse().unwrap_or(0),
        _ => 0,
    })
}

fn lenient_percentage<'de, D: Deserializer<'de>>(deserializer: D) -> Result<f64, D::Error> {
    let value = Value::deserialize(deserializer)?;
    Ok(match value {
        Value::Number(n) => n.as_f64().unwrap_or(0.0),
        Value::String(s) => s.trim().parse().unwrap_or(0.0),
        _ => 0.0,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn record_tolerates_missing_and_null_fields() {
        let record: SkuRecord = serde_json::from_value(json!({
            "id": 7,
            "sku": "ABC-1",
            "image_urls": null,
            "attributes": null
        }))
        .unwrap();
        assert_eq!(record.id, Some(RecordId::Number(7)));
        assert_eq!(record.sku.as_deref(), Some("ABC-1"));
        assert!(record.category.is_none());
        assert!(record.image_urls.is_empty());
        assert!(record.attributes.is_empty());
        assert!(record.search_result.is_empty());
    }

    #[test]
    fn one_malformed_record_does_not_fail_the_list() {
        let records: Vec<SkuRecord> = serde_json::from_value(json!([
            { "sku": "A-1" },
            {
                "id": 1.5,
                "sku": 12345,
                "status": true,
                "category": { "nested": 1 },
                "image_urls": ["https://img/a.png", null, 3],
                "image_urls_raw": "https://img/b.png",
                "search_result": [{ "title": 9, "url": "https://shop" }, "junk"],
                "attributes": []
            }
        ]))
        .unwrap();
        assert_eq!(records.len(), 2);
        let record = &records[1];
        assert_eq!(record.id, Some(RecordId::Text("1.5".to_string())));
        assert_eq!(record.sku.as_deref(), Some("12345"));
        assert_eq!(record.status.as_deref(), Some("true"));
        assert_eq!(record.category, None);
        assert_eq!(record.image_urls, vec!["https://img/a.png".to_string()]);
        assert!(record.image_urls_raw.is_empty());
        assert_eq!(record.search_result.len(), 1);
        assert_eq!(record.search_result[0].title.as_deref(), Some("9"));
        assert!(record.attributes.is_empty());
    }

    #[test]
    fn sku_match_result_keeps_unknown_values() {
        let response: SearchResponse = serde_json::from_value(json!({
            "Category Match": true,
            "SKU Match Result": "fuzzy_match"
        }))
        .unwrap();
        assert_eq!(response.category_match, Some(true));
        assert_eq!(response.is_product_page, None);
        assert_eq!(
            response.sku_match_result,
            Some(SkuMatchResult::Other("fuzzy_match".to_string()))
        );
    }

    #[test]
    fn stats_map_keeps_document_order_and_coerces_counts() {
        let stats: StatsMap = serde_json::from_str(
            r#"{"zeta": {"pending": {"status_count": "4", "percentage": 40.0}},
                "alpha": {"scraping_done": {"status_count": 6}}}"#,
        )
        .unwrap();
        let names: Vec<_> = stats.categories().iter().map(|c| c.category.as_str()).collect();
        assert_eq!(names, vec!["zeta", "alpha"]);
        assert_eq!(stats.categories()[0].statuses[0].1.status_count, 4);
        assert_eq!(stats.categories()[1].statuses[0].1.percentage, 0.0);
    }

    #[test]
    fn status_filter_parses_wire_values() {
        assert_eq!("".parse::<StatusFilter>(), Ok(StatusFilter::All));
        assert_eq!("All".parse::<StatusFilter>(), Ok(StatusFilter::All));
        assert_eq!(
            "no_result".parse::<StatusFilter>(),
            Ok(StatusFilter::NoResult)
        );
        assert!("pending".parse::<StatusFilter>().is_err());
    }

    #[test]
    fn query_trims_search_and_omits_all() {
        assert_eq!(SkuQuery::new(StatusFilter::All, "   "), SkuQuery::default());
        assert_eq!(
            SkuQuery::new(StatusFilter::ScrapingDone, "  ab c "),
            SkuQuery {
                status: Some(StatusFilter::ScrapingDone),
                sku: Some("ab c".to_string()),
            }
        );
    }
}
