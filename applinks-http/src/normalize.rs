//! Normalization of the link service's historical payload shapes.
//!
//! The service has produced three body shapes over time: the current rich
//! contract (`categories` array plus metadata), a map of category labels to
//! link arrays, and a map of category labels to single links. All of them
//! collapse into [`LinkSet`]; anything inside a payload that cannot be
//! resolved degrades to an empty category instead of failing the fetch.

use chrono::{DateTime, Utc};
use serde::de::Error as _;
use serde::{Deserialize, Deserializer};
use serde_json::Value;

use crate::types::{Category, CategoryStatus, Link, LinkSet, GENERIC_ICON, NO_DATA_MESSAGE};

/// Rows per grid column when the payload does not say otherwise.
pub const DEFAULT_MAX_ROWS: usize = 4;

/// A decoded body in whichever shape the service sent.
#[derive(Debug)]
pub enum RawPayload {
    Rich(RichPayload),
    Map(serde_json::Map<String, Value>),
}

impl RawPayload {
    /// Classify a decoded body. An object carrying a `categories` key is the
    /// rich contract and must parse as such; any other object is treated as
    /// the legacy label map. Non-objects are rejected outright.
    pub fn from_value(value: Value) -> Result<Self, serde_json::Error> {
        match value {
            Value::Object(fields) if fields.contains_key("categories") => {
                serde_json::from_value(Value::Object(fields)).map(RawPayload::Rich)
            }
            Value::Object(fields) => Ok(RawPayload::Map(fields)),
            _ => Err(serde_json::Error::custom("expected a JSON object")),
        }
    }
}

impl<'de> Deserialize<'de> for RawPayload {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let value = Value::deserialize(deserializer)?;
        Self::from_value(value).map_err(D::Error::custom)
    }
}

/// Current wire contract. Only the `categories` array itself is structural;
/// every field inside it resolves leniently so one bad category never
/// rejects the body.
#[derive(Debug, Deserialize)]
pub struct RichPayload {
    categories: Vec<Value>,
    #[serde(default, deserialize_with = "lenient")]
    last_updated: Option<String>,
    #[serde(default, deserialize_with = "lenient")]
    metadata: Option<RawMetadata>,
}

#[derive(Debug, Deserialize)]
struct RawMetadata {
    #[serde(default, deserialize_with = "lenient")]
    max_rows: Option<i64>,
}

/// One category as sent by the service; every field is optional, and a
/// wrong-typed one counts as unresolvable, so a partial object degrades
/// instead of failing the payload.
#[derive(Debug, Deserialize)]
struct RawCategory {
    #[serde(default, deserialize_with = "lenient")]
    id: Option<String>,
    #[serde(default, deserialize_with = "lenient")]
    label: Option<String>,
    #[serde(default, deserialize_with = "lenient")]
    icon: Option<String>,
    #[serde(default)]
    status: Option<Value>,
    #[serde(default, deserialize_with = "lenient")]
    message: Option<String>,
    #[serde(default)]
    links: Option<Value>,
}

/// A field that fails to resolve reads as absent instead of poisoning the
/// structure around it.
fn lenient<'de, D, T>(deserializer: D) -> Result<Option<T>, D::Error>
where
    D: Deserializer<'de>,
    T: serde::de::DeserializeOwned,
{
    let value = Value::deserialize(deserializer)?;
    Ok(serde_json::from_value(value).ok())
}

/// Normalize a payload into the canonical link set.
///
/// Category order follows the payload: array order for the rich shape,
/// insertion order for the map shapes.
pub fn normalize(payload: RawPayload) -> LinkSet {
    match payload {
        RawPayload::Rich(rich) => LinkSet {
            categories: rich.categories.into_iter().map(rich_category).collect(),
            last_updated: rich.last_updated.as_deref().and_then(parse_timestamp),
            max_rows: rich
                .metadata
                .and_then(|metadata| metadata.max_rows)
                .filter(|&rows| rows >= 1)
                .map(|rows| rows as usize)
                .unwrap_or(DEFAULT_MAX_ROWS),
        },
        RawPayload::Map(entries) => LinkSet {
            categories: entries
                .iter()
                .map(|(label, value)| category_from_entry(label, value))
                .collect(),
            last_updated: None,
            max_rows: DEFAULT_MAX_ROWS,
        },
    }
}

fn rich_category(value: Value) -> Category {
    match serde_json::from_value(value) {
        Ok(raw) => normalize_category(raw),
        // Not even an object: an unnamed empty category holds its slot.
        Err(_) => Category {
            id: None,
            label: String::new(),
            icon: GENERIC_ICON.to_owned(),
            status: CategoryStatus::Empty,
            message: Some(NO_DATA_MESSAGE.to_owned()),
            links: Vec::new(),
        },
    }
}

fn normalize_category(raw: RawCategory) -> Category {
    let id = raw.id;
    let icon = raw
        .icon
        .filter(|icon| !icon.is_empty())
        .unwrap_or_else(|| GENERIC_ICON.to_owned());
    let message = raw.message.filter(|message| !message.is_empty());

    let Some(label) = raw.label.filter(|label| !label.is_empty()) else {
        // A category we cannot even name still occupies its slot.
        return Category {
            label: id.clone().unwrap_or_default(),
            id,
            icon,
            status: CategoryStatus::Empty,
            message: Some(NO_DATA_MESSAGE.to_owned()),
            links: Vec::new(),
        };
    };

    let resolved: Option<Vec<Link>> = match &raw.links {
        None | Some(Value::Null) => Some(Vec::new()),
        Some(Value::Array(values)) => values.iter().map(|value| link_from_value(&label, value)).collect(),
        // A `links` in no recognizable shape resolves like a broken link.
        Some(_) => None,
    };

    // A present-but-non-string `status` is unresolvable and lands in the
    // degradation arm below, like an unknown status word.
    let status: Option<String> = raw.status.and_then(|value| match value {
        Value::Null => None,
        Value::String(word) => Some(word),
        _ => Some(String::new()),
    });

    match (status.as_deref(), resolved) {
        (Some("empty"), _) => Category {
            id,
            label,
            icon,
            status: CategoryStatus::Empty,
            message,
            links: Vec::new(),
        },
        (Some("error"), _) => Category {
            id,
            label,
            icon,
            status: CategoryStatus::Error,
            message,
            links: Vec::new(),
        },
        (Some("ok") | None, Some(links)) if !links.is_empty() => Category {
            id,
            label,
            icon,
            status: CategoryStatus::Ok,
            message,
            links,
        },
        (None, Some(_)) => Category {
            id,
            label,
            icon,
            status: CategoryStatus::Empty,
            message,
            links: Vec::new(),
        },
        // `ok` without a usable link, an unknown status word, or a link that
        // would not resolve: degrade to the generic empty notice.
        _ => Category {
            id,
            label,
            icon,
            status: CategoryStatus::Empty,
            message: Some(NO_DATA_MESSAGE.to_owned()),
            links: Vec::new(),
        },
    }
}

fn category_from_entry(label: &str, value: &Value) -> Category {
    let links: Option<Vec<Link>> = match value {
        Value::Array(items) => items.iter().map(|item| link_from_value(label, item)).collect(),
        other => link_from_value(label, other).map(|link| vec![link]),
    };

    match links {
        Some(links) if !links.is_empty() => Category {
            id: None,
            label: label.to_owned(),
            icon: category_icon(label).to_owned(),
            status: CategoryStatus::Ok,
            message: None,
            links,
        },
        // Empty arrays and values in no recognizable shape both land here.
        _ => Category {
            id: None,
            label: label.to_owned(),
            icon: category_icon(label).to_owned(),
            status: CategoryStatus::Empty,
            message: Some(NO_DATA_MESSAGE.to_owned()),
            links: Vec::new(),
        },
    }
}

/// Resolve one link value. Bare strings take the owning category's label;
/// objects must carry a non-empty `url`.
fn link_from_value(owner: &str, value: &Value) -> Option<Link> {
    match value {
        Value::String(url) if !url.is_empty() => Some(Link {
            label: Some(owner.to_owned()),
            url: url.clone(),
        }),
        Value::Object(fields) => {
            let url = fields.get("url").and_then(Value::as_str).filter(|url| !url.is_empty())?;
            let label = fields.get("label").and_then(Value::as_str).map(str::to_owned);
            Some(Link {
                label,
                url: url.to_owned(),
            })
        }
        _ => None,
    }
}

fn parse_timestamp(raw: &str) -> Option<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(raw)
        .ok()
        .map(|stamp| stamp.with_timezone(&Utc))
}

/// Icon for a map-form category, keyed by its label.
pub fn category_icon(label: &str) -> &'static str {
    match label.to_ascii_lowercase().as_str() {
        "dashboards" | "dashboard" => "󰕮",
        "logs" | "logging" => "󰆍",
        "metrics" | "monitoring" => "󰄨",
        "docs" | "documentation" | "runbook" | "runbooks" => "󰈙",
        "alerts" | "alerting" => "󰂚",
        "source" | "repository" => "󰊢",
        _ => GENERIC_ICON,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn parse(value: Value) -> LinkSet {
        normalize(RawPayload::from_value(value).unwrap())
    }

    #[test]
    fn rich_payload_passes_through() {
        let set = parse(json!({
            "categories": [
                {
                    "id": "dash",
                    "label": "Dashboards",
                    "icon": "󰕮",
                    "status": "ok",
                    "links": [
                        {"label": "Grafana", "url": "https://grafana.example/d/1"},
                        {"url": "https://kibana.example"}
                    ]
                }
            ],
            "last_updated": "2026-08-22T10:15:00Z",
            "metadata": {"max_rows": 6}
        }));

        assert_eq!(set.max_rows, 6);
        assert!(set.last_updated.is_some());
        assert_eq!(set.categories.len(), 1);

        let category = &set.categories[0];
        assert_eq!(category.status, CategoryStatus::Ok);
        assert_eq!(category.links.len(), 2);
        assert_eq!(category.links[0].label.as_deref(), Some("Grafana"));
        assert_eq!(category.links[1].label, None);
    }

    #[test]
    fn rich_payload_fills_defaults() {
        let set = parse(json!({
            "categories": [
                {"label": "Logs", "links": ["https://logs.example/app"]}
            ]
        }));

        let category = &set.categories[0];
        assert_eq!(category.status, CategoryStatus::Ok, "links present implies ok");
        assert_eq!(category.icon, GENERIC_ICON);
        assert_eq!(category.links[0].label.as_deref(), Some("Logs"));
        assert_eq!(set.max_rows, DEFAULT_MAX_ROWS);
        assert_eq!(set.last_updated, None);
    }

    #[test]
    fn missing_links_infer_empty_status() {
        let set = parse(json!({"categories": [{"label": "Docs"}]}));
        assert_eq!(set.categories[0].status, CategoryStatus::Empty);
        assert!(set.categories[0].links.is_empty());
    }

    #[test]
    fn ok_without_links_degrades() {
        let set = parse(json!({
            "categories": [{"label": "Docs", "status": "ok", "links": []}]
        }));

        let category = &set.categories[0];
        assert_eq!(category.status, CategoryStatus::Empty);
        assert_eq!(category.message.as_deref(), Some(NO_DATA_MESSAGE));
    }

    #[test]
    fn unknown_status_degrades() {
        let set = parse(json!({
            "categories": [{"label": "Docs", "status": "splendid", "links": ["https://docs.example"]}]
        }));

        let category = &set.categories[0];
        assert_eq!(category.status, CategoryStatus::Empty);
        assert_eq!(category.message.as_deref(), Some(NO_DATA_MESSAGE));
        assert!(category.links.is_empty());
    }

    #[test]
    fn unresolvable_link_degrades_its_category() {
        let set = parse(json!({
            "categories": [
                {"label": "Dashboards", "links": [{"label": "no url here"}]},
                {"label": "Logs", "links": ["https://logs.example"]}
            ]
        }));

        assert_eq!(set.categories[0].status, CategoryStatus::Empty);
        assert!(set.categories[0].links.is_empty());
        assert_eq!(set.categories[1].status, CategoryStatus::Ok, "other categories are untouched");
    }

    #[test]
    fn wrong_typed_links_degrade_their_category_only() {
        let set = parse(json!({
            "categories": [
                {"label": "Docs", "links": "broken"},
                {"label": "Logs", "links": ["https://x/logs"]}
            ]
        }));

        assert_eq!(set.categories.len(), 2);
        let docs = &set.categories[0];
        assert_eq!(docs.label, "Docs");
        assert_eq!(docs.status, CategoryStatus::Empty);
        assert_eq!(docs.message.as_deref(), Some(NO_DATA_MESSAGE));
        assert!(docs.links.is_empty());
        assert_eq!(set.categories[1].status, CategoryStatus::Ok);
    }

    #[test]
    fn wrong_typed_label_and_status_degrade_in_place() {
        let set = parse(json!({
            "categories": [
                {"id": "dash", "label": 7, "links": ["https://x"]},
                {"label": "Logs", "status": 3, "links": ["https://x/logs"]}
            ]
        }));

        let unnamed = &set.categories[0];
        assert_eq!(unnamed.label, "dash", "a wrong-typed label falls back to the id");
        assert_eq!(unnamed.status, CategoryStatus::Empty);

        let logs = &set.categories[1];
        assert_eq!(logs.status, CategoryStatus::Empty);
        assert_eq!(logs.message.as_deref(), Some(NO_DATA_MESSAGE));
    }

    #[test]
    fn non_object_category_elements_hold_their_slot() {
        let set = parse(json!({
            "categories": [42, {"label": "Logs", "links": ["https://x/logs"]}]
        }));

        assert_eq!(set.categories.len(), 2);
        assert_eq!(set.categories[0].status, CategoryStatus::Empty);
        assert_eq!(set.categories[0].message.as_deref(), Some(NO_DATA_MESSAGE));
        assert_eq!(set.categories[1].status, CategoryStatus::Ok);
    }

    #[test]
    fn error_status_keeps_its_message() {
        let set = parse(json!({
            "categories": [{"label": "Metrics", "status": "error", "message": "scrape failed"}]
        }));

        let category = &set.categories[0];
        assert_eq!(category.status, CategoryStatus::Error);
        assert_eq!(category.message.as_deref(), Some("scrape failed"));
    }

    #[test]
    fn map_of_arrays_preserves_entry_order() {
        let set = parse(json!({
            "Dashboards": ["https://grafana.example/d/1", {"label": "Kibana", "url": "https://kibana.example"}],
            "Logs": ["https://logs.example/app"],
            "Docs": []
        }));

        let labels: Vec<&str> = set.categories.iter().map(|c| c.label.as_str()).collect();
        assert_eq!(labels, ["Dashboards", "Logs", "Docs"]);

        let dashboards = &set.categories[0];
        assert_eq!(dashboards.icon, "󰕮");
        assert_eq!(dashboards.links[0].label.as_deref(), Some("Dashboards"), "bare URLs take the category label");
        assert_eq!(dashboards.links[1].label.as_deref(), Some("Kibana"));

        let docs = &set.categories[2];
        assert_eq!(docs.status, CategoryStatus::Empty);
        assert_eq!(docs.message.as_deref(), Some(NO_DATA_MESSAGE));
    }

    #[test]
    fn map_of_single_links_wraps_each_value() {
        let set = parse(json!({"Logs": "https://x/logs"}));

        assert_eq!(set.categories.len(), 1);
        let category = &set.categories[0];
        assert_eq!(category.label, "Logs");
        assert_eq!(category.status, CategoryStatus::Ok);
        assert_eq!(category.links.len(), 1);
        assert_eq!(category.links[0].url, "https://x/logs");
        assert_eq!(category.links[0].label.as_deref(), Some("Logs"));
    }

    #[test]
    fn senseless_map_value_degrades_its_entry() {
        let set = parse(json!({"Logs": 17, "Docs": "https://docs.example"}));

        assert_eq!(set.categories[0].status, CategoryStatus::Empty);
        assert_eq!(set.categories[0].message.as_deref(), Some(NO_DATA_MESSAGE));
        assert_eq!(set.categories[1].status, CategoryStatus::Ok);
    }

    #[test]
    fn explicit_categories_key_wins_over_map_reading() {
        // A rich body that also happens to be a valid map must parse as rich.
        let payload = RawPayload::from_value(json!({"categories": []})).unwrap();
        assert!(matches!(payload, RawPayload::Rich(_)));
        assert!(parse(json!({"categories": []})).categories.is_empty());
    }

    #[test]
    fn non_object_payload_is_rejected() {
        assert!(RawPayload::from_value(json!(["https://x"])).is_err());
        assert!(RawPayload::from_value(json!("https://x")).is_err());
    }

    #[test]
    fn malformed_rich_categories_are_rejected() {
        assert!(RawPayload::from_value(json!({"categories": "nope"})).is_err());
    }

    #[test]
    fn bad_timestamp_and_max_rows_fall_back() {
        let set = parse(json!({
            "categories": [],
            "last_updated": "yesterdayish",
            "metadata": {"max_rows": 0}
        }));

        assert_eq!(set.last_updated, None);
        assert_eq!(set.max_rows, DEFAULT_MAX_ROWS);
    }

    #[test]
    fn wrong_typed_metadata_falls_back() {
        let set = parse(json!({
            "categories": [{"label": "Logs", "links": ["https://x/logs"]}],
            "last_updated": 1234,
            "metadata": {"max_rows": "six"}
        }));

        assert_eq!(set.last_updated, None);
        assert_eq!(set.max_rows, DEFAULT_MAX_ROWS);
        assert_eq!(set.categories[0].status, CategoryStatus::Ok, "the body itself still normalizes");
    }

    #[test]
    fn unnamed_category_degrades_in_place() {
        let set = parse(json!({
            "categories": [{"id": "c1", "links": ["https://x"]}]
        }));

        let category = &set.categories[0];
        assert_eq!(category.label, "c1");
        assert_eq!(category.status, CategoryStatus::Empty);
    }

    #[test]
    fn normalization_is_idempotent() {
        let first = parse(json!({
            "Dashboards": ["https://grafana.example/d/1"],
            "Logs": [{"label": "Loki", "url": "https://loki.example"}],
            "Docs": [],
            "Alerts": 99
        }));

        let rich = json!({
            "categories": serde_json::to_value(&first.categories).unwrap(),
            "last_updated": first.last_updated.map(|stamp| stamp.to_rfc3339()),
            "metadata": {"max_rows": first.max_rows}
        });
        let second = parse(rich);

        assert_eq!(first, second);
    }

    #[test]
    fn icon_table_falls_back_to_generic() {
        assert_eq!(category_icon("Logs"), "󰆍");
        assert_eq!(category_icon("metrics"), "󰄨");
        assert_eq!(category_icon("Something Else"), GENERIC_ICON);
    }
}
