use std::fmt;

use serde_json::Value;

use crate::endpoint::{Endpoint, ResourceType};

/// Identity of a cached query: the resource type it belongs to plus a
/// canonical rendering of the endpoint and its parameters.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct QueryKey {
    resource: ResourceType,
    params: String,
}

impl QueryKey {
    pub fn for_endpoint(endpoint: &Endpoint) -> Self {
        let params = match serde_json::to_value(endpoint) {
            Ok(value) => canonical(&value),
            Err(_) => endpoint.to_string(),
        };
        Self {
            resource: endpoint.resource(),
            params,
        }
    }

    pub fn resource(&self) -> ResourceType {
        self.resource
    }

    pub fn params(&self) -> &str {
        &self.params
    }
}

impl fmt::Display for QueryKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.resource, self.params)
    }
}

/// JSON with object keys sorted at every level, independent of how the map
/// type orders them.
fn canonical(value: &Value) -> String {
    match value {
        Value::Object(map) => {
            let mut keys: Vec<&String> = map.keys().collect();
            keys.sort();
            let fields: Vec<String> = keys
                .into_iter()
                .map(|k| format!("{}:{}", Value::String(k.clone()), canonical(&map[k])))
                .collect();
            format!("{{{}}}", fields.join(","))
        }
        Value::Array(items) => {
            let items: Vec<String> = items.iter().map(canonical).collect();
            format!("[{}]", items.join(","))
        }
        other => other.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::endpoint::ConferenceQuery;
    use serde_json::json;

    #[test]
    fn test_same_params_same_key() {
        let a = Endpoint::PaginatedConferences(ConferenceQuery::page(1, 10).with_search("rust"));
        let b = Endpoint::PaginatedConferences(ConferenceQuery::page(1, 10).with_search("rust"));
        assert_eq!(QueryKey::for_endpoint(&a), QueryKey::for_endpoint(&b));
    }

    #[test]
    fn test_params_distinguish_keys() {
        let page1 = Endpoint::PaginatedConferences(ConferenceQuery::page(1, 10));
        let page2 = Endpoint::PaginatedConferences(ConferenceQuery::page(2, 10));
        assert_ne!(QueryKey::for_endpoint(&page1), QueryKey::for_endpoint(&page2));

        let conf = QueryKey::for_endpoint(&Endpoint::Conference { id: "1".into() });
        let paper = QueryKey::for_endpoint(&Endpoint::Paper { id: "1".into() });
        assert_ne!(conf, paper);
        assert_eq!(conf.resource(), ResourceType::Conference);
    }

    #[test]
    fn test_canonical_sorts_nested_keys() {
        let value = json!({"b": 1, "a": {"d": [true, null], "c": "x"}});
        assert_eq!(canonical(&value), r#"{"a":{"c":"x","d":[true,null]},"b":1}"#);
    }
}
