use std::collections::HashMap;

use serde_json::Value;

/// Filter map derived from the `primaryFilter` and `secondaryFilter` query
/// parameters: filter name to required value.
pub type FilterMap = HashMap<String, String>;

/// Builds the filter map from the raw comma-separated `name:value` lists.
///
/// Primary entries are reduced before secondary ones, left to right, so on
/// duplicate names the last occurrence wins. Pairs without a `:` delimiter,
/// or with an empty name, are skipped. Returns `None` when no usable pair
/// survives, which the resolver treats as "no filtering".
pub fn parse_filters(primary: Option<&str>, secondary: Option<&str>) -> Option<FilterMap> {
    let pairs = primary
        .into_iter()
        .chain(secondary)
        .flat_map(|list| list.split(','));

    let mut filters = FilterMap::new();
    for pair in pairs {
        if let Some(delim) = pair.find(':') {
            if delim > 0 {
                filters.insert(pair[..delim].to_string(), pair[delim + 1..].to_string());
            }
        }
    }

    if filters.is_empty() {
        None
    } else {
        Some(filters)
    }
}

/// True when the entity's `primaryfilters` satisfy every filter in the map.
///
/// An array of candidate values matches when some element is a string equal
/// to the required value; a bare string matches on substring containment.
/// Anything else, including an entity without `primaryfilters` or without
/// the named filter, fails the match.
pub fn matches(entity: &Value, filters: &FilterMap) -> bool {
    filters.iter().all(|(name, value)| {
        match entity.get("primaryfilters").and_then(|pf| pf.get(name)) {
            Some(Value::Array(candidates)) => candidates
                .iter()
                .any(|candidate| candidate.as_str() == Some(value.as_str())),
            Some(Value::String(candidate)) => candidate.contains(value.as_str()),
            _ => false,
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn concatenates_primary_then_secondary() {
        let filters = parse_filters(Some("user:alice,status:RUNNING"), Some("queue:default"))
            .expect("filters should parse");

        assert_eq!(filters.len(), 3);
        assert_eq!(filters.get("user").map(String::as_str), Some("alice"));
        assert_eq!(filters.get("queue").map(String::as_str), Some("default"));
    }

    #[test]
    fn last_occurrence_wins_on_duplicate_names() {
        let filters =
            parse_filters(Some("user:alice"), Some("user:bob")).expect("filters should parse");
        assert_eq!(filters.get("user").map(String::as_str), Some("bob"));

        let filters =
            parse_filters(Some("user:alice,user:carol"), None).expect("filters should parse");
        assert_eq!(filters.get("user").map(String::as_str), Some("carol"));
    }

    #[test]
    fn skips_pairs_without_a_usable_delimiter() {
        assert!(parse_filters(Some("nodelim,:emptyname"), None).is_none());
        assert!(parse_filters(None, None).is_none());

        let filters =
            parse_filters(Some("nodelim,user:alice"), None).expect("filters should parse");
        assert_eq!(filters.len(), 1);
    }

    #[test]
    fn value_may_itself_contain_the_delimiter() {
        let filters = parse_filters(Some("url:http://host:9001"), None).expect("should parse");
        assert_eq!(
            filters.get("url").map(String::as_str),
            Some("http://host:9001")
        );
    }

    #[test]
    fn array_values_match_on_exact_string_equality() {
        let entity = json!({"primaryfilters": {"user": ["alice", "bob"]}});
        let filters = parse_filters(Some("user:bob"), None).unwrap();
        assert!(matches(&entity, &filters));

        let filters = parse_filters(Some("user:bo"), None).unwrap();
        assert!(!matches(&entity, &filters));

        // Numeric candidates never equal a query string.
        let entity = json!({"primaryfilters": {"attempt": [35]}});
        let filters = parse_filters(Some("attempt:35"), None).unwrap();
        assert!(!matches(&entity, &filters));
    }

    #[test]
    fn string_values_match_on_substring() {
        let entity = json!({"primaryfilters": {"user": "alice,bob"}});
        let filters = parse_filters(Some("user:bob"), None).unwrap();
        assert!(matches(&entity, &filters));
    }

    #[test]
    fn missing_primaryfilters_or_name_fails() {
        let filters = parse_filters(Some("user:alice"), None).unwrap();

        assert!(!matches(&json!({"entity": "d1"}), &filters));
        assert!(!matches(&json!({"primaryfilters": {}}), &filters));
    }

    #[test]
    fn every_filter_must_match() {
        let entity = json!({"primaryfilters": {"user": ["alice"], "status": ["RUNNING"]}});

        let both = parse_filters(Some("user:alice,status:RUNNING"), None).unwrap();
        assert!(matches(&entity, &both));

        let mismatched = parse_filters(Some("user:alice,status:FAILED"), None).unwrap();
        assert!(!matches(&entity, &mismatched));
    }
}
