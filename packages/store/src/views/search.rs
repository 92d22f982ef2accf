//! Free-text search over list items.

use crate::models::{Conference, Paper, Ticket, Transaction};

/// Items that can be matched by the search box.
pub trait Searchable {
    /// The fixed set of text fields a query is matched against. Absent
    /// optional fields are simply left out.
    fn search_fields(&self) -> Vec<&str>;
}

/// Case-insensitive substring match. An empty (or whitespace) query matches
/// everything; otherwise any single field containing the query is enough.
pub fn matches_search<T: Searchable + ?Sized>(item: &T, query: &str) -> bool {
    let needle = query.trim().to_lowercase();
    if needle.is_empty() {
        return true;
    }
    item.search_fields()
        .into_iter()
        .any(|field| field.to_lowercase().contains(&needle))
}

impl Searchable for Conference {
    fn search_fields(&self) -> Vec<&str> {
        let mut fields = vec![self.conference_name.as_str()];
        fields.extend(self.address.as_deref());
        fields.extend(self.description.as_deref());
        fields.extend(self.category_name.as_deref());
        fields
    }
}

impl Searchable for Ticket {
    fn search_fields(&self) -> Vec<&str> {
        let mut fields = vec![self.conference_name.as_str()];
        fields.extend(self.conference_address.as_deref());
        fields.extend(self.ticket_name.as_deref());
        fields
    }
}

impl Searchable for Transaction {
    fn search_fields(&self) -> Vec<&str> {
        let mut fields = vec![self.transaction_id.as_str(), self.status.as_str()];
        fields.extend(self.conference_name.as_deref());
        fields.extend(self.description.as_deref());
        fields.extend(self.payment_method.as_deref());
        fields
    }
}

impl Searchable for Paper {
    fn search_fields(&self) -> Vec<&str> {
        let mut fields = vec![self.title.as_str()];
        fields.extend(self.abstract_text.as_deref());
        fields.extend(self.conference_name.as_deref());
        fields.extend(self.keywords.iter().map(String::as_str));
        fields
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn conference(name: &str) -> Conference {
        serde_json::from_value(serde_json::json!({
            "conferenceId": name,
            "conferenceName": name,
        }))
        .unwrap()
    }

    #[test]
    fn test_search_ai_conference() {
        let list = [
            conference("AI & Applications Conference"),
            conference("Design Workshop"),
        ];
        let hits: Vec<_> = list.iter().filter(|c| matches_search(*c, "AI")).collect();
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].conference_name, "AI & Applications Conference");
    }

    #[test]
    fn test_empty_query_matches_all() {
        let c = conference("Anything");
        assert!(matches_search(&c, ""));
        assert!(matches_search(&c, "   "));
    }

    #[test]
    fn test_matches_any_field_ignoring_case() {
        let mut c = conference("RustConf");
        c.address = Some("Portland, Oregon".into());
        c.category_name = Some("Systems Programming".into());
        assert!(matches_search(&c, "portland"));
        assert!(matches_search(&c, "SYSTEMS"));
        assert!(!matches_search(&c, "Berlin"));
    }
}
