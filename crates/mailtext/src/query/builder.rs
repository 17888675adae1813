//! Search query construction

use crate::models::{SearchCriteria, SearchQuery};

/// Build the search query for a set of criteria.
///
/// Each non-empty field becomes one clause: `from:"sender"`,
/// `label:"label"`, `subject:"subject"`, then the keywords verbatim.
/// Clauses are joined with single spaces. With no criteria at all the
/// result is [`SearchQuery::MatchAll`].
///
/// Embedded double quotes are passed through unescaped, so a value such
/// as `a"b` produces an unbalanced clause.
pub fn build_query(criteria: &SearchCriteria) -> SearchQuery {
    let fields = [
        ("from", criteria.sender.as_deref()),
        ("label", criteria.label.as_deref()),
        ("subject", criteria.subject.as_deref()),
    ];

    let mut clauses: Vec<String> = fields
        .into_iter()
        .filter_map(|(field, value)| non_empty(value).map(|v| format!("{}:\"{}\"", field, v)))
        .collect();

    if let Some(keywords) = non_empty(criteria.keywords.as_deref()) {
        clauses.push(keywords.to_string());
    }

    if clauses.is_empty() {
        SearchQuery::MatchAll
    } else {
        SearchQuery::Filter(clauses.join(" "))
    }
}

fn non_empty(value: Option<&str>) -> Option<&str> {
    value.filter(|v| !v.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::MATCH_ALL;

    #[test]
    fn test_empty_criteria_matches_all() {
        let query = build_query(&SearchCriteria::default());
        assert_eq!(query, SearchQuery::MatchAll);
        assert_eq!(query.as_str(), MATCH_ALL);
        assert_eq!(query.filter(), None);
    }

    #[test]
    fn test_empty_strings_match_all() {
        let criteria = SearchCriteria::default()
            .sender("")
            .label("")
            .subject("")
            .keywords("");
        assert!(build_query(&criteria).is_match_all());
    }

    #[test]
    fn test_sender_only() {
        let query = build_query(&SearchCriteria::default().sender("a@b.com"));
        assert_eq!(query.as_str(), "from:\"a@b.com\"");
    }

    #[test]
    fn test_sender_and_label() {
        let criteria = SearchCriteria::default().sender("a@b.com").label("work");
        assert_eq!(
            build_query(&criteria).as_str(),
            "from:\"a@b.com\" label:\"work\""
        );
    }

    #[test]
    fn test_all_fields_in_order() {
        let criteria = SearchCriteria::default()
            .keywords("Dear customer")
            .subject("Maintenance")
            .label("sent")
            .sender("ops@example.com");
        assert_eq!(
            build_query(&criteria).filter(),
            Some("from:\"ops@example.com\" label:\"sent\" subject:\"Maintenance\" Dear customer")
        );
    }

    #[test]
    fn test_keywords_unquoted() {
        let query = build_query(&SearchCriteria::default().keywords("Dear"));
        assert_eq!(query, SearchQuery::Filter("Dear".to_string()));
    }

    #[test]
    fn test_quotes_not_escaped() {
        let query = build_query(&SearchCriteria::default().subject("say \"hi\""));
        assert_eq!(query.as_str(), "subject:\"say \"hi\"\"");
    }
}
