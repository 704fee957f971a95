//! Quote records and the query state that parameterizes a search.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Server-assigned quote identifier.
pub type QuoteId = i64;

/// A quote as returned by the search endpoint.
///
/// Timestamps are server-assigned and kept opaque.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Quote {
    pub id: QuoteId,
    pub text: String,
    #[serde(default)]
    pub author: String,
    #[serde(default)]
    pub vote_count: u64,
    #[serde(default)]
    pub created_at: String,
    #[serde(default)]
    pub updated_at: String,
}

impl Quote {
    /// Text edits are only allowed before the first vote.
    pub fn is_editable(&self) -> bool {
        self.vote_count == 0
    }
}

/// Vote-count filter applied by the search endpoint.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum QuoteFilter {
    #[default]
    All,
    HasVotes,
    NoVotes,
}

impl QuoteFilter {
    /// Value sent in the `filter` query parameter.
    pub fn as_query_value(self) -> &'static str {
        match self {
            Self::All => "",
            Self::HasVotes => "have",
            Self::NoVotes => "no",
        }
    }
}

impl fmt::Display for QuoteFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::All => "all",
            Self::HasVotes => "voted",
            Self::NoVotes => "unvoted",
        })
    }
}

impl FromStr for QuoteFilter {
    type Err = String;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "" | "all" => Ok(Self::All),
            "voted" | "have" | "has-votes" => Ok(Self::HasVotes),
            "unvoted" | "no" | "no-votes" => Ok(Self::NoVotes),
            other => Err(format!(
                "unknown filter '{}' (expected all, voted, or unvoted)",
                other
            )),
        }
    }
}

/// Vote-count ordering requested from the search endpoint.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum SortDirection {
    #[default]
    Descending,
    Ascending,
}

impl SortDirection {
    /// Value sent in the `sorting` query parameter (`true` means descending).
    pub fn as_query_value(self) -> &'static str {
        match self {
            Self::Descending => "true",
            Self::Ascending => "false",
        }
    }

    pub fn toggled(self) -> Self {
        match self {
            Self::Descending => Self::Ascending,
            Self::Ascending => Self::Descending,
        }
    }
}

impl fmt::Display for SortDirection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Descending => "desc",
            Self::Ascending => "asc",
        })
    }
}

impl FromStr for SortDirection {
    type Err = String;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "desc" | "descending" | "true" => Ok(Self::Descending),
            "asc" | "ascending" | "false" => Ok(Self::Ascending),
            other => Err(format!("unknown sort '{}' (expected desc or asc)", other)),
        }
    }
}

/// Search term, filter, and sort that together determine the remote query.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct QueryState {
    pub search: String,
    pub filter: QuoteFilter,
    pub sort: SortDirection,
}

impl QueryState {
    /// Query parameters for `GET /api/quotes/search`.
    ///
    /// The search term is sent as typed; the server owns matching semantics.
    pub fn query_pairs(&self) -> [(&'static str, &str); 3] {
        [
            ("search", self.search.as_str()),
            ("filter", self.filter.as_query_value()),
            ("sorting", self.sort.as_query_value()),
        ]
    }
}

/// Body of `POST /api/quotes/vote`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VoteRequest {
    pub quote_id: QuoteId,
}

/// Body of quote create and update requests.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QuoteTextRequest {
    pub text: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_query_state_matches_initial_page_state() {
        let state = QueryState::default();
        assert_eq!(
            state.query_pairs(),
            [("search", ""), ("filter", ""), ("sorting", "true")]
        );
    }

    #[test]
    fn query_pairs_encode_filter_and_sort() {
        let state = QueryState {
            search: "life".to_string(),
            filter: QuoteFilter::NoVotes,
            sort: SortDirection::Ascending,
        };
        assert_eq!(
            state.query_pairs(),
            [("search", "life"), ("filter", "no"), ("sorting", "false")]
        );
        assert_eq!(QuoteFilter::HasVotes.as_query_value(), "have");
    }

    #[test]
    fn filter_and_sort_parse_user_spellings() {
        assert_eq!("Voted".parse::<QuoteFilter>(), Ok(QuoteFilter::HasVotes));
        assert_eq!("no-votes".parse::<QuoteFilter>(), Ok(QuoteFilter::NoVotes));
        assert_eq!("".parse::<QuoteFilter>(), Ok(QuoteFilter::All));
        assert!("popular".parse::<QuoteFilter>().is_err());
        assert_eq!("asc".parse::<SortDirection>(), Ok(SortDirection::Ascending));
        assert_eq!(SortDirection::Descending.toggled(), SortDirection::Ascending);
        assert!("sideways".parse::<SortDirection>().is_err());
    }

    #[test]
    fn quote_deserializes_with_missing_optional_fields() {
        let quote: Quote =
            serde_json::from_str(r#"{"id":7,"text":"hi"}"#).expect("quote should parse");
        assert_eq!(quote.id, 7);
        assert_eq!(quote.vote_count, 0);
        assert!(quote.is_editable());
        assert!(quote.author.is_empty());
    }
}
