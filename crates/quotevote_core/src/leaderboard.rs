//! Top-N projection over the visible quote collection.

use crate::constants::LEADERBOARD_SIZE;
use crate::models::quote::Quote;

/// Return the [`LEADERBOARD_SIZE`] quotes with the highest vote counts.
///
/// Only the supplied collection is considered. The sort is stable, so
/// quotes with equal counts keep their collection order.
///
/// # Returns
/// At most five quotes, ordered by `vote_count` descending.
pub fn top_quotes(collection: &[Quote]) -> Vec<Quote> {
    top_n(collection, LEADERBOARD_SIZE)
}

fn top_n(collection: &[Quote], limit: usize) -> Vec<Quote> {
    let mut ranked: Vec<&Quote> = collection.iter().collect();
    ranked.sort_by(|a, b| b.vote_count.cmp(&a.vote_count));
    ranked.into_iter().take(limit).cloned().collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn quote(id: i64, vote_count: u64) -> Quote {
        Quote {
            id,
            text: format!("quote {}", id),
            author: "tester".to_string(),
            vote_count,
            created_at: String::new(),
            updated_at: String::new(),
        }
    }

    fn ids(quotes: &[Quote]) -> Vec<i64> {
        quotes.iter().map(|q| q.id).collect()
    }

    #[test]
    fn ranks_by_vote_count_descending() {
        let collection = vec![quote(1, 3), quote(2, 7), quote(3, 1)];
        assert_eq!(ids(&top_quotes(&collection)), vec![2, 1, 3]);
    }

    #[test]
    fn caps_at_five_and_never_exceeds_collection() {
        let collection: Vec<Quote> = (1..=8).map(|id| quote(id, id as u64)).collect();
        let top = top_quotes(&collection);
        assert_eq!(ids(&top), vec![8, 7, 6, 5, 4]);

        let small = vec![quote(1, 0)];
        assert_eq!(top_quotes(&small).len(), 1);
        assert!(top_quotes(&[]).is_empty());
    }

    #[test]
    fn ties_keep_collection_order() {
        let collection = vec![quote(4, 2), quote(9, 5), quote(1, 2), quote(3, 2)];
        assert_eq!(ids(&top_quotes(&collection)), vec![9, 4, 1, 3]);
    }

    #[test]
    fn projection_is_idempotent_and_leaves_input_untouched() {
        let collection = vec![quote(1, 1), quote(2, 9), quote(3, 4)];
        let once = top_quotes(&collection);
        let twice = top_quotes(&once);
        assert_eq!(once, twice);
        assert_eq!(ids(&collection), vec![1, 2, 3]);
        for entry in &once {
            assert!(collection.contains(entry));
        }
    }
}
