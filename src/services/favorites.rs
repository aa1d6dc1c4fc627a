//! A user's favorite movies as an ordered set, and its stored text form.
//!
//! Each member is written as `#<id>|`, so `"#1|#12|"` holds movies 1 and 12.
//! The leading `#` and trailing `|` make every member token self-delimiting:
//! `#1|` can never match inside `#12|` or `#21|`. Only [`FavoriteSet::encode`]
//! and [`FavoriteSet::decode`] know about this format.

use serde::Serialize;
use std::fmt;
use thiserror::Error;

const OPEN: char = '#';
const CLOSE: char = '|';

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("malformed favorites entry {segment:?} at byte {offset}")]
pub struct FavoriteDecodeError {
    pub segment: String,
    pub offset: usize,
}

/// Insertion-ordered movie ids, no duplicates
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct FavoriteSet {
    movie_ids: Vec<i64>,
}

impl FavoriteSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds `movie_id` as the most recent member. Re-adding moves it to the end.
    pub fn insert(&mut self, movie_id: i64) {
        self.remove(movie_id);
        self.movie_ids.push(movie_id);
    }

    /// Returns whether `movie_id` was a member
    pub fn remove(&mut self, movie_id: i64) -> bool {
        let before = self.movie_ids.len();
        self.movie_ids.retain(|id| *id != movie_id);
        before != self.movie_ids.len()
    }

    pub fn contains(&self, movie_id: i64) -> bool {
        self.movie_ids.contains(&movie_id)
    }

    pub fn iter(&self) -> impl Iterator<Item = i64> + '_ {
        self.movie_ids.iter().copied()
    }

    pub fn len(&self) -> usize {
        self.movie_ids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.movie_ids.is_empty()
    }

    pub fn encode(&self) -> String {
        self.to_string()
    }

    /// Parses the stored form. A repeated member keeps its last position,
    /// matching what a strip-then-append writer would have produced.
    pub fn decode(raw: &str) -> Result<Self, FavoriteDecodeError> {
        let mut set = FavoriteSet::new();
        let mut offset = 0;

        for token in raw.split_inclusive(CLOSE) {
            let id = token
                .strip_prefix(OPEN)
                .and_then(|rest| rest.strip_suffix(CLOSE))
                .filter(|digits| !digits.is_empty() && digits.bytes().all(|b| b.is_ascii_digit()))
                .and_then(|digits| digits.parse::<i64>().ok())
                .ok_or_else(|| FavoriteDecodeError {
                    segment: token.to_string(),
                    offset,
                })?;

            set.insert(id);
            offset += token.len();
        }

        Ok(set)
    }
}

impl fmt::Display for FavoriteSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for id in &self.movie_ids {
            write!(f, "{}{}{}", OPEN, id, CLOSE)?;
        }
        Ok(())
    }
}

impl FromIterator<i64> for FavoriteSet {
    fn from_iter<I: IntoIterator<Item = i64>>(iter: I) -> Self {
        let mut set = FavoriteSet::new();
        for id in iter {
            set.insert(id);
        }
        set
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn adding_twice_keeps_one_member() {
        let mut set = FavoriteSet::new();
        set.insert(7);
        set.insert(7);

        assert_eq!(set.len(), 1);
        assert_eq!(set.encode(), "#7|");
    }

    #[test]
    fn membership_does_not_match_numeric_prefixes() {
        let mut set = FavoriteSet::new();
        set.insert(12);

        assert!(set.contains(12));
        assert!(!set.contains(1));
        assert!(!set.contains(2));

        let decoded = FavoriteSet::decode(&set.encode()).unwrap();
        assert!(!decoded.contains(1));
        assert!(decoded.contains(12));
    }

    #[test]
    fn removing_one_id_leaves_lookalikes() {
        let mut set: FavoriteSet = [1, 12, 21, 112].into_iter().collect();
        assert!(set.remove(1));
        assert_eq!(set.encode(), "#12|#21|#112|");
        assert!(!set.remove(1));
    }

    #[test]
    fn reinsert_moves_to_end() {
        let mut set: FavoriteSet = [3, 5, 8].into_iter().collect();
        set.insert(3);
        assert_eq!(set.iter().collect::<Vec<_>>(), vec![5, 8, 3]);
    }

    #[test]
    fn decode_accepts_empty_and_well_formed_text() {
        assert!(FavoriteSet::decode("").unwrap().is_empty());

        let set = FavoriteSet::decode("#1|#12|#7|").unwrap();
        assert_eq!(set.iter().collect::<Vec<_>>(), vec![1, 12, 7]);
        assert_eq!(set.encode(), "#1|#12|#7|");
    }

    #[test]
    fn positive_ids_survive_encode_then_decode() {
        let set: FavoriteSet = [1, 9, 10, i64::MAX].into_iter().collect();
        assert_eq!(FavoriteSet::decode(&set.encode()).unwrap(), set);
    }

    #[test]
    fn decode_collapses_duplicates_to_last_position() {
        let set = FavoriteSet::decode("#7|#3|#7|").unwrap();
        assert_eq!(set.iter().collect::<Vec<_>>(), vec![3, 7]);
    }

    #[test]
    fn decode_rejects_malformed_text() {
        for bad in ["7", "#7", "7|", "#|", "#a|", "#1|junk", "#-3|", "#1,2|", ",1,2,"] {
            assert!(FavoriteSet::decode(bad).is_err(), "accepted {:?}", bad);
        }

        let err = FavoriteSet::decode("#1|#x|").unwrap_err();
        assert_eq!(err.offset, 3);
        assert_eq!(err.segment, "#x|");
    }
}
