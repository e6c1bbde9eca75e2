//! Narrows the catalog to the records matching a free-text query.

use crate::article::ArticleRecord;

/// Returns the records whose title or content contains `query`, ignoring
/// case, in catalog order. An empty query matches everything.
///
/// Matching is plain substring containment: no tokenizing, ranking, or
/// fuzziness. Callers recompute the whole view on every query change, which
/// is fine for a catalog that lives entirely in memory.
pub fn filter<'a>(records: &'a [ArticleRecord], query: &str) -> Vec<&'a ArticleRecord> {
    let needle = query.to_lowercase();
    if needle.is_empty() {
        return records.iter().collect();
    }
    records.iter().filter(|r| matches(r, &needle)).collect()
}

/// `needle` must already be lowercase.
fn matches(record: &ArticleRecord, needle: &str) -> bool {
    record.title.to_lowercase().contains(needle)
        || record.content.to_lowercase().contains(needle)
}
