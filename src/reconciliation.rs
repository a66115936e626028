// ⚖️ Status Reconciliation Filter
// Collapses historical submissions into the currently relevant rows.
//
// A customer (or account) may be submitted several times under the same
// email, typically resubmitted after a rejection. For each identity:
//   1. newest submission is always kept, whatever its status
//   2. older submissions are kept unless they were rejected
// Rows are returned newest first across all identities.

use crate::status::is_rejected_status;
use crate::temporal::timestamp_millis;
use std::collections::HashMap;
use tracing::{debug, trace};

/// Anything carrying a creation timestamp string
pub trait Timestamped {
    fn created_at(&self) -> Option<&str>;

    fn created_at_millis(&self) -> i64 {
        timestamp_millis(self.created_at())
    }
}

impl<T: Timestamped + ?Sized> Timestamped for &T {
    fn created_at(&self) -> Option<&str> {
        (**self).created_at()
    }
}

// ============================================================================
// GROUPING KEY
// ============================================================================

/// Identity groups. Items without an identity get their own group keyed by
/// position, which can never equal a real email.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
enum IdentityKey {
    Email(String),
    Anonymous(usize),
}

impl IdentityKey {
    fn new(identity: Option<&str>, index: usize) -> Self {
        match identity.map(str::trim).filter(|s| !s.is_empty()) {
            Some(email) => IdentityKey::Email(email.to_lowercase()),
            None => IdentityKey::Anonymous(index),
        }
    }
}

struct Entry<'a, T> {
    item: &'a T,
    created_ms: i64,
}

/// Stable newest-first sort. Equal or missing timestamps keep input order.
pub fn sort_by_created_desc<T: Timestamped>(items: &mut [T]) {
    items.sort_by_key(|item| std::cmp::Reverse(item.created_at_millis()));
}

// ============================================================================
// FILTER
// ============================================================================

/// Drop rejected submissions that have been superseded by a newer one.
///
/// `identity` yields the grouping value (compared case-insensitively) and
/// `status` the lifecycle status. An identity with only rejected
/// submissions keeps its newest one, so no identity that has submissions
/// ever disappears.
pub fn filter_rejected_with_newer_submission<'a, T, I, S>(items: &'a [T], identity: I, status: S) -> Vec<&'a T>
where
    T: Timestamped,
    I: Fn(&T) -> Option<&str>,
    S: Fn(&T) -> Option<&str>,
{
    let mut groups: Vec<Vec<Entry<'a, T>>> = Vec::new();
    let mut index: HashMap<IdentityKey, usize> = HashMap::new();

    for (i, item) in items.iter().enumerate() {
        let key = IdentityKey::new(identity(item), i);
        let entry = Entry {
            item,
            created_ms: item.created_at_millis(),
        };
        let g = *index.entry(key).or_insert_with(|| {
            groups.push(Vec::new());
            groups.len() - 1
        });
        groups[g].push(entry);
    }

    let mut kept: Vec<Entry<'a, T>> = Vec::with_capacity(items.len());
    let mut suppressed = 0usize;

    for mut group in groups {
        group.sort_by_key(|e| std::cmp::Reverse(e.created_ms));
        for (pos, entry) in group.into_iter().enumerate() {
            if pos > 0 && is_rejected_status(status(entry.item)) {
                trace!(created_ms = entry.created_ms, "superseded rejected submission dropped");
                suppressed += 1;
                continue;
            }
            kept.push(entry);
        }
    }

    kept.sort_by_key(|e| std::cmp::Reverse(e.created_ms));

    debug!(
        input = items.len(),
        identities = index.len(),
        kept = kept.len(),
        suppressed,
        "reconciled submissions"
    );

    kept.into_iter().map(|e| e.item).collect()
}
