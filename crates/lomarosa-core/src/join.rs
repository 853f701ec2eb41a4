//! The joiner — single-pass, key-normalized left join with drop counting.
//!
//! A fact row without a matching reference entry is unusable downstream in
//! both subsystems (no contact identity, no sales rate), so the joiner
//! drops it and counts the reason instead of propagating a half-joined
//! record.

use std::collections::HashMap;

use crate::key::JoinKey;

/// Per-run join accounting, surfaced in the batch statistics.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct JoinStats {
  pub matched:   usize,
  /// Facts whose key resolved but had no reference entry.
  pub unmatched: usize,
  /// Facts dropped before lookup because their key was blank.
  pub blank_key: usize,
}

/// Join `facts` against `reference`, merging each hit with its reference
/// entry via `merge`. Deterministic given deterministic input order; the
/// output follows the input order of the facts.
///
/// [`JoinKey::Empty`] never matches — a blank fact key is counted under
/// `blank_key` without touching the map, so two blank cells can never
/// accidentally join.
pub fn join<F, R, T>(
  facts: Vec<F>,
  reference: &HashMap<JoinKey, R>,
  key_of: impl Fn(&F) -> JoinKey,
  mut merge: impl FnMut(F, &R) -> T,
) -> (Vec<T>, JoinStats) {
  let mut joined = Vec::with_capacity(facts.len());
  let mut stats = JoinStats::default();

  for fact in facts {
    let key = key_of(&fact);
    if !key.matchable() {
      stats.blank_key += 1;
      continue;
    }
    match reference.get(&key) {
      Some(entry) => {
        joined.push(merge(fact, entry));
        stats.matched += 1;
      }
      None => stats.unmatched += 1,
    }
  }

  (joined, stats)
}
