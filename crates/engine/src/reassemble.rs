//! Multi-model result reassembly
//!
//! Turns ranked search hits that reference several record types back into
//! records, in rank order, with one batch fetch per record type.
//!
//! # Algorithm
//!
//! 1. Grouping: resolve each hit's (index, type) to a registration, memoized
//!    per call (and optionally through the registry's shared cache), and
//!    collect ids per record type in order of first appearance. Fetching
//!    through registered backends splits a record type further by store.
//! 2. Fetch: one call per record type. Fetched records are keyed by their
//!    own id, not by the id that was requested.
//! 3. Reassembly: walk the hits again and emit the record for each hit that
//!    has one.
//!
//! # Contract
//!
//! - Output order is input order, minus hits whose record was not found.
//! - Exactly one fetch per distinct resolved record type.
//! - Duplicate hits produce duplicate records.
//! - A hit with no matching registration fails the call with
//!   `UnknownDocumentType` before any fetch is issued.
//! - A missing record is not an error. Callers can see fewer records than
//!   the engine's reported hit total.

use std::sync::Arc;
use std::time::Instant;

use rayon::prelude::*;
use rustc_hash::{FxHashMap, FxHashSet};

use sift_core::{
    CacheScope, CancelToken, Document, FetchPolicy, Identified, ReassemblyConfig, RecordType,
    SearchHit, SiftError, SiftResult, TypeKey, DEFAULT_TYPELESS_MARKERS,
};

use crate::cache::ResolutionCache;
use crate::registry::{Registry, RegistrySnapshot, TypeRegistration};

// =============================================================================
// Output types
// =============================================================================

/// A present record paired with the hit that produced it.
#[derive(Debug, Clone, PartialEq)]
pub struct Reassembled<R> {
    /// The originating hit
    pub hit: SearchHit,
    /// The fetched record
    pub record: R,
}

/// Counters for one reassembly call.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ReassemblyStats {
    /// Hits in the input
    pub hits: usize,
    /// Distinct record types the hits resolved to
    pub resolved_types: usize,
    /// Fetch calls issued
    pub fetch_calls: usize,
    /// Records returned by all fetches
    pub fetched: usize,
    /// Hits dropped because no record came back for them
    pub missing: usize,
    /// Record types whose fetch failed under the tolerate policy
    pub failed_types: Vec<RecordType>,
}

/// Result of one reassembly call.
#[derive(Debug, Clone)]
pub struct Reassembly<R> {
    entries: Vec<Reassembled<R>>,
    stats: ReassemblyStats,
}

impl<R> Reassembly<R> {
    /// Number of records.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// True when no hit produced a record.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Records in rank order.
    pub fn records(&self) -> impl Iterator<Item = &R> {
        self.entries.iter().map(|e| &e.record)
    }

    /// Records paired with their hits, in rank order.
    pub fn iter_with_hits(&self) -> impl Iterator<Item = (&R, &SearchHit)> {
        self.entries.iter().map(|e| (&e.record, &e.hit))
    }

    /// Record/hit entries.
    pub fn entries(&self) -> &[Reassembled<R>] {
        &self.entries
    }

    /// Call counters.
    pub fn stats(&self) -> &ReassemblyStats {
        &self.stats
    }

    /// Consume into records.
    pub fn into_records(self) -> Vec<R> {
        self.entries.into_iter().map(|e| e.record).collect()
    }

    /// Consume into entries.
    pub fn into_entries(self) -> Vec<Reassembled<R>> {
        self.entries
    }
}

// =============================================================================
// Plain entry points
// =============================================================================

/// Reassemble hits into records, fetching each record type once.
///
/// `fetch` receives a record type and the ids of its hits (deduplicated, in
/// order of first appearance) and may return fewer records than asked for.
/// Hits typed `_doc` count as typeless.
pub fn reassemble<R, F>(hits: &[SearchHit], registry: &RegistrySnapshot, fetch: F) -> SiftResult<Vec<R>>
where
    R: Identified + Clone,
    F: FnMut(&RecordType, &[String]) -> SiftResult<Vec<R>>,
{
    Ok(reassemble_with_hits(hits, registry, fetch)?
        .into_iter()
        .map(|e| e.record)
        .collect())
}

/// Like [`reassemble`], keeping each record paired with its hit.
pub fn reassemble_with_hits<R, F>(
    hits: &[SearchHit],
    registry: &RegistrySnapshot,
    mut fetch: F,
) -> SiftResult<Vec<Reassembled<R>>>
where
    R: Identified + Clone,
    F: FnMut(&RecordType, &[String]) -> SiftResult<Vec<R>>,
{
    let plan = Plan::build(hits, registry, DEFAULT_TYPELESS_MARKERS, None, GroupBy::RecordType)?;
    let mut fetched = Vec::with_capacity(plan.groups.len());
    for group in &plan.groups {
        let record_type = &group.registration.record_type;
        let records =
            fetch(record_type, &group.ids).map_err(|e| into_fetch_error(record_type, e))?;
        fetched.push(Some(index_by_id(records)));
    }
    let (entries, _missing) = plan.assemble(hits, &fetched);
    Ok(entries)
}

// =============================================================================
// Reassembler
// =============================================================================

/// Configured reassembler over a [`Registry`].
///
/// Takes a registry snapshot at the start of every call, so registrations
/// added concurrently are either fully visible or not at all.
pub struct Reassembler<'r> {
    registry: &'r Registry,
    config: ReassemblyConfig,
    cancel: Option<CancelToken>,
}

impl<'r> Reassembler<'r> {
    /// Reassembler with default configuration.
    pub fn new(registry: &'r Registry) -> Self {
        Self::with_config(registry, ReassemblyConfig::default())
    }

    /// Reassembler with explicit configuration.
    pub fn with_config(registry: &'r Registry, config: ReassemblyConfig) -> Self {
        Self {
            registry,
            config,
            cancel: None,
        }
    }

    /// Attach a caller-owned cancellation token.
    pub fn with_cancel(mut self, cancel: CancelToken) -> Self {
        self.cancel = Some(cancel);
        self
    }

    /// Active configuration.
    pub fn config(&self) -> &ReassemblyConfig {
        &self.config
    }

    /// Reassemble through each registration's backend.
    ///
    /// A record type registered on several indices with different stores is
    /// fetched once per distinct store.
    pub fn records(&self, hits: &[SearchHit]) -> SiftResult<Reassembly<Document>> {
        self.run_registrations(hits, GroupBy::Store, |registration, ids, cancel| {
            registration
                .backend
                .fetch_by_id(&registration.record_type, ids, cancel)
        })
    }

    /// Reassemble through a caller-supplied fetch.
    ///
    /// `fetch` must be `Sync`: with `concurrent_fetch` the per-type calls run
    /// in parallel.
    pub fn run<R, F>(&self, hits: &[SearchHit], fetch: F) -> SiftResult<Reassembly<R>>
    where
        R: Identified + Clone + Send,
        F: Fn(&RecordType, &[String], &CancelToken) -> SiftResult<Vec<R>> + Sync,
    {
        self.run_registrations(hits, GroupBy::RecordType, |registration, ids, cancel| {
            fetch(&registration.record_type, ids, cancel)
        })
    }

    fn run_registrations<R, F>(
        &self,
        hits: &[SearchHit],
        group_by: GroupBy,
        fetch: F,
    ) -> SiftResult<Reassembly<R>>
    where
        R: Identified + Clone + Send,
        F: Fn(&TypeRegistration, &[String], &CancelToken) -> SiftResult<Vec<R>> + Sync,
    {
        let started = Instant::now();
        let cancel = self.call_token();
        cancel.check()?;

        let snapshot = self.registry.snapshot();
        let shared = match self.config.cache_scope {
            CacheScope::Shared => Some(self.registry.resolution_cache().as_ref()),
            CacheScope::PerCall => None,
        };
        let plan = Plan::build(hits, &snapshot, &self.config.typeless_markers, shared, group_by)?;

        let outcomes = self.fetch_groups(&plan, &fetch, &cancel);

        let mut stats = ReassemblyStats {
            hits: hits.len(),
            resolved_types: plan.record_types,
            fetch_calls: plan.groups.len(),
            ..Default::default()
        };
        let mut fetched = Vec::with_capacity(outcomes.len());
        for (group, outcome) in plan.groups.iter().zip(outcomes) {
            match outcome {
                Ok(records) => {
                    stats.fetched += records.len();
                    fetched.push(Some(index_by_id(records)));
                }
                Err(err) => {
                    let record_type = &group.registration.record_type;
                    if err.is_cancellation() || self.config.fetch_policy == FetchPolicy::FailFast {
                        return Err(into_fetch_error(record_type, err));
                    }
                    tracing::warn!(
                        target: "sift::reassemble",
                        record_type = %record_type,
                        error = %err,
                        "fetch failed, dropping its hits"
                    );
                    stats.failed_types.push(record_type.clone());
                    fetched.push(None);
                }
            }
        }

        cancel.check()?;
        let (entries, missing) = plan.assemble(hits, &fetched);
        stats.missing = missing;

        tracing::debug!(
            target: "sift::reassemble",
            hits = stats.hits,
            types = stats.resolved_types,
            fetch_calls = stats.fetch_calls,
            records = entries.len(),
            missing = stats.missing,
            failed_types = stats.failed_types.len(),
            elapsed_us = started.elapsed().as_micros() as u64,
            "reassembled search hits"
        );

        Ok(Reassembly { entries, stats })
    }

    fn call_token(&self) -> CancelToken {
        match (&self.cancel, self.config.deadline()) {
            (Some(token), Some(timeout)) => token.child_with_timeout(timeout),
            (Some(token), None) => token.clone(),
            (None, Some(timeout)) => CancelToken::with_timeout(timeout),
            (None, None) => CancelToken::new(),
        }
    }

    // Every fetch runs to completion (or failure) before the caller sees any
    // outcome; fail-fast sequential mode stops issuing fetches at the first error.
    fn fetch_groups<R, F>(&self, plan: &Plan, fetch: &F, cancel: &CancelToken) -> Vec<SiftResult<Vec<R>>>
    where
        R: Send,
        F: Fn(&TypeRegistration, &[String], &CancelToken) -> SiftResult<Vec<R>> + Sync,
    {
        let fetch_one = |group: &Group| -> SiftResult<Vec<R>> {
            cancel.check()?;
            tracing::trace!(
                target: "sift::reassemble",
                record_type = %group.registration.record_type,
                ids = group.ids.len(),
                "fetching"
            );
            fetch(&group.registration, &group.ids, cancel)
        };

        if self.config.concurrent_fetch && plan.groups.len() > 1 {
            return plan.groups.par_iter().map(fetch_one).collect();
        }

        let mut outcomes = Vec::with_capacity(plan.groups.len());
        for group in &plan.groups {
            let outcome = fetch_one(group);
            let stop = outcome.is_err() && self.config.fetch_policy == FetchPolicy::FailFast;
            outcomes.push(outcome);
            if stop {
                break;
            }
        }
        outcomes
    }
}

fn into_fetch_error(record_type: &RecordType, err: SiftError) -> SiftError {
    match err {
        SiftError::FetchFailed { .. } | SiftError::Cancelled | SiftError::DeadlineExceeded { .. } => err,
        other => SiftError::fetch_failed(record_type, other.to_string()),
    }
}

fn index_by_id<R: Identified>(records: Vec<R>) -> FxHashMap<String, R> {
    records.into_iter().map(|r| (r.record_id(), r)).collect()
}

// =============================================================================
// Plan
// =============================================================================

struct Group {
    registration: Arc<TypeRegistration>,
    ids: Vec<String>,
}

/// How resolved hits are split into fetch groups.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum GroupBy {
    /// One group per record type; the caller's fetch picks the store.
    RecordType,
    /// One group per (record type, backend store).
    Store,
}

/// Grouping-pass output: per-hit group slot plus the per-group id lists.
struct Plan {
    slots: Vec<usize>,
    groups: Vec<Group>,
    record_types: usize,
}

impl Plan {
    fn build<S: AsRef<str>>(
        hits: &[SearchHit],
        snapshot: &RegistrySnapshot,
        typeless_markers: &[S],
        shared: Option<&ResolutionCache>,
        group_by: GroupBy,
    ) -> SiftResult<Self> {
        let mut memo: FxHashMap<(&str, Option<&str>), usize> = FxHashMap::default();
        let mut groups_of_type: FxHashMap<RecordType, Vec<usize>> = FxHashMap::default();
        let mut seen: Vec<FxHashSet<&str>> = Vec::new();
        let mut groups: Vec<Group> = Vec::new();
        let mut slots = Vec::with_capacity(hits.len());

        for hit in hits {
            let doc_type = hit.effective_type(typeless_markers);
            let slot = match memo.get(&(hit.index.as_str(), doc_type)) {
                Some(&slot) => slot,
                None => {
                    let registration = resolve(snapshot, shared, &hit.index, doc_type)?;
                    let candidates = groups_of_type
                        .entry(registration.record_type.clone())
                        .or_default();
                    let existing = candidates.iter().copied().find(|&slot| match group_by {
                        GroupBy::RecordType => true,
                        GroupBy::Store => groups[slot]
                            .registration
                            .backend
                            .same_store(&registration.backend),
                    });
                    let slot = match existing {
                        Some(slot) => slot,
                        None => {
                            groups.push(Group {
                                registration,
                                ids: Vec::new(),
                            });
                            seen.push(FxHashSet::default());
                            candidates.push(groups.len() - 1);
                            groups.len() - 1
                        }
                    };
                    memo.insert((hit.index.as_str(), doc_type), slot);
                    slot
                }
            };
            if seen[slot].insert(hit.id.as_str()) {
                groups[slot].ids.push(hit.id.clone());
            }
            slots.push(slot);
        }

        Ok(Plan {
            slots,
            groups,
            record_types: groups_of_type.len(),
        })
    }

    fn assemble<R: Clone>(
        &self,
        hits: &[SearchHit],
        fetched: &[Option<FxHashMap<String, R>>],
    ) -> (Vec<Reassembled<R>>, usize) {
        let mut entries = Vec::with_capacity(hits.len());
        let mut missing = 0;
        for (hit, &slot) in hits.iter().zip(&self.slots) {
            // None: the type's fetch failed under the tolerate policy
            let Some(records) = fetched.get(slot).and_then(Option::as_ref) else {
                continue;
            };
            match records.get(&hit.id) {
                Some(record) => entries.push(Reassembled {
                    hit: hit.clone(),
                    record: record.clone(),
                }),
                None => missing += 1,
            }
        }
        (entries, missing)
    }
}

fn resolve(
    snapshot: &RegistrySnapshot,
    shared: Option<&ResolutionCache>,
    index: &str,
    doc_type: Option<&str>,
) -> SiftResult<Arc<TypeRegistration>> {
    let key = shared.map(|_| TypeKey::new(index, doc_type));
    if let (Some(cache), Some(key)) = (shared, key.as_ref()) {
        if let Some(registration) = cache.get(key, snapshot.generation()) {
            return Ok(registration);
        }
    }
    let registration = snapshot
        .resolve(index, doc_type)
        .cloned()
        .ok_or_else(|| SiftError::unknown_type(index, doc_type))?;
    if let (Some(cache), Some(key)) = (shared, key) {
        cache.insert(key, snapshot.generation(), Arc::clone(&registration));
    }
    Ok(registration)
}
