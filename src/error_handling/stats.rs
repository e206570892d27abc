//! Batch statistics tracking.
//!
//! Thread-safe counters fed with every finished [`ReachabilityResult`], used
//! for the end-of-run summary.

use std::collections::{BTreeMap, HashMap};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;

use strum::IntoEnumIterator;

use super::types::ErrorKind;
use crate::models::ReachabilityResult;

/// Counters describing a batch of reachability results.
///
/// Known error kinds have pre-initialized atomic counters; `Other(..)` names
/// are counted in a mutex-guarded map since they are open-ended.
pub struct ProcessingStats {
    total: AtomicUsize,
    succeeded: AtomicUsize,
    redirected: AtomicUsize,
    cloudflare: AtomicUsize,
    js_redirect: AtomicUsize,
    parked: AtomicUsize,
    errors: HashMap<ErrorKind, AtomicUsize>,
    other_errors: Mutex<BTreeMap<String, usize>>,
}

impl Default for ProcessingStats {
    fn default() -> Self {
        Self::new()
    }
}

impl ProcessingStats {
    /// Creates a tracker with every known error kind at zero.
    pub fn new() -> Self {
        let mut errors = HashMap::new();
        for kind in ErrorKind::iter() {
            if !matches!(kind, ErrorKind::Other(_)) {
                errors.insert(kind, AtomicUsize::new(0));
            }
        }

        ProcessingStats {
            total: AtomicUsize::new(0),
            succeeded: AtomicUsize::new(0),
            redirected: AtomicUsize::new(0),
            cloudflare: AtomicUsize::new(0),
            js_redirect: AtomicUsize::new(0),
            parked: AtomicUsize::new(0),
            errors,
            other_errors: Mutex::new(BTreeMap::new()),
        }
    }

    /// Records one finished result.
    pub fn record(&self, result: &ReachabilityResult) {
        self.total.fetch_add(1, Ordering::Relaxed);
        if result.success {
            self.succeeded.fetch_add(1, Ordering::Relaxed);
        }
        if result.redirect.is_some() {
            self.redirected.fetch_add(1, Ordering::Relaxed);
        }
        if result.cloudflare_protection {
            self.cloudflare.fetch_add(1, Ordering::Relaxed);
        }
        if result.has_js_redirect {
            self.js_redirect.fetch_add(1, Ordering::Relaxed);
        }
        if result.is_parking_domain == Some(true) {
            self.parked.fetch_add(1, Ordering::Relaxed);
        }
        if let Some(kind) = &result.error_kind {
            self.increment_error(kind);
        }
    }

    /// Increment an error counter.
    pub fn increment_error(&self, kind: &ErrorKind) {
        if let Some(counter) = self.errors.get(kind) {
            counter.fetch_add(1, Ordering::Relaxed);
            return;
        }
        match self.other_errors.lock() {
            Ok(mut other) => *other.entry(kind.as_str().to_string()).or_insert(0) += 1,
            Err(_) => log::error!("Error statistics lock poisoned, dropping {}", kind),
        }
    }

    /// Get the count for an error kind.
    pub fn get_error_count(&self, kind: &ErrorKind) -> usize {
        if let Some(counter) = self.errors.get(kind) {
            return counter.load(Ordering::SeqCst);
        }
        self.other_errors
            .lock()
            .map(|other| other.get(kind.as_str()).copied().unwrap_or(0))
            .unwrap_or(0)
    }

    /// Non-zero error counts keyed by error kind name, sorted by name.
    pub fn error_counts(&self) -> BTreeMap<String, usize> {
        let mut counts: BTreeMap<String, usize> = self
            .errors
            .iter()
            .map(|(kind, counter)| (kind.as_str().to_string(), counter.load(Ordering::SeqCst)))
            .filter(|(_, count)| *count > 0)
            .collect();
        if let Ok(other) = self.other_errors.lock() {
            counts.extend(other.iter().map(|(name, count)| (name.clone(), *count)));
        }
        counts
    }

    /// Sum of all error counters.
    pub fn total_errors(&self) -> usize {
        self.error_counts().values().sum()
    }

    /// Results recorded so far.
    pub fn total(&self) -> usize {
        self.total.load(Ordering::SeqCst)
    }

    /// Results with a 2xx terminal status.
    pub fn succeeded(&self) -> usize {
        self.succeeded.load(Ordering::SeqCst)
    }

    /// Results without a 2xx terminal status.
    pub fn failed(&self) -> usize {
        self.total().saturating_sub(self.succeeded())
    }

    /// Results that followed at least one redirect.
    pub fn redirected(&self) -> usize {
        self.redirected.load(Ordering::SeqCst)
    }

    /// Results flagged as behind Cloudflare.
    pub fn cloudflare(&self) -> usize {
        self.cloudflare.load(Ordering::SeqCst)
    }

    /// Results flagged with a JavaScript redirect.
    pub fn js_redirect(&self) -> usize {
        self.js_redirect.load(Ordering::SeqCst)
    }

    /// Results flagged as parked domains.
    pub fn parked(&self) -> usize {
        self.parked.load(Ordering::SeqCst)
    }
}
