#![allow(missing_docs)]

use std::sync::atomic::{AtomicU64, AtomicUsize, Ordering};

// Global bookkeeping for the navigation controller. The page runtime is
// single-threaded; SeqCst is plenty.
static NAVIGATION_SEQ: AtomicU64 = AtomicU64::new(0);
static PENDING_FETCHES: AtomicUsize = AtomicUsize::new(0);

/// Issue the sequence number for a new navigation. Strictly increasing
/// over the lifetime of the page.
pub fn next_navigation_seq() -> u64 {
    NAVIGATION_SEQ.fetch_add(1, Ordering::SeqCst) + 1
}

/// The sequence number of the most recently issued navigation.
pub fn current_navigation_seq() -> u64 {
    NAVIGATION_SEQ.load(Ordering::SeqCst)
}

/// Whether a completing navigation still owns the page. A fetch whose
/// sequence number has been superseded must not touch the DOM or history.
pub fn is_current_navigation(seq: u64) -> bool {
    seq == current_navigation_seq()
}

/// Record one more in-flight fetch. Returns the depth before the increment,
/// so `0` means the loading presentation should be switched on.
pub fn begin_pending_fetch() -> usize {
    PENDING_FETCHES.fetch_add(1, Ordering::SeqCst)
}

/// Record one fetch as settled (success, stale discard, or failure).
/// Returns the remaining depth, so `0` means the loading presentation
/// should be restored. The stored depth saturates at zero, so an
/// unbalanced settle cannot wrap it.
pub fn settle_pending_fetch() -> usize {
    let previous = PENDING_FETCHES
        .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |depth| {
            Some(depth.saturating_sub(1))
        })
        .unwrap_or(0);
    previous.saturating_sub(1)
}

pub fn pending_fetch_count() -> usize {
    PENDING_FETCHES.load(Ordering::SeqCst)
}

pub fn reset_counters() {
    NAVIGATION_SEQ.store(0, Ordering::SeqCst);
    PENDING_FETCHES.store(0, Ordering::SeqCst);
}

#[cfg(test)]
mod tests {
    use super::*;

    // The counters are process-global, so everything lives in one test
    // function to keep the assertions sequential.
    #[test]
    fn navigation_bookkeeping() {
        // Sequence numbers are strictly increasing and only the newest
        // issued navigation is current.
        let first = next_navigation_seq();
        let second = next_navigation_seq();
        assert!(second > first);
        assert!(!is_current_navigation(first));
        assert!(is_current_navigation(second));

        let third = next_navigation_seq();
        assert!(is_current_navigation(third));
        assert!(!is_current_navigation(second));

        // Pending depth covers overlapping fetches: the indicator shows
        // from the first begin until the last settle.
        let base = pending_fetch_count();
        assert_eq!(begin_pending_fetch(), base);
        assert_eq!(begin_pending_fetch(), base + 1);
        assert_eq!(pending_fetch_count(), base + 2);
        assert_eq!(settle_pending_fetch(), base + 1);
        assert_eq!(settle_pending_fetch(), base);
        assert_eq!(pending_fetch_count(), base);

        // An unbalanced settle saturates at zero instead of wrapping the
        // stored depth, and the depth keeps working afterwards.
        reset_counters();
        assert_eq!(settle_pending_fetch(), 0);
        assert_eq!(pending_fetch_count(), 0);
        assert_eq!(begin_pending_fetch(), 0);
        assert_eq!(settle_pending_fetch(), 0);
        assert_eq!(pending_fetch_count(), 0);
    }
}
