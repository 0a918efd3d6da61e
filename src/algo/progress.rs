//! Progress reporting for whole-surface computations.
//!
//! [`GeodesicQuery::all_pairs_distances`](crate::algo::geodesic::GeodesicQuery::all_pairs_distances)
//! runs one search per vertex and reports after each root.
//!
//! ```
//! use sulcus::algo::progress::Progress;
//!
//! let progress = Progress::new(|done, roots, stage| {
//!     eprintln!("{stage}: {done}/{roots}");
//! });
//! progress.report(3, 10, "all-pairs geodesic distances");
//! ```

type Callback = Box<dyn Fn(usize, usize, &str) + Send + Sync>;

/// Receives `(done, total, stage)` updates.
///
/// `done` counts from 0; a final call with `done == total` marks the end of
/// the computation.
#[derive(Default)]
pub struct Progress {
    callback: Option<Callback>,
}

impl Progress {
    /// Forward updates to `callback`.
    pub fn new<F>(callback: F) -> Self
    where
        F: Fn(usize, usize, &str) + Send + Sync + 'static,
    {
        Self {
            callback: Some(Box::new(callback)),
        }
    }

    /// Discard all updates.
    pub fn none() -> Self {
        Self { callback: None }
    }

    /// True when updates go nowhere.
    pub fn is_silent(&self) -> bool {
        self.callback.is_none()
    }

    /// Send one update.
    #[inline]
    pub fn report(&self, done: usize, total: usize, stage: &str) {
        if let Some(callback) = &self.callback {
            callback(done, total, stage);
        }
    }
}

impl std::fmt::Debug for Progress {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Progress")
            .field("silent", &self.is_silent())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    #[test]
    fn test_reports_reach_callback() {
        let last = Arc::new(AtomicUsize::new(0));
        let seen = Arc::clone(&last);
        let progress = Progress::new(move |done, total, _| {
            assert!(done <= total);
            seen.store(done, Ordering::SeqCst);
        });
        assert!(!progress.is_silent());
        for done in 0..=4 {
            progress.report(done, 4, "roots");
        }
        assert_eq!(last.load(Ordering::SeqCst), 4);
    }

    #[test]
    fn test_none_is_silent() {
        let progress = Progress::default();
        assert!(progress.is_silent());
        progress.report(1, 2, "ignored");
        assert_eq!(format!("{progress:?}"), "Progress { silent: true }");
    }
}
