//! Progress events emitted while a search is running.
//!
//! Advisory only: a front end may render them as status text. Delivery is
//! fire-and-forget, a dropped receiver never affects the search.

use std::fmt;

use tokio::sync::mpsc::UnboundedSender;

use crate::types::Provider;

/// A status update from the aggregation pipeline.
#[derive(Debug, Clone, PartialEq)]
pub enum SearchProgress {
    /// A provider page request has been issued.
    Searching {
        /// The provider being queried.
        provider: Provider,
    },
    /// Pair-search lookups are running.
    PairSearch {
        /// Share of records processed so far, `0..=100`.
        percent: u8,
    },
    /// Ranking the merged records.
    Sorting,
    /// The requested page is ready.
    Done,
}

impl fmt::Display for SearchProgress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Searching { provider } => write!(f, "Searching {provider}..."),
            Self::PairSearch { percent } => {
                write!(f, "Performing a pair search, this may take a bit... ({percent}%)")
            }
            Self::Sorting => f.write_str("Sorting..."),
            Self::Done => Ok(()),
        }
    }
}

/// Optional sink for [`SearchProgress`] events.
#[derive(Debug, Clone, Default)]
pub struct ProgressReporter {
    tx: Option<UnboundedSender<SearchProgress>>,
}

impl ProgressReporter {
    /// Report into the given channel.
    pub fn new(tx: UnboundedSender<SearchProgress>) -> Self {
        Self { tx: Some(tx) }
    }

    /// A reporter that discards every event.
    pub fn disabled() -> Self {
        Self::default()
    }

    /// Emit an event. Send failures (closed receiver) are ignored.
    pub fn emit(&self, event: SearchProgress) {
        if let Some(tx) = &self.tx {
            let _ = tx.send(event);
        }
    }
}

/// Integer percentage of `done` out of `total`, rounded to nearest.
pub(crate) fn percent(done: usize, total: usize) -> u8 {
    if total == 0 {
        return 100;
    }
    let pct = (done as f64 / total as f64 * 100.0).round();
    pct.clamp(0.0, 100.0) as u8
}
