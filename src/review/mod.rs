// SPDX-License-Identifier: MIT
// SPDX-FileCopyrightText: 2025 Jonathan D. A. Jewell <hyperpolymath>

//! Review protocol: one file at a time, confirmed or corrected by a human
//!
//! There is no session. Each request rebuilds its state from the `path` it
//! carries, and the next file is always recomputed from the live input tree.

use std::path::{Path, PathBuf};
use tracing::{debug, info};

use crate::organizer::Organizer;
use crate::Result;

/// Where a client stands in the review loop
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReviewState {
    /// No path shown yet
    AwaitingPath,
    /// The client is looking at this file
    ShowingPath(PathBuf),
    /// Nothing left to review
    Empty,
}

/// What the transport should send back
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Reply {
    /// Re-request carrying this path (`None` when nothing is pending)
    Redirect(Option<PathBuf>),
    /// Serve the review page as-is
    Page,
    /// Disposition accepted; this is the next file to show
    Next(Option<PathBuf>),
}

/// Result of one interaction
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Transition {
    pub state: ReviewState,
    pub reply: Reply,
}

impl ReviewState {
    /// Rebuild the state from the `path` a request carries
    ///
    /// A missing parameter means nothing was shown yet; an empty one is the
    /// "done" marker a previous redirect produced.
    pub fn from_query(path: Option<&str>) -> Self {
        match path {
            None => ReviewState::AwaitingPath,
            Some("") => ReviewState::Empty,
            Some(p) => ReviewState::ShowingPath(PathBuf::from(p)),
        }
    }

    fn after(next: Option<PathBuf>) -> Self {
        match next {
            Some(path) => ReviewState::ShowingPath(path),
            None => ReviewState::Empty,
        }
    }

    /// Client asks for something to look at
    pub fn fetch(self, organizer: &Organizer) -> Result<Transition> {
        match self {
            ReviewState::AwaitingPath => {
                let next = organizer.next_pending_path()?;
                debug!("Next pending file: {:?}", next);
                Ok(Transition {
                    state: Self::after(next.clone()),
                    reply: Reply::Redirect(next),
                })
            }
            state => Ok(Transition {
                state,
                reply: Reply::Page,
            }),
        }
    }

    /// Client files `path` under `category`
    ///
    /// Accepted from any state; the organizer refuses paths that are not
    /// pending files.
    pub fn submit(self, organizer: &Organizer, path: &Path, category: &str) -> Result<Transition> {
        let destination = organizer.move_to_category(path, category)?;
        info!("Reviewed {:?} as {} -> {:?}", path, category, destination);

        let next = organizer.next_pending_path()?;
        Ok(Transition {
            state: Self::after(next.clone()),
            reply: Reply::Next(next),
        })
    }
}
