//! One polling pass: load checkpoint, fetch, extract, compare, notify, save.

use tracing::{error, info, warn};
use url::Url;

use crate::checkpoint::{CheckpointError, CheckpointStore};
use crate::extractor::{extract_latest_post, ParseFailure};
use crate::fetcher::{FetchError, ListingSource};
use crate::notifier::{Notifier, NotifyError};

/// How a pass ended.
#[derive(Debug)]
pub enum RunOutcome {
    /// The listing page could not be fetched. Checkpoint untouched.
    FetchFailed(FetchError),
    /// The newest post row was malformed. Checkpoint untouched.
    ParseFailed(ParseFailure),
    /// The listing has no regular posts. Checkpoint untouched.
    NoPost,
    UpToDate { latest: u64, last_seen: u64 },
    /// A newer post was announced and the checkpoint advanced.
    Notified { post_id: u64 },
    /// A newer post was found but the announcement failed. The checkpoint
    /// was still advanced.
    NotifyFailed { post_id: u64, error: NotifyError },
}

impl RunOutcome {
    /// Process exit code for this outcome.
    ///
    /// Without `strict` every outcome exits 0.
    #[must_use]
    pub fn exit_code(&self, strict: bool) -> i32 {
        if !strict {
            return 0;
        }
        match self {
            Self::FetchFailed(_) => 2,
            Self::ParseFailed(_) => 3,
            Self::NotifyFailed { .. } => 4,
            Self::NoPost | Self::UpToDate { .. } | Self::Notified { .. } => 0,
        }
    }
}

/// Run a single pass.
///
/// Fetch, parse and delivery failures are reported through the returned
/// [`RunOutcome`]. The checkpoint is written only when a strictly newer post
/// was found, after the notification attempt and regardless of its result.
///
/// # Errors
///
/// Returns an error only if the checkpoint cannot be written.
pub async fn run_once<S, N>(
    store: &CheckpointStore,
    source: &S,
    notifier: &N,
    origin: &Url,
) -> Result<RunOutcome, CheckpointError>
where
    S: ListingSource + ?Sized,
    N: Notifier + ?Sized,
{
    let last_seen = store.load().await;
    info!(last_seen, "Loaded checkpoint");

    let document = match source.fetch().await {
        Ok(document) => document,
        Err(e) => {
            error!("Failed to fetch listing page: {e}");
            return Ok(RunOutcome::FetchFailed(e));
        }
    };

    let post = match extract_latest_post(&document, origin) {
        Ok(Some(post)) => post,
        Ok(None) => {
            warn!("No regular post found on the listing page");
            return Ok(RunOutcome::NoPost);
        }
        Err(e) => {
            error!("Failed to extract latest post: {e}");
            return Ok(RunOutcome::ParseFailed(e));
        }
    };

    info!(latest = post.id, title = %post.title, "Found latest post");

    if post.id <= last_seen {
        info!(latest = post.id, last_seen, "No new post");
        return Ok(RunOutcome::UpToDate {
            latest: post.id,
            last_seen,
        });
    }

    info!(post_id = post.id, link = %post.link, "New post found, sending notification");
    let delivery = notifier.notify(&post).await;
    match &delivery {
        Ok(()) => info!(post_id = post.id, "Notification sent"),
        Err(e) => error!(post_id = post.id, "Failed to send notification: {e}"),
    }

    store.save(post.id).await?;
    info!(post_id = post.id, path = %store.path().display(), "Checkpoint saved");

    Ok(match delivery {
        Ok(()) => RunOutcome::Notified { post_id: post.id },
        Err(error) => RunOutcome::NotifyFailed {
            post_id: post.id,
            error,
        },
    })
}
