//! Bio fetcher: concurrent profile lookups joined back by position

use std::sync::Arc;

use indicatif::ProgressBar;
use threadline_core::{SourceError, Transport};
use tokio::sync::Semaphore;
use tokio::task::JoinSet;

use crate::api::{Endpoints, UserProfile};

/// Fetch the bio of every author, one request per position.
///
/// Output index `i` is the bio of `authors[i]` regardless of the order in
/// which responses complete. Repeated authors are fetched again. All
/// requests start at once unless `max_concurrency` caps them. The first
/// failure is returned and the remaining requests are aborted.
pub async fn fetch_bios<T: Transport>(
    transport: Arc<T>,
    endpoints: &Endpoints,
    authors: &[String],
    max_concurrency: Option<usize>,
    pb: &ProgressBar,
) -> Result<Vec<String>, SourceError> {
    let permits = max_concurrency.map(|n| Arc::new(Semaphore::new(n.max(1))));
    let mut tasks = JoinSet::new();

    for (idx, author) in authors.iter().enumerate() {
        let transport = Arc::clone(&transport);
        let permits = permits.clone();
        let url = endpoints.user_url(author);
        let author = author.clone();
        tasks.spawn(async move {
            let _permit = match &permits {
                Some(sem) => Some(sem.acquire().await.map_err(|e| SourceError::Fetch {
                    target: author.clone(),
                    status: None,
                    message: e.to_string(),
                })?),
                None => None,
            };
            let body = transport.get_text(&url).await?;
            let profile = UserProfile::from_json(&author, &body)?;
            Ok::<_, SourceError>((idx, profile.about))
        });
    }

    let mut slots: Vec<Option<String>> = vec![None; authors.len()];
    let mut completed = 0usize;
    while let Some(joined) = tasks.join_next().await {
        let (idx, bio) = joined.map_err(|e| SourceError::Fetch {
            target: "bio fetch task".to_string(),
            status: None,
            message: e.to_string(),
        })??;
        slots[idx] = Some(bio);
        completed += 1;
        pb.inc(1);
        log::debug!("bio {completed}/{} fetched ({})", authors.len(), authors[idx]);
    }
    pb.finish_and_clear();

    slots
        .into_iter()
        .zip(authors)
        .map(|(slot, author)| {
            slot.ok_or_else(|| SourceError::schema(author.as_str(), "no bio was reported"))
        })
        .collect()
}
