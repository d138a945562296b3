//! Comment paginator: walks every search page of a thread in order

use std::time::Duration;

use indicatif::ProgressBar;
use threadline_core::{SourceError, Transport};

use crate::api::{CommentRecord, Endpoints, SearchPage};

/// Page size used by the search endpoint unless configured otherwise
pub const DEFAULT_PAGE_SIZE: u32 = 100;

/// All comments of a thread, in the order the API returned them
#[derive(Debug, Default)]
pub struct Paginated {
    pub comments: Vec<CommentRecord>,
    pub pages_fetched: u32,
    /// `nbHits` from the last page
    pub reported_hits: u64,
}

/// Fetch every page of comments for `thread_id`.
///
/// Pages are requested one at a time starting at 0 and the loop stops once
/// the page just fetched is the last one the API reports. A thread with no
/// comments reports zero pages, so exactly one request is made and the
/// result is empty. Any failed page aborts the whole fetch.
pub async fn fetch_all_comments<T: Transport>(
    transport: &T,
    endpoints: &Endpoints,
    thread_id: &str,
    page_size: u32,
    page_delay: Duration,
    pb: &ProgressBar,
) -> Result<Paginated, SourceError> {
    let mut result = Paginated::default();
    let mut page: u32 = 0;

    loop {
        if page > 0 && !page_delay.is_zero() {
            tokio::time::sleep(page_delay).await;
        }

        let url = endpoints.search_url(thread_id, page, page_size);
        log::info!("Fetching page {page} of thread {thread_id}");
        pb.set_message(format!("page {page}"));

        let body = transport.get_text(&url).await?;
        let parsed = SearchPage::from_json(&url, &body)?;
        log::debug!(
            "page {page}: {} hits ({} pages, {} hits total)",
            parsed.hits.len(),
            parsed.nb_pages,
            parsed.nb_hits
        );

        result.comments.extend(parsed.hits);
        result.pages_fetched += 1;
        result.reported_hits = parsed.nb_hits;

        page += 1;
        if page >= parsed.nb_pages {
            break;
        }
    }

    pb.finish_and_clear();
    Ok(result)
}
