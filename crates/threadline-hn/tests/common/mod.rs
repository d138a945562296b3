//! Shared helpers for threadline-hn integration tests
#![allow(dead_code)]

use std::collections::{HashMap, HashSet};
use std::sync::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use serde_json::json;
use threadline_core::{SourceError, Transport};
use threadline_hn::Endpoints;

pub const BASE_URL: &str = "http://hn.mock/api/v1";

pub fn endpoints() -> Endpoints {
    Endpoints::new(BASE_URL).expect("mock base URL is valid")
}

struct Route {
    delay: Duration,
    response: Result<String, u16>,
}

/// In-memory transport with per-URL canned responses and delays.
///
/// Unknown URLs answer 404. Every request is recorded in order, and the
/// peak number of requests in flight at once is tracked.
#[derive(Default)]
pub struct MockTransport {
    routes: HashMap<String, Route>,
    panics: HashSet<String>,
    requests: Mutex<Vec<String>>,
    in_flight: AtomicUsize,
    max_in_flight: AtomicUsize,
}

impl MockTransport {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn ok(self, url: impl Into<String>, body: impl Into<String>) -> Self {
        self.ok_after(url, body, Duration::ZERO)
    }

    pub fn ok_after(
        mut self,
        url: impl Into<String>,
        body: impl Into<String>,
        delay: Duration,
    ) -> Self {
        self.routes.insert(
            url.into(),
            Route {
                delay,
                response: Ok(body.into()),
            },
        );
        self
    }

    pub fn fail(mut self, url: impl Into<String>, status: u16) -> Self {
        self.routes.insert(
            url.into(),
            Route {
                delay: Duration::ZERO,
                response: Err(status),
            },
        );
        self
    }

    /// The request task panics instead of answering
    pub fn panic_on(mut self, url: impl Into<String>) -> Self {
        self.panics.insert(url.into());
        self
    }

    pub fn requests(&self) -> Vec<String> {
        self.requests.lock().unwrap().clone()
    }

    pub fn max_in_flight(&self) -> usize {
        self.max_in_flight.load(Ordering::SeqCst)
    }
}

impl Transport for MockTransport {
    async fn get_text(&self, url: &str) -> Result<String, SourceError> {
        self.requests.lock().unwrap().push(url.to_string());
        if self.panics.contains(url) {
            panic!("mock transport blew up on {url}");
        }
        let now = self.in_flight.fetch_add(1, Ordering::SeqCst) + 1;
        self.max_in_flight.fetch_max(now, Ordering::SeqCst);

        let result = match self.routes.get(url) {
            Some(route) => {
                if !route.delay.is_zero() {
                    tokio::time::sleep(route.delay).await;
                }
                match &route.response {
                    Ok(body) => Ok(body.clone()),
                    Err(status) => Err(SourceError::Fetch {
                        target: url.to_string(),
                        status: Some(*status),
                        message: "mock failure".to_string(),
                    }),
                }
            }
            None => Err(SourceError::Fetch {
                target: url.to_string(),
                status: Some(404),
                message: "no mock route".to_string(),
            }),
        };

        self.in_flight.fetch_sub(1, Ordering::SeqCst);
        result
    }
}

/// Comment hit as the search endpoint returns it
pub fn hit(author: &str, created_at_i: i64, object_id: &str, text: &str) -> serde_json::Value {
    json!({
        "author": author,
        "created_at_i": created_at_i,
        "objectID": object_id,
        "comment_text": text,
        "story_id": 1,
        "_tags": ["comment"]
    })
}

pub fn search_body(hits: Vec<serde_json::Value>, page: u32, nb_pages: u32, nb_hits: u64) -> String {
    json!({
        "hits": hits,
        "page": page,
        "nbPages": nb_pages,
        "nbHits": nb_hits,
        "hitsPerPage": 100
    })
    .to_string()
}

pub fn profile_body(username: &str, about: Option<&str>) -> String {
    match about {
        Some(about) => json!({ "username": username, "about": about }).to_string(),
        None => json!({ "username": username }).to_string(),
    }
}
