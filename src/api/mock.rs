//! Scripted `ListingApi` for tests and offline runs

use std::collections::VecDeque;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;

use super::{ApiError, CreatedListing, ListingApi, Thumbnails};
use crate::submission::ListingPayload;

/// Mock implementation for testing
///
/// Records every submitted payload. Scripted responses are consumed in order;
/// once they run out every submission succeeds with a sequential id.
#[derive(Clone)]
pub struct MockListingApi {
    submissions: Arc<Mutex<Vec<ListingPayload>>>,
    responses: Arc<Mutex<VecDeque<Result<CreatedListing, ApiError>>>>,
    thumbnails: Arc<Mutex<Result<Thumbnails, ApiError>>>,
    next_id: Arc<Mutex<u64>>,
}

impl Default for MockListingApi {
    fn default() -> Self {
        Self {
            submissions: Arc::default(),
            responses: Arc::default(),
            thumbnails: Arc::new(Mutex::new(Ok(Thumbnails::new()))),
            next_id: Arc::new(Mutex::new(1)),
        }
    }
}

impl MockListingApi {
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue the response for the next submission
    pub fn push_response(&self, response: Result<CreatedListing, ApiError>) {
        self.responses.lock().unwrap().push_back(response);
    }

    pub fn set_thumbnails(&self, thumbnails: Result<Thumbnails, ApiError>) {
        *self.thumbnails.lock().unwrap() = thumbnails;
    }

    pub fn submissions(&self) -> Vec<ListingPayload> {
        self.submissions.lock().unwrap().clone()
    }

    pub fn submission_count(&self) -> usize {
        self.submissions.lock().unwrap().len()
    }
}

#[async_trait]
impl ListingApi for MockListingApi {
    async fn fetch_thumbnails(&self) -> Result<Thumbnails, ApiError> {
        self.thumbnails.lock().unwrap().clone()
    }

    async fn create_listing(&self, payload: ListingPayload) -> Result<CreatedListing, ApiError> {
        self.submissions.lock().unwrap().push(payload);

        if let Some(response) = self.responses.lock().unwrap().pop_front() {
            return response;
        }

        let mut next_id = self.next_id.lock().unwrap();
        let id = *next_id;
        *next_id += 1;
        Ok(CreatedListing { id: id.to_string() })
    }
}
