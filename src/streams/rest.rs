//! Generic paginated REST stream

use super::descriptor::StreamDescriptor;
use crate::decode::{JsonDecoder, RecordDecoder};
use crate::error::{Error, Result};
use crate::http::HttpClient;
use crate::pagination::{HeaderPaginator, Paginator};
use crate::request::RequestPlan;
use crate::types::{Context, PageToken, Record};
use futures::stream::{self, Stream, TryStreamExt};
use std::pin::Pin;
use std::sync::Arc;
use tracing::debug;
use url::Url;

/// Lazy, fallible sequence of records
pub type RecordStream = Pin<Box<dyn Stream<Item = Result<Record>> + Send>>;

/// One fetched page
#[derive(Debug, Clone, Default)]
pub struct Page {
    /// Conformed records in response order
    pub records: Vec<Record>,
    /// Token for the following page, `None` on the last page
    pub next: Option<PageToken>,
}

/// Position of the page loop
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum LoopState {
    AwaitingFirstPage,
    Fetching(PageToken),
    Done,
}

/// Paginated stream over one endpoint
#[derive(Clone)]
pub struct RestStream {
    descriptor: Arc<StreamDescriptor>,
    client: Arc<HttpClient>,
    paginator: Arc<dyn Paginator>,
    decoder: JsonDecoder,
}

impl RestStream {
    /// Create a stream using LearnUpon header pagination
    pub fn new(descriptor: StreamDescriptor, client: Arc<HttpClient>) -> Self {
        let decoder = JsonDecoder::with_path(&descriptor.records_path);
        Self {
            descriptor: Arc::new(descriptor),
            client,
            paginator: Arc::new(HeaderPaginator::default()),
            decoder,
        }
    }

    /// Replace the paginator
    #[must_use]
    pub fn with_paginator(mut self, paginator: Arc<dyn Paginator>) -> Self {
        self.paginator = paginator;
        self
    }

    /// Stream name
    pub fn name(&self) -> &str {
        &self.descriptor.name
    }

    /// Stream descriptor
    pub fn descriptor(&self) -> &StreamDescriptor {
        &self.descriptor
    }

    /// Fetch and conform a single page
    ///
    /// Every failure is reported as [`Error::StreamRequest`] naming this
    /// stream and the request URL.
    pub async fn fetch_page(
        &self,
        context: Option<&Context>,
        token: Option<PageToken>,
    ) -> Result<Page> {
        let plan = RequestPlan::build(&self.descriptor.path, context, token)
            .map_err(|e| e.in_stream(self.name(), &self.descriptor.path))?;
        let mut url = self
            .client
            .url_for(&plan.path)
            .map_err(|e| e.in_stream(self.name(), &plan.path))?;
        if !plan.params.is_empty() {
            url.query_pairs_mut().extend_pairs(&plan.params);
        }

        let page = self
            .fetch_url(url.clone(), token)
            .await
            .map_err(|e| e.in_stream(self.name(), url.as_str()))?;

        debug!(
            stream = %self.name(),
            url = %url,
            records = page.records.len(),
            next = ?page.next,
            "Fetched page"
        );
        Ok(page)
    }

    async fn fetch_url(&self, url: Url, token: Option<PageToken>) -> Result<Page> {
        let response = self.client.get(url).await?;

        let headers = response.headers().clone();
        let body = response.text().await?;

        let records = self
            .decoder
            .decode(&body)?
            .iter()
            .map(|raw| self.descriptor.schema.conform(raw))
            .collect::<Result<Vec<_>>>()?;

        Ok(Page {
            records,
            next: self.paginator.next_token(&headers, token),
        })
    }

    /// All records of the stream, optionally scoped by a parent context
    ///
    /// Pages are requested on demand as the returned stream is polled; the
    /// first error ends it.
    pub fn records(&self, context: Option<Context>) -> RecordStream {
        let this = self.clone();

        let pages = stream::try_unfold(LoopState::AwaitingFirstPage, move |state| {
            let this = this.clone();
            let context = context.clone();
            async move {
                let token = match state {
                    LoopState::AwaitingFirstPage => None,
                    LoopState::Fetching(token) => Some(token),
                    LoopState::Done => return Ok(None),
                };

                let page = this.fetch_page(context.as_ref(), token).await?;
                let next_state = page.next.map_or(LoopState::Done, LoopState::Fetching);
                Ok::<_, Error>(Some((page.records, next_state)))
            }
        });

        Box::pin(
            pages
                .map_ok(|records| stream::iter(records.into_iter().map(Ok::<Record, Error>)))
                .try_flatten(),
        )
    }
}

impl std::fmt::Debug for RestStream {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RestStream")
            .field("descriptor", &self.descriptor)
            .field("decoder", &self.decoder)
            .finish_non_exhaustive()
    }
}
