//! Listing orchestrators.
//!
//! A [`Listing`] ties a candidate source to a pipeline: fetch candidates,
//! shape them (text search, filters, sort or the order-history filter),
//! paginate and turn each item into a view model. One listing exists per
//! screen section; see [`ListingContext`].

mod contexts;
mod pipeline;
mod source;

use serde::Serialize;
use tracing::{debug, warn};

use powermarket_core::{Page, PageRequest, paginate};

use crate::view::PaginationControls;

pub use contexts::{OrderListing, ProductListing};
pub use pipeline::{OrderPipeline, OrderQuery, Pipeline, ProductPipeline, ProductQuery};
pub use source::{
    CandidateSource, CatalogScope, CatalogSource, OrderHistorySource, RecommendationSource,
    RelatedSource,
};

/// Which screen section a listing feeds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(tag = "kind", content = "target", rename_all = "kebab-case")]
pub enum ListingContext {
    LandingBestSellers,
    LandingNewArrivals,
    Category(powermarket_catalog::Category),
    Search,
    CartRecommendations,
    Related(powermarket_catalog::ProductId),
    OrderHistory,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum ListingPhase {
    #[default]
    Idle,
    Loading,
    DisplayingResults,
    DisplayingEmpty,
}

/// Identifies one load. Only the most recently issued ticket may complete.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LoadTicket(u64);

/// What the renderer receives after a load.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ListingResult<V> {
    pub context: ListingContext,
    pub phase: ListingPhase,
    pub page: Page<V>,
    pub controls: PaginationControls,
}

pub struct Listing<S, P>
where
    S: CandidateSource,
    P: Pipeline<Item = S::Item>,
{
    context: ListingContext,
    source: S,
    pipeline: P,
    page: usize,
    page_size: usize,
    phase: ListingPhase,
    generation: u64,
    candidates: Vec<S::Item>,
    result: Option<ListingResult<P::View>>,
}

impl<S, P> Listing<S, P>
where
    S: CandidateSource,
    P: Pipeline<Item = S::Item>,
{
    pub fn new(context: ListingContext, source: S, pipeline: P, page_size: usize) -> Self {
        Self {
            context,
            source,
            pipeline,
            page: 1,
            page_size,
            phase: ListingPhase::Idle,
            generation: 0,
            candidates: Vec::new(),
            result: None,
        }
    }

    pub fn context(&self) -> ListingContext {
        self.context
    }

    pub fn phase(&self) -> ListingPhase {
        self.phase
    }

    pub fn page(&self) -> usize {
        self.page
    }

    pub fn page_size(&self) -> usize {
        self.page_size
    }

    pub fn pipeline(&self) -> &P {
        &self.pipeline
    }

    /// The last completed result, if any load has finished.
    pub fn result(&self) -> Option<&ListingResult<P::View>> {
        self.result.as_ref()
    }

    /// Enter `Loading` and invalidate every earlier ticket.
    pub fn begin(&mut self) -> LoadTicket {
        self.generation += 1;
        self.phase = ListingPhase::Loading;
        LoadTicket(self.generation)
    }

    /// Finish the load identified by `ticket` with freshly fetched
    /// candidates. Returns `false`, changing nothing, for a stale ticket.
    pub fn complete(&mut self, ticket: LoadTicket, candidates: Vec<S::Item>) -> bool {
        if ticket.0 != self.generation {
            debug!(context = ?self.context, ticket = ticket.0, current = self.generation, "ignoring stale load");
            return false;
        }
        self.candidates = candidates;
        self.render();
        true
    }

    /// Fetch candidates and recompute the visible page.
    ///
    /// A failing source is logged and shown as an empty listing.
    ///
    /// `&mut self` is held across the fetch, so the ticket issued here is
    /// still current when the candidates arrive.
    pub async fn load(&mut self) -> &ListingResult<P::View> {
        self.begin();
        self.candidates = match self.source.candidates().await {
            Ok(candidates) => candidates,
            Err(err) => {
                warn!(context = ?self.context, error = %err, "candidate source failed");
                Vec::new()
            }
        };
        self.render()
    }

    pub async fn go_to_page(&mut self, page: usize) -> &ListingResult<P::View> {
        self.page = page;
        self.load().await
    }

    /// Apply `change` to the pipeline and reload, optionally back on page 1.
    pub async fn refine(&mut self, change: impl FnOnce(&mut P), reset_page: bool) -> &ListingResult<P::View> {
        change(&mut self.pipeline);
        if reset_page {
            self.page = 1;
        }
        self.load().await
    }

    fn render(&mut self) -> &ListingResult<P::View> {
        let shaped = self.pipeline.shape(&self.candidates);
        let page = paginate(&shaped, PageRequest::new(self.page, self.page_size));
        let pipeline = &self.pipeline;
        let page = page.map(|item| pipeline.view(&item));

        self.phase = if shaped.is_empty() {
            ListingPhase::DisplayingEmpty
        } else {
            ListingPhase::DisplayingResults
        };
        debug!(
            context = ?self.context,
            candidates = self.candidates.len(),
            shaped = shaped.len(),
            page = self.page,
            total_pages = page.total_pages,
            "listing rendered"
        );

        self.result.insert(ListingResult {
            context: self.context,
            phase: self.phase,
            controls: PaginationControls::for_page(&page),
            page,
        })
    }
}
