//! The viewer's session state machine
//!
//! [`ViewerShell`] is pure state: it never performs I/O. Results of the
//! catalog fetch and of model loads are fed in by the app, and the shell
//! answers with what should happen next ([`ViewerShell::pending_load`]).
//! This keeps every transition unit-testable without a window or GPU.

use log::{debug, error, info, warn};

use super::{filter::FilterState, pagination::PaginationController};
use crate::{
    catalog::Product,
    error::{Result, ViewerError},
};

/// Generation number of one model load.
///
/// Every change of the wanted model issues a new ticket; callbacks carrying
/// any other ticket are stale and ignored.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct LoadTicket(u64);

impl LoadTicket {
    pub fn next(self) -> Self {
        LoadTicket(self.0 + 1)
    }

    pub fn generation(self) -> u64 {
        self.0
    }
}

/// A model the app should start loading
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoadRequest {
    pub ticket: LoadTicket,
    pub url: String,
}

/// Session-level phase
#[derive(Debug, Clone, PartialEq)]
pub enum ShellPhase {
    /// Waiting for the product list
    FetchingCatalog,
    /// Products available; filter and navigation are live
    Browsing,
    /// The catalog could not be fetched. Terminal.
    Failed(ViewerError),
    /// The catalog was fetched but is empty. Terminal.
    CatalogEmpty,
}

impl ShellPhase {
    pub fn is_terminal(&self) -> bool {
        matches!(self, ShellPhase::Failed(_) | ShellPhase::CatalogEmpty)
    }
}

/// What the viewport shows for the current selection
#[derive(Debug, Clone, PartialEq)]
pub enum ModelState {
    /// No model URL (or nothing selected): the placeholder cube
    Placeholder,
    /// Download or decode in flight
    Loading { progress: f32 },
    /// The model is framed and on screen
    Ready,
    /// Loading failed; the placeholder is shown instead
    Failed { reason: String },
}

impl ModelState {
    pub fn shows_placeholder(&self) -> bool {
        matches!(self, ModelState::Placeholder | ModelState::Failed { .. })
    }
}

#[derive(Debug)]
pub struct ViewerShell {
    phase: ShellPhase,
    pagination: PaginationController,
    model_state: ModelState,
    /// Identity of the wanted model; `None` means placeholder
    model_url: Option<String>,
    ticket: LoadTicket,
    pending: Option<LoadRequest>,
}

impl Default for ViewerShell {
    fn default() -> Self {
        Self::new()
    }
}

impl ViewerShell {
    pub fn new() -> Self {
        Self {
            phase: ShellPhase::FetchingCatalog,
            pagination: PaginationController::new(),
            model_state: ModelState::Placeholder,
            model_url: None,
            ticket: LoadTicket::default(),
            pending: None,
        }
    }

    /// Applies the result of the catalog fetch. Only the first result counts.
    pub fn on_catalog(&mut self, result: Result<Vec<Product>>) {
        if self.phase != ShellPhase::FetchingCatalog {
            warn!("Ignoring catalog result in phase {:?}", self.phase);
            return;
        }

        match result {
            Ok(products) if products.is_empty() => self.phase = ShellPhase::CatalogEmpty,
            Err(ViewerError::EmptyCatalog) => self.phase = ShellPhase::CatalogEmpty,
            Err(e) => {
                error!("Failed to fetch products: {}", e);
                self.phase = ShellPhase::Failed(e);
            }
            Ok(products) => {
                info!("Browsing {} products", products.len());
                self.pagination.set_source_list(products);
                self.phase = ShellPhase::Browsing;
                self.select_current_model();
            }
        }
    }

    pub fn set_filter(&mut self, filter: FilterState) {
        if self.phase != ShellPhase::Browsing || filter == self.pagination.filter() {
            return;
        }
        debug!("Filter -> {}", filter);
        self.pagination.set_filter(filter);
        self.select_current_model();
    }

    pub fn next_product(&mut self) {
        if self.phase != ShellPhase::Browsing {
            return;
        }
        self.pagination.next();
        self.select_current_model();
    }

    pub fn previous_product(&mut self) {
        if self.phase != ShellPhase::Browsing {
            return;
        }
        self.pagination.previous();
        self.select_current_model();
    }

    /// Records progress for `ticket`; returns whether it was applied.
    ///
    /// Values are clamped to `[0, 1]` and never move the bar backwards.
    pub fn on_model_progress(&mut self, ticket: LoadTicket, fraction: f32) -> bool {
        if ticket != self.ticket || fraction.is_nan() {
            return false;
        }
        let ModelState::Loading { progress } = &mut self.model_state else {
            return false;
        };
        *progress = progress.max(fraction.clamp(0.0, 1.0));
        true
    }

    /// Hands `model` back if `ticket` is the current load, `None` if stale.
    ///
    /// The caller frames and displays the returned model.
    pub fn accept_model<M>(&mut self, ticket: LoadTicket, model: M) -> Option<M> {
        if ticket != self.ticket || !matches!(self.model_state, ModelState::Loading { .. }) {
            debug!("Dropping stale model for ticket {}", ticket.generation());
            return None;
        }
        self.model_state = ModelState::Ready;
        Some(model)
    }

    /// Records a failed load; returns whether it was applied.
    ///
    /// The viewer falls back to the placeholder and browsing continues.
    pub fn on_model_failed(&mut self, ticket: LoadTicket, err: ViewerError) -> bool {
        if ticket != self.ticket || !matches!(self.model_state, ModelState::Loading { .. }) {
            debug!("Ignoring stale failure for ticket {}: {}", ticket.generation(), err);
            return false;
        }
        error!("Model load failed: {}", err);
        self.model_state = ModelState::Failed {
            reason: err.to_string(),
        };
        true
    }

    /// Takes the load the app should start, if the wanted model changed
    pub fn pending_load(&mut self) -> Option<LoadRequest> {
        self.pending.take()
    }

    /// Re-derives the wanted model from the current product.
    ///
    /// The same URL as before keeps the running or finished load.
    fn select_current_model(&mut self) {
        let url = self
            .pagination
            .current()
            .and_then(Product::model_url)
            .map(str::to_string);

        if url == self.model_url {
            return;
        }

        self.ticket = self.ticket.next();
        self.model_url = url;

        match &self.model_url {
            Some(url) => {
                debug!("Requesting model {} (ticket {})", url, self.ticket.generation());
                self.model_state = ModelState::Loading { progress: 0.0 };
                self.pending = Some(LoadRequest {
                    ticket: self.ticket,
                    url: url.clone(),
                });
            }
            None => {
                self.model_state = ModelState::Placeholder;
                self.pending = None;
            }
        }
    }

    pub fn phase(&self) -> &ShellPhase {
        &self.phase
    }

    pub fn model_state(&self) -> &ModelState {
        &self.model_state
    }

    pub fn pagination(&self) -> &PaginationController {
        &self.pagination
    }

    pub fn filter(&self) -> FilterState {
        self.pagination.filter()
    }

    pub fn current_product(&self) -> Option<&Product> {
        self.pagination.current()
    }

    pub fn ticket(&self) -> LoadTicket {
        self.ticket
    }

    /// Whole-percent progress while a model loads
    pub fn loading_percent(&self) -> Option<u32> {
        match self.model_state {
            ModelState::Loading { progress } => Some((progress * 100.0).round() as u32),
            _ => None,
        }
    }
}
