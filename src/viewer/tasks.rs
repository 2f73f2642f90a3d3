//! Background work and the events it produces
//!
//! Network and decode work runs on a tokio runtime owned by [`TaskRunner`].
//! Tasks never touch viewer state; they post [`ViewerEvent`]s through an
//! [`EventSink`] and the UI thread applies them to the shell.

use std::{
    any::Any,
    future::Future,
    panic::AssertUnwindSafe,
    sync::{mpsc, Arc},
};

use futures::FutureExt;
use log::{debug, error, trace};
use tokio::{runtime::Runtime, task::JoinHandle};
use winit::event_loop::EventLoopProxy;

use super::{
    loader::ModelLoader,
    shell::{LoadRequest, LoadTicket},
};
use crate::{
    catalog::{CatalogSource, Product},
    error::{Result, ViewerError},
    gfx::scene::Object,
};

/// Results delivered from background tasks to the UI thread
pub enum ViewerEvent {
    CatalogFetched(Result<Vec<Product>>),
    ModelProgress { ticket: LoadTicket, fraction: f32 },
    ModelLoaded { ticket: LoadTicket, object: Object },
    ModelFailed { ticket: LoadTicket, error: ViewerError },
}

impl std::fmt::Debug for ViewerEvent {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ViewerEvent::CatalogFetched(result) => f
                .debug_tuple("CatalogFetched")
                .field(&result.as_ref().map(Vec::len))
                .finish(),
            ViewerEvent::ModelProgress { ticket, fraction } => f
                .debug_struct("ModelProgress")
                .field("ticket", ticket)
                .field("fraction", fraction)
                .finish(),
            ViewerEvent::ModelLoaded { ticket, object } => f
                .debug_struct("ModelLoaded")
                .field("ticket", ticket)
                .field("object", &object.name)
                .finish(),
            ViewerEvent::ModelFailed { ticket, error } => f
                .debug_struct("ModelFailed")
                .field("ticket", ticket)
                .field("error", error)
                .finish(),
        }
    }
}

/// Where background tasks post their results
pub trait EventSink: Send + Sync + 'static {
    /// Returns `false` once nobody is listening anymore
    fn send(&self, event: ViewerEvent) -> bool;
}

impl EventSink for EventLoopProxy<ViewerEvent> {
    fn send(&self, event: ViewerEvent) -> bool {
        self.send_event(event).is_ok()
    }
}

impl EventSink for mpsc::Sender<ViewerEvent> {
    fn send(&self, event: ViewerEvent) -> bool {
        mpsc::Sender::send(self, event).is_ok()
    }
}

/// Spawns the catalog fetch and model loads, keeping at most one load alive
pub struct TaskRunner {
    runtime: Runtime,
    sink: Arc<dyn EventSink>,
    catalog: CatalogSource,
    loader: ModelLoader,
    model_task: Option<(LoadTicket, JoinHandle<()>)>,
}

impl TaskRunner {
    /// Builds a small multi-threaded runtime for network and decode work
    pub fn new(
        sink: impl EventSink,
        catalog: CatalogSource,
        loader: ModelLoader,
    ) -> std::io::Result<Self> {
        let runtime = tokio::runtime::Builder::new_multi_thread()
            .worker_threads(2)
            .thread_name("vitrine-worker")
            .enable_all()
            .build()?;

        Ok(Self {
            runtime,
            sink: Arc::new(sink),
            catalog,
            loader,
            model_task: None,
        })
    }

    pub fn fetch_catalog(&self) {
        let sink = Arc::clone(&self.sink);
        let catalog = self.catalog.clone();

        self.runtime.spawn(async move {
            let result = match guarded(catalog.fetch()).await {
                Ok(result) => result,
                Err(reason) => {
                    error!("Catalog fetch panicked: {}", reason);
                    Err(ViewerError::Platform(format!("catalog task panicked: {}", reason)))
                }
            };
            sink.send(ViewerEvent::CatalogFetched(result));
        });
    }

    /// Starts loading `request`, aborting whatever load was running
    pub fn load_model(&mut self, request: LoadRequest) {
        self.cancel_model_load();

        let LoadRequest { ticket, url } = request;
        let sink = Arc::clone(&self.sink);
        let loader = self.loader.clone();

        let handle = self.runtime.spawn(async move {
            let progress_sink = Arc::clone(&sink);
            let mut last_percent = None;

            // Whole percents are all the overlay shows
            let on_progress = move |fraction: f32| {
                let percent = (fraction.clamp(0.0, 1.0) * 100.0) as u32;
                if last_percent != Some(percent) {
                    last_percent = Some(percent);
                    progress_sink.send(ViewerEvent::ModelProgress { ticket, fraction });
                }
            };

            let event = match guarded(loader.load(&url, on_progress)).await {
                Ok(Ok(object)) => ViewerEvent::ModelLoaded { ticket, object },
                Ok(Err(error)) => ViewerEvent::ModelFailed { ticket, error },
                Err(reason) => {
                    error!("Model load for {} panicked: {}", url, reason);
                    ViewerEvent::ModelFailed {
                        ticket,
                        error: ViewerError::ModelLoad {
                            url: url.clone(),
                            reason: format!("loader panicked: {}", reason),
                        },
                    }
                }
            };
            if !sink.send(event) {
                trace!("Event loop gone, dropping result for {}", url);
            }
        });

        self.model_task = Some((ticket, handle));
    }

    /// Aborts the running model load, if any
    pub fn cancel_model_load(&mut self) {
        if let Some((ticket, handle)) = self.model_task.take() {
            if !handle.is_finished() {
                debug!("Aborting superseded load (ticket {})", ticket.generation());
                handle.abort();
            }
        }
    }

    /// Ticket of the load started last, finished or not
    pub fn active_ticket(&self) -> Option<LoadTicket> {
        self.model_task.as_ref().map(|(ticket, _)| *ticket)
    }
}

/// Runs `work`, turning a panic into its message so the task can still report.
///
/// The work stays on the calling task, so aborting that task cancels it too.
async fn guarded<T>(work: impl Future<Output = T>) -> std::result::Result<T, String> {
    AssertUnwindSafe(work)
        .catch_unwind()
        .await
        .map_err(|payload| panic_message(payload.as_ref()))
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(message) = payload.downcast_ref::<&str>() {
        message.to_string()
    } else if let Some(message) = payload.downcast_ref::<String>() {
        message.clone()
    } else {
        "unknown panic".to_string()
    }
}
