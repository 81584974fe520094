//! The query window, by composition: the session owns a passive [`View`],
//! a [`TaxRegistry`] and at most one in-flight worker.
//!
//! `Idle → Validating → Querying → {Rendering, ErrorDisplay} → Idle`
//!
//! The worker owns only its request; its result comes back by value over a
//! one-shot channel and is applied on the interactive task by
//! [`Session::complete`]. A completion that does not belong to the current
//! query is dropped.

use std::future::Future;
use std::sync::Arc;

use serde_json::Value;
use tokio::io::{AsyncBufRead, AsyncBufReadExt};
use tokio::sync::oneshot;
use tokio::task::JoinHandle;

use crate::api::TaxRegistry;
use crate::error::QueryError;
use crate::render::{render_error, render_html, render_text};
use crate::validation::validate;
use crate::view::{OutputFormat, Presentation, View};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QueryState {
    Idle,
    Validating,
    Querying { seq: u64 },
    Rendering,
    ErrorDisplay,
}

#[derive(Debug)]
pub struct Completion {
    pub seq: u64,
    pub result: Result<Value, QueryError>,
}

/// Receiving end of one query.
#[derive(Debug)]
pub struct Ticket {
    pub seq: u64,
    receiver: oneshot::Receiver<Completion>,
}

impl Ticket {
    /// Resolves once the worker is done. A worker that died without
    /// reporting still yields a completion, so the UI is always restored.
    pub async fn wait(&mut self) -> Completion {
        match (&mut self.receiver).await {
            Ok(completion) => completion,
            Err(_) => Completion {
                seq: self.seq,
                result: Err(QueryError::TransportError(
                    "the query worker stopped unexpectedly".into(),
                )),
            },
        }
    }
}

/// Waits on the ticket in `slot`, or forever when there is none. Meant for a
/// `tokio::select!` branch.
pub async fn next_completion(slot: &mut Option<Ticket>) -> Completion {
    match slot {
        Some(ticket) => ticket.wait().await,
        None => std::future::pending().await,
    }
}

struct Worker {
    seq: u64,
    handle: JoinHandle<()>,
}

pub struct Session<V: View> {
    view: V,
    registry: Arc<dyn TaxRegistry>,
    presentation: Presentation,
    state: QueryState,
    last_seq: u64,
    worker: Option<Worker>,
}

impl<V: View> Session<V> {
    pub fn new(view: V, registry: Arc<dyn TaxRegistry>, presentation: Presentation) -> Self {
        Self {
            view,
            registry,
            presentation,
            state: QueryState::Idle,
            last_seq: 0,
            worker: None,
        }
    }

    pub fn state(&self) -> QueryState {
        self.state
    }

    pub fn is_busy(&self) -> bool {
        self.worker.is_some()
    }

    #[cfg(test)]
    pub fn view(&self) -> &V {
        &self.view
    }

    /// Validates `raw` and starts the worker. Returns `None` when nothing was
    /// started: invalid input, or a query is already running.
    pub fn submit(&mut self, raw: &str) -> Option<Ticket> {
        if self.is_busy() {
            self.view.warn("A query is already in progress.");
            return None;
        }

        self.state = QueryState::Validating;
        let identificacion = match validate(raw) {
            Ok(id) => id,
            Err(e) => {
                tracing::debug!(error = %e, "identification rejected");
                self.view.warn(&e.to_string());
                self.state = QueryState::Idle;
                return None;
            }
        };

        self.last_seq += 1;
        let seq = self.last_seq;

        self.view.set_busy(true);
        self.state = QueryState::Querying { seq };
        tracing::info!(seq, %identificacion, "query started");

        let (tx, receiver) = oneshot::channel();
        let registry = Arc::clone(&self.registry);
        let handle = tokio::spawn(async move {
            let result = registry.execute(&identificacion).await;
            if tx.send(Completion { seq, result }).is_err() {
                tracing::debug!(seq, "nobody waiting for the result");
            }
        });

        self.worker = Some(Worker { seq, handle });
        Some(Ticket { seq, receiver })
    }

    /// Applies a worker's result. Returns the query outcome, or `None` when
    /// the completion is stale and was ignored.
    pub async fn complete(&mut self, completion: Completion) -> Option<Result<(), QueryError>> {
        if self.worker.as_ref().map(|w| w.seq) != Some(completion.seq) {
            tracing::debug!(seq = completion.seq, "discarding stale result");
            return None;
        }

        let outcome = match completion.result {
            Ok(document) => {
                self.state = QueryState::Rendering;
                self.present(&document)
            }
            Err(e) => Err(e),
        };

        if let Err(e) = &outcome {
            self.present_error(e);
        }

        self.finalize().await;
        Some(outcome)
    }

    pub fn clear(&mut self) {
        self.view.clear();
    }

    /// Closing the window: stop and join whatever is still running.
    pub async fn shutdown(&mut self) {
        if let Some(worker) = self.worker.take() {
            tracing::debug!(seq = worker.seq, "aborting outstanding query");
            worker.handle.abort();
            let _ = worker.handle.await;
            self.view.set_busy(false);
        }
        self.state = QueryState::Idle;
    }

    fn present(&mut self, document: &Value) -> Result<(), QueryError> {
        match self.presentation.format {
            OutputFormat::Html => {
                let markup = render_html(document, self.presentation.theme)?;
                self.view.show_markup(&markup);
            }
            OutputFormat::Text => {
                let text = render_text(document)?;
                self.view.show_text(&text);
            }
        }
        Ok(())
    }

    fn present_error(&mut self, error: &QueryError) {
        self.state = QueryState::ErrorDisplay;
        tracing::warn!(%error, "query failed");

        let message = error.to_string();
        self.view.show_error(&render_error(&message));
        self.view.notify_error(&message);
    }

    async fn finalize(&mut self) {
        self.view.set_busy(false);
        if let Some(worker) = self.worker.take() {
            if let Err(e) = worker.handle.await {
                tracing::warn!(seq = worker.seq, error = %e, "query worker did not finish cleanly");
            }
        }
        self.state = QueryState::Idle;
    }
}

/// Drives `session` from `input`, one identification per line, until end of
/// input, `:quit` or `interrupt`.
///
/// End of input lets the running query finish and be shown before shutting
/// down; `:quit` and `interrupt` abort it.
pub async fn run_lines<V, R, I>(session: &mut Session<V>, input: R, interrupt: I) -> std::io::Result<()>
where
    V: View,
    R: AsyncBufRead + Unpin,
    I: Future<Output = ()>,
{
    let mut lines = input.lines();
    let mut pending: Option<Ticket> = None;
    tokio::pin!(interrupt);

    let end_of_input = loop {
        tokio::select! {
            completion = next_completion(&mut pending) => {
                pending = None;
                session.complete(completion).await;
                tracing::debug!(state = ?session.state(), "ready");
            }
            line = lines.next_line() => {
                let Some(line) = line? else {
                    break true;
                };
                match line.trim() {
                    ":quit" | ":q" => break false,
                    ":clear" => session.clear(),
                    input => {
                        if let Some(ticket) = session.submit(input) {
                            pending = Some(ticket);
                        }
                    }
                }
            }
            _ = &mut interrupt => break false,
        }
    };

    if end_of_input {
        if let Some(mut ticket) = pending.take() {
            tracing::debug!(seq = ticket.seq, "end of input, waiting for the running query");
            tokio::select! {
                completion = ticket.wait() => {
                    session.complete(completion).await;
                }
                _ = &mut interrupt => {}
            }
        }
    }

    session.shutdown().await;
    Ok(())
}
