//! Background provider worker.
//!
//! Runs provider queries off the UI thread. Requests go in through
//! [`ProviderWorker::submit`], responses come back in completion order through
//! [`ProviderWorker::try_recv`]. Nothing is cancelled: superseded responses
//! still arrive and are dropped by the session.

use std::sync::mpsc::{self, Receiver, Sender, TryRecvError};
use std::sync::Arc;
use std::thread::{self, JoinHandle};
use std::time::Duration;

use super::{serve, GenomeProvider, ProviderError, Request, Response};

pub struct ProviderWorker {
    requests: Option<Sender<Request>>,
    responses: Receiver<Response>,
    handle: Option<JoinHandle<()>>,
}

impl ProviderWorker {
    /// Spawns a worker thread serving requests against `provider`.
    pub fn spawn(provider: Arc<dyn GenomeProvider>) -> std::io::Result<Self> {
        let (request_tx, request_rx) = mpsc::channel::<Request>();
        let (response_tx, response_rx) = mpsc::channel::<Response>();

        let handle = thread::Builder::new()
            .name("genoview-provider".to_string())
            .spawn(move || {
                for request in request_rx {
                    let response = serve(provider.as_ref(), request);
                    if response_tx.send(response).is_err() {
                        break;
                    }
                }
                log::debug!("Provider worker stopped");
            })?;

        Ok(Self {
            requests: Some(request_tx),
            responses: response_rx,
            handle: Some(handle),
        })
    }

    /// Queues a request.
    pub fn submit(&self, request: Request) -> Result<(), ProviderError> {
        let sender = self.requests.as_ref().ok_or(ProviderError::Disconnected)?;
        sender.send(request).map_err(|_| ProviderError::Disconnected)
    }

    /// Returns the next finished response, if any.
    pub fn try_recv(&self) -> Option<Response> {
        match self.responses.try_recv() {
            Ok(response) => Some(response),
            Err(TryRecvError::Empty) | Err(TryRecvError::Disconnected) => None,
        }
    }

    /// Waits up to `timeout` for the next response.
    pub fn recv_timeout(&self, timeout: Duration) -> Option<Response> {
        self.responses.recv_timeout(timeout).ok()
    }
}

impl Drop for ProviderWorker {
    fn drop(&mut self) {
        // Closing the request channel ends the worker loop.
        self.requests.take();
        if let Some(handle) = self.handle.take() {
            let _ = handle.join();
        }
    }
}
