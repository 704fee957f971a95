//! Background worker thread owning the quote controller.

use crate::backend::{CoreCmd, CoreEvent};
use crate::controller::QuoteController;
use crate::debounce::Debouncer;
use crate::remote::QuoteRemote;
use crossbeam_channel::{unbounded, Receiver, Sender};
use quotevote_core::{ClientError, QueryState};
use std::thread;
use std::time::Duration;
use tokio::sync::mpsc::{unbounded_channel, UnboundedReceiver, UnboundedSender};
use tracing::{debug, error, info, warn};

/// Handle for sending commands to, and receiving events from, the backend worker.
///
/// Dropping the handle closes the command channel; the worker then exits and
/// cancels any pending debounced search.
pub struct BackendHandle {
    pub cmd_tx: UnboundedSender<CoreCmd>,
    pub evt_rx: Receiver<CoreEvent>,
    worker: Option<thread::JoinHandle<()>>,
}

impl BackendHandle {
    /// Close the command channel and wait for the worker to finish.
    pub fn shutdown(self) {
        let BackendHandle {
            cmd_tx,
            evt_rx: _,
            worker,
        } = self;
        drop(cmd_tx);
        if let Some(worker) = worker {
            if worker.join().is_err() {
                error!("backend worker panicked");
            }
        }
    }
}

struct WorkerState<R> {
    controller: QuoteController<R>,
    debouncer: Debouncer<QueryState>,
    /// Query as edited by the UI; may be ahead of the controller's last sent query.
    draft: QueryState,
    evt_tx: Sender<CoreEvent>,
}

impl<R: QuoteRemote> WorkerState<R> {
    fn emit(&self, event: CoreEvent) {
        let _ = self.evt_tx.send(event);
    }

    fn emit_collection(&self) {
        self.emit(CoreEvent::QuotesLoaded {
            items: self.controller.quotes().to_vec(),
            leaderboard: self.controller.leaderboard().to_vec(),
        });
    }

    fn emit_error(&self, err: &ClientError) {
        self.emit(CoreEvent::Error {
            message: err.to_string(),
        });
    }

    fn edit_query(&mut self, edit: impl FnOnce(&mut QueryState)) {
        edit(&mut self.draft);
        debug!(
            query = ?self.draft,
            delay_ms = self.debouncer.delay().as_millis() as u64,
            "query changed; debouncing search"
        );
        self.debouncer.schedule(self.draft.clone());
    }

    /// Drop any pending search and send the UI back to authentication.
    fn require_login(&mut self, err: &ClientError) {
        warn!("search requires login: {}", err);
        self.debouncer.cancel();
        self.emit(CoreEvent::LoginRequired {
            message: err.to_string(),
        });
    }

    async fn run_search(&mut self, state: QueryState) {
        self.emit(CoreEvent::Loading);
        let outcome = self.controller.search(state).await.map(|_| ());
        match outcome {
            Ok(()) => self.emit_collection(),
            Err(err) if err.requires_login() => self.require_login(&err),
            Err(err) => {
                error!("search failed: {}", err);
                self.emit_error(&err);
            }
        }
    }

    async fn handle(&mut self, cmd: CoreCmd) {
        match cmd {
            CoreCmd::SetSearch(search) => self.edit_query(|query| query.search = search),
            CoreCmd::SetFilter(filter) => self.edit_query(|query| query.filter = filter),
            CoreCmd::SetSort(sort) => self.edit_query(|query| query.sort = sort),
            CoreCmd::ToggleSort => self.edit_query(|query| query.sort = query.sort.toggled()),
            CoreCmd::Refresh => {
                self.debouncer.cancel();
                let state = self.draft.clone();
                self.run_search(state).await;
            }
            CoreCmd::Vote { id } => {
                let outcome = self.controller.vote(id).await.map(|_| ());
                self.finish_mutation(outcome);
            }
            CoreCmd::Create { text } => {
                let outcome = self.controller.create(&text).await.map(|_| ());
                self.finish_mutation(outcome);
            }
            CoreCmd::BeginEdit { id } => match self.controller.begin_edit(id) {
                Ok(text) => self.emit(CoreEvent::EditReady { id, text }),
                Err(err) => self.emit_error(&err),
            },
            CoreCmd::Update { id, text } => {
                let outcome = self.controller.update(id, &text).await.map(|_| ());
                self.finish_mutation(outcome);
            }
            CoreCmd::Delete { id } => {
                let outcome = self.controller.delete(id).await.map(|_| ());
                match outcome {
                    Ok(()) => self.emit(CoreEvent::QuoteDeleted {
                        id,
                        items: self.controller.quotes().to_vec(),
                        leaderboard: self.controller.leaderboard().to_vec(),
                    }),
                    Err(err) => self.emit_error(&err),
                }
            }
            CoreCmd::Logout => {
                self.debouncer.cancel();
                match self.controller.logout() {
                    Ok(()) => self.emit(CoreEvent::LoggedOut),
                    Err(err) => self.emit_error(&err),
                }
            }
        }
    }

    /// Report a vote/create/update outcome.
    ///
    /// Those calls end in a re-fetch, so a login failure here is treated like
    /// one from a plain search.
    fn finish_mutation(&mut self, outcome: Result<(), ClientError>) {
        match outcome {
            Ok(()) => self.emit_collection(),
            Err(err) if err.requires_login() => self.require_login(&err),
            Err(err) => self.emit_error(&err),
        }
    }
}

/// Spawn the backend worker thread.
///
/// The initial query is scheduled through the debouncer right away, so the
/// first collection arrives one window after startup.
///
/// # Arguments
/// - `controller`: Controller the worker takes ownership of.
/// - `debounce`: Quiescence window for search/filter/sort edits.
///
/// # Returns
/// A [`BackendHandle`] with the command sender and event receiver.
pub fn spawn_backend<R>(controller: QuoteController<R>, debounce: Duration) -> BackendHandle
where
    R: QuoteRemote + 'static,
{
    let (cmd_tx, cmd_rx) = unbounded_channel();
    let (evt_tx, evt_rx) = unbounded();

    let worker = thread::Builder::new()
        .name("quotevote-backend".to_string())
        .spawn(move || {
            let runtime = match tokio::runtime::Builder::new_current_thread()
                .enable_all()
                .build()
            {
                Ok(runtime) => runtime,
                Err(err) => {
                    error!("failed to start backend runtime: {}", err);
                    let _ = evt_tx.send(CoreEvent::Error {
                        message: format!("Backend unavailable: {}", err),
                    });
                    return;
                }
            };
            runtime.block_on(run_worker(controller, debounce, cmd_rx, evt_tx));
        });

    let worker = match worker {
        Ok(worker) => Some(worker),
        Err(err) => {
            error!("failed to spawn backend thread: {}", err);
            None
        }
    };

    BackendHandle {
        cmd_tx,
        evt_rx,
        worker,
    }
}

async fn run_worker<R: QuoteRemote>(
    controller: QuoteController<R>,
    debounce: Duration,
    mut cmd_rx: UnboundedReceiver<CoreCmd>,
    evt_tx: Sender<CoreEvent>,
) {
    let (due_tx, mut due_rx) = unbounded_channel();
    let draft = controller.query().clone();
    let mut state = WorkerState {
        controller,
        debouncer: Debouncer::new(debounce, due_tx),
        draft,
        evt_tx,
    };
    info!("backend worker started");
    state.debouncer.schedule(state.draft.clone());

    loop {
        tokio::select! {
            cmd = cmd_rx.recv() => match cmd {
                Some(cmd) => state.handle(cmd).await,
                None => break,
            },
            Some(query) = due_rx.recv() => state.run_search(query).await,
        }
    }

    state.debouncer.cancel();
    info!("backend worker stopped");
}
