//! Change notifications from the browser host.
//!
//! A [`Subscription`] owns a background worker that stays connected to a
//! [`ChangeSource`], reconnecting after a fixed delay whenever the connection
//! drops or cannot be made. The rest of the crate only asks whether anything
//! changed since the last check.

use std::collections::VecDeque;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::mpsc::{self, Receiver, RecvTimeoutError, Sender, TryRecvError};
use std::sync::{Arc, Mutex, PoisonError};
use std::thread::{self, JoinHandle};
use std::time::{Duration, Instant};

use thiserror::Error;

/// How often the worker checks for teardown while idle
const SHUTDOWN_POLL: Duration = Duration::from_millis(20);

/// Signal pushed by the host whenever its tab inventory changes
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChangeSignal {
    TabsChanged,
}

#[derive(Debug, Error)]
pub enum NotifyError {
    #[error("Failed to connect to change source: {0}")]
    Connect(String),

    #[error("Failed to start notification worker: {0}")]
    Spawn(#[from] std::io::Error),
}

/// A connectable stream of change signals.
///
/// Each successful `connect` yields a receiver that stays live until the host
/// side hangs up.
pub trait ChangeSource: Send + 'static {
    /// Open a new connection.
    ///
    /// # Errors
    ///
    /// Returns `NotifyError::Connect` if the host cannot be reached.
    fn connect(&mut self) -> Result<Receiver<ChangeSignal>, NotifyError>;
}

/// A live subscription to a [`ChangeSource`].
pub struct Subscription {
    signals: Receiver<ChangeSignal>,
    shutdown: Arc<AtomicBool>,
    worker: Option<JoinHandle<()>>,
}

impl Subscription {
    /// Spawn the worker and start connecting.
    ///
    /// # Errors
    ///
    /// Returns `NotifyError::Spawn` if the worker thread cannot be created.
    pub fn start<S: ChangeSource>(source: S, retry_delay: Duration) -> Result<Self, NotifyError> {
        let (tx, rx) = mpsc::channel();
        let shutdown = Arc::new(AtomicBool::new(false));
        let flag = Arc::clone(&shutdown);

        let worker = thread::Builder::new()
            .name("tablib-notify".to_string())
            .spawn(move || run_worker(source, &tx, &flag, retry_delay))?;

        Ok(Self {
            signals: rx,
            shutdown,
            worker: Some(worker),
        })
    }

    /// Consume every pending signal. Returns true if there was at least one.
    #[must_use]
    pub fn try_drain(&self) -> bool {
        let mut changed = false;
        loop {
            match self.signals.try_recv() {
                Ok(_) => changed = true,
                Err(TryRecvError::Empty | TryRecvError::Disconnected) => return changed,
            }
        }
    }

    /// Stop the worker and wait for it to exit
    pub fn teardown(&mut self) {
        self.shutdown.store(true, Ordering::SeqCst);
        if let Some(worker) = self.worker.take()
            && worker.join().is_err()
        {
            log::error!("Notification worker panicked");
        }
    }

    #[must_use]
    pub fn is_running(&self) -> bool {
        self.worker.is_some()
    }
}

impl Drop for Subscription {
    fn drop(&mut self) {
        self.teardown();
    }
}

fn run_worker<S: ChangeSource>(
    mut source: S,
    out: &Sender<ChangeSignal>,
    shutdown: &AtomicBool,
    retry_delay: Duration,
) {
    while !shutdown.load(Ordering::SeqCst) {
        match source.connect() {
            Ok(connection) => {
                log::debug!("Connected to change source");
                if !forward(&connection, out, shutdown) {
                    return;
                }
                log::warn!(
                    "Change source disconnected, reconnecting in {}ms",
                    retry_delay.as_millis()
                );
            }
            Err(e) => {
                log::warn!("{e}, retrying in {}ms", retry_delay.as_millis());
            }
        }

        if !wait(retry_delay, shutdown) {
            return;
        }
    }
}

/// Forward signals until the connection drops. Returns false on teardown.
fn forward(connection: &Receiver<ChangeSignal>, out: &Sender<ChangeSignal>, shutdown: &AtomicBool) -> bool {
    loop {
        if shutdown.load(Ordering::SeqCst) {
            return false;
        }
        match connection.recv_timeout(SHUTDOWN_POLL) {
            Ok(signal) => {
                if out.send(signal).is_err() {
                    return false;
                }
            }
            Err(RecvTimeoutError::Timeout) => {}
            Err(RecvTimeoutError::Disconnected) => return true,
        }
    }
}

/// Sleep for `delay` in short slices. Returns false on teardown.
fn wait(delay: Duration, shutdown: &AtomicBool) -> bool {
    let deadline = Instant::now() + delay;
    loop {
        if shutdown.load(Ordering::SeqCst) {
            return false;
        }
        let now = Instant::now();
        if now >= deadline {
            return true;
        }
        thread::sleep(SHUTDOWN_POLL.min(deadline - now));
    }
}

/// A [`ChangeSource`] fed through in-process channels.
///
/// Every [`ChannelFeed::open`] queues one connection; `connect` hands them out
/// in order and fails while the queue is empty.
#[derive(Debug, Clone)]
pub struct ChannelSource {
    pending: Arc<Mutex<VecDeque<Receiver<ChangeSignal>>>>,
    attempts: Arc<AtomicUsize>,
}

/// Host side of a [`ChannelSource`]
#[derive(Debug, Clone)]
pub struct ChannelFeed {
    pending: Arc<Mutex<VecDeque<Receiver<ChangeSignal>>>>,
    attempts: Arc<AtomicUsize>,
}

impl ChannelSource {
    #[must_use]
    pub fn new() -> (Self, ChannelFeed) {
        let pending = Arc::new(Mutex::new(VecDeque::new()));
        let attempts = Arc::new(AtomicUsize::new(0));
        (
            Self {
                pending: Arc::clone(&pending),
                attempts: Arc::clone(&attempts),
            },
            ChannelFeed { pending, attempts },
        )
    }
}

impl ChangeSource for ChannelSource {
    fn connect(&mut self) -> Result<Receiver<ChangeSignal>, NotifyError> {
        self.attempts.fetch_add(1, Ordering::SeqCst);
        self.pending
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .pop_front()
            .ok_or_else(|| NotifyError::Connect("no connection available".to_string()))
    }
}

impl ChannelFeed {
    /// Queue a new connection and return its sending end
    #[must_use]
    pub fn open(&self) -> Sender<ChangeSignal> {
        let (tx, rx) = mpsc::channel();
        self.pending
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push_back(rx);
        tx
    }

    /// Number of times the source has been asked to connect
    #[must_use]
    pub fn attempts(&self) -> usize {
        self.attempts.load(Ordering::SeqCst)
    }
}
