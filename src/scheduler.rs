// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! The render scheduler.
//!
//! Each view (Mandelbrot, Julia) has a slot holding at most one
//! running session.  Asking for a new render of a view cancels
//! whatever that view is doing and starts over with the new
//! parameters; the two views never wait on each other.  A session
//! splits its image into row-interleaved fragments, renders them on
//! a scoped pool of threads, weaves them back together, and hands
//! the result to the sink.  The last request always wins: a session
//! only delivers while holding its view's lock and while it is still
//! the view's current session, and a newer request has to take that
//! same lock to replace it.

use buffer::ImageBuffer;
use cancellation::{CancelToken, CancellationChecker, NeverCancel};
use crossbeam;
use crossbeam::thread::ScopedJoinHandle;
use error::RenderError;
use fragment::render_fragment_with;
use num_cpus;
use snapshot::{Snapshot, View};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex, MutexGuard};
use std::thread;
use std::time::Instant;

/// A finished render, as handed to the sink.
#[derive(Clone, Debug, PartialEq)]
pub struct Delivery {
    /// Which view the image belongs to.
    pub view: View,
    /// The session that produced it.
    pub session: usize,
    /// The parameters it was rendered with.
    pub snapshot: Snapshot,
    /// The image itself, exactly `snapshot.width` by `snapshot.height`.
    pub image: ImageBuffer,
}

/// Receives finished renders.  Called from a session thread while
/// the view's lock is held, so it should hand the image off and
/// return rather than do heavy work.
///
/// `deliver` must not call back into the `RenderScheduler` that owns
/// the sink: `request_render`, `cancel` and `state` all take the same
/// lock and would deadlock.  Send the delivery somewhere else (a
/// channel, an event queue) and react to it from another thread.
pub trait ImageSink: Send + Sync {
    /// Takes ownership of a finished render.
    fn deliver(&self, delivery: Delivery);
}

impl<F> ImageSink for F
where
    F: Fn(Delivery) + Send + Sync,
{
    fn deliver(&self, delivery: Delivery) {
        self(delivery)
    }
}

/// Tuning for the scheduler.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct SchedulerConfig {
    /// How many fragments, and so threads, each render is split into.
    pub fragment_count: usize,
}

impl SchedulerConfig {
    /// A configuration splitting renders `fragment_count` ways.  Zero
    /// is treated as one.
    pub fn with_fragments(fragment_count: usize) -> Self {
        SchedulerConfig {
            fragment_count: fragment_count.max(1),
        }
    }
}

impl Default for SchedulerConfig {
    fn default() -> Self {
        SchedulerConfig::with_fragments(num_cpus::get())
    }
}

/// What a view's slot is doing.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum SessionState {
    /// Nothing in flight.
    Idle,
    /// A session is rendering.
    Running,
}

/// How a session ended.
#[derive(Debug, PartialEq)]
pub enum SessionOutcome {
    /// The image reached the sink.
    Delivered,
    /// The session was superseded or cancelled; nothing was delivered.
    Cancelled,
    /// The render broke; nothing was delivered.
    Failed(RenderError),
}

/// A handle on a session that has been started.
pub struct RenderTicket {
    id: usize,
    view: View,
    handle: thread::JoinHandle<SessionOutcome>,
}

impl RenderTicket {
    /// The session's id, as it appears in the logs and deliveries.
    pub fn id(&self) -> usize {
        self.id
    }

    /// The view being rendered.
    pub fn view(&self) -> View {
        self.view
    }

    /// Blocks until the session ends.
    pub fn wait(self) -> SessionOutcome {
        self.handle
            .join()
            .unwrap_or(SessionOutcome::Failed(RenderError::WorkerPanicked))
    }
}

struct Session {
    id: usize,
    token: CancelToken,
}

#[derive(Default)]
struct Slot {
    current: Option<Session>,
}

impl Slot {
    fn state(&self) -> SessionState {
        match self.current {
            Some(_) => SessionState::Running,
            None => SessionState::Idle,
        }
    }

    fn is_current(&self, id: usize) -> bool {
        self.current.as_ref().map_or(false, |s| s.id == id)
    }
}

struct Shared {
    config: SchedulerConfig,
    sink: Box<dyn ImageSink>,
    mandelbrot: Mutex<Slot>,
    julia: Mutex<Slot>,
    next_id: AtomicUsize,
}

impl Shared {
    fn lock(&self, view: View) -> MutexGuard<Slot> {
        let slot = match view {
            View::Mandelbrot => &self.mandelbrot,
            View::Julia => &self.julia,
        };
        // A slot only holds a session handle; it is consistent even if
        // a holder panicked.
        slot.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    /// Body of a session thread.
    fn run(&self, id: usize, snapshot: Snapshot, token: CancelToken) -> SessionOutcome {
        let view = snapshot.view();
        let started = Instant::now();

        if token.is_cancelled() {
            return self.abandon(view, id);
        }

        let count = self.config.fragment_count;
        let fragments = match dispatch(id, &snapshot, count, &token) {
            Ok(Some(fragments)) => fragments,
            Ok(None) => return self.abandon(view, id),
            Err(e) => return self.fail(view, id, e),
        };

        if token.is_cancelled() {
            return self.abandon(view, id);
        }

        let image = match ImageBuffer::merge(&fragments) {
            Ok(image) => image,
            Err(e) => return self.fail(view, id, e),
        };

        let mut slot = self.lock(view);
        if token.is_cancelled() || !slot.is_current(id) {
            drop(slot);
            return self.abandon(view, id);
        }
        self.sink.deliver(Delivery {
            view,
            session: id,
            snapshot,
            image,
        });
        slot.current = None;
        let elapsed = started.elapsed();
        info!(
            "{} session {} delivered {}x{} in {} ms",
            view,
            id,
            snapshot.width,
            snapshot.height,
            elapsed.as_secs() * 1000 + u64::from(elapsed.subsec_millis())
        );
        SessionOutcome::Delivered
    }

    fn abandon(&self, view: View, id: usize) -> SessionOutcome {
        debug!("{} session {} discarded its results", view, id);
        SessionOutcome::Cancelled
    }

    fn fail(&self, view: View, id: usize, e: RenderError) -> SessionOutcome {
        error!("{} session {} failed: {}", view, id, e);
        let mut slot = self.lock(view);
        if slot.is_current(id) {
            slot.current = None;
        }
        SessionOutcome::Failed(e)
    }
}

/// Runs every fragment of `snapshot` on its own scoped thread.
/// `Ok(None)` means a fragment noticed the checker had cancelled.
fn dispatch<C>(
    id: usize,
    snapshot: &Snapshot,
    count: usize,
    checker: &C,
) -> Result<Option<Vec<ImageBuffer>>, RenderError>
where
    C: CancellationChecker,
{
    let results = crossbeam::scope(|spawner| {
        let handles: Vec<ScopedJoinHandle<Result<Option<ImageBuffer>, RenderError>>> = (0..count)
            .map(|index| {
                let request = snapshot.fragment(index, count);
                spawner.spawn(move |_| {
                    debug!("session {} fragment {}/{} started", id, index, count);
                    let result = render_fragment_with(&request, checker);
                    debug!("session {} fragment {}/{} finished", id, index, count);
                    result
                })
            })
            .collect();

        handles
            .into_iter()
            .map(|handle| handle.join().unwrap_or(Err(RenderError::WorkerPanicked)))
            .collect::<Vec<_>>()
    })
    .map_err(|_| RenderError::WorkerPanicked)?;

    let fragments: Vec<Option<ImageBuffer>> = results.into_iter().collect::<Result<_, _>>()?;
    Ok(fragments.into_iter().collect())
}

/// Renders `snapshot` split `fragment_count` ways and waits for the
/// result.  No session, no cancellation.
pub fn render(snapshot: &Snapshot, fragment_count: usize) -> Result<ImageBuffer, RenderError> {
    snapshot.validate()?;
    let count = fragment_count.max(1);
    let fragments = dispatch(0, snapshot, count, &NeverCancel)?.unwrap_or_default();
    ImageBuffer::merge(&fragments)
}

/// Runs renders for both views, cancelling stale ones.
pub struct RenderScheduler {
    shared: Arc<Shared>,
}

impl RenderScheduler {
    /// A scheduler delivering finished images to `sink`.
    pub fn new<S>(config: SchedulerConfig, sink: S) -> Self
    where
        S: ImageSink + 'static,
    {
        RenderScheduler {
            shared: Arc::new(Shared {
                config: SchedulerConfig::with_fragments(config.fragment_count),
                sink: Box::new(sink),
                mandelbrot: Mutex::new(Slot::default()),
                julia: Mutex::new(Slot::default()),
                next_id: AtomicUsize::new(1),
            }),
        }
    }

    /// The configuration in use.
    pub fn config(&self) -> SchedulerConfig {
        self.shared.config
    }

    /// Starts rendering `snapshot`, cancelling anything still running
    /// for the same view.  Invalid snapshots are rejected before any
    /// work is scheduled, and leave a running session alone.
    pub fn request_render(&self, snapshot: Snapshot) -> Result<RenderTicket, RenderError> {
        snapshot.validate()?;

        let view = snapshot.view();
        let id = self.shared.next_id.fetch_add(1, Ordering::SeqCst);
        let token = CancelToken::new();
        {
            let mut slot = self.shared.lock(view);
            if let Some(old) = slot.current.take() {
                old.token.cancel();
                info!("{} session {} superseded by {}", view, old.id, id);
            }
            slot.current = Some(Session {
                id,
                token: token.clone(),
            });
        }

        info!(
            "{} session {} started: {:?}, {} fragments",
            view, id, snapshot.viewport, self.shared.config.fragment_count
        );
        let shared = Arc::clone(&self.shared);
        let handle = thread::spawn(move || shared.run(id, snapshot, token));
        Ok(RenderTicket { id, view, handle })
    }

    /// Cancels whatever `view` is rendering.  Returns whether there
    /// was anything to cancel.
    pub fn cancel(&self, view: View) -> bool {
        let mut slot = self.shared.lock(view);
        match slot.current.take() {
            Some(session) => {
                session.token.cancel();
                info!("{} session {} cancelled", view, session.id);
                true
            }
            None => false,
        }
    }

    /// Whether `view` has a render in flight.
    pub fn state(&self, view: View) -> SessionState {
        self.shared.lock(view).state()
    }
}

impl Drop for RenderScheduler {
    fn drop(&mut self) {
        self.cancel(View::Mandelbrot);
        self.cancel(View::Julia);
    }
}
