//! Animation completion signals and the rendering collaborator seam
//!
//! The engine never draws anything. It tells an [`Animator`] what happened to
//! each tile and gets back one-shot [`Completion`] signals it can wait on, so a
//! move can hold its merges until every slide has visually landed.

use futures::future::join_all;
use std::future::Future;
use std::pin::Pin;
use std::task::{Context, Poll};
use tokio::sync::oneshot;

use super::grid::Position;
use super::tile::TileId;

/// One-shot signal that resolves when an animation finishes.
///
/// Safe to poll again after it resolved. A dropped [`CompletionHandle`] also
/// resolves it, so tearing down the renderer never leaves a waiter stuck.
#[derive(Debug, Default)]
pub struct Completion {
    rx: Option<oneshot::Receiver<()>>,
}

/// Sending half of a [`Completion`], held by the animator
#[derive(Debug)]
pub struct CompletionHandle {
    tx: oneshot::Sender<()>,
}

impl Completion {
    /// A signal that has already fired
    pub fn ready() -> Self {
        Self { rx: None }
    }

    /// A pending signal and the handle that fires it
    pub fn pending() -> (CompletionHandle, Self) {
        let (tx, rx) = oneshot::channel();
        (CompletionHandle { tx }, Self { rx: Some(rx) })
    }

    /// Check without waiting. Returns true once the signal has fired.
    pub fn try_complete(&mut self) -> bool {
        let Some(rx) = self.rx.as_mut() else {
            return true;
        };

        match rx.try_recv() {
            Err(oneshot::error::TryRecvError::Empty) => false,
            _ => {
                self.rx = None;
                true
            }
        }
    }
}

impl Future for Completion {
    type Output = ();

    fn poll(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<()> {
        let Some(rx) = self.rx.as_mut() else {
            return Poll::Ready(());
        };

        match Pin::new(rx).poll(cx) {
            Poll::Ready(_) => {
                self.rx = None;
                Poll::Ready(())
            }
            Poll::Pending => Poll::Pending,
        }
    }
}

impl CompletionHandle {
    /// Fire the signal. Nobody listening is fine.
    pub fn complete(self) {
        let _ = self.tx.send(());
    }
}

/// Join point over a set of completion signals
#[derive(Debug, Default)]
pub struct Barrier {
    pending: Vec<Completion>,
}

impl Barrier {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, completion: Completion) {
        self.pending.push(completion);
    }

    pub fn len(&self) -> usize {
        self.pending.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pending.is_empty()
    }

    /// Wait for every signal at once.
    ///
    /// Cancel-safe: dropping the returned future part way keeps the signals
    /// that already fired marked as done.
    pub async fn wait(&mut self) {
        join_all(self.pending.iter_mut()).await;
    }

    /// Drop fired signals; true when none are left
    pub fn try_complete(&mut self) -> bool {
        self.pending.retain_mut(|completion| !completion.try_complete());
        self.pending.is_empty()
    }
}

impl From<Completion> for Barrier {
    fn from(completion: Completion) -> Self {
        Self {
            pending: vec![completion],
        }
    }
}

/// Rendering collaborator.
///
/// Receives tile lifecycle notifications and owns the visual representation.
/// Nothing flows back to the engine except completion signals.
pub trait Animator {
    /// A tile was placed on the board for the first time
    fn tile_appeared(&mut self, id: TileId, value: u32, at: Position) -> Completion;

    /// A tile started sliding between two cells
    fn tile_moved(&mut self, id: TileId, from: Position, to: Position) -> Completion;

    /// `id` absorbed `absorbed` and now shows `value`
    fn tile_merged(&mut self, id: TileId, value: u32, absorbed: TileId);

    /// Every tile is gone (restart)
    fn board_cleared(&mut self);
}

/// Animator with no visuals; every signal is already resolved
#[derive(Debug, Default, Clone, Copy)]
pub struct InstantAnimator;

impl Animator for InstantAnimator {
    fn tile_appeared(&mut self, _id: TileId, _value: u32, _at: Position) -> Completion {
        Completion::ready()
    }

    fn tile_moved(&mut self, _id: TileId, _from: Position, _to: Position) -> Completion {
        Completion::ready()
    }

    fn tile_merged(&mut self, _id: TileId, _value: u32, _absorbed: TileId) {}

    fn board_cleared(&mut self) {}
}
