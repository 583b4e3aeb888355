use std::{borrow::Borrow, sync::Arc};

use parking_lot::{RwLock, RwLockReadGuard};

use crate::{Error, Game, Model, RatingRun};

/// A [`RatingRun`] behind a single-writer lock, for use from several threads.
///
/// Games are applied under the write lock, one at a time. Derived views can
/// be computed concurrently through [`SharedRatingRun::read()`].
#[derive(Clone)]
pub struct SharedRatingRun {
    inner: Arc<RwLock<RatingRun>>,
}

impl SharedRatingRun {
    pub fn new(run: RatingRun) -> SharedRatingRun {
        SharedRatingRun {
            inner: Arc::new(RwLock::new(run)),
        }
    }

    pub fn process<M: Model + ?Sized>(&self, model: &M, game: &Game) -> Result<(), Error> {
        self.inner.write().process(model, game)
    }

    /// Holds the write lock for the whole replay, so that no reader observes
    /// a partially replayed stream.
    pub fn replay<M, I>(&self, model: &M, games: I) -> Result<usize, Error>
    where
        M: Model + ?Sized,
        I: IntoIterator,
        I::Item: Borrow<Game>,
    {
        self.inner.write().replay(model, games)
    }

    pub fn read(&self) -> RwLockReadGuard<'_, RatingRun> {
        self.inner.read()
    }
}
