use rand::Rng;

use crate::catalog::TrackId;
use crate::error::Result;
use crate::observer::{Connector, Observer, UNKNOWN};
use crate::publish::Publish;

use super::context::{CycleReport, ShuffleContext};

/// One unit of scheduled work.
pub trait Tick {
    fn tick(&mut self) -> Result<CycleReport>;
}

/// Everything a live run owns: the shuffle context, the random source, the
/// publisher and, when enabled, the now-playing observer.
pub struct Session<R, P, C: Connector> {
    pub context: ShuffleContext,
    rng: R,
    publisher: P,
    observer: Option<Observer<C>>,
    now_playing: TrackId,
    force_rebuild: bool,
}

impl<R, P, C> Session<R, P, C>
where
    R: Rng,
    P: Publish,
    C: Connector,
{
    pub fn new(
        context: ShuffleContext,
        rng: R,
        publisher: P,
        observer: Option<Observer<C>>,
        force_rebuild: bool,
    ) -> Self {
        Self {
            context,
            rng,
            publisher,
            observer,
            now_playing: UNKNOWN,
            force_rebuild,
        }
    }
}

impl<R, P, C> Tick for Session<R, P, C>
where
    R: Rng,
    P: Publish,
    C: Connector,
{
    /// One publish cycle followed by one observer poll. A requested rebuild
    /// only applies to the first cycle.
    fn tick(&mut self) -> Result<CycleReport> {
        let force = std::mem::take(&mut self.force_rebuild);
        let report = self
            .context
            .run_cycle(&mut self.rng, &self.publisher, force)?;

        if let Some(observer) = self.observer.as_mut() {
            let current = observer.observe(self.now_playing);
            if current != UNKNOWN {
                self.now_playing = current;
            }
        }

        Ok(report)
    }
}
