//! Bounded waits for resources owned by the presentation layer.

use std::collections::HashSet;
use std::time::Duration;

use log::{debug, warn};

use crate::clock::Clock;
use crate::error::{InputError, Result};

pub const DEFAULT_ASSET_TIMEOUT: Duration = Duration::from_secs(5);
pub const DEFAULT_ASSET_POLL:    Duration = Duration::from_millis(100);

pub trait AssetSource {
    fn is_ready(&self, key: &str) -> bool;
}

impl<F: Fn(&str) -> bool> AssetSource for F {
    fn is_ready(&self, key: &str) -> bool {
        self(key)
    }
}

/// Keys marked loaded by whoever owns the assets.
#[derive(Debug, Default, Clone)]
pub struct AssetStore {
    ready: HashSet<String>,
}

impl AssetStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn mark_ready(&mut self, key: impl Into<String>) {
        self.ready.insert(key.into());
    }

    pub fn unload(&mut self, key: &str) -> bool {
        self.ready.remove(key)
    }
}

impl AssetSource for AssetStore {
    fn is_ready(&self, key: &str) -> bool {
        self.ready.contains(key)
    }
}

/// Poll `source` every `poll` until `key` is ready or `timeout` passes.
pub fn wait_for<S, C>(source: &S, clock: &C, key: &str, timeout: Duration, poll: Duration) -> Result<()>
where
    S: AssetSource + ?Sized,
    C: Clock + ?Sized,
{
    let start = clock.now();
    loop {
        if source.is_ready(key) {
            debug!("asset '{}' ready after {:?}", key, clock.now() - start);
            return Ok(());
        }
        let waited = clock.now() - start;
        if waited >= timeout {
            warn!("gave up on asset '{}' after {:?}", key, waited);
            return Err(InputError::AssetTimeout { key: key.to_string(), waited_ms: waited.as_millis() as u64 });
        }
        clock.sleep(poll.min(timeout - waited));
    }
}

/// [`wait_for`] with the 5 s / 100 ms defaults.
pub fn wait_for_default<S, C>(source: &S, clock: &C, key: &str) -> Result<()>
where
    S: AssetSource + ?Sized,
    C: Clock + ?Sized,
{
    wait_for(source, clock, key, DEFAULT_ASSET_TIMEOUT, DEFAULT_ASSET_POLL)
}
