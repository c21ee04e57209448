//! The single write path into a [`Snapshot`].

use std::{
    sync::{Mutex, MutexGuard, PoisonError},
    time::SystemTime,
};

use thiserror::Error;
use tracing::{debug, error, warn};

use crate::sans::{
    Value,
    frame::{DecodeError, decode},
    registry::{Registry, RegistryError},
};

use super::{FromSenders, Reading, state::Snapshot};

/// Errors applying a frame. The snapshot is left unchanged.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum UpdateError {
    /// The frame could not be decoded.
    #[error(transparent)]
    Decode(#[from] DecodeError),
    /// The snapshot has no container for the sender.
    #[error("No state container for sender {sender:#04x}.")]
    Unrouted { sender: u8 },
    /// The container has no attribute for a registered channel.
    #[error("No attribute for `{name}` (sender {sender:#04x}, channel {channel:#04x}).")]
    Unmapped {
        sender: u8,
        channel: u8,
        name: &'static str,
    },
}

/// A successfully applied frame.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Update {
    pub name: &'static str,
    pub value: Value,
    /// The snapshot's message count after this update.
    pub message_count: u64,
}

/// Owns a registry and the snapshot built from frames decoded against it.
///
/// Both [`apply`](Self::apply) and the read accessors lock the same mutex, so
/// an aggregator may be shared between a transport callback and any number of
/// readers.
#[derive(Debug)]
pub struct Aggregator {
    registry: Registry,
    snapshot: Mutex<Snapshot>,
}

impl Aggregator {
    /// Create an aggregator with an empty snapshot.
    pub fn new(registry: Registry) -> Self {
        Self {
            registry,
            snapshot: Mutex::new(Snapshot::default()),
        }
    }

    /// Create an aggregator for the fields sent by Turbo bikes.
    pub fn turbo() -> Result<Self, RegistryError> {
        Ok(Self::new(Registry::turbo()?))
    }

    /// Decode a frame and overwrite the attribute it reports.
    ///
    /// On success, the message count is incremented and the update time set.
    /// On failure, nothing changes.
    pub fn apply(&self, frame: &[u8]) -> Result<Update, UpdateError> {
        let field = decode(frame, &self.registry).inspect_err(|err| {
            if err.is_expected() {
                debug!(frame = %hex::encode(frame), "{err}");
            } else {
                warn!(frame = %hex::encode(frame), "{err}");
            }
        })?;

        let mut snapshot = self.lock();

        let Some(container) = snapshot.add_sender(field.sender) else {
            error!(sender = field.sender, name = field.name, "unrouted field");
            return Err(UpdateError::Unrouted {
                sender: field.sender,
            });
        };

        if !container.add_reading(field.channel, Reading::from(&field)) {
            error!(
                sender = field.sender,
                channel = field.channel,
                name = field.name,
                "unmapped field"
            );
            return Err(UpdateError::Unmapped {
                sender: field.sender,
                channel: field.channel,
                name: field.name,
            });
        }

        snapshot.message_count += 1;
        snapshot.last_update = Some(SystemTime::now());

        debug!(
            "{} = {} {}",
            field.name,
            field.value,
            field.unit.unwrap_or_default()
        );

        Ok(Update {
            name: field.name,
            value: field.value,
            message_count: snapshot.message_count,
        })
    }

    /// Copy the current snapshot.
    pub fn snapshot(&self) -> Snapshot {
        self.lock().clone()
    }

    /// Inspect the current snapshot without copying it.
    ///
    /// Frames cannot be applied until `f` returns.
    pub fn read<R>(&self, f: impl FnOnce(&Snapshot) -> R) -> R {
        f(&self.lock())
    }

    pub fn registry(&self) -> &Registry {
        &self.registry
    }

    // Each attribute is overwritten whole, so a panic elsewhere while holding
    // the lock cannot leave the snapshot inconsistent.
    fn lock(&self) -> MutexGuard<'_, Snapshot> {
        self.snapshot.lock().unwrap_or_else(PoisonError::into_inner)
    }
}
