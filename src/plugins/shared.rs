use std::sync::atomic::AtomicBool;
use std::sync::{Arc, PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};

use crate::editor::Editor;
use crate::input::KeyRegistry;
use crate::services::{BrowserContext, CacheStore, MessageLog};

use super::subscriptions::SubscriptionTable;

pub type Shared<T> = Arc<RwLock<T>>;

/// Read a lock, recovering it if a panicking plugin call poisoned it
pub fn read<T: ?Sized>(lock: &RwLock<T>) -> RwLockReadGuard<'_, T> {
    lock.read().unwrap_or_else(PoisonError::into_inner)
}

pub fn write<T: ?Sized>(lock: &RwLock<T>) -> RwLockWriteGuard<'_, T> {
    lock.write().unwrap_or_else(PoisonError::into_inner)
}

/// Host state reachable from `fm::*` calls. Each handle is locked only for
/// the duration of one call.
#[derive(Clone)]
pub struct HostShared {
    pub editor: Shared<Editor>,
    pub keys: Shared<KeyRegistry>,
    pub subscriptions: Shared<SubscriptionTable>,
    pub messages: Shared<MessageLog>,
    pub cache: Shared<Box<dyn CacheStore>>,
    pub context: Shared<BrowserContext>,
    /// Set by `fm::exit()`; the embedder decides when to act on it
    pub quit: Arc<AtomicBool>,
}

impl HostShared {
    pub fn new(cache: Box<dyn CacheStore>) -> Self {
        Self {
            editor: Arc::new(RwLock::new(Editor::new())),
            keys: Arc::new(RwLock::new(KeyRegistry::new())),
            subscriptions: Arc::new(RwLock::new(SubscriptionTable::new())),
            messages: Arc::new(RwLock::new(MessageLog::new())),
            cache: Arc::new(RwLock::new(cache)),
            context: Arc::new(RwLock::new(BrowserContext::default())),
            quit: Arc::new(AtomicBool::new(false)),
        }
    }
}
