//! Board change notifications.
//!
//! # Responsibility
//! - Fan out one event per completed board mutation to every subscriber.
//!
//! # Invariants
//! - Events are published after the mutation and its write-through finish.
//! - Dropped receivers are pruned on the next publish; publishing never blocks.

use crate::model::item::ItemId;
use crate::service::board_service::TabId;
use crossbeam::channel::{unbounded, Receiver, Sender};

/// Change notification emitted by `BoardService`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BoardEvent {
    /// Items were added, removed, reordered, or edited on the active tab.
    ItemsChanged { tab: TabId, item_count: usize },
    /// Selection membership changed.
    SelectionChanged { tab: TabId, selected_count: usize },
    /// An item left the active tab for another tab.
    ItemMoved { item: ItemId, from: TabId, to: TabId },
    /// A tab became active with its stored items loaded.
    TabActivated { tab: TabId, item_count: usize },
    /// A tab identifier was appended to the tab list.
    TabAdded { tab: TabId },
}

/// Publish-subscribe fan-out for `BoardEvent`.
#[derive(Debug, Default)]
pub struct EventBus {
    subscribers: Vec<Sender<BoardEvent>>,
}

impl EventBus {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a subscriber. Events published afterwards are delivered.
    pub fn subscribe(&mut self) -> Receiver<BoardEvent> {
        let (sender, receiver) = unbounded();
        self.subscribers.push(sender);
        receiver
    }

    pub fn publish(&mut self, event: BoardEvent) {
        self.subscribers
            .retain(|subscriber| subscriber.send(event.clone()).is_ok());
    }

    pub fn subscriber_count(&self) -> usize {
        self.subscribers.len()
    }
}
