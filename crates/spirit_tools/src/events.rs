//! # Agent Event Bus
//!
//! Agent outcomes flow out of the tick loop to whoever cares (UI, audit,
//! network sync), possibly on other threads.
//!
//! ```text
//! ┌──────────────┐      ┌─────────────┐      ┌──────────────┐
//! │ AgentManager │─────>│   Event     │─────>│  Consumers   │
//! │   (tick)     │      │   Channel   │      │ (UI, audit)  │
//! └──────────────┘      └─────────────┘      └──────────────┘
//! ```
//!
//! The channel is bounded; a full channel drops the event rather than stall
//! the tick.

use crossbeam_channel::{bounded, Receiver, Sender, TrySendError};
use spirit_core::{EntityId, PlayerId};
use spirit_economy::ItemStack;
use spirit_shared::BlockPos;
use spirit_world::MaterialId;

use crate::agent::ReturnReason;

/// Events published by the agent manager.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum AgentEvent {
    /// An agent was created.
    Summoned {
        /// The new agent.
        agent: EntityId,
        /// Its owner.
        owner: PlayerId,
        /// Material it mines.
        material: MaterialId,
        /// Positions queued at creation.
        queued: usize,
    },

    /// An agent picked its next block.
    TargetAcquired {
        /// Agent.
        agent: EntityId,
        /// Block it will mine.
        pos: BlockPos,
    },

    /// An agent broke a block.
    BlockMined {
        /// Agent.
        agent: EntityId,
        /// Broken block.
        pos: BlockPos,
        /// Its material.
        material: MaterialId,
        /// Stacks harvested.
        items: Vec<ItemStack>,
        /// Experience harvested.
        experience: u32,
    },

    /// An agent handed off its loot and was removed.
    Returned {
        /// Agent.
        agent: EntityId,
        /// Its owner, if it had one.
        owner: Option<PlayerId>,
        /// Why it returned.
        reason: ReturnReason,
        /// Whether the owner received the loot directly.
        delivered_to_owner: bool,
        /// Stacks handed off.
        items: Vec<ItemStack>,
        /// Experience handed off.
        experience: u32,
    },
}

/// Bounded event channel.
pub struct EventBus {
    sender: Sender<AgentEvent>,
    receiver: Receiver<AgentEvent>,
}

impl EventBus {
    /// Creates a new event bus.
    ///
    /// # Arguments
    ///
    /// * `capacity` - Maximum events in flight before new ones are dropped.
    #[must_use]
    pub fn new(capacity: usize) -> Self {
        let (sender, receiver) = bounded(capacity);
        Self { sender, receiver }
    }

    /// Creates a sender handle (clone for multiple producers).
    #[must_use]
    pub fn sender(&self) -> EventSender {
        EventSender {
            sender: self.sender.clone(),
        }
    }

    /// Creates a receiver handle (clone for multiple consumers).
    #[must_use]
    pub fn receiver(&self) -> EventReceiver {
        EventReceiver {
            receiver: self.receiver.clone(),
        }
    }

    /// Creates a paired sender and receiver.
    #[must_use]
    pub fn create_pair(capacity: usize) -> (EventSender, EventReceiver) {
        let bus = Self::new(capacity);
        (bus.sender(), bus.receiver())
    }
}

/// Handle for sending events.
#[derive(Clone)]
pub struct EventSender {
    sender: Sender<AgentEvent>,
}

impl EventSender {
    /// Sends an event (non-blocking).
    ///
    /// Returns `false` if the channel is full or every receiver is gone;
    /// the event is dropped.
    #[inline]
    pub fn send(&self, event: AgentEvent) -> bool {
        match self.sender.try_send(event) {
            Ok(()) => true,
            Err(TrySendError::Full(_)) => {
                tracing::debug!("Agent event channel full, event dropped");
                false
            }
            Err(TrySendError::Disconnected(_)) => false,
        }
    }
}

/// Handle for receiving events.
#[derive(Clone)]
pub struct EventReceiver {
    receiver: Receiver<AgentEvent>,
}

impl EventReceiver {
    /// Receives all pending events (non-blocking).
    #[inline]
    pub fn drain(&self) -> Vec<AgentEvent> {
        let mut events = Vec::with_capacity(self.receiver.len());
        while let Ok(event) = self.receiver.try_recv() {
            events.push(event);
        }
        events
    }

    /// Receives one event (non-blocking).
    #[inline]
    pub fn try_recv(&self) -> Option<AgentEvent> {
        self.receiver.try_recv().ok()
    }

    /// Returns the number of pending events.
    #[inline]
    #[must_use]
    pub fn pending_count(&self) -> usize {
        self.receiver.len()
    }

    /// Checks if there are pending events.
    #[inline]
    #[must_use]
    pub fn has_events(&self) -> bool {
        !self.receiver.is_empty()
    }
}
