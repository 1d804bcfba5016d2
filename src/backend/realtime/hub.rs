/**
 * Room Hub
 *
 * In-process registry of live connections, grouped by room. Each group maps
 * a connection id to the sending half of that connection's event queue.
 *
 * # Locking
 *
 * One `std::sync::Mutex` guards the whole table. It is only held for map
 * updates and non-blocking `send`s, never across an `.await`.
 *
 * Each group also carries an async sequencer. Writers hold it from the
 * store write until the broadcast is queued, so members observe events in
 * commit order.
 *
 * # Backpressure
 *
 * Every connection has a bounded queue. A member whose queue is full when
 * an event is queued is dropped from the group; its transport sees the
 * queue close and ends the connection.
 *
 * # Departure
 *
 * `join` hands back a `Membership` guard. Dropping it, or calling
 * `leave()`, broadcasts `offline` and deregisters the connection exactly
 * once.
 */

use std::collections::HashMap;
use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use tokio::sync::mpsc::{self, error::TrySendError};
use tokio::sync::OwnedMutexGuard;

use crate::shared::chat::{Identity, RoomId};
use crate::shared::event::{PresenceStatus, ServerEvent};

/// Outbound queue of one connection
pub type EventSender = mpsc::Sender<ServerEvent>;
pub type EventReceiver = mpsc::Receiver<ServerEvent>;

/// Events a connection may have queued before it is dropped
pub const OUTBOUND_QUEUE_CAPACITY: usize = 256;

/// Identifies one live connection within the hub
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ConnectionId(u64);

impl fmt::Display for ConnectionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "conn-{}", self.0)
    }
}

#[derive(Default)]
struct RoomGroup {
    members: HashMap<ConnectionId, EventSender>,
    sequencer: Arc<tokio::sync::Mutex<()>>,
}

impl RoomGroup {
    fn send_all(&mut self, event: &ServerEvent, except: Option<ConnectionId>) -> usize {
        let mut delivered = 0;
        let mut lagging = Vec::new();

        for (id, tx) in &self.members {
            if Some(*id) == except {
                continue;
            }
            match tx.try_send(event.clone()) {
                Ok(()) => delivered += 1,
                Err(TrySendError::Full(_)) => lagging.push(*id),
                Err(TrySendError::Closed(_)) => {}
            }
        }

        for id in lagging {
            self.evict(id);
        }
        delivered
    }

    fn send_one(&mut self, connection_id: ConnectionId, event: ServerEvent) -> bool {
        let Some(tx) = self.members.get(&connection_id) else {
            return false;
        };
        match tx.try_send(event) {
            Ok(()) => true,
            Err(TrySendError::Full(_)) => {
                self.evict(connection_id);
                false
            }
            Err(TrySendError::Closed(_)) => false,
        }
    }

    /// Drop a member whose queue is full
    fn evict(&mut self, connection_id: ConnectionId) {
        if self.members.remove(&connection_id).is_some() {
            tracing::warn!(
                "[Realtime] Dropped {} after its outbound queue filled up",
                connection_id
            );
        }
    }

    fn is_idle(&self) -> bool {
        self.members.is_empty() && Arc::strong_count(&self.sequencer) == 1
    }
}

struct HubInner {
    groups: Mutex<HashMap<RoomId, RoomGroup>>,
    next_connection: AtomicU64,
    queue_capacity: usize,
}

/// Broadcast groups keyed by room id
#[derive(Clone)]
pub struct RoomHub {
    inner: Arc<HubInner>,
}

impl Default for RoomHub {
    fn default() -> Self {
        Self::new()
    }
}

impl RoomHub {
    pub fn new() -> Self {
        Self::with_queue_capacity(OUTBOUND_QUEUE_CAPACITY)
    }

    /// Hub whose connections may queue at most `capacity` events
    pub fn with_queue_capacity(capacity: usize) -> Self {
        Self {
            inner: Arc::new(HubInner {
                groups: Mutex::new(HashMap::new()),
                next_connection: AtomicU64::new(0),
                queue_capacity: capacity.max(1),
            }),
        }
    }

    fn groups(&self) -> MutexGuard<'_, HashMap<RoomId, RoomGroup>> {
        self.inner
            .groups
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
    }

    /// Register a connection in `room_id`'s group and announce it
    ///
    /// The `online` event goes to every member, the new one included.
    pub fn join(&self, room_id: RoomId, identity: Identity) -> (Membership, EventReceiver) {
        let connection_id = ConnectionId(self.inner.next_connection.fetch_add(1, Ordering::Relaxed));
        let (tx, rx) = mpsc::channel(self.inner.queue_capacity);

        {
            let mut groups = self.groups();
            let group = groups.entry(room_id).or_default();
            group.members.insert(connection_id, tx);
            group.send_all(&ServerEvent::presence(&identity, PresenceStatus::Online), None);
        }

        tracing::info!(
            "[Realtime] {} ({}) joined room {} as {}",
            identity.username,
            identity.id,
            room_id,
            connection_id
        );

        let membership = Membership {
            hub: self.clone(),
            room_id,
            connection_id,
            identity,
            departed: false,
        };

        (membership, rx)
    }

    /// Queue `event` for every member of the room
    ///
    /// Returns the number of members it was queued for.
    pub fn broadcast(&self, room_id: RoomId, event: &ServerEvent) -> usize {
        let mut groups = self.groups();
        let delivered = groups
            .get_mut(&room_id)
            .map(|group| group.send_all(event, None))
            .unwrap_or(0);

        tracing::debug!(
            "[Realtime] {} in room {} queued for {} connections",
            event.event_name(),
            room_id,
            delivered
        );
        delivered
    }

    /// Queue `event` for every member except `origin`
    pub fn broadcast_except(&self, room_id: RoomId, origin: ConnectionId, event: &ServerEvent) -> usize {
        let mut groups = self.groups();
        groups
            .get_mut(&room_id)
            .map(|group| group.send_all(event, Some(origin)))
            .unwrap_or(0)
    }

    /// Queue `event` for one connection only
    pub fn send_to(&self, room_id: RoomId, connection_id: ConnectionId, event: ServerEvent) -> bool {
        let mut groups = self.groups();
        groups
            .get_mut(&room_id)
            .map(|group| group.send_one(connection_id, event))
            .unwrap_or(false)
    }

    /// Take the room's turn for a write-then-broadcast sequence
    pub async fn sequence(&self, room_id: RoomId) -> OwnedMutexGuard<()> {
        let sequencer = {
            let mut groups = self.groups();
            groups.entry(room_id).or_default().sequencer.clone()
        };
        sequencer.lock_owned().await
    }

    /// Number of live connections in a room
    pub fn member_count(&self, room_id: RoomId) -> usize {
        self.groups()
            .get(&room_id)
            .map(|group| group.members.len())
            .unwrap_or(0)
    }

    /// Number of groups currently held
    pub fn room_count(&self) -> usize {
        self.groups().len()
    }

    /// Drop groups with no members and no writer holding their sequencer
    pub fn cleanup_idle_groups(&self) -> usize {
        let mut groups = self.groups();
        let before = groups.len();
        groups.retain(|_, group| !group.is_idle());
        before - groups.len()
    }

    fn depart(&self, room_id: RoomId, connection_id: ConnectionId, identity: &Identity) {
        let mut groups = self.groups();
        let Some(group) = groups.get_mut(&room_id) else {
            return;
        };

        group.send_all(&ServerEvent::presence(identity, PresenceStatus::Offline), None);
        group.members.remove(&connection_id);

        if group.is_idle() {
            groups.remove(&room_id);
        }
    }
}

/// A connection's place in a room group
///
/// Departure runs once, on `leave()` or on drop, whichever comes first.
pub struct Membership {
    hub: RoomHub,
    room_id: RoomId,
    connection_id: ConnectionId,
    identity: Identity,
    departed: bool,
}

impl Membership {
    pub fn room_id(&self) -> RoomId {
        self.room_id
    }

    pub fn connection_id(&self) -> ConnectionId {
        self.connection_id
    }

    pub fn identity(&self) -> &Identity {
        &self.identity
    }

    pub fn hub(&self) -> &RoomHub {
        &self.hub
    }

    /// Broadcast `offline` and deregister
    pub fn leave(mut self) {
        self.depart();
    }

    fn depart(&mut self) {
        if self.departed {
            return;
        }
        self.departed = true;

        self.hub.depart(self.room_id, self.connection_id, &self.identity);
        tracing::info!(
            "[Realtime] {} left room {} ({})",
            self.identity.username,
            self.room_id,
            self.connection_id
        );
    }
}

impl Drop for Membership {
    fn drop(&mut self) {
        self.depart();
    }
}
