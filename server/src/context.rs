use std::collections::{HashMap, HashSet};
use std::sync::Arc;

use msgs::box_data::{DEPTH, HEIGHT, WIDTH};
use msgs::server_client_msg::ServerClientMsg;
use tokio::sync::{mpsc, RwLock};
use warp::filters::ws::Message;

use crate::access::{AccessTable, AccountBook};
use crate::storage::Storage;

pub type SessionId = u32;

pub struct WarehouseContext {
    pub storage: Storage,
    pub senders: HashMap<SessionId, mpsc::UnboundedSender<Result<Message, warp::Error>>>,
    pub subscribers: HashSet<SessionId>,
    pub viewer: Option<SessionId>,
    pub accounts: AccountBook,
    pub access: AccessTable,
    session_id_counter: SessionId,
}

pub type WarehouseContextRef = Arc<RwLock<WarehouseContext>>;

impl WarehouseContext {
    pub fn new(accounts: AccountBook) -> WarehouseContext {
        WarehouseContext {
            storage: Storage::new(WIDTH, DEPTH, HEIGHT),
            senders: HashMap::new(),
            subscribers: HashSet::new(),
            viewer: None,
            accounts,
            access: AccessTable::new(),
            session_id_counter: 0,
        }
    }

    pub fn next_session_id(&mut self) -> SessionId {
        let session_id = self.session_id_counter;
        self.session_id_counter += 1;
        session_id
    }

    pub fn send_to(&self, session_id: SessionId, msg: &ServerClientMsg) {
        if let Some(sender) = self.senders.get(&session_id) {
            let _ = sender.send(Ok(Message::text(msg.encode())));
        }
    }

    /// Pushes the current snapshot to everyone in the update room.
    pub fn publish_state(&self) {
        let msg = ServerClientMsg::State(self.storage.box_states());
        for session_id in &self.subscribers {
            self.send_to(*session_id, &msg);
        }
    }

    /// Relays a message to the registered viewer; false when none is.
    pub fn send_to_viewer(&self, msg: &ServerClientMsg) -> bool {
        match self.viewer {
            Some(viewer) => {
                self.send_to(viewer, msg);
                true
            }
            None => false,
        }
    }

    pub fn disconnect(&mut self, session_id: SessionId) {
        self.senders.remove(&session_id);
        if self.subscribers.remove(&session_id) {
            println!("client {session_id} has unsubscribed from updates!");
        }
        self.access.release(session_id);
        if self.viewer == Some(session_id) {
            self.viewer = None;
        }
    }
}
