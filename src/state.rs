use std::collections::HashMap;

use thiserror::Error;
use tokio::sync::Mutex;

use crate::commands::CommandHandler;

#[derive(Error, Debug, PartialEq)]
pub enum StateError {
    #[error("no transaction in progress for client {0}")]
    NoTransaction(String),
}

/// Per-connection state that outlives a single command.
#[derive(Debug, Default)]
pub struct ClientState {
    pub queued_commands: Vec<CommandHandler>,
}

/// Registry of client state keyed by the client's peer address.
///
/// A client only has an entry while it is inside MULTI, so the presence of an
/// entry is what "queueing" means.
#[derive(Debug, Default)]
pub struct State {
    clients: Mutex<HashMap<String, ClientState>>,
}

impl State {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns `false` when the client was already queueing.
    pub async fn start_transaction(&self, client_address: &str) -> bool {
        let mut clients = self.clients.lock().await;

        if clients.contains_key(client_address) {
            return false;
        }

        clients.insert(client_address.to_string(), ClientState::default());
        true
    }

    pub async fn is_in_transaction(&self, client_address: &str) -> bool {
        self.clients.lock().await.contains_key(client_address)
    }

    pub async fn add_to_transaction(
        &self,
        client_address: &str,
        command: CommandHandler,
    ) -> Result<(), StateError> {
        let mut clients = self.clients.lock().await;

        let Some(client_state) = clients.get_mut(client_address) else {
            return Err(StateError::NoTransaction(client_address.to_string()));
        };

        client_state.queued_commands.push(command);
        Ok(())
    }

    /// Ends the client's transaction and hands back its queued commands.
    pub async fn take_transaction(
        &self,
        client_address: &str,
    ) -> Result<Vec<CommandHandler>, StateError> {
        self.clients
            .lock()
            .await
            .remove(client_address)
            .map(|client_state| client_state.queued_commands)
            .ok_or_else(|| StateError::NoTransaction(client_address.to_string()))
    }

    pub async fn remove_client(&self, client_address: &str) {
        self.clients.lock().await.remove(client_address);
    }
}
