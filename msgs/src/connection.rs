use anyhow::Context;
use futures::{SinkExt, StreamExt};
use tokio::sync::mpsc;
use tokio_tungstenite::connect_async;
use tokio_tungstenite::tungstenite::Message;

use crate::client_server_msg::ClientServerMsg;
use crate::server_client_msg::ServerClientMsg;

/// A client's side of the channel. A spawned process owns the socket and
/// bridges it to a pair of queues; the rest of the client never touches
/// the socket directly.
pub struct Connection {
    to_server: mpsc::Sender<ClientServerMsg>,
    from_server: mpsc::Receiver<ServerClientMsg>,
}

impl Connection {
    pub async fn connect(url: &str) -> anyhow::Result<Connection> {
        let (socket, _) = connect_async(url).await?;
        let (mut to_socket, mut from_socket) = socket.split();

        let (to_server, mut server_from_main) = mpsc::channel::<ClientServerMsg>(100);
        let (server_to_main, from_server) = mpsc::channel::<ServerClientMsg>(100);

        tokio::spawn(async move {
            loop {
                tokio::select! {
                    result = from_socket.next() => {
                        let msg = match result {
                            Some(Ok(msg)) => msg,
                            Some(Err(e)) => {
                                println!("error while reading from socket: {e}");
                                break;
                            }
                            None => {
                                println!("server died");
                                break;
                            }
                        };
                        match msg {
                            Message::Text(text) => {
                                match ServerClientMsg::decode(text.as_str()) {
                                    Ok(msg) => {
                                        if server_to_main.send(msg).await.is_err() {
                                            break;
                                        }
                                    }
                                    Err(e) => println!("error while decoding server msg: {e}"),
                                }
                            }
                            Message::Close(_) => break,
                            _ => {}
                        }
                    }
                    result = server_from_main.recv() => {
                        let Some(msg) = result else { break };
                        if let Err(e) = to_socket.send(Message::text(msg.encode())).await {
                            println!("error while writing to socket: {e}");
                            break;
                        }
                    }
                }
            }
        });

        Ok(Connection {
            to_server,
            from_server,
        })
    }

    pub async fn send(&self, msg: ClientServerMsg) -> anyhow::Result<()> {
        self.to_server
            .send(msg)
            .await
            .context("connection process has shut down")
    }

    /// Sends a request and waits for its answer. Relay pushes addressed to
    /// the viewer are skipped; callers that care about `KickOutLogin` drive
    /// `recv` themselves instead.
    pub async fn call(&mut self, msg: ClientServerMsg) -> anyhow::Result<ServerClientMsg> {
        self.send(msg).await?;
        loop {
            let response = self
                .recv()
                .await
                .context("connection closed before the server answered")?;
            match response {
                ServerClientMsg::KickOutLogin
                | ServerClientMsg::CameraPreset(_)
                | ServerClientMsg::Mode(_) => continue,
                response => return Ok(response),
            }
        }
    }

    pub async fn recv(&mut self) -> Option<ServerClientMsg> {
        self.from_server.recv().await
    }
}
