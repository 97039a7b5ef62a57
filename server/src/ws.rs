use anyhow::Context;
use futures::{FutureExt, StreamExt};
use msgs::box_data::{BoxState, Position};
use msgs::client_server_msg::ClientServerMsg;
use msgs::server_client_msg::{AccessLevel, AccessOutcome, ServerClientMsg};
use tokio::sync::mpsc;
use tokio_stream::wrappers::UnboundedReceiverStream;
use warp::ws::{Message, WebSocket};

use crate::context::{SessionId, WarehouseContext, WarehouseContextRef};

pub async fn client_connection_process(ws: WebSocket, context_ref: WarehouseContextRef) {
    let (client_ws_sender, mut client_ws_rcv) = ws.split();
    let (to_client, client_rcv) = mpsc::unbounded_channel();

    let client_rcv_stream = UnboundedReceiverStream::new(client_rcv);
    tokio::task::spawn(client_rcv_stream.forward(client_ws_sender).map(|result| {
        if let Err(e) = result {
            eprintln!("error sending websocket msg: {}", e);
        }
    }));

    let session_id = {
        let mut context = context_ref.write().await;
        let session_id = context.next_session_id();
        context.senders.insert(session_id, to_client);
        session_id
    };

    println!("client connected: {session_id}");

    while let Some(result) = client_ws_rcv.next().await {
        let msg = match result {
            Ok(msg) => msg,
            Err(e) => {
                eprintln!("error receiving ws message from client {session_id}: {e}");
                break;
            }
        };
        match client_msg(session_id, msg, &context_ref).await {
            Ok(_) => {}
            Err(e) => println!("error: {e}"),
        }
    }

    context_ref.write().await.disconnect(session_id);
    println!("client disconnected: {session_id}");
}

async fn client_msg(
    session_id: SessionId,
    msg: Message,
    context_ref: &WarehouseContextRef,
) -> anyhow::Result<()> {
    let text = msg.to_str().ok().context("could not get message")?.trim();
    if text.is_empty() {
        return Ok(());
    }

    let request = ClientServerMsg::decode(text)?;
    let response = process_client_server_msg(session_id, request, context_ref).await;

    let context = context_ref.read().await;
    match response {
        ServerResponse::Reply(reply) => context.send_to(session_id, &ServerClientMsg::Reply(reply)),
        ServerResponse::State(states) => context.send_to(session_id, &ServerClientMsg::State(states)),
        ServerResponse::Access(outcome) => {
            context.send_to(session_id, &ServerClientMsg::Access(outcome))
        }
        ServerResponse::Nothing => {}
    }

    Ok(())
}

pub enum ServerResponse {
    Reply(String),
    State(Vec<BoxState>),
    Access(AccessOutcome),
    Nothing,
}

pub async fn process_client_server_msg(
    session_id: SessionId,
    msg: ClientServerMsg,
    context_ref: &WarehouseContextRef,
) -> ServerResponse {
    use ClientServerMsg::*;
    use ServerResponse::*;
    match msg {
        Subscribe => {
            println!("client {session_id} has subscribed to updates!");
            context_ref.write().await.subscribers.insert(session_id);
            Nothing
        }
        GetState => State(context_ref.read().await.storage.box_states()),
        AddBox { box_id, x, y, z } => {
            let mut context = context_ref.write().await;
            let reply = match context.storage.add_box(box_id, Position::new(x, y, z)) {
                Ok(()) => format!("Successful! Box {box_id} has been added [{x},{y},{z}]"),
                Err(e) => e.to_string(),
            };
            context.publish_state();
            Reply(reply)
        }
        RemoveBox(box_id) => {
            let mut context = context_ref.write().await;
            let reply = match context.storage.remove_box(box_id) {
                Ok(()) => format!("Successful! Box {box_id} has been removed"),
                Err(e) => e.to_string(),
            };
            context.publish_state();
            Reply(reply)
        }
        MoveBox { box_id, direction } => {
            let mut context = context_ref.write().await;
            let reply = match context.storage.move_box(box_id, direction) {
                Ok(()) => format!("Successful! Box {box_id} has been moved"),
                Err(e) => e.to_string(),
            };
            context.publish_state();
            Reply(reply)
        }
        MoveMultipleBoxes(moves) => {
            let mut context = context_ref.write().await;
            let reply = match context.storage.move_multiple_boxes(&moves) {
                Ok(()) => "Successful Operation!".to_string(),
                Err(e) => e.to_string(),
            };
            context.publish_state();
            Reply(reply)
        }
        CsvUpload(contents) => {
            let mut context = context_ref.write().await;
            match csv_upload(&mut context, &contents) {
                Ok(reply) => {
                    context.publish_state();
                    Reply(reply.to_string())
                }
                Err(reply) => Reply(reply),
            }
        }
        ClearAllBoxes => {
            let mut context = context_ref.write().await;
            context.storage.clear();
            context.publish_state();
            Reply("All boxes have been cleared!".to_string())
        }
        SetCameraPreset(preset) => {
            let context = context_ref.read().await;
            if context.send_to_viewer(&ServerClientMsg::CameraPreset(preset)) {
                Reply(format!(
                    "Camera has been changed to the {} perspective!",
                    preset.as_str()
                ))
            } else {
                Reply("Invalid, no viewer client is connected".to_string())
            }
        }
        Mode(mode) => {
            context_ref
                .read()
                .await
                .send_to_viewer(&ServerClientMsg::Mode(mode));
            Nothing
        }
        GetAccess { username, password } => {
            let mut context = context_ref.write().await;
            Access(get_access(&mut context, session_id, &username, &password))
        }
        ReleaseAccess => {
            context_ref.write().await.access.release(session_id);
            Nothing
        }
        RegisterViewer => {
            println!("client {session_id} has become the viewer instance!");
            context_ref.write().await.viewer = Some(session_id);
            Nothing
        }
    }
}

fn get_access(
    context: &mut WarehouseContext,
    session_id: SessionId,
    username: &str,
    password: &str,
) -> AccessOutcome {
    match context.accounts.level_for(username, password) {
        None => AccessOutcome::Rejected("Invalid username or password".to_string()),
        Some(AccessLevel::Ordinary) => {
            if context.access.admin.is_some() {
                AccessOutcome::Rejected("Invalid action, admin is already logged in".to_string())
            } else if context.access.ordinary.is_some() {
                AccessOutcome::Occupied
            } else {
                context.access.ordinary = Some(session_id);
                AccessOutcome::Granted(AccessLevel::Ordinary)
            }
        }
        Some(AccessLevel::Admin) => {
            for displaced in context.access.displace_all() {
                if displaced != session_id {
                    context.send_to(displaced, &ServerClientMsg::KickOutLogin);
                }
            }
            context.access.admin = Some(session_id);
            AccessOutcome::Granted(AccessLevel::Admin)
        }
    }
}

fn csv_upload(context: &mut WarehouseContext, contents: &str) -> Result<&'static str, String> {
    if !context.storage.is_empty() {
        return Err(
            "Invalid, cannot upload CSV while there are boxes still in the warehouse!".to_string(),
        );
    }

    let rows = match msgs::csv::parse(contents) {
        Ok(rows) => rows,
        Err(e) => return Err(e.to_string()),
    };

    for (box_id, position) in rows {
        if let Err(e) = context.storage.add_box(box_id, position) {
            context.storage.clear();
            return Err(format!("Invalid Error during CSV upload: {e}"));
        }
    }

    Ok("Successfully loaded Storage from CSV")
}
