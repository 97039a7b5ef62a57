use msgs::client_server_msg::ClientServerMsg;
use msgs::connection::Connection;
use msgs::server_client_msg::ServerClientMsg;

use crate::render::Scene;

mod render;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let url = std::env::args()
        .nth(1)
        .unwrap_or_else(|| "ws://localhost:4000/ws".to_string());

    let mut connection = Connection::connect(&url).await?;

    connection.send(ClientServerMsg::Subscribe).await?;
    connection.send(ClientServerMsg::RegisterViewer).await?;

    let mut scene = Scene::new();

    if let ServerClientMsg::State(boxes) = connection.call(ClientServerMsg::GetState).await? {
        scene.update_state(boxes);
    }
    scene.render();

    while let Some(msg) = connection.recv().await {
        match msg {
            ServerClientMsg::State(boxes) => {
                scene.update_state(boxes);
                scene.render();
            }
            ServerClientMsg::CameraPreset(preset) => {
                scene.set_camera_preset(preset);
                scene.render();
            }
            ServerClientMsg::Mode(mode) => {
                scene.set_color_mode(mode);
                scene.render();
            }
            _ => {}
        }
    }

    println!("disconnected from server");
    Ok(())
}
