use clap::{Parser, Subcommand};
use msgs::box_data::BoxId;
use msgs::camera::{CameraPreset, ColorMode};
use msgs::client_server_msg::ClientServerMsg;
use msgs::connection::Connection;
use msgs::csv;
use msgs::direction::Direction;
use msgs::server_client_msg::ServerClientMsg;

mod console_cmd;
mod shell;

#[derive(Parser)]
#[command(name = "warehouse-cli", about = "Command line client for the warehouse server")]
struct Cli {
    /// WebSocket address of the warehouse server
    #[arg(long, default_value = "ws://localhost:4000/ws")]
    server: String,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Add a box at a position
    AddBox {
        box_id: BoxId,
        x: i32,
        y: i32,
        z: i32,
    },
    /// Remove a box
    RemoveBox { box_id: BoxId },
    /// Move a box one cell in a direction
    MoveBox { box_id: BoxId, direction: String },
    /// Move several boxes in one simultaneous step, as box_id direction pairs
    MoveMultiple { moves: Vec<String> },
    /// Print the current state snapshot
    GetState,
    /// Remove every box from the warehouse
    ClearAllBoxes,
    /// Load a CSV file into an empty warehouse
    UploadCsv { path: String },
    /// Save the current state as a CSV file
    DownloadCsv {
        #[arg(default_value = "warehouse.csv")]
        path: String,
    },
    /// Switch the viewer to a camera preset
    Camera { preset: String },
    /// Switch the viewer between light and dark mode
    Mode { mode: String },
    /// Open an interactive session
    Shell,
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    let mut connection = match Connection::connect(&cli.server).await {
        Ok(connection) => connection,
        Err(_) => {
            println!("No Server Running on {}", cli.server);
            return;
        }
    };

    match cli.command {
        Command::AddBox { box_id, x, y, z } => {
            call_and_print(&mut connection, ClientServerMsg::AddBox { box_id, x, y, z }).await;
        }
        Command::RemoveBox { box_id } => {
            call_and_print(&mut connection, ClientServerMsg::RemoveBox(box_id)).await;
        }
        Command::MoveBox { box_id, direction } => {
            let Some(direction) = Direction::from_str(&direction) else {
                println!("Invalid direction, must be one of North, South, East, West, Up, Down (case in-sensitive)");
                return;
            };
            call_and_print(&mut connection, ClientServerMsg::MoveBox { box_id, direction }).await;
        }
        Command::MoveMultiple { moves } => {
            let Some(moves) = parse_move_pairs(&moves) else {
                println!("Invalid moves, expected box_id direction pairs");
                return;
            };
            call_and_print(&mut connection, ClientServerMsg::MoveMultipleBoxes(moves)).await;
        }
        Command::GetState => {
            call_and_print(&mut connection, ClientServerMsg::GetState).await;
        }
        Command::ClearAllBoxes => {
            call_and_print(&mut connection, ClientServerMsg::ClearAllBoxes).await;
        }
        Command::UploadCsv { path } => match std::fs::read_to_string(&path) {
            Ok(contents) => {
                call_and_print(&mut connection, ClientServerMsg::CsvUpload(contents)).await;
            }
            Err(e) => println!("could not read {path}: {e}"),
        },
        Command::DownloadCsv { path } => {
            match connection.call(ClientServerMsg::GetState).await {
                Ok(ServerClientMsg::State(states)) => {
                    match std::fs::write(&path, csv::export(&states)) {
                        Ok(()) => println!("Download CSV file successfully"),
                        Err(e) => println!("could not write {path}: {e}"),
                    }
                }
                Ok(_) => println!("unexpected answer to get_state"),
                Err(e) => println!("err: {e}"),
            }
        }
        Command::Camera { preset } => {
            let Some(preset) = CameraPreset::from_str(&preset) else {
                println!("Invalid camera preset, must be one of front, back, top");
                return;
            };
            call_and_print(&mut connection, ClientServerMsg::SetCameraPreset(preset)).await;
        }
        Command::Mode { mode } => {
            let Some(mode) = ColorMode::from_str(&mode) else {
                println!("Invalid mode, must be light or dark");
                return;
            };
            let _ = connection.send(ClientServerMsg::Mode(mode)).await;
            // The frame is still queued in the connection process; mode has
            // no ack to wait on, so give the process a moment to flush it.
            std::thread::sleep(std::time::Duration::from_millis(100));
        }
        Command::Shell => shell::run(connection).await,
    }
}

async fn call_and_print(connection: &mut Connection, msg: ClientServerMsg) {
    match connection.call(msg).await {
        Ok(ServerClientMsg::Reply(reply)) => println!("{reply}"),
        Ok(ServerClientMsg::State(states)) => {
            for (box_id, x, y, z) in states {
                println!("{box_id}: ({x}, {y}, {z})");
            }
        }
        Ok(answer) => println!("unexpected answer: {answer:?}"),
        Err(e) => println!("err: {e}"),
    }
}

fn parse_move_pairs(moves: &[String]) -> Option<Vec<(BoxId, Direction)>> {
    if moves.is_empty() || moves.len() % 2 != 0 {
        return None;
    }

    let mut pairs = Vec::new();
    for pair in moves.chunks(2) {
        let box_id = pair[0].parse().ok()?;
        let direction = Direction::from_str(&pair[1])?;
        pairs.push((box_id, direction));
    }
    Some(pairs)
}
