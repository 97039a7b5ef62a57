use std::io::stdin;
use std::thread;

use msgs::camera::ColorMode;
use msgs::client_server_msg::ClientServerMsg;
use msgs::connection::Connection;
use msgs::csv;
use msgs::server_client_msg::{AccessLevel, AccessOutcome, ServerClientMsg};
use tokio::sync::mpsc::{self, Receiver};

use crate::console_cmd::ConsoleCmd;

const NO_ACCESS_MESSAGE: &str =
    "Invalid, you don't have access, please acquire access with the access command";

pub async fn run(connection: Connection) {
    let mut console_receiver = console_input_thread();
    let mut session = Session {
        connection,
        logger: Logger { line_number: 1 },
        access: false,
        release_checker: false,
    };

    session.logger.log("connected to server");

    loop {
        tokio::select! {
            line = console_receiver.recv() => {
                let Some(line) = line else { break };
                match ConsoleCmd::parse(line.trim()) {
                    Ok(cmd) => {
                        if !session.handle_cmd(cmd).await {
                            break;
                        }
                    }
                    Err(e) => println!("err: {e}"),
                }
            }
            push = session.connection.recv() => {
                let Some(msg) = push else {
                    session.logger.log("disconnected from server");
                    break;
                };
                session.handle_push(msg).await;
            }
        }
    }
}

/// Control-panel log: numbered lines, acks and errors alike.
struct Logger {
    line_number: u32,
}

impl Logger {
    fn log(&mut self, message: &str) {
        println!("{}. {message}", self.line_number);
        self.line_number += 1;
    }
}

struct Session {
    connection: Connection,
    logger: Logger,
    access: bool,
    release_checker: bool,
}

impl Session {
    // Returns false when the shell should quit.
    async fn handle_cmd(&mut self, cmd: ConsoleCmd) -> bool {
        match cmd {
            ConsoleCmd::AddBox { box_id, x, y, z } => {
                if !self.access {
                    self.logger.log(NO_ACCESS_MESSAGE);
                } else if box_id < 0 || x < 0 || y < 0 || z < 0 {
                    self.logger.log("Please enter a non-negative number");
                } else {
                    self.request_and_log(ClientServerMsg::AddBox { box_id, x, y, z })
                        .await;
                }
            }
            ConsoleCmd::RemoveBox(box_id) => {
                if !self.access {
                    self.logger.log(NO_ACCESS_MESSAGE);
                } else {
                    self.request_and_log(ClientServerMsg::RemoveBox(box_id)).await;
                }
            }
            ConsoleCmd::MoveBox { box_id, direction } => {
                if !self.access {
                    self.logger.log(NO_ACCESS_MESSAGE);
                } else {
                    self.request_and_log(ClientServerMsg::MoveBox { box_id, direction })
                        .await;
                }
            }
            ConsoleCmd::State => {
                if let Some(ServerClientMsg::State(states)) =
                    self.request(ClientServerMsg::GetState).await
                {
                    for (box_id, x, y, z) in states {
                        println!("{box_id}: ({x}, {y}, {z})");
                    }
                }
            }
            ConsoleCmd::Clear => {
                if !self.access {
                    self.logger.log(NO_ACCESS_MESSAGE);
                } else {
                    self.request_and_log(ClientServerMsg::ClearAllBoxes).await;
                }
            }
            ConsoleCmd::Upload(path) => {
                if !self.access {
                    self.logger.log(NO_ACCESS_MESSAGE);
                } else {
                    match std::fs::read_to_string(&path) {
                        Ok(contents) => {
                            self.request_and_log(ClientServerMsg::CsvUpload(contents)).await;
                        }
                        Err(e) => println!("err: could not read {path}: {e}"),
                    }
                }
            }
            ConsoleCmd::Download(path) => {
                if !self.access {
                    self.logger.log(NO_ACCESS_MESSAGE);
                } else if let Some(ServerClientMsg::State(states)) =
                    self.request(ClientServerMsg::GetState).await
                {
                    match std::fs::write(&path, csv::export(&states)) {
                        Ok(()) => self.logger.log("Download CSV file successfully"),
                        Err(e) => println!("err: could not write {path}: {e}"),
                    }
                }
            }
            ConsoleCmd::Camera(preset) => {
                self.request_and_log(ClientServerMsg::SetCameraPreset(preset))
                    .await;
            }
            ConsoleCmd::Mode(mode) => {
                self.set_mode(mode).await;
            }
            ConsoleCmd::Access { username, password } => {
                self.acquire_access(username, password).await;
            }
            ConsoleCmd::Release => {
                self.release_access().await;
            }
            ConsoleCmd::Help => print_help(),
            ConsoleCmd::Quit => return false,
        }
        true
    }

    async fn handle_push(&mut self, msg: ServerClientMsg) {
        match msg {
            ServerClientMsg::KickOutLogin => self.kick_out().await,
            // The shell never subscribes and never registers as the
            // viewer, so nothing else arrives unrequested.
            _ => {}
        }
    }

    /// Sends a request and waits for its answer, handling a kick-out that
    /// lands in between.
    async fn request(&mut self, msg: ClientServerMsg) -> Option<ServerClientMsg> {
        if self.connection.send(msg).await.is_err() {
            return None;
        }
        loop {
            match self.connection.recv().await? {
                ServerClientMsg::KickOutLogin => self.kick_out().await,
                ServerClientMsg::CameraPreset(_) | ServerClientMsg::Mode(_) => {}
                msg => return Some(msg),
            }
        }
    }

    async fn request_and_log(&mut self, msg: ClientServerMsg) {
        if let Some(ServerClientMsg::Reply(reply)) = self.request(msg).await {
            self.logger.log(&reply);
        }
    }

    async fn set_mode(&mut self, mode: ColorMode) {
        let _ = self.connection.send(ClientServerMsg::Mode(mode)).await;
    }

    async fn acquire_access(&mut self, username: String, password: String) {
        if self.access {
            self.logger.log("Invalid, you already have exclusive access");
            return;
        }

        let response = self
            .request(ClientServerMsg::GetAccess { username, password })
            .await;
        let Some(ServerClientMsg::Access(outcome)) = response else {
            return;
        };

        match outcome {
            AccessOutcome::Granted(AccessLevel::Ordinary) => {
                self.access = true;
                self.release_checker = false;
                self.logger
                    .log("You now have exclusive access to the warehouse");
            }
            AccessOutcome::Granted(AccessLevel::Admin) => {
                self.access = true;
                self.release_checker = false;
                self.logger
                    .log("You now have exclusive access to the warehouse as administrator");
            }
            AccessOutcome::Occupied => {
                self.logger.log(
                    "Invalid, another person is using the warehouse, please wait until they release it",
                );
            }
            AccessOutcome::Rejected(reason) => self.logger.log(&reason),
        }
    }

    async fn release_access(&mut self) {
        if self.access && !self.release_checker {
            let _ = self.connection.send(ClientServerMsg::ReleaseAccess).await;
            self.access = false;
            self.release_checker = true;
            self.logger
                .log("You have now released your exclusive access to the warehouse");
        } else if !self.access && self.release_checker {
            self.logger
                .log("Invalid, you've already released exclusive access");
        } else {
            self.logger
                .log("Invalid, you have no exclusive access to release");
        }
    }

    async fn kick_out(&mut self) {
        if self.access && !self.release_checker {
            let _ = self.connection.send(ClientServerMsg::ReleaseAccess).await;
            self.access = false;
            self.release_checker = true;
            self.logger.log("Invalid, administrator has forced login");
        }
    }
}

fn print_help() {
    println!("commands:");
    println!("  add <box_id> <x> <y> <z>");
    println!("  remove <box_id>");
    println!("  move <box_id> <north|south|east|west|up|down>");
    println!("  state");
    println!("  clear");
    println!("  upload <path>");
    println!("  download [path]");
    println!("  camera <front|back|top>");
    println!("  mode <light|dark>");
    println!("  access <username> <password>");
    println!("  release");
    println!("  quit");
}

fn console_input_thread() -> Receiver<String> {
    let (sender, receiver) = mpsc::channel(100);
    thread::spawn(move || pollster::block_on(console_input_loop(sender)));
    receiver
}

async fn console_input_loop(sender: mpsc::Sender<String>) {
    loop {
        let mut input = String::new();
        match stdin().read_line(&mut input) {
            // 0 bytes read means stdin reached end of file
            Ok(0) | Err(_) => break,
            Ok(_) => {}
        }
        if sender.send(input).await.is_err() {
            break;
        }
    }
}
