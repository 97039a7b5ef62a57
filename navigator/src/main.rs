use std::time::Duration;

use anyhow::bail;
use clap::Parser;
use itertools::Itertools;
use msgs::box_data::{BoxId, Position, DEPTH, HEIGHT, WIDTH};
use msgs::client_server_msg::ClientServerMsg;
use msgs::connection::Connection;
use msgs::server_client_msg::ServerClientMsg;

use crate::grid::Grid;
use crate::route::shortest_route;

mod grid;
mod route;

#[derive(Debug, Clone)]
struct Demand {
    box_id: BoxId,
    target: Position,
}

#[derive(Parser)]
#[command(
    name = "warehouse-navigator",
    about = "Routes boxes to target positions through the warehouse server"
)]
struct Cli {
    /// WebSocket address of the warehouse server
    #[arg(long, default_value = "ws://localhost:4000/ws")]
    server: String,

    /// Flattened demands: box_id x y z, repeated per box
    #[arg(required = true)]
    demands: Vec<i32>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    if cli.demands.len() % 4 != 0 {
        bail!("demands must come as box_id x y z groups");
    }
    let demands = cli
        .demands
        .chunks(4)
        .map(|chunk| Demand {
            box_id: chunk[0],
            target: Position::new(chunk[1], chunk[2], chunk[3]),
        })
        .collect::<Vec<_>>();

    let mut connection = Connection::connect(&cli.server).await?;

    loop {
        let mut grid = Grid::new(WIDTH, DEPTH, HEIGHT);
        let ServerClientMsg::State(states) = connection.call(ClientServerMsg::GetState).await?
        else {
            bail!("unexpected answer to get_state");
        };
        for (box_id, x, y, z) in states {
            grid.insert_box(box_id, Position::new(x, y, z));
        }

        let all_routes = demands
            .iter()
            .map(|demand| shortest_route(demand.box_id, demand.target, &grid))
            .collect::<Vec<_>>();

        if all_routes
            .iter()
            .all(|route| route.as_ref().is_some_and(|route| route.is_empty()))
        {
            println!("All routes finished!");
            break;
        }
        if all_routes.iter().all(|route| route.is_none()) {
            println!("Error no routes found for given demands!");
            break;
        }

        for first_move in all_routes
            .iter()
            .filter_map(|route| route.as_ref()?.first())
            .dedup()
        {
            let Some(direction) = first_move.direction() else {
                println!("skipping a non-adjacent move for box {}", first_move.box_id);
                continue;
            };

            println!("Move Sent to box {}!", first_move.box_id);
            let answer = connection
                .call(ClientServerMsg::MoveBox {
                    box_id: first_move.box_id,
                    direction,
                })
                .await?;
            if let ServerClientMsg::Reply(reply) = answer {
                println!("{reply}");
            }
        }

        tokio::time::sleep(Duration::from_secs(1)).await;
    }

    Ok(())
}
