use std::{convert::Infallible, sync::Arc};

use local_ip_address::local_ip;
use tokio::sync::RwLock;
use warp::{reject::Rejection, Filter};

use crate::access::AccountBook;
use crate::context::{WarehouseContext, WarehouseContextRef};

mod access;
mod context;
mod error;
mod handler;
mod storage;
mod ws;

type Result<T> = std::result::Result<T, Rejection>;

const ACCOUNTS_PATH: &str = "accounts.json";
const PORT: u16 = 4000;

#[tokio::main]
async fn main() {
    let accounts = match AccountBook::load(ACCOUNTS_PATH) {
        Ok(accounts) => accounts,
        Err(e) => {
            println!("error while loading accounts at startup: {e}");
            AccountBook::new()
        }
    };

    let context = WarehouseContext::new(accounts);
    let context_ref = Arc::new(RwLock::new(context));

    let routes = warp::path("health")
        .and_then(handler::health_handler)
        .or(warp::path("ws")
            .and(warp::ws())
            .and(with_context(context_ref.clone()))
            .and_then(handler::ws_handler));

    match local_ip() {
        Ok(my_local_ip) => println!("Warehouse server started at ip: {my_local_ip}:{PORT}"),
        Err(_) => println!("Warehouse server started on port {PORT}"),
    }

    warp::serve(routes).run(([0, 0, 0, 0], PORT)).await;
}

fn with_context(
    context_ref: WarehouseContextRef,
) -> impl Filter<Extract = (WarehouseContextRef,), Error = Infallible> + Clone {
    warp::any().map(move || context_ref.clone())
}
