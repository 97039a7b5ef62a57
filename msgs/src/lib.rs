pub mod box_data;
pub mod camera;
pub mod client_server_msg;
pub mod connection;
pub mod csv;
pub mod direction;
pub mod server_client_msg;
