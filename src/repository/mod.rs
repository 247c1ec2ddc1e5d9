pub mod server_store;
