pub mod board;
pub mod candidates;
pub mod config;
pub mod db;
pub mod errors;
pub mod models;
pub mod pipeline;
pub mod positions;
pub mod routes;
pub mod state;
pub mod store;
