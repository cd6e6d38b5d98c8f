pub mod types;
pub mod error;
pub mod config;
pub mod rays;
pub mod movegen;
pub mod board;
pub mod game;
pub mod perft;
