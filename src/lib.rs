pub mod config;
pub mod database;
pub mod error;
pub mod handlers;
pub mod list;
pub mod middleware;
pub mod router;
pub mod state;

#[cfg(test)]
pub mod testing;
