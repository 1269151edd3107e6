mod commands;
mod config;
mod server;
mod test_utils;
