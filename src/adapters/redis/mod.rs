//! Redis record store adapter

pub mod client;

pub use client::RedisStore;
