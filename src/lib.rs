pub mod cache;
pub mod config;
pub mod feeds;
pub mod fetch;
pub mod parser;
pub mod refresh;
pub mod server;
pub mod status;
pub mod updates;

pub mod gtfs_rt {
    include!(concat!(env!("OUT_DIR"), "/transit_realtime.rs"));
}
