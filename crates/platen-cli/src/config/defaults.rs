use std::net::{IpAddr, Ipv4Addr};
use std::path::PathBuf;

pub const DEFAULT_PORT: u16 = 8000;

pub fn default_generator() -> String {
    "pelican".to_string()
}

pub fn default_content_dir() -> PathBuf {
    PathBuf::from("content")
}

pub fn default_output_dir() -> PathBuf {
    PathBuf::from("output")
}

pub fn default_development_settings() -> PathBuf {
    PathBuf::from("pelicanconf.py")
}

pub fn default_production_settings() -> PathBuf {
    PathBuf::from("publishconf.py")
}

pub fn default_host() -> IpAddr {
    IpAddr::V4(Ipv4Addr::LOCALHOST)
}

pub fn default_port() -> u16 {
    DEFAULT_PORT
}

pub fn default_poll_interval_ms() -> u64 {
    1000
}

pub fn default_collection_csv() -> PathBuf {
    PathBuf::from("content/typewriters.csv")
}

pub fn default_collection_json() -> PathBuf {
    PathBuf::from("content/extra/typewriters.json")
}

pub fn default_pages_dir() -> PathBuf {
    PathBuf::from("content/typewriters")
}
