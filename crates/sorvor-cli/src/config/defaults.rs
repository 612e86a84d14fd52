use std::path::PathBuf;

pub fn default_entry() -> PathBuf {
    PathBuf::from("public/index.html")
}

pub fn default_out_dir() -> PathBuf {
    PathBuf::from("dist")
}

pub fn default_host() -> String {
    "localhost".to_string()
}

pub fn default_port() -> u16 {
    1234
}

pub fn default_bundler() -> String {
    "esbuild".to_string()
}

pub fn default_watch_dir() -> PathBuf {
    PathBuf::from(".")
}

pub fn default_watch_ignore() -> Vec<String> {
    vec![
        "node_modules".to_string(),
        ".git".to_string(),
        "*.log".to_string(),
    ]
}

pub fn default_debounce_ms() -> u64 {
    100
}

pub fn default_heartbeat_secs() -> u64 {
    sorvor_livereload::broadcaster::DEFAULT_HEARTBEAT.as_secs()
}

pub fn default_queue_capacity() -> usize {
    sorvor_livereload::broadcaster::DEFAULT_QUEUE_CAPACITY
}
