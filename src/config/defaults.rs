//! Default value functions referenced from serde attributes.

pub fn default_port() -> u16 {
    8080
}

pub fn default_max_connections_per_ip() -> usize {
    16
}

pub fn default_max_message_size() -> usize {
    4096
}

pub fn default_cors_origins() -> String {
    "*".to_string()
}

pub fn default_log_dir() -> String {
    "logs".to_string()
}

pub fn default_log_filename() -> String {
    "server.log".to_string()
}

pub fn default_rotation() -> String {
    "daily".to_string()
}

pub fn default_enable_file_logging() -> bool {
    false
}

pub fn default_log_format() -> super::logging::LogFormat {
    super::logging::LogFormat::Text
}
