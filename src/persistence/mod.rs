pub mod config;
pub mod files;
pub mod store;

pub use config::{load_config, save_config, AppConfig};
pub use files::{
    atomic_write, config_file, ensure_data_dir, get_data_dir, init_local_data_dir, log_dir,
    read_file, report_file,
};
pub use store::{load, save, FileStore, KeyValueStore, MemoryStore, TAGS_KEY, TASKS_KEY};
