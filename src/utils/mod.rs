pub mod fs;

pub use fs::{
    backup_file, backup_path, can_replace_atomically, ensure_backup_possible, ensure_file, ensure_writable,
    read_text, write_text, write_text_atomic,
};
