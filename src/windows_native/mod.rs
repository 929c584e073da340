pub mod win32;

pub use win32::{close_file, duplicate_stdin, SrwMutex as PlatformMutex};
