pub mod fd;
pub mod pthread;

pub use fd::{close_file, duplicate_stdin};
pub use pthread::PthreadMutex as PlatformMutex;
