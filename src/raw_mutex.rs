use crate::common::types::PlatformStatus;

/// A non-recursive OS mutex.
///
/// Implementations must keep the primitive at a stable address for their whole
/// lifetime. `lock`/`unlock` report OS failures instead of panicking.
pub trait RawMutex: Send + Sync + Sized {
    fn new() -> Result<Self, PlatformStatus>;

    fn lock(&self) -> Result<(), PlatformStatus>;

    fn unlock(&self) -> Result<(), PlatformStatus>;

    /// Releases the OS resources. Calling it twice is a no-op.
    fn destroy(&mut self) -> Result<(), PlatformStatus>;

    /// Nonzero identity of the calling thread.
    fn current_thread() -> usize;
}
