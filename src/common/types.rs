use core::ffi::c_char;
use core::fmt;

#[repr(i32)]
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub enum PlatformStatus {
    Ok = 0,
    InvalidHandle = 1,
    InvalidArgument = 2,
    EncodingError = 3,
    LockCreateError = 4,
    LockDestroyError = 5,
    LockAcquireError = 6,
    LockReleaseError = 7,
    BaseTooShallow = 8,
    FileOpenFailed = 9,
    FileGetPosFailed = 10,
    FileSeekFailed = 11,
    FileReadFailed = 12,
    FileResetFailed = 13,
    FileCloseFailed = 14,
    BasePathUnavailable = 15,
    IoError = 16,
}

impl PlatformStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Ok => "ok",
            Self::InvalidHandle => "invalid handle",
            Self::InvalidArgument => "invalid argument",
            Self::EncodingError => "input is not valid UTF-8",
            Self::LockCreateError => "could not create mutex",
            Self::LockDestroyError => "could not destroy mutex",
            Self::LockAcquireError => "could not lock mutex",
            Self::LockReleaseError => "could not unlock mutex",
            Self::BaseTooShallow => "base path has too few levels for relative path",
            Self::FileOpenFailed => "could not open file",
            Self::FileGetPosFailed => "could not get current file position",
            Self::FileSeekFailed => "could not seek in file",
            Self::FileReadFailed => "could not read from file",
            Self::FileResetFailed => "could not reset file",
            Self::FileCloseFailed => "could not close file",
            Self::BasePathUnavailable => "could not get base path name",
            Self::IoError => "i/o error",
        }
    }
}

impl fmt::Display for PlatformStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::error::Error for PlatformStatus {}

#[repr(i32)]
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub enum PlatformLogLevel {
    Off = 0,
    Error = 1,
    Warn = 2,
    Info = 3,
    Debug = 4,
    Trace = 5,
}

#[repr(C)]
#[derive(Copy, Clone)]
pub struct PlatformStringView {
    pub ptr: *const c_char,
    pub len: usize,
}

impl PlatformStringView {
    pub const fn empty() -> Self {
        Self {
            ptr: core::ptr::null(),
            len: 0,
        }
    }
}

#[repr(C)]
#[derive(Copy, Clone)]
pub struct PlatformLogRecord {
    pub level: PlatformLogLevel,
    pub target: PlatformStringView,
    pub message: PlatformStringView,
    pub file: PlatformStringView,
    pub line: u32,
}

#[repr(C)]
#[derive(Copy, Clone)]
pub struct PlatformConfig {
    pub size: u32,
    pub flags: u32,
    pub reserved: [u64; 6],
}

impl Default for PlatformConfig {
    fn default() -> Self {
        Self {
            size: core::mem::size_of::<PlatformConfig>() as u32,
            flags: 0,
            reserved: [0; 6],
        }
    }
}

pub const PLATFORM_FLAG_STRICT_WEAVE: u32 = 1 << 0;
pub const PLATFORM_FLAG_LOG_STDERR: u32 = 1 << 1;
