//! Unrecoverable platform failures.

#[repr(i32)]
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub enum PanicReason {
    NoTransService = 0,
    NoDefTranscoder = 1,
    CantFindLib = 2,
    UnknownMsgDomain = 3,
    CantLoadMsgDomain = 4,
    SynchronizationErr = 5,
    SystemInit = 6,
}

impl PanicReason {
    pub fn message(self) -> &'static str {
        match self {
            Self::NoTransService => "Could not load a transcoding service",
            Self::NoDefTranscoder => "Could not load a local code page transcoder",
            Self::CantFindLib => "Could not find the platutils library",
            Self::UnknownMsgDomain => "Unknown message domain",
            Self::CantLoadMsgDomain => "Cannot load message domain",
            Self::SynchronizationErr => "Cannot synchronize system or mutex",
            Self::SystemInit => "Cannot initialize the system or mutex",
        }
    }

    pub(crate) fn from_i32(value: i32) -> Option<Self> {
        match value {
            0 => Some(Self::NoTransService),
            1 => Some(Self::NoDefTranscoder),
            2 => Some(Self::CantFindLib),
            3 => Some(Self::UnknownMsgDomain),
            4 => Some(Self::CantLoadMsgDomain),
            5 => Some(Self::SynchronizationErr),
            6 => Some(Self::SystemInit),
            _ => None,
        }
    }
}

/// Prints the reason to stderr and terminates the process with status -1.
///
/// No unwinding happens; destructors of live values do not run.
pub fn fatal(reason: PanicReason) -> ! {
    fatal_message(reason.message())
}

pub(crate) fn fatal_message(message: &str) -> ! {
    log::error!("{message}");
    eprintln!("{message}");
    std::process::exit(-1)
}
