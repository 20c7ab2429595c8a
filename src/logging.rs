//! Logging abstraction
//!
//! Provides unified logging macros that work across different targets:
//! - Embedded (`defmt` feature): Uses defmt
//! - Host (`std` feature or tests): Uses println!/eprintln!
//! - Otherwise: No-op, arguments are still type-checked
//!
//! Log arguments must be plain values (numbers, `bool`, `&str`) so the same
//! call site formats under both defmt and `core::fmt`. Enums that show up in
//! log lines expose an `as_str()` for that reason.

/// Log informational message
#[macro_export]
macro_rules! log_info {
    ($($arg:tt)*) => {{
        #[cfg(feature = "defmt")]
        ::defmt::info!($($arg)*);

        #[cfg(all(not(feature = "defmt"), any(test, feature = "std")))]
        println!("[INFO] {}", format_args!($($arg)*));

        #[cfg(not(any(feature = "defmt", test, feature = "std")))]
        let _ = ::core::format_args!($($arg)*);
    }};
}

/// Log warning message
#[macro_export]
macro_rules! log_warn {
    ($($arg:tt)*) => {{
        #[cfg(feature = "defmt")]
        ::defmt::warn!($($arg)*);

        #[cfg(all(not(feature = "defmt"), any(test, feature = "std")))]
        println!("[WARN] {}", format_args!($($arg)*));

        #[cfg(not(any(feature = "defmt", test, feature = "std")))]
        let _ = ::core::format_args!($($arg)*);
    }};
}

/// Log error message
#[macro_export]
macro_rules! log_error {
    ($($arg:tt)*) => {{
        #[cfg(feature = "defmt")]
        ::defmt::error!($($arg)*);

        #[cfg(all(not(feature = "defmt"), any(test, feature = "std")))]
        eprintln!("[ERROR] {}", format_args!($($arg)*));

        #[cfg(not(any(feature = "defmt", test, feature = "std")))]
        let _ = ::core::format_args!($($arg)*);
    }};
}

/// Log debug message
#[macro_export]
macro_rules! log_debug {
    ($($arg:tt)*) => {{
        #[cfg(feature = "defmt")]
        ::defmt::debug!($($arg)*);

        #[cfg(all(not(feature = "defmt"), any(test, feature = "std")))]
        println!("[DEBUG] {}", format_args!($($arg)*));

        #[cfg(not(any(feature = "defmt", test, feature = "std")))]
        let _ = ::core::format_args!($($arg)*);
    }};
}
