//! # Console Module
//!
//! Hides and restores the console window the launcher was started with.
//! Double-clicking the launcher opens a console; the user should only ever see the
//! Python application, unless something goes wrong and there is a diagnostic to read.
//!
//! On non-Windows targets there is no console window to manage and both calls are no-ops.

#[cfg(windows)]
use windows::Win32::System::Console::GetConsoleWindow;
#[cfg(windows)]
use windows::Win32::UI::WindowsAndMessaging::{ShowWindow, SW_HIDE, SW_MINIMIZE, SW_SHOW};
use log::debug;

/// Hides the console window attached to this process.
///
/// Returns `false` if the process has no console window.
#[cfg(windows)]
pub fn hide_console_window() -> bool {
    unsafe {
        let hwnd = GetConsoleWindow();
        if hwnd.is_invalid() {
            debug!("No console window attached");
            return false;
        }
        // SW_HIDE alone does not take effect on a freshly created console.
        let _ = ShowWindow(hwnd, SW_MINIMIZE);
        let _ = ShowWindow(hwnd, SW_HIDE);
    }
    true
}

/// Shows the console window again.
#[cfg(windows)]
pub fn restore_console_window() -> bool {
    unsafe {
        let hwnd = GetConsoleWindow();
        if hwnd.is_invalid() {
            return false;
        }
        let _ = ShowWindow(hwnd, SW_SHOW);
    }
    true
}

#[cfg(not(windows))]
pub fn hide_console_window() -> bool {
    debug!("Console hiding is a no-op on this platform");
    false
}

#[cfg(not(windows))]
pub fn restore_console_window() -> bool {
    false
}
