//! Platform-specific configuration

use crossterm::event::{KeyEvent, KeyModifiers};
use std::io;
use std::process::{Command, Stdio};

/// Platform-appropriate modifier for wizard shortcuts
/// - macOS: SUPER (Cmd key)
/// - Linux/Windows: CONTROL (Ctrl key)
#[cfg(target_os = "macos")]
pub const ACTION_MODIFIER: KeyModifiers = KeyModifiers::SUPER;

#[cfg(not(target_os = "macos"))]
pub const ACTION_MODIFIER: KeyModifiers = KeyModifiers::CONTROL;

/// Submit shortcut display
#[cfg(target_os = "macos")]
pub const SUBMIT_SHORTCUT: &str = "Cmd+S";

#[cfg(not(target_os = "macos"))]
pub const SUBMIT_SHORTCUT: &str = "Ctrl+S";

/// Next step shortcut display
#[cfg(target_os = "macos")]
pub const NEXT_SHORTCUT: &str = "Cmd+N";

#[cfg(not(target_os = "macos"))]
pub const NEXT_SHORTCUT: &str = "Ctrl+N";

/// Previous step shortcut display
#[cfg(target_os = "macos")]
pub const BACK_SHORTCUT: &str = "Cmd+B";

#[cfg(not(target_os = "macos"))]
pub const BACK_SHORTCUT: &str = "Ctrl+B";

/// Ctrl works everywhere; Cmd only where the terminal forwards it
pub fn has_action_modifier(key: &KeyEvent) -> bool {
    key.modifiers.contains(KeyModifiers::CONTROL) || key.modifiers.contains(ACTION_MODIFIER)
}

const NO_ARGS: &[&str] = &[];
// The empty string is the window title `start` expects first
const WINDOWS_START: &[&str] = &["/C", "start", ""];

/// Program and leading arguments that open a file or URL with the
/// desktop's default handler
pub fn opener_command() -> (&'static str, &'static [&'static str]) {
    if cfg!(target_os = "macos") {
        ("open", NO_ARGS)
    } else if cfg!(target_os = "windows") {
        ("cmd", WINDOWS_START)
    } else {
        ("xdg-open", NO_ARGS)
    }
}

/// Hand a path or URL to the default handler without waiting for it
pub fn open_target(target: &str) -> io::Result<()> {
    let (program, args) = opener_command();
    tracing::info!(program, target, "opening with system handler");
    Command::new(program)
        .args(args)
        .arg(target)
        .stdin(Stdio::null())
        .stdout(Stdio::null())
        .stderr(Stdio::null())
        .spawn()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crossterm::event::KeyCode;

    #[test]
    fn test_opener_command_is_not_empty() {
        let (program, _) = opener_command();
        assert!(!program.is_empty());
    }

    #[cfg(target_os = "linux")]
    #[test]
    fn test_linux_uses_xdg_open() {
        let (program, args) = opener_command();
        assert_eq!(program, "xdg-open");
        assert!(args.is_empty());
    }

    #[test]
    fn test_control_is_always_an_action_modifier() {
        let key = KeyEvent::new(KeyCode::Char('s'), KeyModifiers::CONTROL);
        assert!(has_action_modifier(&key));
        let plain = KeyEvent::new(KeyCode::Char('s'), KeyModifiers::NONE);
        assert!(!has_action_modifier(&plain));
    }
}
