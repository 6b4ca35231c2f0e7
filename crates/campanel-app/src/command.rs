//! Terminal host command grammar.

/// One line of terminal input.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Toggle the live preview.
    Preview,
    /// Capture a still.
    Capture,
    /// Refresh the file list.
    Files,
    /// Refresh the storage summary.
    Storage,
    /// Preview a stored photo.
    Show(String),
    /// Delete a stored photo.
    Delete(String),
    /// Open the hardware modal.
    Info,
    /// Press the modal close control.
    Close,
    /// Press Escape.
    Escape,
    /// Click the modal backdrop.
    Backdrop,
    /// Reboot the device.
    Reboot,
    /// Print the panel state.
    Status,
    /// Print the command list.
    Help,
    /// Leave the host.
    Quit,
}

/// Command list printed by the terminal host.
pub const HELP_TEXT: &str = "\
commands:
  preview        start or stop the live preview
  capture        capture a photo
  files          refresh the file list
  sd             refresh the storage summary
  show <name>    preview a stored photo
  delete <name>  delete a stored photo
  info           open hardware info
  close | esc | backdrop
                 dismiss hardware info
  reboot         reboot the camera
  status         print the panel state
  quit";

impl Command {
    /// Parses one input line. Returns `None` for blank or unknown input.
    pub fn parse(line: &str) -> Option<Self> {
        let line = line.trim();
        let (verb, argument) = match line.split_once(char::is_whitespace) {
            Some((verb, rest)) => (verb, rest.trim()),
            None => (line, ""),
        };

        let command = match (verb.to_ascii_lowercase().as_str(), argument) {
            ("preview" | "p", "") => Self::Preview,
            ("capture" | "c", "") => Self::Capture,
            ("files" | "ls", "") => Self::Files,
            ("sd" | "storage", "") => Self::Storage,
            ("show", name) if !name.is_empty() => Self::Show(name.to_string()),
            ("delete" | "rm", name) if !name.is_empty() => Self::Delete(name.to_string()),
            ("info", "") => Self::Info,
            ("close", "") => Self::Close,
            ("esc" | "escape", "") => Self::Escape,
            ("backdrop", "") => Self::Backdrop,
            ("reboot", "") => Self::Reboot,
            ("status" | "s", "") => Self::Status,
            ("help" | "?", "") => Self::Help,
            ("quit" | "exit" | "q", "") => Self::Quit,
            _ => return None,
        };
        Some(command)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn file_commands_keep_names_with_spaces() {
        assert_eq!(
            Command::parse("show  my photo.jpg "),
            Some(Command::Show("my photo.jpg".to_string()))
        );
        assert_eq!(
            Command::parse("DELETE a.jpg"),
            Some(Command::Delete("a.jpg".to_string()))
        );
    }

    #[test]
    fn unknown_or_incomplete_input_is_rejected() {
        assert_eq!(Command::parse(""), None);
        assert_eq!(Command::parse("show"), None);
        assert_eq!(Command::parse("capture now"), None);
        assert_eq!(Command::parse("dance"), None);
    }

    #[test]
    fn short_aliases_are_accepted() {
        assert_eq!(Command::parse("p"), Some(Command::Preview));
        assert_eq!(Command::parse("esc"), Some(Command::Escape));
        assert_eq!(Command::parse("q"), Some(Command::Quit));
    }
}
