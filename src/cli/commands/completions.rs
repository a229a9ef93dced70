//! Shell completions generation.
//!
//! Generates shell completion scripts for bash, zsh, fish, PowerShell and elvish.

use clap::CommandFactory;
use clap_complete::Shell;

use crate::cli::args::Cli;
use crate::error::TrackerError;

/// Execute the completions command.
///
/// # Errors
///
/// Returns `TrackerError::InvalidInput` for an unknown shell name.
pub fn completions(shell: &str, install: bool) -> Result<String, TrackerError> {
    let shell_type = shell_from_str(shell).ok_or_else(|| {
        TrackerError::InvalidInput(format!(
            "Unknown shell: {shell}. Supported: bash, zsh, fish, powershell, elvish"
        ))
    })?;

    if install {
        Ok(completion_install_instructions(shell_type))
    } else {
        generate_completions(shell_type)
    }
}

/// Generate the completion script for `shell`.
///
/// # Errors
///
/// Returns an error if the generated script is not valid UTF-8.
pub fn generate_completions(shell: Shell) -> Result<String, TrackerError> {
    let mut cmd = Cli::command();
    let mut buf = Vec::new();
    clap_complete::generate(shell, &mut cmd, "pomotrack", &mut buf);
    String::from_utf8(buf).map_err(|e| TrackerError::InvalidInput(format!("UTF-8 error: {e}")))
}

/// Get shell from string name.
#[must_use]
pub fn shell_from_str(s: &str) -> Option<Shell> {
    match s.to_lowercase().as_str() {
        "bash" => Some(Shell::Bash),
        "zsh" => Some(Shell::Zsh),
        "fish" => Some(Shell::Fish),
        "powershell" | "ps" | "pwsh" => Some(Shell::PowerShell),
        "elvish" => Some(Shell::Elvish),
        _ => None,
    }
}

/// Get installation instructions for shell completions.
#[must_use]
pub fn completion_install_instructions(shell: Shell) -> String {
    match shell {
        Shell::Bash => r"# Add to ~/.bashrc:
source <(pomotrack completions bash)
"
        .to_string(),

        Shell::Zsh => r"# Save to your fpath, then reload compinit:
pomotrack completions zsh > ~/.zsh/completions/_pomotrack
"
        .to_string(),

        Shell::Fish => r"pomotrack completions fish > ~/.config/fish/completions/pomotrack.fish
"
        .to_string(),

        Shell::PowerShell => r"# Add to your PowerShell profile ($PROFILE):
pomotrack completions powershell | Out-String | Invoke-Expression
"
        .to_string(),

        Shell::Elvish => r"pomotrack completions elvish > ~/.elvish/lib/pomotrack.elv
"
        .to_string(),

        _ => "Unknown shell".to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_shell_from_str() {
        assert_eq!(shell_from_str("bash"), Some(Shell::Bash));
        assert_eq!(shell_from_str("ZSH"), Some(Shell::Zsh));
        assert_eq!(shell_from_str("pwsh"), Some(Shell::PowerShell));
        assert_eq!(shell_from_str("unknown"), None);
    }

    #[test]
    fn test_generate_bash_completions() {
        let script = generate_completions(Shell::Bash).unwrap();
        assert!(script.contains("pomotrack"));
        assert!(script.contains("complete"));
    }

    #[test]
    fn test_unknown_shell_rejected() {
        assert!(matches!(
            completions("tcsh", false),
            Err(TrackerError::InvalidInput(_))
        ));
    }

    #[test]
    fn test_install_instructions() {
        let text = completions("fish", true).unwrap();
        assert!(text.contains("pomotrack completions fish"));
    }
}
