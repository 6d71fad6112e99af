use std::io::Write;

use clap::CommandFactory;
use clap_complete::{Shell, generate};

use crate::cli::Cli;

/// Write the completion script for `shell` to `out`, registered under the
/// binary's own name.
pub fn write_completions(shell: Shell, out: &mut dyn Write) {
    let mut command = Cli::command();
    let bin_name = command.get_name().to_string();
    generate(shell, &mut command, bin_name, out);
}

#[cfg(test)]
mod tests {
    use super::*;

    fn script(shell: Shell) -> String {
        let mut buffer = Vec::new();
        write_completions(shell, &mut buffer);
        String::from_utf8(buffer).unwrap()
    }

    #[test]
    fn test_bash_script_covers_resource_commands() {
        let bash = script(Shell::Bash);
        assert!(bash.starts_with("_agentdeck"));
        for command in ["list", "show", "create", "update", "delete", "folders"] {
            assert!(bash.contains(command), "missing {command}");
        }
    }

    #[test]
    fn test_zsh_script_names_the_binary() {
        assert!(script(Shell::Zsh).contains("#compdef agentdeck"));
    }
}
