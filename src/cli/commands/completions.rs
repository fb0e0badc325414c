//! `resteasy completions`: generate shell completion scripts.
//!
//! Usage:
//!   resteasy completions bash > ~/.local/share/bash-completion/completions/resteasy
//!   resteasy completions zsh

use std::io;

use clap::CommandFactory;
use clap_complete::{generate, Shell};

use crate::cli::Cli;
use crate::errors::Result;

/// Execute the `completions` command.
pub fn execute(shell: Shell) -> Result<()> {
    write_completions(shell, &mut io::stdout());
    Ok(())
}

fn write_completions(shell: Shell, out: &mut dyn io::Write) {
    let mut cmd = Cli::command();
    let bin_name = cmd.get_name().to_string();
    generate(shell, &mut cmd, bin_name, out);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bash_script_mentions_subcommands() {
        let mut buf = Vec::new();
        write_completions(Shell::Bash, &mut buf);
        let script = String::from_utf8(buf).unwrap();
        assert!(script.contains("resteasy"));
        assert!(script.contains("backup"));
        assert!(script.contains("snapshots"));
    }

    #[test]
    fn shell_argument_is_parsed() {
        use clap::Parser;
        let cli = Cli::try_parse_from(["resteasy", "completions", "zsh"]).unwrap();
        assert!(matches!(
            cli.command,
            crate::cli::Commands::Completions { shell: Shell::Zsh }
        ));
        assert!(Cli::try_parse_from(["resteasy", "completions", "csh"]).is_err());
    }
}
