use clap::Parser;
use resteasy::cli::{init_logging, Cli, Commands, RepoAction};

fn main() {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let result = match cli.command {
        Commands::Init {
            password_prompt,
            max_snapshots,
        } => resteasy::cli::commands::init::execute(&cli, password_prompt, max_snapshots),
        Commands::Repo { ref action } => match action {
            RepoAction::Add {
                ref name,
                ref paths,
                max_snapshots,
            } => resteasy::cli::commands::repo_add::execute(&cli, name, paths, *max_snapshots),
            RepoAction::Remove { ref name, force } => {
                resteasy::cli::commands::repo_remove::execute(&cli, name, *force)
            }
            RepoAction::List => resteasy::cli::commands::repo_list::execute(&cli),
        },
        Commands::Backup { ref name } => resteasy::cli::commands::backup::execute(&cli, name),
        Commands::Forget { ref name } => resteasy::cli::commands::forget::execute(&cli, name),
        Commands::Snapshots { ref name } => {
            resteasy::cli::commands::snapshots::execute(&cli, name)
        }
        Commands::Check { deep } => resteasy::cli::commands::check::execute(&cli, deep),
        Commands::Audit { last } => resteasy::cli::commands::audit_cmd::execute(&cli, last),
        Commands::Completions { shell } => resteasy::cli::commands::completions::execute(shell),
    };

    if let Err(e) = result {
        resteasy::cli::output::error(&e.to_string());
        std::process::exit(1);
    }
}
