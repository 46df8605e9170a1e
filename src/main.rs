use clap::{
    CommandFactory, Parser, Subcommand,
    builder::{
        Styles,
        styling::{AnsiColor, Effects},
    },
};
use clap_complete::{Shell, generate};

use coauthors::{cli, config, error};

fn styles() -> Styles {
    Styles::styled()
        .header(AnsiColor::White.on_default() | Effects::BOLD)
        .usage(AnsiColor::White.on_default() | Effects::BOLD)
        .literal(AnsiColor::BrightBlue.on_default())
        .placeholder(AnsiColor::BrightGreen.on_default())
}

#[derive(Parser, Debug, Clone)]
#[clap(
  version = env!("CARGO_PKG_VERSION"),
  name=env!("CARGO_PKG_NAME"),
  bin_name=env!("CARGO_PKG_NAME"),
  about=env!("CARGO_PKG_DESCRIPTION"),
  styles=styles(),
)]
struct Cli {
    #[clap(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug, Clone)]
pub enum Command {
    /// Start the REST API server
    Serve,

    /// Search authors that can be attributed to posts
    Authors(AuthorsOptions),

    /// List guest authors
    Guests(GuestsOptions),

    /// Issue a bearer token for a user
    Token(TokenOptions),

    /// Get shell completions
    Completions(CompletionsOption),
}

#[derive(Parser, Debug, Clone)]
pub struct AuthorsOptions {
    /// Search term
    #[clap(long)]
    pub q: String,

    /// Comma-separated logins to leave out of the results
    #[clap(long)]
    pub exclude: Option<String>,
}

#[derive(Parser, Debug, Clone)]
pub struct GuestsOptions {
    /// Only list guest authors matching this term
    #[clap(long)]
    pub q: Option<String>,
}

#[derive(Parser, Debug, Clone)]
pub struct TokenOptions {
    /// Login of the user the token is issued for
    pub login: String,
}

#[derive(Parser, Debug, Clone)]
pub struct CompletionsOption {
    shell: Shell,
}

#[tokio::main]
async fn main() {
    if let Err(e) = config::load_env().await {
        error!("Cannot load environment. Err: {}", e);
    }

    let cli = Cli::parse();

    match cli.command {
        Command::Serve => cli::serve().await,
        Command::Authors(opt) => cli::authors(opt.q, opt.exclude).await,
        Command::Guests(opt) => cli::guests(opt.q).await,
        Command::Token(opt) => cli::token(opt.login).await,
        Command::Completions(opt) => {
            let mut cmd = Cli::command();
            let name = cmd.get_name().to_string();
            generate(opt.shell, &mut cmd, name, &mut std::io::stdout())
        }
    }
}
