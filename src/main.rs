use clap::{
    CommandFactory, Parser, Subcommand,
    builder::{
        Styles,
        styling::{AnsiColor, Effects},
    },
};
use clap_complete::{Shell, generate};

use sporlstats::{cli, config, error, logging, types::TimeRange, warning};

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
  author=env!("CARGO_PKG_AUTHORS"),
  about=env!("CARGO_PKG_DESCRIPTION"),
  styles=styles(),
)]
struct Cli {
    #[clap(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug, Clone)]
pub enum Command {
    /// Run the local dashboard
    Serve(ServeOptions),

    /// Log in with Spotify in the browser
    Login,

    /// Show top tracks, top artists and recently played tracks
    Stats(StatsOptions),

    /// Show the profile of the logged in user
    Profile,

    /// Forget the stored access token
    Logout,

    /// Get shell completions
    Completions(CompletionsOption),
}

#[derive(Parser, Debug, Clone)]
pub struct ServeOptions {
    /// Open the dashboard in the default browser
    #[clap(long)]
    pub open: bool,
}

#[derive(Parser, Debug, Clone)]
pub struct StatsOptions {
    /// Time range the top lists are computed over
    #[clap(long, value_enum, default_value_t = TimeRange::MediumTerm)]
    pub range: TimeRange,

    /// Number of entries per list (1-50)
    #[clap(long, value_parser = clap::value_parser!(u32).range(1..=50))]
    pub limit: Option<u32>,
}

#[derive(Parser, Debug, Clone)]
pub struct CompletionsOption {
    shell: Shell,
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    let default_log = match cli.command {
        Command::Serve(_) => logging::SERVER_DEFAULT,
        _ => logging::CLI_DEFAULT,
    };
    logging::init_logging(default_log);

    if let Err(e) = config::load_env().await {
        warning!("Cannot load environment. Err: {}", e);
    }

    let load_config = || match config::Config::from_env() {
        Ok(config) => config,
        Err(e) => error!("Configuration error: {}", e),
    };

    match cli.command {
        Command::Serve(opt) => cli::serve(config::Config::from_env(), opt.open).await,
        Command::Login => cli::login(load_config()).await,
        Command::Stats(opt) => {
            let mut config = load_config();
            if let Some(limit) = opt.limit {
                config.limit = limit;
            }
            cli::stats(config, opt.range).await
        }
        Command::Profile => cli::profile(load_config()).await,
        Command::Logout => cli::logout().await,
        Command::Completions(opt) => {
            let mut cmd = Cli::command_for_update();
            let name = cmd.get_name().to_string();
            generate(opt.shell, &mut cmd, name, &mut std::io::stdout())
        }
    }
}
