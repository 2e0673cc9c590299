use std::path::PathBuf;

use clap::{
    Args, CommandFactory, Parser, Subcommand,
    builder::{
        Styles,
        styling::{AnsiColor, Effects},
    },
};
use clap_complete::{Shell, generate};

use troverai::{cli, config, management::CatalogFilter, warning};

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
    /// Defaults to `now` when omitted
    #[clap(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand, Debug, Clone)]
pub enum Command {
    /// What is on air now on every Rai channel
    #[clap(visible_alias = "ora")]
    Now(NowOptions),

    /// Daily schedule of one channel
    #[clap(visible_alias = "canale")]
    Schedule(ScheduleOptions),

    /// List available channels
    #[clap(visible_alias = "canali")]
    Channels(JsonOption),

    /// Prime time (20:00-23:59) on Rai 1, Rai 2 and Rai 3
    #[clap(visible_alias = "prima-serata")]
    PrimeTime(PrimeTimeOptions),

    /// Search programs by name
    #[clap(visible_alias = "cerca")]
    Search(SearchOptions),

    /// Manage the RaiPlay login
    Auth(AuthOptions),

    /// Explore a saved RaiPlay catalog
    Catalog(CatalogOptions),

    /// Repair common errors in a JSON file
    Jsonfix(JsonFixOptions),

    /// Get shell completions
    Completions(CompletionsOption),
}

#[derive(Args, Debug, Clone, Default)]
pub struct DateOption {
    /// today, tomorrow, yesterday, +N, -N, DD-MM-YYYY, DD/MM/YYYY or YYYY-MM-DD
    #[clap(long, short = 'd', visible_alias = "data")]
    pub date: Option<String>,
}

#[derive(Args, Debug, Clone, Default)]
pub struct FilterOptions {
    /// Filter by typology (e.g. Film, Fiction)
    #[clap(long, short = 't', visible_alias = "tipo")]
    pub kind: Option<String>,

    /// Filter by genre
    #[clap(long, short = 'g', visible_alias = "genere")]
    pub genre: Option<String>,
}

impl FilterOptions {
    fn to_filter(&self) -> cli::ProgramFilter {
        cli::ProgramFilter {
            typology: self.kind.clone(),
            genre: self.genre.clone(),
        }
    }
}

#[derive(Args, Debug, Clone, Default)]
pub struct JsonOption {
    /// Print raw JSON
    #[clap(long)]
    pub json: bool,
}

#[derive(Args, Debug, Clone, Default)]
pub struct NowOptions {
    /// Only channels whose slug contains this text
    #[clap(long, short = 'c', visible_alias = "canale")]
    pub channel: Option<String>,

    #[clap(flatten)]
    pub date: DateOption,

    #[clap(flatten)]
    pub filter: FilterOptions,

    /// One line per channel
    #[clap(long, visible_alias = "compatto")]
    pub compact: bool,

    #[clap(flatten)]
    pub json: JsonOption,
}

#[derive(Args, Debug, Clone)]
pub struct ScheduleOptions {
    /// Channel name, e.g. rai1, rai-1, "Rai 1"
    pub channel: String,

    #[clap(flatten)]
    pub date: DateOption,

    /// Start time (HH:MM)
    #[clap(long, visible_alias = "dalle")]
    pub from: Option<String>,

    /// End time (HH:MM)
    #[clap(long, visible_alias = "alle")]
    pub to: Option<String>,

    #[clap(flatten)]
    pub filter: FilterOptions,

    /// One line per program
    #[clap(long, visible_alias = "compatto")]
    pub compact: bool,

    #[clap(flatten)]
    pub json: JsonOption,
}

#[derive(Args, Debug, Clone)]
pub struct PrimeTimeOptions {
    #[clap(flatten)]
    pub date: DateOption,

    #[clap(flatten)]
    pub filter: FilterOptions,

    #[clap(flatten)]
    pub json: JsonOption,
}

#[derive(Args, Debug, Clone)]
pub struct SearchOptions {
    /// Text to look for in program names
    pub query: String,

    #[clap(flatten)]
    pub date: DateOption,

    #[clap(flatten)]
    pub filter: FilterOptions,

    #[clap(flatten)]
    pub json: JsonOption,
}

#[derive(Parser, Debug, Clone)]
pub struct AuthOptions {
    #[command(subcommand)]
    pub command: AuthSubcommand,
}

#[derive(Subcommand, Debug, Clone)]
pub enum AuthSubcommand {
    /// Log in with RAIPLAY_USERNAME and RAIPLAY_PASSWORD and save the tokens
    Login,

    /// Show login status and token expiry
    Status,

    /// Print the JWT (refreshed when expired)
    Token {
        /// Print as `export RAIPLAY_TOKEN='...'`
        #[clap(long, short = 'e')]
        export: bool,
    },

    /// Refresh the JWT now
    Refresh,

    /// Call an authenticated endpoint with the stored token
    Test,

    /// Show the RaiPlay app configuration
    Config {
        /// Ignore the cached copy
        #[clap(long, short = 'r')]
        refresh: bool,
    },
}

#[derive(Parser, Debug, Clone)]
pub struct CatalogOptions {
    /// Catalog JSON file (default: $RAIPLAY_CATALOG or rai.json)
    #[clap(long, short = 'f', global = true)]
    pub file: Option<PathBuf>,

    #[command(subcommand)]
    pub command: CatalogSubcommand,
}

#[derive(Subcommand, Debug, Clone)]
pub enum CatalogSubcommand {
    /// List sections
    #[clap(visible_alias = "sezioni")]
    Sections,

    /// List genres
    #[clap(visible_alias = "generi")]
    Genres,

    /// List typologies
    #[clap(visible_alias = "tipologie")]
    Types,

    /// Catalog statistics
    Stats,

    /// A random suggestion
    #[clap(visible_alias = "casuale")]
    Random,

    /// Filter catalog items
    #[clap(visible_alias = "cerca")]
    Search(CatalogSearchOptions),
}

#[derive(Args, Debug, Clone)]
pub struct CatalogSearchOptions {
    #[clap(long, short = 's', visible_alias = "sezione")]
    pub section: Option<String>,

    #[clap(long, short = 't', visible_alias = "titolo")]
    pub title: Option<String>,

    #[clap(long, short = 'g', visible_alias = "genere")]
    pub genre: Option<String>,

    #[clap(long, visible_alias = "tipo")]
    pub kind: Option<String>,

    #[clap(long, short = 'a', visible_alias = "anno")]
    pub year: Option<String>,

    /// Show every field of each result
    #[clap(long, short = 'd', visible_alias = "dettagli")]
    pub details: bool,
}

#[derive(Parser, Debug, Clone)]
pub struct JsonFixOptions {
    /// JSON file to repair
    pub file: PathBuf,

    /// Output file (default: stdout)
    #[clap(long, short = 'o')]
    pub output: Option<PathBuf>,

    /// Modify the original file
    #[clap(long = "inplace", short = 'i', visible_alias = "in-place")]
    pub in_place: bool,

    /// Validate only; exit status 0 when valid, 1 otherwise
    #[clap(long, short = 'c')]
    pub check: bool,

    /// Format the output
    #[clap(long, short = 'p')]
    pub pretty: bool,

    /// Indentation for --pretty
    #[clap(long, default_value_t = 2)]
    pub indent: usize,

    /// Show each fix as it is applied
    #[clap(long, short = 'v')]
    pub verbose: bool,

    /// Suppress status messages
    #[clap(long, short = 'q')]
    pub quiet: bool,
}

#[derive(Parser, Debug, Clone)]
pub struct CompletionsOption {
    shell: Shell,
}

#[tokio::main]
async fn main() {
    if let Err(e) = config::load_env().await {
        warning!("Cannot load environment. Err: {}", e);
    }

    let cli = Cli::parse();

    match cli.command.unwrap_or_else(|| Command::Now(NowOptions::default())) {
        Command::Now(opt) => {
            cli::now(
                opt.channel,
                opt.date.date,
                &opt.filter.to_filter(),
                opt.compact,
                opt.json.json,
            )
            .await
        }
        Command::Schedule(opt) => {
            cli::schedule(
                opt.channel,
                opt.date.date,
                opt.from,
                opt.to,
                &opt.filter.to_filter(),
                opt.compact,
                opt.json.json,
            )
            .await
        }
        Command::Channels(opt) => cli::channels(opt.json).await,
        Command::PrimeTime(opt) => {
            cli::prime_time(opt.date.date, &opt.filter.to_filter(), opt.json.json).await
        }
        Command::Search(opt) => {
            cli::search(
                opt.query,
                opt.date.date,
                &opt.filter.to_filter(),
                opt.json.json,
            )
            .await
        }

        Command::Auth(opt) => match opt.command {
            AuthSubcommand::Login => cli::login().await,
            AuthSubcommand::Status => cli::status().await,
            AuthSubcommand::Token { export } => cli::token(export).await,
            AuthSubcommand::Refresh => cli::refresh().await,
            AuthSubcommand::Test => cli::test_auth().await,
            AuthSubcommand::Config { refresh } => cli::show_config(refresh).await,
        },

        Command::Catalog(opt) => {
            let path = config::catalog_file(opt.file.as_deref());
            match opt.command {
                CatalogSubcommand::Sections => cli::catalog_sections(&path).await,
                CatalogSubcommand::Genres => cli::catalog_genres(&path).await,
                CatalogSubcommand::Types => cli::catalog_types(&path).await,
                CatalogSubcommand::Stats => cli::catalog_stats(&path).await,
                CatalogSubcommand::Random => cli::catalog_random(&path).await,
                CatalogSubcommand::Search(s) => {
                    let filter = CatalogFilter {
                        section: s.section,
                        title: s.title,
                        genre: s.genre,
                        typology: s.kind,
                        year: s.year,
                    };
                    cli::catalog_search(&path, &filter, s.details).await
                }
            }
        }

        Command::Jsonfix(opt) => {
            cli::jsonfix(cli::JsonFixArgs {
                file: opt.file,
                output: opt.output,
                in_place: opt.in_place,
                check: opt.check,
                pretty: opt.pretty,
                indent: opt.indent,
                verbose: opt.verbose,
                quiet: opt.quiet,
            })
            .await
        }

        Command::Completions(opt) => {
            let mut cmd = Cli::command();
            let name = cmd.get_name().to_string();
            generate(opt.shell, &mut cmd, name, &mut std::io::stdout())
        }
    }
}
