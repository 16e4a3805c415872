mod colors;
mod commands;
mod interactive;

use clap::{Args, CommandFactory, Parser, Subcommand, ValueEnum};
use colors::ColorChoice;
use commands::Session;
use mensa::api::{ApiSettings, OPENMENSA_API_BASE, OpenMensaApi};
use mensa::config::ConfigStore;
use mensa::fetcher::DEFAULT_CONCURRENCY;
use mensa::format::DisplayOptions;
use mensa::models::Audience;
use std::time::Duration;

#[derive(Parser)]
#[command(name = "mensa")]
#[command(author, version, about = "Look up OpenMensa canteens, their meals and opening days", long_about = None)]
#[command(after_help = "Run without a command to start interactive mode.")]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,

    #[command(flatten)]
    display: DisplayArgs,

    /// Enable verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    /// When to use colors
    #[arg(long, global = true, value_enum, default_value_t = ColorChoice::Auto)]
    color: ColorChoice,

    /// OpenMensa API endpoint
    #[arg(long, global = true, env = "MENSA_API_URL", default_value = OPENMENSA_API_BASE)]
    api_url: String,

    /// Maximum number of canteen pages fetched at once
    #[arg(
        long,
        global = true,
        env = "MENSA_CONCURRENCY",
        default_value_t = DEFAULT_CONCURRENCY as u16,
        value_parser = clap::value_parser!(u16).range(1..=32)
    )]
    concurrency: u16,

    /// Request timeout in seconds (0 waits indefinitely)
    #[arg(long, global = true, env = "MENSA_TIMEOUT", default_value_t = 10)]
    timeout: u64,
}

#[derive(Args)]
struct DisplayArgs {
    /// Show meal prices
    #[arg(short = 'p', long, global = true)]
    price: bool,

    /// Show meal notes
    #[arg(short = 'n', long, global = true)]
    notes: bool,

    /// Show meal categories
    #[arg(short = 'c', long, global = true)]
    category: bool,

    /// Only show the price for one audience
    #[arg(long, global = true, value_enum, value_name = "AUDIENCE")]
    only: Option<AudienceArg>,

    /// Show the pupils price even when it is zero
    #[arg(long, global = true)]
    show_zero_pupils: bool,
}

#[derive(Clone, Copy, ValueEnum)]
enum AudienceArg {
    Student,
    Employee,
    Pupil,
    Other,
}

impl From<AudienceArg> for Audience {
    fn from(arg: AudienceArg) -> Self {
        match arg {
            AudienceArg::Student => Audience::Student,
            AudienceArg::Employee => Audience::Employee,
            AudienceArg::Pupil => Audience::Pupil,
            AudienceArg::Other => Audience::Other,
        }
    }
}

impl DisplayArgs {
    fn options(&self) -> DisplayOptions {
        DisplayOptions {
            show_price: self.price,
            show_notes: self.notes,
            show_category: self.category,
            hide_zero_pupils: !self.show_zero_pupils,
            ..DisplayOptions::default()
        }
        .with_audience(self.only.map(Audience::from))
    }
}

#[derive(Subcommand)]
enum Commands {
    /// List all mensas
    List {
        /// Only show mensas whose city contains this text
        #[arg(long)]
        city: Option<String>,
    },

    /// Show a mensa (the default mensa if no ID is given)
    Show {
        /// Mensa ID
        #[arg(value_parser = clap::value_parser!(u32).range(1..))]
        id: Option<u32>,
    },

    /// Save a mensa as your default
    SetDefault {
        /// Mensa ID
        #[arg(value_parser = clap::value_parser!(u32).range(1..))]
        id: u32,
    },

    /// Show the saved default mensa
    Default,

    /// Show today's meals
    Today {
        /// Mensa ID
        #[arg(value_parser = clap::value_parser!(u32).range(1..))]
        id: Option<u32>,
    },

    /// Show tomorrow's meals
    Tomorrow {
        /// Mensa ID
        #[arg(value_parser = clap::value_parser!(u32).range(1..))]
        id: Option<u32>,
    },

    /// Show the meals of the coming week
    Week {
        /// Mensa ID
        #[arg(value_parser = clap::value_parser!(u32).range(1..))]
        id: Option<u32>,
    },

    /// Show whether a mensa is open today or on a given date
    Status {
        /// Mensa ID
        #[arg(value_parser = clap::value_parser!(u32).range(1..))]
        id: Option<u32>,

        /// Date in the format YYYY-MM-DD
        #[arg(short, long)]
        date: Option<String>,
    },

    /// Show whether a mensa is open on the coming days
    WeekStatus {
        /// Mensa ID
        #[arg(value_parser = clap::value_parser!(u32).range(1..))]
        id: Option<u32>,
    },

    /// Generate shell completions
    Completions {
        /// Target shell
        shell: clap_complete::Shell,
    },
}

impl Cli {
    fn api_settings(&self) -> ApiSettings {
        ApiSettings {
            base_url: self.api_url.clone(),
            timeout: (self.timeout > 0).then(|| Duration::from_secs(self.timeout)),
            concurrency: usize::from(self.concurrency),
        }
    }
}

fn init_tracing(verbose: bool) {
    let default_level = if verbose { "mensa=debug,warn" } else { "warn" };
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(default_level)),
        )
        .with_writer(std::io::stderr)
        .init();
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    init_tracing(cli.verbose);
    colors::init_colors(cli.color);

    let api = OpenMensaApi::new(cli.api_settings())?;
    let session = Session::new(api, ConfigStore::default());
    let options = cli.display.options();

    match cli.command {
        Some(Commands::List { city }) => {
            commands::list(&session, city.as_deref()).await?;
        }
        Some(Commands::Show { id }) => {
            commands::show(&session, id).await?;
        }
        Some(Commands::SetDefault { id }) => {
            commands::set_default(&session, id).await?;
        }
        Some(Commands::Default) => {
            commands::show_default(&session)?;
        }
        Some(Commands::Today { id }) => {
            commands::today(&session, id, &options).await?;
        }
        Some(Commands::Tomorrow { id }) => {
            commands::tomorrow(&session, id, &options).await?;
        }
        Some(Commands::Week { id }) => {
            commands::week(&session, id, &options).await?;
        }
        Some(Commands::Status { id, date }) => {
            commands::status(&session, id, date.as_deref()).await?;
        }
        Some(Commands::WeekStatus { id }) => {
            commands::week_status(&session, id).await?;
        }
        Some(Commands::Completions { shell }) => {
            clap_complete::generate(shell, &mut Cli::command(), "mensa", &mut std::io::stdout());
        }
        None => {
            interactive::run(&session).await?;
        }
    }

    Ok(())
}
