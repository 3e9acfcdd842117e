mod commands;
mod render;
mod utils;

use anyhow::Result;
use chrono::Utc;
use chrono_tz::Tz;
use clap::{Args, Parser, Subcommand};
use first_mate_core::config::FirstMateConfig;
use first_mate_core::date_range::DateRange;
use first_mate_core::user::ProfileUpdate;
use tracing_subscriber::EnvFilter;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

use crate::render::week_offset_label;

#[derive(Parser)]
#[command(name = "first-mate")]
#[command(about = "Find students whose timetables line up with yours")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

/// Which classes to look at: a week relative to this one, or explicit dates.
#[derive(Args, Clone, Debug, Default)]
pub struct RangeArgs {
    /// Week relative to this one (0 = this week, -1 = last week, 1 = next week)
    #[arg(short, long, allow_negative_numbers = true, conflicts_with = "from")]
    week: Option<i64>,

    /// Start date (YYYY-MM-DD)
    #[arg(long)]
    from: Option<String>,

    /// End date, inclusive (YYYY-MM-DD). Defaults to a week after --from
    #[arg(long, requires = "from")]
    to: Option<String>,
}

impl RangeArgs {
    /// The selected range and a label describing it.
    pub fn resolve(&self, tz: Tz) -> Result<(DateRange, String)> {
        if let Some(from) = &self.from {
            let range = DateRange::from_args(from, self.to.as_deref(), tz)?;
            let last_day = range.days(tz).last().copied();
            let label = match last_day {
                Some(last) => format!("{} to {}", from, last.format("%Y-%m-%d")),
                None => from.clone(),
            };
            return Ok((range, label));
        }

        let offset = self.week.unwrap_or(0);
        let range = DateRange::week(offset, Utc::now(), tz)?;
        Ok((range, week_offset_label(offset)))
    }
}

#[derive(Subcommand)]
enum Commands {
    /// Register a student with their timetable feed
    Register {
        /// zID, e.g. z1234567
        #[arg(long)]
        zid: Option<String>,

        /// Name shown to other students
        #[arg(short, long)]
        name: Option<String>,

        /// Timetable feed URL (webcal:// or https://)
        #[arg(short, long)]
        ical_url: Option<String>,

        /// Degree being studied (repeatable)
        #[arg(short, long = "degree")]
        degrees: Vec<String>,
    },
    /// Download timetable feeds again
    Refresh {
        /// Only refresh this student (defaults to everyone)
        zid: Option<String>,
    },
    /// Show or edit a profile
    Profile {
        zid: String,

        /// New display name
        #[arg(short, long)]
        name: Option<String>,

        /// Replace degrees (repeatable)
        #[arg(short, long = "degree")]
        degrees: Vec<String>,

        /// Description anyone can see
        #[arg(long)]
        public: Option<String>,

        /// Description only mutual matches can see
        #[arg(long)]
        private: Option<String>,
    },
    /// List registered students
    Users,
    /// Like another student's profile
    Like { zid: String, them: String },
    /// Take back a like
    Unlike { zid: String, them: String },
    /// Show students who like you back
    Matches { zid: String },
    /// Show a student's classes
    Calendar {
        zid: String,

        #[command(flatten)]
        range: RangeArgs,
    },
    /// Find students whose classes line up with yours
    Mates {
        zid: String,

        #[command(flatten)]
        range: RangeArgs,

        /// Print the mates as JSON
        #[arg(long)]
        json: bool,
    },
    /// Show free time two students have in common
    Free {
        zid: String,
        them: String,

        #[command(flatten)]
        range: RangeArgs,

        /// Include Saturdays and Sundays
        #[arg(long)]
        weekends: bool,
    },
    /// List the buildings nearest to a campus building
    Nearest {
        /// Building grid reference, e.g. K17
        building: String,

        /// How many buildings to list
        #[arg(short = 'n', long, default_value_t = 5)]
        count: usize,
    },
    /// Show config paths and settings
    Config,
    /// Delete every registered student
    Clear {
        /// Don't ask for confirmation
        #[arg(long)]
        force: bool,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::registry()
        .with(filter)
        .with(
            tracing_subscriber::fmt::layer()
                .with_target(false)
                .with_writer(std::io::stderr),
        )
        .init();

    let config = FirstMateConfig::load()?;
    tracing::debug!(data_dir = %config.data_path().display(), "loaded config");

    match cli.command {
        Commands::Register {
            zid,
            name,
            ical_url,
            degrees,
        } => commands::register::run(&config, zid, name, ical_url, degrees).await,
        Commands::Refresh { zid } => commands::refresh::run(&config, zid.as_deref()).await,
        Commands::Profile {
            zid,
            name,
            degrees,
            public,
            private,
        } => {
            let update = ProfileUpdate {
                display_name: name,
                degrees: (!degrees.is_empty()).then_some(degrees),
                public_description: public,
                private_description: private,
            };
            commands::profile::run(&config, &zid, update)
        }
        Commands::Users => commands::users::run(&config),
        Commands::Like { zid, them } => commands::like::run(&config, &zid, &them, true),
        Commands::Unlike { zid, them } => commands::like::run(&config, &zid, &them, false),
        Commands::Matches { zid } => commands::matches::run(&config, &zid),
        Commands::Calendar { zid, range } => commands::calendar::run(&config, &zid, &range),
        Commands::Mates { zid, range, json } => commands::mates::run(&config, &zid, &range, json),
        Commands::Free {
            zid,
            them,
            range,
            weekends,
        } => commands::free::run(&config, &zid, &them, &range, weekends),
        Commands::Nearest { building, count } => commands::nearest::run(&building, count),
        Commands::Config => commands::config::run(&config),
        Commands::Clear { force } => commands::clear::run(&config, force),
    }
}
