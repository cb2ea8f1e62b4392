use std::sync::Arc;

use clap::{Parser, Subcommand};
use portal::models::admin::ChangeFeaturePayload;
use portal::models::auth::{LoginRequest, ResetPasswordRequest};
use portal::models::project::{ApplicationDraft, ProjectQuery, ProjectStatus};
use portal::services::{features, locale, projects, session};
use portal::notify::{Notice, NoticeLevel, Notifier};
use portal::telemetry;
use portal::{build_portal, ClientConfig, ClientError, FileCookieStore, HeadlessNavigator, PortalState};
use serde::Serialize;

#[derive(Parser)]
#[command(name = "portal")]
#[command(about = "Command-line client for the student project portal")]
struct Args {
    /// Log as JSON instead of the compact format
    #[arg(long, global = true)]
    json_logs: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Sign in and store the session
    Login {
        #[arg(short, long)]
        identity: String,
        #[arg(short, long)]
        password: String,
    },
    /// End the session
    Logout,
    /// Print the current auth context
    Whoami,
    #[command(subcommand)]
    Projects(ProjectsCommand),
    #[command(subcommand)]
    Features(FeaturesCommand),
    #[command(subcommand)]
    Password(PasswordCommand),
    #[command(subcommand)]
    Locale(LocaleCommand),
}

#[derive(Subcommand)]
enum ProjectsCommand {
    List {
        #[arg(long, default_value_t = 0)]
        page: u32,
        #[arg(long, default_value_t = 10)]
        size: u32,
        /// DRAFT, OPEN, IN_PROGRESS, COMPLETED or CANCELLED
        #[arg(long)]
        status: Option<String>,
    },
    Search {
        keyword: String,
    },
    Show {
        id: String,
    },
    Apply {
        id: String,
        #[arg(short, long)]
        message: String,
    },
    Applications {
        id: String,
    },
    Withdraw {
        application_id: String,
    },
}

#[derive(Subcommand)]
enum FeaturesCommand {
    List,
    Set { key: String, enabled: bool },
    Clean,
}

#[derive(Subcommand)]
enum PasswordCommand {
    Forgot {
        email: String,
    },
    Reset {
        #[arg(long)]
        token: String,
        #[arg(long)]
        password: String,
    },
}

#[derive(Subcommand)]
enum LocaleCommand {
    Get,
    Set { locale: String },
}

fn print_json<T: Serialize>(value: &T) -> Result<(), ClientError> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

/// Prints notices for the person at the terminal.
struct ConsoleNotifier;

impl Notifier for ConsoleNotifier {
    fn notify(&self, notice: Notice) {
        let mark = match notice.level {
            NoticeLevel::Error => "❌",
            NoticeLevel::Warning => "⚠️",
            NoticeLevel::Success => "✅",
            NoticeLevel::Info => "ℹ️",
        };
        match notice.description {
            Some(description) => eprintln!("{mark} {}: {description}", notice.title),
            None => eprintln!("{mark} {}", notice.title),
        }
    }
}

async fn run(command: Command, state: &PortalState) -> Result<(), ClientError> {
    match command {
        Command::Login { identity, password } => {
            session::login(state, &LoginRequest::new(identity, password)).await?;
            let ctx = session::session(state).await?;
            if let Some(user) = session::current_user(state).await? {
                locale::sync_user_language(state, &user)?;
            }
            print_json(&ctx)?;
        }
        Command::Logout => session::logout(state).await?,
        Command::Whoami => print_json(&session::session(state).await?)?,
        Command::Projects(cmd) => match cmd {
            ProjectsCommand::List { page, size, status } => {
                let mut query = ProjectQuery::page(page, size);
                if let Some(status) = status {
                    query = query.with_status(status.parse::<ProjectStatus>()?);
                }
                print_json(&projects::projects(state, &query).await?)?;
            }
            ProjectsCommand::Search { keyword } => {
                let found = projects::search(state, &keyword, &ProjectQuery::default()).await?;
                print_json(&found)?;
            }
            ProjectsCommand::Show { id } => print_json(&projects::project(state, &id).await?)?,
            ProjectsCommand::Apply { id, message } => {
                projects::apply(state, &id, &ApplicationDraft::new(message)).await?;
            }
            ProjectsCommand::Applications { id } => {
                print_json(&projects::applications(state, &id).await?)?;
            }
            ProjectsCommand::Withdraw { application_id } => {
                projects::withdraw(state, &application_id).await?;
            }
        },
        Command::Features(cmd) => {
            features::require_admin(&session::session(state).await?)?;
            match cmd {
                FeaturesCommand::List => print_json(&features::features(state).await?)?,
                FeaturesCommand::Set { key, enabled } => {
                    features::change_feature(state, &ChangeFeaturePayload::new(key, enabled))
                        .await?;
                }
                FeaturesCommand::Clean => features::clean_features(state).await?,
            }
        }
        Command::Password(cmd) => match cmd {
            PasswordCommand::Forgot { email } => session::forgot_password(state, &email).await?,
            PasswordCommand::Reset { token, password } => {
                session::reset_password(state, &ResetPasswordRequest { token, password }).await?;
            }
        },
        Command::Locale(cmd) => match cmd {
            LocaleCommand::Get => println!("{}", locale::current(state)),
            LocaleCommand::Set { locale: value } => {
                let chosen = locale::set_locale_str(state, &value)?;
                println!("{chosen}");
            }
        },
    }
    Ok(())
}

#[tokio::main]
async fn main() {
    let args = Args::parse();
    telemetry::init_tracing(args.json_logs);

    let config = match ClientConfig::from_env() {
        Ok(config) => config,
        Err(e) => {
            eprintln!("❌ {e}");
            std::process::exit(2);
        }
    };

    let cookies = Arc::new(FileCookieStore::new(&config.session_file));
    let state = match build_portal(config)
        .with_cookies(cookies)
        .with_navigator(Arc::new(HeadlessNavigator::default()))
        .with_notifier(Arc::new(ConsoleNotifier))
        .build()
    {
        Ok(state) => state,
        Err(e) => {
            eprintln!("❌ {e}");
            std::process::exit(2);
        }
    };

    if let Err(e) = run(args.command, &state).await {
        state.reporter().report(&e);
        std::process::exit(1);
    }
}
