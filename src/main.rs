//! uc-admin - Union Catalog administration client
//!
//! Command line front end for registration review and book maintenance.

use std::io::{self, Write};
use std::path::PathBuf;

use anyhow::Context;
use clap::{Args, Parser, Subcommand};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use union_catalog_admin::{
    config::AppConfig,
    console::{book_details, books_table, registrations_table, Decision},
    models::{
        BookForm, BookQuery, BookType, EmailVerifiedFilter, LoginOutcome, RegistrationAction, StatusFilter,
        UserRole,
    },
    session::{Session, SessionStore},
    AppError, AppState,
};

#[derive(Parser)]
#[command(name = "uc-admin", version, about = "Union Catalog administration client")]
struct Cli {
    /// Directory holding `default.toml` and per-mode config files
    #[arg(long, global = true, default_value = "config")]
    config: String,

    /// Session file, overriding `session.path`
    #[arg(long, global = true)]
    session: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Sign in with email and password
    Login {
        #[arg(long)]
        email: String,
        #[arg(long, env = "UC_ADMIN_PASSWORD", hide_env_values = true)]
        password: String,
        #[arg(long)]
        remember_me: bool,
    },
    /// Finish a login that asked for a one-time code
    VerifyOtp {
        #[arg(long)]
        code: String,
    },
    Logout,
    /// Show the signed-in account
    Whoami,
    /// Review library registrations (super-admin)
    #[command(subcommand)]
    Registrations(RegistrationsCommand),
    /// Browse and maintain books
    #[command(subcommand)]
    Books(BooksCommand),
}

#[derive(Subcommand)]
enum RegistrationsCommand {
    List {
        #[arg(long, default_value_t = 1, value_parser = clap::value_parser!(u32).range(1..))]
        page: u32,
        #[arg(long, default_value = "")]
        name: String,
        /// All, Pending, Approved, Declined or Banned
        #[arg(long, default_value = "All")]
        status: StatusFilter,
        /// All, Verified or NotVerified
        #[arg(long, default_value = "All")]
        email: EmailVerifiedFilter,
    },
    Approve {
        id: String,
        /// Skip the confirmation prompt
        #[arg(long)]
        yes: bool,
    },
    Decline {
        id: String,
        #[arg(long)]
        note: Option<String>,
    },
    Ban {
        id: String,
        #[arg(long)]
        note: Option<String>,
    },
    Unban {
        id: String,
    },
}

#[derive(Subcommand)]
enum BooksCommand {
    List {
        #[arg(long, default_value_t = 1, value_parser = clap::value_parser!(u32).range(1..))]
        page: u32,
        #[arg(long, default_value = "")]
        title: String,
        #[arg(long, default_value = "")]
        author: String,
        #[arg(long = "type")]
        book_type: Option<BookType>,
    },
    Show {
        id: String,
        #[arg(long = "type", default_value = "English")]
        book_type: BookType,
    },
    /// Add a book; ISBN, title, author and publisher are required
    Add {
        #[arg(long = "type", default_value = "English")]
        book_type: BookType,
        #[command(flatten)]
        fields: BookFields,
        /// Cover image (JPEG, PNG, WebP or GIF)
        #[arg(long)]
        cover: Option<PathBuf>,
    },
    /// Edit a book; fields not given keep their current values
    Update {
        id: String,
        #[arg(long = "type", default_value = "English")]
        book_type: BookType,
        #[command(flatten)]
        fields: BookFields,
        #[arg(long, conflicts_with = "remove_cover")]
        cover: Option<PathBuf>,
        #[arg(long)]
        remove_cover: bool,
    },
    Delete {
        id: String,
        #[arg(long = "type", default_value = "English")]
        book_type: BookType,
    },
}

#[derive(Args, Debug, Default)]
struct BookFields {
    #[arg(long)]
    isbn: Option<String>,
    #[arg(long)]
    title: Option<String>,
    #[arg(long)]
    sub_title: Option<String>,
    #[arg(long)]
    author: Option<String>,
    #[arg(long)]
    edition: Option<String>,
    #[arg(long)]
    publisher: Option<String>,
    #[arg(long = "year")]
    published_year: Option<i32>,
    #[arg(long = "pages")]
    number_of_pages: Option<u32>,
    #[arg(long)]
    description: Option<String>,
}

impl BookFields {
    /// Overwrite the fields given on the command line
    fn apply(self, form: &mut BookForm) {
        if let Some(isbn) = self.isbn {
            form.isbn = isbn;
        }
        if let Some(title) = self.title {
            form.title = title;
        }
        if let Some(author) = self.author {
            form.author = author;
        }
        if let Some(publisher) = self.publisher {
            form.publisher = publisher;
        }
        form.sub_title = self.sub_title.or(form.sub_title.take());
        form.edition = self.edition.or(form.edition.take());
        form.published_year = self.published_year.or(form.published_year);
        form.number_of_pages = self.number_of_pages.or(form.number_of_pages);
        form.description = self.description.or(form.description.take());
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load environment variables from .env file
    dotenvy::dotenv().ok();

    let cli = Cli::parse();

    let mut config = AppConfig::load_from(&cli.config).context("Failed to load configuration")?;
    if let Some(ref path) = cli.session {
        config.session.path = path.clone();
    }

    // Logs go to stderr so stdout stays clean for tables
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| format!("union_catalog_admin={}", config.logging.level).into());
    let json = config.logging.format.eq_ignore_ascii_case("json");

    tracing_subscriber::registry()
        .with(filter)
        .with(json.then(|| tracing_subscriber::fmt::layer().json().with_writer(io::stderr)))
        .with((!json).then(|| tracing_subscriber::fmt::layer().with_writer(io::stderr)))
        .init();

    tracing::debug!("uc-admin v{} against {}", env!("CARGO_PKG_VERSION"), config.api.base_url);

    let mut session = Session::load(SessionStore::new(config.session.path.clone()));
    let state = AppState::new(config, session.user())?;

    if let Err(e) = run(cli.command, &state, &mut session).await {
        // Operator-facing text; details are already in the log
        eprintln!("Error: {}", user_facing(&e));
        std::process::exit(1);
    }
    Ok(())
}

fn user_facing(e: &anyhow::Error) -> String {
    match e.downcast_ref::<AppError>() {
        Some(app) => app.user_message(),
        None => e.to_string(),
    }
}

async fn run(command: Command, state: &AppState, session: &mut Session) -> anyhow::Result<()> {
    match command {
        Command::Login {
            email,
            password,
            remember_me,
        } => match state.services.auth.login(&email, &password, remember_me).await? {
            LoginOutcome::SignedIn(user) => {
                println!("Signed in as {} ({})", user.email, user.role);
                session.sign_in(user)?;
            }
            LoginOutcome::OtpRequired(pending) => {
                println!("A one-time code was sent to {}. Run `uc-admin verify-otp --code <code>`.", pending.username);
                session.begin_otp(pending)?;
            }
        },
        Command::VerifyOtp { code } => {
            let pending = session
                .pending()
                .cloned()
                .ok_or_else(|| AppError::Authentication("No login is waiting for a code".to_string()))?;
            let user = state.services.auth.verify_otp(&pending, &code).await?;
            println!("Signed in as {} ({})", user.email, user.role);
            session.sign_in(user)?;
        }
        Command::Logout => {
            if session.user().is_some() {
                match state.services.auth.logout().await {
                    Ok(message) => println!("{}", message),
                    Err(e) => tracing::warn!("Backend logout failed: {}", e),
                }
            }
            session.sign_out()?;
        }
        Command::Whoami => match session.user() {
            Some(user) => println!("{} ({})", user.email, user.role),
            None => println!("Not signed in"),
        },
        Command::Registrations(command) => {
            session.require_role(UserRole::SuperAdmin)?;
            registrations(command, state).await?;
        }
        Command::Books(command) => {
            session.require_user()?;
            books(command, state).await?;
        }
    }
    Ok(())
}

async fn registrations(command: RegistrationsCommand, state: &AppState) -> anyhow::Result<()> {
    let screen = state.registrations_screen();

    let (id, action, note) = match command {
        RegistrationsCommand::List {
            page,
            name,
            status,
            email,
        } => {
            screen.search(&name, status, email).await?;
            if page != 1 {
                screen.go_to_page(page).await?;
            }
            println!("{}", registrations_table(&screen.rows(), &screen.page()));
            return Ok(());
        }
        RegistrationsCommand::Approve { id, yes } => {
            screen.load_containing(&id).await?;
            if !yes {
                let dialog = screen.approval_dialog(&id)?;
                let stdin = io::stdin();
                let mut stdout = io::stdout();
                if dialog.ask(&mut stdin.lock(), &mut stdout)? == Decision::Cancel {
                    println!("Cancelled");
                    return Ok(());
                }
                stdout.flush()?;
            }
            (id, RegistrationAction::Approve, None)
        }
        RegistrationsCommand::Decline { id, note } => (id, RegistrationAction::Decline, note),
        RegistrationsCommand::Ban { id, note } => (id, RegistrationAction::Ban, note),
        RegistrationsCommand::Unban { id } => (id, RegistrationAction::Unban, None),
    };

    if action != RegistrationAction::Approve {
        screen.load_containing(&id).await?;
    }

    screen.act(&id, action, note.as_deref()).await?;
    if let Some(message) = screen.current_message() {
        println!("{}", message.text);
    }
    screen.close();
    Ok(())
}

async fn books(command: BooksCommand, state: &AppState) -> anyhow::Result<()> {
    let books = &state.services.books;
    match command {
        BooksCommand::List {
            page,
            title,
            author,
            book_type,
        } => {
            let query = BookQuery {
                page,
                title,
                author,
                book_type,
            };
            println!("{}", books_table(&books.list(&query).await?));
        }
        BooksCommand::Show { id, book_type } => {
            println!("{}", book_details(&books.details(&id, book_type).await?));
        }
        BooksCommand::Add {
            book_type,
            fields,
            cover,
        } => {
            let mut form = BookForm {
                book_type,
                ..Default::default()
            };
            fields.apply(&mut form);
            println!("{}", books.add(form, cover.as_deref()).await?);
        }
        BooksCommand::Update {
            id,
            book_type,
            fields,
            cover,
            remove_cover,
        } => {
            let current = books.details(&id, book_type).await?;
            let mut form = BookForm::from_record(&current);
            form.book_type = book_type;
            form.remove_cover = remove_cover;
            fields.apply(&mut form);
            println!("{}", books.update(&id, form, cover.as_deref()).await?);
        }
        BooksCommand::Delete { id, book_type } => {
            println!("{}", books.delete(&id, book_type).await?);
        }
    }
    Ok(())
}
