/*!
# Gratitude - A Gratitude Journal

Gratitude is a command-line journal for daily gratitude, affirmations and moods.
Entries are kept per user in flat CSV tables, with optional image attachments
and free-text weekly reflections.

This file contains the main application flow: it sets up logging, loads the
configuration, logs the user in and dispatches to the journal operations.

## Usage

```
gratitude [OPTIONS] <COMMAND>

Commands:
  init      Create the data directory and empty tables
  register  Register a new user (the password is asked for twice)
  login     Check credentials and show a short summary
  add       Write today's entry
  list      List your entries
  edit      Change the gratitude or affirmation of an entry
  delete    Delete an entry
  stats     Show mood statistics
  export    Export your entries as CSV
  reflect   Write or read a weekly reflection
  quote     Print the quote of the day

Options:
  -v, --verbose                  Print verbose output
      --log-format <LOG_FORMAT>  Log output format [default: text] [possible values: text, json]
```

## Configuration

- `GRATITUDE_DIR`: The data directory (defaults to "~/.local/share/gratitude")
- `GRATITUDE_PASSWORD`: Password for non-interactive use (otherwise prompted)
- `GRATITUDE_SESSION_TIMEOUT`: Session idle timeout in minutes
- `RUST_LOG`: Log filter (overrides `--verbose`)
*/

use chrono::{Local, NaiveDate};
use gratitude::cli::{AddArgs, CliArgs, Command, EditArgs, ListArgs, ReflectArgs, UserArgs};
use gratitude::config::Config;
use gratitude::constants;
use gratitude::crypto::{prompt_password, Session};
use gratitude::errors::{AppError, AppResult};
use gratitude::journal_core::quote_of_the_day;
use gratitude::ops::{self, ImageUpload, NewEntryRequest};
use gratitude::store::attachments::AttachmentStore;
use gratitude::store::entries::{EntryUpdate, JournalEntry};
use gratitude::store::users::CredentialStore;
use std::fs;
use std::io::{self, Write};
use std::path::Path;
use tracing::{debug, error, info, info_span};
use tracing_subscriber::EnvFilter;

/// The main entry point for the gratitude application.
///
/// This function coordinates the overall application flow:
/// 1. Parses command-line arguments
/// 2. Initializes logging
/// 3. Runs the requested command
/// 4. Reports any error on stderr and exits non-zero
fn main() {
    let args = CliArgs::parse();
    init_tracing(args.verbose, &args.log_format);

    let correlation_id = uuid::Uuid::new_v4().to_string();
    let root_span = info_span!(
        constants::TRACING_ROOT_SPAN_NAME,
        correlation_id = %correlation_id
    );
    let _enter = root_span.enter();

    // Obtain the current date once at the beginning
    let today = Local::now().naive_local().date();

    if let Err(e) = run(args.command, today) {
        error!("Command failed: {}", e);
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

fn init_tracing(verbose: bool, log_format: &str) {
    let default_level = if verbose {
        "debug"
    } else {
        constants::DEFAULT_LOG_LEVEL
    };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    let subscriber = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .with_target(false);

    let result = if log_format == constants::LOG_FORMAT_JSON {
        subscriber.json().try_init()
    } else {
        subscriber.try_init()
    };

    if let Err(e) = result {
        eprintln!("Failed to initialize logging: {}", e);
    }
}

fn run(command: Command, today: NaiveDate) -> AppResult<()> {
    info!("Loading configuration");
    let config = Config::load()?;
    config.validate()?;
    debug!("Configuration loaded: {:?}", config);

    match command {
        Command::Init { admin } => init(&config, admin.as_deref()),
        Command::Register { username } => register(&config, &username),
        Command::Login(user) => login(&config, &user, today),
        Command::Add(add) => add_entry(&config, add, today),
        Command::List(args) => list(&config, &args),
        Command::Edit(args) => edit(&config, args),
        Command::Delete { user, id } => {
            let mut session = open_session(&config, &user)?;
            let removed = ops::delete_entry(&config, &mut session, id)?;
            println!("Deleted entry {} from {}", removed.id, removed.date);
            Ok(())
        }
        Command::Stats { user, json } => stats(&config, &user, json, today),
        Command::Export { user, output } => export(&config, &user, output.as_deref()),
        Command::Reflect(reflect) => reflection(&config, &reflect, today),
        Command::Quote { date } => {
            println!("{}", quote_of_the_day(date.unwrap_or(today)));
            Ok(())
        }
    }
}

fn open_session(config: &Config, user: &UserArgs) -> AppResult<Session> {
    let users = CredentialStore::new(&config.users_file);
    let password = prompt_password(&format!("Password for {}: ", user.username), false)?;

    let mut session = Session::new(config.session_timeout_minutes);
    session.login(&users, &user.username, &password)?;
    Ok(session)
}

fn init(config: &Config, admin: Option<&str>) -> AppResult<()> {
    ops::initialize_storage(config)?;
    println!("Journal ready in {}", config.data_dir.display());

    if let Some(admin) = admin {
        let password = prompt_password(&format!("Password for {}: ", admin), true)?;
        CredentialStore::new(&config.users_file).bootstrap_admin(admin, &password)?;
        println!("Created account '{}'", admin);
    }
    Ok(())
}

fn register(config: &Config, username: &str) -> AppResult<()> {
    let users = CredentialStore::new(&config.users_file);
    let password = prompt_password("Password: ", false)?;
    let confirmation = prompt_password("Confirm password: ", false)?;

    ops::sign_up(&users, username, &password, &confirmation)?;
    println!("Account created. You can now log in as '{}'", username);
    Ok(())
}

fn login(config: &Config, user: &UserArgs, today: NaiveDate) -> AppResult<()> {
    let mut session = open_session(config, user)?;
    let dashboard = ops::dashboard(config, &mut session, today)?;

    println!("Welcome, {}!", user.username);
    println!(
        "You have written {} gratitude entries so far.",
        dashboard.summary.total_entries
    );
    if !dashboard.summary.wrote_today {
        println!("You haven't written today's entry yet.");
    }
    println!("\n{}", dashboard.quote);
    Ok(())
}

fn add_entry(config: &Config, add: AddArgs, today: NaiveDate) -> AppResult<()> {
    let mut session = open_session(config, &add.user)?;
    let image = add.image.as_deref().map(read_image).transpose()?;

    let entry = ops::save_entry(
        config,
        &mut session,
        NewEntryRequest {
            mood: add.mood,
            gratitude: add.gratitude,
            affirmation: add.affirmation,
            image,
        },
        today,
    )?;

    println!("Saved entry {} for {}", entry.id, entry.date);
    Ok(())
}

fn read_image(path: &Path) -> AppResult<ImageUpload> {
    let filename = path
        .file_name()
        .and_then(|name| name.to_str())
        .ok_or_else(|| {
            AppError::Validation(format!("Not a usable image file name: {}", path.display()))
        })?
        .to_string();
    let bytes = fs::read(path)?;
    Ok(ImageUpload { filename, bytes })
}

fn list(config: &Config, list: &ListArgs) -> AppResult<()> {
    let mut session = open_session(config, &list.user)?;
    let mut entries = ops::list_entries(config, &mut session, list.date)?;
    if list.newest_first {
        entries.reverse();
    }

    if entries.is_empty() {
        println!("No entries yet. Start by writing one!");
        return Ok(());
    }

    let attachments = AttachmentStore::new(&config.uploads_dir);
    for entry in &entries {
        print_entry(entry, &attachments);
    }
    Ok(())
}

fn print_entry(entry: &JournalEntry, attachments: &AttachmentStore) {
    println!("{}  {}  {}", entry.date, entry.mood, entry.id);
    println!("  Grateful for: {}", entry.gratitude);
    println!("  Affirmation: {}", entry.affirmation);
    if let Some(name) = &entry.image_name {
        match attachments.resolve(name) {
            Some(path) => println!("  Image: {}", path.display()),
            None => println!("  Image: {} (missing)", name),
        }
    }
    println!();
}

fn edit(config: &Config, edit: EditArgs) -> AppResult<()> {
    let mut session = open_session(config, &edit.user)?;
    let update = EntryUpdate {
        gratitude: edit.gratitude,
        affirmation: edit.affirmation,
    };

    let entry = ops::edit_entry(config, &mut session, edit.id, update)?;
    println!("Updated entry {} from {}", entry.id, entry.date);
    Ok(())
}

fn stats(config: &Config, user: &UserArgs, json: bool, today: NaiveDate) -> AppResult<()> {
    let mut session = open_session(config, user)?;
    let dashboard = ops::dashboard(config, &mut session, today)?;

    if json {
        let rendered = serde_json::to_string_pretty(&dashboard)
            .map_err(|e| AppError::Validation(format!("Failed to render statistics: {}", e)))?;
        println!("{}", rendered);
        return Ok(());
    }

    println!("Total entries: {}", dashboard.summary.total_entries);
    if dashboard.distribution.is_empty() {
        println!("No moods recorded yet.");
        return Ok(());
    }

    println!("\nMood distribution:");
    for (mood, count) in &dashboard.distribution {
        println!("  {:<10} {}", mood, count);
    }

    println!("\nWeekly mood trend:");
    for row in &dashboard.trend {
        println!("  {}  {:<10} {}", row.week, row.mood, row.count);
    }
    Ok(())
}

fn export(config: &Config, user: &UserArgs, output: Option<&Path>) -> AppResult<()> {
    let mut session = open_session(config, user)?;
    let csv = ops::export_journal(config, &mut session)?;

    match output {
        Some(path) if path == Path::new("-") => {
            io::stdout().write_all(csv.as_bytes())?;
        }
        Some(path) => {
            fs::write(path, &csv)?;
            println!("Exported to {}", path.display());
        }
        None => {
            let path = ops::export_file_name(&user.username);
            fs::write(&path, &csv)?;
            println!("Exported to {}", path);
        }
    }
    Ok(())
}

fn reflection(config: &Config, reflect: &ReflectArgs, today: NaiveDate) -> AppResult<()> {
    let mut session = open_session(config, &reflect.user)?;

    if let Some(text) = &reflect.text {
        ops::save_reflection(config, &mut session, today, text)?;
        println!("Reflection saved for {}", today);
        return Ok(());
    }

    if reflect.list {
        let dates = ops::list_reflections(config, &mut session)?;
        if dates.is_empty() {
            println!("No reflections yet.");
        }
        for date in dates {
            println!("{}", date);
        }
        return Ok(());
    }

    let date = reflect.show.unwrap_or(today);
    match ops::read_reflection(config, &mut session, date)? {
        Some(text) => println!("{}", text),
        None => println!("No reflection saved for {}", date),
    }
    Ok(())
}
