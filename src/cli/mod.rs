//! Command-line interface for the gratitude journal.
//!
//! Every command that reads or writes a journal takes `--user`; the password is
//! read from `GRATITUDE_PASSWORD` or prompted for without echo.

use crate::constants;
use crate::journal_core::{parse_date_string, EntryId, Mood};
use chrono::NaiveDate;
use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

/// A gratitude journal with moods, affirmations and weekly reflections
#[derive(Parser, Debug)]
#[clap(name = constants::APP_NAME, about = constants::APP_DESCRIPTION)]
#[clap(author, version, long_about = None)]
pub struct CliArgs {
    /// Print verbose output
    #[clap(short = 'v', long, global = true)]
    pub verbose: bool,

    /// Log output format
    #[clap(
        long,
        global = true,
        default_value = constants::LOG_FORMAT_TEXT,
        value_parser = [constants::LOG_FORMAT_TEXT, constants::LOG_FORMAT_JSON]
    )]
    pub log_format: String,

    #[clap(subcommand)]
    pub command: Command,
}

/// The user a command acts for.
#[derive(Args, Debug, Clone, PartialEq)]
pub struct UserArgs {
    /// Username to log in as
    #[clap(short = 'u', long = "user")]
    pub username: String,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Create the data directory and empty tables
    Init {
        /// Also create the first account (only allowed while no account exists)
        #[clap(long, value_name = "USERNAME")]
        admin: Option<String>,
    },

    /// Register a new user (the password is asked for twice)
    Register {
        /// Username for the new account
        username: String,
    },

    /// Check credentials and show a short summary
    Login(UserArgs),

    /// Write today's entry
    Add(AddArgs),

    /// List your entries
    List(ListArgs),

    /// Change the gratitude or affirmation of an entry
    Edit(EditArgs),

    /// Delete an entry
    Delete {
        #[clap(flatten)]
        user: UserArgs,

        /// Id of the entry to delete (as shown by `list`)
        id: EntryId,
    },

    /// Show mood statistics
    Stats {
        #[clap(flatten)]
        user: UserArgs,

        /// Print statistics as JSON
        #[clap(long)]
        json: bool,
    },

    /// Export your entries as CSV
    Export {
        #[clap(flatten)]
        user: UserArgs,

        /// Output file, or `-` for stdout (defaults to `<user>_journal.csv`)
        #[clap(short = 'o', long)]
        output: Option<PathBuf>,
    },

    /// Write or read a weekly reflection
    Reflect(ReflectArgs),

    /// Print the quote of the day
    Quote {
        /// Date to pick the quote for (format: YYYY-MM-DD or YYYYMMDD)
        #[clap(short = 'd', long, value_parser = parse_date_string)]
        date: Option<NaiveDate>,
    },
}

#[derive(Args, Debug)]
pub struct AddArgs {
    #[clap(flatten)]
    pub user: UserArgs,

    /// How you feel today: happy, okay, sad, angry or tired
    #[clap(short = 'm', long)]
    pub mood: Mood,

    /// Something you're grateful for
    #[clap(short = 'g', long)]
    pub gratitude: String,

    /// A positive affirmation
    #[clap(short = 'a', long)]
    pub affirmation: String,

    /// Image to attach to the entry
    #[clap(short = 'i', long)]
    pub image: Option<PathBuf>,
}

#[derive(Args, Debug)]
pub struct ListArgs {
    #[clap(flatten)]
    pub user: UserArgs,

    /// Only show entries from this date (format: YYYY-MM-DD or YYYYMMDD)
    #[clap(short = 'd', long, value_parser = parse_date_string)]
    pub date: Option<NaiveDate>,

    /// Show the most recent entries first
    #[clap(long)]
    pub newest_first: bool,
}

#[derive(Args, Debug)]
pub struct EditArgs {
    #[clap(flatten)]
    pub user: UserArgs,

    /// Id of the entry to change (as shown by `list`)
    pub id: EntryId,

    /// New gratitude text
    #[clap(short = 'g', long)]
    pub gratitude: Option<String>,

    /// New affirmation
    #[clap(short = 'a', long)]
    pub affirmation: Option<String>,
}

#[derive(Args, Debug)]
pub struct ReflectArgs {
    #[clap(flatten)]
    pub user: UserArgs,

    /// Reflection text to save for today
    #[clap(short = 't', long, conflicts_with_all = ["show", "list"])]
    pub text: Option<String>,

    /// Print the reflection saved on this date (format: YYYY-MM-DD or YYYYMMDD)
    #[clap(long, value_name = "DATE", value_parser = parse_date_string, conflicts_with = "list")]
    pub show: Option<NaiveDate>,

    /// List the dates with a saved reflection
    #[clap(long)]
    pub list: bool,
}

impl CliArgs {
    /// Parse command-line arguments
    pub fn parse() -> Self {
        <CliArgs as Parser>::parse()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Datelike;

    #[test]
    fn test_global_flags() {
        let args = CliArgs::parse_from(vec!["gratitude", "quote"]);
        assert!(!args.verbose);
        assert_eq!(args.log_format, "text");

        let args = CliArgs::parse_from(vec!["gratitude", "--log-format", "json", "-v", "quote"]);
        assert!(args.verbose);
        assert_eq!(args.log_format, "json");

        // Global flags are accepted after the subcommand too
        let args = CliArgs::parse_from(vec!["gratitude", "quote", "--verbose"]);
        assert!(args.verbose);
    }

    #[test]
    fn test_invalid_log_format() {
        let result = CliArgs::try_parse_from(vec!["gratitude", "--log-format", "xml", "quote"]);
        assert!(result.is_err());
    }

    #[test]
    fn test_init_command() {
        let args = CliArgs::parse_from(vec!["gratitude", "init"]);
        assert!(matches!(args.command, Command::Init { admin: None }));

        let args = CliArgs::parse_from(vec!["gratitude", "init", "--admin", "root"]);
        match args.command {
            Command::Init { admin } => assert_eq!(admin.as_deref(), Some("root")),
            other => panic!("Expected init, got {:?}", other),
        }
    }

    #[test]
    fn test_add_command() {
        let args = CliArgs::parse_from(vec![
            "gratitude",
            "add",
            "--user",
            "ana",
            "--mood",
            "happy",
            "-g",
            "sunshine",
            "-a",
            "I am enough",
            "--image",
            "cat.png",
        ]);

        match args.command {
            Command::Add(add) => {
                assert_eq!(add.user.username, "ana");
                assert_eq!(add.mood, Mood::Happy);
                assert_eq!(add.gratitude, "sunshine");
                assert_eq!(add.affirmation, "I am enough");
                assert_eq!(add.image, Some(PathBuf::from("cat.png")));
            }
            other => panic!("Expected add, got {:?}", other),
        }
    }

    #[test]
    fn test_add_rejects_unknown_mood() {
        let result = CliArgs::try_parse_from(vec![
            "gratitude", "add", "-u", "ana", "-m", "ecstatic", "-g", "x", "-a", "y",
        ]);
        assert!(result.is_err());
    }

    #[test]
    fn test_list_date_option() {
        let args = CliArgs::parse_from(vec!["gratitude", "list", "-u", "ana", "-d", "20240103"]);
        match args.command {
            Command::List(list) => {
                let date = list.date.unwrap();
                assert_eq!((date.year(), date.month(), date.day()), (2024, 1, 3));
                assert!(!list.newest_first);
            }
            other => panic!("Expected list, got {:?}", other),
        }

        let result =
            CliArgs::try_parse_from(vec!["gratitude", "list", "-u", "ana", "-d", "yesterday"]);
        assert!(result.is_err());
    }

    #[test]
    fn test_edit_and_delete_take_entry_ids() {
        let id = EntryId::new();
        let id_str = id.to_string();
        let id_str = id_str.as_str();

        let args = CliArgs::parse_from(vec![
            "gratitude",
            "edit",
            "-u",
            "ana",
            id_str,
            "--affirmation",
            "I rest",
        ]);
        match args.command {
            Command::Edit(edit) => {
                assert_eq!(edit.id, id);
                assert_eq!(edit.gratitude, None);
                assert_eq!(edit.affirmation.as_deref(), Some("I rest"));
            }
            other => panic!("Expected edit, got {:?}", other),
        }

        let args = CliArgs::parse_from(vec!["gratitude", "delete", "-u", "ana", id_str]);
        assert!(matches!(args.command, Command::Delete { id: parsed, .. } if parsed == id));

        let result = CliArgs::try_parse_from(vec!["gratitude", "delete", "-u", "ana", "3"]);
        assert!(result.is_err());
    }

    #[test]
    fn test_user_is_required() {
        assert!(CliArgs::try_parse_from(vec!["gratitude", "stats"]).is_err());
        assert!(CliArgs::try_parse_from(vec!["gratitude", "login"]).is_err());
    }

    #[test]
    fn test_reflect_modes_conflict() {
        let args = CliArgs::parse_from(vec!["gratitude", "reflect", "-u", "ana", "--list"]);
        match args.command {
            Command::Reflect(reflect) => {
                assert!(reflect.list);
                assert!(reflect.text.is_none());
                assert!(reflect.show.is_none());
            }
            other => panic!("Expected reflect, got {:?}", other),
        }

        let result = CliArgs::try_parse_from(vec![
            "gratitude",
            "reflect",
            "-u",
            "ana",
            "--text",
            "calm week",
            "--list",
        ]);
        assert!(result.is_err());
    }
}
