//! `user-store` CLI: one store operation per invocation, status lines on
//! stdout, errors on stderr with a nonzero exit code.

use std::process::ExitCode;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use user_store::{Criteria, DeleteOutcome, Error, NewUser, Store, StoreConfig};

#[derive(Parser)]
#[command(name = "user-store", version, about = "SQLite-backed user record store")]
struct Cli {
    /// Path to the SQLite database file (created if missing).
    #[arg(long, global = true, default_value = "users.db")]
    db: String,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Create the database file and users table if they do not exist.
    Init,
    /// Insert a record and print its generated id.
    Insert {
        #[arg(long)]
        name: String,
        #[arg(long)]
        email: String,
        #[arg(long)]
        age: i64,
    },
    /// List all records.
    List,
    /// Set name and age for an existing id; email is left untouched.
    Update {
        id: i64,
        #[arg(long)]
        name: String,
        #[arg(long)]
        age: i64,
    },
    /// Delete records matching the given criteria. Omitted flags are
    /// excluded from the filter; at least one must be provided.
    Delete {
        #[arg(long)]
        id: Option<i64>,
        #[arg(long)]
        name: Option<String>,
        #[arg(long)]
        email: Option<String>,
        #[arg(long)]
        age: Option<i64>,
    },
}

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(Error::EmptyCriteria) => {
            eprintln!("At least one valid condition must be provided to delete records.");
            ExitCode::from(2)
        }
        Err(err) => {
            eprintln!("error: {err}");
            ExitCode::FAILURE
        }
    }
}

fn run(cli: Cli) -> Result<(), Error> {
    let store = Store::open(StoreConfig::new(&cli.db))?;
    store.ensure_schema()?;

    match cli.command {
        Command::Init => {
            match store.database_path()? {
                Some(path) => println!("Currently connected to database: {path}"),
                None => println!("No database file backs this connection."),
            }
            println!("Table '{}' created or already exists.", store.table());
        }
        Command::Insert { name, email, age } => {
            let id = store.insert(&NewUser { name, email, age })?;
            println!("User created with ID: {id}");
        }
        Command::List => {
            for user in store.read_all()? {
                println!(
                    "ID: {}, Name: {}, Email: {}, Age: {}",
                    user.id, user.name, user.email, user.age
                );
            }
        }
        Command::Update { id, name, age } => {
            let rows = store.update(id, &name, age)?;
            if rows == 0 {
                println!("No user found with ID {id}.");
            } else {
                println!("User updated.");
            }
        }
        Command::Delete {
            id,
            name,
            email,
            age,
        } => {
            // Fixed field order keeps clause order predictable.
            let criteria = Criteria::new()
                .with("id", id)
                .with("name", name)
                .with("email", email)
                .with("age", age);
            match store.delete_by(&criteria)? {
                DeleteOutcome::Deleted { rows, conditions } => {
                    println!("Deleted {rows} record(s) where {conditions}.");
                }
                DeleteOutcome::NoMatch { conditions } => {
                    println!("No matching records found with the given conditions: {conditions}.");
                }
            }
        }
    }
    Ok(())
}
