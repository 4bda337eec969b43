mod annotate;
mod classifier;
mod cli;
mod dates;
mod db;
mod dedup;
mod error;
mod extraction;
mod fingerprint;
mod fmt;
mod ingest;
mod models;
mod passwords;
mod pdf;
mod reports;
mod settings;
mod store;

use clap::Parser;
use tracing_subscriber::EnvFilter;

use cli::{
    AnnotateCommands, BanksCommands, CardsCommands, Cli, ClassificationsCommands, Commands,
    MemoryCommands, PeopleCommands, ReportCommands, RulesCommands,
};

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Init { data_dir } => cli::init::run(data_dir),
        Commands::Upload { file, password } => cli::upload::run(&file, password),
        Commands::Ingest { file } => cli::ingest::run(&file),
        Commands::Classify => cli::classify::run(),
        Commands::Annotate { command } => match command {
            AnnotateCommands::Classify { transaction, classification } => {
                cli::annotate::classify(&transaction, &classification)
            }
            AnnotateCommands::Meaning { transaction, text } => {
                cli::annotate::meaning(&transaction, &text)
            }
            AnnotateCommands::Skip { transaction, reason } => {
                cli::annotate::skip(&transaction, &reason)
            }
        },
        Commands::Banks { command } => match command {
            BanksCommands::Add { name } => cli::banks::add(&name),
            BanksCommands::List => cli::banks::list(),
            BanksCommands::Delete { id } => cli::banks::delete(&id),
        },
        Commands::People { command } => match command {
            PeopleCommands::Add { name, person_type } => cli::people::add(&name, &person_type),
            PeopleCommands::List => cli::people::list(),
            PeopleCommands::Update { id, name, person_type } => {
                cli::people::update(&id, name.as_deref(), person_type.as_deref())
            }
            PeopleCommands::Delete { id } => cli::people::delete(&id),
            PeopleCommands::SetPrimary { id } => cli::people::set_primary(&id),
        },
        Commands::Cards { command } => match command {
            CardsCommands::Add { name, holder, bank, suffix } => {
                cli::cards::add(&name, &holder, &bank, &suffix)
            }
            CardsCommands::List => cli::cards::list(),
            CardsCommands::Update { id, name, holder, suffix } => {
                cli::cards::update(&id, name.as_deref(), holder.as_deref(), suffix.as_deref())
            }
            CardsCommands::Delete { id } => cli::cards::delete(&id),
        },
        Commands::Classifications { command } => match command {
            ClassificationsCommands::Add { label, emoji } => {
                cli::classifications::add(&label, &emoji)
            }
            ClassificationsCommands::List => cli::classifications::list(),
        },
        Commands::Rules { command } => match command {
            RulesCommands::Add { includes, day, value, logic, classification, meaning } => {
                cli::rules::add(
                    &includes,
                    &day,
                    &value,
                    &logic,
                    classification.as_deref(),
                    meaning.as_deref(),
                )
            }
            RulesCommands::List => cli::rules::list(),
            RulesCommands::Update { id, classification, meaning } => {
                cli::rules::update(&id, classification.as_deref(), meaning.as_deref())
            }
            RulesCommands::Delete { id } => cli::rules::delete(&id),
        },
        Commands::Memory { command } => match command {
            MemoryCommands::Add { includes, classification, meaning } => {
                cli::memory::add(&includes, classification.as_deref(), meaning.as_deref())
            }
            MemoryCommands::List => cli::memory::list(),
            MemoryCommands::Update { id, includes, classification, meaning } => cli::memory::update(
                &id,
                includes.as_deref(),
                classification.as_deref(),
                meaning.as_deref(),
            ),
            MemoryCommands::Delete { id } => cli::memory::delete(&id),
        },
        Commands::Report { command } => match command {
            ReportCommands::Monthly { year } => cli::report::monthly(year),
            ReportCommands::Banks => cli::report::banks(),
            ReportCommands::Extracts { bank } => cli::report::extracts(bank.as_deref()),
        },
        Commands::Status => cli::status::run(),
    };

    if let Err(e) = result {
        eprintln!("Error: {e}");
        std::process::exit(1);
    }
}
