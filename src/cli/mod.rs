pub mod annotate;
pub mod banks;
pub mod cards;
pub mod classifications;
pub mod classify;
pub mod ingest;
pub mod init;
pub mod memory;
pub mod people;
pub mod report;
pub mod rules;
pub mod status;
pub mod upload;

use clap::{Parser, Subcommand};

#[derive(Parser)]
#[command(name = "extrato", about = "Personal finance tracker: bank statement PDFs in, classified transactions out.")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Set up extrato: choose a data directory and initialize the database.
    Init {
        /// Path for extrato data (default: ~/Documents/extrato)
        #[arg(long = "data-dir")]
        data_dir: Option<String>,
    },
    /// Upload a statement PDF: decrypt if needed, extract, deduplicate, store.
    Upload {
        /// Path to the statement PDF
        file: String,
        /// Password for a protected statement (prompted if needed)
        #[arg(long)]
        password: Option<String>,
    },
    /// Ingest an already-extracted result from a JSON file.
    Ingest {
        /// Path to an ExtractResult JSON document
        file: String,
    },
    /// Re-run classification rules on unclassified transactions.
    Classify,
    /// Annotate a stored transaction.
    Annotate {
        #[command(subcommand)]
        command: AnnotateCommands,
    },
    /// Manage banks.
    Banks {
        #[command(subcommand)]
        command: BanksCommands,
    },
    /// Manage household members.
    People {
        #[command(subcommand)]
        command: PeopleCommands,
    },
    /// Manage cards.
    Cards {
        #[command(subcommand)]
        command: CardsCommands,
    },
    /// Manage classification tags.
    Classifications {
        #[command(subcommand)]
        command: ClassificationsCommands,
    },
    /// Manage classification rules.
    Rules {
        #[command(subcommand)]
        command: RulesCommands,
    },
    /// Manage memory rules (simple substring matchers).
    Memory {
        #[command(subcommand)]
        command: MemoryCommands,
    },
    /// Browse stored data.
    Report {
        #[command(subcommand)]
        command: ReportCommands,
    },
    /// Show current database and summary statistics.
    Status,
}

#[derive(Subcommand)]
pub enum AnnotateCommands {
    /// Set a transaction's classification (un-skips if skipped).
    Classify {
        /// Transaction ID (shown in `extrato report extracts`)
        transaction: String,
        /// Classification ID
        #[arg(long)]
        classification: String,
    },
    /// Set or clear a transaction's free-text meaning.
    Meaning {
        /// Transaction ID
        transaction: String,
        /// Meaning text; an empty string clears it
        text: String,
    },
    /// Skip a transaction, clearing any classification.
    Skip {
        /// Transaction ID
        transaction: String,
        /// Why this transaction is skipped
        #[arg(long)]
        reason: String,
    },
}

#[derive(Subcommand)]
pub enum BanksCommands {
    /// Register a bank.
    Add {
        /// Bank name, e.g. 'Nubank'
        name: String,
    },
    /// List all banks.
    List,
    /// Delete a bank and all its extracts.
    Delete {
        /// Bank ID (shown in `extrato banks list`)
        id: String,
    },
}

#[derive(Subcommand)]
pub enum PeopleCommands {
    /// Add a household member.
    Add {
        /// Person name
        name: String,
        /// Person type: Principal, Dependente, Externo
        #[arg(long = "type", default_value = "Dependente")]
        person_type: String,
    },
    /// List all people.
    List,
    /// Update a person.
    Update {
        /// Person ID (shown in `extrato people list`)
        id: String,
        /// New name
        #[arg(long)]
        name: Option<String>,
        /// New type: Principal, Dependente, Externo
        #[arg(long = "type")]
        person_type: Option<String>,
    },
    /// Delete a person (rejected while cards reference them).
    Delete {
        /// Person ID
        id: String,
    },
    /// Mark the primary person for the household.
    SetPrimary {
        /// Person ID
        id: String,
    },
}

#[derive(Subcommand)]
pub enum CardsCommands {
    /// Register a card.
    Add {
        /// Card name, e.g. 'Roxinho'
        name: String,
        /// Holder person ID
        #[arg(long)]
        holder: String,
        /// Bank ID
        #[arg(long)]
        bank: String,
        /// Last digits printed on statements
        #[arg(long)]
        suffix: String,
    },
    /// List all cards.
    List,
    /// Update a card.
    Update {
        /// Card ID (shown in `extrato cards list`)
        id: String,
        /// New name
        #[arg(long)]
        name: Option<String>,
        /// New holder person ID
        #[arg(long)]
        holder: Option<String>,
        /// New suffix
        #[arg(long)]
        suffix: Option<String>,
    },
    /// Delete a card.
    Delete {
        /// Card ID
        id: String,
    },
}

#[derive(Subcommand)]
pub enum ClassificationsCommands {
    /// Add a classification tag.
    Add {
        /// Tag label, e.g. 'Mercado'
        label: String,
        /// Tag emoji
        #[arg(long)]
        emoji: String,
    },
    /// List all classification tags.
    List,
}

#[derive(Subcommand)]
pub enum RulesCommands {
    /// Add a classification rule from one or more conditions.
    Add {
        /// Substring the description must include (repeatable)
        #[arg(long)]
        includes: Vec<String>,
        /// Day of month the statement date must carry (repeatable)
        #[arg(long)]
        day: Vec<u32>,
        /// Amount the transaction must match, within a centavo (repeatable)
        #[arg(long)]
        value: Vec<f64>,
        /// How conditions combine: and, or
        #[arg(long, default_value = "and")]
        logic: String,
        /// Classification ID to assign on match
        #[arg(long)]
        classification: Option<String>,
        /// Meaning text to assign on match
        #[arg(long)]
        meaning: Option<String>,
    },
    /// List all rules in match order.
    List,
    /// Update a rule's assignment.
    Update {
        /// Rule ID (shown in `extrato rules list`)
        id: String,
        /// New classification ID
        #[arg(long)]
        classification: Option<String>,
        /// New meaning text
        #[arg(long)]
        meaning: Option<String>,
    },
    /// Delete a rule by ID.
    Delete {
        /// Rule ID
        id: String,
    },
}

#[derive(Subcommand)]
pub enum MemoryCommands {
    /// Add a memory rule.
    Add {
        /// Substring the description must include
        includes: String,
        /// Classification ID to assign on match
        #[arg(long)]
        classification: Option<String>,
        /// Meaning text to assign on match
        #[arg(long)]
        meaning: Option<String>,
    },
    /// List all memory rules in match order.
    List,
    /// Update a memory rule.
    Update {
        /// Memory rule ID (shown in `extrato memory list`)
        id: String,
        /// New substring
        #[arg(long)]
        includes: Option<String>,
        /// New classification ID
        #[arg(long)]
        classification: Option<String>,
        /// New meaning text
        #[arg(long)]
        meaning: Option<String>,
    },
    /// Delete a memory rule by ID.
    Delete {
        /// Memory rule ID
        id: String,
    },
}

#[derive(Subcommand)]
pub enum ReportCommands {
    /// Month-by-month inflow/outflow totals.
    Monthly {
        /// Year filter: YYYY
        #[arg(long)]
        year: Option<i32>,
    },
    /// Per-bank extract and classification tallies.
    Banks,
    /// List stored extracts and their transactions.
    Extracts {
        /// Filter by bank ID
        #[arg(long)]
        bank: Option<String>,
    },
}
