use crate::commands::Command;
use crate::tracing::LogLevel;
use chlog_core::storage::DEFAULT_CHANGE_DIR;
use chlog_core::{BumpType, ChangeEntry, Query, Version};
use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "chlog")]
#[command(about = "Record changes as they land and consolidate them into versioned releases")]
#[command(long_about = None)]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    #[arg(
        long,
        global = true,
        env = "CHLOG_CHANGE_DIR",
        default_value = DEFAULT_CHANGE_DIR,
        help = "Location of the change directory"
    )]
    pub change_dir: PathBuf,

    #[arg(
        short = 'l',
        long,
        global = true,
        help = "Set logging level",
        default_value = "warn",
        value_enum
    )]
    pub level: LogLevel,

    #[arg(long, global = true, help = "Output logs in JSON format")]
    pub json: bool,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    #[command(about = "Create the change directory")]
    Init,

    #[command(about = "Record a change for the next release")]
    NewChange {
        #[arg(short = 't', long = "type", help = "Type of change (e.g. feature, bugfix)")]
        kind: Option<String>,
        #[arg(short = 'c', long, help = "High level feature area")]
        category: Option<String>,
        #[arg(short = 'd', long, help = "Description of the change")]
        description: Option<String>,
    },

    #[command(about = "Consolidate pending changes into a new release")]
    NewRelease {
        #[arg(
            short = 'r',
            long,
            value_enum,
            help = "Bump the last release by this instead of the derived bump type"
        )]
        release_type: Option<ReleaseType>,
        #[arg(
            long,
            value_parser = parse_version,
            help = "Release under exactly this version instead of computing one"
        )]
        release_version: Option<Version>,
        #[arg(short = 'd', long, help = "Release notes stored with the release")]
        description: Option<String>,
    },

    #[command(about = "Render every release into a changelog")]
    Render {
        #[arg(short = 't', long, help = "Name of a template in the templates directory")]
        template: Option<String>,
    },

    #[command(about = "Answer a question about pending and released changes")]
    Query {
        #[arg(value_enum)]
        query: QueryName,
    },

    #[command(about = "Show the changes staged for the next release")]
    Pending,
}

/// Bump type requested on the command line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum ReleaseType {
    /// Bump the patch number
    Patch,
    /// Bump the minor number
    Minor,
    /// Bump the major number
    Major,
}

impl From<ReleaseType> for BumpType {
    fn from(release_type: ReleaseType) -> Self {
        match release_type {
            ReleaseType::Patch => Self::Patch,
            ReleaseType::Minor => Self::Minor,
            ReleaseType::Major => Self::Major,
        }
    }
}

/// Query names accepted on the command line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum QueryName {
    /// patch or minor, derived from the pending changes
    NextReleaseType,
    /// The version the pending changes would be released as
    NextVersion,
    /// The highest released version
    LastReleaseVersion,
}

impl From<QueryName> for Query {
    fn from(name: QueryName) -> Self {
        match name {
            QueryName::NextReleaseType => Self::NextReleaseType,
            QueryName::NextVersion => Self::NextVersion,
            QueryName::LastReleaseVersion => Self::LastReleaseVersion,
        }
    }
}

fn parse_version(value: &str) -> Result<Version, String> {
    value.parse().map_err(|e: chlog_core::Error| e.to_string())
}

impl From<Commands> for Command {
    fn from(cmd: Commands) -> Self {
        match cmd {
            Commands::Init => Self::Init,
            Commands::NewChange {
                kind,
                category,
                description,
            } => Self::NewChange {
                entry: ChangeEntry::new(
                    kind.unwrap_or_default(),
                    category.unwrap_or_default(),
                    description.unwrap_or_default(),
                ),
            },
            Commands::NewRelease {
                release_type,
                release_version,
                description,
            } => Self::NewRelease {
                version: release_version,
                bump: release_type.map(BumpType::from),
                summary: description,
            },
            Commands::Render { template } => Self::Render { template },
            Commands::Query { query } => Self::Query {
                query: query.into(),
            },
            Commands::Pending => Self::Pending,
        }
    }
}

pub fn parse() -> Cli {
    Cli::parse()
}
