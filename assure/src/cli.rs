// assure/src/cli.rs
//
// Single source of truth for all CLI definitions (Clap structs).

use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

use assure_core::domain::assessment::AssessmentKind;
use assure_core::domain::compliance::{AggregationMode, ConsultantDecision};

#[derive(Parser)]
#[command(name = "assure")]
#[command(about = "Tracks compliance assessments of building-safety documents", long_about = None)]
#[command(version)]
pub struct Cli {
    /// Configuration file (default: ./assure.yaml or ./.assure.yaml)
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    Table,
    Json,
}

#[derive(Subcommand)]
pub enum Commands {
    /// 🔑 Stores an API token for the next commands
    Login {
        #[arg(long, env = "ASSURE_TOKEN", hide_env_values = true)]
        token: String,
    },

    /// 🚪 Forgets the stored API token
    Logout,

    /// 🧠 Starts an analysis of a document and follows it to the end
    Analyze {
        document_id: String,

        /// Who produces the verdicts: ai | manual
        #[arg(long, default_value = "ai")]
        kind: AssessmentKind,

        /// Print the assessment id and return immediately
        #[arg(long)]
        no_track: bool,
    },

    /// ⏳ Follows a running analysis until it completes or fails
    Track { assessment_id: String },

    /// 📊 Compliance summary of an assessment
    Summary {
        assessment_id: String,

        /// verdict (dashboards) | weighted (document lists)
        #[arg(long, default_value = "verdict")]
        mode: AggregationMode,

        /// Count questions flagged as not relevant
        #[arg(long)]
        include_non_relevant: bool,

        #[arg(long, value_enum, default_value = "table")]
        format: OutputFormat,
    },

    /// 📁 Documents of a project with their current assessment and score
    Documents {
        project_id: String,

        #[arg(long, default_value = "1")]
        page: u32,

        #[arg(long, default_value = "20")]
        page_size: u32,

        #[arg(long, value_enum, default_value = "table")]
        format: OutputFormat,
    },

    /// 🧑‍⚖️ Records a consultant decision on one AI verdict
    Review {
        assessment_id: String,
        response_id: String,

        /// accept | reject | pending
        decision: ConsultantDecision,

        #[arg(long)]
        notes: Option<String>,
    },

    /// ✍️ Records the overall human sign-off of an assessment
    Signoff {
        assessment_id: String,

        #[arg(long)]
        reviewer: String,

        #[arg(long)]
        approved: bool,

        #[arg(long)]
        notes: Option<String>,
    },

    /// 🏷️ Moves a document to another category
    Categorize {
        document_id: String,

        /// Target category id; omit to clear the category
        #[arg(long)]
        category: Option<String>,
    },

    /// ⬇️ Downloads the original document
    Download {
        document_id: String,

        /// Destination file (default: <document_id>.pdf)
        #[arg(long, short)]
        output: Option<PathBuf>,
    },
}
