use agentdeck_core::{BackendKind, ResourceType};
use clap::{Parser, Subcommand};
use clap_complete::Shell;

use crate::output::OutputFormat;

#[derive(Parser)]
#[command(name = "agentdeck")]
#[command(version, about = "AgentDeck - manage AI agent configuration documents")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Database path (defaults to ~/.agentdeck/agentdeck.db)
    #[arg(long, global = true, env = "AGENTDECK_DB_PATH")]
    pub db_path: Option<String>,

    /// Persistence backend: snapshot, table or memory
    #[arg(long, global = true)]
    pub backend: Option<BackendKind>,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Output format
    #[arg(long, global = true, default_value = "text")]
    pub format: OutputFormat,
}

#[derive(Subcommand)]
pub enum Commands {
    /// List resources, most recently updated first
    List {
        /// Only show one resource type
        #[arg(long = "type", value_name = "TYPE")]
        kind: Option<ResourceType>,

        /// Case-insensitive match against name or content
        #[arg(long)]
        search: Option<String>,
    },

    /// Show one resource with its content
    Show { id: String },

    /// Create a resource with starter content
    Create {
        /// agents, subagents, skills, mcp_servers, hooks or system_prompts
        #[arg(value_name = "TYPE")]
        kind: ResourceType,
        name: String,
    },

    /// Rename a resource or replace its content
    Update {
        id: String,

        #[arg(long)]
        name: Option<String>,

        #[arg(long, conflicts_with = "file")]
        content: Option<String>,

        /// Read content from a file
        #[arg(long)]
        file: Option<String>,
    },

    /// Delete a resource
    Delete { id: String },

    /// Show resource counts per folder
    Folders {
        #[arg(long)]
        search: Option<String>,
    },

    /// Generate shell completions
    Completions {
        #[arg(value_enum)]
        shell: Shell,
    },
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_create_with_global_flags() {
        let cli = Cli::try_parse_from([
            "agentdeck",
            "create",
            "mcp_servers",
            "GitHub",
            "--backend",
            "table",
            "--format",
            "json",
        ])
        .unwrap();
        assert_eq!(cli.backend, Some(BackendKind::Table));
        assert!(cli.format.is_json());
        match cli.command {
            Commands::Create { kind, name } => {
                assert_eq!(kind, ResourceType::McpServers);
                assert_eq!(name, "GitHub");
            }
            _ => panic!("expected create"),
        }
    }

    #[test]
    fn test_update_rejects_content_and_file_together() {
        let result = Cli::try_parse_from([
            "agentdeck", "update", "r-1", "--content", "x", "--file", "y.md",
        ]);
        assert!(result.is_err());
    }

    #[test]
    fn test_unknown_resource_type_is_rejected() {
        assert!(Cli::try_parse_from(["agentdeck", "create", "tools", "X"]).is_err());
    }
}
