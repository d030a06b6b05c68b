//! CLI argument definitions using clap

use clap::{ArgAction, Args, Parser, Subcommand};
use gradient_core::CreateHyperparameter;

/// Manage Gradient clusters and hyperparameter tuning jobs
#[derive(Parser, Debug)]
#[command(name = "gradient")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// API key to use for this invocation instead of the configured one
    #[arg(long = "apiKey", global = true, value_name = "KEY")]
    pub api_key: Option<String>,

    /// Increase log verbosity on stderr (-d, -dd, -ddd)
    #[arg(short, long, action = ArgAction::Count, global = true)]
    pub debug: u8,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Manage clusters
    Clusters {
        #[command(subcommand)]
        command: ClustersCommands,
    },

    /// Manage hyperparameter tuning jobs
    Hyperparameters {
        #[command(subcommand)]
        command: HyperparametersCommands,
    },
}

#[derive(Subcommand, Debug)]
pub enum ClustersCommands {
    /// List private clusters
    List {
        /// Maximum number of clusters to return
        #[arg(long, default_value_t = 20)]
        limit: u32,
        /// Number of clusters to skip
        #[arg(long, default_value_t = 0)]
        offset: u32,
    },

    /// Show a single cluster
    Get {
        /// Cluster ID
        #[arg(long)]
        id: String,
    },
}

#[derive(Subcommand, Debug)]
pub enum HyperparametersCommands {
    /// Create a hyperparameter tuning job
    Create(CreateArgs),

    /// List hyperparameter tuning jobs
    List,

    /// Show a hyperparameter tuning job
    Details {
        /// Tuning job ID
        #[arg(long)]
        id: String,
    },

    /// Start a hyperparameter tuning job
    Start {
        /// Tuning job ID
        #[arg(long)]
        id: String,
    },
}

#[derive(Args, Debug, Clone)]
pub struct CreateArgs {
    /// Job name
    #[arg(long)]
    pub name: String,

    /// Project ID
    #[arg(long = "projectId")]
    pub project_id: String,

    /// Tuning command
    #[arg(long = "tuningCommand")]
    pub tuning_command: String,

    /// Worker container image
    #[arg(long = "workerContainer")]
    pub worker_container: String,

    /// Worker machine type
    #[arg(long = "workerMachineType")]
    pub worker_machine_type: String,

    /// Worker command
    #[arg(long = "workerCommand")]
    pub worker_command: String,

    /// Number of workers
    #[arg(long = "workerCount")]
    pub worker_count: u32,

    /// User to run the worker container as
    #[arg(long = "workerContainerUser")]
    pub worker_container_user: Option<String>,

    /// Worker registry username
    #[arg(long = "workerRegistryUsername")]
    pub worker_registry_username: Option<String>,

    /// Worker registry password
    #[arg(long = "workerRegistryPassword")]
    pub worker_registry_password: Option<String>,

    /// Hyperparameter server registry username
    #[arg(long = "serverRegistryUsername")]
    pub server_registry_username: Option<String>,

    /// Hyperparameter server registry password
    #[arg(long = "serverRegistryPassword")]
    pub server_registry_password: Option<String>,

    /// User to run the hyperparameter server container as
    #[arg(long = "serverContainerUser")]
    pub server_container_user: Option<String>,

    /// Run workers on preemptible machines
    #[arg(long = "isPreemptible")]
    pub is_preemptible: bool,
}

impl From<&CreateArgs> for CreateHyperparameter {
    fn from(args: &CreateArgs) -> Self {
        Self {
            name: args.name.clone(),
            project_id: args.project_id.clone(),
            tuning_command: args.tuning_command.clone(),
            worker_container: args.worker_container.clone(),
            worker_machine_type: args.worker_machine_type.clone(),
            worker_command: args.worker_command.clone(),
            worker_count: args.worker_count,
            worker_container_user: args.worker_container_user.clone(),
            worker_registry_username: args.worker_registry_username.clone(),
            worker_registry_password: args.worker_registry_password.clone(),
            server_registry_username: args.server_registry_username.clone(),
            server_registry_password: args.server_registry_password.clone(),
            server_container_user: args.server_container_user.clone(),
            is_preemptible: args.is_preemptible.then_some(true),
        }
    }
}
