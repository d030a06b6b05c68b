//! Command dispatch: build the request, run it, render the result.

use gradient_core::{present, CreateHyperparameter, GradientClient, ListFilter};
use tracing::{debug, instrument};

use crate::args::{Cli, ClustersCommands, Commands, CreateArgs, HyperparametersCommands};
use crate::error::CliResult;
use crate::transport::Transport;

/// Run the parsed command and return the text to print on success.
pub fn execute_command<T: Transport>(
    cli: &Cli,
    client: &GradientClient,
    transport: &T,
) -> CliResult<String> {
    let client = client.with_api_key(cli.api_key.as_deref());
    if cli.api_key.is_some() {
        debug!("using API key from --apiKey");
    }

    match &cli.command {
        Commands::Clusters { command } => match command {
            ClustersCommands::List { limit, offset } => {
                list_clusters(&client, transport, *limit, *offset)
            }
            ClustersCommands::Get { id } => get_cluster(&client, transport, id),
        },
        Commands::Hyperparameters { command } => match command {
            HyperparametersCommands::Create(args) => create_hyperparameter(&client, transport, args),
            HyperparametersCommands::List => list_hyperparameters(&client, transport),
            HyperparametersCommands::Details { id } => get_hyperparameter(&client, transport, id),
            HyperparametersCommands::Start { id } => start_hyperparameter(&client, transport, id),
        },
    }
}

#[instrument(skip(client, transport))]
fn list_clusters<T: Transport>(
    client: &GradientClient,
    transport: &T,
    limit: u32,
    offset: u32,
) -> CliResult<String> {
    let req = client.build_list_clusters(&ListFilter::private(limit, offset))?;
    let page = client.parse_list_clusters(transport.execute(&req)?)?;
    Ok(present::cluster_list(&page))
}

#[instrument(skip(client, transport))]
fn get_cluster<T: Transport>(client: &GradientClient, transport: &T, id: &str) -> CliResult<String> {
    let req = client.build_get_cluster(id);
    let cluster = client.parse_get_cluster(transport.execute(&req)?)?;
    Ok(present::cluster(&cluster))
}

#[instrument(skip_all, fields(name = %args.name))]
fn create_hyperparameter<T: Transport>(
    client: &GradientClient,
    transport: &T,
    args: &CreateArgs,
) -> CliResult<String> {
    let req = client.build_create_hyperparameter(&CreateHyperparameter::from(args))?;
    let created = client.parse_create_hyperparameter(transport.execute(&req)?)?;
    Ok(present::created_hyperparameter(&created))
}

#[instrument(skip_all)]
fn list_hyperparameters<T: Transport>(client: &GradientClient, transport: &T) -> CliResult<String> {
    let req = client.build_list_hyperparameters();
    let page = client.parse_list_hyperparameters(transport.execute(&req)?)?;
    Ok(present::hyperparameter_list(&page))
}

#[instrument(skip(client, transport))]
fn get_hyperparameter<T: Transport>(
    client: &GradientClient,
    transport: &T,
    id: &str,
) -> CliResult<String> {
    let req = client.build_get_hyperparameter(id);
    let job = client.parse_get_hyperparameter(transport.execute(&req)?)?;
    Ok(present::hyperparameter_details(&job))
}

#[instrument(skip(client, transport))]
fn start_hyperparameter<T: Transport>(
    client: &GradientClient,
    transport: &T,
    id: &str,
) -> CliResult<String> {
    let req = client.build_start_hyperparameter(id);
    client.parse_start_hyperparameter(transport.execute(&req)?)?;
    Ok(present::started_hyperparameter())
}
