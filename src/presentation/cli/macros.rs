/// Generates a `get` subcommand that fetches one entity by id and prints it.
macro_rules! define_get_command {
    ($command:ident, $fn_name:ident, $id:ty, $client:ident) => {
        #[derive(Debug, clap::Args)]
        pub struct $command {
            #[arg(long)]
            pub id: i64,
        }

        pub async fn $fn_name(
            client: &crate::infrastructure::client::ReadlogClient,
            command: $command,
        ) -> anyhow::Result<()> {
            let entity = client.$client().get(<$id>::new(command.id)).await?;
            super::print_json(&entity)
        }
    };
}

/// Generates a `delete` subcommand that removes one entity by id.
macro_rules! define_delete_command {
    ($command:ident, $fn_name:ident, $id:ty, $client:ident, $label:literal) => {
        #[derive(Debug, clap::Args)]
        pub struct $command {
            #[arg(long)]
            pub id: i64,
        }

        pub async fn $fn_name(
            client: &crate::infrastructure::client::ReadlogClient,
            command: $command,
        ) -> anyhow::Result<()> {
            client.$client().delete(<$id>::new(command.id)).await?;
            eprintln!(concat!("Deleted ", $label, " {}."), command.id);
            Ok(())
        }
    };
}

pub(crate) use {define_delete_command, define_get_command};
