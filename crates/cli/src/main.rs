use clap::{Parser, Subcommand};
use medstock_client::render::{format_price, render_average, render_list, render_search};
use medstock_client::{ClientResult, MedicineClient, Presentation};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

mod browse;

#[derive(Parser)]
#[command(name = "medstock")]
#[command(about = "Medicines inventory CLI")]
struct Cli {
    /// Base URL of the medstock REST API
    #[arg(
        long,
        global = true,
        env = "MEDSTOCK_API_URL",
        default_value = "http://127.0.0.1:8000"
    )]
    api_url: String,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// List all medicines with the average price
    List,
    /// Show the average price
    Average,
    /// Show a single medicine
    Show {
        /// Medicine name (case-insensitive)
        name: String,
    },
    /// Create a medicine
    Create {
        /// Medicine name
        name: String,
        /// Price, greater than 0
        price: String,
    },
    /// Update the price and/or name of a medicine
    Update {
        /// Current medicine name (case-insensitive)
        name: String,
        /// New price
        #[arg(long)]
        price: Option<String>,
        /// New name
        #[arg(long)]
        new_name: Option<String>,
    },
    /// Delete a medicine
    Delete {
        /// Medicine name (case-insensitive)
        name: String,
    },
    /// Find the first medicine whose name starts with a prefix
    Search {
        /// Name prefix (case-insensitive)
        prefix: String,
    },
    /// Interactive list with expandable cards and update/delete dialogs
    Browse,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("medstock_client=warn".parse()?),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let cli = Cli::parse();
    let client = MedicineClient::new(&cli.api_url)?;

    let result = match cli.command {
        Some(Commands::List) => list(&client).await,
        Some(Commands::Average) => client
            .average_price()
            .await
            .map(|agg| println!("{}", render_average(Some(&agg)))),
        Some(Commands::Show { name }) => client.get(&name).await.map(|m| {
            println!(
                "{}  {}",
                m.name.as_deref().unwrap_or_default(),
                format_price(m.price.as_ref())
            )
        }),
        Some(Commands::Create { name, price }) => {
            client.create(&name, &price).await.map(|msg| println!("{msg}"))
        }
        Some(Commands::Update {
            name,
            price,
            new_name,
        }) => client
            .update(&name, price.as_deref(), new_name.as_deref())
            .await
            .map(|msg| println!("{msg}")),
        Some(Commands::Delete { name }) => {
            client.delete(&name).await.map(|msg| println!("{msg}"))
        }
        Some(Commands::Search { prefix }) => search(&client, &prefix).await,
        Some(Commands::Browse) => return browse::run(client).await,
        None => {
            println!("Use 'medstock --help' for commands");
            Ok(())
        }
    };

    result.map_err(|e| {
        tracing::debug!("command failed: {:?}", e);
        anyhow::anyhow!(e.user_message())
    })
}

async fn load_view(client: &MedicineClient) -> ClientResult<Presentation> {
    let records = client.list().await?;
    let aggregate = client.average_price().await?;
    let mut view = Presentation::new();
    view.replace(records, aggregate);
    Ok(view)
}

async fn list(client: &MedicineClient) -> ClientResult<()> {
    let view = load_view(client).await?;
    println!("{}", render_list(&view));
    Ok(())
}

async fn search(client: &MedicineClient, prefix: &str) -> ClientResult<()> {
    let view = load_view(client).await?;
    println!("{}", render_search(&view.search(prefix)));
    Ok(())
}
