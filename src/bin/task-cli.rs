use clap::{Parser, Subcommand};
use serde_json::{json, Value};

#[derive(Parser)]
#[command(name = "task-cli")]
#[command(about = "Command-line client for the task service", long_about = None)]
struct Cli {
    #[arg(short, long, default_value = "http://127.0.0.1:3333")]
    url: String,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List tasks, optionally filtered by title/description
    List {
        #[arg(short, long)]
        search: Option<String>,
    },
    /// Create a task
    Create { title: String, description: String },
    /// Replace a task's title and description
    Update {
        id: String,
        title: String,
        description: String,
    },
    /// Mark a task as completed
    Complete { id: String },
    /// Delete a task
    Delete { id: String },
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    let client = reqwest::Client::new();
    let base = cli.url.trim_end_matches('/');

    let request = match cli.command {
        Commands::List { search } => {
            let mut request = client.get(format!("{base}/tasks"));
            if let Some(search) = search {
                request = request.query(&[("search", search)]);
            }
            request
        }
        Commands::Create { title, description } => client
            .post(format!("{base}/tasks"))
            .json(&json!({ "title": title, "description": description })),
        Commands::Update {
            id,
            title,
            description,
        } => client
            .put(format!("{base}/tasks/{id}"))
            .json(&json!({ "title": title, "description": description })),
        Commands::Complete { id } => client.patch(format!("{base}/tasks/{id}/complete")),
        Commands::Delete { id } => client.delete(format!("{base}/tasks/{id}")),
    };

    print_response(request.send().await?).await
}

async fn print_response(res: reqwest::Response) -> Result<(), Box<dyn std::error::Error>> {
    let status = res.status();
    let text = res.text().await?;

    if !status.is_success() {
        eprintln!("Error: task service returned status {}", status);
        if !text.is_empty() {
            eprintln!("Response: {}", text);
        }
        std::process::exit(1);
    }

    if text.is_empty() {
        println!("{}", status);
        return Ok(());
    }

    let json: Value = serde_json::from_str(&text)?;
    println!("{}", serde_json::to_string_pretty(&json)?);
    Ok(())
}
