//! Velion CLI, a command-line client for the Digital Knowledge Network gateway
//!
//! Uses the velion-sdk VelionClient to talk to a running gateway.

use anyhow::{bail, Context};
use clap::{Parser, Subcommand};
use comfy_table::{ContentArrangement, Table};
use serde_json::Value;
use std::path::{Path, PathBuf};
use velion_sdk::{GraphRequest, SearchRequest, Upload, VelionClient};

#[derive(Parser)]
#[command(name = "velion", version, about = "Velion Digital Knowledge Network CLI")]
struct Cli {
    /// Gateway URL
    #[arg(long, default_value = "http://localhost:3002", global = true, env = "VELION_URL")]
    url: String,

    /// Access token from `velion login`
    #[arg(long, global = true, env = "VELION_TOKEN", hide_env_values = true)]
    token: Option<String>,

    /// Output format
    #[arg(long, default_value = "table", global = true)]
    format: OutputFormat,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Clone, clap::ValueEnum)]
enum OutputFormat {
    Table,
    Json,
}

#[derive(Subcommand)]
enum Commands {
    /// Check that the gateway is up
    Health,
    /// Sign in and print an access token
    Login {
        #[arg(long)]
        email: String,
        #[arg(long, env = "VELION_PASSWORD", hide_env_values = true)]
        password: String,
    },
    /// Search the knowledge base
    Search {
        query: String,
        #[arg(long)]
        page: Option<u32>,
        #[arg(long)]
        limit: Option<u32>,
        /// Document type, e.g. RESEARCH
        #[arg(long = "type")]
        document_type: Option<String>,
        #[arg(long)]
        tag: Option<String>,
    },
    /// Show the knowledge graph, or the neighbourhood of one entity
    Graph {
        #[arg(long, requires = "entity_type")]
        entity_id: Option<String>,
        #[arg(long, requires = "entity_id")]
        entity_type: Option<String>,
        #[arg(long)]
        depth: Option<u32>,
        #[arg(long)]
        limit: Option<usize>,
    },
    /// Find paths between two graph nodes
    Connections { source: String, target: String },
    /// Upload a document
    Upload {
        file: PathBuf,
        #[arg(long)]
        title: Option<String>,
        #[arg(long, default_value = "")]
        description: String,
        /// Document type, e.g. RESEARCH
        #[arg(long = "type")]
        document_type: Option<String>,
        /// MIME type; guessed from the extension when omitted
        #[arg(long)]
        mime: Option<String>,
    },
    /// List documents waiting for review
    Pending {
        #[arg(long, default_value_t = 1)]
        page: u32,
        #[arg(long, default_value_t = 20)]
        limit: u32,
    },
    /// Approve, reject or request changes on a document
    Review {
        id: String,
        /// APPROVE, REJECT or REQUEST_CHANGES
        action: String,
        #[arg(long, default_value = "")]
        feedback: String,
    },
    /// Check a document's ledger anchoring
    Verify { id: String },
    /// Show your profile
    Profile,
    /// Show network analytics
    Analytics {
        /// 7d, 30d, 90d or 1y
        #[arg(long)]
        timeframe: Option<String>,
    },
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();
    if let Err(e) = run(cli).await {
        eprintln!("Error: {:#}", e);
        std::process::exit(1);
    }
}

async fn run(cli: Cli) -> anyhow::Result<()> {
    let mut client = VelionClient::new(&cli.url)?;
    if let Some(token) = cli.token {
        client = client.with_token(token);
    }
    let format = cli.format;

    match cli.command {
        Commands::Health => {
            let health = client.health().await?;
            match format {
                OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&health)?),
                OutputFormat::Table => {
                    println!("Status:  {}", health.status);
                    println!("Service: {}", health.service);
                    println!("Version: {}", health.version);
                }
            }
        }
        Commands::Login { email, password } => {
            let session = client.login(&email, &password).await?;
            match format {
                OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&session)?),
                OutputFormat::Table => {
                    let name = format!(
                        "{} {}",
                        text(&session.user["first_name"]),
                        text(&session.user["last_name"])
                    );
                    eprintln!("Signed in as {}", name.trim());
                    println!("{}", session.token);
                }
            }
        }
        Commands::Search {
            query,
            page,
            limit,
            document_type,
            tag,
        } => {
            let request = SearchRequest {
                query,
                page,
                limit,
                document_type,
                tag,
                ..SearchRequest::default()
            };
            let result = client.search(&request).await?;
            match format {
                OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&result)?),
                OutputFormat::Table => {
                    if result.results.is_empty() {
                        println!("(no results)");
                        return Ok(());
                    }
                    let mut table = new_table(&["Title", "Type", "Quality", "Relevance", "Uploader"]);
                    for hit in &result.results {
                        table.add_row(vec![
                            text(&hit["title"]),
                            text(&hit["document_type"]),
                            text(&hit["quality_score"]),
                            text(&hit["relevanceScore"]),
                            text(&hit["metadata"]["uploaderName"]),
                        ]);
                    }
                    println!("{}", table);
                    let p = &result.pagination;
                    println!("Page {} of {} ({} results)", p.page, p.total_pages, p.total);
                }
            }
        }
        Commands::Graph {
            entity_id,
            entity_type,
            depth,
            limit,
        } => {
            let request = GraphRequest {
                entity_id,
                entity_type,
                depth,
                limit,
            };
            let graph = client.graph(&request).await?;
            match format {
                OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&graph)?),
                OutputFormat::Table => print_graph(&graph),
            }
        }
        Commands::Connections { source, target } => {
            let data = client.connections(&source, &target).await?;
            match format {
                OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&data)?),
                OutputFormat::Table => print_paths(&data),
            }
        }
        Commands::Upload {
            file,
            title,
            description,
            document_type,
            mime,
        } => {
            let upload = read_upload(&file, title, description, document_type, mime)?;
            let data = client.upload_document(&upload).await?;
            match format {
                OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&data)?),
                OutputFormat::Table => {
                    println!("Uploaded: {}", text(&data["document"]["id"]));
                    println!("Status:   {}", text(&data["document"]["status"]));
                    println!("Quality:  {}", text(&data["aiResults"]["qualityScore"]));
                    println!("Next:     {}", text(&data["nextSteps"]));
                }
            }
        }
        Commands::Pending { page, limit } => {
            let data = client.pending_validations(page, limit).await?;
            match format {
                OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&data)?),
                OutputFormat::Table => {
                    let mut table = new_table(&["ID", "Title", "Status", "Quality"]);
                    for doc in data["documents"].as_array().into_iter().flatten() {
                        table.add_row(vec![
                            text(&doc["id"]),
                            text(&doc["title"]),
                            text(&doc["status"]),
                            text(&doc["quality_score"]),
                        ]);
                    }
                    println!("{}", table);
                    println!("{} pending", text(&data["pagination"]["total"]));
                }
            }
        }
        Commands::Review {
            id,
            action,
            feedback,
        } => {
            let document = client
                .validate_document(&id, &action.to_uppercase(), &feedback)
                .await?;
            print_value(&document, &format)?;
        }
        Commands::Verify { id } => {
            let data = client.verify_document(&id).await?;
            print_value(&data, &format)?;
        }
        Commands::Profile => {
            let profile = client.profile().await?;
            print_value(&profile, &format)?;
        }
        Commands::Analytics { timeframe } => {
            let stats = client.analytics(timeframe.as_deref()).await?;
            print_value(&stats, &format)?;
        }
    }

    Ok(())
}

fn read_upload(
    file: &Path,
    title: Option<String>,
    description: String,
    document_type: Option<String>,
    mime: Option<String>,
) -> anyhow::Result<Upload> {
    let data = std::fs::read(file).with_context(|| format!("reading {}", file.display()))?;
    let file_name = file
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default();
    let mime_type = match mime.or_else(|| guess_mime(file).map(str::to_string)) {
        Some(mime) => mime,
        None => bail!("cannot tell the MIME type of {}; pass --mime", file.display()),
    };
    let title = title.unwrap_or_else(|| {
        file.file_stem()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_else(|| file_name.clone())
    });
    Ok(Upload {
        title,
        description,
        file_name,
        mime_type,
        document_type,
        data,
        ..Upload::default()
    })
}

fn guess_mime(file: &Path) -> Option<&'static str> {
    let ext = file.extension()?.to_str()?.to_ascii_lowercase();
    Some(match ext.as_str() {
        "pdf" => "application/pdf",
        "doc" => "application/msword",
        "docx" => "application/vnd.openxmlformats-officedocument.wordprocessingml.document",
        "xls" => "application/vnd.ms-excel",
        "xlsx" => "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet",
        "ppt" => "application/vnd.ms-powerpoint",
        "pptx" => "application/vnd.openxmlformats-officedocument.presentationml.presentation",
        "txt" => "text/plain",
        "jpg" | "jpeg" => "image/jpeg",
        "png" => "image/png",
        "gif" => "image/gif",
        _ => return None,
    })
}

fn new_table(header: &[&str]) -> Table {
    let mut table = Table::new();
    table.set_content_arrangement(ContentArrangement::Dynamic);
    table.set_header(header.to_vec());
    table
}

fn print_graph(graph: &Value) {
    let empty = Vec::new();
    let nodes = graph["data"]["nodes"].as_array().unwrap_or(&empty);
    let edges = graph["data"]["edges"].as_array().unwrap_or(&empty);

    let mut table = new_table(&["Node", "Label", "Name"]);
    for node in nodes {
        let name = &node["properties"]["name"];
        let name = if name.is_null() { &node["properties"]["title"] } else { name };
        table.add_row(vec![text(&node["id"]), text(&node["label"]), text(name)]);
    }
    println!("{}", table);

    let mut table = new_table(&["From", "To", "Relationship"]);
    for edge in edges {
        table.add_row(vec![text(&edge["from"]), text(&edge["to"]), text(&edge["label"])]);
    }
    println!("{}", table);
    println!("{} node(s), {} edge(s)", nodes.len(), edges.len());
}

fn print_paths(data: &Value) {
    let empty = Vec::new();
    let paths = data["paths"].as_array().unwrap_or(&empty);
    if paths.is_empty() {
        println!("(no paths)");
        return;
    }
    let mut table = new_table(&["Length", "Weight", "Nodes"]);
    for path in paths {
        let nodes: Vec<String> = path["nodes"]
            .as_array()
            .map(|n| n.iter().map(|v| text(&v["id"])).collect())
            .unwrap_or_default();
        table.add_row(vec![
            text(&path["length"]),
            text(&path["weight"]),
            nodes.join(" -> "),
        ]);
    }
    println!("{}", table);
    println!("Shortest path: {}", text(&data["shortestPath"]));
}

fn print_value(value: &Value, format: &OutputFormat) -> anyhow::Result<()> {
    match (format, value) {
        (OutputFormat::Table, Value::Object(map)) => {
            let mut table = new_table(&["Field", "Value"]);
            for (key, v) in map {
                table.add_row(vec![key.clone(), text(v)]);
            }
            println!("{}", table);
        }
        _ => println!("{}", serde_json::to_string_pretty(value)?),
    }
    Ok(())
}

fn text(v: &Value) -> String {
    match v {
        Value::Null => "-".to_string(),
        Value::String(s) => s.clone(),
        Value::Number(n) => n.to_string(),
        Value::Bool(b) => b.to_string(),
        Value::Array(items) if items.iter().all(Value::is_string) => items
            .iter()
            .filter_map(Value::as_str)
            .collect::<Vec<_>>()
            .join(", "),
        _ => serde_json::to_string(v).unwrap_or_default(),
    }
}
