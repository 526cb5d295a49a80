use clap::{Parser, Subcommand, ValueEnum};
use promptdesk_core::config::{auto_save_interval_from_env_value, database_url_from_env_value};
use promptdesk_core::repositories::data::parse_bundle;
use promptdesk_core::wire::{
    CreateDraftReq, CreatePromptReq, ExportFormat, ListPromptsQuery, SettingsPatch,
};
use promptdesk_core::{
    db, CoreConfig, DataService, DraftRepository, PromptService, RecordId, SettingsHub,
    SettingsService, NEW_DRAFT_TITLE_PREFIX,
};
use std::path::{Path, PathBuf};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser)]
#[command(name = "promptdesk")]
#[command(about = "PromptDesk prompt library CLI")]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Manage drafts
    Drafts {
        #[command(subcommand)]
        action: DraftsCommand,
    },
    /// Manage saved prompts
    Prompts {
        #[command(subcommand)]
        action: PromptsCommand,
    },
    /// Show or change settings
    Settings {
        #[command(subcommand)]
        action: SettingsCommand,
    },
    /// Export all data
    Export {
        /// Output format (defaults to the exportFormat setting)
        #[arg(long, value_enum)]
        format: Option<FormatArg>,
        /// Write to this file instead of stdout
        #[arg(long)]
        output: Option<PathBuf>,
    },
    /// Import a previously exported bundle
    Import {
        /// JSON or YAML bundle file
        file: PathBuf,
    },
    /// Delete all prompts, drafts and settings
    Clear {
        /// Confirm the deletion
        #[arg(long)]
        yes: bool,
    },
    /// Add the sample prompts
    Seed,
}

#[derive(Subcommand)]
enum DraftsCommand {
    /// List drafts, most recently updated first
    List,
    /// Create a draft
    New {
        /// Title (defaults to "Draft N")
        #[arg(long)]
        title: Option<String>,
        #[arg(long, default_value = "")]
        description: String,
        #[arg(long, default_value = "")]
        content: String,
    },
    /// Delete a draft
    Delete { id: String },
}

#[derive(Subcommand)]
enum PromptsCommand {
    /// List prompts
    List {
        /// Only favourites
        #[arg(long)]
        favorites: bool,
        /// Case-insensitive text filter
        #[arg(long)]
        search: Option<String>,
    },
    /// Print one prompt
    Show { id: String },
    /// Add a prompt
    Add {
        title: String,
        content: String,
        #[arg(long)]
        description: Option<String>,
        #[arg(long)]
        favorite: bool,
    },
    /// Toggle the favourite flag
    Favorite { id: String },
    /// Delete a prompt
    Delete { id: String },
}

#[derive(Subcommand)]
enum SettingsCommand {
    /// Print the current settings
    Show,
    /// Set the default export format
    SetExportFormat {
        #[arg(value_enum)]
        format: FormatArg,
    },
    /// Set the command shown by the copyable command widget
    SetCopyableCommand { command: String },
}

#[derive(Clone, Copy, ValueEnum)]
enum FormatArg {
    Json,
    Yaml,
}

impl From<FormatArg> for ExportFormat {
    fn from(arg: FormatArg) -> Self {
        match arg {
            FormatArg::Json => ExportFormat::Json,
            FormatArg::Yaml => ExportFormat::Yaml,
        }
    }
}

fn format_from_path(path: &Path) -> Option<ExportFormat> {
    match path.extension().and_then(|e| e.to_str()) {
        Some("json") => Some(ExportFormat::Json),
        Some("yaml") | Some("yml") => Some(ExportFormat::Yaml),
        _ => None,
    }
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    dotenvy::dotenv().ok();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("promptdesk_core=warn".parse()?),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let cli = Cli::parse();
    let Some(command) = cli.command else {
        println!("Use 'promptdesk --help' for commands");
        return Ok(());
    };

    let cfg = CoreConfig::new(
        database_url_from_env_value(std::env::var("PROMPTDESK_DATABASE_URL").ok()),
        auto_save_interval_from_env_value(std::env::var("PROMPTDESK_AUTO_SAVE_SECS").ok())?,
    )?;
    let pool = db::connect(&cfg).await?;
    let hub = SettingsHub::default();

    match command {
        Commands::Drafts { action } => {
            let drafts = DraftRepository::new(pool);
            match action {
                DraftsCommand::List => {
                    let list = drafts.list().await?;
                    if list.is_empty() {
                        println!("No drafts found.");
                    }
                    for d in list {
                        println!("{}  {}  (updated {})", d.id, d.title, d.updated_at);
                    }
                }
                DraftsCommand::New {
                    title,
                    description,
                    content,
                } => {
                    let title = match title {
                        Some(t) => t,
                        None => format!(
                            "{} {}",
                            NEW_DRAFT_TITLE_PREFIX,
                            drafts.list().await?.len() + 1
                        ),
                    };
                    let draft = drafts
                        .create(CreateDraftReq {
                            title,
                            description,
                            content,
                        })
                        .await?;
                    println!("Created draft {} ({})", draft.title, draft.id);
                }
                DraftsCommand::Delete { id } => match drafts.delete(RecordId::parse(&id)?).await {
                    Ok(()) => println!("Deleted draft {}", id),
                    Err(e) => eprintln!("Error deleting draft: {}", e),
                },
            }
        }
        Commands::Prompts { action } => {
            let prompts = PromptService::new(pool);
            match action {
                PromptsCommand::List { favorites, search } => {
                    let list = prompts
                        .list(&ListPromptsQuery {
                            favorites: Some(favorites),
                            search,
                        })
                        .await?;
                    if list.is_empty() {
                        println!("No prompts found.");
                    }
                    for p in list {
                        let star = if p.is_favorite { "*" } else { " " };
                        println!("{} {}  {}", star, p.id, p.title);
                    }
                }
                PromptsCommand::Show { id } => {
                    match prompts.get(RecordId::parse(&id)?).await {
                        Ok(p) => {
                            println!("# {}", p.title);
                            if let Some(description) = &p.description {
                                println!("{}", description);
                            }
                            println!();
                            println!("{}", p.content);
                        }
                        Err(e) => eprintln!("Error reading prompt: {}", e),
                    }
                }
                PromptsCommand::Add {
                    title,
                    content,
                    description,
                    favorite,
                } => {
                    match prompts
                        .create(CreatePromptReq {
                            title,
                            content,
                            description,
                            is_favorite: favorite,
                        })
                        .await
                    {
                        Ok(p) => println!("Created prompt {} ({})", p.title, p.id),
                        Err(e) => eprintln!("Error creating prompt: {}", e),
                    }
                }
                PromptsCommand::Favorite { id } => {
                    match prompts.toggle_favorite(RecordId::parse(&id)?).await {
                        Ok(p) if p.is_favorite => println!("Marked {} as favourite", p.title),
                        Ok(p) => println!("Unmarked {} as favourite", p.title),
                        Err(e) => eprintln!("Error toggling favourite: {}", e),
                    }
                }
                PromptsCommand::Delete { id } => {
                    match prompts.delete(RecordId::parse(&id)?).await {
                        Ok(()) => println!("Deleted prompt {}", id),
                        Err(e) => eprintln!("Error deleting prompt: {}", e),
                    }
                }
            }
        }
        Commands::Settings { action } => {
            let settings = SettingsService::new(pool, hub);
            let patch = match action {
                SettingsCommand::Show => {
                    let record = settings.get().await?;
                    println!("{:#?}", record.settings);
                    return Ok(());
                }
                SettingsCommand::SetExportFormat { format } => SettingsPatch {
                    export_format: Some(format.into()),
                    ..Default::default()
                },
                SettingsCommand::SetCopyableCommand { command } => SettingsPatch {
                    copyable_command: Some(command),
                    ..Default::default()
                },
            };
            match settings.update(patch).await {
                Ok(_) => println!("Settings updated"),
                Err(e) => eprintln!("Error updating settings: {}", e),
            }
        }
        Commands::Export { format, output } => {
            let data = DataService::new(pool, hub);
            let (_, body) = data.export(format.map(ExportFormat::from)).await?;
            match output {
                Some(path) => {
                    std::fs::write(&path, body)?;
                    println!("Exported to {}", path.display());
                }
                None => print!("{}", body),
            }
        }
        Commands::Import { file } => {
            let text = std::fs::read_to_string(&file)?;
            let bundle = parse_bundle(&text, format_from_path(&file))?;
            let res = DataService::new(pool, hub).import(bundle).await?;
            println!(
                "Imported {} prompts, {} drafts{}",
                res.prompts,
                res.drafts,
                if res.settings { " and settings" } else { "" }
            );
        }
        Commands::Clear { yes } => {
            if !yes {
                eprintln!("Refusing to delete all data without --yes");
                return Ok(());
            }
            DataService::new(pool, hub).clear_all().await?;
            println!("All data cleared");
        }
        Commands::Seed => {
            let created = DataService::new(pool, hub).seed().await?;
            println!("Created {} sample prompts", created.len());
        }
    }

    Ok(())
}
