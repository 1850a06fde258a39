//! Notice management CLI commands.

use clap::{Args, Subcommand};
use serde::Serialize;
use tabled::Tabled;

use noticeboard_core::config::AppConfig;
use noticeboard_core::error::AppError;
use noticeboard_core::types::NoticeId;
use noticeboard_database::StoreManager;
use noticeboard_entity::notice::{CompleteOutcome, Notice};
use noticeboard_service::NoticeService;

use crate::output::{self, OutputFormat};

/// Arguments for notice commands
#[derive(Debug, Args)]
pub struct NoticeArgs {
    /// Notice subcommand
    #[command(subcommand)]
    pub command: NoticeCommand,
}

/// Notice subcommands
#[derive(Debug, Subcommand)]
pub enum NoticeCommand {
    /// List notices
    List {
        /// Show only what this user sees
        #[arg(short, long)]
        user_id: Option<String>,
    },
    /// Show one notice
    Show {
        /// Notice id
        id: String,
    },
    /// Delete a notice
    Delete {
        /// Notice id
        id: String,
        /// Skip confirmation prompt
        #[arg(long)]
        force: bool,
    },
    /// Mark a notice as completed
    Complete {
        /// Notice id
        id: String,
    },
}

/// Notice display row for table output
#[derive(Debug, Serialize, Tabled)]
struct NoticeRow {
    id: String,
    title: String,
    priority: String,
    deadline: String,
    user: String,
    status: String,
    source: String,
}

impl From<&Notice> for NoticeRow {
    fn from(n: &Notice) -> Self {
        Self {
            id: n.id.to_string(),
            title: n.title.clone(),
            priority: n.priority.to_string(),
            deadline: n
                .deadline
                .map(|d| d.format("%Y-%m-%d %H:%M").to_string())
                .unwrap_or_default(),
            user: n.user_id.clone().unwrap_or_else(|| "-".to_string()),
            status: n.status.to_string(),
            source: n.source.map(|s| s.to_string()).unwrap_or_default(),
        }
    }
}

fn parse_id(raw: &str) -> Result<NoticeId, AppError> {
    raw.parse()
        .map_err(|_| AppError::not_found(format!("Notice not found: {raw}")))
}

/// Execute notice commands
pub async fn execute(
    args: &NoticeArgs,
    config: &AppConfig,
    format: OutputFormat,
) -> Result<(), AppError> {
    let stores = StoreManager::new(&config.database).await?;
    let service = NoticeService::new(stores.store());

    let result = run(&args.command, &service, format).await;
    stores.close().await;
    result
}

async fn run(
    command: &NoticeCommand,
    service: &NoticeService,
    format: OutputFormat,
) -> Result<(), AppError> {
    match command {
        NoticeCommand::List { user_id } => {
            let notices = service.list(user_id.as_deref()).await?;
            let rows: Vec<NoticeRow> = notices.iter().map(NoticeRow::from).collect();
            output::print_list(&rows, format);
        }
        NoticeCommand::Show { id } => {
            let notice = service.get(parse_id(id)?).await?;
            match format {
                OutputFormat::Json => output::print_json(&notice),
                OutputFormat::Table => {
                    let row = NoticeRow::from(&notice);
                    output::print_kv("Id", &row.id);
                    output::print_kv("Title", &row.title);
                    output::print_kv("Description", &notice.description);
                    output::print_kv("Priority", &row.priority);
                    output::print_kv("Deadline", &row.deadline);
                    output::print_kv("User", &row.user);
                    output::print_kv("Status", &row.status);
                    if let Some(day) = notice.completed_date {
                        output::print_kv("Completed", &day.to_string());
                    }
                    output::print_kv("Created", &notice.created_at.to_rfc3339());
                }
            }
        }
        NoticeCommand::Delete { id, force } => {
            let id = parse_id(id)?;
            if !force {
                let confirm = dialoguer::Confirm::new()
                    .with_prompt(format!("Delete notice {id}?"))
                    .default(false)
                    .interact()
                    .map_err(|e| AppError::internal(format!("Input error: {}", e)))?;

                if !confirm {
                    println!("Cancelled.");
                    return Ok(());
                }
            }

            if service.remove(id).await? {
                output::print_success("Notice deleted");
            } else {
                return Err(AppError::not_found("Notice not found"));
            }
        }
        NoticeCommand::Complete { id } => match service.complete(parse_id(id)?).await? {
            CompleteOutcome::Completed => output::print_success("Notice marked as completed"),
            CompleteOutcome::AlreadyCompleted => output::print_warning("Notice already completed"),
            CompleteOutcome::NotFound => return Err(AppError::not_found("Notice not found")),
        },
    }

    Ok(())
}
