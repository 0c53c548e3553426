mod table;

use std::path::PathBuf;

use activityflow_client::{ApiClient, TokenStore};
use activityflow_shared::activity::{ActivityDto, CreateActivityDto, UpdateActivityDto};
use activityflow_shared::category::{CreateCategoryDto, DEFAULT_COLOR};
use anyhow::{Context, Result, bail};
use chrono::{DateTime, Utc};
use clap::{ArgAction, Parser, Subcommand};
use console::style;
use uuid::Uuid;

use table::Table;

#[derive(Parser)]
#[command(name = "activityflow")]
#[command(about = "Terminal client for the ActivityFlow API", long_about = None)]
struct Cli {
    /// Server base URL
    #[arg(long, env = "ACTIVITYFLOW_URL", default_value = "http://localhost:5000")]
    url: String,
    /// Token store file
    #[arg(long, env = "ACTIVITYFLOW_TOKEN_STORE")]
    store: Option<PathBuf>,
    /// Increase log verbosity (-v, -vv)
    #[arg(short, long, action = ArgAction::Count)]
    verbose: u8,
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Sign in and store the issued tokens
    Login {
        email: String,
        #[arg(long)]
        password: String,
    },
    /// Create an account and sign in
    Register {
        email: String,
        #[arg(long)]
        password: String,
        /// Defaults to --password
        #[arg(long)]
        confirm: Option<String>,
    },
    /// Forget the stored tokens
    Logout,
    /// Show who the stored token belongs to
    Whoami,
    /// Exchange the refresh token for a new pair
    Refresh,
    Activities {
        #[command(subcommand)]
        command: ActivityCommands,
    },
    Categories {
        #[command(subcommand)]
        command: CategoryCommands,
    },
    Statuses {
        #[command(subcommand)]
        command: StatusCommands,
    },
}

#[derive(Subcommand)]
enum ActivityCommands {
    List {
        #[arg(long, conflicts_with = "category")]
        user: Option<Uuid>,
        #[arg(long)]
        category: Option<i64>,
    },
    Show {
        id: i64,
    },
    Create {
        title: String,
        #[arg(long)]
        description: Option<String>,
        /// RFC 3339 timestamp, e.g. 2030-01-31T17:00:00Z
        #[arg(long)]
        due: Option<DateTime<Utc>>,
        #[arg(long, default_value_t = 0)]
        priority: i32,
        #[arg(long)]
        category: Option<i64>,
        #[arg(long)]
        assign: Option<Uuid>,
    },
    /// Change fields of an existing activity; unset flags keep their value
    Update {
        id: i64,
        #[arg(long)]
        title: Option<String>,
        #[arg(long)]
        description: Option<String>,
        /// Pending, InProgress, Completed, Cancelled or OnHold
        #[arg(long)]
        status: Option<String>,
        #[arg(long)]
        priority: Option<i32>,
        #[arg(long)]
        category: Option<i64>,
        #[arg(long)]
        due: Option<DateTime<Utc>>,
        #[arg(long)]
        assign: Option<Uuid>,
    },
    Delete {
        id: i64,
    },
}

#[derive(Subcommand)]
enum CategoryCommands {
    List,
    Create {
        name: String,
        #[arg(long)]
        description: Option<String>,
        #[arg(long, default_value = DEFAULT_COLOR)]
        color: String,
    },
    Delete {
        id: i64,
    },
}

#[derive(Subcommand)]
enum StatusCommands {
    List,
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    if let Err(e) = run(cli).await {
        eprintln!("{} {:#}", style("error:").red().bold(), e);
        std::process::exit(1);
    }
}

fn init_tracing(verbose: u8) {
    let level = match verbose {
        0 => "activityflow=warn,activityflow_client=warn",
        1 => "activityflow=info,activityflow_client=info",
        _ => "activityflow=debug,activityflow_client=debug,reqwest=debug",
    };
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| level.into()),
        )
        .with_writer(std::io::stderr)
        .init();
}

async fn run(cli: Cli) -> Result<()> {
    let store = cli.store.map(TokenStore::new).unwrap_or_else(TokenStore::default_location);
    let client = ApiClient::new(cli.url, store)?;

    match cli.command {
        Commands::Login { email, password } => {
            let response = client.auth().login(&email, &password).await?;
            report_auth(response.success, &response.message)?;
            if let Some(expiration) = response.expiration {
                println!("Token valid until {}", expiration.to_rfc3339());
            }
        }
        Commands::Register {
            email,
            password,
            confirm,
        } => {
            let confirm = confirm.unwrap_or_else(|| password.clone());
            let response = client.auth().register(&email, &password, &confirm).await?;
            report_auth(response.success, &response.message)?;
        }
        Commands::Logout => {
            client.auth().logout()?;
            println!("Logged out.");
        }
        Commands::Whoami => {
            if !client.auth().is_authenticated()? {
                bail!("Not logged in");
            }
            let me = client.auth().whoami().await?;
            println!("{} ({})", me.user_email, me.user_id);
            println!("Roles: {}", me.roles.join(", "));
        }
        Commands::Refresh => {
            let response = client.auth().refresh().await?;
            report_auth(response.success, &response.message)?;
        }
        Commands::Activities { command } => activities(&client, command).await?,
        Commands::Categories { command } => categories(&client, command).await?,
        Commands::Statuses { command } => match command {
            StatusCommands::List => {
                let mut table = Table::new(vec!["ID", "ORDER", "NAME", "COLOR", "DESCRIPTION"]);
                for s in client.statuses().get_all().await? {
                    table.row(vec![
                        s.id.to_string(),
                        s.order.to_string(),
                        s.name.to_string(),
                        s.color,
                        s.description.unwrap_or_default(),
                    ]);
                }
                table.print();
            }
        },
    }
    Ok(())
}

fn report_auth(success: bool, message: &str) -> Result<()> {
    if !success {
        bail!("{message}");
    }
    println!("{}", style(message).green());
    Ok(())
}

fn print_activities(activities: Vec<ActivityDto>) {
    let mut table = Table::new(vec!["ID", "TITLE", "STATUS", "PRIORITY", "CATEGORY", "OWNER", "DUE"]);
    for a in activities {
        table.row(vec![
            a.id.to_string(),
            a.title,
            a.status.to_string(),
            a.priority.to_string(),
            a.category_name.unwrap_or_default(),
            a.created_by_user_name,
            a.due_date.map(|d| d.format("%Y-%m-%d").to_string()).unwrap_or_default(),
        ]);
    }
    table.print();
}

async fn activities(client: &ApiClient, command: ActivityCommands) -> Result<()> {
    let api = client.activities();
    match command {
        ActivityCommands::List { user, category } => {
            let list = match (user, category) {
                (Some(user), _) => api.get_by_user(user).await?,
                (None, Some(category)) => api.get_by_category(category).await?,
                (None, None) => api.get_all().await?,
            };
            print_activities(list);
        }
        ActivityCommands::Show { id } => {
            let a = api
                .get_by_id(id)
                .await?
                .with_context(|| format!("Activity {id} not found"))?;
            println!("{} {}", style(format!("#{}", a.id)).bold(), style(&a.title).bold());
            println!("Status:      {}", a.status);
            println!("Priority:    {}", a.priority);
            println!("Category:    {}", a.category_name.as_deref().unwrap_or("-"));
            println!("Owner:       {}", a.created_by_user_name);
            println!("Assigned to: {}", a.assigned_to_user_name.as_deref().unwrap_or("-"));
            println!("Start:       {}", a.start_date.to_rfc3339());
            if let Some(due) = a.due_date {
                println!("Due:         {}", due.to_rfc3339());
            }
            if let Some(done) = a.completed_at {
                println!("Completed:   {}", done.to_rfc3339());
            }
            if let Some(description) = a.description {
                println!("\n{description}");
            }
        }
        ActivityCommands::Create {
            title,
            description,
            due,
            priority,
            category,
            assign,
        } => {
            let created = api
                .create(&CreateActivityDto {
                    title,
                    description,
                    due_date: due,
                    priority,
                    status_id: None,
                    category_id: category,
                    assigned_to_user_id: assign,
                })
                .await?;
            println!("{} activity {}", style("Created").green(), created.id);
        }
        ActivityCommands::Update {
            id,
            title,
            description,
            status,
            priority,
            category,
            due,
            assign,
        } => {
            let current = api
                .get_by_id(id)
                .await?
                .with_context(|| format!("Activity {id} not found"))?;
            let dto = UpdateActivityDto {
                title: title.unwrap_or(current.title),
                description: description.or(current.description),
                category_id: category.or(current.category_id),
                status: status.unwrap_or_else(|| current.status.to_string()),
                priority,
                due_date: due,
                assigned_to_user_id: assign,
            };
            if !api.update(id, &dto).await? {
                bail!("Activity {id} not found");
            }
            println!("{} activity {}", style("Updated").green(), id);
        }
        ActivityCommands::Delete { id } => {
            if !api.delete(id).await? {
                bail!("Activity {id} not found");
            }
            println!("{} activity {}", style("Deleted").green(), id);
        }
    }
    Ok(())
}

async fn categories(client: &ApiClient, command: CategoryCommands) -> Result<()> {
    let api = client.categories();
    match command {
        CategoryCommands::List => {
            let mut table = Table::new(vec!["ID", "NAME", "COLOR", "ACTIVE", "DESCRIPTION"]);
            for c in api.get_all().await? {
                table.row(vec![
                    c.id.to_string(),
                    c.name,
                    c.color,
                    if c.is_active { "yes" } else { "no" }.to_string(),
                    c.description.unwrap_or_default(),
                ]);
            }
            table.print();
        }
        CategoryCommands::Create {
            name,
            description,
            color,
        } => {
            let created = api
                .create(&CreateCategoryDto {
                    name,
                    description,
                    color,
                })
                .await?;
            println!("{} category {}", style("Created").green(), created.id);
        }
        CategoryCommands::Delete { id } => {
            if !api.delete(id).await? {
                bail!("Category {id} not found");
            }
            println!("{} category {}", style("Deleted").green(), id);
        }
    }
    Ok(())
}
