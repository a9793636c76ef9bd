use clap::{Parser, Subcommand};

use kanri::config::Config;
use kanri::core::task::{Task, TaskId, TaskPriority};
use kanri::core::user::{User, UserRole};
use kanri::dates::format_date;
use kanri::extract::PatternExtractor;
use kanri::service::{NewTaskInput, TaskEdit, TaskService};
use kanri::store::{JsonStore, TaskStore};
use kanri::views::{self, FilterSpec};
use kanri::{klog, share, Error, Result};

/// Kanri - team task tracker with a bot-style command grammar
#[derive(Parser, Debug)]
#[command(name = "kanri")]
#[command(version, about, long_about = None)]
#[command(after_help = "ENVIRONMENT:\n    KANRI_DEBUG=1     Enable debug logging (alternative to --debug)")]
struct Cli {
    /// Enable debug logging (writes to ~/.kanri/kanri.log)
    #[arg(short = 'd', long)]
    debug: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug, Clone)]
enum Command {
    /// Create a task from a bot command: [@bot] <assignee> <title> <M/D> [priority]
    Add {
        /// The command text, e.g. "@bot 田中 レポート提出 11/10 High"
        #[arg(trailing_var_arg = true, required = true)]
        text: Vec<String>,
    },

    /// Create a task from free text; the due date is extracted from the text
    New {
        /// Assignee email
        #[arg(long)]
        assignee: String,

        /// Priority (High/Med/Low, defaults to Med)
        #[arg(long)]
        priority: Option<TaskPriority>,

        /// The task text, e.g. "11/20 までに提案書を準備"
        #[arg(trailing_var_arg = true, required = true)]
        text: Vec<String>,
    },

    /// Add a subtask under an existing task
    Sub {
        /// Parent task id (full or 8-char prefix)
        parent: String,

        /// Override the inherited assignee email
        #[arg(long)]
        assignee: Option<String>,

        /// Override the inherited priority
        #[arg(long)]
        priority: Option<TaskPriority>,

        /// Subtask title
        #[arg(trailing_var_arg = true, required = true)]
        text: Vec<String>,
    },

    /// List tasks (admin view), with optional filters
    List {
        /// Only tasks assigned to this email
        #[arg(long)]
        assignee: Option<String>,

        /// Only tasks at this priority
        #[arg(long)]
        priority: Option<TaskPriority>,

        /// Only incomplete tasks past their due date
        #[arg(long)]
        overdue: bool,
    },

    /// Show the current user's dashboard
    Dashboard,

    /// Report a task complete (assignee)
    Report { id: String },

    /// Approve a reported task (admin)
    Approve { id: String },

    /// Send a reported task back to TODO (admin)
    Sendback { id: String },

    /// Toggle a subtask between TODO and DONE
    Toggle { id: String },

    /// Edit a task (admin)
    Edit {
        id: String,

        #[arg(long)]
        title: Option<String>,

        #[arg(long)]
        assignee: Option<String>,

        /// New due date as M/D (resolved to the nearest future occurrence)
        #[arg(long)]
        due: Option<String>,

        #[arg(long)]
        priority: Option<TaskPriority>,
    },

    /// Delete a task and its subtasks (admin)
    Delete { id: String },

    /// Print a task as a chat share message, with a calendar link
    Share { id: String },

    /// List known users
    Users,

    /// Switch the acting user
    User { email: String },
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();
    kanri::log::init_with_debug(cli.debug);

    if let Err(e) = run(cli).await {
        eprintln!("error: {e}");
        std::process::exit(1);
    }
}

async fn run(cli: Cli) -> Result<()> {
    Config::ensure_dirs()?;
    let config = Config::load()?;

    let default_user = config
        .current_user
        .clone()
        .unwrap_or_else(|| seed_users()[0].email.clone());
    let store = JsonStore::open(&config.store_path()?, seed_users(), &default_user).await?;
    let service = TaskService::new(store, PatternExtractor);

    match cli.command {
        Command::Add { text } => {
            let task = service.create_from_command(&text.join(" ")).await?;
            println!("created {}", describe(&task));
        }
        Command::New {
            assignee,
            priority,
            text,
        } => {
            let task = service
                .create_task(NewTaskInput::TopLevel {
                    text: text.join(" "),
                    assignee_email: assignee,
                    priority: priority.unwrap_or_default(),
                })
                .await?;
            println!("created {}", describe(&task));
        }
        Command::Sub {
            parent,
            assignee,
            priority,
            text,
        } => {
            let parent_id = resolve_id(service.store(), &parent).await?;
            let task = service
                .create_task(NewTaskInput::Subtask {
                    text: text.join(" "),
                    parent_id,
                    assignee_email: assignee,
                    priority,
                })
                .await?;
            println!("created subtask {}", describe(&task));
        }
        Command::List {
            assignee,
            priority,
            overdue,
        } => {
            let tasks = service.store().list_tasks().await?;
            let filter = FilterSpec {
                assignee,
                priority,
                overdue_only: overdue,
            };
            let today = chrono::Local::now().date_naive();
            let view = views::admin_view(&tasks, &filter, today);
            if view.is_empty() {
                println!("no tasks");
            }
            for task in view {
                print_task(task, &tasks);
            }
        }
        Command::Dashboard => {
            let me = service.store().current_user().await?;
            let tasks = service.store().list_tasks().await?;
            let today = chrono::Local::now().date_naive();
            let dashboard = views::user_view(&tasks, &me.email, today);

            println!(
                "{} | incomplete: {}, overdue: {}",
                me.display_name,
                dashboard.incomplete_count(),
                dashboard.overdue_count
            );
            for (label, bucket) in [
                ("TODO", &dashboard.todo),
                ("REPORTED", &dashboard.reported),
                ("DONE", &dashboard.done),
            ] {
                println!("\n{label} ({})", bucket.len());
                for task in bucket.iter().copied() {
                    print_task(task, &tasks);
                }
            }
        }
        Command::Report { id } => {
            let task_id = resolve_id(service.store(), &id).await?;
            let actor = service.store().current_user().await?;
            let task = service.report(task_id, &actor).await?;
            println!("reported {}", describe(&task));
        }
        Command::Approve { id } => {
            let task_id = resolve_id(service.store(), &id).await?;
            let actor = service.store().current_user().await?;
            let task = service.approve(task_id, &actor).await?;
            println!("approved {}", describe(&task));
        }
        Command::Sendback { id } => {
            let task_id = resolve_id(service.store(), &id).await?;
            let actor = service.store().current_user().await?;
            let task = service.send_back(task_id, &actor).await?;
            println!("sent back {}", describe(&task));
        }
        Command::Toggle { id } => {
            let task_id = resolve_id(service.store(), &id).await?;
            let actor = service.store().current_user().await?;
            let task = service.toggle_subtask(task_id, &actor).await?;
            println!("toggled {}", describe(&task));
        }
        Command::Edit {
            id,
            title,
            assignee,
            due,
            priority,
        } => {
            let task_id = resolve_id(service.store(), &id).await?;
            let actor = service.store().current_user().await?;
            let due_date = match due {
                Some(raw) => Some(kanri::dates::resolve_month_day(
                    &raw,
                    chrono::Local::now().date_naive(),
                )?),
                None => None,
            };
            let task = service
                .edit_task(
                    task_id,
                    TaskEdit {
                        title,
                        assignee_email: assignee,
                        due_date,
                        priority,
                    },
                    &actor,
                )
                .await?;
            println!("updated {}", describe(&task));
        }
        Command::Delete { id } => {
            let task_id = resolve_id(service.store(), &id).await?;
            let actor = service.store().current_user().await?;
            service.delete_task(task_id, &actor).await?;
            println!("deleted {}", task_id.short());
        }
        Command::Share { id } => {
            let task_id = resolve_id(service.store(), &id).await?;
            let tasks = service.store().list_tasks().await?;
            let task = tasks
                .iter()
                .find(|t| t.id == task_id)
                .ok_or(Error::TaskNotFound(task_id))?;
            println!("{}", share::share_message(task));
            println!("\ncalendar: {}", share::google_calendar_url(task));
        }
        Command::Users => {
            for user in service.store().list_users().await? {
                println!("{}  {}  {}", user.email, user.display_name, user.role);
            }
        }
        Command::User { email } => {
            let user = service.store().set_current_user(&email).await?;
            let mut config = Config::load()?;
            config.current_user = Some(user.email.clone());
            config.save()?;
            klog!("switched user to {}", user.email);
            println!("acting as {} ({})", user.display_name, user.email);
        }
    }

    Ok(())
}

/// Demo team seeded into a fresh store.
fn seed_users() -> Vec<User> {
    vec![
        User::new("boss@example.com", "社長", UserRole::Admin),
        User::new("tanaka@example.com", "田中", UserRole::User),
        User::new("suzuki@example.com", "鈴木", UserRole::User),
        User::new("sato@example.com", "佐藤", UserRole::User),
    ]
}

/// Resolve a task id given in full or as a unique short prefix.
async fn resolve_id(store: &JsonStore, input: &str) -> Result<TaskId> {
    if let Ok(id) = input.parse::<TaskId>() {
        return Ok(id);
    }

    let tasks = store.list_tasks().await?;
    let matches: Vec<TaskId> = tasks
        .iter()
        .map(|t| t.id)
        .filter(|id| id.to_string().starts_with(input))
        .collect();
    match matches.as_slice() {
        [id] => Ok(*id),
        [] => Err(Error::Validation(format!("no task matches id {input:?}"))),
        _ => Err(Error::Validation(format!(
            "id prefix {input:?} is ambiguous"
        ))),
    }
}

fn describe(task: &Task) -> String {
    format!(
        "[{}] {} ({}, due {}, {}, {})",
        task.id.short(),
        task.title,
        task.assignee_name,
        format_date(task.due_date),
        task.priority,
        task.status
    )
}

fn print_task(task: &Task, all_tasks: &[Task]) {
    let (completed, total) = views::subtask_progress(all_tasks, task.id);
    let progress = if total > 0 {
        format!("  [{completed}/{total}]")
    } else {
        String::new()
    };
    println!("{}{}", describe(task), progress);
    for subtask in views::subtasks_of(all_tasks, task.id) {
        let mark = if subtask.is_done() { "x" } else { " " };
        println!(
            "    [{mark}] [{}] {} ({})",
            subtask.id.short(),
            subtask.title,
            subtask.status
        );
    }
}
