//! Interactive REPL (Read-Eval-Print Loop) for Flowdeck.

use std::path::{Path, PathBuf};

use chrono::Utc;
use rustyline::completion::{Completer, Pair};
use rustyline::error::ReadlineError;
use rustyline::highlight::Highlighter;
use rustyline::hint::Hinter;
use rustyline::history::DefaultHistory;
use rustyline::validate::Validator;
use rustyline::{Context, Editor, Helper, Result as RlResult};
use tokio::runtime::Handle;
use tokio::sync::broadcast::error::RecvError;
use tracing::{debug, info};

use flowdeck_core::{config, Dashboard, SuggestionCoverage, TaskFilter, TaskView};
use flowdeck_models::{TaskStatus, TaskUpdate};
use flowdeck_runtime::{DashboardRuntime, RuntimeEvent};

use crate::render;

/// Help information for a command.
pub struct CommandHelp {
    /// Command name (e.g., "tasks").
    pub name: &'static str,
    /// Command aliases (e.g., ["t"]).
    pub aliases: &'static [&'static str],
    /// Brief one-line description.
    pub brief: &'static str,
    /// Detailed description.
    pub description: &'static str,
    /// Usage syntax.
    pub usage: &'static str,
    /// Examples with descriptions.
    pub examples: &'static [(&'static str, &'static str)],
}

/// Static help entries for all commands.
static COMMAND_HELP: &[CommandHelp] = &[
    CommandHelp {
        name: "dashboard",
        aliases: &["d"],
        brief: "Show stats, sync activity and deadlines",
        description: "Shows connected services, open high-priority work, completed and overdue counts, \
                      the last sync of each connected service and the next four deadlines.",
        usage: "/dashboard",
        examples: &[
            ("/dashboard", "Show the dashboard"),
            ("/d", "Same as /dashboard"),
        ],
    },
    CommandHelp {
        name: "tasks",
        aliases: &["t", "ls"],
        brief: "List tasks",
        description: "Lists tasks through a preset view and an optional search. \
                      Views: all, high, pending, completed. Search matches title or description, \
                      ignoring case. The last view used is remembered.",
        usage: "/tasks [view] [search...]",
        examples: &[
            ("/tasks", "List with the last used view"),
            ("/tasks high", "High priority tasks"),
            ("/tasks all review", "Every task mentioning 'review'"),
        ],
    },
    CommandHelp {
        name: "status",
        aliases: &["s"],
        brief: "Change a task's status",
        description: "Sets the status of a task. Statuses: pending, in-progress, completed.",
        usage: "/status <task-id> <status>",
        examples: &[
            ("/status 2 completed", "Mark task 2 as completed"),
            ("/status 4 in-progress", "Start task 4"),
        ],
    },
    CommandHelp {
        name: "insights",
        aliases: &["i"],
        brief: "Show insights and task suggestions",
        description: "Shows performance insights, automation opportunities and the suggestions \
                      attached to tasks.",
        usage: "/insights",
        examples: &[("/insights", "Show insights")],
    },
    CommandHelp {
        name: "generate",
        aliases: &["g"],
        brief: "Suggest next steps for tasks without one",
        description: "Attaches a suggestion to every task that has none. Existing suggestions \
                      are never replaced, so running it twice changes nothing.",
        usage: "/generate",
        examples: &[("/generate", "Fill in missing suggestions")],
    },
    CommandHelp {
        name: "integrations",
        aliases: &["int"],
        brief: "List integrations",
        description: "Lists connected and available integrations, plus those coming soon.",
        usage: "/integrations",
        examples: &[("/integrations", "List integrations")],
    },
    CommandHelp {
        name: "connect",
        aliases: &["c"],
        brief: "Connect an integration",
        description: "Connects an available integration by id. Connecting takes a moment.",
        usage: "/connect <integration-id>",
        examples: &[("/connect notion", "Connect Notion")],
    },
    CommandHelp {
        name: "disconnect",
        aliases: &["dc"],
        brief: "Disconnect an integration",
        description: "Disconnects an integration by id and clears its last sync.",
        usage: "/disconnect <integration-id>",
        examples: &[("/disconnect slack", "Disconnect Slack")],
    },
    CommandHelp {
        name: "help",
        aliases: &["h", "?"],
        brief: "Show help",
        description: "Shows help for all commands or detailed help for a specific command.",
        usage: "/help [command]",
        examples: &[
            ("/help", "Show all commands"),
            ("/help status", "Show detailed help for /status"),
            ("/help c", "Also works with aliases"),
        ],
    },
    CommandHelp {
        name: "quit",
        aliases: &["q", "exit"],
        brief: "Exit the REPL",
        description: "Exits the Flowdeck REPL. History is saved automatically.",
        usage: "/quit",
        examples: &[("/quit", "Exit the REPL"), ("/q", "Same as /quit")],
    },
];

/// Tab completion for slash commands.
struct CommandCompleter;

impl CommandCompleter {
    const COMMANDS: &'static [&'static str] = &[
        "/connect",
        "/dashboard",
        "/disconnect",
        "/generate",
        "/help",
        "/insights",
        "/integrations",
        "/quit",
        "/status",
        "/tasks",
    ];
}

impl Completer for CommandCompleter {
    type Candidate = Pair;

    fn complete(
        &self,
        line: &str,
        pos: usize,
        _ctx: &Context<'_>,
    ) -> rustyline::Result<(usize, Vec<Pair>)> {
        if !line.starts_with('/') {
            return Ok((0, vec![]));
        }

        let prefix = &line[..pos];
        let matches: Vec<Pair> = Self::COMMANDS
            .iter()
            .filter(|cmd| cmd.starts_with(prefix))
            .map(|cmd| Pair {
                display: cmd.to_string(),
                replacement: cmd.to_string(),
            })
            .collect();

        Ok((0, matches))
    }
}

impl Hinter for CommandCompleter {
    type Hint = String;
}

impl Highlighter for CommandCompleter {}
impl Validator for CommandCompleter {}
impl Helper for CommandCompleter {}

/// Slash commands available in the REPL.
#[derive(Debug, Clone, PartialEq)]
pub enum ReplCommand {
    /// Show the dashboard
    Dashboard,
    /// List tasks, optionally switching view and searching
    Tasks {
        view: Option<TaskView>,
        search: Option<String>,
    },
    /// Change a task's status
    Status { task: String, status: TaskStatus },
    /// Show insights
    Insights,
    /// Generate suggestions
    Generate,
    /// List integrations
    Integrations,
    /// Connect an integration
    Connect(String),
    /// Disconnect an integration
    Disconnect(String),
    /// Show help (optionally for a specific command)
    Help(Option<String>),
    /// Quit the REPL
    Quit,
    /// A known command with bad arguments
    Usage(String),
    /// Unknown command
    Unknown(String),
    /// Plain text (not a command)
    Text(String),
}

impl ReplCommand {
    /// Parses input into a REPL command.
    pub fn parse(input: &str) -> Self {
        let input = input.trim();

        if input.is_empty() {
            return ReplCommand::Text(String::new());
        }

        if let Some(stripped) = input.strip_prefix('/') {
            let parts: Vec<&str> = stripped.splitn(2, ' ').collect();
            let cmd = parts[0].to_lowercase();
            let arg = parts
                .get(1)
                .map(|s| s.trim().to_string())
                .filter(|s| !s.is_empty());

            match cmd.as_str() {
                "dashboard" | "d" => ReplCommand::Dashboard,
                "tasks" | "t" | "ls" => Self::parse_tasks(arg.as_deref()),
                "status" | "s" => Self::parse_status(arg.as_deref()),
                "insights" | "i" => ReplCommand::Insights,
                "generate" | "g" => ReplCommand::Generate,
                "integrations" | "int" => ReplCommand::Integrations,
                "connect" | "c" => arg
                    .map(|id| ReplCommand::Connect(id.to_lowercase()))
                    .unwrap_or(ReplCommand::Usage("/connect <integration-id>".to_string())),
                "disconnect" | "dc" => arg
                    .map(|id| ReplCommand::Disconnect(id.to_lowercase()))
                    .unwrap_or(ReplCommand::Usage("/disconnect <integration-id>".to_string())),
                "help" | "h" | "?" => ReplCommand::Help(arg),
                "quit" | "q" | "exit" => ReplCommand::Quit,
                _ => ReplCommand::Unknown(cmd),
            }
        } else {
            Self::parse_conversational(input)
        }
    }

    /// Parse conversational commands (natural language alternatives to slash commands).
    fn parse_conversational(input: &str) -> Self {
        let lower = input.to_lowercase();

        if let Some(target) = lower.strip_prefix("connect ") {
            let target = target.trim();
            if !target.is_empty() {
                return ReplCommand::Connect(target.to_string());
            }
        }
        if let Some(target) = lower.strip_prefix("disconnect ") {
            let target = target.trim();
            if !target.is_empty() {
                return ReplCommand::Disconnect(target.to_string());
            }
        }

        match lower.as_str() {
            "dashboard" | "show dashboard" => ReplCommand::Dashboard,
            "tasks" | "list tasks" | "show tasks" => ReplCommand::Tasks {
                view: None,
                search: None,
            },
            "insights" | "show insights" => ReplCommand::Insights,
            "integrations" | "show integrations" => ReplCommand::Integrations,
            "help" | "show help" | "?" => ReplCommand::Help(None),
            "quit" | "exit" | "bye" => ReplCommand::Quit,
            _ => ReplCommand::Text(input.to_string()),
        }
    }

    /// `/tasks [view] [search...]`; a first word that is not a view starts
    /// the search.
    fn parse_tasks(arg: Option<&str>) -> Self {
        let Some(arg) = arg else {
            return ReplCommand::Tasks {
                view: None,
                search: None,
            };
        };

        let (first, rest) = match arg.split_once(' ') {
            Some((first, rest)) => (first, Some(rest.trim())),
            None => (arg, None),
        };

        match first.parse::<TaskView>() {
            Ok(view) => ReplCommand::Tasks {
                view: Some(view),
                search: rest.filter(|s| !s.is_empty()).map(String::from),
            },
            Err(_) => ReplCommand::Tasks {
                view: None,
                search: Some(arg.to_string()),
            },
        }
    }

    fn parse_status(arg: Option<&str>) -> Self {
        let usage =
            || ReplCommand::Usage("/status <task-id> <pending|in-progress|completed>".to_string());

        let parts: Vec<&str> = arg.unwrap_or_default().split_whitespace().collect();
        let [task, status] = parts.as_slice() else {
            return usage();
        };

        match status.parse::<TaskStatus>() {
            Ok(status) => ReplCommand::Status {
                task: task.to_string(),
                status,
            },
            Err(e) => ReplCommand::Usage(e.to_string()),
        }
    }
}

/// REPL state
pub struct Repl<'a> {
    editor: Editor<CommandCompleter, DefaultHistory>,
    runtime: &'a DashboardRuntime,
    handle: Handle,
    history_path: Option<PathBuf>,
    /// View used by a bare `/tasks`.
    view: TaskView,
}

impl<'a> Repl<'a> {
    /// Creates a new REPL over a started runtime.
    ///
    /// `handle` drives the runtime's async operations from the blocking
    /// readline loop.
    pub fn new(runtime: &'a DashboardRuntime, handle: Handle, state_dir: &Path) -> RlResult<Self> {
        let rl_config = rustyline::Config::builder()
            .completion_type(rustyline::CompletionType::List)
            .build();
        let mut editor = Editor::with_config(rl_config)?;
        editor.set_helper(Some(CommandCompleter));

        let history_path = config::history_file(state_dir);
        if history_path.exists() {
            let _ = editor.load_history(&history_path);
        }

        Ok(Self {
            editor,
            runtime,
            handle,
            history_path: Some(history_path),
            view: TaskView::All,
        })
    }

    /// Runs the REPL loop.
    pub fn run(&mut self) -> RlResult<()> {
        println!("Flowdeck v{}", env!("CARGO_PKG_VERSION"));
        self.wait_for_loading();
        println!("Type /help for commands, /quit to exit");
        println!();

        loop {
            let prompt = self.prompt();

            match self.editor.readline(&prompt) {
                Ok(line) => {
                    self.editor.add_history_entry(&line)?;

                    let cmd = ReplCommand::parse(&line);
                    debug!(?cmd, "Parsed command");

                    match self.handle_command(cmd) {
                        Ok(true) => break,
                        Ok(false) => {}
                        Err(e) => eprintln!("Error: {}", e),
                    }
                }
                Err(ReadlineError::Interrupted) => {
                    println!("^C");
                }
                Err(ReadlineError::Eof) => {
                    println!("^D");
                    break;
                }
                Err(err) => {
                    eprintln!("Error: {:?}", err);
                    break;
                }
            }
        }

        if let Some(path) = &self.history_path {
            if let Some(parent) = path.parent() {
                let _ = std::fs::create_dir_all(parent);
            }
            let _ = self.editor.save_history(path);
        }

        println!("Goodbye!");
        Ok(())
    }

    /// Blocks until the runtime's loading period is over.
    fn wait_for_loading(&self) {
        // subscribe first so the event cannot slip past the flag check
        let mut events = self.runtime.subscribe();
        if !self.runtime.is_loading() {
            return;
        }

        println!("Initializing Flowdeck...");
        println!("Connecting to your productivity tools");

        self.handle.block_on(async {
            loop {
                match events.recv().await {
                    Ok(RuntimeEvent::LoadingFinished) | Err(RecvError::Closed) => break,
                    Ok(_) | Err(RecvError::Lagged(_)) => {}
                }
            }
        });
    }

    /// Returns the prompt string.
    fn prompt(&self) -> String {
        if self.runtime.is_analyzing() {
            "flowdeck [analyzing]> ".to_string()
        } else {
            "flowdeck> ".to_string()
        }
    }

    /// Handles a REPL command. Returns Ok(true) if should quit.
    fn handle_command(&mut self, cmd: ReplCommand) -> Result<bool, Box<dyn std::error::Error>> {
        let store = self.runtime.try_store()?;

        match cmd {
            ReplCommand::Dashboard => {
                let snapshot = store.snapshot();
                let view = Dashboard::build(&snapshot.integrations, &snapshot.tasks, Utc::now());
                print!("{}", render::dashboard(&view));
                Ok(false)
            }

            ReplCommand::Tasks { view, search } => {
                if let Some(view) = view {
                    self.view = view;
                }
                let mut filter = TaskFilter::new().with_view(self.view);
                if let Some(search) = search {
                    filter = filter.with_search(search);
                }

                let tasks = store.tasks();
                let shown = filter.apply(&tasks);
                print!("{}", render::task_table(&filter, &shown, tasks.len()));
                Ok(false)
            }

            ReplCommand::Status { task, status } => {
                let tasks = store.try_update_task(&task, &TaskUpdate::status(status))?;
                if let Some(updated) = tasks.iter().find(|t| t.id == task.as_str()) {
                    info!(task = %updated.id, status = %status, "task status changed");
                    println!("{} -> {}", updated.title, status);
                }
                Ok(false)
            }

            ReplCommand::Insights => {
                if self.runtime.is_analyzing() {
                    println!("Analyzing your productivity patterns...");
                    println!();
                }
                print!("{}", render::insights(&store.tasks()));
                Ok(false)
            }

            ReplCommand::Generate => {
                if self.runtime.is_analyzing() {
                    println!("Analysis already running.");
                    return Ok(false);
                }

                let before = SuggestionCoverage::of(&store.tasks());
                let tasks = {
                    // the analysis timer is spawned onto the runtime
                    let _guard = self.handle.enter();
                    self.runtime.generate_insights()?
                };
                let after = SuggestionCoverage::of(&tasks);

                println!(
                    "Generated {} suggestion(s); {}/{} tasks covered.",
                    after.with_suggestion.saturating_sub(before.with_suggestion),
                    after.with_suggestion,
                    after.total
                );
                Ok(false)
            }

            ReplCommand::Integrations => {
                print!("{}", render::integrations(&store.integrations()));
                Ok(false)
            }

            ReplCommand::Connect(id) => {
                let Some(integration) = store.integration(&id) else {
                    println!("Unknown integration: {}. Type /integrations to list them.", id);
                    return Ok(false);
                };
                if integration.connected {
                    println!("{} is already connected.", integration.name);
                    return Ok(false);
                }

                println!("Connecting {}...", integration.name);
                self.handle.block_on(self.runtime.connect(id.as_str()))?;
                println!("Connected {}.", integration.name);
                Ok(false)
            }

            ReplCommand::Disconnect(id) => {
                let Some(integration) = store.integration(&id) else {
                    println!("Unknown integration: {}. Type /integrations to list them.", id);
                    return Ok(false);
                };
                if !integration.connected {
                    println!("{} is not connected.", integration.name);
                    return Ok(false);
                }

                self.runtime.disconnect(id.as_str())?;
                println!("Disconnected {}.", integration.name);
                Ok(false)
            }

            ReplCommand::Help(topic) => {
                print_help(topic.as_deref());
                Ok(false)
            }

            ReplCommand::Quit => Ok(true),

            ReplCommand::Usage(usage) => {
                println!("Usage: {}", usage);
                Ok(false)
            }

            ReplCommand::Unknown(cmd) => {
                println!(
                    "Unknown command: /{}. Type /help for available commands.",
                    cmd
                );
                Ok(false)
            }

            ReplCommand::Text(text) => {
                if !text.is_empty() {
                    println!("Type /help for available commands.");
                }
                Ok(false)
            }
        }
    }
}

/// Finds help for a command by name or alias.
fn find_command_help(name: &str) -> Option<&'static CommandHelp> {
    let name_lower = name.trim_start_matches('/').to_lowercase();
    COMMAND_HELP
        .iter()
        .find(|h| h.name == name_lower || h.aliases.contains(&name_lower.as_str()))
}

/// Prints help information.
fn print_help(topic: Option<&str>) {
    match topic {
        Some(cmd) => {
            if let Some(help) = find_command_help(cmd) {
                println!("/{} - {}", help.name, help.brief);
                if !help.aliases.is_empty() {
                    println!("Aliases: {}", help.aliases.join(", "));
                }
                println!();
                println!("{}", help.description);
                println!();
                println!("Usage:");
                for line in help.usage.lines() {
                    println!("  {}", line);
                }
                if !help.examples.is_empty() {
                    println!();
                    println!("Examples:");
                    for (example, desc) in help.examples {
                        println!("  {}  # {}", example, desc);
                    }
                }
            } else {
                println!(
                    "Unknown command: {}. Type /help for available commands.",
                    cmd
                );
            }
        }
        None => {
            println!("Flowdeck REPL - productivity dashboard");
            println!();
            println!("COMMANDS:");
            for help in COMMAND_HELP {
                let mut names = format!("/{}", help.name);
                for alias in help.aliases {
                    names.push_str(", /");
                    names.push_str(alias);
                }
                println!("    {:<40} {}", names, help.brief);
            }
            println!();
            println!("CONVERSATIONAL:");
            println!("    dashboard, tasks, insights, integrations");
            println!("    connect <id>, disconnect <id>");
            println!("    help, quit, exit, bye");
            println!();
            println!("CLI OPTIONS:");
            println!("    -v, --verbose                            Increase verbosity (-v, -vv, -vvv)");
            println!("    -s, --state-dir <path>                   Path to state directory");
            println!("    --refresh-secs <n>                       Sync refresh interval");
            println!("    --no-delay                               Skip simulated delays");
            println!();
            println!("Type /help <command> for detailed help on a specific command.");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_dashboard() {
        assert_eq!(ReplCommand::parse("/dashboard"), ReplCommand::Dashboard);
        assert_eq!(ReplCommand::parse("/d"), ReplCommand::Dashboard);
        assert_eq!(ReplCommand::parse("/DASHBOARD"), ReplCommand::Dashboard);
    }

    #[test]
    fn test_parse_tasks_bare() {
        assert_eq!(
            ReplCommand::parse("/tasks"),
            ReplCommand::Tasks {
                view: None,
                search: None
            }
        );
    }

    #[test]
    fn test_parse_tasks_view_and_search() {
        assert_eq!(
            ReplCommand::parse("/tasks high auth system"),
            ReplCommand::Tasks {
                view: Some(TaskView::HighPriority),
                search: Some("auth system".to_string())
            }
        );
        assert_eq!(
            ReplCommand::parse("/t completed"),
            ReplCommand::Tasks {
                view: Some(TaskView::Completed),
                search: None
            }
        );
    }

    #[test]
    fn test_parse_tasks_search_only() {
        assert_eq!(
            ReplCommand::parse("/tasks review pr"),
            ReplCommand::Tasks {
                view: None,
                search: Some("review pr".to_string())
            }
        );
    }

    #[test]
    fn test_parse_status() {
        assert_eq!(
            ReplCommand::parse("/status 2 completed"),
            ReplCommand::Status {
                task: "2".to_string(),
                status: TaskStatus::Completed
            }
        );
        assert_eq!(
            ReplCommand::parse("/s 4 in-progress"),
            ReplCommand::Status {
                task: "4".to_string(),
                status: TaskStatus::InProgress
            }
        );
    }

    #[test]
    fn test_parse_status_bad_args() {
        assert!(matches!(ReplCommand::parse("/status"), ReplCommand::Usage(_)));
        assert!(matches!(ReplCommand::parse("/status 2"), ReplCommand::Usage(_)));
        assert!(matches!(
            ReplCommand::parse("/status 2 someday"),
            ReplCommand::Usage(_)
        ));
        assert!(matches!(
            ReplCommand::parse("/status 2 completed now"),
            ReplCommand::Usage(_)
        ));
    }

    #[test]
    fn test_parse_connect_disconnect() {
        assert_eq!(
            ReplCommand::parse("/connect notion"),
            ReplCommand::Connect("notion".to_string())
        );
        assert_eq!(
            ReplCommand::parse("/dc slack"),
            ReplCommand::Disconnect("slack".to_string())
        );
        assert_eq!(
            ReplCommand::parse("/connect Notion"),
            ReplCommand::Connect("notion".to_string())
        );
        assert_eq!(
            ReplCommand::parse("/dc GitHub"),
            ReplCommand::Disconnect("github".to_string())
        );
        assert!(matches!(ReplCommand::parse("/connect"), ReplCommand::Usage(_)));
        assert!(matches!(ReplCommand::parse("/disconnect   "), ReplCommand::Usage(_)));
    }

    #[test]
    fn test_parse_insights_and_generate() {
        assert_eq!(ReplCommand::parse("/insights"), ReplCommand::Insights);
        assert_eq!(ReplCommand::parse("/g"), ReplCommand::Generate);
        assert_eq!(ReplCommand::parse("/int"), ReplCommand::Integrations);
    }

    #[test]
    fn test_parse_quit() {
        assert_eq!(ReplCommand::parse("/quit"), ReplCommand::Quit);
        assert_eq!(ReplCommand::parse("/q"), ReplCommand::Quit);
        assert_eq!(ReplCommand::parse("/exit"), ReplCommand::Quit);
    }

    #[test]
    fn test_parse_help() {
        assert_eq!(ReplCommand::parse("/help"), ReplCommand::Help(None));
        assert_eq!(ReplCommand::parse("/?"), ReplCommand::Help(None));
        assert_eq!(
            ReplCommand::parse("/help status"),
            ReplCommand::Help(Some("status".to_string()))
        );
    }

    #[test]
    fn test_parse_text_and_empty() {
        assert_eq!(
            ReplCommand::parse("what should I do next"),
            ReplCommand::Text("what should I do next".to_string())
        );
        assert_eq!(ReplCommand::parse("   "), ReplCommand::Text(String::new()));
    }

    #[test]
    fn test_parse_unknown() {
        assert_eq!(
            ReplCommand::parse("/sessions"),
            ReplCommand::Unknown("sessions".to_string())
        );
    }

    #[test]
    fn test_conversational() {
        assert_eq!(ReplCommand::parse("Dashboard"), ReplCommand::Dashboard);
        assert_eq!(
            ReplCommand::parse("connect Notion"),
            ReplCommand::Connect("notion".to_string())
        );
        assert_eq!(
            ReplCommand::parse("disconnect github"),
            ReplCommand::Disconnect("github".to_string())
        );
        assert_eq!(ReplCommand::parse("bye"), ReplCommand::Quit);
        assert_eq!(ReplCommand::parse("show help"), ReplCommand::Help(None));
    }

    #[test]
    fn test_find_command_help() {
        assert_eq!(find_command_help("status").unwrap().name, "status");
        assert_eq!(find_command_help("c").unwrap().name, "connect");
        assert_eq!(find_command_help("/TASKS").unwrap().name, "tasks");
        assert!(find_command_help("telegram").is_none());
    }

    #[test]
    fn test_every_completion_has_help() {
        for cmd in CommandCompleter::COMMANDS {
            assert!(find_command_help(cmd).is_some(), "{}", cmd);
        }
    }
}
