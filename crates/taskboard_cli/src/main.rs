use clap::error::ErrorKind;
use clap::{CommandFactory, Parser};
use std::collections::HashMap;
use std::io::{self, BufRead, Write};
use taskboard_cli::cli::{
    Cli, Command, DraftField, effective_config, expand_alias, split_command_line,
};
use taskboard_cli::render;
use taskboard_cli::terminal::Terminal;
use taskboard_core::board::TaskBoard;
use taskboard_core::config::{Config, load_config_with_fallback, palette_for_theme};
use taskboard_core::error::AppError;
use taskboard_core::logging::init_logging;
use taskboard_core::model::Task;
use taskboard_core::notify::{APP_NAME, AlwaysConfirm, Confirm, Notice, desktop_notifier};
use taskboard_core::session::{EditSession, TaskForm};
use taskboard_core::storage::FileStore;
use tracing::warn;

const BIN_NAME: &str = "taskboard";

const SESSION_HELP: &str = "\
Interactive commands:
  edit <ID>            Open a task for editing
  new                  Start a fresh task form
  set <FIELD> <VALUE>  Change title, description, priority or status of the open draft
  draft                Show the open draft
  save                 Save the task being edited
  submit               Add the task form as a new task
  cancel               Discard the edit in progress
  exit | quit          Leave";

struct App {
    board: TaskBoard<FileStore>,
    config: Config,
    form: TaskForm,
    session: EditSession,
}

impl App {
    fn open() -> Result<Self, AppError> {
        let loaded = load_config_with_fallback();
        if let Some(err) = loaded.error.as_ref() {
            warn!(error = %err, "falling back to default configuration");
        }

        let store = FileStore::from_env()?;
        Ok(Self {
            board: TaskBoard::open(store),
            config: loaded.config,
            form: TaskForm::new(),
            session: EditSession::new(),
        })
    }
}

fn normalize_parse_error(err: clap::Error) -> AppError {
    let rendered = err.to_string();
    let first_line = rendered.lines().next().unwrap_or("invalid command").trim();
    let message = first_line
        .strip_prefix("error: ")
        .unwrap_or(first_line)
        .to_string();
    AppError::invalid_input(message)
}

fn is_display_request(err: &clap::Error) -> bool {
    matches!(
        err.kind(),
        ErrorKind::DisplayHelp
            | ErrorKind::DisplayVersion
            | ErrorKind::DisplayHelpOnMissingArgumentOrSubcommand
    )
}

fn build_argv(
    args: Vec<String>,
    aliases: &HashMap<String, String>,
) -> Result<Vec<String>, AppError> {
    let mut argv = vec![BIN_NAME.to_string()];
    argv.extend(expand_alias(args, aliases)?);
    Ok(argv)
}

fn print_help() {
    let mut cmd = Cli::command();
    let help = cmd.render_help();
    println!("{help}");
    println!("{SESSION_HELP}");
}

fn announce(config: &Config, body: &str) {
    let notifier = desktop_notifier(config.notifications);
    if let Err(err) = notifier.notify(&Notice::new(APP_NAME, body)) {
        warn!(error = %err, "failed to send desktop notification");
    }
}

fn print_task(task: &Task, verb: &str, json: bool) -> Result<(), AppError> {
    if json {
        println!("{}", render::task_json(task)?);
    } else {
        println!("{verb} task: {} ({})", task.title, task.id);
    }
    Ok(())
}

fn print_missing(id: &str, json: bool) {
    if json {
        println!("null");
    } else {
        println!("No task with id {id}; nothing changed.");
    }
}

fn print_cleared(count: usize, message: &str, json: bool) {
    if json {
        println!("{}", serde_json::json!({ "cleared": count }));
    } else {
        println!("{message}");
    }
}

fn run_command(app: &mut App, cli: Cli, confirm: &dyn Confirm) -> Result<(), AppError> {
    let config = effective_config(&app.config, &cli.config_override)?;
    let palette = palette_for_theme(config.theme.as_deref());

    match cli.command {
        Command::Add {
            title,
            description,
            priority,
            status,
        } => {
            let mut form = TaskForm::new();
            form.set_title(title.unwrap_or_default());
            form.set_description(description);
            form.set_priority(priority);
            form.set_status(status);

            let task = form.submit(&mut app.board)?;
            announce(&config, &format!("Task added: {}", task.title));
            print_task(&task, "Added", cli.json)?;
        }
        command @ Command::Edit { .. } if command.is_bare_edit() => {
            return Err(AppError::invalid_input(
                "nothing to change; pass --title, --description, --priority or --status",
            ));
        }
        Command::Edit {
            id,
            title,
            description,
            priority,
            status,
        } => {
            let Some(task) = app.board.get(&id) else {
                print_missing(&id, cli.json);
                return Ok(());
            };

            let mut session = EditSession::new();
            session.begin(task);
            session.edit(|draft| {
                if let Some(title) = title {
                    draft.title = title;
                }
                if let Some(description) = description {
                    draft.description = description;
                }
                if priority.is_some() {
                    draft.priority = priority;
                }
                if status.is_some() {
                    draft.status = status;
                }
            });
            session.save(&mut app.board)?;

            if let Some(task) = app.board.get(&id) {
                print_task(task, "Updated", cli.json)?;
            }
        }
        Command::Delete { id, yes } => {
            let Some(task) = app.board.get(&id).cloned() else {
                print_missing(&id, cli.json);
                return Ok(());
            };

            let removed = if yes {
                app.board.delete_confirmed(&id, &AlwaysConfirm)
            } else {
                app.board.delete_confirmed(&id, confirm)
            };

            if removed {
                if app.session.editing_id() == Some(id.as_str()) {
                    app.session.cancel();
                }
                print_task(&task, "Deleted", cli.json)?;
            } else if cli.json {
                println!("null");
            } else {
                println!("Delete cancelled.");
            }
        }
        Command::Clear { yes } => {
            if app.board.is_empty() {
                print_cleared(0, "No tasks to clear.", cli.json);
                return Ok(());
            }

            let count = app.board.len();
            let cleared = if yes {
                app.board.clear_all_confirmed(&AlwaysConfirm)
            } else {
                app.board.clear_all_confirmed(confirm)
            };

            if cleared {
                app.session.cancel();
                print_cleared(count, &format!("Cleared {count} tasks."), cli.json);
            } else {
                print_cleared(0, "Clear cancelled.", cli.json);
            }
        }
        Command::List => {
            let view = app.board.sorted_view();
            if cli.json {
                println!("{}", render::tasks_json(&view)?);
            } else {
                println!("{}", render::render_table(&view, &palette));
            }
        }
        Command::Show { id } => {
            let task = app
                .board
                .get(&id)
                .ok_or_else(|| AppError::invalid_input("task not found"))?;
            if cli.json {
                println!("{}", render::task_json(task)?);
            } else {
                println!("{}", render::render_detail(task, &palette));
            }
        }
    }

    Ok(())
}

fn begin_edit(app: &mut App, id: &str) {
    match app.board.get(id) {
        Some(task) => {
            app.session.begin(task);
            println!("Editing task: {} ({})", task.title, task.id);
            println!("Use `set <field> <value>`, then `save` or `cancel`.");
        }
        None => print_missing(id, false),
    }
}

/// Handles the interactive-only form and edit commands. Returns `None` when
/// `args` is not one of them.
fn run_session_command(app: &mut App, args: &[String]) -> Option<Result<(), AppError>> {
    let (name, rest) = args.split_first()?;

    let result = match name.as_str() {
        "new" => {
            if let Some(id) = app.session.cancel() {
                println!("Edit of {id} discarded.");
            }
            app.form.reset();
            println!("New task form. Use `set <field> <value>`, then `submit`.");
            Ok(())
        }
        "set" => set_field(app, rest),
        "draft" => {
            match app.session.draft() {
                Some(draft) => println!("{}", render::render_draft(draft)),
                None => println!("{}", render::render_draft(app.form.draft())),
            }
            Ok(())
        }
        "save" => match app.session.save(&mut app.board) {
            Ok(Some(id)) => {
                if let Some(task) = app.board.get(&id) {
                    println!("Updated task: {} ({})", task.title, task.id);
                } else {
                    print_missing(&id, false);
                }
                Ok(())
            }
            Ok(None) => Err(AppError::invalid_input("no task is being edited")),
            Err(err) => Err(err.into()),
        },
        "submit" => match app.form.submit(&mut app.board) {
            Ok(task) => {
                announce(&app.config, &format!("Task added: {}", task.title));
                println!("Added task: {} ({})", task.title, task.id);
                Ok(())
            }
            Err(err) => Err(err.into()),
        },
        "cancel" => {
            match app.session.cancel() {
                Some(id) => println!("Edit of {id} cancelled."),
                None => println!("Nothing to cancel."),
            }
            Ok(())
        }
        _ => return None,
    };

    Some(result)
}

fn set_field(app: &mut App, rest: &[String]) -> Result<(), AppError> {
    let (field, value) = rest
        .split_first()
        .ok_or_else(|| AppError::invalid_input("usage: set <field> <value>"))?;
    let change = DraftField::parse(field, &value.join(" "))?;

    if app.session.is_editing() {
        app.session.edit(|draft| change.apply(draft));
    } else {
        app.form.edit(|draft| change.apply(draft));
    }
    Ok(())
}

fn run_interactive<R: BufRead, W: Write>(
    app: &mut App,
    terminal: &Terminal<R, W>,
) -> Result<(), AppError> {
    while let Some(input) = terminal.read_line()? {
        let line = input.trim();
        if line.is_empty() {
            continue;
        }

        if line.eq_ignore_ascii_case("exit") || line.eq_ignore_ascii_case("quit") {
            break;
        }

        if line == "help" || line == "?" {
            print_help();
            continue;
        }

        let args = match split_command_line(line)
            .and_then(|args| expand_alias(args, &app.config.aliases))
        {
            Ok(args) => args,
            Err(err) => {
                eprintln!("ERROR: {}", err);
                continue;
            }
        };

        if args.is_empty() {
            continue;
        }

        if let Some(result) = run_session_command(app, &args) {
            if let Err(err) = result {
                eprintln!("ERROR: {}", err);
            }
            continue;
        }

        let mut argv = Vec::with_capacity(args.len() + 1);
        argv.push(BIN_NAME.to_string());
        argv.extend(args);

        let cli = match Cli::try_parse_from(argv) {
            Ok(cli) => cli,
            Err(err) if is_display_request(&err) => {
                println!("{}", err.render());
                continue;
            }
            Err(err) => {
                eprintln!("ERROR: {}", normalize_parse_error(err));
                continue;
            }
        };

        if let Command::Edit { id, .. } = &cli.command
            && cli.command.is_bare_edit()
        {
            begin_edit(app, id);
            continue;
        }

        if let Err(err) = run_command(app, cli, terminal) {
            eprintln!("ERROR: {}", err);
        }
    }

    Ok(())
}

fn main() {
    if let Err(err) = init_logging() {
        eprintln!("WARN: {}", err);
    }

    let mut app = match App::open() {
        Ok(app) => app,
        Err(err) => {
            eprintln!("ERROR: {}", err);
            std::process::exit(1);
        }
    };

    let args: Vec<String> = std::env::args_os()
        .skip(1)
        .map(|arg| arg.to_string_lossy().into_owned())
        .collect();
    let terminal = Terminal::new(io::stdin().lock(), io::stdout());

    if args.is_empty() {
        if let Err(err) = run_interactive(&mut app, &terminal) {
            eprintln!("ERROR: {}", err);
            std::process::exit(1);
        }
        return;
    }

    let argv = match build_argv(args, &app.config.aliases) {
        Ok(argv) => argv,
        Err(err) => {
            eprintln!("ERROR: {}", err);
            std::process::exit(1);
        }
    };

    let cli = match Cli::try_parse_from(argv) {
        Ok(cli) => cli,
        Err(err) if is_display_request(&err) => err.exit(),
        Err(err) => {
            eprintln!("ERROR: {}", normalize_parse_error(err));
            std::process::exit(1);
        }
    };

    if let Err(err) = run_command(&mut app, cli, &terminal) {
        eprintln!("ERROR: {}", err);
        std::process::exit(1);
    }
}
