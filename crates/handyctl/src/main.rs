use clap::{Args, Parser, Subcommand};
use handyctl::desktop::{AppInfo, AppQuery, ExecCommand, find_desktop_entry};
use handyctl::ipc;
use handyctl::wm::{self, Point, ShellCommand, WindowClass};

#[derive(Parser, Debug)]
#[command(name = "handyctl", version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

/// Screen position; defaults to the cursor on the focused monitor.
#[derive(Args, Debug, Clone, Copy)]
struct At {
    #[arg(requires = "y")]
    x: Option<f64>,
    y: Option<f64>,
}

impl At {
    fn resolve(self) -> anyhow::Result<Point> {
        match (self.x, self.y) {
            (Some(x), Some(y)) => Ok(Point::new(x, y)),
            _ => wm::get_cursor_pos_on_active_monitor()
                .ok_or_else(|| anyhow::anyhow!("could not query the cursor position")),
        }
    }
}

#[derive(Subcommand, Debug, Clone)]
enum Commands {
    /// Open the menu (re-opens it if already shown)
    Open(At),
    /// Open the menu, or close it when it is already shown
    Toggle(At),
    /// Close the menu without selecting anything
    Close,
    /// Report the pointer position
    Pointer { x: f64, y: f64 },
    /// Activate whatever is under the last reported pointer
    Activate,
    /// Button pressed: opens the menu
    Press(At),
    /// Button released: activates in press-release mode
    Release(At),
    /// Set (or clear, without TEXT) the captured text handed to actions
    Context { text: Option<String> },
    /// Focus a window of the application, launching it if none is open
    Raise {
        /// The application name or window class (used to find desktop entry)
        name: String,
        /// Explicitly specify the window class to match
        #[arg(short = 'c', long)]
        class: Option<String>,
        /// The command to execute if the window is not found
        #[arg(short = 'e', long)]
        exec: Option<String>,
    },
}

fn main() -> anyhow::Result<()> {
    env_logger::init();
    let cli = Cli::parse();

    match cli.command {
        Commands::Raise { name, class, exec } => raise(name, class, exec),
        command => {
            let line = wire_line(&command)?;
            log::debug!("sending '{line}'");
            ipc::send_command(&line)?;
            Ok(())
        }
    }
}

fn wire_line(command: &Commands) -> anyhow::Result<String> {
    let at = |verb: &str, at: At| at.resolve().map(|p| format!("{verb} {} {}", p.x, p.y));

    Ok(match command {
        Commands::Open(a) => at("open", *a)?,
        Commands::Toggle(a) => at("toggle", *a)?,
        Commands::Press(a) => at("press", *a)?,
        Commands::Release(a) => at("release", *a)?,
        Commands::Pointer { x, y } => format!("pointer {x} {y}"),
        Commands::Close => "close".to_string(),
        Commands::Activate => "activate".to_string(),
        Commands::Context { text: Some(text) } => format!("context {}", text.replace('\n', " ")),
        Commands::Context { text: None } => "context".to_string(),
        Commands::Raise { .. } => anyhow::bail!("raise is handled locally"),
    })
}

fn raise(query: String, class: Option<String>, exec: Option<String>) -> anyhow::Result<()> {
    let found = find_desktop_entry(&AppQuery::new(query.clone()));

    let class = class
        .map(WindowClass::new)
        .or_else(|| found.as_ref().map(|a| a.class.clone()))
        .unwrap_or_else(|| WindowClass::new(query.clone()));
    let exec = exec
        .map(ExecCommand::new)
        .or_else(|| found.as_ref().map(|a: &AppInfo| a.exec.clone()))
        .filter(|e| !e.is_empty());

    let Some(exec) = exec else {
        anyhow::bail!(
            "Could not find a desktop entry for '{}' and no --exec was provided.",
            query
        );
    };

    wm::run_or_raise(&class, &ShellCommand::new(exec.to_string()))?;
    Ok(())
}
