use clap::{Args, Parser, Subcommand};

#[derive(Debug, Parser)]
#[command(name = "ss-cli")]
#[command(about = "SceneScript live-sync CLI")]
pub(crate) struct Cli {
    #[command(subcommand)]
    pub(crate) command: Mode,
}

#[derive(Debug, Subcommand)]
pub(crate) enum Mode {
    Agent(AgentArgs),
    Check(CheckArgs),
    Diff(DiffArgs),
    Session(SessionArgs),
}

#[derive(Debug, Args)]
pub(crate) struct AgentArgs {
    #[command(subcommand)]
    pub(crate) command: AgentCommand,
}

#[derive(Debug, Subcommand)]
pub(crate) enum AgentCommand {
    Open(OpenArgs),
    Bind(BindArgs),
    Edit(EditArgs),
    Diag(DiagArgs),
}

#[derive(Debug, Args)]
pub(crate) struct OpenArgs {
    #[arg(long = "state-out")]
    pub(crate) state_out: String,
}

#[derive(Debug, Args)]
pub(crate) struct BindArgs {
    #[arg(long = "state-in")]
    pub(crate) state_in: String,
    #[arg(long = "script-path")]
    pub(crate) script_path: String,
    #[arg(long = "object")]
    pub(crate) object: String,
    #[arg(long = "state-out")]
    pub(crate) state_out: String,
}

#[derive(Debug, Args)]
pub(crate) struct EditArgs {
    #[arg(long = "state-in")]
    pub(crate) state_in: String,
    #[arg(long = "script-path")]
    pub(crate) script_path: String,
    #[arg(long = "source-file")]
    pub(crate) source_file: Option<String>,
    #[arg(long = "source-text")]
    pub(crate) source_text: Option<String>,
    #[arg(long = "state-out")]
    pub(crate) state_out: String,
}

#[derive(Debug, Args)]
pub(crate) struct DiagArgs {
    #[arg(long = "state-in")]
    pub(crate) state_in: String,
    #[arg(long = "script-path")]
    pub(crate) script_path: String,
}

#[derive(Debug, Args)]
pub(crate) struct CheckArgs {
    #[arg(long = "scripts-dir")]
    pub(crate) scripts_dir: Option<String>,
    #[arg(long = "script")]
    pub(crate) script: Option<String>,
}

#[derive(Debug, Args)]
pub(crate) struct DiffArgs {
    #[arg(long = "old-file")]
    pub(crate) old_file: String,
    #[arg(long = "new-file")]
    pub(crate) new_file: String,
}

#[derive(Debug, Args)]
pub(crate) struct SessionArgs {
    #[arg(long = "state-file")]
    pub(crate) state_file: Option<String>,
    #[arg(long = "debounce-ms")]
    pub(crate) debounce_ms: Option<u64>,
}
