use clap::{Parser, Subcommand, ValueEnum};
use periodic_telemetry::LogFormat;

#[derive(Parser, Debug)]
#[command(name = "periodic-agent")]
#[command(about = "Ask an LLM agent about chemical elements", long_about = None)]
#[command(version)]
pub struct Cli {
    /// Model provider
    #[arg(long, value_enum, default_value_t = Provider::Ollama, global = true)]
    pub provider: Provider,

    /// Model name; falls back to OLLAMA_MODEL / GEMINI_MODEL, then the provider default
    #[arg(long, global = true)]
    pub model: Option<String>,

    /// User ID for the session
    #[arg(long, default_value = "console_user", global = true)]
    pub user_id: String,

    #[arg(long, value_enum, default_value_t = LogFormatArg::Pretty, global = true)]
    pub log_format: LogFormatArg,

    /// More logging (-v debug, -vv trace). RUST_LOG overrides this.
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub enum Commands {
    /// Interactive console (default)
    Chat,

    /// Ask a single question and print the answer
    Ask {
        question: String,
    },

    /// Call get_element_info directly, without a model
    Lookup {
        /// Element symbol ("Fe") or Chinese name ("铁")
        symbol: String,

        /// Also print the session state and saved artifacts
        #[arg(long)]
        show_context: bool,
    },
}

#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum Provider {
    Ollama,
    Gemini,
}

#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogFormatArg {
    Pretty,
    Json,
}

impl From<LogFormatArg> for LogFormat {
    fn from(arg: LogFormatArg) -> Self {
        match arg {
            LogFormatArg::Pretty => LogFormat::Pretty,
            LogFormatArg::Json => LogFormat::Json,
        }
    }
}

impl Cli {
    pub fn command(&self) -> Commands {
        self.command.clone().unwrap_or(Commands::Chat)
    }
}
