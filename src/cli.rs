use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "opengpts")]
#[command(about = "Command-line client for an OpenGPTs server", long_about = None)]
pub struct Args {
    #[arg(
        long = "url",
        global = true,
        help = "OpenGPTs base URL (e.g., http://localhost:8100)"
    )]
    pub url: Option<String>,

    #[arg(
        long = "user-id",
        global = true,
        help = "Act as this opengpts_user_id instead of the saved one"
    )]
    pub user_id: Option<String>,

    #[arg(short = 'v', long = "verbose", global = true, help = "Log requests to stderr")]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Check that the server is up
    Health,

    /// List your assistants, or public ones shared under an id
    Assistants {
        #[arg(long = "public", value_name = "SHARED_ID")]
        public: Option<String>,
    },

    /// Show one assistant
    Assistant { assistant_id: String },

    /// Create an assistant from a JSON config (inline or @file)
    CreateAssistant {
        #[arg(long)]
        name: String,
        #[arg(long, value_name = "JSON|@FILE")]
        config: String,
        #[arg(long)]
        public: bool,
    },

    /// List your threads
    Threads {
        #[arg(long = "assistant", help = "Only threads of this assistant")]
        assistant_id: Option<String>,
    },

    /// Show one thread
    Thread { thread_id: String },

    /// Create a thread
    CreateThread {
        #[arg(long)]
        name: String,
        #[arg(long = "assistant")]
        assistant_id: String,
    },

    /// Print the messages of a thread
    Messages { thread_id: String },

    /// Print every past state of a thread
    History { thread_id: String },

    /// Upload files to an assistant's retriever
    Ingest {
        #[arg(long = "assistant")]
        assistant_id: String,
        #[arg(long = "chunk-size", default_value_t = 1000)]
        chunk_size: u32,
        #[arg(long = "chunk-overlap", default_value_t = 200)]
        chunk_overlap: u32,
        #[arg(long = "separator", help = "Chunk separator (repeatable)")]
        separators: Vec<String>,
        #[arg(required = true)]
        files: Vec<PathBuf>,
    },

    /// Send a message and stream the reply
    Chat {
        #[arg(long = "assistant", help = "Defaults to the first available assistant")]
        assistant_id: Option<String>,
        #[arg(long = "thread", help = "Continue this thread instead of starting a new one")]
        thread_id: Option<String>,
        #[arg(required = true, help = "Message to send")]
        prompt: Vec<String>,
    },
}
