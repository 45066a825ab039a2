use std::io::Read;
use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Parser, ValueEnum};
use serde::Serialize;

#[derive(Parser)]
#[command(name = "compile-cli")]
#[command(about = "Submit JavaScript to a running compiler-service", long_about = None)]
struct Cli {
    #[arg(short, long, default_value = "http://localhost:8888")]
    url: String,

    /// Source file to compile; reads stdin when omitted.
    file: Option<PathBuf>,

    #[arg(short, long, value_enum, default_value_t = Level::Simple)]
    level: Level,

    /// Ask for the diagnostic report instead of compiled code.
    #[arg(short, long)]
    errors: bool,

    /// Print status and body as JSON.
    #[arg(long)]
    json: bool,
}

#[derive(Clone, Copy, ValueEnum)]
enum Level {
    Whitespace,
    Simple,
    Advanced,
}

impl Level {
    fn as_param(self) -> &'static str {
        match self {
            Level::Whitespace => "WHITESPACE_ONLY",
            Level::Simple => "SIMPLE_OPTIMIZATIONS",
            Level::Advanced => "ADVANCED_OPTIMIZATIONS",
        }
    }
}

#[derive(Serialize)]
struct Reply {
    status: u16,
    body: String,
}

#[tokio::main]
async fn main() -> Result<ExitCode, Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    let source = match &cli.file {
        Some(path) => std::fs::read_to_string(path)?,
        None => {
            let mut source = String::new();
            std::io::stdin().read_to_string(&mut source)?;
            source
        }
    };

    let output_info = if cli.errors { "errors" } else { "compiled_code" };
    let params = [
        ("js_code", source.as_str()),
        ("compilation_level", cli.level.as_param()),
        ("output_format", "text"),
        ("output_info", output_info),
    ];

    let res = reqwest::Client::new().post(&cli.url).form(&params).send().await?;
    let status = res.status();
    let reply = Reply {
        status: status.as_u16(),
        body: res.text().await?,
    };

    if cli.json {
        println!("{}", serde_json::to_string_pretty(&reply)?);
    } else if status.is_success() {
        print!("{}", reply.body);
    } else {
        eprintln!("Error: compiler-service returned status {}", status);
    }

    if status == reqwest::StatusCode::NO_CONTENT {
        eprintln!("Compilation failed; rerun with --errors for diagnostics");
        return Ok(ExitCode::FAILURE);
    }
    Ok(if status.is_success() { ExitCode::SUCCESS } else { ExitCode::FAILURE })
}
