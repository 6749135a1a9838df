//! One-shot RAG run: wait for Ollama, pull the model if needed, index the
//! corpus, answer one question and have the model grade its own answer.

use anyhow::Result;
use clap::Parser;
use std::time::Duration;

use ragchat::config::{ModelServerArgs, DEFAULT_QUESTION};
use ragchat::pipeline::script::{run_script, ScriptOptions};

#[derive(Parser)]
#[command(name = "rag_pipeline")]
#[command(about = "Run the RAG pipeline once against an Ollama server")]
#[command(version)]
struct Args {
  /// Question to ask
  #[arg(long, default_value = DEFAULT_QUESTION)]
  question: String,

  /// Seconds to wait before the first connection attempt
  #[arg(long, default_value_t = 5)]
  startup_delay_secs: u64,

  /// Skip the self-evaluation step
  #[arg(long)]
  skip_evaluation: bool,

  #[command(flatten)]
  server: ModelServerArgs,
}

#[tokio::main]
async fn main() -> Result<()> {
  let args = Args::parse();

  if args.startup_delay_secs > 0 {
    bentley::info!(&format!("Giving the model server {}s to come up", args.startup_delay_secs));
    tokio::time::sleep(Duration::from_secs(args.startup_delay_secs)).await;
  }

  let settings = args.server.into_settings();
  let options = ScriptOptions { question: args.question, self_evaluate: !args.skip_evaluation };

  if let Err(e) = run_script(&settings, &options).await {
    bentley::error!(&format!("Pipeline failed: {e}"));
    return Err(e.into());
  }

  bentley::success!("Pipeline finished");
  Ok(())
}
