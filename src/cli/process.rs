use anyhow::{Context, Result};

use relay_digest::config::DigestConfig;
use relay_digest::llm::AnthropicGenerator;
use relay_digest::payload::ForwardedPayload;
use relay_digest::pipeline::Pipeline;
use relay_digest::tracing_init;

/// relay-digest process: run one payload through the pipeline and print the
/// status report.
pub fn run(file: Option<&str>, db_flag: Option<&str>) -> Result<()> {
    tracing_init::init_file_tracing();

    let raw = match file {
        Some(path) => std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read payload file {}", path))?,
        None => std::io::read_to_string(std::io::stdin()).context("Failed to read stdin")?,
    };

    let payload: ForwardedPayload =
        serde_json::from_str(&raw).context("Payload is not valid JSON")?;

    if !payload.is_forwarded() {
        tracing::warn!(chat_id = payload.chat_id, "Payload is not a forwarded message");
    }

    let cfg = DigestConfig::load();
    let db_path = super::resolve_db_path(db_flag, &cfg);
    let conn = super::open_archive(&db_path)?;

    let generator =
        AnthropicGenerator::from_env(&cfg.llm).context("Generative service unavailable")?;

    let pipeline = Pipeline::new(&conn, &generator, &cfg);
    let report = pipeline.run(&payload);

    println!("{}", report.render());
    Ok(())
}
