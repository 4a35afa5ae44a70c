//! ClarityCheck follow-up service
//!
//! Run the HTTP service:   claritycheck --serve [--port=8001]
//! One-shot from a file:   claritycheck followups request.json [--json]

use anyhow::{Context, Result};
use claritycheck_followups::{
    fallback, generator, server, CategoryBucket, FollowupConfig, FollowupEngine,
    FollowupReport, FollowupRequest, GenerationOutcome, GeneratorConfig,
};
use std::io::Read;
use std::net::SocketAddr;
use std::sync::Arc;
use tracing_subscriber::EnvFilter;

const USAGE: &str = "\
Usage:
  claritycheck --serve [--port=8001] [--host=127.0.0.1]
  claritycheck followups <request.json|-> [--json]
  claritycheck --prompt <request.json|->
  claritycheck --classify <category...>
  claritycheck --fallback <bucket>";

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let args: Vec<String> = std::env::args().collect();

    match args.get(1).map(|s| s.as_str()) {
        Some("--serve") => {
            let port: u16 = flag_value(&args, "--port=")
                .and_then(|p| p.parse().ok())
                .unwrap_or(8001);
            let host = flag_value(&args, "--host=").unwrap_or("127.0.0.1");
            let addr: SocketAddr = format!("{}:{}", host, port)
                .parse()
                .with_context(|| format!("Invalid listen address {}:{}", host, port))?;
            run_server(addr).await
        }
        Some("followups") => {
            let source = positional(&args).context(USAGE)?;
            let json_output = args.iter().any(|a| a == "--json");
            run_followups(source, json_output).await
        }
        Some("--prompt") => {
            let source = positional(&args).context(USAGE)?;
            run_prompt(source)
        }
        Some("--classify") => {
            let category = args[2..].join(" ");
            let bucket = CategoryBucket::classify(&category);
            println!("{}", bucket);
            Ok(())
        }
        Some("--fallback") => {
            let bucket: CategoryBucket = args
                .get(2)
                .context(USAGE)?
                .parse()
                .map_err(anyhow::Error::msg)?;
            for (i, q) in fallback::pool(bucket).iter().enumerate() {
                println!("{:>2}. {}", i + 1, q);
            }
            Ok(())
        }
        _ => {
            eprintln!("{}", USAGE);
            Ok(())
        }
    }
}

fn build_engine() -> Result<FollowupEngine> {
    let followup_config = FollowupConfig::from_env();
    let generator_config = GeneratorConfig::from_env();
    let generator =
        generator::from_config(&generator_config).context("Failed to set up generator")?;
    tracing::info!(
        target_count = followup_config.target_count,
        candidates = followup_config.candidate_count(),
        threshold = followup_config.dedupe_threshold,
        generator = generator.name(),
        "engine configured"
    );
    Ok(FollowupEngine::new(generator, followup_config))
}

async fn run_server(addr: SocketAddr) -> Result<()> {
    let engine = Arc::new(build_engine()?);
    server::serve(engine, addr).await
}

async fn run_followups(source: &str, json_output: bool) -> Result<()> {
    let request = load_request(source)?;
    let engine = build_engine()?;
    let started = std::time::Instant::now();
    let report = engine
        .generate_report(&request.product, &request.profile)
        .await;

    if json_output {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        print_report(&report, started.elapsed());
    }
    Ok(())
}

fn run_prompt(source: &str) -> Result<()> {
    let request = load_request(source)?;
    let engine = FollowupEngine::new(
        Arc::new(generator::DisabledGenerator),
        FollowupConfig::from_env(),
    );
    println!("{}", engine.prompt_for(&request.product, &request.profile));
    Ok(())
}

/// Read a request body from a file path, or stdin for `-`
fn load_request(source: &str) -> Result<FollowupRequest> {
    let raw = if source == "-" {
        let mut buf = String::new();
        std::io::stdin()
            .read_to_string(&mut buf)
            .context("Failed to read request from stdin")?;
        buf
    } else {
        std::fs::read_to_string(source)
            .with_context(|| format!("Failed to read request file {}", source))?
    };
    serde_json::from_str(&raw).with_context(|| format!("Invalid follow-up request in {}", source))
}

fn print_report(report: &FollowupReport, elapsed: std::time::Duration) {
    println!("Category bucket: {}", report.bucket);
    match &report.generation {
        GenerationOutcome::Ok { candidates } => println!("Generator: {} candidate(s)", candidates),
        GenerationOutcome::Unavailable { reason } => println!("Generator: unavailable ({})", reason),
    }
    let s = &report.stats;
    println!(
        "Filtered: {} accepted, {} forbidden, {} off-topic, {} excluded, {} duplicate, {} empty",
        s.accepted, s.forbidden, s.off_topic, s.excluded, s.duplicate, s.empty
    );
    println!("Fallback: {} added", s.fallback);
    println!();
    for q in &report.questions {
        println!("  {}  {}", q.id, q.text);
    }
    println!();
    println!("({} question(s) in {:.0?})", report.questions.len(), elapsed);
}

fn flag_value<'a>(args: &'a [String], prefix: &str) -> Option<&'a str> {
    args.iter().find_map(|a| a.strip_prefix(prefix))
}

fn positional(args: &[String]) -> Option<&str> {
    args.iter()
        .skip(2)
        .find(|a| *a == "-" || !a.starts_with("--"))
        .map(|s| s.as_str())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn args(list: &[&str]) -> Vec<String> {
        list.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_load_request_from_file() {
        let mut file = NamedTempFile::new().unwrap();
        write!(
            file,
            r#"{{"product": {{"category": "Organic Almonds"}}, "profile": {{"profile": {{"sourcing": "local farm"}}}}}}"#
        )
        .unwrap();

        let request = load_request(file.path().to_str().unwrap()).unwrap();
        assert_eq!(request.product.category, "Organic Almonds");
        assert_eq!(request.profile.fields()["sourcing"], "local farm");
    }

    #[test]
    fn test_load_request_rejects_bad_profile() {
        let mut file = NamedTempFile::new().unwrap();
        write!(file, r#"{{"profile": "flat text"}}"#).unwrap();
        assert!(load_request(file.path().to_str().unwrap()).is_err());
    }

    #[test]
    fn test_load_request_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("nope.json");
        let err = load_request(missing.to_str().unwrap()).unwrap_err();
        assert!(err.to_string().contains("Failed to read request file"));
    }

    #[test]
    fn test_flag_and_positional_parsing() {
        let a = args(&["claritycheck", "followups", "--json", "req.json"]);
        assert_eq!(positional(&a), Some("req.json"));
        assert_eq!(flag_value(&a, "--port="), None);

        let a = args(&["claritycheck", "--serve", "--port=9000"]);
        assert_eq!(flag_value(&a, "--port="), Some("9000"));

        let a = args(&["claritycheck", "--prompt", "-"]);
        assert_eq!(positional(&a), Some("-"));
    }
}
