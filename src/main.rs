use std::sync::Arc;

use anyhow::{Context, Result};
use exp_judge::docker::DockerBackend;
use exp_judge::{Judge, ProblemSpec};

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt::init();

    let mut args = std::env::args().skip(1);
    let (problem_path, code_path) = match (args.next(), args.next()) {
        (Some(problem), Some(code)) => (problem, code),
        _ => {
            eprintln!("usage: exp-judge <problem.json> <solution-file>");
            std::process::exit(2);
        }
    };

    let problem: ProblemSpec = serde_json::from_str(
        &std::fs::read_to_string(&problem_path)
            .with_context(|| format!("failed to read {problem_path}"))?,
    )
    .context("invalid problem definition")?;
    anyhow::ensure!(problem.timeout > 0, "problem timeout must be positive");
    anyhow::ensure!(problem.mem_limit > 0, "problem memory limit must be positive");

    let code = std::fs::read_to_string(&code_path)
        .with_context(|| format!("failed to read {code_path}"))?;

    let mut backend = DockerBackend::connect().context("sandbox backend unreachable")?;
    if let Ok(image) = std::env::var("JUDGE_IMAGE") {
        backend = backend.with_image(image);
    }

    let mut judge = Judge::new(Arc::new(backend));
    if let Ok(cap) = std::env::var("JUDGE_CONCURRENCY") {
        let cap: usize = cap
            .parse()
            .context("JUDGE_CONCURRENCY must be a positive integer")?;
        anyhow::ensure!(cap > 0, "JUDGE_CONCURRENCY must be a positive integer");
        judge = judge.with_concurrency(cap);
    }

    tracing::info!(problem = %problem.name, cases = problem.test_cases.len(), "judging submission");
    let verdict = judge.judge(&problem, &code).await?;

    println!("{}", serde_json::to_string_pretty(&verdict)?);
    Ok(())
}
