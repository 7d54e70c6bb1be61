mod jikan;
mod logic;
mod scenarios;
mod util;

use anyhow::{Context, Result, bail};
use clap::{Parser, ValueEnum};
use colored::Colorize;
use std::fs::File;
use std::io::{BufWriter, Write, stdout};
use std::path::PathBuf;
use std::rc::Rc;
use std::time::Instant;

use logic::{LogicTester, PickStrategy, ProviderSource, ScenarioResult};
use util::{parse_seeds, split_csv};

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum ProviderKind {
    /// In-memory fixture rosters (fast, offline, deterministic)
    Fixture,
    /// The live Jikan API (slow, rate-limited)
    Jikan,
}

#[derive(Debug, Parser)]
#[command(name = "whowouldwin-tester", version)]
#[command(about = "Headless QA runs for Who Would Win? - plays whole sessions with scripted pickers")]
struct Args {
    /// Scenarios to run (comma-separated, or "all")
    #[arg(long, default_value = "smoke")]
    scenarios: String,

    /// List all available scenarios and exit
    #[arg(long)]
    list_scenarios: bool,

    /// Seeds to run (comma-separated, decimal or 0x hex)
    #[arg(long, default_value = "1337")]
    seeds: String,

    /// Number of iterations per scenario and seed
    #[arg(long, default_value_t = 10)]
    iterations: usize,

    /// Where characters come from
    #[arg(long, value_enum, default_value_t = ProviderKind::Fixture)]
    provider: ProviderKind,

    /// Override every scenario's pick strategy
    #[arg(long, value_enum)]
    strategy: Option<PickStrategy>,

    /// Output report format
    #[arg(long, default_value = "console")]
    #[arg(value_parser = ["json", "markdown", "console"])]
    report: String,

    /// Verbose output
    #[arg(short, long)]
    verbose: bool,

    /// Optional path to write the report output instead of stdout
    #[arg(long)]
    output: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> Result<()> {
    env_logger::init();
    let args = Args::parse();

    if maybe_list_scenarios(&args)? {
        return Ok(());
    }

    announce_banner();

    let start_time = Instant::now();
    let scenario_keys = expand_scenarios(&args.scenarios);
    let seeds = parse_seeds(&args.seeds).context("parsing --seeds")?;
    let source = build_source(args.provider)?;
    let tester = LogicTester::new(source, args.verbose);

    let results = run_scenarios(&args, &scenario_keys, &seeds, &tester).await;

    write_reports(&args, &results, start_time)?;

    if results.iter().any(|r| !r.passed) {
        std::process::exit(1);
    }

    Ok(())
}

fn maybe_list_scenarios(args: &Args) -> Result<bool> {
    if !args.list_scenarios {
        return Ok(false);
    }
    let mut output_target = OutputTarget::new(args.output.clone())?;
    writeln!(output_target.writer(), "Available scenarios:")?;
    for (key, description) in scenarios::list() {
        writeln!(output_target.writer(), "  {key:18} - {description}")?;
    }
    output_target.flush_inner()?;
    Ok(true)
}

fn announce_banner() {
    println!("{}", "🥊 Who Would Win? Session Tester".bright_cyan().bold());
    println!("{}", "================================".cyan());
}

fn expand_scenarios(scenarios_arg: &str) -> Vec<String> {
    let mut keys = split_csv(scenarios_arg);
    if keys.iter().any(|k| k == "all") {
        keys.retain(|k| k != "all");
        for key in scenarios::keys() {
            if !keys.iter().any(|k| k == key) {
                keys.push(key.to_string());
            }
        }
    }
    keys
}

fn build_source(kind: ProviderKind) -> Result<ProviderSource> {
    match kind {
        ProviderKind::Fixture => Ok(ProviderSource::Fixture),
        ProviderKind::Jikan => {
            let provider = jikan::JikanClient::cached().context("building Jikan client")?;
            Ok(ProviderSource::Live(Rc::new(provider)))
        }
    }
}

async fn run_scenarios(
    args: &Args,
    keys: &[String],
    seeds: &[u64],
    tester: &LogicTester,
) -> Vec<ScenarioResult> {
    let mut results = Vec::new();

    println!("{}", "🧠 Running Session Tests".bright_yellow().bold());
    println!("{}", "-".repeat(30).yellow());

    for key in keys {
        let Some(scenario) = scenarios::find(key) else {
            eprintln!("⚠️  Unknown scenario: {}", key.yellow());
            continue;
        };
        let scenario = scenario.with_strategy(args.strategy);
        if !tester.supports(&scenario) {
            eprintln!(
                "⚠️  Scenario {} needs fixture data; skipped for provider {}",
                key.yellow(),
                tester.source().label()
            );
            continue;
        }
        results.extend(tester.run_scenario(&scenario, seeds, args.iterations).await);
    }

    results
}

fn write_reports(args: &Args, results: &[ScenarioResult], start_time: Instant) -> Result<()> {
    let mut output_target = OutputTarget::new(args.output.clone())?;

    match args.report.as_str() {
        "json" => logic::reports::generate_json_report(&mut output_target, results)?,
        "markdown" => {
            if results.is_empty() {
                writeln!(
                    &mut output_target,
                    "# Who Would Win? Session Test Results\n\n_No scenarios executed._"
                )?;
            } else {
                logic::reports::generate_markdown_report(&mut output_target, results)?;
            }
        }
        "console" => {
            if results.is_empty() {
                writeln!(&mut output_target, "No scenarios executed.")?;
            } else {
                logic::reports::generate_console_report(
                    &mut output_target,
                    results,
                    start_time.elapsed(),
                )?;
            }
            writeln!(&mut output_target)?;
            writeln!(
                &mut output_target,
                "🏁 Total time: {:?}",
                start_time.elapsed()
            )?;
        }
        other => bail!("unsupported report format {other}"),
    }

    output_target.flush_inner()?;
    Ok(())
}

enum OutputTarget {
    Stdout(BufWriter<std::io::Stdout>),
    File(BufWriter<File>),
}

impl OutputTarget {
    fn new(path: Option<PathBuf>) -> Result<Self> {
        if let Some(path) = path {
            let file = File::create(&path)
                .with_context(|| format!("failed to create {}", path.display()))?;
            Ok(Self::File(BufWriter::new(file)))
        } else {
            Ok(Self::Stdout(BufWriter::new(stdout())))
        }
    }

    fn writer(&mut self) -> &mut dyn Write {
        match self {
            Self::Stdout(w) => w,
            Self::File(w) => w,
        }
    }

    fn flush_inner(&mut self) -> std::io::Result<()> {
        match self {
            Self::Stdout(w) => w.flush(),
            Self::File(w) => w.flush(),
        }
    }
}

impl Write for OutputTarget {
    fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
        self.writer().write(buf)
    }

    fn flush(&mut self) -> std::io::Result<()> {
        self.flush_inner()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn temp_path(label: &str) -> PathBuf {
        std::env::temp_dir().join(format!(
            "whowouldwin-main-{label}-{}",
            std::time::SystemTime::now()
                .duration_since(std::time::UNIX_EPOCH)
                .unwrap_or_default()
                .as_nanos()
        ))
    }

    fn base_args() -> Args {
        Args {
            scenarios: "smoke".to_string(),
            list_scenarios: false,
            seeds: "1337".to_string(),
            iterations: 1,
            provider: ProviderKind::Fixture,
            strategy: None,
            report: "json".to_string(),
            verbose: false,
            output: None,
        }
    }

    #[test]
    fn expand_all_adds_every_scenario_once() {
        let keys = expand_scenarios("restart,all");
        assert_eq!(keys[0], "restart");
        assert_eq!(keys.len(), scenarios::keys().len());
    }

    #[test]
    fn list_scenarios_writes_catalog() {
        let path = temp_path("list");
        let args = Args {
            list_scenarios: true,
            output: Some(path.clone()),
            ..base_args()
        };
        assert!(maybe_list_scenarios(&args).unwrap());
        let text = std::fs::read_to_string(&path).unwrap();
        assert!(text.contains("Available scenarios:"));
        assert!(text.contains("flaky-provider"));
        let _ = std::fs::remove_file(path);
    }

    #[tokio::test]
    async fn json_report_written_to_file() {
        let path = temp_path("json");
        let args = Args {
            output: Some(path.clone()),
            scenarios: "smoke,nope".to_string(),
            ..base_args()
        };
        let tester = LogicTester::new(ProviderSource::Fixture, false);
        let results = run_scenarios(&args, &expand_scenarios(&args.scenarios), &[3], &tester).await;
        assert_eq!(results.len(), 1);
        write_reports(&args, &results, Instant::now()).unwrap();
        let parsed: Vec<ScenarioResult> =
            serde_json::from_str(&std::fs::read_to_string(&path).unwrap()).unwrap();
        assert!(parsed[0].passed);
        let _ = std::fs::remove_file(path);
    }

    #[tokio::test]
    async fn markdown_report_without_results() {
        let path = temp_path("md");
        let args = Args {
            output: Some(path.clone()),
            report: "markdown".to_string(),
            ..base_args()
        };
        write_reports(&args, &[], Instant::now()).unwrap();
        let text = std::fs::read_to_string(&path).unwrap();
        assert!(text.contains("_No scenarios executed._"));
        let _ = std::fs::remove_file(path);
    }

    #[test]
    fn strategy_flag_parses() {
        let args =
            Args::try_parse_from(["whowouldwin-tester", "--strategy", "always-left"]).unwrap();
        assert_eq!(args.strategy, Some(PickStrategy::AlwaysLeft));
        assert_eq!(args.provider, ProviderKind::Fixture);
    }
}
