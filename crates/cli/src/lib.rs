//! Steward CLI: process bootstrap and the line-oriented REPL.
//!
//! One utterance per line; each line is routed, executed and rendered
//! before the next is read. A failed turn is logged and the loop keeps
//! accepting input.

use std::io::{self, BufRead, Write};
use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Arc;

use clap::Parser;
use tracing_subscriber::EnvFilter;

use steward_agent::capabilities::default_registry;
use steward_agent::confirm::ConfirmationPort;
use steward_agent::executor::Executor;
use steward_agent::orchestrator::ModelOrchestrator;
use steward_agent::providers::provider_chain;
use steward_core::config::AppConfig;
use steward_core::context::ExecutionContext;
use steward_core::contract::ActionPlan;
use steward_core::elevated::ElevatedGuard;
use steward_core::intent::{IntentClassifier, IntentKind};
use steward_core::memory::{MemoryManager, MemoryStore};
use steward_core::router::Router;

const EXIT_TOKENS: &[&str] = &["exit", "quit"];

#[derive(Debug, Parser)]
#[command(
    name = "steward",
    about = "Steward text-command assistant",
    long_about = "A line-oriented assistant: each input line is classified, routed and \
executed as a model answer, a capability action, or a local memory operation."
)]
struct Cli {
    #[arg(long, help = "Deny all web lookups for this session")]
    offline: bool,
    #[arg(long, help = "Base directory for filesystem capabilities")]
    base_dir: Option<PathBuf>,
}

#[tokio::main(flavor = "current_thread")]
pub async fn run() -> ExitCode {
    let cli = Cli::parse();

    let mut config = match AppConfig::load() {
        Ok(config) => config,
        Err(error) => {
            eprintln!("steward: configuration error: {error}");
            return ExitCode::FAILURE;
        }
    };
    if cli.offline {
        config.runtime.offline = true;
    }
    if let Some(base_dir) = cli.base_dir {
        config.runtime.base_dir = base_dir;
    }

    init_logging(&config);

    match repl(config).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(error) => {
            tracing::error!(%error, "fatal startup failure");
            eprintln!("steward: {error}");
            ExitCode::FAILURE
        }
    }
}

fn init_logging(config: &AppConfig) {
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(&config.logging.level))
        .unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt().with_env_filter(filter).with_target(false).init();
}

async fn repl(config: AppConfig) -> anyhow::Result<()> {
    let registry = Arc::new(default_registry(&config));
    let providers = provider_chain(&config.llm);
    let orchestrator = ModelOrchestrator::new(providers);
    let model_available = config.model_available() && orchestrator.available();

    let memory = Arc::new(MemoryManager::new(MemoryStore::open(config.memory_path())?));
    let mut guard = config
        .runtime
        .elevated_password
        .clone()
        .map(|password| ElevatedGuard::open(password, config.elevated_state_path()))
        .transpose()?;

    let router = Router::new(registry.clone());
    let executor = Executor::new(
        registry,
        orchestrator,
        memory,
        Arc::new(StdinConfirmation),
        config.llm.max_tokens,
    );
    let classifier = IntentClassifier::new();
    let mut context = ExecutionContext::new(config.runtime.offline, model_available);

    tracing::info!(
        offline = context.offline,
        model_available = context.model_available,
        "steward ready"
    );
    println!("Steward ready. Type 'exit' to leave.");

    let stdin = io::stdin();
    loop {
        let prefix = if context.elevated_mode { "[elevated]> " } else { "> " };
        print!("{prefix}");
        io::stdout().flush()?;

        let mut line = String::new();
        if stdin.lock().read_line(&mut line)? == 0 {
            break;
        }
        let line = line.trim();
        if line.is_empty() {
            continue;
        }
        if EXIT_TOKENS.contains(&line.to_lowercase().as_str()) {
            println!("Goodbye.");
            break;
        }

        // Entering elevated mode is an authentication exchange, handled
        // here rather than inside the router.
        if matches!(
            classifier.classify(line).map(|intent| intent.kind),
            Some(IntentKind::ElevatedEnter)
        ) {
            authenticate(&mut context, guard.as_mut());
            continue;
        }

        let decision = router.route(line, &mut context);
        match executor.execute(&decision, line, &mut context).await {
            Ok(answer) => println!("{answer}"),
            Err(error) => {
                tracing::error!(%error, "turn failed");
                println!("[Steward] Something went wrong handling that request.");
            }
        }
    }

    Ok(())
}

fn authenticate(context: &mut ExecutionContext, guard: Option<&mut ElevatedGuard>) {
    let Some(guard) = guard else {
        println!("[Steward] Elevated mode is not configured for this installation.");
        return;
    };
    if guard.is_blocked() {
        println!("[Steward] Too many failed attempts; elevated mode is temporarily locked.");
        return;
    }

    print!("password: ");
    let _ = io::stdout().flush();
    let mut attempt = String::new();
    if io::stdin().lock().read_line(&mut attempt).is_err() {
        return;
    }

    match guard.validate(attempt.trim_end_matches(['\n', '\r'])) {
        Ok(true) => {
            context.elevated_mode = true;
            println!("[Steward] Elevated mode enabled.");
        }
        Ok(false) => println!("[Steward] Authentication failed."),
        Err(error) => {
            tracing::error!(%error, "elevated guard failure");
            println!("[Steward] Authentication is unavailable right now.");
        }
    }
}

/// Interactive confirmation over stdin for the destructive two-phase
/// protocol.
struct StdinConfirmation;

impl ConfirmationPort for StdinConfirmation {
    fn select_targets(&self, plan: &ActionPlan) -> Option<Vec<String>> {
        println!("{}", plan.description);
        for (index, target) in plan.targets.iter().enumerate() {
            println!("  {}. {target}", index + 1);
        }
        print!("Select targets (numbers separated by commas, or 'all'): ");
        let _ = io::stdout().flush();

        let mut line = String::new();
        io::stdin().lock().read_line(&mut line).ok()?;
        let line = line.trim().to_lowercase();
        if line.is_empty() {
            return None;
        }
        if line == "all" {
            return Some(plan.targets.clone());
        }

        let selected: Vec<String> = line
            .split(',')
            .filter_map(|part| part.trim().parse::<usize>().ok())
            .filter_map(|number| number.checked_sub(1))
            .filter_map(|index| plan.targets.get(index).cloned())
            .collect();
        if selected.is_empty() {
            None
        } else {
            Some(selected)
        }
    }

    fn confirm(&self, preview: &str) -> bool {
        println!("{preview}");
        print!("Proceed? [y/N]: ");
        let _ = io::stdout().flush();

        let mut line = String::new();
        if io::stdin().lock().read_line(&mut line).is_err() {
            return false;
        }
        matches!(line.trim().to_lowercase().as_str(), "y" | "yes")
    }
}
