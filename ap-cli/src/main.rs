//! ap: CLI for anytime planning on CTP maps and wumpus caves.
//!
//! Subcommands:
//! - ctp
//! - wumpus

use std::env;
use std::process;
use std::str::FromStr;
use std::sync::Arc;

use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

use ap_aot::{AotConfig, AotPolicy};
use ap_core::{Config, Policy, Problem, RandomPolicy, WorldModel};
use ap_ctp::{probability_bad_weather, CtpProblem, CtpWorld, Graph, GreedyPolicy};
use ap_eval::{evaluate_policy, EvalOptions, EvalReport};
use ap_logging::{ts_ms, EngineStatsEventV1, NdjsonWriter};
use ap_wumpus::{WumpusGreedyPolicy, WumpusProblem, WumpusWorld};

fn print_help() {
    eprintln!(
        r#"ap - anytime planning for stochastic shortest paths

USAGE:
    ap <COMMAND> [OPTIONS]

COMMANDS:
    ctp         Evaluate policies on a Canadian Traveler map
    wumpus      Evaluate policies on a wumpus cave

OPTIONS:
    -h, --help          Print this help message
    -V, --version       Print version

Run `ap <COMMAND> --help` for command options.
"#
    );
}

fn parse_value<T: FromStr>(args: &[String], i: usize, name: &str) -> T {
    if i + 1 >= args.len() {
        eprintln!("Missing value for {}", name);
        process::exit(1);
    }
    args[i + 1].parse().unwrap_or_else(|_| {
        eprintln!("Invalid {} value: {}", name, args[i + 1]);
        process::exit(1);
    })
}

#[derive(Clone, Copy, PartialEq, Eq)]
enum PolicyChoice {
    Random,
    Greedy,
    Aot,
    All,
}

impl PolicyChoice {
    fn parse(s: &str) -> Self {
        match s {
            "random" => PolicyChoice::Random,
            "greedy" => PolicyChoice::Greedy,
            "aot" => PolicyChoice::Aot,
            "all" => PolicyChoice::All,
            other => {
                eprintln!("Unknown policy: {} (expected random|greedy|aot|all)", other);
                process::exit(1);
            }
        }
    }

    fn includes(self, other: PolicyChoice) -> bool {
        self == PolicyChoice::All || self == other
    }
}

/// Options shared by both domains, layered over the config file.
struct CommonOpts {
    config: Config,
    policy: PolicyChoice,
    log: Option<String>,
}

impl CommonOpts {
    fn new() -> Self {
        Self {
            config: Config::default(),
            policy: PolicyChoice::All,
            log: None,
        }
    }

    /// Consume a flag at `args[i]` if recognized; returns the new cursor.
    fn consume(&mut self, args: &[String], i: usize) -> Option<usize> {
        match args[i].as_str() {
            "--config" => {
                let path: String = parse_value(args, i, "--config");
                self.config = Config::load(&path).unwrap_or_else(|e| {
                    eprintln!("Failed to load config {}: {}", path, e);
                    process::exit(1);
                });
                Some(i + 2)
            }
            "--policy" => {
                let value: String = parse_value(args, i, "--policy");
                self.policy = PolicyChoice::parse(&value);
                Some(i + 2)
            }
            "--width" => {
                self.config.engine.width = parse_value(args, i, "--width");
                Some(i + 2)
            }
            "--depth-bound" => {
                self.config.engine.depth_bound = parse_value(args, i, "--depth-bound");
                Some(i + 2)
            }
            "--parameter" => {
                self.config.engine.parameter = parse_value(args, i, "--parameter");
                Some(i + 2)
            }
            "--eager" => {
                self.config.engine.delayed_evaluation = false;
                Some(i + 1)
            }
            "--expansions-per-iteration" => {
                self.config.engine.expansions_per_iteration =
                    parse_value(args, i, "--expansions-per-iteration");
                Some(i + 2)
            }
            "--trials" => {
                self.config.evaluation.trials = parse_value(args, i, "--trials");
                Some(i + 2)
            }
            "--depth" => {
                self.config.evaluation.depth = parse_value(args, i, "--depth");
                Some(i + 2)
            }
            "--seed" => {
                self.config.evaluation.seed = parse_value(args, i, "--seed");
                Some(i + 2)
            }
            "--log" => {
                self.log = Some(parse_value(args, i, "--log"));
                Some(i + 2)
            }
            _ => None,
        }
    }

    fn eval_options(&self) -> EvalOptions {
        EvalOptions {
            trials: self.config.evaluation.trials,
            depth: self.config.evaluation.depth,
            seed: self.config.evaluation.seed,
        }
    }

    fn open_log(&self) -> Option<NdjsonWriter> {
        self.log.as_ref().map(|path| {
            NdjsonWriter::open_append_with_flush(path, 64).unwrap_or_else(|e| {
                eprintln!("Failed to open log {}: {}", path, e);
                process::exit(1);
            })
        })
    }
}

fn report_line(report: &EvalReport, label: &str) {
    println!(
        "{}= {:.5} (std {:.3}, min {:.3}, max {:.3}, unreachable {}/{})",
        label, report.mean, report.std_dev, report.min, report.max, report.unreachable,
        report.trials
    );
}

fn run_one<P, W, B>(
    problem: &P,
    world: &mut W,
    policy: &mut B,
    label: &str,
    opts: &CommonOpts,
    run_id: &str,
    domain: &str,
    log: &mut Option<NdjsonWriter>,
) -> EvalReport
where
    P: Problem,
    W: WorldModel<P>,
    B: Policy<P>,
{
    let report = evaluate_policy(problem, world, policy, &opts.eval_options());
    report_line(&report, label);
    if let Some(writer) = log {
        for record in &report.records {
            let event = report.trial_event(record, run_id, domain);
            if let Err(e) = writer.write_event(&event) {
                eprintln!("Failed to write log event: {}", e);
                process::exit(1);
            }
        }
        let summary = report.summary_event(run_id, domain);
        if let Err(e) = writer.write_event(&summary) {
            eprintln!("Failed to write log event: {}", e);
            process::exit(1);
        }
    }
    report
}

fn log_engine_stats(
    stats: &ap_aot::AotStats,
    policy: &str,
    run_id: &str,
    log: &mut Option<NdjsonWriter>,
) {
    println!(
        "stats: decisions={} expansions={} evaluations={} %in={:.3} %out={:.3}",
        stats.decisions,
        stats.expansions,
        stats.evaluations,
        stats.from_inside as f64 / (stats.from_inside + stats.from_outside).max(1) as f64,
        stats.from_outside as f64 / (stats.from_inside + stats.from_outside).max(1) as f64,
    );
    if let Some(writer) = log {
        let event = EngineStatsEventV1 {
            event: "engine_stats",
            ts_ms: ts_ms(),
            run_id: run_id.to_string(),
            policy: policy.to_string(),
            decisions: stats.decisions,
            expansions: stats.expansions,
            evaluations: stats.evaluations,
            from_inside: stats.from_inside,
            from_outside: stats.from_outside,
            nodes_allocated: stats.nodes_allocated,
        };
        if let Err(e) = writer.write_event(&event) {
            eprintln!("Failed to write log event: {}", e);
            process::exit(1);
        }
    }
}

fn cmd_ctp(args: &[String]) {
    let mut graph_path: Option<String> = None;
    let mut opts = CommonOpts::new();

    let mut i = 0usize;
    while i < args.len() {
        match args[i].as_str() {
            "--help" | "-h" => {
                println!(
                    r#"ap ctp

USAGE:
    ap ctp --graph map.yaml [OPTIONS]

OPTIONS:
    --graph PATH                 Map file (YAML)
    --config PATH                Config file (YAML)
    --policy P                   random|greedy|aot|all (default: all)
    --width N                    Engine expansions per decision
    --depth-bound H              Engine evaluation horizon
    --parameter P                Inside/outside selection probability
    --eager                      Full-width action expansion (no rollout estimates)
    --expansions-per-iteration E Batch size between frontier rebuilds
    --trials N                   Evaluation episodes per policy
    --depth D                    Evaluation step budget per episode
    --seed S                     Evaluation base seed
    --log PATH                   Append NDJSON events to PATH
"#
                );
                return;
            }
            "--graph" => {
                graph_path = Some(parse_value(args, i, "--graph"));
                i += 2;
            }
            other => match opts.consume(args, i) {
                Some(next) => i = next,
                None => {
                    eprintln!("Unknown option for `ap ctp`: {}", other);
                    eprintln!("Run `ap ctp --help` for usage.");
                    process::exit(1);
                }
            },
        }
    }

    let Some(graph_path) = graph_path else {
        eprintln!("Missing required --graph");
        process::exit(1);
    };
    let graph = Arc::new(Graph::load(&graph_path).unwrap_or_else(|e| {
        eprintln!("Failed to load graph {}: {}", graph_path, e);
        process::exit(1);
    }));

    let problem = CtpProblem::new(Arc::clone(&graph), ap_ctp::DEFAULT_DEAD_END_VALUE);
    let run_id = format!("ctp-{}", ts_ms());
    let mut log = opts.open_log();

    let mut rng = ChaCha8Rng::seed_from_u64(opts.config.evaluation.seed);
    println!(
        "map: {} nodes, {} edges, P(bad weather) ~ {:.3}",
        graph.num_nodes(),
        graph.num_edges(),
        probability_bad_weather(&graph, 1000, &mut rng)
    );

    if opts.policy.includes(PolicyChoice::Random) {
        let mut world = CtpWorld::new(Arc::clone(&graph));
        run_one(
            &problem,
            &mut world,
            &mut RandomPolicy,
            "random",
            &opts,
            &run_id,
            "ctp",
            &mut log,
        );
    }
    if opts.policy.includes(PolicyChoice::Greedy) {
        let mut world = CtpWorld::new(Arc::clone(&graph));
        let mut greedy = GreedyPolicy::new(Arc::clone(&graph));
        run_one(
            &problem, &mut world, &mut greedy, "greedy", &opts, &run_id, "ctp", &mut log,
        );
    }
    if opts.policy.includes(PolicyChoice::Aot) {
        let engine_cfg = AotConfig::from(opts.config.engine);
        let base = GreedyPolicy::new(Arc::clone(&graph));
        let mut engine = AotPolicy::new(engine_cfg, base).unwrap_or_else(|e| {
            eprintln!("Invalid engine config: {}", e);
            process::exit(1);
        });
        let label = format!(
            "aot(greedy,width={},depth={},p={})",
            engine_cfg.width, engine_cfg.depth_bound, engine_cfg.parameter
        );
        let mut world = CtpWorld::new(Arc::clone(&graph));
        run_one(
            &problem, &mut world, &mut engine, &label, &opts, &run_id, "ctp", &mut log,
        );
        log_engine_stats(engine.stats(), "aot", &run_id, &mut log);
    }

    if let Some(writer) = &mut log {
        if let Err(e) = writer.flush() {
            eprintln!("Failed to flush log: {}", e);
            process::exit(1);
        }
    }
}

fn cmd_wumpus(args: &[String]) {
    let mut rows = 2usize;
    let mut cols = 2usize;
    let mut npits = 1usize;
    let mut nwumpus = 0usize;
    let mut opts = CommonOpts::new();

    let mut i = 0usize;
    while i < args.len() {
        match args[i].as_str() {
            "--help" | "-h" => {
                println!(
                    r#"ap wumpus

USAGE:
    ap wumpus [--rows R] [--cols C] [--npits P] [--nwumpus W] [OPTIONS]

OPTIONS:
    --rows R                     Cave rows (default: 2)
    --cols C                     Cave columns (default: 2)
    --npits P                    Number of pits (default: 1)
    --nwumpus W                  Number of wumpus (default: 0)
    --config PATH                Config file (YAML)
    --policy P                   random|greedy|aot|all (default: all)
    --width N                    Engine expansions per decision
    --depth-bound H              Engine evaluation horizon
    --parameter P                Inside/outside selection probability
    --eager                      Full-width action expansion (no rollout estimates)
    --expansions-per-iteration E Batch size between frontier rebuilds
    --trials N                   Evaluation episodes per policy
    --depth D                    Evaluation step budget per episode
    --seed S                     Evaluation base seed
    --log PATH                   Append NDJSON events to PATH
"#
                );
                return;
            }
            "--rows" => {
                rows = parse_value(args, i, "--rows");
                i += 2;
            }
            "--cols" => {
                cols = parse_value(args, i, "--cols");
                i += 2;
            }
            "--npits" => {
                npits = parse_value(args, i, "--npits");
                i += 2;
            }
            "--nwumpus" => {
                nwumpus = parse_value(args, i, "--nwumpus");
                i += 2;
            }
            other => match opts.consume(args, i) {
                Some(next) => i = next,
                None => {
                    eprintln!("Unknown option for `ap wumpus`: {}", other);
                    eprintln!("Run `ap wumpus --help` for usage.");
                    process::exit(1);
                }
            },
        }
    }

    if rows * cols > ap_wumpus::MAX_CELLS {
        eprintln!(
            "Cave too large: {}x{} exceeds {} cells",
            rows,
            cols,
            ap_wumpus::MAX_CELLS
        );
        process::exit(1);
    }
    if rows * cols < 2 || npits >= rows * cols || nwumpus >= rows * cols {
        eprintln!("Cave must have at least 2 cells and leave the entrance clear of hazards");
        process::exit(1);
    }

    let problem = WumpusProblem::new(rows, cols, npits, nwumpus);
    let run_id = format!("wumpus-{}", ts_ms());
    let mut log = opts.open_log();

    println!(
        "cave: {}x{}, {} pits, {} wumpus",
        rows, cols, npits, nwumpus
    );

    if opts.policy.includes(PolicyChoice::Random) {
        let mut world = WumpusWorld::new(problem.clone());
        run_one(
            &problem,
            &mut world,
            &mut RandomPolicy,
            "random",
            &opts,
            &run_id,
            "wumpus",
            &mut log,
        );
    }
    if opts.policy.includes(PolicyChoice::Greedy) {
        let mut world = WumpusWorld::new(problem.clone());
        run_one(
            &problem,
            &mut world,
            &mut WumpusGreedyPolicy,
            "greedy",
            &opts,
            &run_id,
            "wumpus",
            &mut log,
        );
    }
    if opts.policy.includes(PolicyChoice::Aot) {
        let engine_cfg = AotConfig::from(opts.config.engine);
        let mut engine = AotPolicy::new(engine_cfg, WumpusGreedyPolicy).unwrap_or_else(|e| {
            eprintln!("Invalid engine config: {}", e);
            process::exit(1);
        });
        let label = format!(
            "aot(greedy,width={},depth={},p={})",
            engine_cfg.width, engine_cfg.depth_bound, engine_cfg.parameter
        );
        let mut world = WumpusWorld::new(problem.clone());
        run_one(
            &problem, &mut world, &mut engine, &label, &opts, &run_id, "wumpus", &mut log,
        );
        log_engine_stats(engine.stats(), "aot", &run_id, &mut log);
    }

    if let Some(writer) = &mut log {
        if let Err(e) = writer.flush() {
            eprintln!("Failed to flush log: {}", e);
            process::exit(1);
        }
    }
}

fn main() {
    let args: Vec<String> = env::args().skip(1).collect();
    match args.first().map(String::as_str) {
        Some("ctp") => cmd_ctp(&args[1..]),
        Some("wumpus") => cmd_wumpus(&args[1..]),
        Some("--help") | Some("-h") => print_help(),
        Some("--version") | Some("-V") => {
            println!("ap {}", env!("CARGO_PKG_VERSION"));
        }
        Some(other) => {
            eprintln!("Unknown command: {}", other);
            print_help();
            process::exit(1);
        }
        None => {
            print_help();
            process::exit(1);
        }
    }
}
