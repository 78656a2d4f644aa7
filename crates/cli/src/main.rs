use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use fvs::api::{
    generate_points, is_valid_fvs, solve_with_report, DegreeCap, GenCfg, ReplayToken, SolverCfg,
};
use serde::Serialize;
use std::path::{Path, PathBuf};
use tracing::Level;
use tracing_subscriber::fmt::SubscriberBuilder;

mod io;
mod provenance;

#[derive(Parser)]
#[command(name = "fvs-cli")]
#[command(about = "Approximate minimum feedback vertex sets of proximity graphs")]
struct Cmd {
    /// Log per-round and per-pass events
    #[arg(long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    action: Action,
}

#[derive(Subcommand)]
enum Action {
    /// Solve one points file and write the FVS as JSON
    Solve {
        #[arg(long)]
        input: PathBuf,
        #[arg(long, default_value_t = 100.0)]
        threshold: f64,
        /// JSON output; stdout when omitted (no provenance sidecar then)
        #[arg(long)]
        out: Option<PathBuf>,
        #[command(flatten)]
        solver: SolverArgs,
    },
    /// Write a clustered synthetic instance as a points file
    Generate {
        #[arg(long)]
        out: PathBuf,
        #[command(flatten)]
        instance: InstanceArgs,
    },
    /// Generate, solve and validate repeatedly; print sizes and validity
    Bench {
        #[arg(long, default_value_t = 100)]
        trials: usize,
        #[arg(long, default_value_t = 100.0)]
        threshold: f64,
        #[command(flatten)]
        instance: InstanceArgs,
        #[command(flatten)]
        solver: SolverArgs,
    },
    /// Print version, code revision and default settings
    Report,
}

#[derive(Args)]
struct SolverArgs {
    #[arg(long, default_value_t = SolverCfg::default().population)]
    population: usize,
    #[arg(long, default_value_t = SolverCfg::default().patience)]
    patience: usize,
    #[arg(long, default_value_t = SolverCfg::default().max_rounds)]
    max_rounds: usize,
    /// Cap local-search passes per refinement (default: until convergence)
    #[arg(long)]
    ls_max_passes: Option<usize>,
    #[arg(long, default_value_t = SolverCfg::default().second_choice_prob)]
    second_choice_prob: f64,
    /// Seed for construction and shuffling (default: OS entropy)
    #[arg(long)]
    solver_seed: Option<u64>,
}

impl From<&SolverArgs> for SolverCfg {
    fn from(a: &SolverArgs) -> Self {
        SolverCfg {
            population: a.population,
            patience: a.patience,
            max_rounds: a.max_rounds,
            ls_max_passes: a.ls_max_passes,
            second_choice_prob: a.second_choice_prob,
            seed: a.solver_seed,
        }
    }
}

#[derive(Args)]
struct InstanceArgs {
    #[arg(long, default_value_t = GenCfg::default().count)]
    count: usize,
    #[arg(long, default_value_t = 0)]
    seed: u64,
    #[arg(long, default_value_t = 0)]
    index: u64,
    /// Reject points that would exceed `max_degree` neighbours within this distance
    #[arg(long)]
    cap_threshold: Option<f64>,
    #[arg(long, default_value_t = 5)]
    max_degree: usize,
}

impl InstanceArgs {
    fn gen_cfg(&self) -> GenCfg {
        GenCfg {
            count: self.count,
            degree_cap: self.cap_threshold.map(|threshold| DegreeCap {
                threshold,
                max_degree: self.max_degree,
            }),
            ..GenCfg::default()
        }
    }

    fn token(&self) -> ReplayToken {
        ReplayToken {
            seed: self.seed,
            index: self.index,
        }
    }
}

#[derive(Serialize)]
struct SolveOutput {
    threshold: f64,
    size: usize,
    fvs: Vec<[f64; 2]>,
    indices: Vec<usize>,
    history: Vec<usize>,
    rounds: usize,
    stop: String,
    anomalies: usize,
}

fn main() -> Result<()> {
    let cmd = Cmd::parse();
    let level = if cmd.verbose { Level::DEBUG } else { Level::INFO };
    SubscriberBuilder::default()
        .with_target(false)
        .with_max_level(level)
        .with_writer(std::io::stderr)
        .init();
    match cmd.action {
        Action::Solve {
            input,
            threshold,
            out,
            solver,
        } => solve(&input, threshold, out.as_deref(), &solver),
        Action::Generate { out, instance } => generate(&out, &instance),
        Action::Bench {
            trials,
            threshold,
            instance,
            solver,
        } => bench(trials, threshold, &instance, &solver),
        Action::Report => report(),
    }
}

fn solve(input: &Path, threshold: f64, out: Option<&Path>, solver: &SolverArgs) -> Result<()> {
    let points = io::read_points(input)?;
    tracing::info!(input = %input.display(), points = points.len(), "loaded");
    let cfg = SolverCfg::from(solver);
    let report = solve_with_report(&points, threshold, cfg)
        .with_context(|| format!("solving {}", input.display()))?;

    let output = SolveOutput {
        threshold,
        size: report.fvs.len(),
        fvs: report.fvs.iter().map(|p| [p.x, p.y]).collect(),
        indices: report.indices,
        history: report.history,
        rounds: report.rounds,
        stop: report.stop.to_string(),
        anomalies: report.anomalies,
    };
    let body = serde_json::to_vec_pretty(&output)?;
    let Some(out) = out else {
        println!("{}", String::from_utf8_lossy(&body));
        return Ok(());
    };
    if let Some(parent) = out.parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("creating dir {}", parent.display()))?;
        }
    }
    std::fs::write(out, body).with_context(|| format!("writing {}", out.display()))?;

    let params = serde_json::json!({
        "input": input.to_string_lossy(),
        "threshold": threshold,
        "solver": cfg_json(&cfg),
    });
    let sidecar = provenance::write_sidecar(out, provenance::RunRecord::new("solve", params))?;
    tracing::info!(out = %out.display(), sidecar = %sidecar.display(), size = output.size, "written");
    Ok(())
}

fn generate(out: &Path, instance: &InstanceArgs) -> Result<()> {
    let points = generate_points(instance.gen_cfg(), instance.token())
        .context("generating instance")?;
    io::write_points(out, &points)?;
    tracing::info!(
        out = %out.display(),
        count = points.len(),
        seed = instance.seed,
        index = instance.index,
        "generated"
    );
    Ok(())
}

fn bench(trials: usize, threshold: f64, instance: &InstanceArgs, solver: &SolverArgs) -> Result<()> {
    let cfg = SolverCfg::from(solver);
    let gen_cfg = instance.gen_cfg();
    let mut tok = instance.token();
    let mut total = 0usize;
    let mut valid = 0usize;
    for trial in 1..=trials {
        let points = generate_points(gen_cfg, tok)
            .with_context(|| format!("generating trial {trial} ({tok:?})"))?;
        let report = solve_with_report(&points, threshold, cfg)
            .with_context(|| format!("solving trial {trial}"))?;
        let ok = is_valid_fvs(&points, &report.fvs, threshold);
        total += report.fvs.len();
        valid += usize::from(ok);
        println!(
            "trial {trial}: size {} valid {ok} rounds {} running average {:.3}",
            report.fvs.len(),
            report.rounds,
            total as f64 / trial as f64
        );
        tok = tok.next();
    }
    if trials > 0 {
        println!("average size {:.3}", total as f64 / trials as f64);
    }
    println!("Valid solutions {valid}/{trials}");
    Ok(())
}

fn report() -> Result<()> {
    let obj = serde_json::json!({
        "code_rev": provenance::current_git_rev(),
        "fvs_version": fvs::VERSION,
        "solver_defaults": cfg_json(&SolverCfg::default()),
        "generator_defaults": {
            "count": GenCfg::default().count,
            "width": GenCfg::default().width,
            "height": GenCfg::default().height,
            "radius": GenCfg::default().radius,
        },
    });
    println!("{}", serde_json::to_string_pretty(&obj)?);
    Ok(())
}

fn cfg_json(cfg: &SolverCfg) -> serde_json::Value {
    serde_json::json!({
        "population": cfg.population,
        "patience": cfg.patience,
        "max_rounds": cfg.max_rounds,
        "ls_max_passes": cfg.ls_max_passes,
        "second_choice_prob": cfg.second_choice_prob,
        "seed": cfg.seed,
    })
}
