//! Binary that plans a crafting rule file and prints a deterministic
//! report.
//!
//! Usage: `stratagem [RULES.json] [--entity NAME] [-v | -vv]`
//!
//! `RULES.json` defaults to `crafting.json` in the working directory.
//! `-v` adds search counters, `-vv` additionally dumps the trace. An
//! exhausted search reports `no plan found`.
//!
//! Exit codes: 0 plan found, 1 search exhausted, 2 configuration or
//! rule-file error.

use std::path::{Path, PathBuf};
use std::process::ExitCode;

use stratagem_harness::runner::{run_file, PlanReportV1};
use stratagem_planner::{TerminationV1, TraceEventV1};

struct Args {
    rules: PathBuf,
    entity: String,
    verbosity: u8,
}

fn parse_args() -> Result<Args, String> {
    let mut rules: Option<PathBuf> = None;
    let mut entity = "agent".to_string();
    let mut verbosity = 0u8;

    let mut argv = std::env::args().skip(1);
    while let Some(arg) = argv.next() {
        match arg.as_str() {
            "-v" => verbosity = verbosity.max(1),
            "-vv" => verbosity = 2,
            "--entity" => {
                entity = argv
                    .next()
                    .ok_or_else(|| "--entity requires a value".to_string())?;
            }
            "--help" | "-h" => {
                return Err("usage: stratagem [RULES.json] [--entity NAME] [-v | -vv]".into());
            }
            other if other.starts_with('-') => {
                return Err(format!("unknown flag: {other}"));
            }
            other => {
                if rules.replace(PathBuf::from(other)).is_some() {
                    return Err("at most one rule file may be given".into());
                }
            }
        }
    }

    Ok(Args {
        rules: rules.unwrap_or_else(|| PathBuf::from("crafting.json")),
        entity,
        verbosity,
    })
}

fn render_trace_event(event: &TraceEventV1) -> String {
    match event {
        TraceEventV1::TaskExpanded { task, candidates } => {
            format!("expand {task} candidates={candidates}")
        }
        TraceEventV1::MethodAttempted { task, method } => {
            format!("attempt {task} method={method}")
        }
        TraceEventV1::MethodInfeasible { task, method } => {
            format!("infeasible {task} method={method}")
        }
        TraceEventV1::OperatorApplied { task } => format!("apply {task}"),
        TraceEventV1::OperatorRejected { task, detail } => {
            format!("reject {task}: {detail}")
        }
        TraceEventV1::BranchPruned { task, check } => {
            format!("prune {task} check={check}")
        }
        TraceEventV1::Backtracked { task, method } => {
            format!("backtrack {task} method={method}")
        }
    }
}

fn render_report(rules: &Path, report: &PlanReportV1, verbosity: u8) -> Vec<String> {
    let mut lines = vec![
        format!("rules={}", rules.display()),
        format!("rule_digest={}", report.rule_digest.as_str()),
    ];
    match report.termination {
        TerminationV1::GoalReached => lines.push("termination=goal_reached".into()),
        TerminationV1::Exhausted => {
            lines.push("termination=exhausted".into());
            lines.push("no plan found".into());
        }
    }

    if let Some(plan) = &report.plan {
        lines.push(format!("plan_length={}", plan.len()));
        if let Some(digest) = &report.plan_digest {
            lines.push(format!("plan_digest={}", digest.as_str()));
        }
        for (step, task) in plan.iter().enumerate() {
            lines.push(format!("step[{step}]={}", task.key()));
        }
    }

    if verbosity >= 1 {
        let stats = &report.stats;
        lines.push(format!("expansions={}", stats.expansions));
        lines.push(format!(
            "operator_applications={}",
            stats.operator_applications
        ));
        lines.push(format!("operator_rejections={}", stats.operator_rejections));
        lines.push(format!("methods_infeasible={}", stats.methods_infeasible));
        lines.push(format!("branches_pruned={}", stats.branches_pruned));
        lines.push(format!("backtracks={}", stats.backtracks));
        lines.push(format!("max_depth_reached={}", stats.max_depth_reached));
    }
    if verbosity >= 2 {
        for event in &report.trace.events {
            lines.push(format!("trace: {}", render_trace_event(event)));
        }
    }

    lines
}

fn main() -> ExitCode {
    let args = match parse_args() {
        Ok(args) => args,
        Err(msg) => {
            eprintln!("{msg}");
            return ExitCode::from(2);
        }
    };

    let report = match run_file(&args.rules, &args.entity) {
        Ok(report) => report,
        Err(err) => {
            eprintln!("stratagem: {err}");
            return ExitCode::from(2);
        }
    };

    for line in render_report(&args.rules, &report, args.verbosity) {
        println!("{line}");
    }

    match report.termination {
        TerminationV1::GoalReached => ExitCode::SUCCESS,
        TerminationV1::Exhausted => ExitCode::from(1),
    }
}
