use someip_sd_timing::analysis::{analyze_system, highest_impact_relation, ssg15, timing_analysis_system};
use someip_sd_timing::logging::{LogFacade, LogLevel, TimingLogger};
use someip_sd_timing::SystemConfig;
use std::process::ExitCode;

fn usage() -> ExitCode {
    eprintln!("usage: sd_timing <system.json> [--ssg15]");
    ExitCode::from(2)
}

fn main() -> ExitCode {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();

    let args: Vec<String> = std::env::args().skip(1).collect();
    let mut path = None;
    let mut use_ssg15 = false;
    for arg in &args {
        match arg.as_str() {
            "--ssg15" => use_ssg15 = true,
            "-h" | "--help" => return usage(),
            other if path.is_none() => path = Some(other.to_string()),
            _ => return usage(),
        }
    }
    let Some(path) = path else {
        return usage();
    };

    let logger = LogFacade::new();
    logger.log(LogLevel::Info, "Main", &format!("Loading system from {}", path));

    let system = match SystemConfig::load(&path).and_then(SystemConfig::into_system) {
        Ok(system) => system,
        Err(e) => {
            eprintln!("Failed to load '{}': {}", path, e);
            return ExitCode::FAILURE;
        }
    };

    if use_ssg15 {
        let mut failed = false;
        for relation in &system {
            match ssg15::timing_analysis(relation.service(), relation.client(), relation.t_c(), &*logger) {
                Ok(time) => println!("{}: {:.2} ms (from client boot)", relation, time),
                Err(e) => {
                    println!("{}: error: {}", relation, e);
                    failed = true;
                }
            }
        }
        return if failed { ExitCode::FAILURE } else { ExitCode::SUCCESS };
    }

    let mut failed = false;
    for (relation, outcome) in system.iter().zip(analyze_system(&system, &*logger)) {
        match outcome {
            Ok(analysis) => println!("{}", analysis),
            Err(e) => {
                println!("{}: error: {}", relation, e);
                failed = true;
            }
        }
    }
    if failed {
        return ExitCode::FAILURE;
    }

    match (
        timing_analysis_system(&system, &*logger),
        highest_impact_relation(&system, &*logger),
    ) {
        (Ok(time), Ok(relation)) => {
            println!("System discovery time: {:.2} ms", time);
            println!("Highest impact relation: {}", relation);
            ExitCode::SUCCESS
        }
        (Err(e), _) | (_, Err(e)) => {
            eprintln!("System analysis failed: {}", e);
            ExitCode::FAILURE
        }
    }
}
