// Demonstration: run a simulated matching session and compare policies.
//
// Build/run from this repo root:
//   cargo run --example session_demo -- --policy mixed --groups 6 --rounds 4 --rule threshold

use std::env;

use slotmatch::simulation::{DecisionRule, RandomRule, Session, ThresholdRule};
use slotmatch::{MarketConfig, Policy};
use tracing_subscriber::EnvFilter;

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let args: Vec<String> = env::args().collect();
    let policy_name = arg_value(&args, "--policy").unwrap_or("mixed");
    let groups: usize = arg_value(&args, "--groups")
        .and_then(|s| s.parse().ok())
        .unwrap_or(6);
    let rounds: u32 = arg_value(&args, "--rounds")
        .and_then(|s| s.parse().ok())
        .unwrap_or(4);
    let seed: u64 = arg_value(&args, "--seed")
        .and_then(|s| s.parse().ok())
        .unwrap_or(42);

    let config = MarketConfig {
        num_rounds: rounds,
        ..MarketConfig::default()
    };
    let mut session = match Session::new(config, seed) {
        Ok(session) => session,
        Err(e) => {
            eprintln!("{}", e);
            std::process::exit(2);
        }
    };

    let fixed = match policy_name {
        "mixed" => None,
        label => match label.parse::<Policy>() {
            Ok(policy) => Some(policy),
            Err(e) => {
                eprintln!("{}; expected 'mixed', 'fair', 'self' or 'rand'.", e);
                std::process::exit(2);
            }
        },
    };
    for _ in 0..groups {
        let added = match fixed {
            Some(policy) => session.add_group(policy).map(|_| ()),
            None => session.add_sampled_group().map(|_| ()),
        };
        if let Err(e) = added {
            eprintln!("{}", e);
            std::process::exit(1);
        }
    }

    let mut rule: Box<dyn DecisionRule> = match arg_value(&args, "--rule").unwrap_or("threshold") {
        "random" => Box::new(RandomRule::new(seed)),
        "threshold" => Box::new(ThresholdRule::default()),
        other => {
            eprintln!("Unknown --rule '{}'; expected 'threshold' or 'random'.", other);
            std::process::exit(2);
        }
    };

    match session.run(rule.as_mut()) {
        Ok(metrics) => {
            println!("Rule: {}", rule.name());
            println!("{}", metrics);
        }
        Err(e) => {
            eprintln!("Session failed: {}", e);
            std::process::exit(1);
        }
    }
}

fn arg_value<'a>(args: &'a [String], key: &str) -> Option<&'a str> {
    args.iter()
        .position(|a| a == key)
        .and_then(|i| args.get(i + 1))
        .map(|s| s.as_str())
}
