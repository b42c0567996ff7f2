//! Headless match runner
//!
//! Runs one full match between two named balls and prints the result:
//!
//! ```text
//! bounce-battle [name1] [name2] [seed]
//! ```

use bounce_battle::hall_of_fame::format_duration;
use bounce_battle::sim::state::MatchOutcome;
use bounce_battle::sim::{MatchState, tick};
use bounce_battle::Tuning;

const DT: f32 = 1.0 / 60.0;
/// Give up after ten simulated minutes
const MAX_SIM_SECONDS: f32 = 600.0;

fn main() {
    env_logger::init();

    let args: Vec<String> = std::env::args().collect();
    let name_a = args.get(1).map(String::as_str).unwrap_or("Zeus");
    let name_b = args.get(2).map(String::as_str).unwrap_or("Apollo");
    let seed = args
        .get(3)
        .and_then(|s| s.parse().ok())
        .unwrap_or_else(|| {
            std::time::SystemTime::now()
                .duration_since(std::time::UNIX_EPOCH)
                .map(|d| d.as_secs())
                .unwrap_or(0)
        });

    let tuning = Tuning::default();
    let mut state = MatchState::new(name_a, name_b, &tuning, seed);

    for ball in &state.balls {
        println!(
            "{}: power {}, hp {}, passive {} ({})",
            ball.name,
            ball.power_score,
            ball.max_hp,
            ball.ability.kind.name(),
            ball.passive_tier.as_str(),
        );
    }
    println!();

    let max_ticks = (MAX_SIM_SECONDS / DT) as u64;
    let mut next_report = 10.0;

    for _ in 0..max_ticks {
        tick(&mut state, DT);

        if state.elapsed >= next_report {
            next_report += 10.0;
            let [a, b] = &state.balls;
            println!(
                "[{}] {} {:.0}/{:.0} | {} {:.0}/{:.0}",
                format_duration(state.elapsed),
                a.name,
                a.hp.max(0.0),
                a.max_hp,
                b.name,
                b.hp.max(0.0),
                b.max_hp,
            );
        }

        if state.outcome().is_over() {
            break;
        }
    }

    println!();
    match state.outcome() {
        MatchOutcome::Winner(index) => {
            println!(
                "{} WINS after {} (seed {seed})",
                state.balls[index].name,
                format_duration(state.elapsed)
            );
        }
        MatchOutcome::Draw => {
            println!("DRAW after {} (seed {seed})", format_duration(state.elapsed));
        }
        MatchOutcome::InProgress => {
            println!(
                "No decision within {} (seed {seed})",
                format_duration(MAX_SIM_SECONDS)
            );
        }
    }
}
