use super::Session;
use crate::output::{bar, print_json, print_table};
use catalyst_core::summary::CycleSummary;
use chrono::Utc;
use std::path::Path;

pub fn run(root: &Path, json: bool) -> anyhow::Result<()> {
    let session = Session::open(root)?;
    let summary = CycleSummary::of(session.cycle(), Utc::now());

    if json {
        return print_json(&summary);
    }

    let vision = if summary.vision.is_empty() {
        "(not set)"
    } else {
        summary.vision.as_str()
    };
    println!("Vision:   {vision}");
    println!(
        "Week {} of 12, {} days left. Streak: {} week(s) at 85%+",
        summary.current_week, summary.days_left, summary.streak
    );
    println!(
        "Average:  {}% ({})",
        summary.average_percent(),
        if summary.on_track { "on track" } else { "below 85%" }
    );
    println!();

    let rows: Vec<Vec<String>> = summary
        .chart
        .iter()
        .enumerate()
        .map(|(i, point)| {
            let marker = if i + 1 == summary.current_week as usize { "<" } else { "" };
            vec![
                point.week.clone(),
                format!("{:>3}%", point.score),
                bar(point.score),
                marker.to_string(),
            ]
        })
        .collect();
    print_table(&["WEEK", "SCORE", "", ""], rows);

    if summary.goals.is_empty() {
        println!("\nNo goals yet. Add one with `catalyst goal add \"...\"`.");
        return Ok(());
    }

    println!();
    let rows: Vec<Vec<String>> = summary
        .goals
        .iter()
        .enumerate()
        .map(|(i, g)| {
            let lag = if g.lag_indicator.is_empty() {
                "-".to_string()
            } else {
                format!("{}: {} / {}", g.lag_indicator, g.current_lag_value, g.target_lag_value)
            };
            vec![
                (i + 1).to_string(),
                g.title.clone(),
                g.tactic_count.to_string(),
                lag,
                format!("{:.0}%", g.percent),
            ]
        })
        .collect();
    print_table(&["#", "GOAL", "TACTICS", "LAG MEASURE", "PROGRESS"], rows);
    Ok(())
}
