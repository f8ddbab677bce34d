//! Text rendering of a battle report
//!
//! Per-round group lines, per-force summaries and the final casualty table.

use battle_core::combat::{BattleOutcome, BattleReport, ForceSnapshot, RoundReport};
use std::fmt;

const RULE_WIDTH: usize = 60;
const TABLE_WIDTH: usize = 96;

/// Console rendering of a finished battle
pub struct TextReport<'a> {
    pub report: &'a BattleReport,
    /// Whether random factors were drawn; printed in the header
    pub randomness: bool,
    /// List every group each round, not only those with losses
    pub detailed: bool,
}

impl fmt::Display for TextReport<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let report = self.report;
        writeln!(f, "=== Battle: {} vs {} ===", report.force_a.name, report.force_b.name)?;
        writeln!(
            f,
            "Mode: {} | Random: {} | Detailed: {}",
            report.mode, self.randomness, self.detailed
        )?;

        for round in &report.rounds {
            self.write_round(f, round)?;
        }

        let heavy = "=".repeat(RULE_WIDTH);
        writeln!(f)?;
        writeln!(f, "{}", heavy)?;
        writeln!(f, "Final results")?;
        writeln!(f, "{}", heavy)?;
        write_final_stats(f, &report.force_a)?;
        writeln!(f, "{}", "-".repeat(RULE_WIDTH))?;
        write_final_stats(f, &report.force_b)?;
        writeln!(f, "{}", heavy)?;
        writeln!(
            f,
            "Outcome: {} after {} round(s)",
            outcome_text(report.outcome, &report.force_a.name, &report.force_b.name),
            report.rounds_fought
        )
    }
}

impl TextReport<'_> {
    fn write_round(&self, f: &mut fmt::Formatter<'_>, round: &RoundReport) -> fmt::Result {
        writeln!(f)?;
        writeln!(f, "Round {}:", round.round)?;
        if self.randomness {
            writeln!(
                f,
                "  Factors: attack {:.3} | defense {:.3}",
                round.attack_factor, round.defense_factor
            )?;
        }
        self.write_round_details(f, &round.force_a)?;
        self.write_round_details(f, &round.force_b)?;
        write_summary(f, &round.force_a)?;
        write_summary(f, &round.force_b)
    }

    fn write_round_details(&self, f: &mut fmt::Formatter<'_>, force: &ForceSnapshot) -> fmt::Result {
        writeln!(f, "  > {} details:", force.name)?;
        let mut any = false;
        for (formation, group) in force.groups() {
            if !self.detailed && !group.had_losses() {
                continue;
            }
            any = true;
            let name = format!("[{}] {}", formation.name, group.name);
            let status = format!(
                "HP {:.2}/{:.1} ({:.2}%)",
                group.current_hp,
                group.max_hp,
                group.hp_ratio * 100.0
            );
            let loss = format!(
                "Lost {:.2} ({:.2}%)",
                group.round_hp_loss,
                group.round_loss_percent()
            );
            let dead = if group.round_dead > 0 {
                format!(" x{} dead", group.round_dead)
            } else {
                String::new()
            };
            writeln!(f, "    * {:<28} | {:<22} | {:<18}{}", name, status, loss, dead)?;
        }
        if !any && !self.detailed {
            writeln!(f, "    (no losses)")?;
        }
        Ok(())
    }
}

fn write_summary(f: &mut fmt::Formatter<'_>, force: &ForceSnapshot) -> fmt::Result {
    let buildings: Vec<String> = force
        .formations
        .iter()
        .filter_map(|formation| {
            formation.fortification.as_ref().map(|fort| {
                format!("{}:{}({:.2}%)", formation.name, fort.name, fort.mitigation_percent)
            })
        })
        .collect();
    let buildings = if buildings.is_empty() {
        String::new()
    } else {
        format!(" | Bld: {}", buildings.join(", "))
    };
    writeln!(
        f,
        "  Summary {}: HP {:.2} (Cnt: {}){}",
        force.name, force.total_hp, force.total_count, buildings
    )
}

fn write_final_stats(f: &mut fmt::Formatter<'_>, force: &ForceSnapshot) -> fmt::Result {
    writeln!(f, "[{}] final report:", force.name)?;
    writeln!(
        f,
        "  {:<30} | {:<20} | {:<20} | {:<20}",
        "UNIT (STACK)", "START (HP/CNT)", "END (HP/CNT)", "LOSS (HP/CNT)"
    )?;
    let rule = format!("  {}", "-".repeat(TABLE_WIDTH));
    writeln!(f, "{}", rule)?;

    for (formation, group) in force.groups() {
        let lost = group.hp_lost();
        let lost_percent = if group.initial_hp > 0.0 {
            lost / group.initial_hp * 100.0
        } else {
            0.0
        };
        let name = format!("[{}] {}", formation.name, group.name);
        let start = format!("{:.1} / {}", group.initial_hp, group.initial_count);
        let end = format!("{:.2} / {}", group.current_hp, group.count);
        let loss = format!("-{:.2} ({:.2}%) / -{}", lost, lost_percent, group.count_lost());
        writeln!(f, "  {:<30} | {:<20} | {:<20} | {:<20}", name, start, end, loss)?;
    }

    writeln!(f, "{}", rule)?;
    writeln!(
        f,
        "  TOTAL CASUALTIES: {} units died, {:.2} HP lost.",
        force.total_count_lost(),
        force.total_hp_lost()
    )?;

    for formation in &force.formations {
        if let Some(fort) = &formation.fortification {
            writeln!(
                f,
                "  [Stack {}] BUILDING: {} | Start: {:.2} -> End: {:.2} | Lost: {:.2}",
                formation.name,
                fort.name,
                fort.initial_hp,
                fort.current_hp,
                fort.hp_lost()
            )?;
        }
    }
    Ok(())
}

fn outcome_text(outcome: BattleOutcome, force_a: &str, force_b: &str) -> String {
    match outcome {
        BattleOutcome::AttackerVictory => format!("{} wins", force_a),
        BattleOutcome::DefenderVictory => format!("{} wins", force_b),
        BattleOutcome::MutualDestruction => "both forces destroyed".to_string(),
        BattleOutcome::RoundLimit => "round limit reached".to_string(),
    }
}
