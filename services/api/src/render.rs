use rust_decimal::Decimal;
use sales_comp::compensation::{
    Classification, CurrencyFormat, HeadEvaluation, PipelineView, RubricEntry, ScorecardResult,
    SdrBreakdown, TriggerStatus, HIGH_SCORE_THRESHOLD,
};

pub(crate) fn classification_lines(
    format: &CurrencyFormat,
    contract_value: Decimal,
    classification: &Classification,
) -> Vec<String> {
    vec![format!(
        "{} -> {} {} | commission {}",
        format.format(contract_value),
        classification.icon,
        classification.label,
        format.format(classification.commission)
    )]
}

pub(crate) fn pipeline_lines(view: &PipelineView) -> Vec<String> {
    let mut lines = Vec::new();
    lines.push(format!("Closer pipeline ({} deals)", view.summary.deal_count));

    if view.deals.is_empty() {
        lines.push("- no deals yet".to_string());
    }
    for deal in &view.deals {
        lines.push(format!(
            "- #{} {} | {} | {}",
            deal.sequence, deal.contract_value_display, deal.classification, deal.commission_display
        ));
    }

    let display = &view.display;
    lines.push(format!("Total revenue: {}", display.total_revenue));
    lines.push(format!(
        "Trigger: {} ({})",
        display.trigger_status_label, display.trigger_delta
    ));
    if display.trigger_status == TriggerStatus::Locked {
        lines.push(display.progress.clone());
    }
    lines.push(format!(
        "Final commission: {} ({})",
        display.final_commission, display.commission_status
    ));
    lines
}

pub(crate) fn sdr_lines(format: &CurrencyFormat, breakdown: &SdrBreakdown) -> Vec<String> {
    let mut lines = vec![format!("SDR payout ({})", breakdown.policy.label())];
    if breakdown.high_score_adjusted {
        lines.push(format!(
            "! high-score leads capped at the qualified total ({})",
            breakdown.high_score
        ));
    }
    if breakdown.volume_met {
        lines.push("Volume gate: met".to_string());
    } else {
        lines.push(format!(
            "Volume gate: {} more qualifying leads needed",
            breakdown.volume_shortfall
        ));
    }
    lines.push(format!(
        "- Qualified leads ({}): {}",
        breakdown.qualified,
        format.format(breakdown.pillar1)
    ));
    lines.push(format!(
        "- High-score leads ({}): {}",
        breakdown.high_score,
        format.format(breakdown.pillar2)
    ));
    lines.push(format!(
        "- Closed deals ({}): {}",
        breakdown.closed_deals,
        format.format(breakdown.pillar3)
    ));
    lines.push(format!("Total: {}", format.format(breakdown.total)));
    lines
}

pub(crate) fn scorecard_lines(result: &ScorecardResult) -> Vec<String> {
    let verdict = if result.high_score {
        "HIGH SCORE".to_string()
    } else {
        format!(
            "{} points short of {}",
            result.points_to_high_score, HIGH_SCORE_THRESHOLD
        )
    };
    let mut lines = vec![format!("Lead score: {}/100 ({verdict})", result.score)];
    for criterion in &result.met {
        lines.push(format!("- {} (+{})", criterion.label(), criterion.weight()));
    }
    lines
}

pub(crate) fn rubric_lines(rubric: &[RubricEntry]) -> Vec<String> {
    rubric
        .iter()
        .map(|entry| {
            format!(
                "- {}: {} points ({:?})",
                entry.label, entry.weight, entry.importance
            )
        })
        .collect()
}

pub(crate) fn head_lines(format: &CurrencyFormat, evaluation: &HeadEvaluation) -> Vec<String> {
    let mut lines = vec![
        format!("Head payout ({})", evaluation.strategy),
        format!(
            "SDR attainment: {}% ({})",
            evaluation.sdr_attainment_pct.round_dp(1),
            evaluation.sdr_band.label()
        ),
        format!("Closer band: {}", evaluation.closer_band.label()),
    ];
    if let Some(multiplier) = evaluation.multiplier {
        lines.push(format!("Multiplier: {multiplier}x"));
    }
    if let Some(rate) = evaluation.revenue_rate {
        let percent = (rate * Decimal::ONE_HUNDRED).normalize();
        lines.push(format!("Revenue share: {percent}%"));
        lines.push(format!(
            "Milestone bonus: {}",
            format.format(evaluation.milestone_bonus)
        ));
    }
    lines.push(format!(
        "Head commission: {}",
        format.format(evaluation.head_commission)
    ));
    lines
}

pub(crate) fn print_lines(lines: &[String]) {
    for line in lines {
        println!("{line}");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;
    use sales_comp::compensation::{
        classify, CommissionSchedule, ContractValue, HeadInputs, HeadStrategy, Pipeline,
        RateBonusPlan, ScorecardCriteria, SdrCounters, SdrGatePolicy, SdrPlan,
    };

    #[test]
    fn locked_pipeline_shows_progress_and_pending_commission() {
        let mut pipeline = Pipeline::new(CommissionSchedule::standard());
        pipeline.add(dec!(45000)).expect("deal added");
        let lines = pipeline_lines(&pipeline.view(&CurrencyFormat::brl()));

        assert!(lines.contains(&"Trigger: LOCKED (- R$ 55.000,00 to go)".to_string()));
        assert!(lines.contains(&"Progress to unlock: 45%".to_string()));
        assert!(lines.contains(&"Final commission: R$ 0,00 (Pending)".to_string()));
    }

    #[test]
    fn classification_line_includes_tier_decoration() {
        let classification = classify(ContractValue::new(dec!(95000)).expect("valid"));
        let lines = classification_lines(&CurrencyFormat::brl(), dec!(95000), &classification);
        assert_eq!(
            lines,
            vec!["R$ 95.000,00 -> 🌟 Gold ICP | commission R$ 1.600,00".to_string()]
        );
    }

    #[test]
    fn sdr_lines_flag_clamped_counts() {
        let breakdown = SdrPlan::new(SdrGatePolicy::IndependentPillars).evaluate(SdrCounters {
            qualified: 5,
            high_score: 8,
            closed_deals: 0,
        });
        let lines = sdr_lines(&CurrencyFormat::brl(), &breakdown);
        assert!(lines[1].starts_with("! high-score leads capped"));
        assert!(lines.contains(&"Volume gate: 5 more qualifying leads needed".to_string()));
    }

    #[test]
    fn scorecard_lines_report_the_gap() {
        let result = ScorecardCriteria {
            units_over_200: true,
            urgency: true,
            ..ScorecardCriteria::default()
        }
        .score();
        assert_eq!(scorecard_lines(&result)[0], "Lead score: 45/100 (30 points short of 75)");
    }

    #[test]
    fn head_lines_show_rate_and_bonus() {
        let evaluation = HeadStrategy::RateBonus(RateBonusPlan::default())
            .evaluate(&HeadInputs {
                closer_revenue: dec!(120000),
                closer_final_commission: dec!(2000),
                high_score_delivered: 10,
                high_score_target: 20,
            })
            .expect("evaluated");
        let lines = head_lines(&CurrencyFormat::brl(), &evaluation);
        assert!(lines.contains(&"Revenue share: 2.5%".to_string()));
        assert!(lines.contains(&"Milestone bonus: R$ 1.500,00".to_string()));
        assert!(lines.contains(&"Head commission: R$ 4.500,00".to_string()));
    }
}
