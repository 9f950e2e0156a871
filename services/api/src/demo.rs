use crate::infra::load_policy;
use crate::render::{
    head_lines, pipeline_lines, print_lines, rubric_lines, scorecard_lines, sdr_lines,
};
use clap::Args;
use rust_decimal_macros::dec;
use sales_comp::compensation::{
    rubric, CompensationPolicy, CurrencyFormat, HeadInputs, HeadStrategy, MultiplierMatrix,
    Pipeline, RateBonusPlan, ScorecardCriteria, SdrCounters, SdrGatePolicy, SdrPlan,
};
use sales_comp::error::AppError;

#[derive(Args, Debug, Default)]
pub(crate) struct DemoArgs {
    /// Leadership credential; the Head section stays hidden without it.
    #[arg(long)]
    pub(crate) credential: Option<String>,
    /// Skip the SDR and scorecard sections.
    #[arg(long)]
    pub(crate) closer_only: bool,
}

pub(crate) fn run_demo(args: DemoArgs) -> Result<(), AppError> {
    let (config, policy) = load_policy()?;
    let currency = config.compensation.currency_format();

    println!("Sales compensation demo");
    println!(
        "Policy: SDR {} | Head {}",
        policy.sdr.policy.label(),
        policy.head.label()
    );

    let pipeline = render_closer_walkthrough(&policy, &currency);

    if !args.closer_only {
        render_scorecard_walkthrough();
        render_sdr_comparison(&currency);
    }

    let unlocked = args
        .credential
        .as_deref()
        .map(|credential| config.compensation.leadership_gate().unlock(credential).is_ok())
        .unwrap_or(false);

    if unlocked {
        render_head_comparison(&currency, &pipeline);
    } else {
        println!("\nHead panel locked (pass --credential with the leadership secret)");
    }

    Ok(())
}

fn render_closer_walkthrough(policy: &CompensationPolicy, currency: &CurrencyFormat) -> Pipeline {
    println!("\nCloser pipeline walkthrough");
    let mut pipeline = Pipeline::new(policy.closer.clone());

    for value in [dec!(45000), dec!(35000), dec!(95000)] {
        if pipeline.add(value).is_err() {
            continue;
        }
        println!("\nAfter adding {}:", currency.format(value));
        print_lines(&pipeline_lines(&pipeline.view(currency)));
    }

    pipeline
}

fn render_scorecard_walkthrough() {
    println!("\nLead scorecard");
    print_lines(&rubric_lines(&rubric()));

    let lead = ScorecardCriteria {
        units_over_200: true,
        urgency: true,
        openness_to_proposal: true,
        clear_pain: true,
        ..ScorecardCriteria::default()
    };
    println!("\nSample lead:");
    print_lines(&scorecard_lines(&lead.score()));
}

fn render_sdr_comparison(currency: &CurrencyFormat) {
    let counters = SdrCounters {
        qualified: 8,
        high_score: 4,
        closed_deals: 1,
    };
    println!(
        "\nSDR month: {} qualified, {} high score, {} closed",
        counters.qualified, counters.high_score, counters.closed_deals
    );

    for gate in [SdrGatePolicy::IndependentPillars, SdrGatePolicy::CombinedGate] {
        println!();
        print_lines(&sdr_lines(currency, &SdrPlan::new(gate).evaluate(counters)));
    }
}

fn render_head_comparison(currency: &CurrencyFormat, pipeline: &Pipeline) {
    let inputs = HeadInputs::from_summary(&pipeline.summary(), 19, 20);
    let strategies = [
        HeadStrategy::MultiplierMatrix(MultiplierMatrix::conservative()),
        HeadStrategy::MultiplierMatrix(MultiplierMatrix::progressive()),
        HeadStrategy::RateBonus(RateBonusPlan::default()),
    ];

    println!(
        "\nHead panel (SDR delivered {} of {} high-score leads)",
        inputs.high_score_delivered, inputs.high_score_target
    );
    for strategy in strategies {
        println!();
        match strategy.evaluate(&inputs) {
            Ok(evaluation) => print_lines(&head_lines(currency, &evaluation)),
            Err(err) => println!("{}: {}", strategy.label(), err),
        }
    }
}
