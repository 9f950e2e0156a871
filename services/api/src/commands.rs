use crate::infra::{load_policy, parse_money};
use crate::render::{
    classification_lines, head_lines, pipeline_lines, print_lines, rubric_lines, scorecard_lines,
    sdr_lines,
};
use clap::Args;
use sales_comp::compensation::{
    import_deals, rubric, CompensationPolicy, ContractValue, CurrencyFormat, HeadInputs, Money,
    Pipeline, ScorecardCriteria, SdrCounters, SdrGatePolicy,
};
use sales_comp::error::AppError;
use std::fs::File;
use std::io::BufReader;
use std::path::PathBuf;

#[derive(Args, Debug)]
pub(crate) struct ClassifyArgs {
    /// Contract value, plain (35000.50) or formatted (R$ 35.000,50)
    #[arg(value_parser = parse_contract_value)]
    pub(crate) contract_value: ContractValue,
}

#[derive(Args, Debug, Default)]
pub(crate) struct PipelineArgs {
    /// Contract values to add to the pipeline, in order
    #[arg(value_parser = parse_money)]
    pub(crate) values: Vec<Money>,
    /// CSV export with a contract_value column, appended after the listed values
    #[arg(long)]
    pub(crate) csv: Option<PathBuf>,
}

#[derive(Args, Debug)]
pub(crate) struct SdrArgs {
    /// Qualified leads delivered in the period
    #[arg(long, default_value_t = 0)]
    pub(crate) qualified: u32,
    /// Qualified leads that scored 75 or more
    #[arg(long, default_value_t = 0)]
    pub(crate) high_score: u32,
    /// Deals closed from the SDR's leads
    #[arg(long, default_value_t = 0)]
    pub(crate) closed: u32,
    /// Volume gate: independent (A) or combined (B). Defaults to the configured policy.
    #[arg(long, value_parser = parse_gate_policy)]
    pub(crate) policy: Option<SdrGatePolicy>,
}

#[derive(Args, Debug)]
pub(crate) struct ScorecardArgs {
    /// 200 or more units / employees
    #[arg(long)]
    pub(crate) units_over_200: bool,
    /// Project urgency
    #[arg(long)]
    pub(crate) urgency: bool,
    /// Open to receiving a proposal
    #[arg(long)]
    pub(crate) openness: bool,
    /// Clear pain identified
    #[arg(long)]
    pub(crate) clear_pain: bool,
    /// Has switched suppliers before
    #[arg(long)]
    pub(crate) switch_history: bool,
    /// Decision maker is reachable
    #[arg(long)]
    pub(crate) decision_maker: bool,
    /// Print the weight table as well
    #[arg(long)]
    pub(crate) rubric: bool,
}

impl ScorecardArgs {
    fn criteria(&self) -> ScorecardCriteria {
        ScorecardCriteria {
            units_over_200: self.units_over_200,
            urgency: self.urgency,
            openness_to_proposal: self.openness,
            clear_pain: self.clear_pain,
            supplier_switch_history: self.switch_history,
            accessible_decision_maker: self.decision_maker,
        }
    }
}

#[derive(Args, Debug)]
pub(crate) struct HeadArgs {
    /// Leadership panel credential
    #[arg(long)]
    pub(crate) credential: String,
    /// Closer revenue for the period (ignored when deals are supplied)
    #[arg(long, value_parser = parse_money)]
    pub(crate) revenue: Option<Money>,
    /// Closer final commission for the period (ignored when deals are supplied)
    #[arg(long, value_parser = parse_money)]
    pub(crate) commission: Option<Money>,
    /// Closer deals to derive revenue and commission from
    #[arg(long = "deal", value_parser = parse_money)]
    pub(crate) deals: Vec<Money>,
    /// CSV export with a contract_value column
    #[arg(long)]
    pub(crate) csv: Option<PathBuf>,
    /// High-score leads delivered by the SDR team
    #[arg(long, default_value_t = 0)]
    pub(crate) delivered: u32,
    /// High-score lead target
    #[arg(long, default_value_t = 0)]
    pub(crate) target: u32,
}

pub(crate) fn run_classify(args: ClassifyArgs) -> Result<(), AppError> {
    let (config, policy) = load_policy()?;
    let currency = config.compensation.currency_format();
    let classification = policy.closer.classify(args.contract_value);
    print_lines(&classification_lines(
        &currency,
        args.contract_value.amount(),
        &classification,
    ));
    Ok(())
}

pub(crate) fn run_pipeline(args: PipelineArgs) -> Result<(), AppError> {
    let (config, policy) = load_policy()?;
    let currency = config.compensation.currency_format();
    let pipeline = build_pipeline(&policy, &currency, &args.values, args.csv)?;
    print_lines(&pipeline_lines(&pipeline.view(&currency)));
    Ok(())
}

pub(crate) fn run_sdr(args: SdrArgs) -> Result<(), AppError> {
    let (config, policy) = load_policy()?;
    let currency = config.compensation.currency_format();
    let mut plan = policy.sdr;
    if let Some(gate) = args.policy {
        plan.policy = gate;
    }

    let breakdown = plan.evaluate(SdrCounters {
        qualified: args.qualified,
        high_score: args.high_score,
        closed_deals: args.closed,
    });
    print_lines(&sdr_lines(&currency, &breakdown));
    Ok(())
}

pub(crate) fn run_scorecard(args: ScorecardArgs) -> Result<(), AppError> {
    if args.rubric {
        println!("Scorecard rubric");
        print_lines(&rubric_lines(&rubric()));
        println!();
    }
    print_lines(&scorecard_lines(&args.criteria().score()));
    Ok(())
}

pub(crate) fn run_head(args: HeadArgs) -> Result<(), AppError> {
    let (config, policy) = load_policy()?;
    let _access = config.compensation.leadership_gate().unlock(&args.credential)?;
    let currency = config.compensation.currency_format();

    let inputs = if args.deals.is_empty() && args.csv.is_none() {
        HeadInputs {
            closer_revenue: args.revenue.unwrap_or_default(),
            closer_final_commission: args.commission.unwrap_or_default(),
            high_score_delivered: args.delivered,
            high_score_target: args.target,
        }
    } else {
        let pipeline = build_pipeline(&policy, &currency, &args.deals, args.csv)?;
        HeadInputs::from_summary(&pipeline.summary(), args.delivered, args.target)
    };

    let evaluation = policy.head.evaluate(&inputs)?;
    print_lines(&head_lines(&currency, &evaluation));
    Ok(())
}

pub(crate) fn build_pipeline(
    policy: &CompensationPolicy,
    currency: &CurrencyFormat,
    values: &[Money],
    csv: Option<PathBuf>,
) -> Result<Pipeline, AppError> {
    let mut pipeline = Pipeline::new(policy.closer.clone());
    for value in values {
        if let Err(err) = pipeline.add(*value) {
            eprintln!("skipping {}: {}", currency.format(*value), err);
        }
    }

    if let Some(path) = csv {
        let file = File::open(&path)?;
        let report = import_deals(BufReader::new(file), &mut pipeline, currency)?;
        println!(
            "Imported {} deals from {} ({} skipped)",
            report.imported,
            path.display(),
            report.skipped
        );
    }

    Ok(pipeline)
}

pub(crate) fn parse_contract_value(raw: &str) -> Result<ContractValue, String> {
    let amount = parse_money(raw)?;
    ContractValue::new(amount).map_err(|err| err.to_string())
}

pub(crate) fn parse_gate_policy(raw: &str) -> Result<SdrGatePolicy, String> {
    SdrGatePolicy::parse(raw)
        .ok_or_else(|| format!("unknown SDR policy '{raw}' (expected independent or combined)"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;
    use std::io::Write;

    #[test]
    fn contract_value_parser_rejects_negatives() {
        assert!(parse_contract_value("-1").is_err());
        let value = parse_contract_value("R$ 30.000,00").expect("valid value");
        assert_eq!(value.amount(), dec!(30000));
    }

    #[test]
    fn gate_policy_parser_accepts_variant_letters() {
        assert_eq!(parse_gate_policy("B"), Ok(SdrGatePolicy::CombinedGate));
        assert!(parse_gate_policy("c").is_err());
    }

    #[test]
    fn build_pipeline_skips_non_positive_values_and_reads_csv() {
        let path = std::env::temp_dir().join(format!("sales-comp-deals-{}.csv", std::process::id()));
        let mut file = File::create(&path).expect("create csv");
        file.write_all(b"contract_value\n60000\n").expect("write csv");

        let pipeline = build_pipeline(
            &CompensationPolicy::default(),
            &CurrencyFormat::brl(),
            &[dec!(45000), dec!(0)],
            Some(path.clone()),
        )
        .expect("pipeline builds");

        assert_eq!(pipeline.len(), 2);
        assert_eq!(pipeline.summary().total_revenue, dec!(105000));
        std::fs::remove_file(&path).ok();
    }

    #[test]
    fn scorecard_flags_map_to_criteria() {
        let args = ScorecardArgs {
            units_over_200: true,
            urgency: false,
            openness: true,
            clear_pain: false,
            switch_history: false,
            decision_maker: true,
            rubric: false,
        };
        assert_eq!(args.criteria().score().score, 55);
    }
}
