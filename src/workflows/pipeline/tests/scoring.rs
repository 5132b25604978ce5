use chrono::Duration;

use super::common::*;
use crate::workflows::pipeline::scoring::{rank_leads, score_lead, ScoreFactor};
use crate::workflows::pipeline::domain::Temperature;

#[test]
fn raising_the_ai_signal_never_lowers_the_score() {
    let mut previous = None;
    for ai in [0u8, 25, 50, 75, 100] {
        let mut candidate = lead("L1");
        candidate.ai_score = ai;
        let total = score_lead(&candidate, now()).total;
        if let Some(last) = previous {
            assert!(total >= last, "score dropped between ai {ai}");
        }
        previous = Some(total);
    }
}

#[test]
fn hot_temperature_is_worth_twenty_five_points() {
    let warm = lead("L1");
    let mut hot = lead("L1");
    hot.temperature = Temperature::Hot;

    let warm_score = score_lead(&warm, now()).total;
    let hot_score = score_lead(&hot, now()).total;
    assert_eq!(hot_score - warm_score, 25);
}

#[test]
fn deal_value_component_saturates_at_twenty() {
    let mut big = lead("L1");
    big.estimated_value = 100_000;
    let mut huge = lead("L2");
    huge.estimated_value = 5_000_000;

    assert_eq!(
        score_lead(&big, now()).total,
        score_lead(&huge, now()).total
    );

    let component = score_lead(&huge, now())
        .components
        .into_iter()
        .find(|component| component.factor == ScoreFactor::DealValue)
        .expect("value component present");
    assert_eq!(component.points, 20.0);
}

#[test]
fn idle_leads_earn_the_staleness_bump() {
    let mut fresh = lead("L1");
    fresh.updated_at = now() - Duration::days(1);
    let mut idle = lead("L1");
    idle.updated_at = now() - Duration::days(3);

    let fresh_score = score_lead(&fresh, now());
    let idle_score = score_lead(&idle, now());

    assert_eq!(idle_score.total - fresh_score.total, 15);
    assert!(idle_score
        .components
        .iter()
        .any(|component| component.factor == ScoreFactor::Staleness));
    assert!(fresh_score
        .components
        .iter()
        .all(|component| component.factor != ScoreFactor::Staleness));
}

#[test]
fn a_maxed_out_lead_scores_one_hundred() {
    let mut maxed = lead("L1");
    maxed.ai_score = 100;
    maxed.temperature = Temperature::Hot;
    maxed.estimated_value = 100_000;
    maxed.updated_at = now() - Duration::days(5);

    assert_eq!(score_lead(&maxed, now()).total, 100);
}

#[test]
fn ranking_is_highest_first_and_stable_on_ties() {
    let first = lead("alpha");
    let second = lead("beta");
    let mut strong = lead("gamma");
    strong.ai_score = 95;

    let leads = vec![first, second, strong];
    let ranked = rank_leads(&leads, now());

    assert_eq!(ranked[0].0.id.0, "gamma");
    // alpha and beta tie; input order must survive the sort.
    assert_eq!(ranked[1].0.id.0, "alpha");
    assert_eq!(ranked[2].0.id.0, "beta");
}

#[test]
fn every_score_carries_an_audit_trail() {
    let score = score_lead(&lead("L1"), now());
    assert!(score
        .components
        .iter()
        .any(|component| component.factor == ScoreFactor::AiSignal));
    assert!(score
        .components
        .iter()
        .any(|component| component.factor == ScoreFactor::DealValue));
    let summed: f32 = score.components.iter().map(|c| c.points).sum();
    assert_eq!(score.total, summed.round() as i32);
}
