//! Deterministic mitigation and scheduling guidance.
//!
//! One fixed template set per risk level covering deployment timing,
//! approval chain, rollback depth, and monitoring. Advisory text only; it
//! never blocks assessment output.

use crate::risk::classification::RiskLevel;

pub fn generate_recommendations(level: RiskLevel, delete_count: usize) -> Vec<String> {
    let mut recommendations: Vec<String> = base_guidance(level)
        .iter()
        .map(|line| line.to_string())
        .collect();

    if level == RiskLevel::Critical {
        recommendations.push(
            "Rollback readiness: verify state backups, rehearse the restore procedure, \
             and confirm the on-call escalation path before executing"
                .to_string(),
        );
    }

    if delete_count > 0 {
        recommendations.push(format!(
            "Destructive changes: {delete_count} delete operation(s) in this plan; \
             confirm data retention requirements and backups before applying"
        ));
    }

    recommendations
}

fn base_guidance(level: RiskLevel) -> [&'static str; 4] {
    match level {
        RiskLevel::Low => [
            "Deployment timing: safe to deploy during normal working hours",
            "Approval: automated pipeline checks are sufficient",
            "Rollback: keep the previous configuration revision available",
            "Monitoring: standard dashboards and alerting are adequate",
        ],
        RiskLevel::Medium => [
            "Deployment timing: prefer a low-traffic window",
            "Approval: obtain team lead sign-off before applying",
            "Rollback: prepare a tested rollback plan for the changed components",
            "Monitoring: watch affected-component dashboards through the next release cycle",
        ],
        RiskLevel::High => [
            "Deployment timing: schedule a dedicated maintenance window",
            "Approval: senior management sign-off is required",
            "Rollback: stage the rollout so each step can be reverted independently",
            "Monitoring: keep affected services under elevated monitoring until stable",
        ],
        RiskLevel::Critical => [
            "Deployment timing: treat as an emergency change; execute only inside an approved window",
            "Approval: convene the change advisory board before execution",
            "Rollback: a full rollback to the last known-good state must be executable at every step",
            "Monitoring: require live monitoring with an engineer on standby for the whole rollout",
        ],
    }
}
