//! Report assembly: pure rendering of snapshots and metrics
//!
//! Both functions are pure — lines out for data in, no I/O, no hidden
//! state. The caller decides whether lines are printed, logged, or
//! discarded. Ordering of the output follows the traversal order of the
//! snapshot, which is an observable contract of the report.

use uuid::Uuid;

use crate::database::{AccountSnapshot, ResourceSnapshot, WorkspaceSnapshot};

/// Render the resolved hierarchy: account header and attributes, then
/// each workspace with its members and resources. Metrics are not part
/// of this pass.
pub fn render_snapshot(account: &AccountSnapshot) -> Vec<String> {
    let mut lines = Vec::new();

    lines.push(format!(
        "Account {} ({})",
        account.name.as_deref().unwrap_or("<unnamed>"),
        account.id
    ));
    lines.push(format!("  created: {}", account.created_at));
    if let Some(last_activity) = account.last_activity_at {
        lines.push(format!("  last activity: {last_activity}"));
    }
    if let Some(company) = &account.company {
        lines.push(format!("  company: {company}"));
    }
    if !account.onboarding_tags.is_empty() {
        lines.push(format!(
            "  onboarding tags: {}",
            account.onboarding_tags.join(", ")
        ));
    }
    if let Some(terms_accepted) = account.terms_accepted_at {
        lines.push(format!("  terms accepted: {terms_accepted}"));
    }

    for workspace in &account.workspaces {
        render_workspace(workspace, &mut lines);
    }

    lines
}

fn render_workspace(workspace: &WorkspaceSnapshot, lines: &mut Vec<String>) {
    let mut flags = Vec::new();
    if workspace.is_verified == Some(true) {
        flags.push("verified");
    }
    if workspace.is_suspended {
        flags.push("suspended");
    }
    if workspace.is_past_due {
        flags.push("past due");
    }
    let flags = if flags.is_empty() {
        String::new()
    } else {
        format!(" [{}]", flags.join(", "))
    };

    lines.push(format!(
        "Workspace {} ({}) plan={} storage_tier={}{}",
        workspace.name, workspace.id, workspace.plan, workspace.storage_tier, flags
    ));
    if let Some(billing_id) = &workspace.billing_id {
        lines.push(format!("  billing: {billing_id}"));
    }

    for member in &workspace.members {
        lines.push(format!("  member {} ({})", member.email, member.role));
    }

    for resource in &workspace.resources {
        let risk = resource
            .risk_level
            .map(|level| format!(" risk={level}"))
            .unwrap_or_default();
        let public = resource
            .public_id
            .as_deref()
            .map(|id| format!(" public={id}"))
            .unwrap_or_default();
        lines.push(format!(
            "  resource {} ({}) updated={}{risk}{public}",
            resource.name, resource.id, resource.updated_at
        ));
    }
}

/// Render one metric line, or `None` when the count is zero. Zero is a
/// computed, valid outcome — it just produces no report line.
pub fn render_metric_line(resource: &ResourceSnapshot, count: u64) -> Option<String> {
    if count == 0 {
        return None;
    }
    Some(format!(
        "Resource \"{}\" ({}) has {} qualifying events",
        resource.name, resource.id, count
    ))
}

/// Render the significant metric lines for one workspace, preserving the
/// order of `rows`.
pub fn render_metrics(workspace_id: Uuid, rows: &[(&ResourceSnapshot, u64)]) -> Vec<String> {
    let lines: Vec<String> = rows
        .iter()
        .filter_map(|(resource, count)| render_metric_line(resource, *count))
        .collect();
    tracing::debug!(
        workspace = %workspace_id,
        resources = rows.len(),
        significant = lines.len(),
        "rendered workspace metrics"
    );
    lines
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::database::MemberSnapshot;
    use chrono::{TimeZone, Utc};

    fn resource(name: &str, id: Uuid) -> ResourceSnapshot {
        ResourceSnapshot {
            id,
            name: name.to_string(),
            created_at: Utc.with_ymd_and_hms(2026, 1, 1, 0, 0, 0).unwrap(),
            updated_at: Utc.with_ymd_and_hms(2026, 2, 1, 0, 0, 0).unwrap(),
            risk_level: None,
            public_id: None,
        }
    }

    fn sample_account() -> AccountSnapshot {
        let r1 = ResourceSnapshot {
            updated_at: Utc.with_ymd_and_hms(2026, 3, 1, 0, 0, 0).unwrap(),
            ..resource("R1", Uuid::from_u128(1))
        };
        let r2 = resource("R2", Uuid::from_u128(2));

        AccountSnapshot {
            id: Uuid::from_u128(10),
            name: Some("Ada".to_string()),
            created_at: Utc.with_ymd_and_hms(2025, 6, 1, 0, 0, 0).unwrap(),
            last_activity_at: None,
            company: Some("Acme".to_string()),
            onboarding_tags: vec!["marketing".to_string()],
            terms_accepted_at: None,
            workspaces: vec![WorkspaceSnapshot {
                id: Uuid::from_u128(20),
                name: "W1".to_string(),
                plan: "FREE".to_string(),
                is_verified: Some(true),
                is_suspended: false,
                is_past_due: false,
                billing_id: None,
                storage_tier: 0,
                members: vec![MemberSnapshot {
                    role: "ADMIN".to_string(),
                    email: "a@x.com".to_string(),
                }],
                resources: vec![r1, r2],
            }],
        }
    }

    #[test]
    fn snapshot_renders_account_then_workspace_then_members_then_resources() {
        let lines = render_snapshot(&sample_account());

        let account_pos = lines.iter().position(|l| l.contains("Account Ada")).unwrap();
        let workspace_pos = lines.iter().position(|l| l.contains("Workspace W1")).unwrap();
        let member_pos = lines
            .iter()
            .position(|l| l.contains("member a@x.com (ADMIN)"))
            .unwrap();
        let r1_pos = lines.iter().position(|l| l.contains("resource R1")).unwrap();
        let r2_pos = lines.iter().position(|l| l.contains("resource R2")).unwrap();

        assert!(account_pos < workspace_pos);
        assert!(workspace_pos < member_pos);
        assert!(member_pos < r1_pos);
        // R1 updated more recently than R2, so it comes first.
        assert!(r1_pos < r2_pos);
    }

    #[test]
    fn snapshot_renders_verified_flag_and_tags() {
        let lines = render_snapshot(&sample_account());
        assert!(lines.iter().any(|l| l.contains("[verified]")));
        assert!(lines.iter().any(|l| l.contains("onboarding tags: marketing")));
        assert!(lines.iter().any(|l| l.contains("company: Acme")));
    }

    #[test]
    fn zero_count_produces_no_line() {
        let r = resource("R2", Uuid::from_u128(2));
        assert_eq!(render_metric_line(&r, 0), None);
    }

    #[test]
    fn positive_count_produces_exactly_the_contract_line() {
        let id = Uuid::from_u128(1);
        let r = resource("R1", id);
        let line = render_metric_line(&r, 3).unwrap();
        assert_eq!(line, format!("Resource \"R1\" ({id}) has 3 qualifying events"));
    }

    #[test]
    fn workspace_metrics_drop_zero_rows_and_keep_order() {
        let r1 = resource("R1", Uuid::from_u128(1));
        let r2 = resource("R2", Uuid::from_u128(2));
        let r3 = resource("R3", Uuid::from_u128(3));

        let lines = render_metrics(
            Uuid::from_u128(20),
            &[(&r1, 3), (&r2, 0), (&r3, 7)],
        );

        assert_eq!(lines.len(), 2);
        assert!(lines[0].contains("\"R1\"") && lines[0].contains("3 qualifying"));
        assert!(lines[1].contains("\"R3\"") && lines[1].contains("7 qualifying"));
        assert!(!lines.iter().any(|l| l.contains("R2")));
    }
}
