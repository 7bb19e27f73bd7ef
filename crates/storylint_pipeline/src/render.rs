//! Plain markdown for reports and the dashboard.

use std::fmt::Write;
use storylint_core::{
    ActionPlan, AdjacentReport, ArcReport, AuditReport, ChapterReport, DashboardSummary, Issue,
};

/// Markdown rendering of any report.
pub fn report_markdown(report: &AuditReport) -> String {
    match report {
        AuditReport::Chapter(r) => chapter(r),
        AuditReport::Adjacent(r) => adjacent(r),
        AuditReport::Arc(r) => arc(r),
        AuditReport::ActionPlan(p) => action_plan(p),
    }
}

fn chapter(report: &ChapterReport) -> String {
    let mut out = format!("# Chapter audit: {}\n\n", report.chapter_slug);
    let _ = writeln!(out, "- Overall quality: {}", report.overall_quality);
    let _ = writeln!(out, "- Confidence: {:.2}\n", report.confidence);
    list(&mut out, "Strengths", &report.strengths);
    list(&mut out, "Risks", &report.risks);
    issues(&mut out, "Issues", &report.issues);
    issues(&mut out, "Integrity findings", &report.integrity_findings);
    list(&mut out, "Questions", &report.questions);
    list(&mut out, "Opportunities", &report.opportunities);
    out
}

fn adjacent(report: &AdjacentReport) -> String {
    let mut out = format!(
        "# Adjacent flow: {} → {}\n\n",
        report.left_slug, report.right_slug
    );
    let _ = writeln!(out, "- Transition: {}", report.transition_rating);
    let _ = writeln!(out, "- Confidence: {:.2}\n", report.confidence);
    let _ = writeln!(out, "## Diagnosis\n\n{}\n", report.diagnosis);
    issues(&mut out, "Findings", &report.findings);
    list(&mut out, "Missing bridges", &report.missing_bridges);
    list(&mut out, "Decisions to confirm", &report.decisions_to_confirm);
    out
}

fn arc(report: &ArcReport) -> String {
    let mut out = format!("# Arc window: {}\n\n", report.window_slug);
    let _ = writeln!(out, "- Momentum: {}", report.momentum);
    let _ = writeln!(out, "- Emotional trajectory: {}", report.emotional_trajectory);
    let _ = writeln!(out, "- Structural clarity: {}", report.structural_clarity);
    let _ = writeln!(out, "- Confidence: {:.2}\n", report.confidence);
    list(&mut out, "Observations", &report.observations);
    list(&mut out, "Risks", &report.risks);
    list(&mut out, "Opportunities", &report.opportunities);
    list(&mut out, "Chapters to rework", &report.chapters_to_rework);
    out
}

fn action_plan(plan: &ActionPlan) -> String {
    let mut out = String::from("# Action plan\n\n");
    list(&mut out, "Must fix", &plan.must_fix);
    list(&mut out, "Should fix", &plan.should_fix);
    list(&mut out, "Optional", &plan.optional);
    list(&mut out, "Open questions", &plan.open_questions);
    list(&mut out, "Quick wins", &plan.quick_wins);
    out
}

/// Markdown rendering of a dashboard summary.
pub fn dashboard_markdown(summary: &DashboardSummary) -> String {
    let counts = &summary.counts;
    let mut out = format!("# Storylint dashboard: {}\n\n", summary.run_id);
    let _ = writeln!(out, "- Generated: {}", summary.generated_at);
    let _ = writeln!(out, "- Mode: {}", summary.mode);
    let _ = writeln!(out, "- Window: {}\n", summary.window);

    out.push_str("## Progress\n\n| Stage | Completed | Total |\n|---|---|---|\n");
    let _ = writeln!(out, "| Chapters | {} | {} |", counts.chapters_completed, counts.chapters_total);
    let _ = writeln!(out, "| Adjacent | {} | {} |", counts.adjacent_completed, counts.adjacent_total);
    let _ = writeln!(out, "| Arc | {} | {} |", counts.arc_completed, counts.arc_total);
    let _ = writeln!(
        out,
        "| Synthesis | {} | 1 |\n",
        usize::from(counts.synthesis_completed)
    );
    let _ = writeln!(out, "Errors: {}\n", counts.errors);

    let _ = writeln!(out, "## Issues ({})\n", summary.issues.total);
    for (severity, count) in &summary.issues.by_severity {
        let _ = writeln!(out, "- {}: {}", severity, count);
    }
    if !summary.issues.by_type.is_empty() {
        out.push('\n');
        for (issue_type, count) in &summary.issues.by_type {
            let _ = writeln!(out, "- {}: {}", issue_type, count);
        }
    }
    out.push('\n');

    if !summary.top_chapters.is_empty() {
        out.push_str("## Top chapters\n\n| Chapter | Issues |\n|---|---|\n");
        for row in &summary.top_chapters {
            let _ = writeln!(out, "| {} | {} |", row.chapter, row.issue_count);
        }
        out.push('\n');
    }
    list(&mut out, "Recent errors", &summary.errors);
    out
}

fn list(out: &mut String, heading: &str, items: &[String]) {
    if items.is_empty() {
        return;
    }
    let _ = writeln!(out, "## {}\n", heading);
    for item in items {
        let _ = writeln!(out, "- {}", item);
    }
    out.push('\n');
}

fn issues(out: &mut String, heading: &str, items: &[Issue]) {
    if items.is_empty() {
        return;
    }
    let _ = writeln!(out, "## {}\n", heading);
    for issue in items {
        let _ = writeln!(
            out,
            "- **{}** / {} at `{}`: {}\n  - Action: {}",
            issue.severity, issue.issue_type, issue.location, issue.explanation, issue.suggested_action
        );
        if !issue.evidence_refs.is_empty() {
            let _ = writeln!(out, "  - Evidence: {}", issue.evidence_refs.join(", "));
        }
    }
    out.push('\n');
}
