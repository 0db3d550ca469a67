//! Risk assessment result view.

use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    text::{Line, Span},
    widgets::{Block, Borders, Gauge, Paragraph},
    Frame,
};

use crate::application::{AssessmentOutcome, SaveStatus};
use crate::domain::Explanation;
use crate::tui::styles::MedicalTheme;

/// Assessment view state
#[derive(Debug, Clone)]
pub enum AssessmentState {
    /// Not started
    Idle,
    /// Pipeline running
    Running { progress: f64 },
    /// Completed with result
    Complete { outcome: AssessmentOutcome },
    /// Error occurred
    Error { message: String },
}

impl Default for AssessmentState {
    fn default() -> Self {
        Self::Idle
    }
}

/// Render the assessment view
pub fn render_assessment(f: &mut Frame, area: Rect, state: &AssessmentState) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3), // Header
            Constraint::Min(0),    // Content
            Constraint::Length(3), // Footer
        ])
        .split(area);

    render_assessment_header(f, chunks[0]);
    render_assessment_content(f, chunks[1], state);
    render_assessment_footer(f, chunks[2], state);
}

fn render_assessment_header(f: &mut Frame, area: Rect) {
    let header = Paragraph::new(Line::from(vec![
        Span::styled(" ", MedicalTheme::text()),
        Span::styled("Risk Assessment", MedicalTheme::title()),
        Span::styled(" │ Dialysis Initiation", MedicalTheme::text_secondary()),
    ]))
    .block(
        Block::default()
            .borders(Borders::BOTTOM)
            .border_style(MedicalTheme::border()),
    );

    f.render_widget(header, area);
}

fn render_assessment_content(f: &mut Frame, area: Rect, state: &AssessmentState) {
    match state {
        AssessmentState::Idle => render_idle(f, area),
        AssessmentState::Running { progress } => render_progress(f, area, *progress),
        AssessmentState::Complete { outcome } => render_result(f, area, outcome),
        AssessmentState::Error { message } => render_error(f, area, message),
    }
}

fn render_idle(f: &mut Frame, area: Rect) {
    let content = Paragraph::new(vec![
        Line::from(""),
        Line::from(Span::styled(
            "Ready to run an assessment",
            MedicalTheme::text_secondary(),
        )),
        Line::from(""),
        Line::from(Span::styled(
            "Enter patient labs to begin",
            MedicalTheme::text_muted(),
        )),
    ])
    .alignment(Alignment::Center)
    .block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(MedicalTheme::border()),
    );

    f.render_widget(content, area);
}

fn render_progress(f: &mut Frame, area: Rect, progress: f64) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3),
            Constraint::Length(4),
            Constraint::Min(0),
        ])
        .margin(2)
        .split(area);

    let stage_text = Paragraph::new(Line::from(vec![
        Span::styled("Stage: ", MedicalTheme::text_secondary()),
        Span::styled("Analyzing", MedicalTheme::focused()),
    ]))
    .alignment(Alignment::Center);
    f.render_widget(stage_text, chunks[0]);

    let gauge = Gauge::default()
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(MedicalTheme::border()),
        )
        .gauge_style(MedicalTheme::info())
        .percent((progress * 100.0) as u16)
        .label(format!("{:.0}%", progress * 100.0));
    f.render_widget(gauge, chunks[1]);

    let desc = Paragraph::new(Line::from(Span::styled(
        "Scoring observation...",
        MedicalTheme::text_muted(),
    )))
    .alignment(Alignment::Center);
    f.render_widget(desc, chunks[2]);
}

fn render_result(f: &mut Frame, area: Rect, outcome: &AssessmentOutcome) {
    let block = Block::default()
        .title(Span::styled(" Assessment Result ", MedicalTheme::subtitle()))
        .borders(Borders::ALL)
        .border_style(MedicalTheme::border_focused());

    let inner = block.inner(area);
    f.render_widget(block, area);

    let has_explanation = outcome.explanation.is_some();
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(4), // Risk tier
            Constraint::Length(4), // Probability
            Constraint::Min(if has_explanation { 11 } else { 0 }), // Attribution
            Constraint::Length(2), // Status lines
        ])
        .margin(1)
        .split(inner);

    let assessment = &outcome.assessment;
    let tier_style = MedicalTheme::risk_tier(assessment.tier);

    let tier_display = Paragraph::new(vec![
        Line::from(Span::styled(
            format!("{} RISK", assessment.tier),
            tier_style.add_modifier(ratatui::style::Modifier::BOLD),
        )),
        Line::from(Span::styled(
            assessment.tier.guidance(),
            MedicalTheme::text_secondary(),
        )),
    ])
    .alignment(Alignment::Center);
    f.render_widget(tier_display, chunks[0]);

    let prob_gauge = Gauge::default()
        .block(
            Block::default()
                .title(Span::styled(
                    " Dialysis Probability ",
                    MedicalTheme::text_secondary(),
                ))
                .borders(Borders::ALL)
                .border_style(MedicalTheme::border()),
        )
        .gauge_style(tier_style)
        .percent((assessment.probability * 100.0) as u16)
        .label(assessment.display_percent());
    f.render_widget(prob_gauge, chunks[1]);

    if let Some(explanation) = &outcome.explanation {
        render_attribution(f, chunks[2], explanation);
    }

    render_status_lines(f, chunks[3], outcome);
}

/// Signed horizontal bars, largest contributions first. Rose bars push
/// risk up, emerald bars pull it down.
fn render_attribution(f: &mut Frame, area: Rect, explanation: &Explanation) {
    let block = Block::default()
        .title(Span::styled(
            " Feature Contributions ",
            MedicalTheme::text_secondary(),
        ))
        .borders(Borders::ALL)
        .border_style(MedicalTheme::border());

    let inner = block.inner(area);
    f.render_widget(block, area);

    let max_magnitude = explanation.max_magnitude().max(f64::EPSILON);
    let bar_width = (inner.width.saturating_sub(34)).max(8) as f64;

    let mut lines = Vec::with_capacity(explanation.contributions.len() + 1);
    lines.push(Line::from(Span::styled(
        format!("baseline {:.1}%", explanation.baseline * 100.0),
        MedicalTheme::text_muted(),
    )));

    for contribution in explanation.ranked() {
        let filled = ((contribution.contribution.abs() / max_magnitude) * bar_width)
            .round()
            .max(1.0) as usize;
        let bar: String = "█".repeat(filled);
        let style = if contribution.contribution >= 0.0 {
            MedicalTheme::danger()
        } else {
            MedicalTheme::success()
        };

        lines.push(Line::from(vec![
            Span::styled(
                format!("{:<22}", contribution.name),
                MedicalTheme::text_secondary(),
            ),
            Span::styled(bar, style),
            Span::styled(
                format!(" {:+.1}%", contribution.contribution * 100.0),
                MedicalTheme::text(),
            ),
        ]));
    }

    f.render_widget(Paragraph::new(lines), inner);
}

fn render_status_lines(f: &mut Frame, area: Rect, outcome: &AssessmentOutcome) {
    let mut lines = Vec::new();

    if let Some(warning) = &outcome.explanation_warning {
        lines.push(Line::from(vec![
            Span::styled("! ", MedicalTheme::warning()),
            Span::styled(
                format!("Explanation unavailable: {warning}"),
                MedicalTheme::warning(),
            ),
        ]));
    }

    match &outcome.save {
        Some(SaveStatus::Saved) => lines.push(Line::from(Span::styled(
            "Saved to research log",
            MedicalTheme::success(),
        ))),
        Some(SaveStatus::Failed(reason)) => lines.push(Line::from(vec![
            Span::styled("! ", MedicalTheme::danger()),
            Span::styled(format!("Save failed: {reason}"), MedicalTheme::danger()),
        ])),
        None => {}
    }

    f.render_widget(Paragraph::new(lines), area);
}

fn render_error(f: &mut Frame, area: Rect, message: &str) {
    let content = Paragraph::new(vec![
        Line::from(""),
        Line::from(Span::styled("! Error", MedicalTheme::danger())),
        Line::from(""),
        Line::from(Span::styled(message, MedicalTheme::text())),
    ])
    .alignment(Alignment::Center)
    .block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(MedicalTheme::danger()),
    );

    f.render_widget(content, area);
}

fn render_assessment_footer(f: &mut Frame, area: Rect, state: &AssessmentState) {
    let content = match state {
        AssessmentState::Complete { .. } => Line::from(vec![
            Span::styled("[N] ", MedicalTheme::key_hint()),
            Span::styled("New Assessment ", MedicalTheme::key_desc()),
            Span::styled("[Esc] ", MedicalTheme::key_hint()),
            Span::styled("Back", MedicalTheme::key_desc()),
        ]),
        AssessmentState::Error { .. } => Line::from(vec![
            Span::styled("[Enter] ", MedicalTheme::key_hint()),
            Span::styled("Retry ", MedicalTheme::key_desc()),
            Span::styled("[Esc] ", MedicalTheme::key_hint()),
            Span::styled("Back", MedicalTheme::key_desc()),
        ]),
        _ => Line::from(vec![Span::styled(
            "Processing...",
            MedicalTheme::text_muted(),
        )]),
    };

    let footer = Paragraph::new(content).block(
        Block::default()
            .borders(Borders::TOP)
            .border_style(MedicalTheme::border()),
    );

    f.render_widget(footer, area);
}
