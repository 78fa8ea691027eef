//! Markdown rendering of a screened candidate for display.

use std::fmt::Write;

use serde::Serialize;

use crate::models::candidate::CandidateRecord;

/// Qualitative band for a 0-10 score.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ScoreLevel {
    Excellent,
    Good,
    Fair,
    Inadequate,
}

impl ScoreLevel {
    pub fn from_score(score: f64) -> Self {
        if score >= 8.0 {
            ScoreLevel::Excellent
        } else if score >= 6.0 {
            ScoreLevel::Good
        } else if score >= 4.0 {
            ScoreLevel::Fair
        } else {
            ScoreLevel::Inadequate
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            ScoreLevel::Excellent => "Excellent",
            ScoreLevel::Good => "Good",
            ScoreLevel::Fair => "Fair",
            ScoreLevel::Inadequate => "Inadequate",
        }
    }

    fn marker(self) -> &'static str {
        match self {
            ScoreLevel::Excellent => "🟢",
            ScoreLevel::Good => "🟡",
            ScoreLevel::Fair => "🟠",
            ScoreLevel::Inadequate => "🔴",
        }
    }
}

/// Renders the detailed analysis of one candidate. Empty sections are omitted.
pub fn render_markdown(record: &CandidateRecord) -> String {
    let mut md = String::from("### 📄 Detailed Résumé Analysis\n\n");

    push_line(&mut md, "👤 Name", &record.name);
    push_line(&mut md, "💼 Area", &record.area);

    let level = ScoreLevel::from_score(record.score);
    let _ = write!(
        md,
        "**📊 Score:** {} {:.1}/10 - *{}*\n\n",
        level.marker(),
        record.score,
        level.label()
    );

    push_block(&mut md, "📝 Profile Summary", &record.summary);
    push_block(&mut md, "🎓 Education", &record.education);
    push_bullets(&mut md, "🛠️ Technical Skills", &record.skills);
    push_bullets(&mut md, "✅ Strengths", &record.strengths);
    push_bullets(&mut md, "⚠️ Areas for Development", &record.areas_for_development);
    push_bullets(&mut md, "🔍 Points of Attention", &record.important_considerations);

    if !record.interview_questions.is_empty() {
        md.push_str("**❓ Suggested Interview Questions:**\n");
        for (i, question) in record.interview_questions.iter().enumerate() {
            let _ = writeln!(md, "  {}. {}", i + 1, question);
        }
        md.push('\n');
    }

    push_block(
        &mut md,
        "💡 Conclusion and Recommendations",
        &record.final_recommendations,
    );

    if let Some(analyzed_at) = &record.analyzed_at {
        let _ = writeln!(md, "---\n*Analysis performed at: {analyzed_at}*");
    }

    md
}

fn push_line(md: &mut String, label: &str, value: &str) {
    if !value.trim().is_empty() {
        let _ = write!(md, "**{label}:** {value}\n\n");
    }
}

fn push_block(md: &mut String, label: &str, value: &str) {
    if !value.trim().is_empty() {
        let _ = write!(md, "**{label}:**\n{value}\n\n");
    }
}

fn push_bullets(md: &mut String, label: &str, items: &[String]) {
    if items.is_empty() {
        return;
    }
    let _ = writeln!(md, "**{label}:**");
    for item in items {
        let _ = writeln!(md, "  • {item}");
    }
    md.push('\n');
}
