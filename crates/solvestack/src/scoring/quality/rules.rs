use crate::catalog::{tech_tokens, Problem};
use crate::scoring::tables::{contains_any, QualityRubric};
use crate::scoring::{total, ScoreComponent, ScoreFactor};

pub(crate) struct QualitySignals {
    pub tech_count: usize,
    pub technical_depth: u8,
}

pub(crate) fn score_problem(
    problem: &Problem,
    rubric: &QualityRubric,
) -> (Vec<ScoreComponent>, u8, QualitySignals) {
    let components = vec![
        description_quality(&problem.description, rubric),
        technical_depth(&problem.suggested_tech, rubric),
        engagement(
            problem.interested_count,
            problem.upvotes,
            problem.views,
            rubric,
        ),
        reproducibility(&problem.description, &problem.reference_link, rubric),
    ];

    let signals = QualitySignals {
        tech_count: problem.tech_tokens().len(),
        technical_depth: components[1].score,
    };
    let total_score = total(&components);

    (components, total_score, signals)
}

pub(crate) fn description_quality(description: &str, rubric: &QualityRubric) -> ScoreComponent {
    if description.is_empty() {
        return ScoreComponent::new(
            ScoreFactor::DescriptionQuality,
            0,
            rubric.description_cap,
            vec!["No description provided".to_string()],
        );
    }

    let mut score: u8 = 0;
    let mut reasons = Vec::new();

    match description.chars().count() {
        100..=500 => {
            score += 10;
            reasons.push("Good description length".to_string());
        }
        50..=99 => {
            score += 5;
            reasons.push("Adequate description length".to_string());
        }
        501.. => {
            score += 7;
            reasons.push("Detailed description".to_string());
        }
        _ => {}
    }

    let lower = description.to_lowercase();
    let keyword_hits = rubric
        .technical_keywords
        .iter()
        .filter(|keyword| lower.contains(*keyword))
        .count();
    let keyword_score = keyword_hits.min(usize::from(rubric.technical_keyword_cap)) as u8;
    score += keyword_score;
    if keyword_score > 2 {
        reasons.push(format!("Technical depth ({keyword_hits} keywords)"));
    }

    if description.contains('`') {
        score += 5;
        reasons.push("Includes code snippets".to_string());
    }

    if lower.contains("error:") || lower.contains("exception") {
        score += 5;
        reasons.push("Includes error details".to_string());
    }

    if description.contains('?') {
        score += 5;
        reasons.push("Clear questions asked".to_string());
    }

    ScoreComponent::new(
        ScoreFactor::DescriptionQuality,
        score,
        rubric.description_cap,
        reasons,
    )
}

pub(crate) fn technical_depth(suggested_tech: &str, rubric: &QualityRubric) -> ScoreComponent {
    if suggested_tech.trim().is_empty() {
        return ScoreComponent::new(
            ScoreFactor::TechnicalDepth,
            5,
            rubric.technical_depth_cap,
            vec!["Basic problem".to_string()],
        );
    }

    let mut reasons = Vec::new();
    let tech_count = tech_tokens(suggested_tech).len();
    let mut score = tech_count.saturating_mul(3).min(10) as u8;
    if tech_count > 2 {
        reasons.push(format!("Multi-tech problem ({tech_count} technologies)"));
    }

    // Substring test on the joined string, so "ml" also fires on "html".
    if contains_any(&suggested_tech.to_lowercase(), rubric.complexity_keywords) {
        score += 10;
        reasons.push("Advanced/complex technologies".to_string());
    }

    if suggested_tech.chars().any(|ch| ch.is_ascii_digit()) {
        score += 5;
        reasons.push("Version-specific problem".to_string());
    }

    ScoreComponent::new(
        ScoreFactor::TechnicalDepth,
        score,
        rubric.technical_depth_cap,
        reasons,
    )
}

pub(crate) fn engagement(
    interested_count: u32,
    upvotes: u32,
    views: u32,
    rubric: &QualityRubric,
) -> ScoreComponent {
    let mut reasons = Vec::new();

    let mut score = interested_count.saturating_mul(2).min(10) as u8;
    if interested_count > 3 {
        reasons.push(format!("High interest ({interested_count} users)"));
    }

    score += upvotes.min(10) as u8;
    if upvotes > 5 {
        reasons.push(format!("Well-received ({upvotes} upvotes)"));
    }

    if views > 100 {
        score += 5;
        reasons.push("High visibility".to_string());
    } else if views > 50 {
        score += 3;
        reasons.push("Good visibility".to_string());
    } else if views > 10 {
        score += 1;
    }

    ScoreComponent::new(
        ScoreFactor::Engagement,
        score,
        rubric.engagement_cap,
        reasons,
    )
}

pub(crate) fn reproducibility(
    description: &str,
    reference_link: &str,
    rubric: &QualityRubric,
) -> ScoreComponent {
    let mut score: u8 = 0;
    let mut reasons = Vec::new();

    if reference_link.starts_with("http://") || reference_link.starts_with("https://") {
        score += 10;
        reasons.push("Has reference link".to_string());
    }

    let lower = description.to_lowercase();
    if contains_any(&lower, rubric.reproduction_keywords) {
        score += 5;
        reasons.push("Includes reproduction steps".to_string());
    }
    if contains_any(&lower, rubric.environment_keywords) {
        score += 5;
        reasons.push("Specifies environment".to_string());
    }

    ScoreComponent::new(
        ScoreFactor::Reproducibility,
        score,
        rubric.reproducibility_cap,
        reasons,
    )
}
