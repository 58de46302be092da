use crate::catalog::Difficulty;

/// Difficulty is a pure function of the total, the technical-depth sub-score, and the number
/// of technologies involved.
pub fn classify_difficulty(quality_score: u8, technical_depth: u8, tech_count: usize) -> Difficulty {
    if tech_count == 1 && technical_depth < 10 && quality_score < 50 {
        Difficulty::Beginner
    } else if technical_depth >= 20 || quality_score >= 75 {
        Difficulty::Advanced
    } else {
        Difficulty::Intermediate
    }
}

pub fn estimate_effort(difficulty: Difficulty, tech_count: usize) -> &'static str {
    match difficulty {
        Difficulty::Beginner => "1-2 hours",
        Difficulty::Intermediate if tech_count < 3 => "1-3 days",
        Difficulty::Intermediate => "3-7 days",
        Difficulty::Advanced if tech_count < 4 => "1-2 weeks",
        Difficulty::Advanced => "1+ month",
    }
}
