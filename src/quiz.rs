//! Seven-question personality quiz that produces a `UserProfile`

use crate::error::SkiTourError;
use crate::models::profile::MAX_TRAIT;
use crate::models::{ExperienceLevel, RiskTolerance, TerrainType, UserProfile};
use crate::snow_depth::WALKING_TOLERANCE_OPTIONS;
use std::fmt::Write;

/// Profile trait touched by an answer
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Trait {
    Powder,
    View,
    Safety,
    Adventure,
    Social,
}

#[derive(Debug, Clone, Copy)]
pub struct QuizAnswer {
    pub text: &'static str,
    pub deltas: &'static [(Trait, i8)],
    pub terrain_vote: Option<TerrainType>,
    pub risk_vote: Option<RiskTolerance>,
}

#[derive(Debug, Clone, Copy)]
pub struct QuizQuestion {
    pub id: &'static str,
    pub title: &'static str,
    pub prompt: &'static str,
    pub answers: &'static [QuizAnswer],
}

const fn answer(text: &'static str, deltas: &'static [(Trait, i8)]) -> QuizAnswer {
    QuizAnswer {
        text,
        deltas,
        terrain_vote: None,
        risk_vote: None,
    }
}

const fn terrain_answer(
    text: &'static str,
    deltas: &'static [(Trait, i8)],
    terrain: TerrainType,
) -> QuizAnswer {
    QuizAnswer {
        text,
        deltas,
        terrain_vote: Some(terrain),
        risk_vote: None,
    }
}

const fn risk_answer(
    text: &'static str,
    deltas: &'static [(Trait, i8)],
    risk: RiskTolerance,
) -> QuizAnswer {
    QuizAnswer {
        text,
        deltas,
        terrain_vote: None,
        risk_vote: Some(risk),
    }
}

use Trait::{Adventure, Powder, Safety, Social, View};

/// Number of questions in the quiz
pub const QUESTION_COUNT: usize = 7;

pub static QUESTIONS: [QuizQuestion; QUESTION_COUNT] = [
    QuizQuestion {
        id: "weather_vs_snow",
        title: "🌤️ vs ❄️ The Perfect Ski Day",
        prompt: "You have one perfect ski day. Which would you choose?",
        answers: &[
            answer(
                "☀️ Bluebird sunny day with incredible views, but older, firmer snow",
                &[(View, 3), (Powder, -1), (Adventure, 1)],
            ),
            answer(
                "❄️ Fresh 30cm powder, but cloudy with limited visibility",
                &[(Powder, 3), (View, -1), (Adventure, 2)],
            ),
            answer(
                "🌤️ Partly cloudy with decent snow and good visibility",
                &[(View, 1), (Powder, 1), (Safety, 1)],
            ),
        ],
    },
    QuizQuestion {
        id: "terrain_preference",
        title: "⛰️ Your Dream Ski Descent",
        prompt: "Which type of ski descent excites you most?",
        answers: &[
            terrain_answer(
                "🌊 Steep couloir dropping straight into a dramatic fjord",
                &[(Adventure, 3), (View, 2)],
                TerrainType::CoastalAlpine,
            ),
            terrain_answer(
                "🏔️ Technical glacier skiing among massive peaks",
                &[(Adventure, 3), (Powder, 1)],
                TerrainType::HighAlpine,
            ),
            terrain_answer(
                "🌲 Flowing powder turns through peaceful birch forests",
                &[(Powder, 2), (Safety, 2)],
                TerrainType::ForestValley,
            ),
            terrain_answer(
                "🌬️ Wide open bowl with endless views across plateaus",
                &[(View, 2), (Adventure, 1)],
                TerrainType::PlateauRidge,
            ),
        ],
    },
    QuizQuestion {
        id: "risk_vs_reward",
        title: "⚠️ Risk vs. Reward",
        prompt: "When avalanche conditions are 'Considerable' (Level 3):",
        answers: &[
            risk_answer(
                "🔒 I'd stick to low-angle, safe terrain below 30 degrees",
                &[(Safety, 3)],
                RiskTolerance::Conservative,
            ),
            risk_answer(
                "⚖️ I'd carefully assess specific slopes and make conservative choices",
                &[(Safety, 2), (Adventure, 1)],
                RiskTolerance::Moderate,
            ),
            risk_answer(
                "🎯 I'd accept the risk for good skiing if I could read the terrain well",
                &[(Adventure, 2), (Safety, -1)],
                RiskTolerance::Aggressive,
            ),
        ],
    },
    QuizQuestion {
        id: "objective_priority",
        title: "🎯 Summit vs. Skiing",
        prompt: "Your main objective on a ski tour:",
        answers: &[
            answer(
                "🏔️ Reach the summit and enjoy the panoramic views",
                &[(View, 3), (Adventure, 1)],
            ),
            answer(
                "🎿 Find the best snow conditions and optimal ski terrain",
                &[(Powder, 3), (Adventure, 2)],
            ),
            answer(
                "📸 Experience the beauty of the mountains and capture great photos",
                &[(View, 2), (Social, 1)],
            ),
            answer(
                "🏃 Challenge myself physically and push my limits",
                &[(Adventure, 3), (Safety, -1)],
            ),
        ],
    },
    QuizQuestion {
        id: "social_vs_solitude",
        title: "👥 Social vs. Solo",
        prompt: "Your ideal ski touring experience:",
        answers: &[
            answer(
                "🏔️ Remote wilderness where I might not see another soul",
                &[(Adventure, 2), (Social, -2)],
            ),
            answer(
                "👥 Popular areas with other tourers and established tracks",
                &[(Safety, 2), (Social, 2)],
            ),
            terrain_answer(
                "👨‍👩‍👧‍👦 Accessible areas where I can bring less experienced friends",
                &[(Safety, 3), (Social, 3)],
                TerrainType::ForestValley,
            ),
        ],
    },
    QuizQuestion {
        id: "conditions_adaptation",
        title: "🌪️ When Weather Changes",
        prompt: "Your approach when conditions deteriorate during a tour:",
        answers: &[
            answer(
                "🔄 Adapt the plan and find alternative, safer objectives",
                &[(Safety, 3), (Adventure, 1)],
            ),
            risk_answer(
                "🏠 Head back early - better safe than sorry",
                &[(Safety, 3)],
                RiskTolerance::Conservative,
            ),
            risk_answer(
                "⚡ Push forward if I have the skills - it's part of the adventure",
                &[(Adventure, 3), (Safety, -1)],
                RiskTolerance::Aggressive,
            ),
        ],
    },
    QuizQuestion {
        id: "access_vs_remoteness",
        title: "🚗 vs 🥾 Access vs. Adventure",
        prompt: "You prefer ski tours that are:",
        answers: &[
            answer(
                "🚗 Easy to access by car - more time skiing, less time traveling",
                &[(Safety, 1), (Social, 1)],
            ),
            answer(
                "🥾 Require effort to reach - the journey is part of the experience",
                &[(Adventure, 2), (Social, -1)],
            ),
            answer(
                "🚁 Accessible by boat/helicopter - unique and exclusive experiences",
                &[(Adventure, 1), (View, 2)],
            ),
        ],
    },
];

/// Vote tally that remembers first-seen order for tie breaking
#[derive(Debug, Clone)]
struct Votes<T> {
    counts: Vec<(T, u32)>,
}

impl<T> Default for Votes<T> {
    fn default() -> Self {
        Self { counts: Vec::new() }
    }
}

impl<T: Copy + PartialEq> Votes<T> {
    fn add(&mut self, value: T) {
        match self.counts.iter_mut().find(|(v, _)| *v == value) {
            Some((_, count)) => *count += 1,
            None => self.counts.push((value, 1)),
        }
    }

    fn winner(&self) -> Option<T> {
        let mut best: Option<(T, u32)> = None;
        for &(value, count) in &self.counts {
            if best.is_none_or(|(_, top)| count > top) {
                best = Some((value, count));
            }
        }
        best.map(|(value, _)| value)
    }
}

/// An in-progress quiz
#[derive(Debug, Clone)]
pub struct QuizSession {
    profile: UserProfile,
    terrain_votes: Votes<TerrainType>,
    risk_votes: Votes<RiskTolerance>,
    answered: [bool; QUESTION_COUNT],
}

impl Default for QuizSession {
    fn default() -> Self {
        Self::new()
    }
}

impl QuizSession {
    /// Start from the neutral profile
    #[must_use]
    pub fn new() -> Self {
        Self {
            profile: UserProfile::default(),
            terrain_votes: Votes::default(),
            risk_votes: Votes::default(),
            answered: [false; QUESTION_COUNT],
        }
    }

    /// Record the answer to one question (both indices zero-based)
    pub fn answer(&mut self, question: usize, choice: usize) -> crate::Result<()> {
        let q = QUESTIONS.get(question).ok_or_else(|| {
            SkiTourError::validation(format!(
                "question {} does not exist (quiz has {})",
                question + 1,
                QUESTIONS.len()
            ))
        })?;
        let picked = q.answers.get(choice).ok_or_else(|| {
            SkiTourError::validation(format!(
                "answer {} is not valid for '{}' (choose 1-{})",
                choice + 1,
                q.id,
                q.answers.len()
            ))
        })?;
        if self.answered[question] {
            return Err(SkiTourError::validation(format!(
                "question '{}' was already answered",
                q.id
            )));
        }
        self.answered[question] = true;

        for &(target, delta) in picked.deltas {
            let slot = match target {
                Powder => &mut self.profile.powder_priority,
                View => &mut self.profile.view_priority,
                Safety => &mut self.profile.safety_priority,
                Adventure => &mut self.profile.adventure_seeking,
                Social => &mut self.profile.social_preference,
            };
            *slot = clamp_trait(i16::from(*slot) + i16::from(delta));
        }
        if let Some(terrain) = picked.terrain_vote {
            self.terrain_votes.add(terrain);
        }
        if let Some(risk) = picked.risk_vote {
            self.risk_votes.add(risk);
        }
        Ok(())
    }

    /// Number of questions answered so far
    #[must_use]
    pub fn answered_count(&self) -> usize {
        self.answered.iter().filter(|done| **done).count()
    }

    /// Settle votes and derive the experience level
    #[must_use]
    pub fn finish(self) -> UserProfile {
        let mut profile = self.profile;
        if let Some(terrain) = self.terrain_votes.winner() {
            profile.terrain_preference = terrain;
        }
        if let Some(risk) = self.risk_votes.winner() {
            profile.risk_tolerance = risk;
        }
        profile.experience_level = if profile.safety_priority >= 8 {
            ExperienceLevel::Beginner
        } else if profile.adventure_seeking >= 8 && profile.safety_priority <= 4 {
            ExperienceLevel::Advanced
        } else {
            ExperienceLevel::Intermediate
        };
        profile
    }
}

fn clamp_trait(value: i16) -> u8 {
    u8::try_from(value.clamp(0, i16::from(MAX_TRAIT))).unwrap_or(MAX_TRAIT)
}

/// Parse a comma separated list of one-based choices, e.g. `"2,1,3,2,1,1,2"`
pub fn parse_answers(input: &str) -> crate::Result<Vec<usize>> {
    input
        .split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(|s| {
            s.parse::<usize>()
                .ok()
                .and_then(|n| n.checked_sub(1))
                .ok_or_else(|| SkiTourError::validation(format!("invalid quiz answer '{s}'")))
        })
        .collect()
}

/// Run the whole quiz from zero-based choices, one per question
pub fn profile_from_answers(choices: &[usize]) -> crate::Result<UserProfile> {
    if choices.len() != QUESTIONS.len() {
        return Err(SkiTourError::validation(format!(
            "expected {} quiz answers, got {}",
            QUESTIONS.len(),
            choices.len()
        )));
    }
    let mut session = QuizSession::new();
    for (question, &choice) in choices.iter().enumerate() {
        session.answer(question, choice)?;
    }
    Ok(session.finish())
}

/// Printable quiz with the answer numbers `--answers` accepts and the
/// walking tolerance choices for `--walk`
#[must_use]
pub fn render_quiz() -> String {
    let mut out = String::new();
    let _ = writeln!(out, "🎿 === SKI TOURING PERSONALITY QUIZ === 🎿");
    let _ = writeln!(out, "Pass one answer number per question to `--answers`.");
    let _ = writeln!(out);
    for (index, question) in QUESTIONS.iter().enumerate() {
        let _ = writeln!(out, "{}. {}", index + 1, question.title);
        let _ = writeln!(out, "   {}", question.prompt);
        for (choice, answer) in question.answers.iter().enumerate() {
            let _ = writeln!(out, "     {}. {}", choice + 1, answer.text);
        }
        let _ = writeln!(out);
    }
    let _ = writeln!(out, "🥾 Walking with skis before reaching snow (`--walk HOURS`):");
    for (label, hours) in WALKING_TOLERANCE_OPTIONS {
        let _ = writeln!(out, "     --walk {hours:<4} {label}");
    }
    out
}
