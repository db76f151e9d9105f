//! Gamified progress bar simulation.
//!
//! Each submitted answer is judged correct with a fixed probability. A correct
//! answer grows the streak bonus and advances progress by the base increment
//! plus the bonus; a wrong answer resets the streak. Progress is clamped to
//! 100 and every checkpoint (25/50/75/100) is reported the first time it is
//! crossed, and only then.

use std::collections::BTreeSet;
use std::time::{Duration, Instant};

use rand::Rng;
use serde::{Deserialize, Serialize};

/// Progress thresholds that trigger a one-time notification.
pub const CHECKPOINTS: [u8; 4] = [25, 50, 75, 100];

pub const MAX_PROGRESS: u8 = 100;

pub const CORRECT_MESSAGE: &str = "✅ Excellent ! Bonne réponse !";
pub const INCORRECT_MESSAGE: &str = "❌ Oups ! Essayez encore.";
pub const CONNECTED_MESSAGE: &str = "Connexion établie - Prêt à apprendre ! 🚀";
pub const RESET_MESSAGE: &str = "🔄 Progression remise à zéro - C'est reparti !";
pub const COMPLETION_MESSAGE: &str = "🐉 FÉLICITATIONS ! Vous avez vaincu le boss final !";

/// Scoring parameters.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProgressRules {
    /// Progress granted by every correct answer.
    pub base_increment: u32,
    /// Streak bonus added per consecutive correct answer.
    pub streak_step: u32,
    /// Upper bound of the streak bonus.
    pub streak_cap: u32,
    /// Probability that an answer is judged correct, in `[0, 1]`.
    pub success_probability: f64,
    /// Scales `base_increment + streak` before truncation.
    pub difficulty_multiplier: f64,
}

impl Default for ProgressRules {
    fn default() -> Self {
        ProgressRules {
            base_increment: 10,
            streak_step: 2,
            streak_cap: 10,
            success_probability: 0.7,
            difficulty_multiplier: 1.0,
        }
    }
}

impl ProgressRules {
    /// Largest increment a single answer can earn.
    pub fn max_increment(&self) -> u32 {
        self.increment_for(self.streak_cap)
    }

    fn increment_for(&self, streak: u32) -> u32 {
        let raw = f64::from(self.base_increment + streak) * self.difficulty_multiplier;
        raw.max(0.0) as u32
    }
}

/// Reward line shown for a correct answer.
pub fn reward_message(increment: u32) -> String {
    if increment >= 15 {
        format!("🔥 Streak de feu ! +{}%", increment)
    } else if increment >= 12 {
        format!("⭐ Super performance ! +{}%", increment)
    } else {
        format!("👍 Bien joué ! +{}%", increment)
    }
}

/// Message attached to a newly crossed checkpoint.
pub fn checkpoint_message(checkpoint: u8) -> String {
    if checkpoint == MAX_PROGRESS {
        COMPLETION_MESSAGE.to_string()
    } else {
        format!("⭐ Checkpoint {}% débloqué !", checkpoint)
    }
}

/// Payload of a `progress_update` event.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ProgressUpdate {
    #[serde(rename = "type")]
    pub kind: &'static str,
    pub progress: u8,
    pub message: String,
    pub reward: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub increment: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub streak: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub new_checkpoints: Option<Vec<u8>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub accuracy: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub special_message: Option<String>,
}

impl ProgressUpdate {
    fn status(progress: u8, message: impl Into<String>) -> Self {
        ProgressUpdate {
            kind: "progress_update",
            progress,
            message: message.into(),
            reward: None,
            increment: None,
            streak: None,
            new_checkpoints: None,
            accuracy: None,
            special_message: None,
        }
    }
}

/// Summary logged when a session ends.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SessionSummary {
    pub duration: Duration,
    pub progress: u8,
    pub accuracy: f64,
}

/// Per-connection progress state.
#[derive(Debug, Clone)]
pub struct ProgressSession {
    progress: u8,
    checkpoints_reached: BTreeSet<u8>,
    total_answers: u32,
    correct_answers: u32,
    streak: u32,
    started_at: Instant,
}

impl Default for ProgressSession {
    fn default() -> Self {
        Self::new()
    }
}

impl ProgressSession {
    pub fn new() -> Self {
        ProgressSession {
            progress: 0,
            checkpoints_reached: BTreeSet::new(),
            total_answers: 0,
            correct_answers: 0,
            streak: 0,
            started_at: Instant::now(),
        }
    }

    pub fn progress(&self) -> u8 {
        self.progress
    }

    pub fn streak(&self) -> u32 {
        self.streak
    }

    pub fn total_answers(&self) -> u32 {
        self.total_answers
    }

    pub fn correct_answers(&self) -> u32 {
        self.correct_answers
    }

    pub fn checkpoints_reached(&self) -> &BTreeSet<u8> {
        &self.checkpoints_reached
    }

    /// Percentage of correct answers; 0 before the first answer.
    pub fn accuracy(&self) -> f64 {
        f64::from(self.correct_answers) / f64::from(self.total_answers.max(1)) * 100.0
    }

    /// Update sent right after a client connects.
    pub fn greeting(&self) -> ProgressUpdate {
        ProgressUpdate::status(self.progress, CONNECTED_MESSAGE)
    }

    /// Judges an answer at random, then applies it.
    pub fn submit_answer<R: Rng + ?Sized>(
        &mut self,
        rules: &ProgressRules,
        rng: &mut R,
    ) -> ProgressUpdate {
        let correct = rng.gen_bool(rules.success_probability.clamp(0.0, 1.0));
        self.apply_answer(rules, correct)
    }

    /// Applies an already judged answer.
    pub fn apply_answer(&mut self, rules: &ProgressRules, correct: bool) -> ProgressUpdate {
        self.total_answers += 1;

        if !correct {
            self.streak = 0;
            return ProgressUpdate {
                increment: Some(0),
                streak: Some(0),
                accuracy: Some(self.accuracy()),
                ..ProgressUpdate::status(self.progress, INCORRECT_MESSAGE)
            };
        }

        self.correct_answers += 1;
        self.streak = (self.streak + rules.streak_step).min(rules.streak_cap);
        let increment = rules.increment_for(self.streak);
        let progress = (u32::from(self.progress) + increment).min(u32::from(MAX_PROGRESS));
        self.progress = progress as u8;

        let new_checkpoints: Vec<u8> = CHECKPOINTS
            .into_iter()
            .filter(|&cp| self.progress >= cp && self.checkpoints_reached.insert(cp))
            .collect();
        let special_message = new_checkpoints.last().map(|&cp| checkpoint_message(cp));

        ProgressUpdate {
            reward: Some(reward_message(increment)),
            increment: Some(increment),
            streak: Some(self.streak),
            new_checkpoints: Some(new_checkpoints),
            accuracy: Some(self.accuracy()),
            special_message,
            ..ProgressUpdate::status(self.progress, CORRECT_MESSAGE)
        }
    }

    /// Starts the session over, streak included.
    pub fn reset(&mut self) -> ProgressUpdate {
        *self = ProgressSession::new();
        ProgressUpdate::status(0, RESET_MESSAGE)
    }

    pub fn summary(&self) -> SessionSummary {
        SessionSummary {
            duration: self.started_at.elapsed(),
            progress: self.progress,
            accuracy: self.accuracy(),
        }
    }
}
