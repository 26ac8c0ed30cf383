//! In-memory interview sessions.

use std::collections::HashMap;
use std::sync::Arc;

use chrono::{DateTime, Duration, Utc};
use parking_lot::RwLock;
use serde::Serialize;
use tracing::{debug, info};
use uuid::Uuid;

use crate::interview::selection::{Difficulty, InterviewQuestion};

/// Sessions older than this are dropped whenever a new one is created.
const SESSION_TTL_HOURS: i64 = 24;

#[derive(Debug, Clone, Serialize)]
pub struct AnswerRecord {
    pub question: String,
    pub answer: String,
    pub score: u32,
    pub feedback: String,
    pub time_taken: u32,
}

#[derive(Debug, Clone, Serialize)]
pub struct InterviewSession {
    pub session_id: Uuid,
    pub questions: Vec<InterviewQuestion>,
    pub answers: Vec<AnswerRecord>,
    pub difficulty: Difficulty,
    pub created_at: DateTime<Utc>,
}

impl InterviewSession {
    pub fn next_question(&self) -> Option<&InterviewQuestion> {
        self.questions.get(self.answers.len())
    }
}

/// Where a session stands after an answer is recorded.
#[derive(Debug, Clone, Serialize)]
pub struct SessionProgress {
    pub answered: usize,
    pub total: usize,
    pub next_question: Option<InterviewQuestion>,
}

#[derive(Clone, Default)]
pub struct SessionStore {
    sessions: Arc<RwLock<HashMap<Uuid, InterviewSession>>>,
}

impl SessionStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn create(
        &self,
        questions: Vec<InterviewQuestion>,
        difficulty: Difficulty,
    ) -> InterviewSession {
        self.create_at(questions, difficulty, Utc::now())
    }

    fn create_at(
        &self,
        questions: Vec<InterviewQuestion>,
        difficulty: Difficulty,
        now: DateTime<Utc>,
    ) -> InterviewSession {
        let session = InterviewSession {
            session_id: Uuid::new_v4(),
            questions,
            answers: Vec::new(),
            difficulty,
            created_at: now,
        };

        let mut sessions = self.sessions.write();
        let cutoff = now - Duration::hours(SESSION_TTL_HOURS);
        let before = sessions.len();
        sessions.retain(|_, s| s.created_at >= cutoff);
        if sessions.len() < before {
            debug!("Pruned {} expired interview sessions", before - sessions.len());
        }
        sessions.insert(session.session_id, session.clone());

        info!(
            "Interview session {} created with {} questions",
            session.session_id,
            session.questions.len()
        );
        session
    }

    pub fn get(&self, id: Uuid) -> Option<InterviewSession> {
        self.sessions.read().get(&id).cloned()
    }

    /// Appends an answer to a session. `None` when the session is unknown.
    pub fn record_answer(&self, id: Uuid, record: AnswerRecord) -> Option<SessionProgress> {
        let mut sessions = self.sessions.write();
        let session = sessions.get_mut(&id)?;
        session.answers.push(record);
        Some(SessionProgress {
            answered: session.answers.len(),
            total: session.questions.len(),
            next_question: session.next_question().cloned(),
        })
    }

    #[cfg(test)]
    fn len(&self) -> usize {
        self.sessions.read().len()
    }
}
