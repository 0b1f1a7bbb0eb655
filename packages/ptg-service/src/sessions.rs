//! Per-user suggestion sessions.
//!
//! A session holds the ranked candidates of the user's last query and a cursor. It lives only
//! in process memory; a restart forgets every session.

use std::{
	num::NonZeroUsize,
	sync::{Mutex, MutexGuard},
	time::{Duration, Instant},
};

use ahash::RandomState;
use lru::LruCache;

use crate::retrieval::Candidate;

pub struct SessionStore {
	inner: Mutex<Inner>,
	ttl: Duration,
}
impl SessionStore {
	pub fn new(cfg: &ptg_config::SearchSessions) -> Self {
		Self::with_limits(Duration::from_secs(cfg.ttl_seconds), cfg.max_sessions as usize)
	}

	pub fn with_limits(ttl: Duration, max_sessions: usize) -> Self {
		let cap = NonZeroUsize::new(max_sessions).unwrap_or(NonZeroUsize::MIN);
		let inner = Inner {
			sessions: LruCache::with_hasher(cap, RandomState::new()),
			next_generation: 0,
		};

		Self { inner: Mutex::new(inner), ttl }
	}

	/// Stores a fresh session for the user and claims its first candidate.
	///
	/// Any earlier session of the user is dropped, even when `candidates` is empty.
	pub fn replace(&self, user_id: i64, query: String, candidates: Vec<Candidate>) -> Option<Claim> {
		self.replace_at(user_id, query, candidates, Instant::now())
	}

	/// Claims the next unseen candidate, or `None` when the session is missing or exhausted.
	pub fn claim_next(&self, user_id: i64) -> Option<Claim> {
		self.claim_next_at(user_id, Instant::now())
	}

	/// Puts a claimed candidate back so the next call offers it again.
	///
	/// Ignored when the session was replaced or advanced since the claim.
	pub fn release(&self, user_id: i64, claim: &Claim) {
		let mut inner = self.lock();
		let Some(session) = inner.sessions.peek_mut(&user_id) else {
			return;
		};

		if session.generation == claim.generation && session.cursor == claim.position + 1 {
			session.cursor = claim.position;
		}
	}

	pub fn remove(&self, user_id: i64) -> bool {
		self.lock().sessions.pop(&user_id).is_some()
	}

	pub fn len(&self) -> usize {
		self.lock().sessions.len()
	}

	pub fn is_empty(&self) -> bool {
		self.len() == 0
	}

	fn replace_at(
		&self,
		user_id: i64,
		query: String,
		candidates: Vec<Candidate>,
		now: Instant,
	) -> Option<Claim> {
		let mut inner = self.lock();

		inner.sessions.pop(&user_id);
		inner.trim_expired(now, self.ttl);

		if candidates.is_empty() {
			return None;
		}

		inner.next_generation += 1;

		let generation = inner.next_generation;
		let mut session = Session { query, candidates, cursor: 0, touched_at: now, generation };
		let claim = session.advance(now);

		if let Some((evicted, _)) = inner.sessions.push(user_id, session) {
			tracing::debug!(user_id = evicted, "Evicted least recently used session.");
		}

		claim
	}

	fn claim_next_at(&self, user_id: i64, now: Instant) -> Option<Claim> {
		let mut inner = self.lock();

		inner.trim_expired(now, self.ttl);

		let session = inner.sessions.get_mut(&user_id)?;

		if session.is_expired(now, self.ttl) {
			inner.sessions.pop(&user_id);

			return None;
		}

		session.advance(now)
	}

	fn lock(&self) -> MutexGuard<'_, Inner> {
		// A panic while holding the lock cannot leave a session half-written.
		self.inner.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
	}
}

/// One candidate handed out of a session.
#[derive(Debug, Clone)]
pub struct Claim {
	pub query: String,
	pub candidate: Candidate,
	/// Zero-based index of the candidate within the session.
	pub position: usize,
	pub total: usize,
	generation: u64,
}
impl Claim {
	pub fn remaining(&self) -> usize {
		self.total.saturating_sub(self.position + 1)
	}
}

struct Inner {
	/// Most recently touched first, so expired sessions collect at the tail.
	sessions: LruCache<i64, Session, RandomState>,
	next_generation: u64,
}
impl Inner {
	fn trim_expired(&mut self, now: Instant, ttl: Duration) {
		while let Some((_, session)) = self.sessions.peek_lru() {
			if !session.is_expired(now, ttl) {
				break;
			}

			self.sessions.pop_lru();
		}
	}
}

struct Session {
	query: String,
	candidates: Vec<Candidate>,
	cursor: usize,
	touched_at: Instant,
	generation: u64,
}
impl Session {
	fn is_expired(&self, now: Instant, ttl: Duration) -> bool {
		now.saturating_duration_since(self.touched_at) >= ttl
	}

	fn advance(&mut self, now: Instant) -> Option<Claim> {
		let candidate = self.candidates.get(self.cursor)?.clone();
		let claim = Claim {
			query: self.query.clone(),
			candidate,
			position: self.cursor,
			total: self.candidates.len(),
			generation: self.generation,
		};

		self.cursor += 1;
		self.touched_at = now;

		Some(claim)
	}
}
