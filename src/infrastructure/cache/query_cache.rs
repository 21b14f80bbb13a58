//! In-memory query cache with request de-duplication and stale-while-revalidate.
//!
//! Each key maps to an entry holding the last good value, when it was fetched,
//! the in-flight fetch (if any) and the last error. Reads follow these rules:
//!
//! - Fresh value: returned as-is, no call.
//! - Stale value: returned immediately; one background refetch is started.
//! - No value, or invalidated: the caller waits for a fetch. Concurrent callers
//!   share the same in-flight future.
//!
//! Invalidation moves the entry to a new generation. A fetch remembers the
//! generation it started under and only writes back if it still matches, so a
//! response that was already on the wire when a mutation happened can never
//! mark the entry fresh again. Generations come from one counter per cache and
//! are never reused, which keeps the guard intact across [`QueryCache::clear`].

use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

use dashmap::DashMap;
use dashmap::mapref::one::RefMut;
use futures_util::FutureExt;
use futures_util::future::{BoxFuture, Shared};
use tokio::time::Instant;
use tracing::debug;

use super::query::{Query, QueryKey, QueryState};
use crate::error::{AppError, ErrorRouter};

type SharedFetch<T> = Shared<BoxFuture<'static, Result<T, AppError>>>;

struct Entry<T> {
    data: Option<T>,
    fetched_at: Option<Instant>,
    invalidated: bool,
    generation: u64,
    in_flight: Option<(u64, SharedFetch<T>)>,
    error: Option<AppError>,
}

impl<T: Clone> Entry<T> {
    fn new(generation: u64) -> Self {
        Self {
            data: None,
            fetched_at: None,
            invalidated: false,
            generation,
            in_flight: None,
            error: None,
        }
    }

    fn is_fresh(&self, now: Instant, stale_time: Duration) -> bool {
        self.fetched_at
            .is_some_and(|at| now.saturating_duration_since(at) < stale_time)
    }

    /// In-flight fetch started under the current generation.
    fn current_fetch(&self) -> Option<SharedFetch<T>> {
        self.in_flight
            .as_ref()
            .filter(|(generation, _)| *generation == self.generation)
            .map(|(_, fetch)| fetch.clone())
    }
}

enum Plan<T> {
    Hit(T),
    Stale(T, Option<SharedFetch<T>>),
    Wait(SharedFetch<T>),
}

struct Inner<T> {
    entries: DashMap<QueryKey, Entry<T>>,
    stale_time: Duration,
    router: ErrorRouter,
    generations: AtomicU64,
}

impl<T: Clone> Inner<T> {
    fn next_generation(&self) -> u64 {
        self.generations.fetch_add(1, Ordering::Relaxed)
    }

    fn entry(&self, key: QueryKey) -> RefMut<'_, QueryKey, Entry<T>> {
        self.entries
            .entry(key)
            .or_insert_with(|| Entry::new(self.next_generation()))
    }

    fn settle(&self, key: &QueryKey, generation: u64, result: &Result<T, AppError>) {
        let Some(mut entry) = self.entries.get_mut(key) else {
            return;
        };

        if entry
            .in_flight
            .as_ref()
            .is_some_and(|(started_under, _)| *started_under == generation)
        {
            entry.in_flight = None;
        }

        if entry.generation != generation {
            debug!(key = %key, generation, "Discarding result of fetch started before invalidation");
            return;
        }

        match result {
            Ok(data) => {
                entry.data = Some(data.clone());
                entry.fetched_at = Some(Instant::now());
                entry.invalidated = false;
                entry.error = None;
            }
            Err(error) => {
                entry.error = Some(error.clone());
            }
        }
    }
}

/// Cache of query outputs of type `T`, keyed by [`QueryKey`].
///
/// Cloning is cheap and clones share the same entries.
pub struct QueryCache<T> {
    inner: Arc<Inner<T>>,
}

impl<T> Clone for QueryCache<T> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

impl<T> QueryCache<T>
where
    T: Clone + Send + Sync + 'static,
{
    /// Creates an empty cache. Values stay fresh for `stale_time`; failures are
    /// presented through `router`.
    pub fn new(stale_time: Duration, router: ErrorRouter) -> Self {
        Self {
            inner: Arc::new(Inner {
                entries: DashMap::new(),
                stale_time,
                router,
                generations: AtomicU64::new(0),
            }),
        }
    }

    /// Reads a query through the cache.
    ///
    /// # Errors
    ///
    /// Returns the fetch error when the caller had to wait for a fetch and it
    /// failed. The error has already been routed; callers must not present it
    /// again.
    pub async fn fetch<Q>(&self, query: &Q) -> Result<T, AppError>
    where
        Q: Query<Output = T>,
    {
        let key = query.key();
        let now = Instant::now();

        let plan = {
            let mut entry = self.inner.entry(key.clone());
            match entry.data.clone() {
                Some(data) if !entry.invalidated && entry.is_fresh(now, self.inner.stale_time) => {
                    Plan::Hit(data)
                }
                Some(data) if !entry.invalidated => {
                    let refresh = match entry.current_fetch() {
                        Some(_) => None,
                        None => Some(self.start_fetch(&mut entry, query)),
                    };
                    Plan::Stale(data, refresh)
                }
                _ => Plan::Wait(
                    entry
                        .current_fetch()
                        .unwrap_or_else(|| self.start_fetch(&mut entry, query)),
                ),
            }
        };

        match plan {
            Plan::Hit(data) => {
                debug!(key = %key, "Query cache hit");
                Ok(data)
            }
            Plan::Stale(data, refresh) => {
                debug!(key = %key, "Serving stale value");
                if let Some(fetch) = refresh {
                    tokio::spawn(fetch);
                }
                Ok(data)
            }
            Plan::Wait(fetch) => {
                debug!(key = %key, "Query cache miss, waiting for fetch");
                fetch.await
            }
        }
    }

    /// Fetches regardless of freshness and waits for the result.
    ///
    /// Joins a fetch already in flight for the current generation; never joins
    /// one started before the last invalidation.
    ///
    /// # Errors
    ///
    /// See [`Self::fetch`].
    pub async fn refetch<Q>(&self, query: &Q) -> Result<T, AppError>
    where
        Q: Query<Output = T>,
    {
        let fetch = {
            let mut entry = self.inner.entry(query.key());
            entry
                .current_fetch()
                .unwrap_or_else(|| self.start_fetch(&mut entry, query))
        };
        fetch.await
    }

    /// Marks every entry of the named query as invalid.
    ///
    /// Cached values stay observable through [`Self::state`] until the next
    /// fetch replaces them, but are no longer served by [`Self::fetch`].
    pub fn invalidate(&self, name: &str) {
        let mut count = 0;
        for mut entry in self.inner.entries.iter_mut() {
            if entry.key().name() == name {
                entry.invalidated = true;
                entry.generation = self.inner.next_generation();
                count += 1;
            }
        }
        debug!(name, count, "Invalidated queries");
    }

    /// Current state of a key without triggering a fetch.
    ///
    /// Cached data wins over a later error: a failed refetch keeps the query
    /// `Ready` with the previous value.
    pub fn state(&self, key: &QueryKey) -> QueryState<T> {
        let Some(entry) = self.inner.entries.get(key) else {
            return QueryState::Loading;
        };

        match (&entry.data, &entry.error) {
            (Some(data), _) => QueryState::Ready(data.clone()),
            (None, Some(error)) if entry.in_flight.is_none() => QueryState::Failed(error.clone()),
            _ => QueryState::Loading,
        }
    }

    /// Returns true while a fetch for `key` is in flight.
    pub fn is_fetching(&self, key: &QueryKey) -> bool {
        self.inner
            .entries
            .get(key)
            .is_some_and(|entry| entry.in_flight.is_some())
    }

    /// Drops every entry. Fetches still in flight settle without writing back.
    pub fn clear(&self) {
        self.inner.entries.clear();
    }

    fn start_fetch<Q>(&self, entry: &mut Entry<T>, query: &Q) -> SharedFetch<T>
    where
        Q: Query<Output = T>,
    {
        let generation = entry.generation;
        let inner = Arc::clone(&self.inner);
        let query = query.clone();

        let fetch = async move {
            let key = query.key();
            debug!(key = %key, generation, "Fetching query");

            let result = query.fetch().await.map(|raw| query.select(raw));
            inner.settle(&key, generation, &result);

            if let Err(error) = &result {
                inner.router.route(error, query.failure_message());
            }
            result
        }
        .boxed()
        .shared();

        entry.in_flight = Some((generation, fetch.clone()));
        fetch
    }
}
