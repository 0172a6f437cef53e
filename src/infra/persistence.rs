use std::collections::HashMap;

use thiserror::Error;
use uuid::Uuid;

use crate::api::{Cover, EventBook, EventPage, Snapshot};

#[derive(Debug, Error, PartialEq, Eq)]
pub enum LogError {
    /// Ожидаемый номер не совпал с фактическим хвостом потока (конкурентная запись).
    #[error("sequence mismatch for {domain}/{root}: expected {expected}, stream is at {actual}")]
    SequenceMismatch {
        domain: String,
        root: Uuid,
        expected: u64,
        actual: u64,
    },

    /// Страницы в добавляемой книге идут не подряд.
    #[error("non-contiguous pages for {domain}/{root} at sequence {sequence}")]
    NonContiguous {
        domain: String,
        root: Uuid,
        sequence: u64,
    },

    #[error("snapshot at {sequence} is beyond the end of {domain}/{root}")]
    SnapshotBeyondEnd {
        domain: String,
        root: Uuid,
        sequence: u64,
    },
}

/// Абстракция журнала событий: упорядоченный поток на каждую пару (domain, root).
///
/// В продакшене за ней стоит долговременное хранилище, здесь она нужна
/// для тестов и локального запуска.
pub trait EventLog {
    /// Прочитать события с номерами в `[from, to)`; `to = None` – до конца.
    /// Если снапшот старше `from`, он прикладывается, а страницы начинаются
    /// сразу после него: книга всегда пересобирается в верное состояние.
    fn read(&self, domain: &str, root: Uuid, from: u64, to: Option<u64>) -> EventBook;

    /// Вся история потока (с последним снапшотом и хвостом после него).
    fn load(&self, domain: &str, root: Uuid) -> EventBook;

    /// Добавить страницы книги. Первая страница должна иметь номер `expected_sequence`.
    fn append(&mut self, book: &EventBook, expected_sequence: u64) -> Result<(), LogError>;

    fn save_snapshot(&mut self, cover: &Cover, snapshot: Snapshot) -> Result<(), LogError>;
}

#[derive(Debug, Default)]
struct Stream {
    cover: Option<Cover>,
    pages: Vec<EventPage>,
    snapshot: Option<Snapshot>,
}

impl Stream {
    fn next_sequence(&self) -> u64 {
        self.pages.last().map_or(0, |p| p.sequence + 1)
    }
}

/// Простая in-memory реализация для тестов и локального запуска.
#[derive(Debug, Default)]
pub struct InMemoryEventLog {
    streams: HashMap<(String, Uuid), Stream>,
}

impl InMemoryEventLog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Номер следующего события потока (0 для нового).
    pub fn next_sequence(&self, domain: &str, root: Uuid) -> u64 {
        self.streams
            .get(&(domain.to_string(), root))
            .map_or(0, Stream::next_sequence)
    }

    fn cover_for(&self, domain: &str, root: Uuid) -> Cover {
        self.streams
            .get(&(domain.to_string(), root))
            .and_then(|s| s.cover.clone())
            .unwrap_or_else(|| Cover::new(domain, root, ""))
    }
}

impl EventLog for InMemoryEventLog {
    fn read(&self, domain: &str, root: Uuid, from: u64, to: Option<u64>) -> EventBook {
        let mut book = EventBook::new(self.cover_for(domain, root));
        let Some(stream) = self.streams.get(&(domain.to_string(), root)) else {
            return book;
        };

        // снапшот покрывает только префикс: страницы идут с snapshot.sequence + 1
        let snapshot = stream
            .snapshot
            .as_ref()
            .filter(|s| from > 0 && s.sequence < from)
            .cloned();
        let start = snapshot.as_ref().map_or(from, |s| s.sequence + 1);
        book.snapshot = snapshot;
        book.pages = stream
            .pages
            .iter()
            .filter(|p| p.sequence >= start && to.map_or(true, |t| p.sequence < t))
            .cloned()
            .collect();
        book
    }

    fn load(&self, domain: &str, root: Uuid) -> EventBook {
        let from = self
            .streams
            .get(&(domain.to_string(), root))
            .and_then(|s| s.snapshot.as_ref())
            .map_or(0, |s| s.sequence + 1);
        self.read(domain, root, from, None)
    }

    fn append(&mut self, book: &EventBook, expected_sequence: u64) -> Result<(), LogError> {
        let key = (book.cover.domain.clone(), book.cover.root);
        let stream = self.streams.entry(key).or_default();

        let actual = stream.next_sequence();
        if actual != expected_sequence {
            return Err(LogError::SequenceMismatch {
                domain: book.cover.domain.clone(),
                root: book.cover.root,
                expected: expected_sequence,
                actual,
            });
        }

        let mut next = actual;
        for page in &book.pages {
            if page.sequence != next {
                return Err(LogError::NonContiguous {
                    domain: book.cover.domain.clone(),
                    root: book.cover.root,
                    sequence: page.sequence,
                });
            }
            next += 1;
        }

        if stream.cover.is_none() {
            stream.cover = Some(book.cover.clone());
        }
        stream.pages.extend(book.pages.iter().cloned());
        Ok(())
    }

    fn save_snapshot(&mut self, cover: &Cover, snapshot: Snapshot) -> Result<(), LogError> {
        let key = (cover.domain.clone(), cover.root);
        let stream = self.streams.entry(key).or_default();
        if snapshot.sequence >= stream.next_sequence() {
            return Err(LogError::SnapshotBeyondEnd {
                domain: cover.domain.clone(),
                root: cover.root,
                sequence: snapshot.sequence,
            });
        }
        stream.snapshot = Some(snapshot);
        Ok(())
    }
}
