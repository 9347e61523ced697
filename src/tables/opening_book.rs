//! Hash-indexed opening book read from a compact binary stream.
//!
//! Each record is one count byte `N` (1..=5), the 4-byte big-endian position
//! hash, then `N` 3-byte move fragments. A fragment is a big-endian `u16`
//! followed by one low byte and holds the low 24 bits of a move id; the high
//! byte of a book move id is always zero. End of stream between records is
//! the normal end of the book.
//!
//! The process keeps one shared book. It is loaded on first use, or earlier by
//! `preload_in_background`, and is read-only afterwards.

use std::collections::HashMap;
use std::fs::File;
use std::io::{self, BufReader, ErrorKind, Read, Write};
use std::path::{Path, PathBuf};
use std::sync::{Arc, OnceLock};
use std::thread;

use flate2::read::GzDecoder;
use rand::Rng;

use crate::errors::{ChessError, ChessResult};

/// Environment variable that overrides the default book location.
pub const BOOK_PATH_ENV: &str = "MAILBOX_CHESS_BOOK";

pub const DEFAULT_BOOK_PATH: &str = "tables/openings.bin.gz";

pub const MAX_CANDIDATES: usize = 5;

static SHARED_BOOK: OnceLock<Arc<OpeningBook>> = OnceLock::new();

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct OpeningBook {
    by_hash: HashMap<u32, Vec<u32>>,
}

impl OpeningBook {
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse an uncompressed record stream. A damaged record ends the parse;
    /// everything read before it is kept and the failure is logged.
    pub fn from_reader<R: Read>(reader: R) -> Self {
        let mut book = Self::new();
        if let Err(err) = book.read_records(reader) {
            log::warn!("opening book only partially loaded ({} positions): {err}", book.len());
        }
        book
    }

    /// Parse a gzip-compressed record stream.
    pub fn from_compressed(bytes: &[u8]) -> Self {
        Self::from_reader(GzDecoder::new(bytes))
    }

    /// Open and parse a gzip-compressed book file.
    pub fn from_path(path: impl AsRef<Path>) -> ChessResult<Self> {
        let file = File::open(path.as_ref())?;
        Ok(Self::from_reader(GzDecoder::new(BufReader::new(file))))
    }

    /// The process-wide book, loaded on first call.
    pub fn shared() -> Arc<OpeningBook> {
        Arc::clone(SHARED_BOOK.get_or_init(|| Arc::new(Self::load_default())))
    }

    /// Start loading the shared book on a background thread. Callers that
    /// reach `shared()` first load it themselves; only one load is kept.
    pub fn preload_in_background() -> ChessResult<thread::JoinHandle<()>> {
        let handle = thread::Builder::new()
            .name("opening-book-preload".to_owned())
            .spawn(|| {
                let book = Self::shared();
                log::debug!("opening book preload finished ({} positions)", book.len());
            })?;
        Ok(handle)
    }

    /// Book location: `MAILBOX_CHESS_BOOK` when set, else the default path.
    pub fn default_path() -> PathBuf {
        std::env::var_os(BOOK_PATH_ENV)
            .map(PathBuf::from)
            .unwrap_or_else(|| PathBuf::from(DEFAULT_BOOK_PATH))
    }

    fn load_default() -> Self {
        let path = Self::default_path();
        match Self::from_path(&path) {
            Ok(book) => {
                log::info!("loaded opening book {} ({} positions)", path.display(), book.len());
                book
            }
            Err(err) => {
                log::warn!("opening book {} unavailable, continuing without it: {err}", path.display());
                Self::new()
            }
        }
    }

    fn read_records<R: Read>(&mut self, mut reader: R) -> ChessResult<()> {
        let mut records = 0usize;
        loop {
            let mut count = [0u8; 1];
            match reader.read_exact(&mut count) {
                Ok(()) => {}
                Err(err) if err.kind() == ErrorKind::UnexpectedEof => return Ok(()),
                Err(err) => return Err(err.into()),
            }

            let count = count[0];
            if count == 0 || usize::from(count) > MAX_CANDIDATES {
                return Err(ChessError::CorruptBook { records, count });
            }

            let mut body = vec![0u8; 4 + 3 * usize::from(count)];
            reader.read_exact(&mut body).map_err(|err| truncation(err, records))?;

            let hash = u32::from_be_bytes([body[0], body[1], body[2], body[3]]);
            let candidates = body[4..].chunks_exact(3).map(|fragment| {
                let high = u32::from(u16::from_be_bytes([fragment[0], fragment[1]]));
                (high << 8) | u32::from(fragment[2])
            });
            self.insert(hash, candidates);
            records += 1;
        }
    }

    /// Add candidate move ids for `hash`. A position that appears in several
    /// records collects the candidates of all of them.
    pub fn insert(&mut self, hash: u32, candidates: impl IntoIterator<Item = u32>) {
        let entry = self.by_hash.entry(hash).or_default();
        let before = entry.len();
        entry.extend(candidates);
        if before > 0 {
            log::trace!("opening book hash {hash:#010x} appears in more than one record");
        }
    }

    /// Serialize the book in the uncompressed record format, splitting
    /// positions with more than five candidates over several records.
    pub fn write_to<W: Write>(&self, mut writer: W) -> io::Result<()> {
        let mut hashes: Vec<&u32> = self.by_hash.keys().collect();
        hashes.sort_unstable();

        for hash in hashes {
            for chunk in self.by_hash[hash].chunks(MAX_CANDIDATES) {
                writer.write_all(&[chunk.len() as u8])?;
                writer.write_all(&hash.to_be_bytes())?;
                for id in chunk {
                    let high = ((id >> 8) & 0xFFFF) as u16;
                    writer.write_all(&high.to_be_bytes())?;
                    writer.write_all(&[(id & 0xFF) as u8])?;
                }
            }
        }
        Ok(())
    }

    pub fn candidates(&self, hash: u32) -> &[u32] {
        self.by_hash.get(&hash).map(Vec::as_slice).unwrap_or(&[])
    }

    /// One candidate id for `hash`, drawn uniformly.
    pub fn choose_candidate<R: Rng + ?Sized>(&self, hash: u32, rng: &mut R) -> Option<u32> {
        let candidates = self.candidates(hash);
        if candidates.is_empty() {
            return None;
        }
        Some(candidates[rng.random_range(0..candidates.len())])
    }

    /// Number of positions in the book.
    pub fn len(&self) -> usize {
        self.by_hash.len()
    }

    pub fn is_empty(&self) -> bool {
        self.by_hash.is_empty()
    }
}

fn truncation(err: io::Error, records: usize) -> ChessError {
    if err.kind() == ErrorKind::UnexpectedEof {
        ChessError::TruncatedBook { records }
    } else {
        ChessError::BookIo(err)
    }
}

#[cfg(test)]
mod tests {
    use flate2::write::GzEncoder;
    use flate2::Compression;
    use rand::{rngs::StdRng, SeedableRng};

    use super::*;
    use crate::game_state::board::Board;
    use crate::moves::chess_move::Move;
    use crate::utils::algebraic::long_algebraic_to_move;

    fn book_move(board: &Board, text: &str) -> u32 {
        long_algebraic_to_move(text, board).expect("book move should be legal").id()
    }

    fn raw_record(hash: u32, ids: &[u32]) -> Vec<u8> {
        let mut out = vec![ids.len() as u8];
        out.extend_from_slice(&hash.to_be_bytes());
        for id in ids {
            out.extend_from_slice(&(((id >> 8) & 0xFFFF) as u16).to_be_bytes());
            out.push((id & 0xFF) as u8);
        }
        out
    }

    #[test]
    fn parses_records_until_end_of_stream() {
        let start = Board::starting_position();
        let e4 = book_move(&start, "e2e4");
        let d4 = book_move(&start, "d2d4");

        let mut bytes = raw_record(start.hash(), &[e4, d4]);
        bytes.extend(raw_record(0xDEAD_BEEF, &[0x0012_3456]));

        let book = OpeningBook::from_reader(bytes.as_slice());
        assert_eq!(book.len(), 2);
        assert_eq!(book.candidates(start.hash()), &[e4, d4]);
        assert_eq!(book.candidates(0xDEAD_BEEF), &[0x0012_3456]);
        assert!(book.candidates(1).is_empty());

        let decoded = Move::from_id(book.candidates(start.hash())[0]).expect("book id should decode");
        assert_eq!(decoded.to_string(), "e2e4");
    }

    #[test]
    fn truncated_record_keeps_earlier_records() {
        let mut bytes = raw_record(7, &[0x0001_0203]);
        let mut second = raw_record(8, &[0x0004_0506, 0x0007_0809]);
        second.truncate(second.len() - 2);
        bytes.extend(second);

        let book = OpeningBook::from_reader(bytes.as_slice());
        assert_eq!(book.len(), 1);
        assert_eq!(book.candidates(7), &[0x0001_0203]);

        let mut partial = OpeningBook::new();
        let err = partial
            .read_records(bytes.as_slice())
            .expect_err("truncated stream should be reported");
        assert!(matches!(err, ChessError::TruncatedBook { records: 1 }));
    }

    #[test]
    fn impossible_candidate_count_stops_parse() {
        let mut bytes = raw_record(7, &[0x0001_0203]);
        bytes.push(6);
        bytes.extend_from_slice(&[0; 22]);

        let mut book = OpeningBook::new();
        let err = book
            .read_records(bytes.as_slice())
            .expect_err("count of six should be rejected");
        assert!(matches!(err, ChessError::CorruptBook { records: 1, count: 6 }));
        assert_eq!(book.len(), 1);
    }

    #[test]
    fn compressed_book_round_trips_through_writer() {
        let mut book = OpeningBook::new();
        book.insert(42, [1, 2, 3, 4, 5, 6, 7]);
        book.insert(43, [0x00AB_CDEF]);

        let mut encoder = GzEncoder::new(Vec::new(), Compression::default());
        book.write_to(&mut encoder).expect("write to memory");
        let compressed = encoder.finish().expect("finish gzip stream");

        let reread = OpeningBook::from_compressed(&compressed);
        assert_eq!(reread, book);
    }

    #[test]
    fn missing_file_is_an_io_error() {
        let err = OpeningBook::from_path("no/such/book.bin.gz").expect_err("file does not exist");
        assert!(matches!(err, ChessError::BookIo(_)));
    }

    #[test]
    fn choose_candidate_only_returns_stored_ids() {
        let mut book = OpeningBook::new();
        book.insert(9, [10, 20, 30]);
        let mut rng = StdRng::seed_from_u64(3);
        for _ in 0..20 {
            let id = book.choose_candidate(9, &mut rng).expect("hash is in the book");
            assert!([10, 20, 30].contains(&id));
        }
        assert_eq!(book.choose_candidate(10, &mut rng), None);
    }

    #[test]
    fn shared_book_is_loaded_once() {
        let preload = OpeningBook::preload_in_background().expect("spawn preload thread");
        let first = OpeningBook::shared();
        preload.join().expect("preload thread should not panic");
        let second = OpeningBook::shared();
        assert!(Arc::ptr_eq(&first, &second));
    }

    #[test]
    fn raw_bytes_write_matches_reader_format() {
        let mut book = OpeningBook::new();
        book.insert(0x0102_0304, [0x00AA_BBCC]);
        let mut out = Vec::new();
        book.write_to(&mut out).expect("write to memory");
        assert_eq!(out, raw_record(0x0102_0304, &[0x00AA_BBCC]));
    }
}
