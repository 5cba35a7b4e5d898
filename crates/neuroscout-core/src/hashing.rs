//! Content hashing for stimuli and raw payloads.
//!
//! Digests are 160-bit SHA-1 hex strings, used platform-wide as
//! content-addressed identity and cache keys. Identical byte content
//! always yields the identical digest; nothing here consults mutable
//! external state.

use std::fs::File;
use std::io::Read;
use std::path::{Path, PathBuf};

use sha1::{Digest, Sha1};

use crate::domain::error::{NeuroscoutError, Result};

/// Block size for streaming file content through the digest.
const BLOCK_SIZE: usize = 64 * 1024;

/// Hash raw bytes.
pub fn hash_bytes(data: &[u8]) -> String {
    let mut hasher = Sha1::new();
    hasher.update(data);
    hex::encode(hasher.finalize())
}

/// Hash text as its UTF-8 encoding.
pub fn hash_text(text: &str) -> String {
    hash_bytes(text.as_bytes())
}

/// A stimulus to fingerprint: a path still on disk, or an object already
/// loaded by the stimulus-loading collaborator.
#[derive(Debug, Clone)]
pub enum Stimulus {
    File(PathBuf),
    Loaded(LoadedStimulus),
}

/// An already-loaded stimulus.
#[derive(Debug, Clone)]
pub struct LoadedStimulus {
    /// File the stimulus was loaded from.
    pub filename: PathBuf,

    /// Provenance file recorded by upstream transformations, if any.
    pub source_file: Option<PathBuf>,

    /// In-memory payload, for stimuli that carry their own data.
    pub data: Option<StimulusData>,
}

/// In-memory stimulus payload.
#[derive(Debug, Clone)]
pub enum StimulusData {
    Bytes(Vec<u8>),
    Text(String),
}

/// Fingerprint a stimulus.
///
/// Stimuli carrying an in-memory payload hash that payload directly.
/// Otherwise the backing file (the provenance source if recorded, else
/// the stimulus's own filename) is streamed through the digest in 64 KiB
/// blocks so large media never load fully into memory.
///
/// A path input that does not exist on disk fails with
/// [`NeuroscoutError::StimulusNotFound`].
pub fn hash_stimulus(stimulus: &Stimulus) -> Result<String> {
    match stimulus {
        Stimulus::File(path) => {
            if !path.is_file() {
                return Err(NeuroscoutError::StimulusNotFound { path: path.clone() });
            }
            hash_file(path)
        }
        Stimulus::Loaded(loaded) => match &loaded.data {
            Some(StimulusData::Bytes(bytes)) => Ok(hash_bytes(bytes)),
            Some(StimulusData::Text(text)) => Ok(hash_text(text)),
            None => {
                let path = loaded.source_file.as_deref().unwrap_or(&loaded.filename);
                hash_file(path)
            }
        },
    }
}

fn hash_file(path: &Path) -> Result<String> {
    let mut file = File::open(path)?;
    let mut hasher = Sha1::new();
    let mut block = [0u8; BLOCK_SIZE];
    loop {
        let read = file.read(&mut block)?;
        if read == 0 {
            break;
        }
        hasher.update(&block[..read]);
    }
    Ok(hex::encode(hasher.finalize()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_hash_bytes_known_vector() {
        assert_eq!(hash_bytes(b"abc"), "a9993e364706816aba3e25717850c26c9cd0d89d");
    }

    #[test]
    fn test_hash_bytes_deterministic() {
        assert_eq!(hash_bytes(b"x"), hash_bytes(b"x"));
    }

    #[test]
    fn test_hash_text_matches_utf8_bytes() {
        assert_eq!(hash_text("x"), hash_bytes(b"x"));
        assert_eq!(hash_text("émotion"), hash_bytes("émotion".as_bytes()));
    }

    #[test]
    fn test_hash_stimulus_file() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("stim.txt");
        std::fs::write(&path, b"a scene description").expect("write");

        let digest = hash_stimulus(&Stimulus::File(path)).expect("hash");
        assert_eq!(digest, hash_bytes(b"a scene description"));
    }

    #[test]
    fn test_hash_stimulus_missing_file() {
        let err = hash_stimulus(&Stimulus::File(PathBuf::from("/does/not/exist.mp4")))
            .expect_err("missing file should fail");
        assert!(matches!(err, NeuroscoutError::StimulusNotFound { .. }));
    }

    #[test]
    fn test_hash_stimulus_streams_large_file() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("big.bin");
        let mut file = File::create(&path).expect("create");
        // Spans several blocks, ends mid-block.
        let payload = vec![0xABu8; 3 * BLOCK_SIZE + 17];
        file.write_all(&payload).expect("write");
        drop(file);

        let digest = hash_stimulus(&Stimulus::File(path)).expect("hash");
        assert_eq!(digest, hash_bytes(&payload));
    }

    #[test]
    fn test_hash_stimulus_prefers_in_memory_data() {
        let stim = Stimulus::Loaded(LoadedStimulus {
            filename: PathBuf::from("/irrelevant/on/disk.txt"),
            source_file: None,
            data: Some(StimulusData::Text("hello".to_string())),
        });
        assert_eq!(hash_stimulus(&stim).expect("hash"), hash_text("hello"));
    }

    #[test]
    fn test_hash_stimulus_prefers_source_file_over_filename() {
        let dir = tempfile::tempdir().expect("tempdir");
        let source = dir.path().join("original.wav");
        let derived = dir.path().join("derived.wav");
        std::fs::write(&source, b"source bytes").expect("write");
        std::fs::write(&derived, b"derived bytes").expect("write");

        let stim = Stimulus::Loaded(LoadedStimulus {
            filename: derived,
            source_file: Some(source),
            data: None,
        });
        assert_eq!(hash_stimulus(&stim).expect("hash"), hash_bytes(b"source bytes"));
    }

    #[test]
    fn test_hash_stimulus_falls_back_to_filename() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("clip.mp4");
        std::fs::write(&path, b"clip bytes").expect("write");

        let stim = Stimulus::Loaded(LoadedStimulus {
            filename: path,
            source_file: None,
            data: None,
        });
        assert_eq!(hash_stimulus(&stim).expect("hash"), hash_bytes(b"clip bytes"));
    }
}
