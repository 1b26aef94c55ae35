//! Marian tokenizer built from the files the opus-mt repos actually
//! ship: `vocab.json` (piece -> model id) and `source.spm` (the
//! SentencePiece unigram model carrying piece scores). The repos have
//! no converted `tokenizer.json`, so the unigram segmenter is
//! assembled here, ordered by vocab id so segmentation yields model
//! ids directly.

use std::collections::HashMap;
use std::path::Path;

use anyhow::{anyhow, Result};
use tokenizers::models::unigram::Unigram;
use tokenizers::Model;

/// SentencePiece word-boundary marker.
const WORD_PREFIX: char = '\u{2581}';

pub struct MarianTokenizer {
    segmenter: Unigram,
    pieces: HashMap<u32, String>,
    unk_id: u32,
}

impl MarianTokenizer {
    pub fn from_files(vocab_path: &Path, spm_path: &Path) -> Result<Self> {
        let vocab: HashMap<String, u32> =
            serde_json::from_str(&std::fs::read_to_string(vocab_path)?)?;
        let scores = spm::piece_scores(&std::fs::read(spm_path)?)?;
        Self::from_parts(vocab, &scores)
    }

    /// `vocab` maps piece -> model id; `scores` carries the unigram
    /// log probabilities from the SentencePiece model. Pieces without
    /// a score (specials such as `<pad>` and `</s>`) get score zero,
    /// matching how converted Marian tokenizers are built.
    pub fn from_parts(vocab: HashMap<String, u32>, scores: &HashMap<String, f64>) -> Result<Self> {
        let unk_id = *vocab
            .get("<unk>")
            .ok_or_else(|| anyhow!("vocab has no <unk> entry"))?;

        let size = vocab.values().map(|id| *id as usize + 1).max().unwrap_or(0);
        let mut slots: Vec<Option<(String, f64)>> = vec![None; size];
        for (piece, id) in &vocab {
            slots[*id as usize] =
                Some((piece.clone(), scores.get(piece).copied().unwrap_or(0.0)));
        }
        // Ids absent from vocab.json still need a slot so indices line
        // up with model ids.
        let ordered: Vec<(String, f64)> = slots
            .into_iter()
            .enumerate()
            .map(|(id, slot)| slot.unwrap_or_else(|| (format!("<unused_{id}>"), 0.0)))
            .collect();

        let segmenter = Unigram::from(ordered, Some(unk_id as usize), false)
            .map_err(|e| anyhow!("building unigram segmenter: {e}"))?;
        let pieces = vocab.into_iter().map(|(piece, id)| (id, piece)).collect();
        Ok(Self {
            segmenter,
            pieces,
            unk_id,
        })
    }

    /// Segment text into model ids. Words are split on whitespace and
    /// prefixed with the SentencePiece marker; no eos is appended.
    pub fn encode(&self, text: &str) -> Result<Vec<u32>> {
        let mut ids = Vec::new();
        for word in text.split_whitespace() {
            let chunk = format!("{WORD_PREFIX}{word}");
            let tokens = self
                .segmenter
                .tokenize(&chunk)
                .map_err(|e| anyhow!("segmentation failed: {e}"))?;
            ids.extend(tokens.iter().map(|t| t.id));
        }
        Ok(ids)
    }

    /// Map ids back to text, dropping any id in `skip`.
    pub fn decode(&self, ids: &[u32], skip: &[u32]) -> String {
        let mut out = String::new();
        for id in ids {
            if skip.contains(id) {
                continue;
            }
            if let Some(piece) = self.pieces.get(id) {
                out.push_str(piece);
            }
        }
        out.replace(WORD_PREFIX, " ").trim().to_string()
    }

    pub fn unk_id(&self) -> u32 {
        self.unk_id
    }
}

mod spm {
    //! Minimal reader for the SentencePiece `ModelProto`: only the
    //! pieces (field 1) with their string (field 1) and score (field
    //! 2) are needed, so the protobuf walk is done by hand instead of
    //! pulling in a codegen dependency.

    use std::collections::HashMap;

    use anyhow::{bail, Result};

    pub fn piece_scores(data: &[u8]) -> Result<HashMap<String, f64>> {
        let mut scores = HashMap::new();
        let mut pos = 0;
        while pos < data.len() {
            let (key, next) = varint(data, pos)?;
            pos = next;
            let field = key >> 3;
            let wire = (key & 7) as u8;
            if field == 1 && wire == 2 {
                let (len, next) = varint(data, pos)?;
                pos = next;
                let end = pos + len as usize;
                if end > data.len() {
                    bail!("truncated sentencepiece model");
                }
                if let Some((piece, score)) = sentence_piece(&data[pos..end])? {
                    scores.insert(piece, score);
                }
                pos = end;
            } else {
                pos = skip_field(data, pos, wire)?;
            }
        }
        Ok(scores)
    }

    fn sentence_piece(data: &[u8]) -> Result<Option<(String, f64)>> {
        let mut piece = None;
        let mut score = 0.0f64;
        let mut pos = 0;
        while pos < data.len() {
            let (key, next) = varint(data, pos)?;
            pos = next;
            let field = key >> 3;
            let wire = (key & 7) as u8;
            match (field, wire) {
                (1, 2) => {
                    let (len, next) = varint(data, pos)?;
                    pos = next;
                    let end = pos + len as usize;
                    if end > data.len() {
                        bail!("truncated sentencepiece entry");
                    }
                    piece = Some(String::from_utf8_lossy(&data[pos..end]).into_owned());
                    pos = end;
                }
                (2, 5) => {
                    if pos + 4 > data.len() {
                        bail!("truncated sentencepiece score");
                    }
                    let mut bytes = [0u8; 4];
                    bytes.copy_from_slice(&data[pos..pos + 4]);
                    score = f64::from(f32::from_le_bytes(bytes));
                    pos += 4;
                }
                _ => pos = skip_field(data, pos, wire)?,
            }
        }
        Ok(piece.map(|p| (p, score)))
    }

    fn varint(data: &[u8], mut pos: usize) -> Result<(u64, usize)> {
        let mut value = 0u64;
        let mut shift = 0u32;
        loop {
            let Some(&byte) = data.get(pos) else {
                bail!("truncated varint");
            };
            pos += 1;
            value |= u64::from(byte & 0x7f) << shift;
            if byte & 0x80 == 0 {
                return Ok((value, pos));
            }
            shift += 7;
            if shift > 63 {
                bail!("varint too long");
            }
        }
    }

    fn skip_field(data: &[u8], pos: usize, wire: u8) -> Result<usize> {
        match wire {
            0 => Ok(varint(data, pos)?.1),
            1 => Ok(pos + 8),
            2 => {
                let (len, next) = varint(data, pos)?;
                Ok(next + len as usize)
            }
            5 => Ok(pos + 4),
            _ => bail!("unsupported wire type {wire}"),
        }
    }
}
